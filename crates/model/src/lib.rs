pub mod core;
pub mod records;

pub use crate::core::value::Value;
pub use crate::records::record::Record;
