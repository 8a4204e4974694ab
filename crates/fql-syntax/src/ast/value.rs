use serde::{Deserialize, Serialize};
use std::fmt;

/// Right-hand side of an expression as written in the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ValueNode {
    Number(i64),
    QuotedString(QuotedString),
    Constant(String),
}

impl fmt::Display for ValueNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueNode::Number(n) => write!(f, "{}", n),
            ValueNode::QuotedString(s) => write!(f, "{}", s),
            ValueNode::Constant(c) => write!(f, "{}", c),
        }
    }
}

/// A string literal kept in its quoted source form; escapes are resolved on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotedString {
    raw: String,
}

impl QuotedString {
    pub fn new(raw: impl Into<String>) -> Self {
        QuotedString { raw: raw.into() }
    }

    /// Strips the surrounding quotes and resolves backslash escapes.
    pub fn unquoted(&self) -> Result<String, String> {
        let inner = self
            .raw
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .filter(|_| self.raw.len() >= 2)
            .ok_or_else(|| format!("not a quoted string: {}", self.raw))?;

        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '"' {
                return Err(format!("unescaped quote in {}", self.raw));
            }
            if c != '\\' {
                out.push(c);
                continue;
            }

            match chars.next() {
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('/') => out.push('/'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some('b') => out.push('\u{8}'),
                Some('f') => out.push('\u{c}'),
                Some('u') => {
                    let hex: String = chars.by_ref().take(4).collect();
                    let ch = u32::from_str_radix(&hex, 16)
                        .ok()
                        .filter(|_| hex.len() == 4)
                        .and_then(char::from_u32)
                        .ok_or_else(|| format!("invalid unicode escape \\u{hex}"))?;
                    out.push(ch);
                }
                Some(other) => return Err(format!("invalid escape sequence \\{other}")),
                None => return Err("trailing backslash".to_string()),
            }
        }

        Ok(out)
    }
}

impl fmt::Display for QuotedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote_plain() {
        let s = QuotedString::new(r#""hola""#);
        assert_eq!(s.unquoted().unwrap(), "hola");
        assert_eq!(s.to_string(), r#""hola""#);
    }

    #[test]
    fn test_unquote_escapes() {
        let s = QuotedString::new(r#""a\"b\\c\né""#);
        assert_eq!(s.unquoted().unwrap(), "a\"b\\c\né");
    }

    #[test]
    fn test_unquote_rejects_bad_escape() {
        assert!(QuotedString::new(r#""\q""#).unquoted().is_err());
        assert!(QuotedString::new(r#""\u12""#).unquoted().is_err());
        assert!(QuotedString::new(r#"""#).unquoted().is_err());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(ValueNode::Number(-4).to_string(), "-4");
        assert_eq!(ValueNode::Constant("ACTIVE".into()).to_string(), "ACTIVE");
        assert_eq!(
            ValueNode::QuotedString(QuotedString::new(r#""x y""#)).to_string(),
            r#""x y""#
        );
    }
}
