use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Print the token stream of a query
    Tokens {
        /// Filter query, e.g. `id=3 -status=DELETED`
        query: String,
    },
    /// Print the parsed query as JSON
    Ast {
        query: String,

        #[arg(
            long,
            help = "If specified, writes the JSON output to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// Bind a query against a schema and print its SQL condition
    Sql {
        #[arg(long, help = "Schema file path")]
        schema: String,

        query: String,

        #[arg(
            long,
            help = "If specified, writes the JSON output to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// Print the records of a JSON file that match a query
    Match {
        #[arg(long, help = "Schema file path")]
        schema: String,

        #[arg(long, help = "JSON file holding an array of records")]
        records: String,

        query: String,

        #[arg(
            long,
            help = "If specified, writes the JSON output to this file instead of stdout"
        )]
        output: Option<String>,
    },
}
