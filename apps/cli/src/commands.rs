use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the token stream of a filter, one token per line
    Tokens {
        /// Filter expression
        filter: String,
    },

    /// Parse a filter and print its canonical rendering
    Parse {
        /// Filter expression
        filter: String,

        /// Print the syntax tree instead of the rendering
        #[arg(long)]
        debug: bool,
    },

    /// Extract the parameter constraints of a filter as JSON
    Extract {
        /// Filter expression
        filter: String,

        /// Leave out the operator of `eq` comparisons
        #[arg(long)]
        omit_eq: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Check whether a `key=value&...` query names an identifying field
    Identifying {
        /// Serialized search criteria
        query: String,
    },
}
