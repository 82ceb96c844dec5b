use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kos",
    about = "Keyed object store tools: stable hashes, identifiers and index queries",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the stable hash of each value
    Hash(HashArgs),
    /// Print the identifier of a key of a data type
    Id(IdArgs),
    /// Render an index predicate into its condition fragment
    Query(QueryArgs),
    /// Show the effective store configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct HashArgs {
    #[arg(required = true)]
    pub values: Vec<String>,
}

#[derive(Args)]
pub struct IdArgs {
    pub type_name: String,
    pub key: String,
}

/// Terms are `slot=value`, optionally preceded by `AND` or `OR`.
/// A term without a connective is joined with `AND`.
#[derive(Args)]
pub struct QueryArgs {
    pub terms: Vec<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub first: Option<i64>,
    #[arg(long, allow_hyphen_values = true)]
    pub max: Option<i64>,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hash() {
        let cli = Cli::try_parse_from(["kos", "hash", "IndexOne", "IndexTwo"]).unwrap();
        if let Command::Hash(args) = cli.command {
            assert_eq!(args.values, vec!["IndexOne", "IndexTwo"]);
        } else { panic!("wrong command"); }
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn parse_hash_requires_a_value() {
        assert!(Cli::try_parse_from(["kos", "hash"]).is_err());
    }

    #[test]
    fn parse_id() {
        let cli = Cli::try_parse_from(["kos", "id", "app.Employee", "uniqueKey"]).unwrap();
        if let Command::Id(args) = cli.command {
            assert_eq!(args.type_name, "app.Employee");
            assert_eq!(args.key, "uniqueKey");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_query() {
        let cli = Cli::try_parse_from([
            "kos", "query", "index1=IndexOne", "OR", "index2=IndexTwo", "--max", "10",
        ])
        .unwrap();
        if let Command::Query(args) = cli.command {
            assert_eq!(args.terms, vec!["index1=IndexOne", "OR", "index2=IndexTwo"]);
            assert_eq!(args.max, Some(10));
            assert_eq!(args.first, None);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_query_negative_bound() {
        let cli = Cli::try_parse_from(["kos", "query", "--first", "-1"]).unwrap();
        if let Command::Query(args) = cli.command {
            assert_eq!(args.first, Some(-1));
            assert!(args.terms.is_empty());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_config_with_file_and_json() {
        let cli =
            Cli::try_parse_from(["kos", "config", "-f", "kos.toml", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        if let Command::Config(args) = cli.command {
            assert_eq!(args.file, Some(PathBuf::from("kos.toml")));
        } else { panic!("wrong command"); }
    }
}
