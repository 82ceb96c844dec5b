use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use kos_sdk::{stable_hash, Identifier, IndexSlot, Predicate, PredicateBuilder, StoreConfig};
use serde_json::json;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Hash(args) => cmd_hash(args, format),
        Command::Id(args) => cmd_id(args, format),
        Command::Query(args) => cmd_query(args, format),
        Command::Config(args) => cmd_config(args, format),
    }
}

fn cmd_hash(args: HashArgs, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for value in &args.values {
                println!("{}  {}", stable_hash(value).to_string().yellow(), value);
            }
        }
        OutputFormat::Json => {
            let hashes: Vec<_> = args
                .values
                .iter()
                .map(|value| json!({ "value": value, "hash": stable_hash(value) }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&hashes)?);
        }
    }
    Ok(())
}

fn cmd_id(args: IdArgs, format: OutputFormat) -> anyhow::Result<()> {
    let id = Identifier::derive(&args.type_name, &args.key)?;
    match format {
        OutputFormat::Text => println!("{}", id.to_string().cyan()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&id)?),
    }
    Ok(())
}

fn cmd_query(args: QueryArgs, format: OutputFormat) -> anyhow::Result<()> {
    let predicate = build_predicate(&args)?;
    let fragment = if predicate.has_conditions() {
        Some(predicate.to_query()?)
    } else {
        None
    };
    match format {
        OutputFormat::Text => {
            match &fragment {
                Some(fragment) => println!("{}", fragment.green()),
                None => println!("{}", "(all records of the type)".dimmed()),
            }
            if let Some(first) = predicate.first_result() {
                println!("  first result: {}", first.to_string().yellow());
            }
            if let Some(max) = predicate.max_results() {
                println!("  max results: {}", max.to_string().yellow());
            }
        }
        OutputFormat::Json => {
            let out = json!({
                "condition": fragment,
                "first_result": predicate.first_result(),
                "max_results": predicate.max_results(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn cmd_config(args: ConfigArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    match format {
        OutputFormat::Text => print!("{}", config.to_toml_string()?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}

fn load_config(args: &ConfigArgs) -> anyhow::Result<StoreConfig> {
    match &args.file {
        Some(path) => {
            debug!(path = %path.display(), "loading store config");
            StoreConfig::from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))
        }
        None => Ok(StoreConfig::default()),
    }
}

/// Build a predicate from `[AND|OR] slot=value` terms and pagination flags.
fn build_predicate(args: &QueryArgs) -> anyhow::Result<Predicate> {
    let mut builder = PredicateBuilder::new();
    let mut pending: Option<&str> = None;

    for term in &args.terms {
        match term.to_ascii_uppercase().as_str() {
            "AND" | "OR" => {
                if let Some(previous) = pending {
                    bail!("connective {term} follows {previous} without a condition");
                }
                pending = Some(term.as_str());
                continue;
            }
            _ => {}
        }
        let (slot, value) = term
            .split_once('=')
            .ok_or_else(|| anyhow!("expected slot=value, got {term}"))?;
        let slot = IndexSlot::from_str(slot)?;
        builder = match pending.take() {
            Some(connective) if connective.eq_ignore_ascii_case("OR") => builder.or(slot, value),
            _ => builder.and(slot, value),
        };
    }
    if let Some(connective) = pending {
        bail!("dangling connective {connective}");
    }

    if let Some(first) = args.first {
        builder = builder.first_result(first)?;
    }
    if let Some(max) = args.max {
        builder = builder.max_results(max)?;
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn query(terms: &[&str]) -> QueryArgs {
        QueryArgs {
            terms: terms.iter().map(|t| t.to_string()).collect(),
            first: None,
            max: None,
        }
    }

    #[test]
    fn renders_or_chain() {
        let predicate =
            build_predicate(&query(&["index1=IndexOne", "OR", "index2=IndexTwo"])).unwrap();
        assert_eq!(
            predicate.to_query().unwrap(),
            "ko.index1=177137748 OR ko.index2=177142842"
        );
    }

    #[test]
    fn connective_defaults_to_and() {
        let predicate = build_predicate(&query(&["index1=Chen", "index2=SW-Dev"])).unwrap();
        assert_eq!(
            predicate.to_query().unwrap(),
            "ko.index1=2099182 AND ko.index2=-1836992244"
        );
    }

    #[test]
    fn leading_or_fails_on_render() {
        let predicate = build_predicate(&query(&["or", "index1=Chen"])).unwrap();
        let err = predicate.to_query().unwrap_err();
        assert!(err.to_string().ends_with("The first operand should not be OR."));
    }

    #[test]
    fn pagination_only() {
        let mut args = query(&[]);
        args.first = Some(5);
        let predicate = build_predicate(&args).unwrap();
        assert!(!predicate.has_conditions());
        assert_eq!(predicate.first_result(), Some(5));
    }

    #[test]
    fn empty_query_rejected() {
        let err = build_predicate(&query(&[])).unwrap_err();
        assert!(err.to_string().contains("Predicate is empty"));
    }

    #[test]
    fn negative_bound_rejected() {
        let mut args = query(&["index1=Chen"]);
        args.max = Some(-1);
        let err = build_predicate(&args).unwrap_err();
        assert!(err.to_string().contains("Max result number should not be negative."));
    }

    #[test]
    fn malformed_terms_rejected() {
        assert!(build_predicate(&query(&["index1"])).is_err());
        assert!(build_predicate(&query(&["index7=x"])).is_err());
        assert!(build_predicate(&query(&["index1=x", "AND"])).is_err());
        assert!(build_predicate(&query(&["index1=x", "AND", "OR", "index2=y"])).is_err());
    }

    #[test]
    fn config_defaults_without_file() {
        let config = load_config(&ConfigArgs { file: None }).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_max_results = 3").unwrap();
        let config = load_config(&ConfigArgs {
            file: Some(file.path().to_path_buf()),
        })
        .unwrap();
        assert_eq!(config.default_max_results, Some(3));
    }
}
