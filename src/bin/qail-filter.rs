//! qail-filter — preview query-string filters
//!
//! Shows which conditions a set of query parameters turns into, given an
//! allow-list file.
//!
//! # Usage
//!
//! ```bash
//! # Explain a set of parameters
//! qail-filter explain status=active 'age=>:30' --config filters.toml
//!
//! # Qualify fields with a table, emit JSON
//! qail-filter explain 'q=~:ann' --table users --format json
//!
//! # Show the operator prefixes
//! qail-filter operators
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use qail_filter::config;
use qail_filter::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qail-filter")]
#[command(version)]
#[command(about = "🪝 Query-string filters, previewed as WHERE clauses", long_about = None)]
#[command(after_help = "EXAMPLES:
    qail-filter explain status=active 'age=>:30'
    qail-filter explain 'q=~:ann' 'id=in:1,2,3' --table users
    qail-filter operators")]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn key=value parameters into conditions
    Explain {
        /// Query parameters as key=value
        params: Vec<String>,

        /// Allow-list file (TOML)
        #[arg(short, long, env = config::CONFIG_ENV)]
        config: Option<PathBuf>,

        /// Table used to qualify prefixed fields
        #[arg(short, long)]
        table: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Show the operator prefix reference
    Operators,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Explain {
            params,
            config,
            table,
            format,
        } => explain(params, config.as_deref(), table.as_deref(), format),
        Commands::Operators => {
            show_operators();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn split_param(raw: &str) -> FilterResult<(&str, &str)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => Err(FilterError::InvalidParam(raw.to_string())),
    }
}

fn explain(
    params: &[String],
    config_path: Option<&std::path::Path>,
    table: Option<&str>,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let path = config::resolve_path(config_path)
        .context("no config file given and no config directory on this platform")?;
    let allowed = config::load(&path)
        .with_context(|| format!("failed to load filters from {}", path.display()))?;

    let pairs = params
        .iter()
        .map(|p| split_param(p))
        .collect::<FilterResult<Vec<_>>>()?;

    let filters = parse_filters(pairs, &allowed);
    let mut query = match table {
        Some(t) => WhereBuilder::for_table(t),
        None => WhereBuilder::new(),
    };
    apply_filters(&mut query, &filters);

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "filters": filters,
                "clauses": query.clauses(),
                "sql": query.to_sql(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Table => print_explanation(&filters, &query, params.len()),
    }

    Ok(())
}

fn print_explanation(filters: &[FilterDescriptor], query: &WhereBuilder, given: usize) {
    println!("{}", "🪝 Filter Explanation".cyan().bold());
    println!();

    if filters.is_empty() {
        println!("{}", "(no allowed filters in input)".dimmed());
        return;
    }

    println!("{}", "Filters:".green().bold());
    for filter in filters {
        println!(
            "  {} {} {} {}",
            filter.name.white().bold(),
            "→".dimmed(),
            filter.fields.as_slice().join(" | ").cyan(),
            format!("[{}]", filter.kind).dimmed()
        );
        println!("    {} {}", "raw:".dimmed(), filter.value.yellow());
    }

    let dropped = given - filters.len();
    if dropped > 0 {
        println!("  {}", format!("{} parameter(s) not allowed", dropped).dimmed());
    }

    println!();
    println!("{}", "Clauses:".green().bold());
    for clause in query.clauses() {
        let kind = match clause {
            Clause::Where(_) => "where",
            Clause::OrWhere { .. } => "or_where",
        };
        println!("  {:9} {}", kind.cyan(), query.clause_sql(clause).white());
    }

    println!();
    println!("{}", "Generated SQL:".green().bold());
    println!("  {}", query.to_sql().white());
}

fn show_operators() {
    println!("{}", "🪝 Operator Reference".cyan().bold());
    println!();

    println!(
        "{:8} {:10} {}",
        "Prefix".white().bold(),
        "Operator".white().bold(),
        "Value".white().bold()
    );
    println!("{}", "─".repeat(48).dimmed());

    for op in Operator::ALL {
        let prefix = op.prefix().map(|p| format!("{}:", p)).unwrap_or_default();
        let value = if op.takes_list() {
            "comma-separated list"
        } else if op.is_pattern() {
            "%value%"
        } else {
            "scalar"
        };
        println!(
            "{:8} {:10} {}",
            prefix.cyan().bold(),
            op.symbol().yellow(),
            value.dimmed()
        );
    }
}
