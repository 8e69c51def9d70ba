//! # PBQ CLI
//!
//! Tokenize, format, validate and edit boolean search queries, and drive the
//! strategy/filter builder from a session file.

use clap::{Parser, Subcommand};
use pbq_builder::prelude::*;
use pbq_query::logging::{self, LogCrateLogger, LoggingService};
use pbq_query::{
    add_term_with_operator, check_structure, remove_term, serialize, tokenize, validate_query,
    BooleanOperator, Token, TokenKind,
};
use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

/// PubMed-style boolean query toolkit
#[derive(Parser)]
#[command(name = "pbq", version, about = "Boolean search query toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tokens of a query
    Tokenize {
        query: String,
        /// Emit tokens as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-emit a query with normalised spacing
    Format { query: String },

    /// Report validation warnings and structure violations
    Validate { query: String },

    /// Append a term and print the resulting query
    AddTerm {
        query: String,
        value: String,
        /// mesh or text
        #[arg(long, default_value = "text")]
        kind: TokenKind,
        /// AND, OR or NOT
        #[arg(long, default_value = "OR")]
        operator: BooleanOperator,
    },

    /// Remove the token at INDEX and print the resulting query
    RemoveTerm { query: String, index: usize },

    /// Run the strategy and filter builder over a session file
    Build(BuildArgs),
}

#[derive(clap::Args, Debug)]
struct BuildArgs {
    /// Session JSON with strategies, concepts and toolbox
    #[arg(long)]
    session: PathBuf,
    /// Builder TOML configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Previously encoded state, e.g. "strategy=direct&filters=Humans+Only"
    #[arg(long)]
    state: Option<String>,
    /// Switch to this strategy (resets filters)
    #[arg(long)]
    strategy: Option<StrategyKey>,
    #[arg(long = "add-filter")]
    add_filters: Vec<String>,
    #[arg(long = "remove-filter")]
    remove_filters: Vec<String>,
    #[arg(long)]
    clear_filters: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = match &cli.command {
        Commands::Build(BuildArgs {
            config: Some(path), ..
        }) => BuilderConfig::load(path)?,
        _ => BuilderConfig::default(),
    };
    init_logging(&config)?;

    match cli.command {
        Commands::Tokenize { query, json } => {
            let tokens = tokenize(&query);
            if json {
                println!("{}", serde_json::to_string_pretty(&tokens)?);
            } else {
                for (index, token) in tokens.iter().enumerate() {
                    println!("{}", render_token(index, token));
                }
            }
        }
        Commands::Format { query } => println!("{}", serialize(&tokenize(&query))),
        Commands::Validate { query } => {
            let findings = validation_findings(&query);
            if findings.is_empty() {
                println!("ok");
            } else {
                for finding in &findings {
                    println!("{finding}");
                }
                process::exit(1);
            }
        }
        Commands::AddTerm {
            query,
            value,
            kind,
            operator,
        } => {
            let tokens = add_term_with_operator(&tokenize(&query), &value, kind, operator);
            println!("{}", serialize(&tokens));
        }
        Commands::RemoveTerm { query, index } => {
            println!("{}", serialize(&remove_term(&tokenize(&query), index)));
        }
        Commands::Build(args) => {
            let report = build(&args, &config)?;
            print!("{}", report.render());
        }
    }

    Ok(())
}

/// Route coded events into the `log` facade so `RUST_LOG` controls them
fn init_logging(config: &BuilderConfig) -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    logging::config::init_runtime_preferences(config.logging.clone())?;

    let service = LoggingService::new(
        Arc::new(LogCrateLogger::default()),
        logging::config::get_min_log_level(),
    );
    logging::init_global_logging_with_service(Arc::new(service))?;
    log::debug!(target: "pbq", "{}", logging::get_system_diagnostics());
    Ok(())
}

fn render_token(index: usize, token: &Token) -> String {
    format!(
        "{:>3} {:<5} {:<8} {}",
        index,
        token.id.to_string(),
        token.kind.as_str(),
        token.original
    )
}

fn validation_findings(query: &str) -> Vec<String> {
    let report = validate_query(query);
    let mut findings: Vec<String> = report
        .warnings
        .iter()
        .map(|w| format!("warning[{}]: {}", w.error_code(), w))
        .collect();

    findings.extend(
        check_structure(&tokenize(query))
            .iter()
            .map(|v| format!("warning[{}]: {}", v.error_code(), v)),
    );
    findings
}

#[derive(Debug)]
struct BuildReport {
    strategy: StrategyKey,
    query: String,
    filters: Vec<String>,
    token_count: usize,
    warnings: Vec<String>,
    state: String,
}

impl BuildReport {
    fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("strategy: {}\n", self.strategy));
        out.push_str(&format!("query:    {}\n", self.query));
        out.push_str(&format!("tokens:   {}\n", self.token_count));
        if self.filters.is_empty() {
            out.push_str("filters:  (none)\n");
        } else {
            out.push_str(&format!("filters:  {}\n", self.filters.join(", ")));
        }
        for warning in &self.warnings {
            out.push_str(&format!("warning:  {warning}\n"));
        }
        out.push_str(&format!("state:    {}\n", self.state));
        out
    }
}

fn build(args: &BuildArgs, config: &BuilderConfig) -> Result<BuildReport, Box<dyn Error>> {
    let session = SessionData::load(&args.session)?;
    let store = QueryStringStore::new(args.state.clone().unwrap_or_default());
    let mut builder = config.builder(session, store);

    if let Some(key) = args.strategy {
        builder.set_strategy(key);
    }
    if args.clear_filters {
        builder.clear_all_filters();
    }
    for label in &args.remove_filters {
        builder.remove_filter(label);
    }
    for label in &args.add_filters {
        builder.add_filter(label);
    }

    Ok(BuildReport {
        strategy: builder.state().strategy,
        query: builder.query_text().to_string(),
        filters: builder.applied_filters().to_vec(),
        token_count: builder.token_stream().len(),
        warnings: validation_findings(builder.query_text()),
        state: builder.store().query().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SESSION: &str = r#"{
        "strategies": {
            "comprehensive": {"label": "Comprehensive", "query": "(metformin[tiab] OR \"metformin\"[Mesh])"},
            "direct": {"label": "Direct", "query": "metformin[tiab]"}
        },
        "concepts": [],
        "toolbox": [{"label": "French", "query": "AND french[la]", "category": "language"}]
    }"#;

    fn session_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SESSION.as_bytes()).unwrap();
        file
    }

    fn build_args(session: &NamedTempFile) -> BuildArgs {
        BuildArgs {
            session: session.path().to_path_buf(),
            config: None,
            state: None,
            strategy: None,
            add_filters: vec![],
            remove_filters: vec![],
            clear_filters: false,
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_term_options() {
        let cli = Cli::try_parse_from([
            "pbq", "add-term", "a[tiab]", "insulin", "--kind", "mesh", "--operator", "and",
        ])
        .unwrap();
        match cli.command {
            Commands::AddTerm { kind, operator, .. } => {
                assert_eq!(kind, TokenKind::Mesh);
                assert_eq!(operator, BooleanOperator::And);
            }
            _ => panic!("expected add-term"),
        }
    }

    #[test]
    fn test_parse_build_repeated_filters() {
        let cli = Cli::try_parse_from([
            "pbq", "build", "--session", "s.json", "--strategy", "direct",
            "--add-filter", "Humans Only", "--add-filter", "Adults", "--clear-filters",
        ])
        .unwrap();
        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.strategy, Some(StrategyKey::Direct));
                assert_eq!(args.add_filters, vec!["Humans Only", "Adults"]);
                assert!(args.clear_filters);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn test_unknown_strategy_rejected_by_parser() {
        assert!(Cli::try_parse_from(["pbq", "build", "--session", "s.json", "--strategy", "broad"]).is_err());
    }

    #[test]
    fn test_validation_findings() {
        assert!(validation_findings("a[tiab] AND b[tiab]").is_empty());
        let findings = validation_findings("(a[tiab] AND");
        assert!(findings.iter().any(|f| f.starts_with("warning[W030]")));
        assert!(findings.iter().any(|f| f.starts_with("warning[W041]")));
    }

    #[test]
    fn test_render_token() {
        let tokens = tokenize("\"insulin\"[Mesh]");
        assert_eq!(render_token(0, &tokens[0]), "  0 #0    mesh     \"insulin\"[Mesh]");
    }

    #[test]
    fn test_build_applies_state_and_filters() {
        let session = session_file();
        let mut args = build_args(&session);
        args.state = Some("?strategy=direct&filters=French".to_string());
        args.add_filters = vec!["English Only".to_string()];

        let report = build(&args, &BuilderConfig::default()).unwrap();
        assert_eq!(report.strategy, StrategyKey::Direct);
        assert_eq!(report.query, "metformin[tiab] AND french[la] AND english[la]");
        assert_eq!(report.filters, vec!["French", "English Only"]);
        assert_eq!(report.token_count, 5);
        assert!(report.warnings.is_empty());
        assert_eq!(report.state, "filters=French%2CEnglish+Only&strategy=direct");
        assert!(report.render().contains("filters:  French, English Only"));
    }

    #[test]
    fn test_build_strategy_switch_and_removal() {
        let session = session_file();
        let mut args = build_args(&session);
        args.state = Some("filters=Adults".to_string());
        args.remove_filters = vec!["Adults".to_string()];

        let report = build(&args, &BuilderConfig::default()).unwrap();
        assert_eq!(report.strategy, StrategyKey::Comprehensive);
        assert_eq!(report.query, "(metformin[tiab] OR \"metformin\"[Mesh])");
        assert!(report.filters.is_empty());
        assert_eq!(report.state, "strategy=comprehensive");

        args.strategy = Some(StrategyKey::Direct);
        let report = build(&args, &BuilderConfig::default()).unwrap();
        assert_eq!(report.query, "metformin[tiab]");
    }

    #[test]
    fn test_build_missing_session_is_error() {
        let session = session_file();
        let mut args = build_args(&session);
        args.session = session.path().with_extension("gone");
        assert!(build(&args, &BuilderConfig::default()).is_err());
    }
}
