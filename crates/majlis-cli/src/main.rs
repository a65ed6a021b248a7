//! Majlis CLI
//!
//! Command-line interface for the Majlis LINE game bot

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use majlis_config::Config;
use majlis_content::{ContentCategory, ContentStore, ResourceStatus};
use majlis_core::{Dispatcher, MajlisApp};
use majlis_ipc::OutboundReply;
use majlis_line::LineClient;
use majlis_scores::{MemoryScoreTable, ScoreTable};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

const REDACTED: &str = "***REDACTED***";

#[derive(Parser)]
#[command(name = "majlis")]
#[command(about = "LINE group game bot: questions, challenges, riddles and a leaderboard", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (overrides [core].log_level)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook server in the foreground
    Start {
        /// Listen port (overrides [server].port and PORT)
        #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
        port: Option<u16>,
    },

    /// Content resource tooling
    Content {
        #[command(subcommand)]
        action: ContentCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Log management
    Logs {
        #[command(subcommand)]
        action: LogCommands,
    },

    /// Smoke tests
    Test {
        #[command(subcommand)]
        action: TestCommands,
    },

    /// Print the version
    Version,
}

#[derive(Subcommand)]
enum ContentCommands {
    /// Report presence and validity of each resource file
    Check {
        /// Content directory (defaults to [core].content_dir, then <data_dir>/content)
        #[arg(short, long)]
        dir: Option<String>,
    },
    /// Write sample resource files from the built-in content
    Samples {
        #[arg(short, long)]
        dir: Option<String>,
        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
    /// Print the resolved list for one category (stem or Arabic keyword)
    Show { category: String },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write the example configuration
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Show the effective configuration with secrets redacted
    Show,
    /// Validate the configuration
    Validate,
    /// Print the configuration file path
    Path,
}

#[derive(Subcommand)]
enum LogCommands {
    /// List log files
    List,
    /// Remove old log files
    Clean {
        /// Remove files older than this many days
        #[arg(short, long, default_value_t = logging::LOG_RETENTION_DAYS)]
        days: u64,
    },
    /// Print the end of today's log
    Tail {
        #[arg(short = 'n', long, default_value_t = 50)]
        lines: usize,
    },
}

#[derive(Subcommand)]
enum TestCommands {
    /// Check the channel access token against the LINE bot info endpoint
    Line,
    /// Run one dispatch against a local content store and score table
    Dispatch {
        text: String,
        /// User id to score against
        #[arg(short, long, default_value = "cli-user")]
        user: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start { port } => {
            let mut config = load_config_unchecked(cli.config.as_deref())?;
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let log_level = cli
                .log_level
                .clone()
                .unwrap_or_else(|| config.log_level().to_string());
            let log_dir = config.data_dir().join("logs");
            let _logging_guard = logging::init_logging(&log_dir, &log_level)?;

            let app = MajlisApp::new(config)?;
            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            tokio::spawn(async move {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl-C: {}", e);
                    return;
                }
                info!("Shutdown requested");
                let _ = shutdown_tx.send(true);
            });

            app.run(shutdown_rx).await?;
        }

        Commands::Content { action } => {
            let config = load_config_unchecked(cli.config.as_deref())?;
            logging::init_console_logging(cli.log_level.as_deref().unwrap_or("warn"));
            match action {
                ContentCommands::Check { dir } => {
                    let dir = resolve_content_dir(&config, dir.as_deref());
                    let usable = print_content_check(&dir);
                    if usable < ContentCategory::ALL.len() {
                        println!(
                            "\nCategories without a usable file fall back to built-in content."
                        );
                    }
                }
                ContentCommands::Samples { dir, force } => {
                    let dir = resolve_content_dir(&config, dir.as_deref());
                    let outcomes = majlis_content::write_samples(&dir, force)?;
                    for outcome in &outcomes {
                        let marker = if outcome.written { "wrote  " } else { "skipped" };
                        println!("  {} {}", marker, outcome.path.display());
                    }
                    if outcomes.iter().any(|outcome| !outcome.written) {
                        println!("\nExisting files were kept. Use --force to overwrite.");
                    }
                }
                ContentCommands::Show { category } => {
                    let category: ContentCategory = category.parse()?;
                    let store = ContentStore::load(config.content_dir().as_deref());
                    let items = store.list_for(category);
                    println!("{} ({}, {} entries)\n", category, category.keyword(), items.len());
                    for (idx, item) in items.iter().enumerate() {
                        println!("{:>3}. {}", idx + 1, item.replace('\n', "\n     "));
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigCommands::Init { force } => {
                let path = create_default_config(cli.config.as_deref(), force)?;
                println!("Configuration created at: {}", path.display());
                println!("\nEdit the file to add your LINE channel token and secret, or set");
                println!("  {} and {}", majlis_config::ENV_ACCESS_TOKEN, majlis_config::ENV_CHANNEL_SECRET);
            }
            ConfigCommands::Show => match load_config_unchecked(cli.config.as_deref()) {
                Ok(config) => {
                    println!("Current configuration:");
                    println!("{}", serde_json::to_string_pretty(&redacted_config(&config)?)?);
                }
                Err(e) => eprintln!("Error loading config: {}", e),
            },
            ConfigCommands::Validate => match load_config(cli.config.as_deref()) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    eprintln!("Configuration is invalid: {}", e);
                    std::process::exit(1);
                }
            },
            ConfigCommands::Path => println!("{}", config_path(cli.config.as_deref())?.display()),
        },

        Commands::Logs { action } => {
            let config = load_config_unchecked(cli.config.as_deref())?;
            let manager = logging::LogManager::new(config.data_dir().join("logs"));
            match action {
                LogCommands::List => {
                    let files = manager.log_files()?;
                    println!(
                        "Log files ({} total):\n",
                        logging::LogManager::format_size(manager.total_size()?)
                    );
                    for file in files {
                        let metadata = fs::metadata(&file)?;
                        let modified: chrono::DateTime<chrono::Local> = metadata.modified()?.into();
                        let name = file
                            .file_name()
                            .map(|name| name.to_string_lossy().into_owned())
                            .unwrap_or_default();
                        println!(
                            "  {} ({}, modified {})",
                            name,
                            logging::LogManager::format_size(metadata.len()),
                            modified.format("%Y-%m-%d %H:%M:%S")
                        );
                    }
                }
                LogCommands::Clean { days } => {
                    let removed = manager.cleanup_older_than(days)?;
                    println!("Cleaned {} old log file(s)", removed);
                }
                LogCommands::Tail { lines } => match manager.tail(lines)? {
                    Some(lines) => {
                        for line in lines {
                            println!("{}", line);
                        }
                    }
                    None => println!(
                        "No log file found at {}",
                        manager.current_log_path().display()
                    ),
                },
            }
        }

        Commands::Test { action } => match action {
            TestCommands::Line => {
                let config = load_config(cli.config.as_deref())?;
                test_line_channel(&config).await?;
            }
            TestCommands::Dispatch { text, user } => {
                let config = load_config_unchecked(cli.config.as_deref())?;
                logging::init_console_logging(cli.log_level.as_deref().unwrap_or("debug"));
                let store = ContentStore::load(config.content_dir().as_deref());
                let dispatcher = Dispatcher::new(Arc::new(store), Arc::new(MemoryScoreTable::new()));
                match dispatcher.dispatch(&text, &user)? {
                    Some(reply) => print_reply(&reply),
                    None => println!("(no reply: not a command)"),
                }
                println!("\nPoints for {}: {}", user, dispatcher.scores().get(&user)?);
            }
        },

        Commands::Version => {
            println!("majlis {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn config_path(config_path: Option<&str>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(PathBuf::from(path)),
        None => Config::default_path().context("cannot determine the config directory"),
    }
}

/// File (when present) plus environment overrides, validated.
fn load_config(path: Option<&str>) -> Result<Config> {
    let path = config_path(path)?;
    Config::load(&path).with_context(|| format!("failed to load {}", path.display()))
}

/// Same as `load_config` without validation, for commands that never talk
/// to the platform.
fn load_config_unchecked(path: Option<&str>) -> Result<Config> {
    let path = config_path(path)?;
    let mut config = if path.exists() {
        Config::from_file(&path).with_context(|| format!("failed to parse {}", path.display()))?
    } else {
        Config::default()
    };
    config.apply_env_overrides()?;
    Ok(config)
}

fn resolve_content_dir(config: &Config, dir: Option<&str>) -> PathBuf {
    match dir {
        Some(dir) => PathBuf::from(dir),
        None => config
            .content_dir()
            .unwrap_or_else(|| config.data_dir().join("content")),
    }
}

fn create_default_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let path = config_path(path)?;
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = include_str!("../../../config/config.example.toml");
    fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

fn redacted_config(config: &Config) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(config)?;
    if let Some(line) = value.get_mut("line") {
        for key in ["channel_access_token", "channel_secret"] {
            if let Some(secret) = line.get_mut(key) {
                if secret.as_str().is_some_and(|s| !s.is_empty()) {
                    *secret = json!(REDACTED);
                }
            }
        }
    }
    Ok(value)
}

/// Returns the number of categories with a usable resource file.
fn print_content_check(dir: &Path) -> usize {
    println!("Content directory: {}\n", dir.display());
    let mut usable = 0;
    for report in majlis_content::audit(dir) {
        let label = format!("{} ({})", report.category, report.category.keyword());
        match &report.status {
            ResourceStatus::Present { path, entries } => {
                usable += 1;
                println!("  ✓ {:<24} {} entries in {}", label, entries, path.display());
            }
            ResourceStatus::Empty { path } => {
                println!("  ✗ {:<24} empty: {}", label, path.display());
            }
            ResourceStatus::Malformed { path, reason } => {
                println!("  ✗ {:<24} malformed: {} ({})", label, path.display(), reason);
            }
            ResourceStatus::Missing => {
                println!("  - {:<24} missing", label);
            }
        }
    }
    println!(
        "\nSummary: {}/{} categories have a usable file",
        usable,
        ContentCategory::ALL.len()
    );
    usable
}

fn print_reply(reply: &OutboundReply) {
    match reply {
        OutboundReply::Text { text } => println!("{}", text),
        OutboundReply::Menu { alt_text, pages } => {
            println!("[menu] {}", alt_text);
            for page in pages {
                println!("\n{}", page.title);
                for button in &page.buttons {
                    println!("  [{}] -> {}", button.label, button.text);
                }
            }
        }
    }
}

async fn test_line_channel(config: &Config) -> Result<()> {
    println!("Testing LINE channel at {}...", config.line.api_base_url);
    let client = LineClient::new(&config.line)?;
    match client.bot_info().await {
        Ok(info) => {
            println!(
                "  ✓ SUCCESS: {} ({})",
                info.display_name.as_deref().unwrap_or("unknown"),
                info.basic_id.as_deref().unwrap_or("no basic id")
            );
            Ok(())
        }
        Err(e) => {
            println!("  ✗ FAILED: {}", e);
            anyhow::bail!("LINE channel check failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_start_with_port() {
        let cli = Cli::try_parse_from(["majlis", "start", "--port", "8080"]).unwrap();
        assert!(matches!(cli.command, Commands::Start { port: Some(8080) }));
    }

    #[test]
    fn start_rejects_port_zero() {
        assert!(Cli::try_parse_from(["majlis", "start", "--port", "0"]).is_err());
    }

    #[test]
    fn parses_global_flags_and_nested_commands() {
        let cli = Cli::try_parse_from([
            "majlis",
            "--config",
            "/tmp/majlis.toml",
            "content",
            "samples",
            "--force",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some("/tmp/majlis.toml"));
        assert!(matches!(
            cli.command,
            Commands::Content {
                action: ContentCommands::Samples {
                    dir: None,
                    force: true
                }
            }
        ));

        let cli = Cli::try_parse_from(["majlis", "test", "dispatch", "سؤال", "--user", "U9"]).unwrap();
        match cli.command {
            Commands::Test {
                action: TestCommands::Dispatch { text, user },
            } => {
                assert_eq!(text, "سؤال");
                assert_eq!(user, "U9");
            }
            _ => panic!("expected test dispatch"),
        }
    }

    #[test]
    fn logs_clean_defaults_to_retention() {
        let cli = Cli::try_parse_from(["majlis", "logs", "clean"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Logs {
                action: LogCommands::Clean { days }
            } if days == logging::LOG_RETENTION_DAYS
        ));
    }

    #[test]
    fn redaction_hides_line_secrets() {
        let mut config = Config::default();
        config.line.channel_access_token = "very-secret-token".to_string();
        config.line.channel_secret = "very-secret".to_string();

        let value = redacted_config(&config).unwrap();
        assert_eq!(value["line"]["channel_access_token"], REDACTED);
        assert_eq!(value["line"]["channel_secret"], REDACTED);
        assert_eq!(value["server"]["port"], 5000);
        assert!(!value.to_string().contains("very-secret"));
    }

    #[test]
    fn redaction_leaves_unset_secrets_visible_as_empty() {
        let value = redacted_config(&Config::default()).unwrap();
        assert_eq!(value["line"]["channel_secret"], "");
    }

    #[test]
    fn example_config_parses() {
        let config: Config =
            toml::from_str(include_str!("../../../config/config.example.toml")).unwrap();
        assert_eq!(config.server.webhook_path, "/callback");
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn config_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let path_str = path.to_str().unwrap();

        create_default_config(Some(path_str), false).unwrap();
        assert!(path.exists());
        assert!(create_default_config(Some(path_str), false).is_err());
        assert!(create_default_config(Some(path_str), true).is_ok());
    }

    #[test]
    fn explicit_content_dir_wins() {
        let config = Config::default();
        assert_eq!(
            resolve_content_dir(&config, Some("/srv/content")),
            PathBuf::from("/srv/content")
        );
        assert!(resolve_content_dir(&config, None).ends_with("content"));
    }
}
