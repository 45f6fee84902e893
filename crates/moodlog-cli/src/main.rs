use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use moodlog_core::*;

const DEFAULT_USER: &str = "local";

#[derive(Parser)]
#[command(name = "moodlog", version, about = "Mood journal analysis")]
struct Cli {
    #[arg(
        long,
        default_value = "~/.moodlog",
        help = "Config root directory (contains config.yaml, journal.json and logs/)"
    )]
    config_root: PathBuf,

    #[arg(long, help = "Journal file (defaults to <config-root>/journal.json)")]
    journal: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Analyze a journal entry and record it")]
    Analyze {
        #[arg(help = "Entry text (reads --file or stdin when omitted)")]
        text: Option<String>,
        #[arg(long, help = "Read the entry from a file")]
        file: Option<PathBuf>,
        #[arg(long, default_value = DEFAULT_USER, help = "User the entry belongs to")]
        user: String,
        #[arg(long, help = "Print the analysis without saving it")]
        no_save: bool,
    },
    #[command(about = "Personalized insights over recent entries")]
    Insights {
        #[arg(long, default_value = DEFAULT_USER, help = "User ID")]
        user: String,
    },
    #[command(about = "Mood statistics and recent intensity series")]
    Stats {
        #[arg(long, default_value = DEFAULT_USER, help = "User ID")]
        user: String,
    },
    #[command(about = "Validate config file")]
    Validate,
}

fn expand_home(path: PathBuf) -> PathBuf {
    if !path.starts_with("~") {
        return path;
    }
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(path.strip_prefix("~").unwrap_or(&path)),
        None => path,
    }
}

fn init_logging(config_root: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = config_root.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log dir: {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "moodlog.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    Ok(guard)
}

fn read_entry_text(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    match (text, file) {
        (Some(_), Some(_)) => Err(anyhow!("pass entry text or --file, not both")),
        (Some(text), None) => Ok(text),
        (None, Some(file)) => std::fs::read_to_string(&file)
            .with_context(|| format!("failed to read entry file: {}", file.display())),
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read entry from stdin")?;
            Ok(buf)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_root = expand_home(cli.config_root);
    let journal_path = cli
        .journal
        .map(expand_home)
        .unwrap_or_else(|| config_root.join("journal.json"));

    let _guard = init_logging(&config_root)?;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config_path = config_root.join("config.yaml");
    let store = JsonFileHistoryStore::new(journal_path);

    match command {
        Commands::Validate => {
            let config = load_config(&config_path)?;
            let analyzer = MoodAnalyzer::from_config(&config.analysis);
            println!(
                "Config valid. Remote classifier: {}.",
                if analyzer.is_remote_enabled() {
                    "enabled"
                } else {
                    "disabled (local analysis only)"
                }
            );
        }
        Commands::Analyze {
            text,
            file,
            user,
            no_save,
        } => {
            let text = read_entry_text(text, file)?;
            let config = load_config(&config_path)?;
            let analyzer = MoodAnalyzer::from_config(&config.analysis);

            let entry = analyzer.analyze_entry(&user, &text).await;
            println!("{}", serde_json::to_string_pretty(&entry.analysis)?);

            if !no_save {
                let entry_id = entry.entry_id;
                store.append(entry).await?;
                tracing::info!(%entry_id, journal = %store.path().display(), "entry recorded");
            }
        }
        Commands::Insights { user } => {
            let history = recent_analyses(&store, &user).await?;
            println!("{}", summarize(&history));
        }
        Commands::Stats { user } => {
            let entries = store.recent(&user, usize::MAX).await?;
            let Some(stats) = MoodStats::from_entries(&entries) else {
                println!("No entries yet! Start journaling to see your mood trends.");
                return Ok(());
            };

            println!("{} total entries", stats.total_entries);
            println!(
                "Dominant mood: {} {}",
                stats.dominant_mood.emoji(),
                stats.dominant_mood
            );
            println!("Average intensity: {:.1}/10", stats.average_intensity);
            for (mood, count) in &stats.mood_counts {
                println!("  {} {:<9} {}", mood.emoji(), mood.as_str(), count);
            }

            println!();
            println!("Recent intensity:");
            for point in intensity_series(&entries, CHART_POINTS) {
                println!(
                    "  {}  {:>2} {}",
                    point.date.format("%m/%d"),
                    point.intensity,
                    "█".repeat(usize::from(point.intensity))
                );
            }
        }
    }

    Ok(())
}
