mod logging;
mod telegram;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use services::{Conversation, SessionController};
use storage::lessons::JsonTierFile;
use storage::repository::Storage;
use tutor_core::Catalog;

const DEFAULT_TIERS: [&str; 2] = ["beginner", "intermediate"];

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidTier { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidTier { raw } => {
                write!(f, "invalid --tier value: {raw} (expected <name>=<path>)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug)]
struct MissingToken;

impl fmt::Display for MissingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BOT_TOKEN is not set")
    }
}

impl std::error::Error for MissingToken {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    /// `None` keeps progress in memory.
    db_url: Option<String>,
    lessons_dir: PathBuf,
    log_dir: PathBuf,
    /// Explicit `--tier` entries; empty means the default tier files.
    tiers: Vec<(String, PathBuf)>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  tutor-bot [--db <sqlite_url>] [--lessons <dir>] [--log-dir <dir>] [--tier <name>=<path>]..."
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  progress kept in memory, --lessons data, --log-dir logs");
    eprintln!("  tiers: beginner=<lessons>/beginner.json, intermediate=<lessons>/intermediate.json");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  BOT_TOKEN (required), TUTOR_DB_URL, TUTOR_LESSONS_DIR, TUTOR_LOG_DIR, RUST_LOG");
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env("TUTOR_DB_URL")
            .filter(|value| !value.trim().is_empty())
            .map(normalize_sqlite_url);
        let mut lessons_dir = env("TUTOR_LESSONS_DIR").map_or_else(|| "data".into(), PathBuf::from);
        let mut log_dir = env("TUTOR_LOG_DIR").map_or_else(|| "logs".into(), PathBuf::from);
        let mut tiers = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = Some(normalize_sqlite_url(value));
                }
                "--lessons" => lessons_dir = require_value(args, "--lessons")?.into(),
                "--log-dir" => log_dir = require_value(args, "--log-dir")?.into(),
                "--tier" => {
                    let value = require_value(args, "--tier")?;
                    tiers.push(parse_tier(&value)?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            lessons_dir,
            log_dir,
            tiers,
        })
    }

    fn tier_files(&self) -> Vec<JsonTierFile> {
        if self.tiers.is_empty() {
            return DEFAULT_TIERS
                .iter()
                .map(|name| JsonTierFile::new(*name, self.lessons_dir.join(format!("{name}.json"))))
                .collect();
        }
        self.tiers
            .iter()
            .map(|(name, path)| JsonTierFile::new(name.clone(), path.clone()))
            .collect()
    }
}

fn parse_tier(raw: &str) -> Result<(String, PathBuf), ArgsError> {
    match raw.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
            Ok((name.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(ArgsError::InvalidTier {
            raw: raw.to_string(),
        }),
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") || raw.starts_with("sqlite:file:") {
        return raw;
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// SQLite refuses to open a missing file without `mode=rwc`; create it up front.
fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = db_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let _log_guard = logging::init(&args.log_dir)?;

    let token = std::env::var("BOT_TOKEN")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(MissingToken)?;

    let storage = match &args.db_url {
        Some(url) => {
            prepare_sqlite_file(url)?;
            tracing::info!(db = %url, "using sqlite progress store");
            Storage::sqlite(url).await?
        }
        None => {
            tracing::warn!("TUTOR_DB_URL not set, progress is kept in memory only");
            Storage::in_memory()
        }
    };

    let catalog = Catalog::load(&args.tier_files());
    tracing::info!(
        tiers = catalog.tiers().len(),
        lessons = catalog.total_lessons(),
        "catalog ready"
    );

    let sessions = Arc::new(SessionController::new(catalog, storage.progress));
    let conversation = Conversation::new(sessions);

    telegram::run(teloxide::Bot::new(token), conversation).await;
    tracing::info!("shut down");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!(error = %err, "bootstrap failed");
        eprintln!("{err}");
        std::process::exit(2);
    }
}
