use std::fmt;

use storage::repository::Storage;
use tutor_core::model::UserId;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    user_id: UserId,
    cursor: u32,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingUser,
    UnknownArg(String),
    InvalidUserId { raw: String },
    InvalidCursor { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingUser => write!(f, "--user is required"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidUserId { raw } => write!(f, "invalid --user value: {raw}"),
            ArgsError::InvalidCursor { raw } => write!(f, "invalid --cursor value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("TUTOR_DB_URL").unwrap_or_else(|_| "sqlite:tutor.sqlite3?mode=rwc".into());
        let mut user_id = None;
        let mut cursor = 0;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--user" => {
                    let value = require_value(&mut args, "--user")?;
                    let parsed: UserId = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidUserId { raw: value.clone() })?;
                    user_id = Some(parsed);
                }
                "--cursor" => {
                    let value = require_value(&mut args, "--cursor")?;
                    cursor = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidCursor { raw: value.clone() })?;
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
            user_id: user_id.ok_or(ArgsError::MissingUser)?,
            cursor,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- --user <id> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:tutor.sqlite3?mode=rwc)");
    eprintln!("  --user <id>               User whose progress is written (required)");
    eprintln!("  --cursor <n>              Global lesson cursor to store (default: 0)");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TUTOR_DB_URL");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let previous = storage.progress.get_progress(args.user_id).await?;
    storage
        .progress
        .set_progress(args.user_id, args.cursor)
        .await?;

    println!(
        "Set progress of user {} from {} to {} in {}",
        args.user_id, previous, args.cursor, args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
