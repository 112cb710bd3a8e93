use std::fmt;

use storage::repository::Storage;
use topik_core::defaults::default_bank;
use topik_core::transfer::parse_import;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    import: Option<String>,
    reset_wrong_answers: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
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
            std::env::var("TOPIK_DB_URL").unwrap_or_else(|_| "sqlite://topik.sqlite3".into());
        let mut import = None;
        let mut reset_wrong_answers = false;

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
                "--import" => {
                    import = Some(require_value(&mut args, "--import")?);
                }
                "--reset-wrong-answers" => reset_wrong_answers = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            import,
            reset_wrong_answers,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite://topik.sqlite3)");
    eprintln!("  --import <path>           Merge an exported/import JSON file after seeding");
    eprintln!("  --reset-wrong-answers     Store an empty wrong-answer list");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TOPIK_DB_URL              Same as --db");
    eprintln!("  RUST_LOG                  Log filter (default: info)");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let mut bank = default_bank()?;
    let bundled = bank.total_questions();

    let mut imported = 0;
    if let Some(path) = &args.import {
        let raw = std::fs::read_to_string(path)?;
        let report = bank.merge(parse_import(&raw)?);
        for id in &report.drifted {
            tracing::warn!(%id, "imported question is filed under a different path");
        }
        imported = report.added;
        tracing::info!(path = %path, added = imported, "merged import file");
    }

    storage.save_bank(&bank).await?;
    if args.reset_wrong_answers {
        storage
            .save_wrong_answers(&topik_core::model::WrongAnswerSet::new())
            .await?;
    }

    println!(
        "Seeded {} bundled and {} imported questions into {}",
        bundled, imported, args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
