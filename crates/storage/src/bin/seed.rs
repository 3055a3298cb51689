use std::fmt;
use std::path::PathBuf;

use sananki_core::model::{Card, CardId, CardType};
use storage::repository::Storage;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    file: Option<PathBuf>,
    cards: u32,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidCards { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidCards { raw } => write!(f, "invalid --cards value: {raw}"),
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
            std::env::var("SANANKI_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut file = std::env::var("SANANKI_CARD_FILE").ok().map(PathBuf::from);
        let mut cards = std::env::var("SANANKI_CARDS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(35);

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
                "--file" => {
                    let value = require_value(&mut args, "--file")?;
                    file = Some(PathBuf::from(value));
                }
                "--cards" => {
                    let value = require_value(&mut args, "--cards")?;
                    cards = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidCards { raw: value })?;
                }
                "-h" | "--help" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => return Err(ArgsError::UnknownArg(other.to_owned())),
            }
        }

        Ok(Self { db_url, file, cards })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>   SQLite URL (default: sqlite:dev.sqlite3)");
    eprintln!("  --file <path>       JSON card catalog to load");
    eprintln!("  --cards <n>         Sample cards to generate when no file is given (default: 35)");
    eprintln!("  -h, --help          Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  SANANKI_DB_URL, SANANKI_CARD_FILE, SANANKI_CARDS");
}

fn sample_cards(count: u32) -> Vec<Card> {
    let samples = [
        ("산림보호", "다음 중 소나무의 학명은?", "2"),
        ("조림학", "묘목의 식재 밀도가 가장 높은 수종은?", "1"),
        ("임업경영", "법정림의 요건이 아닌 것은?", "4"),
        ("사방공학", "비탈면 안정공법으로 옳지 않은 것은?", "3"),
        ("산림측량", "폐합 트래버스의 내각 합 공식은?", "1"),
    ];
    (0..count)
        .map(|i| {
            let (category, question, answer) = samples[(i as usize) % samples.len()];
            Card {
                id: CardId::new(format!("sample-{:03}", i + 1)),
                category: category.to_owned(),
                question: question.to_owned(),
                answer: answer.to_owned(),
                choices: vec!["1".into(), "2".into(), "3".into(), "4".into()],
                explanation: None,
                card_type: CardType::MultipleChoice,
                source: Some("sample".into()),
            }
        })
        .collect()
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let cards = match &args.file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            serde_json::from_str::<Vec<Card>>(&raw)?
        }
        None => sample_cards(args.cards),
    };

    let storage = Storage::sqlite(&args.db_url).await?;
    storage.cards.insert_cards(&cards).await?;

    println!("Seeded {} cards into {}", cards.len(), args.db_url);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
