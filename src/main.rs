use anyhow::Result;
use std::env;
use std::path::Path;

use games_listing::{
    generate_reports, logging, Config, DynamoDbSource, JsonFileSource, RecordSource,
};

const USAGE: &str = "Usage:
  games-listing                     Scan the DynamoDB table and write all reports
  games-listing from-file <FILE>    Same, reading a JSON scan dump instead
  games-listing help                Show this message";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::init_logging();
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        None | Some("scan") => run_scan().await,
        Some("from-file") => match args.get(2) {
            Some(path) => run_from_file(Path::new(path)).await,
            None => {
                eprintln!("❌ Missing scan dump path\n\n{}", USAGE);
                std::process::exit(1);
            }
        },
        Some("help") | Some("--help") | Some("-h") => {
            println!("games-listing {}\n\n{}", games_listing::VERSION, USAGE);
            Ok(())
        }
        Some(other) => {
            eprintln!("❌ Unknown command: {}\n\n{}", other, USAGE);
            std::process::exit(1);
        }
    }
}

async fn run_scan() -> Result<()> {
    let config = Config::from_env()?;

    println!("🔌 Connecting to DynamoDB ({})...", config.aws.region);
    let source = DynamoDbSource::connect(&config.aws, &config.table_name).await?;

    run_report(&source, &config).await
}

async fn run_from_file(path: &Path) -> Result<()> {
    let config = Config::from_env()?;
    let source = JsonFileSource::new(path);

    run_report(&source, &config).await
}

async fn run_report(source: &dyn RecordSource, config: &Config) -> Result<()> {
    // 1. Fetch everything before touching any output file
    println!("📥 Fetching registrations from {}...", source.describe());
    let records = source.fetch().await?;
    println!("✓ Found {} registration(s)", records.len());

    // 2. Aggregate + render + write
    println!("\n📝 Generating reports...");
    let summary = generate_reports(&records, &config.outputs)?;
    tracing::debug!("{}", summary.summary());

    println!("✓ Games listing: {}", config.outputs.games_listing.display());
    println!("✓ Gamers list:   {}", config.outputs.gamers.display());
    if summary.records == 0 {
        println!("✓ CSV export:    {} (empty, no registrations)", config.outputs.csv.display());
    } else {
        println!("✓ CSV export:    {}", config.outputs.csv.display());
    }

    // 3. Summary
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("👥 Total participants: {}", summary.participants);
    println!(
        "🎲 Total games: {} (including {} house games)",
        summary.total_games, summary.house_games
    );
    println!("📄 Total records: {}", summary.records);
    println!("📊 Total columns: {}", summary.csv_columns);
    if summary.skipped_records > 0 {
        println!("⚠️  Registrations without a name: {}", summary.skipped_records);
    }

    Ok(())
}
