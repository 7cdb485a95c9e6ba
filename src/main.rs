//! Basketball season analysis CLI
//!
//! Scrapes a team's schedule page and reports season statistics.

use clap::{Parser, Subcommand};
use hoops::{Config, Result};

#[derive(Parser)]
#[command(name = "hoops")]
#[command(about = "Basketball season results scraper and statistics", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "hoops.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the schedule page and list the team's completed games
    Fetch {
        /// Cache directory for HTML files
        #[arg(long)]
        cache: Option<String>,
        /// Use only cached files (no network requests)
        #[arg(long)]
        offline: bool,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Compute season statistics
    Report {
        /// Cache directory for HTML files
        #[arg(long)]
        cache: Option<String>,
        /// Use only cached files (no network requests)
        #[arg(long)]
        offline: bool,
        /// Read raw rows from a JSON file instead of fetching
        #[arg(long)]
        input: Option<String>,
        /// Number of best/worst games to list (overrides config)
        #[arg(long)]
        top: Option<usize>,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Parse a saved HTML page directly
    ParseFile {
        /// Path to the HTML file
        path: String,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Initialize a new project with default config
    Init,
}

#[derive(Clone, Copy, Debug)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Fetch {
            cache,
            offline,
            format,
        } => commands::fetch(&config, cache, offline, format),
        Commands::Report {
            cache,
            offline,
            input,
            top,
            format,
        } => commands::report(&config, cache, offline, input, top, format),
        Commands::ParseFile { path, format } => commands::parse_file(&config, &path, format),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use hoops::data::{FetchedSchedule, ScheduleScraper};
    use hoops::stats::{SeasonReport, SeasonStats};
    use hoops::RawMatch;
    use std::time::Duration;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        println!("\nNext steps:");
        println!("  1. Edit {} to set the team and schedule URL", config_path);
        println!("  2. Run 'hoops fetch' to check the scraped games");
        println!("  3. Run 'hoops report' for season statistics");

        Ok(())
    }

    fn scraper(config: &Config, cache: Option<String>, offline: bool) -> Result<ScheduleScraper> {
        let mut scraper = ScheduleScraper::new(&config.source)?.offline_only(offline);
        if let Some(dir) = cache {
            scraper = scraper.with_cache(dir);
        }
        Ok(scraper)
    }

    pub fn fetch(
        config: &Config,
        cache: Option<String>,
        offline: bool,
        format: OutputFormat,
    ) -> Result<()> {
        let FetchedSchedule { rows, elapsed } = scraper(config, cache, offline)?.fetch()?;

        print_rows(&rows, format)?;
        if matches!(format, OutputFormat::Table) {
            print_elapsed(elapsed);
        }
        Ok(())
    }

    pub fn parse_file(config: &Config, path: &str, format: OutputFormat) -> Result<()> {
        let rows = ScheduleScraper::new(&config.source)?.parse_file(path)?;
        log::info!("Parsed {} matches from {}", rows.len(), path);
        print_rows(&rows, format)
    }

    pub fn report(
        config: &Config,
        cache: Option<String>,
        offline: bool,
        input: Option<String>,
        top: Option<usize>,
        format: OutputFormat,
    ) -> Result<()> {
        check_report_format(format)?;

        let (rows, elapsed) = match input {
            Some(path) => {
                let content = std::fs::read_to_string(&path)?;
                let rows: Vec<RawMatch> = serde_json::from_str(&content)?;
                log::info!("Loaded {} rows from {}", rows.len(), path);
                (rows, None)
            }
            None => {
                let fetched = scraper(config, cache, offline)?.fetch()?;
                (fetched.rows, Some(fetched.elapsed))
            }
        };

        let stats = SeasonStats::new(rows);
        let report = stats.run(top.unwrap_or(config.report.top_n));

        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Table | OutputFormat::Csv => {
                println!("Season report for {} ({})", config.source.team, config.source.url);
                print_report(&report);
                if let Some(elapsed) = elapsed {
                    print_elapsed(elapsed);
                }
            }
        }

        Ok(())
    }

    /// Reports are nested tables; only table and JSON output make sense
    pub fn check_report_format(format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Table | OutputFormat::Json => Ok(()),
            OutputFormat::Csv => Err(hoops::HoopsError::Config(
                "report supports table or json output, not csv".to_string(),
            )),
        }
    }

    fn print_elapsed(elapsed: Duration) {
        println!("\nPage fetched in {:.3} s", elapsed.as_secs_f64());
    }

    fn print_rows(rows: &[RawMatch], format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
            OutputFormat::Csv => {
                println!("date,opponent,points_for,points_against,outcome,venue");
                for r in rows {
                    println!(
                        "\"{}\",\"{}\",{},{},{},{}",
                        r.date.replace('"', "\"\""),
                        r.opponent.replace('"', "\"\""),
                        r.points_for,
                        r.points_against,
                        r.outcome().map(|o| o.to_string()).unwrap_or_default(),
                        r.venue
                    );
                }
            }
            OutputFormat::Table => {
                println!(
                    "{:<20} {:<36} {:>5} {:>5} {:<5} {:<5}",
                    "Date", "Opponent", "For", "Agst", "Res", "Venue"
                );
                println!("{}", "-".repeat(81));
                for r in rows {
                    println!(
                        "{:<20} {:<36} {:>5} {:>5} {:<5} {:<5}",
                        r.date,
                        r.opponent,
                        r.points_for.to_string(),
                        r.points_against.to_string(),
                        r.outcome().map(|o| o.to_string()).unwrap_or_default(),
                        r.venue.to_string()
                    );
                }
                println!("\n{} matches", rows.len());
            }
        }
        Ok(())
    }

    fn fmt_avg(value: Option<f64>) -> String {
        value
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "n/a".to_string())
    }

    fn fmt_streak(value: Option<usize>) -> String {
        value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "n/a".to_string())
    }

    fn print_report(report: &SeasonReport) {
        if report.matches.is_empty() {
            println!("\nNo completed matches found.");
            return;
        }

        println!("\nMatches:");
        for m in &report.matches {
            println!(
                "  {}  {:<36} {:>3}:{:<3} {:<5} {}",
                m.timestamp.format("%Y-%m-%d %H:%M"),
                m.opponent,
                m.points_for,
                m.points_against,
                m.outcome().to_string(),
                m.venue
            );
        }

        println!("\nWins/losses:");
        for (outcome, count) in &report.win_loss {
            println!("  {:<6} {}", outcome.to_string(), count);
        }

        println!("\nAverage points scored:   {}", fmt_avg(report.avg_scored));
        println!("Average points conceded: {}", fmt_avg(report.avg_conceded));

        println!("\nResults by venue:");
        for (venue, outcomes) in &report.home_away {
            for (outcome, count) in outcomes {
                println!("  {:<5} {:<5} {}", venue.to_string(), outcome.to_string(), count);
            }
        }

        println!("\nAverage points scored by venue:");
        for (venue, avg) in &report.avg_home_away {
            println!("  {:<5} {:.2}", venue.to_string(), avg);
        }

        println!("\n{:<7} {:>4} {:>5}", "", "Win", "Loss");
        for (venue, outcomes) in report.win_loss_home_away.rows() {
            let count = |o: hoops::Outcome| outcomes.get(&o).copied().unwrap_or(0);
            println!(
                "  {:<5} {:>4} {:>5}",
                venue.to_string(),
                count(hoops::Outcome::Win),
                count(hoops::Outcome::Loss)
            );
        }

        println!("\nPoint difference:");
        for d in &report.point_diff {
            println!("  {}  {:+}", d.timestamp.format("%Y-%m-%d"), d.difference);
        }

        println!("\nBest games:");
        for g in &report.top_games {
            println!("  {}  {:<36} {}", g.timestamp.format("%Y-%m-%d"), g.opponent, g.points_for);
        }
        println!("\nWorst games:");
        for g in &report.bottom_games {
            println!("  {}  {:<36} {}", g.timestamp.format("%Y-%m-%d"), g.opponent, g.points_for);
        }

        println!("\nLongest winning streak: {}", fmt_streak(report.streaks.win));
        println!("Longest losing streak:  {}", fmt_streak(report.streaks.loss));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_rejects_csv() {
        assert!(commands::check_report_format(OutputFormat::Table).is_ok());
        assert!(commands::check_report_format(OutputFormat::Json).is_ok());
        assert!(commands::check_report_format(OutputFormat::Csv).is_err());
    }

    #[test]
    fn test_output_format_parsing() {
        assert!(matches!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
