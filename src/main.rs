//! One-shot command line analysis: fetch, compute, print the recommendation.

use clap::Parser;
use dotenvy::dotenv;
use tradepilot::config::Config;
use tradepilot::core::{AnalysisOutcome, AnalysisService};
use tradepilot::logging;
use tradepilot::services::{HistoryRequest, Interval, MarketDataRouter};

#[derive(Debug, Parser)]
#[command(name = "tradepilot", about = "BUY/SELL/HOLD suggestion from RSI, MACD and moving averages")]
struct Cli {
    /// Ticker, e.g. AAPL, RELIANCE.NS, or NSE:INFY with --brokerage
    symbol: String,

    /// Calendar days of history to load
    #[arg(long, default_value_t = 180)]
    lookback_days: u32,

    /// Bar interval: 1m, 1h or 1d
    #[arg(long, default_value = "1d")]
    interval: Interval,

    /// Try the brokerage API first (needs ZERODHA_* credentials)
    #[arg(long)]
    brokerage: bool,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let router = MarketDataRouter::from_config(&config)?;
    let service = AnalysisService::new(router, config.signal.clone());
    let request = HistoryRequest::new(cli.symbol, cli.lookback_days, cli.interval)?;

    let outcome = service.analyze(&request, cli.brokerage).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome.analysis.recommendation)?);
    } else {
        print_outcome(&outcome);
    }

    Ok(())
}

fn print_outcome(outcome: &AnalysisOutcome) {
    let analysis = &outcome.analysis;
    let rec = &analysis.recommendation;
    println!("Symbol: {}", analysis.series.symbol());
    println!("  Source: {} ({} bars)", outcome.provider, analysis.series.len());
    println!("  Last close: {:.2}", rec.snapshot.close);
    println!("  Suggestion: {}", rec.signal);
    println!("  Reasons:");
    for (i, reason) in rec.reasons.iter().enumerate() {
        println!("    {}. {}", i + 1, reason);
    }
}
