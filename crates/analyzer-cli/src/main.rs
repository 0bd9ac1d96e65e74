use analysis_core::FactProvider;
use anyhow::Result;
use console::style;
use fundamental_analysis::FundamentalsEvaluator;
use std::io::{self, BufRead, Write};
use yahoo_client::YahooClient;

mod render;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let provider = YahooClient::new();
    let evaluator = FundamentalsEvaluator::new();

    render::print_banner();

    let stdin = io::stdin();
    loop {
        print!("Enter company ticker symbol: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        let ticker = line.trim().to_uppercase();
        if ticker.is_empty() {
            continue;
        }
        if ticker == "QUIT" {
            break;
        }

        // A failed lookup is reported and the loop keeps going.
        match provider.fetch_facts(&ticker).await {
            Ok(facts) => {
                let evaluation = evaluator.evaluate(&facts);
                render::print_report(&facts, &evaluation);
            }
            Err(err) => {
                tracing::warn!("Lookup failed for {}: {}", ticker, err);
                println!("{}", style(format!("Error analyzing {ticker}: {err}")).red());
            }
        }
    }

    Ok(())
}
