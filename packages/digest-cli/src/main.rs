// Command-line host for the review digest pipeline

mod app;
mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use review_digest::{
    ChargedComparison, ChargedDigest, DigestError, QuotaLedger, SessionError, SessionStep, UserId,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{build_app, App};
use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "review-digest", about = "Summarize marketplace product reviews")]
struct Cli {
    /// User the quota ledger charges
    #[arg(long, default_value_t = 1)]
    user: UserId,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze the reviews of one product (article number or link)
    Analyze { input: String },
    /// Compare two products side by side
    Compare { first: String, second: String },
    /// List popular products for a search query
    Search { query: Vec<String> },
    /// Read commands from stdin, like a chat session
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,review_digest=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = CliConfig::from_env().context("Failed to load configuration")?;
    let app = build_app(&config)?;

    match cli.command {
        Command::Analyze { input } => match app.service.analyze_for_user(cli.user, &input).await {
            Ok(charged) => print_digest(&charged, cli.json)?,
            Err(e) => report_error(&e),
        },
        Command::Compare { first, second } => {
            match app.service.compare_for_user(cli.user, &first, &second).await {
                Ok(charged) => print_comparison(&charged, cli.json)?,
                Err(e) => report_error(&e),
            }
        }
        Command::Search { query } => search(&app, &query.join(" "), cli.json).await?,
        Command::Interactive => interactive(&app, cli.user).await?,
    }

    Ok(())
}

fn print_digest(charged: &ChargedDigest, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&charged.digest)?);
        return Ok(());
    }
    let product = &charged.digest.product;
    println!("{}", format!("🛍️ {}", product.display_name).bold());
    println!("📦 Article: {}", product.sku);
    println!();
    println!("{}", charged.digest.analysis.text);
    println!();
    println!("Attempts left: {}", charged.remaining_attempts);
    Ok(())
}

fn print_comparison(charged: &ChargedComparison, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&charged.report)?);
        return Ok(());
    }
    println!("{}", charged.report.render());
    println!();
    println!("Attempts left: {}", charged.remaining_attempts);
    Ok(())
}

async fn search(app: &App, query: &str, json: bool) -> Result<()> {
    let listings = match app.service.search(query).await {
        Ok(listings) => listings,
        Err(e) => {
            report_error(&e);
            return Ok(());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }
    if listings.is_empty() {
        println!("Nothing found for \"{}\".", query);
        return Ok(());
    }
    for (i, item) in listings.iter().enumerate() {
        println!(
            "{}. {} [{}]\n   💰 {:.2} ₽ | ⭐ {:.1} | 💬 {}",
            i + 1,
            item.name.bold(),
            item.id,
            item.price,
            item.rating,
            item.feedback_count
        );
    }
    Ok(())
}

/// Generic message for the user; the details go to the log.
fn report_error(error: &DigestError) {
    tracing::debug!(error = %error, "Request failed");
    eprintln!("{} {}", "❌".red(), error.user_message());
}

const HELP: &str = "Commands:
  <article or link>   analyze a product
  compare             compare two products (asks for each)
  cancel              abort a comparison in progress
  last                show the last saved analysis
  search <query>      list popular products
  balance             show remaining attempts
  topup <n>           add attempts
  quit                exit";

async fn interactive(app: &App, user: UserId) -> Result<()> {
    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "quit" | "exit" => break,
            "help" => println!("{}", HELP),
            "compare" => {
                let available = app.ledger.attempts(user).await?;
                if available < review_digest::service::COMPARISON_COST {
                    println!("❌ A comparison needs 2 attempts, you have {}.", available);
                    continue;
                }
                app.sessions.begin(user);
                println!("🔍 Send the article or link of the first product.");
            }
            "cancel" => {
                if app.sessions.cancel(user) {
                    println!("Comparison cancelled.");
                } else {
                    println!("Nothing to cancel.");
                }
            }
            "last" => match app.service.last_analysis(user).await {
                Ok(Some(record)) => println!("{}", record.export_text()),
                Ok(None) => println!("No saved analyses yet."),
                Err(e) => report_error(&e),
            },
            "search" => search(app, rest, false).await?,
            "balance" => println!("Attempts left: {}", app.ledger.attempts(user).await?),
            "topup" => match rest.trim().parse::<u32>() {
                Ok(n) if n > 0 => println!("Attempts left: {}", app.ledger.add_attempts(user, n)),
                _ => println!("❌ Enter a positive number."),
            },
            _ => handle_product_input(app, user, line).await?,
        }
    }

    Ok(())
}

async fn handle_product_input(app: &App, user: UserId, input: &str) -> Result<()> {
    match app.sessions.submit(user, input) {
        Ok(SessionStep::NeedSecond) => {
            println!("🔍 Now send the article or link of the second product.");
        }
        Ok(SessionStep::Ready { first, second }) => {
            println!("⏳ Comparing products...");
            match app.service.compare_for_user(user, &first, &second).await {
                Ok(charged) => print_comparison(&charged, false)?,
                Err(e) => report_error(&e),
            }
        }
        Err(SessionError::InvalidInput { .. }) => {
            println!("❌ Send a product link or article number.");
        }
        Err(SessionError::NoActiveSession) => {
            println!("⏳ Analyzing reviews...");
            match app.service.analyze_for_user(user, input).await {
                Ok(charged) => print_digest(&charged, false)?,
                Err(e) => report_error(&e),
            }
        }
    }
    Ok(())
}
