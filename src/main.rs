use anyhow::Result;
use bot::{Autopilot, BotState, TelegramApi};
use catalog_client::{CatalogClient, DEFAULT_CATEGORY};
use clap::{Parser, Subcommand};
use publisher::MediaPublisher;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the promobot application.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present (secrets overlay).
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let settings = configuration::load_settings()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Run => handle_run(settings).await?,
        Commands::Search(args) => handle_search(settings, args).await?,
        Commands::Lookup(args) => handle_lookup(settings, args).await?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A Telegram bot that promotes affiliate catalog products.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot: command loop plus the periodic autopilot task.
    Run,
    /// One-shot catalog search, printed to stdout.
    Search(SearchArgs),
    /// One-shot product lookup by catalog identifier.
    Lookup(LookupArgs),
}

#[derive(Parser)]
struct SearchArgs {
    /// Keywords to search for.
    #[arg(long)]
    keywords: String,

    /// Catalog category to search within.
    #[arg(long, default_value = DEFAULT_CATEGORY)]
    category: String,
}

#[derive(Parser)]
struct LookupArgs {
    /// The catalog identifier of the product.
    #[arg(long)]
    id: String,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

async fn handle_run(settings: configuration::Settings) -> Result<()> {
    let catalog = Arc::new(CatalogClient::new(settings.catalog)?);
    let media_publisher = Arc::new(MediaPublisher::new(settings.media)?);
    let telegram = Arc::new(TelegramApi::new(&settings.telegram)?);
    let state = Arc::new(BotState::default());

    let autopilot = Autopilot::new(
        catalog.clone(),
        media_publisher,
        telegram.clone(),
        state.clone(),
        settings.autopilot,
        settings.telegram.chat_id.clone(),
    );
    tokio::spawn(autopilot.start());

    bot::run_bot(telegram, catalog, state).await;
    Ok(())
}

async fn handle_search(settings: configuration::Settings, args: SearchArgs) -> Result<()> {
    let catalog = CatalogClient::new(settings.catalog)?;
    let products = catalog.search(&args.keywords, &args.category).await?;

    if products.is_empty() {
        println!("No products found for '{}'.", args.keywords);
        return Ok(());
    }
    for product in products {
        println!(
            "{} | rating {} | ${:.2} | {}",
            product.name, product.rating, product.price, product.affiliate_link
        );
    }
    Ok(())
}

async fn handle_lookup(settings: configuration::Settings, args: LookupArgs) -> Result<()> {
    let catalog = CatalogClient::new(settings.catalog)?;

    match catalog.lookup(&args.id).await? {
        Some(product) => {
            println!("{}", product.name);
            println!("Price:  ${:.2}", product.price);
            println!("Rating: {}", product.rating);
            println!("Link:   {}", product.affiliate_link);
            println!("Image:  {}", product.image_url);
        }
        None => println!("No product found for ID '{}'.", args.id),
    }
    Ok(())
}
