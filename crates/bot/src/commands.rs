use crate::BotState;
use catalog_client::{CatalogClient, CatalogError};
use core_types::{Mode, Product};

/// A parsed chat command. Each variant maps 1:1 to a core operation or a
/// fixed acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Products,
    LatestProducts,
    TopRatedProducts,
    SearchProduct(String),
    ProductDetails(String),
    Subscribe,
    Unsubscribe,
    Status,
    Update,
    AutonomousMode,
    ManualMode,
    Unknown(String),
}

impl Command {
    /// Parses a message text into a command. Returns `None` for ordinary
    /// messages that are not addressed to the bot.
    pub fn parse(text: &str) -> Option<Command> {
        let trimmed = text.trim();
        if !trimmed.starts_with('/') {
            return None;
        }
        let (head, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (trimmed, ""),
        };
        // "/cmd@SomeBot" addresses a specific bot in a group chat.
        let name = head.trim_start_matches('/').split('@').next().unwrap_or("");

        let command = match name {
            "start" => Command::Start,
            "help" => Command::Help,
            "products" => Command::Products,
            "latest_products" => Command::LatestProducts,
            "top_rated_products" => Command::TopRatedProducts,
            "search_product" => Command::SearchProduct(rest.to_string()),
            "product_details" => Command::ProductDetails(rest.to_string()),
            "subscribe" => Command::Subscribe,
            "unsubscribe" => Command::Unsubscribe,
            "status" => Command::Status,
            "update" => Command::Update,
            "autonomous_mode" => Command::AutonomousMode,
            "manual_mode" => Command::ManualMode,
            other => Command::Unknown(other.to_string()),
        };
        Some(command)
    }
}

const HELP_TEXT: &str = "\
/start - Start the bot
/products - Show recommended products
/latest_products - Show the newest products
/top_rated_products - Show the highest-rated products
/search_product <keyword> - Search products by keyword
/product_details <product_id> - Show details for a product
/subscribe - Subscribe to updates
/unsubscribe - Unsubscribe from updates
/status - Show the bot status
/update - Learn about upcoming updates
/autonomous_mode - Switch to autonomous mode
/manual_mode - Switch to manual mode";

/// Executes a command and renders the reply text.
///
/// Catalog failures are rendered as an explicit error line so the user can
/// tell "nothing matched" apart from "the catalog could not be reached".
pub async fn respond(command: Command, catalog: &CatalogClient, state: &BotState) -> String {
    match command {
        Command::Start => {
            "Welcome to promobot! Use /help to see the list of available commands.".to_string()
        }
        Command::Help => HELP_TEXT.to_string(),
        Command::Products => listing("Recommended products", catalog.recommended().await),
        Command::LatestProducts => listing("Newest products", catalog.latest().await),
        Command::TopRatedProducts => listing("Top-rated products", catalog.top_rated().await),
        Command::SearchProduct(keywords) => {
            if keywords.is_empty() {
                return "Please provide a keyword to search for.".to_string();
            }
            let header = format!("Results for '{keywords}'");
            listing(
                &header,
                catalog.search(&keywords, catalog_client::DEFAULT_CATEGORY).await,
            )
        }
        Command::ProductDetails(item_id) => {
            if item_id.is_empty() {
                return "Please provide a product ID.".to_string();
            }
            match catalog.lookup(&item_id).await {
                Ok(Some(product)) => details(&product),
                Ok(None) => "No product found for that ID.".to_string(),
                Err(e) => unavailable(&e),
            }
        }
        Command::Subscribe => "You are now subscribed to updates.".to_string(),
        Command::Unsubscribe => "You have been unsubscribed from updates.".to_string(),
        Command::Status => {
            format!("The bot is in {} mode.", state.mode().await.as_str())
        }
        Command::Update => {
            "You are up to date. New features will be announced here.".to_string()
        }
        Command::AutonomousMode => {
            state.set_mode(Mode::Autonomous).await;
            "Autonomous mode enabled. I will post top products on a schedule.".to_string()
        }
        Command::ManualMode => {
            state.set_mode(Mode::Manual).await;
            "Manual mode enabled. I will only act on your commands.".to_string()
        }
        Command::Unknown(name) => {
            format!("Unknown command /{name}. Use /help to see what I can do.")
        }
    }
}

fn listing(header: &str, result: Result<Vec<Product>, CatalogError>) -> String {
    let products = match result {
        Ok(products) => products,
        Err(e) => return unavailable(&e),
    };
    if products.is_empty() {
        return format!("{header}: no products found.");
    }
    let mut reply = format!("{header}:\n");
    for product in &products {
        reply.push_str(&format!("{}\nLink: {}\n\n", product.name, product.affiliate_link));
    }
    reply.trim_end().to_string()
}

fn details(product: &Product) -> String {
    format!(
        "Product details:\n\
         Name: {}\n\
         Price: ${:.2}\n\
         Rating: {} stars\n\
         Link: {}\n\
         Image: {}",
        product.name, product.price, product.rating, product.affiliate_link, product.image_url
    )
}

fn unavailable(error: &CatalogError) -> String {
    format!("Sorry, the product catalog could not be reached right now. ({error})")
}
