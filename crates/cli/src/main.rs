//! Tradeyard CLI - Catalog browsing, shopper stores and freight quotes.
//!
//! Operates on the same persisted stores as the storefront server, so a cart
//! built here shows up in the API and vice versa.
//!
//! # Usage
//!
//! ```bash
//! # List categories, then the products in one
//! ty-cli catalog categories
//! ty-cli catalog list --category "Safety & PPE"
//!
//! # Build a cart
//! ty-cli cart add 101 --quantity 6
//! ty-cli cart show
//!
//! # Quote freight for the whole cart
//! ty-cli quote --destination 10001
//! ```
//!
//! # Environment Variables
//!
//! - `TRADEYARD_DATA_DIR` - Directory holding the persisted stores
//! - `FREIGHT_QUOTE_URL`, `FREIGHT_QUOTE_TIMEOUT_SECS`, `FREIGHT_QUOTE_API_KEY`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ty-cli")]
#[command(author, version, about = "Tradeyard CLI tools")]
struct Cli {
    /// Directory holding persisted shopper stores
    #[arg(long, env = "TRADEYARD_DATA_DIR", default_value = ".tradeyard", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Manage the product comparison (max 4)
    Compare {
        #[command(subcommand)]
        action: CompareAction,
    },
    /// Request freight quotes for the cart
    Quote {
        /// Destination postal code
        #[arg(short, long)]
        destination: String,

        /// Origin postal code (defaults to the first line's vendor)
        #[arg(short, long)]
        origin: Option<String>,

        /// Quote a single cart line instead of the whole cart
        #[arg(short, long)]
        product_id: Option<u32>,

        /// Attach the quote at this position to the line
        #[arg(short, long, requires = "product_id")]
        select: Option<usize>,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List categories
    Categories,
    /// List products, optionally in one category (handle or display name)
    List {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show a product by handle
    Show { handle: String },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with totals
    Show,
    /// Add a product
    Add {
        product_id: u32,

        /// Quantity (defaults to the product's minimum order quantity)
        #[arg(short, long)]
        quantity: Option<u32>,

        /// Bundled shipping option ID
        #[arg(short, long)]
        shipping: Option<String>,
    },
    /// Set a line quantity; zero or less removes the line
    Update {
        product_id: u32,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove { product_id: u32 },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    Show,
    /// Save a product, or remove it if already saved
    Toggle { product_id: u32 },
    Remove { product_id: u32 },
}

#[derive(Subcommand)]
enum CompareAction {
    Show,
    Add { product_id: u32 },
    Remove { product_id: u32 },
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = commands::Context::open(&cli.data_dir)?;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Categories => commands::catalog::categories(&ctx),
            CatalogAction::List { category } => {
                commands::catalog::list(&ctx, category.as_deref())?;
            }
            CatalogAction::Show { handle } => commands::catalog::show(&ctx, &handle)?,
        },
        Commands::Cart { action } => {
            let mut session = ctx.session();
            match action {
                CartAction::Show => {}
                CartAction::Add {
                    product_id,
                    quantity,
                    shipping,
                } => commands::stores::add_to_cart(
                    &ctx,
                    &mut session,
                    product_id.into(),
                    quantity,
                    shipping.as_deref(),
                )?,
                CartAction::Update {
                    product_id,
                    quantity,
                } => commands::stores::update_quantity(&mut session, product_id.into(), quantity)?,
                CartAction::Remove { product_id } => {
                    commands::stores::remove_from_cart(&mut session, product_id.into())?;
                }
                CartAction::Clear => session.cart.clear_cart(),
            }
            commands::stores::print_cart(&session.cart);
        }
        Commands::Wishlist { action } => {
            let mut session = ctx.session();
            match action {
                WishlistAction::Show => {}
                WishlistAction::Toggle { product_id } => {
                    commands::stores::toggle_wishlist(&ctx, &mut session, product_id.into())?;
                }
                WishlistAction::Remove { product_id } => {
                    session.wishlist.remove(product_id.into());
                }
            }
            commands::stores::print_products("Wishlist", session.wishlist.items());
        }
        Commands::Compare { action } => {
            let mut session = ctx.session();
            match action {
                CompareAction::Show => {}
                CompareAction::Add { product_id } => {
                    commands::stores::add_to_comparison(&ctx, &mut session, product_id.into())?;
                }
                CompareAction::Remove { product_id } => {
                    session.comparison.remove(product_id.into());
                }
                CompareAction::Clear => session.comparison.clear(),
            }
            commands::stores::print_products("Comparison", session.comparison.items());
        }
        Commands::Quote {
            destination,
            origin,
            product_id,
            select,
        } => {
            let mut session = ctx.session();
            commands::quote::run(
                &ctx,
                &mut session,
                &commands::quote::QuoteArgs {
                    destination: &destination,
                    origin: origin.as_deref(),
                    product_id: product_id.map(Into::into),
                    select,
                },
            )
            .await?;
        }
    }
    Ok(())
}
