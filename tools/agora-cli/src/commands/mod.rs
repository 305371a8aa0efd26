//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod config;

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show items and totals.
    Show,
    /// Add a product, merging with an existing line of the same id.
    Add(AddArgs),
    /// Set a line's quantity (zero or less removes it).
    Update {
        /// Product id.
        id: String,

        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line.
    Remove {
        /// Product id.
        id: String,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for `cart add`.
///
/// The product is given either field by field or as a catalog entry
/// saved from `GET /products`.
#[derive(Args)]
pub struct AddArgs {
    /// Product id.
    #[arg(required_unless_present = "product")]
    pub id: Option<String>,

    /// Display name.
    #[arg(long, required_unless_present = "product")]
    pub name: Option<String>,

    /// Unit price in won.
    #[arg(long, required_unless_present = "product")]
    pub price: Option<u64>,

    /// Units to add.
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub quantity: u32,

    /// Image URL.
    #[arg(long)]
    pub image: Option<String>,

    /// Short description.
    #[arg(long)]
    pub description: Option<String>,

    /// JSON file holding one catalog product.
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["id", "name", "price", "image", "description"]
    )]
    pub product: Option<PathBuf>,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    #[command(subcommand)]
    pub command: CheckoutCommand,
}

#[derive(Subcommand)]
pub enum CheckoutCommand {
    /// Print the payment request for the current cart.
    Request,
    /// Apply the payment widget's redirect to the cart.
    Complete {
        /// Full redirect URL ending in /success or /fail.
        redirect_url: String,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
