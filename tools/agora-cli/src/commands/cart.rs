//! Cart commands.

use std::fs;

use agora_commerce::cart::{AddOptions, Cart, NewLineItem};
use agora_commerce::catalog::Product;
use agora_commerce::ProductId;
use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;

use super::{AddArgs, CartArgs, CartCommand};
use crate::context::Context;
use crate::output::format_won;

/// Run the cart command.
pub fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.cart_store()?;

    match args.command {
        CartCommand::Show => {}
        CartCommand::Add(args) => {
            let options =
                AddOptions::from_count(args.quantity).context("quantity must be at least 1")?;
            let item = candidate(args)?;

            ctx.output
                .success(&format!("Added {} x {}", options.quantity(), item.name));
            store.add(item, options);
        }
        CartCommand::Update { id, quantity } => {
            let id = ProductId::new(id);
            if store.cart().get_item(&id).is_none() {
                ctx.output.warn(&format!("{} is not in the cart", id));
            } else if quantity <= 0 {
                ctx.output.success(&format!("Removed {}", id));
            } else {
                ctx.output
                    .success(&format!("Set {} to {} units", id, quantity));
            }
            store.update_quantity(&id, quantity);
        }
        CartCommand::Remove { id } => {
            let id = ProductId::new(id);
            if store.cart().get_item(&id).is_none() {
                ctx.output.warn(&format!("{} is not in the cart", id));
            } else {
                ctx.output.success(&format!("Removed {}", id));
            }
            store.remove_item(&id);
        }
        CartCommand::Clear { yes } => {
            if !yes && !ctx.output.is_json() && !store.cart().is_empty() {
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "Remove all {} items from the cart?",
                        store.total_items()
                    ))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    ctx.output.warn("Clear cancelled");
                    return Ok(());
                }
            }

            store.clear_cart();
            ctx.output.success("Cart cleared");
        }
    }

    print_cart(store.cart(), ctx);
    Ok(())
}

/// Build the line item to add from the command arguments.
fn candidate(args: AddArgs) -> Result<NewLineItem> {
    if let Some(path) = args.product {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let product: Product = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not a catalog product", path.display()))?;
        if !product.is_available() {
            bail!("{} is not available for purchase", product.name);
        }
        return Ok(product.to_line_item());
    }

    let id = args.id.context("a product id is required")?;
    let name = args.name.context("--name is required")?;
    let price = args.price.context("--price is required")?;

    let mut item = NewLineItem::new(id, name, price);
    if let Some(image) = args.image {
        item = item.with_image(image);
    }
    if let Some(description) = args.description {
        item = item.with_description(description);
    }
    Ok(item)
}

fn print_cart(cart: &Cart, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&cart.snapshot());
        return;
    }

    ctx.output.header("Cart");
    if cart.is_empty() {
        ctx.output.info("Cart is empty");
        return;
    }

    let widths = [16, 24, 10, 5, 12];
    ctx.output
        .table_row(&["ID", "NAME", "PRICE", "QTY", "SUBTOTAL"], &widths);
    for item in cart.items() {
        ctx.output.table_row(
            &[
                item.id.as_str(),
                &item.name,
                &format_won(item.price),
                &item.quantity.to_string(),
                &format_won(item.subtotal()),
            ],
            &widths,
        );
    }

    ctx.output.blank();
    ctx.output.kv("items", &cart.total_items().to_string());
    ctx.output.kv("total", &format_won(cart.total_price()));
}
