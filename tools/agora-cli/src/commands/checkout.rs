//! Checkout commands.

use agora_commerce::checkout::{
    complete_checkout, CheckoutReceipt, CheckoutStatus, PaymentOutcome, PaymentRequest,
};
use anyhow::{Context as _, Result};

use super::{CheckoutArgs, CheckoutCommand};
use crate::context::Context;
use crate::output::{format_won, status_badge};

/// Run the checkout command.
pub fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CheckoutCommand::Request => request(ctx),
        CheckoutCommand::Complete { redirect_url } => complete(&redirect_url, ctx),
    }
}

fn request(ctx: &Context) -> Result<()> {
    let store = ctx.cart_store()?;
    let config = ctx.config.checkout.to_checkout_config();
    if config.client_key.is_empty() {
        ctx.output
            .warn("checkout.client_key is not set; the widget will reject this request");
    }

    let request = PaymentRequest::from_cart(store.cart(), &config)
        .context("Failed to build payment request")?;

    if ctx.output.is_json() {
        ctx.output.json(&request);
        return Ok(());
    }

    ctx.output.header("Payment Request");
    ctx.output.kv("order_id", request.order_id.as_str());
    ctx.output.kv("order_name", &request.order_name);
    ctx.output.kv("amount", &format_won(request.amount));
    ctx.output.kv("customer_key", &request.customer_key);
    ctx.output.kv("success_url", &request.success_url);
    ctx.output.kv("fail_url", &request.fail_url);

    Ok(())
}

fn complete(redirect_url: &str, ctx: &Context) -> Result<()> {
    let outcome = PaymentOutcome::from_redirect(redirect_url)
        .context("Failed to read payment redirect")?;

    let mut store = ctx.cart_store()?;
    let receipt = complete_checkout(&mut store, outcome);

    if ctx.output.is_json() {
        ctx.output.json(&receipt);
        return Ok(());
    }

    print_receipt(&receipt, ctx);
    Ok(())
}

fn print_receipt(receipt: &CheckoutReceipt, ctx: &Context) {
    ctx.output.header("Checkout");
    if let Some(order_id) = &receipt.order_id {
        ctx.output.kv("order_id", order_id.as_str());
    }

    match &receipt.status {
        CheckoutStatus::Paid {
            payment_key,
            amount,
            payment_type,
        } => {
            ctx.output.kv("status", &status_badge("paid"));
            ctx.output.kv("amount", &format_won(*amount));
            ctx.output.kv("payment_type", payment_type);
            ctx.output.kv("payment_key", payment_key);
            ctx.output.success("Payment complete, cart cleared");
        }
        CheckoutStatus::Cancelled { code, message } => {
            ctx.output.kv("status", &status_badge("cancelled"));
            ctx.output.kv("code", code.as_str());
            ctx.output.warn(message);
        }
        CheckoutStatus::Failed { code, message } => {
            ctx.output.kv("status", &status_badge("failed"));
            ctx.output.kv("code", code.as_str());
            ctx.output.warn(message);
            ctx.output.info("Your cart was kept; you can try again");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliConfig;
    use crate::output::Output;
    use agora_commerce::cart::{AddOptions, NewLineItem};
    use serde_json::Value;
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;

    fn context_with_mugs(root: &Path) -> (Context, Rc<RefCell<Vec<String>>>) {
        let (output, lines) = Output::captured(true);
        let ctx = Context {
            config: CliConfig::default(),
            output,
            cwd: root.to_path_buf(),
            config_path: None,
        };
        ctx.cart_store().unwrap().add(
            NewLineItem::new("mug", "Mug", 12_000),
            AddOptions::from_count(2).unwrap(),
        );
        (ctx, lines)
    }

    fn complete_args(redirect_url: &str) -> CheckoutArgs {
        CheckoutArgs {
            command: CheckoutCommand::Complete {
                redirect_url: redirect_url.to_string(),
            },
        }
    }

    fn only_line(lines: &Rc<RefCell<Vec<String>>>) -> Value {
        let lines = lines.borrow();
        assert_eq!(lines.len(), 1);
        serde_json::from_str(&lines[0]).unwrap()
    }

    #[test]
    fn test_failed_redirect_keeps_persisted_cart() {
        let root = tempfile::tempdir().unwrap();
        let (ctx, lines) = context_with_mugs(root.path());
        let before = ctx.cart_store().unwrap().cart().clone();

        run(
            complete_args("http://localhost:3000/fail?code=PROVIDER_ERROR&orderId=ORDER_1"),
            &ctx,
        )
        .unwrap();

        assert_eq!(ctx.cart_store().unwrap().cart(), &before);
        let receipt = only_line(&lines);
        assert_eq!(receipt["status"]["status"], "failed");
        assert_eq!(receipt["cart_cleared"], false);
    }

    #[test]
    fn test_cancelled_redirect_keeps_persisted_cart() {
        let root = tempfile::tempdir().unwrap();
        let (ctx, _) = context_with_mugs(root.path());

        run(complete_args("http://localhost:3000/fail?code=PAY_PROCESS_CANCELED"), &ctx).unwrap();

        assert_eq!(ctx.cart_store().unwrap().total_items(), 2);
    }

    #[test]
    fn test_successful_redirect_clears_persisted_cart() {
        let root = tempfile::tempdir().unwrap();
        let (ctx, lines) = context_with_mugs(root.path());

        run(
            complete_args(
                "http://localhost:3000/success?paymentKey=pk_1&orderId=ORDER_1&amount=24000",
            ),
            &ctx,
        )
        .unwrap();

        assert!(ctx.cart_store().unwrap().cart().is_empty());
        let receipt = only_line(&lines);
        assert_eq!(receipt["order_id"], "ORDER_1");
        assert_eq!(receipt["status"]["status"], "paid");
        assert_eq!(receipt["cart_cleared"], true);
    }

    #[test]
    fn test_unrecognized_redirect_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let (ctx, _) = context_with_mugs(root.path());

        assert!(run(complete_args("http://localhost:3000/orders?code=X"), &ctx).is_err());
        assert_eq!(ctx.cart_store().unwrap().total_items(), 2);
    }

    #[test]
    fn test_request_prints_payment_request() {
        let root = tempfile::tempdir().unwrap();
        let (ctx, lines) = context_with_mugs(root.path());

        run(
            CheckoutArgs {
                command: CheckoutCommand::Request,
            },
            &ctx,
        )
        .unwrap();

        let request = only_line(&lines);
        assert_eq!(request["orderName"], "Mug");
        assert_eq!(request["amount"], 24_000);
        assert!(request["orderId"].as_str().unwrap().starts_with("ORDER_"));
        assert_eq!(ctx.cart_store().unwrap().total_items(), 2);
    }

    #[test]
    fn test_request_on_empty_cart_fails() {
        let root = tempfile::tempdir().unwrap();
        let (output, _) = Output::captured(true);
        let ctx = Context {
            config: CliConfig::default(),
            output,
            cwd: root.path().to_path_buf(),
            config_path: None,
        };

        let err = run(
            CheckoutArgs {
                command: CheckoutCommand::Request,
            },
            &ctx,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("empty cart"));
    }
}
