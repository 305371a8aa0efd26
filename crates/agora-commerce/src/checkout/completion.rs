//! Applying a payment outcome to the cart.

use serde::{Deserialize, Serialize};

use crate::cart::{CartPersistence, CartStore};
use crate::checkout::{PaymentErrorCode, PaymentOutcome};
use crate::ids::OrderId;

/// What a finished checkout attempt did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckoutStatus {
    /// The provider reported success; the cart was cleared.
    Paid {
        payment_key: String,
        amount: u64,
        payment_type: String,
    },
    /// The customer backed out.
    Cancelled {
        code: PaymentErrorCode,
        message: String,
    },
    /// Any other failure.
    Failed {
        code: PaymentErrorCode,
        message: String,
    },
}

/// Result of [`complete_checkout`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub order_id: Option<OrderId>,
    pub status: CheckoutStatus,
    pub cart_cleared: bool,
}

impl CheckoutReceipt {
    /// Whether the payment went through.
    pub fn is_paid(&self) -> bool {
        matches!(self.status, CheckoutStatus::Paid { .. })
    }
}

/// Apply a payment outcome.
///
/// Only a success clears the cart. A failure leaves it exactly as it was
/// so the customer can retry.
pub fn complete_checkout<P: CartPersistence>(
    store: &mut CartStore<P>,
    outcome: PaymentOutcome,
) -> CheckoutReceipt {
    let order_id = outcome.order_id().cloned();

    match outcome {
        PaymentOutcome::Success(success) => {
            if success.amount != store.total_price() {
                // The provider's amount is authoritative; the cart may
                // have changed in another tab since the request was made.
                tracing::warn!(
                    order_id = %success.order_id,
                    paid = success.amount,
                    cart_total = store.total_price(),
                    "paid amount differs from cart total"
                );
            }
            store.clear_cart();
            tracing::info!(
                order_id = %success.order_id,
                amount = success.amount,
                payment_type = %success.payment_type,
                "checkout completed"
            );

            CheckoutReceipt {
                order_id,
                status: CheckoutStatus::Paid {
                    payment_key: success.payment_key,
                    amount: success.amount,
                    payment_type: success.payment_type,
                },
                cart_cleared: true,
            }
        }
        PaymentOutcome::Failure(failure) => {
            tracing::info!(
                code = %failure.code,
                order_id = ?failure.order_id,
                "checkout did not complete"
            );

            let status = if failure.code.is_user_cancellation() {
                CheckoutStatus::Cancelled {
                    code: failure.code,
                    message: failure.message,
                }
            } else {
                CheckoutStatus::Failed {
                    code: failure.code,
                    message: failure.message,
                }
            };

            CheckoutReceipt {
                order_id,
                status,
                cart_cleared: false,
            }
        }
    }
}
