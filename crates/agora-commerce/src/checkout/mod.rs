//! Checkout module.
//!
//! Builds the payment request for the external payment widget, parses the
//! redirect it sends back, and applies the outcome to the cart.

mod completion;
mod payment;

pub use completion::{complete_checkout, CheckoutReceipt, CheckoutStatus};
pub use payment::{
    CheckoutConfig, PaymentErrorCode, PaymentFailure, PaymentOutcome, PaymentRequest,
    PaymentSuccess, ANONYMOUS_CUSTOMER, DEFAULT_PAYMENT_TYPE,
};
