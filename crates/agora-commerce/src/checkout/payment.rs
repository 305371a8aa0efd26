//! Payment widget handshake.
//!
//! The widget itself is an external collaborator. This module builds the
//! request handed to it and interprets the redirect it sends back.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

use crate::cart::Cart;
use crate::error::CommerceError;
use crate::ids::OrderId;

/// Customer key the widget uses for guest checkout.
pub const ANONYMOUS_CUSTOMER: &str = "ANONYMOUS";

/// Payment type reported when the success redirect omits one.
pub const DEFAULT_PAYMENT_TYPE: &str = "NORMAL";

/// Widget settings for one storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Public client key identifying the shop to the widget.
    pub client_key: String,
    /// Customer key; [`ANONYMOUS_CUSTOMER`] for guests.
    pub customer_key: String,
    /// Where the widget redirects after a successful payment.
    pub success_url: String,
    /// Where the widget redirects after a failed payment.
    pub fail_url: String,
}

impl CheckoutConfig {
    /// Guest checkout with `/success` and `/fail` under `origin`.
    pub fn for_origin(client_key: impl Into<String>, origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            client_key: client_key.into(),
            customer_key: ANONYMOUS_CUSTOMER.to_string(),
            success_url: format!("{}/success", origin),
            fail_url: format!("{}/fail", origin),
        }
    }
}

/// Everything the widget needs to open the payment window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub client_key: String,
    pub customer_key: String,
    pub order_id: OrderId,
    pub order_name: String,
    pub amount: u64,
    pub success_url: String,
    pub fail_url: String,
}

impl PaymentRequest {
    /// Build a request for the current cart.
    pub fn from_cart(cart: &Cart, config: &CheckoutConfig) -> Result<Self, CommerceError> {
        Self::from_cart_at(cart, config, Utc::now())
    }

    /// Build a request with an explicit clock reading.
    pub fn from_cart_at(
        cart: &Cart,
        config: &CheckoutConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, CommerceError> {
        let Some(first) = cart.items().first() else {
            return Err(CommerceError::EmptyCart);
        };

        let order_name = match cart.unique_item_count() {
            1 => first.name.clone(),
            n => format!("{} and {} more", first.name, n - 1),
        };

        Ok(Self {
            client_key: config.client_key.clone(),
            customer_key: config.customer_key.clone(),
            order_id: OrderId::from_millis(now.timestamp_millis()),
            order_name,
            amount: cart.total_price(),
            success_url: config.success_url.clone(),
            fail_url: config.fail_url.clone(),
        })
    }
}

/// Error codes the widget reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentErrorCode {
    PayProcessCanceled,
    UserCancel,
    InvalidCardNumber,
    InvalidExpiry,
    InvalidBirth,
    InvalidPassword,
    CardCompanyNotSupported,
    ExceedMaxDailyPaymentCount,
    NotSupportedInstallmentPlan,
    ExceedMaxPaymentAmount,
    InvalidParameter,
    Unauthorized,
    Forbidden,
    ProviderError,
    UnknownPaymentError,
    /// Assigned by the shop when the widget fails in an unrecognized way.
    UnknownError,
    /// Any code not listed above.
    Other(String),
}

impl PaymentErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentErrorCode::PayProcessCanceled => "PAY_PROCESS_CANCELED",
            PaymentErrorCode::UserCancel => "USER_CANCEL",
            PaymentErrorCode::InvalidCardNumber => "INVALID_CARD_NUMBER",
            PaymentErrorCode::InvalidExpiry => "INVALID_EXPIRY",
            PaymentErrorCode::InvalidBirth => "INVALID_BIRTH",
            PaymentErrorCode::InvalidPassword => "INVALID_PASSWORD",
            PaymentErrorCode::CardCompanyNotSupported => "CARD_COMPANY_NOT_SUPPORTED",
            PaymentErrorCode::ExceedMaxDailyPaymentCount => "EXCEED_MAX_DAILY_PAYMENT_COUNT",
            PaymentErrorCode::NotSupportedInstallmentPlan => "NOT_SUPPORTED_INSTALLMENT_PLAN",
            PaymentErrorCode::ExceedMaxPaymentAmount => "EXCEED_MAX_PAYMENT_AMOUNT",
            PaymentErrorCode::InvalidParameter => "INVALID_PARAMETER",
            PaymentErrorCode::Unauthorized => "UNAUTHORIZED",
            PaymentErrorCode::Forbidden => "FORBIDDEN",
            PaymentErrorCode::ProviderError => "PROVIDER_ERROR",
            PaymentErrorCode::UnknownPaymentError => "UNKNOWN_PAYMENT_ERROR",
            PaymentErrorCode::UnknownError => "UNKNOWN_ERROR",
            PaymentErrorCode::Other(code) => code,
        }
    }

    /// Parse a code string; unknown codes become [`PaymentErrorCode::Other`].
    pub fn parse(code: &str) -> Self {
        match code {
            "PAY_PROCESS_CANCELED" => PaymentErrorCode::PayProcessCanceled,
            "USER_CANCEL" => PaymentErrorCode::UserCancel,
            "INVALID_CARD_NUMBER" => PaymentErrorCode::InvalidCardNumber,
            "INVALID_EXPIRY" => PaymentErrorCode::InvalidExpiry,
            "INVALID_BIRTH" => PaymentErrorCode::InvalidBirth,
            "INVALID_PASSWORD" => PaymentErrorCode::InvalidPassword,
            "CARD_COMPANY_NOT_SUPPORTED" => PaymentErrorCode::CardCompanyNotSupported,
            "EXCEED_MAX_DAILY_PAYMENT_COUNT" => PaymentErrorCode::ExceedMaxDailyPaymentCount,
            "NOT_SUPPORTED_INSTALLMENT_PLAN" => PaymentErrorCode::NotSupportedInstallmentPlan,
            "EXCEED_MAX_PAYMENT_AMOUNT" => PaymentErrorCode::ExceedMaxPaymentAmount,
            "INVALID_PARAMETER" => PaymentErrorCode::InvalidParameter,
            "UNAUTHORIZED" => PaymentErrorCode::Unauthorized,
            "FORBIDDEN" => PaymentErrorCode::Forbidden,
            "PROVIDER_ERROR" => PaymentErrorCode::ProviderError,
            "UNKNOWN_PAYMENT_ERROR" => PaymentErrorCode::UnknownPaymentError,
            "UNKNOWN_ERROR" => PaymentErrorCode::UnknownError,
            other => PaymentErrorCode::Other(other.to_string()),
        }
    }

    /// The customer closed or cancelled the payment window.
    pub fn is_user_cancellation(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::PayProcessCanceled | PaymentErrorCode::UserCancel
        )
    }

    /// Message shown when the redirect carries none.
    pub fn default_message(&self) -> &'static str {
        match self {
            PaymentErrorCode::PayProcessCanceled | PaymentErrorCode::UserCancel => {
                "The payment was cancelled by the customer."
            }
            PaymentErrorCode::InvalidCardNumber => "The card number is invalid.",
            PaymentErrorCode::InvalidExpiry => "The card expiry date is invalid.",
            PaymentErrorCode::InvalidBirth => "The date of birth is invalid.",
            PaymentErrorCode::InvalidPassword => "The card password is invalid.",
            PaymentErrorCode::CardCompanyNotSupported => "This card issuer is not supported.",
            PaymentErrorCode::ExceedMaxDailyPaymentCount => {
                "The daily payment limit has been exceeded."
            }
            PaymentErrorCode::NotSupportedInstallmentPlan => {
                "This installment plan is not supported."
            }
            PaymentErrorCode::ExceedMaxPaymentAmount => "The maximum payment amount was exceeded.",
            PaymentErrorCode::InvalidParameter => "The payment request was invalid.",
            PaymentErrorCode::Unauthorized => "The payment request was not authenticated.",
            PaymentErrorCode::Forbidden => "The payment request is not allowed.",
            PaymentErrorCode::ProviderError => {
                "The payment provider is temporarily unavailable."
            }
            PaymentErrorCode::UnknownPaymentError => "An unknown payment error occurred.",
            PaymentErrorCode::UnknownError | PaymentErrorCode::Other(_) => {
                "Something went wrong while processing the payment."
            }
        }
    }
}

impl fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for PaymentErrorCode {
    fn from(code: String) -> Self {
        PaymentErrorCode::parse(&code)
    }
}

impl From<PaymentErrorCode> for String {
    fn from(code: PaymentErrorCode) -> Self {
        code.as_str().to_string()
    }
}

/// Parameters of the success redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSuccess {
    pub payment_key: String,
    pub order_id: OrderId,
    pub amount: u64,
    pub payment_type: String,
}

impl PaymentSuccess {
    /// Parse `paymentKey`, `orderId`, `amount` and optional `paymentType`.
    pub fn from_query(query: &str) -> Result<Self, CommerceError> {
        let params = parse_query(query);
        let (Some(payment_key), Some(order_id), Some(amount)) = (
            params.get("paymentKey"),
            params.get("orderId"),
            params.get("amount"),
        ) else {
            return Err(CommerceError::InvalidPaymentCallback(
                "paymentKey, orderId and amount are required".to_string(),
            ));
        };

        let amount = amount
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|a| *a > 0)
            .ok_or_else(|| {
                CommerceError::InvalidPaymentCallback(format!("invalid amount: {amount:?}"))
            })?;

        Ok(Self {
            payment_key: payment_key.clone(),
            order_id: OrderId::new(order_id.clone()),
            amount,
            payment_type: params
                .get("paymentType")
                .cloned()
                .unwrap_or_else(|| DEFAULT_PAYMENT_TYPE.to_string()),
        })
    }
}

/// Parameters of the failure redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFailure {
    pub code: PaymentErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
}

impl PaymentFailure {
    /// Parse `code`, optional `message` and optional `orderId`.
    pub fn from_query(query: &str) -> Result<Self, CommerceError> {
        let mut params = parse_query(query);
        let code = params
            .remove("code")
            .map(|c| PaymentErrorCode::parse(&c))
            .ok_or_else(|| CommerceError::InvalidPaymentCallback("code is required".to_string()))?;
        let message = params
            .remove("message")
            .unwrap_or_else(|| code.default_message().to_string());

        Ok(Self {
            code,
            message,
            order_id: params.remove("orderId").map(OrderId::new),
        })
    }

    /// Map an error raised by the widget before any redirect.
    ///
    /// Cancellations keep their code; everything else becomes
    /// [`PaymentErrorCode::UnknownError`].
    pub fn from_widget_error(code: &str) -> Self {
        let code = PaymentErrorCode::parse(code);
        if code.is_user_cancellation() {
            Self {
                message: "The payment was cancelled.".to_string(),
                code,
                order_id: None,
            }
        } else {
            Self {
                code: PaymentErrorCode::UnknownError,
                message: "An error occurred during payment.".to_string(),
                order_id: None,
            }
        }
    }

    /// The failure page URL carrying this failure.
    pub fn failure_url(&self, fail_url: &str) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("code", self.code.as_str());
        query.append_pair("message", &self.message);
        if let Some(order_id) = &self.order_id {
            query.append_pair("orderId", order_id.as_str());
        }
        format!("{}?{}", fail_url, query.finish())
    }
}

/// A classified widget redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum PaymentOutcome {
    Success(PaymentSuccess),
    Failure(PaymentFailure),
}

impl PaymentOutcome {
    /// Classify a redirect URL by its path (`.../success` or `.../fail`).
    pub fn from_redirect(redirect: &str) -> Result<Self, CommerceError> {
        let url = Url::parse(redirect)
            .map_err(|e| CommerceError::InvalidPaymentCallback(format!("{redirect}: {e}")))?;
        let query = url.query().unwrap_or("");
        let path = url.path().trim_end_matches('/');

        if path.ends_with("/success") {
            Ok(PaymentOutcome::Success(PaymentSuccess::from_query(query)?))
        } else if path.ends_with("/fail") {
            Ok(PaymentOutcome::Failure(PaymentFailure::from_query(query)?))
        } else {
            Err(CommerceError::InvalidPaymentCallback(format!(
                "not a payment redirect: {}",
                url.path()
            )))
        }
    }

    /// The order this outcome refers to, when known.
    pub fn order_id(&self) -> Option<&OrderId> {
        match self {
            PaymentOutcome::Success(s) => Some(&s.order_id),
            PaymentOutcome::Failure(f) => f.order_id.as_ref(),
        }
    }
}

fn parse_query(query: &str) -> HashMap<String, String> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{AddOptions, CartAction, NewLineItem};
    use chrono::TimeZone;

    fn config() -> CheckoutConfig {
        CheckoutConfig::for_origin("test_ck", "https://shop.example/")
    }

    fn cart_with(names: &[(&str, u64)]) -> Cart {
        names.iter().fold(Cart::new(), |cart, (name, price)| {
            cart.apply(&CartAction::Add {
                item: NewLineItem::new(*name, *name, *price),
                options: AddOptions::default(),
            })
        })
    }

    #[test]
    fn test_config_for_origin() {
        let config = config();
        assert_eq!(config.success_url, "https://shop.example/success");
        assert_eq!(config.fail_url, "https://shop.example/fail");
        assert_eq!(config.customer_key, ANONYMOUS_CUSTOMER);
    }

    #[test]
    fn test_request_for_single_item() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let request = PaymentRequest::from_cart_at(&cart_with(&[("Mug", 12000)]), &config(), now)
            .unwrap();

        assert_eq!(request.order_id.as_str(), "ORDER_1700000000123");
        assert_eq!(request.order_name, "Mug");
        assert_eq!(request.amount, 12000);
    }

    #[test]
    fn test_request_names_several_items() {
        let cart = cart_with(&[("Mug", 12000), ("Pen", 1500), ("Ink", 3000)]);
        let request = PaymentRequest::from_cart(&cart, &config()).unwrap();

        assert_eq!(request.order_name, "Mug and 2 more");
        assert_eq!(request.amount, 16500);
        assert!(request.order_id.as_str().starts_with("ORDER_"));
    }

    #[test]
    fn test_request_rejects_empty_cart() {
        assert!(matches!(
            PaymentRequest::from_cart(&Cart::new(), &config()),
            Err(CommerceError::EmptyCart)
        ));
    }

    #[test]
    fn test_success_query() {
        let success =
            PaymentSuccess::from_query("paymentKey=pk_1&orderId=ORDER_1&amount=5000").unwrap();
        assert_eq!(success.amount, 5000);
        assert_eq!(success.payment_type, DEFAULT_PAYMENT_TYPE);
    }

    #[test]
    fn test_success_query_requires_fields() {
        assert!(PaymentSuccess::from_query("orderId=ORDER_1&amount=5000").is_err());
        assert!(PaymentSuccess::from_query("paymentKey=pk&orderId=O&amount=0").is_err());
        assert!(PaymentSuccess::from_query("paymentKey=pk&orderId=O&amount=abc").is_err());
    }

    #[test]
    fn test_failure_query_defaults_message() {
        let failure = PaymentFailure::from_query("code=INVALID_EXPIRY&orderId=ORDER_9").unwrap();
        assert_eq!(failure.code, PaymentErrorCode::InvalidExpiry);
        assert_eq!(failure.message, "The card expiry date is invalid.");
        assert_eq!(failure.order_id, Some(OrderId::new("ORDER_9")));

        assert!(PaymentFailure::from_query("message=oops").is_err());
    }

    #[test]
    fn test_unknown_code_round_trips() {
        let code = PaymentErrorCode::parse("SOMETHING_NEW");
        assert_eq!(code, PaymentErrorCode::Other("SOMETHING_NEW".to_string()));
        assert_eq!(code.as_str(), "SOMETHING_NEW");
        assert_eq!(serde_json::to_string(&code).unwrap(), r#""SOMETHING_NEW""#);
    }

    #[test]
    fn test_widget_error_mapping() {
        let cancelled = PaymentFailure::from_widget_error("USER_CANCEL");
        assert!(cancelled.code.is_user_cancellation());

        let other = PaymentFailure::from_widget_error("NETWORK_DOWN");
        assert_eq!(other.code, PaymentErrorCode::UnknownError);
        assert!(!other.code.is_user_cancellation());
    }

    #[test]
    fn test_failure_url_round_trip() {
        let failure = PaymentFailure::from_widget_error("PAY_PROCESS_CANCELED");
        let url = failure.failure_url("https://shop.example/fail");

        assert!(url.starts_with("https://shop.example/fail?code=PAY_PROCESS_CANCELED&"));
        assert_eq!(
            PaymentOutcome::from_redirect(&url).unwrap(),
            PaymentOutcome::Failure(failure)
        );
    }

    #[test]
    fn test_from_redirect_classifies_by_path() {
        let outcome = PaymentOutcome::from_redirect(
            "https://shop.example/success?paymentKey=pk&orderId=ORDER_1&amount=100&paymentType=BRANDPAY",
        )
        .unwrap();
        assert_eq!(outcome.order_id(), Some(&OrderId::new("ORDER_1")));

        assert!(PaymentOutcome::from_redirect("https://shop.example/cart").is_err());
        assert!(PaymentOutcome::from_redirect("not a url").is_err());
    }
}
