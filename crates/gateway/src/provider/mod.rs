//! RozetkaPay wire types and the REST client.

pub mod client;

use rp_common::types::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::host::{Customer, Order};

pub use client::RozetkaPayClient;

/// Correlates a provider transaction with a local order.
pub fn external_id(order_id: &str) -> String {
    format!("order_{order_id}")
}

/// External id used by the info lookup.
///
/// The lookup has always sent `order_1<id>`, unlike create/cancel/refund
/// which send `order_<id>`. Kept as-is until the provider confirms which
/// form its info endpoint expects.
pub fn info_external_id(order_id: &str) -> String {
    format!("order_1{order_id}")
}

/// Recover the local order id by dropping every non-digit character.
pub fn order_id_from_external_id(external_id: &str) -> String {
    external_id.chars().filter(char::is_ascii_digit).collect()
}

/// Loose truthiness of a decoded JSON value: `null`, `false`, `0`, `""`,
/// `"0"` and empty arrays/objects are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Body sent to `payments/v1/new`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequest {
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub external_id: String,
    pub mode: &'static str,
    pub callback_url: String,
    pub result_url: String,
}

impl PaymentRequest {
    /// A hosted-page payment for `order`, charging `amount`.
    pub fn hosted(order: &Order, amount: &Money, result_url: String, callback_url: String) -> Self {
        let description = match &order.customer {
            Customer::Account { name } => format!("Customer: {name}. Order #: {}", order.id),
            Customer::Anonymous => "Customer: anonymous".to_string(),
        };

        Self {
            amount: amount.amount,
            currency: amount.currency.clone(),
            description,
            external_id: external_id(&order.id),
            mode: "hosted",
            callback_url,
            result_url,
        }
    }
}

/// Body sent to `payments/v1/cancel` and `payments/v1/refund`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentOperation {
    pub external_id: String,
    pub amount: Decimal,
    pub currency: String,
}

impl PaymentOperation {
    pub fn for_order(order_id: &str, amount: &Money) -> Self {
        Self {
            external_id: external_id(order_id),
            amount: amount.amount,
            currency: amount.currency.clone(),
        }
    }
}

/// Decoded response body paired with the HTTP status it arrived with.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: Value,
}

impl ProviderResponse {
    /// No usable body and not a 200.
    pub fn is_failure(&self) -> bool {
        !is_truthy(&self.body) && self.status != 200
    }

    /// Redirect target of a hosted payment session (`action.value`).
    pub fn redirect_url(&self) -> Option<&str> {
        self.body
            .get("action")
            .and_then(|action| action.get("value"))
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSection {
    Purchase,
    Confirmation,
    Refund,
}

impl DetailSection {
    /// Order in which the return path inspects sections.
    pub const PRIORITY: [DetailSection; 3] = [
        DetailSection::Purchase,
        DetailSection::Confirmation,
        DetailSection::Refund,
    ];
}

/// One entry of an info section, with the provider's status fields
/// renamed to the order-status vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InfoDetail {
    #[serde(default, deserialize_with = "id_string")]
    pub transaction_id: String,
    #[serde(rename = "status", default, deserialize_with = "nullable_string")]
    pub order_status: String,
    #[serde(rename = "status_code", default, deserialize_with = "nullable_string")]
    pub order_status_code: String,
    #[serde(rename = "status_description", default)]
    pub order_status_description: Option<String>,
}

/// Result of `payments/v1/info`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentInfo {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub amount: Decimal,
    pub currency: String,
    #[serde(default)]
    pub purchase_details: Option<Vec<InfoDetail>>,
    #[serde(default)]
    pub confirmation_details: Option<Vec<InfoDetail>>,
    #[serde(default)]
    pub refund_details: Option<Vec<InfoDetail>>,
}

impl PaymentInfo {
    pub fn section(&self, section: DetailSection) -> Option<&[InfoDetail]> {
        match section {
            DetailSection::Purchase => self.purchase_details.as_deref(),
            DetailSection::Confirmation => self.confirmation_details.as_deref(),
            DetailSection::Refund => self.refund_details.as_deref(),
        }
    }

    pub fn total(&self) -> Money {
        Money::new(self.amount, self.currency.clone())
    }
}

/// Transaction detail carried by an async notification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionDetail {
    #[serde(default, deserialize_with = "id_string")]
    pub transaction_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub status_code: String,
    #[serde(default)]
    pub status_description: Option<String>,
    pub amount: Decimal,
    pub currency: String,
}

/// Server-to-server notification posted to the notify URL.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Notification {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    pub is_success: bool,
    #[serde(default)]
    pub details: Option<TransactionDetail>,
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(is_truthy(&Value::deserialize(deserializer)?))
}

/// `null` reads as an empty string.
fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(opt_id_string(deserializer)?.unwrap_or_default())
}

fn opt_id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rp_common::types::Money;
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn order(customer: Customer) -> Order {
        Order {
            id: "1042".to_string(),
            total: Money::new(Decimal::from_str("199.99").expect("decimal"), "UAH"),
            customer,
        }
    }

    #[test]
    fn order_id_is_recovered_from_external_id() {
        assert_eq!(order_id_from_external_id("order_1042"), "1042");
        assert_eq!(order_id_from_external_id("order_"), "");
        assert_eq!(order_id_from_external_id("x1y2z3"), "123");
    }

    #[test]
    fn info_lookup_id_carries_extra_digit() {
        assert_eq!(external_id("1042"), "order_1042");
        assert_eq!(info_external_id("1042"), "order_11042");
    }

    #[test]
    fn hosted_request_serializes_external_id_and_mode() {
        let order = order(Customer::Account {
            name: "olena".to_string(),
        });
        let request = PaymentRequest::hosted(
            &order,
            &order.total,
            "https://shop.example/checkout/1042/return".to_string(),
            "https://shop.example/payment/notify/rozetkapay".to_string(),
        );

        let body = serde_json::to_string(&request).expect("serialize");
        assert!(body.contains(r#""external_id":"order_1042""#));
        assert!(body.contains(r#""mode":"hosted""#));
        assert!(body.contains(r#""amount":"199.99""#));
        assert_eq!(request.description, "Customer: olena. Order #: 1042");
    }

    #[test]
    fn anonymous_customer_description() {
        let order = order(Customer::Anonymous);
        let request = PaymentRequest::hosted(&order, &order.total, String::new(), String::new());
        assert_eq!(request.description, "Customer: anonymous");
    }

    #[test]
    fn falsy_values() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!({})));
        assert!(is_truthy(&json!({"id": "p1"})));
        assert!(is_truthy(&json!("true")));
    }

    #[test]
    fn failure_requires_falsy_body_and_non_200() {
        let failed = ProviderResponse {
            status: 404,
            body: json!(null),
        };
        let error_body = ProviderResponse {
            status: 404,
            body: json!({"code": "not_found"}),
        };
        let empty_ok = ProviderResponse {
            status: 200,
            body: json!(null),
        };
        assert!(failed.is_failure());
        assert!(!error_body.is_failure());
        assert!(!empty_ok.is_failure());
    }

    #[test]
    fn redirect_url_reads_action_value() {
        let response = ProviderResponse {
            status: 200,
            body: json!({"action": {"type": "url", "value": "https://pay.example/h/abc"}}),
        };
        assert_eq!(response.redirect_url(), Some("https://pay.example/h/abc"));

        let missing = ProviderResponse {
            status: 200,
            body: json!({"id": "p1"}),
        };
        assert_eq!(missing.redirect_url(), None);
    }

    #[test]
    fn info_sections_are_optional() {
        let info: PaymentInfo = serde_json::from_value(json!({
            "id": "pay-1",
            "amount": 199.99,
            "currency": "UAH",
            "refund_details": [{
                "transaction_id": 77,
                "status": "success",
                "status_code": "transaction_successful",
                "status_description": "ok"
            }]
        }))
        .expect("decode");

        assert!(info.section(DetailSection::Purchase).is_none());
        let refunds = info.section(DetailSection::Refund).expect("refunds");
        assert_eq!(refunds[0].transaction_id, "77");
        assert_eq!(refunds[0].order_status, "success");
        assert_eq!(refunds[0].order_status_code, "transaction_successful");
        assert_eq!(
            info.total(),
            Money::new(Decimal::from_str("199.99").expect("decimal"), "UAH")
        );
    }

    #[test]
    fn notification_accepts_string_amounts_and_loose_flags() {
        let n: Notification = serde_json::from_value(json!({
            "external_id": "order_5",
            "is_success": "1",
            "details": {
                "transaction_id": "T9",
                "status_code": "transaction_successful",
                "amount": "10.50",
                "currency": "UAH"
            }
        }))
        .expect("decode");

        assert!(n.is_success);
        assert_eq!(n.id, None);
        let detail = n.details.expect("details");
        assert_eq!(detail.amount, Decimal::from_str("10.5").expect("decimal"));
    }

    #[test]
    fn null_status_fields_do_not_sink_the_info_response() {
        let info: PaymentInfo = serde_json::from_value(json!({
            "id": "pay-1",
            "amount": "199.99",
            "currency": "UAH",
            "purchase_details": [{
                "transaction_id": "T1",
                "status": "success",
                "status_code": "transaction_successful"
            }],
            "refund_details": [{
                "transaction_id": "R1",
                "status": null,
                "status_code": null,
                "status_description": null
            }]
        }))
        .expect("decode");

        let purchase = info.section(DetailSection::Purchase).expect("purchase");
        assert_eq!(purchase[0].order_status_code, "transaction_successful");
        let refunds = info.section(DetailSection::Refund).expect("refunds");
        assert_eq!(refunds[0].order_status, "");
        assert_eq!(refunds[0].order_status_code, "");
        assert_eq!(refunds[0].order_status_description, None);
    }

    #[test]
    fn notification_with_null_status_code_decodes() {
        let n: Notification = serde_json::from_value(json!({
            "external_id": "order_5",
            "is_success": false,
            "details": {
                "transaction_id": "T9",
                "status": null,
                "status_code": null,
                "amount": 10,
                "currency": "UAH"
            }
        }))
        .expect("decode");

        let detail = n.details.expect("details");
        assert_eq!(detail.status, None);
        assert_eq!(detail.status_code, "");
    }
}
