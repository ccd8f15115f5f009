//! Typed client for the RozetkaPay payments API.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use rp_common::config::RozetkaPayConfig;
use rp_common::error::{AppError, AppResult};
use rp_common::http::{basic_authorization, build_client};
use rp_common::types::Money;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{info_external_id, PaymentInfo, PaymentOperation, PaymentRequest, ProviderResponse};

pub const API_VERSION: &str = "v1";

#[derive(Clone)]
pub struct RozetkaPayClient {
    base_url: String,
    authorization: String,
    client: reqwest::Client,
}

impl RozetkaPayClient {
    pub fn new(config: &RozetkaPayConfig, client: reqwest::Client) -> Self {
        Self {
            base_url: format!("{}/", config.api_base_url.trim_end_matches('/')),
            authorization: basic_authorization(&config.login, &config.password),
            client,
        }
    }

    pub fn from_config(config: &RozetkaPayConfig) -> AppResult<Self> {
        let client = build_client(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::new(config, client))
    }

    /// Send one request to the API.
    ///
    /// Only transport problems are errors. A 4xx/5xx answer comes back as a
    /// [`ProviderResponse`] for the caller to inspect.
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> AppResult<ProviderResponse> {
        let url = format!("{}{}", self.base_url, path.trim_start_matches('/'));
        debug!(%method, %url, "calling RozetkaPay");

        let mut request = self
            .client
            .request(method, &url)
            .header(AUTHORIZATION, &self.authorization)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await?;

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| {
                AppError::Gateway(format!("unreadable response from {url} ({status}): {e}"))
            })?
        };

        debug!(%url, status, "RozetkaPay answered");
        Ok(ProviderResponse { status, body })
    }

    /// Open a hosted payment session.
    pub async fn create_payment(&self, request: &PaymentRequest) -> AppResult<ProviderResponse> {
        let path = format!("payments/{API_VERSION}/new");
        self.request(Method::POST, &path, Some(request)).await
    }

    /// Look up the payment for an order.
    ///
    /// `Ok(None)` when the provider has nothing usable for the order.
    pub async fn payment_info(&self, order_id: &str) -> AppResult<Option<PaymentInfo>> {
        let path = format!(
            "payments/{API_VERSION}/info?external_id={}",
            info_external_id(order_id)
        );
        let response = self.request(Method::GET, &path, None::<&()>).await?;

        if response.is_failure() {
            warn!(order_id, status = response.status, "payment info lookup failed");
            return Ok(None);
        }

        match serde_json::from_value::<PaymentInfo>(response.body) {
            Ok(info) => Ok(Some(info)),
            Err(err) => {
                warn!(
                    order_id,
                    status = response.status,
                    error = %err,
                    "payment info response has an unexpected shape"
                );
                Ok(None)
            }
        }
    }

    pub async fn cancel_payment(
        &self,
        order_id: &str,
        amount: &Money,
    ) -> AppResult<ProviderResponse> {
        let path = format!("payments/{API_VERSION}/cancel");
        let body = PaymentOperation::for_order(order_id, amount);
        self.request(Method::POST, &path, Some(&body)).await
    }

    pub async fn refund_payment(
        &self,
        order_id: &str,
        amount: &Money,
    ) -> AppResult<ProviderResponse> {
        let path = format!("payments/{API_VERSION}/refund");
        let body = PaymentOperation::for_order(order_id, amount);
        self.request(Method::POST, &path, Some(&body)).await
    }
}
