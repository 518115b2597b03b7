//! Mercado Pago client for PIX payments.
//!
//! # API Reference
//!
//! - Base URL: `https://api.mercadopago.com`
//! - Authentication: `Authorization: Bearer <access token>`
//! - Each request carries a fresh `X-Idempotency-Key`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use terminal_cafe_core::PaymentId;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{PaymentArtifact, PaymentError, PaymentGateway};
use crate::config::MercadoPagoConfig;
use crate::order::Order;

const PAYMENT_DESCRIPTION: &str = "Terminal Café - Order";
const PAYMENT_METHOD: &str = "pix";

#[derive(Debug, Serialize)]
struct PaymentRequest<'a> {
    #[serde(with = "rust_decimal::serde::float")]
    transaction_amount: Decimal,
    description: &'a str,
    payment_method_id: &'a str,
    payer: Payer<'a>,
}

#[derive(Debug, Serialize)]
struct Payer<'a> {
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct PaymentResponse {
    id: Option<i64>,
    status: Option<String>,
    #[serde(default)]
    point_of_interaction: Option<PointOfInteraction>,
}

#[derive(Debug, Deserialize)]
struct PointOfInteraction {
    #[serde(default)]
    transaction_data: Option<TransactionData>,
}

#[derive(Debug, Deserialize)]
struct TransactionData {
    #[serde(default)]
    qr_code: Option<String>,
    #[serde(default)]
    qr_code_base64: Option<String>,
}

impl From<PaymentResponse> for PaymentArtifact {
    fn from(response: PaymentResponse) -> Self {
        let data = response
            .point_of_interaction
            .and_then(|poi| poi.transaction_data);
        let (code, encoded) = data.map_or((None, None), |d| (d.qr_code, d.qr_code_base64));

        Self {
            payment_id: response.id.map(PaymentId::new),
            scannable_code: code.unwrap_or_default(),
            scannable_code_encoded: encoded.unwrap_or_default(),
        }
    }
}

/// Mercado Pago payments client.
#[derive(Clone)]
pub struct MercadoPagoClient {
    inner: Arc<MercadoPagoClientInner>,
}

struct MercadoPagoClientInner {
    client: reqwest::Client,
    api_url: String,
    access_token: SecretString,
}

impl std::fmt::Debug for MercadoPagoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MercadoPagoClient")
            .field("api_url", &self.inner.api_url)
            .field("access_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl MercadoPagoClient {
    /// Create a new Mercado Pago client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &MercadoPagoConfig) -> Result<Self, PaymentError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            inner: Arc::new(MercadoPagoClientInner {
                client,
                api_url: config.api_url.trim_end_matches('/').to_string(),
                access_token: config.access_token.clone(),
            }),
        })
    }

    /// Parse error response from the Mercado Pago API.
    async fn parse_error(response: reqwest::Response) -> PaymentError {
        let status = response.status().as_u16();
        if status == 401 {
            return PaymentError::Unauthorized;
        }

        let message = response.text().await.unwrap_or_default();
        PaymentError::Api { status, message }
    }
}

fn payment_request(order: &Order) -> PaymentRequest<'_> {
    PaymentRequest {
        transaction_amount: order.total_with_shipping().rounded(),
        description: PAYMENT_DESCRIPTION,
        payment_method_id: PAYMENT_METHOD,
        payer: Payer {
            email: order.customer.email.as_str(),
        },
    }
}

#[async_trait]
impl PaymentGateway for MercadoPagoClient {
    #[instrument(skip(self, order), fields(amount = %order.total_with_shipping()))]
    async fn create_payment(&self, order: &Order) -> Result<PaymentArtifact, PaymentError> {
        let response = self
            .inner
            .client
            .post(format!("{}/v1/payments", self.inner.api_url))
            .bearer_auth(self.inner.access_token.expose_secret())
            .header("X-Idempotency-Key", Uuid::new_v4().to_string())
            .json(&payment_request(order))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::parse_error(response).await);
        }

        let payment: PaymentResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Parse(format!("Failed to parse response: {e}")))?;

        debug!(id = ?payment.id, status = ?payment.status, "Payment created");
        Ok(payment.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use terminal_cafe_core::{Customer, DwellingType, Email, PostalCode, Price, ProductId, TaxId};

    use super::*;
    use crate::catalog::CatalogEntry;
    use crate::order::LineItem;
    use crate::services::ShippingQuote;

    fn order() -> Order {
        Order {
            items: vec![LineItem {
                entry: CatalogEntry {
                    id: ProductId::new(1),
                    name: "Espresso".to_string(),
                    category: "Coffee".to_string(),
                    price: Price::from_centavos(500),
                    description: String::new(),
                },
                quantity: 2,
            }],
            customer: Customer {
                email: Email::parse("ana@example.com").unwrap(),
                tax_id: TaxId::parse("12345678901").unwrap(),
                phone: "11999990000".to_string(),
                postal_code: PostalCode::parse("01310100").unwrap(),
                street: "Av. Paulista".to_string(),
                number: "1000".to_string(),
                dwelling: DwellingType::House,
                unit: None,
                complement: None,
            },
            shipping: ShippingQuote {
                service: "PAC".to_string(),
                price: Price::from_centavos(1000),
                deadline_days: 5,
            },
        }
    }

    #[test]
    fn test_request_charges_total_with_shipping() {
        let order = order();
        let json = serde_json::to_value(payment_request(&order)).unwrap();

        assert_eq!(json["transaction_amount"], serde_json::json!(20.0));
        assert_eq!(json["payment_method_id"], "pix");
        assert_eq!(json["payer"]["email"], "ana@example.com");
    }

    #[test]
    fn test_artifact_from_full_response() {
        let response: PaymentResponse = serde_json::from_str(
            r#"{
                "id": 123456789,
                "status": "pending",
                "point_of_interaction": {
                    "transaction_data": {
                        "qr_code": "00020126580014br.gov.bcb.pix",
                        "qr_code_base64": "iVBORw0KGgo="
                    }
                }
            }"#,
        )
        .unwrap();

        let artifact = PaymentArtifact::from(response);
        assert_eq!(artifact.payment_id, Some(PaymentId::new(123_456_789)));
        assert_eq!(artifact.scannable_code, "00020126580014br.gov.bcb.pix");
        assert_eq!(artifact.scannable_code_encoded, "iVBORw0KGgo=");
        assert!(artifact.is_payable());
    }

    #[test]
    fn test_artifact_without_pix_data() {
        let response: PaymentResponse =
            serde_json::from_str(r#"{"id": 1, "status": "rejected"}"#).unwrap();

        let artifact = PaymentArtifact::from(response);
        assert!(artifact.scannable_code.is_empty());
        assert!(!artifact.is_payable());
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = MercadoPagoClient::new(&MercadoPagoConfig {
            api_url: "https://api.mercadopago.com".to_string(),
            access_token: SecretString::from("APP_USR-very-private-token"),
        })
        .unwrap();

        let debug = format!("{client:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("very-private-token"));
    }
}
