//! Correios shipping-rate client.
//!
//! Every quote is for the same parcel: one 500 g coffee package,
//! 16 x 12 x 8 cm, sent with PAC from the store's CEP.
//!
//! # API Reference
//!
//! - Base URL: `https://api.correios.com.br`
//! - Authentication: contract code + password (HTTP basic) exchanged for a
//!   bearer token at `/token/v1/autentica`
//! - Price: `/preco/v1/nacional/{service}`, deadline: `/prazo/v1/nacional/{service}`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use terminal_cafe_core::{PostalCode, Price};
use tracing::{debug, instrument};
use url::Url;

use super::{ShippingError, ShippingQuote, ShippingRates};
use crate::config::CorreiosConfig;

/// PAC service code.
const SERVICE_CODE: &str = "04510";
const SERVICE_NAME: &str = "PAC";

/// Fixed parcel profile.
const PACKAGE_WEIGHT_GRAMS: &str = "500";
const PACKAGE_LENGTH_CM: &str = "16";
const PACKAGE_WIDTH_CM: &str = "12";
const PACKAGE_HEIGHT_CM: &str = "8";
/// Object type 2 = box/package.
const PACKAGE_FORMAT: &str = "2";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceResponse {
    pc_final: Option<String>,
    tx_erro: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeadlineResponse {
    prazo_entrega: Option<u32>,
    tx_erro: Option<String>,
}

/// Correios API client.
#[derive(Clone)]
pub struct CorreiosClient {
    inner: Arc<CorreiosClientInner>,
}

struct CorreiosClientInner {
    client: reqwest::Client,
    api_url: String,
    company_code: String,
    password: SecretString,
    origin: PostalCode,
}

impl std::fmt::Debug for CorreiosClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorreiosClient")
            .field("api_url", &self.inner.api_url)
            .field("company_code", &self.inner.company_code)
            .field("password", &"[REDACTED]")
            .field("origin", &self.inner.origin)
            .finish_non_exhaustive()
    }
}

impl CorreiosClient {
    /// Create a new Correios client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CorreiosConfig) -> Result<Self, ShippingError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ShippingError::Request(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(CorreiosClientInner {
                client,
                api_url: config.api_url.trim_end_matches('/').to_string(),
                company_code: config.company_code.clone(),
                password: config.password.clone(),
                origin: config.origin.clone(),
            }),
        })
    }

    /// Exchange the contract credentials for a bearer token.
    async fn authenticate(&self) -> Result<String, ShippingError> {
        let response = self
            .inner
            .client
            .post(format!("{}/token/v1/autentica", self.inner.api_url))
            .basic_auth(
                &self.inner.company_code,
                Some(self.inner.password.expose_secret()),
            )
            .send()
            .await
            .map_err(|e| ShippingError::Request(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(ShippingError::Auth(format!("Correios returned {status}")));
        }

        let token: TokenResponse = Self::handle_response(response).await?;
        Ok(token.token)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url, token: &str) -> Result<T, ShippingError> {
        let response = self
            .inner
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ShippingError::Request(e.to_string()))?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ShippingError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ShippingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ShippingError::Parse(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl ShippingRates for CorreiosClient {
    #[instrument(skip(self), fields(destination = %destination))]
    async fn quote(&self, destination: &PostalCode) -> Result<ShippingQuote, ShippingError> {
        let token = self.authenticate().await?;

        let price_url = price_url(&self.inner.api_url, &self.inner.origin, destination)?;
        let deadline_url = deadline_url(&self.inner.api_url, &self.inner.origin, destination)?;

        let price: PriceResponse = self.get(price_url, &token).await?;
        let deadline: DeadlineResponse = self.get(deadline_url, &token).await?;

        let quote = quote_from(price, deadline)?;
        debug!(price = %quote.price, days = quote.deadline_days, "Shipping quoted");
        Ok(quote)
    }
}

fn price_url(
    base: &str,
    origin: &PostalCode,
    destination: &PostalCode,
) -> Result<Url, ShippingError> {
    Url::parse_with_params(
        &format!("{base}/preco/v1/nacional/{SERVICE_CODE}"),
        &[
            ("cepOrigem", origin.as_str()),
            ("cepDestino", destination.as_str()),
            ("psObjeto", PACKAGE_WEIGHT_GRAMS),
            ("tpObjeto", PACKAGE_FORMAT),
            ("comprimento", PACKAGE_LENGTH_CM),
            ("largura", PACKAGE_WIDTH_CM),
            ("altura", PACKAGE_HEIGHT_CM),
        ],
    )
    .map_err(|e| ShippingError::Request(format!("Invalid Correios URL: {e}")))
}

fn deadline_url(
    base: &str,
    origin: &PostalCode,
    destination: &PostalCode,
) -> Result<Url, ShippingError> {
    Url::parse_with_params(
        &format!("{base}/prazo/v1/nacional/{SERVICE_CODE}"),
        &[
            ("cepOrigem", origin.as_str()),
            ("cepDestino", destination.as_str()),
        ],
    )
    .map_err(|e| ShippingError::Request(format!("Invalid Correios URL: {e}")))
}

/// Combine the price and deadline answers into a quote.
fn quote_from(
    price: PriceResponse,
    deadline: DeadlineResponse,
) -> Result<ShippingQuote, ShippingError> {
    let reported = [price.tx_erro.as_deref(), deadline.tx_erro.as_deref()];
    if let Some(error) = reported.into_iter().flatten().find(|e| !e.is_empty()) {
        return Err(ShippingError::Unavailable(error.to_string()));
    }

    let amount = price
        .pc_final
        .ok_or_else(|| ShippingError::Parse("missing pcFinal".to_string()))?;
    let price =
        Price::parse_brl(&amount).map_err(|e| ShippingError::Parse(format!("pcFinal: {e}")))?;
    let deadline_days = deadline
        .prazo_entrega
        .ok_or_else(|| ShippingError::Parse("missing prazoEntrega".to_string()))?;

    Ok(ShippingQuote {
        service: SERVICE_NAME.to_string(),
        price,
        deadline_days,
    })
}
