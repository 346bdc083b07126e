use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::AppError;

/// Cotation courante d'un symbole
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
}

/// Source de prix externe (l'oracle)
/// `Ok(None)` = symbole inconnu
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, AppError>;
}

/// Normalise un symbole saisi: trim + majuscules.
/// `None` si vide ou si des caractères inattendus empêchent une recherche.
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim().to_uppercase();
    let valid = !symbol.is_empty()
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');

    valid.then_some(symbol)
}

/// Réponse JSON de l'endpoint /stock/{symbol}/quote (IEX Cloud)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IexQuote {
    company_name: Option<String>,
    latest_price: Option<f64>,
    symbol: String,
}

impl IexQuote {
    fn into_quote(self) -> Option<Quote> {
        let price = Decimal::from_f64(self.latest_price?)?.round_dp(4);
        if price <= Decimal::ZERO {
            return None;
        }

        // Pas de nom → on garde le symbole
        let name = self
            .company_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.symbol.clone());

        Some(Quote {
            symbol: self.symbol.to_uppercase(),
            name,
            price,
        })
    }
}

pub struct IexQuoteProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl IexQuoteProvider {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::QuoteUnavailable(format!("http client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl QuoteProvider for IexQuoteProvider {
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, AppError> {
        let Some(symbol) = normalize_symbol(symbol) else {
            return Ok(None);
        };

        let url = format!("{}/stock/{}/quote", self.base_url, symbol);
        let response = self
            .client
            .get(&url)
            .query(&[("token", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::QuoteUnavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response
            .error_for_status()
            .map_err(|e| AppError::QuoteUnavailable(e.to_string()))?;

        let body: IexQuote = response
            .json()
            .await
            .map_err(|e| AppError::QuoteUnavailable(format!("invalid quote payload: {}", e)))?;

        Ok(body.into_quote())
    }
}
