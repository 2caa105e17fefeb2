//! Pricing information for model endpoints.
//!
//! [`Price`] wraps one entry of `GET /models/pricing`. [`Price::iter`]
//! walks the paged `/models` listing and fans out one batched pricing
//! lookup per page.

use std::collections::VecDeque;

use serde::Deserialize;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::model::{ModelsPage, MODELS_PATH, PAGE_SIZE};

pub(crate) const PRICING_PATH: &str = "/models/pricing";

/// Billing unit reported by the pricing service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceUnit {
    /// Output-based units
    Image,
    Video,
    Megapixels,
    /// Compute-based units (provider-specific)
    GpuSecond,
    GpuMinute,
    GpuHour,
    /// Units introduced after this crate was published.
    #[serde(untagged)]
    Other(String),
}

/// Pricing for one model endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Price {
    /// The endpoint this price applies to.
    pub endpoint_id: String,
    /// Price per unit.
    pub unit_price: f64,
    /// Billing unit.
    pub unit: PriceUnit,
    /// ISO currency code.
    pub currency: String,
}

/// Wire shape of a pricing response.
#[derive(Debug, Deserialize)]
struct PricingResponse {
    #[serde(default)]
    prices: Vec<Price>,
}

impl Price {
    /// Find pricing for a specific endpoint.
    pub fn find(client: &Client, endpoint_id: &str) -> Result<Option<Price>> {
        let response = client.api_get(
            PRICING_PATH,
            &[("endpoint_id", endpoint_id.to_string())],
        )?;
        let pricing: PricingResponse = serde_json::from_value(response)?;
        Ok(pricing
            .prices
            .into_iter()
            .find(|p| p.endpoint_id == endpoint_id))
    }

    /// Lazily enumerate pricing for every listed model.
    ///
    /// Walks `/models` cursor by cursor; for each non-empty page, issues
    /// exactly one batched `GET /models/pricing?endpoint_id=...` with that
    /// page's ids and yields its prices before advancing the cursor. An
    /// empty page skips the pricing call entirely.
    pub fn iter(client: &Client) -> PriceIter {
        PriceIter {
            client: client.clone(),
            cursor: None,
            buffered: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Collect pricing for every listed model.
    pub fn all(client: &Client) -> Result<Vec<Price>> {
        Self::iter(client).collect()
    }
}

/// Paged fan-out iterator over model pricing.
#[derive(Debug)]
pub struct PriceIter {
    client: Client,
    cursor: Option<String>,
    buffered: VecDeque<Price>,
    exhausted: bool,
}

impl PriceIter {
    /// Fetch the next listing page and its batched pricing, if any.
    fn fetch_page(&mut self) -> Result<Vec<Price>> {
        let mut query: Vec<(&str, String)> = vec![("limit", PAGE_SIZE.to_string())];
        if let Some(cursor) = &self.cursor {
            query.push(("cursor", cursor.clone()));
        }

        let response = self.client.api_get(MODELS_PATH, &query)?;
        let page: ModelsPage = serde_json::from_value(response)?;

        match page.next_cursor {
            Some(cursor) => self.cursor = Some(cursor),
            None => self.exhausted = true,
        }

        let endpoint_ids: Vec<(&str, String)> = page
            .models
            .iter()
            .map(|m| ("endpoint_id", m.endpoint_id.clone()))
            .collect();
        if endpoint_ids.is_empty() {
            return Ok(Vec::new());
        }

        let pricing = self.client.api_get(PRICING_PATH, &endpoint_ids)?;
        let pricing: PricingResponse = serde_json::from_value(pricing).map_err(Error::from)?;
        Ok(pricing.prices)
    }
}

impl Iterator for PriceIter {
    type Item = Result<Price>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(price) = self.buffered.pop_front() {
                return Some(Ok(price));
            }
            if self.exhausted {
                return None;
            }

            match self.fetch_page() {
                Ok(prices) => self.buffered.extend(prices),
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_unit_wire_names() {
        assert_eq!(
            serde_json::from_value::<PriceUnit>(json!("image")).unwrap(),
            PriceUnit::Image
        );
        assert_eq!(
            serde_json::from_value::<PriceUnit>(json!("gpu_second")).unwrap(),
            PriceUnit::GpuSecond
        );
        assert_eq!(
            serde_json::from_value::<PriceUnit>(json!("token")).unwrap(),
            PriceUnit::Other("token".to_string())
        );
    }

    #[test]
    fn test_price_deserializes() {
        let price: Price = serde_json::from_value(json!({
            "endpoint_id": "fal-ai/flux/dev",
            "unit_price": 0.025,
            "unit": "megapixels",
            "currency": "USD"
        }))
        .unwrap();
        assert_eq!(price.endpoint_id, "fal-ai/flux/dev");
        assert_eq!(price.unit, PriceUnit::Megapixels);
        assert_eq!(price.currency, "USD");
    }
}
