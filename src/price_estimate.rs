//! Cost estimates from the Platform API.
//!
//! [`PriceEstimate::create`] posts usage quantities per endpoint to
//! `POST /models/pricing/estimate` and returns the computed total.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::client::Client;
use crate::error::Result;

const ESTIMATE_PATH: &str = "/models/pricing/estimate";

/// Supported estimate types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateType {
    /// Estimate from historical per-call API prices.
    HistoricalApiPrice,
    /// Estimate from published unit prices.
    UnitPrice,
}

/// Usage quantities for one endpoint in an estimate request.
#[derive(Debug, Clone, Default)]
pub struct EndpointUsage {
    /// The endpoint to estimate.
    pub endpoint_id: String,
    /// Number of calls.
    pub call_quantity: Option<u64>,
    /// Number of billing units.
    pub unit_quantity: Option<f64>,
}

impl EndpointUsage {
    /// Usage expressed as a call count.
    pub fn calls(endpoint_id: impl Into<String>, call_quantity: u64) -> Self {
        Self {
            endpoint_id: endpoint_id.into(),
            call_quantity: Some(call_quantity),
            unit_quantity: None,
        }
    }

    /// Usage expressed as a billing-unit count.
    pub fn units(endpoint_id: impl Into<String>, unit_quantity: f64) -> Self {
        Self {
            endpoint_id: endpoint_id.into(),
            call_quantity: None,
            unit_quantity: Some(unit_quantity),
        }
    }
}

/// A computed cost estimate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceEstimate {
    /// The estimate type the server applied.
    pub estimate_type: EstimateType,
    /// Total estimated cost.
    pub total_cost: f64,
    /// ISO currency code.
    pub currency: String,
}

impl PriceEstimate {
    /// Create a new cost estimate for the given endpoint usages.
    ///
    /// For `unit_price` estimates a usage given only as a call quantity is
    /// sent as `unit_quantity` (the quantities are aliases there); every
    /// other estimate type sends `call_quantity`.
    pub fn create(
        client: &Client,
        estimate_type: EstimateType,
        endpoints: &[EndpointUsage],
    ) -> Result<PriceEstimate> {
        let mut endpoint_map = Map::new();
        for usage in endpoints {
            let quantity = match (usage.unit_quantity, usage.call_quantity) {
                (Some(units), _) => json!(units),
                (None, Some(calls)) => json!(calls),
                (None, None) => Value::Null,
            };
            let key = match estimate_type {
                EstimateType::UnitPrice => "unit_quantity",
                _ => "call_quantity",
            };
            endpoint_map.insert(usage.endpoint_id.clone(), json!({ key: quantity }));
        }

        let payload = json!({
            "estimate_type": estimate_type,
            "endpoints": endpoint_map,
        });

        let response = client.api_post(ESTIMATE_PATH, &payload)?;
        serde_json::from_value(response).map_err(Into::into)
    }
}
