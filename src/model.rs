//! Model endpoints discoverable via the Models API.
//!
//! [`Model`] wraps one entry of the paged `GET /models` listing and exposes
//! its flattened display metadata, a lazily-fetched price, and a `run`
//! convenience for submitting requests. [`Model::iter`] is the lazy
//! cursor-driven walk over the listing.

use std::collections::VecDeque;

use once_cell::unsync::OnceCell;
use serde::Deserialize;
use serde_json::Value;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::price::Price;
use crate::request::Request;

pub(crate) const MODELS_PATH: &str = "/models";
/// Fixed page size for listing walks.
pub(crate) const PAGE_SIZE: u64 = 50;

/// Display metadata for a model, flattened from the listing's `metadata`
/// object. Every field is optional; the listing omits what it does not know.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelMetadata {
    pub display_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
    pub updated_at: Option<String>,
    pub is_favorited: Option<bool>,
    pub thumbnail_url: Option<String>,
    pub thumbnail_animated_url: Option<String>,
    pub model_url: Option<String>,
    pub github_url: Option<String>,
    pub license_type: Option<String>,
    pub date: Option<String>,
    pub group: Option<Value>,
    pub highlighted: Option<bool>,
    pub kind: Option<String>,
    pub training_endpoint_ids: Option<Vec<String>>,
    pub inference_endpoint_ids: Option<Vec<String>>,
    pub stream_url: Option<String>,
    pub duration_estimate: Option<f64>,
    pub pinned: Option<bool>,
}

/// Wire shape of one `/models` listing entry.
#[derive(Debug, Deserialize)]
pub(crate) struct ModelEntry {
    pub endpoint_id: String,
    #[serde(default)]
    pub metadata: ModelMetadata,
    #[serde(default)]
    pub openapi: Option<Value>,
}

/// Wire shape of one `/models` page.
#[derive(Debug, Deserialize)]
pub(crate) struct ModelsPage {
    #[serde(default)]
    pub models: Vec<ModelEntry>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Search filters for the model listing.
#[derive(Debug, Clone, Default)]
pub struct ModelFilters {
    /// Free-text search query (`q`).
    pub query: Option<String>,
    /// Category filter.
    pub category: Option<String>,
    /// Status filter.
    pub status: Option<String>,
    /// Extra sections to expand in each entry, e.g. `openapi`.
    pub expand: Option<Vec<String>>,
}

/// A model endpoint discoverable via the Models API.
#[derive(Debug, Clone)]
pub struct Model {
    endpoint_id: String,
    metadata: ModelMetadata,
    openapi: Option<Value>,
    client: Client,
    price: OnceCell<Option<Price>>,
}

impl Model {
    pub(crate) fn from_entry(entry: ModelEntry, client: Client) -> Self {
        Self {
            endpoint_id: entry.endpoint_id,
            metadata: entry.metadata,
            openapi: entry.openapi,
            client,
            price: OnceCell::new(),
        }
    }

    /// The endpoint identifier, e.g. `fal-ai/flux/dev`.
    pub fn endpoint_id(&self) -> &str {
        &self.endpoint_id
    }

    /// Flattened display metadata.
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// The OpenAPI document, when the listing was expanded with it.
    pub fn openapi(&self) -> Option<&Value> {
        self.openapi.as_ref()
    }

    /// Fetch and memoize pricing for this model's endpoint.
    ///
    /// Computed at most once per `Model` value and never invalidated. The
    /// cache belongs to this single owner; cloning the model clones the
    /// cache state as of that moment.
    pub fn price(&self) -> Result<Option<&Price>> {
        let cached = self
            .price
            .get_or_try_init(|| Price::find(&self.client, &self.endpoint_id))?;
        Ok(cached.as_ref())
    }

    /// Submit a queued request against this model endpoint.
    pub fn run(&self, input: &Value, webhook_url: Option<&str>) -> Result<Request> {
        Request::submit(&self.client, &self.endpoint_id, input, webhook_url)
    }

    /// Find a specific model by endpoint id.
    pub fn find(client: &Client, endpoint_id: &str) -> Result<Option<Model>> {
        let response = client.api_get(
            MODELS_PATH,
            &[("endpoint_id", endpoint_id.to_string())],
        )?;
        let page: ModelsPage = serde_json::from_value(response)?;
        Ok(page
            .models
            .into_iter()
            .find(|m| m.endpoint_id == endpoint_id)
            .map(|entry| Model::from_entry(entry, client.clone())))
    }

    /// Lazily enumerate models matching `filters`.
    ///
    /// Single pass, not restartable: each call starts a fresh cursor walk.
    /// Pages are fetched on demand as the iterator is advanced; dropping the
    /// iterator early simply stops issuing requests.
    pub fn iter(client: &Client, filters: ModelFilters) -> ModelIter {
        ModelIter {
            client: client.clone(),
            filters,
            cursor: None,
            buffered: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Collect all models matching `filters`.
    pub fn all(client: &Client, filters: ModelFilters) -> Result<Vec<Model>> {
        Self::iter(client, filters).collect()
    }

    /// Collect all models matching a free-text query.
    pub fn search(client: &Client, query: &str) -> Result<Vec<Model>> {
        Self::all(
            client,
            ModelFilters {
                query: Some(query.to_string()),
                ..ModelFilters::default()
            },
        )
    }
}

/// Cursor-driven iterator over the paged `/models` listing.
///
/// Yields every item of every page in server-return order and terminates
/// when a page comes back without a `next_cursor`. A present cursor is
/// passed back verbatim on the following request. The client performs no
/// deduplication; a well-behaved server never repeats items.
#[derive(Debug)]
pub struct ModelIter {
    client: Client,
    filters: ModelFilters,
    cursor: Option<String>,
    buffered: VecDeque<ModelEntry>,
    exhausted: bool,
}

impl ModelIter {
    fn fetch_page(&mut self) -> Result<ModelsPage> {
        let mut query: Vec<(&str, String)> = vec![("limit", PAGE_SIZE.to_string())];
        if let Some(cursor) = &self.cursor {
            query.push(("cursor", cursor.clone()));
        }
        if let Some(q) = &self.filters.query {
            query.push(("q", q.clone()));
        }
        if let Some(category) = &self.filters.category {
            query.push(("category", category.clone()));
        }
        if let Some(status) = &self.filters.status {
            query.push(("status", status.clone()));
        }
        if let Some(expand) = &self.filters.expand {
            for section in expand {
                query.push(("expand", section.clone()));
            }
        }

        let response = self.client.api_get(MODELS_PATH, &query)?;
        serde_json::from_value(response).map_err(Error::from)
    }
}

impl Iterator for ModelIter {
    type Item = Result<Model>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.buffered.pop_front() {
                return Some(Ok(Model::from_entry(entry, self.client.clone())));
            }
            if self.exhausted {
                return None;
            }

            match self.fetch_page() {
                Ok(page) => {
                    self.buffered.extend(page.models);
                    match page.next_cursor {
                        Some(cursor) => self.cursor = Some(cursor),
                        None => self.exhausted = true,
                    }
                }
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
