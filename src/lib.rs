//! Rust client for the fal.ai model-inference queue.
//!
//! Submits jobs to fal model endpoints, polls or streams their progress,
//! and browses the model catalog with pricing. Everything is synchronous
//! and blocking: each operation completes its network round-trip(s) on the
//! calling thread, with no background delivery.
//!
//! # Example
//!
//! ```no_run
//! use fal::{Client, Request};
//! use serde_json::json;
//!
//! fn main() -> fal::Result<()> {
//!     let client = Client::from_env()?; // reads FAL_KEY
//!
//!     let mut request = Request::submit(
//!         &client,
//!         "fal-ai/flux/dev",
//!         &json!({"prompt": "a cat wearing a top hat"}),
//!         None,
//!     )?;
//!
//!     while !request.completed() {
//!         std::thread::sleep(std::time::Duration::from_secs(1));
//!         request.reload(false)?;
//!     }
//!     println!("{:?}", request.response());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod price;
pub mod price_estimate;
pub mod request;
pub mod sse;
pub mod traits;
pub mod webhook;

pub use client::Client;
pub use config::Config;
pub use error::{Error, Result};
pub use model::{Model, ModelFilters, ModelIter, ModelMetadata};
pub use price::{Price, PriceIter, PriceUnit};
pub use price_estimate::{EndpointUsage, EstimateType, PriceEstimate};
pub use request::{Request, RequestStatus};
pub use sse::{EventStream, SseDecoder, SseEvent};
pub use webhook::{WebhookPayload, WebhookStatus};
