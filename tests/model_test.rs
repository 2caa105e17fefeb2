//! Integration tests for the model catalog.

mod common;

use common::{api_url, queue_url, test_client};
use fal::adapters::mock::{MockResponse, MockTransport};
use fal::{Model, ModelFilters, RequestStatus};
use serde_json::json;

fn entry(endpoint_id: &str) -> serde_json::Value {
    json!({
        "endpoint_id": endpoint_id,
        "metadata": {"display_name": endpoint_id, "category": "text-to-image"}
    })
}

#[test]
fn iter_walks_the_cursor_across_pages() {
    let mock = MockTransport::new();
    mock.push_response(
        &api_url("/models?limit=50"),
        MockResponse::json(
            &json!({"models": [entry("fal-ai/a"), entry("fal-ai/b")], "next_cursor": "X"})
                .to_string(),
        ),
    );
    mock.push_response(
        &api_url("/models?limit=50&cursor=X"),
        MockResponse::json(&json!({"models": [entry("fal-ai/c")], "next_cursor": null}).to_string()),
    );
    let client = test_client(&mock);

    let models = Model::all(&client, ModelFilters::default()).unwrap();

    let ids: Vec<&str> = models.iter().map(Model::endpoint_id).collect();
    assert_eq!(ids, vec!["fal-ai/a", "fal-ai/b", "fal-ai/c"]);
    assert_eq!(mock.request_count_matching("/models"), 2);
    assert_eq!(mock.requests()[0].url, api_url("/models?limit=50"));
    assert_eq!(mock.requests()[1].url, api_url("/models?limit=50&cursor=X"));
}

#[test]
fn iter_fetches_pages_only_as_needed() {
    let mock = MockTransport::new();
    mock.push_response(
        &api_url("/models?limit=50"),
        MockResponse::json(
            &json!({"models": [entry("fal-ai/a"), entry("fal-ai/b")], "next_cursor": "X"})
                .to_string(),
        ),
    );
    let client = test_client(&mock);

    let taken: Vec<_> = Model::iter(&client, ModelFilters::default())
        .take(2)
        .collect::<fal::Result<Vec<_>>>()
        .unwrap();

    assert_eq!(taken.len(), 2);
    // The second page was never requested.
    assert_eq!(mock.request_count_matching("/models"), 1);
}

#[test]
fn filters_are_encoded_into_the_listing_query() {
    let mock = MockTransport::new();
    mock.set_default_response(MockResponse::json(
        &json!({"models": [], "next_cursor": null}).to_string(),
    ));
    let client = test_client(&mock);

    let filters = ModelFilters {
        query: Some("flux".to_string()),
        category: Some("text-to-image".to_string()),
        status: Some("active".to_string()),
        expand: Some(vec!["openapi".to_string()]),
    };
    Model::all(&client, filters).unwrap();

    assert_eq!(
        mock.requests()[0].url,
        api_url("/models?limit=50&q=flux&category=text-to-image&status=active&expand=openapi")
    );
}

#[test]
fn search_queries_by_free_text() {
    let mock = MockTransport::new();
    mock.push_response(
        &api_url("/models?limit=50&q=whisper"),
        MockResponse::json(
            &json!({"models": [entry("fal-ai/whisper")], "next_cursor": null}).to_string(),
        ),
    );
    let client = test_client(&mock);

    let models = Model::search(&client, "whisper").unwrap();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].endpoint_id(), "fal-ai/whisper");
}

#[test]
fn find_returns_the_matching_entry() {
    let mock = MockTransport::new();
    mock.push_response(
        &api_url("/models?endpoint_id=fal-ai%2Fflux%2Fdev"),
        MockResponse::json(
            &json!({"models": [entry("fal-ai/flux/dev")], "next_cursor": null}).to_string(),
        ),
    );
    let client = test_client(&mock);

    let model = Model::find(&client, "fal-ai/flux/dev").unwrap().unwrap();
    assert_eq!(model.endpoint_id(), "fal-ai/flux/dev");
    assert_eq!(
        model.metadata().display_name.as_deref(),
        Some("fal-ai/flux/dev")
    );
}

#[test]
fn find_returns_none_when_absent() {
    let mock = MockTransport::new();
    mock.set_default_response(MockResponse::json(
        &json!({"models": [], "next_cursor": null}).to_string(),
    ));
    let client = test_client(&mock);

    assert!(Model::find(&client, "fal-ai/missing").unwrap().is_none());
}

#[test]
fn run_submits_a_queued_request() {
    let mock = MockTransport::new();
    mock.push_response(
        &api_url("/models?endpoint_id=fal-ai%2Fflux%2Fdev"),
        MockResponse::json(
            &json!({"models": [entry("fal-ai/flux/dev")], "next_cursor": null}).to_string(),
        ),
    );
    mock.push_response(
        &queue_url("/fal-ai/flux/dev"),
        MockResponse::json(r#"{"request_id":"req-1"}"#),
    );
    let client = test_client(&mock);

    let model = Model::find(&client, "fal-ai/flux/dev").unwrap().unwrap();
    let request = model.run(&json!({"prompt": "hi"}), None).unwrap();

    assert_eq!(request.id(), Some("req-1"));
    assert_eq!(request.status(), Some(RequestStatus::InQueue));
    assert_eq!(mock.requests()[1].url, queue_url("/fal-ai/flux/dev"));
}

#[test]
fn price_is_fetched_once_and_memoized() {
    let mock = MockTransport::new();
    mock.push_response(
        &api_url("/models?endpoint_id=fal-ai%2Fflux%2Fdev"),
        MockResponse::json(
            &json!({"models": [entry("fal-ai/flux/dev")], "next_cursor": null}).to_string(),
        ),
    );
    mock.push_response(
        &api_url("/models/pricing?endpoint_id=fal-ai%2Fflux%2Fdev"),
        MockResponse::json(
            &json!({"prices": [{
                "endpoint_id": "fal-ai/flux/dev",
                "unit_price": 0.025,
                "unit": "megapixels",
                "currency": "USD"
            }]})
            .to_string(),
        ),
    );
    let client = test_client(&mock);

    let model = Model::find(&client, "fal-ai/flux/dev").unwrap().unwrap();

    let price = model.price().unwrap().unwrap();
    assert_eq!(price.unit_price, 0.025);
    let again = model.price().unwrap().unwrap();
    assert_eq!(again.unit_price, 0.025);

    assert_eq!(mock.request_count_matching("/models/pricing"), 1);
}

#[test]
fn unpriced_model_memoizes_the_absence() {
    let mock = MockTransport::new();
    mock.push_response(
        &api_url("/models?endpoint_id=fal-ai%2Ffree"),
        MockResponse::json(&json!({"models": [entry("fal-ai/free")], "next_cursor": null}).to_string()),
    );
    mock.push_response(
        &api_url("/models/pricing?endpoint_id=fal-ai%2Ffree"),
        MockResponse::json(r#"{"prices": []}"#),
    );
    let client = test_client(&mock);

    let model = Model::find(&client, "fal-ai/free").unwrap().unwrap();
    assert!(model.price().unwrap().is_none());
    assert!(model.price().unwrap().is_none());
    assert_eq!(mock.request_count_matching("/models/pricing"), 1);
}
