//! Integration tests for the cars container: lazy keyed caches, request
//! deduplication, client-side year validation, and cache eviction on
//! mutation.

use std::sync::Arc;
use std::time::Duration;

use motoforum_client::client::ApiClient;
use motoforum_client::config::Config;
use motoforum_client::credentials::CredentialStore;
use motoforum_client::error::ApiError;
use motoforum_client::models::{GenerationPayload, ModelPayload};
use motoforum_client::services::CarService;
use motoforum_client::store::CarsStore;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn setup(server: &MockServer) -> (CarsStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let credentials = Arc::new(CredentialStore::new(dir.path()));
    let config = Config {
        api_base_url: server.uri(),
        request_timeout: Duration::from_secs(5),
        credentials_dir: dir.path().to_path_buf(),
    };
    let client = Arc::new(ApiClient::new(&config, credentials));
    (CarsStore::new(CarService::new(client)), dir)
}

fn model_json(id: i64, name: &str, brand_id: i64) -> serde_json::Value {
    json!({"id": id, "model_name": name, "car_brand_id": brand_id})
}

fn generation_json(id: i64, model_id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("Mk{id}"),
        "car_model_id": model_id,
        "start_year": 2000,
        "end_year": null
    })
}

#[tokio::test]
async fn test_ensure_brand_models_fetches_once() {
    let server = MockServer::start().await;
    let (store, _dir) = setup(&server);

    Mock::given(method("GET"))
        .and(path("/brands/7/models"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([model_json(1, "Golf", 7), model_json(2, "Passat", 7)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    store.ensure_brand_models(7).await.expect("ensure failed");
    // Second call hits the populated cache and issues no request.
    store.ensure_brand_models(7).await.expect("ensure failed");

    let state = store.state();
    let names: Vec<&str> = state.brand_models[&7].iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Golf", "Passat"]);
}

#[tokio::test]
async fn test_concurrent_ensure_issues_zero_additional_requests() {
    let server = MockServer::start().await;
    let (store, _dir) = setup(&server);

    Mock::given(method("GET"))
        .and(path("/brands/7/models"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([model_json(1, "Golf", 7)]))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (first, second) = tokio::join!(
        store.ensure_brand_models(7),
        store.ensure_brand_models(7),
    );
    first.expect("first ensure failed");
    second.expect("second ensure failed");

    assert_eq!(store.state().brand_models[&7].len(), 1);
}

#[tokio::test]
async fn test_ensure_model_generations_fetches_once() {
    let server = MockServer::start().await;
    let (store, _dir) = setup(&server);

    Mock::given(method("GET"))
        .and(path("/models/4/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([generation_json(1, 4)])))
        .expect(1)
        .mount(&server)
        .await;

    store.ensure_model_generations(4).await.expect("ensure failed");
    store.ensure_model_generations(4).await.expect("ensure failed");

    assert_eq!(store.state().model_generations[&4].len(), 1);
}

#[tokio::test]
async fn test_failed_ensure_allows_retry() {
    let server = MockServer::start().await;
    let (store, _dir) = setup(&server);

    Mock::given(method("GET"))
        .and(path("/brands/7/models"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let err = store.ensure_brand_models(7).await.unwrap_err();
    assert_eq!(err.to_string(), "boom");
    assert_eq!(store.state().error.as_deref(), Some("boom"));

    // The entry was never populated and nothing is in flight, so a retry
    // issues a fresh request.
    Mock::given(method("GET"))
        .and(path("/brands/7/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([model_json(1, "Golf", 7)])))
        .expect(1)
        .mount(&server)
        .await;

    store.ensure_brand_models(7).await.expect("retry failed");
    assert_eq!(store.state().brand_models[&7].len(), 1);
}

#[tokio::test]
async fn test_invalid_year_range_fails_before_any_request() {
    let server = MockServer::start().await;
    let (store, _dir) = setup(&server);

    Mock::given(method("POST"))
        .and(path("/generations"))
        .respond_with(ResponseTemplate::new(201).set_body_json(generation_json(1, 4)))
        .expect(0)
        .mount(&server)
        .await;

    let err = store
        .create_generation(&GenerationPayload {
            name: "B3".to_string(),
            car_model_id: 4,
            start_year: 1990,
            end_year: Some(1985),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert!(store.state().error.is_some());
}

#[tokio::test]
async fn test_model_create_evicts_brand_cache_entry() {
    let server = MockServer::start().await;
    let (store, _dir) = setup(&server);

    Mock::given(method("GET"))
        .and(path("/brands/7/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([model_json(1, "Golf", 7)])))
        .mount(&server)
        .await;
    store.ensure_brand_models(7).await.unwrap();
    assert!(store.state().brand_models.contains_key(&7));

    Mock::given(method("POST"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(201).set_body_json(model_json(3, "Arteon", 7)))
        .mount(&server)
        .await;

    store
        .create_model(&ModelPayload {
            name: "Arteon".to_string(),
            car_brand_id: 7,
        })
        .await
        .unwrap();

    let state = store.state();
    // The stale children list is evicted; the next ensure refetches it.
    assert!(!state.brand_models.contains_key(&7));
    assert!(state.models.iter().any(|m| m.id == 3));
}

#[tokio::test]
async fn test_model_delete_evicts_entries_holding_it() {
    let server = MockServer::start().await;
    let (store, _dir) = setup(&server);

    Mock::given(method("GET"))
        .and(path("/brands/7/models"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([model_json(1, "Golf", 7), model_json(2, "Passat", 7)])),
        )
        .mount(&server)
        .await;
    store.ensure_brand_models(7).await.unwrap();

    Mock::given(method("GET"))
        .and(path("/models/2/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([generation_json(5, 2)])))
        .mount(&server)
        .await;
    store.ensure_model_generations(2).await.unwrap();

    Mock::given(method("DELETE"))
        .and(path("/models/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .mount(&server)
        .await;
    store.delete_model(2).await.unwrap();

    let state = store.state();
    assert!(!state.brand_models.contains_key(&7));
    // The deleted model's own children cache goes with it.
    assert!(!state.model_generations.contains_key(&2));
}

#[tokio::test]
async fn test_generation_create_evicts_model_cache_entry() {
    let server = MockServer::start().await;
    let (store, _dir) = setup(&server);

    Mock::given(method("GET"))
        .and(path("/models/4/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([generation_json(1, 4)])))
        .mount(&server)
        .await;
    store.ensure_model_generations(4).await.unwrap();

    Mock::given(method("POST"))
        .and(path("/generations"))
        .respond_with(ResponseTemplate::new(201).set_body_json(generation_json(2, 4)))
        .mount(&server)
        .await;

    store
        .create_generation(&GenerationPayload {
            name: "Mk2".to_string(),
            car_model_id: 4,
            start_year: 2010,
            end_year: Some(2016),
        })
        .await
        .unwrap();

    let state = store.state();
    assert!(!state.model_generations.contains_key(&4));
    assert!(state.generations.iter().any(|g| g.id == 2));
}

#[tokio::test]
async fn test_brand_delete_evicts_its_children_entry() {
    let server = MockServer::start().await;
    let (store, _dir) = setup(&server);

    Mock::given(method("GET"))
        .and(path("/brands"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "brand_name": "VW", "category_id": 1},
            {"id": 8, "brand_name": "Audi", "category_id": 1}
        ])))
        .mount(&server)
        .await;
    store.fetch_brands().await.unwrap();

    Mock::given(method("GET"))
        .and(path("/brands/7/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([model_json(1, "Golf", 7)])))
        .mount(&server)
        .await;
    store.ensure_brand_models(7).await.unwrap();

    Mock::given(method("DELETE"))
        .and(path("/brands/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .mount(&server)
        .await;
    store.delete_brand(7).await.unwrap();

    let state = store.state();
    let ids: Vec<i64> = state.brands.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![8]);
    assert!(!state.brand_models.contains_key(&7));
}
