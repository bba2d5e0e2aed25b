//! API integration tests
//!
//! Each test spawns the router on an ephemeral port with its own store.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use media_catalog_server::{
    api,
    models::MediaItem,
    repository::{items::ItemsRepository, Repository},
    AppState,
};

fn book(name: &str, author: &str, date: &str, category: &str) -> MediaItem {
    MediaItem {
        name: name.to_string(),
        author: author.to_string(),
        date_published: date.to_string(),
        category: category.to_string(),
        available: true,
    }
}

fn sample_catalog() -> ItemsRepository {
    ItemsRepository::with_items(vec![
        book("Emma", "Jane Austen", "1815", "Fiction"),
        book("Cosmos", "Carl Sagan", "1980", "Science"),
        book("Anathem", "Neal Stephenson", "2008", "SciFi"),
        book("Persuasion", "Jane Austen", "1817", "fiction"),
    ])
    .expect("valid sample catalog")
}

/// Start a server and return its base URL
async fn spawn_app(items: ItemsRepository) -> String {
    let state = AppState::new(Repository::new(items));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        axum::serve(listener, api::create_router(state))
            .await
            .expect("Server failed");
    });

    format!("http://{}", addr)
}

fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("Expected an array")
        .iter()
        .map(|b| b["name"].as_str().expect("No name").to_string())
        .collect()
}

#[tokio::test]
async fn test_index() {
    let base = spawn_app(ItemsRepository::new()).await;

    let response = Client::new()
        .get(&base)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let text = response.text().await.expect("Failed to read body");
    assert!(text.contains("Library API is running!"));
}

#[tokio::test]
async fn test_health_check() {
    let base = spawn_app(ItemsRepository::new()).await;

    let body: Value = Client::new()
        .get(format!("{}/health", base))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_sort() {
    let base = spawn_app(sample_catalog()).await;
    let client = Client::new();

    let by_year: Value = client
        .get(format!("{}/sort?by=year", base))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(names(&by_year), ["Emma", "Persuasion", "Cosmos", "Anathem"]);

    // byte order: "Fiction" < "SciFi" < "Science" < "fiction"
    let by_category: Value = client
        .get(format!("{}/sort?by=category", base))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(names(&by_category), ["Emma", "Anathem", "Cosmos", "Persuasion"]);

    let unknown: Value = client
        .get(format!("{}/sort?by=title", base))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(names(&unknown), ["Emma", "Cosmos", "Anathem", "Persuasion"]);
    assert_eq!(unknown[0]["available"], true);
}

#[tokio::test]
async fn test_sort_key_from_json_body() {
    let base = spawn_app(sample_catalog()).await;

    let body: Value = Client::new()
        .get(format!("{}/sort", base))
        .json(&json!({ "by": "year" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(names(&body), ["Emma", "Persuasion", "Cosmos", "Anathem"]);
}

#[tokio::test]
async fn test_search_get_and_post() {
    let base = spawn_app(sample_catalog()).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/search", base))
        .query(&[("query", "austen"), ("category", "FICTION"), ("year", "181")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(names(&body), ["Emma", "Persuasion"]);

    let body: Value = client
        .post(format!("{}/search", base))
        .json(&json!({ "query": "a", "category": "sci" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(names(&body), ["Cosmos", "Anathem"]);

    let everything: Value = client
        .post(format!("{}/search", base))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(names(&everything).len(), 4);
}

#[tokio::test]
async fn test_malformed_json_on_read_endpoints() {
    let base = spawn_app(sample_catalog()).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/search", base))
        .header("content-type", "application/json")
        .body(r#"{"query": "emma""#)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);

    let response = client
        .get(format!("{}/sort", base))
        .header("content-type", "application/json")
        .body(r#"{"by": "#)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);

    // empty JSON body still means "no filters"
    let response = client
        .post(format!("{}/search", base))
        .header("content-type", "application/json")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(names(&body).len(), 4);
}

#[tokio::test]
async fn test_repeated_query_keys_use_first_value() {
    let base = spawn_app(sample_catalog()).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/sort?by=year&by=category", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(names(&body), ["Emma", "Persuasion", "Cosmos", "Anathem"]);

    let response = client
        .get(format!("{}/search?query=cosmos&query=emma", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(names(&body), ["Cosmos"]);
}

#[tokio::test]
async fn test_add_validation_and_duplicates() {
    let base = spawn_app(sample_catalog()).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/media", base))
        .json(&json!({ "name": "Dune", "author": "Herbert", "date_published": "1965" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "All fields are required.");

    let response = client
        .post(format!("{}/media", base))
        .json(&json!({
            "name": "EMMA",
            "author": "Someone",
            "date_published": "2000",
            "category": "Fiction"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book already exists.");

    let response = client
        .post(format!("{}/media", base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_rent_requires_book_name() {
    let base = spawn_app(sample_catalog()).await;

    let response = Client::new()
        .post(format!("{}/rent", base))
        .json(&json!({ "book_name": "  " }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book name required.");
}

#[tokio::test]
async fn test_unknown_book_is_404() {
    let base = spawn_app(sample_catalog()).await;
    let client = Client::new();

    for path in ["rent", "return"] {
        let response = client
            .post(format!("{}/{}", base, path))
            .json(&json!({ "book_name": "Missing" }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    let response = client
        .delete(format!("{}/media/Missing", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book not found.");
}

#[tokio::test]
async fn test_dune_lifecycle() {
    let base = spawn_app(ItemsRepository::new()).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/media", base))
        .json(&json!({
            "name": "Dune",
            "author": "Herbert",
            "date_published": "1965",
            "category": "SciFi"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);

    let response = client
        .post(format!("{}/rent", base))
        .json(&json!({ "book_name": "dune" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "You have rented 'Dune'!");

    let listed: Value = client
        .get(format!("{}/sort", base))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(listed[0]["available"], false);

    let response = client
        .post(format!("{}/rent", base))
        .json(&json!({ "book_name": "Dune" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book is already rented.");

    let response = client
        .post(format!("{}/return", base))
        .json(&json!({ "book_name": "Dune" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "You have returned 'Dune'!");

    let response = client
        .post(format!("{}/return", base))
        .json(&json!({ "book_name": "Dune" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .delete(format!("{}/media/DUNE", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let found: Value = client
        .get(format!("{}/search?query=dune", base))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(names(&found).is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_rent_single_winner() {
    let base = spawn_app(sample_catalog()).await;
    let client = Client::new();

    let handles: Vec<_> = (0..12)
        .map(|_| {
            let client = client.clone();
            let url = format!("{}/rent", base);
            tokio::spawn(async move {
                client
                    .post(url)
                    .json(&json!({ "book_name": "Cosmos" }))
                    .send()
                    .await
                    .expect("Failed to send request")
                    .status()
            })
        })
        .collect();

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.expect("Task panicked"));
    }

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
    assert_eq!(
        statuses
            .iter()
            .filter(|s| **s == StatusCode::BAD_REQUEST)
            .count(),
        11
    );
}
