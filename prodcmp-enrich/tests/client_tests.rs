//! HTTP client tests against a local mock server

use prodcmp_common::config::{AliHunterConfig, RapidApiConfig, ReviewsConfig};
use prodcmp_enrich::clients::{
    AliExpressClient, AliHunterClient, FeedbackReviewClient, LookupClient, LookupError,
    ReviewLookup,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn hunter_client(server: &MockServer) -> AliHunterClient {
    let config = AliHunterConfig {
        endpoint: format!("{}/api/search/image", server.uri()),
        ..Default::default()
    };
    AliHunterClient::new(config, TIMEOUT).unwrap()
}

fn express_client(server: &MockServer, key: Option<&str>) -> AliExpressClient {
    AliExpressClient::new(
        &RapidApiConfig::default(),
        key.map(str::to_string),
        TIMEOUT,
    )
    .unwrap()
    .with_base_url(server.uri())
}

// ============================================================================
// AliHunter
// ============================================================================

#[tokio::test]
async fn test_alihunter_posts_search_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/search/image"))
        .and(body_json(json!({
            "image_url": "https://shop/1.jpg",
            "search_type": "same",
            "currency": "USD",
            "lang": "en",
            "ship_to": "US"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "ret": true,
                "data": {"data": [
                    {"product_id": "100", "product_main_image_url": "https://img/100.jpg", "evaluate_rate": "97%"},
                    {"product_id": "101", "product_main_image_url": "https://img/101.jpg"}
                ]}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let products = hunter_client(&server)
        .search_by_image("https://shop/1.jpg")
        .await
        .unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].product_id, "100");
    assert_eq!(products[0].evaluate_rate, "97%");
    assert_eq!(products[1].evaluate_rate, "");
}

#[tokio::test]
async fn test_alihunter_ret_false_is_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"ret": false}
        })))
        .mount(&server)
        .await;

    let err = hunter_client(&server)
        .search_by_image("https://shop/1.jpg")
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::Upstream(_)));
}

#[tokio::test]
async fn test_alihunter_server_error_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = hunter_client(&server)
        .search_by_image("https://shop/1.jpg")
        .await
        .unwrap_err();
    match err {
        LookupError::Status(code, body) => {
            assert_eq!(code, 500);
            assert_eq!(body, "overloaded");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_alihunter_garbage_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = hunter_client(&server)
        .search_by_image("https://shop/1.jpg")
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::Parse(_)));
}

// ============================================================================
// AliExpress (RapidAPI)
// ============================================================================

#[tokio::test]
async fn test_aliexpress_sends_key_host_and_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/item_search_image"))
        .and(query_param("sort", "default"))
        .and(query_param("catId", "0"))
        .and(query_param("imgUrl", "https://shop/1.jpg?v=2&size=large"))
        .and(header("X-RapidAPI-Key", "test-key"))
        .and(header("X-RapidAPI-Host", "aliexpress-datahub.p.rapidapi.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"resultList": [
                {"item": {
                    "itemId": 1005001,
                    "title": "Lamp",
                    "sales": 87,
                    "itemUrl": "//www.aliexpress.com/item/1005001.html",
                    "image": "//ae01.alicdn.com/kf/1.jpg",
                    "sku": {"def": {"price": 20.0, "promotionPrice": 15.5}},
                    "averageStarRate": "4.8"
                }}
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let products = express_client(&server, Some("test-key"))
        .search_by_image("https://shop/1.jpg?v=2&size=large")
        .await
        .unwrap();

    assert_eq!(products.len(), 1);
    let product = &products[0];
    assert_eq!(product.id, "1005001");
    assert_eq!(product.image_url, "https://ae01.alicdn.com/kf/1.jpg");
    assert_eq!(product.volume, 87);
    assert_eq!(product.sale_price, 15.5);
    assert_eq!(product.original_price, 20.0);
    assert_eq!(product.avg_rating_star, Some(4.8));
}

#[tokio::test]
async fn test_aliexpress_without_key_never_calls_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = express_client(&server, None)
        .search_by_image("https://shop/1.jpg")
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::MissingApiKey));
}

#[tokio::test]
async fn test_aliexpress_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too many requests"))
        .mount(&server)
        .await;

    let err = express_client(&server, Some("test-key"))
        .search_by_image("https://shop/1.jpg")
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::Status(429, _)));
}

// ============================================================================
// Review counts
// ============================================================================

#[tokio::test]
async fn test_review_count_formatted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pc/searchEvaluation.do"))
        .and(query_param("productId", "1005001"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"totalNum": 256}
        })))
        .mount(&server)
        .await;

    let config = ReviewsConfig {
        endpoint: format!("{}/pc/searchEvaluation.do", server.uri()),
    };
    let client = FeedbackReviewClient::new(&config, TIMEOUT).unwrap();

    assert_eq!(client.review_count("1005001").await.unwrap(), "256 ratings");
}

#[tokio::test]
async fn test_review_count_failure_surfaces() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = ReviewsConfig {
        endpoint: format!("{}/pc/searchEvaluation.do", server.uri()),
    };
    let client = FeedbackReviewClient::new(&config, TIMEOUT).unwrap();

    let err = client.review_count("1").await.unwrap_err();
    assert!(matches!(err, LookupError::Status(503, _)));
}
