//! Keepa client against a wiremock server.

use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sedori::adapter::keepa::{KeepaClient, KeepaConfig};
use sedori::domain::Asin;
use sedori::error::{ApiError, Error};
use sedori::port::ProductCatalog;

const KEY: &str = "test-keepa-key-0123456789";

fn client(server: &MockServer) -> KeepaClient {
    let config = KeepaConfig {
        api_url: server.uri(),
        api_key: Some(KEY.into()),
        request_interval_ms: 0,
        ..KeepaConfig::default()
    };
    KeepaClient::new(config).expect("client")
}

/// -1 everywhere except the given indices.
fn series(values: &[(usize, i64)]) -> Vec<i64> {
    let mut series = vec![-1; 19];
    for (i, v) in values {
        series[*i] = *v;
    }
    series
}

fn asin() -> Asin {
    Asin::parse("B00TEST001").expect("asin")
}

#[tokio::test]
async fn product_lookup_maps_stats() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/product"))
        .and(query_param("key", KEY))
        .and(query_param("domain", "5"))
        .and(query_param("stats", "90"))
        .and(query_param("buybox", "1"))
        .and(query_param("asin", "B00TEST001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tokensLeft": 120,
            "products": [{
                "asin": "B00TEST001",
                "title": "Gaming Mouse",
                "stats": {
                    "current": series(&[(0, 4980), (1, 4500)]),
                    "avg90": series(&[(3, 8200)]),
                    "buyBoxPrice": 5200,
                    "buyBoxIsAmazon": true
                },
                "packageWeight": 180
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let product = client(&server)
        .product(&asin())
        .await
        .expect("lookup")
        .expect("product");

    assert_eq!(product.title, "Gaming Mouse");
    assert_eq!(product.avg_rank_90d, Some(8200));
    assert_eq!(product.expected_sell_price, Some(dec!(5200)));
    assert_eq!(product.amazon_current, Some(dec!(4980)));
    assert!(product.buybox_is_amazon);
    assert_eq!(product.weight_kg, Some(dec!(0.18)));
}

#[tokio::test]
async fn empty_product_list_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/product"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "products": [] })))
        .mount(&server)
        .await;

    let product = client(&server).product(&asin()).await.expect("lookup");
    assert!(product.is_none());
}

#[tokio::test]
async fn search_sends_keyword_term() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("type", "product"))
        .and(query_param("term", "エプソン 純正 インク"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{ "asin": "B00TEST002", "title": "エプソン 純正 インク 6色" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let product = client(&server)
        .search("  エプソン 純正 インク ")
        .await
        .expect("search")
        .expect("match");
    assert_eq!(product.asin.as_str(), "B00TEST002");
}

#[tokio::test]
async fn blank_search_skips_the_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert!(client(&server).search("   ").await.expect("search").is_none());
}

#[tokio::test]
async fn rejected_status_carries_keepa_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/product"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": { "type": "notEnoughToken", "message": "Not enough tokens" }
        })))
        .mount(&server)
        .await;

    let err = client(&server).product(&asin()).await.unwrap_err();
    match err {
        Error::Api(ApiError::Rejected {
            service,
            status,
            message,
        }) => {
            assert_eq!(service, "keepa");
            assert_eq!(status, 402);
            assert!(message.contains("notEnoughToken"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn error_in_success_body_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/product"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "type": "invalidParameter", "message": "asin" }
        })))
        .mount(&server)
        .await;

    let err = client(&server).product(&asin()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Api(ApiError::Rejected { status: 200, .. })
    ));
}

#[tokio::test]
async fn unreadable_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/product"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client(&server).product(&asin()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Api(ApiError::Decode {
            service: "keepa",
            ..
        })
    ));
}
