//! Integration tests for the REST surface
//!
//! Drives the composed actix service the way the UI does: submit, mine,
//! poll, and checks status codes plus JSON shapes.

use actix_web::{test, web, App};
use serde_json::Value;

use chaincore::{api, Node, NodeConfig};

fn test_node() -> web::Data<Node> {
    let config = NodeConfig {
        difficulty: 1,
        mining_reward: 5.0,
    };
    web::Data::new(Node::new(config).expect("failed to create node"))
}

macro_rules! test_app {
    ($node:expr) => {
        test::init_service(
            App::new()
                .app_data($node.clone())
                .configure(api::configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn blockchain_endpoints_on_fresh_node() {
    let node = test_node();
    let app = test_app!(node);

    let chain: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/blockchain/chain").to_request(),
    )
    .await;
    assert_eq!(chain.as_array().unwrap().len(), 1);

    let latest: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/blockchain/latest").to_request(),
    )
    .await;
    assert_eq!(latest["index"], 0);
    assert_eq!(latest["previous_hash"], "0");

    let genesis: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/blockchain/block/0")
            .to_request(),
    )
    .await;
    assert_eq!(genesis["index"], 0);

    let missing = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/blockchain/block/42")
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), 404);
    let body: Value = test::read_body_json(missing).await;
    assert!(body["error"].is_string());

    let valid: bool = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/blockchain/isValid")
            .to_request(),
    )
    .await;
    assert!(valid);

    let length: usize = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/blockchain/length")
            .to_request(),
    )
    .await;
    assert_eq!(length, 1);
}

#[actix_web::test]
async fn transaction_submit_mine_and_query_cycle() {
    let node = test_node();
    let app = test_app!(node);

    // Mining an empty pool is rejected
    let response = test::call_service(
        &app,
        test::TestRequest::post().uri("/mining/mine").to_request(),
    )
    .await;
    assert_eq!(response.status(), 400);

    // Submit a transaction
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/transaction/create")
            .set_json(serde_json::json!({
                "sender": "alice",
                "recipient": "bob",
                "amount": 12.5,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), 201);

    let pending: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/transaction/pending")
            .to_request(),
    )
    .await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    // Mine it
    let mined: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post().uri("/mining/mine").to_request(),
    )
    .await;
    assert_eq!(mined["block"]["index"], 1);
    assert!(mined["block"]["hash"].as_str().unwrap().starts_with('0'));

    // Pool drained, chain grew, transaction confirmed
    let pending: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/transaction/pending")
            .to_request(),
    )
    .await;
    assert!(pending.as_array().unwrap().is_empty());

    let length: usize = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/blockchain/length")
            .to_request(),
    )
    .await;
    assert_eq!(length, 2);

    let confirmed: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/transaction/all").to_request(),
    )
    .await;
    let confirmed = confirmed.as_array().unwrap();
    // Submitted transaction plus the synthesized reward
    assert_eq!(confirmed.len(), 2);
    assert_eq!(confirmed[0]["sender"], "alice");
    assert_eq!(confirmed[1]["sender"], "0");

    // Invalid submissions are rejected
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/transaction/create")
            .set_json(serde_json::json!({
                "sender": "alice",
                "recipient": "bob",
                "amount": -1.0,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), 400);
}

#[actix_web::test]
async fn token_endpoints() {
    let node = test_node();
    let app = test_app!(node);

    let balance: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/token/balance?address=alice")
            .to_request(),
    )
    .await;
    assert_eq!(balance["balance"], 0);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/token/mint?to=alice&amount=10")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), 200);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/token/transfer?from=alice&to=bob&amount=4")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), 200);

    let balance: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/token/balance?address=bob")
            .to_request(),
    )
    .await;
    assert_eq!(balance["balance"], 4);

    // Overspend is rejected and changes nothing
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/token/transfer?from=alice&to=bob&amount=100")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), 400);

    let balance: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/token/balance?address=alice")
            .to_request(),
    )
    .await;
    assert_eq!(balance["balance"], 6);

    // Zero amount is rejected
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/token/mint?to=alice&amount=0")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), 400);
}

#[actix_web::test]
async fn peer_endpoints() {
    let node = test_node();
    let app = test_app!(node);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/peer/add?address=10.0.0.1:8080")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), 200);

    // Duplicate add succeeds silently
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/peer/add?address=10.0.0.1:8080")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), 200);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/peer/add?address=not-an-address")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), 400);

    let peers: Vec<String> = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/peer/list").to_request(),
    )
    .await;
    assert_eq!(peers, vec!["10.0.0.1:8080"]);
}

#[actix_web::test]
async fn wallet_endpoints() {
    let node = test_node();
    let app = test_app!(node);

    let address: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/wallet/address").to_request(),
    )
    .await;
    let initial_address = address["address"].as_str().unwrap().to_string();
    assert!(!initial_address.is_empty());

    let created = test::call_service(
        &app,
        test::TestRequest::post().uri("/wallet/create").to_request(),
    )
    .await;
    assert_eq!(created.status(), 201);
    let created: Value = test::read_body_json(created).await;
    let new_address = created["address"].as_str().unwrap().to_string();
    assert_ne!(new_address, initial_address);
    assert!(created["privateKey"].is_string());
    assert!(created["publicKey"].is_string());

    // The node wallet was replaced
    let address: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/wallet/address").to_request(),
    )
    .await;
    assert_eq!(address["address"], new_address.as_str());

    // Sign with the node wallet, then verify through the API
    let signed: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/wallet/sign")
            .set_payload("hello")
            .to_request(),
    )
    .await;
    let signature = signed["signature"].as_str().unwrap();

    let verify_uri = format!(
        "/wallet/verify?publicKey={}&data=hello&signature={}",
        new_address, signature
    );
    let verified: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post().uri(&verify_uri).to_request(),
    )
    .await;
    assert_eq!(verified["isValid"], true);

    // Tampered data fails verification
    let verify_uri = format!(
        "/wallet/verify?publicKey={}&data=hello!&signature={}",
        new_address, signature
    );
    let verified: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post().uri(&verify_uri).to_request(),
    )
    .await;
    assert_eq!(verified["isValid"], false);

    // Undecodable key is a 400, not a false
    let verify_uri = format!(
        "/wallet/verify?publicKey=0OIl&data=hello&signature={}",
        signature
    );
    let response = test::call_service(
        &app,
        test::TestRequest::post().uri(&verify_uri).to_request(),
    )
    .await;
    assert_eq!(response.status(), 400);
}

#[actix_web::test]
async fn health_and_stats_reflect_node_state() {
    let node = test_node();
    let app = test_app!(node);

    let health: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/health").to_request(),
    )
    .await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["blockHeight"], 1);
    assert_eq!(health["pendingTransactions"], 0);
    assert_eq!(health["peers"], 0);
    assert_eq!(health["isValid"], true);

    // Change some state
    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/transaction/create")
            .set_json(serde_json::json!({
                "sender": "alice",
                "recipient": "bob",
                "amount": 1.0,
            }))
            .to_request(),
    )
    .await;
    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/peer/add?address=10.0.0.1:8080")
            .to_request(),
    )
    .await;

    let stats: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/stats").to_request(),
    )
    .await;
    assert_eq!(stats["totalBlocks"], 1);
    assert_eq!(stats["totalTransactions"], 0);
    assert_eq!(stats["pendingTransactions"], 1);
    assert_eq!(stats["connectedPeers"], 1);
    assert!(stats["tokenSupply"].is_number());
}
