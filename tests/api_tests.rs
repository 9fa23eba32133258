use actix_web::{test, web, App};
use art_auction::config::Config;
use art_auction::domain::{AuctionType, CommandSuccess};
use art_auction::web::app::{configure_app, init_app_state};
use art_auction::web::types::AddAuctionRequest;
use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Value};
use uuid::Uuid;
#[path="utils/mod.rs"] mod utils;
use utils::*;

fn jwt_payload(sub: &str) -> String {
    general_purpose::STANDARD.encode(json!({ "sub": sub }).to_string())
}

fn create_body() -> Value {
    json!({
        "card": { "id": 100, "artist": "Yoko", "auctionType": "FixedPrice" },
        "auctioneer": 1,
        "players": [
            { "id": 1, "name": "Player 1", "money": 100 },
            { "id": 2, "name": "Player 2", "money": 50 },
            { "id": 3, "name": "Player 3", "money": 50 }
        ],
        "fixedPrice": 30
    })
}

#[::core::prelude::v1::test]
fn test_add_auction_request_deserialization() {
    let request: AddAuctionRequest = serde_json::from_value(create_body()).unwrap();
    assert_eq!(request.card, sample_card(AuctionType::FixedPrice));
    assert_eq!(request.fixed_price, Some(30));
    assert_eq!(request.countdown_secs, None);

    match request.to_command(Uuid::nil(), sample_now(), 12) {
        art_auction::domain::Command::CreateAuction { settings, auctioneer, .. } => {
            assert_eq!(settings.open.countdown_secs, 12);
            assert_eq!(settings.fixed_price, Some(30));
            assert_eq!(auctioneer, 1);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[actix_web::test]
async fn test_fixed_price_sale_over_http() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(init_app_state()))
            .app_data(web::Data::new(Config::default()))
            .configure(configure_app),
    )
    .await;

    let req = test::TestRequest::post().uri("/auctions").set_json(create_body()).to_request();
    let created: CommandSuccess = test::call_and_read_body_json(&app, req).await;
    let auction_id = match created {
        CommandSuccess::AuctionCreated { auction_id, .. } => auction_id,
        other => panic!("unexpected {:?}", other),
    };

    let req = test::TestRequest::get()
        .uri(&format!("/auctions/{}", auction_id))
        .insert_header(("x-jwt-payload", jwt_payload("2")))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["status"]["currentActor"], 2);
    assert_eq!(detail["validActions"], json!(["Buy", "Pass"]));

    let req = test::TestRequest::post()
        .uri(&format!("/auctions/{}/actions", auction_id))
        .insert_header(("x-jwt-payload", jwt_payload("2")))
        .set_json(json!({ "$type": "Buy" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::post()
        .uri(&format!("/auctions/{}/conclude", auction_id))
        .to_request();
    let concluded: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(concluded["result"]["winner"], 2);
    assert_eq!(concluded["result"]["salePrice"], 30);
    assert_eq!(concluded["players"][0]["money"], 130);
    assert_eq!(concluded["players"][1]["money"], 20);

    let req = test::TestRequest::get().uri("/auctions").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list.as_array().map(|a| a.len()), Some(1));
    assert_eq!(list[0]["status"]["phase"], "Sold");
}

#[actix_web::test]
async fn test_actions_require_auth_and_known_auction() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(init_app_state()))
            .app_data(web::Data::new(Config::default()))
            .configure(configure_app),
    )
    .await;

    let req = test::TestRequest::post().uri("/auctions").set_json(create_body()).to_request();
    let created: CommandSuccess = test::call_and_read_body_json(&app, req).await;
    let auction_id = match created {
        CommandSuccess::AuctionCreated { auction_id, .. } => auction_id,
        other => panic!("unexpected {:?}", other),
    };

    let req = test::TestRequest::post()
        .uri(&format!("/auctions/{}/actions", auction_id))
        .set_json(json!({ "$type": "Buy" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);

    let req = test::TestRequest::post()
        .uri(&format!("/auctions/{}/actions", Uuid::nil()))
        .insert_header(("x-jwt-payload", jwt_payload("2")))
        .set_json(json!({ "$type": "Buy" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);

    // Player 3 is not next in turn
    let req = test::TestRequest::post()
        .uri(&format!("/auctions/{}/actions", auction_id))
        .insert_header(("x-jwt-payload", jwt_payload("3")))
        .set_json(json!({ "$type": "Buy" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let req = test::TestRequest::post()
        .uri(&format!("/auctions/{}/conclude", auction_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_out_of_range_countdown_is_a_bad_request() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(init_app_state()))
            .app_data(web::Data::new(Config::default()))
            .configure(configure_app),
    )
    .await;

    let mut body = create_body();
    body["card"]["auctionType"] = json!("Open");
    body["countdownSecs"] = json!(i64::MAX);
    let req = test::TestRequest::post().uri("/auctions").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let req = test::TestRequest::get().uri("/auctions").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let list: Value = test::read_body_json(resp).await;
    assert_eq!(list, json!([]));
}
