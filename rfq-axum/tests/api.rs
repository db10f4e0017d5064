use axum::http::StatusCode;
use axum_test::TestServer;
use rfq_axum::{config::AxumConfig, router};
use rfq_core::{
    models::{Location, PartyDetails, PartyRole},
    ports::PartyRepository as _,
};
use rfq_sqlite::{Db, config::SqliteConfig, types::PartyId};
use serde_json::{Value, json};

mod app;
use app::TestApp;

async fn server_with(config: AxumConfig) -> (TestServer, Db) {
    let db = Db::open(&SqliteConfig::default()).await.unwrap();
    let server = TestServer::new(router(TestApp(db.clone()), config)).unwrap();
    (server, db)
}

async fn server() -> (TestServer, Db) {
    server_with(AxumConfig::default()).await
}

async fn register(db: &Db, role: PartyRole, name: &str) -> PartyId {
    let id = PartyId(uuid::Uuid::new_v4());
    db.upsert_party(
        id,
        PartyDetails {
            role,
            name: name.into(),
            location: Location {
                address: "12 Harbor Rd".into(),
                latitude: 41.5,
                longitude: -81.7,
            },
            rating: None,
        },
        time::OffsetDateTime::now_utc().into(),
    )
    .await
    .unwrap();
    id
}

fn request_body() -> Value {
    json!({
        "product_name": "corrugated shipping boxes",
        "category": "packaging",
        "quantity": 100,
        "specifications": {
            "description": "double-wall, 60x40x40cm",
            "delivery_location": {
                "address": "1 Depot Way",
                "city": "Dayton",
                "state": "OH",
                "latitude": 39.76,
                "longitude": -84.19
            }
        },
        "budget": { "min_price": 800.0, "max_price": 1500.0, "preferred_price": 1100.0 }
    })
}

fn bid_body(total_price: f64) -> Value {
    json!({
        "pricing": {
            "unit_price": total_price / 100.0,
            "total_price": total_price,
            "payment_terms": "net 30"
        },
        "delivery": {
            "delivery_method": "ground freight",
            "shipping_cost": 75.0,
            "production_time_in_days": 14
        },
        "quality_assurance": {
            "quality_guarantee": "full replacement on defects"
        },
        "factory_capacity": {
            "current_capacity": 0.4,
            "max_capacity": 1.0,
            "experience_years": 12
        },
        "proposal": {
            "message": "we can start production this week",
            "value_proposition": "fastest turnaround in the region"
        }
    })
}

#[test_log::test(tokio::test)]
async fn test_health_and_docs() {
    let (server, _db) = server().await;

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "ok");

    let response = server.get("/docs/api.json").await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["info"]["title"],
        "Procurement Auction API"
    );
}

#[test_log::test(tokio::test)]
async fn test_party_directory_admin_gate() {
    let (server, _db) = server().await;
    let party_id = uuid::Uuid::new_v4();
    let details = json!({
        "role": "warehouse",
        "name": "Lakeside Distribution",
        "location": { "address": "12 Harbor Rd", "latitude": 41.5, "longitude": -81.7 }
    });

    // Writing the directory needs the admin token.
    let response = server
        .put(&format!("/party/{party_id}"))
        .authorization_bearer(party_id.to_string())
        .json(&details)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = server
        .put(&format!("/party/{party_id}"))
        .authorization_bearer("admin")
        .json(&details)
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    // Any trader can read it back.
    let response = server
        .get(&format!("/party/{party_id}"))
        .authorization_bearer(party_id.to_string())
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["name"], "Lakeside Distribution");

    let response = server
        .get(&format!("/party/{}", uuid::Uuid::new_v4()))
        .authorization_bearer(party_id.to_string())
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["kind"], "not_found");

    // A token that is not a party uuid has no trading identity.
    let response = server
        .get(&format!("/party/{party_id}"))
        .authorization_bearer("not-a-uuid")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[test_log::test(tokio::test)]
async fn test_auction_flow_over_http() {
    let (server, db) = server().await;
    let warehouse = register(&db, PartyRole::Warehouse, "Lakeside Distribution").await;
    let rival = register(&db, PartyRole::Warehouse, "Bayfront Logistics").await;
    let f1 = register(&db, PartyRole::Factory, "Ridgeline Fabrication").await;
    let f2 = register(&db, PartyRole::Factory, "Summit Works").await;

    // The warehouse posts a request.
    let response = server
        .post("/bid-request")
        .authorization_bearer(warehouse.to_string())
        .json(&request_body())
        .await;
    response.assert_status(StatusCode::CREATED);
    let request = response.json::<Value>();
    let request_id = request["id"].as_str().unwrap().to_owned();
    assert_eq!(request["status"], "open");

    // Factories see it in the open listing, with the warehouse joined.
    let response = server
        .get("/bid-request")
        .authorization_bearer(f1.to_string())
        .await;
    response.assert_status_ok();
    let listing = response.json::<Value>();
    assert_eq!(listing["results"].as_array().unwrap().len(), 1);
    assert_eq!(
        listing["results"][0]["warehouse"]["name"],
        "Lakeside Distribution"
    );

    // Both factories bid; a duplicate is refused with a conflict body.
    let response = server
        .post(&format!("/bid-request/{request_id}/bids"))
        .authorization_bearer(f1.to_string())
        .json(&bid_body(1200.0))
        .await;
    response.assert_status(StatusCode::CREATED);
    let b1 = response.json::<Value>()["id"].as_str().unwrap().to_owned();

    let response = server
        .post(&format!("/bid-request/{request_id}/bids"))
        .authorization_bearer(f1.to_string())
        .json(&bid_body(1100.0))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["kind"], "conflict");

    let response = server
        .post(&format!("/bid-request/{request_id}/bids"))
        .authorization_bearer(f2.to_string())
        .json(&bid_body(900.0))
        .await;
    response.assert_status(StatusCode::CREATED);
    let b2 = response.json::<Value>()["id"].as_str().unwrap().to_owned();

    // The review is owner-only and cheapest first.
    let response = server
        .get(&format!("/bid-request/{request_id}/bids"))
        .authorization_bearer(rival.to_string())
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = server
        .get(&format!("/bid-request/{request_id}/bids"))
        .authorization_bearer(warehouse.to_string())
        .await;
    response.assert_status_ok();
    let review = response.json::<Value>();
    let totals: Vec<f64> = review
        .as_array()
        .unwrap()
        .iter()
        .map(|bid| bid["pricing"]["total_price"].as_f64().unwrap())
        .collect();
    assert_eq!(totals, vec![900.0, 1200.0]);

    // Settlement is owner-only.
    let response = server
        .post(&format!("/bid/{b2}/accept"))
        .authorization_bearer(rival.to_string())
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = server
        .post(&format!("/bid/{b2}/accept"))
        .authorization_bearer(warehouse.to_string())
        .await;
    response.assert_status_ok();
    let outcome = response.json::<Value>();
    assert_eq!(outcome["bid"]["status"], "accepted");
    assert_eq!(outcome["rejected_bids"], 1);

    // Accepting again is refused by the state guard, with a kind distinct
    // from the duplicate-bid conflict above.
    let response = server
        .post(&format!("/bid/{b2}/accept"))
        .authorization_bearer(warehouse.to_string())
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["kind"], "invalid_state");

    // The loser sees its bid rejected, with the request summary attached.
    let response = server
        .get(&format!("/bid/{b1}"))
        .authorization_bearer(f1.to_string())
        .await;
    response.assert_status_ok();
    let losing = response.json::<Value>();
    assert_eq!(losing["status"], "rejected");
    assert_eq!(losing["bid_request"]["status"], "awarded");

    // And the warehouse's own listing reflects the award.
    let response = server
        .get("/bid-request/mine")
        .authorization_bearer(warehouse.to_string())
        .await;
    response.assert_status_ok();
    let mine = response.json::<Value>();
    assert_eq!(mine["results"][0]["status"], "awarded");
    assert_eq!(mine["results"][0]["bid_count"], 2);
}

#[test_log::test(tokio::test)]
async fn test_validation_and_role_errors() {
    let (server, db) = server().await;
    let warehouse = register(&db, PartyRole::Warehouse, "Lakeside Distribution").await;
    let factory = register(&db, PartyRole::Factory, "Ridgeline Fabrication").await;

    // A factory may not post requests.
    let response = server
        .post("/bid-request")
        .authorization_bearer(factory.to_string())
        .json(&request_body())
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["kind"], "access_denied");

    // A past deadline is a validation refusal, not a clamp.
    let mut body = request_body();
    body["bidding_deadline"] = json!("2020-01-01T00:00:00Z");
    let response = server
        .post("/bid-request")
        .authorization_bearer(warehouse.to_string())
        .json(&body)
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["kind"], "validation");

    // A zero quantity never reaches the engine; the typed body rejects it.
    let mut body = request_body();
    body["quantity"] = json!(0);
    let response = server
        .post("/bid-request")
        .authorization_bearer(warehouse.to_string())
        .json(&body)
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[test_log::test(tokio::test)]
async fn test_open_listing_pagination() {
    let (server, db) = server_with(AxumConfig {
        page_limit: 2,
        ..Default::default()
    })
    .await;
    let warehouse = register(&db, PartyRole::Warehouse, "Lakeside Distribution").await;

    for _ in 0..5 {
        let response = server
            .post("/bid-request")
            .authorization_bearer(warehouse.to_string())
            .json(&request_body())
            .await;
        response.assert_status(StatusCode::CREATED);
        // distinct creation times give the listing a stable order
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let mut seen = 0;
    let mut path = "/bid-request".to_owned();
    loop {
        let response = server
            .get(&path)
            .authorization_bearer(warehouse.to_string())
            .await;
        response.assert_status_ok();
        let page = response.json::<Value>();
        let results = page["results"].as_array().unwrap();
        assert!(results.len() <= 2);
        seen += results.len();
        match page["more"]["before"].as_str() {
            Some(before) => path = format!("/bid-request?before={before}"),
            None => break,
        }
    }
    assert_eq!(seen, 5);
}
