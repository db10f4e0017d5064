mod common;

use common::{TestApp, details, proposal};
use rfq_core::{
    models::{BidRequestStatus, BidStatus, DateTimeRangeQuery},
    ports::{Application, AuctionFailure, BidRepository, BidRequestRepository},
};
use rfq_sqlite::types::{BidId, BidRequestId, DateTime, PartyId};

/// Create an open request and return its id.
async fn open_request(app: &TestApp, warehouse: PartyId) -> anyhow::Result<BidRequestId> {
    let (id, as_of) = app.generate_bid_request_id(&details("packaging"));
    let record = app
        .database()
        .create_bid_request(id, warehouse, details("packaging"), None, None, as_of)
        .await?
        .unwrap();
    Ok(record.id)
}

/// Place a bid quoting `total_price` and return its id.
async fn place_bid(
    app: &TestApp,
    request_id: BidRequestId,
    factory: PartyId,
    total_price: f64,
) -> anyhow::Result<BidId> {
    let (id, as_of) = app.generate_bid_id(&proposal(total_price));
    let record = app
        .database()
        .submit_bid(
            id,
            request_id,
            factory,
            proposal(total_price),
            None,
            None,
            as_of,
        )
        .await?
        .unwrap();
    Ok(record.id)
}

#[tokio::test]
async fn test_submit_precondition_ladder() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let db = app.database();
    let warehouse = app.warehouse("Lakeside Distribution").await?;
    let factory = app.factory("Ridgeline Fabrication").await?;
    let request_id = open_request(&app, warehouse).await?;

    // 1. The request must exist.
    let (bid_id, as_of) = app.generate_bid_id(&proposal(1000.0));
    assert_eq!(
        db.submit_bid(
            bid_id,
            BidRequestId(uuid::Uuid::new_v4()),
            factory,
            proposal(1000.0),
            None,
            None,
            as_of,
        )
        .await?
        .unwrap_err(),
        AuctionFailure::NotFound("bid request")
    );

    // 2. Only factories bid; a warehouse is refused even on a live request.
    let (bid_id, as_of) = app.generate_bid_id(&proposal(1000.0));
    assert_eq!(
        db.submit_bid(
            bid_id,
            request_id,
            warehouse,
            proposal(1000.0),
            None,
            None,
            as_of,
        )
        .await?
        .unwrap_err(),
        AuctionFailure::AccessDenied("only factories may bid")
    );

    // A successful submission fills in the validity and delivery defaults.
    let bid_id = place_bid(&app, request_id, factory, 1000.0).await?;
    let record = db.get_bid(bid_id, factory).await?.unwrap();
    assert_eq!(record.status, BidStatus::Submitted);
    let submitted: time::OffsetDateTime = record.submitted_at.into();
    let valid_until: time::OffsetDateTime = record.valid_until.into();
    let delivery: time::OffsetDateTime = record.estimated_delivery_date.into();
    assert!(valid_until > submitted + time::Duration::days(29));
    assert!(valid_until <= submitted + time::Duration::days(30));
    assert!(delivery > submitted + time::Duration::days(13));
    assert!(delivery <= submitted + time::Duration::days(14));

    // 5. One bid per factory per request, even after withdrawal.
    let (dup_id, as_of) = app.generate_bid_id(&proposal(950.0));
    assert_eq!(
        db.submit_bid(
            dup_id,
            request_id,
            factory,
            proposal(950.0),
            None,
            None,
            as_of,
        )
        .await?
        .unwrap_err(),
        AuctionFailure::Conflict("duplicate bid")
    );
    db.withdraw_bid(bid_id, factory, app.now()).await?.unwrap();
    let (dup_id, as_of) = app.generate_bid_id(&proposal(950.0));
    assert_eq!(
        db.submit_bid(
            dup_id,
            request_id,
            factory,
            proposal(950.0),
            None,
            None,
            as_of,
        )
        .await?
        .unwrap_err(),
        AuctionFailure::Conflict("duplicate bid")
    );

    // 4. Once the deadline passes every submission is refused, even though
    // the request's stored status is still open.
    app.advance(time::Duration::days(8));
    let other = app.factory("Summit Works").await?;
    let (late_id, as_of) = app.generate_bid_id(&proposal(900.0));
    assert_eq!(
        db.submit_bid(
            late_id,
            request_id,
            other,
            proposal(900.0),
            None,
            None,
            as_of,
        )
        .await?
        .unwrap_err(),
        AuctionFailure::InvalidState("deadline passed")
    );

    Ok(())
}

#[tokio::test]
async fn test_settlement_awards_one_winner() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let db = app.database();
    let warehouse = app.warehouse("Lakeside Distribution").await?;
    let rival = app.warehouse("Bayfront Logistics").await?;
    let f1 = app.factory("Ridgeline Fabrication").await?;
    let f2 = app.factory("Summit Works").await?;
    let f3 = app.factory("Cedar Mill").await?;
    let f4 = app.factory("Ironline Industries").await?;
    let request_id = open_request(&app, warehouse).await?;

    let b1 = place_bid(&app, request_id, f1, 1000.0).await?;
    let b2 = place_bid(&app, request_id, f2, 900.0).await?;
    let b3 = place_bid(&app, request_id, f3, 1100.0).await?;

    // The withdrawn bid must be left untouched by the rejection sweep.
    db.withdraw_bid(b3, f3, app.now()).await?.unwrap();

    // Only the warehouse that posted the request may settle it.
    assert_eq!(
        db.accept_bid(b2, rival, app.now()).await?.unwrap_err(),
        AuctionFailure::AccessDenied("not your bid request")
    );
    assert_eq!(
        db.accept_bid(BidId(uuid::Uuid::new_v4()), warehouse, app.now())
            .await?
            .unwrap_err(),
        AuctionFailure::NotFound("bid")
    );

    let outcome = db.accept_bid(b2, warehouse, app.now()).await?.unwrap();
    assert_eq!(outcome.bid.id, b2);
    assert_eq!(outcome.bid.status, BidStatus::Accepted);
    assert_eq!(outcome.rejected_bids, 1); // b1 only; b3 was withdrawn

    let request = db.get_bid_request(request_id, warehouse).await?.unwrap();
    assert_eq!(request.status, BidRequestStatus::Awarded);
    assert_eq!(db.get_bid(b1, f1).await?.unwrap().status, BidStatus::Rejected);
    assert_eq!(db.get_bid(b3, f3).await?.unwrap().status, BidStatus::Withdrawn);

    // At most one accepted bid, ever.
    let bids = db.query_request_bids(request_id, warehouse).await?.unwrap();
    assert_eq!(
        bids.iter()
            .filter(|b| b.status == BidStatus::Accepted)
            .count(),
        1
    );

    // The state guards make retries inert: a second accept of the winner or
    // of a rejected loser is refused without another rejection sweep.
    assert_eq!(
        db.accept_bid(b2, warehouse, app.now()).await?.unwrap_err(),
        AuctionFailure::InvalidState("bid not submitted")
    );
    assert_eq!(
        db.accept_bid(b1, warehouse, app.now()).await?.unwrap_err(),
        AuctionFailure::InvalidState("bid not submitted")
    );

    // The request is settled; no further bids are taken.
    let (late_id, as_of) = app.generate_bid_id(&proposal(800.0));
    assert_eq!(
        db.submit_bid(
            late_id,
            request_id,
            f4,
            proposal(800.0),
            None,
            None,
            as_of,
        )
        .await?
        .unwrap_err(),
        AuctionFailure::InvalidState("request not open")
    );

    Ok(())
}

#[tokio::test]
async fn test_withdraw_guards() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let db = app.database();
    let warehouse = app.warehouse("Lakeside Distribution").await?;
    let f1 = app.factory("Ridgeline Fabrication").await?;
    let f2 = app.factory("Summit Works").await?;
    let request_id = open_request(&app, warehouse).await?;
    let b1 = place_bid(&app, request_id, f1, 1000.0).await?;

    assert_eq!(
        db.withdraw_bid(BidId(uuid::Uuid::new_v4()), f1, app.now())
            .await?
            .unwrap_err(),
        AuctionFailure::NotFound("bid")
    );
    assert_eq!(
        db.withdraw_bid(b1, f2, app.now()).await?.unwrap_err(),
        AuctionFailure::AccessDenied("not your bid")
    );

    let withdrawn = db.withdraw_bid(b1, f1, app.now()).await?.unwrap();
    assert_eq!(withdrawn.status, BidStatus::Withdrawn);

    // Withdrawal is terminal.
    assert_eq!(
        db.withdraw_bid(b1, f1, app.now()).await?.unwrap_err(),
        AuctionFailure::InvalidState("bid not submitted")
    );

    // A rejected bid cannot be withdrawn after the fact either.
    let b2 = place_bid(&app, request_id, f2, 900.0).await?;
    let f3 = app.factory("Cedar Mill").await?;
    let b3 = place_bid(&app, request_id, f3, 950.0).await?;
    db.accept_bid(b3, warehouse, app.now()).await?.unwrap();
    assert_eq!(
        db.withdraw_bid(b2, f2, app.now()).await?.unwrap_err(),
        AuctionFailure::InvalidState("bid not submitted")
    );

    Ok(())
}

#[tokio::test]
async fn test_request_bids_review_ordering() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let db = app.database();
    let warehouse = app.warehouse("Lakeside Distribution").await?;
    let rival = app.warehouse("Bayfront Logistics").await?;
    let request_id = open_request(&app, warehouse).await?;

    let mut bids = Vec::new();
    for (name, price) in [
        ("Ridgeline Fabrication", 1200.0),
        ("Summit Works", 800.0),
        ("Cedar Mill", 1000.0),
    ] {
        let factory = app.factory(name).await?;
        bids.push((place_bid(&app, request_id, factory, price).await?, price));
    }

    assert_eq!(
        db.query_request_bids(BidRequestId(uuid::Uuid::new_v4()), warehouse)
            .await?
            .unwrap_err(),
        AuctionFailure::NotFound("bid request")
    );
    assert_eq!(
        db.query_request_bids(request_id, rival).await?.unwrap_err(),
        AuctionFailure::AccessDenied("not your bid request")
    );

    // Cheapest first: the most competitive offer leads the review.
    let review = db.query_request_bids(request_id, warehouse).await?.unwrap();
    let prices: Vec<f64> = review
        .iter()
        .map(|bid| bid.proposal.pricing.total_price)
        .collect();
    assert_eq!(prices, vec![800.0, 1000.0, 1200.0]);

    Ok(())
}

#[tokio::test]
async fn test_factory_bids_listing() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let db = app.database();
    let warehouse = app.warehouse("Lakeside Distribution").await?;
    let factory = app.factory("Ridgeline Fabrication").await?;

    let mut submitted = Vec::new();
    for _ in 0..3 {
        let request_id = open_request(&app, warehouse).await?;
        submitted.push(place_bid(&app, request_id, factory, 1000.0).await?);
        app.advance(time::Duration::seconds(10));
    }
    submitted.reverse(); // newest first

    let page = db
        .query_factory_bids(factory, DateTimeRangeQuery::default(), 10)
        .await?;
    let ids: Vec<BidId> = page.results.iter().map(|b| b.id).collect();
    assert_eq!(ids, submitted);

    // Each row carries the parent request's summary.
    let summary = page.results[0].bid_request.as_ref().unwrap();
    assert_eq!(summary.product_name, "corrugated shipping boxes");
    assert_eq!(summary.status, BidRequestStatus::Open);

    // Pages chain through the `more` cursor without gaps.
    let mut seen = Vec::new();
    let mut query = DateTimeRangeQuery::<DateTime>::default();
    loop {
        let page = db.query_factory_bids(factory, query, 2).await?;
        seen.extend(page.results.iter().map(|b| b.id));
        match page.more {
            Some(next) => query = next,
            None => break,
        }
    }
    assert_eq!(seen, submitted);

    Ok(())
}
