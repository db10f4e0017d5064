//! REST API endpoints for the bid side of the auction.
//!
//! Factories track and withdraw their own bids here, and the owning
//! warehouse settles an auction by accepting one. Submission lives under
//! the parent request's routes (`/bid-request/{id}/bids`).

use crate::{ApiApplication, ApiError, config::AxumConfig};
use aide::axum::{
    ApiRouter,
    routing::{get, post},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use rfq_core::{
    models::{BidRecord, DateTimeRangeQuery, DateTimeRangeResponse, SettlementOutcome},
    ports::{BidRepository as _, Repository},
};
use std::sync::Arc;

/// Creates a router with bid endpoints.
pub fn router<T: ApiApplication>() -> ApiRouter<T> {
    ApiRouter::new()
        .api_route_with("/", get(list_my_bids::<T>), |route| {
            route.security_requirement("jwt").tag("bid")
        })
        .api_route_with(
            "/{bid_id}",
            get(get_bid::<T>).delete(withdraw_bid::<T>),
            |route| route.security_requirement("jwt").tag("bid"),
        )
        .api_route_with("/{bid_id}/accept", post(accept_bid::<T>), |route| {
            route.security_requirement("jwt").tag("bid")
        })
}

/// Path parameter for bid-specific endpoints.
#[derive(serde::Deserialize, schemars::JsonSchema)]
#[schemars(inline)]
struct Id<T> {
    /// The unique identifier of the bid
    bid_id: T,
}

/// Page through every bid the caller has placed, newest first.
///
/// Each row carries a summary of its parent request, so a factory can see
/// what each bid was against without a second lookup.
///
/// # Returns
///
/// - `200 OK`: A page of the caller's bids
/// - `401 Unauthorized`: No trading identity in the token
/// - `500 Internal Server Error`: Database query failed
async fn list_my_bids<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(config): Extension<Arc<AxumConfig>>,
    Query(query): Query<DateTimeRangeQuery<<T::Repository as Repository>::DateTime>>,
) -> Result<
    Json<DateTimeRangeResponse<BidRecord<T::Repository>, <T::Repository as Repository>::DateTime>>,
    ApiError,
> {
    let caller = app
        .can_trade(&auth)
        .await
        .ok_or_else(ApiError::unauthorized)?;
    let page = app
        .database()
        .query_factory_bids(caller, query, config.page_limit)
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(page))
}

/// Retrieve a single bid.
///
/// Visible to the factory that placed it and to the warehouse that owns the
/// parent request.
///
/// # Returns
///
/// - `200 OK`: The bid
/// - `401 Unauthorized`: No trading identity in the token
/// - `403 Forbidden`: The caller is neither party to the bid
/// - `404 Not Found`: No such bid
/// - `500 Internal Server Error`: Database query failed
async fn get_bid<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(Id { bid_id }): Path<Id<<T::Repository as Repository>::BidId>>,
) -> Result<Json<BidRecord<T::Repository>>, ApiError> {
    let caller = app
        .can_trade(&auth)
        .await
        .ok_or_else(ApiError::unauthorized)?;
    let record = app
        .database()
        .get_bid(bid_id, caller)
        .await
        .map_err(ApiError::internal)??;
    Ok(Json(record))
}

/// Withdraw a submitted bid.
///
/// Withdrawal is terminal, and the one-bid-per-request rule means the
/// factory does not get to bid again on the same request.
///
/// # Returns
///
/// - `200 OK`: The withdrawn bid
/// - `401 Unauthorized`: No trading identity in the token
/// - `403 Forbidden`: The caller did not place the bid
/// - `404 Not Found`: No such bid
/// - `409 Conflict`: The bid is not submitted
/// - `500 Internal Server Error`: Database operation failed
async fn withdraw_bid<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(Id { bid_id }): Path<Id<<T::Repository as Repository>::BidId>>,
) -> Result<Json<BidRecord<T::Repository>>, ApiError> {
    let caller = app
        .can_trade(&auth)
        .await
        .ok_or_else(ApiError::unauthorized)?;
    let as_of = app.now();
    let record = app
        .database()
        .withdraw_bid(bid_id, caller, as_of)
        .await
        .map_err(ApiError::internal)??;
    Ok(Json(record))
}

/// Accept a bid, settling its request.
///
/// In one transaction the bid becomes accepted, the request becomes
/// awarded, and every other submitted bid on the request becomes rejected.
/// The caller must be the warehouse that posted the request.
///
/// # Returns
///
/// - `200 OK`: The settlement outcome (the winning bid plus the count of
///   rejected competitors)
/// - `401 Unauthorized`: No trading identity in the token
/// - `403 Forbidden`: The caller does not own the parent request
/// - `404 Not Found`: No such bid
/// - `409 Conflict`: The bid is not submitted, or the request is not open
/// - `500 Internal Server Error`: Database operation failed
async fn accept_bid<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(Id { bid_id }): Path<Id<<T::Repository as Repository>::BidId>>,
) -> Result<Json<SettlementOutcome<T::Repository>>, ApiError> {
    let caller = app
        .can_trade(&auth)
        .await
        .ok_or_else(ApiError::unauthorized)?;
    let as_of = app.now();
    let outcome = app
        .database()
        .accept_bid(bid_id, caller, as_of)
        .await
        .map_err(ApiError::internal)??;
    Ok(Json(outcome))
}
