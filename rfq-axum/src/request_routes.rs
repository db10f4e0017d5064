//! REST API endpoints for the request side of the auction.
//!
//! Warehouses post requests-for-quotation here, review the open listing,
//! and cancel their own requests. The nested `/bids` routes cover the
//! request-scoped bid operations: a factory submits its bid against a
//! request, and the owning warehouse reviews the field.

use crate::{ApiApplication, ApiError, config::AxumConfig};
use aide::axum::{ApiRouter, routing::get};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use rfq_core::{
    models::{
        BidProposal, BidRecord, BidRequestDetails, BidRequestRecord, DateTimeRangeQuery,
        DateTimeRangeResponse,
    },
    ports::{BidRepository as _, BidRequestRepository as _, Repository},
};
use std::sync::Arc;

/// Creates a router with bid-request endpoints.
pub fn router<T: ApiApplication>() -> ApiRouter<T> {
    ApiRouter::new()
        .api_route_with(
            "/",
            get(list_open_bid_requests::<T>).post(create_bid_request::<T>),
            |route| route.security_requirement("jwt").tag("bid-request"),
        )
        .api_route_with("/mine", get(list_my_bid_requests::<T>), |route| {
            route.security_requirement("jwt").tag("bid-request")
        })
        .api_route_with(
            "/{request_id}",
            get(get_bid_request::<T>).delete(cancel_bid_request::<T>),
            |route| route.security_requirement("jwt").tag("bid-request"),
        )
        .api_route_with(
            "/{request_id}/bids",
            get(list_request_bids::<T>).post(submit_bid::<T>),
            |route| route.security_requirement("jwt").tag("bid"),
        )
}

/// Path parameter for request-specific endpoints.
#[derive(serde::Deserialize, schemars::JsonSchema)]
#[schemars(inline)]
struct Id<T> {
    /// The unique identifier of the bid request
    request_id: T,
}

/// Request body for posting a new bid request.
#[derive(serde::Deserialize, schemars::JsonSchema)]
#[serde(bound(deserialize = "D: serde::Deserialize<'de>"))]
#[schemars(inline)]
struct CreateBidRequestDto<D> {
    /// The request details
    #[serde(flatten)]
    details: BidRequestDetails,
    /// When bidding closes; defaults to seven days out
    #[serde(default)]
    bidding_deadline: Option<D>,
    /// When delivery is wanted, if the warehouse cares to say
    #[serde(default)]
    requested_delivery_date: Option<D>,
}

/// Query parameters for the open listing.
#[derive(serde::Deserialize, schemars::JsonSchema)]
#[serde(bound(deserialize = "D: serde::Deserialize<'de>"))]
#[schemars(inline)]
struct OpenListingQuery<D> {
    /// Restrict the listing to this category
    #[serde(default)]
    category: Option<String>,
    /// Select requests created at or before this time
    #[serde(default)]
    before: Option<D>,
    /// Select requests created at or after this time
    #[serde(default)]
    after: Option<D>,
}

/// Browse the open listing: requests still accepting bids.
///
/// Requests past their bidding deadline are excluded even though their
/// stored status has not changed. Newest first, paginated.
///
/// # Returns
///
/// - `200 OK`: A page of open bid requests
/// - `401 Unauthorized`: No trading identity in the token
/// - `500 Internal Server Error`: Database query failed
async fn list_open_bid_requests<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(config): Extension<Arc<AxumConfig>>,
    Query(query): Query<OpenListingQuery<<T::Repository as Repository>::DateTime>>,
) -> Result<
    Json<
        DateTimeRangeResponse<
            BidRequestRecord<T::Repository>,
            <T::Repository as Repository>::DateTime,
        >,
    >,
    ApiError,
> {
    app.can_trade(&auth)
        .await
        .ok_or_else(ApiError::unauthorized)?;
    let as_of = app.now();
    let page = app
        .database()
        .query_open_bid_requests(
            query.category,
            as_of,
            DateTimeRangeQuery {
                before: query.before,
                after: query.after,
            },
            config.page_limit,
        )
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(page))
}

/// Post a new bid request.
///
/// The caller must be a warehouse in the party directory.
///
/// # Returns
///
/// - `201 Created`: The stored request
/// - `401 Unauthorized`: No trading identity in the token
/// - `403 Forbidden`: The caller is not a warehouse
/// - `422 Unprocessable Entity`: The bidding deadline is not in the future
/// - `500 Internal Server Error`: Database operation failed
async fn create_bid_request<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(body): Json<CreateBidRequestDto<<T::Repository as Repository>::DateTime>>,
) -> Result<(StatusCode, Json<BidRequestRecord<T::Repository>>), ApiError> {
    let caller = app
        .can_trade(&auth)
        .await
        .ok_or_else(ApiError::unauthorized)?;
    let (request_id, as_of) = app.generate_bid_request_id(&body.details);
    let record = app
        .database()
        .create_bid_request(
            request_id,
            caller,
            body.details,
            body.bidding_deadline,
            body.requested_delivery_date,
            as_of,
        )
        .await
        .map_err(ApiError::internal)??;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Page through every request the caller has posted, any status.
///
/// # Returns
///
/// - `200 OK`: A page of the caller's requests, with bid counts
/// - `401 Unauthorized`: No trading identity in the token
/// - `500 Internal Server Error`: Database query failed
async fn list_my_bid_requests<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(config): Extension<Arc<AxumConfig>>,
    Query(query): Query<DateTimeRangeQuery<<T::Repository as Repository>::DateTime>>,
) -> Result<
    Json<
        DateTimeRangeResponse<
            BidRequestRecord<T::Repository>,
            <T::Repository as Repository>::DateTime,
        >,
    >,
    ApiError,
> {
    let caller = app
        .can_trade(&auth)
        .await
        .ok_or_else(ApiError::unauthorized)?;
    let page = app
        .database()
        .query_warehouse_bid_requests(caller, query, config.page_limit)
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(page))
}

/// Retrieve a single bid request with its bid count.
///
/// A warehouse may only view its own requests; any factory may view any
/// request.
///
/// # Returns
///
/// - `200 OK`: The request
/// - `401 Unauthorized`: No trading identity in the token
/// - `403 Forbidden`: The request belongs to another warehouse
/// - `404 Not Found`: No such request
/// - `500 Internal Server Error`: Database query failed
async fn get_bid_request<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(Id { request_id }): Path<Id<<T::Repository as Repository>::BidRequestId>>,
) -> Result<Json<BidRequestRecord<T::Repository>>, ApiError> {
    let caller = app
        .can_trade(&auth)
        .await
        .ok_or_else(ApiError::unauthorized)?;
    let record = app
        .database()
        .get_bid_request(request_id, caller)
        .await
        .map_err(ApiError::internal)??;
    Ok(Json(record))
}

/// Cancel an open bid request.
///
/// Cancellation does not touch existing bids; they are orphaned but may
/// still be withdrawn by their factories.
///
/// # Returns
///
/// - `200 OK`: The cancelled request
/// - `401 Unauthorized`: No trading identity in the token
/// - `403 Forbidden`: The caller did not post the request
/// - `404 Not Found`: No such request
/// - `409 Conflict`: The request is not open
/// - `500 Internal Server Error`: Database operation failed
async fn cancel_bid_request<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(Id { request_id }): Path<Id<<T::Repository as Repository>::BidRequestId>>,
) -> Result<Json<BidRequestRecord<T::Repository>>, ApiError> {
    let caller = app
        .can_trade(&auth)
        .await
        .ok_or_else(ApiError::unauthorized)?;
    let as_of = app.now();
    let record = app
        .database()
        .cancel_bid_request(request_id, caller, as_of)
        .await
        .map_err(ApiError::internal)??;
    Ok(Json(record))
}

/// Request body for submitting a bid.
#[derive(serde::Deserialize, schemars::JsonSchema)]
#[serde(bound(deserialize = "D: serde::Deserialize<'de>"))]
#[schemars(inline)]
struct SubmitBidDto<D> {
    /// The proposal
    #[serde(flatten)]
    proposal: BidProposal,
    /// When the quoted terms lapse; defaults to thirty days out
    #[serde(default)]
    valid_until: Option<D>,
    /// When the factory expects to deliver; defaults from the lead time
    #[serde(default)]
    estimated_delivery_date: Option<D>,
}

/// Review every bid on a request, cheapest first.
///
/// Only the warehouse that posted the request may review its bids.
///
/// # Returns
///
/// - `200 OK`: The bids, ordered by total price ascending
/// - `401 Unauthorized`: No trading identity in the token
/// - `403 Forbidden`: The caller did not post the request
/// - `404 Not Found`: No such request
/// - `500 Internal Server Error`: Database query failed
async fn list_request_bids<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(Id { request_id }): Path<Id<<T::Repository as Repository>::BidRequestId>>,
) -> Result<Json<Vec<BidRecord<T::Repository>>>, ApiError> {
    let caller = app
        .can_trade(&auth)
        .await
        .ok_or_else(ApiError::unauthorized)?;
    let bids = app
        .database()
        .query_request_bids(request_id, caller)
        .await
        .map_err(ApiError::internal)??;
    Ok(Json(bids))
}

/// Submit a bid against an open request.
///
/// The caller must be a factory, the request must be open and inside its
/// bidding deadline, and each factory gets exactly one bid per request.
///
/// # Returns
///
/// - `201 Created`: The stored bid
/// - `401 Unauthorized`: No trading identity in the token
/// - `403 Forbidden`: The caller is not a factory
/// - `404 Not Found`: No such request
/// - `409 Conflict`: The request is not open, its deadline has passed, or
///   the factory already bid (the body's `kind` distinguishes these)
/// - `500 Internal Server Error`: Database operation failed
async fn submit_bid<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(Id { request_id }): Path<Id<<T::Repository as Repository>::BidRequestId>>,
    Json(body): Json<SubmitBidDto<<T::Repository as Repository>::DateTime>>,
) -> Result<(StatusCode, Json<BidRecord<T::Repository>>), ApiError> {
    let caller = app
        .can_trade(&auth)
        .await
        .ok_or_else(ApiError::unauthorized)?;
    let (bid_id, as_of) = app.generate_bid_id(&body.proposal);
    let record = app
        .database()
        .submit_bid(
            bid_id,
            request_id,
            caller,
            body.proposal,
            body.valid_until,
            body.estimated_delivery_date,
            as_of,
        )
        .await
        .map_err(ApiError::internal)??;
    Ok((StatusCode::CREATED, Json(record)))
}
