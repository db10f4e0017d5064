//! REST API endpoints for the party directory.
//!
//! The directory is the auction's projection of whatever identity system
//! fronts the deployment: each entry records a party's market side and
//! display data. Reads are open to any trader; writes are an operator
//! concern, gated on the admin claim.

use crate::{ApiApplication, ApiError};
use aide::axum::{ApiRouter, routing::get};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use rfq_core::{
    models::{PartyDetails, PartyRecord},
    ports::{PartyRepository as _, Repository},
};

/// Creates a router with party directory endpoints.
pub fn router<T: ApiApplication>() -> ApiRouter<T> {
    ApiRouter::new().api_route_with(
        "/{party_id}",
        get(get_party::<T>).put(upsert_party::<T>),
        |route| route.security_requirement("jwt").tag("party").tag("admin"),
    )
}

/// Path parameter for party-specific endpoints.
#[derive(serde::Deserialize, schemars::JsonSchema)]
#[schemars(inline)]
struct Id<T> {
    /// The unique identifier of the party
    party_id: T,
}

/// Look up a party's directory entry.
///
/// # Returns
///
/// - `200 OK`: The entry
/// - `401 Unauthorized`: No trading identity in the token
/// - `404 Not Found`: No such party
/// - `500 Internal Server Error`: Database query failed
async fn get_party<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(Id { party_id }): Path<Id<<T::Repository as Repository>::PartyId>>,
) -> Result<Json<PartyRecord<T::Repository>>, ApiError> {
    app.can_trade(&auth)
        .await
        .ok_or_else(ApiError::unauthorized)?;
    let record = app
        .database()
        .get_party(party_id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("party not found"))?;
    Ok(Json(record))
}

/// Create or replace a party's directory entry.
///
/// Upserts are last-write-wins. Changing a party's role does not
/// retroactively touch requests or bids it already owns.
///
/// # Authorization
///
/// Requires the directory-maintenance privilege (`can_manage_parties`,
/// the demo application's `admin: true` claim).
///
/// # Returns
///
/// - `204 No Content`: Entry written
/// - `403 Forbidden`: The token lacks the admin claim
/// - `500 Internal Server Error`: Database operation failed
async fn upsert_party<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(Id { party_id }): Path<Id<<T::Repository as Repository>::PartyId>>,
    Json(details): Json<PartyDetails>,
) -> Result<StatusCode, ApiError> {
    if !app.can_manage_parties(&auth).await {
        return Err(ApiError::forbidden(
            "maintaining the party directory requires the admin claim",
        ));
    }
    let as_of = app.now();
    app.database()
        .upsert_party(party_id, details, as_of)
        .await
        .map_err(ApiError::internal)?;
    Ok(StatusCode::NO_CONTENT)
}
