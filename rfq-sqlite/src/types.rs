//! Type definitions for the SQLite implementation.
//!
//! This module contains both public types used throughout the crate and internal
//! types used for database row mapping. The public types include strongly-typed
//! IDs and datetime representations that ensure type safety across the system.

use crate::Db;
use rfq_core::models::{
    BidProposal, BidRecord, BidRequestDetails, BidRequestRecord, BidRequestStatus,
    BidRequestSummary, BidStatus, Location, PartyDetails, PartyRecord, PartyRole, PartySummary,
    Quantity, QuantityError,
};

mod datetime;
pub use datetime::DateTime;

mod ids;
pub use ids::{BidId, BidRequestId, PartyId};

/// Build a `ColumnDecode` error for a value that failed domain validation
/// after leaving SQLite.
pub(crate) fn column_decode(
    index: &str,
    source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: index.into(),
        source: source.into(),
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PartyRow {
    pub id: PartyId,
    #[sqlx(try_from = "String")]
    pub role: PartyRole,
    pub name: String,
    pub location: sqlx::types::Json<Location>,
    pub rating: Option<f64>,
    pub updated_at: DateTime,
}

impl From<PartyRow> for PartyRecord<Db> {
    fn from(row: PartyRow) -> Self {
        Self {
            id: row.id,
            details: PartyDetails {
                role: row.role,
                name: row.name,
                location: row.location.0,
                rating: row.rating,
            },
            updated_at: row.updated_at,
        }
    }
}

/// A bid request row, plus the optional columns the various read views
/// attach: `bid_count` on single-request and warehouse listings, and the
/// posting warehouse's summary on the open listing.
#[derive(sqlx::FromRow)]
pub(crate) struct BidRequestRow {
    pub id: BidRequestId,
    pub warehouse_id: PartyId,
    #[sqlx(try_from = "String")]
    pub status: BidRequestStatus,
    pub details: sqlx::types::Json<BidRequestDetails>,
    pub bidding_deadline: DateTime,
    pub requested_delivery_date: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    #[sqlx(default)]
    pub bid_count: Option<i64>,
    #[sqlx(default)]
    pub warehouse_name: Option<String>,
    #[sqlx(default)]
    pub warehouse_location: Option<sqlx::types::Json<Location>>,
}

impl From<BidRequestRow> for BidRequestRecord<Db> {
    fn from(row: BidRequestRow) -> Self {
        Self {
            id: row.id,
            warehouse_id: row.warehouse_id,
            status: row.status,
            details: row.details.0,
            bidding_deadline: row.bidding_deadline,
            requested_delivery_date: row.requested_delivery_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
            bid_count: row.bid_count,
            warehouse: match (row.warehouse_name, row.warehouse_location) {
                (Some(name), Some(location)) => Some(PartySummary {
                    name,
                    location: location.0,
                }),
                _ => None,
            },
        }
    }
}

/// A bid row, plus the optional columns attached by views that join the
/// parent request: its summary fields for factory-facing listings, and its
/// `warehouse_id` for access checks.
#[derive(sqlx::FromRow)]
pub(crate) struct BidRow {
    pub id: BidId,
    pub bid_request_id: BidRequestId,
    pub factory_id: PartyId,
    #[sqlx(try_from = "String")]
    pub status: BidStatus,
    pub proposal: sqlx::types::Json<BidProposal>,
    pub valid_until: DateTime,
    pub estimated_delivery_date: DateTime,
    pub submitted_at: DateTime,
    pub updated_at: DateTime,
    #[sqlx(default)]
    pub request_warehouse_id: Option<PartyId>,
    #[sqlx(default)]
    pub request_product_name: Option<String>,
    #[sqlx(default)]
    pub request_category: Option<String>,
    #[sqlx(default)]
    pub request_quantity: Option<i64>,
    #[sqlx(default)]
    pub request_status: Option<String>,
    #[sqlx(default)]
    pub request_bidding_deadline: Option<DateTime>,
}

impl TryFrom<BidRow> for BidRecord<Db> {
    type Error = sqlx::Error;

    fn try_from(row: BidRow) -> Result<Self, Self::Error> {
        let bid_request = match (
            row.request_product_name,
            row.request_category,
            row.request_quantity,
            row.request_status,
            row.request_bidding_deadline,
        ) {
            (
                Some(product_name),
                Some(category),
                Some(quantity),
                Some(status),
                Some(bidding_deadline),
            ) => {
                let quantity = u32::try_from(quantity)
                    .ok()
                    .and_then(|value| Quantity::new(value).ok())
                    .ok_or_else(|| column_decode("request_quantity", QuantityError))?;
                Some(BidRequestSummary {
                    product_name,
                    category,
                    quantity,
                    status: status
                        .parse()
                        .map_err(|err| column_decode("request_status", err))?,
                    bidding_deadline,
                })
            }
            _ => None,
        };

        Ok(Self {
            id: row.id,
            bid_request_id: row.bid_request_id,
            factory_id: row.factory_id,
            status: row.status,
            proposal: row.proposal.0,
            valid_until: row.valid_until,
            estimated_delivery_date: row.estimated_delivery_date,
            submitted_at: row.submitted_at,
            updated_at: row.updated_at,
            bid_request,
        })
    }
}
