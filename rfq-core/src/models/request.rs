use super::{PartySummary, status_enum};
use crate::ports::Repository;

status_enum!(
    /// The lifecycle state of a bid request.
    ///
    /// Requests are created `open` and leave that state exactly once: a
    /// warehouse either accepts a bid (`awarded`) or cancels the request
    /// (`cancelled`). `closed` is reserved for requests retired without an
    /// award by an out-of-band process; the engine itself never writes it.
    BidRequestStatus {
        /// Accepting bids
        Open => "open",
        /// Retired without an award
        Closed => "closed",
        /// A bid was accepted
        Awarded => "awarded",
        /// Withdrawn by the posting warehouse
        Cancelled => "cancelled",
    }
);

status_enum!(
    /// How quickly the warehouse needs the goods.
    ///
    /// Advisory only: urgency is displayed to factories but does not affect
    /// any deadline enforcement.
    Urgency {
        /// No particular hurry
        Low => "low",
        /// Normal lead times apply
        Medium => "medium",
        /// Needed soon
        High => "high",
        /// Needed immediately
        Urgent => "urgent",
    }
);

impl Default for Urgency {
    fn default() -> Self {
        Self::Medium
    }
}

/// The error produced when a quantity fails validation.
#[derive(Debug, thiserror::Error)]
#[error("quantity must be at least 1")]
pub struct QuantityError;

/// A strictly positive unit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u32", into = "u32")
)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Quantity(u32);

impl Quantity {
    /// Construct a quantity, rejecting zero.
    pub fn new(value: u32) -> Result<Self, QuantityError> {
        if value == 0 {
            Err(QuantityError)
        } else {
            Ok(Self(value))
        }
    }

    /// The underlying count.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Where and how the goods must be delivered.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct DeliveryLocation {
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// What the warehouse is asking to have produced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Specifications {
    /// Description of the goods
    pub description: String,
    /// Any custom requirements beyond the base description
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub custom_requirements: Option<String>,
    /// Quality standards the goods must meet
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub quality_standards: Option<String>,
    /// Packaging requirements
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub packaging_requirements: Option<String>,
    /// The delivery destination
    pub delivery_location: DeliveryLocation,
}

/// The price range the warehouse is prepared to pay.
///
/// `min_price <= preferred_price <= max_price` is the expected ordering, but
/// the engine stores these as given: they are advisory to factories, not a
/// constraint on bids.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Budget {
    /// The low end of the expected spend
    pub min_price: f64,
    /// The most the warehouse will consider
    pub max_price: f64,
    /// The target price
    pub preferred_price: f64,
}

/// Qualification hints for prospective bidders.
///
/// These are advisory. The engine does not filter or reject bids against
/// them; warehouses apply their own judgement when reviewing bids.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct BidRequirements {
    /// Minimum factory rating on a 1-5 scale
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub minimum_factory_rating: Option<f64>,
    /// Preferred maximum distance from the delivery location, in kilometers
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub preferred_max_distance: Option<f64>,
    /// Certifications the factory should hold
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub requires_certifications: Vec<String>,
    /// Payment terms the warehouse expects
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub payment_terms: Option<String>,
}

/// The full description of a bid request, as authored by the warehouse.
///
/// Everything here is write-once: the engine has no edit operation for
/// request details, only cancellation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct BidRequestDetails {
    /// The name of the goods
    pub product_name: String,
    /// A free-form category tag, used for filtering the open listing
    pub category: String,
    /// How many units are requested
    pub quantity: Quantity,
    /// The detailed specifications
    pub specifications: Specifications,
    /// What the warehouse is prepared to pay
    pub budget: Budget,
    /// How urgently the goods are needed
    #[cfg_attr(feature = "serde", serde(default))]
    pub urgency: Urgency,
    /// Qualification hints for bidders
    #[cfg_attr(feature = "serde", serde(default))]
    pub bid_requirements: BidRequirements,
    /// Any additional notes
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub notes: Option<String>,
}

/// A bid request as stored, combining the authored details with the
/// engine-managed lifecycle fields.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound(
        serialize = "R::BidRequestId: serde::Serialize, R::PartyId: serde::Serialize, R::DateTime: serde::Serialize",
        deserialize = "R::BidRequestId: serde::Deserialize<'de>, R::PartyId: serde::Deserialize<'de>, R::DateTime: serde::Deserialize<'de>"
    ))
)]
#[cfg_attr(
    feature = "schemars",
    derive(schemars::JsonSchema),
    schemars(
        rename = "BidRequestRecord",
        bound = "R::BidRequestId: schemars::JsonSchema, R::PartyId: schemars::JsonSchema, R::DateTime: schemars::JsonSchema"
    )
)]
pub struct BidRequestRecord<R: Repository + ?Sized> {
    /// Unique identifier for the request
    pub id: R::BidRequestId,
    /// The warehouse that posted it
    pub warehouse_id: R::PartyId,
    /// Current lifecycle state
    pub status: BidRequestStatus,
    /// The authored details
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub details: BidRequestDetails,
    /// No bids are accepted at or after this moment
    pub bidding_deadline: R::DateTime,
    /// When the warehouse would like delivery, if stated
    #[cfg_attr(feature = "serde", serde(default))]
    pub requested_delivery_date: Option<R::DateTime>,
    /// When the request was created
    pub created_at: R::DateTime,
    /// When the request last changed state
    pub updated_at: R::DateTime,
    /// How many bids exist against this request, where the view includes it
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub bid_count: Option<i64>,
    /// The posting warehouse's directory summary, where the view includes it
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub warehouse: Option<PartySummary>,
}

impl<R: Repository + ?Sized> std::fmt::Debug for BidRequestRecord<R>
where
    R::BidRequestId: std::fmt::Debug,
    R::PartyId: std::fmt::Debug,
    R::DateTime: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BidRequestRecord")
            .field("id", &self.id)
            .field("warehouse_id", &self.warehouse_id)
            .field("status", &self.status)
            .field("details", &self.details)
            .field("bidding_deadline", &self.bidding_deadline)
            .field("requested_delivery_date", &self.requested_delivery_date)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("bid_count", &self.bid_count)
            .field("warehouse", &self.warehouse)
            .finish()
    }
}

/// The subset of a bid request embedded in a factory's bid listing.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound(
        serialize = "R::DateTime: serde::Serialize",
        deserialize = "R::DateTime: serde::Deserialize<'de>"
    ))
)]
#[cfg_attr(
    feature = "schemars",
    derive(schemars::JsonSchema),
    schemars(rename = "BidRequestSummary", bound = "R::DateTime: schemars::JsonSchema")
)]
pub struct BidRequestSummary<R: Repository + ?Sized> {
    /// The name of the goods
    pub product_name: String,
    /// The request's category tag
    pub category: String,
    /// How many units are requested
    pub quantity: Quantity,
    /// The request's current state
    pub status: BidRequestStatus,
    /// The request's bidding deadline
    pub bidding_deadline: R::DateTime,
}

impl<R: Repository + ?Sized> std::fmt::Debug for BidRequestSummary<R>
where
    R::DateTime: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BidRequestSummary")
            .field("product_name", &self.product_name)
            .field("category", &self.category)
            .field("quantity", &self.quantity)
            .field("status", &self.status)
            .field("bidding_deadline", &self.bidding_deadline)
            .finish()
    }
}
