use super::{BidRequestSummary, status_enum};
use crate::ports::Repository;

status_enum!(
    /// The lifecycle state of a bid.
    ///
    /// Bids are created `submitted`. The owning factory may move a submitted
    /// bid to `withdrawn`; settlement moves the winner to `accepted` and every
    /// other live bid on the request to `rejected`. All three are terminal.
    /// `counter_offered` is part of the vocabulary for operator tooling but is
    /// never produced by the engine.
    BidStatus {
        /// Live and eligible to win
        Submitted => "submitted",
        /// Retracted by the factory
        Withdrawn => "withdrawn",
        /// Chosen by the warehouse
        Accepted => "accepted",
        /// Lost to an accepted bid
        Rejected => "rejected",
        /// Held for renegotiation by operator tooling
        CounterOffered => "counter_offered",
    }
);

/// An itemization of where the quoted price comes from.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct PriceBreakdown {
    /// Raw material cost
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub material_cost: Option<f64>,
    /// Labor cost
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub labor_cost: Option<f64>,
    /// Overhead cost
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub overhead_cost: Option<f64>,
    /// The factory's margin
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub margin: Option<f64>,
}

/// The money side of a bid.
///
/// `total_price` is quoted by the factory and stored as given; the engine
/// does not recompute it from `unit_price` and the request quantity. It is
/// the sort key for the warehouse's bid review.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Pricing {
    /// Price per unit
    pub unit_price: f64,
    /// Quoted price for the full quantity
    pub total_price: f64,
    /// Optional itemization of the quote
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub price_breakdown: Option<PriceBreakdown>,
    /// Any discount already applied to the quote, as a percentage
    #[cfg_attr(feature = "serde", serde(default))]
    pub discount_offered: f64,
    /// Payment terms the factory requires
    pub payment_terms: String,
}

/// How the factory proposes to get the goods to the warehouse.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct DeliveryTerms {
    /// Shipping method, free-form
    pub delivery_method: String,
    /// Shipping cost on top of the quote
    pub shipping_cost: f64,
    /// How many days of production lead time the factory needs
    pub production_time_in_days: u32,
}

/// The factory's quality commitments.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct QualityAssurance {
    /// Certifications the factory holds
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub certifications: Vec<String>,
    /// The quality guarantee offered
    pub quality_guarantee: String,
    /// Warranty coverage, if offered
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub warranty_coverage: Option<String>,
    /// Whether the factory can produce a sample first
    #[cfg_attr(feature = "serde", serde(default))]
    pub sample_available: bool,
}

/// The factory's capacity and track record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct FactoryCapacity {
    /// Capacity currently committed
    pub current_capacity: f64,
    /// Total production capacity
    pub max_capacity: f64,
    /// Years of relevant experience
    pub experience_years: u32,
    /// Similar projects completed to date
    #[cfg_attr(feature = "serde", serde(default))]
    pub similar_projects_completed: u32,
}

/// The factory's written pitch.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Proposal {
    /// The cover message
    pub message: String,
    /// Alternative specifications the factory suggests, if any
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub alternative_specs: Option<String>,
    /// Why this factory should win
    pub value_proposition: String,
    /// How the factory will mitigate delivery or quality risk
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub risk_mitigation: Option<String>,
}

/// Everything a factory submits with a bid.
///
/// Like request details, a proposal is write-once. There is no bid edit
/// operation, and the one-bid-per-factory rule means a withdrawn bid cannot
/// be replaced either, so factories should submit carefully.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct BidProposal {
    /// The money side
    pub pricing: Pricing,
    /// The delivery plan
    pub delivery: DeliveryTerms,
    /// Quality commitments
    pub quality_assurance: QualityAssurance,
    /// Capacity and track record
    pub factory_capacity: FactoryCapacity,
    /// The written pitch
    pub proposal: Proposal,
    /// Bullet-point advantages over the competition
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub competitive_advantages: Vec<String>,
}

/// A bid as stored, combining the submitted proposal with the engine-managed
/// lifecycle fields.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound(
        serialize = "R::BidId: serde::Serialize, R::BidRequestId: serde::Serialize, R::PartyId: serde::Serialize, R::DateTime: serde::Serialize",
        deserialize = "R::BidId: serde::Deserialize<'de>, R::BidRequestId: serde::Deserialize<'de>, R::PartyId: serde::Deserialize<'de>, R::DateTime: serde::Deserialize<'de>"
    ))
)]
#[cfg_attr(
    feature = "schemars",
    derive(schemars::JsonSchema),
    schemars(
        rename = "BidRecord",
        bound = "R::BidId: schemars::JsonSchema, R::BidRequestId: schemars::JsonSchema, R::PartyId: schemars::JsonSchema, R::DateTime: schemars::JsonSchema"
    )
)]
pub struct BidRecord<R: Repository + ?Sized> {
    /// Unique identifier for the bid
    pub id: R::BidId,
    /// The request this bid answers
    pub bid_request_id: R::BidRequestId,
    /// The factory that placed it
    pub factory_id: R::PartyId,
    /// Current lifecycle state
    pub status: BidStatus,
    /// The submitted proposal
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub proposal: BidProposal,
    /// The quoted terms are not binding on the factory after this moment
    pub valid_until: R::DateTime,
    /// When the factory expects to deliver
    pub estimated_delivery_date: R::DateTime,
    /// When the bid was placed
    pub submitted_at: R::DateTime,
    /// When the bid last changed state
    pub updated_at: R::DateTime,
    /// The parent request's summary, where the view includes it
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub bid_request: Option<BidRequestSummary<R>>,
}

impl<R: Repository + ?Sized> std::fmt::Debug for BidRecord<R>
where
    R::BidId: std::fmt::Debug,
    R::BidRequestId: std::fmt::Debug,
    R::PartyId: std::fmt::Debug,
    R::DateTime: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BidRecord")
            .field("id", &self.id)
            .field("bid_request_id", &self.bid_request_id)
            .field("factory_id", &self.factory_id)
            .field("status", &self.status)
            .field("proposal", &self.proposal)
            .field("valid_until", &self.valid_until)
            .field("estimated_delivery_date", &self.estimated_delivery_date)
            .field("submitted_at", &self.submitted_at)
            .field("updated_at", &self.updated_at)
            .field("bid_request", &self.bid_request)
            .finish()
    }
}

/// The result of accepting a bid.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound(
        serialize = "R::BidId: serde::Serialize, R::BidRequestId: serde::Serialize, R::PartyId: serde::Serialize, R::DateTime: serde::Serialize",
        deserialize = "R::BidId: serde::Deserialize<'de>, R::BidRequestId: serde::Deserialize<'de>, R::PartyId: serde::Deserialize<'de>, R::DateTime: serde::Deserialize<'de>"
    ))
)]
#[cfg_attr(
    feature = "schemars",
    derive(schemars::JsonSchema),
    schemars(
        rename = "SettlementOutcome",
        bound = "R::BidId: schemars::JsonSchema, R::BidRequestId: schemars::JsonSchema, R::PartyId: schemars::JsonSchema, R::DateTime: schemars::JsonSchema"
    )
)]
pub struct SettlementOutcome<R: Repository + ?Sized> {
    /// The accepted bid, in its post-settlement state
    pub bid: BidRecord<R>,
    /// How many competing live bids were rejected alongside the acceptance
    pub rejected_bids: u64,
}

impl<R: Repository + ?Sized> std::fmt::Debug for SettlementOutcome<R>
where
    R::BidId: std::fmt::Debug,
    R::BidRequestId: std::fmt::Debug,
    R::PartyId: std::fmt::Debug,
    R::DateTime: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettlementOutcome")
            .field("bid", &self.bid)
            .field("rejected_bids", &self.rejected_bids)
            .finish()
    }
}
