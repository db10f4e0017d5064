mod bid;
mod datetime;
mod party;
mod request;

pub use bid::{
    BidProposal, BidRecord, BidStatus, DeliveryTerms, FactoryCapacity, PriceBreakdown, Pricing,
    Proposal, QualityAssurance, SettlementOutcome,
};
pub use datetime::{DateTimeRangeQuery, DateTimeRangeResponse};
pub use party::{Location, PartyDetails, PartyRecord, PartyRole, PartySummary};
pub use request::{
    BidRequestDetails, BidRequestRecord, BidRequestStatus, BidRequestSummary, BidRequirements,
    Budget, DeliveryLocation, Quantity, QuantityError, Specifications, Urgency,
};

/// The error produced when parsing an unrecognized state name.
#[derive(Debug, thiserror::Error)]
#[error("unrecognized status {0:?}")]
pub struct ParseStatusError(String);

macro_rules! status_enum {
    (
        $(#[$attr:meta])*
        $name:ident { $($(#[$vattr:meta])* $variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
        pub enum $name {
            $(
                $(#[$vattr])*
                #[cfg_attr(feature = "serde", serde(rename = $text))]
                $variant,
            )+
        }

        impl $name {
            /// The canonical lowercase name of this state, as stored and serialized.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::models::ParseStatusError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(crate::models::ParseStatusError(other.into())),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = crate::models::ParseStatusError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

pub(crate) use status_enum;
