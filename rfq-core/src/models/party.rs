use super::status_enum;
use crate::ports::Repository;

status_enum!(
    /// Which side of the market a party trades on.
    PartyRole {
        /// Posts bid requests and accepts winning bids
        Warehouse => "warehouse",
        /// Places bids against open requests
        Factory => "factory",
    }
);

/// A physical address with coordinates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Location {
    /// Street address, free-form
    pub address: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// The directory entry for a party, as maintained by the operator.
///
/// The auction engine does not manage accounts or credentials; it only needs
/// to know each party's role and display data, synced from whatever identity
/// system fronts the deployment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct PartyDetails {
    /// The party's side of the market
    pub role: PartyRole,
    /// Display name
    pub name: String,
    /// Where the party operates from
    pub location: Location,
    /// Advisory quality rating on a 1-5 scale, if the operator tracks one
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub rating: Option<f64>,
}

/// A party record pairs a party id with its directory entry.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound(
        serialize = "R::PartyId: serde::Serialize, R::DateTime: serde::Serialize",
        deserialize = "R::PartyId: serde::Deserialize<'de>, R::DateTime: serde::Deserialize<'de>"
    ))
)]
#[cfg_attr(
    feature = "schemars",
    derive(schemars::JsonSchema),
    schemars(
        rename = "PartyRecord",
        bound = "R::PartyId: schemars::JsonSchema, R::DateTime: schemars::JsonSchema"
    )
)]
pub struct PartyRecord<R: Repository + ?Sized> {
    /// Unique identifier for the party
    pub id: R::PartyId,
    /// The directory entry
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub details: PartyDetails,
    /// When this entry was last written
    pub updated_at: R::DateTime,
}

impl<R: Repository + ?Sized> std::fmt::Debug for PartyRecord<R>
where
    R::PartyId: std::fmt::Debug,
    R::DateTime: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartyRecord")
            .field("id", &self.id)
            .field("details", &self.details)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// The subset of a party's directory entry embedded in listings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct PartySummary {
    /// Display name
    pub name: String,
    /// Where the party operates from
    pub location: Location,
}
