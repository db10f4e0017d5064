mod application;
mod bid;
mod party;
mod request;

pub use application::Application;
pub use bid::BidRepository;
pub use party::PartyRepository;
pub use request::BidRequestRepository;

/// The backend contract shared by every repository trait.
///
/// Implementations choose their own concrete representations for identifiers
/// and timestamps; the operation traits are expressed entirely in terms of
/// these associated types.
pub trait Repository {
    /// The error type for backend failures
    type Error: std::error::Error + Send + Sync + 'static;
    /// The timestamp representation
    type DateTime;
    /// Identifies a party in the directory
    type PartyId;
    /// Identifies a bid request
    type BidRequestId;
    /// Identifies a bid
    type BidId;
}

/// The ways an auction operation can be refused.
///
/// These are domain outcomes, not system errors: a refused operation leaves
/// the store untouched and tells the caller why. Backend failures travel in
/// the outer `Result` of each repository method instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuctionFailure {
    /// The referenced entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),
    /// The caller has no right to the operation
    #[error("access denied: {0}")]
    AccessDenied(&'static str),
    /// The entity is not in a state that admits the operation
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    /// The operation collides with something that already exists
    #[error("conflict: {0}")]
    Conflict(&'static str),
    /// The submitted data is unacceptable
    #[error("validation failed: {0}")]
    Validation(&'static str),
}

impl AuctionFailure {
    /// A stable lowercase tag for this failure class, suitable for API bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::AccessDenied(_) => "access_denied",
            Self::InvalidState(_) => "invalid_state",
            Self::Conflict(_) => "conflict",
            Self::Validation(_) => "validation",
        }
    }
}

/// The "marker" trait that is used everywhere and implies implementation of all the above
pub trait AuctionRepository: BidRepository {}
