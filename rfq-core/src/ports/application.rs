use super::{AuctionRepository, Repository};
use crate::models::{BidProposal, BidRequestDetails};

/// The composition root for an auction deployment.
///
/// An application binds a repository implementation to the ambient concerns
/// the transport layer cannot decide for itself: what "now" means, how fresh
/// ids are minted, and how a caller-supplied context (typically a bearer
/// token) resolves to a party. The HTTP layer in `rfq-axum` is written
/// against this trait alone.
pub trait Application {
    /// The caller-supplied authorization context, e.g. a bearer token
    type Context;
    /// The backing repository
    type Repository: AuctionRepository;

    /// Access the underlying repository.
    fn database(&self) -> &Self::Repository;

    /// The current time, in the repository's representation.
    fn now(&self) -> <Self::Repository as Repository>::DateTime;

    /// Mint an id for a new bid request, along with its generation time.
    ///
    /// The details are available so implementations may derive ids from
    /// content; the generation time doubles as the operation's `as_of`.
    fn generate_bid_request_id(
        &self,
        details: &BidRequestDetails,
    ) -> (
        <Self::Repository as Repository>::BidRequestId,
        <Self::Repository as Repository>::DateTime,
    );

    /// Mint an id for a new bid, along with its generation time.
    fn generate_bid_id(
        &self,
        proposal: &BidProposal,
    ) -> (
        <Self::Repository as Repository>::BidId,
        <Self::Repository as Repository>::DateTime,
    );

    /// Resolve the context into the trading party it speaks for, if any.
    ///
    /// This authenticates the caller; role checks against the party
    /// directory are the repository's concern.
    fn can_trade(
        &self,
        context: &Self::Context,
    ) -> impl Future<Output = Option<<Self::Repository as Repository>::PartyId>> + Send;

    /// Whether the context may maintain the party directory.
    fn can_manage_parties(&self, context: &Self::Context) -> impl Future<Output = bool> + Send;
}
