use super::AuctionFailure;
use crate::models::{
    BidProposal, BidRecord, DateTimeRangeQuery, DateTimeRangeResponse, SettlementOutcome,
};

/// Repository interface for the bid side of the auction.
///
/// Bids are the factory-authored half of the market. A factory places at most
/// one bid per request, and settlement is the single decision point: when a
/// warehouse accepts a bid, every other live bid on that request is rejected
/// and the request is awarded, atomically.
pub trait BidRepository: super::BidRequestRepository {
    /// Place a bid on behalf of `factory_id` against an open request.
    ///
    /// The caller supplies the id, typically via
    /// [`Application::generate_bid_id`](super::Application::generate_bid_id).
    /// If `valid_until` is omitted it defaults to thirty days after `as_of`;
    /// if `estimated_delivery_date` is omitted it defaults to `as_of` plus
    /// the proposal's production lead time.
    ///
    /// # Returns
    ///
    /// - Ok(Ok(record)) with the stored bid on success
    /// - Ok(Err(NotFound)) if no such request exists
    /// - Ok(Err(AccessDenied)) if the party is not a factory
    /// - Ok(Err(InvalidState)) if the request is not open, or its deadline
    ///   has passed
    /// - Ok(Err(Conflict)) if the factory already has a bid on this request,
    ///   in any state
    fn submit_bid(
        &self,
        bid_id: Self::BidId,
        request_id: Self::BidRequestId,
        factory_id: Self::PartyId,
        proposal: BidProposal,
        valid_until: Option<Self::DateTime>,
        estimated_delivery_date: Option<Self::DateTime>,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<Result<BidRecord<Self>, AuctionFailure>, Self::Error>> + Send;

    /// Retrieve a single bid.
    ///
    /// Visible to the factory that placed it and to the warehouse that owns
    /// the parent request; anyone else is refused.
    fn get_bid(
        &self,
        bid_id: Self::BidId,
        caller_id: Self::PartyId,
    ) -> impl Future<Output = Result<Result<BidRecord<Self>, AuctionFailure>, Self::Error>> + Send;

    /// Withdraw a submitted bid.
    ///
    /// Withdrawal is terminal. It removes the bid from consideration but
    /// does not free the factory to bid again on the same request.
    ///
    /// # Returns
    ///
    /// - Ok(Ok(record)) with the withdrawn bid on success
    /// - Ok(Err(NotFound)) if no such bid exists
    /// - Ok(Err(AccessDenied)) if the caller did not place the bid
    /// - Ok(Err(InvalidState)) if the bid is not submitted
    fn withdraw_bid(
        &self,
        bid_id: Self::BidId,
        factory_id: Self::PartyId,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<Result<BidRecord<Self>, AuctionFailure>, Self::Error>> + Send;

    /// List every bid on a request, for the warehouse's review.
    ///
    /// Only the posting warehouse may call this. Bids of all states are
    /// returned, ordered by total price, cheapest first.
    fn query_request_bids(
        &self,
        request_id: Self::BidRequestId,
        caller_id: Self::PartyId,
    ) -> impl Future<Output = Result<Result<Vec<BidRecord<Self>>, AuctionFailure>, Self::Error>> + Send;

    /// Page through every bid a factory has placed, any status.
    ///
    /// Results carry the parent request's summary and are ordered by
    /// submission time, newest first.
    fn query_factory_bids(
        &self,
        factory_id: Self::PartyId,
        query: DateTimeRangeQuery<Self::DateTime>,
        limit: usize,
    ) -> impl Future<
        Output = Result<DateTimeRangeResponse<BidRecord<Self>, Self::DateTime>, Self::Error>,
    > + Send;

    /// Accept a bid, settling its request.
    ///
    /// In one transaction: the bid becomes `accepted`, its request becomes
    /// `awarded`, and every other submitted bid on the request becomes
    /// `rejected`. Neither the request's deadline nor the bid's `valid_until`
    /// is consulted here; a warehouse may settle after bidding has closed.
    /// The state guards make retries safe: a second accept of any bid on the
    /// same request fails on the request no longer being open, and a retry
    /// of a settled accept fails on the bid no longer being submitted.
    ///
    /// # Returns
    ///
    /// - Ok(Ok(outcome)) with the accepted bid and the count of bids swept
    ///   aside
    /// - Ok(Err(NotFound)) if no such bid exists
    /// - Ok(Err(AccessDenied)) if the caller does not own the parent request
    /// - Ok(Err(InvalidState)) if the request is not open or the bid is not
    ///   submitted
    fn accept_bid(
        &self,
        bid_id: Self::BidId,
        warehouse_id: Self::PartyId,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<Result<SettlementOutcome<Self>, AuctionFailure>, Self::Error>> + Send;
}
