use super::AuctionFailure;
use crate::models::{
    BidRequestDetails, BidRequestRecord, DateTimeRangeQuery, DateTimeRangeResponse,
};

/// Repository interface for the request side of the auction.
///
/// Bid requests are the warehouse-authored half of the market: each one
/// describes goods to be produced, carries a bidding deadline, and moves
/// through a small lifecycle (`open`, then `awarded` or `cancelled`).
///
/// Methods that enforce business rules return a nested result: the outer
/// `Result` is for backend errors, the inner one carries the domain verdict.
pub trait BidRequestRepository: super::PartyRepository {
    /// Post a new bid request on behalf of `warehouse_id`.
    ///
    /// The caller supplies the id, typically via
    /// [`Application::generate_bid_request_id`](super::Application::generate_bid_request_id).
    /// If `bidding_deadline` is omitted it defaults to seven days after
    /// `as_of`. `requested_delivery_date` is advisory and may be omitted
    /// entirely.
    ///
    /// # Returns
    ///
    /// - Ok(Ok(record)) with the stored request on success
    /// - Ok(Err(AccessDenied)) if the party is not a warehouse
    /// - Ok(Err(Validation)) if the deadline is not in the future of `as_of`
    fn create_bid_request(
        &self,
        request_id: Self::BidRequestId,
        warehouse_id: Self::PartyId,
        details: BidRequestDetails,
        bidding_deadline: Option<Self::DateTime>,
        requested_delivery_date: Option<Self::DateTime>,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<Result<BidRequestRecord<Self>, AuctionFailure>, Self::Error>> + Send;

    /// Retrieve a single bid request with its bid count.
    ///
    /// Factories may inspect any request; a warehouse may only inspect its
    /// own. The returned record includes `bid_count`.
    fn get_bid_request(
        &self,
        request_id: Self::BidRequestId,
        caller_id: Self::PartyId,
    ) -> impl Future<Output = Result<Result<BidRequestRecord<Self>, AuctionFailure>, Self::Error>> + Send;

    /// Page through the open listing: requests still accepting bids.
    ///
    /// Only requests with `status = open` and a bidding deadline strictly
    /// after `as_of` appear; a request past its deadline drops out of this
    /// view with no state transition. Results carry the posting warehouse's
    /// directory summary and are ordered by creation time, newest first.
    /// `category`, if present, restricts to that tag.
    fn query_open_bid_requests(
        &self,
        category: Option<String>,
        as_of: Self::DateTime,
        query: DateTimeRangeQuery<Self::DateTime>,
        limit: usize,
    ) -> impl Future<
        Output = Result<
            DateTimeRangeResponse<BidRequestRecord<Self>, Self::DateTime>,
            Self::Error,
        >,
    > + Send;

    /// Page through every request a warehouse has posted, any status.
    ///
    /// Results include `bid_count` and are ordered by creation time, newest
    /// first. There is no ownership failure here: the caller *is* the
    /// warehouse in question, and an unknown id simply yields no rows.
    fn query_warehouse_bid_requests(
        &self,
        warehouse_id: Self::PartyId,
        query: DateTimeRangeQuery<Self::DateTime>,
        limit: usize,
    ) -> impl Future<
        Output = Result<
            DateTimeRangeResponse<BidRequestRecord<Self>, Self::DateTime>,
            Self::Error,
        >,
    > + Send;

    /// Cancel an open request.
    ///
    /// Cancellation does not cascade to bids: submitted bids on a cancelled
    /// request stay submitted (and may still be withdrawn), but can never be
    /// accepted because settlement re-checks the request's status.
    ///
    /// # Returns
    ///
    /// - Ok(Ok(record)) with the cancelled request on success
    /// - Ok(Err(NotFound)) if no such request exists
    /// - Ok(Err(AccessDenied)) if the caller is not the posting warehouse
    /// - Ok(Err(InvalidState)) if the request is not open
    fn cancel_bid_request(
        &self,
        request_id: Self::BidRequestId,
        caller_id: Self::PartyId,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<Result<BidRequestRecord<Self>, AuctionFailure>, Self::Error>> + Send;
}
