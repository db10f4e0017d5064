use crate::{
    Db,
    types::{BidRequestId, BidRow, DateTime, PartyId},
};
use rfq_core::{
    models::{
        BidProposal, BidRecord, DateTimeRangeQuery, DateTimeRangeResponse, SettlementOutcome,
    },
    ports::{AuctionFailure, BidRepository},
};

/// The columns every bid view selects, in `BidRow` order.
const BID_COLUMNS: &str = r#"
    bid.id,
    bid.bid_request_id,
    bid.factory_id,
    bid.status,
    json(bid.proposal) as proposal,
    bid.valid_until,
    bid.estimated_delivery_date,
    bid.submitted_at,
    bid.updated_at
"#;

/// The parent request's summary, joined into factory-facing bid views.
const REQUEST_SUMMARY_COLUMNS: &str = r#"
    bid_request.warehouse_id as request_warehouse_id,
    bid_request.details ->> 'product_name' as request_product_name,
    bid_request.category as request_category,
    bid_request.details ->> 'quantity' as request_quantity,
    bid_request.status as request_status,
    bid_request.bidding_deadline as request_bidding_deadline
"#;

impl BidRepository for Db {
    async fn submit_bid(
        &self,
        bid_id: Self::BidId,
        request_id: Self::BidRequestId,
        factory_id: Self::PartyId,
        proposal: BidProposal,
        valid_until: Option<Self::DateTime>,
        estimated_delivery_date: Option<Self::DateTime>,
        as_of: Self::DateTime,
    ) -> Result<Result<BidRecord<Self>, AuctionFailure>, Self::Error> {
        let mut tx = self.writer.begin().await?;

        // The precondition ladder. Each check is a distinct refusal so the
        // factory learns exactly which rule it tripped.
        let request: Option<(String, DateTime)> =
            sqlx::query_as("select status, bidding_deadline from bid_request where id = $1")
                .bind(request_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((status, bidding_deadline)) = request else {
            return Ok(Err(AuctionFailure::NotFound("bid request")));
        };

        let role: Option<String> = sqlx::query_scalar("select role from party where id = $1")
            .bind(factory_id)
            .fetch_optional(&mut *tx)
            .await?;
        if role.as_deref() != Some("factory") {
            return Ok(Err(AuctionFailure::AccessDenied("only factories may bid")));
        }

        if status != "open" {
            return Ok(Err(AuctionFailure::InvalidState("request not open")));
        }
        if as_of > bidding_deadline {
            return Ok(Err(AuctionFailure::InvalidState("deadline passed")));
        }

        // This pre-check exists for the friendlier error; the unique index on
        // (bid_request_id, factory_id) is the actual invariant. Withdrawn
        // bids count: a factory does not get a second swing at a request.
        let existing: i64 = sqlx::query_scalar(
            "select count(*) from bid where bid_request_id = $1 and factory_id = $2",
        )
        .bind(request_id)
        .bind(factory_id)
        .fetch_one(&mut *tx)
        .await?;
        if existing > 0 {
            return Ok(Err(AuctionFailure::Conflict("duplicate bid")));
        }

        let as_of_odt: time::OffsetDateTime = as_of.into();
        let valid_until =
            valid_until.unwrap_or_else(|| (as_of_odt + time::Duration::days(30)).into());
        let estimated_delivery_date = estimated_delivery_date.unwrap_or_else(|| {
            (as_of_odt + time::Duration::days(proposal.delivery.production_time_in_days as i64))
                .into()
        });

        let row = sqlx::query_as::<_, BidRow>(&format!(
            r#"
            insert into
                bid (id, bid_request_id, factory_id, status, total_price, proposal, valid_until, estimated_delivery_date, submitted_at, updated_at)
            values
                ($1, $2, $3, 'submitted', $4, jsonb($5), $6, $7, $8, $8)
            returning
                {BID_COLUMNS}
            "#
        ))
        .bind(bid_id)
        .bind(request_id)
        .bind(factory_id)
        .bind(proposal.pricing.total_price)
        .bind(sqlx::types::Json(&proposal))
        .bind(valid_until)
        .bind(estimated_delivery_date)
        .bind(as_of)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Ok(row.try_into()?))
    }

    async fn get_bid(
        &self,
        bid_id: Self::BidId,
        caller_id: Self::PartyId,
    ) -> Result<Result<BidRecord<Self>, AuctionFailure>, Self::Error> {
        let row = sqlx::query_as::<_, BidRow>(&format!(
            r#"
            select
                {BID_COLUMNS},
                {REQUEST_SUMMARY_COLUMNS}
            from
                bid
            join
                bid_request
            on
                bid_request.id = bid.bid_request_id
            where
                bid.id = $1
            "#
        ))
        .bind(bid_id)
        .fetch_optional(&self.reader)
        .await?;

        let Some(row) = row else {
            return Ok(Err(AuctionFailure::NotFound("bid")));
        };
        if row.factory_id != caller_id && row.request_warehouse_id != Some(caller_id) {
            return Ok(Err(AuctionFailure::AccessDenied("not your bid")));
        }

        Ok(Ok(row.try_into()?))
    }

    async fn withdraw_bid(
        &self,
        bid_id: Self::BidId,
        factory_id: Self::PartyId,
        as_of: Self::DateTime,
    ) -> Result<Result<BidRecord<Self>, AuctionFailure>, Self::Error> {
        let mut tx = self.writer.begin().await?;

        let current: Option<(PartyId, String)> =
            sqlx::query_as("select factory_id, status from bid where id = $1")
                .bind(bid_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((owner, status)) = current else {
            return Ok(Err(AuctionFailure::NotFound("bid")));
        };
        if owner != factory_id {
            return Ok(Err(AuctionFailure::AccessDenied("not your bid")));
        }
        if status != "submitted" {
            return Ok(Err(AuctionFailure::InvalidState("bid not submitted")));
        }

        let row = sqlx::query_as::<_, BidRow>(&format!(
            r#"
            update
                bid
            set
                status = 'withdrawn',
                updated_at = $2
            where
                id = $1
            returning
                {BID_COLUMNS}
            "#
        ))
        .bind(bid_id)
        .bind(as_of)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Ok(row.try_into()?))
    }

    async fn query_request_bids(
        &self,
        request_id: Self::BidRequestId,
        caller_id: Self::PartyId,
    ) -> Result<Result<Vec<BidRecord<Self>>, AuctionFailure>, Self::Error> {
        let owner: Option<PartyId> =
            sqlx::query_scalar("select warehouse_id from bid_request where id = $1")
                .bind(request_id)
                .fetch_optional(&self.reader)
                .await?;
        let Some(owner) = owner else {
            return Ok(Err(AuctionFailure::NotFound("bid request")));
        };
        if owner != caller_id {
            return Ok(Err(AuctionFailure::AccessDenied("not your bid request")));
        }

        // Cheapest first, so the most competitive offer leads the review.
        let rows = sqlx::query_as::<_, BidRow>(&format!(
            r#"
            select
                {BID_COLUMNS}
            from
                bid
            where
                bid.bid_request_id = $1
            order by
                bid.total_price asc
            "#
        ))
        .bind(request_id)
        .fetch_all(&self.reader)
        .await?;

        Ok(Ok(rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<_, _>>()?))
    }

    async fn query_factory_bids(
        &self,
        factory_id: Self::PartyId,
        query: DateTimeRangeQuery<Self::DateTime>,
        limit: usize,
    ) -> Result<DateTimeRangeResponse<BidRecord<Self>, Self::DateTime>, Self::Error> {
        let limit_p1 = (limit + 1) as i64;
        let mut rows = sqlx::query_as::<_, BidRow>(&format!(
            r#"
            select
                {BID_COLUMNS},
                {REQUEST_SUMMARY_COLUMNS}
            from
                bid
            join
                bid_request
            on
                bid_request.id = bid.bid_request_id
            where
                bid.factory_id = $1
            and
                ($2 is null or bid.submitted_at >= $2)
            and
                ($3 is null or bid.submitted_at <= $3)
            order by
                bid.submitted_at desc
            limit $4
            "#
        ))
        .bind(factory_id)
        .bind(query.after)
        .bind(query.before)
        .bind(limit_p1) // +1 to check if there are more results
        .fetch_all(&self.reader)
        .await?;

        let more = if rows.len() == limit + 1 {
            let extra = rows.pop().unwrap();
            Some(DateTimeRangeQuery {
                before: Some(extra.submitted_at),
                after: query.after,
            })
        } else {
            None
        };

        Ok(DateTimeRangeResponse {
            results: rows
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<_, _>>()?,
            more,
        })
    }

    async fn accept_bid(
        &self,
        bid_id: Self::BidId,
        warehouse_id: Self::PartyId,
        as_of: Self::DateTime,
    ) -> Result<Result<SettlementOutcome<Self>, AuctionFailure>, Self::Error> {
        let mut tx = self.writer.begin().await?;

        let current: Option<(BidRequestId, String, PartyId, String)> = sqlx::query_as(
            r#"
            select
                bid.bid_request_id,
                bid.status,
                bid_request.warehouse_id,
                bid_request.status
            from
                bid
            join
                bid_request
            on
                bid_request.id = bid.bid_request_id
            where
                bid.id = $1
            "#,
        )
        .bind(bid_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((request_id, bid_status, owner, request_status)) = current else {
            return Ok(Err(AuctionFailure::NotFound("bid")));
        };
        if owner != warehouse_id {
            return Ok(Err(AuctionFailure::AccessDenied("not your bid request")));
        }
        // The state guards double as the idempotency barrier: once settlement
        // commits, any retry fails here instead of double-applying.
        if bid_status != "submitted" {
            return Ok(Err(AuctionFailure::InvalidState("bid not submitted")));
        }
        if request_status != "open" {
            return Ok(Err(AuctionFailure::InvalidState("request not open")));
        }

        // The three settlement writes. They commit together or not at all;
        // the single-connection writer serializes this with every other
        // guarded mutation, so no reader observes a half-settled request.
        sqlx::query("update bid set status = 'accepted', updated_at = $2 where id = $1")
            .bind(bid_id)
            .bind(as_of)
            .execute(&mut *tx)
            .await?;

        sqlx::query("update bid_request set status = 'awarded', updated_at = $2 where id = $1")
            .bind(request_id)
            .bind(as_of)
            .execute(&mut *tx)
            .await?;

        // Only live bids are swept aside; withdrawn bids stay withdrawn.
        let rejected_bids = sqlx::query(
            r#"
            update
                bid
            set
                status = 'rejected',
                updated_at = $3
            where
                bid_request_id = $1
            and
                id != $2
            and
                status = 'submitted'
            "#,
        )
        .bind(request_id)
        .bind(bid_id)
        .bind(as_of)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let row = sqlx::query_as::<_, BidRow>(&format!(
            r#"
            select
                {BID_COLUMNS},
                {REQUEST_SUMMARY_COLUMNS}
            from
                bid
            join
                bid_request
            on
                bid_request.id = bid.bid_request_id
            where
                bid.id = $1
            "#
        ))
        .bind(bid_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Ok(SettlementOutcome {
            bid: row.try_into()?,
            rejected_bids,
        }))
    }
}
