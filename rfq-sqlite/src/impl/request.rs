use crate::{
    Db,
    types::{BidRequestRow, PartyId},
};
use rfq_core::{
    models::{
        BidRequestDetails, BidRequestRecord, DateTimeRangeQuery, DateTimeRangeResponse,
    },
    ports::{AuctionFailure, BidRequestRepository},
};

/// The columns every bid request view selects, in `BidRequestRow` order.
const REQUEST_COLUMNS: &str = r#"
    bid_request.id,
    bid_request.warehouse_id,
    bid_request.status,
    json(bid_request.details) as details,
    bid_request.bidding_deadline,
    bid_request.requested_delivery_date,
    bid_request.created_at,
    bid_request.updated_at
"#;

impl BidRequestRepository for Db {
    async fn create_bid_request(
        &self,
        request_id: Self::BidRequestId,
        warehouse_id: Self::PartyId,
        details: BidRequestDetails,
        bidding_deadline: Option<Self::DateTime>,
        requested_delivery_date: Option<Self::DateTime>,
        as_of: Self::DateTime,
    ) -> Result<Result<BidRequestRecord<Self>, AuctionFailure>, Self::Error> {
        let mut tx = self.writer.begin().await?;

        let role: Option<String> = sqlx::query_scalar("select role from party where id = $1")
            .bind(warehouse_id)
            .fetch_optional(&mut *tx)
            .await?;
        if role.as_deref() != Some("warehouse") {
            return Ok(Err(AuctionFailure::AccessDenied(
                "only warehouses may post bid requests",
            )));
        }

        // The deadline must be strictly in the future of `as_of`; when the
        // warehouse does not name one, it gets a week of bidding.
        let bidding_deadline = match bidding_deadline {
            Some(deadline) if deadline <= as_of => {
                return Ok(Err(AuctionFailure::Validation(
                    "bidding deadline must be in the future",
                )));
            }
            Some(deadline) => deadline,
            None => {
                let as_of: time::OffsetDateTime = as_of.into();
                (as_of + time::Duration::days(7)).into()
            }
        };

        let row = sqlx::query_as::<_, BidRequestRow>(&format!(
            r#"
            insert into
                bid_request (id, warehouse_id, status, category, details, bidding_deadline, requested_delivery_date, created_at, updated_at)
            values
                ($1, $2, 'open', $3, jsonb($4), $5, $6, $7, $7)
            returning
                {REQUEST_COLUMNS}
            "#
        ))
        .bind(request_id)
        .bind(warehouse_id)
        .bind(&details.category)
        .bind(sqlx::types::Json(&details))
        .bind(bidding_deadline)
        .bind(requested_delivery_date)
        .bind(as_of)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Ok(row.into()))
    }

    async fn get_bid_request(
        &self,
        request_id: Self::BidRequestId,
        caller_id: Self::PartyId,
    ) -> Result<Result<BidRequestRecord<Self>, AuctionFailure>, Self::Error> {
        let row = sqlx::query_as::<_, BidRequestRow>(&format!(
            r#"
            select
                {REQUEST_COLUMNS},
                (select count(*) from bid where bid.bid_request_id = bid_request.id) as bid_count
            from
                bid_request
            where
                bid_request.id = $1
            "#
        ))
        .bind(request_id)
        .fetch_optional(&self.reader)
        .await?;

        let Some(row) = row else {
            return Ok(Err(AuctionFailure::NotFound("bid request")));
        };

        // A warehouse may only inspect its own requests; any factory may
        // inspect any request, since it needs the detail to bid.
        if row.warehouse_id != caller_id {
            let role: Option<String> = sqlx::query_scalar("select role from party where id = $1")
                .bind(caller_id)
                .fetch_optional(&self.reader)
                .await?;
            if role.as_deref() != Some("factory") {
                return Ok(Err(AuctionFailure::AccessDenied("not your bid request")));
            }
        }

        Ok(Ok(row.into()))
    }

    async fn query_open_bid_requests(
        &self,
        category: Option<String>,
        as_of: Self::DateTime,
        query: DateTimeRangeQuery<Self::DateTime>,
        limit: usize,
    ) -> Result<DateTimeRangeResponse<BidRequestRecord<Self>, Self::DateTime>, Self::Error> {
        let limit_p1 = (limit + 1) as i64;
        let mut rows = sqlx::query_as::<_, BidRequestRow>(&format!(
            r#"
            select
                {REQUEST_COLUMNS},
                party.name as warehouse_name,
                json(party.location) as warehouse_location
            from
                bid_request
            join
                party
            on
                party.id = bid_request.warehouse_id
            where
                bid_request.status = 'open'
            and
                bid_request.bidding_deadline > $1
            and
                ($2 is null or bid_request.category = $2)
            and
                ($3 is null or bid_request.created_at >= $3)
            and
                ($4 is null or bid_request.created_at <= $4)
            order by
                bid_request.created_at desc
            limit $5
            "#
        ))
        .bind(as_of)
        .bind(category)
        .bind(query.after)
        .bind(query.before)
        .bind(limit_p1) // +1 to check if there are more results
        .fetch_all(&self.reader)
        .await?;

        // We paginate by adding 1 to the limit, popping the result off, and
        // using it to adjust the query object
        let more = if rows.len() == limit + 1 {
            let extra = rows.pop().unwrap();
            Some(DateTimeRangeQuery {
                before: Some(extra.created_at),
                after: query.after,
            })
        } else {
            None
        };

        Ok(DateTimeRangeResponse {
            results: rows.into_iter().map(Into::into).collect(),
            more,
        })
    }

    async fn query_warehouse_bid_requests(
        &self,
        warehouse_id: Self::PartyId,
        query: DateTimeRangeQuery<Self::DateTime>,
        limit: usize,
    ) -> Result<DateTimeRangeResponse<BidRequestRecord<Self>, Self::DateTime>, Self::Error> {
        let limit_p1 = (limit + 1) as i64;
        let mut rows = sqlx::query_as::<_, BidRequestRow>(&format!(
            r#"
            select
                {REQUEST_COLUMNS},
                (select count(*) from bid where bid.bid_request_id = bid_request.id) as bid_count
            from
                bid_request
            where
                bid_request.warehouse_id = $1
            and
                ($2 is null or bid_request.created_at >= $2)
            and
                ($3 is null or bid_request.created_at <= $3)
            order by
                bid_request.created_at desc
            limit $4
            "#
        ))
        .bind(warehouse_id)
        .bind(query.after)
        .bind(query.before)
        .bind(limit_p1)
        .fetch_all(&self.reader)
        .await?;

        let more = if rows.len() == limit + 1 {
            let extra = rows.pop().unwrap();
            Some(DateTimeRangeQuery {
                before: Some(extra.created_at),
                after: query.after,
            })
        } else {
            None
        };

        Ok(DateTimeRangeResponse {
            results: rows.into_iter().map(Into::into).collect(),
            more,
        })
    }

    async fn cancel_bid_request(
        &self,
        request_id: Self::BidRequestId,
        caller_id: Self::PartyId,
        as_of: Self::DateTime,
    ) -> Result<Result<BidRequestRecord<Self>, AuctionFailure>, Self::Error> {
        let mut tx = self.writer.begin().await?;

        let current: Option<(PartyId, String)> =
            sqlx::query_as("select warehouse_id, status from bid_request where id = $1")
                .bind(request_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((owner, status)) = current else {
            return Ok(Err(AuctionFailure::NotFound("bid request")));
        };
        if owner != caller_id {
            return Ok(Err(AuctionFailure::AccessDenied("not your bid request")));
        }
        if status != "open" {
            return Ok(Err(AuctionFailure::InvalidState("request not open")));
        }

        // Bids on the request are left as they are: a submitted bid against a
        // cancelled request may still be withdrawn, but settlement will never
        // accept it because the request is no longer open.
        let row = sqlx::query_as::<_, BidRequestRow>(&format!(
            r#"
            update
                bid_request
            set
                status = 'cancelled',
                updated_at = $2
            where
                id = $1
            returning
                {REQUEST_COLUMNS}
            "#
        ))
        .bind(request_id)
        .bind(as_of)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Ok(row.into()))
    }
}
