//! Repository trait implementations for the SQLite database.
//!
//! This module contains the implementations of all repository traits defined in
//! `rfq-core` for the SQLite database backend.

use crate::{
    Db,
    types::{BidId, BidRequestId, DateTime, PartyId},
};
use rfq_core::ports::{AuctionRepository, Repository};

mod bid;
mod party;
mod request;

impl Repository for Db {
    type Error = sqlx::Error;
    type DateTime = DateTime;
    type PartyId = PartyId;
    type BidRequestId = BidRequestId;
    type BidId = BidId;
}

impl AuctionRepository for Db {}
