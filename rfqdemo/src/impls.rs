//! Application implementation with JWT-based authorization.
//!
//! This module provides the concrete implementation of the Application trait,
//! binding the SQLite repositories to JWT-based authorization.

use headers::{Authorization, authorization::Bearer};
use jwt_simple::{
    claims::JWTClaims,
    prelude::{HS256Key, MACLike},
};
use rand::RngCore;
use rfq_core::{
    models::{BidProposal, BidRequestDetails},
    ports::Application,
};
use rfq_sqlite::{
    Db,
    types::{BidId, BidRequestId, DateTime, PartyId},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Main application implementation combining all system components.
///
/// This struct implements the Application trait and provides the integration
/// point for the database, authorization, and id generation. It uses JWT
/// tokens for authorization decisions.
#[derive(Clone)]
pub struct DemoApp {
    /// Database connection for persistent storage
    pub db: Db,
    /// HMAC key for JWT token verification
    pub key: HS256Key,
}

impl DemoApp {
    /// Extract and verify JWT claims from the authorization header.
    fn claims(&self, context: &Authorization<Bearer>) -> Option<JWTClaims<CustomJWTClaims>> {
        let token = context.0.token();
        self.key.verify_token::<CustomJWTClaims>(token, None).ok()
    }
}

/// Mint a v8 UUID whose high word sorts by the given timestamp.
///
/// The timestamp is partitioned into (48, 12, 4) bits and splatted into the
/// custom fields of a v8 pattern, with a namespace nibble distinguishing the
/// entity type and 56 random bits filling the remainder.
fn uuid_v8(now: time::OffsetDateTime, namespace: u64) -> Uuid {
    let rng56 = rand::rng().next_u64() >> 8; // 56 random bits

    let now = now.unix_timestamp() as u64;
    let now48 = 0xffff_ffff_ffff_0000 & now;
    let now12 = (0xfff0 & now) >> 4;
    let now04 = (0x000f & now) << 56;

    let hi = 0x0000_0000_0000_8000 | now48 | now12;
    let lo = (namespace << 60) | now04 | rng56;

    Uuid::from_u64_pair(hi, lo)
}

impl Application for DemoApp {
    type Context = Authorization<Bearer>;
    type Repository = Db;

    fn database(&self) -> &Self::Repository {
        &self.db
    }

    fn now(&self) -> DateTime {
        time::OffsetDateTime::now_utc().into()
    }

    fn generate_bid_request_id(&self, _details: &BidRequestDetails) -> (BidRequestId, DateTime) {
        let now = time::OffsetDateTime::now_utc();
        (uuid_v8(now, 0x9).into(), now.into())
    }

    fn generate_bid_id(&self, _proposal: &BidProposal) -> (BidId, DateTime) {
        let now = time::OffsetDateTime::now_utc();
        (uuid_v8(now, 0xa).into(), now.into())
    }

    async fn can_trade(&self, context: &Self::Context) -> Option<PartyId> {
        // The demo app takes the standard sub: claim to be the party id
        self.claims(context)?.subject?.parse().ok()
    }

    async fn can_manage_parties(&self, context: &Self::Context) -> bool {
        // maintaining the party directory requires an `admin: true` custom claim
        self.claims(context)
            .map(|claims| claims.custom.admin)
            .unwrap_or(false)
    }
}

/// Custom claims structure for JWT tokens.
///
/// Contains application-specific claims beyond standard JWT claims.
#[derive(Serialize, Deserialize)]
pub struct CustomJWTClaims {
    /// Indicates whether the token holder has admin privileges.
    #[serde(default)]
    pub admin: bool,
}
