use headers::{Authorization, authorization::Bearer};
use rfq_core::{
    models::{BidProposal, BidRequestDetails},
    ports::Application,
};
use rfq_sqlite::{
    Db,
    types::{BidId, BidRequestId, DateTime, PartyId},
};

// In order to test the permission checks in our endpoints without standing up
// a JWT issuer, the test application reads the bearer token as plain text: a
// party's uuid acts as that party's token, and the literal string "admin"
// grants directory maintenance.
#[derive(Clone)]
pub struct TestApp(pub Db);

impl Application for TestApp {
    type Context = Authorization<Bearer>;
    type Repository = Db;

    fn database(&self) -> &Db {
        &self.0
    }

    fn now(&self) -> DateTime {
        time::OffsetDateTime::now_utc().into()
    }

    fn generate_bid_request_id(&self, _details: &BidRequestDetails) -> (BidRequestId, DateTime) {
        (uuid::Uuid::new_v4().into(), self.now())
    }

    fn generate_bid_id(&self, _proposal: &BidProposal) -> (BidId, DateTime) {
        (uuid::Uuid::new_v4().into(), self.now())
    }

    async fn can_trade(&self, context: &Self::Context) -> Option<PartyId> {
        context.0.token().parse().ok()
    }

    async fn can_manage_parties(&self, context: &Self::Context) -> bool {
        context.0.token() == "admin"
    }
}
