use rfq_core::{
    models::{
        BidProposal, BidRequestDetails, BidRequirements, Budget, DeliveryLocation, DeliveryTerms,
        FactoryCapacity, Location, PartyDetails, PartyRole, PriceBreakdown, Pricing, Proposal,
        QualityAssurance, Quantity, Specifications, Urgency,
    },
    ports::{Application, PartyRepository as _},
};
use rfq_sqlite::{
    Db,
    config::SqliteConfig,
    types::{BidId, BidRequestId, DateTime, PartyId},
};
use std::sync::{Arc, Mutex};

/// A test application over an in-memory database, with a clock the tests
/// control explicitly so deadline logic is deterministic.
#[derive(Clone)]
pub struct TestApp {
    pub db: Db,
    now: Arc<Mutex<time::OffsetDateTime>>,
}

impl TestApp {
    pub async fn new() -> anyhow::Result<Self> {
        let db = Db::open(&SqliteConfig::default()).await?;
        Ok(Self {
            db,
            now: Arc::new(Mutex::new(time::OffsetDateTime::now_utc())),
        })
    }

    /// Move the clock forward.
    pub fn advance(&self, duration: time::Duration) {
        *self.now.lock().unwrap() += duration;
    }

    /// Register a warehouse in the party directory.
    pub async fn warehouse(&self, name: &str) -> anyhow::Result<PartyId> {
        self.party(PartyRole::Warehouse, name, None).await
    }

    /// Register a factory in the party directory.
    pub async fn factory(&self, name: &str) -> anyhow::Result<PartyId> {
        self.party(PartyRole::Factory, name, Some(4.2)).await
    }

    async fn party(
        &self,
        role: PartyRole,
        name: &str,
        rating: Option<f64>,
    ) -> anyhow::Result<PartyId> {
        let id = PartyId(uuid::Uuid::new_v4());
        self.db
            .upsert_party(
                id,
                PartyDetails {
                    role,
                    name: name.into(),
                    location: Location {
                        address: "12 Harbor Rd".into(),
                        latitude: 41.5,
                        longitude: -81.7,
                    },
                    rating,
                },
                self.now(),
            )
            .await?;
        Ok(id)
    }
}

impl Application for TestApp {
    type Context = ();
    type Repository = Db;

    fn database(&self) -> &Db {
        &self.db
    }

    fn now(&self) -> DateTime {
        (*self.now.lock().unwrap()).into()
    }

    fn generate_bid_request_id(&self, _details: &BidRequestDetails) -> (BidRequestId, DateTime) {
        (uuid::Uuid::new_v4().into(), self.now())
    }

    fn generate_bid_id(&self, _proposal: &BidProposal) -> (BidId, DateTime) {
        (uuid::Uuid::new_v4().into(), self.now())
    }

    async fn can_trade(&self, _context: &()) -> Option<PartyId> {
        None
    }

    async fn can_manage_parties(&self, _context: &()) -> bool {
        false
    }
}

/// A minimal but fully-populated request description.
pub fn details(category: &str) -> BidRequestDetails {
    BidRequestDetails {
        product_name: "corrugated shipping boxes".into(),
        category: category.into(),
        quantity: Quantity::new(100).unwrap(),
        specifications: Specifications {
            description: "double-wall, 60x40x40cm".into(),
            custom_requirements: None,
            quality_standards: Some("ECT-44".into()),
            packaging_requirements: None,
            delivery_location: DeliveryLocation {
                address: "1 Depot Way".into(),
                city: "Dayton".into(),
                state: "OH".into(),
                latitude: 39.76,
                longitude: -84.19,
            },
        },
        budget: Budget {
            min_price: 800.0,
            max_price: 1500.0,
            preferred_price: 1100.0,
        },
        urgency: Urgency::Medium,
        bid_requirements: BidRequirements::default(),
        notes: None,
    }
}

/// A proposal quoting the given total price.
pub fn proposal(total_price: f64) -> BidProposal {
    BidProposal {
        pricing: Pricing {
            unit_price: total_price / 100.0,
            total_price,
            price_breakdown: Some(PriceBreakdown {
                material_cost: Some(total_price * 0.6),
                labor_cost: Some(total_price * 0.3),
                overhead_cost: None,
                margin: Some(total_price * 0.1),
            }),
            discount_offered: 0.0,
            payment_terms: "net 30".into(),
        },
        delivery: DeliveryTerms {
            delivery_method: "ground freight".into(),
            shipping_cost: 75.0,
            production_time_in_days: 14,
        },
        quality_assurance: QualityAssurance {
            certifications: vec!["ISO 9001".into()],
            quality_guarantee: "full replacement on defects".into(),
            warranty_coverage: None,
            sample_available: true,
        },
        factory_capacity: FactoryCapacity {
            current_capacity: 0.4,
            max_capacity: 1.0,
            experience_years: 12,
            similar_projects_completed: 30,
        },
        proposal: Proposal {
            message: "we can start production this week".into(),
            alternative_specs: None,
            value_proposition: "fastest turnaround in the region".into(),
            risk_mitigation: None,
        },
        competitive_advantages: vec![],
    }
}
