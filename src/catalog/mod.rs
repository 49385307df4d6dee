//! Read-only catalog of opportunities, recipients and the demo donor.
//!
//! Lookups never fail: a miss is `None` or an empty list, and callers decide
//! how to render it.

pub mod fixtures;
pub mod model;
pub mod routes;

pub use model::{
    CryptoCurrency, DonationCategory, DonationHistory, DonationOpportunity, Donor, Geography,
    ProofType, Recipient,
};
pub use routes::catalog_routes;

/// In-memory read model.
#[derive(Debug, Clone)]
pub struct Catalog {
    opportunities: Vec<DonationOpportunity>,
    recipients: Vec<Recipient>,
    donor: Donor,
}

impl Catalog {
    pub fn new(
        opportunities: Vec<DonationOpportunity>,
        recipients: Vec<Recipient>,
        donor: Donor,
    ) -> Self {
        Self {
            opportunities,
            recipients,
            donor,
        }
    }

    /// Catalog loaded with the bundled fixtures.
    pub fn seeded() -> Self {
        Self::new(fixtures::opportunities(), fixtures::recipients(), fixtures::donor())
    }

    pub fn all_opportunities(&self) -> &[DonationOpportunity] {
        &self.opportunities
    }

    pub fn featured_opportunities(&self) -> Vec<&DonationOpportunity> {
        self.opportunities.iter().filter(|o| o.featured).collect()
    }

    pub fn opportunity_by_id(&self, id: &str) -> Option<&DonationOpportunity> {
        self.opportunities.iter().find(|o| o.id == id)
    }

    pub fn recipient_by_id(&self, id: &str) -> Option<&Recipient> {
        self.recipients.iter().find(|r| r.id == id)
    }

    pub fn recipient_by_opportunity_id(&self, opportunity_id: &str) -> Option<&Recipient> {
        let opportunity = self.opportunity_by_id(opportunity_id)?;
        self.recipient_by_id(&opportunity.recipient_id)
    }

    /// Exact match on the category's display name, e.g. `"Emergency Relief"`.
    pub fn opportunities_by_category(&self, category: &str) -> Vec<&DonationOpportunity> {
        self.opportunities
            .iter()
            .filter(|o| o.category.as_str() == category)
            .collect()
    }

    /// Opportunities located in `country`, plus every global one.
    pub fn opportunities_by_country(&self, country: &str) -> Vec<&DonationOpportunity> {
        self.opportunities
            .iter()
            .filter(|o| o.location.global || o.location.country == country)
            .collect()
    }

    pub fn donor(&self) -> &Donor {
        &self.donor
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}
