//! Page view models — what each route renders, as data.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::app::AppContext;
use crate::catalog::{CryptoCurrency, DonationCategory, DonationOpportunity, Donor, Recipient};
use crate::onboarding::WizardView;
use crate::wallet::WalletSnapshot;

use super::route::Route;

/// Summary shown in opportunity lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityCard {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub category: DonationCategory,
    /// "Global Initiative" or "<city> <country>".
    pub location: String,
    pub goal_amount: Decimal,
    pub raised_amount: Decimal,
    pub percent_funded: u32,
    pub image_url: Option<String>,
    pub link: String,
}

impl From<&DonationOpportunity> for OpportunityCard {
    fn from(o: &DonationOpportunity) -> Self {
        let location = if o.location.global {
            "Global Initiative".to_string()
        } else {
            match &o.location.city {
                Some(city) => format!("{city} {}", o.location.country),
                None => o.location.country.clone(),
            }
        };
        Self {
            id: o.id.clone(),
            title: o.title.clone(),
            summary: o.summary.clone(),
            category: o.category,
            location,
            goal_amount: o.goal_amount,
            raised_amount: o.raised_amount,
            percent_funded: o.percent_funded(),
            image_url: o.proof_urls.first().cloned(),
            link: Route::Opportunity { id: o.id.clone() }.path(),
        }
    }
}

fn cards<'a>(list: impl IntoIterator<Item = &'a DonationOpportunity>) -> Vec<OpportunityCard> {
    list.into_iter().map(OpportunityCard::from).collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageView {
    Home {
        featured: Vec<OpportunityCard>,
    },
    Opportunities {
        opportunities: Vec<OpportunityCard>,
    },
    #[serde(rename_all = "camelCase")]
    Opportunity {
        opportunity: Box<DonationOpportunity>,
        recipient: Box<Recipient>,
        percent_funded: u32,
        donate_link: String,
    },
    Donate {
        opportunity: OpportunityCard,
        recipient: Box<Recipient>,
        currencies: Vec<CryptoCurrency>,
        wallet: WalletSnapshot,
    },
    RecipientOnboarding {
        wizard: WizardView,
    },
    /// Static text pages.
    Info {
        title: &'static str,
        body: &'static str,
    },
    #[serde(rename_all = "camelCase")]
    DonorDashboard {
        donor: Box<Donor>,
        total_donated: Decimal,
        recommended: Vec<OpportunityCard>,
    },
    #[serde(rename_all = "camelCase")]
    NotFound {
        title: String,
        message: String,
        back_link: String,
    },
}

impl PageView {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    fn page_not_found(path: &str) -> Self {
        Self::NotFound {
            title: "Page not found".to_string(),
            message: format!("Nothing lives at {path}."),
            back_link: Route::Home.path(),
        }
    }

    fn opportunity_not_found() -> Self {
        Self::NotFound {
            title: "Opportunity not found".to_string(),
            message: "The opportunity you're looking for doesn't exist or has been removed."
                .to_string(),
            back_link: Route::Home.path(),
        }
    }
}

/// Produce the view for `route`. Lookup misses render `NotFound`.
pub async fn render(route: &Route, ctx: &AppContext) -> PageView {
    let catalog = &ctx.catalog;
    match route {
        Route::Home => PageView::Home {
            featured: cards(catalog.featured_opportunities()),
        },
        Route::Opportunities => PageView::Opportunities {
            opportunities: cards(catalog.all_opportunities()),
        },
        Route::Opportunity { id } => {
            let (Some(opportunity), Some(recipient)) =
                (catalog.opportunity_by_id(id), catalog.recipient_by_opportunity_id(id))
            else {
                debug!(id = %id, "Opportunity page lookup missed");
                return PageView::opportunity_not_found();
            };
            PageView::Opportunity {
                percent_funded: opportunity.percent_funded(),
                donate_link: Route::Donate { id: id.clone() }.path(),
                opportunity: Box::new(opportunity.clone()),
                recipient: Box::new(recipient.clone()),
            }
        }
        Route::Donate { id } => {
            let (Some(opportunity), Some(recipient)) =
                (catalog.opportunity_by_id(id), catalog.recipient_by_opportunity_id(id))
            else {
                debug!(id = %id, "Donate page lookup missed");
                return PageView::opportunity_not_found();
            };
            PageView::Donate {
                opportunity: OpportunityCard::from(opportunity),
                recipient: Box::new(recipient.clone()),
                currencies: CryptoCurrency::DONATABLE.to_vec(),
                wallet: ctx.wallet.snapshot().await,
            }
        }
        Route::RecipientOnboarding => PageView::RecipientOnboarding {
            wizard: ctx.wizard.lock().await.view(),
        },
        Route::Account => PageView::Info {
            title: "My Account",
            body: "Account details and settings will be available here soon.",
        },
        Route::HowItWorks => PageView::Info {
            title: "How It Works",
            body: "Fuel My Dream connects donors directly with verified recipients through a \
                   transparent cryptocurrency-based platform.",
        },
        Route::About => PageView::Info {
            title: "About Fuel My Dream",
            body: "Fuel My Dream is a decentralized donation platform that lets anyone support \
                   verified recipients using cryptocurrency, with transparent proof of impact \
                   and minimal fees.",
        },
        Route::DonorDashboard => {
            let donor = catalog.donor();
            let recommended = cards(
                catalog
                    .all_opportunities()
                    .iter()
                    .filter(|o| donor.preferred_categories.contains(&o.category)),
            );
            PageView::DonorDashboard {
                total_donated: donor.total_donated(),
                recommended,
                donor: Box::new(donor.clone()),
            }
        }
        Route::NotFound { path } => PageView::page_not_found(path),
    }
}
