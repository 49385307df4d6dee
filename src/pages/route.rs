//! Named client paths.

use serde::Serialize;

/// A page the front-end can show. Unknown paths parse to `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    Home,
    Opportunities,
    Opportunity { id: String },
    Donate { id: String },
    RecipientOnboarding,
    Account,
    HowItWorks,
    About,
    DonorDashboard,
    NotFound { path: String },
}

impl Route {
    /// Parse a path such as `/opportunity/3`. Query strings and a trailing
    /// slash are ignored.
    pub fn parse(path: &str) -> Self {
        let path_only = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path_only.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["opportunities"] => Self::Opportunities,
            ["opportunity", id] => Self::Opportunity { id: id.to_string() },
            ["donate", id] => Self::Donate { id: id.to_string() },
            ["recipient-onboarding"] => Self::RecipientOnboarding,
            ["account"] => Self::Account,
            ["how-it-works"] => Self::HowItWorks,
            ["about"] => Self::About,
            ["donor-dashboard"] => Self::DonorDashboard,
            _ => Self::NotFound {
                path: path_only.to_string(),
            },
        }
    }

    /// Canonical path for this route.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Opportunities => "/opportunities".to_string(),
            Self::Opportunity { id } => format!("/opportunity/{id}"),
            Self::Donate { id } => format!("/donate/{id}"),
            Self::RecipientOnboarding => "/recipient-onboarding".to_string(),
            Self::Account => "/account".to_string(),
            Self::HowItWorks => "/how-it-works".to_string(),
            Self::About => "/about".to_string(),
            Self::DonorDashboard => "/donor-dashboard".to_string(),
            Self::NotFound { path } => path.clone(),
        }
    }
}
