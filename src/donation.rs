//! Donate flow — validate the donation form, then hand off to the wallet.

use std::sync::LazyLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::catalog::{CryptoCurrency, DonationOpportunity};
use crate::notify::{Notification, Notifier};
use crate::onboarding::schema::{self, CandidateValues, FieldErrors, FieldSpec, Schema};
use crate::wallet::{DonationTransaction, WalletContext};

static CURRENCY_NAMES: LazyLock<Vec<&'static str>> =
    LazyLock::new(|| CryptoCurrency::DONATABLE.iter().map(|c| c.as_str()).collect());

/// Rule table for the donate form.
pub static DONATION_FORM: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(vec![
        FieldSpec::text("amount")
            .required("Amount is required")
            .min_len(1, "Amount is required")
            .positive_decimal("Amount must be greater than 0"),
        FieldSpec::text("currency")
            .required("Currency is required")
            .one_of(CURRENCY_NAMES.as_slice(), "Currency is required"),
    ])
});

/// A validated donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationForm {
    pub amount: Decimal,
    pub currency: CryptoCurrency,
}

impl DonationForm {
    /// Validate raw form values. A missing currency means ETH.
    pub fn parse(candidate: &CandidateValues) -> Result<Self, FieldErrors> {
        let mut values = candidate.clone();
        if values.get("currency").is_none_or(Value::is_null) {
            values.insert(
                "currency".to_string(),
                Value::String(CryptoCurrency::default().as_str().to_string()),
            );
        }
        schema::parse(&DONATION_FORM, &values)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DonationOutcome {
    Completed { transaction: DonationTransaction },
    Invalid { errors: FieldErrors },
    WalletNotConnected,
    /// The wallet context already told the user why.
    Failed,
}

/// Run the donate page's submit handler for `opportunity`.
///
/// Only `Completed` means money moved; every other outcome leaves the
/// caller's state untouched.
pub async fn submit_donation(
    wallet: &WalletContext,
    notifier: &dyn Notifier,
    opportunity: &DonationOpportunity,
    candidate: &CandidateValues,
) -> DonationOutcome {
    let form = match DonationForm::parse(candidate) {
        Ok(form) => form,
        Err(errors) => return DonationOutcome::Invalid { errors },
    };

    if !wallet.connection().await.is_connected() {
        notifier.notify(Notification::destructive(
            "Wallet Not Connected",
            "Please connect your wallet to donate.",
        ));
        return DonationOutcome::WalletNotConnected;
    }

    let Some(transaction) = wallet
        .donate_in(
            form.currency,
            &opportunity.id,
            form.amount,
            &opportunity.recipient_address,
        )
        .await
    else {
        return DonationOutcome::Failed;
    };

    info!(
        opportunity_id = %opportunity.id,
        amount = %form.amount,
        currency = %form.currency,
        tx = %transaction.transaction_hash,
        "Donation completed"
    );
    notifier.notify(Notification::info(
        "Donation Successful",
        format!(
            "You've donated {} {} to {}.",
            form.amount, form.currency, opportunity.title
        ),
    ));
    DonationOutcome::Completed { transaction }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    fn form(value: Value) -> Result<DonationForm, FieldErrors> {
        DonationForm::parse(value.as_object().unwrap())
    }

    #[test]
    fn amount_must_be_positive_number() {
        let zero = form(json!({ "amount": "0" })).unwrap_err();
        assert_eq!(zero.get("amount"), Some("Amount must be greater than 0"));

        let text = form(json!({ "amount": "abc" })).unwrap_err();
        assert_eq!(text.len(), 1);
        assert_eq!(text.get("amount"), Some("Amount must be greater than 0"));

        let ok = form(json!({ "amount": "0.5" })).unwrap();
        assert_eq!(ok.amount, dec!(0.5));
    }

    #[test]
    fn empty_amount_is_required() {
        assert_eq!(
            form(json!({ "amount": "" })).unwrap_err().get("amount"),
            Some("Amount is required")
        );
        assert_eq!(form(json!({})).unwrap_err().get("amount"), Some("Amount is required"));
    }

    #[test]
    fn currency_defaults_to_eth_and_is_restricted() {
        assert_eq!(form(json!({ "amount": "1" })).unwrap().currency, CryptoCurrency::Eth);
        assert_eq!(
            form(json!({ "amount": "1", "currency": "DAI" })).unwrap().currency,
            CryptoCurrency::Dai
        );
        assert_eq!(
            form(json!({ "amount": "1", "currency": "BTC" })).unwrap_err().get("currency"),
            Some("Currency is required")
        );
    }
}
