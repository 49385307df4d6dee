//! Rule tables for each onboarding step.

use std::sync::LazyLock;

use rust_decimal_macros::dec;

use crate::catalog::{DonationCategory, ProofType};

use super::schema::{FieldSpec, Schema};

/// Minimum funding goal a recipient may ask for.
pub const MIN_GOAL_AMOUNT: rust_decimal::Decimal = dec!(100);

static CATEGORY_NAMES: LazyLock<Vec<&'static str>> =
    LazyLock::new(|| DonationCategory::ALL.iter().map(|c| c.as_str()).collect());

static PROOF_TYPE_NAMES: LazyLock<Vec<&'static str>> =
    LazyLock::new(|| ProofType::ALL.iter().map(|p| p.as_str()).collect());

pub static BASIC_INFO: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(vec![
        FieldSpec::text("name").min_len(2, "Name must be at least 2 characters"),
        FieldSpec::text("bio").min_len(10, "Biography must be at least 10 characters"),
    ])
});

pub static OPPORTUNITY_DETAILS: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(vec![
        FieldSpec::text("title").min_len(5, "Title must be at least 5 characters"),
        FieldSpec::text("summary").min_len(20, "Summary must be at least 20 characters"),
        FieldSpec::text("description").min_len(50, "Description must be at least 50 characters"),
        FieldSpec::text("impact").min_len(20, "Impact description must be at least 20 characters"),
        FieldSpec::text("category")
            .required("Please select a category")
            .one_of(CATEGORY_NAMES.as_slice(), "Please select a category"),
        FieldSpec::text("country").min_len(2, "Country is required"),
        FieldSpec::optional_text("city"),
        FieldSpec::flag("isGlobal", Some(false)),
        FieldSpec::text("proofType")
            .required("Please select a proof type")
            .one_of(PROOF_TYPE_NAMES.as_slice(), "Please select a proof type"),
        FieldSpec::number("goalAmount")
            .invalid("Goal amount must be a number")
            .at_least(MIN_GOAL_AMOUNT, "Goal amount must be at least 100"),
    ])
});

pub static WALLET_SETUP: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(vec![
        FieldSpec::text("walletAddress").min_len(26, "Please enter a valid wallet address"),
        FieldSpec::text_list("proofCids"),
    ])
});

pub static IDENTITY_VERIFICATION: LazyLock<Schema> = LazyLock::new(|| {
    const TERMS: &str = "You must agree to the terms and conditions";
    Schema::new(vec![
        FieldSpec::text("proofOfIdentity").min_len(5, "Please provide proof of identity"),
        FieldSpec::text("proofOfWork").min_len(5, "Please provide proof of your work"),
        FieldSpec::flag("agreeToTerms", None).required(TERMS).must_be_true(TERMS),
    ])
});
