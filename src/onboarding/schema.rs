//! Field validation engine.
//!
//! A [`Schema`] is a table of [`FieldSpec`]s. Each spec names a field, says
//! how its raw JSON value is coerced ([`FieldKind`]), and lists the
//! [`Rule`]s the coerced value must satisfy. [`validate`] evaluates every
//! field and returns either the normalized values or one message per failing
//! field; there is no per-field ad hoc checking anywhere else.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw values as entered by the user, keyed by field name.
pub type CandidateValues = Map<String, Value>;

/// Values after coercion, keyed by field name. Only schema fields appear.
pub type NormalizedValues = Map<String, Value>;

/// Key used when a validated value set cannot be turned into its record type.
pub const FORM_ERROR_KEY: &str = "_form";

const REQUIRED: &str = "Required";
const EXPECTED_STRING: &str = "Expected string";
const EXPECTED_BOOLEAN: &str = "Expected boolean";
const EXPECTED_NUMBER: &str = "Expected number";
const EXPECTED_LIST: &str = "Expected list of strings";

/// One message per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// How a raw value is coerced before rules run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Required string.
    Text,
    /// String that may be absent; an empty string is treated as absent.
    OptionalText,
    /// Boolean. When absent, falls back to `default` or fails as required.
    Flag { default: Option<bool> },
    /// Number, accepting JSON numbers and numeric strings. An empty string
    /// coerces to zero.
    Number,
    /// Optional list of strings, absent means empty.
    TextList,
}

/// A predicate on a coerced value.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// String has at least `min` characters.
    MinLength { min: usize, message: &'static str },
    /// String is one of a closed set.
    OneOf {
        allowed: &'static [&'static str],
        message: &'static str,
    },
    /// Number is at least `min`.
    AtLeast { min: Decimal, message: &'static str },
    /// String parses as a decimal greater than zero. Parsing and the bound
    /// are one check, so a non-numeric string yields a single error.
    PositiveDecimal { message: &'static str },
    /// Boolean is `true`.
    MustBeTrue { message: &'static str },
}

impl Rule {
    fn check(&self, value: &Value) -> Result<(), &'static str> {
        match self {
            Rule::MinLength { min, message } => match value.as_str() {
                Some(s) if s.chars().count() >= *min => Ok(()),
                _ => Err(*message),
            },
            Rule::OneOf { allowed, message } => match value.as_str() {
                Some(s) if allowed.iter().any(|a| *a == s) => Ok(()),
                _ => Err(*message),
            },
            Rule::AtLeast { min, message } => match value.as_str().and_then(parse_decimal) {
                Some(n) if n >= *min => Ok(()),
                _ => Err(*message),
            },
            Rule::PositiveDecimal { message } => match value.as_str().and_then(parse_decimal) {
                Some(n) if n > Decimal::ZERO => Ok(()),
                _ => Err(*message),
            },
            Rule::MustBeTrue { message } => match value.as_bool() {
                Some(true) => Ok(()),
                _ => Err(*message),
            },
        }
    }
}

/// One row of the rule table.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Message when a required value is absent.
    pub required_message: &'static str,
    /// Message when the value has the wrong shape for `kind`.
    pub type_message: &'static str,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    fn new(name: &'static str, kind: FieldKind, type_message: &'static str) -> Self {
        Self {
            name,
            kind,
            required_message: REQUIRED,
            type_message,
            rules: Vec::new(),
        }
    }

    pub fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text, EXPECTED_STRING)
    }

    pub fn optional_text(name: &'static str) -> Self {
        Self::new(name, FieldKind::OptionalText, EXPECTED_STRING)
    }

    pub fn flag(name: &'static str, default: Option<bool>) -> Self {
        Self::new(name, FieldKind::Flag { default }, EXPECTED_BOOLEAN)
    }

    pub fn number(name: &'static str) -> Self {
        Self::new(name, FieldKind::Number, EXPECTED_NUMBER)
    }

    pub fn text_list(name: &'static str) -> Self {
        Self::new(name, FieldKind::TextList, EXPECTED_LIST)
    }

    pub fn required(mut self, message: &'static str) -> Self {
        self.required_message = message;
        self
    }

    pub fn invalid(mut self, message: &'static str) -> Self {
        self.type_message = message;
        self
    }

    pub fn min_len(mut self, min: usize, message: &'static str) -> Self {
        self.rules.push(Rule::MinLength { min, message });
        self
    }

    pub fn one_of(mut self, allowed: &'static [&'static str], message: &'static str) -> Self {
        self.rules.push(Rule::OneOf { allowed, message });
        self
    }

    pub fn at_least(mut self, min: Decimal, message: &'static str) -> Self {
        self.rules.push(Rule::AtLeast { min, message });
        self
    }

    pub fn positive_decimal(mut self, message: &'static str) -> Self {
        self.rules.push(Rule::PositiveDecimal { message });
        self
    }

    pub fn must_be_true(mut self, message: &'static str) -> Self {
        self.rules.push(Rule::MustBeTrue { message });
        self
    }

    /// Value shown in an empty form for this field.
    pub fn default_value(&self) -> Value {
        match self.kind {
            FieldKind::Text | FieldKind::OptionalText | FieldKind::Number => {
                Value::String(String::new())
            }
            FieldKind::Flag { default } => Value::Bool(default.unwrap_or(false)),
            FieldKind::TextList => Value::Array(Vec::new()),
        }
    }

    /// Coerce a raw value. `Ok(None)` means the field is omitted from the
    /// normalized output.
    fn coerce(&self, raw: Option<&Value>) -> Result<Option<Value>, &'static str> {
        let raw = raw.filter(|v| !v.is_null());
        match self.kind {
            FieldKind::Text => match raw {
                None => Err(self.required_message),
                Some(Value::String(s)) => Ok(Some(Value::String(s.clone()))),
                Some(_) => Err(self.type_message),
            },
            FieldKind::OptionalText => match raw {
                None => Ok(None),
                Some(Value::String(s)) if s.is_empty() => Ok(None),
                Some(Value::String(s)) => Ok(Some(Value::String(s.clone()))),
                Some(_) => Err(self.type_message),
            },
            FieldKind::Flag { default } => match raw {
                None => default.map(|b| Some(Value::Bool(b))).ok_or(self.required_message),
                Some(Value::Bool(b)) => Ok(Some(Value::Bool(*b))),
                Some(_) => Err(self.type_message),
            },
            FieldKind::Number => {
                let parsed = match raw {
                    None => None,
                    Some(Value::String(s)) if s.trim().is_empty() => Some(Decimal::ZERO),
                    Some(Value::String(s)) => parse_decimal(s),
                    Some(Value::Number(n)) => parse_decimal(&n.to_string()),
                    Some(_) => None,
                };
                parsed
                    .map(|n| Some(Value::String(n.normalize().to_string())))
                    .ok_or(self.type_message)
            }
            FieldKind::TextList => match raw {
                None => Ok(Some(Value::Array(Vec::new()))),
                Some(Value::Array(items)) if items.iter().all(Value::is_string) => {
                    Ok(Some(Value::Array(items.clone())))
                }
                Some(_) => Err(self.type_message),
            },
        }
    }

    fn evaluate(&self, raw: Option<&Value>) -> Result<Option<Value>, &'static str> {
        let coerced = self.coerce(raw)?;
        if let Some(ref value) = coerced {
            for rule in &self.rules {
                rule.check(value)?;
            }
        }
        Ok(coerced)
    }
}

/// An ordered rule table for one form.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Default value for every field, as an empty form would show them.
    pub fn defaults(&self) -> CandidateValues {
        self.fields
            .iter()
            .map(|f| (f.name.to_string(), f.default_value()))
            .collect()
    }

    /// Keep only this schema's fields from `values`, filling the rest with
    /// defaults.
    pub fn seed(&self, values: &Map<String, Value>) -> CandidateValues {
        self.fields
            .iter()
            .map(|f| {
                let value = values
                    .get(f.name)
                    .filter(|v| !v.is_null())
                    .cloned()
                    .unwrap_or_else(|| f.default_value());
                (f.name.to_string(), value)
            })
            .collect()
    }
}

/// Validate `candidate` against `schema`.
///
/// Every field is evaluated; keys not in the schema are dropped.
pub fn validate(
    schema: &Schema,
    candidate: &CandidateValues,
) -> Result<NormalizedValues, FieldErrors> {
    let mut normalized = Map::new();
    let mut errors = FieldErrors::new();

    for field in &schema.fields {
        match field.evaluate(candidate.get(field.name)) {
            Ok(Some(value)) => {
                normalized.insert(field.name.to_string(), value);
            }
            Ok(None) => {}
            Err(message) => errors.insert(field.name, message),
        }
    }

    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(errors)
    }
}

/// Validate and deserialize into the record type the schema describes.
pub fn parse<T: DeserializeOwned>(
    schema: &Schema,
    candidate: &CandidateValues,
) -> Result<T, FieldErrors> {
    let normalized = validate(schema, candidate)?;
    serde_json::from_value(Value::Object(normalized)).map_err(|e| {
        tracing::warn!(error = %e, "Validated values do not match record type");
        let mut errors = FieldErrors::new();
        errors.insert(FORM_ERROR_KEY, e.to_string());
        errors
    })
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn candidate(value: Value) -> CandidateValues {
        value.as_object().cloned().unwrap()
    }

    fn schema() -> Schema {
        Schema::new(vec![
            FieldSpec::text("name").min_len(2, "Name must be at least 2 characters"),
            FieldSpec::optional_text("city"),
            FieldSpec::flag("isGlobal", Some(false)),
            FieldSpec::flag("agree", None)
                .required("You must agree")
                .must_be_true("You must agree"),
            FieldSpec::number("goal")
                .invalid("Goal must be a number")
                .at_least(dec!(100), "Goal must be at least 100"),
            FieldSpec::text("kind").required("Pick one").one_of(&["A", "B"], "Pick one"),
            FieldSpec::text_list("cids"),
        ])
    }

    #[test]
    fn valid_input_is_normalized() {
        let normalized = validate(
            &schema(),
            &candidate(json!({
                "name": "Ada",
                "city": "",
                "agree": true,
                "goal": "250.50",
                "kind": "B",
                "extra": "dropped"
            })),
        )
        .unwrap();

        assert_eq!(normalized["name"], "Ada");
        assert!(normalized.get("city").is_none());
        assert_eq!(normalized["isGlobal"], false);
        assert_eq!(normalized["goal"], "250.5");
        assert_eq!(normalized["cids"], json!([]));
        assert!(normalized.get("extra").is_none());
    }

    #[test]
    fn all_failing_fields_are_reported() {
        let errors = validate(
            &schema(),
            &candidate(json!({ "name": "A", "agree": false, "goal": "50", "kind": "C" })),
        )
        .unwrap_err();

        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("name"), Some("Name must be at least 2 characters"));
        assert_eq!(errors.get("agree"), Some("You must agree"));
        assert_eq!(errors.get("goal"), Some("Goal must be at least 100"));
        assert_eq!(errors.get("kind"), Some("Pick one"));
    }

    #[test]
    fn missing_values_use_required_messages() {
        let errors = validate(&schema(), &Map::new()).unwrap_err();
        assert_eq!(errors.get("name"), Some("Required"));
        assert_eq!(errors.get("agree"), Some("You must agree"));
        assert_eq!(errors.get("kind"), Some("Pick one"));
        assert_eq!(errors.get("goal"), Some("Goal must be a number"));
        assert!(!errors.contains("isGlobal"));
        assert!(!errors.contains("city"));
    }

    #[test]
    fn number_coercion_runs_before_bound() {
        let base = json!({ "name": "Ada", "agree": true, "kind": "A" });

        let mut c = candidate(base.clone());
        c.insert("goal".into(), json!("abc"));
        assert_eq!(validate(&schema(), &c).unwrap_err().get("goal"), Some("Goal must be a number"));

        c.insert("goal".into(), json!(""));
        assert_eq!(
            validate(&schema(), &c).unwrap_err().get("goal"),
            Some("Goal must be at least 100")
        );

        c.insert("goal".into(), json!(100));
        assert_eq!(validate(&schema(), &c).unwrap()["goal"], "100");

        c.insert("goal".into(), json!(" 1e3 "));
        assert_eq!(validate(&schema(), &c).unwrap()["goal"], "1000");
    }

    #[test]
    fn wrong_types_are_rejected() {
        let errors = validate(
            &schema(),
            &candidate(json!({
                "name": 42,
                "isGlobal": "yes",
                "agree": true,
                "goal": true,
                "kind": "A",
                "cids": [1, 2]
            })),
        )
        .unwrap_err();
        assert_eq!(errors.get("name"), Some("Expected string"));
        assert_eq!(errors.get("isGlobal"), Some("Expected boolean"));
        assert_eq!(errors.get("goal"), Some("Goal must be a number"));
        assert_eq!(errors.get("cids"), Some("Expected list of strings"));
    }

    #[test]
    fn positive_decimal_is_one_combined_check() {
        let schema = Schema::new(vec![
            FieldSpec::text("amount")
                .min_len(1, "Amount is required")
                .positive_decimal("Amount must be greater than 0"),
        ]);
        let check = |v: &str| validate(&schema, &candidate(json!({ "amount": v })));

        assert_eq!(check("").unwrap_err().get("amount"), Some("Amount is required"));
        assert_eq!(check("0").unwrap_err().get("amount"), Some("Amount must be greater than 0"));
        assert_eq!(check("abc").unwrap_err().get("amount"), Some("Amount must be greater than 0"));
        assert_eq!(check("-3").unwrap_err().len(), 1);
        assert!(check("0.5").is_ok());
    }

    #[test]
    fn seed_keeps_schema_fields_and_fills_defaults() {
        let values = candidate(json!({ "name": "Ada", "other": 1, "city": null }));
        let seeded = schema().seed(&values);
        assert_eq!(seeded["name"], "Ada");
        assert_eq!(seeded["city"], "");
        assert_eq!(seeded["agree"], false);
        assert_eq!(seeded["cids"], json!([]));
        assert!(seeded.get("other").is_none());
        assert_eq!(seeded.len(), schema().fields().len());
    }

    #[test]
    fn parse_reports_record_mismatch_as_form_error() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Wrong {
            missing: String,
        }
        let schema = Schema::new(vec![FieldSpec::text("name")]);
        let errors = parse::<Wrong>(&schema, &candidate(json!({ "name": "x" }))).unwrap_err();
        assert!(errors.contains(FORM_ERROR_KEY));
    }
}
