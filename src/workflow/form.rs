//! Add-product form input and its validation rules

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationErrors};

use crate::domain::Money;
use crate::{Result, ShoppingError};

static SHOP_ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^s[0-9]+$").expect("shop id pattern compiles"));

/// Raw form input as submitted by the user.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(regex(path = "SHOP_ID_PATTERN", message = "shop id must be 's' followed by digits"))]
    pub shop_id: String,

    #[serde(default, rename = "priceUSD")]
    #[validate(required(message = "price is required"), range(min = 0.01, message = "price must be at least 0.01"))]
    pub price_usd: Option<f64>,

    #[serde(default)]
    #[validate(required(message = "delivery date is required"), length(min = 1, message = "delivery date is required"))]
    pub delivery_est_date: Option<String>,
}

/// Form input that passed every rule, converted to domain types.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidProductForm {
    pub name: String,
    pub shop_id: String,
    pub price: Money,
    pub delivery_est_date: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self { field: field.to_string(), code: code.to_string(), message: message.into() }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}: {}", self.field, self.message) }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FormValidation {
    Valid(ValidProductForm),
    Invalid(Vec<FieldViolation>),
}

impl FormValidation {
    pub fn is_valid(&self) -> bool { matches!(self, Self::Valid(_)) }

    pub fn into_result(self) -> Result<ValidProductForm> {
        match self {
            Self::Valid(form) => Ok(form),
            Self::Invalid(violations) => Err(ShoppingError::InvalidForm(violations)),
        }
    }
}

/// Checks every form rule and converts the input when all of them pass.
/// Violations come back sorted by field name.
pub fn validate_product_form(form: &ProductForm) -> FormValidation {
    let mut violations = match form.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => violations_from(&errors),
    };

    let delivery_est_date = match form.delivery_est_date.as_deref().filter(|raw| !raw.trim().is_empty()) {
        Some(raw) => {
            let parsed = parse_delivery_date(raw);
            if parsed.is_none() {
                violations.push(FieldViolation::new("deliveryEstDate", "date", format!("unrecognised date '{raw}'")));
            }
            parsed
        }
        None => None,
    };

    let price = form.price_usd.and_then(Decimal::from_f64);
    if form.price_usd.is_some() && price.is_none() {
        violations.push(FieldViolation::new("priceUSD", "number", "price is not a finite number"));
    }

    match (price, delivery_est_date) {
        (Some(price), Some(delivery_est_date)) if violations.is_empty() => FormValidation::Valid(ValidProductForm {
            name: form.name.clone(),
            shop_id: form.shop_id.clone(),
            price: Money::usd(price),
            delivery_est_date,
        }),
        _ => {
            violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
            FormValidation::Invalid(violations)
        }
    }
}

/// Accepts RFC 3339, `datetime-local` (`YYYY-MM-DDTHH:MM[:SS]`) and plain
/// `YYYY-MM-DD` dates. Naive values are taken as UTC.
pub fn parse_delivery_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
        return Some(date_time.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc())
}

fn violations_from(errors: &ValidationErrors) -> Vec<FieldViolation> {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| FieldViolation {
                field: wire_name(field).to_string(),
                code: err.code.to_string(),
                message: err.message.as_ref().map(|m| m.to_string()).unwrap_or_else(|| err.code.to_string()),
            })
        })
        .collect()
}

fn wire_name(field: &str) -> &str {
    match field {
        "shop_id" => "shopId",
        "price_usd" => "priceUSD",
        "delivery_est_date" => "deliveryEstDate",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn filled() -> ProductForm {
        ProductForm {
            name: "Desk lamp".into(),
            shop_id: "s2".into(),
            price_usd: Some(10.0),
            delivery_est_date: Some("2021-03-14".into()),
        }
    }

    fn invalid_fields(form: &ProductForm) -> Vec<String> {
        match validate_product_form(form) {
            FormValidation::Invalid(violations) => violations.into_iter().map(|v| v.field).collect(),
            FormValidation::Valid(_) => vec![],
        }
    }

    #[test]
    fn test_valid_form_converts() {
        let valid = validate_product_form(&filled()).into_result().unwrap();
        assert_eq!(valid.name, "Desk lamp");
        assert_eq!(valid.price.amount(), Decimal::new(10, 0));
        assert_eq!(valid.delivery_est_date, Utc.with_ymd_and_hms(2021, 3, 14, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_blank_form_reports_every_field() {
        let fields = invalid_fields(&ProductForm::default());
        assert_eq!(fields, vec!["deliveryEstDate", "name", "priceUSD", "shopId"]);
    }

    #[test]
    fn test_shop_id_pattern() {
        for bad in ["2", "shop2", "s", "s2a", "S2"] {
            let form = ProductForm { shop_id: bad.into(), ..filled() };
            assert_eq!(invalid_fields(&form), vec!["shopId"], "{bad}");
        }
        let form = ProductForm { shop_id: "s105".into(), ..filled() };
        assert!(validate_product_form(&form).is_valid());
    }

    #[test]
    fn test_price_minimum() {
        let form = ProductForm { price_usd: Some(0.0), ..filled() };
        assert_eq!(invalid_fields(&form), vec!["priceUSD"]);
        let form = ProductForm { price_usd: Some(0.01), ..filled() };
        assert!(validate_product_form(&form).is_valid());
    }

    #[test]
    fn test_unparseable_date() {
        let form = ProductForm { delivery_est_date: Some("next tuesday".into()), ..filled() };
        let err = validate_product_form(&form).into_result().unwrap_err();
        assert!(matches!(err, ShoppingError::InvalidForm(ref v) if v[0].code == "date"));
    }

    #[test]
    fn test_parse_delivery_date_formats() {
        let expected = Utc.with_ymd_and_hms(2021, 3, 14, 9, 30, 0).unwrap();
        assert_eq!(parse_delivery_date("2021-03-14T09:30:00Z"), Some(expected));
        assert_eq!(parse_delivery_date("2021-03-14T10:30:00+01:00"), Some(expected));
        assert_eq!(parse_delivery_date("2021-03-14T09:30"), Some(expected));
        assert_eq!(parse_delivery_date("2021-13-40"), None);
    }

    #[test]
    fn test_form_wire_names() {
        let form: ProductForm = serde_json::from_str(
            r#"{"name":"Mug","shopId":"s1","priceUSD":4.5,"deliveryEstDate":"2021-01-02"}"#,
        )
        .unwrap();
        assert_eq!(form.price_usd, Some(4.5));
        assert_eq!(form.shop_id, "s1");
    }
}
