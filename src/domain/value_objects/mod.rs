//! Value Objects for the shopping list

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// Currency-keyed amount, serialized as `{"USD": 9.99}`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    #[serde(rename = "USD")]
    usd: Decimal,
}

impl Money {
    pub fn usd(amount: Decimal) -> Self { Self { usd: amount } }
    pub fn zero() -> Self { Self::usd(Decimal::ZERO) }
    pub fn amount(&self) -> Decimal { self.usd }
    /// `None` when the sum leaves the representable range.
    pub fn checked_plus(&self, other: &Money) -> Option<Money> { self.usd.checked_add(other.usd).map(Money::usd) }
    /// Not clamped at zero; totals may go negative. `None` on overflow.
    pub fn checked_minus(&self, other: &Money) -> Option<Money> { self.usd.checked_sub(other.usd).map(Money::usd) }
    pub fn saturating_plus(&self, other: &Money) -> Money { Money::usd(self.usd.saturating_add(other.usd)) }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} USD", self.usd) }
}

static LAST_ISSUED_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Product identifier: `p` followed by the creation time in unix millis.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Issues a fresh id. Ids created within the same millisecond are bumped
    /// forward so none is ever handed out twice.
    pub fn generate() -> Self {
        let now = Utc::now().timestamp_millis();
        let previous = LAST_ISSUED_MILLIS
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
            .unwrap_or_else(|last| last);
        Self(format!("p{}", now.max(previous + 1)))
    }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self { Self(value.to_string()) }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}
