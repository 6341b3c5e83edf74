//! Value Objects for the storefront extensions

use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Checkout reference sent to the payment provider.
///
/// Shape: `<prefix>_<unix millis>_<7 base36 chars>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckoutReference(String);

pub const CHECKOUT_REFERENCE_PREFIX: &str = "medusa";
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

impl CheckoutReference {
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..7).map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char).collect();
        Self(format!("{}_{}_{}", CHECKOUT_REFERENCE_PREFIX, millis, suffix))
    }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for CheckoutReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Minimum number of items from a category required by a bundle promotion.
///
/// Bounded to `1..=i32::MAX` so it always fits the `INTEGER` column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct MinQuantity(u32);

impl MinQuantity {
    pub const DEFAULT: MinQuantity = MinQuantity(2);
    pub const MAX: MinQuantity = MinQuantity(i32::MAX as u32);

    pub fn new(value: i64) -> Result<Self, MinQuantityError> {
        if value < 1 { return Err(MinQuantityError::BelowOne(value)); }
        if value > i64::from(Self::MAX.0) { return Err(MinQuantityError::TooLarge(value)); }
        u32::try_from(value).map(Self).map_err(|_| MinQuantityError::TooLarge(value))
    }
    pub fn value(&self) -> u32 { self.0 }
}

impl Default for MinQuantity { fn default() -> Self { Self::DEFAULT } }

impl TryFrom<i64> for MinQuantity {
    type Error = MinQuantityError;
    fn try_from(value: i64) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<MinQuantity> for i64 {
    fn from(q: MinQuantity) -> i64 { i64::from(q.0) }
}

impl fmt::Display for MinQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum MinQuantityError { BelowOne(i64), TooLarge(i64) }
impl std::error::Error for MinQuantityError {}
impl fmt::Display for MinQuantityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowOne(v) => write!(f, "min_quantity must be at least 1, got {}", v),
            Self::TooLarge(v) => write!(f, "min_quantity {} is too large", v),
        }
    }
}

/// Money value object, stored in minor units (pence, cents).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money { minor: i64, currency: String }

pub const DEFAULT_CURRENCY: &str = "GBP";

impl Money {
    pub fn new(minor: i64, currency: &str) -> Self { Self { minor, currency: currency.to_uppercase() } }
    pub fn currency(&self) -> &str { &self.currency }
    /// Major-unit amount, e.g. `1999` minor units become `19.99`.
    pub fn major(&self) -> Decimal { Decimal::new(self.minor, 2) }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} {:.2}", self.currency, self.major()) }
}

/// Quantity value object
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Self { Self(value) }
    pub fn value(&self) -> u32 { self.0 }
    pub fn add(&self, other: u32) -> Self { Self(self.0.saturating_add(other)) }
    pub fn meets(&self, min: MinQuantity) -> bool { self.0 >= min.value() }
}
