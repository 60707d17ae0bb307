//! Fixed-ratio price relation between the reference and derived instruments.

use pairmm_core::Price;
use rust_decimal::Decimal;

use crate::error::{MakerError, MakerResult};

/// `derived = reference / ratio`, where `ratio` derived units equal one
/// reference unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRelation {
    ratio: Decimal,
}

impl PriceRelation {
    /// Create a relation. The ratio must be positive.
    pub fn new(ratio: Decimal) -> MakerResult<Self> {
        if ratio <= Decimal::ZERO {
            return Err(MakerError::InvalidConfig(format!(
                "price ratio ({ratio}) must be positive"
            )));
        }
        Ok(Self { ratio })
    }

    /// Derived fair value for a reference fair value. Exact decimal division.
    #[inline]
    pub fn derive(&self, reference: Price) -> Price {
        reference / self.ratio
    }
}
