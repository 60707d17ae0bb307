//! Market making configuration.

use pairmm_core::{InstrumentId, Price, Size};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{MakerError, MakerResult};

/// How fractional hedge quantities are turned into order sizes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HedgeRounding {
    /// Truncate toward zero to a lot multiple. Never over-hedges.
    #[default]
    TowardZero,
    /// Round to the nearest lot multiple, halves away from zero.
    Nearest,
    /// Pass fractional quantities through unchanged.
    Exact,
}

impl HedgeRounding {
    /// Apply this policy to a hedge quantity.
    pub fn apply(&self, size: Size, lot_size: Size) -> Size {
        match self {
            Self::TowardZero => size.trunc_to_lot(lot_size),
            Self::Nearest => size.round_to_lot(lot_size),
            Self::Exact => size,
        }
    }
}

/// Pair market making configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MakerConfig {
    /// Instrument whose fair value is estimated from its own book.
    #[serde(default = "default_reference_instrument")]
    pub reference_instrument: InstrumentId,

    /// Instrument whose fair value is derived from the reference.
    /// Quotes are generated for this instrument only.
    #[serde(default = "default_derived_instrument")]
    pub derived_instrument: InstrumentId,

    /// Derived units per reference unit (2 = one reference is worth two derived).
    #[serde(default = "default_price_ratio")]
    pub price_ratio: Decimal,

    /// Reference fair value used until the first two-sided reference book.
    #[serde(default = "default_reference_fair_value")]
    pub default_reference_fair_value: Price,

    /// Derived fair value used until the reference estimator first updates.
    #[serde(default = "default_derived_fair_value")]
    pub default_derived_fair_value: Price,

    /// Fraction of the derived quantity hedged in the reference instrument.
    #[serde(default = "default_hedge_fraction")]
    pub hedge_fraction: Decimal,

    /// Rounding policy for hedge quantities.
    #[serde(default)]
    pub hedge_rounding: HedgeRounding,

    /// Lot size used by `hedge_rounding`.
    #[serde(default = "default_hedge_lot_size")]
    pub hedge_lot_size: Size,
}

impl Default for MakerConfig {
    fn default() -> Self {
        Self {
            reference_instrument: default_reference_instrument(),
            derived_instrument: default_derived_instrument(),
            price_ratio: default_price_ratio(),
            default_reference_fair_value: default_reference_fair_value(),
            default_derived_fair_value: default_derived_fair_value(),
            hedge_fraction: default_hedge_fraction(),
            hedge_rounding: HedgeRounding::default(),
            hedge_lot_size: default_hedge_lot_size(),
        }
    }
}

impl MakerConfig {
    /// Validate configuration values.
    ///
    /// Returns Err if:
    /// - either instrument id is blank
    /// - reference and derived instruments are the same
    /// - price_ratio <= 0
    /// - hedge_fraction is outside [0, 1]
    /// - hedge_lot_size <= 0
    /// - either default fair value <= 0
    pub fn validate(&self) -> MakerResult<()> {
        // Deserialized ids skip the blank check in InstrumentId::new
        InstrumentId::new(self.reference_instrument.as_str())?;
        InstrumentId::new(self.derived_instrument.as_str())?;

        if self.reference_instrument == self.derived_instrument {
            return Err(MakerError::InvalidConfig(format!(
                "reference_instrument and derived_instrument must differ (both {})",
                self.reference_instrument
            )));
        }

        if self.price_ratio <= Decimal::ZERO {
            return Err(MakerError::InvalidConfig(format!(
                "price_ratio ({}) must be positive",
                self.price_ratio
            )));
        }

        if self.hedge_fraction < Decimal::ZERO || self.hedge_fraction > Decimal::ONE {
            return Err(MakerError::InvalidConfig(format!(
                "hedge_fraction ({}) must be within [0, 1]",
                self.hedge_fraction
            )));
        }

        if !self.hedge_lot_size.is_positive() {
            return Err(MakerError::InvalidConfig(format!(
                "hedge_lot_size ({}) must be positive",
                self.hedge_lot_size
            )));
        }

        if !self.default_reference_fair_value.is_positive() {
            return Err(MakerError::InvalidConfig(format!(
                "default_reference_fair_value ({}) must be positive",
                self.default_reference_fair_value
            )));
        }

        if !self.default_derived_fair_value.is_positive() {
            return Err(MakerError::InvalidConfig(format!(
                "default_derived_fair_value ({}) must be positive",
                self.default_derived_fair_value
            )));
        }

        Ok(())
    }
}

fn default_reference_instrument() -> InstrumentId {
    InstrumentId::from("PEARLS")
}
fn default_derived_instrument() -> InstrumentId {
    InstrumentId::from("BANANAS")
}
fn default_price_ratio() -> Decimal {
    Decimal::TWO // 1 PEARLS = 2 BANANAS
}
fn default_reference_fair_value() -> Price {
    Price::new(Decimal::from(10_000))
}
fn default_derived_fair_value() -> Price {
    Price::new(Decimal::from(5_000))
}
fn default_hedge_fraction() -> Decimal {
    Decimal::new(5, 1) // 0.5
}
fn default_hedge_lot_size() -> Size {
    Size::ONE
}
