//! Per type pair coefficients of pair potentials

use std::collections::{BTreeMap, HashMap};

use anyhow::{Result, anyhow};
use strum_macros::{Display, EnumIter, EnumString};

use crate::types::TypePair;

/// Named coefficient of a pair potential
///
/// This is the closed set of everything a potential can be parameterized
/// with. Names outside of it fail to parse.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display, EnumString, EnumIter)]
pub enum CoeffField {
    #[strum(to_string = "epsilon")]
    Epsilon,
    #[strum(to_string = "sigma")]
    Sigma,
    #[strum(to_string = "alpha")]
    Alpha,
    #[strum(to_string = "kappa")]
    Kappa,
    #[strum(to_string = "D0")]
    D0,
    #[strum(to_string = "r0")]
    R0,
    #[strum(to_string = "r_cut")]
    RCut,
    #[strum(to_string = "r_on")]
    ROn,
    #[strum(to_string = "rmin")]
    RMin,
    #[strum(to_string = "rmax")]
    RMax,
}

impl CoeffField {
    /// Fields that describe a distance and therefore must not be negative
    pub fn is_distance(&self) -> bool {
        matches!(self, Self::RCut | Self::ROn | Self::RMin | Self::RMax | Self::R0)
    }
}

/// Coefficients set for a single type pair
pub type PairCoeff = BTreeMap<CoeffField, f64>;

/// Table of the explicitly set coefficients of one potential
#[derive(Clone, Debug, Default)]
pub struct PairCoeffTable {
    coeffs: HashMap<TypePair, PairCoeff>
}

impl PairCoeffTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `values` into the coefficients of `pair`
    ///
    /// Fields not mentioned keep their previous value. Nothing is written if
    /// any of the values is invalid or no values are given.
    pub fn set(&mut self, pair: TypePair, values: &[(CoeffField, f64)]) -> Result<()> {
        if values.is_empty() {
            return Err(anyhow!("No coefficients given for type pair {}", pair));
        }
        for (field, value) in values {
            if !value.is_finite() {
                return Err(anyhow!("Coefficient {} must be finite, but got {}", field, value));
            }
            if field.is_distance() && *value < 0.0 {
                return Err(anyhow!("Coefficient {} must not be negative, but got {}", field, value));
            }
        }
        let entry = self.coeffs.entry(pair).or_default();
        for (field, value) in values {
            entry.insert(*field, *value);
        }
        Ok(())
    }

    pub fn get(&self, pair: TypePair, field: CoeffField) -> Option<f64> {
        self.coeffs.get(&pair)
            .and_then(|coeff| coeff.get(&field))
            .copied()
    }

    /// True if `set` was called at least once for this pair
    pub fn is_set(&self, pair: TypePair) -> bool {
        self.coeffs.contains_key(&pair)
    }

    pub fn get_pair(&self, pair: TypePair) -> Option<&PairCoeff> {
        self.coeffs.get(&pair)
    }

}
