//! Pair potentials as seen by the neighbor lists they subscribe to

use std::str::FromStr;

use anyhow::{Result, anyhow};
use strum_macros::{Display, EnumIter, EnumString};

use crate::types::{TypePair, TypeRegistry};

mod coeff;

pub use coeff::*;

/// Anything that contributes cutoff radii to a neighbor list
pub trait CutoffSource {
    /// Name used in diagnostics
    fn get_name(&self) -> &str;

    /// Cutoff radius this source currently requests for `pair`, or `None` if
    /// it does not define the pair at all
    fn get_rcut(&self, pair: TypePair) -> Option<f64>;
}

/// Functional form of a pair potential
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum PotentialKind {
    /// Lennard-Jones
    Lj,
    /// Gaussian
    Gauss,
    /// Shifted Lennard-Jones (cutoff is shifted by the particle diameters)
    Slj,
    Yukawa,
    Morse,
    /// Tabulated potential (cutoff given per pair as `rmax`)
    Table,
}

impl PotentialKind {
    /// Coefficients that must be known for every type pair before a run
    pub fn get_required_coeffs(&self) -> &'static [CoeffField] {
        match self {
            Self::Lj | Self::Slj => &[CoeffField::Epsilon, CoeffField::Sigma, CoeffField::Alpha],
            Self::Gauss => &[CoeffField::Epsilon, CoeffField::Sigma],
            Self::Yukawa => &[CoeffField::Epsilon, CoeffField::Kappa],
            Self::Morse => &[CoeffField::D0, CoeffField::Alpha, CoeffField::R0],
            Self::Table => &[CoeffField::RMin, CoeffField::RMax],
        }
    }

    /// Value used for a coefficient that was never set explicitly
    pub fn get_default_coeff(&self, field: CoeffField) -> Option<f64> {
        match (self, field) {
            (Self::Lj | Self::Slj, CoeffField::Alpha) => Some(1.0),
            _ => None
        }
    }

    /// Field that carries the per pair cutoff radius
    pub fn get_cutoff_field(&self) -> CoeffField {
        match self {
            Self::Table => CoeffField::RMax,
            _ => CoeffField::RCut
        }
    }

    /// True if the kind has a potential wide default cutoff
    pub fn has_default_rcut(&self) -> bool {
        !matches!(self, Self::Table)
    }

    /// True if `field` is meaningful for this kind
    pub fn accepts(&self, field: CoeffField) -> bool {
        if self.get_required_coeffs().contains(&field) {
            return true;
        }
        match self {
            Self::Table => false,
            _ => matches!(field, CoeffField::RCut | CoeffField::ROn)
        }
    }
}

/// A pair potential together with its per type pair coefficients
#[derive(Clone, Debug)]
pub struct PairPotential {
    /// Unique name of this potential
    name: String,
    /// Functional form
    kind: PotentialKind,
    /// Cutoff for pairs without an explicit one
    default_rcut: Option<f64>,
    /// Explicitly set coefficients
    coeffs: PairCoeffTable,
}

impl PairPotential {
    pub fn new<S: Into<String>>(name: S, kind: PotentialKind, default_rcut: Option<f64>) -> Result<Self> {
        let name = name.into();
        match default_rcut {
            Some(_) if !kind.has_default_rcut() => return Err(
                anyhow!("Pair potential {} of kind {} does not take a default cutoff (set {} per pair instead)",
                    name, kind, kind.get_cutoff_field())),
            Some(rcut) if !(rcut.is_finite() && rcut >= 0.0) => return Err(
                anyhow!("Default cutoff of pair potential {} must be a non-negative number, but got {}", name, rcut)),
            _ => {}
        }
        Ok(Self {
            name, kind, default_rcut,
            coeffs: PairCoeffTable::new()
        })
    }

    pub fn get_kind(&self) -> PotentialKind {
        self.kind
    }

    /// Set (or merge) coefficients for a single type pair
    pub fn set_coeff(&mut self, pair: TypePair, values: &[(CoeffField, f64)]) -> Result<()> {
        if let Some((field, _)) = values.iter().find(|(field, _)| !self.kind.accepts(*field)) {
            return Err(anyhow!("Coefficient {} is not used by pair potential {} of kind {}",
                field, self.name, self.kind));
        }
        self.coeffs.set(pair, values)
    }

    /// Like `set_coeff`, but with the coefficients given by name
    pub fn set_coeff_by_name(&mut self, pair: TypePair, values: &[(&str, f64)]) -> Result<()> {
        let values = values.iter()
            .map(|(name, value)| CoeffField::from_str(name)
                .map(|field| (field, *value))
                .map_err(|_| anyhow!("Unknown coefficient {} for pair potential {}", name, self.name)))
            .collect::<Result<Vec<_>>>()?;
        self.set_coeff(pair, &values)
    }

    /// Get the effective value of a coefficient (explicit value or default)
    pub fn get_coeff(&self, pair: TypePair, field: CoeffField) -> Option<f64> {
        self.coeffs.get(pair, field)
            .or_else(|| match field {
                CoeffField::RCut if self.kind.has_default_rcut() && self.coeffs.is_set(pair) => self.default_rcut,
                _ => self.kind.get_default_coeff(field)
            })
    }

    /// Largest cutoff over all pairs of the first `num_types` types
    pub fn get_max_rcut(&self, num_types: usize) -> f64 {
        TypePair::all(num_types)
            .filter_map(|pair| self.get_rcut(pair))
            .fold(0.0, f64::max)
    }

    /// Check that every pair of the current types has all required coefficients
    pub fn verify_coeffs(&self, types: &TypeRegistry) -> Result<()> {
        for pair in types.pairs() {
            if !self.coeffs.is_set(pair) {
                return Err(anyhow!("Type pair {} not set in pair potential {}",
                    types.format_pair(pair), self.name));
            }
            let missing = self.kind.get_required_coeffs().iter()
                .find(|field| self.get_coeff(pair, **field).is_none());
            if let Some(field) = missing {
                return Err(anyhow!("Coefficient {} of type pair {} not set in pair potential {}",
                    field, types.format_pair(pair), self.name));
            }
            if self.get_rcut(pair).is_none() {
                return Err(anyhow!("No cutoff for type pair {} in pair potential {}",
                    types.format_pair(pair), self.name));
            }
        }
        Ok(())
    }
}

impl CutoffSource for PairPotential {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn get_rcut(&self, pair: TypePair) -> Option<f64> {
        if !self.coeffs.is_set(pair) {
            return None;
        }
        self.coeffs.get(pair, self.kind.get_cutoff_field())
            .or(self.default_rcut)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn types_ab() -> TypeRegistry {
        let mut types = TypeRegistry::new();
        types.add_type("A").unwrap();
        types.add_type("B").unwrap();
        types
    }

    const AA: TypePair = TypePair::new(0, 0);
    const AB: TypePair = TypePair::new(0, 1);
    const BB: TypePair = TypePair::new(1, 1);

    #[test]
    fn kind_names() {
        assert_eq!(PotentialKind::from_str("lj").unwrap(), PotentialKind::Lj);
        assert_eq!(PotentialKind::from_str("table").unwrap(), PotentialKind::Table);
        assert_eq!(PotentialKind::Slj.to_string(), "slj");
        assert!(PotentialKind::from_str("ljj").is_err());
    }

    #[test]
    fn max_rcut() {
        let mut lj = PairPotential::new("lj", PotentialKind::Lj, Some(2.5)).unwrap();
        for pair in [AA, AB, BB] {
            lj.set_coeff(pair, &[(CoeffField::Sigma, 1.0), (CoeffField::Epsilon, 1.0)]).unwrap();
        }
        assert_relative_eq!(lj.get_max_rcut(2), 2.5);
        lj.set_coeff(AA, &[(CoeffField::RCut, 2.0)]).unwrap();
        assert_relative_eq!(lj.get_max_rcut(2), 2.5);
        lj.set_coeff(AB, &[(CoeffField::RCut, 3.0)]).unwrap();
        assert_relative_eq!(lj.get_max_rcut(2), 3.0);
        lj.set_coeff(BB, &[(CoeffField::RCut, 3.5)]).unwrap();
        assert_relative_eq!(lj.get_max_rcut(2), 3.5);
    }

    #[test]
    fn rcut_falls_back_to_default() {
        let mut lj = PairPotential::new("lj", PotentialKind::Lj, Some(2.5)).unwrap();
        assert_eq!(lj.get_rcut(AA), None);
        lj.set_coeff(AA, &[(CoeffField::Sigma, 1.0)]).unwrap();
        assert_eq!(lj.get_rcut(AA), Some(2.5));
        assert_eq!(lj.get_coeff(AA, CoeffField::RCut), Some(2.5));
        assert_eq!(lj.get_coeff(AA, CoeffField::Alpha), Some(1.0));
        lj.set_coeff(AA, &[(CoeffField::RCut, 3.0)]).unwrap();
        assert_eq!(lj.get_rcut(AA), Some(3.0));
        // Other coefficients survive the partial update
        assert_eq!(lj.get_coeff(AA, CoeffField::Sigma), Some(1.0));
    }

    #[test]
    fn empty_coeffs_do_not_define_pair() {
        let mut lj = PairPotential::new("lj", PotentialKind::Lj, Some(2.5)).unwrap();
        assert!(lj.set_coeff(AA, &[]).is_err());
        assert!(lj.set_coeff_by_name(AA, &[]).is_err());
        assert_eq!(lj.get_rcut(AA), None);
        assert_eq!(lj.get_max_rcut(1), 0.0);
    }

    #[test]
    fn table_uses_rmax() {
        assert!(PairPotential::new("table", PotentialKind::Table, Some(1.0)).is_err());
        let mut table = PairPotential::new("table", PotentialKind::Table, None).unwrap();
        table.set_coeff(AA, &[(CoeffField::RMin, 0.0)]).unwrap();
        assert_eq!(table.get_rcut(AA), None);
        table.set_coeff(AA, &[(CoeffField::RMax, 1.0)]).unwrap();
        assert_eq!(table.get_rcut(AA), Some(1.0));
        assert!(table.set_coeff(AA, &[(CoeffField::RCut, 2.0)]).is_err());
    }

    #[test]
    fn set_by_name() {
        let mut gauss = PairPotential::new("gauss", PotentialKind::Gauss, Some(1.0)).unwrap();
        gauss.set_coeff_by_name(AB, &[("epsilon", 1.0), ("sigma", 1.0), ("r_cut", 2.0)]).unwrap();
        assert_eq!(gauss.get_rcut(AB), Some(2.0));
        assert!(gauss.set_coeff_by_name(AB, &[("simga", 1.0)]).is_err());
        // Valid name, but not a gauss coefficient
        assert!(gauss.set_coeff_by_name(AB, &[("kappa", 1.0)]).is_err());
    }

    #[test]
    fn verify() {
        let types = types_ab();
        let mut gauss = PairPotential::new("gauss", PotentialKind::Gauss, Some(1.0)).unwrap();
        assert!(gauss.verify_coeffs(&types).is_err());
        for pair in [AA, AB, BB] {
            gauss.set_coeff(pair, &[(CoeffField::Epsilon, 1.0)]).unwrap();
        }
        let err = gauss.verify_coeffs(&types).unwrap_err();
        assert!(err.to_string().contains("sigma"));
        for pair in [AA, AB, BB] {
            gauss.set_coeff(pair, &[(CoeffField::Sigma, 1.0)]).unwrap();
        }
        gauss.verify_coeffs(&types).unwrap();
    }

    #[test]
    fn invalid_default_rcut() {
        assert!(PairPotential::new("lj", PotentialKind::Lj, Some(-1.0)).is_err());
        assert!(PairPotential::new("lj", PotentialKind::Lj, Some(f64::NAN)).is_err());
        assert!(PairPotential::new("lj", PotentialKind::Lj, None).is_ok());
    }
}
