//! Neighbor lists and the reconciliation of their per type pair cutoffs
//!
//! A neighbor list does not know the potentials that use it. It only stores
//! the IDs of its subscribers and, when asked to `update_rcut()`, takes the
//! largest cutoff any of them requests for each type pair. Nothing is updated
//! when a subscriber changes its coefficients: the list is merely flagged as
//! stale until the next recomputation.

use std::collections::HashMap;

use anyhow::{Result, anyhow};
use log::debug;
use strum_macros::{Display, EnumString};

use crate::interaction::CutoffSource;
use crate::runtime::InteractionID;
use crate::types::{TypeID, TypePair};

mod exclusions;

pub use exclusions::*;

/// Buffer distance used if nothing else is specified
pub const DEFAULT_R_BUFF: f64 = 0.4;

/// Which neighbors are stored for each particle
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum StorageMode {
    /// Only neighbors i,j with i < j
    Half,
    /// All neighbors
    Full,
}

/// Settings for creating a neighbor list
#[derive(Clone, Debug)]
pub struct NeighborListDetails {
    /// Buffer added to every cutoff (this guarantees the correctness of the
    /// neighbor list for more than one step)
    pub r_buff: f64,
    /// Cutoff reported for pairs that no subscriber defines
    pub default_rcut: Option<f64>,
    pub storage_mode: StorageMode,
}

impl Default for NeighborListDetails {
    fn default() -> Self {
        Self {
            r_buff: DEFAULT_R_BUFF,
            default_rcut: None,
            storage_mode: StorageMode::Half,
        }
    }
}

pub struct NeighborList {
    /// Name of this neighbor list
    name: String,
    /// Buffer distance
    r_buff: f64,
    /// Fallback for pairs without subscribers
    default_rcut: Option<f64>,
    storage_mode: StorageMode,
    /// Shift r_list(i,j) by the particle diameters
    diameter_shift: bool,
    /// Maximum particle diameter (only relevant for diameter shifting)
    d_max: f64,
    /// Subscribed interactions (in order of subscription)
    subscribers: Vec<InteractionID>,
    /// Reconciled cutoffs as of the last update
    r_cut: HashMap<TypePair, f64>,
    /// Largest cutoff of any pair involving a given type
    type_rcut_max: Vec<f64>,
    /// Largest cutoff of any pair
    rcut_max_max: f64,
    /// Smallest non-zero cutoff of any pair
    rcut_min: f64,
    /// True if subscribers may have changed since the last update
    stale: bool,
    /// Number of completed updates
    num_updates: usize,
    /// Excluded particle pairs
    exclusions: ExclusionList,
}

impl NeighborList {
    pub fn new<S: Into<String>>(name: S, details: &NeighborListDetails) -> Result<Self> {
        let name = name.into();
        check_distance("buffer distance", details.r_buff)?;
        if let Some(rcut) = details.default_rcut {
            check_distance("default cutoff", rcut)?;
        }
        Ok(Self {
            name,
            r_buff: details.r_buff,
            default_rcut: details.default_rcut,
            storage_mode: details.storage_mode,
            diameter_shift: false,
            d_max: 1.0,
            subscribers: vec![],
            r_cut: HashMap::new(),
            type_rcut_max: vec![],
            rcut_max_max: 0.0,
            rcut_min: 0.0,
            stale: true,
            num_updates: 0,
            exclusions: ExclusionList::new(),
        })
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    /* -- Subscription and reconciliation -- */

    /// Register an interaction as cutoff contributor
    ///
    /// Returns false if the interaction was already subscribed.
    pub fn subscribe(&mut self, interaction: InteractionID) -> bool {
        if self.subscribers.contains(&interaction) {
            return false;
        }
        self.subscribers.push(interaction);
        self.stale = true;
        true
    }

    pub fn get_subscribers(&self) -> &[InteractionID] {
        &self.subscribers
    }

    /// Recompute all cutoffs from the current state of the subscribers
    ///
    /// `lookup` resolves a subscriber ID to the interaction behind it. Every
    /// pair of the first `num_types` types is considered; the previous result
    /// is discarded. Nothing changes if a subscriber cannot be resolved.
    pub fn update_rcut<'a, F>(&mut self, lookup: F, num_types: usize) -> Result<()>
    where F: Fn(InteractionID) -> Option<&'a dyn CutoffSource>
    {
        let sources = self.subscribers.iter()
            .map(|id| lookup(*id)
                .ok_or_else(|| anyhow!("Unknown subscriber of neighbor list {}", self.name)))
            .collect::<Result<Vec<_>>>()?;
        self.r_cut.clear();
        for pair in TypePair::all(num_types) {
            let rcut = sources.iter()
                .filter_map(|source| source.get_rcut(pair))
                .reduce(f64::max);
            if let Some(rcut) = rcut {
                self.r_cut.insert(pair, rcut);
            }
        }
        // Derived quantities (pairs without subscribers count with the default)
        self.type_rcut_max = vec![0.0; num_types];
        self.rcut_max_max = 0.0;
        self.rcut_min = 0.0;
        for pair in TypePair::all(num_types) {
            let rcut = match self.r_cut.get(&pair).copied().or(self.default_rcut) {
                None => continue,
                Some(rcut) => rcut
            };
            let (type_a, type_b) = pair.get_types();
            self.type_rcut_max[type_a] = self.type_rcut_max[type_a].max(rcut);
            self.type_rcut_max[type_b] = self.type_rcut_max[type_b].max(rcut);
            self.rcut_max_max = self.rcut_max_max.max(rcut);
            if rcut > 0.0 && (self.rcut_min == 0.0 || rcut < self.rcut_min) {
                self.rcut_min = rcut;
            }
        }
        self.stale = false;
        self.num_updates += 1;
        debug!("Neighbor list {}: reconciled {} pairs from [{}] (max r_cut {})",
            self.name, self.r_cut.len(),
            sources.iter().map(|source| source.get_name()).collect::<Vec<_>>().join(", "),
            self.rcut_max_max);
        Ok(())
    }

    /// Reconciled cutoff of the unordered pair `(type_i, type_j)`
    ///
    /// Reflects the state of the last `update_rcut()`. Pairs no subscriber
    /// defined at that point fall back to the default cutoff of this list or
    /// are an error. Types beyond the ones known at that point are an error.
    pub fn get_pair(&self, type_i: TypeID, type_j: TypeID) -> Result<f64> {
        let pair = TypePair::new(type_i, type_j);
        let (_, hi) = pair.get_types();
        if self.num_updates > 0 && hi >= self.type_rcut_max.len() {
            return Err(anyhow!("Type pair {} contains a type unknown to neighbor list {} (only {} types at last update)",
                pair, self.name, self.type_rcut_max.len()));
        }
        self.r_cut.get(&pair)
            .copied()
            .or(self.default_rcut)
            .ok_or(anyhow!("No cutoff registered for type pair {} in neighbor list {}", pair, self.name))
    }

    /// Mark the cutoffs as outdated (they are not recomputed until `update_rcut()`)
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn get_num_updates(&self) -> usize {
        self.num_updates
    }

    /* -- Derived search radii -- */

    /// Extra distance added to every cutoff on top of the buffer
    fn get_shift(&self) -> f64 {
        if self.diameter_shift { self.d_max - 1.0 } else { 0.0 }
    }

    /// Search radius for a pair (cutoff plus buffer and diameter shift)
    pub fn get_rlist(&self, type_i: TypeID, type_j: TypeID) -> Result<f64> {
        Ok(self.get_pair(type_i, type_j)? + self.r_buff + self.get_shift())
    }

    pub fn get_max_rcut(&self) -> f64 {
        self.rcut_max_max
    }

    pub fn get_min_rcut(&self) -> f64 {
        self.rcut_min
    }

    pub fn get_max_rlist(&self) -> f64 {
        self.get_max_rcut() + self.r_buff + self.get_shift()
    }

    pub fn get_min_rlist(&self) -> f64 {
        self.get_min_rcut() + self.r_buff + self.get_shift()
    }

    /// Largest cutoff of any pair involving `typ` (0 if it does not interact)
    pub fn get_type_rcut_max(&self, typ: TypeID) -> f64 {
        self.type_rcut_max.get(typ).copied().unwrap_or(0.0)
    }

    /// Width of the ghost layer required for particles of type `typ`
    pub fn get_ghost_layer_width(&self, typ: TypeID) -> f64 {
        let rcut_max = self.get_type_rcut_max(typ);
        if rcut_max > 0.0 {
            rcut_max + self.r_buff + self.get_shift()
        }
        else {
            0.0
        }
    }

    /* -- Parameters -- */

    pub fn get_r_buff(&self) -> f64 {
        self.r_buff
    }

    pub fn set_r_buff(&mut self, r_buff: f64) -> Result<()> {
        check_distance("buffer distance", r_buff)?;
        self.r_buff = r_buff;
        Ok(())
    }

    pub fn get_storage_mode(&self) -> StorageMode {
        self.storage_mode
    }

    pub fn set_storage_mode(&mut self, storage_mode: StorageMode) {
        self.storage_mode = storage_mode;
    }

    pub fn get_diameter_shift(&self) -> bool {
        self.diameter_shift
    }

    /// Enable/disable shifting of r_list(i,j) by (d_i + d_j)/2 - 1
    pub fn set_diameter_shift(&mut self, diameter_shift: bool) {
        self.diameter_shift = diameter_shift;
    }

    pub fn get_maximum_diameter(&self) -> f64 {
        self.d_max
    }

    /// Set the maximum particle diameter (bounds the diameter shift)
    pub fn set_maximum_diameter(&mut self, d_max: f64) -> Result<()> {
        if !(d_max.is_finite() && d_max >= 1.0) {
            return Err(anyhow!("Maximum diameter of neighbor list {} must be at least 1, but got {}",
                self.name, d_max));
        }
        self.d_max = d_max;
        Ok(())
    }

    /* -- Exclusions -- */

    pub fn get_exclusions(&self) -> &ExclusionList {
        &self.exclusions
    }

    pub fn get_exclusions_mut(&mut self) -> &mut ExclusionList {
        &mut self.exclusions
    }
}

fn check_distance(what: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    }
    else {
        Err(anyhow!("Neighbor list {} must be a non-negative number, but got {}", what, value))
    }
}
