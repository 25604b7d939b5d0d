//! Session state: types, pair potentials and the neighbor lists they share

use std::collections::HashMap;

use anyhow::{Result, anyhow};
use log::{debug, info, warn};

use crate::interaction::{CoeffField, CutoffSource, PairPotential, PotentialKind};
use crate::neighbor::{NeighborList, NeighborListDetails};
use crate::types::{TypeID, TypeRegistry};

mod builder;
mod index;

pub use builder::*;
pub use index::*;

// Name of the implicitly created neighbor list
pub const GLOBAL_NLIST_NAME: &str = "global";

/// Settings for creating a pair potential
#[derive(Clone, Debug, Default)]
pub struct PairPotentialDetails {
    /// Cutoff for all pairs without an explicit `r_cut` coefficient
    pub r_cut: Option<f64>,
    /// Neighbor list to subscribe to (the global list if `None`)
    pub nlist: Option<String>,
    /// Maximum particle diameter (only used by `slj`, defaults to 1)
    pub d_max: Option<f64>,
}

pub struct Session {
    /// Registered particle types
    types: TypeRegistry,
    /// Defined pair potentials
    pub(crate) interaction_index: Index<InteractionID, PairPotential>,
    /// Defined neighbor lists
    pub(crate) nlist_index: Index<NeighborListID, NeighborList>,
    /// Neighbor list each interaction is subscribed to
    subscriptions: HashMap<InteractionID, NeighborListID>,
    /// The global neighbor list (created on first use)
    global_nlist: Option<NeighborListID>,
    /// Buffer distance for the global neighbor list
    default_r_buff: f64,
    /// Current time step
    timestep: u64,
}

impl Session {
    pub fn new(types: Vec<String>, default_r_buff: f64, timestep: u64) -> Result<Self> {
        let mut session = Self {
            types: TypeRegistry::new(),
            interaction_index: Index::new(),
            nlist_index: Index::new(),
            subscriptions: HashMap::new(),
            global_nlist: None,
            default_r_buff,
            timestep
        };
        for name in types {
            session.add_type(name)?;
        }
        Ok(session)
    }

    /* -- Particle types -- */

    /// Add a particle type
    ///
    /// All neighbor lists become stale: the new pairs are unknown to them
    /// until the next `update_rcut()`.
    pub fn add_type<S: Into<String>>(&mut self, name: S) -> Result<TypeID> {
        let id = self.types.add_type(name)?;
        for (_, nlist) in self.nlist_index.iter_mut() {
            nlist.mark_stale();
        }
        Ok(id)
    }

    pub fn get_types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn get_num_types(&self) -> usize {
        self.types.len()
    }

    pub fn get_type_id(&self, name: &str) -> Option<TypeID> {
        self.types.get_type_by_name(name)
    }

    /* -- Neighbor lists -- */

    /// Define a new neighbor list
    pub fn create_neighbor_list(&mut self, name: &str, details: NeighborListDetails) -> Result<NeighborListID> {
        // Reject overriding of the built-in neighbor list
        if name == GLOBAL_NLIST_NAME {
            return Err(anyhow!("Cannot define neighbor list {} due to built-in neighbor list with the same name", name));
        }
        self.insert_neighbor_list(name, &details)
    }

    fn insert_neighbor_list(&mut self, name: &str, details: &NeighborListDetails) -> Result<NeighborListID> {
        let nlist = NeighborList::new(name, details)?;
        let id = self.nlist_index.insert(nlist, name.to_string(), "Neighbor list")?;
        debug!("Created neighbor list {}", name);
        Ok(id)
    }

    /// Get the global neighbor list, creating it if required
    fn get_or_create_global_nlist(&mut self) -> Result<NeighborListID> {
        if let Some(id) = self.global_nlist {
            return Ok(id);
        }
        let details = NeighborListDetails {
            r_buff: self.default_r_buff,
            ..Default::default()
        };
        let id = self.insert_neighbor_list(GLOBAL_NLIST_NAME, &details)?;
        self.global_nlist = Some(id);
        Ok(id)
    }

    /// The global neighbor list (only exists once a pair potential used it)
    pub fn get_global_neighbor_list(&self) -> Option<&NeighborList> {
        self.global_nlist.and_then(|id| self.nlist_index.get(&id))
    }

    pub fn get_neighbor_list(&self, name: &str) -> Result<&NeighborList> {
        self.nlist_index.get_with_name(name)
            .map(|(_, nlist)| nlist)
            .ok_or(anyhow!("Cannot find neighbor list {}", name))
    }

    pub fn get_neighbor_list_mut(&mut self, name: &str) -> Result<&mut NeighborList> {
        self.nlist_index.get_with_name_mut(name)
            .map(|(_, nlist)| nlist)
            .ok_or(anyhow!("Cannot find neighbor list {}", name))
    }

    pub fn get_num_neighbor_lists(&self) -> usize {
        self.nlist_index.len()
    }

    /* -- Pair potentials -- */

    /// Define a new pair potential and subscribe it to its neighbor list
    pub fn create_pair_potential(&mut self, name: &str, kind: PotentialKind,
        details: PairPotentialDetails) -> Result<InteractionID>
    {
        // Validate everything before touching any neighbor list
        let d_max = details.d_max.unwrap_or(1.0);
        if kind != PotentialKind::Slj && details.d_max.is_some() {
            return Err(anyhow!("Pair potential {} of kind {} does not take a maximum diameter", name, kind));
        }
        if !(d_max.is_finite() && d_max >= 1.0) {
            return Err(anyhow!("Maximum diameter of pair potential {} must be at least 1, but got {}", name, d_max));
        }
        let potential = PairPotential::new(name, kind, details.r_cut)?;
        if self.interaction_index.get_id(name).is_some() {
            return Err(anyhow!("Pair potential {} illegally redefined", name));
        }
        let nlist_id = match &details.nlist {
            Some(nlist_name) => self.nlist_index.get_id(nlist_name)
                .ok_or(anyhow!("Cannot find neighbor list {} for pair potential {}", nlist_name, name))?,
            None => self.get_or_create_global_nlist()?
        };
        let nlist = self.nlist_index.get_mut(&nlist_id)
            .ok_or(anyhow!("Internal: neighbor list of pair potential {} vanished", name))?;
        if kind == PotentialKind::Slj {
            nlist.set_maximum_diameter(d_max.max(nlist.get_maximum_diameter()))?;
            nlist.set_diameter_shift(true);
        }
        let interaction_id = self.interaction_index.insert(potential, name.to_string(), "Pair potential")?;
        nlist.subscribe(interaction_id);
        self.subscriptions.insert(interaction_id, nlist_id);
        debug!("Pair potential {} subscribed to neighbor list {}", name, nlist.get_name());
        Ok(interaction_id)
    }

    pub fn get_pair_potential(&self, name: &str) -> Result<&PairPotential> {
        self.interaction_index.get_with_name(name)
            .map(|(_, potential)| potential)
            .ok_or(anyhow!("Cannot find pair potential {}", name))
    }

    /// Set coefficients of a pair potential for the type pair `(type_a, type_b)`
    ///
    /// The subscribed neighbor list is only marked as stale, its cutoffs are
    /// not recomputed.
    pub fn set_pair_coeff(&mut self, interaction_name: &str, type_a: &str, type_b: &str,
        values: &[(CoeffField, f64)]) -> Result<()>
    {
        let pair = self.types.get_pair_by_names(type_a, type_b)?;
        let interaction_id = self.with_pair_potential_mut(interaction_name,
            |potential| potential.set_coeff(pair, values))?;
        self.mark_subscriber_changed(interaction_id);
        Ok(())
    }

    /// Like `set_pair_coeff`, but with the coefficients given by name
    pub fn set_pair_coeff_by_name(&mut self, interaction_name: &str, type_a: &str, type_b: &str,
        values: &[(&str, f64)]) -> Result<()>
    {
        let pair = self.types.get_pair_by_names(type_a, type_b)?;
        let interaction_id = self.with_pair_potential_mut(interaction_name,
            |potential| potential.set_coeff_by_name(pair, values))?;
        self.mark_subscriber_changed(interaction_id);
        Ok(())
    }

    fn with_pair_potential_mut<F>(&mut self, name: &str, f: F) -> Result<InteractionID>
    where F: FnOnce(&mut PairPotential) -> Result<()>
    {
        let (interaction_id, potential) = self.interaction_index.get_with_name_mut(name)
            .ok_or(anyhow!("Cannot find pair potential {}", name))?;
        f(potential)?;
        Ok(interaction_id)
    }

    fn mark_subscriber_changed(&mut self, interaction_id: InteractionID) {
        let nlist = self.subscriptions.get(&interaction_id)
            .and_then(|nlist_id| self.nlist_index.get_mut(nlist_id));
        if let Some(nlist) = nlist {
            nlist.mark_stale();
        }
    }

    /* -- Cutoff reconciliation -- */

    /// Recompute the cutoffs of a single neighbor list
    pub fn update_rcut(&mut self, nlist_name: &str) -> Result<()> {
        let nlist_id = self.nlist_index.get_id(nlist_name)
            .ok_or(anyhow!("Cannot find neighbor list {}", nlist_name))?;
        self.update_rcut_by_id(nlist_id)
    }

    /// Recompute the cutoffs of all neighbor lists
    pub fn update_all_rcut(&mut self) -> Result<()> {
        let nlist_ids = self.nlist_index.iter()
            .map(|(id, _)| id)
            .collect::<Vec<_>>();
        for nlist_id in nlist_ids {
            self.update_rcut_by_id(nlist_id)?;
        }
        Ok(())
    }

    fn update_rcut_by_id(&mut self, nlist_id: NeighborListID) -> Result<()> {
        let num_types = self.types.len();
        let interaction_index = &self.interaction_index;
        let nlist = self.nlist_index.get_mut(&nlist_id)
            .ok_or(anyhow!("Internal: unknown neighbor list"))?;
        nlist.update_rcut(|interaction_id| interaction_index.get(&interaction_id)
            .map(|potential| potential as &dyn CutoffSource), num_types)
    }

    /// Reconciled cutoff of a neighbor list for a pair of type names
    pub fn get_pair_rcut(&self, nlist_name: &str, type_a: &str, type_b: &str) -> Result<f64> {
        let nlist = self.get_neighbor_list(nlist_name)?;
        let type_a = self.types.get_type_by_name(type_a)
            .ok_or(anyhow!("Cannot find particle type {}", type_a))?;
        let type_b = self.types.get_type_by_name(type_b)
            .ok_or(anyhow!("Cannot find particle type {}", type_b))?;
        if nlist.is_stale() {
            warn!("Cutoffs of neighbor list {} are outdated (call update_rcut() first)", nlist_name);
        }
        nlist.get_pair(type_a, type_b)
    }

    /* -- Running -- */

    /// Get the current time step
    pub fn get_timestep(&self) -> u64 {
        self.timestep
    }

    /// Prepare and account for a run of `steps` time steps
    ///
    /// All pair potentials must have complete coefficients for the current
    /// types. The cutoffs of every neighbor list are recomputed before the
    /// time step counter advances.
    pub fn run(&mut self, steps: u64) -> Result<()> {
        info!("Starting run of {} steps at time step {}", steps, self.timestep);
        for (_, potential) in self.interaction_index.iter() {
            potential.verify_coeffs(&self.types)?;
        }
        self.update_all_rcut()?;
        for (_, nlist) in self.nlist_index.iter() {
            debug!("Neighbor list {}: r_list in [{}, {}]", nlist.get_name(),
                nlist.get_min_rlist(), nlist.get_max_rlist());
        }
        self.timestep += steps;
        Ok(())
    }
}
