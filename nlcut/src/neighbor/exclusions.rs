//! Particle pairs that must never show up as neighbors

use std::collections::{BTreeSet, HashMap};

use anyhow::{Result, anyhow};

/// Global particle identifier (stable under sorting, unlike particle indices)
pub type ParticleTag = usize;

/// Symmetric set of excluded particle pairs, stored by tag
#[derive(Clone, Debug, Default)]
pub struct ExclusionList {
    excluded: HashMap<ParticleTag, BTreeSet<ParticleTag>>
}

impl ExclusionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude the pair `(tag1, tag2)`; adding an existing exclusion is a no-op
    pub fn add_exclusion(&mut self, tag1: ParticleTag, tag2: ParticleTag) -> Result<()> {
        if tag1 == tag2 {
            return Err(anyhow!("Cannot exclude particle {} from itself", tag1));
        }
        self.excluded.entry(tag1).or_default().insert(tag2);
        self.excluded.entry(tag2).or_default().insert(tag1);
        Ok(())
    }

    /// Exclude every bonded pair
    pub fn add_exclusions_from_bonds(&mut self, bonds: &[(ParticleTag, ParticleTag)]) -> Result<()> {
        for (tag1, tag2) in bonds {
            self.add_exclusion(*tag1, *tag2)?;
        }
        Ok(())
    }

    pub fn clear_exclusions(&mut self) {
        self.excluded.clear();
    }

    pub fn is_excluded(&self, tag1: ParticleTag, tag2: ParticleTag) -> bool {
        self.excluded.get(&tag1)
            .map_or(false, |partners| partners.contains(&tag2))
    }

    /// Number of particles that have exactly `size` exclusions
    pub fn get_num_exclusions(&self, size: usize) -> usize {
        self.excluded.values()
            .filter(|partners| partners.len() == size)
            .count()
    }

    /// Excluded partners of a single particle
    pub fn get_exclusions(&self, tag: ParticleTag) -> impl Iterator<Item = ParticleTag> + '_ {
        self.excluded.get(&tag)
            .into_iter()
            .flat_map(|partners| partners.iter().copied())
    }

    pub fn has_exclusions(&self) -> bool {
        !self.excluded.is_empty()
    }
}
