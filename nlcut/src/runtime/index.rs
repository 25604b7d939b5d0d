//! Named registries for interactions and neighbor lists

use std::collections::HashMap;

use anyhow::{Result, anyhow};
use slotmap::{SlotMap, DefaultKey};

pub type InteractionID = DefaultKey;
pub type NeighborListID = DefaultKey;

/// Combination of a slotmap with a hashmap for easy name resolution
#[derive(Debug)]
pub(crate) struct Index<ID: slotmap::Key, T> {
    /// Internal registry for holding indexed elements of type T
    elements: SlotMap<ID, T>,
    /// Fast lookup table for names
    name_table: HashMap<String, ID>
}

impl<ID: slotmap::Key, T> Index<ID,T> {
    pub fn new() -> Self {
        Self {
            elements: SlotMap::with_key(),
            name_table: HashMap::new()
        }
    }

    /// Insert a new element (names must be unique, `what` is used for the error)
    pub fn insert(&mut self, element: T, name: String, what: &str) -> Result<ID> {
        if self.name_table.contains_key(&name) {
            return Err(anyhow!("{} {} illegally redefined", what, name));
        }
        let key = self.elements.insert(element);
        self.name_table.insert(name, key);
        Ok(key)
    }

    pub fn get(&self, id: &ID) -> Option<&T> {
        self.elements.get(*id)
    }

    pub fn get_mut(&mut self, id: &ID) -> Option<&mut T> {
        self.elements.get_mut(*id)
    }

    pub fn get_id(&self, name: &str) -> Option<ID> {
        self.name_table.get(name).copied()
    }

    pub fn get_with_name(&self, name: &str) -> Option<(ID, &T)> {
        let key = self.get_id(name)?;
        self.elements.get(key).map(|element| (key, element))
    }

    pub fn get_with_name_mut(&mut self, name: &str) -> Option<(ID, &mut T)> {
        let key = self.get_id(name)?;
        self.elements.get_mut(key).map(|element| (key, element))
    }

    pub fn iter(&self) -> impl Iterator<Item=(ID, &T)> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item=(ID, &mut T)> {
        self.elements.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }
}
