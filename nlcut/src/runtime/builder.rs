//! Session builder

use anyhow::Result;

use crate::{neighbor::DEFAULT_R_BUFF, runtime::Session};

/// Builder for `Session` with default values
pub struct SessionBuilder {
    types: Vec<String>,
    default_r_buff: f64,
    start_timestep: u64
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            types: vec![],
            default_r_buff: DEFAULT_R_BUFF,
            start_timestep: 0
        }
    }

    /// Particle types present from the start (more can be added later)
    pub fn with_types<S: AsRef<str>>(mut self, types: &[S]) -> Self {
        self.types.extend(types.iter().map(|name| name.as_ref().to_string()));
        self
    }

    /// Buffer distance of the implicitly created global neighbor list
    pub fn with_default_r_buff(mut self, r_buff: f64) -> Self {
        self.default_r_buff = r_buff;
        self
    }

    pub fn with_start_timestep(mut self, timestep: u64) -> Self {
        self.start_timestep = timestep;
        self
    }

    pub fn build(self) -> Result<Session> {
        Session::new(self.types, self.default_r_buff, self.start_timestep)
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
