//! Per type pair cutoff reconciliation for neighbor lists
//!
//! Pair potentials subscribe to a neighbor list and request a cutoff radius
//! for every type pair they define. The neighbor list needs the largest of
//! these requests per pair to size its search radius. See `neighbor` for the
//! reconciliation itself and `runtime::Session` for the surrounding
//! bookkeeping of types, potentials and lists.

pub mod interaction;
pub mod neighbor;
pub mod runtime;
pub mod types;
