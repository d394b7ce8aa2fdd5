//! Content-addressed store of seed records.
//!
//! Records are keyed by [`address::derive`] of their seed id.  Mutation goes
//! through a crate-private transaction that works on a copy and writes it back
//! only on success, so a failed operation never leaves a half-updated record.

use crate::address::{self, AccountId, SeedAddress};
use crate::error::{ProgramError, StoreError};
use crate::state::SeedState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, path::Path};

/// Seed records keyed by derived address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedStore {
    seeds: BTreeMap<SeedAddress, SeedState>,
}

impl SeedStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from JSON; missing file -> empty store.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(path)?;
        let store: Self = serde_json::from_slice(&bytes)?;
        store.check()?;
        Ok(store)
    }

    /// Persist to JSON.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    fn check(&self) -> Result<(), StoreError> {
        for (addr, state) in &self.seeds {
            if *addr != state.address() {
                return Err(StoreError::Corrupt(format!(
                    "record for seed {} stored at {addr}",
                    state.seed_id()
                )));
            }
            if !state.counters_consistent() {
                return Err(StoreError::Corrupt(format!(
                    "pathway counters for seed {} do not sum to total_bridges",
                    state.seed_id()
                )));
            }
            if let Err(err) = state.check_config() {
                return Err(StoreError::Corrupt(format!("seed {}: {err}", state.seed_id())));
            }
        }
        Ok(())
    }

    /// Creates the record for `seed_id` at its derived address.
    pub fn initialize(
        &mut self,
        seed_id: u64,
        difficulty: u8,
        authority: AccountId,
        fragment: String,
    ) -> Result<&SeedState, ProgramError> {
        let addr = address::derive(seed_id);
        if self.seeds.contains_key(&addr) {
            return Err(ProgramError::AlreadyInitialized { seed_id });
        }
        let state = SeedState::new(seed_id, difficulty, authority, fragment)?;
        Ok(self.seeds.entry(addr).or_insert(state))
    }

    /// Record at `address`.
    pub fn fetch(&self, address: &SeedAddress) -> Option<&SeedState> {
        self.seeds.get(address)
    }

    /// Record for `seed_id`.
    pub fn seed(&self, seed_id: u64) -> Option<&SeedState> {
        self.fetch(&address::derive(seed_id))
    }

    /// Number of seeds.
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    /// Whether no seed has been initialized.
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Records in address order.
    pub fn iter(&self) -> impl Iterator<Item = (&SeedAddress, &SeedState)> {
        self.seeds.iter()
    }

    /// Runs `f` on a copy of the record for `seed_id` and commits the copy
    /// only if `f` succeeds.
    pub(crate) fn transact<T, F>(&mut self, seed_id: u64, f: F) -> Result<T, ProgramError>
    where
        F: FnOnce(&mut SeedState) -> Result<T, ProgramError>,
    {
        let addr = address::derive(seed_id);
        let slot = self
            .seeds
            .get_mut(&addr)
            .ok_or(ProgramError::SeedNotFound { seed_id })?;
        let mut draft = slot.clone();
        let out = f(&mut draft)?;
        *slot = draft;
        Ok(out)
    }

    #[cfg(test)]
    pub(crate) fn seed_mut(&mut self, seed_id: u64) -> Option<&mut SeedState> {
        self.seeds.get_mut(&address::derive(seed_id))
    }
}
