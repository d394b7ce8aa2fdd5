//! Persistent per-seed record and the three reward pathways.

use crate::address::{self, AccountId, SeedAddress};
use crate::error::ProgramError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest accepted difficulty.
pub const MIN_DIFFICULTY: u8 = 1;
/// Maximum byte length of the puzzle fragment stored with a seed.
pub const MAX_FRAGMENT_LEN: usize = 200;

/// Resolution pathway assigned to a coherent claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pathway {
    /// Pathway A: the seed's rare, asymmetric relation.
    Exotic,
    /// Pathway B: the seed's common, consonant relation.
    Stable,
    /// Pathway C: an explicitly dual framing.
    Superposition,
}

impl Pathway {
    /// All pathways in counter order.
    pub const ALL: [Pathway; 3] = [Pathway::Exotic, Pathway::Stable, Pathway::Superposition];

    /// Single-letter label used in logs.
    pub fn letter(self) -> char {
        match self {
            Self::Exotic => 'A',
            Self::Stable => 'B',
            Self::Superposition => 'C',
        }
    }
}

impl fmt::Display for Pathway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Exotic => "Exotic",
            Self::Stable => "Stable",
            Self::Superposition => "Superposition",
        };
        write!(f, "Pathway {}: {name}", self.letter())
    }
}

/// Seed configuration plus its bridge counters.
///
/// Fields are readable by anyone and writable only from inside the crate, so
/// the bridge engine is the single mutator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedState {
    seed_id: u64,
    difficulty: u8,
    is_active: bool,
    authority: AccountId,
    fragment: String,
    total_bridges: u64,
    pathway_a_count: u64,
    pathway_b_count: u64,
    pathway_c_count: u64,
}

impl SeedState {
    pub(crate) fn new(
        seed_id: u64,
        difficulty: u8,
        authority: AccountId,
        fragment: String,
    ) -> Result<Self, ProgramError> {
        let state = Self {
            seed_id,
            difficulty,
            is_active: true,
            authority,
            fragment,
            total_bridges: 0,
            pathway_a_count: 0,
            pathway_b_count: 0,
            pathway_c_count: 0,
        };
        state.check_config()?;
        Ok(state)
    }

    /// Checks the immutable configuration: difficulty range and fragment size.
    pub(crate) fn check_config(&self) -> Result<(), ProgramError> {
        if self.difficulty < MIN_DIFFICULTY {
            return Err(ProgramError::InvalidDifficulty(self.difficulty));
        }
        if self.fragment.len() > MAX_FRAGMENT_LEN {
            return Err(ProgramError::FragmentTooLong {
                len: self.fragment.len(),
            });
        }
        Ok(())
    }

    /// Seed identifier.
    pub fn seed_id(&self) -> u64 {
        self.seed_id
    }

    /// Difficulty parameter.
    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    /// Whether bridging is permitted.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Signer that initialized the seed.
    pub fn authority(&self) -> &AccountId {
        &self.authority
    }

    /// Puzzle fragment shown to participants.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Number of successful bridges.
    pub fn total_bridges(&self) -> u64 {
        self.total_bridges
    }

    /// Pathway A count.
    pub fn pathway_a_count(&self) -> u64 {
        self.pathway_a_count
    }

    /// Pathway B count.
    pub fn pathway_b_count(&self) -> u64 {
        self.pathway_b_count
    }

    /// Pathway C count.
    pub fn pathway_c_count(&self) -> u64 {
        self.pathway_c_count
    }

    /// Count for a single pathway.
    pub fn pathway_count(&self, pathway: Pathway) -> u64 {
        match pathway {
            Pathway::Exotic => self.pathway_a_count,
            Pathway::Stable => self.pathway_b_count,
            Pathway::Superposition => self.pathway_c_count,
        }
    }

    /// Address this record lives at.
    pub fn address(&self) -> SeedAddress {
        address::derive(self.seed_id)
    }

    /// Whether the per-pathway counters add up to `total_bridges`.
    pub fn counters_consistent(&self) -> bool {
        self.pathway_a_count
            .checked_add(self.pathway_b_count)
            .and_then(|sum| sum.checked_add(self.pathway_c_count))
            == Some(self.total_bridges)
    }

    /// Bumps `total_bridges` and one pathway counter, or neither.
    pub(crate) fn record_bridge(&mut self, pathway: Pathway) -> Result<(), ProgramError> {
        let overflow = ProgramError::CounterOverflow {
            seed_id: self.seed_id,
        };
        let total = self.total_bridges.checked_add(1).ok_or(overflow.clone())?;
        let slot = match pathway {
            Pathway::Exotic => &mut self.pathway_a_count,
            Pathway::Stable => &mut self.pathway_b_count,
            Pathway::Superposition => &mut self.pathway_c_count,
        };
        *slot = slot.checked_add(1).ok_or(overflow)?;
        self.total_bridges = total;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    #[cfg(test)]
    pub(crate) fn force_counters(&mut self, a: u64, b: u64, c: u64) {
        self.pathway_a_count = a;
        self.pathway_b_count = b;
        self.pathway_c_count = c;
        self.total_bridges = a.wrapping_add(b).wrapping_add(c);
    }
}
