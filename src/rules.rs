//! Difficulty-keyed rule sets: recognized interval labels, pathway markers and
//! reward tables.
//!
//! A [`RuleBook`] is loaded once by the embedder (JSON on disk or the built-in
//! reference set) and consulted read-only by the bridge engine.  Matching is
//! case-insensitive keyword containment on the claim's text fields.
//!
//! ```json
//! {
//!   "default": {
//!     "fragment": "Interval: [C --3 semitones--> ?]",
//!     "exotic": ["augmented"],
//!     "stable": ["minor"],
//!     "dual_intervals": ["both", "janus", "superposition"],
//!     "dual_contexts": ["both", "superposition", "schrodinger"],
//!     "rewards": { "exotic_bps": 10000, "stable_bps": 10000, "superposition_bps": 25400 }
//!   },
//!   "overrides": {}
//! }
//! ```

use crate::error::RulesError;
use crate::state::Pathway;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Denominator for reward multipliers.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Per-pathway reward multipliers in basis points of the seed difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTable {
    /// Multiplier for pathway A.
    pub exotic_bps: u64,
    /// Multiplier for pathway B.
    pub stable_bps: u64,
    /// Multiplier for pathway C.
    pub superposition_bps: u64,
}

impl RewardTable {
    /// A and B pay the difficulty, C pays 2.54x rounded down (165 at difficulty 65).
    pub const fn reference() -> Self {
        Self {
            exotic_bps: 10_000,
            stable_bps: 10_000,
            superposition_bps: 25_400,
        }
    }

    /// Multiplier for `pathway`.
    pub fn multiplier_bps(&self, pathway: Pathway) -> u64 {
        match pathway {
            Pathway::Exotic => self.exotic_bps,
            Pathway::Stable => self.stable_bps,
            Pathway::Superposition => self.superposition_bps,
        }
    }

    /// Reward for `pathway` at `difficulty`, rounded down.
    ///
    /// Computed in `u128`; the quotient is at most `255 * u64::MAX / 10_000`,
    /// which always fits back into `u64`.
    pub fn reward(&self, pathway: Pathway, difficulty: u8) -> u64 {
        let scaled = u128::from(difficulty) * u128::from(self.multiplier_bps(pathway));
        (scaled / u128::from(BPS_DENOMINATOR)) as u64
    }
}

impl Default for RewardTable {
    fn default() -> Self {
        Self::reference()
    }
}

/// Rule set applied to every seed of one difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRules {
    /// Puzzle fragment copied into new seed records.
    pub fragment: String,
    /// Interval keywords for pathway A.
    pub exotic: Vec<String>,
    /// Interval keywords for pathway B.
    pub stable: Vec<String>,
    /// Interval keywords that denote a dual framing (pathway C).
    pub dual_intervals: Vec<String>,
    /// Context keywords that denote a dual framing (pathway C).
    #[serde(default)]
    pub dual_contexts: Vec<String>,
    /// Reward multipliers.
    #[serde(default)]
    pub rewards: RewardTable,
}

// Blank needles never match; `contains("")` would accept every string.
fn contains_any(haystack: &str, needles: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    needles
        .iter()
        .map(|needle| needle.trim())
        .filter(|needle| !needle.is_empty())
        .any(|needle| haystack.contains(&needle.to_lowercase()))
}

impl SeedRules {
    /// The Enharmonic Gap rule set.
    pub fn reference() -> Self {
        let words = |list: &[&str]| list.iter().map(|w| w.to_string()).collect::<Vec<_>>();
        Self {
            fragment: "Interval: [C --3 semitones--> ?]".to_string(),
            exotic: words(&["augmented"]),
            stable: words(&["minor"]),
            dual_intervals: words(&["both", "janus", "superposition"]),
            dual_contexts: words(&["both", "superposition", "schrodinger"]),
            rewards: RewardTable::reference(),
        }
    }

    /// Checks that the rule set can classify at least one claim per pathway.
    pub fn validate(&self) -> Result<(), RulesError> {
        let lists = [
            ("exotic", &self.exotic),
            ("stable", &self.stable),
            ("dual_intervals", &self.dual_intervals),
            ("dual_contexts", &self.dual_contexts),
        ];
        for (name, list) in lists {
            if list.iter().any(|word| word.trim().is_empty()) {
                return Err(RulesError::Invalid(format!("empty keyword in {name}")));
            }
        }
        if self.exotic.is_empty() {
            return Err(RulesError::Invalid("no exotic interval labels".into()));
        }
        if self.stable.is_empty() {
            return Err(RulesError::Invalid("no stable interval labels".into()));
        }
        if self.dual_intervals.is_empty() && self.dual_contexts.is_empty() {
            return Err(RulesError::Invalid(
                "no dual markers; superposition pathway is unreachable".into(),
            ));
        }
        Ok(())
    }

    /// Whether `interval_name` names an interval this seed recognizes.
    ///
    /// Only the interval carries validation weight.
    pub fn is_coherent(&self, interval_name: &str) -> bool {
        contains_any(interval_name, &self.exotic)
            || contains_any(interval_name, &self.stable)
            || contains_any(interval_name, &self.dual_intervals)
    }

    /// Classifies a claim, or `None` when the interval is not recognized.
    ///
    /// A dual marker on either field selects [`Pathway::Superposition`] and
    /// overrides the interval's own pathway.
    pub fn classify(&self, interval_name: &str, context: &str) -> Option<Pathway> {
        if !self.is_coherent(interval_name) {
            return None;
        }
        if contains_any(interval_name, &self.dual_intervals)
            || contains_any(context, &self.dual_contexts)
        {
            return Some(Pathway::Superposition);
        }
        if contains_any(interval_name, &self.exotic) {
            Some(Pathway::Exotic)
        } else {
            Some(Pathway::Stable)
        }
    }
}

impl Default for SeedRules {
    fn default() -> Self {
        Self::reference()
    }
}

/// Rule sets keyed by difficulty, with a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBook {
    /// Rules for every difficulty without an override.
    pub default: SeedRules,
    /// Difficulty-specific rules.
    #[serde(default)]
    pub overrides: BTreeMap<u8, SeedRules>,
}

impl RuleBook {
    /// Built-in rule book using [`SeedRules::reference`] for every difficulty.
    pub fn reference() -> Self {
        Self {
            default: SeedRules::reference(),
            overrides: BTreeMap::new(),
        }
    }

    /// Parses and validates a JSON rule book.
    pub fn from_json(contents: &str) -> Result<Self, RulesError> {
        let book: Self = serde_json::from_str(contents)?;
        book.validate()?;
        Ok(book)
    }

    /// Loads a JSON rule book from disk.
    pub fn from_path(path: &Path) -> Result<Self, RulesError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Validates the default and every override.
    pub fn validate(&self) -> Result<(), RulesError> {
        self.default.validate()?;
        for (difficulty, rules) in &self.overrides {
            rules
                .validate()
                .map_err(|err| RulesError::Invalid(format!("difficulty {difficulty}: {err}")))?;
        }
        Ok(())
    }

    /// Rules governing seeds of `difficulty`.
    pub fn rules_for(&self, difficulty: u8) -> &SeedRules {
        self.overrides.get(&difficulty).unwrap_or(&self.default)
    }
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::reference()
    }
}
