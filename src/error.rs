//! Error taxonomy surfaced by the seed program and its collaborators.
//!
//! Every failure is synchronous and terminal for the call that raised it;
//! nothing is retried internally and no partial effect survives an error.

use thiserror::Error;

/// Failures reported by a token collaborator while minting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The reward asset is not registered with the collaborator.
    #[error("unknown reward asset {0}")]
    UnknownAsset(String),
    /// The destination token account does not exist.
    #[error("unknown token account {0}")]
    UnknownAccount(String),
    /// The destination account holds a different asset.
    #[error("token account {account} does not hold asset {asset}")]
    AssetMismatch {
        /// Destination account.
        account: String,
        /// Asset the mint targeted.
        asset: String,
    },
    /// The destination account is owned by someone other than the caller.
    #[error("token account {account} is not owned by {owner}")]
    OwnerMismatch {
        /// Destination account.
        account: String,
        /// Signer the reward was minted for.
        owner: String,
    },
    /// The presented mint authority is not the asset's mint authority.
    #[error("mint authority {presented} rejected for asset {asset}")]
    AuthorityMismatch {
        /// Asset the mint targeted.
        asset: String,
        /// Authority address presented with the mint.
        presented: String,
    },
    /// Crediting the amount would overflow a balance or the asset supply.
    #[error("balance overflow on {0}")]
    BalanceOverflow(String),
}

impl TokenError {
    /// True when the collaborator refused the delegated signing capability.
    pub fn is_authority(&self) -> bool {
        matches!(self, Self::AuthorityMismatch { .. })
    }
}

/// Failures of the `initialize` and `bridge` operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// A seed record already exists at the derived address.
    #[error("seed {seed_id} is already initialized")]
    AlreadyInitialized {
        /// Seed identifier.
        seed_id: u64,
    },
    /// The seed record is not accepting bridges.
    #[error("seed {seed_id} is inactive")]
    SeedInactive {
        /// Seed identifier.
        seed_id: u64,
    },
    /// The claim names an interval the seed does not recognize.
    #[error("ContextualIncoherence: interval '{interval}' is not recognized for this seed")]
    ContextualIncoherence {
        /// Interval name carried by the rejected claim.
        interval: String,
    },
    /// The token collaborator refused the seed's delegated mint authority.
    #[error("InsufficientAuthority: {0}")]
    InsufficientAuthority(TokenError),
    /// No seed record exists at the derived address.
    #[error("seed {seed_id} has not been initialized")]
    SeedNotFound {
        /// Seed identifier.
        seed_id: u64,
    },
    /// Difficulty outside the accepted range.
    #[error("difficulty {0} is outside the accepted range")]
    InvalidDifficulty(u8),
    /// The configured puzzle fragment does not fit the record.
    #[error("fragment of {len} bytes exceeds the record limit")]
    FragmentTooLong {
        /// Fragment length in bytes.
        len: usize,
    },
    /// A counter would wrap.
    #[error("bridge counters for seed {seed_id} would overflow")]
    CounterOverflow {
        /// Seed identifier.
        seed_id: u64,
    },
    /// Any other collaborator failure.
    #[error("token collaborator error: {0}")]
    Token(TokenError),
}

impl From<TokenError> for ProgramError {
    fn from(err: TokenError) -> Self {
        if err.is_authority() {
            Self::InsufficientAuthority(err)
        } else {
            Self::Token(err)
        }
    }
}

/// Failures while loading or saving a seed store snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File-system failure.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The snapshot is not valid JSON for a store.
    #[error("store parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// The snapshot parsed but violates a record invariant.
    #[error("store snapshot is corrupt: {0}")]
    Corrupt(String),
}

/// Failures while loading a rule book.
#[derive(Debug, Error)]
pub enum RulesError {
    /// File-system failure.
    #[error("rules I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not a valid rule book.
    #[error("rules parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// The rule book parsed but cannot classify claims.
    #[error("invalid rule set: {0}")]
    Invalid(String),
}
