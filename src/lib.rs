#![deny(missing_docs)]

//! # gap_bridge
//!
//! **gap_bridge** is a deterministic reward state machine for puzzle seeds.
//! Every seed owns a record at an address derived from its identifier; the
//! record carries the seed's difficulty, an activity flag and per-pathway
//! bridge counters.  Participants submit completion claims, and the bridging
//! engine validates each claim against the seed's rules, classifies it into
//! one of three pathways, mints the pathway reward into the caller's token
//! account, and commits the counters, all in a single all-or-nothing step.
//!
//! ## Modules
//!
//! * [`address`]: domain-separated BLAKE2b address derivation.
//! * [`state`]: the persistent [`SeedState`] record and [`Pathway`].
//! * [`store`]: the content-addressed [`SeedStore`] with JSON snapshots.
//! * [`rules`]: difficulty-keyed rule sets and reward tables.
//! * [`token`]: the [`TokenLedger`] seam and the [`MintAuthority`] capability.
//! * [`bridge`]: the bridging engine.
//! * [`program`]: the [`SeedProgram`] facade.
//!
//! ## Usage
//!
//! ```rust
//! use gap_bridge::{
//!     address, AccountId, BridgeAccounts, CompletionClaim, MemoryTokenLedger, Pathway,
//!     RuleBook, SeedProgram, TokenLedger,
//! };
//!
//! let mut program = SeedProgram::new(RuleBook::reference()).unwrap();
//! program.initialize(65, 65, AccountId::from_label("authority")).unwrap();
//!
//! // The reward asset is created with the seed record as its mint authority.
//! let accounts = BridgeAccounts {
//!     seed_id: 65,
//!     caller: AccountId::from_label("user"),
//!     caller_token_account: AccountId::from_label("user-tokens"),
//!     reward_asset: AccountId::from_label("reward-mint"),
//! };
//! let mut tokens = MemoryTokenLedger::new();
//! tokens.create_asset(accounts.reward_asset, address::derive(65));
//! tokens.open_account(accounts.caller_token_account, accounts.caller, accounts.reward_asset);
//!
//! let claim = CompletionClaim {
//!     context: "B Harmonic Minor".into(),
//!     interval_name: "Augmented Second".into(),
//!     resolution: "Resolves upward to E".into(),
//!     salt: 12345,
//! };
//! let receipt = program.bridge(&mut tokens, &accounts, &claim).unwrap();
//! assert_eq!(receipt.pathway, Pathway::Exotic);
//! assert_eq!(tokens.balance(&accounts.caller_token_account), Some(65));
//! ```

pub mod address;
pub mod bridge;
mod error;
pub mod program;
pub mod rules;
pub mod state;
pub mod store;
pub mod token;

pub use address::{derive as derive_seed_address, AccountId, SeedAddress};
pub use bridge::{BridgeAccounts, BridgeReceipt, CompletionClaim};
pub use error::{ProgramError, RulesError, StoreError, TokenError};
pub use program::SeedProgram;
pub use rules::{RewardTable, RuleBook, SeedRules};
pub use state::{Pathway, SeedState, MAX_FRAGMENT_LEN, MIN_DIFFICULTY};
pub use store::SeedStore;
pub use token::{MemoryTokenLedger, MintAuthority, RewardTransfer, TokenLedger};
