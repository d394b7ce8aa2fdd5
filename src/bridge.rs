//! The bridging engine: validates a completion claim against its seed's rules,
//! picks a pathway, mints the reward through the seed's delegated authority,
//! and commits the counters.
//!
//! A bridge runs as one transaction over the seed record:
//!
//! 1. load the record and require it to be active;
//! 2. require the interval to be recognized (`ContextualIncoherence` otherwise);
//! 3. classify into pathway A, B or C and price the reward;
//! 4. reserve the counter increments on a draft of the record;
//! 5. mint, signing with the record's [`MintAuthority`];
//! 6. commit the draft.
//!
//! Any failure before step 6 drops the draft, so the record and token balances
//! are left exactly as they were.

use crate::address::{self, AccountId, SeedAddress};
use crate::error::ProgramError;
use crate::rules::RuleBook;
use crate::state::Pathway;
use crate::store::SeedStore;
use crate::token::{MintAuthority, RewardTransfer, TokenLedger};
use serde::{Deserialize, Serialize};

/// Caller-supplied completion claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionClaim {
    /// Conceptual frame the claim is made in.
    pub context: String,
    /// Relation being claimed; the only field with validation weight.
    pub interval_name: String,
    /// Claimed outcome.
    pub resolution: String,
    /// Caller-chosen value that varies claim identity. Never validated.
    pub salt: u64,
}

/// Accounts a bridge touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeAccounts {
    /// Seed being bridged.
    pub seed_id: u64,
    /// Signing caller.
    pub caller: AccountId,
    /// Caller's token account for the reward asset.
    pub caller_token_account: AccountId,
    /// Reward asset minted by the seed.
    pub reward_asset: AccountId,
}

impl BridgeAccounts {
    /// Address of the seed record.
    pub fn seed_address(&self) -> SeedAddress {
        address::derive(self.seed_id)
    }
}

/// Outcome of a committed bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeReceipt {
    /// Seed bridged.
    pub seed_id: u64,
    /// Pathway the claim was classified into.
    pub pathway: Pathway,
    /// Units minted to the caller.
    pub amount: u64,
    /// `total_bridges` after this bridge.
    pub total_bridges: u64,
}

/// Runs one bridge transaction.
pub fn bridge<L: TokenLedger + ?Sized>(
    store: &mut SeedStore,
    rules: &RuleBook,
    tokens: &mut L,
    accounts: &BridgeAccounts,
    claim: &CompletionClaim,
) -> Result<BridgeReceipt, ProgramError> {
    let result = store.transact(accounts.seed_id, |draft| {
        if !draft.is_active() {
            return Err(ProgramError::SeedInactive {
                seed_id: draft.seed_id(),
            });
        }

        let seed_rules = rules.rules_for(draft.difficulty());
        let pathway = seed_rules
            .classify(&claim.interval_name, &claim.context)
            .ok_or_else(|| ProgramError::ContextualIncoherence {
                interval: claim.interval_name.clone(),
            })?;
        let amount = seed_rules.rewards.reward(pathway, draft.difficulty());

        draft.record_bridge(pathway)?;

        let transfer = RewardTransfer {
            asset: accounts.reward_asset,
            destination: accounts.caller_token_account,
            owner: accounts.caller,
            amount,
        };
        tokens.mint(&transfer, &MintAuthority::for_seed(draft))?;

        Ok(BridgeReceipt {
            seed_id: draft.seed_id(),
            pathway,
            amount,
            total_bridges: draft.total_bridges(),
        })
    });

    match &result {
        Ok(receipt) => log::info!(
            "QSYS|mod=BRIDGE|evt=COMMIT|seed={}|caller={}|pathway={}|reward={}|salt={}|total={}",
            receipt.seed_id,
            accounts.caller,
            receipt.pathway.letter(),
            receipt.amount,
            claim.salt,
            receipt.total_bridges
        ),
        Err(err) => log::warn!(
            "QSYS|mod=BRIDGE|evt=REJECT|seed={}|caller={}|salt={}|err={err}",
            accounts.seed_id,
            accounts.caller,
            claim.salt
        ),
    }
    result
}
