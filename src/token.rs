//! Seam to the fungible-token collaborator.
//!
//! The seed record is the mint authority of its reward asset.  That authority
//! is modelled as a [`MintAuthority`] capability which only the bridge engine
//! can construct, so minting is reachable solely through seed-gated logic.
//! [`MemoryTokenLedger`] is an in-memory collaborator for tests and for
//! embedders without a real token ledger.

use crate::address::{self, AccountId, SeedAddress};
use crate::error::TokenError;
use crate::state::SeedState;
use std::collections::HashMap;

/// Delegated signing capability held by a seed record.
#[derive(Debug)]
pub struct MintAuthority {
    seed_id: u64,
    address: SeedAddress,
}

impl MintAuthority {
    pub(crate) fn for_seed(state: &SeedState) -> Self {
        Self {
            seed_id: state.seed_id(),
            address: state.address(),
        }
    }

    /// Address of the signing seed record.
    pub fn address(&self) -> &SeedAddress {
        &self.address
    }

    /// Seed the authority was derived from.
    pub fn seed_id(&self) -> u64 {
        self.seed_id
    }

    /// True when the address re-derives from the seed id.
    pub fn verify(&self) -> bool {
        address::derive(self.seed_id) == self.address
    }
}

/// A single mint request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardTransfer {
    /// Reward asset.
    pub asset: AccountId,
    /// Token account credited.
    pub destination: AccountId,
    /// Signer that must own `destination`.
    pub owner: AccountId,
    /// Units to mint.
    pub amount: u64,
}

/// Operations the bridge engine needs from a token ledger.
pub trait TokenLedger {
    /// Mints `transfer.amount` into `transfer.destination`, signed by `authority`.
    ///
    /// Implementations must reject an authority that is not the asset's
    /// registered mint authority with [`TokenError::AuthorityMismatch`], reject
    /// a destination not owned by `transfer.owner` with
    /// [`TokenError::OwnerMismatch`], and leave balances unchanged on any error.
    fn mint(&mut self, transfer: &RewardTransfer, authority: &MintAuthority)
        -> Result<(), TokenError>;

    /// Current balance of a token account.
    fn balance(&self, account: &AccountId) -> Option<u64>;
}

/// Asset registration.
#[derive(Debug, Clone)]
pub struct AssetRecord {
    /// Address allowed to mint.
    pub mint_authority: SeedAddress,
    /// Units minted so far.
    pub supply: u64,
}

/// Token-holding account.
#[derive(Debug, Clone)]
pub struct TokenAccount {
    /// Owning signer.
    pub owner: AccountId,
    /// Asset held.
    pub asset: AccountId,
    /// Balance.
    pub amount: u64,
}

/// In-memory token ledger.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenLedger {
    assets: HashMap<AccountId, AssetRecord>,
    accounts: HashMap<AccountId, TokenAccount>,
}

impl MemoryTokenLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `asset` with `mint_authority`; re-registering replaces the authority.
    pub fn create_asset(&mut self, asset: AccountId, mint_authority: SeedAddress) {
        self.assets
            .entry(asset)
            .and_modify(|record| record.mint_authority = mint_authority)
            .or_insert(AssetRecord {
                mint_authority,
                supply: 0,
            });
    }

    /// Opens an empty token account; an existing account is left untouched.
    pub fn open_account(&mut self, account: AccountId, owner: AccountId, asset: AccountId) {
        self.accounts.entry(account).or_insert(TokenAccount {
            owner,
            asset,
            amount: 0,
        });
    }

    /// Registered asset, if any.
    pub fn asset(&self, asset: &AccountId) -> Option<&AssetRecord> {
        self.assets.get(asset)
    }

    /// Total minted for `asset`.
    pub fn asset_supply(&self, asset: &AccountId) -> Option<u64> {
        self.assets.get(asset).map(|record| record.supply)
    }

    /// Token account, if any.
    pub fn account(&self, account: &AccountId) -> Option<&TokenAccount> {
        self.accounts.get(account)
    }
}

impl TokenLedger for MemoryTokenLedger {
    fn mint(
        &mut self,
        transfer: &RewardTransfer,
        authority: &MintAuthority,
    ) -> Result<(), TokenError> {
        let asset = self
            .assets
            .get_mut(&transfer.asset)
            .ok_or_else(|| TokenError::UnknownAsset(transfer.asset.to_hex()))?;
        if !authority.verify() || asset.mint_authority != *authority.address() {
            return Err(TokenError::AuthorityMismatch {
                asset: transfer.asset.to_hex(),
                presented: authority.address().to_hex(),
            });
        }
        let account = self
            .accounts
            .get_mut(&transfer.destination)
            .ok_or_else(|| TokenError::UnknownAccount(transfer.destination.to_hex()))?;
        if account.asset != transfer.asset {
            return Err(TokenError::AssetMismatch {
                account: transfer.destination.to_hex(),
                asset: transfer.asset.to_hex(),
            });
        }
        if account.owner != transfer.owner {
            return Err(TokenError::OwnerMismatch {
                account: transfer.destination.to_hex(),
                owner: transfer.owner.to_hex(),
            });
        }
        let supply = asset
            .supply
            .checked_add(transfer.amount)
            .ok_or_else(|| TokenError::BalanceOverflow(transfer.asset.to_hex()))?;
        let balance = account
            .amount
            .checked_add(transfer.amount)
            .ok_or_else(|| TokenError::BalanceOverflow(transfer.destination.to_hex()))?;
        asset.supply = supply;
        account.amount = balance;
        Ok(())
    }

    fn balance(&self, account: &AccountId) -> Option<u64> {
        self.accounts.get(account).map(|acct| acct.amount)
    }
}
