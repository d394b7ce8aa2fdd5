//! Program facade: one seed store plus the rule book that governs it.

use crate::address::{AccountId, SeedAddress};
use crate::bridge::{self, BridgeAccounts, BridgeReceipt, CompletionClaim};
use crate::error::{ProgramError, RulesError};
use crate::rules::RuleBook;
use crate::state::SeedState;
use crate::store::SeedStore;
use crate::token::TokenLedger;

/// Seed program exposing `initialize`, `bridge` and the read surface.
#[derive(Debug, Clone, Default)]
pub struct SeedProgram {
    store: SeedStore,
    rules: RuleBook,
}

impl SeedProgram {
    /// Program with an empty store and the given rules.
    ///
    /// The rule book is validated first; a blank keyword would otherwise make
    /// every interval coherent.
    pub fn new(rules: RuleBook) -> Result<Self, RulesError> {
        Self::with_store(SeedStore::new(), rules)
    }

    /// Program over a previously persisted store.
    pub fn with_store(store: SeedStore, rules: RuleBook) -> Result<Self, RulesError> {
        rules.validate()?;
        Ok(Self { store, rules })
    }

    /// Creates the seed record for `seed_id`, signed by `authority`.
    pub fn initialize(
        &mut self,
        seed_id: u64,
        difficulty: u8,
        authority: AccountId,
    ) -> Result<&SeedState, ProgramError> {
        let fragment = self.rules.rules_for(difficulty).fragment.clone();
        match self.store.initialize(seed_id, difficulty, authority, fragment) {
            Ok(state) => {
                log::info!(
                    "QSYS|mod=SEED|evt=INIT|seed={seed_id}|difficulty={difficulty}|authority={authority}|addr={}",
                    state.address()
                );
                Ok(state)
            }
            Err(err) => {
                log::warn!("QSYS|mod=SEED|evt=INIT_REJECT|seed={seed_id}|err={err}");
                Err(err)
            }
        }
    }

    /// Validates, classifies and rewards `claim`.
    pub fn bridge<L: TokenLedger + ?Sized>(
        &mut self,
        tokens: &mut L,
        accounts: &BridgeAccounts,
        claim: &CompletionClaim,
    ) -> Result<BridgeReceipt, ProgramError> {
        bridge::bridge(&mut self.store, &self.rules, tokens, accounts, claim)
    }

    /// Seed record for `seed_id`.
    pub fn seed(&self, seed_id: u64) -> Option<&SeedState> {
        self.store.seed(seed_id)
    }

    /// Seed record at `address`.
    pub fn fetch(&self, address: &SeedAddress) -> Option<&SeedState> {
        self.store.fetch(address)
    }

    /// Underlying store, for persistence.
    pub fn store(&self) -> &SeedStore {
        &self.store
    }

    /// Active rule book.
    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address;
    use crate::state::Pathway;
    use crate::token::MemoryTokenLedger;
    use proptest::prelude::*;

    const SEED_ID: u64 = 65;
    const DIFFICULTY: u8 = 65;

    struct Harness {
        program: SeedProgram,
        tokens: MemoryTokenLedger,
        accounts: BridgeAccounts,
    }

    impl Harness {
        fn new(seed_id: u64, difficulty: u8) -> Self {
            let mut program = SeedProgram::new(RuleBook::reference()).unwrap();
            program
                .initialize(seed_id, difficulty, AccountId::from_label("provider-wallet"))
                .unwrap();
            let accounts = BridgeAccounts {
                seed_id,
                caller: AccountId::from_label("user"),
                caller_token_account: AccountId::from_label("user-token-account"),
                reward_asset: AccountId::from_label("memek-mint"),
            };
            let mut tokens = MemoryTokenLedger::new();
            tokens.create_asset(accounts.reward_asset, address::derive(seed_id));
            tokens.open_account(
                accounts.caller_token_account,
                accounts.caller,
                accounts.reward_asset,
            );
            Self {
                program,
                tokens,
                accounts,
            }
        }

        fn submit(
            &mut self,
            context: &str,
            interval: &str,
            salt: u64,
        ) -> Result<BridgeReceipt, ProgramError> {
            let claim = CompletionClaim {
                context: context.to_string(),
                interval_name: interval.to_string(),
                resolution: "Context shifts".to_string(),
                salt,
            };
            self.program.bridge(&mut self.tokens, &self.accounts, &claim)
        }

        fn balance(&self) -> u64 {
            self.tokens
                .balance(&self.accounts.caller_token_account)
                .unwrap()
        }

        fn state(&self) -> &SeedState {
            self.program.seed(self.accounts.seed_id).unwrap()
        }
    }

    #[test]
    fn initialize_records_configuration() {
        let harness = Harness::new(SEED_ID, DIFFICULTY);
        let state = harness.state();
        assert_eq!(state.seed_id(), 65);
        assert_eq!(state.difficulty(), 65);
        assert!(state.is_active());
        assert_eq!(state.total_bridges(), 0);
        assert_eq!(state.fragment(), "Interval: [C --3 semitones--> ?]");
        assert_eq!(state.authority(), &AccountId::from_label("provider-wallet"));
        assert_eq!(
            harness.program.fetch(&address::derive(SEED_ID)),
            Some(state)
        );
    }

    #[test]
    fn initialize_twice_fails_once() {
        let mut harness = Harness::new(SEED_ID, DIFFICULTY);
        let before = harness.state().clone();
        let err = harness
            .program
            .initialize(SEED_ID, 3, AccountId::from_label("other"))
            .unwrap_err();
        assert_eq!(err, ProgramError::AlreadyInitialized { seed_id: SEED_ID });
        assert_eq!(harness.state(), &before);
    }

    #[test]
    fn initialize_rejects_zero_difficulty() {
        let mut program = SeedProgram::default();
        let authority = AccountId::from_label("a");
        let err = program.initialize(1, 0, authority).unwrap_err();
        assert_eq!(err, ProgramError::InvalidDifficulty(0));
        assert!(program.store().is_empty());
    }

    #[test]
    fn initialize_rejects_oversized_fragment() {
        let mut rules = RuleBook::reference();
        rules.default.fragment = "x".repeat(201);
        let mut program = SeedProgram::new(rules).unwrap();
        let authority = AccountId::from_label("a");
        let err = program.initialize(1, 1, authority).unwrap_err();
        assert_eq!(err, ProgramError::FragmentTooLong { len: 201 });
    }

    #[test]
    fn blank_keyword_rule_book_is_refused() {
        let mut rules = RuleBook::reference();
        rules.default.stable.push(String::new());
        let err = SeedProgram::new(rules.clone()).unwrap_err();
        assert!(matches!(err, RulesError::Invalid(ref msg) if msg.contains("stable")));

        let mut overridden = RuleBook::reference();
        overridden.overrides.insert(DIFFICULTY, rules.default);
        let err = SeedProgram::with_store(SeedStore::new(), overridden).unwrap_err();
        assert!(matches!(err, RulesError::Invalid(_)));
    }

    #[test]
    fn enharmonic_gap_end_to_end() {
        let mut h = Harness::new(SEED_ID, DIFFICULTY);

        let a = h.submit("B Harmonic Minor", "Augmented Second", 12345).unwrap();
        assert_eq!(a.pathway, Pathway::Exotic);
        assert_eq!(h.balance(), 65);
        assert_eq!(h.state().pathway_a_count(), 1);
        assert_eq!(h.state().total_bridges(), 1);

        let b = h.submit("C Natural Minor", "Minor Third", 67890).unwrap();
        assert_eq!(b.pathway, Pathway::Stable);
        assert_eq!(h.balance(), 130);
        assert_eq!(h.state().pathway_b_count(), 1);
        assert_eq!(h.state().total_bridges(), 2);

        let c = h
            .submit("Schrodinger Superposition", "Both / Janus Mode", 11111)
            .unwrap();
        assert_eq!(c.pathway, Pathway::Superposition);
        assert_eq!(c.amount, 165);
        assert_eq!(h.balance(), 295);
        assert_eq!(h.state().pathway_c_count(), 1);
        assert_eq!(h.state().total_bridges(), 3);

        let before = h.state().clone();
        let err = h.submit("Random Noise", "Perfect Fifth", 99999).unwrap_err();
        assert!(matches!(err, ProgramError::ContextualIncoherence { .. }));
        assert!(err.to_string().contains("ContextualIncoherence"));
        assert_eq!(h.balance(), 295);
        assert_eq!(h.state().total_bridges(), 3);
        assert_eq!(h.state(), &before);
    }

    #[test]
    fn resubmitting_the_same_claim_rewards_again() {
        let mut h = Harness::new(SEED_ID, DIFFICULTY);
        h.submit("C Natural Minor", "Minor Third", 7).unwrap();
        h.submit("C Natural Minor", "Minor Third", 7).unwrap();
        assert_eq!(h.balance(), 130);
        assert_eq!(h.state().pathway_b_count(), 2);
    }

    #[test]
    fn seeds_do_not_share_counters() {
        let mut h = Harness::new(SEED_ID, DIFFICULTY);
        h.program
            .initialize(66, 10, AccountId::from_label("provider-wallet"))
            .unwrap();
        h.submit("", "Minor Third", 1).unwrap();
        assert_eq!(h.program.seed(66).unwrap().total_bridges(), 0);
        assert_eq!(h.state().total_bridges(), 1);
    }

    #[test]
    fn persisted_store_resumes_counters() {
        let mut h = Harness::new(SEED_ID, DIFFICULTY);
        h.submit("", "Augmented Second", 1).unwrap();
        let mut path = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        path.push(format!("gap_bridge_program_{nanos}.json"));
        h.program.store().save(&path).unwrap();
        let store = SeedStore::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        h.program = SeedProgram::with_store(store, RuleBook::reference()).unwrap();
        h.submit("", "Augmented Second", 2).unwrap();
        assert_eq!(h.state().pathway_a_count(), 2);
        assert_eq!(h.balance(), 130);
    }

    fn claim_strategy() -> impl Strategy<Value = (String, String)> {
        let intervals = prop::sample::select(vec![
            "Augmented Second",
            "Minor Third",
            "Both / Janus Mode",
            "Perfect Fifth",
            "Major Sixth",
            "augmented fourth",
        ]);
        let contexts = prop::sample::select(vec![
            "B Harmonic Minor",
            "C Natural Minor",
            "Schrodinger Superposition",
            "Random Noise",
            "",
        ]);
        (contexts, intervals).prop_map(|(c, i)| (c.to_string(), i.to_string()))
    }

    proptest! {
        #[test]
        fn counters_always_sum_to_total(claims in prop::collection::vec(claim_strategy(), 0..40)) {
            let mut h = Harness::new(SEED_ID, DIFFICULTY);
            let mut minted = 0u64;
            for (salt, (context, interval)) in claims.iter().enumerate() {
                let before = h.state().clone();
                let balance_before = h.balance();
                match h.submit(context, interval, salt as u64) {
                    Ok(receipt) => {
                        minted += receipt.amount;
                        prop_assert_eq!(receipt.total_bridges, before.total_bridges() + 1);
                        prop_assert_eq!(
                            h.state().pathway_count(receipt.pathway),
                            before.pathway_count(receipt.pathway) + 1
                        );
                    }
                    Err(err) => {
                        let is_incoherent = matches!(err, ProgramError::ContextualIncoherence { .. });
                        prop_assert!(is_incoherent);
                        prop_assert_eq!(h.state(), &before);
                        prop_assert_eq!(h.balance(), balance_before);
                    }
                }
                prop_assert!(h.state().counters_consistent());
            }
            prop_assert_eq!(h.balance(), minted);
        }

        #[test]
        fn rewards_scale_with_difficulty(difficulty in 1u8..=u8::MAX, repeats in 1usize..4) {
            let mut h = Harness::new(7, difficulty);
            for salt in 0..repeats {
                let a = h.submit("", "Augmented Second", salt as u64).unwrap();
                let b = h.submit("", "Minor Third", salt as u64).unwrap();
                let c = h.submit("", "Janus", salt as u64).unwrap();
                prop_assert_eq!(a.amount, u64::from(difficulty));
                prop_assert_eq!(b.amount, u64::from(difficulty));
                prop_assert_eq!(c.amount, u64::from(difficulty) * 254 / 100);
            }
        }

        #[test]
        fn unrecognized_intervals_never_mint(interval in "[pP]erfect [b-np-tv-z]{1,8}|[0-9]{1,6}") {
            let mut h = Harness::new(SEED_ID, DIFFICULTY);
            let before = h.state().clone();
            let err = h.submit("Schrodinger Superposition", &interval, 1).unwrap_err();
            let is_incoherent = matches!(err, ProgramError::ContextualIncoherence { .. });
            prop_assert!(is_incoherent);
            prop_assert_eq!(h.state(), &before);
            prop_assert_eq!(h.balance(), 0);
        }
    }
}
