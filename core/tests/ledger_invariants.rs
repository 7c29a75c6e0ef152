//! Property tests for ledger conservation
//!
//! After any sequence of transfer attempts, every account balance equals its
//! seeded balance plus the signed sum of the records touching it, and the
//! user's total holdings never change.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use banking_core::{LedgerState, LedgerStore, TransferRequest, demo_ledger};
use banking_testing::TestBank;
use proptest::prelude::*;
use rust_decimal::Decimal;

const KINDS: [&str; 3] = ["checking", "savings", "brokerage"];

fn attempts() -> impl Strategy<Value = Vec<(i64, usize, usize)>> {
    prop::collection::vec((-500_i64..8_000, 0..KINDS.len(), 0..KINDS.len()), 1..25)
}

fn expected_balance(seed: &LedgerState, state: &LedgerState, username: &str, kind: &str) -> Decimal {
    let user = &seed.users[username];
    let initial = user.account(kind).unwrap().balance;
    state
        .transactions
        .iter()
        .filter(|record| record.user_id == user.id)
        .fold(initial, |balance, record| {
            let mut balance = balance;
            if record.from == kind {
                balance -= record.amount;
            }
            if record.to == kind {
                balance += record.amount;
            }
            balance
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn balances_match_transaction_log(attempts in attempts()) {
        let (state, accepted) = tokio_test::block_on(async {
            let bank = TestBank::new();
            let john = bank.sign_in("john_doe").await;
            let mut accepted = 0_usize;

            for (units, from, to) in attempts {
                let request = TransferRequest {
                    amount: Decimal::new(units * 100, 2),
                    to_account: KINDS[to].to_string(),
                    from_account: KINDS[from].to_string(),
                };
                if bank.service.transfer(&bank.ctx(), &john, request).await.is_ok() {
                    accepted += 1;
                }
            }

            (bank.store.load().await.unwrap(), accepted)
        });

        let seed = demo_ledger();
        prop_assert_eq!(state.transactions.len(), accepted);

        for kind in ["checking", "savings"] {
            let actual = state.users["john_doe"].account(kind).unwrap().balance;
            prop_assert_eq!(actual, expected_balance(&seed, &state, "john_doe", kind));
            prop_assert!(actual >= Decimal::ZERO);
        }

        let total: Decimal = state.users["john_doe"].accounts.values().map(|a| a.balance).sum();
        let seeded: Decimal = seed.users["john_doe"].accounts.values().map(|a| a.balance).sum();
        prop_assert_eq!(total, seeded);
        prop_assert_eq!(&state.users["jane_smith"], &seed.users["jane_smith"]);
    }
}
