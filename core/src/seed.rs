//! Demo ledger used when no ledger file exists yet.

use crate::types::{Account, LedgerState, User, UserId};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Plaintext password shared by the demo users.
pub const DEMO_PASSWORD: &str = "password123";

fn demo_user(
    id: &str,
    username: &str,
    name: &str,
    accounts: [(&str, &str, &str, i64); 2],
) -> User {
    let accounts = accounts
        .into_iter()
        .map(|(kind, number, label, balance)| {
            (
                kind.to_string(),
                Account::new(number, kind, label, Decimal::new(balance * 100, 2)),
            )
        })
        .collect::<BTreeMap<_, _>>();

    User {
        id: UserId::new(id),
        username: username.to_string(),
        name: name.to_string(),
        password: DEMO_PASSWORD.to_string(),
        accounts,
    }
}

/// Two demo customers, each with a checking and a savings account.
#[must_use]
pub fn demo_ledger() -> LedgerState {
    LedgerState::new()
        .with_user(demo_user(
            "1",
            "john_doe",
            "John Doe",
            [
                ("checking", "1001", "Primary Checking", 5000),
                ("savings", "1002", "High Yield Savings", 10000),
            ],
        ))
        .with_user(demo_user(
            "2",
            "jane_smith",
            "Jane Smith",
            [
                ("checking", "2001", "Everyday Checking", 3000),
                ("savings", "2002", "Savings Account", 8000),
            ],
        ))
}
