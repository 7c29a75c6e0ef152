//! Domain types for the ledger.
//!
//! - Users own accounts keyed by kind (`checking`, `savings`, ...)
//! - Sessions map an opaque id to a user
//! - Transaction records form an append-only log

use banking_telemetry::Actor;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a user.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a `UserId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque session identifier handed to clients after login.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random `SessionId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a `SessionId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Unique identifier for a transaction record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Creates a new random `TransactionId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single account belonging to a user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account number
    pub account_number: String,
    /// Current balance
    pub balance: Decimal,
    /// Kind tag, e.g. `checking`
    #[serde(rename = "type")]
    pub kind: String,
    /// Display name, e.g. `Primary Checking`
    pub name: String,
}

impl Account {
    /// Creates a new account
    #[must_use]
    pub fn new(
        account_number: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
        balance: Decimal,
    ) -> Self {
        Self {
            account_number: account_number.into(),
            balance,
            kind: kind.into(),
            name: name.into(),
        }
    }
}

/// A bank customer.
///
/// The password is stored and compared in plaintext. This is a known flaw
/// of the demo ledger and must not be copied into anything real.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier
    pub id: UserId,
    /// Login name
    pub username: String,
    /// Display name
    pub name: String,
    /// Plaintext credential
    pub password: String,
    /// Accounts keyed by kind
    pub accounts: BTreeMap<String, Account>,
}

impl User {
    /// Returns the account of the given kind
    #[must_use]
    pub fn account(&self, kind: &str) -> Option<&Account> {
        self.accounts.get(kind)
    }

    /// Password-free view of the user
    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            username: self.username.clone(),
            name: self.name.clone(),
            accounts: self.accounts.clone(),
        }
    }

    /// Telemetry actor for this user
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor::identified(self.id.as_str(), &self.username, &self.name)
    }
}

/// User data safe to return to clients
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User identifier
    pub id: UserId,
    /// Login name
    pub username: String,
    /// Display name
    pub name: String,
    /// Accounts keyed by kind
    pub accounts: BTreeMap<String, Account>,
}

/// A login session. No expiry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Owner of the session
    pub user_id: UserId,
    /// When the session was created
    pub created_at: DateTime<Utc>,
}

/// One completed transfer. Never mutated once appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Record identifier
    pub id: TransactionId,
    /// Source account kind
    pub from: String,
    /// Destination account kind
    pub to: String,
    /// Owning user
    pub user_id: UserId,
    /// Amount moved
    pub amount: Decimal,
    /// When the transfer happened
    pub timestamp: DateTime<Utc>,
    /// Correlation id of the request that created it
    pub correlation_id: String,
}

impl TransactionRecord {
    /// Whether either leg touches the given account kind
    #[must_use]
    pub fn touches(&self, kind: &str) -> bool {
        self.from == kind || self.to == kind
    }
}

/// Everything the ledger store persists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    /// Users keyed by username
    pub users: BTreeMap<String, User>,
    /// Active sessions
    #[serde(default)]
    pub sessions: HashMap<SessionId, Session>,
    /// Transaction log in append order
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
}

impl LedgerState {
    /// Creates an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user, keyed by username
    #[must_use]
    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.username.clone(), user);
        self
    }

    /// Looks a user up by id
    #[must_use]
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.values().find(|u| &u.id == id)
    }

    /// Looks a user up by id, mutably
    pub fn user_mut(&mut self, id: &UserId) -> Option<&mut User> {
        self.users.values_mut().find(|u| &u.id == id)
    }

    /// Resolves a session to its user
    #[must_use]
    pub fn session_user(&self, session_id: &SessionId) -> Option<&User> {
        self.sessions
            .get(session_id)
            .and_then(|session| self.user(&session.user_id))
    }
}
