// 🗝️ Record Store Conventions - Decoding a user-scoped key-value dump
//
// The wallet keeps every record in a flat key-value store:
//   balance:<user>                 -> "2847.50"
//   transaction:<user>:<id>        -> JSON
//   goal:<user>:<id>               -> JSON
//   group:<user>:<id>, org:<user>:<id>
//
// This module only reads such a dump into a WalletSnapshot; writing stays
// with the store's owner.

use crate::error::{RecordKeyError, RecordKeyResult};
use crate::records::{SavingsGoalRecord, TransactionRecord, WalletSnapshot};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

// ============================================================================
// ENTITY TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Balance,
    Transaction,
    Goal,
    Group,
    Organization,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Balance => "balance",
            EntityType::Transaction => "transaction",
            EntityType::Goal => "goal",
            EntityType::Group => "group",
            EntityType::Organization => "org",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "balance" => Some(EntityType::Balance),
            "transaction" => Some(EntityType::Transaction),
            "goal" => Some(EntityType::Goal),
            "group" => Some(EntityType::Group),
            "org" => Some(EntityType::Organization),
            _ => None,
        }
    }

    /// Balance is a single value per user; everything else is a collection.
    pub fn has_entity_id(&self) -> bool {
        !matches!(self, EntityType::Balance)
    }
}

// ============================================================================
// RECORD KEY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub entity: EntityType,
    pub user_id: String,
    pub entity_id: Option<String>,
}

impl RecordKey {
    pub fn balance(user_id: &str) -> Self {
        RecordKey {
            entity: EntityType::Balance,
            user_id: user_id.to_string(),
            entity_id: None,
        }
    }

    pub fn record(entity: EntityType, user_id: &str, entity_id: &str) -> Self {
        RecordKey {
            entity,
            user_id: user_id.to_string(),
            entity_id: Some(entity_id.to_string()),
        }
    }

    /// Prefix that selects every record of `entity` owned by `user_id`
    pub fn prefix(entity: EntityType, user_id: &str) -> String {
        format!("{}:{}:", entity.as_str(), user_id)
    }

    /// Parse `entity:user[:id]`. Entity ids may themselves contain ':'.
    pub fn parse(key: &str) -> RecordKeyResult<Self> {
        if key.is_empty() {
            return Err(RecordKeyError::Empty);
        }

        let mut parts = key.splitn(3, ':');
        let prefix = parts.next().unwrap_or_default();
        let entity = EntityType::from_prefix(prefix)
            .ok_or_else(|| RecordKeyError::UnknownEntity(prefix.to_string()))?;

        let user_id = match parts.next() {
            Some(user) if !user.is_empty() => user.to_string(),
            _ => return Err(RecordKeyError::MissingUser(key.to_string())),
        };

        let entity_id = parts.next().filter(|id| !id.is_empty()).map(str::to_string);

        match (entity.has_entity_id(), &entity_id) {
            (true, None) => Err(RecordKeyError::MissingEntityId(key.to_string())),
            (false, Some(_)) => Err(RecordKeyError::UnexpectedEntityId(key.to_string())),
            _ => Ok(RecordKey {
                entity,
                user_id,
                entity_id,
            }),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entity_id {
            Some(id) => write!(f, "{}:{}:{}", self.entity.as_str(), self.user_id, id),
            None => write!(f, "{}:{}", self.entity.as_str(), self.user_id),
        }
    }
}

// ============================================================================
// SNAPSHOT DECODING
// ============================================================================

/// Build a user's snapshot from the `(key, value)` pairs of a store dump.
///
/// Records of other users, groups, organizations and unparseable keys are
/// skipped. Malformed JSON under a transaction or goal key is an error.
pub fn snapshot_from_entries<'a, I>(entries: I, user_id: &str) -> Result<WalletSnapshot>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut snapshot = WalletSnapshot::default();

    for (raw_key, value) in entries {
        let key = match RecordKey::parse(raw_key) {
            Ok(key) => key,
            Err(e) => {
                warn!(key = raw_key, error = %e, "skipping unrecognized store key");
                continue;
            }
        };

        if key.user_id != user_id {
            continue;
        }

        match key.entity {
            EntityType::Balance => {
                let balance = value
                    .trim()
                    .trim_matches('"')
                    .parse::<f64>()
                    .with_context(|| format!("Invalid balance under {}", key))?;
                anyhow::ensure!(balance.is_finite(), "Non-finite balance under {}: {}", key, value);
                snapshot.balance = balance;
            }
            EntityType::Transaction => {
                let tx: TransactionRecord = serde_json::from_str(value)
                    .with_context(|| format!("Failed to parse transaction under {}", key))?;
                snapshot.transactions.push(tx);
            }
            EntityType::Goal => {
                let goal: SavingsGoalRecord = serde_json::from_str(value)
                    .with_context(|| format!("Failed to parse goal under {}", key))?;
                snapshot.goals.push(goal);
            }
            EntityType::Group | EntityType::Organization => {}
        }
    }

    // Newest first, matching the wallet's transaction listing
    snapshot
        .transactions
        .sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));

    debug!(
        user = user_id,
        balance = snapshot.balance,
        transactions = snapshot.transactions.len(),
        goals = snapshot.goals.len(),
        "decoded store entries"
    );
    Ok(snapshot)
}

/// Load a store dump: a JSON object of key -> JSON-encoded string value
pub fn load_store_dump<P: AsRef<Path>>(path: P, user_id: &str) -> Result<WalletSnapshot> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read store dump: {}", path.display()))?;
    let entries: BTreeMap<String, String> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse store dump JSON in {}", path.display()))?;

    info!(path = %path.display(), entries = entries.len(), "loaded store dump");
    snapshot_from_entries(entries.iter().map(|(k, v)| (k.as_str(), v.as_str())), user_id)
}

// ============================================================================
// TESTS
// ============================================================================
