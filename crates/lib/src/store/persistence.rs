//! Persistence operations for the in-memory store
//!
//! Scopes are written as one JSON document keyed by scope. Every scope is
//! revalidated through [`Snapshot::new`] on load.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use super::{InMemoryStore, ScopeState, ScopeVersion};
use crate::Result;
use crate::engine::Engine;
use crate::id::ScopeKey;
use crate::snapshot::{Sibling, Snapshot};

/// The current persistence file format version.
/// v0 indicates this is an unstable format subject to breaking changes.
const PERSISTENCE_VERSION: u8 = 0;

/// Helper to check if version is default (0) for serde skip_serializing_if
fn is_v0(v: &u8) -> bool {
    *v == 0
}

/// Validates the persistence version during deserialization.
fn validate_persistence_version<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let version = u8::deserialize(deserializer)?;
    if version != PERSISTENCE_VERSION {
        return Err(serde::de::Error::custom(format!(
            "unsupported persistence version {version}; expected {PERSISTENCE_VERSION}"
        )));
    }
    Ok(version)
}

#[derive(Serialize, Deserialize)]
struct PersistedScope {
    version: ScopeVersion,
    #[serde(default)]
    siblings: Vec<Sibling>,
}

/// Serializable form of the store
#[derive(Serialize, Deserialize)]
struct SerializableStore {
    /// File format version for compatibility checking
    #[serde(
        rename = "_v",
        default,
        skip_serializing_if = "is_v0",
        deserialize_with = "validate_persistence_version"
    )]
    version: u8,
    /// Sorted so saved files diff cleanly.
    #[serde(default)]
    scopes: BTreeMap<ScopeKey, PersistedScope>,
}

/// Saves every scope to `path` as pretty-printed JSON.
pub(crate) fn save_to_file<P: AsRef<Path>>(store: &InMemoryStore, path: P) -> Result<()> {
    let scopes = store
        .read()
        .iter()
        .map(|(key, state)| {
            (
                key.clone(),
                PersistedScope {
                    version: state.version,
                    siblings: state.snapshot.siblings().to_vec(),
                },
            )
        })
        .collect();

    let serializable = SerializableStore {
        version: PERSISTENCE_VERSION,
        scopes,
    };
    let json = serde_json::to_string_pretty(&serializable)?;
    std::fs::write(path.as_ref(), json)?;
    tracing::debug!(
        path = %path.as_ref().display(),
        scopes = serializable.scopes.len(),
        "Saved store"
    );
    Ok(())
}

/// Loads a store from `path`.
///
/// If the file does not exist, a new, empty store is returned.
pub(crate) fn load_from_file<P: AsRef<Path>>(path: P, engine: Engine) -> Result<InMemoryStore> {
    let json = match std::fs::read_to_string(path.as_ref()) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.as_ref().display(), "No saved store, starting empty");
            return Ok(InMemoryStore::new(engine));
        }
        Err(e) => return Err(e.into()),
    };
    let serializable: SerializableStore = serde_json::from_str(&json)?;

    let mut scopes = HashMap::with_capacity(serializable.scopes.len());
    for (key, persisted) in serializable.scopes {
        let snapshot = Snapshot::new(key.clone(), persisted.siblings)?;
        scopes.insert(
            key,
            ScopeState {
                version: persisted.version,
                snapshot,
            },
        );
    }

    let store = InMemoryStore::new(engine);
    *store.write() = scopes;
    Ok(store)
}
