//! Loading and saving the store behind every command.

use positionable::{Engine, EngineConfig, InMemoryStore};

use crate::cli::StateArgs;

/// Opens the store described by `args`, creating an empty one if the state
/// file does not exist yet.
pub fn open_store(args: &StateArgs) -> positionable::Result<InMemoryStore> {
    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let engine = Engine::new(config)?;
    let store = InMemoryStore::load_from_file(&args.state, engine)?;
    tracing::debug!(path = %args.state.display(), scopes = store.scopes().len(), "Opened state");
    Ok(store)
}

/// Writes the store back to the state file.
pub fn save_store(args: &StateArgs, store: &InMemoryStore) -> positionable::Result<()> {
    store.save_to_file(&args.state)?;
    tracing::debug!(path = %args.state.display(), "Saved state");
    Ok(())
}
