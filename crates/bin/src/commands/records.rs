//! Record commands - insert, move and remove.

use positionable::{RecordId, ScopeKey};

use crate::cli::{InsertArgs, MoveArgs, RemoveArgs, StateArgs};
use crate::output::{OutputFormat, print_assignment, print_json};
use crate::state::{open_store, save_store};

/// Run the insert command
pub fn insert(
    state: &StateArgs,
    args: &InsertArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(state)?;
    let scope = ScopeKey::from(args.scope.as_str());
    let id = args.record_id();

    let assignment = store.insert(&scope, &id, &args.target.hint())?;
    save_store(state, &store)?;
    tracing::info!(scope = %scope, id = %id, position = %assignment.position, "Inserted record");

    match format {
        OutputFormat::Human => print_assignment(id.as_str(), &assignment),
        OutputFormat::Json => print_json(&serde_json::json!({
            "scope": scope,
            "id": id,
            "position": assignment.position,
            "repositions": assignment.repositions,
        }))?,
    }
    Ok(())
}

/// Run the move command
pub fn move_record(
    state: &StateArgs,
    args: &MoveArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(state)?;
    let scope = ScopeKey::from(args.scope.as_str());
    let id = RecordId::from(args.id.as_str());

    let assignment = store.move_record(&scope, &id, &args.target.hint())?;
    save_store(state, &store)?;
    tracing::info!(scope = %scope, id = %id, position = %assignment.position, "Moved record");

    match format {
        OutputFormat::Human => print_assignment(id.as_str(), &assignment),
        OutputFormat::Json => print_json(&serde_json::json!({
            "scope": scope,
            "id": id,
            "position": assignment.position,
            "repositions": assignment.repositions,
        }))?,
    }
    Ok(())
}

/// Run the remove command
pub fn remove(
    state: &StateArgs,
    args: &RemoveArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(state)?;
    let scope = ScopeKey::from(args.scope.as_str());
    let id = RecordId::from(args.id.as_str());

    let version = store.remove(&scope, &id)?;
    save_store(state, &store)?;

    match format {
        OutputFormat::Human => println!("Removed {id} from {scope}"),
        OutputFormat::Json => print_json(&serde_json::json!({
            "scope": scope,
            "id": id,
            "version": version,
        }))?,
    }
    Ok(())
}
