//! Scope commands - list, check, renumber and plan.

use positionable::{Placement, RecordId, ScopeKey};

use crate::cli::{ListArgs, PlanArgs, RenumberArgs, ScopeArgs, StateArgs};
use crate::output::{OutputFormat, print_json, print_table, reposition_rows};
use crate::state::{open_store, save_store};

/// Run the list command
pub fn list(
    state: &StateArgs,
    args: &ListArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(state)?;

    let Some(scope) = &args.scope else {
        let scopes = store.scopes();
        match format {
            OutputFormat::Human => {
                if scopes.is_empty() {
                    println!("No scopes found.");
                    return Ok(());
                }
                let rows: Vec<Vec<String>> = scopes
                    .iter()
                    .map(|scope| {
                        let current = store.snapshot(scope);
                        vec![
                            scope.to_string(),
                            current.snapshot.len().to_string(),
                            current.version.to_string(),
                        ]
                    })
                    .collect();
                print_table(&["SCOPE", "RECORDS", "VERSION"], &rows);
            }
            OutputFormat::Json => print_json(&serde_json::json!(scopes))?,
        }
        return Ok(());
    };

    let current = store.snapshot(&ScopeKey::from(scope.as_str()));
    match format {
        OutputFormat::Human => {
            if current.snapshot.is_empty() {
                println!("Scope {scope} is empty.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = current
                .snapshot
                .siblings()
                .iter()
                .enumerate()
                .map(|(rank, s)| vec![rank.to_string(), s.id.to_string(), s.position.to_string()])
                .collect();
            print_table(&["RANK", "ID", "POSITION"], &rows);
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "scope": current.snapshot.scope(),
            "version": current.version,
            "siblings": current.snapshot.siblings(),
        }))?,
    }
    Ok(())
}

/// Run the check command
pub fn check(
    state: &StateArgs,
    args: &ScopeArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(state)?;
    let health = store.health(&args.key());

    match format {
        OutputFormat::Human => {
            let min_gap = health
                .min_gap
                .map_or_else(|| "-".to_string(), |gap| gap.to_string());
            let max_position = health
                .max_position
                .map_or_else(|| "-".to_string(), |p| p.to_string());
            println!("Scope:         {}", health.scope);
            println!("Records:       {}", health.len);
            println!("Min gap:       {min_gap}");
            println!("Max position:  {max_position}");
            println!("Crowded pairs: {}", health.crowded.len());
            println!("Near ceiling:  {}", health.near_ceiling);
            if health.needs_renumber() {
                println!();
                println!("Renumber recommended: positionable renumber {}", health.scope);
            }
        }
        OutputFormat::Json => {
            let mut value = serde_json::to_value(&health)?;
            value["needs_renumber"] = health.needs_renumber().into();
            print_json(&value)?;
        }
    }
    Ok(())
}

/// Run the renumber command
pub fn renumber(
    state: &StateArgs,
    args: &RenumberArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(state)?;
    let scope = ScopeKey::from(args.scope.as_str());

    let repositions = if args.dry_run {
        store.engine().renumber(&store.snapshot(&scope).snapshot)?
    } else {
        let repositions = store.renumber(&scope)?;
        save_store(state, &store)?;
        repositions
    };

    match format {
        OutputFormat::Human => {
            if repositions.is_empty() {
                println!("Scope {scope} is already evenly spaced.");
                return Ok(());
            }
            let verb = if args.dry_run { "Would reposition" } else { "Repositioned" };
            println!("{verb} {} record(s):", repositions.len());
            print_table(&["ID", "POSITION"], &reposition_rows(&repositions));
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "scope": scope,
            "dry_run": args.dry_run,
            "repositions": repositions,
        }))?,
    }
    Ok(())
}

/// Run the plan command
pub fn plan(
    state: &StateArgs,
    args: &PlanArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(state)?;
    let scope = ScopeKey::from(args.scope.as_str());
    let snapshot = store.snapshot(&scope).snapshot;
    let hint = args.target.hint();

    let placement = match &args.move_id {
        Some(id) => store
            .engine()
            .plan_move(&snapshot, &RecordId::from(id.as_str()), &hint)?,
        None => store.engine().plan(&snapshot, &hint)?,
    };

    match format {
        OutputFormat::Human => match &placement {
            Placement::DirectInsert(position) => {
                println!("Direct insert at {position}");
            }
            Placement::Rebalance {
                window,
                position,
                repositions,
            } => {
                let extent = if window.full_scope { "whole scope" } else { "local window" };
                println!(
                    "Rebalance of {} sibling(s) ({extent}, step {}); new record at {position}",
                    window.len(),
                    window.step
                );
                print_table(&["ID", "POSITION"], &reposition_rows(repositions));
            }
        },
        OutputFormat::Json => print_json(&serde_json::json!({
            "scope": scope,
            "rebalance": placement.is_rebalance(),
            "window": placement.window(),
            "position": placement.position(),
            "repositions": placement.repositions(),
        }))?,
    }
    Ok(())
}
