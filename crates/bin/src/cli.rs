//! CLI argument definitions for the Positionable binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use positionable::{Position, RecordId, ScopeKey, TargetHint};

use crate::output::OutputFormat;

/// Output format flag
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    /// Aligned tables and short summaries
    Human,
    /// One JSON document per command
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Human => OutputFormat::Human,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Positionable ordering engine
#[derive(Parser, Debug)]
#[command(name = "positionable")]
#[command(about = "Positionable: integer ordering for sibling scopes")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub state: StateArgs,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "human",
        env = "POSITIONABLE_FORMAT"
    )]
    pub format: Format,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where scopes are loaded from and saved to
#[derive(clap::Args, Debug, Clone)]
pub struct StateArgs {
    /// JSON file holding every scope
    #[arg(
        short = 'S',
        long,
        global = true,
        default_value = "positionable.json",
        env = "POSITIONABLE_STATE"
    )]
    pub state: PathBuf,

    /// JSON engine configuration (gap, min_gap, ceiling, max_window)
    #[arg(short = 'c', long, global = true, env = "POSITIONABLE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Insert a new record into a scope
    Insert(InsertArgs),
    /// Move an existing record within its scope
    Move(MoveArgs),
    /// Remove a record; its siblings keep their positions
    Remove(RemoveArgs),
    /// List scopes, or the records of one scope in order
    List(ListArgs),
    /// Report spacing health for a scope
    Check(ScopeArgs),
    /// Spread every record of a scope evenly
    Renumber(RenumberArgs),
    /// Show where a record would land without writing anything
    Plan(PlanArgs),
}

/// Where a record should land. At most one may be given; defaults to the tail.
#[derive(clap::Args, Debug, Clone)]
#[group(multiple = false)]
pub struct TargetArgs {
    /// Place first in the scope
    #[arg(long)]
    pub head: bool,

    /// Place last in the scope
    #[arg(long)]
    pub tail: bool,

    /// Place directly after this record
    #[arg(long, value_name = "ID")]
    pub after: Option<String>,

    /// Place directly before this record
    #[arg(long, value_name = "ID")]
    pub before: Option<String>,

    /// Request an explicit position
    #[arg(long, value_name = "POSITION")]
    pub at: Option<i64>,
}

impl TargetArgs {
    pub fn hint(&self) -> TargetHint {
        if self.tail {
            TargetHint::Tail
        } else if self.head {
            TargetHint::Head
        } else if let Some(id) = &self.after {
            TargetHint::after(id.as_str())
        } else if let Some(id) = &self.before {
            TargetHint::before(id.as_str())
        } else if let Some(position) = self.at {
            TargetHint::At(Position::new(position))
        } else {
            TargetHint::Tail
        }
    }
}

/// Arguments for the insert command
#[derive(clap::Args, Debug)]
pub struct InsertArgs {
    /// Scope to insert into
    pub scope: String,

    /// Record id; a random UUID is generated when omitted
    #[arg(long)]
    pub id: Option<String>,

    #[command(flatten)]
    pub target: TargetArgs,
}

impl InsertArgs {
    pub fn record_id(&self) -> RecordId {
        self.id
            .as_deref()
            .map_or_else(RecordId::generate, RecordId::from)
    }
}

/// Arguments for the move command
#[derive(clap::Args, Debug)]
pub struct MoveArgs {
    /// Scope containing the record
    pub scope: String,

    /// Record to move
    pub id: String,

    #[command(flatten)]
    pub target: TargetArgs,
}

/// Arguments for the remove command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Scope containing the record
    pub scope: String,

    /// Record to remove
    pub id: String,
}

/// Arguments for the list command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Scope to list; lists scope names when omitted
    pub scope: Option<String>,
}

/// Arguments naming a single scope
#[derive(clap::Args, Debug)]
pub struct ScopeArgs {
    /// Scope to inspect
    pub scope: String,
}

impl ScopeArgs {
    pub fn key(&self) -> ScopeKey {
        ScopeKey::from(self.scope.as_str())
    }
}

/// Arguments for the renumber command
#[derive(clap::Args, Debug)]
pub struct RenumberArgs {
    /// Scope to renumber
    pub scope: String,

    /// Print the repositions without saving them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the plan command
#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    /// Scope to plan in
    pub scope: String,

    /// Plan a move of this existing record instead of an insert
    #[arg(long = "move", value_name = "ID")]
    pub move_id: Option<String>,

    #[command(flatten)]
    pub target: TargetArgs,
}
