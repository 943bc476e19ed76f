//! CLI argument structs for all commands.
//!
//! Ceiling flags are optional; when absent the value from the config file's
//! `limits` section is used.

use clap::Parser;
use std::path::PathBuf;

use super::types::DirectionArg;
use crate::model::{FactKind, RelationKind};
use crate::store::QueryOptions;

/// Arguments for the `stats` command
#[derive(Parser, Debug, Clone, Default)]
pub struct StatsArgs {}

/// Arguments for the `query` command
#[derive(Parser, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Fact kinds to include (comma-separated)
    #[arg(short, long = "kind", value_delimiter = ',')]
    pub kinds: Vec<String>,

    /// Exact file paths to include (comma-separated)
    #[arg(short, long = "file", value_delimiter = ',')]
    pub files: Vec<String>,

    /// File path prefix
    #[arg(long)]
    pub file_prefix: Option<String>,

    /// Substring of the fact name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Exact fact names (comma-separated)
    #[arg(long = "exact-name", value_delimiter = ',')]
    pub names: Vec<String>,

    /// Repository label
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Require at least one relation of this kind
    #[arg(long)]
    pub relation: Option<String>,

    /// Property that must be present
    #[arg(long)]
    pub prop: Option<String>,

    /// Required value of `--prop`, compared as text
    #[arg(long, requires = "prop")]
    pub value: Option<String>,

    /// Matches to skip
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Page size (default 100, max 500)
    #[arg(short, long, default_value_t = 0)]
    pub limit: usize,
}

impl From<&QueryArgs> for QueryOptions {
    fn from(args: &QueryArgs) -> Self {
        Self {
            kinds: fact_kinds(&args.kinds),
            files: args.files.clone(),
            file_prefix: args.file_prefix.clone(),
            name: args.name.clone(),
            names: args.names.clone(),
            repo: args.repo.clone(),
            rel_kind: args.relation.as_deref().map(RelationKind::from),
            prop_key: args.prop.clone(),
            prop_value: args.value.clone(),
            offset: args.offset,
            limit: args.limit,
            ..Self::default()
        }
    }
}

/// Arguments for the `traverse` command
#[derive(Parser, Debug, Clone)]
pub struct TraverseArgs {
    /// Node to start from
    pub start: String,

    /// Direction to walk
    #[arg(short, long, value_enum, default_value_t = DirectionArg::Forward)]
    pub direction: DirectionArg,

    /// Only follow these relation kinds (comma-separated)
    #[arg(long = "relation", value_delimiter = ',')]
    pub relations: Vec<String>,

    /// Only report nodes of these kinds (comma-separated)
    #[arg(long = "node-kind", value_delimiter = ',')]
    pub node_kinds: Vec<String>,

    /// Depth ceiling
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Node ceiling
    #[arg(long)]
    pub max_nodes: Option<usize>,
}

/// Arguments for the `path` command
#[derive(Parser, Debug, Clone)]
pub struct PathArgs {
    /// Source node
    pub from: String,

    /// Destination node
    pub to: String,

    /// Only follow these relation kinds (comma-separated)
    #[arg(long = "relation", value_delimiter = ',')]
    pub relations: Vec<String>,

    /// Depth ceiling
    #[arg(long)]
    pub max_depth: Option<usize>,
}

/// Arguments for the `impact` command
#[derive(Parser, Debug, Clone)]
pub struct ImpactArgs {
    /// Node to analyse
    pub target: String,

    /// Depth ceiling
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Node ceiling
    #[arg(long)]
    pub max_nodes: Option<usize>,

    /// Also report what the target depends on
    #[arg(long)]
    pub forward: bool,
}

/// Arguments for the `cycles` command
#[derive(Parser, Debug, Clone, Default)]
pub struct CyclesArgs {}

/// Arguments for the `import` command
#[derive(Parser, Debug, Clone)]
pub struct ImportArgs {
    /// Fact file to append to the data file
    pub file: PathBuf,

    /// Label the imported facts with this repository
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Prefix the imported facts' file paths (requires --repo)
    #[arg(short, long, requires = "repo")]
    pub prefix: Option<String>,
}

/// Arguments for the `tag` command
#[derive(Parser, Debug, Clone)]
pub struct TagArgs {
    /// Repository label for unlabelled facts
    #[arg(short, long)]
    pub repo: String,

    /// Prefix for their file paths
    #[arg(short, long, default_value = "")]
    pub prefix: String,
}

/// Parse comma-separated relation kinds.
pub(crate) fn relation_kinds(raw: &[String]) -> Vec<RelationKind> {
    raw.iter().map(|r| RelationKind::from(r.as_str())).collect()
}

/// Parse comma-separated fact kinds.
pub(crate) fn fact_kinds(raw: &[String]) -> Vec<FactKind> {
    raw.iter().map(|k| FactKind::from(k.as_str())).collect()
}
