//! Command execution logic.
//!
//! Each command returns the JSON document it reports; [`super::Cli::execute`]
//! prints it.

use anyhow::{Context as _, Result};
use serde::Serialize;
use serde_json::{Value, json};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::args::{
    CyclesArgs, ImpactArgs, ImportArgs, PathArgs, QueryArgs, StatsArgs, TagArgs, TraverseArgs,
    fact_kinds, relation_kinds,
};
use crate::config::FactgraphConfig;
use crate::cycles::CycleDetector;
use crate::graph::{ImpactOptions, TraversalOptions};
use crate::store::{FactStore, QueryOptions};

/// Resolved configuration and data file for one invocation.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded (or default) configuration
    pub config: FactgraphConfig,
    /// Fact file to operate on
    pub data_file: PathBuf,
}

impl Context {
    /// Load the config file and pick the data file.
    ///
    /// `data_file` overrides the config's `data_file`.
    ///
    /// # Errors
    ///
    /// Fails if the config file exists but cannot be read or parsed.
    pub async fn load(config_path: Option<&Path>, data_file: Option<&Path>) -> Result<Self> {
        let config_path = config_path.map_or_else(FactgraphConfig::default_path, Path::to_path_buf);
        let config = FactgraphConfig::load_or_default(&config_path).await?;
        let data_file = data_file.map_or_else(|| config.data_file.clone(), Path::to_path_buf);
        tracing::debug!(config = %config_path.display(), data = %data_file.display(), "Resolved context");
        Ok(Self { config, data_file })
    }

    async fn open_store(&self) -> Result<FactStore> {
        FactStore::open(&self.data_file)
            .await
            .with_context(|| format!("Failed to load facts from {}", self.data_file.display()))
    }

    async fn open_store_or_empty(&self) -> Result<FactStore> {
        if tokio::fs::try_exists(&self.data_file).await? {
            self.open_store().await
        } else {
            Ok(FactStore::new())
        }
    }

    async fn save_store(&self, store: &FactStore) -> Result<()> {
        if let Some(dir) = self.data_file.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        store
            .save_to_path(&self.data_file)
            .await
            .with_context(|| format!("Failed to save facts to {}", self.data_file.display()))
    }
}

/// Pretty-print a JSON document to stdout.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized or stdout cannot be
/// written.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(handle, "{json}")
}

/// Execute the stats command
pub async fn execute_stats(ctx: &Context, _args: &StatsArgs) -> Result<Value> {
    let store = ctx.open_store().await?;
    let graph = store.rebuild_graph().await;

    let kinds: serde_json::Map<String, Value> = store
        .kind_counts()
        .await
        .into_iter()
        .map(|(kind, count)| (kind.to_string(), json!(count)))
        .collect();

    Ok(json!({
        "data_file": ctx.data_file.display().to_string(),
        "facts": store.count().await,
        "kinds": kinds,
        "repos": store.repos().await,
        "files": store.files().await.len(),
        "graph": {
            "nodes": graph.node_count(),
            "edges": graph.edge_count(),
            "synthetic_edges": graph.synthetic_edge_count(),
        },
    }))
}

/// Execute the query command
pub async fn execute_query(ctx: &Context, args: &QueryArgs) -> Result<Value> {
    let store = ctx.open_store().await?;
    let page = store.query_advanced(&QueryOptions::from(args)).await;
    Ok(json!({
        "total": page.total,
        "offset": page.offset,
        "limit": page.limit,
        "has_more": page.has_more(),
        "facts": page.facts,
    }))
}

/// Execute the traverse command
pub async fn execute_traverse(ctx: &Context, args: &TraverseArgs) -> Result<Value> {
    let limits = ctx.config.limits.traverse;
    let options = TraversalOptions {
        direction: args.direction.into(),
        relation_kinds: relation_kinds(&args.relations),
        node_kinds: fact_kinds(&args.node_kinds),
        max_depth: args.max_depth.unwrap_or(limits.max_depth),
        max_nodes: args.max_nodes.unwrap_or(limits.max_nodes),
    };

    let graph = ctx.open_store().await?.rebuild_graph().await;
    Ok(serde_json::to_value(graph.traverse(&args.start, &options))?)
}

/// Execute the path command
pub async fn execute_path(ctx: &Context, args: &PathArgs) -> Result<Value> {
    let max_depth = args.max_depth.unwrap_or(ctx.config.limits.path.max_depth);
    let graph = ctx.open_store().await?.rebuild_graph().await;
    let result = graph.find_path(&args.from, &args.to, &relation_kinds(&args.relations), max_depth);
    Ok(serde_json::to_value(result)?)
}

/// Execute the impact command
pub async fn execute_impact(ctx: &Context, args: &ImpactArgs) -> Result<Value> {
    let limits = ctx.config.limits.impact;
    let options = ImpactOptions {
        max_depth: args.max_depth.unwrap_or(limits.max_depth),
        max_nodes: args.max_nodes.unwrap_or(limits.max_nodes),
        include_forward: args.forward,
    };

    let graph = ctx.open_store().await?.rebuild_graph().await;
    Ok(serde_json::to_value(graph.impact(&args.target, &options))?)
}

/// Execute the cycles command
pub async fn execute_cycles(ctx: &Context, _args: &CyclesArgs) -> Result<Value> {
    let facts = ctx.open_store().await?.snapshot().await;
    let findings = CycleDetector::new().detect(&facts);
    Ok(json!({
        "count": findings.len(),
        "cycles": findings,
    }))
}

/// Execute the import command
pub async fn execute_import(ctx: &Context, args: &ImportArgs) -> Result<Value> {
    let store = ctx.open_store_or_empty().await?;
    let added = store
        .load_from_path(&args.file)
        .await
        .with_context(|| format!("Failed to import {}", args.file.display()))?;

    let tagged = match (&args.repo, &args.prefix) {
        (Some(repo), Some(prefix)) => store.tag_range(added.start, repo, prefix).await,
        (Some(repo), None) => store.set_repo_range(added.start, repo).await,
        (None, _) => 0,
    };

    ctx.save_store(&store).await?;
    tracing::info!(imported = added.len(), tagged, "Imported facts");
    Ok(json!({
        "imported": added.len(),
        "tagged": tagged,
        "total": store.count().await,
    }))
}

/// Execute the tag command
pub async fn execute_tag(ctx: &Context, args: &TagArgs) -> Result<Value> {
    let store = ctx.open_store().await?;
    let renamed = store.tag_untagged(&args.repo, &args.prefix).await;
    ctx.save_store(&store).await?;
    tracing::info!(repo = %args.repo, renamed, "Tagged untagged facts");
    Ok(json!({
        "repo": args.repo,
        "renamed": renamed,
        "total": store.count().await,
    }))
}
