//! CLI argument parsing and command dispatch.
//!
//! Every command prints one pretty-printed JSON document on stdout. Logs go
//! to stderr.
//!
//! # Commands
//!
//! - `stats`: Fact counts per kind, repositories, and graph size
//! - `query`: Paginated multi-criteria fact query
//! - `traverse`: Breadth-first walk from a node
//! - `path`: Shortest forward path between two nodes
//! - `impact`: What transitively depends on a node
//! - `cycles`: Import cycles among modules
//! - `import`: Append another fact file, optionally labelling it
//! - `tag`: Label unlabelled facts with a repository
//!
//! # Global Flags
//!
//! - `--config`: Config file (default `.factgraph/config.yaml`)
//! - `--data`: Fact file, overriding the config's `data_file`
//!
//! # Example
//!
//! ```bash
//! factgraph query --kind module,symbol --file-prefix internal/
//! factgraph traverse internal/api --direction reverse --max-depth 3
//! factgraph import ../web/facts.jsonl --repo web --prefix web/
//! ```

mod args;
mod execute;
mod types;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{
    CyclesArgs, ImpactArgs, ImportArgs, PathArgs, QueryArgs, StatsArgs, TagArgs, TraverseArgs,
};
pub use execute::{Context, print_json};
pub use types::DirectionArg;

/// Factgraph - query an architectural fact graph
///
/// Facts are read from a JSONL file, one fact per line, as written by an
/// extractor. Results are printed as JSON.
#[derive(Parser, Debug)]
#[command(name = "factgraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Fact file (overrides the config)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show fact and graph statistics
    Stats(StatsArgs),

    /// Query facts
    ///
    /// Values within one flag OR together; different flags AND together.
    Query(QueryArgs),

    /// Walk the graph from a node
    ///
    /// Forward follows relations to their targets; reverse finds what
    /// declares relations to the node.
    Traverse(TraverseArgs),

    /// Find the shortest path between two nodes
    Path(PathArgs),

    /// Show what depends on a node, grouped by distance
    Impact(ImpactArgs),

    /// Detect import cycles among modules
    Cycles(CyclesArgs),

    /// Append facts from another file
    ///
    /// With `--repo`, the imported facts are labelled; with `--prefix` as
    /// well, their file paths are prefixed so two repositories can share
    /// one fact file.
    Import(ImportArgs),

    /// Label facts that have no repository
    ///
    /// Facts already labelled with another repository are left alone.
    /// Running it twice changes nothing the second time.
    Tag(TagArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    #[must_use]
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Run the command and return its JSON report without printing it.
    ///
    /// # Errors
    ///
    /// Fails if the config or fact file cannot be loaded or saved.
    pub async fn run(&self) -> Result<serde_json::Value> {
        let ctx = Context::load(self.config.as_deref(), self.data.as_deref()).await?;
        match &self.command {
            Commands::Stats(args) => execute::execute_stats(&ctx, args).await,
            Commands::Query(args) => execute::execute_query(&ctx, args).await,
            Commands::Traverse(args) => execute::execute_traverse(&ctx, args).await,
            Commands::Path(args) => execute::execute_path(&ctx, args).await,
            Commands::Impact(args) => execute::execute_impact(&ctx, args).await,
            Commands::Cycles(args) => execute::execute_cycles(&ctx, args).await,
            Commands::Import(args) => execute::execute_import(&ctx, args).await,
            Commands::Tag(args) => execute::execute_tag(&ctx, args).await,
        }
    }

    /// Execute the CLI command and print its report
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn execute(&self) -> Result<()> {
        let report = self.run().await?;
        print_json(&report)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== CLI Parsing Tests ==========

    #[test]
    fn test_parse_requires_command() {
        assert!(Cli::try_parse_from(["factgraph"]).is_err());
    }

    #[test]
    fn test_parse_global_flags_after_command() {
        let cli =
            Cli::try_parse_from(["factgraph", "stats", "--data", "facts.jsonl"]).unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("facts.jsonl")));
        assert!(cli.config.is_none());
        assert!(matches!(cli.command, Commands::Stats(_)));
    }

    #[test]
    fn test_parse_query_lists() {
        let cli = Cli::try_parse_from([
            "factgraph",
            "query",
            "--kind",
            "symbol,module",
            "--exact-name",
            "a,b",
            "--limit",
            "10",
        ])
        .unwrap();
        match cli.command {
            Commands::Query(args) => {
                assert_eq!(args.kinds, ["symbol", "module"]);
                assert_eq!(args.names, ["a", "b"]);
                assert_eq!(args.limit, 10);
                assert_eq!(args.offset, 0);
            }
            _ => panic!("Expected Query command"),
        }
    }

    #[test]
    fn test_parse_query_value_requires_prop() {
        assert!(Cli::try_parse_from(["factgraph", "query", "--value", "x"]).is_err());
    }

    #[test]
    fn test_parse_traverse_defaults() {
        let cli = Cli::try_parse_from(["factgraph", "traverse", "internal/api"]).unwrap();
        match cli.command {
            Commands::Traverse(args) => {
                assert_eq!(args.start, "internal/api");
                assert_eq!(args.direction, DirectionArg::Forward);
                assert!(args.max_depth.is_none());
                assert!(args.relations.is_empty());
            }
            _ => panic!("Expected Traverse command"),
        }
    }

    #[test]
    fn test_parse_traverse_reverse_with_filters() {
        let cli = Cli::try_parse_from([
            "factgraph",
            "traverse",
            "store",
            "-d",
            "reverse",
            "--relation",
            "imports,calls",
            "--max-nodes",
            "20",
        ])
        .unwrap();
        match cli.command {
            Commands::Traverse(args) => {
                assert_eq!(args.direction, DirectionArg::Reverse);
                assert_eq!(args.relations.len(), 2);
                assert_eq!(args.max_nodes, Some(20));
            }
            _ => panic!("Expected Traverse command"),
        }
    }

    #[test]
    fn test_parse_path() {
        let cli = Cli::try_parse_from(["factgraph", "path", "a", "c", "--max-depth", "4"]).unwrap();
        match cli.command {
            Commands::Path(args) => {
                assert_eq!((args.from.as_str(), args.to.as_str()), ("a", "c"));
                assert_eq!(args.max_depth, Some(4));
            }
            _ => panic!("Expected Path command"),
        }
    }

    #[test]
    fn test_parse_impact_forward() {
        let cli = Cli::try_parse_from(["factgraph", "impact", "users", "--forward"]).unwrap();
        assert!(matches!(cli.command, Commands::Impact(ImpactArgs { forward: true, .. })));
    }

    #[test]
    fn test_parse_import_prefix_requires_repo() {
        assert!(
            Cli::try_parse_from(["factgraph", "import", "web.jsonl", "--prefix", "web/"]).is_err()
        );
        assert!(
            Cli::try_parse_from([
                "factgraph",
                "import",
                "web.jsonl",
                "--repo",
                "web",
                "--prefix",
                "web/"
            ])
            .is_ok()
        );
    }

    #[test]
    fn test_parse_tag_default_prefix() {
        let cli = Cli::try_parse_from(["factgraph", "tag", "--repo", "backend"]).unwrap();
        match cli.command {
            Commands::Tag(args) => {
                assert_eq!(args.repo, "backend");
                assert_eq!(args.prefix, "");
            }
            _ => panic!("Expected Tag command"),
        }
    }
}
