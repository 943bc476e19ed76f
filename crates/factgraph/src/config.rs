//! Configuration for the `factgraph` command.
//!
//! Stored as YAML, by default at `.factgraph/config.yaml`:
//!
//! ```yaml
//! data_file: .factgraph/facts.jsonl
//! limits:
//!   traverse:
//!     max_depth: 5
//!     max_nodes: 100
//!   path:
//!     max_depth: 10
//!   impact:
//!     max_depth: 3
//!     max_nodes: 200
//! ```
//!
//! Every field is optional. A ceiling of 0 defers to the library default,
//! and values above the library maximum are clamped when used.

use crate::error::{Error, Result};
use crate::graph::{
    DEFAULT_IMPACT_DEPTH, DEFAULT_IMPACT_NODES, DEFAULT_PATH_DEPTH, DEFAULT_TRAVERSE_DEPTH,
    DEFAULT_TRAVERSE_NODES,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Directory holding factgraph state.
pub const FACTGRAPH_DIR_NAME: &str = ".factgraph";

/// Config file name inside [`FACTGRAPH_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Fact file name inside [`FACTGRAPH_DIR_NAME`].
pub const FACTS_FILE_NAME: &str = "facts.jsonl";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FactgraphConfig {
    /// Fact file the commands read and write
    pub data_file: PathBuf,

    /// Default ceilings for graph commands
    pub limits: Limits,
}

/// Ceilings used when a command-line flag is not given.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Limits {
    /// `traverse` ceilings
    pub traverse: Ceilings,
    /// `path` ceilings (`max_nodes` is unused)
    pub path: Ceilings,
    /// `impact` ceilings
    pub impact: Ceilings,
}

/// A depth and node ceiling pair.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Ceilings {
    /// Depth ceiling; 0 means the library default
    pub max_depth: usize,
    /// Node ceiling; 0 means the library default
    pub max_nodes: usize,
}

impl Default for FactgraphConfig {
    fn default() -> Self {
        Self {
            data_file: Path::new(FACTGRAPH_DIR_NAME).join(FACTS_FILE_NAME),
            limits: Limits {
                traverse: Ceilings {
                    max_depth: DEFAULT_TRAVERSE_DEPTH,
                    max_nodes: DEFAULT_TRAVERSE_NODES,
                },
                path: Ceilings {
                    max_depth: DEFAULT_PATH_DEPTH,
                    max_nodes: 0,
                },
                impact: Ceilings {
                    max_depth: DEFAULT_IMPACT_DEPTH,
                    max_nodes: DEFAULT_IMPACT_NODES,
                },
            },
        }
    }
}

impl FactgraphConfig {
    /// Default config file location, relative to the working directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        Path::new(FACTGRAPH_DIR_NAME).join(CONFIG_FILE_NAME)
    }

    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
    /// if it is not valid YAML for this structure.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await.map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Load configuration, falling back to defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// As [`load`](Self::load), except that a missing file is not an error.
    pub async fn load_or_default(path: &Path) -> Result<Self> {
        match fs::try_exists(path).await {
            Ok(true) => Self::load(path).await,
            Ok(false) => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(Error::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Save configuration to a YAML file, creating its directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if serialization fails and [`Error::Io`] if
    /// the file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await.map_err(|source| Error::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).await.map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
