use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{NavError, Result};

/// Name of the configuration file stored inside the `.navgraph` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory used to store navgraph settings.
pub const NAVGRAPH_DIR: &str = ".navgraph";

/// Bounds applied by every traversal.
///
/// These are tunables, not correctness guarantees: a deep hierarchy can hide
/// polymorphic callers beyond `max_ancestor_methods`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalLimits {
    /// Maximum number of supertype levels followed during ascent.
    pub max_type_depth: usize,
    /// Maximum number of subtypes listed on a hierarchy root.
    pub max_subtypes: usize,
    /// Hard recursion ceiling for call hierarchies, regardless of requested depth.
    pub max_call_depth: usize,
    /// Maximum number of callers or callees expanded per level.
    pub max_callers_per_level: usize,
    /// Maximum number of overridden ancestor methods searched for callers.
    pub max_ancestor_methods: usize,
    /// Maximum number of results from an implementations query.
    pub max_implementations: usize,
    /// Call depth used when a request does not name one.
    pub default_call_depth: usize,
    /// Result limit used when a search request does not name one.
    pub default_search_limit: usize,
}

impl Default for TraversalLimits {
    fn default() -> Self {
        Self {
            max_type_depth: 50,
            max_subtypes: 100,
            max_call_depth: 50,
            max_callers_per_level: 20,
            max_ancestor_methods: 10,
            max_implementations: 100,
            default_call_depth: 3,
            default_search_limit: 50,
        }
    }
}

/// Configuration for a navgraph session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Traversal bounds.
    #[serde(default)]
    pub limits: TraversalLimits,
    /// Dialect -> base language used as a dispatch fallback.
    #[serde(default = "default_families")]
    pub language_families: BTreeMap<String, String>,
    /// Languages whose backends must report themselves unavailable.
    #[serde(default)]
    pub disabled_languages: Vec<String>,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            version: 1,
            limits: TraversalLimits::default(),
            language_families: default_families(),
            disabled_languages: Vec::new(),
        }
    }
}

fn default_families() -> BTreeMap<String, String> {
    [
        ("kotlin", "java"),
        ("groovy", "java"),
        ("jsp", "java"),
        ("typescriptreact", "typescript"),
        ("javascriptreact", "javascript"),
        ("javascript", "typescript"),
        ("cython", "python"),
        ("gotemplate", "go"),
    ]
    .into_iter()
    .map(|(dialect, base)| (dialect.to_string(), base.to_string()))
    .collect()
}

impl NavConfig {
    /// Returns the declared base language of `language`, if any.
    pub fn family_of(&self, language: &str) -> Option<&str> {
        self.language_families.get(language).map(String::as_str)
    }

    /// Returns `true` if `language` was switched off in configuration.
    pub fn is_disabled(&self, language: &str) -> bool {
        self.disabled_languages.iter().any(|l| l == language)
    }
}

/// Upper bound on dialect -> base hops, guards against cyclic family tables.
pub const MAX_FAMILY_HOPS: usize = 8;

/// Base languages of `language` in `families`, nearest first.
///
/// Stops at the first repeated language or after [`MAX_FAMILY_HOPS`] hops.
pub fn family_chain<'a>(families: &'a BTreeMap<String, String>, language: &str) -> Vec<&'a str> {
    let mut chain: Vec<&'a str> = Vec::new();
    let mut next = families.get(language);
    while let Some(base) = next {
        let base = base.as_str();
        if chain.len() >= MAX_FAMILY_HOPS || base == language || chain.contains(&base) {
            break;
        }
        chain.push(base);
        next = families.get(base);
    }
    chain
}

/// Returns the path to the `.navgraph` directory within the given project root.
pub fn get_navgraph_dir(project_root: &Path) -> PathBuf {
    project_root.join(NAVGRAPH_DIR)
}

/// Returns the path to the configuration file within the `.navgraph` directory.
pub fn get_config_path(project_root: &Path) -> PathBuf {
    get_navgraph_dir(project_root).join(CONFIG_FILENAME)
}

/// Loads the configuration from disk.
///
/// If the configuration file does not exist, returns the default configuration.
pub fn load_config(project_root: &Path) -> Result<NavConfig> {
    let config_path = get_config_path(project_root);

    if !config_path.exists() {
        return Ok(NavConfig::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| NavError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    let config: NavConfig = serde_json::from_str(&contents).map_err(|e| NavError::Config {
        message: format!(
            "failed to parse config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    Ok(config)
}

/// Saves the configuration to disk.
///
/// Writes to a temporary file first and then renames it into place.
pub fn save_config(project_root: &Path, config: &NavConfig) -> Result<()> {
    let navgraph_dir = get_navgraph_dir(project_root);
    fs::create_dir_all(&navgraph_dir).map_err(|e| NavError::Config {
        message: format!(
            "failed to create navgraph directory '{}': {}",
            navgraph_dir.display(),
            e
        ),
    })?;

    let config_path = get_config_path(project_root);
    let tmp_path = config_path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config).map_err(|e| NavError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| NavError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, &config_path).map_err(|e| NavError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}
