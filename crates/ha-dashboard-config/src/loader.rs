//! Dashboard config file loading
//!
//! Config files are YAML (JSON parses as YAML too). Large dashboards split
//! per-area options into separate files with `!include path`, resolved
//! relative to the including file.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::{debug, trace};

use crate::dashboard_config::DashboardConfig;
use crate::error::{ConfigError, ConfigResult};

/// Loads YAML documents and expands `!include` tags
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Files currently being loaded, to detect include cycles
    include_stack: HashSet<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a YAML file with includes expanded
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> ConfigResult<Value> {
        let path = path.as_ref().to_path_buf();
        debug!("Loading dashboard config file: {:?}", path);

        if self.include_stack.contains(&path) {
            return Err(ConfigError::CircularInclude { path });
        }

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::ReadFile {
            path: path.clone(),
            source: e,
        })?;

        self.include_stack.insert(path.clone());
        let result = self.load_string(&content, &path);
        self.include_stack.remove(&path);

        result
    }

    /// Parse YAML text; includes resolve against `source_path`'s directory
    pub fn load_string(&mut self, content: &str, source_path: &Path) -> ConfigResult<Value> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseYaml {
            path: source_path.to_path_buf(),
            source: e,
        })?;

        self.expand(value, source_path)
    }

    fn expand(&mut self, value: Value, source_path: &Path) -> ConfigResult<Value> {
        match value {
            Value::Tagged(tagged) if tagged.tag == "!include" => {
                let include_path = include_target(&tagged.value, source_path)?;
                trace!("Including file: {:?}", include_path);
                self.load_file(include_path)
            }
            Value::Tagged(tagged) => {
                // Unknown tag: keep it, expand inside
                let inner = self.expand(tagged.value, source_path)?;
                Ok(Value::Tagged(Box::new(serde_yaml::value::TaggedValue {
                    tag: tagged.tag,
                    value: inner,
                })))
            }
            Value::Mapping(map) => {
                let mut expanded = serde_yaml::Mapping::with_capacity(map.len());
                for (k, v) in map {
                    expanded.insert(k, self.expand(v, source_path)?);
                }
                Ok(Value::Mapping(expanded))
            }
            Value::Sequence(seq) => seq
                .into_iter()
                .map(|v| self.expand(v, source_path))
                .collect::<ConfigResult<Vec<_>>>()
                .map(Value::Sequence),
            other => Ok(other),
        }
    }
}

fn include_target(value: &Value, source_path: &Path) -> ConfigResult<PathBuf> {
    let Value::String(raw) = value else {
        return Err(ConfigError::InvalidIncludePath {
            path: format!("{value:?}"),
            reason: "path must be a string".to_string(),
        });
    };
    if raw.trim().is_empty() {
        return Err(ConfigError::InvalidIncludePath {
            path: raw.clone(),
            reason: "path is empty".to_string(),
        });
    }

    let target = Path::new(raw);
    if target.is_absolute() {
        return Ok(target.to_path_buf());
    }
    Ok(source_path
        .parent()
        .map_or_else(|| target.to_path_buf(), |dir| dir.join(target)))
}

/// Load, parse and sanitize a dashboard config file
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<DashboardConfig> {
    let path = path.as_ref();
    let value = ConfigLoader::new().load_file(path)?;

    // An empty file means all defaults
    let value = match value {
        Value::Null => Value::Mapping(serde_yaml::Mapping::new()),
        other => other,
    };

    let mut config: DashboardConfig =
        serde_yaml::from_value(value).map_err(|e| ConfigError::ParseYaml {
            path: path.to_path_buf(),
            source: e,
        })?;
    config.sanitize();

    debug!(
        path = %path.display(),
        areas = config.areas_options.len(),
        "Loaded dashboard config"
    );
    Ok(config)
}
