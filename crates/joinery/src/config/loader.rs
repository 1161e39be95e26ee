use std::path::Path;

use serde_json::{json, Value};
use tracing::debug;

use crate::config::schema::{Environment, ResolvedConfig};
use crate::error::ConfigError;

/// Project-level override file, looked up in the package root.
pub const PROJECT_CONFIG_FILE: &str = "joinery.toml";

/// Reads `joinery.toml` from `root`. A missing file is not an error.
pub fn load_project_config<P: AsRef<Path>>(root: P) -> Result<Option<Value>, ConfigError> {
    let path = root.as_ref().join(PROJECT_CONFIG_FILE);
    if !path.is_file() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadFile {
        path: path.clone(),
        source: e,
    })?;

    debug!(path = %path.display(), "Loaded project config");
    load_project_config_from_str(&content).map(Some)
}

pub fn load_project_config_from_str(content: &str) -> Result<Value, ConfigError> {
    let table: toml::Table = toml::from_str(content)?;
    Ok(serde_json::to_value(table)?)
}

/// Resolves defaults, then the environment overlay, then the project layer.
pub fn resolve_config(
    env: Environment,
    project: Option<&Value>,
) -> Result<ResolvedConfig, ConfigError> {
    let mut merged = default_layer();
    merge(&mut merged, &environment_layer(env));

    if let Some(project) = project {
        if !project.is_object() {
            return Err(ConfigError::Validation {
                message: "Project config must be a table".to_string(),
            });
        }
        merge(&mut merged, project);
    }

    validate_layer(&merged)?;

    Ok(serde_json::from_value(merged)?)
}

fn default_layer() -> Value {
    json!({
        "minify": {
            "options": {
                "oxc": { "mangle": true, "compress": true },
                "lightningcss": { "error_recovery": true },
                "minify-html": { "keep_comments": false, "minify_css": true, "minify_js": true }
            }
        },
        "bundler": {
            "mode": "development",
            "devtool": "source-map"
        }
    })
}

fn environment_layer(env: Environment) -> Value {
    match env {
        Environment::Prod => json!({
            "minify": {
                "options": {
                    "lightningcss": { "error_recovery": false }
                }
            },
            "bundler": { "mode": "production" }
        }),
        Environment::Staging => json!({
            "bundler": { "mode": "production" }
        }),
        Environment::Dev | Environment::Test => json!({}),
    }
}

/// Deep merge: objects merge key by key, anything else is replaced by `overlay`.
fn merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

fn validate_layer(merged: &Value) -> Result<(), ConfigError> {
    if let Some(bundler) = merged.get("bundler") {
        if !bundler.is_object() {
            return Err(ConfigError::Validation {
                message: "`bundler` must be a table".to_string(),
            });
        }
    }

    if let Some(options) = merged.get("minify").and_then(|m| m.get("options")) {
        let Some(options) = options.as_object() else {
            return Err(ConfigError::Validation {
                message: "`minify.options` must be a table".to_string(),
            });
        };
        for (worker, value) in options {
            if !value.is_object() {
                return Err(ConfigError::Validation {
                    message: format!("`minify.options.{}` must be a table", worker),
                });
            }
        }
    }

    Ok(())
}
