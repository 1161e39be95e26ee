pub mod loader;
pub mod schema;

pub use loader::{
    load_project_config, load_project_config_from_str, resolve_config, PROJECT_CONFIG_FILE,
};
pub use schema::{BuildOptions, Environment, MinifyConfig, ResolvedConfig};
