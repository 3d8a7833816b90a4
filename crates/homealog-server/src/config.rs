//! Configuration for the Home-Alog server.
//!
//! Loaded from (lowest to highest priority):
//! 1. Defaults
//! 2. Config file (`homealog.toml`, or `<prefix>.toml`)
//! 3. Environment variables (`HOMEALOG__` prefix, `__` separator)
//! 4. Legacy `NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD` variables

use serde::Deserialize;

use homealog_core::HomealogError;
use homealog_graph::GraphConfig;

const ENV_PREFIX: &str = "HOMEALOG";

/// Legacy variable name to config key.
const LEGACY_NEO4J_VARS: [(&str, &str); 3] = [
    ("NEO4J_URI", "neo4j.uri"),
    ("NEO4J_USER", "neo4j.user"),
    ("NEO4J_PASSWORD", "neo4j.password"),
];

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HomealogConfig {
    /// `[neo4j]` connection settings.
    #[serde(default)]
    pub neo4j: GraphConfig,

    /// `[server]` front-end settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Settings for the MCP front end.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Name advertised to MCP clients.
    pub name: String,

    /// Ensure uniqueness constraints exist before serving.
    pub init_constraints: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "home-alog".to_string(),
            init_constraints: true,
        }
    }
}

impl HomealogConfig {
    /// Load configuration from `<file_prefix>.toml` and the process environment.
    pub fn load(file_prefix: &str) -> Result<Self, HomealogError> {
        Self::load_with_env(file_prefix, std::env::vars().collect())
    }

    /// Load configuration from `<file_prefix>.toml` and an explicit variable set.
    pub fn load_with_env(
        file_prefix: &str,
        env: config::Map<String, String>,
    ) -> Result<Self, HomealogError> {
        let legacy: Vec<(&str, Option<String>)> = LEGACY_NEO4J_VARS
            .iter()
            .map(|(var, key)| (*key, env.get(*var).cloned()))
            .collect();

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(env)),
            );
        for (key, value) in legacy {
            builder = builder.set_override_option(key, value).map_err(config_error)?;
        }

        let loaded: Self = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(config_error)?;
        loaded.validate()?;

        tracing::debug!(uri = %loaded.neo4j.uri, user = %loaded.neo4j.user, "Loaded configuration");
        Ok(loaded)
    }

    fn validate(&self) -> Result<(), HomealogError> {
        if self.neo4j.uri.trim().is_empty() {
            return Err(HomealogError::Config("neo4j.uri must not be empty".to_string()));
        }
        if self.neo4j.max_connections == 0 {
            return Err(HomealogError::Config(
                "neo4j.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn config_error(e: config::ConfigError) -> HomealogError {
    HomealogError::Config(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn env(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn prefix(dir: &Path) -> String {
        dir.join("homealog").to_string_lossy().into_owned()
    }

    #[test]
    fn defaults_without_file_or_env() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = HomealogConfig::load_with_env(&prefix(dir.path()), env(&[])).unwrap();

        assert_eq!(cfg.neo4j.uri, "bolt://localhost:7687");
        assert_eq!(cfg.neo4j.user, "neo4j");
        assert_eq!(cfg.neo4j.password, "");
        assert_eq!(cfg.neo4j.max_connections, 16);
        assert_eq!(cfg.server.name, "home-alog");
        assert!(cfg.server.init_constraints);
    }

    #[test]
    fn reads_sections_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("homealog.toml"),
            r#"
[neo4j]
uri = "bolt://graph.home.lan:7687"
password = "s3cret"
fetch_size = 64

[server]
init_constraints = false
"#,
        )
        .unwrap();

        let cfg = HomealogConfig::load_with_env(&prefix(dir.path()), env(&[])).unwrap();
        assert_eq!(cfg.neo4j.uri, "bolt://graph.home.lan:7687");
        assert_eq!(cfg.neo4j.password, "s3cret");
        assert_eq!(cfg.neo4j.fetch_size, 64);
        assert_eq!(cfg.neo4j.user, "neo4j");
        assert!(!cfg.server.init_constraints);
        assert_eq!(cfg.server.name, "home-alog");
    }

    #[test]
    fn prefixed_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("homealog.toml"),
            "[neo4j]\nuser = \"from-file\"\n",
        )
        .unwrap();

        let cfg = HomealogConfig::load_with_env(
            &prefix(dir.path()),
            env(&[
                ("HOMEALOG__NEO4J__USER", "from-env"),
                ("HOMEALOG__NEO4J__MAX_CONNECTIONS", "4"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.neo4j.user, "from-env");
        assert_eq!(cfg.neo4j.max_connections, 4);
    }

    #[test]
    fn legacy_variables_take_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = HomealogConfig::load_with_env(
            &prefix(dir.path()),
            env(&[
                ("HOMEALOG__NEO4J__URI", "bolt://ignored:7687"),
                ("NEO4J_URI", "bolt://legacy:7687"),
                ("NEO4J_PASSWORD", "password"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.neo4j.uri, "bolt://legacy:7687");
        assert_eq!(cfg.neo4j.password, "password");
        assert_eq!(cfg.neo4j.user, "neo4j");
    }

    #[test]
    fn rejects_empty_uri() {
        let dir = tempfile::tempdir().unwrap();
        let err = HomealogConfig::load_with_env(&prefix(dir.path()), env(&[("NEO4J_URI", " ")]))
            .unwrap_err();
        assert!(matches!(err, HomealogError::Config(msg) if msg.contains("neo4j.uri")));
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("homealog.toml"), "[neo4j\nuri = ").unwrap();

        let err = HomealogConfig::load_with_env(&prefix(dir.path()), env(&[])).unwrap_err();
        assert!(matches!(err, HomealogError::Config(_)));
    }
}
