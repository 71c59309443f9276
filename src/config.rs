use std::path::{Path, PathBuf};

use config::{Config as ConfigLoader, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{HarnessError, HarnessResult};

/// Harness configuration. Defaults ship embedded in the binary; a user file
/// and `LINTCHECK_*` environment variables layer on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Directory holding the ESLint config under test; shared npm
    /// dependencies are installed here once, then only read.
    pub fixture_dir: PathBuf,

    /// Config entry point, relative to `fixture_dir`.
    pub eslint_config: PathBuf,

    /// Extensions handed to `eslint --ext`.
    pub extensions: String,

    /// Packages installed into `fixture_dir` during setup.
    pub setup_packages: Vec<String>,

    /// Upper bound on concurrently running pipelines; 0 means unbounded.
    pub max_concurrent: usize,
}

impl HarnessConfig {
    /// Load configuration from embedded defaults, an optional user file and
    /// the environment.
    pub fn load(config_path: Option<&Path>) -> HarnessResult<Self> {
        let mut builder = ConfigLoader::builder().add_source(config::File::from_str(
            include_str!("../config/default.toml"),
            FileFormat::Toml,
        ));

        if let Some(path) = config_path {
            if path.exists() {
                builder = builder.add_source(config::File::from(path));
                info!("Loading user configuration from: {}", path.display());
            } else {
                warn!("Specified configuration file not found: {}", path.display());
            }
        }

        builder = builder.add_source(config::Environment::with_prefix("LINTCHECK"));

        let mut harness_config: HarnessConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| HarnessError::Setup {
                message: format!("Failed to load configuration: {}", e),
            })?;

        // eslint resolves a relative --config against its own cwd, which is
        // the fixture dir when the harness spawns it. Both the spawn cwd and
        // the config path must be absolute before any process starts.
        harness_config.fixture_dir = absolutize(harness_config.fixture_dir);

        Ok(harness_config)
    }

    /// Absolute path to the ESLint config entry point.
    pub fn eslint_config_path(&self) -> PathBuf {
        self.fixture_dir.join(&self.eslint_config)
    }
}

fn absolutize(path: PathBuf) -> PathBuf {
    let absolute = if path.is_absolute() {
        path
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => return path,
        }
    };
    std::fs::canonicalize(&absolute).unwrap_or(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_parse() {
        let config = HarnessConfig::load(None).unwrap();

        assert_eq!(config.extensions, ".js,.ts");
        assert_eq!(config.max_concurrent, 0);
        assert!(config.setup_packages.iter().any(|p| p == "eslint"));
        assert!(config
            .eslint_config_path()
            .ends_with("eslint-config-tester/index.js"));
    }

    #[test]
    fn test_fixture_paths_resolve_from_any_cwd() {
        // The lint step spawns npx with the fixture dir as cwd, so a
        // cwd-relative config path would never resolve there.
        let config = HarnessConfig::load(None).unwrap();

        assert!(config.fixture_dir.is_absolute());
        assert!(config.eslint_config_path().is_absolute());
        assert!(config.eslint_config_path().exists());
    }

    #[test]
    fn test_absolute_fixture_dir_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("lintcheck.toml");
        std::fs::write(
            &user,
            format!("fixture_dir = \"{}\"\n", dir.path().display()),
        )
        .unwrap();

        let config = HarnessConfig::load(Some(&user)).unwrap();

        assert!(config.fixture_dir.is_absolute());
        assert!(config.fixture_dir.starts_with(dir.path().canonicalize().unwrap()));
    }

    #[test]
    fn test_missing_user_file_falls_back_to_defaults() {
        let config = HarnessConfig::load(Some(Path::new("/nonexistent/lintcheck.toml"))).unwrap();

        assert_eq!(config.setup_packages.len(), 4);
    }

    #[test]
    fn test_user_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lintcheck.toml");
        std::fs::write(&path, "extensions = \".js\"\nmax_concurrent = 4\n").unwrap();

        let config = HarnessConfig::load(Some(&path)).unwrap();

        assert_eq!(config.extensions, ".js");
        assert_eq!(config.max_concurrent, 4);
        // Untouched keys keep their defaults.
        assert_eq!(config.eslint_config, PathBuf::from("index.js"));
    }
}
