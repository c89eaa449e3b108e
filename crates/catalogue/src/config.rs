//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::permissions::PermissionRegistry;

/// Catalogue configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL (`postgres://…` or `sqlite:…`).
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// TOML role → permission file. Built-in defaults when unset.
    pub permissions_file: Option<PathBuf>,

    /// Whether reviews go through moderation (default: true).
    ///
    /// Moderated catalogues list only active reviews under a product.
    pub reviews_moderated: bool,
}

/// Behaviour switches handed to the catalogue services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogueOptions {
    pub reviews_moderated: bool,
}

impl Default for CatalogueOptions {
    fn default() -> Self {
        Self {
            reviews_moderated: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let permissions_file = env::var("PERMISSIONS_FILE")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let reviews_moderated = env::var("REVIEWS_MODERATED")
            .unwrap_or_else(|_| "true".to_string())
            .to_lowercase()
            .parse()
            .context("REVIEWS_MODERATED must be true or false")?;

        Ok(Self {
            database_url,
            database_max_connections,
            permissions_file,
            reviews_moderated,
        })
    }

    pub fn options(&self) -> CatalogueOptions {
        CatalogueOptions {
            reviews_moderated: self.reviews_moderated,
        }
    }

    /// The permission registry named by `permissions_file`, or the built-in one.
    pub fn permission_registry(&self) -> Result<PermissionRegistry> {
        match &self.permissions_file {
            Some(path) => PermissionRegistry::load(path),
            None => Ok(PermissionRegistry::default()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::permissions::{Authorization, well_known};

    fn config(permissions_file: Option<PathBuf>) -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            database_max_connections: 1,
            permissions_file,
            reviews_moderated: false,
        }
    }

    #[test]
    fn permissions_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[roles]
editor = ["VIEW_INACTIVE_CONTENT"]
"#
        )
        .unwrap();

        let registry = config(Some(file.path().to_path_buf()))
            .permission_registry()
            .unwrap();
        let editor = registry.authorize(&["editor"]);

        assert!(editor.is_allowed(well_known::VIEW_INACTIVE_CONTENT));
        assert!(!editor.is_allowed(well_known::VIEW_INACTIVE_VENDOR));
        assert!(registry.role("admin").is_none());
    }

    #[test]
    fn missing_permissions_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = config(Some(dir.path().join("absent.toml"))).permission_registry();
        assert!(result.is_err());
    }

    #[test]
    fn built_in_registry_without_file() {
        let registry = config(None).permission_registry().unwrap();
        assert!(
            registry
                .authorize(&["admin"])
                .is_allowed(well_known::VIEW_INACTIVE_REVIEW)
        );
    }

    #[test]
    fn options_carry_moderation_switch() {
        assert!(!config(None).options().reviews_moderated);
        assert!(CatalogueOptions::default().reviews_moderated);
    }
}
