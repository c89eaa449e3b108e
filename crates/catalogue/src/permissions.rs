//! Permissions: which callers may see inactive catalogue entities.
//!
//! Roles map to permission names through a [`PermissionRegistry`] built at
//! startup, either from a TOML file or from the built-in defaults. Services
//! only see the [`Authorization`] trait.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::EntityKind;

/// Well-known permission names and roles.
pub mod well_known {
    pub const VIEW_INACTIVE_CATEGORY: &str = "VIEW_INACTIVE_CATEGORY";
    pub const VIEW_INACTIVE_CONTENT: &str = "VIEW_INACTIVE_CONTENT";
    pub const VIEW_INACTIVE_MANUFACTURER: &str = "VIEW_INACTIVE_MANUFACTURER";
    pub const VIEW_INACTIVE_PRODUCT: &str = "VIEW_INACTIVE_PRODUCT";
    pub const VIEW_INACTIVE_REVIEW: &str = "VIEW_INACTIVE_REVIEW";
    pub const VIEW_INACTIVE_VENDOR: &str = "VIEW_INACTIVE_VENDOR";

    /// Role granted every permission above by the built-in registry.
    pub const ADMIN_ROLE: &str = "admin";
}

/// Permission that lets a caller see inactive entities of `kind`.
pub fn view_inactive(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Category => well_known::VIEW_INACTIVE_CATEGORY,
        EntityKind::Content => well_known::VIEW_INACTIVE_CONTENT,
        EntityKind::Manufacturer => well_known::VIEW_INACTIVE_MANUFACTURER,
        EntityKind::Product => well_known::VIEW_INACTIVE_PRODUCT,
        EntityKind::Review => well_known::VIEW_INACTIVE_REVIEW,
        EntityKind::Vendor => well_known::VIEW_INACTIVE_VENDOR,
    }
}

/// Answers whether the current caller holds a named permission.
pub trait Authorization: Send + Sync {
    fn is_allowed(&self, permission: &str) -> bool;
}

/// Role → permission mapping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PermissionRegistry {
    #[serde(default)]
    roles: BTreeMap<String, BTreeSet<String>>,
}

impl Default for PermissionRegistry {
    /// The built-in registry: `admin` may view every inactive entity kind.
    fn default() -> Self {
        let admin = EntityKind::ALL
            .iter()
            .map(|kind| view_inactive(*kind).to_string())
            .collect();
        Self {
            roles: BTreeMap::from([(well_known::ADMIN_ROLE.to_string(), admin)]),
        }
    }
}

impl PermissionRegistry {
    /// Registry with no roles at all.
    pub fn empty() -> Self {
        Self {
            roles: BTreeMap::new(),
        }
    }

    /// Parse a registry from TOML:
    ///
    /// ```toml
    /// [roles]
    /// admin = ["VIEW_INACTIVE_VENDOR", "VIEW_INACTIVE_PRODUCT"]
    /// ```
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).context("invalid permissions file")
    }

    /// Load a registry from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read permissions file {}", path.display()))?;
        let registry = Self::from_toml(&source)?;
        tracing::info!(
            path = %path.display(),
            roles = registry.roles.len(),
            "loaded permission registry"
        );
        Ok(registry)
    }

    /// Grant `permission` to `role`.
    pub fn grant(mut self, role: impl Into<String>, permission: impl Into<String>) -> Self {
        self.roles
            .entry(role.into())
            .or_default()
            .insert(permission.into());
        self
    }

    /// Permissions held by `role`, if the role is known.
    pub fn role(&self, role: &str) -> Option<&BTreeSet<String>> {
        self.roles.get(role)
    }

    /// Resolve a caller's roles into their combined permissions.
    ///
    /// Unknown roles grant nothing.
    pub fn authorize<S: AsRef<str>>(&self, roles: &[S]) -> CallerPermissions {
        let mut permissions = BTreeSet::new();
        for role in roles {
            match self.roles.get(role.as_ref()) {
                Some(granted) => permissions.extend(granted.iter().cloned()),
                None => tracing::warn!(role = role.as_ref(), "unknown role ignored"),
            }
        }
        CallerPermissions { permissions }
    }
}

/// Resolved permissions for one caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerPermissions {
    permissions: BTreeSet<String>,
}

impl CallerPermissions {
    /// A caller without any permission.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with(permissions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn permissions(&self) -> impl Iterator<Item = &str> {
        self.permissions.iter().map(String::as_str)
    }
}

impl Authorization for CallerPermissions {
    fn is_allowed(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn default_admin_sees_everything() {
        let admin = PermissionRegistry::default().authorize(&["admin"]);
        for kind in EntityKind::ALL {
            assert!(admin.is_allowed(view_inactive(kind)), "{kind}");
        }
    }

    #[test]
    fn unknown_roles_grant_nothing() {
        let caller = PermissionRegistry::default().authorize(&["customer"]);
        assert_eq!(caller, CallerPermissions::anonymous());
        assert!(!caller.is_allowed(well_known::VIEW_INACTIVE_VENDOR));
    }

    #[test]
    fn roles_combine() {
        let registry = PermissionRegistry::empty()
            .grant("editor", well_known::VIEW_INACTIVE_CONTENT)
            .grant("buyer", well_known::VIEW_INACTIVE_VENDOR);

        let caller = registry.authorize(&["editor", "buyer"]);
        assert!(caller.is_allowed(well_known::VIEW_INACTIVE_CONTENT));
        assert!(caller.is_allowed(well_known::VIEW_INACTIVE_VENDOR));
        assert!(!caller.is_allowed(well_known::VIEW_INACTIVE_PRODUCT));
    }

    #[test]
    fn parses_toml() {
        let registry = PermissionRegistry::from_toml(
            r#"
            [roles]
            editor = ["VIEW_INACTIVE_CONTENT", "VIEW_INACTIVE_CATEGORY"]
            "#,
        )
        .unwrap();

        let editor = registry.role("editor").unwrap();
        assert!(editor.contains(well_known::VIEW_INACTIVE_CATEGORY));
        assert!(registry.role("admin").is_none());
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(PermissionRegistry::from_toml("[roles]\neditor = 3").is_err());
        assert!(PermissionRegistry::from_toml("[groups]").is_err());
    }
}
