//! Container settings

use serde::{Deserialize, Serialize};

use crate::scope::Scope;
use crate::DiResult;

/// Static configuration of a [`Container`](crate::Container).
///
/// # Examples
///
/// ```
/// use kiln_di::{ContainerSettings, Scope};
///
/// let settings = ContainerSettings::from_toml_str(r#"
///     default_scope = "deferred"
///     auto_register = false
/// "#).unwrap();
///
/// assert_eq!(settings.default_scope, Scope::Deferred);
/// assert!(!settings.auto_register);
/// assert!(!settings.reject_duplicates);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
	/// Scope for providers that name none and whose class declares none.
	pub default_scope: Scope,
	/// Register undeclared class dependencies on the fly.
	pub auto_register: bool,
	/// Fail when a token is registered twice instead of replacing it.
	pub reject_duplicates: bool,
}

impl Default for ContainerSettings {
	fn default() -> Self {
		Self {
			default_scope: Scope::Default,
			auto_register: true,
			reject_duplicates: false,
		}
	}
}

impl ContainerSettings {
	pub fn builder() -> ContainerSettingsBuilder {
		ContainerSettingsBuilder::default()
	}

	/// Parses settings from a TOML document. Missing keys keep their defaults.
	pub fn from_toml_str(source: &str) -> DiResult<Self> {
		Ok(toml::from_str(source)?)
	}
}

/// Builder for [`ContainerSettings`].
#[derive(Debug, Default)]
pub struct ContainerSettingsBuilder {
	settings: ContainerSettings,
}

impl ContainerSettingsBuilder {
	pub fn default_scope(mut self, scope: Scope) -> Self {
		self.settings.default_scope = scope;
		self
	}

	pub fn auto_register(mut self, enabled: bool) -> Self {
		self.settings.auto_register = enabled;
		self
	}

	pub fn reject_duplicates(mut self, enabled: bool) -> Self {
		self.settings.reject_duplicates = enabled;
		self
	}

	pub fn build(self) -> ContainerSettings {
		self.settings
	}
}
