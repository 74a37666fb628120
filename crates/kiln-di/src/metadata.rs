//! Dependency metadata
//!
//! The container never inspects types on its own. It asks a [`MetadataSource`]
//! for the constructor, property and extra dependencies of each class provider
//! it registers.

use std::any::Any;

use crate::cache::{Instance, instance};
use crate::injectable::{Class, Injectable};
use crate::provider::Provider;
use crate::scope::Scope;
use crate::token::Token;

/// One declared dependency slot.
#[derive(Clone)]
pub struct Dependency {
	pub token: Token,
	/// Set when the token names a constructible class, which makes it
	/// eligible for auto-registration.
	pub class: Option<Class>,
	pub optional: bool,
	pub default: Option<Instance>,
}

impl Dependency {
	/// Depends on an injectable type, keyed by the type itself.
	pub fn on<T: Injectable>() -> Self {
		let class = Class::of::<T>();
		Self {
			token: class.token(),
			class: Some(class),
			optional: false,
			default: None,
		}
	}

	/// Depends on an arbitrary token.
	pub fn token(token: impl Into<Token>) -> Self {
		Self {
			token: token.into(),
			class: None,
			optional: false,
			default: None,
		}
	}

	/// Marks the slot optional: a missing provider resolves to nothing.
	pub fn optional(mut self) -> Self {
		self.optional = true;
		self
	}

	/// Marks the slot optional with a fallback value.
	///
	/// # Examples
	///
	/// ```
	/// use kiln_di::Dependency;
	///
	/// let dep = Dependency::token("timeout_ms").with_default(500u64);
	/// assert!(dep.optional);
	/// assert!(dep.default.is_some());
	/// ```
	pub fn with_default<T: Any + Send + Sync>(mut self, value: T) -> Self {
		self.optional = true;
		self.default = Some(instance(value));
		self
	}
}

impl std::fmt::Debug for Dependency {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Dependency")
			.field("token", &self.token)
			.field("class", &self.class.is_some())
			.field("optional", &self.optional)
			.field("default", &self.default.is_some())
			.finish()
	}
}

/// Source of dependency declarations for class providers.
pub trait MetadataSource: Send + Sync {
	/// Dependencies per constructor parameter, in parameter order.
	fn constructor_dependencies(&self, class: &Class) -> Vec<Dependency>;

	/// Property dependencies keyed by property name.
	fn property_dependencies(&self, class: &Class) -> Vec<(String, Dependency)>;

	/// Providers the class needs registered next to it.
	fn extra_dependencies(&self, class: &Class) -> Vec<Provider>;

	/// The scope the class declares for itself, if any.
	fn default_scope(&self, class: &Class) -> Option<Scope>;
}

/// Reads the declarations an [`Injectable`] type makes about itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredMetadata;

impl MetadataSource for DeclaredMetadata {
	fn constructor_dependencies(&self, class: &Class) -> Vec<Dependency> {
		class.declared_dependencies()
	}

	fn property_dependencies(&self, class: &Class) -> Vec<(String, Dependency)> {
		class
			.declared_properties()
			.into_iter()
			.map(|(key, dependency)| (key.to_string(), dependency))
			.collect()
	}

	fn extra_dependencies(&self, class: &Class) -> Vec<Provider> {
		class.declared_extra_dependencies()
	}

	fn default_scope(&self, class: &Class) -> Option<Scope> {
		class.declared_scope()
	}
}
