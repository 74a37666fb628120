//! The provider container
//!
//! A [`Container`] owns the dependency graph of every provider registered with
//! it and the cache tier for its default-scoped instances. Registration is a
//! two-phase affair: providers are inserted and their dependency edges
//! collated first, then one depth-first pass over the batch rejects cycles
//! and propagates scopes. Instantiation lives in [`resolver`](crate::resolver).

use std::sync::Arc;

use kiln_graph::DependencyGraph;
use parking_lot::RwLock;

use crate::cache::{CacheTiers, Instance, InstanceCache};
use crate::entry::GraphEntry;
use crate::metadata::{DeclaredMetadata, MetadataSource};
use crate::provider::{ClassProvider, Provider};
use crate::registration::Registration;
use crate::scope::Scope;
use crate::settings::ContainerSettings;
use crate::token::Token;
use crate::DiResult;

pub(crate) type Graph = DependencyGraph<Token, GraphEntry>;

/// Dependency injection container.
///
/// # Examples
///
/// ```
/// use kiln_di::{Arguments, CacheTiers, Container, Dependency, DiResult, Injectable, Provider};
/// use std::sync::Arc;
///
/// struct Config {
///     url: String,
/// }
///
/// struct Repository {
///     config: Arc<Config>,
/// }
///
/// impl Injectable for Repository {
///     fn construct(args: &Arguments) -> DiResult<Self> {
///         Ok(Repository { config: args.get::<Config>(0)? })
///     }
///
///     fn dependencies() -> Vec<Dependency> {
///         vec![Dependency::token("config")]
///     }
/// }
///
/// # futures::executor::block_on(async {
/// let container = Container::new();
/// container.set([
///     Provider::value("config", Config { url: "postgres://localhost".into() }),
///     Provider::class::<Repository>(),
/// ])?;
///
/// let repo = container.resolve::<Repository>(&CacheTiers::new()).await?;
/// assert_eq!(repo.config.url, "postgres://localhost");
/// # Ok::<(), kiln_di::DiError>(())
/// # }).unwrap();
/// ```
pub struct Container {
	graph: RwLock<Graph>,
	cache: InstanceCache,
	settings: ContainerSettings,
	metadata: Arc<dyn MetadataSource>,
}

impl Container {
	/// Creates a container with default settings.
	pub fn new() -> Self {
		Self::builder().build()
	}

	pub fn with_settings(settings: ContainerSettings) -> Self {
		Self::builder().settings(settings).build()
	}

	pub fn builder() -> ContainerBuilder {
		ContainerBuilder::default()
	}

	pub fn settings(&self) -> &ContainerSettings {
		&self.settings
	}

	/// The cache tier this container owns for default and deferred scopes.
	pub fn cache(&self) -> &InstanceCache {
		&self.cache
	}

	pub(crate) fn metadata(&self) -> &dyn MetadataSource {
		self.metadata.as_ref()
	}

	/// Registers one or more providers.
	///
	/// New class providers have their dependencies collated into the graph,
	/// auto-registering undeclared classes when enabled. The whole batch is
	/// then checked for cycles and scopes are propagated from dependencies to
	/// their dependents.
	///
	/// The batch is staged on a copy of the graph and committed only when it
	/// validates, so a failed call leaves the container as it was.
	pub fn set<I>(&self, providers: I) -> DiResult<()>
	where
		I: IntoIterator,
		I::Item: Into<Provider>,
	{
		let mut graph = self.graph.write();
		let mut staged = graph.clone();
		let mut registration = Registration::new(self, &mut staged);
		for provider in providers {
			registration.register(provider.into())?;
		}
		registration.collate()?;
		registration.finish()?;
		*graph = staged;
		Ok(())
	}

	/// The graph entry for `token`.
	pub fn get(&self, token: &Token) -> Option<GraphEntry> {
		self.graph.read().get(token).cloned()
	}

	/// Every graph entry, in registration order.
	pub fn entries(&self) -> Vec<GraphEntry> {
		self.graph
			.read()
			.iter()
			.map(|(_, entry)| entry.clone())
			.collect()
	}

	/// Every registered class provider, in registration order.
	pub fn class_providers(&self) -> Vec<ClassProvider> {
		self.graph
			.read()
			.iter()
			.filter_map(|(_, entry)| match entry.as_provided()?.provider() {
				Provider::Class(provider) => Some(provider.clone()),
				_ => None,
			})
			.collect()
	}

	/// Effective scope of a registered provider.
	pub fn scope_of(&self, token: &Token) -> Option<Scope> {
		self.graph.read().get(token).and_then(GraphEntry::scope)
	}

	/// Tokens `token` depends on, parallel edges included.
	pub fn dependencies_of(&self, token: &Token) -> DiResult<Vec<Token>> {
		let graph = self.graph.read();
		Ok(graph.dependencies(token)?.into_iter().cloned().collect())
	}

	/// Tokens that depend on `token`.
	pub fn dependents_of(&self, token: &Token) -> DiResult<Vec<Token>> {
		let graph = self.graph.read();
		Ok(graph.dependents(token)?.into_iter().cloned().collect())
	}

	pub fn contains(&self, token: &Token) -> bool {
		self.graph.read().contains(token)
	}

	/// Number of graph nodes, empty-dependency nodes included.
	pub fn len(&self) -> usize {
		self.graph.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.graph.read().is_empty()
	}

	/// Looks up an already created global, default or deferred instance.
	///
	/// Never constructs anything, so it is safe to call from static-argument
	/// thunks.
	pub fn cached(&self, token: &Token) -> Option<Instance> {
		let scope = self.scope_of(token)?;
		self.tier_for(scope, &CacheTiers::new())?.get(token)
	}

	pub(crate) fn read_graph<R>(&self, f: impl FnOnce(&Graph) -> R) -> R {
		f(&self.graph.read())
	}
}

impl Default for Container {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for Container {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Container")
			.field("providers", &self.len())
			.field("cached", &self.cache.len())
			.field("settings", &self.settings)
			.finish()
	}
}

/// Builder for [`Container`].
#[derive(Default)]
pub struct ContainerBuilder {
	settings: ContainerSettings,
	metadata: Option<Arc<dyn MetadataSource>>,
	cache: Option<InstanceCache>,
}

impl ContainerBuilder {
	pub fn settings(mut self, settings: ContainerSettings) -> Self {
		self.settings = settings;
		self
	}

	pub fn default_scope(mut self, scope: Scope) -> Self {
		self.settings.default_scope = scope;
		self
	}

	pub fn auto_register(mut self, enabled: bool) -> Self {
		self.settings.auto_register = enabled;
		self
	}

	/// Replaces the [`DeclaredMetadata`] source.
	pub fn metadata(mut self, source: impl MetadataSource + 'static) -> Self {
		self.metadata = Some(Arc::new(source));
		self
	}

	/// Shares an existing default-tier cache instead of creating one.
	pub fn cache(mut self, cache: InstanceCache) -> Self {
		self.cache = Some(cache);
		self
	}

	pub fn build(self) -> Container {
		Container {
			graph: RwLock::new(DependencyGraph::new()),
			cache: self.cache.unwrap_or_default(),
			settings: self.settings,
			metadata: self
				.metadata
				.unwrap_or_else(|| Arc::new(DeclaredMetadata)),
		}
	}
}
