//! Instantiation
//!
//! Resolving a token walks its constructor slots depth-first, constructing
//! dependencies before their dependents. Each provider's instance goes to the
//! cache tier its effective scope selects:
//!
//! | scope               | tier                                          |
//! |---------------------|-----------------------------------------------|
//! | `Global`            | the process-wide [`global_cache`]             |
//! | `Default`/`Deferred`| the caller's override, else the container's   |
//! | `Request`           | the caller's override, else none              |
//! | `Transient`         | none                                          |
//!
//! Without a tier the instance is built fresh on every resolution.

use std::any::Any;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, trace};

use crate::cache::{CacheTiers, Instance, InstanceCache, global_cache};
use crate::container::Container;
use crate::entry::{GraphEntry, RegistryEntry};
use crate::injectable::{Arguments, Injectable, downcast};
use crate::provider::{ClassProvider, FactoryProvider, Provider, StaticArg};
use crate::scope::Scope;
use crate::token::Token;
use crate::{DiError, DiResult};

impl Container {
	/// Produces the instance for `token`, reusing cached instances where its
	/// scope allows.
	///
	/// `tiers` supplies caller-owned caches; a [`Scope::Request`] provider is
	/// only cached when a request tier is passed.
	pub async fn instantiate(&self, token: &Token, tiers: &CacheTiers) -> DiResult<Instance> {
		self.instantiate_token(token, tiers).await
	}

	/// Like [`instantiate`](Self::instantiate), downcast to `T`.
	pub async fn instantiate_as<T: Any + Send + Sync>(
		&self,
		token: &Token,
		tiers: &CacheTiers,
	) -> DiResult<Arc<T>> {
		let value = self.instantiate_token(token, tiers).await?;
		downcast(value, || token.to_string())
	}

	/// Resolves the self-token provider of `T`.
	pub async fn resolve<T: Injectable>(&self, tiers: &CacheTiers) -> DiResult<Arc<T>> {
		self.instantiate_as(&Token::of::<T>(), tiers).await
	}

	/// Instantiates `token` without caller-owned tiers.
	pub async fn get_instance<T: Any + Send + Sync>(&self, token: impl Into<Token>) -> DiResult<Arc<T>> {
		self.instantiate_as(&token.into(), &CacheTiers::new()).await
	}

	/// Eagerly instantiates every global and default class or factory
	/// provider, in registration order. Returns how many were instantiated.
	///
	/// Deferred providers are left alone.
	pub async fn warm_up(&self) -> DiResult<usize> {
		let targets: Vec<Token> = self.read_graph(|graph| {
			graph
				.iter()
				.filter_map(|(token, entry)| {
					let entry = entry.as_provided()?;
					let eager = matches!(entry.scope, Scope::Global | Scope::Default);
					let constructed = matches!(entry.provider, Provider::Class(_) | Provider::Factory(_));
					(eager && constructed).then(|| token.clone())
				})
				.collect()
		});

		let tiers = CacheTiers::new();
		for token in &targets {
			self.instantiate_token(token, &tiers).await?;
		}
		debug!(count = targets.len(), "warmed up providers");
		Ok(targets.len())
	}

	/// Cache tier an instance of `scope` is stored in, if any.
	pub(crate) fn tier_for(&self, scope: Scope, tiers: &CacheTiers) -> Option<InstanceCache> {
		match scope {
			Scope::Global => Some(global_cache().clone()),
			Scope::Default | Scope::Deferred => Some(
				tiers
					.get(scope)
					.cloned()
					.unwrap_or_else(|| self.cache().clone()),
			),
			Scope::Request => tiers.get(Scope::Request).cloned(),
			Scope::Transient => None,
		}
	}

	fn instantiate_token<'a>(
		&'a self,
		token: &'a Token,
		tiers: &'a CacheTiers,
	) -> BoxFuture<'a, DiResult<Instance>> {
		async move {
			let entry = match self.get(token) {
				Some(GraphEntry::Provided(entry)) => entry,
				Some(GraphEntry::Empty(empty)) => {
					return empty
						.default_value()
						.ok_or_else(|| DiError::UndefinedDependency(token.clone()));
				}
				None => return Err(DiError::UndefinedDependency(token.clone())),
			};

			if let Provider::Value(provider) = &entry.provider {
				return Ok(provider.value().clone());
			}

			let tier = self.tier_for(entry.scope, tiers);
			if let Some(hit) = tier.as_ref().and_then(|cache| cache.get(token)) {
				trace!(token = %token, scope = %entry.scope, "cache hit");
				return Ok(hit);
			}

			let created = match &entry.provider {
				Provider::Class(provider) => self.construct(&entry, provider, tiers).await?,
				Provider::Factory(provider) => self.invoke(&entry, provider, tiers).await?,
				Provider::Value(_) | Provider::Empty(_) => {
					return Err(DiError::UndefinedDependency(token.clone()));
				}
			};

			Ok(match tier {
				Some(cache) => {
					debug!(token = %token, scope = %entry.scope, "caching instance");
					cache.get_or_insert(token.clone(), created)
				}
				None => created,
			})
		}
		.boxed()
	}

	async fn construct(
		&self,
		entry: &RegistryEntry,
		provider: &ClassProvider,
		tiers: &CacheTiers,
	) -> DiResult<Instance> {
		let arguments = self
			.arguments(provider.static_args(), entry, tiers)
			.await?;

		let mut object = provider.class().construct(&arguments)?;

		for (key, slot) in &entry.property_slots {
			if object.has_property(key) {
				continue;
			}
			let value = self.resolve_slot(slot, tiers, false).await?;
			object.set_property(key, value)?;
		}

		debug!(token = %entry.token, class = provider.class().name(), "constructed instance");
		Ok(object.into_instance())
	}

	async fn invoke(
		&self,
		entry: &RegistryEntry,
		provider: &FactoryProvider,
		tiers: &CacheTiers,
	) -> DiResult<Instance> {
		let arguments = self
			.arguments(provider.static_args(), entry, tiers)
			.await?;

		let value = provider.call(arguments).await?;
		debug!(token = %entry.token, "factory produced instance");
		Ok(value)
	}

	/// Static arguments followed by the resolved constructor slots.
	///
	/// Static thunks run after the dependencies they precede are resolved.
	async fn arguments(
		&self,
		static_args: &[StaticArg],
		entry: &RegistryEntry,
		tiers: &CacheTiers,
	) -> DiResult<Arguments> {
		let mut resolved = Vec::with_capacity(entry.constructor_slots.len());
		for slot in &entry.constructor_slots {
			resolved.push(self.resolve_slot(slot, tiers, true).await?);
		}

		let mut values = Vec::with_capacity(static_args.len() + resolved.len());
		for arg in static_args {
			values.push(Some(arg.evaluate(self)?));
		}
		values.extend(resolved);
		Ok(Arguments::new(values))
	}

	/// A slot on an empty-dependency node yields its default for constructor
	/// parameters and nothing for properties.
	async fn resolve_slot(
		&self,
		slot: &Token,
		tiers: &CacheTiers,
		use_default: bool,
	) -> DiResult<Option<Instance>> {
		if let Some(GraphEntry::Empty(empty)) = self.get(slot) {
			return Ok(if use_default { empty.default_value() } else { None });
		}
		self.instantiate_token(slot, tiers).await.map(Some)
	}
}
