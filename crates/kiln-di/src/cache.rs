//! Instance cache tiers
//!
//! One [`InstanceCache`] exists per lifetime tier: the process-wide tier
//! returned by [`global_cache`], the tier owned by each container, and any
//! number of caller-owned tiers passed per call through [`CacheTiers`].

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::scope::Scope;
use crate::token::Token;

/// A resolved, type-erased value.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Wraps a value as an [`Instance`].
pub fn instance<T: Any + Send + Sync>(value: T) -> Instance {
	Arc::new(value)
}

/// Token to instance store for a single lifetime tier.
///
/// Cloning the cache clones the handle; both handles see the same entries.
#[derive(Clone, Default)]
pub struct InstanceCache {
	entries: Arc<RwLock<HashMap<Token, Instance>>>,
}

impl InstanceCache {
	/// Creates an empty cache.
	///
	/// # Examples
	///
	/// ```
	/// use kiln_di::InstanceCache;
	///
	/// let cache = InstanceCache::new();
	/// assert!(cache.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, token: &Token) -> Option<Instance> {
		self.entries.read().get(token).cloned()
	}

	/// Retrieves a cached value by token and downcasts it.
	///
	/// Returns `None` if nothing is cached or the value has another type.
	///
	/// # Examples
	///
	/// ```
	/// use kiln_di::{InstanceCache, Token, instance};
	///
	/// let cache = InstanceCache::new();
	/// cache.insert(Token::name("answer"), instance(42i32));
	///
	/// assert_eq!(*cache.get_as::<i32>(&Token::name("answer")).unwrap(), 42);
	/// assert!(cache.get_as::<u64>(&Token::name("answer")).is_none());
	/// ```
	pub fn get_as<T: Any + Send + Sync>(&self, token: &Token) -> Option<Arc<T>> {
		self.get(token)
			.and_then(|value| value.downcast::<T>().ok())
	}

	/// Stores a value, replacing any previous one.
	pub fn insert(&self, token: Token, value: Instance) {
		self.entries.write().insert(token, value);
	}

	/// Stores `value` unless the token already has an entry.
	///
	/// The check and the write happen under one lock, so concurrent callers
	/// racing on the same token all receive the instance that was stored first.
	///
	/// # Examples
	///
	/// ```
	/// use kiln_di::{InstanceCache, Token, instance};
	/// use std::sync::Arc;
	///
	/// let cache = InstanceCache::new();
	/// let first = cache.get_or_insert(Token::name("db"), instance(1u8));
	/// let second = cache.get_or_insert(Token::name("db"), instance(2u8));
	///
	/// assert!(Arc::ptr_eq(&first, &second));
	/// ```
	pub fn get_or_insert(&self, token: Token, value: Instance) -> Instance {
		self.entries
			.write()
			.entry(token)
			.or_insert(value)
			.clone()
	}

	pub fn remove(&self, token: &Token) -> Option<Instance> {
		self.entries.write().remove(token)
	}

	pub fn contains(&self, token: &Token) -> bool {
		self.entries.read().contains_key(token)
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}

	pub fn clear(&self) {
		self.entries.write().clear();
	}

	/// Creates an independent copy holding the same entries.
	pub fn deep_clone(&self) -> Self {
		Self {
			entries: Arc::new(RwLock::new(self.entries.read().clone())),
		}
	}

	/// Returns `true` if both handles point at the same store.
	pub fn same_store(&self, other: &InstanceCache) -> bool {
		Arc::ptr_eq(&self.entries, &other.entries)
	}
}

impl std::fmt::Debug for InstanceCache {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("InstanceCache")
			.field("len", &self.len())
			.finish()
	}
}

static GLOBAL_CACHE: Lazy<InstanceCache> = Lazy::new(InstanceCache::new);

/// The process-wide tier used by [`Scope::Global`] providers of every container.
pub fn global_cache() -> &'static InstanceCache {
	&GLOBAL_CACHE
}

/// Caller-supplied cache tiers for one `instantiate` call.
///
/// A caller typically creates one set of tiers per incoming request and passes
/// it to every resolution made for that request.
///
/// # Examples
///
/// ```
/// use kiln_di::{CacheTiers, InstanceCache, Scope};
///
/// let tiers = CacheTiers::request();
/// assert!(tiers.get(Scope::Request).is_some());
///
/// let shared = InstanceCache::new();
/// let tiers = CacheTiers::new().with(Scope::Default, shared.clone());
/// assert!(tiers.get(Scope::Default).unwrap().same_store(&shared));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CacheTiers {
	tiers: HashMap<Scope, InstanceCache>,
}

impl CacheTiers {
	pub fn new() -> Self {
		Self::default()
	}

	/// Tiers holding a single fresh request cache.
	pub fn request() -> Self {
		Self::new().with(Scope::Request, InstanceCache::new())
	}

	pub fn with(mut self, scope: Scope, cache: InstanceCache) -> Self {
		self.tiers.insert(scope, cache);
		self
	}

	pub fn insert(&mut self, scope: Scope, cache: InstanceCache) {
		self.tiers.insert(scope, cache);
	}

	pub fn get(&self, scope: Scope) -> Option<&InstanceCache> {
		self.tiers.get(&scope)
	}

	pub fn is_empty(&self) -> bool {
		self.tiers.is_empty()
	}
}
