//! Empty dependency sentinel

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::cache::{Instance, instance};
use crate::token::{EmptyKey, Token};

static NEXT_EMPTY_ID: AtomicU64 = AtomicU64::new(1);

/// Placeholder for an optional dependency nobody provides.
///
/// It is inserted into the graph under its own [`Token::Empty`] key and is
/// never instantiated: resolving a slot that points at it yields the stored
/// default, or nothing.
#[derive(Clone)]
pub struct EmptyDependency {
	key: EmptyKey,
	default: Option<Instance>,
}

impl EmptyDependency {
	/// Creates a sentinel for `requested` with no default value.
	pub fn new(requested: impl Into<Token>) -> Self {
		Self::with_instance(requested, None)
	}

	/// Creates a sentinel that resolves to `default`.
	///
	/// # Examples
	///
	/// ```
	/// use kiln_di::{EmptyDependency, Token};
	///
	/// let empty = EmptyDependency::with_default("retries", 3u32);
	/// assert_eq!(empty.requested(), &Token::name("retries"));
	/// assert_eq!(*empty.default_value().unwrap().downcast::<u32>().unwrap(), 3);
	/// ```
	pub fn with_default<T: Any + Send + Sync>(requested: impl Into<Token>, default: T) -> Self {
		Self::with_instance(requested, Some(instance(default)))
	}

	pub fn with_instance(requested: impl Into<Token>, default: Option<Instance>) -> Self {
		Self {
			key: EmptyKey {
				id: NEXT_EMPTY_ID.fetch_add(1, Ordering::Relaxed),
				requested: Arc::new(requested.into()),
			},
			default,
		}
	}

	/// The graph key of this sentinel.
	pub fn token(&self) -> Token {
		Token::Empty(self.key.clone())
	}

	/// The token the optional slot asked for.
	pub fn requested(&self) -> &Token {
		self.key.requested()
	}

	pub fn default_value(&self) -> Option<Instance> {
		self.default.clone()
	}
}

impl std::fmt::Debug for EmptyDependency {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EmptyDependency")
			.field("requested", self.requested())
			.field("has_default", &self.default.is_some())
			.finish()
	}
}
