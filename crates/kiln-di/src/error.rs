//! Dependency injection error types.

use kiln_graph::GraphError;
use thiserror::Error;

use crate::token::Token;

/// Result type for container operations.
pub type DiResult<T> = Result<T, DiError>;

/// Errors raised while registering providers or instantiating them.
///
/// Every variant aborts the operation that raised it; the container never
/// retries on its own.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DiError {
	/// No provider is registered for the token.
	#[error("undefined dependency: {0}")]
	UndefinedDependency(Token),

	/// A required constructor (or factory) dependency has no provider.
	#[error("unknown dependency of '{owner}' at parameter {index}: {missing}")]
	UnknownDependency {
		/// Provider that declared the dependency.
		owner: Token,
		/// Parameter position, counting static arguments.
		index: usize,
		/// Token nobody provides.
		missing: Token,
	},

	/// A required property dependency has no provider.
	#[error("unknown property dependency of '{owner}' at '{key}': {missing}")]
	UnknownPropertyDependency {
		/// Provider that declared the property.
		owner: Token,
		/// Property key.
		key: String,
		/// Token nobody provides.
		missing: Token,
	},

	/// The registered providers form a cycle.
	#[error("circular dependency detected: {}", format_path(.path))]
	CircularDependency {
		/// Path from the cycle's origin back to the repeated token.
		path: Vec<Token>,
	},

	/// A token was registered twice while duplicates are rejected.
	#[error("provider already registered: {0}")]
	DuplicateProvider(Token),

	/// Graph invariant violation.
	#[error(transparent)]
	Graph(#[from] GraphError),

	/// A constructor asked for an argument position that was not supplied.
	#[error("argument {index} is missing")]
	ArgumentMissing {
		/// Argument position.
		index: usize,
	},

	/// A value could not be downcast to the requested type.
	#[error("type mismatch for {token}: expected {expected}")]
	TypeMismatch {
		/// Token (or argument description) being read.
		token: String,
		/// Requested type name.
		expected: &'static str,
	},

	/// Settings could not be parsed.
	#[error("settings error: {0}")]
	Settings(String),

	/// Failure reported by a constructor or a factory.
	#[error("{0}")]
	Custom(String),
}

fn format_path(path: &[Token]) -> String {
	path.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join(" -> ")
}

impl From<toml::de::Error> for DiError {
	fn from(err: toml::de::Error) -> Self {
		Self::Settings(err.to_string())
	}
}
