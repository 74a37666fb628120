//! # Kiln
//!
//! A runtime composition engine: register providers under tokens, let Kiln
//! work out how they depend on each other, and instantiate them with the
//! right lifetime.
//!
//! ## Crates
//!
//! - [`graph`]: directed dependency multigraph with iterative traversal
//! - [`di`]: provider container, scope bubbling and tiered instance caches
//!
//! ## Feature Flags
//!
//! - `di` (default) - the provider container
//!
//! ## Quick Example
//!
//! ```rust
//! use kiln::prelude::*;
//! use std::sync::Arc;
//!
//! struct Config {
//!     name: &'static str,
//! }
//!
//! struct Greeter {
//!     config: Arc<Config>,
//! }
//!
//! impl Injectable for Greeter {
//!     fn construct(args: &Arguments) -> DiResult<Self> {
//!         Ok(Greeter { config: args.get::<Config>(0)? })
//!     }
//!
//!     fn dependencies() -> Vec<Dependency> {
//!         vec![Dependency::token("config")]
//!     }
//! }
//!
//! # futures::executor::block_on(async {
//! let container = Container::new();
//! container.set([
//!     Provider::value("config", Config { name: "kiln" }),
//!     Provider::class::<Greeter>(),
//! ])?;
//!
//! let greeter = container.resolve::<Greeter>(&CacheTiers::new()).await?;
//! assert_eq!(greeter.config.name, "kiln");
//! # Ok::<(), DiError>(())
//! # }).unwrap();
//! ```

pub use kiln_graph as graph;

#[cfg(feature = "di")]
pub use kiln_di as di;

#[cfg(feature = "di")]
pub use kiln_di::{
	Arguments, CacheTiers, ClassProvider, Container, ContainerSettings, Dependency, DiError,
	DiResult, EmptyDependency, FactoryProvider, Injectable, Instance, InstanceCache,
	MetadataSource, Provider, Scope, StaticArg, Token, ValueProvider,
};

pub use kiln_graph::{DependencyGraph, GraphError, GraphResult};

/// Commonly used types.
pub mod prelude {
	pub use crate::{DependencyGraph, GraphError};

	#[cfg(feature = "di")]
	pub use crate::{
		Arguments, CacheTiers, ClassProvider, Container, ContainerSettings, Dependency, DiError,
		DiResult, EmptyDependency, FactoryProvider, Injectable, Instance, InstanceCache,
		MetadataSource, Provider, Scope, StaticArg, Token, ValueProvider,
	};
}
