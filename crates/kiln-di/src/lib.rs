//! # Kiln Dependency Injection
//!
//! Runtime composition engine: register providers under tokens, let the
//! container work out the dependency graph, and instantiate on demand.
//!
//! ## Features
//!
//! - **Providers**: injectable types, sync or async factories, fixed values
//! - **Metadata-driven**: dependencies come from a pluggable [`MetadataSource`]
//! - **Auto-registration**: undeclared class dependencies are registered on the fly
//! - **Optional dependencies**: missing optional slots resolve to a default or nothing
//! - **Cycle detection**: registration fails on circular dependencies
//! - **Scope bubbling**: a provider never outlives the dependencies it captures
//! - **Tiered caches**: global, per container, and caller-owned request tiers
//!
//! ## Development Tools (dev-tools feature)
//!
//! Enabled by default. Adds `Container::to_dot` for Graphviz output and
//! `Container::statistics` for node, edge and per-scope counts.
//!
//! ## Scopes
//!
//! | scope       | lifetime                                          |
//! |-------------|---------------------------------------------------|
//! | `Global`    | one instance per process, shared by all containers |
//! | `Default`   | one instance per container                         |
//! | `Deferred`  | like `Default`, skipped by [`Container::warm_up`]  |
//! | `Request`   | one instance per caller-supplied request tier      |
//! | `Transient` | a new instance on every resolution                 |
//!
//! ## Example
//!
//! ```rust
//! use kiln_di::{Arguments, CacheTiers, Container, Dependency, DiResult, Injectable, Scope};
//! use std::sync::Arc;
//!
//! struct Database;
//!
//! impl Injectable for Database {
//!     fn construct(_args: &Arguments) -> DiResult<Self> {
//!         Ok(Database)
//!     }
//! }
//!
//! struct Session {
//!     db: Arc<Database>,
//! }
//!
//! impl Injectable for Session {
//!     fn construct(args: &Arguments) -> DiResult<Self> {
//!         Ok(Session { db: args.get::<Database>(0)? })
//!     }
//!
//!     fn dependencies() -> Vec<Dependency> {
//!         vec![Dependency::on::<Database>()]
//!     }
//!
//!     fn scope() -> Option<Scope> {
//!         Some(Scope::Request)
//!     }
//! }
//!
//! # futures::executor::block_on(async {
//! let container = Container::new();
//! // Database is registered automatically.
//! container.set([kiln_di::Provider::class::<Session>()])?;
//!
//! let request = CacheTiers::request();
//! let first = container.resolve::<Session>(&request).await?;
//! let again = container.resolve::<Session>(&request).await?;
//! assert!(Arc::ptr_eq(&first, &again));
//!
//! let other = container.resolve::<Session>(&CacheTiers::request()).await?;
//! assert!(!Arc::ptr_eq(&first, &other));
//! assert!(Arc::ptr_eq(&first.db, &other.db));
//! # Ok::<(), kiln_di::DiError>(())
//! # }).unwrap();
//! ```

pub mod cache;
pub mod container;
pub mod empty;
pub mod entry;
pub mod error;
pub mod injectable;
pub mod metadata;
pub mod provider;
mod registration;
pub mod resolver;
pub mod scope;
pub mod settings;
pub mod token;
#[cfg(feature = "dev-tools")]
pub mod visualization;

pub use cache::{CacheTiers, Instance, InstanceCache, global_cache, instance};
pub use container::{Container, ContainerBuilder};
pub use empty::EmptyDependency;
pub use entry::{GraphEntry, RegistryEntry};
pub use error::{DiError, DiResult};
pub use injectable::{Arguments, Class, Injectable};
pub use metadata::{DeclaredMetadata, Dependency, MetadataSource};
pub use provider::{ClassProvider, FactoryFn, FactoryProvider, Provider, StaticArg, Thunk, ValueProvider};
pub use scope::Scope;
pub use settings::{ContainerSettings, ContainerSettingsBuilder};
pub use token::{EmptyKey, Token, TypeToken};
#[cfg(feature = "dev-tools")]
pub use visualization::GraphStatistics;
