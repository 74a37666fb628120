//! Injectable trait for class providers

use std::any::{Any, type_name};
use std::sync::Arc;

use crate::cache::Instance;
use crate::metadata::Dependency;
use crate::provider::Provider;
use crate::scope::Scope;
use crate::token::{Token, TypeToken};
use crate::{DiError, DiResult};

/// A type the container can construct.
///
/// `construct` receives the static arguments of the provider followed by the
/// resolved constructor dependencies, in declaration order. The remaining
/// methods are declarations read by the default metadata source
/// ([`DeclaredMetadata`](crate::DeclaredMetadata)); all of them are optional.
///
/// # Example
///
/// ```rust
/// use kiln_di::{Arguments, Dependency, DiResult, Injectable, Instance, Scope};
/// use std::sync::Arc;
///
/// struct Database;
///
/// impl Injectable for Database {
///     fn construct(_args: &Arguments) -> DiResult<Self> {
///         Ok(Database)
///     }
/// }
///
/// struct UserService {
///     db: Arc<Database>,
///     audit: Option<Instance>,
/// }
///
/// impl Injectable for UserService {
///     fn construct(args: &Arguments) -> DiResult<Self> {
///         Ok(UserService {
///             db: args.get::<Database>(0)?,
///             audit: None,
///         })
///     }
///
///     fn dependencies() -> Vec<Dependency> {
///         vec![Dependency::on::<Database>()]
///     }
///
///     fn properties() -> Vec<(&'static str, Dependency)> {
///         vec![("audit", Dependency::token("audit").optional())]
///     }
///
///     fn scope() -> Option<Scope> {
///         Some(Scope::Request)
///     }
///
///     fn has_property(&self, key: &str) -> bool {
///         key == "audit" && self.audit.is_some()
///     }
///
///     fn set_property(&mut self, key: &str, value: Option<Instance>) -> DiResult<()> {
///         if key == "audit" {
///             self.audit = value;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
	fn construct(args: &Arguments) -> DiResult<Self>;

	/// Constructor dependencies, one per parameter position.
	///
	/// Positions already covered by static arguments are skipped, so the list
	/// describes the whole parameter list including those positions.
	fn dependencies() -> Vec<Dependency> {
		Vec::new()
	}

	/// Dependencies assigned after construction, keyed by property name.
	fn properties() -> Vec<(&'static str, Dependency)> {
		Vec::new()
	}

	/// Providers this type needs registered alongside it.
	fn extra_dependencies() -> Vec<Provider> {
		Vec::new()
	}

	/// Scope used when the provider does not name one.
	fn scope() -> Option<Scope> {
		None
	}

	/// Returns `true` if the property already holds a value and must not be injected.
	fn has_property(&self, _key: &str) -> bool {
		false
	}

	/// Assigns an injected property. `None` means the optional dependency is absent.
	fn set_property(&mut self, _key: &str, _value: Option<Instance>) -> DiResult<()> {
		Ok(())
	}
}

/// A freshly constructed value waiting for its properties.
pub(crate) trait Constructed: Send {
	fn has_property(&self, key: &str) -> bool;
	fn set_property(&mut self, key: &str, value: Option<Instance>) -> DiResult<()>;
	fn into_instance(self: Box<Self>) -> Instance;
}

impl<T: Injectable> Constructed for T {
	fn has_property(&self, key: &str) -> bool {
		Injectable::has_property(self, key)
	}

	fn set_property(&mut self, key: &str, value: Option<Instance>) -> DiResult<()> {
		Injectable::set_property(self, key, value)
	}

	fn into_instance(self: Box<Self>) -> Instance {
		Arc::new(*self)
	}
}

fn construct_erased<T: Injectable>(args: &Arguments) -> DiResult<Box<dyn Constructed>> {
	Ok(Box::new(T::construct(args)?))
}

/// Type-erased handle on an [`Injectable`] type.
#[derive(Clone, Copy)]
pub struct Class {
	token: TypeToken,
	construct: fn(&Arguments) -> DiResult<Box<dyn Constructed>>,
	dependencies: fn() -> Vec<Dependency>,
	properties: fn() -> Vec<(&'static str, Dependency)>,
	extra_dependencies: fn() -> Vec<Provider>,
	scope: fn() -> Option<Scope>,
}

impl Class {
	pub fn of<T: Injectable>() -> Self {
		Self {
			token: TypeToken::of::<T>(),
			construct: construct_erased::<T>,
			dependencies: T::dependencies,
			properties: T::properties,
			extra_dependencies: T::extra_dependencies,
			scope: T::scope,
		}
	}

	/// The class used as its own token.
	pub fn token(&self) -> Token {
		Token::Type(self.token)
	}

	pub fn type_token(&self) -> TypeToken {
		self.token
	}

	pub fn name(&self) -> &'static str {
		self.token.name()
	}

	pub fn declared_dependencies(&self) -> Vec<Dependency> {
		(self.dependencies)()
	}

	pub fn declared_properties(&self) -> Vec<(&'static str, Dependency)> {
		(self.properties)()
	}

	pub fn declared_extra_dependencies(&self) -> Vec<Provider> {
		(self.extra_dependencies)()
	}

	pub fn declared_scope(&self) -> Option<Scope> {
		(self.scope)()
	}

	pub(crate) fn construct(&self, args: &Arguments) -> DiResult<Box<dyn Constructed>> {
		(self.construct)(args)
	}
}

impl PartialEq for Class {
	fn eq(&self, other: &Self) -> bool {
		self.token == other.token
	}
}

impl Eq for Class {}

impl std::fmt::Debug for Class {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Class({})", self.token.name())
	}
}

/// Positional arguments handed to a constructor or factory.
///
/// Static arguments come first, resolved dependencies after them. A slot is
/// `None` when an optional dependency had no provider and no default.
#[derive(Clone, Default)]
pub struct Arguments {
	values: Vec<Option<Instance>>,
}

impl Arguments {
	pub fn new(values: Vec<Option<Instance>>) -> Self {
		Self { values }
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Raw slot value; `None` when the slot is absent or out of range.
	pub fn raw(&self, index: usize) -> Option<&Instance> {
		self.values.get(index).and_then(Option::as_ref)
	}

	/// Reads a required argument.
	///
	/// # Examples
	///
	/// ```
	/// use kiln_di::{Arguments, instance};
	///
	/// let args = Arguments::new(vec![Some(instance(8080u16)), None]);
	///
	/// assert_eq!(*args.get::<u16>(0).unwrap(), 8080);
	/// assert!(args.get::<u16>(1).is_err());
	/// assert!(args.get::<String>(0).is_err());
	/// ```
	pub fn get<T: Any + Send + Sync>(&self, index: usize) -> DiResult<Arc<T>> {
		let value = self.raw(index).ok_or(DiError::ArgumentMissing { index })?;
		downcast(value.clone(), || format!("argument {}", index))
	}

	/// Reads an optional argument; absent slots yield `Ok(None)`.
	pub fn optional<T: Any + Send + Sync>(&self, index: usize) -> DiResult<Option<Arc<T>>> {
		self.raw(index)
			.map(|value| downcast(value.clone(), || format!("argument {}", index)))
			.transpose()
	}

	/// Reads a required argument and clones the value out of its `Arc`.
	pub fn cloned<T: Any + Send + Sync + Clone>(&self, index: usize) -> DiResult<T> {
		self.get::<T>(index).map(|value| (*value).clone())
	}

	pub fn iter(&self) -> impl Iterator<Item = Option<&Instance>> {
		self.values.iter().map(Option::as_ref)
	}
}

impl std::fmt::Debug for Arguments {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list()
			.entries(self.values.iter().map(|value| value.is_some()))
			.finish()
	}
}

pub(crate) fn downcast<T: Any + Send + Sync>(
	value: Instance,
	describe: impl FnOnce() -> String,
) -> DiResult<Arc<T>> {
	value.downcast::<T>().map_err(|_| DiError::TypeMismatch {
		token: describe(),
		expected: type_name::<T>(),
	})
}
