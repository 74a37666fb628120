//! Provider descriptors
//!
//! A provider tells the container how to produce the value for a token:
//! construct an [`Injectable`] type, call a factory, or hand out a fixed value.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::cache::{Instance, instance};
use crate::container::Container;
use crate::empty::EmptyDependency;
use crate::injectable::{Arguments, Class, Injectable};
use crate::scope::Scope;
use crate::token::Token;
use crate::DiResult;

/// Function computing a static argument at instantiation time.
pub type Thunk = Arc<dyn Fn(&Container) -> DiResult<Instance> + Send + Sync>;

/// Factory producing an instance from its arguments.
pub type FactoryFn = Arc<dyn Fn(Arguments) -> BoxFuture<'static, DiResult<Instance>> + Send + Sync>;

/// Leading argument passed before resolved dependencies.
#[derive(Clone)]
pub enum StaticArg {
	/// A fixed value.
	Value(Instance),
	/// Evaluated right before each construction.
	Thunk(Thunk),
}

impl StaticArg {
	pub fn value<T: Any + Send + Sync>(value: T) -> Self {
		Self::Value(instance(value))
	}

	/// A lazily computed argument.
	///
	/// # Examples
	///
	/// ```
	/// use kiln_di::StaticArg;
	///
	/// let arg = StaticArg::thunk(|container| Ok(container.len()));
	/// ```
	pub fn thunk<F, T>(f: F) -> Self
	where
		F: Fn(&Container) -> DiResult<T> + Send + Sync + 'static,
		T: Any + Send + Sync,
	{
		Self::Thunk(Arc::new(move |container| f(container).map(instance)))
	}

	pub(crate) fn evaluate(&self, container: &Container) -> DiResult<Instance> {
		match self {
			Self::Value(value) => Ok(value.clone()),
			Self::Thunk(thunk) => thunk(container),
		}
	}
}

impl fmt::Debug for StaticArg {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Value(_) => f.write_str("Value"),
			Self::Thunk(_) => f.write_str("Thunk"),
		}
	}
}

/// Provider constructing an [`Injectable`] type.
#[derive(Clone, Debug)]
pub struct ClassProvider {
	token: Token,
	class: Class,
	scope: Option<Scope>,
	static_args: Vec<StaticArg>,
}

impl ClassProvider {
	/// Provider for `T`, registered under `T`'s own token.
	pub fn new<T: Injectable>() -> Self {
		Self::from_class(Class::of::<T>())
	}

	pub fn from_class(class: Class) -> Self {
		Self {
			token: class.token(),
			class,
			scope: None,
			static_args: Vec::new(),
		}
	}

	pub fn with_token(mut self, token: impl Into<Token>) -> Self {
		self.token = token.into();
		self
	}

	pub fn with_scope(mut self, scope: Scope) -> Self {
		self.scope = Some(scope);
		self
	}

	pub fn with_static_args(mut self, args: Vec<StaticArg>) -> Self {
		self.static_args = args;
		self
	}

	pub fn with_static_arg(mut self, arg: StaticArg) -> Self {
		self.static_args.push(arg);
		self
	}

	pub fn token(&self) -> &Token {
		&self.token
	}

	pub fn class(&self) -> &Class {
		&self.class
	}

	pub fn scope(&self) -> Option<Scope> {
		self.scope
	}

	pub fn static_args(&self) -> &[StaticArg] {
		&self.static_args
	}
}

/// Provider calling a factory function.
#[derive(Clone)]
pub struct FactoryProvider {
	token: Token,
	factory: FactoryFn,
	scope: Option<Scope>,
	inject: Vec<Token>,
	static_args: Vec<StaticArg>,
}

impl FactoryProvider {
	/// Provider backed by a synchronous factory.
	///
	/// # Examples
	///
	/// ```
	/// use kiln_di::{FactoryProvider, Scope};
	///
	/// let provider = FactoryProvider::new("base_url", |args| {
	///     let host = args.get::<String>(0)?;
	///     Ok(format!("https://{}", host))
	/// })
	/// .with_inject(["host"])
	/// .with_scope(Scope::Request);
	/// ```
	pub fn new<F, T>(token: impl Into<Token>, factory: F) -> Self
	where
		F: Fn(&Arguments) -> DiResult<T> + Send + Sync + 'static,
		T: Any + Send + Sync,
	{
		let factory: FactoryFn =
			Arc::new(move |args: Arguments| futures::future::ready(factory(&args).map(instance)).boxed());
		Self::from_fn(token, factory)
	}

	/// Provider backed by an asynchronous factory.
	///
	/// The future is awaited before anything is cached.
	pub fn from_async<F, Fut, T>(token: impl Into<Token>, factory: F) -> Self
	where
		F: Fn(Arguments) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = DiResult<T>> + Send + 'static,
		T: Any + Send + Sync,
	{
		let factory: FactoryFn = Arc::new(move |args: Arguments| {
			let future = factory(args);
			async move { future.await.map(instance) }.boxed()
		});
		Self::from_fn(token, factory)
	}

	/// Provider backed by an already type-erased factory.
	pub fn from_fn(token: impl Into<Token>, factory: FactoryFn) -> Self {
		Self {
			token: token.into(),
			factory,
			scope: None,
			inject: Vec::new(),
			static_args: Vec::new(),
		}
	}

	pub fn with_scope(mut self, scope: Scope) -> Self {
		self.scope = Some(scope);
		self
	}

	/// Tokens resolved and passed after the static arguments, in order.
	pub fn with_inject<I>(mut self, tokens: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<Token>,
	{
		self.inject = tokens.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_static_args(mut self, args: Vec<StaticArg>) -> Self {
		self.static_args = args;
		self
	}

	pub fn token(&self) -> &Token {
		&self.token
	}

	pub fn scope(&self) -> Option<Scope> {
		self.scope
	}

	pub fn inject(&self) -> &[Token] {
		&self.inject
	}

	pub fn static_args(&self) -> &[StaticArg] {
		&self.static_args
	}

	pub(crate) fn call(&self, args: Arguments) -> BoxFuture<'static, DiResult<Instance>> {
		(self.factory)(args)
	}
}

impl fmt::Debug for FactoryProvider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FactoryProvider")
			.field("token", &self.token)
			.field("scope", &self.scope)
			.field("inject", &self.inject)
			.field("static_args", &self.static_args)
			.finish()
	}
}

/// Provider handing out a fixed value.
#[derive(Clone)]
pub struct ValueProvider {
	token: Token,
	value: Instance,
}

impl ValueProvider {
	pub fn new<T: Any + Send + Sync>(token: impl Into<Token>, value: T) -> Self {
		Self::from_instance(token, instance(value))
	}

	pub fn from_instance(token: impl Into<Token>, value: Instance) -> Self {
		Self {
			token: token.into(),
			value,
		}
	}

	pub fn token(&self) -> &Token {
		&self.token
	}

	pub fn value(&self) -> &Instance {
		&self.value
	}
}

impl fmt::Debug for ValueProvider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ValueProvider")
			.field("token", &self.token)
			.finish_non_exhaustive()
	}
}

/// Anything the container accepts for registration.
#[derive(Clone, Debug)]
pub enum Provider {
	Class(ClassProvider),
	Factory(FactoryProvider),
	Value(ValueProvider),
	/// Registers an empty-dependency node; nothing is provided for it.
	Empty(EmptyDependency),
}

impl Provider {
	/// Self-token class provider for `T`.
	pub fn class<T: Injectable>() -> Self {
		Self::Class(ClassProvider::new::<T>())
	}

	pub fn value<T: Any + Send + Sync>(token: impl Into<Token>, value: T) -> Self {
		Self::Value(ValueProvider::new(token, value))
	}

	pub fn factory<F, T>(token: impl Into<Token>, factory: F) -> Self
	where
		F: Fn(&Arguments) -> DiResult<T> + Send + Sync + 'static,
		T: Any + Send + Sync,
	{
		Self::Factory(FactoryProvider::new(token, factory))
	}

	pub fn token(&self) -> Token {
		match self {
			Self::Class(provider) => provider.token.clone(),
			Self::Factory(provider) => provider.token.clone(),
			Self::Value(provider) => provider.token.clone(),
			Self::Empty(empty) => empty.token(),
		}
	}

	/// Scope named on the provider itself.
	pub fn explicit_scope(&self) -> Option<Scope> {
		match self {
			Self::Class(provider) => provider.scope,
			Self::Factory(provider) => provider.scope,
			Self::Value(_) | Self::Empty(_) => None,
		}
	}

	pub fn kind(&self) -> &'static str {
		match self {
			Self::Class(_) => "class",
			Self::Factory(_) => "factory",
			Self::Value(_) => "value",
			Self::Empty(_) => "empty",
		}
	}
}

impl From<Class> for Provider {
	fn from(class: Class) -> Self {
		Self::Class(ClassProvider::from_class(class))
	}
}

impl From<ClassProvider> for Provider {
	fn from(provider: ClassProvider) -> Self {
		Self::Class(provider)
	}
}

impl From<FactoryProvider> for Provider {
	fn from(provider: FactoryProvider) -> Self {
		Self::Factory(provider)
	}
}

impl From<ValueProvider> for Provider {
	fn from(provider: ValueProvider) -> Self {
		Self::Value(provider)
	}
}

impl From<EmptyDependency> for Provider {
	fn from(empty: EmptyDependency) -> Self {
		Self::Empty(empty)
	}
}
