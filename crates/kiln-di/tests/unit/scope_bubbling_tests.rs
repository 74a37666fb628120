//! Scope bubbling tests
//!
//! A provider's effective scope is never wider than the scope of anything it
//! depends on, directly or transitively.

use super::fixtures::{Database, UserRepository, UserService, config};
use kiln_di::{ClassProvider, Container, ContainerSettings, FactoryProvider, Provider, Scope, Token};
use rstest::*;

#[rstest]
fn narrow_dependency_narrows_the_whole_chain() {
	// Arrange
	let container = Container::new();

	// Act
	container
		.set([
			config("postgres://localhost"),
			ClassProvider::new::<Database>().with_scope(Scope::Request).into(),
			ClassProvider::new::<UserRepository>().with_scope(Scope::Global).into(),
			Provider::class::<UserService>(),
		])
		.unwrap();

	// Assert
	assert_eq!(container.scope_of(&Token::of::<Database>()), Some(Scope::Request));
	assert_eq!(container.scope_of(&Token::of::<UserRepository>()), Some(Scope::Request));
	assert_eq!(container.scope_of(&Token::of::<UserService>()), Some(Scope::Request));
}

#[rstest]
fn wide_dependency_never_widens_its_dependent() {
	let container = Container::new();

	container
		.set([
			config("x"),
			ClassProvider::new::<Database>().with_scope(Scope::Global).into(),
			ClassProvider::new::<UserRepository>().with_scope(Scope::Transient).into(),
		])
		.unwrap();

	assert_eq!(container.scope_of(&Token::of::<Database>()), Some(Scope::Global));
	assert_eq!(container.scope_of(&Token::of::<UserRepository>()), Some(Scope::Transient));
}

#[rstest]
#[case(Scope::Global)]
#[case(Scope::Default)]
#[case(Scope::Deferred)]
#[case(Scope::Request)]
#[case(Scope::Transient)]
fn value_dependencies_do_not_narrow(#[case] scope: Scope) {
	let container = Container::new();

	container
		.set([
			config("x"),
			ClassProvider::new::<Database>().with_scope(scope).into(),
		])
		.unwrap();

	assert_eq!(container.scope_of(&Token::of::<Database>()), Some(scope));
}

#[rstest]
fn deferred_and_default_do_not_narrow_each_other() {
	let container = Container::new();

	container
		.set([
			Provider::value("seed", 1u8),
			FactoryProvider::new("lazy", |_| Ok(()))
				.with_scope(Scope::Deferred)
				.with_inject(["seed"])
				.into(),
			FactoryProvider::new("eager", |_| Ok(()))
				.with_scope(Scope::Default)
				.with_inject(["lazy"])
				.into(),
		])
		.unwrap();

	assert_eq!(container.scope_of(&Token::name("eager")), Some(Scope::Default));
}

#[rstest]
fn narrowest_branch_of_a_diamond_wins() {
	// Arrange
	let container = Container::new();

	// Act
	container
		.set([
			FactoryProvider::new("top", |_| Ok(()))
				.with_scope(Scope::Global)
				.with_inject(["left", "right"]),
			FactoryProvider::new("left", |_| Ok(()))
				.with_scope(Scope::Global)
				.with_inject(["base"]),
			FactoryProvider::new("right", |_| Ok(())).with_scope(Scope::Request),
			FactoryProvider::new("base", |_| Ok(())).with_scope(Scope::Default),
		])
		.unwrap();

	// Assert
	assert_eq!(container.scope_of(&Token::name("base")), Some(Scope::Default));
	assert_eq!(container.scope_of(&Token::name("left")), Some(Scope::Default));
	assert_eq!(container.scope_of(&Token::name("right")), Some(Scope::Request));
	assert_eq!(container.scope_of(&Token::name("top")), Some(Scope::Request));
}

#[rstest]
fn already_registered_dependency_narrows_new_dependent() {
	let container = Container::new();
	container
		.set([FactoryProvider::new("clock", |_| Ok(())).with_scope(Scope::Transient)])
		.unwrap();

	container
		.set([FactoryProvider::new("scheduler", |_| Ok(()))
			.with_scope(Scope::Global)
			.with_inject(["clock"])])
		.unwrap();

	assert_eq!(container.scope_of(&Token::name("scheduler")), Some(Scope::Transient));
}

#[rstest]
fn settings_default_scope_applies_to_unscoped_providers() {
	let settings = ContainerSettings::builder()
		.default_scope(Scope::Request)
		.build();
	let container = Container::with_settings(settings);

	container
		.set([config("x"), Provider::class::<Database>()])
		.unwrap();

	assert_eq!(container.scope_of(&Token::of::<Database>()), Some(Scope::Request));
	assert_eq!(container.scope_of(&Token::name("config")), Some(Scope::Global));
}

#[rstest]
fn declared_scope_survives_bubbling() {
	let container = Container::new();

	container
		.set([
			FactoryProvider::new("inner", |_| Ok(())).with_scope(Scope::Transient),
			FactoryProvider::new("outer", |_| Ok(()))
				.with_scope(Scope::Global)
				.with_inject(["inner"]),
		])
		.unwrap();

	let entry = container.get(&Token::name("outer")).unwrap();
	let entry = entry.as_provided().unwrap();
	assert_eq!(entry.declared_scope(), Scope::Global);
	assert_eq!(entry.scope(), Scope::Transient);
}
