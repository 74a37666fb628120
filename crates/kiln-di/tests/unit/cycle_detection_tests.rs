//! Circular dependency detection tests

use kiln_di::{
	Arguments, CacheTiers, Container, Dependency, DiError, DiResult, FactoryProvider, Injectable,
	Provider, Scope, Token,
};
use rstest::*;

struct Chicken;

impl Injectable for Chicken {
	fn construct(_args: &Arguments) -> DiResult<Self> {
		Ok(Chicken)
	}

	fn dependencies() -> Vec<Dependency> {
		vec![Dependency::on::<Egg>()]
	}
}

struct Egg;

impl Injectable for Egg {
	fn construct(_args: &Arguments) -> DiResult<Self> {
		Ok(Egg)
	}

	fn dependencies() -> Vec<Dependency> {
		vec![Dependency::on::<Chicken>()]
	}
}

#[rstest]
fn two_node_cycle_is_rejected() {
	// Arrange
	let container = Container::new();

	// Act
	let result = container.set([Provider::class::<Chicken>()]);

	// Assert
	match result {
		Err(DiError::CircularDependency { path }) => {
			assert_eq!(
				path,
				vec![Token::of::<Chicken>(), Token::of::<Egg>(), Token::of::<Chicken>()]
			);
		}
		other => panic!("expected CircularDependency, got {:?}", other),
	}
}

#[rstest]
fn cycle_message_lists_the_path() {
	let container = Container::new();
	let a = FactoryProvider::new("a", |_| Ok(())).with_inject(["b"]);
	let b = FactoryProvider::new("b", |_| Ok(())).with_inject(["c"]);
	let c = FactoryProvider::new("c", |_| Ok(())).with_inject(["a"]);

	let err = container.set([a, b, c]).unwrap_err();

	assert_eq!(err.to_string(), "circular dependency detected: a -> b -> c -> a");
}

#[rstest]
fn cycle_below_the_entrance_reports_only_the_loop() {
	let container = Container::new();
	let root = FactoryProvider::new("root", |_| Ok(())).with_inject(["x"]);
	let x = FactoryProvider::new("x", |_| Ok(())).with_inject(["y"]);
	let y = FactoryProvider::new("y", |_| Ok(())).with_inject(["x"]);

	let err = container.set([root, x, y]).unwrap_err();

	match err {
		DiError::CircularDependency { path } => {
			assert_eq!(path, vec![Token::name("x"), Token::name("y"), Token::name("x")]);
		}
		other => panic!("expected CircularDependency, got {:?}", other),
	}
}

#[rstest]
fn self_dependency_is_a_cycle() {
	let container = Container::new();
	let selfish = FactoryProvider::new("selfish", |_| Ok(())).with_inject(["selfish"]);

	let err = container.set([selfish]).unwrap_err();

	match err {
		DiError::CircularDependency { path } => {
			assert_eq!(path, vec![Token::name("selfish"), Token::name("selfish")]);
		}
		other => panic!("expected CircularDependency, got {:?}", other),
	}
}

#[rstest]
fn diamond_is_not_a_cycle() {
	let container = Container::new();

	let result = container.set([
		Provider::value("base", 1u8),
		FactoryProvider::new("left", |_| Ok(())).with_inject(["base"]).into(),
		FactoryProvider::new("right", |_| Ok(())).with_inject(["base"]).into(),
		FactoryProvider::new("top", |_| Ok(()))
			.with_inject(["left", "right"])
			.into(),
	]);

	assert!(result.is_ok());
}

#[rstest]
fn cycle_closed_by_a_later_batch_is_rejected() {
	// Arrange
	let container = Container::new();
	container
		.set([
			Provider::value("leaf", ()),
			FactoryProvider::new("mid", |_| Ok(())).with_inject(["leaf"]).into(),
			FactoryProvider::new("top", |_| Ok(())).with_inject(["mid"]).into(),
		])
		.unwrap();

	// Act
	let result = container.set([FactoryProvider::new("leaf", |_| Ok(())).with_inject(["top"])]);

	// Assert
	assert!(matches!(result, Err(DiError::CircularDependency { .. })));
	assert!(container.dependencies_of(&Token::name("leaf")).unwrap().is_empty());
	assert_eq!(container.get(&Token::name("leaf")).unwrap().as_provided().unwrap().provider().kind(), "value");
}

#[rstest]
#[tokio::test]
async fn rejected_cycle_leaves_nothing_to_resolve() {
	// Arrange
	let container = Container::new();
	container.set([Provider::class::<Chicken>()]).unwrap_err();

	// Act
	let result = container.resolve::<Chicken>(&CacheTiers::new()).await;

	// Assert
	assert!(!container.contains(&Token::of::<Chicken>()));
	assert!(!container.contains(&Token::of::<Egg>()));
	assert!(container.is_empty());
	assert!(matches!(result, Err(DiError::UndefinedDependency(_))));
}

#[rstest]
fn rejected_batch_keeps_earlier_registrations() {
	// Arrange
	let container = Container::new();
	container
		.set([FactoryProvider::new("clock", |_| Ok(())).with_scope(Scope::Global)])
		.unwrap();

	// Act
	let result = container.set([
		FactoryProvider::new("clock", |_| Ok(()))
			.with_scope(Scope::Transient)
			.with_inject(["ticker"]),
		FactoryProvider::new("ticker", |_| Ok(())).with_inject(["clock"]),
	]);

	// Assert
	assert!(matches!(result, Err(DiError::CircularDependency { .. })));
	assert_eq!(container.len(), 1);
	assert_eq!(container.scope_of(&Token::name("clock")), Some(Scope::Global));
	assert!(container.dependencies_of(&Token::name("clock")).unwrap().is_empty());
}

#[rstest]
#[tokio::test]
async fn failed_collation_does_not_leave_unbubbled_providers() {
	// Arrange
	let container = Container::new();

	// Act
	let result = container.set([
		FactoryProvider::new("session", |_| Ok(())).with_inject(["nonce"]),
		FactoryProvider::new("nonce", |_| Ok(())).with_scope(Scope::Transient),
		FactoryProvider::new("report", |_| Ok(())).with_inject(["missing"]),
	]);

	// Assert
	assert!(matches!(
		result,
		Err(DiError::UnknownDependency { ref missing, .. }) if *missing == Token::name("missing")
	));
	assert!(!container.contains(&Token::name("session")));
	assert!(!container.contains(&Token::name("nonce")));
	assert_eq!(container.scope_of(&Token::name("session")), None);
	let resolved = container
		.instantiate(&Token::name("session"), &CacheTiers::new())
		.await;
	assert!(matches!(resolved, Err(DiError::UndefinedDependency(_))));
}
