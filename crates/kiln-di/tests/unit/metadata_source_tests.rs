//! Custom metadata source tests

use kiln_di::{
	Arguments, CacheTiers, Class, Container, ContainerSettings, DeclaredMetadata, Dependency,
	DiResult, Injectable, MetadataSource, Provider, Scope, Token,
};
use rstest::*;
use std::collections::HashMap;
use std::sync::Arc;

/// Declarations kept in a table instead of on the types.
#[derive(Default)]
struct TableMetadata {
	constructors: HashMap<Token, Vec<Dependency>>,
	scopes: HashMap<Token, Scope>,
}

impl TableMetadata {
	fn constructor(mut self, class: Class, dependencies: Vec<Dependency>) -> Self {
		self.constructors.insert(class.token(), dependencies);
		self
	}

	fn scope(mut self, class: Class, scope: Scope) -> Self {
		self.scopes.insert(class.token(), scope);
		self
	}
}

impl MetadataSource for TableMetadata {
	fn constructor_dependencies(&self, class: &Class) -> Vec<Dependency> {
		self.constructors
			.get(&class.token())
			.cloned()
			.unwrap_or_else(|| DeclaredMetadata.constructor_dependencies(class))
	}

	fn property_dependencies(&self, _class: &Class) -> Vec<(String, Dependency)> {
		Vec::new()
	}

	fn extra_dependencies(&self, _class: &Class) -> Vec<Provider> {
		Vec::new()
	}

	fn default_scope(&self, class: &Class) -> Option<Scope> {
		self.scopes.get(&class.token()).copied()
	}
}

struct Greeter {
	greeting: Arc<String>,
}

impl Injectable for Greeter {
	fn construct(args: &Arguments) -> DiResult<Self> {
		Ok(Greeter {
			greeting: args.get::<String>(0)?,
		})
	}

	// Declares nothing; the table supplies its dependencies.
}

#[rstest]
#[tokio::test]
async fn table_metadata_drives_collation_and_construction() {
	// Arrange
	let metadata = TableMetadata::default()
		.constructor(Class::of::<Greeter>(), vec![Dependency::token("greeting")])
		.scope(Class::of::<Greeter>(), Scope::Request);
	let container = Container::builder().metadata(metadata).build();

	// Act
	container
		.set([
			Provider::value("greeting", "hello".to_string()),
			Provider::class::<Greeter>(),
		])
		.unwrap();
	let greeter = container.resolve::<Greeter>(&CacheTiers::request()).await.unwrap();

	// Assert
	assert_eq!(*greeter.greeting, "hello");
	assert_eq!(container.scope_of(&Token::of::<Greeter>()), Some(Scope::Request));
	assert_eq!(
		container.dependencies_of(&Token::of::<Greeter>()).unwrap(),
		vec![Token::name("greeting")]
	);
}

#[rstest]
fn provider_scope_beats_metadata_scope() {
	let metadata = TableMetadata::default().scope(Class::of::<Greeter>(), Scope::Request);
	let container = Container::builder().metadata(metadata).build();

	container
		.set([kiln_di::ClassProvider::new::<Greeter>().with_scope(Scope::Transient)])
		.unwrap();

	assert_eq!(container.scope_of(&Token::of::<Greeter>()), Some(Scope::Transient));
}

#[rstest]
fn settings_from_toml_configure_the_container() {
	// Arrange
	let settings = ContainerSettings::from_toml_str(
		r#"
		default_scope = "transient"
		reject_duplicates = true
		"#,
	)
	.unwrap();

	// Act
	let container = Container::with_settings(settings);
	container
		.set([kiln_di::FactoryProvider::new("id", |_| Ok(1u64))])
		.unwrap();

	// Assert
	assert_eq!(container.scope_of(&Token::name("id")), Some(Scope::Transient));
	assert!(container.settings().auto_register);
	assert!(container.settings().reject_duplicates);
}
