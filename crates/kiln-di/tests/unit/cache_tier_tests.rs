//! Cache tier selection tests

use super::fixtures::{Database, UserRepository, config};
use kiln_di::{CacheTiers, ClassProvider, Container, FactoryProvider, InstanceCache, Scope, Token};
use rstest::*;
use std::sync::Arc;

fn request_scoped_container() -> Container {
	let container = Container::new();
	container
		.set([
			config("x"),
			ClassProvider::new::<Database>().with_scope(Scope::Request).into(),
			ClassProvider::new::<UserRepository>().into(),
		])
		.unwrap();
	container
}

#[rstest]
#[tokio::test]
async fn request_tier_is_reused_within_a_request() {
	// Arrange
	let container = request_scoped_container();
	let request = CacheTiers::request();

	// Act
	let a = container.resolve::<UserRepository>(&request).await.unwrap();
	let b = container.resolve::<UserRepository>(&request).await.unwrap();

	// Assert
	assert!(Arc::ptr_eq(&a, &b));
	assert!(Arc::ptr_eq(&a.db, &b.db));
	let cache = request.get(Scope::Request).unwrap();
	assert!(cache.contains(&Token::of::<Database>()));
	assert!(cache.contains(&Token::of::<UserRepository>()));
	assert!(container.cache().is_empty());
}

#[rstest]
#[tokio::test]
async fn request_tiers_are_isolated() {
	let container = request_scoped_container();

	let a = container.resolve::<UserRepository>(&CacheTiers::request()).await.unwrap();
	let b = container.resolve::<UserRepository>(&CacheTiers::request()).await.unwrap();

	assert!(!Arc::ptr_eq(&a, &b));
	assert!(!Arc::ptr_eq(&a.db, &b.db));
}

#[rstest]
#[tokio::test]
async fn request_scope_without_tier_is_not_cached() {
	let container = request_scoped_container();

	let a = container.resolve::<Database>(&CacheTiers::new()).await.unwrap();
	let b = container.resolve::<Database>(&CacheTiers::new()).await.unwrap();

	assert!(!Arc::ptr_eq(&a, &b));
	assert!(container.cached(&Token::of::<Database>()).is_none());
}

#[rstest]
#[tokio::test]
async fn default_tier_can_be_overridden_per_call() {
	// Arrange
	let container = Container::new();
	container
		.set([config("x"), ClassProvider::new::<Database>().into()])
		.unwrap();
	let scratch = InstanceCache::new();
	let tiers = CacheTiers::new().with(Scope::Default, scratch.clone());

	// Act
	let overridden = container.resolve::<Database>(&tiers).await.unwrap();
	let own = container.resolve::<Database>(&CacheTiers::new()).await.unwrap();

	// Assert
	assert!(!Arc::ptr_eq(&overridden, &own));
	assert!(scratch.contains(&Token::of::<Database>()));
	assert!(container.cache().contains(&Token::of::<Database>()));
}

#[rstest]
#[tokio::test]
async fn deferred_uses_its_own_override_slot() {
	let container = Container::new();
	container
		.set([FactoryProvider::new("lazy", |_| Ok(String::from("ready"))).with_scope(Scope::Deferred)])
		.unwrap();
	let deferred = InstanceCache::new();
	let tiers = CacheTiers::new().with(Scope::Deferred, deferred.clone());

	container
		.instantiate(&Token::name("lazy"), &tiers)
		.await
		.unwrap();

	assert!(deferred.contains(&Token::name("lazy")));
	assert!(container.cache().is_empty());
}

#[rstest]
#[tokio::test]
async fn shared_container_cache_is_seen_by_both_containers() {
	let shared = InstanceCache::new();
	let first = Container::builder().cache(shared.clone()).build();
	let second = Container::builder().cache(shared.clone()).build();
	for container in [&first, &second] {
		container
			.set([config("x"), ClassProvider::new::<Database>().into()])
			.unwrap();
	}

	let a = first.resolve::<Database>(&CacheTiers::new()).await.unwrap();
	let b = second.resolve::<Database>(&CacheTiers::new()).await.unwrap();

	assert!(Arc::ptr_eq(&a, &b));
	assert!(first.cache().same_store(second.cache()));
}

#[rstest]
#[tokio::test]
async fn cached_instance_is_returned_instead_of_rebuilding() {
	let container = Container::new();
	container
		.set([config("x"), ClassProvider::new::<Database>().into()])
		.unwrap();
	let planted = Arc::new(Database {
		config: Arc::new(super::fixtures::Config {
			url: "planted".to_string(),
		}),
	});
	container
		.cache()
		.insert(Token::of::<Database>(), planted.clone());

	let resolved = container.resolve::<Database>(&CacheTiers::new()).await.unwrap();

	assert!(Arc::ptr_eq(&resolved, &planted));
	assert_eq!(resolved.config.url, "planted");
}
