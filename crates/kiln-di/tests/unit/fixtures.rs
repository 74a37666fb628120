//! Shared test services
//!
//! None of these declare `Scope::Global`: the global tier is shared by the
//! whole test binary.

use kiln_di::{Arguments, Dependency, DiResult, Injectable, Provider};
use std::sync::Arc;

pub struct Config {
	pub url: String,
}

pub fn config(url: &str) -> Provider {
	Provider::value(
		"config",
		Config {
			url: url.to_string(),
		},
	)
}

pub struct Database {
	pub config: Arc<Config>,
}

impl Injectable for Database {
	fn construct(args: &Arguments) -> DiResult<Self> {
		Ok(Database {
			config: args.get::<Config>(0)?,
		})
	}

	fn dependencies() -> Vec<Dependency> {
		vec![Dependency::token("config")]
	}
}

pub struct UserRepository {
	pub db: Arc<Database>,
}

impl Injectable for UserRepository {
	fn construct(args: &Arguments) -> DiResult<Self> {
		Ok(UserRepository {
			db: args.get::<Database>(0)?,
		})
	}

	fn dependencies() -> Vec<Dependency> {
		vec![Dependency::on::<Database>()]
	}
}

pub struct UserService {
	pub repo: Arc<UserRepository>,
}

impl Injectable for UserService {
	fn construct(args: &Arguments) -> DiResult<Self> {
		Ok(UserService {
			repo: args.get::<UserRepository>(0)?,
		})
	}

	fn dependencies() -> Vec<Dependency> {
		vec![Dependency::on::<UserRepository>()]
	}
}
