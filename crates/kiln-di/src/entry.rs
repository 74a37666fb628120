//! Graph payloads

use std::sync::Arc;

use crate::empty::EmptyDependency;
use crate::provider::Provider;
use crate::scope::Scope;
use crate::token::Token;

/// A registered provider together with its resolved scope.
#[derive(Clone, Debug)]
pub struct RegistryEntry {
	pub(crate) token: Token,
	pub(crate) provider: Provider,
	pub(crate) declared_scope: Scope,
	pub(crate) scope: Scope,
	pub(crate) constructor_slots: Vec<Token>,
	pub(crate) property_slots: Vec<(String, Token)>,
}

impl RegistryEntry {
	pub(crate) fn new(token: Token, provider: Provider, scope: Scope) -> Self {
		Self {
			token,
			provider,
			declared_scope: scope,
			scope,
			constructor_slots: Vec::new(),
			property_slots: Vec::new(),
		}
	}

	pub fn token(&self) -> &Token {
		&self.token
	}

	pub fn provider(&self) -> &Provider {
		&self.provider
	}

	/// Effective scope, after scope bubbling.
	pub fn scope(&self) -> Scope {
		self.scope
	}

	/// Scope chosen at registration, before scope bubbling.
	pub fn declared_scope(&self) -> Scope {
		self.declared_scope
	}

	/// Graph tokens resolved for each constructor (or factory) argument, in order.
	///
	/// Slots pointing at an optional dependency nobody provides hold the
	/// [`Token::Empty`] key of the synthesized sentinel.
	pub fn constructor_slots(&self) -> &[Token] {
		&self.constructor_slots
	}

	pub fn property_slots(&self) -> &[(String, Token)] {
		&self.property_slots
	}
}

/// Payload of one graph node.
#[derive(Clone, Debug)]
pub enum GraphEntry {
	Provided(Arc<RegistryEntry>),
	Empty(EmptyDependency),
}

impl GraphEntry {
	pub fn token(&self) -> Token {
		match self {
			Self::Provided(entry) => entry.token.clone(),
			Self::Empty(empty) => empty.token(),
		}
	}

	/// Effective scope; empty-dependency nodes have none.
	pub fn scope(&self) -> Option<Scope> {
		match self {
			Self::Provided(entry) => Some(entry.scope),
			Self::Empty(_) => None,
		}
	}

	pub fn as_provided(&self) -> Option<&RegistryEntry> {
		match self {
			Self::Provided(entry) => Some(entry.as_ref()),
			Self::Empty(_) => None,
		}
	}

	pub fn is_empty_dependency(&self) -> bool {
		matches!(self, Self::Empty(_))
	}
}
