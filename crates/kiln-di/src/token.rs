//! Provider tokens
//!
//! A token is the key a provider is registered under. Types, names and
//! numeric ids can all be used and mixed freely in one container.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Token for a Rust type. Compared and hashed by [`TypeId`] only.
#[derive(Clone, Copy)]
pub struct TypeToken {
	id: TypeId,
	name: &'static str,
}

impl TypeToken {
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: type_name::<T>(),
		}
	}

	pub fn id(&self) -> TypeId {
		self.id
	}

	/// Full type path, as reported by [`std::any::type_name`].
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Type name without its module path.
	pub fn short_name(&self) -> &'static str {
		let base = self.name.split('<').next().unwrap_or(self.name);
		match base.rfind("::") {
			Some(pos) => &self.name[pos + 2..],
			None => self.name,
		}
	}
}

impl PartialEq for TypeToken {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Debug for TypeToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

/// Key of a synthesized empty-dependency node.
///
/// Each synthesized slot gets its own id, so two optional slots asking for the
/// same missing token never share a node.
#[derive(Clone)]
pub struct EmptyKey {
	pub(crate) id: u64,
	pub(crate) requested: Arc<Token>,
}

impl EmptyKey {
	pub fn id(&self) -> u64 {
		self.id
	}

	/// The token the optional slot originally asked for.
	pub fn requested(&self) -> &Token {
		&self.requested
	}
}

impl PartialEq for EmptyKey {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for EmptyKey {}

impl Hash for EmptyKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

/// Opaque provider identifier.
///
/// # Examples
///
/// ```
/// use kiln_di::Token;
///
/// struct Database;
///
/// assert_eq!(Token::of::<Database>(), Token::of::<Database>());
/// assert_eq!(Token::from("config"), Token::name("config"));
/// assert_ne!(Token::id(1), Token::name("1"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Token {
	/// A Rust type used as its own key.
	Type(TypeToken),
	/// A string name.
	Name(Arc<str>),
	/// A numeric id.
	Id(u64),
	/// A synthesized empty-dependency slot.
	Empty(EmptyKey),
}

impl Token {
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self::Type(TypeToken::of::<T>())
	}

	pub fn name(name: impl Into<Arc<str>>) -> Self {
		Self::Name(name.into())
	}

	pub fn id(id: u64) -> Self {
		Self::Id(id)
	}

	pub fn is_empty_slot(&self) -> bool {
		matches!(self, Self::Empty(_))
	}

	/// Short label used in logs and graph renderings.
	pub fn label(&self) -> String {
		match self {
			Self::Type(token) => token.short_name().to_string(),
			other => other.to_string(),
		}
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Type(token) => f.write_str(token.name()),
			Self::Name(name) => f.write_str(name),
			Self::Id(id) => write!(f, "#{}", id),
			Self::Empty(key) => write!(f, "Empty<{}>", key.requested()),
		}
	}
}

impl fmt::Debug for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Type(token) => write!(f, "Type({:?})", token),
			Self::Name(name) => write!(f, "Name({:?})", name),
			Self::Id(id) => write!(f, "Id({})", id),
			Self::Empty(key) => write!(f, "Empty({}, {:?})", key.id, key.requested),
		}
	}
}

impl From<&'static str> for Token {
	fn from(name: &'static str) -> Self {
		Self::name(name)
	}
}

impl From<String> for Token {
	fn from(name: String) -> Self {
		Self::name(name)
	}
}

impl From<u64> for Token {
	fn from(id: u64) -> Self {
		Self::Id(id)
	}
}

impl From<TypeToken> for Token {
	fn from(token: TypeToken) -> Self {
		Self::Type(token)
	}
}

impl From<&Token> for Token {
	fn from(token: &Token) -> Self {
		token.clone()
	}
}
