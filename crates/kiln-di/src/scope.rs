//! Provider scopes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifetime category of a provider.
///
/// Scopes are ordered by weight. A heavier (narrower) scope on a dependency
/// propagates to everything that depends on it, so a long-lived instance never
/// holds on to a shorter-lived one.
///
/// | Scope       | Weight | Cache tier                          |
/// |-------------|--------|-------------------------------------|
/// | `Global`    | 100    | process-wide                        |
/// | `Default`   | 200    | container (or caller override)      |
/// | `Deferred`  | 200    | container (or caller override)      |
/// | `Request`   | 300    | caller-supplied only                |
/// | `Transient` | 400    | never cached                        |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
	/// Shared by every container in the process.
	Global,
	/// One instance per container, created eagerly by warm-up.
	#[default]
	Default,
	/// One instance per container, created on first use only.
	Deferred,
	/// One instance per caller-supplied request cache.
	Request,
	/// A fresh instance on every resolution.
	Transient,
}

impl Scope {
	pub const ALL: [Scope; 5] = [
		Scope::Global,
		Scope::Default,
		Scope::Deferred,
		Scope::Request,
		Scope::Transient,
	];

	pub fn weight(self) -> u16 {
		match self {
			Self::Global => 100,
			Self::Default | Self::Deferred => 200,
			Self::Request => 300,
			Self::Transient => 400,
		}
	}

	/// Returns `true` if `self` lives strictly longer than `other`.
	pub fn is_wider_than(self, other: Scope) -> bool {
		self.weight() < other.weight()
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Global => "global",
			Self::Default => "default",
			Self::Deferred => "deferred",
			Self::Request => "request",
			Self::Transient => "transient",
		}
	}
}

impl fmt::Display for Scope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Scope {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"global" => Ok(Self::Global),
			"default" => Ok(Self::Default),
			"deferred" => Ok(Self::Deferred),
			"request" => Ok(Self::Request),
			"transient" => Ok(Self::Transient),
			other => Err(format!("unknown scope: {}", other)),
		}
	}
}
