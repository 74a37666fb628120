//! Provider registration
//!
//! One call to [`Container::set`] runs a single [`Registration`]: providers are
//! inserted as graph nodes, their declared dependencies are turned into edges
//! (registering undeclared classes along the way), and a final traversal over
//! everything the batch touched rejects cycles and bubbles scopes.

use std::collections::{HashMap, HashSet, VecDeque};
use std::ops::ControlFlow;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use kiln_graph::VisitKind;

use crate::container::{Container, Graph};
use crate::empty::EmptyDependency;
use crate::entry::{GraphEntry, RegistryEntry};
use crate::metadata::Dependency;
use crate::provider::{ClassProvider, FactoryProvider, Provider};
use crate::scope::Scope;
use crate::token::Token;
use crate::{DiError, DiResult};

/// Where a dependency was declared on its owner.
enum Slot {
	Parameter(usize),
	Property(String),
}

pub(crate) struct Registration<'c, 'g> {
	container: &'c Container,
	graph: &'g mut Graph,
	/// Providers whose edges still have to be collated.
	pending: VecDeque<Token>,
	/// Traversal roots, in registration order.
	entrances: Vec<Token>,
	/// Tokens that replaced an existing registration.
	replaced: Vec<Token>,
}

impl<'c, 'g> Registration<'c, 'g> {
	pub(crate) fn new(container: &'c Container, graph: &'g mut Graph) -> Self {
		Self {
			container,
			graph,
			pending: VecDeque::new(),
			entrances: Vec::new(),
			replaced: Vec::new(),
		}
	}

	/// Inserts one provider as a graph node.
	pub(crate) fn register(&mut self, provider: Provider) -> DiResult<()> {
		let token = provider.token();

		if let Provider::Empty(empty) = provider {
			trace!(token = %token, "registering empty dependency");
			self.graph.set(token, GraphEntry::Empty(empty));
			return Ok(());
		}

		if self.graph.contains(&token) {
			if self.container.settings().reject_duplicates {
				return Err(DiError::DuplicateProvider(token));
			}
			warn!(token = %token, "replacing existing provider");
			self.replaced.push(token.clone());
		}

		let scope = self.declared_scope(&provider);
		debug!(token = %token, kind = provider.kind(), scope = %scope, "registering provider");

		let entry = RegistryEntry::new(token.clone(), provider, scope);
		self.graph
			.set(token.clone(), GraphEntry::Provided(Arc::new(entry)));
		self.pending.push_back(token.clone());
		self.entrances.push(token);
		Ok(())
	}

	/// Scope from the provider, then the class declaration, then the settings.
	///
	/// Fixed values never narrow their dependents, so they count as global.
	fn declared_scope(&self, provider: &Provider) -> Scope {
		if let Some(scope) = provider.explicit_scope() {
			return scope;
		}
		match provider {
			Provider::Value(_) => Scope::Global,
			Provider::Class(class) => self
				.container
				.metadata()
				.default_scope(class.class())
				.unwrap_or(self.container.settings().default_scope),
			_ => self.container.settings().default_scope,
		}
	}

	/// Collates edges for every pending provider, including the ones
	/// registered while collating.
	pub(crate) fn collate(&mut self) -> DiResult<()> {
		while let Some(token) = self.pending.pop_front() {
			let Some(GraphEntry::Provided(entry)) = self.graph.get(&token) else {
				continue;
			};
			match entry.provider.clone() {
				Provider::Class(provider) => self.collate_class(&token, &provider)?,
				Provider::Factory(provider) => self.collate_factory(&token, &provider)?,
				Provider::Value(_) | Provider::Empty(_) => {}
			}
		}
		Ok(())
	}

	fn collate_class(&mut self, owner: &Token, provider: &ClassProvider) -> DiResult<()> {
		let metadata = self.container.metadata();
		let class = provider.class();

		// Leading parameters are covered by static arguments.
		let mut constructor_slots = Vec::new();
		for (index, dependency) in metadata
			.constructor_dependencies(class)
			.into_iter()
			.enumerate()
			.skip(provider.static_args().len())
		{
			constructor_slots.push(self.link(owner, dependency, Slot::Parameter(index))?);
		}

		let mut property_slots = Vec::new();
		for (key, dependency) in metadata.property_dependencies(class) {
			let slot = self.link(owner, dependency, Slot::Property(key.clone()))?;
			property_slots.push((key, slot));
		}

		for extra in metadata.extra_dependencies(class) {
			let token = extra.token();
			if !self.graph.contains(&token) {
				trace!(owner = %owner, token = %token, "registering extra dependency");
				self.register(extra)?;
			}
			self.graph.add_dependency(owner, &token)?;
		}

		self.store_slots(owner, constructor_slots, property_slots);
		Ok(())
	}

	fn collate_factory(&mut self, owner: &Token, provider: &FactoryProvider) -> DiResult<()> {
		let offset = provider.static_args().len();
		let mut slots = Vec::with_capacity(provider.inject().len());
		for (position, token) in provider.inject().iter().enumerate() {
			if !self.graph.contains(token) {
				return Err(DiError::UnknownDependency {
					owner: owner.clone(),
					index: offset + position,
					missing: token.clone(),
				});
			}
			self.graph.add_dependency(owner, token)?;
			slots.push(token.clone());
		}
		self.store_slots(owner, slots, Vec::new());
		Ok(())
	}

	/// Resolves one declared dependency to a graph node and adds the edge.
	fn link(&mut self, owner: &Token, dependency: Dependency, slot: Slot) -> DiResult<Token> {
		let target = if self.graph.contains(&dependency.token) {
			dependency.token
		} else if dependency.optional {
			let empty = EmptyDependency::with_instance(dependency.token, dependency.default);
			let token = empty.token();
			trace!(owner = %owner, token = %token, "substituting empty dependency");
			self.graph.set(token.clone(), GraphEntry::Empty(empty));
			token
		} else if let Some(class) = dependency
			.class
			.filter(|_| self.container.settings().auto_register)
		{
			debug!(owner = %owner, token = %dependency.token, "auto-registering dependency");
			let token = dependency.token;
			self.register(ClassProvider::from_class(class).with_token(token.clone()).into())?;
			token
		} else {
			return Err(match slot {
				Slot::Parameter(index) => DiError::UnknownDependency {
					owner: owner.clone(),
					index,
					missing: dependency.token,
				},
				Slot::Property(key) => DiError::UnknownPropertyDependency {
					owner: owner.clone(),
					key,
					missing: dependency.token,
				},
			});
		};

		self.graph.add_dependency(owner, &target)?;
		Ok(target)
	}

	fn store_slots(
		&mut self,
		owner: &Token,
		constructor_slots: Vec<Token>,
		property_slots: Vec<(String, Token)>,
	) {
		if let Some(GraphEntry::Provided(entry)) = self.graph.get_mut(owner) {
			let entry = Arc::make_mut(entry);
			entry.constructor_slots = constructor_slots;
			entry.property_slots = property_slots;
		}
	}

	/// Rejects cycles and bubbles scopes over everything reachable from the
	/// batch.
	///
	/// A replaced provider may have changed scope, so whatever depends on it
	/// is walked as well.
	pub(crate) fn finish(mut self) -> DiResult<()> {
		let roots = self.roots();
		let graph: &Graph = &*self.graph;

		let mut narrowed: HashMap<Token, Scope> = HashMap::new();
		let mut failure = None;
		let mut traversal = graph.traversal();

		for root in &roots {
			if traversal.is_visited(root) {
				continue;
			}
			let flow = traversal.run(root, |visit| {
				if visit.kind == VisitKind::BackEdge || visit.circular {
					let origin = visit.path.position(visit.node).unwrap_or(0);
					let mut path: Vec<Token> = visit.path.iter().skip(origin).cloned().collect();
					path.push(visit.node.clone());
					failure = Some(DiError::CircularDependency { path });
					return ControlFlow::Break(());
				}

				let Some(scope) = narrowed
					.get(visit.node)
					.copied()
					.or_else(|| visit.data.scope())
				else {
					return ControlFlow::Continue(());
				};

				for ancestor in visit.path.iter() {
					let current = narrowed
						.get(ancestor)
						.copied()
						.or_else(|| graph.get(ancestor).and_then(GraphEntry::scope));
					if current.is_some_and(|current| current.is_wider_than(scope)) {
						trace!(token = %ancestor, scope = %scope, "narrowing scope");
						narrowed.insert(ancestor.clone(), scope);
					}
				}
				ControlFlow::Continue(())
			})?;

			if flow.is_break() {
				if let Some(err) = failure.take() {
					warn!(error = %err, "rejecting registration");
					return Err(err);
				}
			}
		}

		for (token, scope) in narrowed {
			if let Some(GraphEntry::Provided(entry)) = self.graph.get_mut(&token) {
				debug!(token = %token, from = %entry.scope, to = %scope, "scope bubbled");
				Arc::make_mut(entry).scope = scope;
			}
		}
		Ok(())
	}

	/// The batch's entrances followed by every transitive dependent of a
	/// replaced provider.
	fn roots(&mut self) -> Vec<Token> {
		let mut roots = std::mem::take(&mut self.entrances);
		let mut seen: HashSet<Token> = roots.iter().cloned().collect();
		let mut queue: VecDeque<Token> = std::mem::take(&mut self.replaced).into();

		while let Some(token) = queue.pop_front() {
			let Ok(dependents) = self.graph.dependents(&token) else {
				continue;
			};
			for dependent in dependents {
				if seen.insert(dependent.clone()) {
					roots.push(dependent.clone());
					queue.push_back(dependent.clone());
				}
			}
		}
		roots
	}
}
