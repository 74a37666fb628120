//! Directed multigraph keyed by opaque node identifiers.
//!
//! Nodes live in an insertion-ordered arena; edges are stored as indices into
//! that arena, once in the source's outgoing list and once in the target's
//! incoming list. Parallel edges are kept, so a node that needs the same
//! dependency twice has two outgoing entries for it.

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::ControlFlow;

use indexmap::IndexMap;

use crate::error::{GraphError, GraphResult};
use crate::traversal::{Traversal, Visit};

#[derive(Clone)]
struct Node<V> {
	data: V,
	outgoing: Vec<usize>,
	incoming: Vec<usize>,
}

/// Dependency graph over keys `K` with per-node payload `V`.
///
/// # Examples
///
/// ```
/// use kiln_graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::new();
/// graph.set("UserService", "request");
/// graph.set("Database", "default");
/// graph.add_dependency(&"UserService", &"Database").unwrap();
///
/// assert_eq!(graph.dependencies(&"UserService").unwrap(), vec![&"Database"]);
/// assert_eq!(graph.dependents(&"Database").unwrap(), vec![&"UserService"]);
/// ```
#[derive(Clone)]
pub struct DependencyGraph<K, V> {
	nodes: IndexMap<K, Node<V>>,
}

impl<K, V> DependencyGraph<K, V>
where
	K: Eq + Hash + Clone + Debug,
{
	/// Creates an empty graph.
	pub fn new() -> Self {
		Self {
			nodes: IndexMap::new(),
		}
	}

	/// Inserts a node or replaces the payload of an existing one.
	///
	/// Edge lists are created on first insertion only; re-inserting a key keeps
	/// every edge it already has. Returns `true` when the node is new.
	pub fn set(&mut self, key: K, data: V) -> bool {
		match self.nodes.get_mut(&key) {
			Some(node) => {
				node.data = data;
				false
			}
			None => {
				self.nodes.insert(
					key,
					Node {
						data,
						outgoing: Vec::new(),
						incoming: Vec::new(),
					},
				);
				true
			}
		}
	}

	/// Returns `true` if the key has a node.
	pub fn contains(&self, key: &K) -> bool {
		self.nodes.contains_key(key)
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Returns `true` if the graph has no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Total number of edges, parallel edges included.
	pub fn edge_count(&self) -> usize {
		self.nodes.values().map(|node| node.outgoing.len()).sum()
	}

	pub fn get(&self, key: &K) -> Option<&V> {
		self.nodes.get(key).map(|node| &node.data)
	}

	pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
		self.nodes.get_mut(key).map(|node| &mut node.data)
	}

	/// Iterates over nodes in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
		self.nodes.iter().map(|(key, node)| (key, &node.data))
	}

	/// Iterates over payloads mutably, in insertion order.
	pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> {
		self.nodes.iter_mut().map(|(key, node)| (key, &mut node.data))
	}

	/// Iterates over every edge as `(from, to)`, grouped by source in insertion order.
	pub fn edges(&self) -> impl Iterator<Item = (&K, &K)> {
		self.nodes.iter().flat_map(move |(from, node)| {
			node.outgoing
				.iter()
				.filter_map(move |&index| self.key_at(index).map(|to| (from, to)))
		})
	}

	/// Records that `from` depends on `to`.
	///
	/// Both endpoints must already be nodes. Adding the same pair again adds a
	/// parallel edge.
	pub fn add_dependency(&mut self, from: &K, to: &K) -> GraphResult<()> {
		let from_index = self.index_of(from)?;
		let to_index = self.index_of(to)?;

		if let Some((_, node)) = self.nodes.get_index_mut(from_index) {
			node.outgoing.push(to_index);
		}
		if let Some((_, node)) = self.nodes.get_index_mut(to_index) {
			node.incoming.push(from_index);
		}
		Ok(())
	}

	/// Keys `key` depends on, in the order the edges were added.
	pub fn dependencies(&self, key: &K) -> GraphResult<Vec<&K>> {
		let node = self.node(key)?;
		Ok(self.keys_of(&node.outgoing))
	}

	/// Keys that depend on `key`, in the order the edges were added.
	pub fn dependents(&self, key: &K) -> GraphResult<Vec<&K>> {
		let node = self.node(key)?;
		Ok(self.keys_of(&node.incoming))
	}

	/// Starts a traversal whose visited set persists across several roots.
	pub fn traversal(&self) -> Traversal<'_, K, V> {
		Traversal::new(self)
	}

	/// Runs a single-root depth-first traversal from `start`.
	///
	/// See [`Traversal::run`] for the visiting order.
	pub fn dfs<F>(&self, start: &K, visit: F) -> GraphResult<ControlFlow<()>>
	where
		F: FnMut(Visit<'_, K, V>) -> ControlFlow<()>,
	{
		self.traversal().run(start, visit)
	}

	pub(crate) fn index_of(&self, key: &K) -> GraphResult<usize> {
		self.nodes
			.get_index_of(key)
			.ok_or_else(|| GraphError::MissingNode(format!("{:?}", key)))
	}

	pub(crate) fn key_at(&self, index: usize) -> Option<&K> {
		self.nodes.get_index(index).map(|(key, _)| key)
	}

	pub(crate) fn data_at(&self, index: usize) -> Option<&V> {
		self.nodes.get_index(index).map(|(_, node)| &node.data)
	}

	pub(crate) fn outgoing_at(&self, index: usize) -> &[usize] {
		self.nodes
			.get_index(index)
			.map(|(_, node)| node.outgoing.as_slice())
			.unwrap_or(&[])
	}

	fn node(&self, key: &K) -> GraphResult<&Node<V>> {
		self.nodes
			.get(key)
			.ok_or_else(|| GraphError::MissingNode(format!("{:?}", key)))
	}

	fn keys_of(&self, indices: &[usize]) -> Vec<&K> {
		indices
			.iter()
			.filter_map(|&index| self.key_at(index))
			.collect()
	}
}

impl<K, V> Default for DependencyGraph<K, V>
where
	K: Eq + Hash + Clone + Debug,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<K: Debug, V> Debug for DependencyGraph<K, V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DependencyGraph")
			.field("nodes", &self.nodes.keys().collect::<Vec<_>>())
			.finish()
	}
}
