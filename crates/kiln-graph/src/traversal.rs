//! Iterative depth-first traversal with cycle detection.
//!
//! The traversal keeps an explicit frame stack instead of recursing, so very
//! deep dependency chains cannot overflow the call stack.

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::ControlFlow;

use crate::error::GraphResult;
use crate::graph::DependencyGraph;

/// Why the visitor is being called for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitKind {
	/// Every dependency of the node has been processed (post-order).
	Finished,
	/// The node was already finished earlier; its subtree is not walked again.
	Revisited,
	/// The node is on the active path: this edge closes a cycle.
	BackEdge,
}

/// The chain of nodes currently being descended, root first.
///
/// The visited node itself is not part of the path, except for a
/// [`VisitKind::BackEdge`] where it appears as the cycle's origin.
pub struct Path<'a, K, V> {
	graph: &'a DependencyGraph<K, V>,
	indices: &'a [usize],
}

impl<'a, K, V> Path<'a, K, V>
where
	K: Eq + Hash + Clone + Debug,
{
	pub fn len(&self) -> usize {
		self.indices.len()
	}

	pub fn is_empty(&self) -> bool {
		self.indices.is_empty()
	}

	/// Iterates over the path from the root towards the visited node.
	pub fn iter(&self) -> impl Iterator<Item = &'a K> + '_ {
		self.indices
			.iter()
			.filter_map(|&index| self.graph.key_at(index))
	}

	/// Position of `key` on the path, if it is there.
	pub fn position(&self, key: &K) -> Option<usize> {
		self.iter().position(|candidate| candidate == key)
	}

	pub fn to_vec(&self) -> Vec<K> {
		self.iter().cloned().collect()
	}
}

/// One call of the traversal visitor.
pub struct Visit<'a, K, V> {
	pub node: &'a K,
	pub data: &'a V,
	pub path: Path<'a, K, V>,
	pub kind: VisitKind,
	/// Whether a back edge has been seen so far in this traversal.
	pub circular: bool,
}

enum Frame {
	Enter(usize),
	Exit(usize),
}

/// Depth-first traversal state shared by one or more roots.
///
/// Nodes finished from an earlier root stay finished, so running several roots
/// through the same traversal walks every subtree once; later roots only see
/// [`VisitKind::Revisited`] calls for the shared parts.
pub struct Traversal<'g, K, V> {
	graph: &'g DependencyGraph<K, V>,
	visited: Vec<bool>,
	on_path: Vec<bool>,
	circular: bool,
}

impl<'g, K, V> Traversal<'g, K, V>
where
	K: Eq + Hash + Clone + Debug,
{
	pub(crate) fn new(graph: &'g DependencyGraph<K, V>) -> Self {
		Self {
			graph,
			visited: vec![false; graph.len()],
			on_path: vec![false; graph.len()],
			circular: false,
		}
	}

	/// Returns `true` once `key` has been finished by this traversal.
	pub fn is_visited(&self, key: &K) -> bool {
		self.graph
			.index_of(key)
			.map(|index| self.visited[index])
			.unwrap_or(false)
	}

	/// Returns `true` if any back edge has been found so far.
	pub fn is_circular(&self) -> bool {
		self.circular
	}

	/// Walks the graph depth-first from `start`.
	///
	/// Dependencies are entered in edge order and each node is reported with
	/// [`VisitKind::Finished`] after all of its dependencies. A node reached
	/// again after it finished is reported as [`VisitKind::Revisited`]; a node
	/// reached while still on the active path is reported as
	/// [`VisitKind::BackEdge`]. Neither is descended again.
	///
	/// Returning [`ControlFlow::Break`] from the visitor stops the traversal at
	/// once and is passed back to the caller.
	pub fn run<F>(&mut self, start: &K, mut visit: F) -> GraphResult<ControlFlow<()>>
	where
		F: FnMut(Visit<'_, K, V>) -> ControlFlow<()>,
	{
		let start_index = self.graph.index_of(start)?;
		let mut stack = vec![Frame::Enter(start_index)];
		let mut path: Vec<usize> = Vec::new();

		while let Some(frame) = stack.pop() {
			let (index, kind) = match frame {
				Frame::Enter(index) if self.on_path[index] => {
					self.circular = true;
					tracing::trace!(node = ?self.graph.key_at(index), "back edge found");
					(index, VisitKind::BackEdge)
				}
				Frame::Enter(index) if self.visited[index] => (index, VisitKind::Revisited),
				Frame::Enter(index) => {
					self.on_path[index] = true;
					path.push(index);
					stack.push(Frame::Exit(index));
					stack.extend(
						self.graph
							.outgoing_at(index)
							.iter()
							.rev()
							.map(|&child| Frame::Enter(child)),
					);
					continue;
				}
				Frame::Exit(index) => {
					path.pop();
					self.on_path[index] = false;
					self.visited[index] = true;
					(index, VisitKind::Finished)
				}
			};

			let (Some(node), Some(data)) = (self.graph.key_at(index), self.graph.data_at(index))
			else {
				continue;
			};
			let flow = visit(Visit {
				node,
				data,
				path: Path {
					graph: self.graph,
					indices: &path,
				},
				kind,
				circular: self.circular,
			});
			if flow.is_break() {
				return Ok(flow);
			}
		}

		Ok(ControlFlow::Continue(()))
	}
}
