//! Dependency graph visualization for development and debugging
//!
//! Renders a container's graph in DOT format, which can be fed to Graphviz.
//!
//! ## Example
//!
//! ```rust
//! use kiln_di::{Container, Provider};
//!
//! let container = Container::new();
//! container.set([Provider::value("port", 8080u16)]).unwrap();
//!
//! let dot = container.to_dot();
//! assert!(dot.starts_with("digraph DependencyGraph {"));
//! ```

use std::collections::HashMap;
use std::fmt::Write;

use crate::container::Container;
use crate::entry::GraphEntry;
use crate::scope::Scope;

impl Container {
	/// Generate DOT output for Graphviz.
	///
	/// Nodes are filled by effective scope; empty-dependency nodes are drawn
	/// dashed. Parallel edges are kept.
	pub fn to_dot(&self) -> String {
		self.read_graph(|graph| {
			let mut ids = HashMap::with_capacity(graph.len());
			let mut output = String::from("digraph DependencyGraph {\n");
			output.push_str("  rankdir=LR;\n");
			output.push_str("  node [shape=box, style=rounded];\n\n");

			for (position, (token, entry)) in graph.iter().enumerate() {
				let id = format!("n{}", position);
				let label = escape(&token.label());
				let _ = match entry {
					GraphEntry::Provided(entry) => writeln!(
						output,
						"  {} [label=\"{}\\n({})\", fillcolor={}, style=filled];",
						id,
						label,
						entry.scope(),
						scope_color(entry.scope())
					),
					GraphEntry::Empty(_) => writeln!(
						output,
						"  {} [label=\"{}\", style=dashed];",
						id, label
					),
				};
				ids.insert(token, id);
			}

			output.push('\n');

			for (from, to) in graph.edges() {
				if let (Some(from), Some(to)) = (ids.get(from), ids.get(to)) {
					let _ = writeln!(output, "  {} -> {};", from, to);
				}
			}

			output.push_str("}\n");
			output
		})
	}

	/// Get statistics about the dependency graph.
	///
	/// # Example
	///
	/// ```rust
	/// use kiln_di::{Container, FactoryProvider, Provider, Scope};
	///
	/// let container = Container::new();
	/// container.set([
	///     Provider::value("base", 2u32),
	///     FactoryProvider::new("square", |args| Ok(*args.get::<u32>(0)? * 2))
	///         .with_inject(["base"])
	///         .with_scope(Scope::Request)
	///         .into(),
	/// ]).unwrap();
	///
	/// let stats = container.statistics();
	/// assert_eq!(stats.node_count, 2);
	/// assert_eq!(stats.edge_count, 1);
	/// assert_eq!(stats.global_count, 1);
	/// assert_eq!(stats.request_count, 1);
	/// ```
	pub fn statistics(&self) -> GraphStatistics {
		self.read_graph(|graph| {
			let mut stats = GraphStatistics {
				node_count: graph.len(),
				edge_count: graph.edge_count(),
				..GraphStatistics::default()
			};
			for (_, entry) in graph.iter() {
				match entry.scope() {
					Some(Scope::Global) => stats.global_count += 1,
					Some(Scope::Default) => stats.default_count += 1,
					Some(Scope::Deferred) => stats.deferred_count += 1,
					Some(Scope::Request) => stats.request_count += 1,
					Some(Scope::Transient) => stats.transient_count += 1,
					None => stats.empty_count += 1,
				}
			}
			stats
		})
	}
}

fn scope_color(scope: Scope) -> &'static str {
	match scope {
		Scope::Global => "lightblue",
		Scope::Default | Scope::Deferred => "lightgreen",
		Scope::Request => "lightyellow",
		Scope::Transient => "lightpink",
	}
}

fn escape(label: &str) -> String {
	label.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Statistics about a container's dependency graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphStatistics {
	/// Total number of nodes
	pub node_count: usize,
	/// Total number of edges, parallel edges included
	pub edge_count: usize,
	pub global_count: usize,
	pub default_count: usize,
	pub deferred_count: usize,
	pub request_count: usize,
	pub transient_count: usize,
	/// Number of empty-dependency nodes
	pub empty_count: usize,
}
