//! # Kiln Graph
//!
//! Directed dependency multigraph used by the Kiln composition engine.
//!
//! ## Features
//!
//! - **Multi-edges**: the same dependency can be recorded several times
//! - **Arena storage**: nodes are kept in insertion order, edges are indices
//! - **Iterative DFS**: post-order traversal on an explicit stack
//! - **Cycle detection**: back edges are reported with the active path
//!
//! ## Example
//!
//! ```rust
//! use kiln_graph::{DependencyGraph, VisitKind};
//! use std::ops::ControlFlow;
//!
//! let mut graph = DependencyGraph::new();
//! graph.set("A", ());
//! graph.set("B", ());
//! graph.add_dependency(&"A", &"B").unwrap();
//! graph.add_dependency(&"B", &"A").unwrap();
//!
//! let mut cycle = None;
//! graph
//! 	.dfs(&"A", |visit| {
//! 		if visit.kind == VisitKind::BackEdge {
//! 			cycle = Some(visit.path.to_vec());
//! 			return ControlFlow::Break(());
//! 		}
//! 		ControlFlow::Continue(())
//! 	})
//! 	.unwrap();
//!
//! assert_eq!(cycle, Some(vec!["A", "B"]));
//! ```

pub mod error;
pub mod graph;
pub mod traversal;

pub use error::{GraphError, GraphResult};
pub use graph::DependencyGraph;
pub use traversal::{Path, Traversal, Visit, VisitKind};
