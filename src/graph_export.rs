//! Dependency graph export.
//!
//! Builds a serializable graph of the container's registrations, with edges
//! taken from declared dependency lists, and renders it as JSON or Graphviz
//! DOT. Only available with the `graph-export` feature.

use std::fmt;

use serde::Serialize;

use crate::provider::ServiceProvider;

/// Exportable snapshot of the container's registrations and declared edges.
///
/// Edges come from [`Construct`](crate::Construct)-declared dependency
/// lists; services registered through opaque closures appear as nodes
/// without outgoing edges.
///
/// # Examples
///
/// ```rust
/// use lattice_di::ServiceCollection;
/// use lattice_di::graph_export::DependencyGraph;
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(10u32);
/// let provider = services.build();
///
/// let graph = DependencyGraph::from_provider(&provider);
/// assert_eq!(graph.nodes.len(), 1);
///
/// let dot = graph.to_dot();
/// assert!(dot.starts_with("digraph services"));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct DependencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub metadata: GraphMetadata,
}

/// One registered service.
#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    /// Stable node identifier (type name, plus the symbolic name for named
    /// registrations).
    pub id: String,
    /// Short display label.
    pub label: String,
    /// Lifetime label: `singleton`, `scoped`, or `transient`.
    pub lifetime: &'static str,
}

/// A declared dependency from one service to another.
#[derive(Debug, Clone, Serialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

/// Summary information attached to an export.
#[derive(Debug, Clone, Serialize)]
pub struct GraphMetadata {
    pub service_count: usize,
    pub edge_count: usize,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Export failure.
#[derive(Debug)]
pub enum ExportError {
    Serialization(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Serialization(msg) => write!(f, "serialization failed: {}", msg),
        }
    }
}

impl std::error::Error for ExportError {}

fn node_id(key: &crate::Key) -> String {
    match key.service_name() {
        Some(name) => format!("{}#{}", key.display_name(), name),
        None => key.display_name().to_string(),
    }
}

fn short_label(type_name: &str) -> String {
    // "my_crate::services::Database" renders as "Database".
    type_name
        .rsplit("::")
        .next()
        .unwrap_or(type_name)
        .to_string()
}

impl DependencyGraph {
    /// Builds the graph from the provider's current registrations.
    pub fn from_provider(provider: &ServiceProvider) -> Self {
        let descriptors = provider.service_descriptors();

        let nodes: Vec<GraphNode> = descriptors
            .iter()
            .map(|descriptor| GraphNode {
                id: node_id(&descriptor.key),
                label: short_label(descriptor.type_name()),
                lifetime: descriptor.lifetime.label(),
            })
            .collect();

        let edges: Vec<GraphEdge> = descriptors
            .iter()
            .flat_map(|descriptor| {
                let from = node_id(&descriptor.key);
                descriptor.dependencies.iter().map(move |dep| GraphEdge {
                    from: from.clone(),
                    to: node_id(dep),
                })
            })
            .collect();

        let metadata = GraphMetadata {
            service_count: nodes.len(),
            edge_count: edges.len(),
            generated_at: chrono::Utc::now(),
        };

        Self {
            nodes,
            edges,
            metadata,
        }
    }

    /// Renders the graph as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(self).map_err(|e| ExportError::Serialization(e.to_string()))
    }

    /// Renders the graph in Graphviz DOT format, one node per registration,
    /// shaped by lifetime.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph services {\n    rankdir=LR;\n");
        for node in &self.nodes {
            let shape = match node.lifetime {
                "singleton" => "box",
                "scoped" => "ellipse",
                _ => "diamond",
            };
            out.push_str(&format!(
                "    \"{}\" [label=\"{}\\n({})\", shape={}];\n",
                node.id, node.label, node.lifetime, shape
            ));
        }
        for edge in &self.edges {
            out.push_str(&format!("    \"{}\" -> \"{}\";\n", edge.from, edge.to));
        }
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::Construct;
    use crate::error::DiResult;
    use crate::key_of_type;
    use crate::provider::ResolverContext;
    use crate::{Key, Lifetime, Resolver, ServiceCollection};
    use std::sync::Arc;

    struct Database;

    struct Repo {
        _db: Arc<Database>,
    }

    impl Construct for Repo {
        fn dependencies() -> Vec<Key> {
            vec![key_of_type::<Database>()]
        }
        fn construct(ctx: &ResolverContext<'_>) -> DiResult<Self> {
            Ok(Repo {
                _db: ctx.get::<Database>()?,
            })
        }
    }

    fn provider() -> crate::ServiceProvider {
        let mut sc = ServiceCollection::new();
        sc.add_singleton(Database);
        sc.add_constructed::<Repo>(Lifetime::Scoped);
        sc.build()
    }

    #[test]
    fn graph_captures_nodes_and_declared_edges() {
        let graph = DependencyGraph::from_provider(&provider());

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.metadata.service_count, 2);
        assert_eq!(graph.metadata.edge_count, 1);

        let edge = &graph.edges[0];
        assert!(edge.from.contains("Repo"));
        assert!(edge.to.contains("Database"));
    }

    #[test]
    fn json_export_round_trips_through_serde() {
        let graph = DependencyGraph::from_provider(&provider());
        let json = graph.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metadata"]["service_count"], 2);
    }

    #[test]
    fn dot_export_lists_every_node() {
        let graph = DependencyGraph::from_provider(&provider());
        let dot = graph.to_dot();
        assert!(dot.contains("Database"));
        assert!(dot.contains("Repo"));
        assert!(dot.contains("->"));
    }
}
