//! Node and edge creation with default styling on top of any [`GraphSink`].

use crate::config::{
    DEFAULT_COLOR, DEFAULT_EDGE_SIZE, DEFAULT_EDGE_TYPE, DEFAULT_EDGE_WEIGHT,
    DEFAULT_IMAGE_EXTENSION, DEFAULT_IMAGE_FOLDER, DEFAULT_NODE_SIZE, DEFAULT_NODE_TYPE,
    MIN_EDGE_SIZE,
};
use rustc_hash::FxHashMap;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("invalid {field}: {value} (must be a finite, non-negative number)")]
    InvalidOption { field: &'static str, value: f64 },

    #[error("node already exists: {0}")]
    DuplicateNode(String),

    #[error("node not found: {0}")]
    MissingNode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Destination for nodes and edges.
pub trait GraphSink {
    fn add_node(&mut self, id: &str, attributes: NodeAttributes) -> Result<(), GraphError>;

    fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        attributes: EdgeAttributes,
    ) -> Result<(), GraphError>;
}

/// Attributes handed to [`GraphSink::add_node`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAttributes {
    pub size: f64,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub image: String,
    pub color: String,
    pub label_color: String,
}

/// Attributes handed to [`GraphSink::add_edge`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeAttributes {
    #[serde(rename = "type")]
    pub edge_type: String,
    pub weight: f64,
    pub label: String,
    pub size: f64,
    pub color: String,
}

/// Per-node overrides. Unset fields take the defaults from [`crate::config`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeOptions {
    pub size: Option<f64>,
    pub color: Option<String>,
    pub node_type: Option<String>,
    pub image_folder: Option<String>,
    pub image_extension: Option<String>,
    pub label: Option<String>,
    /// Falls back to the effective node color
    pub label_color: Option<String>,
}

impl NodeOptions {
    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn node_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    pub fn image_folder(mut self, folder: impl Into<String>) -> Self {
        self.image_folder = Some(folder.into());
        self
    }

    pub fn image_extension(mut self, extension: impl Into<String>) -> Self {
        self.image_extension = Some(extension.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label_color(mut self, color: impl Into<String>) -> Self {
        self.label_color = Some(color.into());
        self
    }

    /// Resolves the options against the defaults for the node called `name`.
    pub fn resolve(&self, name: &str) -> Result<NodeAttributes, GraphError> {
        let size = check_non_negative("size", self.size.unwrap_or(DEFAULT_NODE_SIZE))?;
        let color = self.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string());
        let label_color = self.label_color.clone().unwrap_or_else(|| color.clone());
        let folder = self.image_folder.as_deref().unwrap_or(DEFAULT_IMAGE_FOLDER);
        let extension = self.image_extension.as_deref().unwrap_or(DEFAULT_IMAGE_EXTENSION);

        Ok(NodeAttributes {
            size,
            label: self.label.clone().unwrap_or_else(|| name.to_string()),
            node_type: self
                .node_type
                .clone()
                .unwrap_or_else(|| DEFAULT_NODE_TYPE.to_string()),
            image: format!("{folder}{name}{extension}"),
            color,
            label_color,
        })
    }
}

/// Per-edge overrides. `size` is widened to at least [`MIN_EDGE_SIZE`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeOptions {
    pub edge_type: Option<String>,
    pub weight: Option<f64>,
    pub label: Option<String>,
    pub size: Option<f64>,
    pub color: Option<String>,
}

impl EdgeOptions {
    pub fn edge_type(mut self, edge_type: impl Into<String>) -> Self {
        self.edge_type = Some(edge_type.into());
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn resolve(&self) -> Result<EdgeAttributes, GraphError> {
        let weight = check_non_negative("weight", self.weight.unwrap_or(DEFAULT_EDGE_WEIGHT))?;
        let size = check_non_negative("size", self.size.unwrap_or(DEFAULT_EDGE_SIZE))?;

        Ok(EdgeAttributes {
            edge_type: self
                .edge_type
                .clone()
                .unwrap_or_else(|| DEFAULT_EDGE_TYPE.to_string()),
            weight,
            label: self.label.clone().unwrap_or_default(),
            size: size.max(MIN_EDGE_SIZE),
            color: self.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        })
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<f64, GraphError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(GraphError::InvalidOption { field, value })
    }
}

pub fn create_node<G: GraphSink + ?Sized>(
    graph: &mut G,
    name: &str,
    options: &NodeOptions,
) -> Result<(), GraphError> {
    let attributes = options.resolve(name)?;
    graph.add_node(name, attributes)
}

/// A node to create: a bare name, or a name with overrides.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSpec {
    Name(String),
    Configured { name: String, options: NodeOptions },
}

impl NodeSpec {
    pub fn configured(name: impl Into<String>, options: NodeOptions) -> Self {
        NodeSpec::Configured {
            name: name.into(),
            options,
        }
    }
}

impl From<&str> for NodeSpec {
    fn from(name: &str) -> Self {
        NodeSpec::Name(name.to_string())
    }
}

impl From<String> for NodeSpec {
    fn from(name: String) -> Self {
        NodeSpec::Name(name)
    }
}

/// Creates each node in order, stopping at the first failure.
pub fn create_nodes<G: GraphSink + ?Sized>(
    graph: &mut G,
    nodes: &[NodeSpec],
) -> Result<(), GraphError> {
    let defaults = NodeOptions::default();
    for spec in nodes {
        match spec {
            NodeSpec::Name(name) => create_node(graph, name, &defaults)?,
            NodeSpec::Configured { name, options } => create_node(graph, name, options)?,
        }
    }
    Ok(())
}

pub fn create_edge<G: GraphSink + ?Sized>(
    graph: &mut G,
    source: &str,
    target: &str,
    options: &EdgeOptions,
) -> Result<(), GraphError> {
    let attributes = options.resolve()?;
    graph.add_edge(source, target, attributes)
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec {
    pub source: String,
    pub target: String,
    pub options: EdgeOptions,
}

impl EdgeSpec {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            options: EdgeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EdgeOptions) -> Self {
        self.options = options;
        self
    }
}

/// Creates each edge in order, stopping at the first failure.
pub fn create_edges<G: GraphSink + ?Sized>(
    graph: &mut G,
    edges: &[EdgeSpec],
) -> Result<(), GraphError> {
    for edge in edges {
        create_edge(graph, &edge.source, &edge.target, &edge.options)?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredEdge {
    pub source: String,
    pub target: String,
    pub attributes: EdgeAttributes,
}

/// In-memory graph keeping nodes and edges in insertion order.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    nodes: Vec<(String, NodeAttributes)>,
    index: FxHashMap<String, usize>,
    edges: Vec<StoredEdge>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&NodeAttributes> {
        self.index.get(id).map(|&i| &self.nodes[i].1)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&str, &NodeAttributes)> {
        self.nodes.iter().map(|(id, attrs)| (id.as_str(), attrs))
    }

    pub fn edges(&self) -> &[StoredEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl GraphSink for MemoryGraph {
    fn add_node(&mut self, id: &str, attributes: NodeAttributes) -> Result<(), GraphError> {
        if self.index.contains_key(id) {
            return Err(GraphError::DuplicateNode(id.to_string()));
        }
        self.index.insert(id.to_string(), self.nodes.len());
        self.nodes.push((id.to_string(), attributes));
        Ok(())
    }

    fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        attributes: EdgeAttributes,
    ) -> Result<(), GraphError> {
        for endpoint in [source, target] {
            if !self.index.contains_key(endpoint) {
                return Err(GraphError::MissingNode(endpoint.to_string()));
            }
        }
        self.edges.push(StoredEdge {
            source: source.to_string(),
            target: target.to_string(),
            attributes,
        });
        Ok(())
    }
}
