use crate::config::CSV_BUFFER_SIZE;
use crate::graph::{EdgeAttributes, GraphError, GraphSink, NodeAttributes};
use csv::Writer;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

pub const NODES_FILE: &str = "nodes.csv";
pub const EDGES_FILE: &str = "edges.csv";

const NODE_HEADER: [&str; 7] = ["id:ID", "label", "type", "image", "size", "color", "labelColor"];
const EDGE_HEADER: [&str; 7] = [":START_ID", ":END_ID", ":TYPE", "weight", "label", "size", "color"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub nodes: u64,
    pub edges: u64,
}

/// Writes nodes and edges to `nodes.csv` / `edges.csv` in a directory.
///
/// Rejects a repeated node id and an edge whose endpoints were not written first.
pub struct CsvGraphWriter {
    dir: PathBuf,
    nodes: Writer<BufWriter<File>>,
    edges: Writer<BufWriter<File>>,
    seen: FxHashSet<String>,
    edge_count: u64,
}

impl CsvGraphWriter {
    pub fn create(dir: impl AsRef<Path>) -> Result<Self, GraphError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let mut nodes = open_writer(&dir.join(NODES_FILE))?;
        let mut edges = open_writer(&dir.join(EDGES_FILE))?;
        nodes.write_record(NODE_HEADER)?;
        edges.write_record(EDGE_HEADER)?;

        Ok(Self {
            dir,
            nodes,
            edges,
            seen: FxHashSet::default(),
            edge_count: 0,
        })
    }

    pub fn finish(mut self) -> Result<ExportSummary, GraphError> {
        self.nodes.flush()?;
        self.edges.flush()?;
        let summary = ExportSummary {
            nodes: self.seen.len() as u64,
            edges: self.edge_count,
        };
        info!(
            dir = %self.dir.display(),
            nodes = summary.nodes,
            edges = summary.edges,
            "Graph CSV written"
        );
        Ok(summary)
    }
}

fn open_writer(path: &Path) -> Result<Writer<BufWriter<File>>, GraphError> {
    let file = File::create(path)?;
    Ok(Writer::from_writer(BufWriter::with_capacity(CSV_BUFFER_SIZE, file)))
}

impl GraphSink for CsvGraphWriter {
    fn add_node(&mut self, id: &str, attributes: NodeAttributes) -> Result<(), GraphError> {
        if !self.seen.insert(id.to_string()) {
            return Err(GraphError::DuplicateNode(id.to_string()));
        }
        let size = attributes.size.to_string();
        self.nodes.write_record([
            id,
            attributes.label.as_str(),
            attributes.node_type.as_str(),
            attributes.image.as_str(),
            size.as_str(),
            attributes.color.as_str(),
            attributes.label_color.as_str(),
        ])?;
        Ok(())
    }

    fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        attributes: EdgeAttributes,
    ) -> Result<(), GraphError> {
        for endpoint in [source, target] {
            if !self.seen.contains(endpoint) {
                return Err(GraphError::MissingNode(endpoint.to_string()));
            }
        }
        let weight = attributes.weight.to_string();
        let size = attributes.size.to_string();
        self.edges.write_record([
            source,
            target,
            attributes.edge_type.as_str(),
            weight.as_str(),
            attributes.label.as_str(),
            size.as_str(),
            attributes.color.as_str(),
        ])?;
        self.edge_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{create_edge, create_node, EdgeOptions, NodeOptions};
    use tempfile::TempDir;

    #[test]
    fn writes_headers_and_rows() -> Result<(), GraphError> {
        let temp_dir = TempDir::new()?;
        let mut writer = CsvGraphWriter::create(temp_dir.path())?;
        create_node(&mut writer, "Ana", &NodeOptions::default())?;
        create_node(&mut writer, "Bruno", &NodeOptions::default().color("#00ff00"))?;
        create_edge(&mut writer, "Ana", "Bruno", &EdgeOptions::default().size(1.0))?;
        let summary = writer.finish()?;

        assert_eq!(summary, ExportSummary { nodes: 2, edges: 1 });

        let nodes = fs::read_to_string(temp_dir.path().join(NODES_FILE))?;
        let lines: Vec<&str> = nodes.lines().collect();
        assert_eq!(lines[0], "id:ID,label,type,image,size,color,labelColor");
        assert_eq!(lines[1], "Ana,Ana,image,images/Ana.jpg,8,#999999,#999999");
        assert_eq!(lines[2], "Bruno,Bruno,image,images/Bruno.jpg,8,#00ff00,#00ff00");

        let edges = fs::read_to_string(temp_dir.path().join(EDGES_FILE))?;
        let lines: Vec<&str> = edges.lines().collect();
        assert_eq!(lines[0], ":START_ID,:END_ID,:TYPE,weight,label,size,color");
        assert_eq!(lines[1], "Ana,Bruno,line,1,,2,#999999");
        Ok(())
    }

    #[test]
    fn quotes_fields_with_commas() -> Result<(), GraphError> {
        let temp_dir = TempDir::new()?;
        let mut writer = CsvGraphWriter::create(temp_dir.path())?;
        create_node(&mut writer, "Silva, J.", &NodeOptions::default())?;
        writer.finish()?;

        let mut reader = csv::Reader::from_path(temp_dir.path().join(NODES_FILE))?;
        let record = reader.records().next().unwrap()?;
        assert_eq!(&record[0], "Silva, J.");
        assert_eq!(&record[3], "images/Silva, J..jpg");
        Ok(())
    }

    #[test]
    fn rejects_duplicates_and_dangling_edges() -> Result<(), GraphError> {
        let temp_dir = TempDir::new()?;
        let mut writer = CsvGraphWriter::create(temp_dir.path().join("nested"))?;
        create_node(&mut writer, "A", &NodeOptions::default())?;

        let dup = create_node(&mut writer, "A", &NodeOptions::default());
        assert!(matches!(dup, Err(GraphError::DuplicateNode(_))));

        let dangling = create_edge(&mut writer, "A", "B", &EdgeOptions::default());
        assert!(matches!(dangling, Err(GraphError::MissingNode(ref id)) if id == "B"));

        let summary = writer.finish()?;
        assert_eq!(summary, ExportSummary { nodes: 1, edges: 0 });
        Ok(())
    }
}
