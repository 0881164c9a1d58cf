use crate::edge::EdgeDir;
use crate::error::Error;
use crate::kmer::{Mer, RefOracle};
use crate::node::Node;
use crate::reads::ReadId;
use crate::Result;
use log::debug;
use std::collections::HashMap;

/// Arena of nodes keyed by their id. Edges refer to neighbours through these keys only, so nodes
/// can be merged or pruned without invalidating handles.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: HashMap<Mer, Node>,
}

impl Graph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph holding only the source and sink sentinels
    pub fn with_sentinels() -> Self {
        let mut graph = Self::new();
        graph.add_node(Node::source());
        graph.add_node(Node::sink());
        graph
    }

    /// Inserts `node`, returning the node previously stored under the same id
    pub fn add_node(&mut self, node: Node) -> Option<Node> {
        self.nodes.insert(node.id().to_vec(), node)
    }

    #[allow(missing_docs)]
    pub fn node(&self, id: &[u8]) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[allow(missing_docs)]
    pub fn node_mut(&mut self, id: &[u8]) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Drops a node from the arena. Edges on other nodes pointing to it are left untouched.
    pub fn remove_node(&mut self, id: &[u8]) -> Option<Node> {
        self.nodes.remove(id)
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[allow(missing_docs)]
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Links `from` to `to` with `dir` and adds the reciprocal edge on `to`
    pub fn add_pair(
        &mut self,
        from: &[u8],
        to: &[u8],
        dir: EdgeDir,
        read_id: Option<ReadId>,
    ) -> Result<()> {
        if !self.nodes.contains_key(to) {
            return Err(Error::NodeNotFound(String::from_utf8_lossy(to).into_owned()));
        }
        self.nodes
            .get_mut(from)
            .ok_or_else(|| Error::NodeNotFound(String::from_utf8_lossy(from).into_owned()))?
            .add_edge(to, dir, read_id);
        if let Some(node) = self.nodes.get_mut(to) {
            node.add_edge(from, dir.flip_link(), read_id);
        }
        Ok(())
    }

    /// Marks every node touching the reference and returns how many do
    pub fn mark_ref<R: RefOracle + ?Sized>(&mut self, reference: &R, k: usize) -> usize {
        let touching = self
            .nodes
            .values_mut()
            .map(|node| node.mark_ref(reference, k))
            .filter(|touches| *touches)
            .count();
        debug!("{} of {} nodes touch the reference", touching, self.nodes.len());
        touching
    }
}
