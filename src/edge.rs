use crate::kmer::Mer;
use crate::reads::ReadId;
use std::fmt;

/// Strand of a node or read relative to the canonical k-mer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ori {
    /// Forward
    F,
    /// Reverse
    R,
}

impl Ori {
    /// Direction negation
    pub fn flip(self) -> Self {
        match self {
            Ori::F => Ori::R,
            Ori::R => Ori::F,
        }
    }
}

/// Relative orientation of the two nodes joined by an edge. The first letter is the side of the
/// owning node the edge leaves from, the second the strand it enters the target on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeDir {
    #[allow(missing_docs)]
    FF,
    #[allow(missing_docs)]
    FR,
    #[allow(missing_docs)]
    RF,
    #[allow(missing_docs)]
    RR,
}

impl EdgeDir {
    /// Orientation of the owning node this edge leaves from
    pub fn start_dir(self) -> Ori {
        match self {
            EdgeDir::FF | EdgeDir::FR => Ori::F,
            EdgeDir::RF | EdgeDir::RR => Ori::R,
        }
    }

    /// Orientation the edge enters the target node with
    pub fn dest_dir(self) -> Ori {
        match self {
            EdgeDir::FF | EdgeDir::RF => Ori::F,
            EdgeDir::FR | EdgeDir::RR => Ori::R,
        }
    }

    /// Direction of the reciprocal edge stored on the target node
    pub fn flip_link(self) -> Self {
        match self {
            EdgeDir::FF => EdgeDir::RR,
            EdgeDir::RR => EdgeDir::FF,
            other => other,
        }
    }

    /// Builds a direction from its two strand components
    pub fn from_oris(start: Ori, dest: Ori) -> Self {
        match (start, dest) {
            (Ori::F, Ori::F) => EdgeDir::FF,
            (Ori::F, Ori::R) => EdgeDir::FR,
            (Ori::R, Ori::F) => EdgeDir::RF,
            (Ori::R, Ori::R) => EdgeDir::RR,
        }
    }
}

impl fmt::Display for EdgeDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EdgeDir::FF => "FF",
            EdgeDir::FR => "FR",
            EdgeDir::RF => "RF",
            EdgeDir::RR => "RR",
        };
        f.write_str(s)
    }
}

/// Directed link to another node, identified by key only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Key of the adjacent node in the graph arena
    pub node_id: Mer,
    /// Orientation of the link
    pub dir: EdgeDir,
    /// Reads that induced or confirmed the link, in the order they were added
    pub read_ids: Vec<ReadId>,
}

impl Edge {
    /// Creates an edge without supporting reads
    pub fn new(node_id: Mer, dir: EdgeDir) -> Self {
        Self {
            node_id,
            dir,
            read_ids: Vec::new(),
        }
    }

    /// Checks if the edge leaves its owner on the `dir` side
    pub fn is_dir(&self, dir: Ori) -> bool {
        self.dir.start_dir() == dir
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.dir, String::from_utf8_lossy(&self.node_id))
    }
}
