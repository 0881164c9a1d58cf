use crate::edge::Ori;
use std::cmp::Ordering;

/// Index of a read in the [`ReadTable`]
pub type ReadId = u32;

/// Metadata kept for each read threaded through the graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadInfo {
    /// Read name as found in the alignment file
    pub label: String,
    /// Sample code, `T` for tumor and `N` for normal reads
    pub code: char,
}

impl ReadInfo {
    /// Creates metadata for a single read
    pub fn new<T: Into<String>>(label: T, code: char) -> Self {
        Self {
            label: label.into(),
            code,
        }
    }
}

/// Read metadata indexed by [`ReadId`]
#[derive(Debug, Default, Clone)]
pub struct ReadTable(Vec<ReadInfo>);

impl ReadTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a read and returns the id assigned to it
    pub fn push(&mut self, info: ReadInfo) -> ReadId {
        self.0.push(info);
        (self.0.len() - 1) as ReadId
    }

    /// Bounds checked lookup, ids outside the table yield `None`
    pub fn get(&self, id: ReadId) -> Option<&ReadInfo> {
        self.0.get(id as usize)
    }

    /// Number of reads in the table
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks if the table holds no reads
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::iter::FromIterator<ReadInfo> for ReadTable {
    fn from_iter<I: IntoIterator<Item = ReadInfo>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Position where a full read begins inside a node
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadStart {
    pub read_id: ReadId,
    pub offset: usize,
    pub trim5: usize,
    pub ori: Ori,
}

impl ReadStart {
    /// Anchors read `read_id` at `offset` within a node
    pub fn new(read_id: ReadId, offset: usize, trim5: usize, ori: Ori) -> Self {
        Self {
            read_id,
            offset,
            trim5,
            ori,
        }
    }
}

impl Ord for ReadStart {
    fn cmp(&self, other: &Self) -> Ordering {
        self.offset
            .cmp(&other.offset)
            .then(self.read_id.cmp(&other.read_id))
            .then(self.trim5.cmp(&other.trim5))
            .then(self.ori.cmp(&other.ori))
    }
}

impl PartialOrd for ReadStart {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
