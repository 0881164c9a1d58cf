use crate::edge::{Edge, EdgeDir, Ori};
use crate::error::Error;
use crate::kmer::{canonical, Mer, RefOracle};
use crate::reads::{ReadId, ReadStart, ReadTable};
use crate::Result;
use bio::alphabets::dna;
use log::{debug, error, trace};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Returned by [`Node::min_non0_cov`] and [`Node::min_cov`] when no coverage was observed
pub const UNDEFINED_MIN_COV: u32 = 10_000_000;
/// Key of the source sentinel node
pub const SOURCE_ID: &[u8] = b"SOURCE";
/// Key of the sink sentinel node
pub const SINK_ID: &[u8] = b"SINK";

/// Selects one of the two per-base coverage histograms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sample {
    #[allow(missing_docs)]
    Tumor,
    #[allow(missing_docs)]
    Normal,
}

/// Regular nodes carry sequence, source and sink are sentinels bounding the local graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    #[allow(missing_docs)]
    Regular,
    #[allow(missing_docs)]
    Source,
    #[allow(missing_docs)]
    Sink,
}

/// Vertex of the local de Bruijn graph.
///
/// Both coverage histograms are index aligned with `sequence`. Whenever the sequence is reversed
/// the caller has to reverse the histograms ([`Node::rev_cov_distr`]) and the read starts
/// ([`Node::rev_reads`]) as well, or use [`Node::flip_orientation`] which does all three.
#[derive(Debug, Clone)]
pub struct Node {
    id: Mer,
    kind: NodeKind,
    sequence: Vec<u8>,
    cov_tumor: f32,
    cov_normal: f32,
    cov_distr_tumor: Vec<u32>,
    cov_distr_normal: Vec<u32>,
    reads: HashSet<ReadId>,
    read_starts: Vec<ReadStart>,
    edges: Vec<Edge>,
    contig_links: HashMap<Mer, Vec<ReadId>>,
    touch_ref: bool,
}

impl Node {
    /// Creates a regular node with zeroed coverage and no edges
    pub fn new(id: Mer, sequence: Vec<u8>) -> Self {
        let len = sequence.len();
        Self {
            id,
            kind: NodeKind::Regular,
            sequence,
            cov_tumor: 0.0,
            cov_normal: 0.0,
            cov_distr_tumor: vec![0; len],
            cov_distr_normal: vec![0; len],
            reads: HashSet::new(),
            read_starts: Vec::new(),
            edges: Vec::new(),
            contig_links: HashMap::new(),
            touch_ref: false,
        }
    }

    /// Creates the source sentinel
    pub fn source() -> Self {
        Self::sentinel(SOURCE_ID, NodeKind::Source)
    }

    /// Creates the sink sentinel
    pub fn sink() -> Self {
        Self::sentinel(SINK_ID, NodeKind::Sink)
    }

    fn sentinel(id: &[u8], kind: NodeKind) -> Self {
        let mut node = Self::new(id.to_vec(), Vec::new());
        node.kind = kind;
        node
    }

    #[allow(missing_docs)]
    pub fn id(&self) -> &[u8] {
        &self.id
    }

    #[allow(missing_docs)]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[allow(missing_docs)]
    pub fn is_source(&self) -> bool {
        self.kind == NodeKind::Source
    }

    #[allow(missing_docs)]
    pub fn is_sink(&self) -> bool {
        self.kind == NodeKind::Sink
    }

    /// Source and sink nodes are excluded from length, coverage and reference computations
    pub fn is_special(&self) -> bool {
        self.kind != NodeKind::Regular
    }

    /// Set by [`Node::mark_ref`]
    pub fn touches_ref(&self) -> bool {
        self.touch_ref
    }

    #[allow(missing_docs)]
    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    #[allow(missing_docs)]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Every read touching this node
    pub fn reads(&self) -> &HashSet<ReadId> {
        &self.reads
    }

    #[allow(missing_docs)]
    pub fn read_starts(&self) -> &[ReadStart] {
        &self.read_starts
    }

    /// Reads linking this node to each neighbouring contig
    pub fn contig_links(&self) -> &HashMap<Mer, Vec<ReadId>> {
        &self.contig_links
    }

    /// Length of the sequence, 0 for source and sink
    pub fn strlen(&self) -> usize {
        if self.is_special() {
            0
        } else {
            self.sequence.len()
        }
    }

    /// Checks if any edge loops back onto this node
    pub fn is_tandem(&self) -> bool {
        self.edges.iter().any(|edge| edge.node_id == self.id)
    }

    /// Adds a link to `node_id`. An existing link with the same target and direction only gains
    /// the supporting read.
    pub fn add_edge(&mut self, node_id: &[u8], dir: EdgeDir, read_id: Option<ReadId>) {
        if let Some(read_id) = read_id {
            self.reads.insert(read_id);
        }

        match self
            .edges
            .iter_mut()
            .find(|edge| edge.node_id == node_id && edge.dir == dir)
        {
            Some(edge) => edge.read_ids.extend(read_id),
            None => {
                let mut edge = Edge::new(node_id.to_vec(), dir);
                edge.read_ids.extend(read_id);
                self.edges.push(edge);
            }
        }
    }

    fn edge_position(&self, node_id: &[u8], dir: EdgeDir) -> Result<usize> {
        self.edges
            .iter()
            .position(|edge| edge.node_id == node_id && edge.dir == dir)
            .ok_or_else(|| Error::EdgeNotFound {
                node: String::from_utf8_lossy(&self.id).into_owned(),
                dir: dir.to_string(),
                target: String::from_utf8_lossy(node_id).into_owned(),
            })
    }

    /// Redirects the edge `old_dir:old_id` to `new_dir:new_id`, keeping its supporting reads
    pub fn try_update_edge(
        &mut self,
        old_id: &[u8],
        old_dir: EdgeDir,
        new_id: &[u8],
        new_dir: EdgeDir,
    ) -> Result<()> {
        let idx = self.edge_position(old_id, old_dir)?;
        let edge = &mut self.edges[idx];
        edge.node_id = new_id.to_vec();
        edge.dir = new_dir;
        trace!(
            "Node {} redirected {}:{} to {}",
            String::from_utf8_lossy(&self.id),
            old_dir,
            String::from_utf8_lossy(old_id),
            self.edges[idx]
        );
        Ok(())
    }

    /// Same as [`Node::try_update_edge`] but a missing edge terminates the process after
    /// reporting the node and its edges.
    ///
    /// The report goes through `log::error!`, so a logger must be initialised for it to show.
    pub fn update_edge(&mut self, old_id: &[u8], old_dir: EdgeDir, new_id: &[u8], new_dir: EdgeDir) {
        if let Err(err) = self.try_update_edge(old_id, old_dir, new_id, new_dir) {
            error!("Error updating edge: {}", err);
            error!(
                "Wanted to replace with {}:{}",
                new_dir,
                String::from_utf8_lossy(new_id)
            );
            error!("{}", self);
            std::process::exit(1)
        }
    }

    /// Deletes the edge `dir:node_id`
    pub fn try_remove_edge(&mut self, node_id: &[u8], dir: EdgeDir) -> Result<()> {
        let idx = self.edge_position(node_id, dir)?;
        self.edges.remove(idx);
        Ok(())
    }

    /// Same as [`Node::try_remove_edge`] but a missing edge terminates the process. The
    /// diagnostic is logged at error level.
    pub fn remove_edge(&mut self, node_id: &[u8], dir: EdgeDir) {
        if let Err(err) = self.try_remove_edge(node_id, dir) {
            error!("Error removing edge: {}", err);
            std::process::exit(1)
        }
    }

    /// Index of the only edge leaving on the `dir` side. `None` when there are zero or several
    /// such edges, when the only one is a self loop, or for source/sink nodes.
    pub fn get_buddy(&self, dir: Ori) -> Option<usize> {
        if self.is_special() {
            return None;
        }

        let mut matching = self
            .edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.is_dir(dir));

        match (matching.next(), matching.next()) {
            (Some((idx, edge)), None) if edge.node_id != self.id => Some(idx),
            _ => None,
        }
    }

    /// Number of edges leaving on the `dir` side
    pub fn degree(&self, dir: Ori) -> usize {
        self.edges.iter().filter(|edge| edge.is_dir(dir)).count()
    }

    /// Scans the sequence for any canonical `k`-mer present in the reference and records the
    /// result. Source and sink always report a hit without scanning.
    pub fn mark_ref<R: RefOracle + ?Sized>(&mut self, reference: &R, k: usize) -> bool {
        if self.is_special() {
            return true;
        }

        self.touch_ref = k > 0
            && self
                .sequence
                .windows(k)
                .any(|mer| reference.has_mer(&canonical(mer)));
        self.touch_ref
    }

    /// Adds a read to the supporting set
    pub fn add_read(&mut self, read_id: ReadId) {
        self.reads.insert(read_id);
    }

    /// Records that `read_id` begins at `offset`
    pub fn add_read_start(&mut self, read_id: ReadId, offset: usize, trim5: usize, ori: Ori) {
        self.read_starts
            .push(ReadStart::new(read_id, offset, trim5, ori));
    }

    /// Mirrors every read start onto the opposite strand
    pub fn try_rev_reads(&mut self) -> Result<()> {
        if self.is_special() {
            return Err(Error::SpecialNode(
                String::from_utf8_lossy(&self.id).into_owned(),
            ));
        }

        let len = self.strlen();
        for rs in self.read_starts.iter_mut() {
            rs.offset = len.saturating_sub(rs.offset + 1);
            rs.ori = rs.ori.flip();
        }
        Ok(())
    }

    /// Same as [`Node::try_rev_reads`] but calling it on source/sink terminates the process. The
    /// diagnostic is logged at error level.
    pub fn rev_reads(&mut self) {
        if let Err(err) = self.try_rev_reads() {
            error!("{}", err);
            std::process::exit(1)
        }
    }

    /// Orders read starts by offset, ties broken by read id
    pub fn sort_read_starts(&mut self) {
        self.read_starts.sort();
    }

    /// Reverse complements the sequence together with coverage and read starts
    pub fn flip_orientation(&mut self) -> Result<()> {
        self.try_rev_reads()?;
        self.sequence = dna::revcomp(&self.sequence[..]);
        self.rev_cov_distr();
        Ok(())
    }

    /// Per-base coverage of `sample`
    pub fn cov_distr(&self, sample: Sample) -> &[u32] {
        match sample {
            Sample::Tumor => &self.cov_distr_tumor,
            Sample::Normal => &self.cov_distr_normal,
        }
    }

    fn cov_distr_mut(&mut self, sample: Sample) -> &mut Vec<u32> {
        match sample {
            Sample::Tumor => &mut self.cov_distr_tumor,
            Sample::Normal => &mut self.cov_distr_normal,
        }
    }

    /// Coverage summary of `sample` shown in the node dump
    pub fn cov(&self, sample: Sample) -> f32 {
        match sample {
            Sample::Tumor => self.cov_tumor,
            Sample::Normal => self.cov_normal,
        }
    }

    #[allow(missing_docs)]
    pub fn set_cov(&mut self, sample: Sample, cov: f32) {
        match sample {
            Sample::Tumor => self.cov_tumor = cov,
            Sample::Normal => self.cov_normal = cov,
        }
    }

    /// Counts one more `sample` read over `offset`
    pub fn add_coverage(&mut self, sample: Sample, offset: usize) {
        match self.cov_distr_mut(sample).get_mut(offset) {
            Some(cov) => *cov += 1,
            None => debug!(
                "Ignoring coverage at offset {} past the end of node {}",
                offset,
                String::from_utf8_lossy(&self.id)
            ),
        }
    }

    /// Sets every position of the `sample` histogram to `cov`
    pub fn fill_cov_distr(&mut self, sample: Sample, cov: u32) {
        for c in self.cov_distr_mut(sample).iter_mut() {
            *c = cov;
        }
    }

    /// Reverses both histograms so they stay aligned with a reversed sequence
    pub fn rev_cov_distr(&mut self) {
        self.cov_distr_tumor.reverse();
        self.cov_distr_normal.reverse();
    }

    /// Average over the non-zero positions of `sample`, 0 when there are none
    pub fn avg_cov_distr(&self, sample: Sample) -> u32 {
        let (sum, cnt) = self
            .cov_distr(sample)
            .iter()
            .filter(|cov| **cov != 0)
            .fold((0u64, 0u64), |(sum, cnt), cov| (sum + *cov as u64, cnt + 1));

        if cnt == 0 {
            0
        } else {
            (sum / cnt) as u32
        }
    }

    /// Smallest non-zero coverage of `sample`, [`UNDEFINED_MIN_COV`] when there is none
    pub fn min_non0_cov(&self, sample: Sample) -> u32 {
        self.cov_distr(sample)
            .iter()
            .copied()
            .filter(|cov| *cov > 0)
            .min()
            .unwrap_or(UNDEFINED_MIN_COV)
    }

    /// Smallest total (tumor + normal) depth along the node, zeros included
    pub fn min_cov(&self) -> u32 {
        self.cov_distr_tumor
            .iter()
            .zip(self.cov_distr_normal.iter())
            .map(|(tumor, normal)| tumor + normal)
            .min()
            .unwrap_or(UNDEFINED_MIN_COV)
    }

    /// Number of supporting reads whose sample code is `code`. Ids missing from `table` are skipped.
    pub fn cnt_read_code(&self, table: &ReadTable, code: char) -> usize {
        self.reads
            .iter()
            .filter_map(|read_id| table.get(*read_id))
            .filter(|info| info.code == code)
            .count()
    }

    /// Number of reads shared with `other`
    pub fn read_overlaps(&self, other: &Node) -> usize {
        let (small, large) = if self.reads.len() <= other.reads.len() {
            (&self.reads, &other.reads)
        } else {
            (&other.reads, &self.reads)
        };
        small.iter().filter(|read_id| large.contains(read_id)).count()
    }

    /// Records that `read_id` links this node to contig `contig_id`
    pub fn add_contig_link(&mut self, contig_id: Mer, read_id: ReadId) {
        self.contig_links
            .entry(contig_id)
            .or_insert_with(Vec::new)
            .push(read_id);
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t*s\t{}\t*c\t{}\t*c\t{}\t*r\t{}",
            String::from_utf8_lossy(&self.id),
            String::from_utf8_lossy(&self.sequence),
            self.cov_tumor,
            self.cov_normal,
            self.touch_ref as u8
        )?;
        for edge in &self.edges {
            write!(f, "\t{}", edge)?;
        }
        Ok(())
    }
}
