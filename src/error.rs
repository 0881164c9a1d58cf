use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while building graphs, scoring variants or reading candidate tables
pub enum Error {
    #[error("Could not read input")]
    /// Generic I/O failure
    IoError(#[from] std::io::Error),
    #[error("Count too large for statistical testing")]
    /// Fisher's exact error
    FishersError(#[from] fishers_exact::TooLargeValueError),
    #[error("Allele counts of {0} do not fit a 2x2 contingency table")]
    /// Summed allele counts exceed the range of the exact test
    CountOverflow(String),
    #[error("Could not open candidate table")]
    /// Compressed/plain input open error
    InputError(#[from] niffler::Error),
    #[error("Could not spawn threads")]
    /// Create thread pools erorr
    ThreadError,
    #[error("Node {node} has no edge {dir}:{target}")]
    /// Edge lookup failed during an update or removal
    EdgeNotFound {
        /// Node owning the edge list
        node: String,
        /// Direction that was searched for
        dir: String,
        /// Target node that was searched for
        target: String,
    },
    #[error("Operation not allowed on source/sink node {0}")]
    /// Operation requires a regular node
    SpecialNode(String),
    #[error("Node {0} is not in the graph")]
    /// Graph lookup failed
    NodeNotFound(String),
    #[error("Could not parse candidate on line {line}: {reason}")]
    /// Malformed line in the candidate evidence table
    ParseRecord {
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        reason: String,
    },
}
