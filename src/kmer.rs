use bio::alignment::sparse::{hash_kmers, HashMapFx};
use bio::alphabets::dna;
use log::debug;

/// Node key in the local assembly graph, usually a canonical k-mer
pub type Mer = Vec<u8>;

/// Returns the lexicographically smaller of a k-mer and its reverse complement.
pub fn canonical(mer: &[u8]) -> Mer {
    let upper = mer.to_ascii_uppercase();
    let revcomp = dna::revcomp(&upper[..]);
    if revcomp < upper {
        revcomp
    } else {
        upper
    }
}

/// Membership test for reference k-mers.
pub trait RefOracle {
    /// `mer` is expected to be canonical already
    fn has_mer(&self, mer: &[u8]) -> bool;
}

/// Canonical k-mers of a reference window with their occurrence counts
#[derive(Debug, Default)]
pub struct ReferenceKmers {
    k: usize,
    mers: HashMapFx<Mer, u32>,
}

impl ReferenceKmers {
    /// Indexes every canonical `k`-mer of `seq`
    pub fn new(seq: &[u8], k: usize) -> Self {
        if k == 0 || seq.len() < k {
            return Self {
                k,
                mers: HashMapFx::default(),
            };
        }

        let upper = seq.to_ascii_uppercase();
        let mers = hash_kmers(&upper, k).into_iter().fold(
            HashMapFx::<Mer, u32>::default(),
            |mut mers, (mer, positions)| {
                *mers.entry(canonical(mer)).or_insert(0) += positions.len() as u32;
                mers
            },
        );
        debug!("Indexed {} distinct reference {}-mers", mers.len(), k);
        Self { k, mers }
    }

    /// k-mer size of the index
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of times the canonical `mer` occurs in the reference window
    pub fn count(&self, mer: &[u8]) -> u32 {
        self.mers.get(mer).copied().unwrap_or(0)
    }

    /// Number of distinct canonical k-mers
    pub fn len(&self) -> usize {
        self.mers.len()
    }

    /// Checks if no k-mers were indexed
    pub fn is_empty(&self) -> bool {
        self.mers.is_empty()
    }
}

impl RefOracle for ReferenceKmers {
    fn has_mer(&self, mer: &[u8]) -> bool {
        self.mers.contains_key(mer)
    }
}

impl<S: std::hash::BuildHasher> RefOracle for std::collections::HashSet<Mer, S> {
    fn has_mer(&self, mer: &[u8]) -> bool {
        self.contains(mer)
    }
}
