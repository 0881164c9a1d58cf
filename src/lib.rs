#![warn(missing_debug_implementations, rust_2018_idioms, missing_docs)]

//! Core of a tumor/normal somatic variant caller built on local de Bruijn graph assembly.
//!
//! The graph side ([`Node`], [`Edge`], [`Graph`]) keeps topology and per-base tumor/normal coverage
//! consistent while reads are threaded through a local assembly. The variant side ([`Variant`])
//! turns allele counts into a Fisher's exact test score, genotypes, a somatic/shared/normal
//! classification and a filtered VCF record.
//!

pub mod edge;
pub mod error;
pub mod filters;
pub mod fisher;
pub mod graph;
pub mod kmer;
pub mod node;
pub mod reads;
pub mod variant;
pub mod vcf;

pub use crate::edge::{Edge, EdgeDir, Ori};
pub use crate::error::Error;
pub use crate::filters::{Filter, Filters};
pub use crate::graph::Graph;
pub use crate::kmer::{canonical, Mer, RefOracle, ReferenceKmers};
pub use crate::node::{Node, NodeKind, Sample, UNDEFINED_MIN_COV};
pub use crate::reads::{ReadId, ReadInfo, ReadStart, ReadTable};
pub use crate::variant::{genotype, SupportState, Variant, VariantType};

/// Result type used across the crate
pub type Result<T> = std::result::Result<T, crate::error::Error>;
