use crate::error::Error;
use crate::filters::{Filter, Filters};
use crate::variant::{Variant, VariantType};
use crate::Result;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::str::FromStr;

/// INFO and FORMAT header records
pub const HEADER_RECORDS: [&str; 9] = [
    r#"##INFO=<ID=SOMATIC,Number=0,Type=Flag,Description="Somatic mutation">"#,
    r#"##INFO=<ID=SHARED,Number=0,Type=Flag,Description="Shared mutation betweem tumor and normal">"#,
    r#"##INFO=<ID=NORMAL,Number=0,Type=Flag,Description="Mutation present only in the normal">"#,
    r#"##INFO=<ID=FETS,Number=1,Type=Float,Description="Phred-scaled p-value of the Fisher's exact test for tumor-normal allele counts">"#,
    r#"##INFO=<ID=TYPE,Number=1,Type=String,Description="Variant type (snv, del, ins)">"#,
    r#"##FORMAT=<ID=GT,Number=1,Type=String,Description="Genotype">"#,
    r#"##FORMAT=<ID=AD,Number=.,Type=Integer,Description="Allele depth: # of supporting ref,alt reads at the site">"#,
    r#"##FORMAT=<ID=SC,Number=.,Type=Integer,Description="Strand counts for alt: # of supporting forward,reverse reads for the alt allele">"#,
    r#"##FORMAT=<ID=DP,Number=1,Type=Integer,Description="Depth (reads with MQ>0)">"#,
];

/// Column header line
pub const COLUMNS: &str = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNORMAL\tTUMOR";

/// Header lines describing the active filter thresholds, INFO and FORMAT keys
pub fn header_lines(filters: &Filters) -> Vec<String> {
    let mut lines = vec![
        String::from("##fileformat=VCFv4.1"),
        format!("##source={} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
    ];
    lines.extend(Filter::ALL.iter().map(|filter| filter.header_line(filters)));
    lines.extend(HEADER_RECORDS.iter().map(|record| record.to_string()));
    lines.push(COLUMNS.to_string());
    lines
}

/// Collection of candidate variants keyed by signature
#[derive(Debug, Default)]
pub struct VariantSet {
    variants: Vec<Variant>,
    signatures: HashSet<String>,
}

impl VariantSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variant unless one with the same signature is already present
    pub fn add(&mut self, variant: Variant) -> bool {
        let signature = variant.signature();
        if self.signatures.contains(&signature) {
            warn!("Dropping duplicate variant {}", signature);
            false
        } else {
            self.signatures.insert(signature);
            self.variants.push(variant);
            true
        }
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    #[allow(missing_docs)]
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Scores every variant. Variants are independent so this runs on the global thread pool.
    pub fn update(&mut self) -> Result<()> {
        self.variants
            .par_iter_mut()
            .map(|variant| variant.update())
            .collect::<Result<Vec<()>>>()?;
        Ok(())
    }

    /// Orders variants by chromosome, position and signature
    pub fn sort(&mut self) {
        self.variants.sort_by(|a, b| {
            a.chrom
                .cmp(&b.chrom)
                .then(a.pos.cmp(&b.pos))
                .then_with(|| a.signature().cmp(&b.signature()))
        });
    }

    /// Writes the header followed by every supported variant, returns the number of records
    pub fn write_vcf<W: Write>(&self, filters: &Filters, out: &mut W) -> Result<usize> {
        for line in header_lines(filters) {
            writeln!(out, "{}", line)?;
        }
        let mut written = 0;
        for variant in &self.variants {
            if variant.print_vcf(filters, out)? {
                written += 1;
            }
        }
        info!(
            "Wrote {} of {} candidate variants",
            written,
            self.variants.len()
        );
        Ok(written)
    }
}

impl std::iter::FromIterator<Variant> for VariantSet {
    fn from_iter<I: IntoIterator<Item = Variant>>(iter: I) -> Self {
        let mut set = Self::new();
        for variant in iter {
            set.add(variant);
        }
        set
    }
}

fn parse_field<T: FromStr>(fields: &[&str], idx: usize, name: &str, line: usize) -> Result<T> {
    fields[idx].parse::<T>().map_err(|_| Error::ParseRecord {
        line,
        reason: format!("invalid {} `{}`", name, fields[idx]),
    })
}

/// Parses one line of the candidate table:
/// `chrom pos type len ref alt ref_n alt_n_fwd alt_n_rev ref_t alt_t_fwd alt_t_rev`
pub fn parse_candidate(record: &str, line: usize) -> Result<Variant> {
    let fields: Vec<&str> = record.trim_end().split('\t').collect();
    if fields.len() != 12 {
        return Err(Error::ParseRecord {
            line,
            reason: format!("expected 12 columns but found {}", fields.len()),
        });
    }

    let kind = fields[2]
        .chars()
        .next()
        .filter(|_| fields[2].len() == 1)
        .and_then(VariantType::from_code)
        .ok_or_else(|| Error::ParseRecord {
            line,
            reason: format!("unknown variant type `{}`", fields[2]),
        })?;

    let variant = Variant::new(
        fields[0],
        parse_field(&fields, 1, "position", line)?,
        kind,
        parse_field(&fields, 3, "length", line)?,
        fields[4],
        fields[5],
    )
    .with_normal(
        parse_field(&fields, 6, "normal ref count", line)?,
        parse_field(&fields, 7, "normal forward alt count", line)?,
        parse_field(&fields, 8, "normal reverse alt count", line)?,
    )
    .with_tumor(
        parse_field(&fields, 9, "tumor ref count", line)?,
        parse_field(&fields, 10, "tumor forward alt count", line)?,
        parse_field(&fields, 11, "tumor reverse alt count", line)?,
    );
    Ok(variant)
}

/// Reads candidates, skipping blank and `#` lines
pub fn read_candidates<T: std::io::Read>(rdr: T) -> Result<VariantSet> {
    let mut set = VariantSet::new();
    for (i, line) in BufReader::new(rdr).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let variant = parse_candidate(&line, i + 1)?;
        debug!("Read candidate {}", variant.signature());
        set.add(variant);
    }
    Ok(set)
}

/// Opens a plain or compressed candidate table
pub fn read_candidates_from_path<P: AsRef<Path>>(path: P) -> Result<VariantSet> {
    let (rdr, format) = niffler::from_path(path)?;
    debug!("Candidate table compression: {:?}", format);
    read_candidates(rdr)
}
