use crate::filters::{Filter, Filters};
use crate::fisher::exact_test;
use crate::error::Error;
use crate::Result;
use log::{debug, trace};
use std::convert::TryFrom;
use std::io::Write;

/// VCF FORMAT keys used for both sample columns
pub const FORMAT: &str = "GT:AD:SC:DP";

/// Kind of sequence change
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VariantType {
    #[allow(missing_docs)]
    Insertion,
    #[allow(missing_docs)]
    Deletion,
    #[allow(missing_docs)]
    Substitution,
}

impl VariantType {
    /// Single letter code, `I`, `D` or `S`
    pub fn code(self) -> char {
        match self {
            VariantType::Insertion => 'I',
            VariantType::Deletion => 'D',
            VariantType::Substitution => 'S',
        }
    }

    /// Parses the single letter code
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'I' => Some(VariantType::Insertion),
            'D' => Some(VariantType::Deletion),
            'S' => Some(VariantType::Substitution),
            _ => None,
        }
    }

    /// Value of the `TYPE` INFO tag
    pub fn info_tag(self) -> &'static str {
        match self {
            VariantType::Insertion => "ins",
            VariantType::Deletion => "del",
            VariantType::Substitution => "snv",
        }
    }
}

/// Which samples carry the alternative allele
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportState {
    /// Alt reads in both tumor and normal
    Shared,
    /// Alt reads in the tumor only
    Somatic,
    /// Alt reads in the normal only
    Normal,
    /// No alt reads at all, never reported
    NoEvidence,
}

impl SupportState {
    /// Classifies the support pattern from the alt read totals of each sample
    pub fn from_alt_counts(alt_normal: u64, alt_tumor: u64) -> Self {
        match (alt_normal > 0, alt_tumor > 0) {
            (true, true) => SupportState::Shared,
            (false, true) => SupportState::Somatic,
            (true, false) => SupportState::Normal,
            (false, false) => SupportState::NoEvidence,
        }
    }

    /// Status written at the start of the INFO column
    pub fn status(self) -> &'static str {
        match self {
            SupportState::Shared => "SHARED",
            SupportState::Somatic => "SOMATIC",
            SupportState::Normal => "NORMAL",
            SupportState::NoEvidence => "NONE",
        }
    }
}

/// VCF genotype from the ref and alt read counts of one sample
pub fn genotype(ref_count: u64, alt_count: u64) -> &'static str {
    match (ref_count > 0, alt_count > 0) {
        (true, true) => "0/1",
        (true, false) => "0/0",
        (false, true) => "1/1",
        (false, false) => ".",
    }
}

/// Phred scaled probability, exactly 0 when `p` is 1
pub fn phred_score(p: f64) -> f64 {
    if p >= 1.0 {
        0.0
    } else {
        -10.0 * p.log10()
    }
}

fn trim_zeros(formatted: &str) -> &str {
    if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted
    }
}

/// Formats a score with six significant digits and no trailing zeros.
///
/// Like C's `%g`, exponents below -4 or above 5 switch to scientific notation with a signed
/// two digit exponent, e.g. `1.234e-05`.
pub fn format_score(score: f64) -> String {
    if score == 0.0 || !score.is_finite() {
        return format!("{}", score);
    }
    // exponent after rounding to six significant digits
    let scientific = format!("{:.5e}", score);
    let (mantissa, exponent) = match scientific.find('e') {
        Some(at) => (&scientific[..at], &scientific[at + 1..]),
        None => (&scientific[..], "0"),
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if exponent < -4 || exponent > 5 {
        format!(
            "{}e{}{:02}",
            trim_zeros(mantissa),
            if exponent < 0 { '-' } else { '+' },
            exponent.abs()
        )
    } else {
        let decimals = (5 - exponent) as usize;
        trim_zeros(&format!("{:.*}", decimals, score)).to_string()
    }
}

fn vaf(alt: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        alt as f64 / total as f64
    }
}

/// Candidate variant with the allele counts observed in each sample.
///
/// Score and genotypes are only valid after [`Variant::update`] has been called following the last
/// change to the counts.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct Variant {
    pub chrom: String,
    pub pos: u64,
    pub kind: VariantType,
    pub len: u32,
    pub ref_allele: String,
    pub alt_allele: String,
    pub ref_cov_normal: u32,
    pub alt_cov_normal_fwd: u32,
    pub alt_cov_normal_rev: u32,
    pub ref_cov_tumor: u32,
    pub alt_cov_tumor_fwd: u32,
    pub alt_cov_tumor_rev: u32,
    fet_score: f64,
    gt_normal: &'static str,
    gt_tumor: &'static str,
}

impl Variant {
    /// Creates a variant without any supporting reads
    pub fn new<C, R, A>(
        chrom: C,
        pos: u64,
        kind: VariantType,
        len: u32,
        ref_allele: R,
        alt_allele: A,
    ) -> Self
    where
        C: Into<String>,
        R: Into<String>,
        A: Into<String>,
    {
        Self {
            chrom: chrom.into(),
            pos,
            kind,
            len,
            ref_allele: ref_allele.into(),
            alt_allele: alt_allele.into(),
            ref_cov_normal: 0,
            alt_cov_normal_fwd: 0,
            alt_cov_normal_rev: 0,
            ref_cov_tumor: 0,
            alt_cov_tumor_fwd: 0,
            alt_cov_tumor_rev: 0,
            fet_score: 0.0,
            gt_normal: ".",
            gt_tumor: ".",
        }
    }

    /// Sets the normal counts, ref then alt on forward and reverse strand
    pub fn with_normal(mut self, ref_cov: u32, alt_fwd: u32, alt_rev: u32) -> Self {
        self.ref_cov_normal = ref_cov;
        self.alt_cov_normal_fwd = alt_fwd;
        self.alt_cov_normal_rev = alt_rev;
        self
    }

    /// Sets the tumor counts, ref then alt on forward and reverse strand
    pub fn with_tumor(mut self, ref_cov: u32, alt_fwd: u32, alt_rev: u32) -> Self {
        self.ref_cov_tumor = ref_cov;
        self.alt_cov_tumor_fwd = alt_fwd;
        self.alt_cov_tumor_rev = alt_rev;
        self
    }

    /// Alt reads in the normal over both strands
    pub fn alt_cov_normal(&self) -> u64 {
        u64::from(self.alt_cov_normal_fwd) + u64::from(self.alt_cov_normal_rev)
    }

    #[allow(missing_docs)]
    pub fn alt_cov_tumor(&self) -> u64 {
        u64::from(self.alt_cov_tumor_fwd) + u64::from(self.alt_cov_tumor_rev)
    }

    /// Total depth in the normal
    pub fn cov_normal(&self) -> u64 {
        u64::from(self.ref_cov_normal) + self.alt_cov_normal()
    }

    /// Total depth in the tumor
    pub fn cov_tumor(&self) -> u64 {
        u64::from(self.ref_cov_tumor) + self.alt_cov_tumor()
    }

    /// Alt allele fraction in the normal, 0 without coverage
    pub fn vaf_normal(&self) -> f64 {
        vaf(self.alt_cov_normal(), self.cov_normal())
    }

    /// Alt allele fraction in the tumor, 0 without coverage
    pub fn vaf_tumor(&self) -> f64 {
        vaf(self.alt_cov_tumor(), self.cov_tumor())
    }

    #[allow(missing_docs)]
    pub fn best_state(&self) -> SupportState {
        SupportState::from_alt_counts(self.alt_cov_normal(), self.alt_cov_tumor())
    }

    /// Phred scaled Fisher's exact test score
    pub fn fet_score(&self) -> f64 {
        self.fet_score
    }

    #[allow(missing_docs)]
    pub fn genotype_normal(&self) -> &'static str {
        self.gt_normal
    }

    #[allow(missing_docs)]
    pub fn genotype_tumor(&self) -> &'static str {
        self.gt_tumor
    }

    fn table_count(&self, count: u64) -> Result<u32> {
        u32::try_from(count).map_err(|_| Error::CountOverflow(self.signature()))
    }

    /// Recomputes the Fisher's exact test score and both genotypes from the current counts.
    ///
    /// Fails without touching the previous score when a summed alt count does not fit a `u32`.
    pub fn update(&mut self) -> Result<()> {
        let alt_normal = self.table_count(self.alt_cov_normal())?;
        let alt_tumor = self.table_count(self.alt_cov_tumor())?;
        let p = exact_test(self.ref_cov_normal, self.ref_cov_tumor, alt_normal, alt_tumor)?;
        self.fet_score = phred_score(p.two_tail);
        self.gt_normal = genotype(self.ref_cov_normal.into(), self.alt_cov_normal());
        self.gt_tumor = genotype(self.ref_cov_tumor.into(), self.alt_cov_tumor());
        trace!(
            "{} two-tailed p-value {} score {}",
            self.signature(),
            p.two_tail,
            self.fet_score
        );
        Ok(())
    }

    /// Filters the variant fails, in evaluation order
    pub fn failed_filters(&self, filters: &Filters) -> Vec<Filter> {
        Filter::ALL
            .iter()
            .copied()
            .filter(|filter| match filter {
                Filter::LowFisherScore => self.fet_score < filters.min_phred_fisher,
                Filter::LowCovNormal => self.cov_normal() < u64::from(filters.min_cov_normal),
                Filter::HighCovNormal => self.cov_normal() > u64::from(filters.max_cov_normal),
                Filter::LowCovTumor => self.cov_tumor() < u64::from(filters.min_cov_tumor),
                Filter::HighCovTumor => self.cov_tumor() > u64::from(filters.max_cov_tumor),
                Filter::LowVafTumor => self.vaf_tumor() < filters.min_vaf_tumor,
                Filter::HighVafNormal => self.vaf_normal() > filters.max_vaf_normal,
                Filter::LowAltCntTumor => {
                    self.alt_cov_tumor() < u64::from(filters.min_alt_cnt_tumor)
                }
                Filter::HighAltCntNormal => {
                    self.alt_cov_normal() > u64::from(filters.max_alt_cnt_normal)
                }
                Filter::StrandBias => {
                    self.kind == VariantType::Substitution
                        && (self.alt_cov_tumor_fwd < filters.min_strand_bias
                            || self.alt_cov_tumor_rev < filters.min_strand_bias)
                }
            })
            .collect()
    }

    /// Content of the FILTER column, `PASS` or the failed filters joined by `;`
    pub fn filter_field(&self, filters: &Filters) -> String {
        let failed = self.failed_filters(filters);
        if failed.is_empty() {
            String::from("PASS")
        } else {
            failed
                .iter()
                .map(|filter| filter.name())
                .collect::<Vec<_>>()
                .join(";")
        }
    }

    fn sample_column(gt: &str, ref_cov: u32, alt_fwd: u32, alt_rev: u32) -> String {
        let alt = u64::from(alt_fwd) + u64::from(alt_rev);
        format!(
            "{}:{},{}:{},{}:{}",
            gt,
            ref_cov,
            alt,
            alt_fwd,
            alt_rev,
            u64::from(ref_cov) + alt
        )
    }

    /// Tab delimited VCF data line, `None` for variants without any alt support
    pub fn to_vcf_record(&self, filters: &Filters) -> Option<String> {
        let state = self.best_state();
        if state == SupportState::NoEvidence {
            debug!("Skipping {} as no read supports it", self.signature());
            return None;
        }

        let score = format_score(self.fet_score);
        let info = format!(
            "{};FETS={};TYPE={}",
            state.status(),
            score,
            self.kind.info_tag()
        );
        let filter = self.filter_field(filters);
        debug!("{} FILTER {}", self.signature(), filter);

        Some(format!(
            "{}\t{}\t.\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.chrom,
            self.pos,
            self.ref_allele,
            self.alt_allele,
            score,
            filter,
            info,
            FORMAT,
            Self::sample_column(
                self.gt_normal,
                self.ref_cov_normal,
                self.alt_cov_normal_fwd,
                self.alt_cov_normal_rev
            ),
            Self::sample_column(
                self.gt_tumor,
                self.ref_cov_tumor,
                self.alt_cov_tumor_fwd,
                self.alt_cov_tumor_rev
            ),
        ))
    }

    /// Writes the VCF data line to `out`, returns whether anything was written
    pub fn print_vcf<W: Write>(&self, filters: &Filters, out: &mut W) -> Result<bool> {
        match self.to_vcf_record(filters) {
            Some(record) => {
                writeln!(out, "{}", record)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Identity key `chrom:pos:type:len:ref:alt`
    pub fn signature(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}:{}",
            self.chrom,
            self.pos,
            self.kind.code(),
            self.len,
            self.ref_allele,
            self.alt_allele
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn somatic_snv() -> Variant {
        Variant::new("chr1", 100, VariantType::Substitution, 1, "A", "G")
            .with_normal(20, 0, 0)
            .with_tumor(15, 3, 2)
    }

    #[test]
    fn genotype_mapping() {
        assert_eq!(genotype(0, 0), ".");
        assert_eq!(genotype(5, 0), "0/0");
        assert_eq!(genotype(0, 5), "1/1");
        assert_eq!(genotype(3, 2), "0/1");
    }

    #[test]
    fn support_states() {
        assert_eq!(SupportState::from_alt_counts(2, 3), SupportState::Shared);
        assert_eq!(SupportState::from_alt_counts(0, 3), SupportState::Somatic);
        assert_eq!(SupportState::from_alt_counts(2, 0), SupportState::Normal);
        assert_eq!(SupportState::from_alt_counts(0, 0), SupportState::NoEvidence);
    }

    #[test]
    fn certain_null_scores_exactly_zero() {
        let score = phred_score(1.0);
        assert_eq!(score, 0.0);
        assert!(score.is_sign_positive());
        assert_eq!(format_score(score), "0");
        assert!((phred_score(0.01) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn scores_print_like_six_significant_digits() {
        assert_eq!(format_score(13.26981234), "13.2698");
        assert_eq!(format_score(123.456789), "123.457");
        assert_eq!(format_score(20.0), "20");
        assert_eq!(format_score(0.5), "0.5");
        assert_eq!(format_score(0.0001), "0.0001");
        assert_eq!(format_score(999999.4), "999999");
    }

    #[test]
    fn extreme_scores_use_exponent_notation() {
        assert_eq!(format_score(0.00001234), "1.234e-05");
        assert_eq!(format_score(1234567.0), "1.23457e+06");
        assert_eq!(format_score(999999.7), "1e+06");
        assert_eq!(format_score(2.5e-12), "2.5e-12");
        assert_eq!(format_score(3.0e120), "3e+120");
    }

    #[test]
    fn unsupported_variant_is_not_printed() {
        let mut variant = Variant::new("chr2", 5, VariantType::Deletion, 2, "ACT", "A")
            .with_normal(30, 0, 0)
            .with_tumor(25, 0, 0);
        variant.update().unwrap();
        assert_eq!(variant.fet_score(), 0.0);
        assert_eq!(variant.best_state(), SupportState::NoEvidence);
        assert_eq!(variant.to_vcf_record(&Filters::default()), None);

        let mut out = Vec::new();
        assert!(!variant.print_vcf(&Filters::default(), &mut out).unwrap());
        assert!(out.is_empty());
    }

    #[test]
    fn balanced_table_scores_zero() {
        let mut variant = Variant::new("chr1", 9, VariantType::Substitution, 1, "T", "A")
            .with_normal(10, 5, 5)
            .with_tumor(10, 5, 5);
        variant.update().unwrap();
        // two-tailed p sums every table, so only rounding can keep it below 1
        assert!(variant.fet_score() >= 0.0);
        assert!(variant.fet_score() < 1e-6);
    }

    #[test]
    fn huge_strand_counts_do_not_wrap() {
        let mut variant = Variant::new("chr1", 100, VariantType::Substitution, 1, "A", "G")
            .with_normal(10, 3_000_000_000, 2_000_000_000)
            .with_tumor(10, 1, 1);
        assert_eq!(variant.alt_cov_normal(), 5_000_000_000);
        assert_eq!(variant.cov_normal(), 5_000_000_010);
        assert!(variant.vaf_normal() > 0.99);

        match variant.update() {
            Err(Error::CountOverflow(signature)) => assert_eq!(signature, "chr1:100:S:1:A:G"),
            other => panic!("expected an overflow error, got {:?}", other),
        }
        assert_eq!(variant.fet_score(), 0.0);

        let record = variant.to_vcf_record(&Filters::default()).unwrap();
        assert!(record.ends_with("	.:10,5000000000:3000000000,2000000000:5000000010	.:10,2:1,1:12"));
    }

    #[test]
    fn somatic_snv_end_to_end() {
        let mut variant = somatic_snv();
        variant.update().unwrap();

        assert_eq!(variant.genotype_normal(), "0/0");
        assert_eq!(variant.genotype_tumor(), "0/1");
        assert_eq!(variant.best_state(), SupportState::Somatic);
        // two-tailed p = 2 * C(20,5) / C(40,5)
        assert!(variant.fet_score() > 13.0 && variant.fet_score() < 13.5);

        let record = variant.to_vcf_record(&Filters::default()).unwrap();
        let fields: Vec<_> = record.split('\t').collect();
        assert_eq!(fields.len(), 11);
        assert_eq!(&fields[..5], &["chr1", "100", ".", "A", "G"]);
        assert_eq!(fields[6], "PASS");
        assert!(fields[7].starts_with("SOMATIC;FETS="));
        assert!(fields[7].ends_with(";TYPE=snv"));
        assert_eq!(fields[8], "GT:AD:SC:DP");
        assert_eq!(fields[9], "0/0:20,0:0,0:20");
        assert_eq!(fields[10], "0/1:15,5:3,2:20");

        let mut out = Vec::new();
        assert!(variant.print_vcf(&Filters::default(), &mut out).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", record));
    }

    #[test]
    fn filters_are_reported_in_order() {
        let mut variant = Variant::new("chr3", 7, VariantType::Substitution, 1, "C", "T")
            .with_normal(3, 1, 0)
            .with_tumor(10, 4, 0);
        variant.update().unwrap();

        assert_eq!(variant.best_state(), SupportState::Shared);
        assert_eq!(
            variant.filter_field(&Filters::default()),
            "LowFisherScore;LowCovNormal;HighVafNormal;HighAltCntNormal;StrandBias"
        );

        variant.kind = VariantType::Deletion;
        assert_eq!(
            variant.filter_field(&Filters::default()),
            "LowFisherScore;LowCovNormal;HighVafNormal;HighAltCntNormal"
        );
        let record = variant.to_vcf_record(&Filters::default()).unwrap();
        assert!(record.contains("\tSHARED;FETS="));
        assert!(record.contains(";TYPE=del\t"));
    }

    #[test]
    fn bounds_are_inclusive() {
        let filters = Filters {
            min_phred_fisher: 0.0,
            min_cov_normal: 10,
            max_cov_normal: 10,
            min_cov_tumor: 10,
            max_cov_tumor: 10,
            min_vaf_tumor: 0.5,
            max_vaf_normal: 0.0,
            min_alt_cnt_tumor: 5,
            max_alt_cnt_normal: 0,
            min_strand_bias: 2,
        };
        let mut variant = Variant::new("chr1", 1, VariantType::Substitution, 1, "A", "C")
            .with_normal(10, 0, 0)
            .with_tumor(5, 3, 2);
        variant.update().unwrap();
        assert!(variant.failed_filters(&filters).is_empty());
        assert_eq!(variant.filter_field(&filters), "PASS");
    }

    #[test]
    fn vaf_without_coverage_is_zero() {
        let variant = Variant::new("chr1", 1, VariantType::Insertion, 3, "A", "ATTT");
        assert_eq!(variant.vaf_tumor(), 0.0);
        assert_eq!(variant.vaf_normal(), 0.0);
        assert_eq!(variant.genotype_tumor(), ".");
    }

    #[test]
    fn evidence_changes_need_update() {
        let mut variant = somatic_snv();
        variant.update().unwrap();
        variant.alt_cov_normal_fwd = 4;
        assert_eq!(variant.genotype_normal(), "0/0");
        variant.update().unwrap();
        assert_eq!(variant.genotype_normal(), "0/1");
    }

    #[test]
    fn signature_fields() {
        assert_eq!(somatic_snv().signature(), "chr1:100:S:1:A:G");
        assert_eq!(VariantType::from_code('d'), Some(VariantType::Deletion));
        assert_eq!(VariantType::from_code('X'), None);
    }
}
