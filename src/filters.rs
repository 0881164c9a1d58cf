/// Thresholds applied to every variant before it is reported. Coverage and counts exactly at a
/// bound pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Filters {
    /// Minimum phred-scaled Fisher's exact test score
    pub min_phred_fisher: f64,
    /// Minimum total coverage in the normal
    pub min_cov_normal: u32,
    /// Maximum total coverage in the normal
    pub max_cov_normal: u32,
    /// Minimum total coverage in the tumor
    pub min_cov_tumor: u32,
    /// Maximum total coverage in the tumor
    pub max_cov_tumor: u32,
    /// Minimum variant allele fraction in the tumor
    pub min_vaf_tumor: f64,
    /// Maximum variant allele fraction in the normal
    pub max_vaf_normal: f64,
    /// Minimum number of alt reads in the tumor
    pub min_alt_cnt_tumor: u32,
    /// Maximum number of alt reads in the normal
    pub max_alt_cnt_normal: u32,
    /// Minimum alt reads required on each strand in the tumor (substitutions only)
    pub min_strand_bias: u32,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            min_phred_fisher: 5.0,
            min_cov_normal: 10,
            max_cov_normal: 1_000_000,
            min_cov_tumor: 4,
            max_cov_tumor: 1_000_000,
            min_vaf_tumor: 0.04,
            max_vaf_normal: 0.0,
            min_alt_cnt_tumor: 3,
            max_alt_cnt_normal: 0,
            min_strand_bias: 1,
        }
    }
}

/// Named filters in the order they are evaluated and reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    #[allow(missing_docs)]
    LowFisherScore,
    #[allow(missing_docs)]
    LowCovNormal,
    #[allow(missing_docs)]
    HighCovNormal,
    #[allow(missing_docs)]
    LowCovTumor,
    #[allow(missing_docs)]
    HighCovTumor,
    #[allow(missing_docs)]
    LowVafTumor,
    #[allow(missing_docs)]
    HighVafNormal,
    #[allow(missing_docs)]
    LowAltCntTumor,
    #[allow(missing_docs)]
    HighAltCntNormal,
    #[allow(missing_docs)]
    StrandBias,
}

impl Filter {
    /// Every filter in evaluation order
    pub const ALL: [Filter; 10] = [
        Filter::LowFisherScore,
        Filter::LowCovNormal,
        Filter::HighCovNormal,
        Filter::LowCovTumor,
        Filter::HighCovTumor,
        Filter::LowVafTumor,
        Filter::HighVafNormal,
        Filter::LowAltCntTumor,
        Filter::HighAltCntNormal,
        Filter::StrandBias,
    ];

    /// ID used in the FILTER column
    pub fn name(self) -> &'static str {
        match self {
            Filter::LowFisherScore => "LowFisherScore",
            Filter::LowCovNormal => "LowCovNormal",
            Filter::HighCovNormal => "HighCovNormal",
            Filter::LowCovTumor => "LowCovTumor",
            Filter::HighCovTumor => "HighCovTumor",
            Filter::LowVafTumor => "LowVafTumor",
            Filter::HighVafNormal => "HighVafNormal",
            Filter::LowAltCntTumor => "LowAltCntTumor",
            Filter::HighAltCntNormal => "HighAltCntNormal",
            Filter::StrandBias => "StrandBias",
        }
    }

    /// `##FILTER` header line carrying the active threshold
    pub fn header_line(self, filters: &Filters) -> String {
        let description = match self {
            Filter::LowFisherScore => format!(
                "low Fisher's exact test score for tumor-normal allele counts (<{})",
                filters.min_phred_fisher
            ),
            Filter::LowCovNormal => format!("low coverage in the normal (<{})", filters.min_cov_normal),
            Filter::HighCovNormal => {
                format!("high coverage in the normal (>{})", filters.max_cov_normal)
            }
            Filter::LowCovTumor => format!("low coverage in the tumor (<{})", filters.min_cov_tumor),
            Filter::HighCovTumor => format!("high coverage in the tumor (>{})", filters.max_cov_tumor),
            Filter::LowVafTumor => format!(
                "low variant allele frequency in the tumor (<{})",
                filters.min_vaf_tumor
            ),
            Filter::HighVafNormal => format!(
                "high variant allele frequency in the normal (>{})",
                filters.max_vaf_normal
            ),
            Filter::LowAltCntTumor => format!(
                "low number of alternative reads in the tumor (<{})",
                filters.min_alt_cnt_tumor
            ),
            Filter::HighAltCntNormal => format!(
                "high number of alternative reads in the normal (>{})",
                filters.max_alt_cnt_normal
            ),
            Filter::StrandBias => format!(
                "fewer than {} alternative reads on either strand in the tumor",
                filters.min_strand_bias
            ),
        };
        format!(
            r#"##FILTER=<ID={},Description="{}">"#,
            self.name(),
            description
        )
    }
}
