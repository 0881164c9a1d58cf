use lancet::Filters;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "lancet",
    about = "Scores tumor/normal candidate variants and reports them as VCF"
)]
pub(crate) struct Lancet {
    #[structopt(
        help = "Tab delimited candidate table (plain or gzipped)",
        parse(from_os_str)
    )]
    pub(crate) candidates: PathBuf,
    #[structopt(short, long, default_value = "1", help = "Number of threads")]
    pub(crate) threads: usize,
    #[structopt(
        short,
        long,
        parse(from_occurrences),
        help = "Verbosity level, -v for info, -vv for debug and -vvv for trace"
    )]
    pub(crate) verbosity: u64,
    #[structopt(
        long,
        default_value = "5",
        help = "Minimum phred-scaled Fisher's exact test score"
    )]
    pub(crate) min_phred_fisher: f64,
    #[structopt(long, default_value = "10", help = "Minimum coverage in the normal")]
    pub(crate) min_cov_normal: u32,
    #[structopt(long, default_value = "1000000", help = "Maximum coverage in the normal")]
    pub(crate) max_cov_normal: u32,
    #[structopt(long, default_value = "4", help = "Minimum coverage in the tumor")]
    pub(crate) min_cov_tumor: u32,
    #[structopt(long, default_value = "1000000", help = "Maximum coverage in the tumor")]
    pub(crate) max_cov_tumor: u32,
    #[structopt(
        long,
        default_value = "0.04",
        help = "Minimum variant allele frequency in the tumor"
    )]
    pub(crate) min_vaf_tumor: f64,
    #[structopt(
        long,
        default_value = "0",
        help = "Maximum variant allele frequency in the normal"
    )]
    pub(crate) max_vaf_normal: f64,
    #[structopt(
        long,
        default_value = "3",
        help = "Minimum number of alternative reads in the tumor"
    )]
    pub(crate) min_alt_cnt_tumor: u32,
    #[structopt(
        long,
        default_value = "0",
        help = "Maximum number of alternative reads in the normal"
    )]
    pub(crate) max_alt_cnt_normal: u32,
    #[structopt(
        long,
        default_value = "1",
        help = "Minimum alternative reads on each strand in the tumor for SNVs"
    )]
    pub(crate) min_strand_bias: u32,
}

impl Lancet {
    pub(crate) fn set_logging(&self) {
        use log::LevelFilter::*;

        let log_level = match self.verbosity {
            0 => Warn,
            1 => Info,
            2 => Debug,
            _ => Trace,
        };

        env_logger::Builder::new()
            .format_module_path(false)
            .filter_level(log_level)
            .init();
    }

    pub(crate) fn filters(&self) -> Filters {
        Filters {
            min_phred_fisher: self.min_phred_fisher,
            min_cov_normal: self.min_cov_normal,
            max_cov_normal: self.max_cov_normal,
            min_cov_tumor: self.min_cov_tumor,
            max_cov_tumor: self.max_cov_tumor,
            min_vaf_tumor: self.min_vaf_tumor,
            max_vaf_normal: self.max_vaf_normal,
            min_alt_cnt_tumor: self.min_alt_cnt_tumor,
            max_alt_cnt_normal: self.max_alt_cnt_normal,
            min_strand_bias: self.min_strand_bias,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library_filters() {
        let opt = Lancet::from_iter(&["lancet", "candidates.tsv"]);
        assert_eq!(opt.filters(), Filters::default());
        assert_eq!(opt.threads, 1);
    }

    #[test]
    fn thresholds_are_overridable() {
        let opt = Lancet::from_iter(&[
            "lancet",
            "--min-cov-normal",
            "20",
            "--max-vaf-normal",
            "0.1",
            "-vv",
            "candidates.tsv",
        ]);
        let filters = opt.filters();
        assert_eq!(filters.min_cov_normal, 20);
        assert_eq!(filters.max_vaf_normal, 0.1);
        assert_eq!(opt.verbosity, 2);
    }
}
