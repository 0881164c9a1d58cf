use crate::Result;
use fishers_exact::fishers_exact;

/// One- and two-sided p-values of Fisher's exact test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FisherPValues {
    /// P(X <= a)
    pub left: f64,
    /// P(X >= a)
    pub right: f64,
    /// Probability of any table at most as likely as the observed one
    pub two_tail: f64,
}

/// Runs Fisher's exact test on the 2x2 table
///
/// ```text
/// | a | b |
/// | c | d |
/// ```
pub fn exact_test(a: u32, b: u32, c: u32, d: u32) -> Result<FisherPValues> {
    let result = fishers_exact(&[a, b, c, d])?;
    Ok(FisherPValues {
        left: result.less_pvalue,
        right: result.greater_pvalue,
        two_tail: result.two_tail_pvalue,
    })
}
