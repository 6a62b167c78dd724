//! Bracketed root finding shared by the lobe, disc and stream solvers.

use thiserror::Error;

/// Iteration cap used when a caller has no better estimate.
pub const DEFAULT_MAX_ITER: usize = 200;

/// Reasons a bisection could not produce a root.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BisectionError {
    #[error("invalid bracket [{lo}, {hi}]")]
    InvalidBracket { lo: f64, hi: f64 },
    #[error("tolerance must be positive (got {0})")]
    InvalidTolerance(f64),
    #[error("no sign change on [{lo}, {hi}]: f(lo) = {f_lo}, f(hi) = {f_hi}")]
    NoSignChange { lo: f64, hi: f64, f_lo: f64, f_hi: f64 },
    #[error("function is not finite at x = {x}")]
    NonFinite { x: f64 },
    #[error("bracket [{lo}, {hi}] still wider than tolerance after {iterations} iterations")]
    NotConverged { iterations: usize, lo: f64, hi: f64 },
}

/// Locate a zero of `f` inside `[lo, hi]` by repeated halving.
///
/// `f(lo)` and `f(hi)` must differ in sign (an exact zero at either end is
/// returned as-is). The search stops once the bracket is no wider than `tol`
/// and returns its midpoint, or fails after `max_iter` halvings.
pub fn solve_bisection<F>(
    mut f: F,
    lo: f64,
    hi: f64,
    tol: f64,
    max_iter: usize,
) -> Result<f64, BisectionError>
where
    F: FnMut(f64) -> f64,
{
    if !lo.is_finite() || !hi.is_finite() || hi <= lo {
        return Err(BisectionError::InvalidBracket { lo, hi });
    }
    if !(tol > 0.0) {
        return Err(BisectionError::InvalidTolerance(tol));
    }

    let f_lo = f(lo);
    if f_lo.is_nan() {
        return Err(BisectionError::NonFinite { x: lo });
    }
    if f_lo == 0.0 {
        return Ok(lo);
    }
    let f_hi = f(hi);
    if f_hi.is_nan() {
        return Err(BisectionError::NonFinite { x: hi });
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if (f_lo > 0.0) == (f_hi > 0.0) {
        return Err(BisectionError::NoSignChange { lo, hi, f_lo, f_hi });
    }

    let lo_positive = f_lo > 0.0;
    let (mut lo, mut hi) = (lo, hi);
    for _ in 0..max_iter {
        if hi - lo <= tol {
            return Ok(0.5 * (lo + hi));
        }
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if f_mid.is_nan() {
            return Err(BisectionError::NonFinite { x: mid });
        }
        if f_mid == 0.0 {
            return Ok(mid);
        }
        if (f_mid > 0.0) == lo_positive {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    if hi - lo <= tol {
        Ok(0.5 * (lo + hi))
    } else {
        Err(BisectionError::NotConverged {
            iterations: max_iter,
            lo,
            hi,
        })
    }
}
