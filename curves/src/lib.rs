//! Composite cubic Bézier splines, the curves that every road is built along.
mod bezier;
mod spline;

pub use spline::{ControlPointMode, Spline};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    #[error("control point index {index} is out of range for a spline with {len} points")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("a spline needs 3k+1 control points with k >= 1, got {0}")]
    InvalidPointCount(usize),
    #[error("a spline with {expected} joints can not have {found} control point modes")]
    ModeCountMismatch { expected: usize, found: usize },
}

pub type CurveResult<C> = std::result::Result<C, CurveError>;
