use geo_types::{Coord, Line};

/// The ways a noding run can fail.
///
/// Errors surface as values from the top-level
/// [`Noder::compute_nodes`](crate::Noder::compute_nodes) call (or from
/// [`NodingValidator::check`](crate::NodingValidator::check)); the engine
/// performs no retries.
#[derive(Debug, Clone, PartialEq)]
pub enum NodingError {
    /// The input collection is unusable; detected eagerly before any
    /// phase touches geometry.
    InvalidInput(InvalidInput),
    /// Non-integer vertices were fed to the snap-rounding core without a
    /// scaling wrapper. Robustness is only contracted on a uniform
    /// integer grid.
    PrecisionMismatch { index: usize, coord: Coord<f64> },
    /// Rounding merged independent components.
    TopologyCollapse { index: usize, coord: Coord<f64> },
    /// The intersector reported inconsistent orientation signs. This must
    /// never happen with the adaptive predicate and exists as a defensive
    /// diagnostic.
    RobustnessFailure { coord: Coord<f64> },
    /// Two distinct substrings overlap collinearly.
    CollinearOverlap { overlap: Line<f64> },
    /// Two substrings intersect at a point interior to at least one of
    /// them.
    InteriorIntersection { coord: Coord<f64> },
    /// Two substrings have the same vertex sequence.
    DuplicateSubstring { start: Coord<f64>, end: Coord<f64> },
}

/// The concrete defect behind [`NodingError::InvalidInput`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvalidInput {
    /// A segment string has fewer than 2 distinct points.
    TooFewDistinctPoints { index: usize },
    /// A segment string carries a NaN or infinite ordinate.
    NonFiniteOrdinate { index: usize },
    /// The configured scale factor is zero, negative, or not a fixed
    /// grid at all.
    NonPositiveScale { scale: f64 },
}

impl std::fmt::Display for NodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodingError::InvalidInput(kind) => match kind {
                InvalidInput::TooFewDistinctPoints { index } => write!(
                    f,
                    "segment string at index {} must have at least 2 distinct points",
                    index
                ),
                InvalidInput::NonFiniteOrdinate { index } => write!(
                    f,
                    "segment string at index {} contains a non-finite ordinate",
                    index
                ),
                InvalidInput::NonPositiveScale { scale } => {
                    write!(f, "scale factor must be positive, got {:?}", scale)
                }
            },
            NodingError::PrecisionMismatch { index, coord } => write!(
                f,
                "segment string at index {} has off-grid vertex ({:?}, {:?}); snap rounding requires integer-scaled input",
                index, coord.x, coord.y
            ),
            NodingError::TopologyCollapse { index, coord } => write!(
                f,
                "rounding collapsed topology of segment string at index {} near ({:?}, {:?})",
                index, coord.x, coord.y
            ),
            NodingError::RobustnessFailure { coord } => write!(
                f,
                "inconsistent orientation signs near ({:?}, {:?})",
                coord.x, coord.y
            ),
            NodingError::CollinearOverlap { overlap } => write!(
                f,
                "substrings overlap collinearly between ({:?}, {:?}) and ({:?}, {:?})",
                overlap.start.x, overlap.start.y, overlap.end.x, overlap.end.y
            ),
            NodingError::InteriorIntersection { coord } => write!(
                f,
                "substrings intersect at ({:?}, {:?}), which is interior to at least one of them",
                coord.x, coord.y
            ),
            NodingError::DuplicateSubstring { start, end } => write!(
                f,
                "duplicate substring from ({:?}, {:?}) to ({:?}, {:?})",
                start.x, start.y, end.x, end.y
            ),
        }
    }
}

impl std::error::Error for NodingError {}
