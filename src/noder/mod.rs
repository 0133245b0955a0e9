pub mod hot_pixel;
pub mod mcindex;
pub mod scaled;
pub mod segment_intersector;
pub mod snap_round;

use crate::error::{InvalidInput, NodingError};
use crate::segment_string::SharedSegmentString;

/// Computes nodes for a collection of segment strings.
///
/// A `compute_nodes` invocation is a synchronous pure computation over
/// its input collection: intersection nodes accumulate on the input
/// strings, and [`noded_substrings`](Noder::noded_substrings) afterwards
/// yields the arrangement they imply.
pub trait Noder<D: Clone> {
    fn compute_nodes(&mut self, strings: &[SharedSegmentString<D>]) -> Result<(), NodingError>;

    fn noded_substrings(&self) -> Vec<SharedSegmentString<D>>;
}

/// The strategy a noding driver feeds candidate segment pairs to.
pub trait SegmentIntersector<D> {
    /// Observe the pair `(ss0[index0], ss1[index1])`. `ss0` and `ss1` may
    /// alias (self-noding), so implementations keep their borrows short.
    fn process_intersections(
        &mut self,
        ss0: &SharedSegmentString<D>,
        index0: usize,
        ss1: &SharedSegmentString<D>,
        index1: usize,
    );

    /// Early-termination hint: once this reports `true` the driver stops
    /// feeding pairs.
    fn is_done(&self) -> bool {
        false
    }
}

/// Eager input checks shared by the noders; runs before any phase
/// touches geometry.
pub(crate) fn validate_input<D>(strings: &[SharedSegmentString<D>]) -> Result<(), NodingError> {
    for (index, string) in strings.iter().enumerate() {
        let string = string.borrow();
        let coords = string.coordinates();

        if coords.iter().any(|c| !(c.x.is_finite() && c.y.is_finite())) {
            return Err(NodingError::InvalidInput(InvalidInput::NonFiniteOrdinate {
                index,
            }));
        }
        if !coords.iter().any(|c| *c != coords[0]) {
            return Err(NodingError::InvalidInput(
                InvalidInput::TooFewDistinctPoints { index },
            ));
        }
    }
    Ok(())
}

pub use segment_intersector::{InteriorIntersectionFinder, IntersectionAdder};

#[cfg(test)]
mod test {
    use super::*;
    use crate::segment_string::NodedSegmentString;
    use geo_types::coord;

    #[test]
    fn rejects_degenerate_and_non_finite_input() {
        let degenerate = NodedSegmentString::new(
            vec![coord! { x: 1.0, y: 1.0 }, coord! { x: 1.0, y: 1.0 }],
            (),
        )
        .into_shared();
        assert!(matches!(
            validate_input(&[degenerate]),
            Err(NodingError::InvalidInput(
                InvalidInput::TooFewDistinctPoints { index: 0 }
            ))
        ));

        let non_finite = NodedSegmentString::new(
            vec![coord! { x: 0.0, y: 0.0 }, coord! { x: f64::NAN, y: 1.0 }],
            (),
        )
        .into_shared();
        let ok = NodedSegmentString::new(
            vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 1.0 }],
            (),
        )
        .into_shared();
        assert!(matches!(
            validate_input(&[ok, non_finite]),
            Err(NodingError::InvalidInput(InvalidInput::NonFiniteOrdinate {
                index: 1
            }))
        ));
    }
}
