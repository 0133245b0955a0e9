use std::rc::Rc;

use geo_types::Coord;

use crate::error::NodingError;
use crate::line_intersection::{LineIntersection, RobustLineIntersector};
use crate::segment_string::SharedSegmentString;

/// Postcondition checker for collections that claim to be fully noded.
///
/// Verifies that
/// - no string contains a collapsed `a-b-a` vertex pattern,
/// - no two strings have the same vertex sequence (in either direction),
/// - no two strings overlap collinearly, and
/// - every intersection point coincides with a vertex of both
///   participating strings.
///
/// The check is a brute-force pairwise sweep with the robust
/// intersector; it is meant for tests and debug assertions, not for the
/// hot path.
pub struct NodingValidator<D> {
    strings: Vec<SharedSegmentString<D>>,
}

impl<D> NodingValidator<D> {
    pub fn new(strings: Vec<SharedSegmentString<D>>) -> NodingValidator<D> {
        NodingValidator { strings }
    }

    pub fn check(&self) -> Result<(), NodingError> {
        self.check_collapses()?;
        self.check_duplicates()?;
        self.check_segment_interactions()?;
        Ok(())
    }

    /// An `a-b-a` vertex pattern means rounding folded a spike onto
    /// itself and merged previously independent pieces.
    fn check_collapses(&self) -> Result<(), NodingError> {
        for (index, string) in self.strings.iter().enumerate() {
            let string = string.borrow();
            for window in string.coordinates().windows(3) {
                if window[0] == window[2] {
                    return Err(NodingError::TopologyCollapse {
                        index,
                        coord: window[1],
                    });
                }
            }
        }
        Ok(())
    }

    fn check_duplicates(&self) -> Result<(), NodingError> {
        for (i, s0) in self.strings.iter().enumerate() {
            let c0 = s0.borrow();
            let c0 = c0.coordinates();
            for s1 in &self.strings[i + 1..] {
                let c1 = s1.borrow();
                let c1 = c1.coordinates();
                let equal_forward = c0 == c1;
                let equal_reversed =
                    c0.len() == c1.len() && c0.iter().rev().eq(c1.iter());
                if equal_forward || equal_reversed {
                    return Err(NodingError::DuplicateSubstring {
                        start: c0[0],
                        end: c0[c0.len() - 1],
                    });
                }
            }
        }
        Ok(())
    }

    /// Every segment pair must either be disjoint or meet at a point
    /// that is an endpoint of both segments; any other contact is a
    /// missed node or a collinear overlap.
    fn check_segment_interactions(&self) -> Result<(), NodingError> {
        let mut li = RobustLineIntersector::new();
        for (i, s0) in self.strings.iter().enumerate() {
            for s1 in &self.strings[i..] {
                let same_string = Rc::ptr_eq(s0, s1);
                let count0 = s0.borrow().size() - 1;
                let count1 = s1.borrow().size() - 1;
                for index0 in 0..count0 {
                    for index1 in 0..count1 {
                        if same_string && index0 >= index1 {
                            continue;
                        }
                        let line0 = s0.borrow().segment(index0);
                        let line1 = s1.borrow().segment(index1);
                        li.compute_intersection(line0, line1);
                        match li.result() {
                            None => {}
                            Some(LineIntersection::Collinear { intersection }) => {
                                return Err(NodingError::CollinearOverlap {
                                    overlap: *intersection,
                                });
                            }
                            Some(LineIntersection::SinglePoint { intersection, .. }) => {
                                let pt = *intersection;
                                if li.is_proper() || !is_endpoint_of_both(pt, line0, line1) {
                                    return Err(NodingError::InteriorIntersection { coord: pt });
                                }
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn is_endpoint_of_both(pt: Coord<f64>, line0: geo_types::Line<f64>, line1: geo_types::Line<f64>) -> bool {
    (pt == line0.start || pt == line0.end) && (pt == line1.start || pt == line1.end)
}
