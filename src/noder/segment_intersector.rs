use std::rc::Rc;

use geo_types::Coord;

use crate::line_intersection::RobustLineIntersector;
use crate::noder::SegmentIntersector;
use crate::segment_string::SharedSegmentString;

/// Finds *interior* intersections between candidate segment pairs and
/// registers each one on both participating segment strings, while
/// collecting the intersection points themselves.
///
/// This is the discovery pass of snap rounding: the collected points
/// become hot pixel centres.
pub struct IntersectionAdder {
    li: RobustLineIntersector,
    interior_intersections: Vec<Coord<f64>>,
}

impl IntersectionAdder {
    pub fn new(li: RobustLineIntersector) -> IntersectionAdder {
        IntersectionAdder {
            li,
            interior_intersections: Vec::new(),
        }
    }

    /// Every interior intersection point seen so far, in discovery order
    /// and with duplicates preserved.
    pub fn interior_intersections(&self) -> &[Coord<f64>] {
        &self.interior_intersections
    }

    pub fn into_interior_intersections(self) -> Vec<Coord<f64>> {
        self.interior_intersections
    }
}

impl<D> SegmentIntersector<D> for IntersectionAdder {
    fn process_intersections(
        &mut self,
        ss0: &SharedSegmentString<D>,
        index0: usize,
        ss1: &SharedSegmentString<D>,
        index1: usize,
    ) {
        // a segment never spuriously intersects itself
        if Rc::ptr_eq(ss0, ss1) && index0 == index1 {
            return;
        }

        let line0 = ss0.borrow().segment(index0);
        let line1 = ss1.borrow().segment(index1);
        self.li.compute_intersection(line0, line1);

        if self.li.has_intersection() && self.li.is_interior_intersection() {
            for k in 0..self.li.intersection_count() {
                self.interior_intersections.push(self.li.intersection(k));
            }
            trace!(
                "interior intersection of ({:?}, {}) and ({:?}, {})",
                line0,
                index0,
                line1,
                index1
            );
            // `ss0` may alias `ss1` in the self-noding case; the mutable
            // borrows must not overlap
            ss0.borrow_mut().add_intersections_from(&self.li, index0);
            ss1.borrow_mut().add_intersections_from(&self.li, index1);
        }
    }
}

/// Searches for a single interior intersection and stops at the first
/// one found. Used by validity checking: a fully noded arrangement has
/// none.
pub struct InteriorIntersectionFinder {
    li: RobustLineIntersector,
    interior_intersection: Option<Coord<f64>>,
    check_end_segments_only: bool,
}

impl InteriorIntersectionFinder {
    pub fn new(li: RobustLineIntersector) -> InteriorIntersectionFinder {
        InteriorIntersectionFinder {
            li,
            interior_intersection: None,
            check_end_segments_only: false,
        }
    }

    /// Restricts the search to pairs involving an end-segment of a
    /// string. Valid when upstream processing guarantees interior
    /// segments are already noded, which leaves end-segments as the only
    /// possible source of new interior intersections.
    pub fn set_check_end_segments_only(&mut self, check_end_segments_only: bool) {
        self.check_end_segments_only = check_end_segments_only;
    }

    pub fn has_intersection(&self) -> bool {
        self.interior_intersection.is_some()
    }

    pub fn intersection(&self) -> Option<Coord<f64>> {
        self.interior_intersection
    }
}

fn is_end_segment<D>(ss: &SharedSegmentString<D>, index: usize) -> bool {
    index == 0 || index + 2 >= ss.borrow().size()
}

impl<D> SegmentIntersector<D> for InteriorIntersectionFinder {
    fn process_intersections(
        &mut self,
        ss0: &SharedSegmentString<D>,
        index0: usize,
        ss1: &SharedSegmentString<D>,
        index1: usize,
    ) {
        if self.interior_intersection.is_some() {
            return;
        }
        if Rc::ptr_eq(ss0, ss1) && index0 == index1 {
            return;
        }
        if self.check_end_segments_only
            && !(is_end_segment(ss0, index0) || is_end_segment(ss1, index1))
        {
            return;
        }

        let line0 = ss0.borrow().segment(index0);
        let line1 = ss1.borrow().segment(index1);
        self.li.compute_intersection(line0, line1);

        if self.li.has_intersection() && self.li.is_interior_intersection() {
            self.interior_intersection = Some(self.li.intersection(0));
        }
    }

    fn is_done(&self) -> bool {
        self.interior_intersection.is_some()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::segment_string::NodedSegmentString;
    use geo_types::coord;

    fn string(coords: Vec<Coord<f64>>) -> SharedSegmentString<()> {
        NodedSegmentString::new(coords, ()).into_shared()
    }

    #[test]
    fn adder_records_crossing_on_both_strings() {
        let a = string(vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 10.0 }]);
        let b = string(vec![coord! { x: 0.0, y: 10.0 }, coord! { x: 10.0, y: 0.0 }]);

        let mut adder = IntersectionAdder::new(RobustLineIntersector::new());
        adder.process_intersections(&a, 0, &b, 0);

        assert_eq!(adder.interior_intersections(), &[coord! { x: 5.0, y: 5.0 }]);
        assert_eq!(a.borrow().nodes().len(), 1);
        assert_eq!(b.borrow().nodes().len(), 1);
    }

    #[test]
    fn adder_ignores_shared_endpoints() {
        let a = string(vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 5.0, y: 5.0 }]);
        let b = string(vec![coord! { x: 5.0, y: 5.0 }, coord! { x: 10.0, y: 0.0 }]);

        let mut adder = IntersectionAdder::new(RobustLineIntersector::new());
        adder.process_intersections(&a, 0, &b, 0);

        assert!(adder.interior_intersections().is_empty());
        assert!(a.borrow().nodes().is_empty());
        assert!(b.borrow().nodes().is_empty());
    }

    #[test]
    fn adder_skips_self_pair() {
        let a = string(vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 10.0 }]);
        let mut adder = IntersectionAdder::new(RobustLineIntersector::new());
        adder.process_intersections(&a, 0, &a, 0);
        assert!(adder.interior_intersections().is_empty());
    }

    #[test]
    fn self_noding_registers_on_the_one_string() {
        // bowtie: segments 0 and 2 of the same string cross at (5, 5)
        let a = string(vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 10.0, y: 10.0 },
            coord! { x: 10.0, y: 0.0 },
            coord! { x: 0.0, y: 10.0 },
        ]);
        let mut adder = IntersectionAdder::new(RobustLineIntersector::new());
        adder.process_intersections(&a, 0, &a, 2);

        assert_eq!(adder.interior_intersections(), &[coord! { x: 5.0, y: 5.0 }]);
        // one node on segment 0, one on segment 2
        assert_eq!(a.borrow().nodes().len(), 2);
    }

    #[test]
    fn finder_stops_after_first_hit() {
        let a = string(vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 10.0 }]);
        let b = string(vec![coord! { x: 0.0, y: 10.0 }, coord! { x: 10.0, y: 0.0 }]);

        let mut finder = InteriorIntersectionFinder::new(RobustLineIntersector::new());
        assert!(!SegmentIntersector::<()>::is_done(&finder));
        finder.process_intersections(&a, 0, &b, 0);
        assert!(SegmentIntersector::<()>::is_done(&finder));
        assert_eq!(finder.intersection(), Some(coord! { x: 5.0, y: 5.0 }));
        // further pairs are not examined
        finder.process_intersections(&b, 0, &a, 0);
        assert_eq!(finder.intersection(), Some(coord! { x: 5.0, y: 5.0 }));
    }

    #[test]
    fn end_segments_only_skips_interior_pairs() {
        let a = string(vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 4.0, y: 0.0 },
            coord! { x: 6.0, y: 0.0 },
            coord! { x: 10.0, y: 0.0 },
        ]);
        let b = string(vec![
            coord! { x: 5.0, y: -1.0 },
            coord! { x: 5.0, y: -0.5 },
            coord! { x: 5.0, y: 0.5 },
            coord! { x: 5.0, y: 1.0 },
        ]);

        let mut finder = InteriorIntersectionFinder::new(RobustLineIntersector::new());
        finder.set_check_end_segments_only(true);
        // the crossing pair is interior on both strings, so it is skipped
        finder.process_intersections(&a, 1, &b, 1);
        assert!(!finder.has_intersection());
        finder.set_check_end_segments_only(false);
        finder.process_intersections(&a, 1, &b, 1);
        assert!(finder.has_intersection());
    }
}
