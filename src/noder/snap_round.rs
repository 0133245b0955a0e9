use std::rc::Rc;

use geo_types::Coord;

use crate::error::{InvalidInput, NodingError};
use crate::line_intersection::RobustLineIntersector;
use crate::noder::hot_pixel::HotPixel;
use crate::noder::mcindex::McIndexNoder;
use crate::noder::segment_intersector::IntersectionAdder;
use crate::noder::{validate_input, Noder};
use crate::precision::PrecisionModel;
use crate::segment_string::{NodedSegmentString, SharedSegmentString};

/// Fully nodes a collection of segment strings by snap rounding them
/// onto a fixed integer grid.
///
/// The run is a linear three-phase pipeline:
///
/// 1. *scan* — discover every interior intersection point with the
///    indexed single-pass noder;
/// 2. *snap to pixels* — build a [`HotPixel`] around each intersection
///    point and node every segment passing through it;
/// 3. *snap to vertices* — build a pixel around every input vertex and
///    node every other segment passing through it, noding the vertex's
///    own string as well whenever it snapped something.
///
/// Afterwards every pair of output substrings either shares a snapped
/// vertex or passes through disjoint pixels, which is what makes the
/// arrangement robust against roundoff: no finite perturbation below the
/// grid resolution can re-introduce a crossing.
///
/// Input vertices must already lie on the grid of the fixed precision
/// model; [`ScaledNoder`](crate::ScaledNoder) lifts arbitrary
/// floating-point input into such a grid.
pub struct SnapRoundingNoder<D> {
    precision_model: PrecisionModel,
    noded: Vec<SharedSegmentString<D>>,
}

impl<D> SnapRoundingNoder<D> {
    pub fn new(precision_model: PrecisionModel) -> SnapRoundingNoder<D> {
        SnapRoundingNoder {
            precision_model,
            noded: Vec::new(),
        }
    }

    fn check_on_grid(&self, strings: &[SharedSegmentString<D>]) -> Result<(), NodingError> {
        for (index, string) in strings.iter().enumerate() {
            let string = string.borrow();
            for &coord in string.coordinates() {
                if self.precision_model.make_coord_precise(coord) != coord {
                    return Err(NodingError::PrecisionMismatch { index, coord });
                }
            }
        }
        Ok(())
    }

    /// Phase 1: every interior intersection point of the input
    /// arrangement, rounded onto the grid by the intersector and with
    /// duplicates removed.
    fn find_interior_intersections(
        &self,
        strings: &[SharedSegmentString<D>],
    ) -> Result<Vec<Coord<f64>>, NodingError>
    where
        D: Clone,
    {
        let mut li = RobustLineIntersector::new();
        li.set_precision_model(self.precision_model);

        let mut noder = McIndexNoder::new(IntersectionAdder::new(li));
        noder.compute_nodes(strings)?;

        let mut intersections = noder
            .into_segment_intersector()
            .into_interior_intersections();
        intersections.sort_unstable_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        intersections.dedup();
        Ok(intersections)
    }

    /// Phase 2: node every segment that passes through the hot pixel of
    /// an intersection point.
    fn compute_intersection_snaps(
        &self,
        intersections: &[Coord<f64>],
        strings: &[SharedSegmentString<D>],
        scale: f64,
    ) {
        for &point in intersections {
            let pixel = HotPixel::new(point, scale);
            for string in strings {
                let segment_count = string.borrow().size() - 1;
                for j in 0..segment_count {
                    pixel.add_snapped_node(string, j);
                }
            }
        }
    }

    /// Phase 3: node every segment that passes through the hot pixel of
    /// an input vertex.
    ///
    /// Every vertex is tested against every string *including its own*,
    /// skipping only the segment that starts at the vertex itself; and a
    /// vertex whose pixel snapped anything becomes a node of its own
    /// string too, so both sides of the junction split.
    fn compute_vertex_snaps(&self, strings: &[SharedSegmentString<D>], scale: f64) {
        for s0 in strings {
            let coords0: Vec<Coord<f64>> = s0.borrow().coordinates().to_vec();
            for (i, &vertex) in coords0.iter().enumerate() {
                let pixel = HotPixel::new(vertex, scale);
                let mut snapped = false;
                for s1 in strings {
                    let same_string = Rc::ptr_eq(s0, s1);
                    let segment_count = s1.borrow().size() - 1;
                    for j in 0..segment_count {
                        if same_string && j == i {
                            continue;
                        }
                        if pixel.add_snapped_node(s1, j) {
                            snapped = true;
                        }
                    }
                }
                if snapped {
                    s0.borrow_mut()
                        .add_intersection(vertex, i.min(coords0.len() - 2));
                }
            }
        }
    }
}

impl<D: Clone> Noder<D> for SnapRoundingNoder<D> {
    fn compute_nodes(&mut self, strings: &[SharedSegmentString<D>]) -> Result<(), NodingError> {
        let scale = self.precision_model.scale();
        if !(scale > 0.0) {
            return Err(NodingError::InvalidInput(InvalidInput::NonPositiveScale {
                scale,
            }));
        }
        validate_input(strings)?;
        self.check_on_grid(strings)?;
        self.noded = strings.to_vec();

        let intersections = self.find_interior_intersections(strings)?;
        debug!(
            "snap round: {} distinct interior intersection points",
            intersections.len()
        );
        self.compute_intersection_snaps(&intersections, strings, scale);
        self.compute_vertex_snaps(strings, scale);
        Ok(())
    }

    fn noded_substrings(&self) -> Vec<SharedSegmentString<D>> {
        NodedSegmentString::noded_substrings(&self.noded)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use geo_types::coord;

    fn string(coords: Vec<Coord<f64>>) -> SharedSegmentString<()> {
        NodedSegmentString::new(coords, ()).into_shared()
    }

    fn snap_round(strings: &[SharedSegmentString<()>]) -> Vec<SharedSegmentString<()>> {
        let mut noder = SnapRoundingNoder::new(PrecisionModel::fixed(1.0));
        noder.compute_nodes(strings).unwrap();
        noder.noded_substrings()
    }

    fn endpoints(s: &SharedSegmentString<()>) -> (Coord<f64>, Coord<f64>) {
        let s = s.borrow();
        (s.coordinate(0), s.coordinate(s.size() - 1))
    }

    fn count_touching(noded: &[SharedSegmentString<()>], p: Coord<f64>) -> usize {
        noded
            .iter()
            .filter(|s| {
                let (a, b) = endpoints(s);
                a == p || b == p
            })
            .count()
    }

    #[test]
    fn single_cross() {
        let noded = snap_round(&[
            string(vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 10.0 }]),
            string(vec![coord! { x: 0.0, y: 10.0 }, coord! { x: 10.0, y: 0.0 }]),
        ]);
        assert_eq!(noded.len(), 4);
        assert_eq!(count_touching(&noded, coord! { x: 5.0, y: 5.0 }), 4);
    }

    #[test]
    fn near_miss_becomes_junction() {
        let noded = snap_round(&[
            string(vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 0.0 }]),
            string(vec![coord! { x: 5.0, y: 1.0 }, coord! { x: 5.0, y: -1.0 }]),
        ]);
        // the crossing at (5,0) nodes both lines there
        assert_eq!(count_touching(&noded, coord! { x: 5.0, y: 0.0 }), 4);
        for sub in &noded {
            let (a, b) = endpoints(sub);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn t_junction() {
        let noded = snap_round(&[
            string(vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 0.0 }]),
            string(vec![coord! { x: 5.0, y: 0.0 }, coord! { x: 5.0, y: 5.0 }]),
        ]);
        assert_eq!(noded.len(), 3);
        let mut pieces: Vec<(Coord<f64>, Coord<f64>)> = noded.iter().map(endpoints).collect();
        pieces.sort_by(|a, b| {
            (a.0.x, a.0.y, a.1.x, a.1.y)
                .partial_cmp(&(b.0.x, b.0.y, b.1.x, b.1.y))
                .unwrap()
        });
        assert_eq!(
            pieces,
            vec![
                (coord! { x: 0.0, y: 0.0 }, coord! { x: 5.0, y: 0.0 }),
                (coord! { x: 5.0, y: 0.0 }, coord! { x: 5.0, y: 5.0 }),
                (coord! { x: 5.0, y: 0.0 }, coord! { x: 10.0, y: 0.0 }),
            ]
        );
    }

    #[test]
    fn self_intersection() {
        let noded = snap_round(&[string(vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 10.0, y: 10.0 },
            coord! { x: 10.0, y: 0.0 },
            coord! { x: 0.0, y: 10.0 },
        ])]);
        // four pieces meet at the self-intersection point
        assert_eq!(count_touching(&noded, coord! { x: 5.0, y: 5.0 }), 4);
        // and the vertex pixels split the string at its corners
        assert_eq!(noded.len(), 5);
    }

    #[test]
    fn collinear_overlap_keeps_both_parents_pieces() {
        let noded = snap_round(&[
            string(vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 0.0 }]),
            string(vec![coord! { x: 5.0, y: 0.0 }, coord! { x: 15.0, y: 0.0 }]),
        ]);
        let mut pieces: Vec<(Coord<f64>, Coord<f64>)> = noded.iter().map(endpoints).collect();
        pieces.sort_by(|a, b| {
            (a.0.x, a.0.y, a.1.x, a.1.y)
                .partial_cmp(&(b.0.x, b.0.y, b.1.x, b.1.y))
                .unwrap()
        });
        // the shared span appears once per parent: duplicates are not
        // coalesced so each piece keeps its parent's payload
        assert_eq!(
            pieces,
            vec![
                (coord! { x: 0.0, y: 0.0 }, coord! { x: 5.0, y: 0.0 }),
                (coord! { x: 5.0, y: 0.0 }, coord! { x: 10.0, y: 0.0 }),
                (coord! { x: 5.0, y: 0.0 }, coord! { x: 10.0, y: 0.0 }),
                (coord! { x: 10.0, y: 0.0 }, coord! { x: 15.0, y: 0.0 }),
            ]
        );
    }

    #[test]
    fn snap_rounding_is_idempotent() {
        let first = snap_round(&[
            string(vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 10.0 }]),
            string(vec![coord! { x: 0.0, y: 10.0 }, coord! { x: 10.0, y: 0.0 }]),
            string(vec![coord! { x: 0.0, y: 5.0 }, coord! { x: 10.0, y: 5.0 }]),
        ]);
        let first_pieces: Vec<_> = first.iter().map(endpoints).collect();

        let again = snap_round(&first);
        let again_pieces: Vec<_> = again.iter().map(endpoints).collect();

        let sort = |mut v: Vec<(Coord<f64>, Coord<f64>)>| {
            v.sort_by(|a, b| {
                (a.0.x, a.0.y, a.1.x, a.1.y)
                    .partial_cmp(&(b.0.x, b.0.y, b.1.x, b.1.y))
                    .unwrap()
            });
            v
        };
        assert_eq!(sort(first_pieces), sort(again_pieces));
    }

    #[test]
    fn off_grid_input_is_rejected() {
        let mut noder = SnapRoundingNoder::new(PrecisionModel::fixed(1.0));
        let result = noder.compute_nodes(&[string(vec![
            coord! { x: 0.5, y: 0.0 },
            coord! { x: 10.0, y: 0.0 },
        ])]);
        assert!(matches!(
            result,
            Err(NodingError::PrecisionMismatch {
                index: 0,
                coord
            }) if coord == coord! { x: 0.5, y: 0.0 }
        ));
    }

    #[test]
    fn floating_model_is_rejected() {
        let mut noder = SnapRoundingNoder::new(PrecisionModel::Floating);
        let result = noder.compute_nodes(&[string(vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 10.0, y: 0.0 },
        ])]);
        assert!(matches!(
            result,
            Err(NodingError::InvalidInput(InvalidInput::NonPositiveScale { .. }))
        ));
    }

    #[test]
    fn no_output_substring_repeats_adjacent_vertices() {
        let noded = snap_round(&[
            string(vec![
                coord! { x: 0.0, y: 0.0 },
                coord! { x: 5.0, y: 0.0 },
                coord! { x: 5.0, y: 0.0 },
                coord! { x: 10.0, y: 0.0 },
            ]),
            string(vec![coord! { x: 3.0, y: -2.0 }, coord! { x: 3.0, y: 2.0 }]),
        ]);
        for sub in &noded {
            let sub = sub.borrow();
            for pair in sub.coordinates().windows(2) {
                assert_ne!(pair[0], pair[1]);
            }
        }
    }

    /// The union of the output polylines covers the union of the input
    /// polylines: cutting never gains or loses length when nothing needs
    /// snapping off-line.
    #[test]
    fn coverage_preserves_total_length() {
        use approx::assert_relative_eq;

        let inputs = [
            vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 10.0 }],
            vec![coord! { x: 0.0, y: 10.0 }, coord! { x: 10.0, y: 0.0 }],
            vec![coord! { x: 0.0, y: 5.0 }, coord! { x: 10.0, y: 5.0 }],
        ];
        let length = |coords: &[Coord<f64>]| -> f64 {
            coords
                .windows(2)
                .map(|w| (w[1].x - w[0].x).hypot(w[1].y - w[0].y))
                .sum()
        };
        let input_total: f64 = inputs.iter().map(|c| length(c)).sum();

        let noded = snap_round(&inputs.iter().cloned().map(string).collect::<Vec<_>>());
        let output_total: f64 = noded.iter().map(|s| length(s.borrow().coordinates())).sum();

        assert_relative_eq!(input_total, output_total, epsilon = 1.0e-9);
    }

    /// Every pair of output substrings only meets at shared vertices.
    #[test]
    fn output_is_fully_noded() {
        use crate::validate::NodingValidator;

        let noded = snap_round(&[
            string(vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 10.0 }]),
            string(vec![coord! { x: 0.0, y: 10.0 }, coord! { x: 10.0, y: 0.0 }]),
            string(vec![coord! { x: 0.0, y: 5.0 }, coord! { x: 10.0, y: 5.0 }]),
            string(vec![
                coord! { x: 2.0, y: 0.0 },
                coord! { x: 2.0, y: 10.0 },
                coord! { x: 8.0, y: 10.0 },
            ]),
        ]);
        NodingValidator::new(noded).check().unwrap();
    }
}
