use geo_types::Coord;
use rstar::{RTreeObject, AABB};

use crate::noder::SegmentIntersector;
use crate::segment_string::SharedSegmentString;

/// Quadrants of the cartesian plane, labeled as follows:
/// ```ignore
///          (+)
///        NW ┃ NE
///    (-) ━━━╋━━━━ (+)
///        SW ┃ SE
///          (-)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Quadrant {
    NE,
    NW,
    SW,
    SE,
}

impl Quadrant {
    pub(crate) fn new(dx: f64, dy: f64) -> Option<Quadrant> {
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        match (dy >= 0.0, dx >= 0.0) {
            (true, true) => Quadrant::NE,
            (true, false) => Quadrant::NW,
            (false, false) => Quadrant::SW,
            (false, true) => Quadrant::SE,
        }
        .into()
    }
}

/// A maximal run of consecutive segments of one segment string whose
/// direction vector stays within a single quadrant.
///
/// Monotonicity means the chain's envelope is simply the rectangle
/// spanned by its two extreme vertices, and likewise for any contiguous
/// sub-run. It also means no two segments within one chain cross in
/// their interiors, which is what lets a noding driver search chain
/// pairs instead of segment pairs.
#[derive(Debug, Clone)]
pub struct MonotoneChain<D> {
    string: SharedSegmentString<D>,
    start: usize,
    end: usize,
    id: usize,
    envelope: AABB<Coord<f64>>,
}

impl<D> MonotoneChain<D> {
    /// Decomposes `string` into chains, appending them to `out` with ids
    /// continuing from `out.len()`.
    ///
    /// Consecutive duplicate vertices have no direction and never break a
    /// chain.
    pub fn add_chains(string: &SharedSegmentString<D>, out: &mut Vec<MonotoneChain<D>>) {
        let coords: Vec<Coord<f64>> = string.borrow().coordinates().to_vec();
        let mut start = 0;
        while start < coords.len() - 1 {
            let mut quadrant = None;
            let mut end = start;
            while end < coords.len() - 1 {
                let delta = coords[end + 1] - coords[end];
                match (quadrant, Quadrant::new(delta.x, delta.y)) {
                    (_, None) => {}
                    (None, seg_quadrant) => quadrant = seg_quadrant,
                    (Some(q), Some(seg_quadrant)) if q != seg_quadrant => break,
                    _ => {}
                }
                end += 1;
            }
            out.push(MonotoneChain {
                string: string.clone(),
                start,
                end,
                id: out.len(),
                envelope: AABB::from_corners(coords[start], coords[end]),
            });
            start = end;
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn string(&self) -> &SharedSegmentString<D> {
        &self.string
    }

    /// First vertex index of the chain within its parent string.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Last vertex index of the chain within its parent string.
    pub fn end(&self) -> usize {
        self.end
    }

    fn coordinate(&self, i: usize) -> Coord<f64> {
        self.string.borrow().coordinate(i)
    }

    /// Feeds every segment pair of `self × other` whose sub-chain
    /// envelopes overlap to `si`, by alternating midpoint subdivision:
    /// each level halves both chains and recurses only into the
    /// envelope-overlapping quarters, down to individual segments.
    pub fn compute_overlaps<SI: SegmentIntersector<D>>(
        &self,
        other: &MonotoneChain<D>,
        si: &mut SI,
    ) {
        self.overlaps_between(self.start, self.end, other, other.start, other.end, si);
    }

    fn overlaps_between<SI: SegmentIntersector<D>>(
        &self,
        start0: usize,
        end0: usize,
        other: &MonotoneChain<D>,
        start1: usize,
        end1: usize,
        si: &mut SI,
    ) {
        if end0 - start0 == 1 && end1 - start1 == 1 {
            si.process_intersections(&self.string, start0, &other.string, start1);
            return;
        }
        if !self.sub_envelopes_overlap(start0, end0, other, start1, end1) {
            return;
        }

        let mid0 = (start0 + end0) / 2;
        let mid1 = (start1 + end1) / 2;
        if start0 < mid0 {
            if start1 < mid1 {
                self.overlaps_between(start0, mid0, other, start1, mid1, si);
            }
            if mid1 < end1 {
                self.overlaps_between(start0, mid0, other, mid1, end1, si);
            }
        }
        if mid0 < end0 {
            if start1 < mid1 {
                self.overlaps_between(mid0, end0, other, start1, mid1, si);
            }
            if mid1 < end1 {
                self.overlaps_between(mid0, end0, other, mid1, end1, si);
            }
        }
    }

    // envelope of a sub-run is spanned by its extreme vertices
    fn sub_envelopes_overlap(
        &self,
        start0: usize,
        end0: usize,
        other: &MonotoneChain<D>,
        start1: usize,
        end1: usize,
    ) -> bool {
        let a0 = self.coordinate(start0);
        let a1 = self.coordinate(end0);
        let b0 = other.coordinate(start1);
        let b1 = other.coordinate(end1);

        a0.x.max(a1.x) >= b0.x.min(b1.x)
            && b0.x.max(b1.x) >= a0.x.min(a1.x)
            && a0.y.max(a1.y) >= b0.y.min(b1.y)
            && b0.y.max(b1.y) >= a0.y.min(a1.y)
    }
}

impl<D> RTreeObject for MonotoneChain<D> {
    type Envelope = AABB<Coord<f64>>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}
