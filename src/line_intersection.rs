use geo_types::{coord, Coord, Line};

use crate::kernels::{orient2d, Orientation};
use crate::precision::PrecisionModel;

/// The classification of an intersection between two closed segments.
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum LineIntersection {
    /// Segments intersect in a single point.
    SinglePoint {
        intersection: Coord<f64>,
        /// `true` when the point lies in the interior of both segments.
        ///
        /// Due to the limited precision of floats, the calculated
        /// intersection point may be snapped onto one of the endpoints
        /// even though all four input endpoints are distinct; the flag
        /// stays `true` in that case.
        is_proper: bool,
    },
    /// Collinear segments share infinitely many points; the value is the
    /// shared sub-segment.
    Collinear { intersection: Line<f64> },
}

impl LineIntersection {
    pub fn is_proper(&self) -> bool {
        match self {
            Self::Collinear { .. } => false,
            Self::SinglePoint { is_proper, .. } => *is_proper,
        }
    }
}

/// Classifies the intersection of two closed segments and yields the
/// intersection point(s), using exact orientation signs.
///
/// The intersector is stateful: [`compute_intersection`](Self::compute_intersection)
/// records the inputs and the result so that the accessors can answer
/// without recomputation.
///
/// When a precision model is set, every *computed* intersection
/// coordinate (the proper-intersection case) is rounded through it;
/// endpoint and collinear results are copied exactly from the inputs.
#[derive(Clone, Debug, Default)]
pub struct RobustLineIntersector {
    precision_model: Option<PrecisionModel>,
    lines: Option<(Line<f64>, Line<f64>)>,
    result: Option<LineIntersection>,
}

impl RobustLineIntersector {
    pub fn new() -> RobustLineIntersector {
        RobustLineIntersector::default()
    }

    pub fn set_precision_model(&mut self, pm: PrecisionModel) {
        self.precision_model = Some(pm);
    }

    /// Computes the intersection of segments `p` and `q` and stores the
    /// outcome for the accessors below.
    pub fn compute_intersection(&mut self, p: Line<f64>, q: Line<f64>) {
        self.result = self.compute(p, q);
        self.lines = Some((p, q));
    }

    pub fn result(&self) -> Option<&LineIntersection> {
        self.result.as_ref()
    }

    pub fn has_intersection(&self) -> bool {
        self.result.is_some()
    }

    /// The number of intersection points found: 0, 1, or 2.
    pub fn intersection_count(&self) -> usize {
        match self.result {
            None => 0,
            Some(LineIntersection::SinglePoint { .. }) => 1,
            Some(LineIntersection::Collinear { .. }) => 2,
        }
    }

    /// The `k`th intersection point.
    ///
    /// # Panics
    ///
    /// Panics if `k >= self.intersection_count()`.
    pub fn intersection(&self, k: usize) -> Coord<f64> {
        match (&self.result, k) {
            (Some(LineIntersection::SinglePoint { intersection, .. }), 0) => *intersection,
            (Some(LineIntersection::Collinear { intersection }), 0) => intersection.start,
            (Some(LineIntersection::Collinear { intersection }), 1) => intersection.end,
            _ => panic!(
                "intersection index {} out of range (count {})",
                k,
                self.intersection_count()
            ),
        }
    }

    /// `true` when the intersection is a single point interior to both
    /// segments.
    pub fn is_proper(&self) -> bool {
        self.result.map(|r| r.is_proper()).unwrap_or(false)
    }

    /// `true` when at least one intersection point lies in the interior
    /// of at least one of the input segments.
    pub fn is_interior_intersection(&self) -> bool {
        let Some((p, q)) = self.lines else {
            return false;
        };
        (0..self.intersection_count()).any(|k| {
            let pt = self.intersection(k);
            let on_p_end = pt == p.start || pt == p.end;
            let on_q_end = pt == q.start || pt == q.end;
            !(on_p_end && on_q_end)
        })
    }

    fn compute(&self, p: Line<f64>, q: Line<f64>) -> Option<LineIntersection> {
        if !envelopes_overlap(p, q) {
            return None;
        }

        use Orientation::*;
        let p_q1 = orient2d(p.start, p.end, q.start);
        let p_q2 = orient2d(p.start, p.end, q.end);
        if matches!(
            (p_q1, p_q2),
            (Clockwise, Clockwise) | (CounterClockwise, CounterClockwise)
        ) {
            return None;
        }

        let q_p1 = orient2d(q.start, q.end, p.start);
        let q_p2 = orient2d(q.start, q.end, p.end);
        if matches!(
            (q_p1, q_p2),
            (Clockwise, Clockwise) | (CounterClockwise, CounterClockwise)
        ) {
            return None;
        }

        if (p_q1, p_q2, q_p1, q_p2) == (Collinear, Collinear, Collinear, Collinear) {
            return collinear_intersection(p, q);
        }

        // A single intersection point remains. When it is an endpoint,
        // copy the endpoint rather than computing it: the copy has the
        // exact value, which matters for robustness.
        if p_q1 == Collinear || p_q2 == Collinear || q_p1 == Collinear || q_p2 == Collinear {
            // Equal endpoints are checked explicitly first; for some
            // nearly-parallel inputs the orientation signs alone pick the
            // wrong endpoint.
            let intersection = if p.start == q.start || p.start == q.end {
                p.start
            } else if p.end == q.start || p.end == q.end {
                p.end
            } else if p_q1 == Collinear {
                q.start
            } else if p_q2 == Collinear {
                q.end
            } else if q_p1 == Collinear {
                p.start
            } else {
                p.end
            };
            Some(LineIntersection::SinglePoint {
                intersection,
                is_proper: false,
            })
        } else {
            let mut intersection = proper_intersection(p, q);
            if let Some(pm) = &self.precision_model {
                intersection = pm.make_coord_precise(intersection);
            }
            Some(LineIntersection::SinglePoint {
                intersection,
                is_proper: true,
            })
        }
    }
}

impl RobustLineIntersector {
    /// Computes the "edge distance" of an intersection point along a
    /// segment: a robust, division-free metric for ordering points on
    /// the segment. It is *not* the Euclidean distance; it relies on the
    /// fact that either the x or the y ordinate is unique along the
    /// segment, depending on which extent is larger.
    ///
    /// Safe for points obtained by *rounding* points on the segment; not
    /// safe for truncated points.
    pub(crate) fn compute_edge_distance(intersection: Coord<f64>, line: Line<f64>) -> f64 {
        let dx = (line.end.x - line.start.x).abs();
        let dy = (line.end.y - line.start.y).abs();

        let mut dist: f64;
        if intersection == line.start {
            dist = 0.0;
        } else if intersection == line.end {
            dist = if dx > dy { dx } else { dy };
        } else {
            let intersection_dx = (intersection.x - line.start.x).abs();
            let intersection_dy = (intersection.y - line.start.y).abs();
            dist = if dx > dy {
                intersection_dx
            } else {
                intersection_dy
            };
            // a non-endpoint must always have a non-zero distance
            if dist == 0.0 && intersection != line.start {
                dist = intersection_dx.max(intersection_dy);
            }
        }
        debug_assert!(
            !(dist == 0.0 && intersection != line.start),
            "bad edge distance"
        );
        dist
    }
}

fn envelopes_overlap(p: Line<f64>, q: Line<f64>) -> bool {
    p.start.x.max(p.end.x) >= q.start.x.min(q.end.x)
        && q.start.x.max(q.end.x) >= p.start.x.min(p.end.x)
        && p.start.y.max(p.end.y) >= q.start.y.min(q.end.y)
        && q.start.y.max(q.end.y) >= p.start.y.min(p.end.y)
}

fn envelope_contains(l: Line<f64>, c: Coord<f64>) -> bool {
    c.x >= l.start.x.min(l.end.x)
        && c.x <= l.start.x.max(l.end.x)
        && c.y >= l.start.y.min(l.end.y)
        && c.y <= l.start.y.max(l.end.y)
}

fn collinear_intersection(p: Line<f64>, q: Line<f64>) -> Option<LineIntersection> {
    fn collinear(intersection: Line<f64>) -> LineIntersection {
        LineIntersection::Collinear { intersection }
    }

    fn improper(intersection: Coord<f64>) -> LineIntersection {
        LineIntersection::SinglePoint {
            intersection,
            is_proper: false,
        }
    }

    let q1_in_p = envelope_contains(p, q.start);
    let q2_in_p = envelope_contains(p, q.end);
    let p1_in_q = envelope_contains(q, p.start);
    let p2_in_q = envelope_contains(q, p.end);

    Some(match (q1_in_p, q2_in_p, p1_in_q, p2_in_q) {
        (true, true, _, _) => collinear(q),
        (_, _, true, true) => collinear(p),
        (true, false, true, false) if q.start == p.start => improper(q.start),
        (true, _, true, _) => collinear(Line::new(q.start, p.start)),
        (true, false, false, true) if q.start == p.end => improper(q.start),
        (true, _, _, true) => collinear(Line::new(q.start, p.end)),
        (false, true, true, false) if q.end == p.start => improper(q.end),
        (_, true, true, _) => collinear(Line::new(q.end, p.start)),
        (false, true, false, true) if q.end == p.end => improper(q.end),
        (_, true, _, true) => collinear(Line::new(q.end, p.end)),
        _ => {
            // unreachable with a consistent sign function: all four
            // orientations were collinear and the envelopes overlap
            debug_assert!(false, "inconsistent collinear classification");
            warn!("inconsistent collinear classification: {:?} / {:?}", p, q);
            return None;
        }
    })
}

/// Finds the endpoint of segments `p` and `q` nearest to the other
/// segment: a reasonable surrogate for the true intersection point in
/// ill-conditioned cases (nearly-coincident segments, or an endpoint
/// lying almost on the other segment).
fn nearest_endpoint(p: Line<f64>, q: Line<f64>) -> Coord<f64> {
    let mut nearest = p.start;
    let mut min_dist = point_segment_distance(p.start, q);

    let dist = point_segment_distance(p.end, q);
    if dist < min_dist {
        min_dist = dist;
        nearest = p.end;
    }
    let dist = point_segment_distance(q.start, p);
    if dist < min_dist {
        min_dist = dist;
        nearest = q.start;
    }
    let dist = point_segment_distance(q.end, p);
    if dist < min_dist {
        nearest = q.end;
    }
    nearest
}

fn point_segment_distance(c: Coord<f64>, l: Line<f64>) -> f64 {
    if l.start == l.end {
        return (c.x - l.start.x).hypot(c.y - l.start.y);
    }
    let dx = l.end.x - l.start.x;
    let dy = l.end.y - l.start.y;
    let len_sq = dx * dx + dy * dy;
    let r = ((c.x - l.start.x) * dx + (c.y - l.start.y) * dy) / len_sq;

    if r <= 0.0 {
        (c.x - l.start.x).hypot(c.y - l.start.y)
    } else if r >= 1.0 {
        (c.x - l.end.x).hypot(c.y - l.end.y)
    } else {
        let s = ((l.start.y - c.y) * dx - (l.start.x - c.x) * dy) / len_sq;
        s.abs() * len_sq.sqrt()
    }
}

/// Computes the intersection point of the (non-parallel) lines through
/// `p` and `q` using the homogeneous-coordinates equation. Ordinates are
/// conditioned by subtracting the midpoint of the envelope intersection,
/// which removes common significant digits and keeps more bits of
/// precision in the products.
fn raw_line_intersection(p: Line<f64>, q: Line<f64>) -> Option<Coord<f64>> {
    let int_min_x = p.start.x.min(p.end.x).max(q.start.x.min(q.end.x));
    let int_max_x = p.start.x.max(p.end.x).min(q.start.x.max(q.end.x));
    let int_min_y = p.start.y.min(p.end.y).max(q.start.y.min(q.end.y));
    let int_max_y = p.start.y.max(p.end.y).min(q.start.y.max(q.end.y));

    let mid_x = (int_min_x + int_max_x) / 2.0;
    let mid_y = (int_min_y + int_max_y) / 2.0;

    let p1x = p.start.x - mid_x;
    let p1y = p.start.y - mid_y;
    let p2x = p.end.x - mid_x;
    let p2y = p.end.y - mid_y;
    let q1x = q.start.x - mid_x;
    let q1y = q.start.y - mid_y;
    let q2x = q.end.x - mid_x;
    let q2y = q.end.y - mid_y;

    let px = p1y - p2y;
    let py = p2x - p1x;
    let pw = p1x * p2y - p2x * p1y;

    let qx = q1y - q2y;
    let qy = q2x - q1x;
    let qw = q1x * q2y - q2x * q1y;

    let w = px * qy - qx * py;
    let x = (py * qw - qy * pw) / w;
    let y = (qx * pw - px * qw) / w;

    if x.is_finite() && y.is_finite() {
        Some(coord! { x: x + mid_x, y: y + mid_y })
    } else {
        // approximately parallel
        None
    }
}

fn proper_intersection(p: Line<f64>, q: Line<f64>) -> Coord<f64> {
    let mut int_pt = raw_line_intersection(p, q).unwrap_or_else(|| nearest_endpoint(p, q));

    // Round-off can push the computed point outside either envelope;
    // fall back to the safer nearest-endpoint surrogate.
    if !(envelope_contains(p, int_pt) && envelope_contains(q, int_pt)) {
        int_pt = nearest_endpoint(p, q);
    }
    int_pt
}
