use geo_types::{coord, Coord, Line};

use crate::line_intersection::RobustLineIntersector;
use crate::segment_string::SharedSegmentString;

/// The square cell of one grid unit centred on a snap point: all points
/// within it are identified with the centre.
///
/// The pixel is half-open: it owns its interior and its bottom and left
/// edges, but not its top or right edges, so that pixel ownership
/// partitions the plane and every point belongs to exactly one pixel.
#[derive(Debug, Clone)]
pub struct HotPixel {
    center: Coord<f64>,
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl HotPixel {
    /// A pixel of width `1 / scale` centred on `center`.
    pub fn new(center: Coord<f64>, scale: f64) -> HotPixel {
        let half = 0.5 / scale;
        HotPixel {
            center,
            min_x: center.x - half,
            min_y: center.y - half,
            max_x: center.x + half,
            max_y: center.y + half,
        }
    }

    /// The snap point this pixel identifies its contents with.
    pub fn coordinate(&self) -> Coord<f64> {
        self.center
    }

    /// Half-open containment test.
    pub fn contains_point(&self, p: Coord<f64>) -> bool {
        p.x >= self.min_x && p.x < self.max_x && p.y >= self.min_y && p.y < self.max_y
    }

    /// Whether the closed segment `[p0, p1]` intersects the pixel.
    ///
    /// A touch that is confined to the un-owned top or right boundary
    /// does not count.
    pub fn intersects(&self, p0: Coord<f64>, p1: Coord<f64>) -> bool {
        if self.max_x < p0.x.min(p1.x)
            || self.min_x > p0.x.max(p1.x)
            || self.max_y < p0.y.min(p1.y)
            || self.min_y > p0.y.max(p1.y)
        {
            return false;
        }
        if self.contains_point(p0) || self.contains_point(p1) {
            return true;
        }
        self.intersects_tolerance_square(p0, p1)
    }

    /// Tests a segment with both endpoints outside the pixel for a
    /// crossing, by intersecting it with the four pixel edges.
    ///
    /// A proper crossing of any edge enters the pixel interior. A
    /// non-proper (touching) intersection counts only when it reaches
    /// both the left and the bottom edge, which pins it to the owned
    /// lower-left corner; grazes along the top or right boundary stay
    /// outside the half-open square.
    fn intersects_tolerance_square(&self, p0: Coord<f64>, p1: Coord<f64>) -> bool {
        let seg = Line::new(p0, p1);
        let ur = coord! { x: self.max_x, y: self.max_y };
        let ul = coord! { x: self.min_x, y: self.max_y };
        let ll = coord! { x: self.min_x, y: self.min_y };
        let lr = coord! { x: self.max_x, y: self.min_y };

        let mut intersects_left = false;
        let mut intersects_bottom = false;
        let mut li = RobustLineIntersector::new();

        li.compute_intersection(seg, Line::new(ur, ul));
        if li.is_proper() {
            return true;
        }

        li.compute_intersection(seg, Line::new(ul, ll));
        if li.is_proper() {
            return true;
        }
        if li.has_intersection() {
            intersects_left = true;
        }

        li.compute_intersection(seg, Line::new(ll, lr));
        if li.is_proper() {
            return true;
        }
        if li.has_intersection() {
            intersects_bottom = true;
        }

        li.compute_intersection(seg, Line::new(lr, ur));
        if li.is_proper() {
            return true;
        }

        intersects_left && intersects_bottom
    }

    /// Adds a node at the pixel centre on segment `segment_index` of
    /// `string` if that segment intersects the pixel. Reports whether a
    /// node was added.
    pub fn add_snapped_node<D>(&self, string: &SharedSegmentString<D>, segment_index: usize) -> bool {
        let segment = string.borrow().segment(segment_index);
        if self.intersects(segment.start, segment.end) {
            string
                .borrow_mut()
                .add_intersection(self.center, segment_index);
            return true;
        }
        false
    }
}
