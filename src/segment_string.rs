use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use geo_types::{Coord, Line, LineString};

use crate::line_intersection::RobustLineIntersector;

/// The collection shape segment strings circulate in: the noder that owns
/// the current run mutates strings through their intersection lists, and
/// a self-noding string appears on both sides of a candidate pair.
pub type SharedSegmentString<D> = Rc<RefCell<NodedSegmentString<D>>>;

/// A point on a segment string where another (or the same) string
/// intersects it: "insert a vertex at `coord` on the segment
/// `[segment_index, segment_index + 1]`".
///
/// Nodes are ordered along their parent string by segment index, then by
/// the robust edge-distance metric along the segment.
#[derive(Debug, Clone)]
pub struct SegmentNode {
    coord: Coord<f64>,
    segment_index: usize,
    dist: f64,
}

impl SegmentNode {
    pub fn coordinate(&self) -> Coord<f64> {
        self.coord
    }

    pub fn segment_index(&self) -> usize {
        self.segment_index
    }
}

impl PartialEq for SegmentNode {
    fn eq(&self, other: &SegmentNode) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for SegmentNode {}

impl PartialOrd for SegmentNode {
    fn partial_cmp(&self, other: &SegmentNode) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SegmentNode {
    fn cmp(&self, other: &SegmentNode) -> std::cmp::Ordering {
        // BTreeSet needs full `Ord`; the distances are never NaN since
        // they are absolute ordinate differences of finite inputs.
        // Distinct snap points can share an edge distance (they project
        // to the same spot on the dominant axis), so the coordinate is
        // the final tie breaker: only true `(index, coord)` duplicates
        // collapse.
        debug_assert!(!self.dist.is_nan() && !other.dist.is_nan());
        self.segment_index
            .cmp(&other.segment_index)
            .then(self.dist.total_cmp(&other.dist))
            .then(self.coord.x.total_cmp(&other.coord.x))
            .then(self.coord.y.total_cmp(&other.coord.y))
    }
}

/// An ordered sequence of at least 2 coordinates, carrying an opaque
/// user-data payload and accumulating the intersection nodes found during
/// a noding run.
///
/// The vertex array is read-only after construction; the only mutation
/// the core performs is through [`add_intersection`](Self::add_intersection).
/// Duplicate nodes collapse, and the endpoint vertices are implicitly
/// part of the node list.
#[derive(Debug, Clone)]
pub struct NodedSegmentString<D> {
    coords: Vec<Coord<f64>>,
    data: D,
    nodes: BTreeSet<SegmentNode>,
}

impl<D> NodedSegmentString<D> {
    /// Creates a segment string over `coords` carrying `data`.
    ///
    /// `coords` must hold at least 2 entries; whether they are *distinct*
    /// is checked by the noder before a run starts.
    pub fn new(mut coords: Vec<Coord<f64>>, data: D) -> NodedSegmentString<D> {
        assert!(coords.len() >= 2, "segment string needs at least 2 coordinates");
        // the vertex array never changes length after construction
        coords.shrink_to_fit();
        NodedSegmentString {
            coords,
            data,
            nodes: BTreeSet::new(),
        }
    }

    pub fn from_line_string(line_string: &LineString<f64>, data: D) -> NodedSegmentString<D> {
        NodedSegmentString::new(line_string.0.clone(), data)
    }

    pub fn into_shared(self) -> SharedSegmentString<D> {
        Rc::new(RefCell::new(self))
    }

    /// Number of vertices.
    pub fn size(&self) -> usize {
        self.coords.len()
    }

    pub fn coordinates(&self) -> &[Coord<f64>] {
        &self.coords
    }

    pub fn coordinate(&self, i: usize) -> Coord<f64> {
        self.coords[i]
    }

    /// The `i`th segment, from vertex `i` to vertex `i + 1`.
    pub fn segment(&self, i: usize) -> Line<f64> {
        Line::new(self.coords[i], self.coords[i + 1])
    }

    pub fn line_string(&self) -> LineString<f64> {
        LineString::new(self.coords.clone())
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    pub fn nodes(&self) -> &BTreeSet<SegmentNode> {
        &self.nodes
    }

    /// Applies `f` to every vertex in place. Reserved for the scaling
    /// wrapper, which owns its delegate's output; node lists are empty at
    /// the times this runs.
    pub(crate) fn transform_coordinates(&mut self, f: impl Fn(Coord<f64>) -> Coord<f64>) {
        debug_assert!(self.nodes.is_empty());
        for coord in &mut self.coords {
            *coord = f(*coord);
        }
    }

    /// Registers an intersection at `coord` on segment `segment_index`.
    ///
    /// A point that coincides with the far vertex of the segment is
    /// normalized to a node at the start of the following segment, so a
    /// hit on a vertex is recorded once regardless of which adjacent
    /// segment reported it.
    pub fn add_intersection(&mut self, coord: Coord<f64>, segment_index: usize) {
        debug_assert!(segment_index < self.coords.len() - 1);

        let mut normalized_index = segment_index;
        let mut dist = RobustLineIntersector::compute_edge_distance(coord, self.segment(segment_index));

        let next_index = segment_index + 1;
        if next_index < self.coords.len() && coord == self.coords[next_index] {
            normalized_index = next_index;
            dist = 0.0;
        }
        self.nodes.insert(SegmentNode {
            coord,
            segment_index: normalized_index,
            dist,
        });
    }

    /// Pulls every intersection point of a populated intersector onto
    /// segment `segment_index`, skipping points that are endpoints of the
    /// named segment (pure vertex intersections add nothing: endpoints
    /// are implicitly in the node list).
    pub fn add_intersections_from(&mut self, li: &RobustLineIntersector, segment_index: usize) {
        let segment = self.segment(segment_index);
        for k in 0..li.intersection_count() {
            let pt = li.intersection(k);
            if pt != segment.start && pt != segment.end {
                self.add_intersection(pt, segment_index);
            }
        }
    }

    /// Cuts every string of `strings` at its accumulated nodes and
    /// returns the substrings, in order along each parent and with the
    /// parent's payload cloned onto each piece.
    ///
    /// Consecutive duplicate coordinates are dropped and pieces that
    /// collapse below 2 distinct points are discarded. Substrings that
    /// duplicate each other (collinear input overlap) are all kept, each
    /// with its own parent's payload; [`NodingValidator`](crate::NodingValidator)
    /// reports them for clients that need a simple arrangement.
    pub fn noded_substrings(strings: &[SharedSegmentString<D>]) -> Vec<SharedSegmentString<D>>
    where
        D: Clone,
    {
        let mut out = Vec::new();
        for string in strings {
            string.borrow().add_split_substrings(&mut out);
        }
        out
    }

    fn add_split_substrings(&self, out: &mut Vec<SharedSegmentString<D>>)
    where
        D: Clone,
    {
        let max_index = self.coords.len() - 1;
        let mut nodes = self.nodes.clone();
        nodes.insert(SegmentNode {
            coord: self.coords[0],
            segment_index: 0,
            dist: 0.0,
        });
        nodes.insert(SegmentNode {
            coord: self.coords[max_index],
            segment_index: max_index,
            dist: 0.0,
        });

        let nodes: Vec<SegmentNode> = nodes.into_iter().collect();
        for pair in nodes.windows(2) {
            if let Some(coords) = self.split_coords(&pair[0], &pair[1]) {
                out.push(NodedSegmentString::new(coords, self.data.clone()).into_shared());
            }
        }
    }

    /// The vertex run between two consecutive nodes, or `None` when the
    /// piece collapses.
    fn split_coords(&self, n0: &SegmentNode, n1: &SegmentNode) -> Option<Vec<Coord<f64>>> {
        let mut coords = Vec::with_capacity(n1.segment_index - n0.segment_index + 2);
        coords.push(n0.coord);
        for i in (n0.segment_index + 1)..=n1.segment_index {
            coords.push(self.coords[i]);
        }
        coords.push(n1.coord);
        coords.dedup();

        if coords.len() < 2 {
            return None;
        }
        Some(coords)
    }
}
