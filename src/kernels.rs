use geo_types::Coord;

/// Orientation of an ordered triplet of coordinates.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    Collinear,
}

/// Gives the orientation of 3 2-dimensional points: ccw, cw or collinear.
///
/// Computed with adaptive-precision arithmetic, so the sign is exact and
/// transitive. Snap rounding relies on this consistency; a naive
/// determinant can flip signs for nearly-collinear triplets and send the
/// noding loop into contradictory states.
pub fn orient2d(p: Coord<f64>, q: Coord<f64>, r: Coord<f64>) -> Orientation {
    let orientation = robust::orient2d(
        robust::Coord { x: p.x, y: p.y },
        robust::Coord { x: q.x, y: q.y },
        robust::Coord { x: r.x, y: r.y },
    );

    if orientation < 0. {
        Orientation::Clockwise
    } else if orientation > 0. {
        Orientation::CounterClockwise
    } else {
        Orientation::Collinear
    }
}
