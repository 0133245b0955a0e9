use geo_types::Coord;

/// The grid onto which produced coordinates are rounded.
///
/// Precision models are value types; every component that rounds holds its
/// own copy. For the snap-rounding core to guarantee robustness the
/// effective model must be [`Fixed`](PrecisionModel::Fixed) with
/// `scale >= 1` and all input ordinates already on the grid — the
/// [`ScaledNoder`](crate::ScaledNoder) wrapper arranges this for
/// floating-point input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrecisionModel {
    /// Full double-precision ordinates; `make_precise` is the identity.
    Floating,
    /// Single-precision ordinates; `make_precise` rounds through `f32`.
    FloatingSingle,
    /// Fixed-precision grid with `scale` grid cells per unit:
    /// `make_precise(v) = round(v * scale) / scale`.
    Fixed { scale: f64 },
}

impl PrecisionModel {
    /// A fixed model with the given (positive) scale.
    pub fn fixed(scale: f64) -> PrecisionModel {
        PrecisionModel::Fixed { scale }
    }

    /// The number of grid cells per unit, or `0.0` for the floating
    /// models.
    pub fn scale(&self) -> f64 {
        match self {
            PrecisionModel::Fixed { scale } => *scale,
            _ => 0.0,
        }
    }

    pub fn is_floating(&self) -> bool {
        !matches!(self, PrecisionModel::Fixed { .. })
    }

    /// Rounds a single ordinate onto the model's grid.
    pub fn make_precise(&self, v: f64) -> f64 {
        match self {
            PrecisionModel::Floating => v,
            PrecisionModel::FloatingSingle => v as f32 as f64,
            PrecisionModel::Fixed { scale } => (v * scale).round() / scale,
        }
    }

    /// Rounds both ordinates of a coordinate onto the model's grid.
    pub fn make_coord_precise(&self, c: Coord<f64>) -> Coord<f64> {
        Coord {
            x: self.make_precise(c.x),
            y: self.make_precise(c.y),
        }
    }
}

impl Default for PrecisionModel {
    fn default() -> Self {
        PrecisionModel::Floating
    }
}
