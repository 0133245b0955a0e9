//! Robust noding for collections of 2D line segments.
//!
//! Noding takes an unstructured collection of segment strings (polylines)
//! and produces a *fully noded* arrangement: a set of substrings in which
//! no two segments share an interior point. This crate implements noding
//! by **snap rounding** onto a fixed-precision grid, the
//! Hobby/Guibas–Marimont scheme in which every intersection point is
//! rounded to the centre of its grid cell ("hot pixel") and every other
//! segment passing through that cell is snapped to the same point. On a
//! uniform integer grid the result is robust: floating-point roundoff
//! cannot re-introduce crossings below the grid resolution.
//!
//! # Structure
//!
//! - [`NodedSegmentString`] — a polyline plus the intersection nodes
//!   accumulated during a run, and the substring splitter.
//! - [`RobustLineIntersector`] — classifies segment intersections using
//!   adaptive-precision orientation tests.
//! - [`McIndexNoder`] — single-pass driver: monotone chains in a bulk
//!   loaded R-tree prune the candidate segment pairs fed to a
//!   [`SegmentIntersector`] strategy.
//! - [`SnapRoundingNoder`] — the three-phase snap-rounding engine over
//!   integer-scaled input.
//! - [`ScaledNoder`] — lifts floating-point input onto an integer grid,
//!   delegates, and rescales the output.
//! - [`NodingValidator`] — postcondition checker for noded output.
//!
//! # Example
//!
//! ```
//! use geo_noding::{NodedSegmentString, Noder, PrecisionModel, ScaledNoder, SnapRoundingNoder};
//! use geo_types::coord;
//!
//! // two crossing diagonals, in floating-point coordinates
//! let a = NodedSegmentString::new(
//!     vec![coord! { x: 0.12, y: 0.34 }, coord! { x: 0.99, y: 0.34 }],
//!     (),
//! )
//! .into_shared();
//! let b = NodedSegmentString::new(
//!     vec![coord! { x: 0.5, y: 0.0 }, coord! { x: 0.5, y: 1.0 }],
//!     (),
//! )
//! .into_shared();
//!
//! // snap round on a grid of 0.01, via a 100x scaling lift
//! let inner = SnapRoundingNoder::new(PrecisionModel::fixed(1.0));
//! let mut noder = ScaledNoder::new(inner, 100.0);
//! noder.compute_nodes(&[a, b])?;
//!
//! // the crossing became a shared vertex of four substrings
//! let noded = noder.noded_substrings();
//! assert_eq!(noded.len(), 4);
//! # Ok::<(), geo_noding::NodingError>(())
//! ```

#[macro_use]
extern crate log;

pub mod error;
pub mod kernels;
pub mod line_intersection;
pub mod monotone_chain;
pub mod noder;
pub mod precision;
pub mod segment_string;
pub mod validate;

pub use crate::error::{InvalidInput, NodingError};
pub use crate::line_intersection::{LineIntersection, RobustLineIntersector};
pub use crate::monotone_chain::MonotoneChain;
pub use crate::noder::hot_pixel::HotPixel;
pub use crate::noder::mcindex::McIndexNoder;
pub use crate::noder::scaled::ScaledNoder;
pub use crate::noder::snap_round::SnapRoundingNoder;
pub use crate::noder::{InteriorIntersectionFinder, IntersectionAdder, Noder, SegmentIntersector};
pub use crate::precision::PrecisionModel;
pub use crate::segment_string::{NodedSegmentString, SegmentNode, SharedSegmentString};
pub use crate::validate::NodingValidator;

pub use geo_types::{Coord, Line, LineString};
