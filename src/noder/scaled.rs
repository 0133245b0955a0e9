use geo_types::{coord, Coord};

use crate::error::{InvalidInput, NodingError};
use crate::noder::Noder;
use crate::segment_string::{NodedSegmentString, SharedSegmentString};

/// Lifts floating-point input into an integer domain for a delegate
/// noder, and rescales the delegate's output back.
///
/// Vertices are mapped by `v' = round((v - offset) * scale_factor)`, so
/// the delegate sees integer ordinates throughout; output coordinates are
/// mapped back with `v = v' / scale_factor + offset`. Segments that
/// collapse to zero length under rounding are dropped during the lift.
///
/// For any positive scale factor the composition is idempotent on input
/// that is already noded on the integer grid at that scale.
pub struct ScaledNoder<N> {
    noder: N,
    scale_factor: f64,
    offset_x: f64,
    offset_y: f64,
}

impl<N> ScaledNoder<N> {
    pub fn new(noder: N, scale_factor: f64) -> ScaledNoder<N> {
        ScaledNoder::with_offsets(noder, scale_factor, 0.0, 0.0)
    }

    pub fn with_offsets(
        noder: N,
        scale_factor: f64,
        offset_x: f64,
        offset_y: f64,
    ) -> ScaledNoder<N> {
        ScaledNoder {
            noder,
            scale_factor,
            offset_x,
            offset_y,
        }
    }

    fn is_scaled(&self) -> bool {
        self.scale_factor != 1.0 || self.offset_x != 0.0 || self.offset_y != 0.0
    }

    fn scale_strings<D: Clone>(
        &self,
        strings: &[SharedSegmentString<D>],
    ) -> Vec<SharedSegmentString<D>> {
        strings
            .iter()
            .filter_map(|string| {
                let string = string.borrow();
                let mut coords: Vec<Coord<f64>> = string
                    .coordinates()
                    .iter()
                    .map(|c| {
                        coord! {
                            x: ((c.x - self.offset_x) * self.scale_factor).round(),
                            y: ((c.y - self.offset_y) * self.scale_factor).round(),
                        }
                    })
                    .collect();
                // collapse segments that became zero-length under rounding
                coords.dedup();
                if coords.len() < 2 {
                    debug!("scaled noder: dropping string collapsed by rounding");
                    return None;
                }
                Some(NodedSegmentString::new(coords, string.data().clone()).into_shared())
            })
            .collect()
    }
}

impl<D: Clone, N: Noder<D>> Noder<D> for ScaledNoder<N> {
    fn compute_nodes(&mut self, strings: &[SharedSegmentString<D>]) -> Result<(), NodingError> {
        if !(self.scale_factor > 0.0) {
            return Err(NodingError::InvalidInput(InvalidInput::NonPositiveScale {
                scale: self.scale_factor,
            }));
        }
        if !self.is_scaled() {
            return self.noder.compute_nodes(strings);
        }
        let scaled = self.scale_strings(strings);
        self.noder.compute_nodes(&scaled)
    }

    fn noded_substrings(&self) -> Vec<SharedSegmentString<D>> {
        let substrings = self.noder.noded_substrings();
        if self.is_scaled() {
            for substring in &substrings {
                substring.borrow_mut().transform_coordinates(|c| {
                    coord! {
                        x: c.x / self.scale_factor + self.offset_x,
                        y: c.y / self.scale_factor + self.offset_y,
                    }
                });
            }
        }
        substrings
    }
}
