use rstar::RTree;

use crate::error::NodingError;
use crate::monotone_chain::MonotoneChain;
use crate::noder::{validate_input, Noder, SegmentIntersector};
use crate::segment_string::{NodedSegmentString, SharedSegmentString};

/// Single-pass noding driver over a monotone-chain spatial index.
///
/// All chains of all input strings are bulk-loaded into one R-tree; every
/// pair of chains with overlapping envelopes is narrowed down to
/// individual segment pairs by midpoint subdivision, and each surviving
/// pair is handed to the configured [`SegmentIntersector`].
///
/// The driver finds candidate pairs only; what happens to them (and
/// whether the search stops early) is the intersector's business.
pub struct McIndexNoder<D, SI> {
    segment_intersector: SI,
    noded: Vec<SharedSegmentString<D>>,
}

impl<D, SI> McIndexNoder<D, SI> {
    pub fn new(segment_intersector: SI) -> McIndexNoder<D, SI> {
        McIndexNoder {
            segment_intersector,
            noded: Vec::new(),
        }
    }

    pub fn segment_intersector(&self) -> &SI {
        &self.segment_intersector
    }

    pub fn into_segment_intersector(self) -> SI {
        self.segment_intersector
    }
}

impl<D: Clone, SI> Noder<D> for McIndexNoder<D, SI>
where
    SI: SegmentIntersector<D>,
{
    fn compute_nodes(&mut self, strings: &[SharedSegmentString<D>]) -> Result<(), NodingError> {
        validate_input(strings)?;
        self.noded = strings.to_vec();

        let mut chains = Vec::new();
        for string in strings {
            MonotoneChain::add_chains(string, &mut chains);
        }
        debug!(
            "mcindex: {} chains over {} segment strings",
            chains.len(),
            strings.len()
        );
        let tree = RTree::bulk_load(chains);

        'pairs: for (chain0, chain1) in tree.intersection_candidates_with_other_tree(&tree) {
            // the self-join produces both orders of every pair
            if chain0.id() <= chain1.id() {
                chain0.compute_overlaps(chain1, &mut self.segment_intersector);
                if self.segment_intersector.is_done() {
                    break 'pairs;
                }
            }
        }
        Ok(())
    }

    fn noded_substrings(&self) -> Vec<SharedSegmentString<D>> {
        NodedSegmentString::noded_substrings(&self.noded)
    }
}
