//! Phased-interval (haploblock) construction and range queries

use serde::{Deserialize, Serialize};

/// A contiguous phased interval for one individual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Haploblock {
    pub start: u32,
    pub stop: u32,
    pub id: u32,
}

/// Position-ordered, non-overlapping haploblocks for one individual,
/// supporting point queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HaploblockIndex {
    blocks: Vec<Haploblock>,
}

impl HaploblockIndex {
    /// Build the index from `(position, phased, filter_is_pass)` triples in
    /// position order.
    ///
    /// A phased call opens a new block or extends the current one. An
    /// unphased call closes the current block, unless its filter status is
    /// not PASS, in which case it is treated as belonging to the same block.
    pub fn from_calls(calls: &[(u32, bool, bool)]) -> Self {
        let mut blocks = Vec::new();
        let mut current: Option<(u32, u32)> = None;
        let mut next_id = 1;

        for &(pos, phased, pass) in calls {
            if phased {
                match current {
                    Some((_, ref mut stop)) => *stop = pos,
                    None => current = Some((pos, pos)),
                }
            } else if pass {
                if let Some((start, stop)) = current.take() {
                    blocks.push(Haploblock {
                        start,
                        stop,
                        id: next_id,
                    });
                    next_id += 1;
                }
            } else if let Some((_, ref mut stop)) = current {
                // Filtered call does not break phasing
                *stop = pos;
            }
        }

        if let Some((start, stop)) = current {
            blocks.push(Haploblock {
                start,
                stop,
                id: next_id,
            });
        }

        HaploblockIndex { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Haploblock] {
        &self.blocks
    }

    /// The block containing `pos`, if any
    pub fn find(&self, pos: u32) -> Option<&Haploblock> {
        let idx = self.blocks.partition_point(|block| block.stop < pos);
        self.blocks
            .get(idx)
            .filter(|block| block.start <= pos && pos <= block.stop)
    }

    /// True when both positions fall inside one phased interval
    pub fn same_block(&self, pos_a: u32, pos_b: u32) -> bool {
        match (self.find(pos_a), self.find(pos_b)) {
            (Some(a), Some(b)) => a.id == b.id,
            _ => false,
        }
    }
}
