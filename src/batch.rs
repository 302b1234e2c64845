//! Feature-scoped variant batches
//!
//! A batch is the unit of work for annotation: a run of position-ordered
//! variants that share annotated features with their neighbors, or a run of
//! feature-less variants (an intergenic batch, capped in size). Compound
//! pairing never crosses a batch boundary.

use crate::haploblock::HaploblockIndex;
use crate::variant::Variant;
use std::collections::{BTreeMap, BTreeSet};

/// Upper bound on the number of variants collected into one intergenic batch
pub const INTERGENIC_BATCH_CAP: usize = 1000;

/// An independent batch of variants sharing a feature scope
#[derive(Debug, Clone, Default)]
pub struct VariantBatch {
    pub variants: Vec<Variant>,
    /// Individual id -> phased-interval index, built on demand when phasing
    /// is active
    pub haploblocks: BTreeMap<String, HaploblockIndex>,
}

impl VariantBatch {
    pub fn new() -> Self {
        VariantBatch::default()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Build per-individual haploblock indexes from this batch's calls.
    ///
    /// Calls are scanned in variant order; the batch is expected to hold
    /// position-ordered variants.
    pub fn build_haploblocks(&mut self) {
        let mut individuals: BTreeSet<String> = BTreeSet::new();
        for variant in &self.variants {
            individuals.extend(variant.genotypes.keys().cloned());
        }

        self.haploblocks.clear();
        for individual in individuals {
            let calls: Vec<(u32, bool, bool)> = self
                .variants
                .iter()
                .map(|variant| {
                    let genotype = variant.genotype(&individual);
                    (variant.pos, genotype.phased, variant.filter == "PASS")
                })
                .collect();
            self.haploblocks
                .insert(individual, HaploblockIndex::from_calls(&calls));
        }
    }
}

/// Group position-ordered variants into batches.
///
/// A variant with features joins the current batch when it shares at least
/// one feature with its neighbor; feature-less variants accumulate into
/// intergenic batches capped at [`INTERGENIC_BATCH_CAP`].
pub fn build_batches(variants: Vec<Variant>) -> Vec<VariantBatch> {
    let mut batches = Vec::new();
    let mut current = VariantBatch::new();
    let mut current_intergenic = false;

    for variant in variants {
        let intergenic = variant.features.is_empty();

        let continues_batch = if current.is_empty() {
            true
        } else if intergenic != current_intergenic {
            false
        } else if intergenic {
            current.len() < INTERGENIC_BATCH_CAP
        } else {
            // Neighbor rule: share a feature with the previous variant
            current
                .variants
                .last()
                .map(|previous| previous.shares_feature(&variant))
                .unwrap_or(true)
        };

        if !continues_batch {
            batches.push(std::mem::take(&mut current));
        }
        current_intergenic = intergenic;
        current.variants.push(variant);
    }

    if !current.is_empty() {
        batches.push(current);
    }

    log::debug!("Built {} variant batches", batches.len());
    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genotype::Genotype;

    fn variant(pos: u32, features: &[&str]) -> Variant {
        let mut variant = Variant::new("1".to_string(), pos, "A".to_string(), "T".to_string());
        for feature in features {
            variant.features.insert(feature.to_string());
        }
        variant
    }

    #[test]
    fn test_feature_sharing_run_stays_together() {
        let variants = vec![
            variant(100, &["GENE_A"]),
            variant(200, &["GENE_A", "GENE_B"]),
            variant(300, &["GENE_B"]),
        ];
        let batches = build_batches(variants);

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 3);
    }

    #[test]
    fn test_feature_break_splits_batches() {
        let variants = vec![
            variant(100, &["GENE_A"]),
            variant(200, &["GENE_A"]),
            variant(300, &["GENE_C"]),
        ];
        let batches = build_batches(variants);

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 2);
        assert_eq!(batches[1].len(), 1);
    }

    #[test]
    fn test_intergenic_separated_from_feature_batches() {
        let variants = vec![
            variant(100, &["GENE_A"]),
            variant(200, &[]),
            variant(300, &[]),
            variant(400, &["GENE_B"]),
        ];
        let batches = build_batches(variants);

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[1].len(), 2);
        assert!(batches[1].variants.iter().all(|v| v.features.is_empty()));
    }

    #[test]
    fn test_intergenic_cap() {
        let variants: Vec<Variant> = (0..(INTERGENIC_BATCH_CAP as u32 + 10))
            .map(|i| variant(i + 1, &[]))
            .collect();
        let batches = build_batches(variants);

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), INTERGENIC_BATCH_CAP);
        assert_eq!(batches[1].len(), 10);
    }

    #[test]
    fn test_build_haploblocks() {
        let mut batch = VariantBatch::new();
        for (pos, call) in [(100, "0|1"), (200, "1|0"), (300, "0/1"), (400, "0|1")] {
            let mut v = variant(pos, &["GENE_A"]);
            v.genotypes
                .insert("proband".to_string(), Genotype::from_call(call));
            batch.variants.push(v);
        }
        batch.build_haploblocks();

        let index = &batch.haploblocks["proband"];
        assert!(index.same_block(100, 200));
        assert!(!index.same_block(200, 400));
    }
}
