//! Batch orchestration: drives the model checkers over variant batches
//!
//! For each family the orchestrator initializes every variant's result
//! fields, collects compound candidates, dispatches the chromosome-apt
//! checkers with de novo refinement, computes the model confidence score,
//! and finally evaluates all compound candidate pairs. Batches are
//! independent units of work and are annotated in parallel; a sequential
//! sort downstream restores positional order.

use crate::batch::VariantBatch;
use crate::compound::{check_compound_candidate, check_compound_pair};
use crate::denovo::{refine_compound, refine_single, Refinement, SingleModel};
use crate::models::{check_dominant, check_recessive, check_x_dominant, check_x_recessive};
use crate::pedigree::Family;
use crate::score::model_score;
use crate::variant::{InheritanceModel, ModelCalls, Variant};
use crate::{MendelError, MendelResult, ModelConfig};
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Fatal precondition: every pedigree individual must have a sample column
/// in the VCF. A partial pedigree would produce misleading inheritance
/// calls, so the run is rejected up front.
pub fn validate_individuals(families: &[Family], vcf_samples: &[String]) -> MendelResult<()> {
    for family in families {
        for individual_id in family.individuals.keys() {
            if !vcf_samples.iter().any(|sample| sample == individual_id) {
                return Err(MendelError::SampleMismatch(individual_id.clone()));
            }
        }
    }
    Ok(())
}

type Checker = fn(&Variant, &Family, bool) -> bool;

/// Checkers applicable to a variant's chromosome
fn dispatch(variant: &Variant) -> &'static [(Checker, SingleModel)] {
    const AUTOSOMAL: [(Checker, SingleModel); 2] = [
        (check_dominant, SingleModel::Dominant),
        (check_recessive, SingleModel::Recessive),
    ];
    const X_LINKED: [(Checker, SingleModel); 2] = [
        (check_x_recessive, SingleModel::XRecessive),
        (check_x_dominant, SingleModel::XDominant),
    ];

    if variant.is_x_chromosome() {
        &X_LINKED
    } else {
        &AUTOSOMAL
    }
}

/// Combined parental-evidence outcome over every individual with parents
fn refine_over_family<F>(family: &Family, refine: F) -> Refinement
where
    F: Fn(&crate::pedigree::Individual) -> Refinement,
{
    let mut combined = Refinement::default();
    for individual in family.individuals.values() {
        if individual.has_parents() {
            let refinement = refine(individual);
            combined.set_denovo |= refinement.set_denovo;
            combined.retract_base |= refinement.retract_base;
        }
    }
    combined
}

/// Annotate one batch of variants for all families, in place.
pub fn annotate_batch(batch: &mut VariantBatch, families: &[Family], config: &ModelConfig) {
    if config.phased {
        batch.build_haploblocks();
    }

    // The reduced-penetrance flag is a property of the variant's genes,
    // independent of family
    for variant in batch.variants.iter_mut() {
        variant.reduced_penetrance = variant
            .features
            .iter()
            .any(|feature| config.reduced_penetrance_genes.contains(feature));
    }

    for family in families {
        annotate_batch_for_family(batch, family, config);
    }
}

fn annotate_batch_for_family(batch: &mut VariantBatch, family: &Family, config: &ModelConfig) {
    let family_id = family.family_id.clone();

    // Every model boolean defaults to false and every compound set to
    // empty, never left undefined
    for variant in batch.variants.iter_mut() {
        variant
            .inheritance_models
            .insert(family_id.clone(), ModelCalls::new());
        variant
            .compounds
            .insert(family_id.clone(), BTreeSet::new());
    }

    // A family without affected individuals constrains nothing; the
    // initialized all-false results stand
    if family.affected_individuals().count() == 0 {
        log::debug!("Family {} has no affected individuals", family_id);
        return;
    }

    // Compound candidates within this batch's feature scope
    let mut compound_candidates: Vec<usize> = Vec::new();
    for (index, variant) in batch.variants.iter().enumerate() {
        let eligible = !variant.features.is_empty() && (variant.exonic || config.whole_gene);
        if eligible && check_compound_candidate(variant, family, config.strict) {
            compound_candidates.push(index);
        }
    }

    // Single-variant models with parent refinement
    for index in 0..batch.variants.len() {
        let variant = &batch.variants[index];
        let mut calls = ModelCalls::new();

        for &(checker, model) in dispatch(variant) {
            if checker(variant, family, config.strict) {
                calls.set(model.base(), true);
                let refinement = refine_over_family(family, |individual| {
                    refine_single(model, variant, family, individual, config.strict)
                });
                if refinement.set_denovo {
                    calls.set(model.denovo(), true);
                }
                if refinement.retract_base {
                    calls.set(model.base(), false);
                }
            }
        }

        let score = model_score(variant, family);

        let variant = &mut batch.variants[index];
        variant.inheritance_models.insert(family_id.clone(), calls);
        if score > 0 {
            variant.model_scores.insert(family_id.clone(), score);
        }
    }

    // Exhaustive pairwise compound evaluation; order-independent per pair
    if compound_candidates.len() > 1 {
        let haploblocks = config.phased.then_some(&batch.haploblocks);

        for (slot, &first) in compound_candidates.iter().enumerate() {
            for &second in &compound_candidates[slot + 1..] {
                let variant_1 = &batch.variants[first];
                let variant_2 = &batch.variants[second];

                if !variant_1.shares_feature(variant_2) {
                    continue;
                }
                if !check_compound_pair(variant_1, variant_2, family, haploblocks) {
                    continue;
                }

                let refinement = refine_over_family(family, |individual| {
                    refine_compound(variant_1, variant_2, family, individual, config.strict)
                });
                let partner_ids = (variant_2.variant_id(), variant_1.variant_id());

                for (index, partner) in [(first, partner_ids.0), (second, partner_ids.1)] {
                    let variant = &mut batch.variants[index];
                    variant
                        .compounds
                        .get_mut(&family_id)
                        .expect("compounds initialized for family")
                        .insert(partner);

                    let calls = variant
                        .inheritance_models
                        .get_mut(&family_id)
                        .expect("models initialized for family");
                    calls.set(InheritanceModel::AutosomalRecessiveCompound, true);
                    if refinement.set_denovo {
                        calls.set(InheritanceModel::AutosomalRecessiveCompoundDenovo, true);
                    }
                    if refinement.retract_base {
                        calls.set(InheritanceModel::AutosomalRecessiveCompound, false);
                    }
                }
            }
        }
    }
}

/// Annotate batches in parallel and collect every variant.
///
/// Output order across batches is not guaranteed here; callers sort by
/// position before writing.
pub fn annotate_batches(
    batches: Vec<VariantBatch>,
    families: &[Family],
    config: &ModelConfig,
) -> Vec<Variant> {
    batches
        .into_par_iter()
        .map(|mut batch| {
            annotate_batch(&mut batch, families, config);
            batch.variants
        })
        .flatten()
        .collect()
}
