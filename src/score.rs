//! Model-confidence score from genotype qualities
//!
//! The score expresses the probability that at least one contributing
//! genotype call is correct, re-encoded on the PHRED scale.

use crate::pedigree::Family;
use crate::variant::Variant;

/// Compute the PHRED-scaled model confidence score for one family at one
/// variant. Individuals with non-positive genotype quality contribute
/// nothing; with no contributors the score is 0.
pub fn model_score(variant: &Variant, family: &Family) -> u32 {
    let mut product = 1.0_f64;
    let mut contributors = 0;

    for individual in family.individuals.values() {
        let quality = variant.genotype(&individual.id).genotype_quality;
        if quality > 0.0 {
            let error_probability = 10.0_f64.powf(-quality / 10.0);
            product *= 1.0 - error_probability;
            contributors += 1;
        }
    }

    // Log-domain guard: with no contributors 1 - product is exactly 0
    if contributors == 0 || product >= 1.0 {
        return 0;
    }

    (-10.0 * (1.0 - product).log10()).round() as u32
}
