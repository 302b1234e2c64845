//! Compound-heterozygote candidate filtering and pair checking

use crate::haploblock::HaploblockIndex;
use crate::pedigree::Family;
use crate::variant::Variant;
use std::collections::BTreeMap;

/// Decide whether a variant could participate in a compound-heterozygous
/// pair within its feature.
///
/// No individual may be homozygous alternate. Affected individuals must be
/// heterozygous (a missing call only rejects in strict mode). An affected
/// individual whose two recorded parents are both healthy and both carry
/// the variant is excluded: the single variant would then have to explain
/// the phenotype on its own, so it is not a candidate for pairing.
pub fn check_compound_candidate(variant: &Variant, family: &Family, strict: bool) -> bool {
    for individual in family.individuals.values() {
        let genotype = variant.genotype(&individual.id);

        if genotype.homo_alt {
            return false;
        }

        if individual.affected() {
            if genotype.genotyped {
                if !genotype.heterozygote {
                    return false;
                }
            } else if strict {
                return false;
            }

            if individual.has_parents() {
                let mother = family.individuals.get(&individual.mother);
                let father = family.individuals.get(&individual.father);
                if let (Some(mother), Some(father)) = (mother, father) {
                    if mother.healthy()
                        && father.healthy()
                        && variant.genotype(&mother.id).has_variant
                        && variant.genotype(&father.id).has_variant
                    {
                        return false;
                    }
                }
            }
        }
    }
    true
}

/// Decide whether two feature-sharing compound candidates jointly satisfy
/// the compound-heterozygous model.
///
/// Single-individual families carry no pedigree structure, so any
/// feature-sharing candidate pair is accepted outright. Otherwise a healthy
/// individual heterozygous for both halves rejects the pair, as does a
/// healthy parent carrying both halves. With phasing active, two variants
/// inside one haploblock of an affected individual must sit on different
/// haplotypes.
pub fn check_compound_pair(
    variant_1: &Variant,
    variant_2: &Variant,
    family: &Family,
    haploblocks: Option<&BTreeMap<String, HaploblockIndex>>,
) -> bool {
    if family.is_single_individual() {
        return true;
    }

    for individual in family.individuals.values() {
        let genotype_1 = variant_1.genotype(&individual.id);
        let genotype_2 = variant_2.genotype(&individual.id);

        if individual.healthy() && genotype_1.heterozygote && genotype_2.heterozygote {
            return false;
        }

        if individual.has_parents() {
            for parent_id in [&individual.mother, &individual.father] {
                if let Some(parent) = family.individuals.get(parent_id.as_str()) {
                    if parent.healthy()
                        && variant_1.genotype(&parent.id).has_variant
                        && variant_2.genotype(&parent.id).has_variant
                    {
                        return false;
                    }
                }
            }
        }

        if individual.affected() {
            if let Some(index) = haploblocks.and_then(|map| map.get(&individual.id)) {
                if index.same_block(variant_1.pos, variant_2.pos)
                    && genotype_1.phased
                    && genotype_2.phased
                {
                    // Same phased interval: the variant alleles must come
                    // from different haplotypes
                    if genotype_1.allele_1 == genotype_2.allele_1
                        || genotype_1.allele_2 == genotype_2.allele_2
                    {
                        return false;
                    }
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genotype::Genotype;
    use crate::haploblock::HaploblockIndex;
    use crate::pedigree::{Individual, Phenotype, Sex};

    fn individual(id: &str, sex: Sex, phenotype: Phenotype) -> Individual {
        Individual::new(
            id.to_string(),
            "fam".to_string(),
            "0".to_string(),
            "0".to_string(),
            sex,
            phenotype,
        )
    }

    fn child_of(id: &str, father: &str, mother: &str, phenotype: Phenotype) -> Individual {
        Individual::new(
            id.to_string(),
            "fam".to_string(),
            father.to_string(),
            mother.to_string(),
            Sex::Female,
            phenotype,
        )
    }

    fn family(members: Vec<Individual>) -> Family {
        let mut family = Family::new("fam".to_string());
        for member in members {
            family.add_individual(member);
        }
        family
    }

    fn variant(pos: u32, calls: &[(&str, &str)]) -> Variant {
        let mut variant = Variant::new("1".to_string(), pos, "A".to_string(), "T".to_string());
        for (id, call) in calls {
            variant
                .genotypes
                .insert(id.to_string(), Genotype::from_call(call));
        }
        variant
    }

    #[test]
    fn test_candidate_affected_must_be_het() {
        let fam = family(vec![individual("proband", Sex::Female, Phenotype::Affected)]);

        assert!(check_compound_candidate(
            &variant(100, &[("proband", "0/1")]),
            &fam,
            false
        ));
        assert!(!check_compound_candidate(
            &variant(100, &[("proband", "1/1")]),
            &fam,
            false
        ));
        assert!(!check_compound_candidate(
            &variant(100, &[("proband", "0/0")]),
            &fam,
            false
        ));
    }

    #[test]
    fn test_candidate_missing_call() {
        let fam = family(vec![individual("proband", Sex::Female, Phenotype::Affected)]);
        let var = variant(100, &[("proband", "./.")]);

        assert!(check_compound_candidate(&var, &fam, false));
        assert!(!check_compound_candidate(&var, &fam, true));
    }

    #[test]
    fn test_candidate_no_homo_alt_anywhere() {
        let fam = family(vec![
            individual("proband", Sex::Female, Phenotype::Affected),
            individual("relative", Sex::Male, Phenotype::Unknown),
        ]);
        let var = variant(100, &[("proband", "0/1"), ("relative", "1/1")]);

        assert!(!check_compound_candidate(&var, &fam, false));
    }

    #[test]
    fn test_candidate_both_healthy_parents_carrying_excludes() {
        let fam = family(vec![
            child_of("child", "father", "mother", Phenotype::Affected),
            individual("father", Sex::Male, Phenotype::Healthy),
            individual("mother", Sex::Female, Phenotype::Healthy),
        ]);
        let var = variant(
            100,
            &[("child", "0/1"), ("father", "0/1"), ("mother", "0/1")],
        );
        assert!(!check_compound_candidate(&var, &fam, false));

        // Only one parent carrying keeps the candidate
        let var = variant(
            100,
            &[("child", "0/1"), ("father", "0/1"), ("mother", "0/0")],
        );
        assert!(check_compound_candidate(&var, &fam, false));
    }

    #[test]
    fn test_pair_single_individual_family_accepts() {
        let fam = family(vec![individual("proband", Sex::Female, Phenotype::Affected)]);
        let v1 = variant(100, &[("proband", "0/0")]);
        let v2 = variant(200, &[("proband", "0/0")]);

        assert!(check_compound_pair(&v1, &v2, &fam, None));
    }

    #[test]
    fn test_pair_healthy_double_het_rejects() {
        let fam = family(vec![
            individual("proband", Sex::Female, Phenotype::Affected),
            individual("sibling", Sex::Male, Phenotype::Healthy),
        ]);
        let v1 = variant(100, &[("proband", "0/1"), ("sibling", "0/1")]);
        let v2 = variant(200, &[("proband", "0/1"), ("sibling", "0/1")]);
        assert!(!check_compound_pair(&v1, &v2, &fam, None));

        // Healthy carrier of only one half is fine
        let v2 = variant(200, &[("proband", "0/1"), ("sibling", "0/0")]);
        assert!(check_compound_pair(&v1, &v2, &fam, None));
    }

    #[test]
    fn test_pair_healthy_parent_with_both_halves_rejects() {
        let fam = family(vec![
            child_of("child", "father", "mother", Phenotype::Affected),
            individual("father", Sex::Male, Phenotype::Healthy),
            individual("mother", Sex::Female, Phenotype::Healthy),
        ]);
        let v1 = variant(
            100,
            &[("child", "0/1"), ("father", "0/1"), ("mother", "0/0")],
        );
        let v2 = variant(
            200,
            &[("child", "0/1"), ("father", "0/1"), ("mother", "0/0")],
        );
        assert!(!check_compound_pair(&v1, &v2, &fam, None));

        // Trans configuration passes
        let v2 = variant(
            200,
            &[("child", "0/1"), ("father", "0/0"), ("mother", "0/1")],
        );
        assert!(check_compound_pair(&v1, &v2, &fam, None));
    }

    #[test]
    fn test_pair_same_haplotype_in_block_rejects() {
        // Duo: child and mother; both variants on the child's first
        // haplotype within one phased interval
        let fam = family(vec![
            child_of("child", "0", "mother", Phenotype::Affected),
            individual("mother", Sex::Female, Phenotype::Healthy),
        ]);
        let v1 = variant(100, &[("child", "1|0"), ("mother", "0/0")]);
        let v2 = variant(200, &[("child", "1|0"), ("mother", "0/0")]);

        let mut haploblocks = BTreeMap::new();
        haploblocks.insert(
            "child".to_string(),
            HaploblockIndex::from_calls(&[(100, true, true), (200, true, true)]),
        );

        assert!(!check_compound_pair(&v1, &v2, &fam, Some(&haploblocks)));

        // Opposite haplotypes pass
        let v2 = variant(200, &[("child", "0|1"), ("mother", "0/0")]);
        assert!(check_compound_pair(&v1, &v2, &fam, Some(&haploblocks)));
    }

    #[test]
    fn test_pair_different_blocks_skip_phase_check() {
        let fam = family(vec![
            child_of("child", "0", "mother", Phenotype::Affected),
            individual("mother", Sex::Female, Phenotype::Healthy),
        ]);
        let v1 = variant(100, &[("child", "1|0"), ("mother", "0/0")]);
        let v2 = variant(200, &[("child", "1|0"), ("mother", "0/0")]);

        // Blocks are separated by an unphased PASS call at 150
        let mut haploblocks = BTreeMap::new();
        haploblocks.insert(
            "child".to_string(),
            HaploblockIndex::from_calls(&[
                (100, true, true),
                (150, false, true),
                (200, true, true),
            ]),
        );

        assert!(check_compound_pair(&v1, &v2, &fam, Some(&haploblocks)));
    }
}
