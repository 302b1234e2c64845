//! Single-variant inheritance-model checkers
//!
//! Each checker is a pure conjunctive rule over the family: every individual
//! with a known affection status must be compatible with the model, and the
//! first violation decides the outcome. Individuals with unknown affection
//! status impose no constraint. In strict mode a missing genotype call is
//! itself a violation; otherwise it is non-informative.

use crate::pedigree::Family;
use crate::variant::Variant;

/// Autosomal dominant: healthy individuals must not carry the variant,
/// affected individuals must be heterozygous.
///
/// With reduced penetrance a healthy heterozygous carrier is allowed
/// (homozygous alternate still fails) and affected individuals only need to
/// carry the variant.
pub fn check_dominant(variant: &Variant, family: &Family, strict: bool) -> bool {
    for individual in family.individuals.values() {
        if individual.phenotype_unknown() {
            continue;
        }
        let genotype = variant.genotype(&individual.id);

        if individual.healthy() {
            if genotype.genotyped {
                if genotype.has_variant {
                    if variant.reduced_penetrance {
                        if genotype.homo_alt {
                            return false;
                        }
                    } else {
                        return false;
                    }
                }
            } else if strict {
                return false;
            }
        } else if individual.affected() {
            if genotype.genotyped {
                if variant.reduced_penetrance {
                    if !genotype.has_variant {
                        return false;
                    }
                } else if !genotype.heterozygote {
                    return false;
                }
            } else if strict {
                return false;
            }
        }
    }
    true
}

/// Autosomal recessive, homozygous: healthy individuals must not be
/// homozygous alternate, affected individuals must be.
pub fn check_recessive(variant: &Variant, family: &Family, strict: bool) -> bool {
    for individual in family.individuals.values() {
        if individual.phenotype_unknown() {
            continue;
        }
        let genotype = variant.genotype(&individual.id);

        if individual.healthy() {
            if genotype.genotyped {
                if genotype.homo_alt {
                    return false;
                }
            } else if strict {
                return false;
            }
        } else if individual.affected() {
            if genotype.genotyped {
                if !genotype.homo_alt {
                    return false;
                }
            } else if strict {
                return false;
            }
        }
    }
    true
}

/// X-linked recessive. Healthy males must not carry the variant at all,
/// since a male has a single X copy and a heterozygous call cannot be a
/// silent carrier state. Affected females must be homozygous alternate;
/// affected males only need to carry the variant (hemizygosity).
pub fn check_x_recessive(variant: &Variant, family: &Family, strict: bool) -> bool {
    for individual in family.individuals.values() {
        if individual.phenotype_unknown() {
            continue;
        }
        let genotype = variant.genotype(&individual.id);

        if individual.healthy() {
            if genotype.genotyped {
                if genotype.homo_alt {
                    return false;
                }
                if individual.is_male() && genotype.has_variant {
                    return false;
                }
            } else if strict {
                return false;
            }
        } else if individual.affected() {
            if genotype.genotyped {
                if genotype.homo_ref {
                    return false;
                }
                if individual.is_female() && !genotype.homo_alt {
                    return false;
                }
                if individual.is_male() && !genotype.has_variant {
                    return false;
                }
            } else if strict {
                return false;
            }
        }
    }
    true
}

/// X-linked dominant. Healthy females may be heterozygous carriers but not
/// homozygous alternate; healthy males must not carry the variant. Affected
/// individuals must not be homozygous reference.
pub fn check_x_dominant(variant: &Variant, family: &Family, strict: bool) -> bool {
    for individual in family.individuals.values() {
        if individual.phenotype_unknown() {
            continue;
        }
        let genotype = variant.genotype(&individual.id);

        if individual.healthy() {
            if genotype.genotyped {
                if individual.is_male() && genotype.has_variant {
                    return false;
                }
                if individual.is_female() && genotype.homo_alt {
                    return false;
                }
            } else if strict {
                return false;
            }
        } else if individual.affected() {
            if genotype.genotyped {
                if genotype.homo_ref {
                    return false;
                }
            } else if strict {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genotype::Genotype;
    use crate::pedigree::{Family, Individual, Phenotype, Sex};
    use crate::variant::Variant;

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

    fn family(members: Vec<Individual>) -> Family {
        let mut family = Family::new("fam".to_string());
        for member in members {
            family.add_individual(member);
        }
        family
    }

    fn variant(chrom: &str, calls: &[(&str, &str)]) -> Variant {
        let mut variant = Variant::new(chrom.to_string(), 100, "A".to_string(), "T".to_string());
        for (id, call) in calls {
            variant
                .genotypes
                .insert(id.to_string(), Genotype::from_call(call));
        }
        variant
    }

    #[test]
    fn test_dominant_single_affected_het() {
        // Single unrelated affected individual, 0/1 autosomal
        let fam = family(vec![individual("proband", Sex::Female, Phenotype::Affected)]);
        let var = variant("1", &[("proband", "0/1")]);

        assert!(check_dominant(&var, &fam, false));
        assert!(!check_recessive(&var, &fam, false));
    }

    #[test]
    fn test_dominant_fails_on_any_healthy_carrier() {
        for call in ["0/1", "1/1", "1/2"] {
            let fam = family(vec![
                individual("proband", Sex::Male, Phenotype::Affected),
                individual("parent", Sex::Female, Phenotype::Healthy),
            ]);
            let var = variant("1", &[("proband", "0/1"), ("parent", call)]);
            assert!(
                !check_dominant(&var, &fam, false),
                "healthy carrier {} must fail dominant",
                call
            );
        }
    }

    #[test]
    fn test_dominant_affected_must_be_het() {
        let fam = family(vec![individual("proband", Sex::Male, Phenotype::Affected)]);
        let var = variant("1", &[("proband", "1/1")]);
        assert!(!check_dominant(&var, &fam, false));

        let var = variant("1", &[("proband", "0/0")]);
        assert!(!check_dominant(&var, &fam, false));
    }

    #[test]
    fn test_dominant_missing_call_policy() {
        let fam = family(vec![
            individual("proband", Sex::Male, Phenotype::Affected),
            individual("parent", Sex::Female, Phenotype::Healthy),
        ]);
        let var = variant("1", &[("proband", "0/1"), ("parent", "./.")]);

        // Non-strict: missing call is non-informative
        assert!(check_dominant(&var, &fam, false));
        // Strict: missing call violates the model
        assert!(!check_dominant(&var, &fam, true));
    }

    #[test]
    fn test_dominant_unknown_phenotype_no_constraint() {
        let fam = family(vec![
            individual("proband", Sex::Male, Phenotype::Affected),
            individual("relative", Sex::Female, Phenotype::Unknown),
        ]);
        let var = variant("1", &[("proband", "0/1"), ("relative", "1/1")]);

        assert!(check_dominant(&var, &fam, false));
    }

    #[test]
    fn test_dominant_reduced_penetrance() {
        let fam = family(vec![
            individual("proband", Sex::Male, Phenotype::Affected),
            individual("parent", Sex::Female, Phenotype::Healthy),
        ]);
        let mut var = variant("1", &[("proband", "0/1"), ("parent", "0/1")]);
        assert!(!check_dominant(&var, &fam, false));

        // Healthy het carrier tolerated in a reduced-penetrance gene
        var.reduced_penetrance = true;
        assert!(check_dominant(&var, &fam, false));

        // Homozygous alternate still fails
        let mut var = variant("1", &[("proband", "0/1"), ("parent", "1/1")]);
        var.reduced_penetrance = true;
        assert!(!check_dominant(&var, &fam, false));
    }

    #[test]
    fn test_recessive_trio() {
        let fam = family(vec![
            individual("child", Sex::Male, Phenotype::Affected),
            individual("father", Sex::Male, Phenotype::Healthy),
            individual("mother", Sex::Female, Phenotype::Healthy),
        ]);
        let var = variant(
            "1",
            &[("child", "1/1"), ("father", "0/1"), ("mother", "0/1")],
        );
        assert!(check_recessive(&var, &fam, false));

        // Healthy homozygous alternate fails
        let var = variant(
            "1",
            &[("child", "1/1"), ("father", "1/1"), ("mother", "0/1")],
        );
        assert!(!check_recessive(&var, &fam, false));

        // Affected heterozygote fails
        let var = variant(
            "1",
            &[("child", "0/1"), ("father", "0/1"), ("mother", "0/1")],
        );
        assert!(!check_recessive(&var, &fam, false));
    }

    #[test]
    fn test_x_recessive_healthy_male_het_fails() {
        let fam = family(vec![
            individual("proband", Sex::Female, Phenotype::Affected),
            individual("father", Sex::Male, Phenotype::Healthy),
        ]);
        let var = variant("X", &[("proband", "1/1"), ("father", "0/1")]);
        assert!(!check_x_recessive(&var, &fam, false));

        let var = variant("X", &[("proband", "1/1"), ("father", "0/0")]);
        assert!(check_x_recessive(&var, &fam, false));
    }

    #[test]
    fn test_x_recessive_affected_male_het_accepted() {
        // A heterozygous call on a hemizygous male still reads as carrying
        let fam = family(vec![individual("proband", Sex::Male, Phenotype::Affected)]);
        let var = variant("X", &[("proband", "0/1")]);
        assert!(check_x_recessive(&var, &fam, false));
    }

    #[test]
    fn test_x_recessive_affected_female_must_be_homo_alt() {
        let fam = family(vec![individual("proband", Sex::Female, Phenotype::Affected)]);
        let var = variant("X", &[("proband", "0/1")]);
        assert!(!check_x_recessive(&var, &fam, false));

        let var = variant("X", &[("proband", "1/1")]);
        assert!(check_x_recessive(&var, &fam, false));
    }

    #[test]
    fn test_x_dominant_rules() {
        // Healthy female het carrier is acceptable
        let fam = family(vec![
            individual("proband", Sex::Male, Phenotype::Affected),
            individual("mother", Sex::Female, Phenotype::Healthy),
        ]);
        let var = variant("X", &[("proband", "0/1"), ("mother", "0/1")]);
        assert!(check_x_dominant(&var, &fam, false));

        // Healthy female homozygous alternate fails
        let var = variant("X", &[("proband", "0/1"), ("mother", "1/1")]);
        assert!(!check_x_dominant(&var, &fam, false));

        // Healthy male carrier fails
        let fam = family(vec![
            individual("proband", Sex::Female, Phenotype::Affected),
            individual("father", Sex::Male, Phenotype::Healthy),
        ]);
        let var = variant("X", &[("proband", "0/1"), ("father", "0/1")]);
        assert!(!check_x_dominant(&var, &fam, false));

        // Affected homozygous reference fails
        let fam = family(vec![individual("proband", Sex::Female, Phenotype::Affected)]);
        let var = variant("X", &[("proband", "0/0")]);
        assert!(!check_x_dominant(&var, &fam, false));
    }
}
