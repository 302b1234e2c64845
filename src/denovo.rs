//! De novo refinement of inheritance-model calls from parental evidence
//!
//! After a base model is found to hold, the parents' genotypes decide two
//! things: whether the pattern could also be explained as de novo (set the
//! `_dn` flag), and whether full parental data actually contradicts
//! inheritance (retract the base flag). A recorded parent id with no record
//! in the family is treated as an absent parent. On partial parental
//! evidence the base model is never retracted; in strict mode partial
//! evidence sets nothing at all.

use crate::genotype::Genotype;
use crate::pedigree::{Family, Individual};
use crate::variant::{InheritanceModel, Variant};

/// The four single-variant base models, each knowing its de novo companion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleModel {
    Dominant,
    Recessive,
    XRecessive,
    XDominant,
}

impl SingleModel {
    pub fn base(self) -> InheritanceModel {
        match self {
            SingleModel::Dominant => InheritanceModel::AutosomalDominant,
            SingleModel::Recessive => InheritanceModel::AutosomalRecessive,
            SingleModel::XRecessive => InheritanceModel::XLinkedRecessive,
            SingleModel::XDominant => InheritanceModel::XLinkedDominant,
        }
    }

    pub fn denovo(self) -> InheritanceModel {
        match self {
            SingleModel::Dominant => InheritanceModel::AutosomalDominantDenovo,
            SingleModel::Recessive => InheritanceModel::AutosomalRecessiveDenovo,
            SingleModel::XRecessive => InheritanceModel::XLinkedRecessiveDenovo,
            SingleModel::XDominant => InheritanceModel::XLinkedDominantDenovo,
        }
    }
}

/// Outcome of one individual's parental-evidence check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Refinement {
    /// Parental evidence is compatible with de novo
    pub set_denovo: bool,
    /// Full parental data proves the pattern was not inherited
    pub retract_base: bool,
}

impl Refinement {
    fn none() -> Self {
        Refinement::default()
    }
}

/// Genotype of a recorded parent, or None when the parent is absent from
/// the family
fn parent_genotype(variant: &Variant, family: &Family, parent_id: &str) -> Option<Genotype> {
    if parent_id == "0" || !family.individuals.contains_key(parent_id) {
        return None;
    }
    Some(variant.genotype(parent_id))
}

fn carries(genotype: &Option<Genotype>) -> bool {
    genotype.as_ref().map(|gt| gt.has_variant).unwrap_or(false)
}

fn genotyped(genotype: &Option<Genotype>) -> bool {
    genotype.as_ref().map(|gt| gt.genotyped).unwrap_or(false)
}

/// Check one individual's parents against a base model that holds for the
/// family at this variant.
pub fn refine_single(
    model: SingleModel,
    variant: &Variant,
    family: &Family,
    individual: &Individual,
    strict: bool,
) -> Refinement {
    let mother = parent_genotype(variant, family, &individual.mother);
    let father = parent_genotype(variant, family, &individual.father);
    let both_present = mother.is_some() && father.is_some();

    match model {
        SingleModel::Dominant => {
            refine_any_parent_carries(&mother, &father, both_present, strict)
        }
        SingleModel::Recessive => {
            refine_both_parents_carry(&mother, &father, both_present, strict)
        }
        SingleModel::XRecessive => {
            if individual.is_male() {
                refine_mother_carries(&mother, strict)
            } else {
                refine_both_parents_carry(&mother, &father, both_present, strict)
            }
        }
        SingleModel::XDominant => {
            if individual.is_male() {
                refine_mother_carries(&mother, strict)
            } else {
                refine_any_parent_carries(&mother, &father, both_present, strict)
            }
        }
    }
}

/// Dominant-style rule: inheritance is explained when any parent carries
/// the variant.
fn refine_any_parent_carries(
    mother: &Option<Genotype>,
    father: &Option<Genotype>,
    both_present: bool,
    strict: bool,
) -> Refinement {
    if strict && !both_present {
        return Refinement::none();
    }
    let any_carries = carries(mother) || carries(father);
    Refinement {
        set_denovo: !any_carries,
        retract_base: both_present && genotyped(mother) && genotyped(father) && !any_carries,
    }
}

/// Recessive-style rule: inheritance is explained only when both parents
/// carry the variant.
fn refine_both_parents_carry(
    mother: &Option<Genotype>,
    father: &Option<Genotype>,
    both_present: bool,
    strict: bool,
) -> Refinement {
    if strict && !both_present {
        return Refinement::none();
    }
    let both_carry = both_present && carries(mother) && carries(father);
    Refinement {
        set_denovo: !both_carry,
        retract_base: both_present && genotyped(mother) && genotyped(father) && !both_carry,
    }
}

/// Hemizygous-male rule: only the mother's X is informative.
fn refine_mother_carries(mother: &Option<Genotype>, strict: bool) -> Refinement {
    if strict && mother.is_none() {
        return Refinement::none();
    }
    let mother_carries = carries(mother);
    Refinement {
        set_denovo: !mother_carries,
        retract_base: mother.is_some() && genotyped(mother) && !mother_carries,
    }
}

/// Check one individual's parents at both variants of an accepted compound
/// pair. The inherited explanation requires the trans configuration: one
/// parent carrying one variant and the other parent carrying the other.
pub fn refine_compound(
    variant_1: &Variant,
    variant_2: &Variant,
    family: &Family,
    individual: &Individual,
    strict: bool,
) -> Refinement {
    let mother_1 = parent_genotype(variant_1, family, &individual.mother);
    let mother_2 = parent_genotype(variant_2, family, &individual.mother);
    let father_1 = parent_genotype(variant_1, family, &individual.father);
    let father_2 = parent_genotype(variant_2, family, &individual.father);
    let both_present = mother_1.is_some() && father_1.is_some();

    if strict && !both_present {
        return Refinement::none();
    }

    let trans_explained = both_present
        && ((carries(&mother_1) && carries(&father_2))
            || (carries(&mother_2) && carries(&father_1)));

    let fully_genotyped = both_present
        && genotyped(&mother_1)
        && genotyped(&mother_2)
        && genotyped(&father_1)
        && genotyped(&father_2);

    Refinement {
        set_denovo: !trans_explained,
        retract_base: fully_genotyped && !trans_explained,
    }
}
