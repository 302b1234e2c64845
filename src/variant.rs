//! Variant records and the closed set of inheritance models

use crate::genotype::Genotype;
use crate::{MendelError, MendelResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// The closed set of inheritance models a variant can be annotated with.
///
/// The `_dn` variants mark patterns additionally explainable as de novo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InheritanceModel {
    AutosomalDominant,
    AutosomalDominantDenovo,
    AutosomalRecessive,
    AutosomalRecessiveDenovo,
    AutosomalRecessiveCompound,
    AutosomalRecessiveCompoundDenovo,
    XLinkedRecessive,
    XLinkedRecessiveDenovo,
    XLinkedDominant,
    XLinkedDominantDenovo,
}

impl InheritanceModel {
    /// All models, in output order
    pub const ALL: [InheritanceModel; 10] = [
        InheritanceModel::AutosomalDominant,
        InheritanceModel::AutosomalDominantDenovo,
        InheritanceModel::AutosomalRecessive,
        InheritanceModel::AutosomalRecessiveDenovo,
        InheritanceModel::AutosomalRecessiveCompound,
        InheritanceModel::AutosomalRecessiveCompoundDenovo,
        InheritanceModel::XLinkedRecessive,
        InheritanceModel::XLinkedRecessiveDenovo,
        InheritanceModel::XLinkedDominant,
        InheritanceModel::XLinkedDominantDenovo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InheritanceModel::AutosomalDominant => "AD",
            InheritanceModel::AutosomalDominantDenovo => "AD_dn",
            InheritanceModel::AutosomalRecessive => "AR_hom",
            InheritanceModel::AutosomalRecessiveDenovo => "AR_hom_dn",
            InheritanceModel::AutosomalRecessiveCompound => "AR_comp",
            InheritanceModel::AutosomalRecessiveCompoundDenovo => "AR_comp_dn",
            InheritanceModel::XLinkedRecessive => "XR",
            InheritanceModel::XLinkedRecessiveDenovo => "XR_dn",
            InheritanceModel::XLinkedDominant => "XD",
            InheritanceModel::XLinkedDominantDenovo => "XD_dn",
        }
    }

    /// Parse a model name. Any name outside the closed set is a caller defect.
    pub fn from_name(name: &str) -> MendelResult<Self> {
        InheritanceModel::ALL
            .iter()
            .find(|model| model.as_str() == name)
            .copied()
            .ok_or_else(|| MendelError::UnknownModel(name.to_string()))
    }

    const fn index(self) -> usize {
        match self {
            InheritanceModel::AutosomalDominant => 0,
            InheritanceModel::AutosomalDominantDenovo => 1,
            InheritanceModel::AutosomalRecessive => 2,
            InheritanceModel::AutosomalRecessiveDenovo => 3,
            InheritanceModel::AutosomalRecessiveCompound => 4,
            InheritanceModel::AutosomalRecessiveCompoundDenovo => 5,
            InheritanceModel::XLinkedRecessive => 6,
            InheritanceModel::XLinkedRecessiveDenovo => 7,
            InheritanceModel::XLinkedDominant => 8,
            InheritanceModel::XLinkedDominantDenovo => 9,
        }
    }
}

impl fmt::Display for InheritanceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Boolean call table over the closed model set, default all-false
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCalls {
    calls: [bool; 10],
}

impl ModelCalls {
    pub fn new() -> Self {
        ModelCalls::default()
    }

    pub fn set(&mut self, model: InheritanceModel, value: bool) {
        self.calls[model.index()] = value;
    }

    pub fn get(&self, model: InheritanceModel) -> bool {
        self.calls[model.index()]
    }

    pub fn any(&self) -> bool {
        self.calls.iter().any(|&call| call)
    }

    /// Names of the set models, joined with `|` for the INFO field
    pub fn to_info_value(&self) -> String {
        InheritanceModel::ALL
            .iter()
            .filter(|model| self.get(**model))
            .map(|model| model.as_str())
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// A variant within a batch, with per-individual genotypes and the mutable
/// result fields the orchestrator fills in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Variant {
    pub chrom: String,
    pub pos: u32,
    pub ref_allele: String,
    pub alt_allele: String,
    /// FILTER column value, used by haploblock construction
    pub filter: String,
    /// Individual id -> genotype call
    pub genotypes: BTreeMap<String, Genotype>,
    /// Annotated features (gene symbols) used for batching and compounds
    pub features: BTreeSet<String>,
    /// Variant overlaps an exonic region; widens compound eligibility
    pub exonic: bool,
    /// Variant lies in a reduced-penetrance gene; relaxes affected checks
    pub reduced_penetrance: bool,
    /// family id -> model call table
    pub inheritance_models: BTreeMap<String, ModelCalls>,
    /// family id -> compound partner variant ids
    pub compounds: BTreeMap<String, BTreeSet<String>>,
    /// family id -> PHRED model confidence score
    pub model_scores: BTreeMap<String, u32>,
}

impl Variant {
    pub fn new(chrom: String, pos: u32, ref_allele: String, alt_allele: String) -> Self {
        Variant {
            chrom,
            pos,
            ref_allele,
            alt_allele,
            filter: "PASS".to_string(),
            ..Default::default()
        }
    }

    /// Stable identifier used for compound partner bookkeeping
    pub fn variant_id(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.chrom, self.pos, self.ref_allele, self.alt_allele
        )
    }

    /// Chromosome label with any leading "chr" prefix stripped
    pub fn plain_chrom(&self) -> &str {
        self.chrom.strip_prefix("chr").unwrap_or(&self.chrom)
    }

    pub fn is_x_chromosome(&self) -> bool {
        self.plain_chrom() == "X"
    }

    /// Genotype for one individual; missing entries read as not genotyped
    pub fn genotype(&self, individual_id: &str) -> Genotype {
        self.genotypes
            .get(individual_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn shares_feature(&self, other: &Variant) -> bool {
        self.features
            .intersection(&other.features)
            .next()
            .is_some()
    }
}
