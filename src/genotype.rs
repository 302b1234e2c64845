//! Genotype derivation from raw VCF call strings

use serde::{Deserialize, Serialize};

/// One individual's categorical genotype state at one variant position.
///
/// Derived from a raw call string of the form `A1/A2` (unphased) or `A1|A2`
/// (phased). Missing or malformed calls degrade to the not-genotyped default
/// rather than erroring, since bad calls are a normal occurrence in real data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genotype {
    pub allele_1: String,
    pub allele_2: String,
    /// False iff the raw call is `./.` (or unparseable)
    pub genotyped: bool,
    pub homo_ref: bool,
    pub homo_alt: bool,
    pub heterozygote: bool,
    /// Homozygous alternate or heterozygous
    pub has_variant: bool,
    /// Separator was `|`
    pub phased: bool,
    /// PHRED-scaled genotype quality from the GQ field, 0.0 when absent
    pub genotype_quality: f64,
}

impl Default for Genotype {
    fn default() -> Self {
        Genotype {
            allele_1: ".".to_string(),
            allele_2: ".".to_string(),
            genotyped: false,
            homo_ref: false,
            homo_alt: false,
            heterozygote: false,
            has_variant: false,
            phased: false,
            genotype_quality: 0.0,
        }
    }
}

impl Genotype {
    /// Parse a raw GT string like `0/1`, `1|1` or the haploid `1`.
    pub fn from_call(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Genotype::default();
        }

        let (allele_1, allele_2, phased) = if let Some((a1, a2)) = raw.split_once('|') {
            (a1, a2, true)
        } else if let Some((a1, a2)) = raw.split_once('/') {
            (a1, a2, false)
        } else {
            // Haploid call, normalize to A1/.
            (raw, ".", false)
        };

        let allele_1 = allele_1.to_string();
        let allele_2 = allele_2.to_string();

        let a1_called = allele_1 != ".";
        let a2_called = allele_2 != ".";
        let genotyped = a1_called || a2_called;

        let mut homo_ref = false;
        let mut homo_alt = false;
        let mut heterozygote = false;

        if genotyped {
            if a1_called && a2_called {
                if allele_1 == allele_2 {
                    if allele_1 == "0" {
                        homo_ref = true;
                    } else {
                        homo_alt = true;
                    }
                } else {
                    heterozygote = true;
                }
            } else {
                // Half-call: classify by the single called allele. A
                // hemizygous non-ref allele counts as homozygous alternate.
                let called = if a1_called { &allele_1 } else { &allele_2 };
                if called == "0" {
                    homo_ref = true;
                } else {
                    homo_alt = true;
                }
            }
        }

        let has_variant = homo_alt || heterozygote;

        Genotype {
            allele_1,
            allele_2,
            genotyped,
            homo_ref,
            homo_alt,
            heterozygote,
            has_variant,
            phased,
            genotype_quality: 0.0,
        }
    }

    /// Parse a GT string together with its GQ value.
    pub fn from_call_with_quality(raw: &str, quality: f64) -> Self {
        let mut genotype = Genotype::from_call(raw);
        genotype.genotype_quality = quality.max(0.0);
        genotype
    }
}
