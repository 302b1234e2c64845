//! # mendel-rs - Mendelian Inheritance Model Annotation
//!
//! Annotates genetic variants in VCF files with the Mendelian inheritance
//! patterns (dominant, recessive, X-linked and compound heterozygous) that
//! each variant is consistent with for a given pedigree, together with a
//! confidence score derived from genotype qualities.

pub mod annotate;
pub mod batch;
pub mod compound;
pub mod denovo;
pub mod genotype;
pub mod haploblock;
pub mod models;
pub mod pedigree;
pub mod score;
pub mod utils;
pub mod variant;
pub mod vcf;

use std::collections::HashSet;

/// Configuration parameters for inheritance-model annotation
#[derive(Debug, Clone, Default)]
pub struct ModelConfig {
    /// Genotype calls carry phasing information; build haploblocks and use
    /// them when evaluating compound pairs
    pub phased: bool,
    /// Treat missing genotype calls as model-violating
    pub strict: bool,
    /// Consider intronic variants as compound candidates, not only exonic
    pub whole_gene: bool,
    /// Genes in which affected-individual constraints are relaxed
    pub reduced_penetrance_genes: HashSet<String>,
}

/// Error types for the mendel-rs library
#[derive(Debug, thiserror::Error)]
pub enum MendelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid variant format: {0}")]
    InvalidVariant(String),

    #[error("Invalid pedigree record: {0}")]
    InvalidPedigree(String),

    #[error("Pedigree individual '{0}' is missing from the VCF sample columns")]
    SampleMismatch(String),

    #[error("Unknown inheritance model name: {0}")]
    UnknownModel(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type MendelResult<T> = Result<T, MendelError>;
