//! Pedigree model and PED file parsing

use crate::{MendelError, MendelResult};
use flate2::read::MultiGzDecoder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::utils::is_gzipped;

/// Biological sex as coded in PED files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Unknown,
    Male,
    Female,
}

impl Sex {
    pub fn from_code(code: &str) -> MendelResult<Self> {
        match code {
            "0" | "." => Ok(Sex::Unknown),
            "1" => Ok(Sex::Male),
            "2" => Ok(Sex::Female),
            other => Err(MendelError::InvalidPedigree(format!(
                "invalid sex code: {}",
                other
            ))),
        }
    }
}

/// Affection status as coded in PED files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phenotype {
    Unknown,
    Healthy,
    Affected,
}

impl Phenotype {
    pub fn from_code(code: &str) -> MendelResult<Self> {
        match code {
            "0" | "." | "-9" => Ok(Phenotype::Unknown),
            "1" => Ok(Phenotype::Healthy),
            "2" => Ok(Phenotype::Affected),
            other => Err(MendelError::InvalidPedigree(format!(
                "invalid phenotype code: {}",
                other
            ))),
        }
    }
}

/// One member of a family with parent links
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Individual {
    pub id: String,
    pub family_id: String,
    /// "0" means no father recorded
    pub father: String,
    /// "0" means no mother recorded
    pub mother: String,
    pub sex: Sex,
    pub phenotype: Phenotype,
}

impl Individual {
    pub fn new(
        id: String,
        family_id: String,
        father: String,
        mother: String,
        sex: Sex,
        phenotype: Phenotype,
    ) -> Self {
        Individual {
            id,
            family_id,
            father,
            mother,
            sex,
            phenotype,
        }
    }

    pub fn affected(&self) -> bool {
        self.phenotype == Phenotype::Affected
    }

    pub fn healthy(&self) -> bool {
        self.phenotype == Phenotype::Healthy
    }

    pub fn phenotype_unknown(&self) -> bool {
        self.phenotype == Phenotype::Unknown
    }

    pub fn is_male(&self) -> bool {
        self.sex == Sex::Male
    }

    pub fn is_female(&self) -> bool {
        self.sex == Sex::Female
    }

    /// True only when both parent ids are recorded
    pub fn has_parents(&self) -> bool {
        self.father != "0" && self.mother != "0"
    }
}

/// A family: individuals keyed by id, in file order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Family {
    pub family_id: String,
    pub individuals: BTreeMap<String, Individual>,
}

impl Family {
    pub fn new(family_id: String) -> Self {
        Family {
            family_id,
            individuals: BTreeMap::new(),
        }
    }

    pub fn add_individual(&mut self, individual: Individual) {
        self.individuals.insert(individual.id.clone(), individual);
    }

    /// Families of one member carry no pedigree structure
    pub fn is_single_individual(&self) -> bool {
        self.individuals.len() == 1
    }

    pub fn affected_individuals(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.values().filter(|ind| ind.affected())
    }
}

/// Parse a PED pedigree file into families.
///
/// Expects the standard six tab-separated columns: family id, individual id,
/// father id, mother id, sex, phenotype. Lines starting with `#` are skipped.
/// Handles gzip-compressed files transparently.
pub fn read_ped_file<P: AsRef<Path>>(path: P) -> MendelResult<Vec<Family>> {
    let file = File::open(&path)
        .map_err(|_| MendelError::FileNotFound(path.as_ref().to_string_lossy().to_string()))?;

    let reader: Box<dyn BufRead> = if is_gzipped(&path)? {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .from_reader(reader);

    let mut families: BTreeMap<String, Family> = BTreeMap::new();

    for result in csv_reader.records() {
        let record = result?;

        if record.len() < 6 {
            return Err(MendelError::InvalidPedigree(format!(
                "expected 6 columns, found {}",
                record.len()
            )));
        }

        let family_id = record[0].trim().to_string();
        let individual = Individual::new(
            record[1].trim().to_string(),
            family_id.clone(),
            record[2].trim().to_string(),
            record[3].trim().to_string(),
            Sex::from_code(record[4].trim())?,
            Phenotype::from_code(record[5].trim())?,
        );

        families
            .entry(family_id.clone())
            .or_insert_with(|| Family::new(family_id))
            .add_individual(individual);
    }

    if families.is_empty() {
        return Err(MendelError::InvalidPedigree(
            "pedigree file contains no individuals".to_string(),
        ));
    }

    log::info!(
        "Read {} famil{} from pedigree file",
        families.len(),
        if families.len() == 1 { "y" } else { "ies" }
    );

    Ok(families.into_values().collect())
}
