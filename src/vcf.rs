//! VCF file processing: reading variants with genotypes and writing the
//! annotated output

use crate::genotype::Genotype;
use crate::utils::is_gzipped;
use crate::variant::Variant;
use crate::{MendelError, MendelResult};
use flate2::read::MultiGzDecoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// INFO key carrying the annotated feature set (gene symbols)
const ANNOTATION_KEY: &str = "Annotation";
/// INFO flag marking a variant as exonic
const EXONIC_KEY: &str = "Exonic";

/// Variants and sample names read from one VCF file
#[derive(Debug, Clone)]
pub struct VcfContent {
    pub samples: Vec<String>,
    pub variants: Vec<Variant>,
}

/// Open a VCF file, transparently decompressing gzip input
fn open_vcf<P: AsRef<Path>>(path: P) -> MendelResult<Box<dyn BufRead>> {
    let file = File::open(&path)
        .map_err(|_| MendelError::FileNotFound(path.as_ref().to_string_lossy().to_string()))?;

    if is_gzipped(&path)? {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Sample names from a `#CHROM` header line (columns after FORMAT)
fn samples_from_header(header_line: &str) -> Vec<String> {
    let fields: Vec<&str> = header_line.trim().split('\t').collect();
    if fields.len() > 9 {
        fields[9..].iter().map(|s| s.to_string()).collect()
    } else {
        Vec::new()
    }
}

/// Parse one data line into a [`Variant`] with per-sample genotypes.
pub fn variant_from_line(line: &str, samples: &[String]) -> MendelResult<Variant> {
    let fields: Vec<&str> = line.split('\t').collect();

    if fields.len() < 8 {
        return Err(MendelError::InvalidVariant(format!(
            "not enough columns: {}",
            line
        )));
    }

    let pos = fields[1]
        .parse::<u32>()
        .map_err(|_| MendelError::InvalidVariant(format!("invalid position: {}", fields[1])))?;

    let mut variant = Variant::new(
        fields[0].to_string(),
        pos,
        fields[3].to_string(),
        fields[4].to_string(),
    );
    variant.filter = fields[6].to_string();

    // Feature annotation from the INFO column
    for entry in fields[7].split(';') {
        if let Some((key, value)) = entry.split_once('=') {
            if key == ANNOTATION_KEY {
                variant
                    .features
                    .extend(value.split(',').map(|s| s.to_string()));
            }
        } else if entry == EXONIC_KEY {
            variant.exonic = true;
        }
    }

    // Genotypes from the FORMAT and sample columns
    if fields.len() > 9 && !samples.is_empty() {
        let format_keys: Vec<&str> = fields[8].split(':').collect();
        let gt_index = format_keys.iter().position(|&key| key == "GT");
        let gq_index = format_keys.iter().position(|&key| key == "GQ");

        for (sample_index, sample) in samples.iter().enumerate() {
            let genotype = fields
                .get(9 + sample_index)
                .map(|column| {
                    let values: Vec<&str> = column.split(':').collect();
                    let call = gt_index.and_then(|i| values.get(i)).copied().unwrap_or("./.");
                    let quality = gq_index
                        .and_then(|i| values.get(i))
                        .and_then(|value| value.parse::<f64>().ok())
                        .unwrap_or(0.0);
                    Genotype::from_call_with_quality(call, quality)
                })
                .unwrap_or_default();
            variant.genotypes.insert(sample.clone(), genotype);
        }
    }

    Ok(variant)
}

/// Read a whole VCF file into memory, skipping malformed data lines with a
/// warning.
pub fn read_vcf<P: AsRef<Path>>(path: P) -> MendelResult<VcfContent> {
    let reader = open_vcf(&path)?;
    let mut samples = Vec::new();
    let mut variants = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end();

        if line.starts_with("##") || line.is_empty() {
            continue;
        }
        if line.starts_with('#') {
            samples = samples_from_header(line);
            continue;
        }

        match variant_from_line(line, &samples) {
            Ok(variant) => variants.push(variant),
            Err(e) => {
                log::warn!("Skipping invalid VCF record: {}", e);
            }
        }
    }

    log::info!(
        "Read {} variants and {} samples from VCF file",
        variants.len(),
        samples.len()
    );

    Ok(VcfContent { samples, variants })
}

/// The serialized annotation for one variant: the three INFO field values
fn info_entries(variant: &Variant) -> Vec<String> {
    let mut entries = Vec::new();

    let models: Vec<String> = variant
        .inheritance_models
        .iter()
        .filter(|(_, calls)| calls.any())
        .map(|(family_id, calls)| format!("{}:{}", family_id, calls.to_info_value()))
        .collect();
    if !models.is_empty() {
        entries.push(format!("GeneticModels={}", models.join(",")));
    }

    let scores: Vec<String> = variant
        .model_scores
        .iter()
        .map(|(family_id, score)| format!("{}:{}", family_id, score))
        .collect();
    if !scores.is_empty() {
        entries.push(format!("ModelScore={}", scores.join(",")));
    }

    let compounds: Vec<String> = variant
        .compounds
        .iter()
        .filter(|(_, partners)| !partners.is_empty())
        .map(|(family_id, partners)| {
            let joined: Vec<&str> = partners.iter().map(|p| p.as_str()).collect();
            format!("{}:{}", family_id, joined.join("|"))
        })
        .collect();
    if !compounds.is_empty() {
        entries.push(format!("Compounds={}", compounds.join(",")));
    }

    entries
}

/// Write the annotated VCF: stream the input file, add the three `##INFO`
/// header lines, and append each variant's annotation to its INFO column.
pub fn write_annotated_vcf<P: AsRef<Path>, Q: AsRef<Path>>(
    vcf_path: P,
    variants: &[Variant],
    output_path: Q,
) -> MendelResult<()> {
    let annotations: HashMap<String, Vec<String>> = variants
        .iter()
        .map(|variant| (variant.variant_id(), info_entries(variant)))
        .collect();

    let reader = open_vcf(&vcf_path)?;
    let mut output_file = File::create(output_path)?;
    let mut headers_added = false;

    for line in reader.lines() {
        let line = line?;

        if line.starts_with("#CHROM") {
            if !headers_added {
                write_info_headers(&mut output_file)?;
                headers_added = true;
            }
            writeln!(output_file, "{}", line)?;
            continue;
        }

        if line.starts_with("##INFO") {
            writeln!(output_file, "{}", line)?;
            if !headers_added {
                write_info_headers(&mut output_file)?;
                headers_added = true;
            }
            continue;
        }

        if line.starts_with('#') {
            writeln!(output_file, "{}", line)?;
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let mut columns: Vec<String> = line.split('\t').map(|s| s.to_string()).collect();
        if columns.len() < 8 {
            writeln!(output_file, "{}", line)?;
            continue;
        }

        let key = format!("{}_{}_{}_{}", columns[0], columns[1], columns[3], columns[4]);
        if let Some(entries) = annotations.get(&key) {
            if !entries.is_empty() {
                let addition = entries.join(";");
                if columns[7] == "." || columns[7].is_empty() {
                    columns[7] = addition;
                } else {
                    columns[7] = format!("{};{}", columns[7], addition);
                }
            }
        }

        writeln!(output_file, "{}", columns.join("\t"))?;
    }

    Ok(())
}

fn write_info_headers(output: &mut File) -> MendelResult<()> {
    writeln!(
        output,
        "##INFO=<ID=GeneticModels,Number=.,Type=String,Description=\"Inheritance models consistent with the pedigree, per family\">"
    )?;
    writeln!(
        output,
        "##INFO=<ID=ModelScore,Number=.,Type=Integer,Description=\"PHRED-scaled model confidence from genotype qualities, per family\">"
    )?;
    writeln!(
        output,
        "##INFO=<ID=Compounds,Number=.,Type=String,Description=\"Compound heterozygous partner variants, per family\">"
    )?;
    Ok(())
}
