//! CLI binary for mendel-rs - annotates a VCF with inheritance models for
//! the families in a pedigree file

use clap::Parser;
use env_logger::Env;
use std::collections::HashSet;
use std::io::BufRead;
use std::path::PathBuf;

use mendel_rs::{
    annotate::{annotate_batches, validate_individuals},
    batch::build_batches,
    pedigree::read_ped_file,
    utils::{get_num_cpus, validate_file_readable, Timer},
    variant::InheritanceModel,
    vcf::{read_vcf, write_annotated_vcf},
    MendelError, MendelResult, ModelConfig,
};

#[derive(Parser)]
#[command(name = "mendel")]
#[command(about = "mendel - Mendelian inheritance model annotation for VCF files")]
#[command(long_about = "
mendel annotates the variants of a VCF file with the Mendelian inheritance
patterns each variant is consistent with, given a pedigree (PED) file
describing one or more families.

For every variant and family the tool checks autosomal dominant, autosomal
recessive, X-linked recessive and X-linked dominant models, detects compound
heterozygous pairs within shared gene annotations, decides whether each
pattern could be explained as de novo, and computes a confidence score from
the genotype qualities of the family members.

Three INFO fields are added to the output VCF:
- GeneticModels: family_id:model|model,... for every matching model
- ModelScore:    family_id:score, PHRED-scaled call confidence
- Compounds:     family_id:partner|partner, compound partner variant ids

Feature annotations are read from the 'Annotation' INFO key and exonic
status from the 'Exonic' INFO flag of the input VCF.
")]
struct Args {
    /// Path to the input VCF file
    #[arg(long, value_name = "FILE")]
    vcf: PathBuf,

    /// Path to the pedigree (PED) file
    #[arg(long, value_name = "FILE")]
    ped: PathBuf,

    /// Path to the output annotated VCF file
    #[arg(long, value_name = "FILE")]
    output: PathBuf,

    /// Genotype calls are phased; use haploblocks for compound pairs
    #[arg(long)]
    phased: bool,

    /// Treat missing genotype calls as model violations
    #[arg(long)]
    strict: bool,

    /// Consider intronic variants as compound candidates as well
    #[arg(long)]
    whole_gene: bool,

    /// File with reduced-penetrance gene symbols, one per line
    #[arg(long, value_name = "FILE")]
    reduced_penetrance: Option<PathBuf>,

    /// Number of worker threads for batch processing
    #[arg(long, default_value_t = get_num_cpus())]
    num_processes: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Force overwrite of output file if it exists
    #[arg(short, long)]
    force: bool,
}

/// Read a gene list file, one symbol per line, `#` comments allowed
fn read_gene_list(path: &PathBuf) -> MendelResult<HashSet<String>> {
    let file = std::fs::File::open(path)
        .map_err(|_| MendelError::FileNotFound(path.to_string_lossy().to_string()))?;

    let mut genes = HashSet::new();
    for line in std::io::BufReader::new(file).lines() {
        let line = line?;
        let gene = line.trim();
        if !gene.is_empty() && !gene.starts_with('#') {
            genes.insert(gene.to_string());
        }
    }
    Ok(genes)
}

fn run() -> MendelResult<()> {
    let args = Args::parse();

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_secs()
        .init();

    log::info!("Starting inheritance-model annotation");
    log::info!("Input VCF: {:?}", args.vcf);
    log::info!("Pedigree: {:?}", args.ped);
    log::info!("Output VCF: {:?}", args.output);
    log::info!("Number of processes: {}", args.num_processes);

    validate_file_readable(&args.vcf)?;
    validate_file_readable(&args.ped)?;

    if args.output.exists() && !args.force {
        return Err(MendelError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!(
                "Output file {:?} already exists. Use --force to overwrite.",
                args.output
            ),
        )));
    }

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if args.num_processes == 0 {
        return Err(MendelError::InvalidConfig(
            "num_processes must be at least 1".to_string(),
        ));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(args.num_processes)
        .build_global()
        .map_err(|e| MendelError::InvalidConfig(format!("thread pool: {}", e)))?;

    let reduced_penetrance_genes = match &args.reduced_penetrance {
        Some(path) => {
            validate_file_readable(path)?;
            let genes = read_gene_list(path)?;
            log::info!("Read {} reduced-penetrance genes", genes.len());
            genes
        }
        None => HashSet::new(),
    };

    let config = ModelConfig {
        phased: args.phased,
        strict: args.strict,
        whole_gene: args.whole_gene,
        reduced_penetrance_genes,
    };
    log::info!(
        "Configuration: phased={}, strict={}, whole_gene={}",
        config.phased,
        config.strict,
        config.whole_gene
    );

    let _timer = Timer::new("Reading pedigree");
    let families = read_ped_file(&args.ped)?;

    let _timer = Timer::new("Reading VCF variants");
    let content = read_vcf(&args.vcf)?;
    log::info!("Read {} variants from VCF file", content.variants.len());

    if content.variants.is_empty() {
        log::warn!("No variants found in the input VCF file");
        std::fs::copy(&args.vcf, &args.output)?;
        log::info!("Copied input VCF to output (no variants to annotate)");
        return Ok(());
    }

    // Fatal precondition: a partial pedigree would produce misleading calls
    validate_individuals(&families, &content.samples)?;

    let _timer = Timer::new("Annotating inheritance models");
    let batches = build_batches(content.variants);
    log::info!("Processing {} variant batches", batches.len());

    let mut annotated = annotate_batches(batches, &families, &config);

    // Restore positional order across batches
    annotated.sort_by(|a, b| (a.chrom.as_str(), a.pos).cmp(&(b.chrom.as_str(), b.pos)));

    let with_model = annotated
        .iter()
        .filter(|variant| variant.inheritance_models.values().any(|calls| calls.any()))
        .count();
    log::info!(
        "Annotation summary: {} of {} variants match at least one model",
        with_model,
        annotated.len()
    );
    for model in InheritanceModel::ALL {
        let count = annotated
            .iter()
            .filter(|variant| {
                variant
                    .inheritance_models
                    .values()
                    .any(|calls| calls.get(model))
            })
            .count();
        if count > 0 {
            log::info!("  {}: {} variants", model, count);
        }
    }

    let _timer = Timer::new("Writing annotated VCF");
    write_annotated_vcf(&args.vcf, &annotated, &args.output)?;

    log::info!("Annotation completed successfully");
    log::info!("Annotated VCF written to: {:?}", args.output);

    Ok(())
}

/// Handle application errors and provide user-friendly messages
fn handle_error(error: MendelError) -> ! {
    match error {
        MendelError::FileNotFound(path) => {
            eprintln!("Error: File not found: {}", path);
            eprintln!("Please check that the file exists and is readable.");
        }
        MendelError::InvalidVariant(msg) => {
            eprintln!("Error: Invalid variant data: {}", msg);
            eprintln!("Please check that your VCF file is properly formatted.");
        }
        MendelError::InvalidPedigree(msg) => {
            eprintln!("Error: Invalid pedigree data: {}", msg);
            eprintln!("Please check that your PED file has six tab-separated columns.");
        }
        MendelError::SampleMismatch(id) => {
            eprintln!("Error: Pedigree individual '{}' has no VCF sample column.", id);
            eprintln!("Every individual in the PED file must be genotyped in the VCF.");
        }
        MendelError::UnknownModel(name) => {
            eprintln!("Error: Unknown inheritance model requested: {}", name);
            eprintln!("This is a bug. Please report this issue.");
        }
        MendelError::InvalidConfig(msg) => {
            eprintln!("Error: Invalid configuration: {}", msg);
        }
        MendelError::Io(ref e) => {
            eprintln!("Error: I/O error: {}", e);
            eprintln!("Please check file permissions and disk space.");
        }
        MendelError::Csv(ref e) => {
            eprintln!("Error: Data processing error: {}", e);
            eprintln!("Please check that your PED file is properly formatted.");
        }
    }
    std::process::exit(1);
}

fn main() {
    if let Err(e) = run() {
        handle_error(e);
    }
}
