use std::cmp::max;
use std::collections::HashMap;
use std::path::PathBuf;

use indicatif::ProgressBar;
use itertools::Itertools;
use rust_htslib::bam::record::Aux;
use rust_htslib::bam::{self, Read as BamRead};
use rust_htslib::bcf::{self, Read as BcfRead};

use crate::genotype::genotype_builder::{Genotype, GenotypesContext};
use crate::model::byte_array_allele::ByteArrayAllele;
use crate::model::variant_context::VariantContext;
use crate::reads::lyre_read::LyreRead;
use crate::realignment::artifact_filter::{
    ArtifactThreshold, RealignmentArtifactFilter, RealignmentTally,
};
use crate::realignment::bwa_realigner::BwaRealigner;
use crate::realignment::realigner::RealignmentConfig;
use crate::realignment::variant_support::SupportClassifier;
use crate::utils::errors::LyrebirdError;
use crate::utils::vcf_constants::VCFConstants;

/**
 * Resolved configuration for one filtering run.
 */
#[derive(Debug, Clone)]
pub struct FilterParams {
    pub vcf_path: String,
    pub bam_path: String,
    pub output_path: String,
    pub index_path: PathBuf,
    pub indel_start_tolerance: i64,
    pub min_realignment_mapq: u8,
    pub locus_shift_tolerance: i64,
    pub threshold: ArtifactThreshold,
}

impl FilterParams {
    pub fn from_matches(m: &clap::ArgMatches) -> Result<FilterParams, LyrebirdError> {
        let indel_start_tolerance = Self::parse_number::<i64>(m, "indel-start-tolerance")?;
        if indel_start_tolerance < 0 {
            return Err(LyrebirdError::InvalidConfiguration(format!(
                "--indel-start-tolerance must be >= 0, got {}",
                indel_start_tolerance
            )));
        }

        let threshold = if m.is_present("discordant-fraction") {
            ArtifactThreshold::Fraction(Self::parse_number::<f64>(m, "discordant-fraction")?)
        } else {
            ArtifactThreshold::Count(Self::parse_number::<usize>(m, "min-discordant-reads")?)
        };
        threshold.validate()?;

        Ok(FilterParams {
            vcf_path: m.value_of("vcf").unwrap().to_string(),
            bam_path: m.value_of("bam").unwrap().to_string(),
            output_path: m.value_of("output").unwrap().to_string(),
            index_path: PathBuf::from(m.value_of("realignment-index").unwrap()),
            indel_start_tolerance,
            min_realignment_mapq: Self::parse_number::<u8>(m, "min-realignment-mapq")?,
            locus_shift_tolerance: Self::parse_number::<i64>(m, "locus-shift-tolerance")?,
            threshold,
        })
    }

    fn parse_number<T: std::str::FromStr>(
        m: &clap::ArgMatches,
        name: &str,
    ) -> Result<T, LyrebirdError> {
        let raw = m.value_of(name).unwrap();
        raw.parse::<T>().map_err(|_| {
            LyrebirdError::InvalidConfiguration(format!("--{} got unparseable value {}", name, raw))
        })
    }
}

/**
 * The driver loop: reads the sorted callset, fetches overlapping reads per variant, runs the
 * artifact-filter pipeline, and writes one annotated record per input record in input order.
 */
pub fn run_filter(m: &clap::ArgMatches) -> Result<(), LyrebirdError> {
    let params = FilterParams::from_matches(m)?;
    info!(
        "Filtering alignment artifacts: callset {}, reads {}, realignment index {:?}",
        params.vcf_path, params.bam_path, params.index_path
    );

    let mut vcf_reader = bcf::Reader::from_path(&params.vcf_path)
        .map_err(|e| LyrebirdError::VcfIo(format!("Could not open {}: {}", params.vcf_path, e)))?;
    let sample_names: Vec<String> = vcf_reader
        .header()
        .samples()
        .iter()
        .map(|s| String::from_utf8_lossy(s).to_string())
        .collect();

    let mut output_header = bcf::Header::from_template(vcf_reader.header());
    output_header.push_record(
        format!(
            "##FILTER=<ID={},Description=\"{}\">",
            VCFConstants::ALIGNMENT_ARTIFACT_FILTER_NAME,
            VCFConstants::ALIGNMENT_ARTIFACT_FILTER_DESCRIPTION
        )
        .as_bytes(),
    );
    let bcf_output = params.output_path.ends_with(".bcf");
    let uncompressed = !bcf_output && !params.output_path.ends_with(".gz");
    let format = if bcf_output {
        bcf::Format::Bcf
    } else {
        bcf::Format::Vcf
    };
    let mut vcf_writer = bcf::Writer::from_path(
        &params.output_path,
        &output_header,
        uncompressed,
        format,
    )
    .map_err(|e| {
        LyrebirdError::VcfIo(format!("Could not open {}: {}", params.output_path, e))
    })?;

    let mut bam_reader = bam::IndexedReader::from_path(&params.bam_path)
        .map_err(|e| LyrebirdError::BamIo(format!("Could not open {}: {}", params.bam_path, e)))?;
    let target_names: Vec<String> = bam_reader
        .header()
        .target_names()
        .iter()
        .map(|name| String::from_utf8_lossy(name).to_string())
        .collect();
    let tid_by_contig: HashMap<String, u32> = target_names
        .iter()
        .enumerate()
        .map(|(tid, name)| (name.clone(), tid as u32))
        .collect();
    let sample_by_read_group = read_group_sample_map(bam_reader.header());
    warn_on_unmatched_samples(&sample_names, &sample_by_read_group);

    // the realigner must come up before the first variant so a bad index aborts cleanly
    let realigner = BwaRealigner::new(
        &RealignmentConfig {
            index_path: params.index_path.clone(),
            min_mapping_quality: params.min_realignment_mapq,
            locus_shift_tolerance: params.locus_shift_tolerance,
        },
        target_names.clone(),
    )?;
    let mut pipeline = RealignmentArtifactFilter::new(
        SupportClassifier::new(params.indel_start_tolerance),
        realigner,
        params.threshold,
    )?;
    pipeline.start();

    let progress = ProgressBar::new_spinner();
    let mut run_tally = RealignmentTally::new();

    for result in vcf_reader.records() {
        let mut record = result
            .map_err(|e| LyrebirdError::VcfIo(format!("Failed to read VCF record: {}", e)))?;

        let vc = variant_context_from_record(&record, &sample_names, &tid_by_contig)?;
        let reads = fetch_overlapping_reads(
            &mut bam_reader,
            &vc,
            &sample_by_read_group,
        )?;

        let (_, verdict) = pipeline.process_variant(&vc, &reads)?;
        run_tally.confident += verdict.tally.confident;
        run_tally.discordant += verdict.tally.discordant;
        run_tally.ambiguous += verdict.tally.ambiguous;
        run_tally.failed += verdict.tally.failed;

        vcf_writer.translate(&mut record);
        if verdict.is_filtered() {
            record
                .push_filter(VCFConstants::ALIGNMENT_ARTIFACT_FILTER_NAME.as_bytes())
                .map_err(|e| {
                    LyrebirdError::VcfIo(format!("Could not set FILTER field: {}", e))
                })?;
        }
        vcf_writer
            .write(&record)
            .map_err(|e| LyrebirdError::VcfIo(format!("Failed to write output record: {}", e)))?;

        progress.inc(1);
        progress.set_message(format!("{} variants processed", pipeline.variants_seen()));
    }

    progress.finish_and_clear();
    pipeline.finish();
    info!(
        "Realignment outcomes: {} confident, {} discordant, {} ambiguous, {} failed",
        run_tally.confident, run_tally.discordant, run_tally.ambiguous, run_tally.failed
    );

    Ok(())
}

/**
 * Build the internal variant representation from one VCF record.  The locus is expressed in the
 * bam's tid space so variants and reads agree on contig identity; a callset contig missing from
 * the bam header is malformed input, not an empty result.
 */
pub fn variant_context_from_record(
    record: &bcf::Record,
    sample_names: &[String],
    tid_by_contig: &HashMap<String, u32>,
) -> Result<VariantContext, LyrebirdError> {
    let rid = record
        .rid()
        .ok_or_else(|| LyrebirdError::MalformedVariant("record has no contig".to_string()))?;
    let contig = record
        .header()
        .rid2name(rid)
        .map_err(|e| LyrebirdError::MalformedVariant(format!("unresolvable contig id: {}", e)))?;
    let contig = String::from_utf8_lossy(contig).to_string();
    let start = record.pos() as usize;

    let raw_alleles = record.alleles();
    if raw_alleles.is_empty() {
        return Err(LyrebirdError::MalformedVariant(format!(
            "{}:{} carries no alleles",
            contig,
            start + 1
        )));
    }
    let alleles = raw_alleles
        .iter()
        .enumerate()
        .map(|(i, bases)| ByteArrayAllele::new(bases, i == 0))
        .collect::<Result<Vec<ByteArrayAllele>, LyrebirdError>>()
        .map_err(|e| match e {
            LyrebirdError::MalformedVariant(msg) => {
                LyrebirdError::MalformedVariant(format!("{}:{}: {}", contig, start + 1, msg))
            }
            other => other,
        })?;

    let tid = *tid_by_contig.get(&contig).ok_or_else(|| {
        LyrebirdError::MalformedVariant(format!(
            "contig {} of the callset is absent from the bam header",
            contig
        ))
    })?;

    let end = start + max(alleles[0].len(), 1) - 1;
    let mut vc = VariantContext::build(tid as usize, start, end, alleles);
    vc.add_source(contig.clone());
    vc.add_genotypes(genotypes_from_record(record, &vc, sample_names, &contig)?);
    Ok(vc)
}

fn genotypes_from_record(
    record: &bcf::Record,
    vc: &VariantContext,
    sample_names: &[String],
    contig: &str,
) -> Result<GenotypesContext, LyrebirdError> {
    if sample_names.is_empty() {
        return Ok(GenotypesContext::empty());
    }

    let genotypes = record.genotypes().map_err(|e| {
        LyrebirdError::MalformedVariant(format!(
            "{}:{} has unreadable genotypes: {}",
            contig,
            vc.get_start() + 1,
            e
        ))
    })?;

    let mut context = GenotypesContext::create(sample_names.len());
    for (sample_index, sample_name) in sample_names.iter().enumerate() {
        let genotype = genotypes.get(sample_index);
        let mut called = Vec::with_capacity(genotype.len());
        for genotype_allele in genotype.iter() {
            if let Some(allele_index) = genotype_allele.index() {
                let allele =
                    vc.alleles
                        .get(allele_index as usize)
                        .cloned()
                        .ok_or_else(|| {
                            LyrebirdError::MalformedVariant(format!(
                                "{}:{} genotype of {} names allele {} but only {} exist",
                                contig,
                                vc.get_start() + 1,
                                sample_name,
                                allele_index,
                                vc.get_n_alleles()
                            ))
                        })?;
                called.push(allele);
            }
        }
        context.add(Genotype::build_from_alleles(called, sample_name.clone()));
    }
    Ok(context)
}

/**
 * All primary, mapped, non-duplicate reads overlapping the variant's reference span, tagged with
 * their read group's sample name.  Reads whose group cannot be resolved keep an empty sample name
 * and so never enter support evaluation.
 */
pub fn fetch_overlapping_reads(
    bam_reader: &mut bam::IndexedReader,
    vc: &VariantContext,
    sample_by_read_group: &HashMap<String, String>,
) -> Result<Vec<LyreRead>, LyrebirdError> {
    let fetch_start = vc.get_start() as i64;
    let fetch_end = vc.get_end() as i64 + 1;
    bam_reader
        .fetch((vc.loc.get_contig() as i32, fetch_start, fetch_end))
        .map_err(|e| {
            LyrebirdError::BamIo(format!(
                "Failed to fetch reads for {}:{}: {}",
                vc.source,
                vc.get_start() + 1,
                e
            ))
        })?;

    let mut reads = Vec::new();
    for result in bam_reader.records() {
        let record = result.map_err(|e| {
            LyrebirdError::BamIo(format!(
                "Corrupt read record near {}:{}: {}",
                vc.source,
                vc.get_start() + 1,
                e
            ))
        })?;
        if record.is_unmapped()
            || record.is_secondary()
            || record.is_supplementary()
            || record.is_duplicate()
            || record.is_quality_check_failed()
        {
            continue;
        }
        let sample = match record.aux(b"RG") {
            Ok(Aux::String(read_group)) => sample_by_read_group
                .get(read_group)
                .cloned()
                .unwrap_or_default(),
            _ => String::new(),
        };
        reads.push(LyreRead::new(record, sample));
    }
    Ok(reads)
}

fn read_group_sample_map(header_view: &bam::HeaderView) -> HashMap<String, String> {
    let header = bam::Header::from_template(header_view);
    let mut samples = HashMap::new();
    for (key, records) in header.to_hashmap() {
        if key != "RG" {
            continue;
        }
        for record in records {
            if let (Some(id), Some(sample)) = (record.get("ID"), record.get("SM")) {
                samples.insert(id.clone(), sample.clone());
            }
        }
    }
    samples
}

fn warn_on_unmatched_samples(
    sample_names: &[String],
    sample_by_read_group: &HashMap<String, String>,
) {
    let missing: Vec<&String> = sample_names
        .iter()
        .filter(|name| !sample_by_read_group.values().any(|sample| &sample == name))
        .collect();
    if !missing.is_empty() {
        warn!(
            "Callset samples with no read group in the bam: {}; their variants cannot gather \
             read support",
            missing.iter().join(", ")
        );
    }
}
