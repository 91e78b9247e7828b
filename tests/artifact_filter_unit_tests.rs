extern crate lyrebird;
extern crate rust_htslib;

use std::collections::HashMap;

use lyrebird::genotype::genotype_builder::{Genotype, GenotypesContext};
use lyrebird::model::byte_array_allele::ByteArrayAllele;
use lyrebird::model::variant_context::VariantContext;
use lyrebird::realignment::artifact_filter::{
    ArtifactThreshold, RealignmentArtifactFilter, Verdict,
};
use lyrebird::realignment::realigner::{Realigner, RealignmentOutcome};
use lyrebird::realignment::variant_support::SupportClassifier;
use lyrebird::reads::lyre_read::LyreRead;
use lyrebird::test_utils::artificial_read_utils::ArtificialReadUtils;
use lyrebird::utils::errors::LyrebirdError;
use lyrebird::utils::vcf_constants::VCFConstants;

/// Deterministic realigner: outcomes are looked up by read name, defaulting to a confident
/// placement.
struct TableRealigner {
    by_name: HashMap<String, RealignmentOutcome>,
}

impl TableRealigner {
    fn new(entries: &[(&str, RealignmentOutcome)]) -> TableRealigner {
        TableRealigner {
            by_name: entries
                .iter()
                .map(|(name, outcome)| (name.to_string(), *outcome))
                .collect(),
        }
    }
}

impl Realigner for TableRealigner {
    fn realign(&self, read: &LyreRead) -> Result<RealignmentOutcome, LyrebirdError> {
        let name = String::from_utf8_lossy(read.name()).to_string();
        Ok(*self
            .by_name
            .get(&name)
            .unwrap_or(&RealignmentOutcome::ConfidentAtOriginalLocus))
    }
}

/// A realigner whose invocation always fails, as opposed to returning a Failed outcome.
struct BrokenRealigner {}

impl Realigner for BrokenRealigner {
    fn realign(&self, _read: &LyreRead) -> Result<RealignmentOutcome, LyrebirdError> {
        Err(LyrebirdError::RealignmentInvocation(
            "stub invocation failure".to_string(),
        ))
    }
}

fn allele(bases: &[u8], is_ref: bool) -> ByteArrayAllele {
    ByteArrayAllele::new(bases, is_ref).expect("Test allele must be valid")
}

/// A het A>G snp at position 50 called in `sample`.
fn het_snp_variant(sample: &str) -> VariantContext {
    let reference = allele(b"A", true);
    let alternate = allele(b"G", false);
    let mut vc = VariantContext::build(0, 50, 50, vec![reference.clone(), alternate.clone()]);
    vc.add_genotypes(GenotypesContext::new(vec![Genotype::build_from_alleles(
        vec![reference, alternate],
        sample.to_string(),
    )]));
    vc
}

fn hom_ref_variant(sample: &str) -> VariantContext {
    let reference = allele(b"A", true);
    let alternate = allele(b"G", false);
    let mut vc = VariantContext::build(0, 50, 50, vec![reference.clone(), alternate]);
    vc.add_genotypes(GenotypesContext::new(vec![Genotype::build_from_alleles(
        vec![reference.clone(), reference],
        sample.to_string(),
    )]));
    vc
}

/// Reads placed so position 50 maps to read offset 4; `alt_base` at that offset.
fn read_with_base(name: &str, alt_base: u8, sample: &str) -> LyreRead {
    let mut bases = vec![b'A'; 10];
    bases[4] = alt_base;
    ArtificialReadUtils::create_artificial_read(name, 0, 46, &bases, "10M", sample)
}

fn pipeline<R: Realigner>(
    realigner: R,
    threshold: ArtifactThreshold,
) -> RealignmentArtifactFilter<R> {
    RealignmentArtifactFilter::new(
        SupportClassifier::new(SupportClassifier::DEFAULT_INDEL_START_TOLERANCE),
        realigner,
        threshold,
    )
    .expect("Threshold must validate")
}

#[test]
fn test_variant_without_alternates_passes_through_unchanged() {
    let vc = VariantContext::build(0, 50, 50, vec![allele(b"A", true)]);
    let mut filter = pipeline(TableRealigner::new(&[]), ArtifactThreshold::Count(1));
    filter.start();

    let (output, verdict) = filter
        .process_variant(&vc, &[read_with_base("r1", b'G', "SampleX")])
        .expect("Processing must succeed");

    assert_eq!(output, vc);
    assert_eq!(verdict.verdict, Verdict::Pass);
    assert_eq!(verdict.tally.supporting(), 0);
}

#[test]
fn test_discordant_count_threshold_decides_verdict() {
    let vc = het_snp_variant("SampleX");
    let reads: Vec<LyreRead> = ["r1", "r2", "r3", "r4"]
        .iter()
        .map(|name| read_with_base(name, b'G', "SampleX"))
        .collect();
    let outcomes = [
        ("r1", RealignmentOutcome::Discordant),
        ("r2", RealignmentOutcome::Discordant),
        ("r3", RealignmentOutcome::Discordant),
        ("r4", RealignmentOutcome::ConfidentAtOriginalLocus),
    ];

    let mut strict = pipeline(TableRealigner::new(&outcomes), ArtifactThreshold::Count(2));
    strict.start();
    let (output, verdict) = strict
        .process_variant(&vc, &reads)
        .expect("Processing must succeed");
    assert_eq!(verdict.verdict, Verdict::AlignmentArtifact);
    assert_eq!(verdict.tally.discordant, 3);
    assert_eq!(verdict.tally.confident, 1);
    assert!(output
        .filters
        .contains(VCFConstants::ALIGNMENT_ARTIFACT_FILTER_NAME));

    let mut lenient = pipeline(TableRealigner::new(&outcomes), ArtifactThreshold::Count(4));
    lenient.start();
    let (output, verdict) = lenient
        .process_variant(&vc, &reads)
        .expect("Processing must succeed");
    assert_eq!(verdict.verdict, Verdict::Pass);
    assert!(!output.is_filtered());
}

#[test]
fn test_fraction_threshold_decides_verdict() {
    let vc = het_snp_variant("SampleX");
    let reads: Vec<LyreRead> = ["r1", "r2", "r3", "r4"]
        .iter()
        .map(|name| read_with_base(name, b'G', "SampleX"))
        .collect();
    let outcomes = [
        ("r1", RealignmentOutcome::Discordant),
        ("r2", RealignmentOutcome::Ambiguous),
    ];

    let mut at_half = pipeline(
        TableRealigner::new(&outcomes),
        ArtifactThreshold::Fraction(0.5),
    );
    at_half.start();
    let (_, verdict) = at_half
        .process_variant(&vc, &reads)
        .expect("Processing must succeed");
    // 2 of 4 supporting reads are non-confident, exactly meeting the fraction
    assert_eq!(verdict.verdict, Verdict::AlignmentArtifact);

    let mut above_half = pipeline(
        TableRealigner::new(&outcomes),
        ArtifactThreshold::Fraction(0.75),
    );
    above_half.start();
    let (_, verdict) = above_half
        .process_variant(&vc, &reads)
        .expect("Processing must succeed");
    assert_eq!(verdict.verdict, Verdict::Pass);
}

#[test]
fn test_hom_ref_samples_are_excluded() {
    let vc = hom_ref_variant("SampleX");
    // every read would be discordant if it were ever realigned
    let reads: Vec<LyreRead> = ["r1", "r2"]
        .iter()
        .map(|name| read_with_base(name, b'G', "SampleX"))
        .collect();
    let mut filter = pipeline(
        TableRealigner::new(&[
            ("r1", RealignmentOutcome::Discordant),
            ("r2", RealignmentOutcome::Discordant),
        ]),
        ArtifactThreshold::Count(1),
    );
    filter.start();

    let (_, verdict) = filter
        .process_variant(&vc, &reads)
        .expect("Processing must succeed");

    assert_eq!(verdict.verdict, Verdict::Pass);
    assert_eq!(verdict.tally.supporting(), 0);
}

#[test]
fn test_reads_from_other_samples_are_excluded() {
    let vc = het_snp_variant("SampleX");
    let reads = vec![
        read_with_base("r1", b'G', "SampleY"),
        read_with_base("r2", b'G', "SampleY"),
    ];
    let mut filter = pipeline(
        TableRealigner::new(&[
            ("r1", RealignmentOutcome::Discordant),
            ("r2", RealignmentOutcome::Discordant),
        ]),
        ArtifactThreshold::Count(1),
    );
    filter.start();

    let (_, verdict) = filter
        .process_variant(&vc, &reads)
        .expect("Processing must succeed");

    assert_eq!(verdict.verdict, Verdict::Pass);
    assert_eq!(verdict.tally.supporting(), 0);
}

#[test]
fn test_no_supporting_reads_passes() {
    let vc = het_snp_variant("SampleX");
    // right sample, wrong base: classified as non-supporting
    let reads = vec![read_with_base("r1", b'T', "SampleX")];
    let mut filter = pipeline(
        TableRealigner::new(&[("r1", RealignmentOutcome::Discordant)]),
        ArtifactThreshold::Count(1),
    );
    filter.start();

    let (_, verdict) = filter
        .process_variant(&vc, &reads)
        .expect("Processing must succeed");

    assert_eq!(verdict.verdict, Verdict::Pass);
    assert_eq!(verdict.tally.supporting(), 0);
}

#[test]
fn test_realigner_invocation_failure_propagates() {
    let vc = het_snp_variant("SampleX");
    let reads = vec![read_with_base("r1", b'G', "SampleX")];
    let mut filter = pipeline(BrokenRealigner {}, ArtifactThreshold::Count(1));
    filter.start();

    let result = filter.process_variant(&vc, &reads);
    assert!(matches!(
        result,
        Err(LyrebirdError::RealignmentInvocation(_))
    ));
}

#[test]
fn test_threshold_validation() {
    assert!(ArtifactThreshold::Count(0).validate().is_err());
    assert!(ArtifactThreshold::Count(1).validate().is_ok());
    assert!(ArtifactThreshold::Fraction(0.0).validate().is_err());
    assert!(ArtifactThreshold::Fraction(1.5).validate().is_err());
    assert!(ArtifactThreshold::Fraction(1.0).validate().is_ok());
}

#[test]
fn test_pipeline_is_deterministic() {
    let variants = vec![
        het_snp_variant("SampleX"),
        VariantContext::build(0, 60, 60, vec![allele(b"A", true)]),
    ];
    let reads: Vec<LyreRead> = ["r1", "r2", "r3"]
        .iter()
        .map(|name| read_with_base(name, b'G', "SampleX"))
        .collect();
    let outcomes = [
        ("r1", RealignmentOutcome::Discordant),
        ("r2", RealignmentOutcome::ConfidentAtOriginalLocus),
        ("r3", RealignmentOutcome::Failed),
    ];

    let run = || {
        let mut filter =
            pipeline(TableRealigner::new(&outcomes), ArtifactThreshold::Count(2));
        filter.start();
        let results: Vec<_> = variants
            .iter()
            .map(|vc| {
                filter
                    .process_variant(vc, &reads)
                    .expect("Processing must succeed")
            })
            .collect();
        filter.finish();
        results
    };

    let first = run();
    let second = run();
    assert_eq!(first, second);
    assert_eq!(first[0].1.verdict, Verdict::AlignmentArtifact);
    assert_eq!(first[1].1.verdict, Verdict::Pass);
}
