extern crate lyrebird;
extern crate rust_htslib;

use lyrebird::model::byte_array_allele::ByteArrayAllele;
use lyrebird::model::variant_context::VariantContext;
use lyrebird::realignment::variant_support::SupportClassifier;
use lyrebird::test_utils::artificial_read_utils::ArtificialReadUtils;

fn allele(bases: &[u8], is_ref: bool) -> ByteArrayAllele {
    ByteArrayAllele::new(bases, is_ref).expect("Test allele must be valid")
}

fn variant_at(start: usize, reference: &[u8], alternates: &[&[u8]]) -> VariantContext {
    let mut alleles = vec![allele(reference, true)];
    for alt in alternates {
        alleles.push(allele(alt, false));
    }
    let end = start + reference.len() - 1;
    VariantContext::build(0, start, end, alleles)
}

fn default_classifier() -> SupportClassifier {
    SupportClassifier::new(SupportClassifier::DEFAULT_INDEL_START_TOLERANCE)
}

#[test]
fn test_substitution_exact_base_match() {
    let vc = variant_at(50, b"A", &[b"G"]);
    let classifier = default_classifier();

    // offset of reference position 50 in a read starting at 46 is 4
    let supporting = ArtificialReadUtils::create_artificial_read(
        "r3", 0, 46, b"AAAAGAAAAA", "10M", "SampleX",
    );
    assert!(classifier.supports_variant(&supporting, &vc));

    let mismatching = ArtificialReadUtils::create_artificial_read(
        "r4", 0, 46, b"AAAATAAAAA", "10M", "SampleX",
    );
    assert!(!classifier.supports_variant(&mismatching, &vc));
}

#[test]
fn test_mnp_requires_full_window() {
    let vc = variant_at(50, b"AC", &[b"GT"]);
    let classifier = default_classifier();

    let full_match = ArtificialReadUtils::create_artificial_read(
        "r", 0, 46, b"AAAAGTAAAA", "10M", "SampleX",
    );
    assert!(classifier.supports_variant(&full_match, &vc));

    let one_base_off = ArtificialReadUtils::create_artificial_read(
        "r", 0, 46, b"AAAAGCAAAA", "10M", "SampleX",
    );
    assert!(!classifier.supports_variant(&one_base_off, &vc));

    // read ends inside the allele window, so an exact match is impossible
    let truncated = ArtificialReadUtils::create_artificial_read(
        "r", 0, 46, b"AAAAG", "5M", "SampleX",
    );
    assert!(!classifier.supports_variant(&truncated, &vc));
}

#[test]
fn test_insertion_within_tolerance_supports() {
    // alternate one base longer than reference
    let vc = variant_at(100, b"A", &[b"AA"]);
    let classifier = default_classifier();

    // mapped offset of position 100 is 5; the insertion starts at read offset 8, distance 3
    let r1 = ArtificialReadUtils::create_artificial_read(
        "r1",
        0,
        95,
        &vec![b'A'; 20],
        "8M2I10M",
        "SampleX",
    );
    assert!(classifier.supports_variant(&r1, &vc));

    // insertion starts at read offset 25, distance 20
    let r2 = ArtificialReadUtils::create_artificial_read(
        "r2",
        0,
        95,
        &vec![b'A'; 37],
        "25M2I10M",
        "SampleX",
    );
    assert!(!classifier.supports_variant(&r2, &vc));
}

#[test]
fn test_indel_tolerance_boundary() {
    let vc = variant_at(100, b"A", &[b"AA"]);
    let classifier = default_classifier();

    // mapped offset 5; insertion at read offset 10 sits exactly at the tolerance
    let at_boundary = ArtificialReadUtils::create_artificial_read(
        "r",
        0,
        95,
        &vec![b'A'; 17],
        "10M2I5M",
        "SampleX",
    );
    assert!(classifier.supports_variant(&at_boundary, &vc));

    // one further and the operation no longer counts
    let past_boundary = ArtificialReadUtils::create_artificial_read(
        "r",
        0,
        95,
        &vec![b'A'; 18],
        "11M2I5M",
        "SampleX",
    );
    assert!(!classifier.supports_variant(&past_boundary, &vc));
}

#[test]
fn test_deletion_allele_matches_deletion_operator() {
    // alternate two bases shorter than reference
    let vc = variant_at(100, b"AAA", &[b"A"]);
    let classifier = default_classifier();

    let with_deletion = ArtificialReadUtils::create_artificial_read(
        "r",
        0,
        95,
        &vec![b'A'; 15],
        "6M2D9M",
        "SampleX",
    );
    assert!(classifier.supports_variant(&with_deletion, &vc));

    let gapless = ArtificialReadUtils::create_artificial_read(
        "r",
        0,
        95,
        &vec![b'A'; 15],
        "15M",
        "SampleX",
    );
    assert!(!classifier.supports_variant(&gapless, &vc));
}

#[test]
fn test_soft_clip_supports_either_indel_direction() {
    let classifier = default_classifier();

    // mapped offset of position 100 is 0; the clip starts at read offset 5
    let clipped = ArtificialReadUtils::create_artificial_read(
        "r",
        0,
        100,
        &vec![b'A'; 20],
        "5M15S",
        "SampleX",
    );

    let insertion_vc = variant_at(100, b"A", &[b"AA"]);
    assert!(classifier.supports_variant(&clipped, &insertion_vc));

    let deletion_vc = variant_at(100, b"AAA", &[b"A"]);
    assert!(classifier.supports_variant(&clipped, &deletion_vc));
}

#[test]
fn test_clipped_away_position_supports_nothing() {
    // variant position falls inside the leading soft clip, support is indeterminate
    let vc = variant_at(98, b"A", &[b"G"]);
    let classifier = default_classifier();

    let read = ArtificialReadUtils::create_artificial_read(
        "r", 0, 100, b"AGGGGGGGGG", "3S7M", "SampleX",
    );
    assert!(!classifier.supports_variant(&read, &vc));
}

#[test]
fn test_deletion_interior_position_supports_nothing() {
    // position 105 falls inside the 2D gap; even a matching base after the gap must not count
    let vc = variant_at(105, b"G", &[b"C"]);
    let classifier = default_classifier();

    let read = ArtificialReadUtils::create_artificial_read(
        "r", 0, 100, b"AAAAACCCCC", "5M2D5M", "SampleX",
    );
    assert!(!classifier.supports_variant(&read, &vc));
}

#[test]
fn test_later_alternate_allele_still_matches() {
    // only the second alternate matches the read
    let vc = variant_at(50, b"A", &[b"C", b"G"]);
    let classifier = default_classifier();

    let read = ArtificialReadUtils::create_artificial_read(
        "r", 0, 46, b"AAAAGAAAAA", "10M", "SampleX",
    );
    assert!(classifier.supports_variant(&read, &vc));
}

#[test]
fn test_zero_tolerance_requires_exact_start() {
    let vc = variant_at(100, b"A", &[b"AA"]);
    let classifier = SupportClassifier::new(0);

    // mapped offset 5, insertion starts at read offset 5
    let exact = ArtificialReadUtils::create_artificial_read(
        "r",
        0,
        95,
        &vec![b'A'; 12],
        "5M2I5M",
        "SampleX",
    );
    assert!(classifier.supports_variant(&exact, &vc));

    let off_by_one = ArtificialReadUtils::create_artificial_read(
        "r",
        0,
        95,
        &vec![b'A'; 13],
        "6M2I5M",
        "SampleX",
    );
    assert!(!classifier.supports_variant(&off_by_one, &vc));
}
