use std::cmp::min;

use rust_htslib::bam::record::Cigar;

use crate::model::variant_context::VariantContext;
use crate::reads::cigar_utils::CigarUtils;
use crate::reads::lyre_read::LyreRead;
use crate::reads::read_utils::{ClippingTail, ReadUtils};

/**
 * Decides whether a read's bases and cigar are consistent with supporting at least one alternate
 * allele of a variant.
 *
 * Substitutions require the allele bases to match the read bases at the mapped offset exactly.
 * Indels are matched by operator type within a tolerance window of the mapped offset, because
 * equivalent indel alignments do not share a unique representation; soft clips count as possible
 * evidence for either indel direction since clipping can hide either representation.  A true
 * result therefore means "plausible support", not proof.
 */
#[derive(Debug, Clone)]
pub struct SupportClassifier {
    indel_start_tolerance: i64,
}

impl SupportClassifier {
    pub const DEFAULT_INDEL_START_TOLERANCE: i64 = 5;

    pub fn new(indel_start_tolerance: i64) -> SupportClassifier {
        assert!(
            indel_start_tolerance >= 0,
            "indel start tolerance must be >= 0, got {}",
            indel_start_tolerance
        );
        SupportClassifier {
            indel_start_tolerance,
        }
    }

    pub fn supports_variant(&self, read: &LyreRead, vc: &VariantContext) -> bool {
        let read_bases = read.seq();

        let (variant_position_in_read, inside_deletion) =
            ReadUtils::get_read_coordinate_for_reference_coordinate_from_read(
                read,
                vc.get_start() as i64,
                ClippingTail::RightTail,
                true,
            );
        let variant_position_in_read = match variant_position_in_read {
            // support cannot be determined for clipped-away or gap-interior positions
            None => return false,
            Some(_) if inside_deletion => return false,
            Some(pos) => pos,
        };

        let reference_length = vc.get_reference().len();
        for allele in vc.get_alternate_alleles() {
            if allele.len() == reference_length {
                // SNP or MNP: check whether the read bases match the allele bases exactly
                let window_end = min(variant_position_in_read + allele.len(), read_bases.len());
                if allele.bases_match(&read_bases[variant_position_in_read..window_end]) {
                    return true;
                }
            } else {
                // indel: look for the right cigar operator near the position rather than an
                // exact offset, since indel representation is non-unique
                let is_deletion = allele.len() < reference_length;
                let mut read_position = 0i64;
                for element in read.read.cigar().iter() {
                    if (read_position - variant_position_in_read as i64).abs()
                        <= self.indel_start_tolerance
                        && ((is_deletion && Self::might_support_deletion(element))
                            || (!is_deletion && Self::might_support_insertion(element)))
                    {
                        return true;
                    }
                    read_position += if CigarUtils::cigar_consumes_read_bases(element) {
                        element.len() as i64
                    } else {
                        0
                    };
                }
            }
        }

        false
    }

    fn might_support_deletion(element: &Cigar) -> bool {
        matches!(element, Cigar::Del(_) | Cigar::SoftClip(_))
    }

    fn might_support_insertion(element: &Cigar) -> bool {
        matches!(element, Cigar::Ins(_) | Cigar::SoftClip(_))
    }
}
