use rust_htslib::bam::record::{Cigar, CigarStringView};

pub struct CigarUtils {}

impl CigarUtils {
    pub fn cigar_consumes_read_bases(cig: &Cigar) -> bool {
        matches!(
            cig,
            Cigar::Match(_)
                | Cigar::Equal(_)
                | Cigar::Diff(_)
                | Cigar::Ins(_)
                | Cigar::SoftClip(_)
        )
    }

    pub fn cigar_consumes_reference_bases(cig: &Cigar) -> bool {
        matches!(
            cig,
            Cigar::Match(_)
                | Cigar::Equal(_)
                | Cigar::Diff(_)
                | Cigar::Del(_)
                | Cigar::RefSkip(_)
        )
    }

    pub fn cigar_is_soft_clip(cig: &Cigar) -> bool {
        matches!(cig, Cigar::SoftClip(_))
    }

    pub fn cigar_is_clip(cig: &Cigar) -> bool {
        matches!(cig, Cigar::SoftClip(_) | Cigar::HardClip(_))
    }

    /// Deletions and reference skips leave no read base under the reference
    /// coordinate they span.
    pub fn cigar_is_gap_on_read(cig: &Cigar) -> bool {
        matches!(cig, Cigar::Del(_) | Cigar::RefSkip(_))
    }

    /**
     * Number of reference bases spanned by the aligned portion of a cigar,
     * i.e. the distance from the alignment start to the alignment end.
     */
    pub fn get_reference_length(cigar: &CigarStringView) -> u32 {
        cigar
            .iter()
            .filter(|cig| Self::cigar_consumes_reference_bases(cig))
            .map(|cig| cig.len())
            .sum()
    }

    /**
     * Number of read bases accounted for by a cigar, including soft clips.
     */
    pub fn get_read_length(cigar: &CigarStringView) -> u32 {
        cigar
            .iter()
            .filter(|cig| Self::cigar_consumes_read_bases(cig))
            .map(|cig| cig.len())
            .sum()
    }
}
