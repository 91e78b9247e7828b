use rust_htslib::bam::record::{Cigar, CigarStringView};

use crate::reads::cigar_utils::CigarUtils;
use crate::reads::lyre_read::LyreRead;

/// Which side of a reference gap (deletion or skip) a resolved read
/// coordinate should fall on when the requested position has no read base
/// directly under it.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ClippingTail {
    LeftTail,
    RightTail,
}

pub struct ReadUtils {}

impl ReadUtils {
    /**
     * Find the 0-based index within a read base array corresponding to a given position in the
     * reference, along with the cigar element containing that position.  The alignment start must
     * be the soft start of the read, so leading soft clips are treated as if they aligned to the
     * reference bases preceding the first aligned base.
     *
     * @param alignment_start       the soft start of the read on the reference
     * @param cigar                 the read's cigar
     * @param ref_coord             the target reference coordinate
     * @return                      (None, None) if the reference coordinate occurs before the read
     *                              start or after the read end; otherwise the read coordinate and
     *                              the containing element.  If the reference coordinate falls
     *                              within a deletion or skip, the returned read coordinate is the
     *                              first one after the gap.
     */
    pub fn get_read_index_for_reference_coordinate(
        alignment_start: i64,
        cigar: &CigarStringView,
        ref_coord: i64,
    ) -> (Option<usize>, Option<Cigar>) {
        if ref_coord < alignment_start {
            return (None, None);
        }

        let mut last_read_pos_of_element = 0usize;
        let mut last_ref_pos_of_element = alignment_start;

        for cig in cigar.iter() {
            let first_read_pos_of_element = last_read_pos_of_element;
            let first_ref_pos_of_element = last_ref_pos_of_element;
            last_read_pos_of_element += if CigarUtils::cigar_consumes_read_bases(cig) {
                cig.len() as usize
            } else {
                0
            };
            last_ref_pos_of_element += if CigarUtils::cigar_consumes_reference_bases(cig)
                || CigarUtils::cigar_is_soft_clip(cig)
            {
                cig.len() as i64
            } else {
                0
            };

            if first_ref_pos_of_element <= ref_coord && ref_coord < last_ref_pos_of_element {
                let read_pos_at_ref_coord = first_read_pos_of_element
                    + if CigarUtils::cigar_consumes_read_bases(cig) {
                        (ref_coord - first_ref_pos_of_element) as usize
                    } else {
                        0
                    };
                return (Some(read_pos_at_ref_coord), Some(cig.clone()));
            }
        }

        (None, None)
    }

    /**
     * Map a reference coordinate to a read offset, reporting whether the coordinate fell strictly
     * inside a reference gap (deletion or skip) of the alignment.
     *
     * @param soft_start            reference coordinate of the first base of the read including
     *                              soft-clipped bases
     * @param cigar                 the read's cigar
     * @param ref_coord             the target reference coordinate
     * @param tail                  which adjacent read base to resolve to when the coordinate has
     *                              no read base under it
     * @param require_aligned_base  when set, coordinates covered only by clipped bases are
     *                              reported as not reached
     * @return                      (read offset or None, inside-gap flag).  None when the
     *                              coordinate precedes the first aligned base, follows the last
     *                              one, or is consumed entirely by clipping.
     */
    pub fn get_read_coordinate_for_reference_coordinate(
        soft_start: i64,
        cigar: &CigarStringView,
        ref_coord: i64,
        tail: ClippingTail,
        require_aligned_base: bool,
    ) -> (Option<usize>, bool) {
        let (read_pos, element) =
            Self::get_read_index_for_reference_coordinate(soft_start, cigar, ref_coord);

        let (read_pos, element) = match (read_pos, element) {
            (Some(p), Some(e)) => (p, e),
            _ => return (None, false),
        };

        if CigarUtils::cigar_is_clip(&element) && require_aligned_base {
            return (None, false);
        }

        if CigarUtils::cigar_is_gap_on_read(&element) {
            // read_pos is the first read base after the gap
            let resolved = match tail {
                ClippingTail::RightTail => Some(read_pos),
                ClippingTail::LeftTail => read_pos.checked_sub(1),
            };
            return (resolved, true);
        }

        (Some(read_pos), false)
    }

    /**
     * Convenience overload taking the read wrapper.
     */
    pub fn get_read_coordinate_for_reference_coordinate_from_read(
        read: &LyreRead,
        ref_coord: i64,
        tail: ClippingTail,
        require_aligned_base: bool,
    ) -> (Option<usize>, bool) {
        Self::get_read_coordinate_for_reference_coordinate(
            read.get_soft_start_i64(),
            &read.read.cigar(),
            ref_coord,
            tail,
            require_aligned_base,
        )
    }
}
