//! Placement constraints: defect zones and grain alignment.

use crate::piece::GrainDirection;
use crate::slab::Slab;
use slabcut_core::Rect;

/// Returns true if `footprint` overlaps any defect zone of the slab.
///
/// Touching edges do not count as overlap.
pub fn intersects_defect(slab: &Slab, footprint: &Rect) -> bool {
    slab.defects.iter().any(|d| d.overlaps(footprint))
}

/// Returns true if a piece with grain `piece_grain` (in its input
/// orientation) lines up with the slab grain when placed with the given
/// rotation. `None` on either side is always aligned.
pub fn grain_aligned(piece_grain: GrainDirection, rotated: bool, slab_grain: GrainDirection) -> bool {
    if piece_grain == GrainDirection::None || slab_grain == GrainDirection::None {
        return true;
    }
    let effective = if rotated {
        piece_grain.rotated()
    } else {
        piece_grain
    };
    effective == slab_grain
}
