//! Maximal free-rectangle space model.
//!
//! The free set is a list of possibly overlapping rectangles, each maximal
//! within the region it was split from. Occupying a footprint replaces every
//! free rectangle it overlaps with up to four remainders, and the list is
//! pruned of rectangles contained in another after every change.

use crate::piece::{CutCorner, Piece, ShapeKind};
use crate::slab::Slab;
use slabcut_core::Rect;

/// The set of empty rectangles available for placement.
#[derive(Debug, Clone, Default)]
pub struct FreeSpace {
    rects: Vec<Rect>,
}

impl FreeSpace {
    /// Creates a free set holding a single region.
    pub fn new(region: Rect) -> Self {
        let mut space = Self::default();
        space.insert(region);
        space
    }

    /// Creates the initial free set of a slab: its packable region with the
    /// defect zones carved out. Empty when the slab has no packable region.
    pub fn for_slab(slab: &Slab) -> Self {
        let Some(region) = slab.packable_region() else {
            return Self::default();
        };
        let mut space = Self::new(region);
        for defect in &slab.defects {
            space.occupy(defect);
        }
        space
    }

    /// Current free rectangles, in enumeration order.
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Consumes the model, returning its rectangles.
    pub fn into_rects(self) -> Vec<Rect> {
        self.rects
    }

    /// Number of free rectangles.
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Returns true if no free space remains.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Adds a free rectangle. Degenerate rectangles are ignored.
    pub fn insert(&mut self, rect: Rect) {
        if rect.is_degenerate() {
            return;
        }
        self.rects.push(rect);
        self.prune();
    }

    /// Removes `used` from every free rectangle it overlaps.
    pub fn occupy(&mut self, used: &Rect) {
        if !self.rects.iter().any(|r| r.overlaps(used)) {
            return;
        }
        let mut next = Vec::with_capacity(self.rects.len() + 4);
        for free in &self.rects {
            if free.overlaps(used) {
                next.extend(Self::split(free, used));
            } else {
                next.push(*free);
            }
        }
        self.rects = next;
        self.prune();
    }

    /// Occupies a placed piece's reserved footprint and, for an L-shape,
    /// hands the cutout back to the free set.
    ///
    /// Only the cutout's near sides (left, top) that face the body are inset
    /// by `spacing`, so a piece anchored at its min corner starts clear of
    /// the body. The far sides are left to the clearance check.
    pub fn occupy_piece(&mut self, piece: &Piece, x: f64, y: f64, reserved: &Rect, spacing: f64) {
        self.occupy(reserved);
        if let (Some(cutout), ShapeKind::LShape { corner, .. }) =
            (piece.cutout_at(x, y), piece.shape())
        {
            self.insert(inset_towards_body(cutout, *corner, spacing));
        }
    }

    /// Remainders of `free` after removing `used`: the strips left of, right
    /// of, above and below the used region, each spanning `free` on the other
    /// axis. Degenerate strips are dropped.
    pub fn split(free: &Rect, used: &Rect) -> Vec<Rect> {
        if !free.overlaps(used) {
            return vec![*free];
        }

        let candidates = [
            Rect::new(free.x, free.y, used.x - free.x, free.height),
            Rect::new(
                used.right(),
                free.y,
                free.right() - used.right(),
                free.height,
            ),
            Rect::new(free.x, free.y, free.width, used.y - free.y),
            Rect::new(
                free.x,
                used.bottom(),
                free.width,
                free.bottom() - used.bottom(),
            ),
        ];

        candidates
            .into_iter()
            .filter(|r| !r.is_degenerate())
            .collect()
    }

    /// Removes every rectangle contained in another. Of two equal
    /// rectangles the later one is kept.
    pub fn prune(&mut self) {
        let n = self.rects.len();
        let mut keep = vec![true; n];
        for i in 0..n {
            for j in 0..n {
                if i != j && keep[j] && self.rects[j].contains(&self.rects[i]) {
                    keep[i] = false;
                    break;
                }
            }
        }
        let mut index = 0;
        self.rects.retain(|_| {
            let kept = keep[index];
            index += 1;
            kept
        });
    }
}

fn inset_towards_body(cutout: Rect, corner: CutCorner, spacing: f64) -> Rect {
    if spacing <= 0.0 {
        return cutout;
    }
    let (dx, dy) = match corner {
        CutCorner::TopLeft => (0.0, 0.0),
        CutCorner::TopRight => (spacing, 0.0),
        CutCorner::BottomRight => (spacing, spacing),
        CutCorner::BottomLeft => (0.0, spacing),
    };
    Rect::new(
        cutout.x + dx,
        cutout.y + dy,
        cutout.width - dx,
        cutout.height - dy,
    )
}
