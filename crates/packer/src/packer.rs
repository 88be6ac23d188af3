//! Single-pass greedy packer.
//!
//! Pieces are visited in a given order. For each piece every free rectangle
//! is tried in both orientations with the piece at the rectangle's min
//! corner, and the best scoring candidate is placed. A piece with no valid
//! candidate goes to the unplaced list and packing continues.

use crate::constraints::intersects_defect;
use crate::free_space::FreeSpace;
use crate::piece::Piece;
use crate::result::OptimizationResult;
use crate::scorer::{score, ScoreContext};
use crate::slab::Slab;
use slabcut_core::{OptimizationGoal, Rect, FIT_TOLERANCE};

/// Score added to the orientation a rotation bias prefers.
pub const ROTATION_BIAS_BONUS: f64 = 25.0;

/// A scored placement option.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    free_index: usize,
    rotated: bool,
    score: f64,
}

/// Greedy packer for one slab and goal.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicPacker<'a> {
    slab: &'a Slab,
    goal: OptimizationGoal,
}

impl<'a> HeuristicPacker<'a> {
    /// Creates a packer.
    pub fn new(slab: &'a Slab, goal: OptimizationGoal) -> Self {
        Self { slab, goal }
    }

    /// Packs pieces in their given order.
    pub fn pack(&self, pieces: &[Piece]) -> OptimizationResult {
        let order: Vec<usize> = (0..pieces.len()).collect();
        self.pack_order(pieces, &order, None)
    }

    /// Packs pieces in the order of the indices in `order`.
    ///
    /// `rotation_bias`, indexed like `pieces`, advises which orientation to
    /// prefer; a preferred orientation only gains [`ROTATION_BIAS_BONUS`].
    pub fn pack_order(
        &self,
        pieces: &[Piece],
        order: &[usize],
        rotation_bias: Option<&[bool]>,
    ) -> OptimizationResult {
        let Some(ctx) = ScoreContext::new(self.slab) else {
            return OptimizationResult::all_unplaced(pieces, self.slab).with_strategy("greedy");
        };
        let spacing = self.slab.min_spacing.max(0.0);

        let mut space = FreeSpace::for_slab(self.slab);
        let mut reserved_footprints: Vec<Rect> = Vec::with_capacity(order.len());
        let mut solids: Vec<Rect> = Vec::with_capacity(order.len());
        let mut placed: Vec<Piece> = Vec::with_capacity(order.len());
        let mut unplaced: Vec<Piece> = Vec::new();
        let mut evaluated = 0u64;

        for &index in order {
            let piece = &pieces[index];
            if let Err(e) = piece.validate() {
                log::debug!("skipping piece: {}", e);
                unplaced.push(unplaced_copy(piece));
                continue;
            }
            let preferred = rotation_bias.and_then(|bias| bias.get(index).copied());

            let mut best: Option<Candidate> = None;
            for (free_index, free) in space.rects().iter().enumerate() {
                for rotated in orientations(piece) {
                    let (width, height) = if rotated {
                        (piece.height(), piece.width())
                    } else {
                        (piece.width(), piece.height())
                    };
                    if !free.fits(width, height) {
                        continue;
                    }
                    let body = Rect::new(free.x, free.y, width, height);
                    if intersects_defect(self.slab, &body)
                        || (spacing > 0.0 && !clear_of(&body, spacing, &solids))
                    {
                        continue;
                    }

                    evaluated += 1;
                    let mut value = score(
                        piece,
                        free,
                        rotated,
                        self.goal,
                        &ctx,
                        &reserved_footprints,
                    );
                    if preferred == Some(rotated) {
                        value += ROTATION_BIAS_BONUS;
                    }
                    // Strict comparison: the first candidate enumerated wins ties.
                    if best.map_or(true, |b| value > b.score) {
                        best = Some(Candidate {
                            free_index,
                            rotated,
                            score: value,
                        });
                    }
                }
            }

            let Some(candidate) = best else {
                unplaced.push(unplaced_copy(piece));
                continue;
            };

            let free = space.rects()[candidate.free_index];
            let mut piece = if candidate.rotated {
                piece.rotated_cw()
            } else {
                piece.clone()
            };
            piece.unplace();
            let body = Rect::new(free.x, free.y, piece.width(), piece.height());
            let reserved = reserve(&body, spacing, &ctx.region);
            piece.place(free.x, free.y, placed.len() as u32 + 1);
            space.occupy_piece(&piece, free.x, free.y, &reserved, spacing);
            reserved_footprints.push(reserved);
            solids.extend(piece.solid_rects());
            placed.push(piece);
        }

        let mut result = OptimizationResult::new(placed, unplaced, space.into_rects(), self.slab)
            .with_strategy("greedy");
        result.combinations_tested = evaluated;
        result
    }
}

/// Packs `pieces` in their given order onto `slab`.
pub fn pack(pieces: &[Piece], slab: &Slab, goal: OptimizationGoal) -> OptimizationResult {
    HeuristicPacker::new(slab, goal).pack(pieces)
}

/// A copy of `piece` with any placement from an earlier run cleared.
fn unplaced_copy(piece: &Piece) -> Piece {
    let mut piece = piece.clone();
    piece.unplace();
    piece
}

/// Orientations worth trying: the input one, plus the turned one when it is
/// allowed and gives a different footprint.
fn orientations(piece: &Piece) -> impl Iterator<Item = bool> {
    let turn = piece.is_rotatable() && !piece.is_square();
    [false, true].into_iter().take(if turn { 2 } else { 1 })
}

/// Footprint a piece reserves: its body grown by `spacing` on the far x and
/// y sides, clipped to the packable region.
fn reserve(body: &Rect, spacing: f64, region: &Rect) -> Rect {
    let width = (body.width + spacing).min(region.right() - body.x);
    let height = (body.height + spacing).min(region.bottom() - body.y);
    Rect::new(body.x, body.y, width.max(body.width), height.max(body.height))
}

/// Returns true if no solid lies within `spacing` of `body`.
fn clear_of(body: &Rect, spacing: f64, solids: &[Rect]) -> bool {
    let gap = spacing - FIT_TOLERANCE;
    let zone = Rect::new(
        body.x - gap,
        body.y - gap,
        body.width + 2.0 * gap,
        body.height + 2.0 * gap,
    );
    solids.iter().all(|solid| !solid.overlaps(&zone))
}
