//! Reusable leftovers.

use crate::result::OptimizationResult;
use slabcut_core::Rect;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum side length of a usable offcut.
pub const USABLE_MIN_SIDE: f64 = 10.0;

/// Quality grade of an offcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OffcutQuality {
    /// Thin or tiny leftover.
    Poor,
    /// Usable for small parts.
    Fair,
    /// Usable for most parts.
    Good,
    /// Large and compact.
    Excellent,
}

impl OffcutQuality {
    /// Grades a leftover by its shorter side and aspect ratio.
    pub fn grade(rect: &Rect) -> Self {
        let short = rect.width.min(rect.height);
        let aspect = rect.aspect_ratio();
        if short >= 50.0 && aspect <= 2.0 {
            OffcutQuality::Excellent
        } else if short >= 25.0 && aspect <= 4.0 {
            OffcutQuality::Good
        } else if short >= USABLE_MIN_SIDE {
            OffcutQuality::Fair
        } else {
            OffcutQuality::Poor
        }
    }
}

/// A leftover rectangle worth keeping in stock.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Offcut {
    /// Position and size on the slab.
    pub rect: Rect,
    /// Quality grade.
    pub quality: OffcutQuality,
    /// At least [`USABLE_MIN_SIDE`] on both sides and not poor.
    pub is_usable: bool,
}

impl Offcut {
    /// Grades a leftover rectangle.
    pub fn new(rect: Rect) -> Self {
        let quality = OffcutQuality::grade(&rect);
        let is_usable = rect.width >= USABLE_MIN_SIDE
            && rect.height >= USABLE_MIN_SIDE
            && quality != OffcutQuality::Poor;
        Self {
            rect,
            quality,
            is_usable,
        }
    }

    /// Area of the offcut.
    pub fn area(&self) -> f64 {
        self.rect.area()
    }
}

/// Picks non-overlapping free rectangles of at least `min_width` x
/// `min_height` from a packed layout, largest first.
pub fn extract_offcuts(result: &OptimizationResult, min_width: f64, min_height: f64) -> Vec<Offcut> {
    let mut candidates: Vec<Rect> = result
        .free_rectangles
        .iter()
        .filter(|r| r.width >= min_width && r.height >= min_height)
        .copied()
        .collect();
    candidates.sort_by(|a, b| b.area().total_cmp(&a.area()));

    let mut chosen: Vec<Rect> = Vec::new();
    for candidate in candidates {
        if chosen.iter().all(|c| !c.overlaps(&candidate)) {
            chosen.push(candidate);
        }
    }
    chosen.into_iter().map(Offcut::new).collect()
}
