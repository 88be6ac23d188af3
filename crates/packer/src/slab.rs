//! Stock sheet description.

use crate::piece::GrainDirection;
use slabcut_core::{Error, Rect, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rectangular stock sheet.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Slab {
    /// Extent along x.
    pub width: f64,

    /// Extent along y.
    pub height: f64,

    /// Uniform inward offset defining the packable region.
    #[cfg_attr(feature = "serde", serde(default))]
    pub margin: f64,

    /// Minimum gap between neighbouring pieces.
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_spacing: f64,

    /// Grain direction of the material.
    #[cfg_attr(feature = "serde", serde(default))]
    pub grain: GrainDirection,

    /// Zones no piece footprint may overlap.
    #[cfg_attr(feature = "serde", serde(default))]
    pub defects: Vec<Rect>,
}

impl Slab {
    /// Creates a slab with no margin, spacing, grain or defects.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: 0.0,
            min_spacing: 0.0,
            grain: GrainDirection::None,
            defects: Vec::new(),
        }
    }

    /// Sets the margin.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the minimum inter-piece spacing.
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.min_spacing = spacing;
        self
    }

    /// Sets the grain direction.
    pub fn with_grain(mut self, grain: GrainDirection) -> Self {
        self.grain = grain;
        self
    }

    /// Adds a defect zone.
    pub fn with_defect(mut self, defect: Rect) -> Self {
        self.defects.push(defect);
        self
    }

    /// Total slab area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// The margin-inset region, or `None` if nothing usable remains.
    pub fn packable_region(&self) -> Option<Rect> {
        if !self.width.is_finite() || !self.height.is_finite() || self.margin < 0.0 {
            return None;
        }
        let region = Rect::new(
            self.margin,
            self.margin,
            self.width - 2.0 * self.margin,
            self.height - 2.0 * self.margin,
        );
        if region.width <= 0.0 || region.height <= 0.0 {
            None
        } else {
            Some(region)
        }
    }

    /// Checks dimensions, margin and spacing.
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0)
            || !(self.height.is_finite() && self.height > 0.0)
        {
            return Err(Error::InvalidSlab(format!(
                "dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.margin >= 0.0) || !(self.min_spacing >= 0.0) {
            return Err(Error::InvalidSlab(format!(
                "margin ({}) and spacing ({}) must be non-negative",
                self.margin, self.min_spacing
            )));
        }
        if self.packable_region().is_none() {
            return Err(Error::InvalidSlab(format!(
                "margin {} leaves no packable region in {}x{}",
                self.margin, self.width, self.height
            )));
        }
        if let Some(defect) = self
            .defects
            .iter()
            .find(|d| !(d.width > 0.0 && d.height > 0.0))
        {
            return Err(Error::InvalidSlab(format!(
                "defect at ({}, {}) has non-positive size",
                defect.x, defect.y
            )));
        }
        Ok(())
    }
}
