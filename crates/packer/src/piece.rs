//! Piece model: shape kinds, grain, rotation and placement state.
//!
//! Coordinates use the slab frame: origin at the slab's min corner, x to the
//! right and y growing downward, so the "top" edge of a piece is its min-y
//! edge. Pieces are packed by their axis-aligned bounding box whatever their
//! visual shape.

use slabcut_core::{Error, Rect, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for a piece.
pub type PieceId = String;

/// Colours cycled through by placement index.
pub const PALETTE: [&str; 6] = [
    "#4f86c6", "#6dbf73", "#e3a33b", "#c75c5c", "#8e6cc4", "#4bb3b0",
];

/// Returns the palette colour for the `index`-th placed piece.
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Direction of the material grain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GrainDirection {
    /// Grain runs along x.
    Horizontal,
    /// Grain runs along y.
    Vertical,
    /// No grain requirement.
    #[default]
    None,
}

impl GrainDirection {
    /// The grain after a 90° rotation.
    pub fn rotated(self) -> Self {
        match self {
            GrainDirection::Horizontal => GrainDirection::Vertical,
            GrainDirection::Vertical => GrainDirection::Horizontal,
            GrainDirection::None => GrainDirection::None,
        }
    }
}

/// Corner of the bounding box an L-shape's cutout occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CutCorner {
    /// Min x, min y.
    TopLeft,
    /// Max x, min y.
    TopRight,
    /// Max x, max y.
    BottomRight,
    /// Min x, max y.
    BottomLeft,
}

impl CutCorner {
    /// The corner after a 90° clockwise rotation of the piece.
    pub fn rotated_cw(self) -> Self {
        match self {
            CutCorner::TopLeft => CutCorner::TopRight,
            CutCorner::TopRight => CutCorner::BottomRight,
            CutCorner::BottomRight => CutCorner::BottomLeft,
            CutCorner::BottomLeft => CutCorner::TopLeft,
        }
    }
}

/// Which way an L-shape faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LHand {
    /// Cutout defaults to the top-left corner.
    Left,
    /// Cutout defaults to the top-right corner.
    Right,
}

impl LHand {
    /// Default cutout corner for this hand.
    pub fn default_corner(self) -> CutCorner {
        match self {
            LHand::Left => CutCorner::TopLeft,
            LHand::Right => CutCorner::TopRight,
        }
    }
}

/// Shape-specific parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "kebab-case"))]
pub enum ShapeKind {
    /// Plain rectangle.
    Rectangle,
    /// Bounding rectangle minus a rectangular cutout in one corner.
    LShape {
        /// Facing of the L.
        hand: LHand,
        /// Cutout extent along x in the current orientation.
        cut_width: f64,
        /// Cutout extent along y in the current orientation.
        cut_height: f64,
        /// Cutout corner in the current orientation.
        corner: CutCorner,
    },
    /// T-shape: a top bar over a centred stem.
    TShape {
        /// Width of the top bar.
        top_width: f64,
        /// Width of the stem.
        stem_width: f64,
    },
    /// Circle inscribed in its bounding box.
    Circle {
        /// Radius.
        radius: f64,
    },
    /// Triangle.
    Triangle {
        /// Base length.
        base: f64,
        /// Height over the base.
        height: f64,
    },
    /// Arbitrary polygon.
    Custom {
        /// Vertex list, in piece-local coordinates.
        points: Vec<(f64, f64)>,
    },
}

impl ShapeKind {
    /// Short name of the shape kind.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::LShape {
                hand: LHand::Left, ..
            } => "l-left",
            ShapeKind::LShape {
                hand: LHand::Right,
                ..
            } => "l-right",
            ShapeKind::TShape { .. } => "t-shape",
            ShapeKind::Circle { .. } => "circle",
            ShapeKind::Triangle { .. } => "triangle",
            ShapeKind::Custom { .. } => "custom",
        }
    }
}

/// Final position and cutting order of a placed piece.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// Min x of the bounding box.
    pub x: f64,
    /// Min y of the bounding box.
    pub y: f64,
    /// 1-based machine cutting sequence index.
    pub cutting_order: u32,
}

/// A piece to be cut from the slab.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Piece {
    /// Unique identifier.
    id: PieceId,

    /// Shape parameters.
    shape: ShapeKind,

    /// Bounding box extent along x, in the current orientation.
    width: f64,

    /// Bounding box extent along y, in the current orientation.
    height: f64,

    /// Placement priority (higher = placed preferentially).
    #[cfg_attr(feature = "serde", serde(default = "default_priority"))]
    priority: i32,

    /// Grain direction in the current orientation.
    #[cfg_attr(feature = "serde", serde(default))]
    grain: GrainDirection,

    /// Whether the piece may be turned by 90°.
    #[cfg_attr(feature = "serde", serde(default = "default_rotatable"))]
    rotatable: bool,

    /// Whether the piece has been turned relative to its input orientation.
    #[cfg_attr(feature = "serde", serde(default))]
    rotated: bool,

    /// Position and cutting order, present once placed.
    #[cfg_attr(feature = "serde", serde(default))]
    placement: Option<Placement>,

    /// Display colour assigned at placement time.
    #[cfg_attr(feature = "serde", serde(default))]
    color: Option<String>,
}

#[cfg(feature = "serde")]
fn default_priority() -> i32 {
    1
}

#[cfg(feature = "serde")]
fn default_rotatable() -> bool {
    true
}

impl Piece {
    /// Creates a piece with the given shape and bounding box.
    pub fn new(id: impl Into<PieceId>, shape: ShapeKind, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            shape,
            width,
            height,
            priority: 1,
            grain: GrainDirection::None,
            rotatable: true,
            rotated: false,
            placement: None,
            color: None,
        }
    }

    /// Creates a rectangular piece.
    pub fn rectangle(id: impl Into<PieceId>, width: f64, height: f64) -> Self {
        Self::new(id, ShapeKind::Rectangle, width, height)
    }

    /// Creates an L-shape with the cutout at the top-left corner.
    pub fn l_left(
        id: impl Into<PieceId>,
        width: f64,
        height: f64,
        cut_width: f64,
        cut_height: f64,
    ) -> Self {
        Self::l_shape(id, LHand::Left, width, height, cut_width, cut_height)
    }

    /// Creates an L-shape with the cutout at the top-right corner.
    pub fn l_right(
        id: impl Into<PieceId>,
        width: f64,
        height: f64,
        cut_width: f64,
        cut_height: f64,
    ) -> Self {
        Self::l_shape(id, LHand::Right, width, height, cut_width, cut_height)
    }

    fn l_shape(
        id: impl Into<PieceId>,
        hand: LHand,
        width: f64,
        height: f64,
        cut_width: f64,
        cut_height: f64,
    ) -> Self {
        let shape = ShapeKind::LShape {
            hand,
            cut_width,
            cut_height,
            corner: hand.default_corner(),
        };
        Self::new(id, shape, width, height)
    }

    /// Creates a T-shape.
    pub fn t_shape(
        id: impl Into<PieceId>,
        width: f64,
        height: f64,
        top_width: f64,
        stem_width: f64,
    ) -> Self {
        let shape = ShapeKind::TShape {
            top_width,
            stem_width,
        };
        Self::new(id, shape, width, height)
    }

    /// Creates a circle; its bounding box is the diameter square.
    pub fn circle(id: impl Into<PieceId>, radius: f64) -> Self {
        Self::new(id, ShapeKind::Circle { radius }, radius * 2.0, radius * 2.0)
    }

    /// Creates a triangle with the given base and height.
    pub fn triangle(id: impl Into<PieceId>, base: f64, height: f64) -> Self {
        Self::new(id, ShapeKind::Triangle { base, height }, base, height)
    }

    /// Creates a custom polygon; its bounding box is derived from the vertices.
    pub fn custom(id: impl Into<PieceId>, points: Vec<(f64, f64)>) -> Self {
        let (width, height) = bounding_extent(&points);
        Self::new(id, ShapeKind::Custom { points }, width, height)
    }

    /// Overrides the cutout corner of an L-shape. No effect on other shapes.
    pub fn with_cut_corner(mut self, new_corner: CutCorner) -> Self {
        if let ShapeKind::LShape { corner, .. } = &mut self.shape {
            *corner = new_corner;
        }
        self
    }

    /// Sets the placement priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the grain direction.
    pub fn with_grain(mut self, grain: GrainDirection) -> Self {
        self.grain = grain;
        self
    }

    /// Allows or forbids 90° rotation.
    pub fn with_rotatable(mut self, rotatable: bool) -> Self {
        self.rotatable = rotatable;
        self
    }

    /// Returns the piece ID.
    pub fn id(&self) -> &PieceId {
        &self.id
    }

    /// Returns the shape parameters.
    pub fn shape(&self) -> &ShapeKind {
        &self.shape
    }

    /// Bounding box width in the current orientation.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Bounding box height in the current orientation.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the placement priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns the grain direction in the current orientation.
    pub fn grain(&self) -> GrainDirection {
        self.grain
    }

    /// Returns whether the piece may be rotated.
    pub fn is_rotatable(&self) -> bool {
        self.rotatable
    }

    /// Returns whether the piece is rotated relative to its input orientation.
    pub fn is_rotated(&self) -> bool {
        self.rotated
    }

    /// Returns the placement, if placed.
    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    /// Returns true once the piece has a position and cutting order.
    pub fn is_placed(&self) -> bool {
        self.placement.is_some()
    }

    /// Returns the display colour, if assigned.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Returns true if rotating leaves the footprint unchanged.
    pub fn is_square(&self) -> bool {
        (self.width - self.height).abs() <= f64::EPSILON
    }

    /// Area of the shape itself, as used for efficiency and waste.
    ///
    /// Placement still reserves the full bounding box.
    pub fn effective_area(&self) -> f64 {
        match &self.shape {
            ShapeKind::Rectangle | ShapeKind::TShape { .. } | ShapeKind::Custom { .. } => {
                self.bounding_area()
            }
            ShapeKind::LShape {
                cut_width,
                cut_height,
                ..
            } => self.bounding_area() - cut_width * cut_height,
            ShapeKind::Circle { radius } => std::f64::consts::PI * radius * radius,
            ShapeKind::Triangle { base, height } => 0.5 * base * height,
        }
    }

    /// Bounding box area.
    pub fn bounding_area(&self) -> f64 {
        self.width * self.height
    }

    /// Bounding box perimeter.
    pub fn perimeter(&self) -> f64 {
        2.0 * (self.width + self.height)
    }

    /// Longer side of the bounding box.
    pub fn longest_side(&self) -> f64 {
        self.width.max(self.height)
    }

    /// Longer side over shorter side of the bounding box.
    pub fn aspect_ratio(&self) -> f64 {
        Rect::new(0.0, 0.0, self.width, self.height).aspect_ratio()
    }

    /// Turns the piece by 90° clockwise in place.
    ///
    /// Width and height swap, an L-shape's cutout dimensions swap and its
    /// corner moves clockwise, and the grain flips axis.
    pub fn rotate(&mut self) {
        std::mem::swap(&mut self.width, &mut self.height);
        if let ShapeKind::LShape {
            cut_width,
            cut_height,
            corner,
            ..
        } = &mut self.shape
        {
            std::mem::swap(cut_width, cut_height);
            *corner = corner.rotated_cw();
        }
        self.grain = self.grain.rotated();
        self.rotated = !self.rotated;
    }

    /// Returns a copy turned by 90° clockwise.
    pub fn rotated_cw(&self) -> Piece {
        let mut turned = self.clone();
        turned.rotate();
        turned
    }

    /// Bounding box at the placed position.
    pub fn footprint(&self) -> Option<Rect> {
        self.placement
            .map(|p| Rect::new(p.x, p.y, self.width, self.height))
    }

    /// Cutout of an L-shape whose bounding box has its min corner at `(x, y)`.
    pub fn cutout_at(&self, x: f64, y: f64) -> Option<Rect> {
        let ShapeKind::LShape {
            cut_width,
            cut_height,
            corner,
            ..
        } = &self.shape
        else {
            return None;
        };
        let (cx, cy) = match corner {
            CutCorner::TopLeft => (x, y),
            CutCorner::TopRight => (x + self.width - cut_width, y),
            CutCorner::BottomRight => (x + self.width - cut_width, y + self.height - cut_height),
            CutCorner::BottomLeft => (x, y + self.height - cut_height),
        };
        Some(Rect::new(cx, cy, *cut_width, *cut_height))
    }

    /// Cutout of a placed L-shape.
    pub fn cutout(&self) -> Option<Rect> {
        let p = self.placement?;
        self.cutout_at(p.x, p.y)
    }

    /// Solid part of a placed piece: its bounding box, or for an L-shape the
    /// two rectangles left after removing the cutout.
    pub fn solid_rects(&self) -> Vec<Rect> {
        let Some(body) = self.footprint() else {
            return Vec::new();
        };
        let Some(cut) = self.cutout() else {
            return vec![body];
        };
        let beside_x = if (cut.x - body.x).abs() <= f64::EPSILON {
            cut.right()
        } else {
            body.x
        };
        let other_y = if (cut.y - body.y).abs() <= f64::EPSILON {
            cut.bottom()
        } else {
            body.y
        };
        vec![
            Rect::new(beside_x, cut.y, body.width - cut.width, cut.height),
            Rect::new(body.x, other_y, body.width, body.height - cut.height),
        ]
    }

    /// Records the final position, cutting order and colour.
    pub(crate) fn place(&mut self, x: f64, y: f64, cutting_order: u32) {
        self.placement = Some(Placement {
            x,
            y,
            cutting_order,
        });
        self.color = Some(palette_color(cutting_order.saturating_sub(1) as usize).to_string());
    }

    /// Clears position, cutting order and colour.
    pub(crate) fn unplace(&mut self) {
        self.placement = None;
        self.color = None;
    }

    /// Checks dimensions and shape parameters.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.width) || !positive(self.height) {
            return Err(Error::InvalidPiece(format!(
                "{}: width and height must be positive, got {}x{}",
                self.id, self.width, self.height
            )));
        }

        match &self.shape {
            ShapeKind::Rectangle => {}
            ShapeKind::LShape {
                cut_width,
                cut_height,
                ..
            } => {
                if !positive(*cut_width)
                    || !positive(*cut_height)
                    || *cut_width >= self.width
                    || *cut_height >= self.height
                {
                    return Err(Error::InvalidPiece(format!(
                        "{}: L cutout {}x{} must be positive and smaller than {}x{}",
                        self.id, cut_width, cut_height, self.width, self.height
                    )));
                }
            }
            ShapeKind::TShape {
                top_width,
                stem_width,
            } => {
                if !positive(*top_width) || !positive(*stem_width) || stem_width > top_width {
                    return Err(Error::InvalidPiece(format!(
                        "{}: T stem width {} must be positive and at most top width {}",
                        self.id, stem_width, top_width
                    )));
                }
            }
            ShapeKind::Circle { radius } => {
                if !positive(*radius) {
                    return Err(Error::InvalidPiece(format!(
                        "{}: radius must be positive",
                        self.id
                    )));
                }
            }
            ShapeKind::Triangle { base, height } => {
                if !positive(*base) || !positive(*height) {
                    return Err(Error::InvalidPiece(format!(
                        "{}: triangle base and height must be positive",
                        self.id
                    )));
                }
            }
            ShapeKind::Custom { points } => {
                if points.len() < 3 {
                    return Err(Error::InvalidPiece(format!(
                        "{}: custom polygon needs at least 3 vertices, got {}",
                        self.id,
                        points.len()
                    )));
                }
            }
        }

        Ok(())
    }
}

fn bounding_extent(points: &[(f64, f64)]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
    let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
    for &(x, y) in points {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    (max_x - min_x, max_y - min_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_effective_area_per_shape() {
        assert_relative_eq!(Piece::rectangle("r", 20.0, 10.0).effective_area(), 200.0);
        assert_relative_eq!(
            Piece::l_left("l", 40.0, 30.0, 15.0, 10.0).effective_area(),
            1200.0 - 150.0
        );
        assert_relative_eq!(
            Piece::t_shape("t", 30.0, 20.0, 30.0, 10.0).effective_area(),
            600.0
        );
        assert_relative_eq!(
            Piece::circle("c", 10.0).effective_area(),
            std::f64::consts::PI * 100.0
        );
        assert_relative_eq!(Piece::triangle("tri", 10.0, 6.0).effective_area(), 30.0);
        assert_relative_eq!(
            Piece::custom("p", vec![(0.0, 0.0), (8.0, 0.0), (4.0, 5.0)]).effective_area(),
            40.0
        );
    }

    #[test]
    fn test_rotation_swaps_dimensions_and_grain() {
        let piece = Piece::rectangle("r", 30.0, 10.0).with_grain(GrainDirection::Horizontal);
        let turned = piece.rotated_cw();
        assert_eq!(turned.width(), 10.0);
        assert_eq!(turned.height(), 30.0);
        assert!(turned.is_rotated());
        assert_eq!(turned.grain(), GrainDirection::Vertical);
        assert!(!turned.rotated_cw().is_rotated());
    }

    #[test]
    fn test_cut_corner_cycle() {
        let mut corner = CutCorner::TopRight;
        let expected = [
            CutCorner::BottomRight,
            CutCorner::BottomLeft,
            CutCorner::TopLeft,
            CutCorner::TopRight,
        ];
        for next in expected {
            corner = corner.rotated_cw();
            assert_eq!(corner, next);
        }
    }

    #[test]
    fn test_l_cutout_follows_rotation() {
        let piece = Piece::l_left("l", 40.0, 30.0, 15.0, 10.0);
        assert_eq!(piece.cutout_at(5.0, 5.0), Some(Rect::new(5.0, 5.0, 15.0, 10.0)));

        let turned = piece.rotated_cw();
        // 30 wide, 40 tall, cutout 10x15 in the top-right corner
        assert_eq!(turned.cutout_at(0.0, 0.0), Some(Rect::new(20.0, 0.0, 10.0, 15.0)));

        let right = Piece::l_right("r", 40.0, 30.0, 15.0, 10.0);
        assert_eq!(right.cutout_at(0.0, 0.0), Some(Rect::new(25.0, 0.0, 15.0, 10.0)));

        let bottom = right.with_cut_corner(CutCorner::BottomLeft);
        assert_eq!(bottom.cutout_at(0.0, 0.0), Some(Rect::new(0.0, 20.0, 15.0, 10.0)));
    }

    #[test]
    fn test_place_assigns_order_and_color() {
        let mut piece = Piece::rectangle("r", 10.0, 10.0);
        assert!(!piece.is_placed());
        assert!(piece.footprint().is_none());

        piece.place(3.0, 4.0, 7);
        assert_eq!(piece.placement().map(|p| p.cutting_order), Some(7));
        assert_eq!(piece.footprint(), Some(Rect::new(3.0, 4.0, 10.0, 10.0)));
        assert_eq!(piece.color(), Some(PALETTE[0]));
    }

    #[test]
    fn test_solid_rects_exclude_cutout() {
        let mut piece = Piece::l_right("l", 40.0, 30.0, 15.0, 10.0);
        assert!(piece.solid_rects().is_empty());
        piece.place(0.0, 0.0, 1);
        assert_eq!(
            piece.solid_rects(),
            vec![
                Rect::new(0.0, 0.0, 25.0, 10.0),
                Rect::new(0.0, 10.0, 40.0, 20.0),
            ]
        );

        let mut bottom = Piece::l_left("b", 40.0, 30.0, 15.0, 10.0)
            .with_cut_corner(CutCorner::BottomLeft);
        bottom.place(5.0, 5.0, 1);
        assert_eq!(
            bottom.solid_rects(),
            vec![
                Rect::new(20.0, 25.0, 25.0, 10.0),
                Rect::new(5.0, 5.0, 40.0, 20.0),
            ]
        );
    }

    #[test]
    fn test_validate() {
        assert!(Piece::rectangle("ok", 1.0, 1.0).validate().is_ok());
        assert!(Piece::rectangle("zero", 0.0, 5.0).validate().is_err());
        assert!(Piece::rectangle("nan", f64::NAN, 5.0).validate().is_err());
        assert!(Piece::l_left("big-cut", 10.0, 10.0, 10.0, 5.0)
            .validate()
            .is_err());
        assert!(Piece::t_shape("t", 10.0, 10.0, 5.0, 8.0).validate().is_err());
        assert!(Piece::custom("line", vec![(0.0, 0.0), (1.0, 1.0)])
            .validate()
            .is_err());
    }

    #[test]
    fn test_shape_names() {
        assert_eq!(Piece::l_left("a", 4.0, 4.0, 1.0, 1.0).shape().name(), "l-left");
        assert_eq!(Piece::l_right("a", 4.0, 4.0, 1.0, 1.0).shape().name(), "l-right");
        assert_eq!(Piece::circle("c", 1.0).shape().name(), "circle");
    }
}
