//! Fixed piece orderings swept by the heuristic path.

use crate::piece::Piece;
use std::cmp::Ordering;

/// A piece ordering. Higher priority always comes first; the geometric
/// criterion orders pieces of equal priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortStrategy {
    /// Descending effective area.
    AreaDescending,
    /// Descending area over perimeter.
    AreaPerimeterDescending,
    /// Descending longest side.
    LongestSideDescending,
    /// Ascending aspect ratio.
    AspectAscending,
}

impl SortStrategy {
    /// Every strategy, in sweep order.
    pub const ALL: [SortStrategy; 4] = [
        SortStrategy::AreaDescending,
        SortStrategy::AreaPerimeterDescending,
        SortStrategy::LongestSideDescending,
        SortStrategy::AspectAscending,
    ];

    /// Short name used in results and logs.
    pub fn name(&self) -> &'static str {
        match self {
            SortStrategy::AreaDescending => "area-desc",
            SortStrategy::AreaPerimeterDescending => "area-perimeter-desc",
            SortStrategy::LongestSideDescending => "longest-side-desc",
            SortStrategy::AspectAscending => "aspect-asc",
        }
    }

    /// Indices of `pieces` in this strategy's order. The sort is stable, so
    /// equal pieces keep their input order.
    pub fn order(&self, pieces: &[Piece]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..pieces.len()).collect();
        indices.sort_by(|&a, &b| {
            let (pa, pb) = (&pieces[a], &pieces[b]);
            pb.priority()
                .cmp(&pa.priority())
                .then_with(|| self.compare(pa, pb))
        });
        indices
    }

    fn compare(&self, a: &Piece, b: &Piece) -> Ordering {
        match self {
            SortStrategy::AreaDescending => b.effective_area().total_cmp(&a.effective_area()),
            SortStrategy::AreaPerimeterDescending => {
                ratio(b).total_cmp(&ratio(a))
            }
            SortStrategy::LongestSideDescending => b.longest_side().total_cmp(&a.longest_side()),
            SortStrategy::AspectAscending => a.aspect_ratio().total_cmp(&b.aspect_ratio()),
        }
    }
}

fn ratio(piece: &Piece) -> f64 {
    let perimeter = piece.perimeter();
    if perimeter > 0.0 {
        piece.effective_area() / perimeter
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces() -> Vec<Piece> {
        vec![
            Piece::rectangle("small", 10.0, 10.0),
            Piece::rectangle("long", 80.0, 5.0),
            Piece::rectangle("big", 30.0, 30.0),
            Piece::rectangle("urgent", 2.0, 2.0).with_priority(5),
        ]
    }

    #[test]
    fn test_priority_first() {
        let pieces = pieces();
        for strategy in SortStrategy::ALL {
            assert_eq!(strategy.order(&pieces)[0], 3, "{}", strategy.name());
        }
    }

    #[test]
    fn test_geometric_orders() {
        let pieces = pieces();
        assert_eq!(SortStrategy::AreaDescending.order(&pieces), vec![3, 2, 1, 0]);
        assert_eq!(SortStrategy::LongestSideDescending.order(&pieces), vec![3, 1, 2, 0]);
        assert_eq!(SortStrategy::AspectAscending.order(&pieces), vec![3, 0, 2, 1]);
        assert_eq!(
            SortStrategy::AreaPerimeterDescending.order(&pieces),
            vec![3, 2, 0, 1]
        );
    }

    #[test]
    fn test_stable_for_equal_pieces() {
        let pieces = vec![
            Piece::rectangle("a", 10.0, 10.0),
            Piece::rectangle("b", 10.0, 10.0),
        ];
        assert_eq!(SortStrategy::AreaDescending.order(&pieces), vec![0, 1]);
    }
}
