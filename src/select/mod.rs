//! Sticky quadrant and nearest-neighbour selection plus transient hover
//! highlighting over simulation nodes.

mod adjacency;
mod neighbors;

pub use adjacency::{AdjacencyHighlight, EMPHASIS_SCALE, HoverTarget};
pub use neighbors::{NEIGHBOR_COUNT, nearest_neighbors};

/// Position of a point relative to a reference, with zero offsets treated
/// as non-negative (right / upper).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

impl Quadrant {
    pub const ALL: [Self; 4] = [
        Self::UpperRight,
        Self::UpperLeft,
        Self::LowerLeft,
        Self::LowerRight,
    ];

    pub fn classify(dx: f64, dy: f64) -> Self {
        match (dx >= 0.0, dy >= 0.0) {
            (true, true) => Self::UpperRight,
            (false, true) => Self::UpperLeft,
            (false, false) => Self::LowerLeft,
            (true, false) => Self::LowerRight,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::UpperRight => "upper right",
            Self::UpperLeft => "upper left",
            Self::LowerLeft => "lower left",
            Self::LowerRight => "lower right",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Highlight {
    Default,
    Reference,
    Quadrant(Quadrant),
    Neighbor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectAction {
    /// Primary-button select: classify by quadrant around the point.
    Primary(usize),
    /// Secondary-button select: mark the nearest neighbours of the point.
    Secondary(usize),
    Clear,
}

/// The single active sticky selection. Quadrant and neighbour modes
/// replace each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    None,
    QuadrantRef(usize),
    NeighborRef(usize),
}

impl SelectionState {
    /// Selecting the active reference again in the same mode clears it.
    pub fn apply(self, action: SelectAction) -> Self {
        match (self, action) {
            (Self::QuadrantRef(current), SelectAction::Primary(index)) if current == index => {
                Self::None
            }
            (_, SelectAction::Primary(index)) => Self::QuadrantRef(index),
            (Self::NeighborRef(current), SelectAction::Secondary(index)) if current == index => {
                Self::None
            }
            (_, SelectAction::Secondary(index)) => Self::NeighborRef(index),
            (_, SelectAction::Clear) => Self::None,
        }
    }

    pub fn reference(self) -> Option<usize> {
        match self {
            Self::None => None,
            Self::QuadrantRef(index) | Self::NeighborRef(index) => Some(index),
        }
    }

    /// Highlight for every position, recomputed from scratch.
    ///
    /// A reference that does not index into `positions` leaves everything
    /// at [`Highlight::Default`].
    pub fn highlights(self, positions: &[[f64; 2]]) -> Vec<Highlight> {
        let mut highlights = vec![Highlight::Default; positions.len()];
        let Some(reference) = self.reference().filter(|&index| index < positions.len()) else {
            return highlights;
        };

        match self {
            Self::None => {}
            Self::QuadrantRef(_) => {
                let [rx, ry] = positions[reference];
                for (highlight, &[x, y]) in highlights.iter_mut().zip(positions) {
                    *highlight = Highlight::Quadrant(Quadrant::classify(x - rx, y - ry));
                }
            }
            Self::NeighborRef(_) => {
                for index in nearest_neighbors(positions, reference, NEIGHBOR_COUNT) {
                    highlights[index] = Highlight::Neighbor;
                }
            }
        }
        highlights[reference] = Highlight::Reference;
        highlights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_pins_zero_to_non_negative() {
        assert_eq!(Quadrant::classify(0.0, 0.0), Quadrant::UpperRight);
        assert_eq!(Quadrant::classify(-1.0, 0.0), Quadrant::UpperLeft);
        assert_eq!(Quadrant::classify(0.0, -1.0), Quadrant::LowerRight);
        assert_eq!(Quadrant::classify(-1.0, -1.0), Quadrant::LowerLeft);
    }

    #[test]
    fn modes_replace_each_other() {
        let state = SelectionState::None.apply(SelectAction::Primary(2));
        assert_eq!(state, SelectionState::QuadrantRef(2));

        let state = state.apply(SelectAction::Secondary(2));
        assert_eq!(state, SelectionState::NeighborRef(2));

        let state = state.apply(SelectAction::Primary(4));
        assert_eq!(state, SelectionState::QuadrantRef(4));

        assert_eq!(state.apply(SelectAction::Clear), SelectionState::None);
    }

    #[test]
    fn out_of_range_reference_highlights_nothing() {
        let positions = [[0.0, 0.0], [1.0, 1.0]];
        let highlights = SelectionState::QuadrantRef(9).highlights(&positions);
        assert!(highlights.iter().all(|h| *h == Highlight::Default));
    }
}
