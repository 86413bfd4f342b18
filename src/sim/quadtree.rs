use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: u8 = 12;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Square {
    pub(super) origin: Vec2,
    pub(super) size: f32,
}

impl Square {
    fn covering(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), point| (min.min(*point), max.max(*point)));
        let size = (max - min).max_elem().max(1.0) + 2.0;
        Some(Self {
            origin: min - Vec2::splat(1.0),
            size,
        })
    }

    pub(super) fn center(self) -> Vec2 {
        self.origin + Vec2::splat(self.size * 0.5)
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        let far = self.origin + Vec2::splat(self.size);
        (self.origin.x..=far.x).contains(&point.x) && (self.origin.y..=far.y).contains(&point.y)
    }

    // Bit 0 selects the right half, bit 1 the lower half.
    fn child_index(self, point: Vec2) -> usize {
        let mid = self.center();
        usize::from(point.x >= mid.x) | (usize::from(point.y >= mid.y) << 1)
    }

    fn child(self, index: usize) -> Self {
        let half = self.size * 0.5;
        let offset = vec2(
            if index & 1 == 1 { half } else { 0.0 },
            if index & 2 == 2 { half } else { 0.0 },
        );
        Self {
            origin: self.origin + offset,
            size: half,
        }
    }

    pub(super) fn gap_sq(self, other: Self) -> f32 {
        let gap = |a: f32, b: f32| (a - (b + other.size)).max(b - (a + self.size)).max(0.0);
        let dx = gap(self.origin.x, other.origin.x);
        let dy = gap(self.origin.y, other.origin.y);
        dx * dx + dy * dy
    }
}

pub(super) struct QuadNode {
    pub(super) square: Square,
    pub(super) center_of_mass: Vec2,
    pub(super) mass: f32,
    pub(super) indices: Vec<usize>,
    pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        if positions.iter().any(|position| !position.is_finite()) {
            return None;
        }
        let square = Square::covering(positions)?;
        Some(Self::subdivide(
            square,
            (0..positions.len()).collect(),
            positions,
            0,
        ))
    }

    fn subdivide(square: Square, indices: Vec<usize>, positions: &[Vec2], depth: u8) -> Self {
        let mass = indices.len() as f32;
        let center_of_mass = if indices.is_empty() {
            square.center()
        } else {
            indices
                .iter()
                .fold(Vec2::ZERO, |sum, &index| sum + positions[index])
                / mass
        };
        let mut children = [None, None, None, None];

        let first = indices.first().map(|&index| positions[index]);
        let coincident = indices.iter().all(|&index| Some(positions[index]) == first);
        if indices.len() <= LEAF_CAPACITY || depth >= MAX_DEPTH || coincident {
            return Self {
                square,
                center_of_mass,
                mass,
                indices,
                children,
            };
        }

        let mut buckets: [Vec<usize>; 4] = Default::default();
        for index in indices {
            buckets[square.child_index(positions[index])].push(index);
        }
        for (slot, (quadrant, bucket)) in children.iter_mut().zip(buckets.into_iter().enumerate()) {
            if !bucket.is_empty() {
                *slot = Some(Box::new(Self::subdivide(
                    square.child(quadrant),
                    bucket,
                    positions,
                    depth + 1,
                )));
            }
        }

        Self {
            square,
            center_of_mass,
            mass,
            indices: Vec::new(),
            children,
        }
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_leaf_indices(node: &QuadNode, out: &mut Vec<usize>) {
        out.extend_from_slice(&node.indices);
        for child in node.children.iter().flatten() {
            collect_leaf_indices(child, out);
        }
    }

    #[test]
    fn every_point_lands_in_exactly_one_leaf() {
        let positions = (0..200)
            .map(|index| {
                let angle = index as f32 * 0.37;
                vec2(angle.cos(), angle.sin()) * index as f32
            })
            .collect::<Vec<_>>();

        let tree = QuadNode::build(&positions).expect("finite points");
        assert!(!tree.is_leaf());
        assert_eq!(tree.mass, 200.0);

        let mut seen = Vec::new();
        collect_leaf_indices(&tree, &mut seen);
        seen.sort_unstable();
        assert_eq!(seen, (0..200).collect::<Vec<_>>());
    }

    #[test]
    fn leaves_contain_their_points() {
        fn check(node: &QuadNode, positions: &[Vec2]) {
            for &index in &node.indices {
                assert!(node.square.contains(positions[index]));
            }
            for child in node.children.iter().flatten() {
                check(child, positions);
            }
        }

        let positions = (0..64)
            .map(|index| vec2((index % 8) as f32 * 13.0, (index / 8) as f32 * -7.0))
            .collect::<Vec<_>>();
        let tree = QuadNode::build(&positions).expect("finite points");
        check(&tree, &positions);
    }

    #[test]
    fn coincident_points_stay_in_one_leaf() {
        let positions = vec![vec2(4.0, 4.0); 40];
        let tree = QuadNode::build(&positions).expect("finite points");
        assert!(tree.is_leaf());
        assert_eq!(tree.indices.len(), 40);
    }

    #[test]
    fn non_finite_input_builds_nothing() {
        assert!(QuadNode::build(&[vec2(f32::NAN, 0.0)]).is_none());
        assert!(QuadNode::build(&[]).is_none());
    }

    #[test]
    fn gap_between_squares() {
        let a = Square {
            origin: vec2(0.0, 0.0),
            size: 2.0,
        };
        let b = Square {
            origin: vec2(5.0, 6.0),
            size: 1.0,
        };
        assert_eq!(a.gap_sq(b), 9.0 + 16.0);
        assert_eq!(b.gap_sq(a), 9.0 + 16.0);
        assert_eq!(a.gap_sq(a), 0.0);
    }
}
