use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::sim::{Forces, NodeSpec, Simulation, SimulationConfig};

pub const GROUP_COUNT: usize = 3;
pub const MAX_BUBBLE_RADIUS: f32 = 25.0;
/// Group x targets, 200 apart and centered on the world origin.
pub const GROUP_TARGETS: [f32; GROUP_COUNT] = [-200.0, 0.0, 200.0];
pub const GROUP_COLOURS: [[u8; 3]; GROUP_COUNT] = [[255, 165, 0], [173, 216, 230], [177, 156, 217]];

/// `count` bubbles with radius in `[0, 25)`, assigned to groups round-robin.
pub fn random_bubbles(count: usize, seed: u64) -> Vec<NodeSpec> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|index| {
            let radius = rng.gen_range(0.0..MAX_BUBBLE_RADIUS);
            NodeSpec::new(radius, radius, index % GROUP_COUNT)
        })
        .collect()
}

pub fn bubble_simulation(count: usize, seed: u64, config: &SimulationConfig) -> Simulation {
    Simulation::new(
        random_bubbles(count, seed),
        Vec::new(),
        Forces::grouped(config, GROUP_TARGETS.to_vec()),
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bubbles_are_seeded_and_round_robin() {
        let first = random_bubbles(9, 7);
        assert_eq!(first, random_bubbles(9, 7));
        for (index, spec) in first.iter().enumerate() {
            assert_eq!(spec.group, index % GROUP_COUNT);
            assert!((0.0..MAX_BUBBLE_RADIUS).contains(&spec.radius));
        }
    }
}
