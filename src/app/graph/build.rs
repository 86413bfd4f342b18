use std::collections::{BTreeSet, HashMap};

use eframe::egui::Vec2;
use log::info;

use force_plot::data::bubbles::{GROUP_TARGETS, bubble_simulation};
use force_plot::data::network::COLLIDE_SCALE;
use force_plot::data::{CharacterGraph, NetworkScales};
use force_plot::sim::{Forces, SimulationConfig};

use super::super::{ForceView, NetworkView, ViewModel};

impl NetworkView {
    pub(in crate::app) fn new(full: CharacterGraph, config: &SimulationConfig) -> Self {
        let scales = NetworkScales::for_graph(&full);
        let episodes = full.episodes();
        let selected_episodes = episodes.iter().copied().collect::<BTreeSet<_>>();
        let max_episode = episodes.last().copied().unwrap_or(0);
        let simulation = full.build_simulation(&scales, config, Vec2::ZERO, &HashMap::new());

        Self {
            visible: full.clone(),
            full,
            scales,
            force: ForceView::new(simulation),
            episodes,
            selected_episodes,
            max_episode,
            include_neighbors: false,
            search: String::new(),
            graph_dirty: false,
        }
    }

    pub(in crate::app) fn rebuild(&mut self, config: &SimulationConfig) {
        let prior = self
            .visible
            .characters
            .iter()
            .zip(self.force.simulation.nodes())
            .map(|(character, node)| (character.name.clone(), node.position))
            .collect::<HashMap<_, _>>();

        self.visible = self
            .full
            .filter_episodes(&self.selected_episodes, self.max_episode);
        let simulation = self
            .visible
            .build_simulation(&self.scales, config, Vec2::ZERO, &prior);
        self.force.replace_simulation(simulation);
        self.graph_dirty = false;

        info!(
            "network filter kept {} of {} characters and {} of {} links",
            self.visible.characters.len(),
            self.full.characters.len(),
            self.visible.interactions.len(),
            self.full.interactions.len()
        );
    }
}

impl ViewModel {
    pub(in crate::app) fn regenerate_bubbles(&mut self) {
        let settings = self.bubble_settings;
        self.bubbles.replace_simulation(bubble_simulation(
            settings.count,
            settings.seed,
            &self.config,
        ));
        info!(
            "generated {} bubbles with seed {}",
            settings.count, settings.seed
        );
    }

    pub(in crate::app) fn retune_simulations(&mut self) {
        let config = &self.config;
        self.bubbles
            .simulation
            .retune(Forces::grouped(config, GROUP_TARGETS.to_vec()), config);
        if let Some(network) = self.network.as_mut() {
            network
                .force
                .simulation
                .retune(Forces::network(config, Vec2::ZERO, COLLIDE_SCALE), config);
        }
    }

    pub(in crate::app) fn reheat_simulations(&mut self) {
        let alpha = self.config.drag_alpha_target.max(self.config.alpha_min * 2.0);
        self.bubbles.simulation.reheat(alpha);
        if let Some(network) = self.network.as_mut() {
            network.force.simulation.reheat(alpha);
        }
    }
}
