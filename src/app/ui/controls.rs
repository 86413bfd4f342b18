use eframe::egui::{self, Ui};

use force_plot::select::{Highlight, NEIGHBOR_COUNT, Quadrant, SelectAction, SelectionState};

use super::super::{ViewModel, ViewTab};

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Controls");
        ui.separator();
        ui.add_space(4.0);

        match self.tab {
            ViewTab::Scatter => self.draw_scatter_controls(ui),
            ViewTab::Bubbles => self.draw_bubble_controls(ui),
            ViewTab::Network => self.draw_network_controls(ui),
        }

        if self.tab != ViewTab::Scatter {
            ui.separator();
            self.draw_physics_controls(ui);
        }
    }

    fn draw_scatter_controls(&mut self, ui: &mut Ui) {
        let Some(scatter) = self.scatter.as_mut() else {
            ui.label("No scatter data loaded.");
            return;
        };

        ui.label("Left click a point to color the others by quadrant.");
        ui.label(format!(
            "Right click a point to mark its {NEIGHBOR_COUNT} nearest neighbors."
        ));
        ui.label("Clicking the selected point again clears the selection.");
        ui.separator();

        let description = match scatter.selection {
            SelectionState::None => "Nothing selected".to_owned(),
            SelectionState::QuadrantRef(index) => {
                let point = &scatter.data.points[index];
                format!("Quadrants around ({}, {})", point.x, point.y)
            }
            SelectionState::NeighborRef(index) => {
                let point = &scatter.data.points[index];
                format!("Nearest neighbors of ({}, {})", point.x, point.y)
            }
        };
        ui.label(description);

        if matches!(scatter.selection, SelectionState::QuadrantRef(_)) {
            for quadrant in Quadrant::ALL {
                let count = scatter
                    .highlights
                    .iter()
                    .filter(|&&highlight| highlight == Highlight::Quadrant(quadrant))
                    .count();
                ui.label(format!("{}: {count}", quadrant.label()));
            }
        }

        let has_selection = scatter.selection.reference().is_some();
        if ui
            .add_enabled(has_selection, egui::Button::new("Clear selection"))
            .clicked()
        {
            scatter.select(SelectAction::Clear);
        }

        ui.separator();
        ui.label(format!("Categories: {}", scatter.data.categories.join(", ")));
        ui.label(format!(
            "x axis: {} to {}",
            scatter.x_axis.bounds.min, scatter.x_axis.bounds.max
        ));
        ui.label(format!(
            "y axis: {} to {}",
            scatter.y_axis.bounds.min, scatter.y_axis.bounds.max
        ));
        if scatter.data.skipped > 0 {
            ui.label(format!("Skipped {} malformed rows", scatter.data.skipped));
        }
    }

    fn draw_bubble_controls(&mut self, ui: &mut Ui) {
        ui.label("Bubbles settle into three columns by group.");
        ui.add(
            egui::Slider::new(&mut self.bubble_settings.count, 3..=600)
                .text("Bubbles")
                .clamping(egui::SliderClamping::Always),
        );
        ui.horizontal(|ui| {
            ui.label("Seed");
            ui.add(egui::DragValue::new(&mut self.bubble_settings.seed));
        });
        if ui
            .button("Regenerate")
            .on_hover_text("Draw new random radii with the current count and seed.")
            .clicked()
        {
            self.regenerate_bubbles();
        }
    }

    fn draw_network_controls(&mut self, ui: &mut Ui) {
        let Some(network) = self.network.as_mut() else {
            ui.label("No character network loaded.");
            return;
        };

        ui.label("Search characters")
            .on_hover_text("Fuzzy-highlight matching characters.");
        ui.text_edit_singleline(&mut network.search);

        ui.checkbox(
            &mut network.include_neighbors,
            "Highlight neighbors on hover",
        )
        .on_hover_text("Also emphasize characters linked to the hovered one.");

        if !network.episodes.is_empty() {
            ui.separator();
            ui.label("Episodes");
            let mut changed = false;
            ui.horizontal_wrapped(|ui| {
                for &episode in &network.episodes {
                    let mut selected = network.selected_episodes.contains(&episode);
                    if ui.checkbox(&mut selected, episode.to_string()).changed() {
                        if selected {
                            network.selected_episodes.insert(episode);
                        } else {
                            network.selected_episodes.remove(&episode);
                        }
                        changed = true;
                    }
                }
            });

            let first = network.episodes.first().copied().unwrap_or(0);
            let last = network.episodes.last().copied().unwrap_or(first);
            changed |= ui
                .add(
                    egui::Slider::new(&mut network.max_episode, first..=last)
                        .text("Up to episode")
                        .clamping(egui::SliderClamping::Always),
                )
                .changed();
            network.graph_dirty |= changed;
        }

        ui.separator();
        ui.label(format!(
            "Showing {} of {} characters",
            network.visible.characters.len(),
            network.full.characters.len()
        ));
        ui.label(format!(
            "Showing {} of {} links",
            network.visible.interactions.len(),
            network.full.interactions.len()
        ));
        if network.full.dropped_links > 0 {
            ui.label(format!(
                "Dropped {} links to unknown characters",
                network.full.dropped_links
            ));
        }
    }

    fn draw_physics_controls(&mut self, ui: &mut Ui) {
        ui.checkbox(&mut self.live_physics, "Live physics simulation")
            .on_hover_text("Keep ticking the layout every frame until it cools.");
        if ui
            .button("Reheat")
            .on_hover_text("Raise alpha so the layout moves again.")
            .clicked()
        {
            self.reheat_simulations();
        }

        let mut changed = false;
        ui.collapsing("Physics tuning", |ui| {
            changed |= ui
                .add(
                    egui::Slider::new(&mut self.config.charge_strength, -200.0..=50.0)
                        .text("Charge")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("Negative values repel, positive values attract.")
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut self.config.link_distance, 5.0..=200.0)
                        .text("Link distance")
                        .clamping(egui::SliderClamping::Always),
                )
                .changed();
            changed |= ui
                .checkbox(&mut self.config.weighted_links, "Weight link strength")
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut self.config.velocity_decay, 0.05..=0.9)
                        .text("Velocity decay")
                        .clamping(egui::SliderClamping::Always),
                )
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut self.config.collide_strength, 0.0..=1.0)
                        .text("Collide strength")
                        .clamping(egui::SliderClamping::Always),
                )
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut self.config.group_strength, 0.0..=0.5)
                        .text("Group pull")
                        .clamping(egui::SliderClamping::Always),
                )
                .changed();
        });

        if changed {
            self.retune_simulations();
        }
    }
}
