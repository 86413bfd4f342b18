use eframe::egui::{self, Align, Context, Layout};

use force_plot::data::bubbles::bubble_simulation;

use super::super::{BubbleSettings, ForceView, LoadedData, NetworkView, ScatterView, ViewModel, ViewTab};

impl ViewModel {
    pub(in crate::app) fn new(loaded: LoadedData, bubble_settings: BubbleSettings) -> Self {
        let LoadedData {
            scatter,
            network,
            config,
        } = loaded;

        let scatter = scatter.map(ScatterView::new);
        let network = network.map(|graph| NetworkView::new(graph, &config));
        let bubbles = ForceView::new(bubble_simulation(
            bubble_settings.count,
            bubble_settings.seed,
            &config,
        ));

        let tab = if scatter.is_some() {
            ViewTab::Scatter
        } else if network.is_some() {
            ViewTab::Network
        } else {
            ViewTab::Bubbles
        };

        Self {
            tab,
            config,
            bubble_settings,
            live_physics: true,
            scatter,
            bubbles,
            network,
        }
    }

    fn status_text(&self) -> String {
        match self.tab {
            ViewTab::Scatter => match &self.scatter {
                Some(scatter) => format!(
                    "points: {}  |  skipped rows: {}",
                    scatter.data.points.len(),
                    scatter.data.skipped
                ),
                None => "no scatter data".to_owned(),
            },
            ViewTab::Bubbles => format!(
                "bubbles: {}  |  alpha: {:.3}",
                self.bubbles.simulation.nodes().len(),
                self.bubbles.simulation.alpha()
            ),
            ViewTab::Network => match &self.network {
                Some(network) => format!(
                    "characters: {}  |  links: {}  |  alpha: {:.3}",
                    network.visible.characters.len(),
                    network.visible.interactions.len(),
                    network.force.simulation.alpha()
                ),
                None => "no network data".to_owned(),
            },
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("force-plot");
                    ui.separator();
                    ui.selectable_value(&mut self.tab, ViewTab::Scatter, "Scatter");
                    ui.selectable_value(&mut self.tab, ViewTab::Bubbles, "Bubbles");
                    ui.selectable_value(&mut self.tab, ViewTab::Network, "Network");
                    ui.separator();
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload data"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.status_text());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            ViewTab::Scatter => self.draw_scatter(ui),
            ViewTab::Bubbles => self.draw_bubbles(ui),
            ViewTab::Network => self.draw_network(ui),
        });
    }
}
