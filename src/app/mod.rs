use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Result;
use eframe::egui::{self, Context, Pos2, Vec2};
use log::{error, info};

use force_plot::data::{self, CharacterGraph, NetworkScales, ScatterData};
use force_plot::scale::PaddedDomain;
use force_plot::select::{Highlight, HoverTarget, SelectionState};
use force_plot::sim::{NodeId, Simulation, SimulationConfig};

mod graph;
mod headless;
mod render_utils;
mod scatter;
mod ui;

pub use headless::run_headless;

/// Input files named on the command line.
#[derive(Clone, Debug, Default)]
pub struct LoadRequest {
    pub scatter: Option<PathBuf>,
    pub network: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub struct LoadedData {
    scatter: Option<ScatterData>,
    network: Option<CharacterGraph>,
    config: SimulationConfig,
}

impl LoadRequest {
    pub fn load(&self) -> Result<LoadedData> {
        let config = match &self.config {
            Some(path) => data::load_config(path)?,
            None => SimulationConfig::default(),
        };
        let scatter = self
            .scatter
            .as_deref()
            .map(data::load_scatter)
            .transpose()?;
        let network = self
            .network
            .as_deref()
            .map(data::load_network)
            .transpose()?;

        Ok(LoadedData {
            scatter,
            network,
            config,
        })
    }
}

#[derive(Clone, Copy, Debug)]
pub struct BubbleSettings {
    pub count: usize,
    pub seed: u64,
}

pub struct PlotApp {
    request: LoadRequest,
    bubbles: BubbleSettings,
    state: AppState,
    reload_rx: Option<Receiver<Result<LoadedData, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<LoadedData, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ViewTab {
    Scatter,
    Bubbles,
    Network,
}

struct ViewModel {
    tab: ViewTab,
    config: SimulationConfig,
    bubble_settings: BubbleSettings,
    live_physics: bool,
    scatter: Option<ScatterView>,
    bubbles: ForceView,
    network: Option<NetworkView>,
}

struct ScatterView {
    data: ScatterData,
    x_axis: PaddedDomain,
    y_axis: PaddedDomain,
    x_ticks: Vec<f64>,
    y_ticks: Vec<f64>,
    positions: Vec<[f64; 2]>,
    selection: SelectionState,
    highlights: Vec<Highlight>,
}

/// A running simulation plus the camera and pointer state drawing it.
struct ForceView {
    simulation: Simulation,
    pan: Vec2,
    zoom: f32,
    dragging: Option<NodeId>,
    hovered: Option<HoverTarget>,
    view_scratch: ViewScratch,
}

struct ViewScratch {
    screen_positions: Vec<Pos2>,
    screen_radii: Vec<f32>,
}

struct NetworkView {
    full: CharacterGraph,
    scales: NetworkScales,
    visible: CharacterGraph,
    force: ForceView,
    episodes: Vec<u32>,
    selected_episodes: BTreeSet<u32>,
    max_episode: u32,
    include_neighbors: bool,
    search: String,
    graph_dirty: bool,
}

impl PlotApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        request: LoadRequest,
        bubbles: BubbleSettings,
    ) -> Self {
        let state = Self::start_load(request.clone());
        Self {
            request,
            bubbles,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(request: LoadRequest) -> Receiver<Result<LoadedData, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = request.load().map_err(|error| format!("{error:#}"));
            if let Err(message) = &result {
                error!("loading input data failed: {message}");
            }
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(request: LoadRequest) -> AppState {
        info!("loading input data");
        AppState::Loading {
            rx: Self::spawn_load(request),
        }
    }
}

impl eframe::App for PlotApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(loaded) => {
                            AppState::Ready(Box::new(ViewModel::new(loaded, self.bubbles)))
                        }
                        Err(error) => AppState::Error(error),
                    });
                } else {
                    ctx.request_repaint();
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading plot data...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load plot data");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.request.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.request.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(loaded) => AppState::Ready(Box::new(ViewModel::new(
                                    loaded,
                                    model.bubble_settings,
                                ))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
