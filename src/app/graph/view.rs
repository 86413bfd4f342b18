use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Painter, Rect, Response, Sense, Stroke, Ui, Vec2, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use force_plot::data::bubbles::{GROUP_COLOURS, GROUP_TARGETS};
use force_plot::select::{AdjacencyHighlight, HoverTarget};
use force_plot::sim::{EdgeId, NodeId, Simulation};

use super::super::render_utils::{
    DEFAULT_COLOR, HIGHLIGHT_RED, blend_color, circle_visible, dim_color, draw_background,
    rgb_color, world_to_screen,
};
use super::super::{ForceView, NetworkView, ViewModel, ViewScratch};

const MIN_SCREEN_RADIUS: f32 = 1.5;
const EDGE_WIDTH_SCALE: f32 = 2.0;
const EDGE_COLOR: Color32 = Color32::from_rgba_premultiplied(120, 128, 138, 170);
const NODE_OUTLINE: Color32 = Color32::from_rgba_premultiplied(12, 12, 12, 190);
const SEARCH_BLUE: Color32 = Color32::from_rgb(103, 196, 255);

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

fn draw_tooltip(painter: &Painter, rect: Rect, text: String) {
    painter.text(
        rect.left_top() + vec2(10.0, 10.0),
        Align2::LEFT_TOP,
        text,
        FontId::proportional(13.0),
        Color32::from_gray(240),
    );
}

impl ForceView {
    pub(in crate::app) fn new(simulation: Simulation) -> Self {
        Self {
            simulation,
            pan: Vec2::ZERO,
            zoom: 1.0,
            dragging: None,
            hovered: None,
            view_scratch: ViewScratch {
                screen_positions: Vec::new(),
                screen_radii: Vec::new(),
            },
        }
    }

    pub(in crate::app) fn replace_simulation(&mut self, simulation: Simulation) {
        self.simulation = simulation;
        self.dragging = None;
        self.hovered = None;
    }

    fn update_screen_space(&mut self, rect: Rect) {
        let ViewScratch {
            screen_positions,
            screen_radii,
        } = &mut self.view_scratch;
        screen_positions.clear();
        screen_radii.clear();
        for node in self.simulation.nodes() {
            screen_positions.push(world_to_screen(rect, self.pan, self.zoom, node.position));
            screen_radii.push((node.radius * self.zoom).max(MIN_SCREEN_RADIUS));
        }
    }

    fn begin_frame(&mut self, ui: &mut Ui, live_physics: bool) -> (Rect, Response, Painter) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect, self.pan, self.zoom);

        self.handle_zoom(ui, rect, &response);
        self.update_screen_space(rect);
        self.handle_node_drag(ui, rect, &response);
        self.handle_pan(&response);

        let moving = if live_physics || self.dragging.is_some() {
            self.simulation.step()
        } else {
            false
        };
        if moving || response.dragged() {
            ui.ctx().request_repaint();
        }

        self.update_screen_space(rect);
        (rect, response, painter)
    }

    fn set_cursor(&self, ui: &Ui) {
        let icon = if self.dragging.is_some() {
            egui::CursorIcon::Grabbing
        } else if matches!(self.hovered, Some(HoverTarget::Node(_))) {
            egui::CursorIcon::Grab
        } else if self.hovered.is_some() {
            egui::CursorIcon::PointingHand
        } else {
            return;
        };
        ui.output_mut(|output| output.cursor_icon = icon);
    }
}

impl NetworkView {
    fn search_matches(&self) -> Option<HashSet<usize>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        let matcher = SkimMatcherV2::default();
        Some(
            self.visible
                .characters
                .iter()
                .enumerate()
                .filter(|(_, character)| {
                    fuzzy_match_score(&matcher, &character.name, query).is_some()
                })
                .map(|(index, _)| index)
                .collect(),
        )
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_bubbles(&mut self, ui: &mut Ui) {
        let view = &mut self.bubbles;
        let (rect, response, painter) = view.begin_frame(ui, self.live_physics);
        view.update_hover(rect, &response, None);
        view.set_cursor(ui);

        let guide = Stroke::new(1.0, Color32::from_rgba_unmultiplied(120, 140, 160, 60));
        for target in GROUP_TARGETS {
            let x = world_to_screen(rect, view.pan, view.zoom, vec2(target, 0.0)).x;
            painter.line_segment([egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())], guide);
        }

        let hovered = match view.hovered {
            Some(HoverTarget::Node(node)) => Some(node),
            _ => None,
        };

        for (index, node) in view.simulation.nodes().iter().enumerate() {
            let position = view.view_scratch.screen_positions[index];
            let radius = view.view_scratch.screen_radii[index];
            if !circle_visible(rect, position, radius) {
                continue;
            }

            let color = GROUP_COLOURS
                .get(node.group)
                .copied()
                .map_or(DEFAULT_COLOR, rgb_color);
            painter.circle_filled(position, radius, color);

            let stroke = if hovered == Some(NodeId(index)) {
                Stroke::new(2.0, HIGHLIGHT_RED)
            } else {
                Stroke::new(1.0, NODE_OUTLINE)
            };
            painter.circle_stroke(position, radius, stroke);
        }

        if let Some(node) = hovered.and_then(|id| view.simulation.node(id)) {
            draw_tooltip(
                &painter,
                rect,
                format!("Group {}  |  radius {:.1}", node.group + 1, node.radius),
            );
        }
    }

    pub(in crate::app) fn draw_network(&mut self, ui: &mut Ui) {
        let Some(network) = self.network.as_mut() else {
            ui.label("No character network loaded. Pass --network <JSON> to lay one out.");
            return;
        };

        if network.graph_dirty {
            network.rebuild(&self.config);
        }

        let search_matches = network.search_matches();
        let NetworkView {
            visible,
            scales,
            force,
            include_neighbors,
            ..
        } = network;

        let (rect, response, painter) = force.begin_frame(ui, self.live_physics);

        let zoom_sqrt = force.zoom.sqrt();
        let base_widths = force
            .simulation
            .edges()
            .iter()
            .map(|edge| scales.link_width(f64::from(edge.weight)) * EDGE_WIDTH_SCALE * zoom_sqrt)
            .collect::<Vec<_>>();
        let width_of: &dyn Fn(EdgeId) -> f32 =
            &|edge: EdgeId| base_widths.get(edge.0).copied().unwrap_or(0.0);

        force.update_hover(rect, &response, Some(width_of));
        force.set_cursor(ui);

        let highlight = force.hovered.and_then(|target| {
            AdjacencyHighlight::for_target(&force.simulation, target, *include_neighbors)
        });
        let positions = &force.view_scratch.screen_positions;
        let radii = &force.view_scratch.screen_radii;

        for (index, edge) in force.simulation.edges().iter().enumerate() {
            let id = EdgeId(index);
            let (Some(&start), Some(&end)) =
                (positions.get(edge.source.0), positions.get(edge.target.0))
            else {
                continue;
            };

            let base = width_of(id);
            let stroke = match &highlight {
                Some(state) if state.contains_edge(id) => {
                    Stroke::new(state.edge_width(id, base), HIGHLIGHT_RED)
                }
                Some(_) => Stroke::new(base, dim_color(EDGE_COLOR, 0.5)),
                None => Stroke::new(base, EDGE_COLOR),
            };
            painter.line_segment([start, end], stroke);
        }

        let filtering = highlight.is_some() || search_matches.is_some();
        for (index, character) in visible.characters.iter().enumerate() {
            let (Some(&position), Some(&radius)) = (positions.get(index), radii.get(index)) else {
                continue;
            };
            if !circle_visible(rect, position, radius) {
                continue;
            }

            let id = NodeId(index);
            let related = highlight
                .as_ref()
                .is_some_and(|state| state.contains_node(id));
            let matched = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&index));

            let base_color = character.rgb().map_or(DEFAULT_COLOR, rgb_color);
            let color = if related {
                base_color
            } else if matched {
                blend_color(base_color, SEARCH_BLUE, 0.6)
            } else if filtering {
                dim_color(base_color, 0.45)
            } else {
                base_color
            };
            painter.circle_filled(position, radius, color);

            let stroke = if related {
                Stroke::new(2.0, HIGHLIGHT_RED)
            } else if matched {
                Stroke::new(1.6, SEARCH_BLUE)
            } else {
                Stroke::new(1.0, NODE_OUTLINE)
            };
            painter.circle_stroke(position, radius, stroke);

            if related || matched || radius > 14.0 || force.zoom > 1.6 {
                painter.text(
                    position + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    &character.name,
                    FontId::proportional(12.0),
                    Color32::from_gray(238),
                );
            }
        }

        let tooltip = match force.hovered {
            Some(HoverTarget::Node(node)) => visible
                .characters
                .get(node.0)
                .map(|character| {
                    format!("{}\nNumber of scenes: {}", character.name, character.value)
                }),
            Some(HoverTarget::Edge(edge)) => force.simulation.edge(edge).and_then(|edge| {
                let source = visible.characters.get(edge.source.0)?;
                let target = visible.characters.get(edge.target.0)?;
                Some(format!(
                    "{} - {}\nNumber of scenes together: {}",
                    source.name, target.name, edge.weight
                ))
            }),
            None => None,
        };
        if let Some(text) = tooltip {
            draw_tooltip(&painter, rect, text);
        }
    }
}
