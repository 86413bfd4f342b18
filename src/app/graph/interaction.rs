use eframe::egui::{self, PointerButton, Pos2, Rect, Ui};
use log::debug;

use force_plot::select::HoverTarget;
use force_plot::sim::{DragCommand, EdgeId, NodeId};

use super::super::ForceView;
use super::super::render_utils::{circle_visible, distance_to_segment, screen_to_world};

const EDGE_HIT_SLOP: f32 = 3.0;

impl ForceView {
    pub(in crate::app) fn handle_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.05, 6.0);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    pub(in crate::app) fn handle_pan(&mut self, response: &egui::Response) {
        let primary_pan = response.dragged_by(PointerButton::Primary) && self.dragging.is_none();
        if primary_pan
            || response.dragged_by(PointerButton::Secondary)
            || response.dragged_by(PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    pub(in crate::app) fn handle_node_drag(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if self.dragging.is_none()
            && response.drag_started_by(PointerButton::Primary)
            && let Some(origin) = ui.input(|input| input.pointer.press_origin())
            && let Some(node) = self.node_at(rect, origin)
        {
            let world = screen_to_world(rect, self.pan, self.zoom, origin);
            self.simulation.apply(DragCommand::Start(node, world));
            self.dragging = Some(node);
            debug!("drag started on node {}", node.0);
        }

        let Some(node) = self.dragging else {
            return;
        };

        if response.dragged_by(PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            let world = screen_to_world(rect, self.pan, self.zoom, pointer);
            self.simulation.apply(DragCommand::Move(node, world));
        }

        let released = !ui.input(|input| input.pointer.primary_down());
        if response.drag_stopped() || released {
            self.simulation.apply(DragCommand::End(node));
            self.dragging = None;
            debug!("drag ended on node {}", node.0);
        }
    }

    pub(in crate::app) fn node_at(&self, rect: Rect, pointer: Pos2) -> Option<NodeId> {
        let positions = &self.view_scratch.screen_positions;
        let radii = &self.view_scratch.screen_radii;
        (0..positions.len())
            .filter(|&index| circle_visible(rect, positions[index], radii[index]))
            .filter_map(|index| {
                let distance = positions[index].distance(pointer);
                (distance <= radii[index]).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| NodeId(index))
    }

    pub(in crate::app) fn edge_at(
        &self,
        pointer: Pos2,
        width_of: impl Fn(EdgeId) -> f32,
    ) -> Option<EdgeId> {
        let positions = &self.view_scratch.screen_positions;
        self.simulation
            .edges()
            .iter()
            .enumerate()
            .filter_map(|(index, edge)| {
                let start = *positions.get(edge.source.0)?;
                let end = *positions.get(edge.target.0)?;
                let id = EdgeId(index);
                let distance = distance_to_segment(pointer, start, end);
                (distance <= width_of(id) * 0.5 + EDGE_HIT_SLOP).then_some((id, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    pub(in crate::app) fn update_hover(
        &mut self,
        rect: Rect,
        response: &egui::Response,
        width_of: Option<&dyn Fn(EdgeId) -> f32>,
    ) {
        if let Some(node) = self.dragging {
            self.hovered = Some(HoverTarget::Node(node));
            return;
        }

        self.hovered = response.hover_pos().and_then(|pointer| {
            self.node_at(rect, pointer)
                .map(HoverTarget::Node)
                .or_else(|| {
                    width_of.and_then(|width_of| {
                        self.edge_at(pointer, width_of).map(HoverTarget::Edge)
                    })
                })
        });
    }
}
