use eframe::egui::{
    self, Align2, Color32, FontId, Painter, PointerButton, Pos2, Rect, Sense, Shape, Stroke, Ui,
    pos2, vec2,
};
use log::debug;

use force_plot::data::ScatterData;
use force_plot::data::scatter::{Category, MarkerShape};
use force_plot::select::{Highlight, Quadrant, SelectAction, SelectionState};

use super::render_utils::DEFAULT_COLOR;
use super::{ScatterView, ViewModel};

const LEFT_MARGIN: f32 = 52.0;
const BOTTOM_MARGIN: f32 = 36.0;
const TOP_MARGIN: f32 = 16.0;
const RIGHT_MARGIN: f32 = 20.0;
const MARKER_HALF_SIZE: f32 = 4.0;
const HIT_RADIUS: f32 = 9.0;
const AXIS_COLOR: Color32 = Color32::from_gray(200);

pub(super) fn highlight_color(highlight: Highlight) -> Color32 {
    match highlight {
        Highlight::Default => DEFAULT_COLOR,
        Highlight::Reference => Color32::from_rgb(245, 206, 93),
        Highlight::Quadrant(Quadrant::UpperRight) => Color32::from_rgb(231, 88, 76),
        Highlight::Quadrant(Quadrant::UpperLeft) => Color32::from_rgb(84, 168, 240),
        Highlight::Quadrant(Quadrant::LowerLeft) => Color32::from_rgb(112, 201, 112),
        Highlight::Quadrant(Quadrant::LowerRight) => Color32::from_rgb(190, 122, 232),
        Highlight::Neighbor => Color32::from_rgb(255, 152, 62),
    }
}

pub(super) fn draw_marker(painter: &Painter, center: Pos2, shape: MarkerShape, color: Color32) {
    let half = MARKER_HALF_SIZE;
    match shape {
        MarkerShape::Square => {
            painter.rect_filled(
                Rect::from_center_size(center, vec2(half * 2.0, half * 2.0)),
                0.0,
                color,
            );
        }
        MarkerShape::Circle => {
            painter.circle_filled(center, half, color);
        }
        MarkerShape::Triangle => {
            painter.add(Shape::convex_polygon(
                vec![
                    center + vec2(0.0, -half * 1.33),
                    center + vec2(half, half),
                    center + vec2(-half, half),
                ],
                color,
                Stroke::NONE,
            ));
        }
    }
}

impl ScatterView {
    pub(super) fn new(data: ScatterData) -> Self {
        let x_axis = data.x_domain.padded();
        let y_axis = data.y_domain.padded();
        let positions = data.positions();
        let highlights = vec![Highlight::Default; positions.len()];

        Self {
            x_ticks: x_axis.ticks(),
            y_ticks: y_axis.ticks(),
            x_axis,
            y_axis,
            positions,
            selection: SelectionState::None,
            highlights,
            data,
        }
    }

    pub(super) fn select(&mut self, action: SelectAction) {
        self.selection = self.selection.apply(action);
        self.highlights = self.selection.highlights(&self.positions);
        debug!("scatter selection is now {:?}", self.selection);
    }

    fn plot_rect(rect: Rect) -> Rect {
        Rect::from_min_max(
            pos2(rect.left() + LEFT_MARGIN, rect.top() + TOP_MARGIN),
            pos2(rect.right() - RIGHT_MARGIN, rect.bottom() - BOTTOM_MARGIN),
        )
    }

    fn screen_x(&self, plot: Rect, x: f64) -> f32 {
        plot.left() + self.x_axis.normalize(x, f64::from(plot.width())) as f32
    }

    fn screen_y(&self, plot: Rect, y: f64) -> f32 {
        plot.bottom() - self.y_axis.normalize(y, f64::from(plot.height())) as f32
    }

    fn point_at(screen_positions: &[Pos2], pointer: Pos2) -> Option<usize> {
        screen_positions
            .iter()
            .enumerate()
            .map(|(index, position)| (index, position.distance(pointer)))
            .filter(|(_, distance)| *distance <= HIT_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    fn draw_axes(&self, painter: &Painter, plot: Rect) {
        let stroke = Stroke::new(1.0, AXIS_COLOR);
        let font = FontId::proportional(11.0);

        painter.line_segment([plot.left_bottom(), plot.left_top()], stroke);
        painter.line_segment([plot.left_bottom(), plot.right_bottom()], stroke);

        for &value in &self.x_ticks {
            let x = self.screen_x(plot, value);
            painter.line_segment([pos2(x, plot.bottom()), pos2(x, plot.bottom() + 5.0)], stroke);
            painter.text(
                pos2(x, plot.bottom() + 8.0),
                Align2::CENTER_TOP,
                format!("{value:.0}"),
                font.clone(),
                AXIS_COLOR,
            );
        }

        for &value in &self.y_ticks {
            let y = self.screen_y(plot, value);
            painter.line_segment([pos2(plot.left() - 5.0, y), pos2(plot.left(), y)], stroke);
            painter.text(
                pos2(plot.left() - 8.0, y),
                Align2::RIGHT_CENTER,
                format!("{value:.0}"),
                font.clone(),
                AXIS_COLOR,
            );
        }
    }

    fn draw_legend(&self, painter: &Painter, plot: Rect) {
        let origin = plot.right_top() + vec2(-120.0, 12.0);
        for (index, label) in self.data.categories.iter().enumerate() {
            let row = origin + vec2(0.0, index as f32 * 18.0);
            draw_marker(
                painter,
                row,
                MarkerShape::for_category(Category::Known(index)),
                DEFAULT_COLOR,
            );
            painter.text(
                row + vec2(10.0, 0.0),
                Align2::LEFT_CENTER,
                label,
                FontId::proportional(12.0),
                Color32::from_gray(230),
            );
        }
    }

    fn draw(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

        let plot = Self::plot_rect(rect);
        if plot.width() <= 1.0 || plot.height() <= 1.0 {
            return;
        }

        self.draw_axes(&painter, plot);

        let screen_positions = self
            .data
            .points
            .iter()
            .map(|point| pos2(self.screen_x(plot, point.x), self.screen_y(plot, point.y)))
            .collect::<Vec<_>>();

        for ((point, &position), &highlight) in self
            .data
            .points
            .iter()
            .zip(&screen_positions)
            .zip(&self.highlights)
        {
            draw_marker(&painter, position, point.shape(), highlight_color(highlight));
            if highlight == Highlight::Reference {
                painter.circle_stroke(
                    position,
                    MARKER_HALF_SIZE + 4.0,
                    Stroke::new(1.5, highlight_color(Highlight::Reference)),
                );
            }
        }

        self.draw_legend(&painter, plot);

        let hovered = response
            .hover_pos()
            .and_then(|pointer| Self::point_at(&screen_positions, pointer));
        if let Some(index) = hovered {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
            let point = &self.data.points[index];
            painter.text(
                plot.left_top() + vec2(10.0, 4.0),
                Align2::LEFT_TOP,
                format!("{}, {}, {}", point.x, point.y, point.label),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        let clicked = response
            .interact_pointer_pos()
            .and_then(|pointer| Self::point_at(&screen_positions, pointer));
        if let Some(index) = clicked {
            if response.clicked_by(PointerButton::Primary) {
                self.select(SelectAction::Primary(index));
            } else if response.clicked_by(PointerButton::Secondary) {
                self.select(SelectAction::Secondary(index));
            }
        }
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_scatter(&mut self, ui: &mut Ui) {
        let Some(scatter) = self.scatter.as_mut() else {
            ui.label("No scatter data loaded. Pass --scatter <CSV> to plot one.");
            return;
        };
        scatter.draw(ui);
    }
}
