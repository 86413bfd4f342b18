use anyhow::Result;
use eframe::egui::Vec2;
use log::info;
use serde::Serialize;

use force_plot::data::bubbles::bubble_simulation;
use force_plot::data::{NetworkScales, ScatterData};
use force_plot::sim::Simulation;

use super::{BubbleSettings, LoadRequest, LoadedData, ScatterView};

#[derive(Serialize)]
struct Summary {
    scatter: Option<ScatterSummary>,
    bubbles: LayoutSummary,
    network: Option<LayoutSummary>,
}

#[derive(Serialize)]
struct ScatterSummary {
    points: usize,
    skipped_rows: usize,
    categories: Vec<String>,
    x_domain: [f64; 2],
    y_domain: [f64; 2],
    x_ticks: Vec<f64>,
    y_ticks: Vec<f64>,
}

#[derive(Serialize)]
struct LayoutSummary {
    ticks: usize,
    alpha: f32,
    settled: bool,
    dropped_links: usize,
    nodes: Vec<NodeSummary>,
}

#[derive(Serialize)]
struct NodeSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    group: usize,
    weight: f32,
    radius: f32,
    position: [f32; 2],
}

fn summarize_scatter(data: ScatterData) -> ScatterSummary {
    let view = ScatterView::new(data);
    ScatterSummary {
        points: view.data.points.len(),
        skipped_rows: view.data.skipped,
        categories: view.data.categories.clone(),
        x_domain: [view.x_axis.bounds.min, view.x_axis.bounds.max],
        y_domain: [view.y_axis.bounds.min, view.y_axis.bounds.max],
        x_ticks: view.x_ticks,
        y_ticks: view.y_ticks,
    }
}

/// Ticks until the layout cools or `max_ticks` is reached.
fn settle(
    simulation: &mut Simulation,
    max_ticks: usize,
    names: Option<&[String]>,
    dropped_links: usize,
) -> LayoutSummary {
    let mut ticks = 0;
    while ticks < max_ticks && simulation.is_running() {
        simulation.step();
        ticks += 1;
    }

    let nodes = simulation
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| NodeSummary {
            name: names.and_then(|names| names.get(index).cloned()),
            group: node.group,
            weight: node.weight,
            radius: node.radius,
            position: [node.position.x, node.position.y],
        })
        .collect();

    LayoutSummary {
        ticks,
        alpha: simulation.alpha(),
        settled: !simulation.is_running(),
        dropped_links: dropped_links + simulation.dropped_edges(),
        nodes,
    }
}

/// Lays everything out without a window and prints a JSON summary to stdout.
pub fn run_headless(request: &LoadRequest, bubbles: BubbleSettings, max_ticks: usize) -> Result<()> {
    let LoadedData {
        scatter,
        network,
        config,
    } = request.load()?;

    let mut bubble_layout = bubble_simulation(bubbles.count, bubbles.seed, &config);
    let bubbles = settle(&mut bubble_layout, max_ticks, None, 0);
    info!("bubble layout ran {} ticks", bubbles.ticks);

    let network = network.map(|graph| {
        let scales = NetworkScales::for_graph(&graph);
        let mut layout =
            graph.build_simulation(&scales, &config, Vec2::ZERO, &Default::default());
        let names = graph
            .characters
            .iter()
            .map(|character| character.name.clone())
            .collect::<Vec<_>>();
        let summary = settle(&mut layout, max_ticks, Some(&names), graph.dropped_links);
        info!("network layout ran {} ticks", summary.ticks);
        summary
    });

    let summary = Summary {
        scatter: scatter.map(summarize_scatter),
        bubbles,
        network,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
