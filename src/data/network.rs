use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::Vec2;
use log::{info, warn};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::scale::LinearScale;
use crate::sim::{EdgeSpec, Forces, NodeSpec, Simulation, SimulationConfig};

pub const NODE_RADIUS_RANGE: (f64, f64) = (3.0, 15.0);
pub const LINK_WIDTH_RANGE: (f64, f64) = (0.25, 1.25);
/// Collision radius relative to the drawn node radius.
pub const COLLIDE_SCALE: f32 = 3.0;

fn default_colour() -> String {
    "#808080".to_owned()
}

fn default_link_value() -> f64 {
    1.0
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Character {
    pub name: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default = "default_colour")]
    pub colour: String,
    #[serde(default)]
    pub episode: Option<u32>,
}

impl Character {
    /// `#rrggbb` or `#rgb` colour as RGB bytes.
    pub fn rgb(&self) -> Option<[u8; 3]> {
        parse_hex_colour(&self.colour)
    }
}

fn parse_hex_colour(text: &str) -> Option<[u8; 3]> {
    let hex = text.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        6 => {
            let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
            Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
        }
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, digit) in rgb.iter_mut().zip(hex.chars()) {
                let value = digit.to_digit(16)? as u8;
                *slot = value * 17;
            }
            Some(rgb)
        }
        _ => None,
    }
}

/// A link endpoint given either as a node index or a node name.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum LinkEnd {
    Index(usize),
    Name(String),
    Invalid(IgnoredAny),
}

#[derive(Debug, Deserialize)]
struct RawLink {
    source: LinkEnd,
    target: LinkEnd,
    #[serde(default = "default_link_value")]
    value: f64,
}

#[derive(Debug, Deserialize)]
struct NetworkFile {
    nodes: Vec<Character>,
    #[serde(default)]
    links: Vec<RawLink>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interaction {
    pub source: usize,
    pub target: usize,
    pub value: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CharacterGraph {
    pub characters: Vec<Character>,
    pub interactions: Vec<Interaction>,
    /// Links dropped because an endpoint did not resolve to a character.
    pub dropped_links: usize,
}

impl CharacterGraph {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let file: NetworkFile =
            serde_json::from_str(text).context("invalid character network JSON")?;
        Ok(Self::resolve(file))
    }

    fn resolve(file: NetworkFile) -> Self {
        let index_by_name = file
            .nodes
            .iter()
            .enumerate()
            .map(|(index, character)| (character.name.as_str(), index))
            .collect::<HashMap<_, _>>();
        let node_count = file.nodes.len();
        let lookup = |end: &LinkEnd| match end {
            LinkEnd::Index(index) => Some(*index).filter(|&index| index < node_count),
            LinkEnd::Name(name) => index_by_name.get(name.as_str()).copied(),
            LinkEnd::Invalid(_) => None,
        };

        let mut dropped_links = 0usize;
        let mut interactions = Vec::with_capacity(file.links.len());
        for link in &file.links {
            match (lookup(&link.source), lookup(&link.target)) {
                (Some(source), Some(target)) => interactions.push(Interaction {
                    source,
                    target,
                    value: link.value,
                }),
                _ => dropped_links += 1,
            }
        }
        if dropped_links > 0 {
            warn!("dropped {dropped_links} links referring to unknown characters");
        }

        Self {
            characters: file.nodes,
            interactions,
            dropped_links,
        }
    }

    /// Distinct episode numbers present in the data, ascending.
    pub fn episodes(&self) -> Vec<u32> {
        self.characters
            .iter()
            .filter_map(|character| character.episode)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Characters from the selected episodes up to `max_episode`, with the
    /// links whose endpoints both survive.
    ///
    /// Characters without an episode tag are always kept.
    pub fn filter_episodes(&self, selected: &BTreeSet<u32>, max_episode: u32) -> Self {
        let mut remap = vec![None; self.characters.len()];
        let mut characters = Vec::new();
        for (index, character) in self.characters.iter().enumerate() {
            let keep = match character.episode {
                Some(episode) => selected.contains(&episode) && episode <= max_episode,
                None => true,
            };
            if keep {
                remap[index] = Some(characters.len());
                characters.push(character.clone());
            }
        }

        let interactions = self
            .interactions
            .iter()
            .filter_map(|link| {
                Some(Interaction {
                    source: remap[link.source]?,
                    target: remap[link.target]?,
                    value: link.value,
                })
            })
            .collect();

        Self {
            characters,
            interactions,
            dropped_links: self.dropped_links,
        }
    }

    /// Builds a layout for this graph. Characters found in `prior` start
    /// where they were; the rest start on the spiral around `center`.
    pub fn build_simulation(
        &self,
        scales: &NetworkScales,
        config: &SimulationConfig,
        center: Vec2,
        prior: &HashMap<String, Vec2>,
    ) -> Simulation {
        let nodes = self
            .characters
            .iter()
            .map(|character| {
                let spec = NodeSpec::new(
                    character.value as f32,
                    scales.node_radius(character.value),
                    0,
                );
                match prior.get(&character.name) {
                    Some(&position) => spec.at(position),
                    None => spec,
                }
            })
            .collect();
        let edges = self
            .interactions
            .iter()
            .map(|link| EdgeSpec {
                source: link.source,
                target: link.target,
                weight: link.value as f32,
            })
            .collect();

        Simulation::new(
            nodes,
            edges,
            Forces::network(config, center, COLLIDE_SCALE),
            config,
        )
    }
}

/// Value-driven sizes, computed once over the unfiltered graph so filtering
/// does not rescale what stays on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NetworkScales {
    node_radius: LinearScale,
    link_width: LinearScale,
}

impl NetworkScales {
    pub fn for_graph(graph: &CharacterGraph) -> Self {
        Self {
            node_radius: LinearScale::from_extent(
                graph.characters.iter().map(|character| character.value),
                NODE_RADIUS_RANGE,
            ),
            link_width: LinearScale::from_extent(
                graph.interactions.iter().map(|link| link.value),
                LINK_WIDTH_RANGE,
            ),
        }
    }

    pub fn node_radius(&self, value: f64) -> f32 {
        self.node_radius.scale(value) as f32
    }

    pub fn link_width(&self, value: f64) -> f32 {
        self.link_width.scale(value) as f32
    }
}

pub fn load_network(path: &Path) -> Result<CharacterGraph> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read character network {}", path.display()))?;
    let graph = CharacterGraph::from_json_str(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    info!(
        "loaded {} characters and {} interactions from {}",
        graph.characters.len(),
        graph.interactions.len(),
        path.display()
    );
    Ok(graph)
}
