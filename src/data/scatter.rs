use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};

use crate::scale::Domain;

/// Number of category labels that get their own marker shape.
pub const MAX_CATEGORIES: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Index into [`ScatterData::categories`].
    Known(usize),
    /// Empty label, or a label seen after the first three.
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerShape {
    Square,
    Circle,
    Triangle,
}

impl MarkerShape {
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Known(0) => Self::Square,
            Category::Known(1) => Self::Circle,
            _ => Self::Triangle,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub category: Category,
    pub label: String,
}

impl Point {
    pub fn position(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    pub fn shape(&self) -> MarkerShape {
        MarkerShape::for_category(self.category)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScatterData {
    pub points: Vec<Point>,
    /// First distinct non-empty labels, in first-seen order.
    pub categories: Vec<String>,
    pub x_domain: Domain,
    pub y_domain: Domain,
    /// Rows dropped because x or y did not parse.
    pub skipped: usize,
}

impl ScatterData {
    pub fn positions(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(Point::position).collect()
    }
}

fn parse_coordinate(record: &StringRecord, column: usize) -> Option<f64> {
    record
        .get(column)
        .and_then(|field| field.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Parses `x,y,category` rows after a header row.
///
/// Rows whose x or y is not a finite number are counted and skipped.
pub fn parse_scatter<R: Read>(reader: R) -> ScatterData {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut points = Vec::new();
    let mut categories: Vec<String> = Vec::new();
    let mut skipped = 0usize;

    for (row, result) in csv_reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(error) => {
                debug!("skipping unreadable row {}: {error}", row + 1);
                skipped += 1;
                continue;
            }
        };

        let (Some(x), Some(y)) = (parse_coordinate(&record, 0), parse_coordinate(&record, 1))
        else {
            debug!("skipping row {} with non-numeric coordinates", row + 1);
            skipped += 1;
            continue;
        };

        let label = record.get(2).unwrap_or_default().to_owned();
        let category = if label.is_empty() {
            Category::Other
        } else if let Some(index) = categories.iter().position(|known| known == &label) {
            Category::Known(index)
        } else if categories.len() < MAX_CATEGORIES {
            categories.push(label.clone());
            Category::Known(categories.len() - 1)
        } else {
            Category::Other
        };

        points.push(Point {
            x,
            y,
            category,
            label,
        });
    }

    let x_domain = Domain::from_values(points.iter().map(|point| point.x));
    let y_domain = Domain::from_values(points.iter().map(|point| point.y));

    ScatterData {
        points,
        categories,
        x_domain,
        y_domain,
        skipped,
    }
}

pub fn parse_scatter_str(text: &str) -> ScatterData {
    parse_scatter(text.as_bytes())
}

pub fn load_scatter(path: &Path) -> Result<ScatterData> {
    let file = File::open(path)
        .with_context(|| format!("failed to open scatter data {}", path.display()))?;
    let data = parse_scatter(file);
    info!(
        "loaded {} points ({} skipped) from {}",
        data.points.len(),
        data.skipped,
        path.display()
    );
    Ok(data)
}
