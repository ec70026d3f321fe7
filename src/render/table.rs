//! JSON data-table renderer

use super::{DistributionOptions, Renderer, ScatterOptions};
use crate::series::{Series, MEDIAN_COLUMN, STEP_COLUMN};
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Layer colours, assigned in series order and wrapping after ten.
pub const TABLEAU_10: [&str; 10] = [
    "#4c78a8", "#f58518", "#e45756", "#72b7b2", "#54a24b", "#eeca3b", "#b279a2", "#ff9da6",
    "#9d755d", "#bab0ac",
];

/// Renders series as JSON data tables, one layer per series.
///
/// Density layers carry rows `{step, v1..v9}` plus the percentile bands to
/// shade; scatter layers carry rows `{step, x, y}` built from the median
/// columns, joined on step.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRenderer {
    seed: Option<u64>,
}

impl TableRenderer {
    /// Create a renderer with entropy-seeded jitter.
    #[must_use]
    pub const fn new() -> Self {
        Self { seed: None }
    }

    /// Create a renderer whose scatter jitter is reproducible.
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    fn rng(&self) -> StdRng {
        self.seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }
}

fn color(index: usize) -> &'static str {
    TABLEAU_10[index % TABLEAU_10.len()]
}

fn density_rows(series: &Series) -> Vec<Value> {
    series
        .rows()
        .iter()
        .map(|row| {
            let mut values = Map::new();
            values.insert("step".to_string(), json!(row[STEP_COLUMN]));
            for (j, v) in row.iter().enumerate().skip(1) {
                values.insert(format!("v{j}"), json!(v));
            }
            Value::Object(values)
        })
        .collect()
}

impl Renderer for TableRenderer {
    type Chart = Value;

    fn density(
        &self,
        series: &[Arc<Series>],
        names: &[String],
        options: &DistributionOptions,
    ) -> Result<Value> {
        if !(1..=MEDIAN_COLUMN).contains(&options.levels) {
            return Err(Error::InvalidInput(format!(
                "levels must be between 1 and {MEDIAN_COLUMN}, got {}",
                options.levels
            )));
        }

        // Band i spans v(5-i)..v(5+i) at opacity alpha^i
        let bands: Vec<Value> = (1..options.levels)
            .map(|i| {
                json!({
                    "lower": format!("v{}", MEDIAN_COLUMN - i),
                    "upper": format!("v{}", MEDIAN_COLUMN + i),
                    "opacity": options.alpha.powi(i32::try_from(i).unwrap_or(i32::MAX)),
                })
            })
            .collect();

        let layers: Vec<Value> = series
            .iter()
            .zip(names)
            .enumerate()
            .map(|(i, (s, name))| {
                json!({
                    "name": name,
                    "color": color(i),
                    "bands": bands,
                    "values": density_rows(s),
                })
            })
            .collect();

        Ok(json!({
            "mark": "density",
            "width": options.width,
            "height": options.height,
            "height_minimap": options.height_minimap,
            "layers": layers,
        }))
    }

    fn scatter(
        &self,
        series: &[Arc<Series>],
        names: &[String],
        x: &Series,
        x_name: &str,
        options: &ScatterOptions,
    ) -> Result<Value> {
        if options.height == 0 {
            return Err(Error::InvalidInput("height must be positive".to_string()));
        }

        let x_by_step: FxHashMap<u64, f64> = x
            .rows()
            .iter()
            .map(|row| (row[STEP_COLUMN].to_bits(), row[MEDIAN_COLUMN]))
            .collect();

        let mut rng = self.rng();
        let mut layers = Vec::with_capacity(series.len());
        for (i, (s, name)) in series.iter().zip(names).enumerate() {
            let mut values = Vec::with_capacity(s.len());
            for row in s.rows() {
                let Some(&x_value) = x_by_step.get(&row[STEP_COLUMN].to_bits()) else {
                    continue;
                };
                let (nx, ny) = options
                    .noise
                    .map_or((0.0, 0.0), |n| (rng.gen::<f64>() * n.x, rng.gen::<f64>() * n.y));
                values.push(json!({
                    "step": row[STEP_COLUMN],
                    "x": x_value + nx,
                    "y": row[MEDIAN_COLUMN] + ny,
                }));
            }
            layers.push(json!({
                "name": name,
                "color": color(i),
                "values": values,
            }));
        }

        let minimap_width =
            f64::from(options.width) * f64::from(options.height_minimap) / f64::from(options.height);

        Ok(json!({
            "mark": "scatter",
            "x_name": x_name,
            "width": options.width,
            "height": options.height,
            "height_minimap": options.height_minimap,
            "minimap_width": minimap_width,
            "layers": layers,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Noise;

    fn series(points: &[(u64, f64)]) -> Arc<Series> {
        Arc::new(
            Series::from_samples(points.iter().map(|(s, v)| (*s, std::slice::from_ref(v))))
                .unwrap(),
        )
    }

    #[test]
    fn test_density_layers_and_bands() {
        let renderer = TableRenderer::new();
        let chart = renderer
            .density(
                &[series(&[(0, 1.0), (1, 2.0)])],
                &["loss".to_string()],
                &DistributionOptions::default(),
            )
            .unwrap();

        let layer = &chart["layers"][0];
        assert_eq!(layer["name"], "loss");
        assert_eq!(layer["color"], TABLEAU_10[0]);
        assert_eq!(layer["values"].as_array().unwrap().len(), 2);
        assert_eq!(layer["values"][1]["v9"], 2.0);
        assert_eq!(layer["bands"].as_array().unwrap().len(), 4);
        assert_eq!(layer["bands"][3]["lower"], "v1");
    }

    #[test]
    fn test_density_rejects_bad_levels() {
        let options = DistributionOptions {
            levels: 6,
            ..DistributionOptions::default()
        };
        let result = TableRenderer::new().density(&[series(&[(0, 1.0)])], &["a".into()], &options);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_scatter_joins_on_step() {
        let y = series(&[(0, 10.0), (1, 11.0), (2, 12.0)]);
        let x = series(&[(1, 1.0), (2, 2.0), (3, 3.0)]);
        let chart = TableRenderer::new()
            .scatter(&[y], &["y".into()], &x, "x", &ScatterOptions::default())
            .unwrap();

        let values = chart["layers"][0]["values"].as_array().unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0]["x"], 1.0);
        assert_eq!(values[0]["y"], 11.0);
        assert_eq!(chart["minimap_width"], 200.0);
    }

    #[test]
    fn test_scatter_noise_is_bounded_and_seeded() {
        let y = series(&[(0, 0.0), (1, 0.0)]);
        let x = series(&[(0, 0.0), (1, 0.0)]);
        let options = ScatterOptions {
            noise: Some(Noise { y: 0.5, x: 0.25 }),
            ..ScatterOptions::default()
        };

        let render = |seed| {
            TableRenderer::with_seed(seed)
                .scatter(&[Arc::clone(&y)], &["y".into()], &x, "x", &options)
                .unwrap()
        };
        let a = render(7);
        assert_eq!(a, render(7));

        for point in a["layers"][0]["values"].as_array().unwrap() {
            let (px, py) = (point["x"].as_f64().unwrap(), point["y"].as_f64().unwrap());
            assert!((0.0..0.25).contains(&px));
            assert!((0.0..0.5).contains(&py));
        }
    }
}
