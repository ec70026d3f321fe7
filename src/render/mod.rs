//! Renderer seam
//!
//! Shaping functions validate extracted series and hand them, unmodified, to
//! a [`Renderer`]. The chart type is opaque to this crate.
//!
//! [`TableRenderer`] is the bundled renderer: it packages the series as
//! JSON data tables ready for a Vega-Lite style front end.

mod table;

pub use table::{TableRenderer, TABLEAU_10};

use crate::series::Series;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Display parameters of a density (distribution) chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionOptions {
    /// How many percentile bands to draw around the median.
    pub levels: usize,
    /// Opacity of the innermost band.
    pub alpha: f64,
    /// Height of the detail view.
    pub height: u32,
    /// Width of the visualization.
    pub width: u32,
    /// Height of the view finder.
    pub height_minimap: u32,
}

impl Default for DistributionOptions {
    fn default() -> Self {
        Self {
            levels: 5,
            alpha: 0.6,
            height: 400,
            width: 800,
            height_minimap: 100,
        }
    }
}

/// Uniform jitter amplitudes added to scatter points to spread overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Noise {
    /// Amplitude on the y-axis.
    pub y: f64,
    /// Amplitude on the x-axis.
    pub x: f64,
}

/// Display parameters of a scatter chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterOptions {
    /// Optional jitter; `None` plots exact values.
    pub noise: Option<Noise>,
    /// Height of the detail view.
    pub height: u32,
    /// Width of the visualization.
    pub width: u32,
    /// Height of the view finder.
    pub height_minimap: u32,
}

impl Default for ScatterOptions {
    fn default() -> Self {
        Self {
            noise: None,
            height: 400,
            width: 800,
            height_minimap: 100,
        }
    }
}

/// External chart renderer.
///
/// Called only after validation succeeded: `series` is non-empty and
/// `names[i]` labels `series[i]`.
pub trait Renderer {
    /// Renderable chart object.
    type Chart;

    /// Render a density chart of one or more series.
    ///
    /// # Errors
    ///
    /// Returns error if the renderer cannot build the chart.
    fn density(
        &self,
        series: &[Arc<Series>],
        names: &[String],
        options: &DistributionOptions,
    ) -> Result<Self::Chart>;

    /// Render every series in `series` against the single x-axis series.
    ///
    /// # Errors
    ///
    /// Returns error if the renderer cannot build the chart.
    fn scatter(
        &self,
        series: &[Arc<Series>],
        names: &[String],
        x: &Series,
        x_name: &str,
        options: &ScatterOptions,
    ) -> Result<Self::Chart>;
}
