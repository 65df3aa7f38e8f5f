//! Categorical bar charts

use std::path::Path;

use plotters::prelude::*;

use crate::charts::util::{category_label, value_axis_max};
use crate::charts::ChartConfig;
use crate::error::VizError;

/// Create a bar chart with one labelled bar per entry
///
/// # Arguments
/// * `bars` - `(category label, value)` pairs, drawn left to right
/// * `config` - Chart configuration
/// * `output_path` - Output PNG path
pub fn create_bar_chart(
    bars: &[(String, f64)],
    config: &ChartConfig,
    output_path: impl AsRef<Path>,
) -> Result<(), VizError> {
    if bars.is_empty() {
        return Err(VizError::InvalidData(format!("No bars for chart '{}'", config.title)));
    }

    let root = BitMapBackend::new(output_path.as_ref(), (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| VizError::RenderingError(format!("Failed to fill background: {e}")))?;

    let labels: Vec<String> = bars.iter().map(|(label, _)| label.clone()).collect();
    let y_max = value_axis_max(bars.iter().map(|(_, v)| *v), config.y_floor);

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 30).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5..(bars.len() as f64 - 0.5), 0.0..y_max)
        .map_err(|e| VizError::RenderingError(format!("Failed to build chart: {e}")))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(&config.x_label)
        .y_desc(&config.y_label)
        .x_labels(bars.len())
        .x_label_formatter(&|x| category_label(*x, &labels))
        .draw()
        .map_err(|e| VizError::RenderingError(format!("Failed to configure mesh: {e}")))?;

    chart
        .draw_series(bars.iter().enumerate().map(|(idx, (_, value))| {
            let x = idx as f64;
            Rectangle::new([(x - 0.3, 0.0), (x + 0.3, value.max(0.0))], BLUE.filled())
        }))
        .map_err(|e| VizError::RenderingError(format!("Failed to draw bars: {e}")))?;

    root.present()
        .map_err(|e| VizError::ExportFailed(format!("Failed to save chart: {e}")))?;

    Ok(())
}
