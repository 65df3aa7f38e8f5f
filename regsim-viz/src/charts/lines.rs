//! Line charts of a metric against the counter count

use std::path::Path;

use plotters::prelude::*;

use crate::charts::util::{integer_label, value_axis_max, x_bounds};
use crate::charts::ChartConfig;
use crate::error::VizError;

/// Create a line chart with a marker at each point
///
/// Points are drawn in the given order.
pub fn create_line_chart(
    points: &[(f64, f64)],
    config: &ChartConfig,
    output_path: impl AsRef<Path>,
) -> Result<(), VizError> {
    if points.is_empty() {
        return Err(VizError::InvalidData(format!("No points for chart '{}'", config.title)));
    }

    let root = BitMapBackend::new(output_path.as_ref(), (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| VizError::RenderingError(format!("Failed to fill background: {e}")))?;

    let (x_lo, x_hi) = x_bounds(points.iter().map(|(x, _)| *x));
    let y_max = value_axis_max(points.iter().map(|(_, y)| *y), config.y_floor);

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 30).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, 0.0..y_max)
        .map_err(|e| VizError::RenderingError(format!("Failed to build chart: {e}")))?;

    chart
        .configure_mesh()
        .x_desc(&config.x_label)
        .y_desc(&config.y_label)
        .x_label_formatter(&|x| integer_label(*x))
        .draw()
        .map_err(|e| VizError::RenderingError(format!("Failed to configure mesh: {e}")))?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), RED.stroke_width(2)))
        .map_err(|e| VizError::RenderingError(format!("Failed to draw line: {e}")))?;
    chart
        .draw_series(points.iter().map(|&(x, y)| Circle::new((x, y), 4, RED.filled())))
        .map_err(|e| VizError::RenderingError(format!("Failed to draw markers: {e}")))?;

    root.present()
        .map_err(|e| VizError::ExportFailed(format!("Failed to save chart: {e}")))?;

    Ok(())
}
