use std::path::Path;

use plotters::prelude::*;

use crate::error::{Result, SimError};
use crate::simulation::SimulationResult;

fn chart_err<E: std::fmt::Display>(e: E) -> SimError {
    SimError::Chart(e.to_string())
}

/// Value range covering both responses, padded so neither curve touches the frame.
pub fn output_range(result: &SimulationResult) -> (f64, f64) {
    let (lo, hi) = result
        .output_before()
        .iter()
        .chain(result.output_after())
        .fold((0.0_f64, 1.0_f64), |(lo, hi), &y| (lo.min(y), hi.max(y)));
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

/// Draws open-loop and closed-loop responses against time into a PNG.
pub fn render_step_response(result: &SimulationResult, path: &Path) -> Result<()> {
    if result.is_empty() {
        return Err(SimError::NoResult);
    }
    let t_end = result.time()[result.len() - 1];
    let (y_min, y_max) = output_range(result);

    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Step Response", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..t_end.max(f64::EPSILON), y_min..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Output")
        .draw()
        .map_err(chart_err)?;

    let time = result.time();
    chart
        .draw_series(LineSeries::new(
            time.iter().copied().zip(result.output_before().iter().copied()),
            &BLUE,
        ))
        .map_err(chart_err)?
        .label("Without PID")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .draw_series(LineSeries::new(
            time.iter().copied().zip(result.output_after().iter().copied()),
            &RED,
        ))
        .map_err(chart_err)?
        .label("With PID")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}
