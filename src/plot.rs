//! Text line charts, used to show the loss history at the end of a training.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols::Marker,
    text::Span,
    widgets::{Axis, Chart, Dataset, GraphType, Widget},
};

const MIN_HEIGHT: u16 = 4;
const MIN_PLOT_WIDTH: usize = 20;
const MAX_PLOT_WIDTH: usize = 100;

/// Renders `values` as a line chart `height` rows tall.
///
/// The y axis is labeled with the minimum and the maximum, the x axis with the first and last
/// index. Values that are not finite are left out.
///
/// # Returns
/// The chart's rows joined by newlines, or an empty string if there's nothing to plot.
pub fn render(values: &[f32], height: u16) -> String {
    let points: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| (i as f64, v as f64))
        .collect();

    let Some((min, max)) = bounds(&points) else {
        return String::new();
    };

    let last = values.len().saturating_sub(1);
    let x_bounds = [0., last.max(1) as f64];
    let y_bounds = if max > min {
        [min, max]
    } else {
        [min - 1., max + 1.]
    };

    let min_label = format!("{min:.4e}");
    let max_label = format!("{max:.4e}");
    let label_width = min_label.len().max(max_label.len());

    let dataset = Dataset::default()
        .marker(Marker::Dot)
        .graph_type(GraphType::Line)
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .x_axis(
            Axis::default()
                .bounds(x_bounds)
                .labels(vec![Span::raw("0"), Span::raw(last.to_string())]),
        )
        .y_axis(
            Axis::default()
                .bounds(y_bounds)
                .labels(vec![Span::raw(min_label), Span::raw(max_label)]),
        );

    let plot_width = values.len().clamp(MIN_PLOT_WIDTH, MAX_PLOT_WIDTH);
    let width = (label_width + 2 + plot_width) as u16;
    let area = Rect::new(0, 0, width, height.max(MIN_HEIGHT));

    let mut buf = Buffer::empty(area);
    chart.render(area, &mut buf);
    to_text(&buf)
}

fn bounds(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    points.iter().fold(None, |acc, &(_, y)| match acc {
        None => Some((y, y)),
        Some((lo, hi)) => Some((f64::min(lo, y), f64::max(hi, y))),
    })
}

fn to_text(buf: &Buffer) -> String {
    let width = buf.area.width as usize;
    buf.content()
        .chunks(width)
        .map(|row| {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_renders_nothing() {
        assert_eq!(render(&[], 5), "");
        assert_eq!(render(&[f32::NAN], 5), "");
    }

    #[test]
    fn one_row_per_unit_of_height() {
        let chart = render(&[4., 2., 1., 0.5], 10);
        assert_eq!(chart.lines().count(), 10);

        let short = render(&[4., 2.], 1);
        assert_eq!(short.lines().count(), MIN_HEIGHT as usize);
    }

    #[test]
    fn y_axis_is_labeled_with_the_extremes() {
        let chart = render(&[4., 2., 1., 0.5], 10);

        assert!(chart.contains("4.0000e0"));
        assert!(chart.contains("5.0000e-1"));
        assert!(chart.contains('•'));
    }

    #[test]
    fn non_finite_values_are_skipped() {
        let chart = render(&[3., f32::INFINITY, 1.], 8);

        assert!(chart.contains("3.0000e0"));
        assert!(chart.contains("1.0000e0"));
        assert!(!chart.contains("inf"));
    }

    #[test]
    fn flat_series_still_renders() {
        let chart = render(&[7., 7., 7.], 6);
        assert!(chart.contains("7.0000e0"));
        assert!(chart.contains('•'));
    }
}
