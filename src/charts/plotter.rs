//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::charts::model::{ChartData, Rgb, SeriesStyle, XAxis};
use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};
use std::collections::HashMap;

pub fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// Group points by color, keeping the order in which each color first appears.
fn batch_by_color(points: &[[f64; 2]], colors: &[Rgb]) -> Vec<(Rgb, Vec<[f64; 2]>)> {
    let mut batches: Vec<(Rgb, Vec<[f64; 2]>)> = Vec::new();
    let mut slot: HashMap<Rgb, usize> = HashMap::new();
    for (point, rgb) in points.iter().zip(colors) {
        match slot.get(rgb) {
            Some(&i) => batches[i].1.push(*point),
            None => {
                slot.insert(*rgb, batches.len());
                batches.push((*rgb, vec![*point]));
            }
        }
    }
    batches
}

/// Draws chart data into an interactive egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn draw(ui: &mut egui::Ui, chart_data: &ChartData, height: f32) {
        let mut plot = Plot::new(format!("chart_{}", chart_data.title))
            .height(height)
            .allow_scroll(false)
            .x_axis_label(chart_data.x_label.clone())
            .y_axis_label(chart_data.y_label.clone());

        if chart_data.show_legend {
            plot = plot.legend(Legend::default());
        }

        if let XAxis::Categorical(_) = &chart_data.x_axis {
            let axis = chart_data.x_axis.clone();
            plot = plot.x_axis_formatter(move |mark, _range| axis.label_at(mark.value));
        }

        plot.show(ui, |plot_ui| {
            for series in &chart_data.series {
                let color = to_color32(series.color);

                match series.style {
                    SeriesStyle::Line => {
                        plot_ui.line(
                            Line::new(PlotPoints::from(series.points.clone()))
                                .color(color)
                                .width(2.0)
                                .name(&series.name),
                        );
                    }
                    SeriesStyle::Bars { width } => {
                        let bars: Vec<Bar> = series
                            .points
                            .iter()
                            .map(|p| Bar::new(p[0], p[1]).width(width).fill(color))
                            .collect();
                        plot_ui.bar_chart(BarChart::new(bars).color(color).name(&series.name));
                    }
                    SeriesStyle::Markers => match &series.point_colors {
                        None => {
                            plot_ui.points(
                                Points::new(PlotPoints::from(series.points.clone()))
                                    .radius(3.5)
                                    .color(color)
                                    .name(&series.name),
                            );
                        }
                        Some(colors) => {
                            // egui_plot colors whole point sets, so batch by shade
                            for (rgb, points) in batch_by_color(&series.points, colors) {
                                plot_ui.points(
                                    Points::new(PlotPoints::from(points))
                                        .radius(3.5)
                                        .color(to_color32(rgb)),
                                );
                            }
                        }
                    },
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_batches_follow_first_appearance() {
        let points = [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let colors = [[9, 9, 9], [1, 1, 1], [9, 9, 9], [5, 5, 5]];

        for _ in 0..5 {
            let batches = batch_by_color(&points, &colors);
            assert_eq!(
                batches,
                vec![
                    ([9, 9, 9], vec![[0.0, 0.0], [2.0, 2.0]]),
                    ([1, 1, 1], vec![[1.0, 1.0]]),
                    ([5, 5, 5], vec![[3.0, 3.0]]),
                ]
            );
        }
    }
}
