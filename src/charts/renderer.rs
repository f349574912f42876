//! Static Chart Renderer
//! Renders chart data to PNG with plotters, for saving charts to disk.

use crate::charts::builder::ChartError;
use crate::charts::model::{ChartData, Rgb, SeriesStyle};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io::Cursor;
use std::path::Path;

fn to_rgb_color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb[0], rgb[1], rgb[2])
}

pub struct ChartRenderer;

impl ChartRenderer {
    /// Render a chart into PNG bytes.
    pub fn render_png(data: &ChartData, width: u32, height: u32) -> Result<Vec<u8>, ChartError> {
        let mut buffer = vec![0u8; width as usize * height as usize * 3];

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            Self::draw(&root, data).map_err(|e| ChartError::Render(e.to_string()))?;
            root.present()
                .map_err(|e| ChartError::Render(e.to_string()))?;
        }

        let img = image::RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| ChartError::Render("image buffer size mismatch".to_string()))?;

        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
        Ok(png)
    }

    /// Render a chart and write it to `path`.
    pub fn save_png(
        data: &ChartData,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), ChartError> {
        let png = Self::render_png(data, width, height)?;
        std::fs::write(path, png)?;
        tracing::info!(path = %path.display(), width, height, "chart exported");
        Ok(())
    }

    fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        data: &ChartData,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&WHITE)?;

        let (x_range, y_range) = data.bounds();
        let mut chart = ChartBuilder::on(root)
            .caption(&data.title, ("sans-serif", 26))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)?;

        let x_formatter = |x: &f64| data.x_axis.label_at(*x);
        chart
            .configure_mesh()
            .x_desc(data.x_label.as_str())
            .y_desc(data.y_label.as_str())
            .x_label_formatter(&x_formatter)
            .draw()?;

        for series in &data.series {
            let color = to_rgb_color(series.color);

            match series.style {
                SeriesStyle::Line => {
                    chart
                        .draw_series(LineSeries::new(
                            series.points.iter().map(|p| (p[0], p[1])),
                            color.stroke_width(2),
                        ))?
                        .label(series.name.as_str())
                        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
                }
                SeriesStyle::Bars { width } => {
                    let half = width / 2.0;
                    chart
                        .draw_series(series.points.iter().map(|p| {
                            Rectangle::new(
                                [(p[0] - half, 0.0), (p[0] + half, p[1])],
                                color.mix(0.85).filled(),
                            )
                        }))?
                        .label(series.name.as_str())
                        .legend(move |(x, y)| {
                            Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled())
                        });
                }
                SeriesStyle::Markers => {
                    let colors = series.point_colors.as_ref();
                    chart
                        .draw_series(series.points.iter().enumerate().map(|(i, p)| {
                            let shade = colors
                                .and_then(|c| c.get(i))
                                .map(|&c| to_rgb_color(c))
                                .unwrap_or(color);
                            Circle::new((p[0], p[1]), 3, shade.mix(0.8).filled())
                        }))?
                        .label(series.name.as_str())
                        .legend(move |(x, y)| Circle::new((x + 6, y), 4, color.filled()));
                }
            }
        }

        if data.show_legend {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.85))
                .border_style(BLACK)
                .draw()?;
        }

        Ok(())
    }
}
