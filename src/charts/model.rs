//! Chart model: what the user asked for and what gets drawn.

use std::ops::{Range, RangeInclusive};

/// RGB color shared by the interactive plot and the PNG renderer.
pub type Rgb = [u8; 3];

/// Default series color
pub const PRIMARY_COLOR: Rgb = [52, 152, 219]; // Blue

/// Color palette for categories
pub const PALETTE: [Rgb; 10] = [
    [52, 152, 219],  // Blue
    [231, 76, 60],   // Red
    [46, 204, 113],  // Green
    [155, 89, 182],  // Purple
    [243, 156, 18],  // Orange
    [26, 188, 156],  // Teal
    [233, 30, 99],   // Pink
    [0, 188, 212],   // Cyan
    [121, 85, 72],   // Brown
    [96, 125, 139],  // Blue Grey
];

/// Color for rows whose color value is missing
pub const MISSING_COLOR: Rgb = [180, 180, 180];

/// Continuous color scale stops (dark blue -> magenta -> yellow).
const GRADIENT: [Rgb; 3] = [[13, 8, 135], [204, 71, 120], [240, 249, 33]];

/// Map `t` in [0, 1] onto the continuous color scale.
pub fn gradient_color(t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (GRADIENT.len() - 1) as f64;
    let idx = (scaled.floor() as usize).min(GRADIENT.len() - 2);
    let frac = scaled - idx as f64;
    let (a, b) = (GRADIENT[idx], GRADIENT[idx + 1]);

    let mut out = [0u8; 3];
    for i in 0..3 {
        out[i] = (a[i] as f64 + (b[i] as f64 - a[i] as f64) * frac).round() as u8;
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
    Scatter,
    Histogram,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Scatter,
        ChartKind::Histogram,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line Plot",
            ChartKind::Bar => "Bar Plot",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Histogram => "Histogram",
        }
    }

    /// Columns offered for the X axis.
    pub fn x_options<'a>(&self, columns: &'a [String], numeric: &'a [String]) -> &'a [String] {
        match self {
            ChartKind::Line | ChartKind::Bar => columns,
            ChartKind::Scatter | ChartKind::Histogram => numeric,
        }
    }
}

/// Current chart selections from the dropdowns and slider.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    pub kind: ChartKind,
    pub x_col: String,
    pub y_col: String,
    pub color_col: Option<String>,
    pub hist_col: String,
    pub bins: usize,
}

impl ChartSettings {
    pub fn new(bins: usize) -> Self {
        Self {
            kind: ChartKind::default(),
            x_col: String::new(),
            y_col: String::new(),
            color_col: None,
            hist_col: String::new(),
            bins,
        }
    }

    /// Replace stale selections with the first valid option, as a fresh
    /// dropdown would.
    pub fn reconcile(
        &mut self,
        columns: &[String],
        numeric: &[String],
        bin_range: RangeInclusive<usize>,
    ) {
        Self::pick(&mut self.x_col, self.kind.x_options(columns, numeric));
        Self::pick(&mut self.y_col, numeric);
        Self::pick(&mut self.hist_col, numeric);

        if self
            .color_col
            .as_ref()
            .is_some_and(|c| !columns.contains(c))
        {
            self.color_col = None;
        }

        self.bins = self.bins.clamp(*bin_range.start(), *bin_range.end());
    }

    fn pick(selection: &mut String, options: &[String]) {
        if !options.contains(selection) {
            *selection = options.first().cloned().unwrap_or_default();
        }
    }
}

/// How the X axis is laid out.
#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    Numeric,
    /// Category `i` sits at x = i.
    Categorical(Vec<String>),
}

impl XAxis {
    /// Tick label for an axis position.
    pub fn label_at(&self, x: f64) -> String {
        match self {
            XAxis::Numeric => format_number(x),
            XAxis::Categorical(labels) => {
                if x < -0.5 || (x - x.round()).abs() > 1e-6 {
                    return String::new();
                }
                labels.get(x.round() as usize).cloned().unwrap_or_default()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesStyle {
    Line,
    Bars { width: f64 },
    Markers,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub style: SeriesStyle,
    pub color: Rgb,
    pub points: Vec<[f64; 2]>,
    /// Per-point colors for continuous color scales.
    pub point_colors: Option<Vec<Rgb>>,
}

impl Series {
    pub fn new(name: impl Into<String>, style: SeriesStyle, color: Rgb, points: Vec<[f64; 2]>) -> Self {
        Self {
            name: name.into(),
            style,
            color,
            points,
            point_colors: None,
        }
    }
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_axis: XAxis,
    pub series: Vec<Series>,
    pub show_legend: bool,
}

impl ChartData {
    /// Padded data extents, including bar widths and the bar baseline.
    pub fn bounds(&self) -> (Range<f64>, Range<f64>) {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;

        for series in &self.series {
            let half = match series.style {
                SeriesStyle::Bars { width } => {
                    y_min = y_min.min(0.0);
                    y_max = y_max.max(0.0);
                    width / 2.0
                }
                _ => 0.0,
            };
            for p in &series.points {
                x_min = x_min.min(p[0] - half);
                x_max = x_max.max(p[0] + half);
                y_min = y_min.min(p[1]);
                y_max = y_max.max(p[1]);
            }
        }

        (Self::pad(x_min, x_max), Self::pad(y_min, y_max))
    }

    fn pad(min: f64, max: f64) -> Range<f64> {
        if !min.is_finite() || !max.is_finite() {
            return 0.0..1.0;
        }
        if max - min <= f64::EPSILON {
            return (min - 1.0)..(max + 1.0);
        }
        let pad = (max - min) * 0.05;
        (min - pad)..(max + pad)
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

/// Compact axis number: integers without decimals, others trimmed.
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let formatted = format!("{:.3}", v);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reconcile_picks_first_valid_option() {
        let columns = names(&["city", "temp", "day"]);
        let numeric = names(&["temp", "day"]);

        let mut settings = ChartSettings::new(30);
        settings.reconcile(&columns, &numeric, 5..=100);
        assert_eq!(settings.x_col, "city");
        assert_eq!(settings.y_col, "temp");
        assert_eq!(settings.hist_col, "temp");

        // scatter only allows numeric X
        settings.kind = ChartKind::Scatter;
        settings.reconcile(&columns, &numeric, 5..=100);
        assert_eq!(settings.x_col, "temp");

        // valid selections are kept
        settings.y_col = "day".into();
        settings.reconcile(&columns, &numeric, 5..=100);
        assert_eq!(settings.y_col, "day");
    }

    #[test]
    fn reconcile_clears_stale_color_and_clamps_bins() {
        let columns = names(&["a", "b"]);
        let numeric = names(&["a"]);

        let mut settings = ChartSettings::new(500);
        settings.color_col = Some("gone".into());
        settings.reconcile(&columns, &numeric, 5..=100);
        assert_eq!(settings.color_col, None);
        assert_eq!(settings.bins, 100);

        settings.color_col = Some("b".into());
        settings.bins = 1;
        settings.reconcile(&columns, &numeric, 5..=100);
        assert_eq!(settings.color_col.as_deref(), Some("b"));
        assert_eq!(settings.bins, 5);
    }

    #[test]
    fn reconcile_without_numeric_columns() {
        let columns = names(&["s"]);
        let mut settings = ChartSettings::new(30);
        settings.reconcile(&columns, &[], 5..=100);
        assert_eq!(settings.x_col, "s");
        assert!(settings.y_col.is_empty());
    }

    #[test]
    fn categorical_labels_only_on_integer_positions() {
        let axis = XAxis::Categorical(names(&["a", "b"]));
        assert_eq!(axis.label_at(0.0), "a");
        assert_eq!(axis.label_at(1.0), "b");
        assert_eq!(axis.label_at(0.5), "");
        assert_eq!(axis.label_at(-1.0), "");
        assert_eq!(axis.label_at(2.0), "");
    }

    #[test]
    fn gradient_endpoints() {
        assert_eq!(gradient_color(0.0), GRADIENT[0]);
        assert_eq!(gradient_color(0.5), GRADIENT[1]);
        assert_eq!(gradient_color(1.0), GRADIENT[2]);
        assert_eq!(gradient_color(7.0), GRADIENT[2]);
    }

    #[test]
    fn bounds_include_bar_baseline() {
        let data = ChartData {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            x_axis: XAxis::Numeric,
            series: vec![Series::new(
                "count",
                SeriesStyle::Bars { width: 2.0 },
                PRIMARY_COLOR,
                vec![[1.0, 4.0], [3.0, 8.0]],
            )],
            show_legend: false,
        };
        let (x, y) = data.bounds();
        assert!(x.start < 0.0 && x.end > 4.0);
        assert!(y.start < 0.0 && y.end > 8.0);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.1234), "0.123");
    }
}
