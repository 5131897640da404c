//! Plotters-powered forecast chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - dashed line series and a legend out of the box
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::element::DashedPathElement;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Dash and gap length of the forecast line, in backend pixels (4 per cell).
const DASH_LEN: i32 = 4;
const DASH_GAP: i32 = 4;

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call so `render()`
/// only draws.
pub struct ForecastPlottersChart<'a> {
    /// Historical totals, drawn as a solid line with markers.
    pub historical: &'a [(f64, f64)],
    /// Forecast values, drawn as a dashed line with markers.
    pub forecast: &'a [(f64, f64)],
    /// X bounds (years).
    pub x_bounds: [f64; 2],
    /// Y bounds (Mt).
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Formatting of tick labels.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for ForecastPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(6)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let historical_color = RGBColor(0, 255, 255); // cyan
            let forecast_color = RGBColor(255, 165, 0); // orange

            chart
                .draw_series(LineSeries::new(self.historical.iter().copied(), &historical_color))?
                .label("Historical")
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 12, y)], historical_color));

            chart
                .draw_series(DashedLineSeries::new(
                    self.forecast.iter().copied(),
                    DASH_LEN,
                    DASH_GAP,
                    ShapeStyle::from(&forecast_color),
                ))?
                .label("Forecast")
                .legend(move |(x, y)| {
                    DashedPathElement::new(vec![(x, y), (x + 3 * DASH_LEN, y)], DASH_LEN, DASH_GAP, forecast_color)
                });

            // Markers. `Circle` radii are mapped incorrectly by the terminal
            // backend (pixel radius -> normalized canvas units), so a colored
            // `Pixel` stands in for a marker dot.
            chart.draw_series(
                self.historical
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), WHITE)),
            )?;
            chart.draw_series(
                self.forecast
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), WHITE)),
            )?;

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .label_font(("sans-serif", 10).into_font().color(&WHITE))
                .border_style(&WHITE)
                .draw()?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Axis bounds covering both series, with 5% vertical padding.
pub fn series_bounds(historical: &[(f64, f64)], forecast: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in historical.iter().chain(forecast) {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if !x_min.is_finite() || !x_max.is_finite() || x_max <= x_min {
        x_min = 2000.0;
        x_max = 2040.0;
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    }
    if y_max <= y_min {
        y_min -= 0.5;
        y_max += 0.5;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    ([x_min - 0.5, x_max + 0.5], [y_min - pad, y_max + pad])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart<'a>(hist: &'a [(f64, f64)], fore: &'a [(f64, f64)]) -> ForecastPlottersChart<'a> {
        let (x_bounds, y_bounds) = series_bounds(hist, fore);
        ForecastPlottersChart {
            historical: hist,
            forecast: fore,
            x_bounds,
            y_bounds,
            x_label: "Year",
            y_label: "CO₂ Emissions (Mt)",
            fmt_x: |v| format!("{v:.0}"),
            fmt_y: |v| format!("{v:.1}"),
        }
    }

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn renders_both_series_into_buffer() {
        let hist = [(2000.0, 1.0), (2001.0, 2.0), (2002.0, 2.5), (2003.0, 3.0)];
        let fore = [(2024.0, -46.375), (2025.0, -51.475)];
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);

        chart(&hist, &fore).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(!text.contains("too small"));
        assert!(text.chars().any(|c| !c.is_whitespace()));
    }

    #[test]
    fn tiny_area_shows_hint() {
        let hist = [(2000.0, 1.0), (2003.0, 3.0)];
        let area = Rect::new(0, 0, 60, 4);
        let mut buf = Buffer::empty(area);

        chart(&hist, &[]).render(area, &mut buf);

        assert!(buffer_text(&buf).starts_with("Chart area too small"));
    }

    #[test]
    fn bounds_cover_both_series() {
        let hist = [(2000.0, 1.0), (2003.0, 3.0)];
        let fore = [(2024.0, -46.0), (2025.0, -51.0)];
        let (x, y) = series_bounds(&hist, &fore);
        assert_eq!(x, [1999.5, 2025.5]);
        assert!(y[0] < -51.0 && y[1] > 3.0);
    }

    #[test]
    fn bounds_fall_back_when_empty_or_flat() {
        let (x, y) = series_bounds(&[], &[]);
        assert!(x[1] > x[0] && y[1] > y[0]);

        let flat = [(2000.0, 2.0), (2001.0, 2.0)];
        let (_, y) = series_bounds(&flat, &[]);
        assert!(y[0] < 2.0 && y[1] > 2.0);
    }
}
