//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - historical points: `o`, joined by a solid `-` line
//! - forecast points: `x`, joined by a dotted `.` line

use crate::domain::YearValue;

/// Axis labels shared by the text chart and the dashboard chart.
pub const AXIS_X_LABEL: &str = "Year";
pub const AXIS_Y_LABEL: &str = "CO₂ Emissions (Mt)";

/// Render the historical and forecast series into a text chart.
pub fn render_ascii_chart(
    title: &str,
    historical: &[YearValue],
    forecast: &[YearValue],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(9);
    let height = height.max(5);

    let hist = to_xy(historical);
    let fore = to_xy(forecast);

    let (t_min, t_max) = x_range(&hist, &fore).unwrap_or((2000.0, 2040.0));
    let (y_min, y_max) = y_range(&hist, &fore).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let frame = Frame {
        t_min,
        t_max,
        y_min,
        y_max,
    };

    // Lines first so markers overlay them.
    draw_polyline(&mut grid, &hist, &frame, '-');
    draw_polyline(&mut grid, &fore, &frame, '.');
    draw_markers(&mut grid, &hist, &frame, 'o');
    draw_markers(&mut grid, &fore, &frame, 'x');

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&format!(
        "Plot: year=[{t_min:.0}, {t_max:.0}] | y=[{y_min:.2}, {y_max:.2}] Mt\n"
    ));
    out.push_str(&format!("x: {AXIS_X_LABEL} | y: {AXIS_Y_LABEL}\n"));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str("o- Historical  x. Forecast\n");

    out
}

struct Frame {
    t_min: f64,
    t_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn cell(&self, (t, y): (f64, f64), width: usize, height: usize) -> (usize, usize) {
        (
            map_x(t, self.t_min, self.t_max, width),
            map_y(y, self.y_min, self.y_max, height),
        )
    }
}

fn to_xy(points: &[YearValue]) -> Vec<(f64, f64)> {
    points.iter().map(|p| (p.year as f64, p.value_mt)).collect()
}

fn x_range(a: &[(f64, f64)], b: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_t = f64::INFINITY;
    let mut max_t = f64::NEG_INFINITY;
    for &(t, _) in a.iter().chain(b) {
        min_t = min_t.min(t);
        max_t = max_t.max(t);
    }
    if !(min_t.is_finite() && max_t.is_finite()) {
        return None;
    }
    if max_t <= min_t {
        return Some((min_t - 1.0, max_t + 1.0));
    }
    Some((min_t, max_t))
}

fn y_range(a: &[(f64, f64)], b: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in a.iter().chain(b) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() && max_y.is_finite() {
        Some((min_y - 0.5, max_y + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(grid: &mut [Vec<char>], points: &[(f64, f64)], frame: &Frame, ch: char) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &p in points {
        let (x, y) = frame.cell(p, width, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, y, ch);
        }
        prev = Some((x, y));
    }
}

fn draw_markers(grid: &mut [Vec<char>], points: &[(f64, f64)], frame: &Frame, ch: char) {
    let height = grid.len();
    let width = grid[0].len();
    for &p in points {
        let (x, y) = frame.cell(p, width, height);
        grid[y][x] = ch;
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
