//! ASCII plotting of cumulative spend for terminal output.
//!
//! Fixed-size character grid, deterministic output (golden tests below).
//!
//! Plot elements:
//! - one glyph per plan, in plan order (`o`, `*`, `+`, ...)
//! - x axis: months `1..=n`; y axis: USD from 0 to the largest total

use rust_decimal::prelude::ToPrimitive;

use crate::domain::Projection;

const SERIES_GLYPHS: [char; 8] = ['o', '*', '+', '#', 'x', '@', '%', '&'];

/// Render every projection of one key into a `width` × `height` grid.
pub fn render_cost_plot(projections: &[Projection], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let months = projections.iter().map(|p| p.points.len()).max().unwrap_or(0).max(1);
    let (m_min, m_max) = (1.0, (months as f64).max(2.0));
    let (y_min, y_max) = y_range(projections).unwrap_or((0.0, 1.0));

    let mut grid = vec![vec![' '; width]; height];

    // Earlier plans win overlapping cells.
    for (i, p) in projections.iter().enumerate() {
        let glyph = series_glyph(i);
        let mut prev = None;
        for (m, v) in p.points.iter().enumerate() {
            let x = map_x((m + 1) as f64, m_min, m_max, width);
            let y = map_y(v.to_f64().unwrap_or(0.0), y_min, y_max, height);
            match prev {
                Some((x0, y0)) => draw_line(&mut grid, x0, y0, x, y, glyph),
                None => draw_line(&mut grid, x, y, x, y, glyph),
            }
            prev = Some((x, y));
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: months=[1, {months}] | USD=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    for (i, p) in projections.iter().enumerate() {
        out.push_str(&format!("{} {}\n", series_glyph(i), p.label));
    }

    out
}

pub fn series_glyph(index: usize) -> char {
    SERIES_GLYPHS[index % SERIES_GLYPHS.len()]
}

/// Spend always starts from zero, so the range is `[0, max]`.
fn y_range(projections: &[Projection]) -> Option<(f64, f64)> {
    let max_y = projections
        .iter()
        .flat_map(|p| p.points.iter())
        .filter_map(|v| v.to_f64())
        .fold(f64::NEG_INFINITY, f64::max);

    if max_y.is_finite() && max_y > 0.0 {
        Some((0.0, max_y))
    } else {
        None
    }
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

/// Integer line drawing (Bresenham-ish). Only fills blank cells.
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ON_DEMAND, Price};
    use crate::projection::project;
    use rust_decimal_macros::dec;

    fn projection(price: Price, horizon: u32) -> Projection {
        Projection {
            label: price.display_name(),
            points: project(&price, horizon),
            price,
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let od = projection(Price::new(ON_DEMAND, dec!(0), dec!(0.10), 1).unwrap(), 1);

        let txt = render_cost_plot(&[od], 12, 5);
        let expected = concat!(
            "Plot: months=[1, 12] | USD=[0.00, 864.00]\n",
            "          oo\n",
            "       ooo  \n",
            "    ooo     \n",
            " ooo        \n",
            "o           \n",
            "o On Demand\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn flat_plan_draws_a_horizontal_line() {
        let od = projection(Price::new(ON_DEMAND, dec!(0), dec!(0.10), 1).unwrap(), 1);
        let flat = projection(Price::new("All Upfront", dec!(432), dec!(0), 1).unwrap(), 1);

        let txt = render_cost_plot(&[od, flat], 12, 5);
        let lines: Vec<&str> = txt.lines().collect();
        // 432 is half of 864: row 2 of 0..=4.
        assert_eq!(lines[3], "****ooo*****");
        assert_eq!(lines[6], "o On Demand");
        assert_eq!(lines[7], "* All Upfront (1 years)");
    }

    #[test]
    fn empty_input_uses_unit_range() {
        let txt = render_cost_plot(&[], 10, 5);
        assert!(txt.starts_with("Plot: months=[1, 1] | USD=[0.00, 1.00]\n"));
        assert_eq!(txt.lines().count(), 6);
    }
}
