//! Plotters-powered cumulative cost chart widget for Ratatui.
//!
//! Plotters gives nicer axis and mesh rendering than Ratatui's built-in
//! `Chart`; its output lands in the Ratatui buffer via `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// High-contrast colors for terminal rendering, one per plan.
const PALETTE: [(u8, u8, u8); 8] = [
    (255, 255, 255), // white: On Demand comes first
    (0, 255, 255),
    (0, 255, 0),
    (255, 255, 0),
    (255, 0, 255),
    (255, 128, 0),
    (128, 160, 255),
    (255, 0, 0),
];

pub fn series_rgb(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

pub fn series_color(index: usize) -> Color {
    let (r, g, b) = series_rgb(index);
    Color::Rgb(r, g, b)
}

/// A render-only chart description; series and bounds are computed by the caller.
pub struct CostPlottersChart<'a> {
    /// One line per plan: `(month, cumulative USD)`.
    pub series: &'a [Vec<(f64, f64)>],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for CostPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // Draw in reverse so the first plan (On Demand) ends up on top.
            for (i, line) in self.series.iter().enumerate().rev() {
                let (r, g, b) = series_rgb(i);
                chart.draw_series(LineSeries::new(line.iter().copied(), &RGBColor(r, g, b)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
