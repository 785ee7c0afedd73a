//! Ratatui-based terminal UI.
//!
//! Browses the pricing index one operating system at a time: a key list on the
//! left, the cumulative cost chart and plan comparison for the selected key on
//! the right.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use rust_decimal::prelude::ToPrimitive;

use crate::app::pipeline::RunOutput;
use crate::domain::{Projection, RunConfig, TypeAtLocation};
use crate::error::{AppError, EXIT_TERMINAL};
use crate::report::{instance_type_score, summarize_plans};

mod plotters_chart;

use plotters_chart::{CostPlottersChart, series_color};

const PAGE: usize = 10;

/// Start the TUI.
///
/// The catalog is loaded before the terminal switches to the alternate
/// screen, so load errors and warnings print normally.
pub fn run(config: RunConfig) -> Result<(), AppError> {
    let output = crate::app::pipeline::run(&config)?;
    let mut app = App::new(output);

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_TERMINAL, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| {
            AppError::new(EXIT_TERMINAL, format!("Failed to enable raw mode: {e}"))
        })?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(
                EXIT_TERMINAL,
                format!("Failed to enter alternate screen: {e}"),
            ));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    run: RunOutput,
    os_list: Vec<String>,
    os_idx: usize,
    keys: Vec<TypeAtLocation>,
    selected: usize,
    status: String,
}

impl App {
    fn new(run: RunOutput) -> Self {
        let os_list: Vec<String> =
            run.catalog.dimensions.operating_systems.iter().cloned().collect();
        let mut app = Self {
            run,
            os_list,
            os_idx: 0,
            keys: Vec::new(),
            selected: 0,
            status: String::new(),
        };
        app.reload_keys();
        app
    }

    fn current_os(&self) -> Option<&str> {
        self.os_list.get(self.os_idx).map(String::as_str)
    }

    /// Keys of the current OS, ordered by instance type then region table order.
    fn reload_keys(&mut self) {
        let regions = &self.run.catalog.dimensions.regions;
        let region_pos = |r: &str| regions.iter().position(|x| x == r).unwrap_or(usize::MAX);

        self.keys = match self.current_os() {
            Some(os) => self.run.catalog.keys_for_os(os).cloned().collect(),
            None => Vec::new(),
        };
        self.keys.sort_by(|a, b| {
            instance_type_score(&a.instance_type)
                .cmp(&instance_type_score(&b.instance_type))
                .then_with(|| a.instance_type.cmp(&b.instance_type))
                .then_with(|| region_pos(&a.region).cmp(&region_pos(&b.region)))
        });
        self.selected = 0;
        self.status = match self.current_os() {
            Some(os) => format!("{os}: {} keys", self.keys.len()),
            None => "No priced keys in catalog.".to_string(),
        };
    }

    fn selected_key(&self) -> Option<&TypeAtLocation> {
        self.keys.get(self.selected)
    }

    fn selected_projections(&self) -> Option<&[Projection]> {
        self.selected_key().and_then(|k| self.run.projections_for(k))
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| {
                        AppError::new(EXIT_TERMINAL, format!("Terminal draw error: {e}"))
                    })?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_TERMINAL, format!("Event poll error: {e}")))?
            {
                continue;
            }

            let input = event::read()
                .map_err(|e| AppError::new(EXIT_TERMINAL, format!("Event read error: {e}")))?;
            match input {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let last = self.keys.len().saturating_sub(1);
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => self.selected = (self.selected + 1).min(last),
            KeyCode::PageUp => self.selected = self.selected.saturating_sub(PAGE),
            KeyCode::PageDown => self.selected = (self.selected + PAGE).min(last),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = last,
            KeyCode::Char('o') => {
                if !self.os_list.is_empty() {
                    self.os_idx = (self.os_idx + 1) % self.os_list.len();
                    self.reload_keys();
                }
            }
            _ => {}
        }
        false
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let catalog = &self.run.catalog;
        let lines = vec![
            Line::from(vec![
                Span::styled("plans", Style::default().fg(Color::Cyan)),
                Span::raw(format!(" - EC2 payment plans | catalog {}", catalog.meta.version)),
            ]),
            Line::from(Span::styled(
                format!(
                    "os: {} | keys: {} | regions: {} | horizon: {}y",
                    self.current_os().unwrap_or("-"),
                    self.keys.len(),
                    catalog.dimensions.regions.len(),
                    self.run.horizon_years,
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(28), Constraint::Min(0)])
            .split(area);

        self.draw_keys(frame, cols[0]);

        let plans = self.selected_projections().map(|p| p.len()).unwrap_or(0);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(plans as u16 + 3)])
            .split(cols[1]);

        self.draw_chart(frame, rows[0]);
        self.draw_plans(frame, rows[1]);
    }

    fn draw_keys(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .keys
            .iter()
            .map(|k| ListItem::new(format!("{:<12} {}", k.instance_type, k.region)))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Instance / region").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        if !self.keys.is_empty() {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = self
            .selected_key()
            .map(|k| format!("Cumulative cost: {k}"))
            .unwrap_or_else(|| "Cumulative cost".to_string());
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(projections) = self.selected_projections() else {
            let msg = Paragraph::new("No key selected.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let (series, x_bounds, y_bounds) = cost_series(projections);
        let (chart_rect, insets) = chart_layout(inner);
        let widget = CostPlottersChart {
            series: &series,
            x_bounds,
            y_bounds,
            x_label: "month",
            y_label: "USD",
            fmt_x: fmt_axis_month,
            fmt_y: fmt_axis_usd,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds);
        }
    }

    fn draw_plans(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let summaries = self.selected_projections().map(summarize_plans).unwrap_or_default();

        let mut lines = vec![Line::from(Span::styled(
            format!("  {:<28} {:>10} {:>10} {:>11}", "plan", "total", "vs OD", "break-even"),
            Style::default().fg(Color::Gray),
        ))];
        for (i, s) in summaries.iter().enumerate() {
            let marker = if s.cheapest { "*" } else { " " };
            let vs = s.vs_on_demand.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string());
            let be = s
                .break_even_month
                .map(|m| format!("month {m}"))
                .unwrap_or_else(|| "-".to_string());
            let mut style = Style::default().fg(series_color(i));
            if s.cheapest {
                style = style.add_modifier(Modifier::BOLD);
            }
            lines.push(Line::from(Span::styled(
                format!(
                    "{marker} {:<28} {:>10} {vs:>10} {be:>11}",
                    s.label,
                    format!("{:.2}", s.total)
                ),
                style,
            )));
        }

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Plans").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  PgUp/PgDn page  o next OS  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Chart series `(month, USD)` per plan, plus x and y bounds.
fn cost_series(projections: &[Projection]) -> (Vec<Vec<(f64, f64)>>, [f64; 2], [f64; 2]) {
    let series: Vec<Vec<(f64, f64)>> = projections
        .iter()
        .map(|p| {
            p.points
                .iter()
                .enumerate()
                .map(|(m, v)| ((m + 1) as f64, v.to_f64().unwrap_or(0.0)))
                .collect()
        })
        .collect();

    let months = series.iter().map(Vec::len).max().unwrap_or(0).max(2);
    let x_bounds = [1.0, months as f64];

    let y_max = series
        .iter()
        .flatten()
        .map(|&(_, y)| y)
        .fold(f64::NEG_INFINITY, f64::max);
    let y_max = if y_max.is_finite() && y_max > 0.0 { y_max * 1.05 } else { 1.0 };

    (series, x_bounds, [0.0, y_max])
}

fn fmt_axis_month(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_usd(v: f64) -> String {
    format!("{v:.0}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_axis_month(x_val);
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        let width = label.len() as u16;
        let rect = Rect {
            x: start,
            y,
            width,
            height: 1,
        };
        frame.render_widget(Paragraph::new(label).style(style), rect);
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_axis_usd(y_val);
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        let width = label.len() as u16;
        let rect = Rect {
            x: start,
            y,
            width,
            height: 1,
        };
        frame.render_widget(Paragraph::new(label).style(style), rect);
    }

    let x_label = Paragraph::new("month")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("USD")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
