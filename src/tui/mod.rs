//! Ratatui-based terminal dashboard.
//!
//! The dashboard mirrors a single-page web app:
//! - a file picker stands in for the upload widget
//! - a settings panel holds the country selector and the two year inputs
//! - the body shows the historical and forecast tables next to the chart
//!
//! Every control change re-runs the whole pipeline synchronously; any error is
//! shown in place of the results and the next interaction starts fresh.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};

use crate::app::pipeline::{RunOutput, run_forecast};
use crate::cli::TuiArgs;
use crate::cli::picker::{discover_csv_files, pretty_path};
use crate::data::EmissionsDataset;
use crate::domain::{
    DEFAULT_END_YEAR, DEFAULT_START_YEAR, ForecastConfig, MAX_FORECAST_YEAR, MIN_END_YEAR, MIN_START_YEAR,
    YearValue,
};
use crate::error::AppError;
use crate::plot::{AXIS_X_LABEL, AXIS_Y_LABEL};
use crate::report::{COL_EMISSIONS, COL_YEAR, chart_title, forecast_heading, historical_heading};

mod plotters_chart;

use plotters_chart::{ForecastPlottersChart, series_bounds};

/// Start the TUI.
pub fn run(args: TuiArgs) -> Result<(), AppError> {
    let mut app = App::new();
    match &args.input.file {
        Some(path) => app.load_file(path),
        None => app.open_picker(),
    }

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
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

/// Settings panel rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Country,
    StartYear,
    EndYear,
}

impl Field {
    const ALL: [Field; 3] = [Field::Country, Field::StartYear, Field::EndYear];

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn prev(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Dashboard,
    Picker,
}

struct App {
    mode: Mode,
    dataset: Option<EmissionsDataset>,
    country_idx: usize,
    start_year: i32,
    end_year: i32,
    selected_field: Field,
    picker_files: Vec<PathBuf>,
    picker_idx: usize,
    status: String,
    /// Result of the last pipeline run; `None` until a dataset is loaded.
    outcome: Option<Result<RunOutput, AppError>>,
}

impl App {
    fn new() -> Self {
        Self {
            mode: Mode::Dashboard,
            dataset: None,
            country_idx: 0,
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            selected_field: Field::Country,
            picker_files: Vec::new(),
            picker_idx: 0,
            status: "Open a CSV file to begin.".to_string(),
            outcome: None,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
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

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match self.mode {
            Mode::Picker => self.handle_picker_key(code),
            Mode::Dashboard => self.handle_dashboard_key(code),
        }
    }

    fn handle_dashboard_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => self.selected_field = self.selected_field.prev(),
            KeyCode::Down => self.selected_field = self.selected_field.next(),
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::PageDown => self.adjust_field(-10),
            KeyCode::PageUp => self.adjust_field(10),
            KeyCode::Char('o') => self.open_picker(),
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
        false
    }

    fn handle_picker_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.dataset.is_some() {
                    self.mode = Mode::Dashboard;
                    self.status = "File selection canceled.".to_string();
                }
            }
            KeyCode::Up => self.picker_idx = self.picker_idx.saturating_sub(1),
            KeyCode::Down => {
                if self.picker_idx + 1 < self.picker_files.len() {
                    self.picker_idx += 1;
                }
            }
            KeyCode::Char('r') => self.open_picker(),
            KeyCode::Enter => {
                if let Some(path) = self.picker_files.get(self.picker_idx).cloned() {
                    self.load_file(&path);
                }
            }
            _ => {}
        }
        false
    }

    fn open_picker(&mut self) {
        self.picker_files = discover_csv_files();
        self.picker_idx = 0;
        self.mode = Mode::Picker;
        self.status = if self.picker_files.is_empty() {
            "No .csv files found under the current directory (r to rescan).".to_string()
        } else {
            format!("Found {} CSV file(s). Enter to open.", self.picker_files.len())
        };
    }

    /// Replace the dataset with `path`.
    ///
    /// A failed load drops the previous dataset and results; the dashboard then
    /// shows only the error until another file is opened.
    fn load_file(&mut self, path: &Path) {
        match EmissionsDataset::load(path) {
            Ok(dataset) => {
                self.status = format!(
                    "Loaded {}: {} of {} rows, {} countries.",
                    dataset.source_label(),
                    dataset.stats.rows_used,
                    dataset.stats.rows_read,
                    dataset.countries().len()
                );
                self.set_dataset(dataset);
            }
            Err(err) => {
                log::warn!("load failed for '{}': {err}", path.display());
                self.status = "Load failed. Press o to open another file.".to_string();
                self.dataset = None;
                self.country_idx = 0;
                self.outcome = Some(Err(err));
            }
        }
        self.mode = Mode::Dashboard;
    }

    fn set_dataset(&mut self, dataset: EmissionsDataset) {
        self.dataset = Some(dataset);
        self.country_idx = 0;
        self.recompute();
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            Field::Country => {
                let n = self.dataset.as_ref().map(|d| d.countries().len()).unwrap_or(0);
                if n == 0 {
                    return;
                }
                let step = delta.signum() as isize;
                self.country_idx = (self.country_idx as isize + step).rem_euclid(n as isize) as usize;
            }
            Field::StartYear => {
                self.start_year = (self.start_year + delta).clamp(MIN_START_YEAR, MAX_FORECAST_YEAR);
            }
            Field::EndYear => {
                self.end_year = (self.end_year + delta).clamp(MIN_END_YEAR, MAX_FORECAST_YEAR);
            }
        }
        self.recompute();
    }

    fn selected_country(&self) -> Option<&str> {
        self.dataset
            .as_ref()
            .and_then(|d| d.countries().get(self.country_idx))
            .map(String::as_str)
    }

    /// Re-run the pipeline for the current controls.
    fn recompute(&mut self) {
        let Some(dataset) = &self.dataset else {
            self.outcome = None;
            return;
        };
        let Some(country) = self.selected_country() else {
            self.outcome = Some(Err(AppError::malformed("No countries found after cleaning.")));
            return;
        };

        let config = ForecastConfig {
            country: country.to_string(),
            start_year: self.start_year,
            end_year: self.end_year,
        };
        let outcome = run_forecast(dataset, &config);
        if let Err(err) = &outcome {
            log::warn!("forecast failed: {err}");
        }
        self.outcome = Some(outcome);
    }

    fn export(&mut self) {
        match &self.outcome {
            Some(Ok(run)) => match crate::io::export::write_export(Path::new("."), &run.historical, &run.forecast) {
                Ok(path) => self.status = format!("Exported {}", pretty_path(&path)),
                Err(err) => self.status = format!("Export failed: {err}"),
            },
            Some(Err(err)) => self.status = format!("Nothing to export: {err}"),
            None => self.status = "Nothing to export: no file loaded.".to_string(),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        match self.mode {
            Mode::Dashboard => self.draw_body(frame, chunks[1]),
            Mode::Picker => self.draw_picker(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("co2", Style::default().fg(Color::Cyan)),
            Span::raw(" — Country-wise CO₂ Emissions Forecast"),
        ]));

        let file = self
            .dataset
            .as_ref()
            .map(|d| d.source_label())
            .unwrap_or_else(|| "-".to_string());
        let country = self.selected_country().unwrap_or("-");
        lines.push(Line::from(Span::styled(
            format!(
                "file: {file} | country: {country} | range: {}–{}",
                self.start_year, self.end_year
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(36), Constraint::Min(0)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(chunks[0]);

        self.draw_settings(frame, left[0]);

        match &self.outcome {
            None => {
                let msg = Paragraph::new("No data loaded. Press o to open a CSV file.")
                    .style(Style::default().fg(Color::Yellow))
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(msg, Rect::new(left[1].x, left[1].y, area.width, left[1].height));
            }
            Some(Err(err)) => {
                // Errors replace tables and chart entirely.
                let msg = Paragraph::new(format!("⚠ Error: {err}"))
                    .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .wrap(Wrap { trim: true })
                    .block(Block::default().title("Error").borders(Borders::ALL));
                let rect = Rect::new(left[1].x, left[1].y, area.width, left[1].height);
                frame.render_widget(Clear, rect);
                frame.render_widget(msg, rect);
            }
            Some(Ok(run)) => {
                self.draw_tables(frame, left[1], run);
                self.draw_chart(frame, chunks[1], run);
            }
        }
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let country = self.selected_country().unwrap_or("-");
        let items = vec![
            ListItem::new(format!("Country: {country}")),
            ListItem::new(format!("Start Year: {}", self.start_year)),
            ListItem::new(format!("End Year: {}", self.end_year)),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field.index()));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_tables(&self, frame: &mut ratatui::Frame<'_>, area: Rect, run: &RunOutput) {
        let hist_height = (run.historical.len() as u16 + 3).min(area.height / 2).max(3);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(hist_height), Constraint::Min(0)])
            .split(area);

        frame.render_widget(year_table(&historical_heading(), &run.historical.points), chunks[0]);
        frame.render_widget(
            year_table(
                &forecast_heading(run.range().start(), run.range().end()),
                &run.forecast.points,
            ),
            chunks[1],
        );
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect, run: &RunOutput) {
        let block = Block::default().title(chart_title(run.country())).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let historical = to_xy(&run.historical.points);
        let forecast = to_xy(&run.forecast.points);
        let (x_bounds, y_bounds) = series_bounds(&historical, &forecast);

        let widget = ForecastPlottersChart {
            historical: &historical,
            forecast: &forecast,
            x_bounds,
            y_bounds,
            x_label: AXIS_X_LABEL,
            y_label: AXIS_Y_LABEL,
            fmt_x: fmt_axis_year,
            fmt_y: fmt_axis_mt,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_picker(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .picker_files
            .iter()
            .map(|p| ListItem::new(pretty_path(p)))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Open CSV file").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        if !self.picker_files.is_empty() {
            state.select(Some(self.picker_idx));
        }
        frame.render_widget(Clear, area);
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match self.mode {
            Mode::Dashboard => "↑/↓ select  ←/→ adjust  PgUp/PgDn ±10y  o open  e export  q quit",
            Mode::Picker => "↑/↓ select  Enter open  r rescan  Esc back  q quit",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn year_table<'a>(title: &str, rows: &[YearValue]) -> Table<'a> {
    let header = Row::new(vec![Cell::from(COL_YEAR), Cell::from(COL_EMISSIONS)])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let body = rows.iter().map(|r| {
        Row::new(vec![
            Cell::from(r.year.to_string()),
            Cell::from(format!("{:>18.3}", r.value_mt)),
        ])
    });

    Table::new(body, [Constraint::Length(6), Constraint::Min(18)])
        .header(header)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
}

fn to_xy(points: &[YearValue]) -> Vec<(f64, f64)> {
    points.iter().map(|p| (p.year as f64, p.value_mt)).collect()
}

fn fmt_axis_year(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_mt(v: f64) -> String {
    format!("{v:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::io::ingest::read_emissions;

    fn app_with(csv: &str) -> App {
        let mut app = App::new();
        let ds = EmissionsDataset::from_ingest(read_emissions(csv.as_bytes()).unwrap(), None);
        app.set_dataset(ds);
        app
    }

    const CSV: &str = "country_name,year,value\n\
        A,2000,1000\nA,2001,2000\nA,2002,2500\nA,2003,3000\n\
        B,2000,5\nB,2001,6\n";

    #[test]
    fn loading_runs_pipeline_for_first_country() {
        let app = app_with(CSV);
        assert_eq!(app.selected_country(), Some("A"));
        let run = app.outcome.as_ref().unwrap().as_ref().unwrap();
        assert_eq!(run.forecast.points.len(), 16);
    }

    #[test]
    fn switching_country_surfaces_insufficient_data() {
        let mut app = app_with(CSV);
        app.selected_field = Field::Country;
        app.handle_key(KeyCode::Right);
        assert_eq!(app.selected_country(), Some("B"));
        let err = app.outcome.as_ref().unwrap().as_ref().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientData);

        // Wraps around.
        app.handle_key(KeyCode::Right);
        assert_eq!(app.selected_country(), Some("A"));
    }

    #[test]
    fn years_are_clamped_and_range_validated() {
        let mut app = app_with(CSV);
        app.selected_field = Field::StartYear;
        for _ in 0..10 {
            app.handle_key(KeyCode::Left);
        }
        assert_eq!(app.start_year, MIN_START_YEAR);

        app.handle_key(KeyCode::Down);
        assert_eq!(app.selected_field, Field::EndYear);
        for _ in 0..30 {
            app.handle_key(KeyCode::Left);
        }
        assert_eq!(app.end_year, MIN_END_YEAR);
        assert!(app.outcome.as_ref().unwrap().is_ok());

        app.selected_field = Field::StartYear;
        app.handle_key(KeyCode::Right);
        let err = app.outcome.as_ref().unwrap().as_ref().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
    }

    #[test]
    fn quit_key() {
        let mut app = app_with(CSV);
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(!app.handle_key(KeyCode::Up));
    }

    #[test]
    fn export_without_data_reports_status() {
        let mut app = App::new();
        app.export();
        assert!(app.status.starts_with("Nothing to export"));
    }

    #[test]
    fn failed_load_replaces_previous_results_with_error() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.csv");
        std::fs::write(&bad, "country,year\nA,2000\n").unwrap();

        let mut app = app_with(CSV);
        app.mode = Mode::Picker;
        app.load_file(&bad);

        assert!(app.mode == Mode::Dashboard);
        assert!(app.dataset.is_none());
        assert_eq!(app.selected_country(), None);
        let err = app.outcome.as_ref().unwrap().as_ref().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);

        // Nothing left to go back to or export.
        app.handle_key(KeyCode::Char('o'));
        app.handle_key(KeyCode::Esc);
        assert!(app.mode == Mode::Picker);
        app.mode = Mode::Dashboard;
        app.export();
        assert!(app.status.starts_with("Nothing to export"));
    }

    #[test]
    fn field_navigation_saturates() {
        assert_eq!(Field::Country.prev(), Field::Country);
        assert_eq!(Field::EndYear.next(), Field::EndYear);
        assert_eq!(Field::Country.next(), Field::StartYear);
    }
}
