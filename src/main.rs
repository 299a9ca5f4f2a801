//! Demo TUI: a grouped, frozen-column grid over a synthetic order book.
//!
//! Keyboard: arrows/home/end/page/tab navigate, Enter toggles the group
//! under the cursor, Space toggles the row checkbox, e/c expand/collapse
//! all groups, q quits.

use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};

use data_grid::config::config::{CellSelectionStyle, GridConfig};
use data_grid::data::column::GridColumn;
use data_grid::data::datatable::{DataRow, DataTable, DataValue};
use data_grid::data::row::GridRow;
use data_grid::ui::grid_manager::{GridManager, SelectRowEvent};
use data_grid::ui::navigation::{ColIdx, Position};
use data_grid::ui::render_dispatch::{CellContext, GridRenderer, GroupCellContext};

struct GridDemo {
    grid: GridManager,
    should_quit: bool,
    status: String,
}

impl GridDemo {
    fn new(table: Arc<DataTable>, config: GridConfig) -> Self {
        Self {
            grid: GridManager::new(table, &["region", "desk"], config),
            should_quit: false,
            status: "Tab to enter the grid".to_string(),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            (KeyCode::Char('e'), KeyModifiers::NONE) => {
                self.grid.expand_all();
                self.status = format!("Expanded all ({} rows)", self.grid.row_count());
            }
            (KeyCode::Char('c'), KeyModifiers::NONE) => {
                self.grid.collapse_all();
                self.status = format!("Collapsed all ({} rows)", self.grid.row_count());
            }
            (KeyCode::Enter, _) => self.toggle_group_under_cursor(),
            (KeyCode::Char(' '), _) => self.toggle_checkbox_under_cursor(),
            _ => {
                if let Some(result) = self.grid.handle_key(&key) {
                    self.status = result.description;
                }
            }
        }
    }

    fn toggle_group_under_cursor(&mut self) {
        let Some(Position { row_idx, .. }) = self.grid.position() else {
            return;
        };
        let Some(GridRow::Group(group)) = self.grid.grouping().row(row_idx) else {
            return;
        };
        let id = group.id.clone();
        self.grid.toggle_group(&id);
        self.status = format!(
            "{} {:?} ({} rows)",
            if self.grid.grouping().is_expanded(&id) {
                "Expanded"
            } else {
                "Collapsed"
            },
            id,
            self.grid.row_count()
        );
    }

    fn toggle_checkbox_under_cursor(&mut self) {
        let Some(pos) = self.grid.position() else {
            return;
        };
        let checked = match self.grid.grouping().row(pos.row_idx) {
            Some(GridRow::Leaf(base)) => !self.grid.selected_rows().contains(base),
            Some(GridRow::Group(group)) => !group
                .child_rows
                .iter()
                .all(|base| self.grid.selected_rows().contains(base)),
            None => return,
        };
        self.grid.select_row(SelectRowEvent {
            row_idx: pos.row_idx,
            checked,
            is_shift_click: false,
        });
        self.status = format!("{} rows selected", self.grid.selected_rows().len());
    }

    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Min(1),    // grid
                Constraint::Length(1), // status
            ])
            .split(frame.area());

        self.grid.resize(chunks[1].width, chunks[1].height);
        self.draw_header(frame, chunks[0]);
        self.draw_grid(frame, chunks[1]);
        self.draw_status(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let range = self.grid.visible_range().clone();
        let mut spans = Vec::new();
        for idx in range.columns() {
            if let Some(col) = self.grid.layout().column(idx) {
                spans.push(Span::styled(
                    pad(&col.name, col.width),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            }
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_grid(&self, frame: &mut Frame, area: Rect) {
        let selection_style = selection_style(&self.grid.config().theme.cell_selection_style);
        let mut renderer = TerminalRenderer {
            rows: BTreeMap::new(),
            selection_style,
        };
        self.grid.render(&mut renderer);

        let range = self.grid.visible_range().clone();
        let scroll_top = self.grid.viewport().scroll_top();
        let mut lines: Vec<Line> = Vec::new();
        for row_idx in range.rows.clone() {
            let top = self.grid.viewport().row_top(row_idx);
            if top < scroll_top || top >= scroll_top + area.height as usize {
                continue; // overscan rows stay unmounted in a terminal
            }
            if let Some(cells) = renderer.rows.get(&row_idx) {
                let spans: Vec<Span> = cells
                    .iter()
                    .filter(|(idx, _, _)| range.contains_col(*idx))
                    .map(|(_, text, style)| Span::styled(text.clone(), *style))
                    .collect();
                lines.push(Line::from(spans));
            }
        }
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let position = match self.grid.position() {
            Some(Position { row_idx, col }) => match col {
                ColIdx::Cell(idx) => format!("({}, {})", idx, row_idx),
                ColIdx::Row => format!("(row {})", row_idx),
            },
            None => "unfocused".to_string(),
        };
        let text = format!(
            " {} | {} rows | {} selected | {}",
            position,
            self.grid.row_count(),
            self.grid.selected_rows().len(),
            self.status
        );
        frame.render_widget(
            Paragraph::new(text).style(Style::default().add_modifier(Modifier::REVERSED)),
            area,
        );
    }

    fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key);
                }
            }
        }
        Ok(())
    }
}

/// Collects dispatched cells per flat row for line-based painting
struct TerminalRenderer {
    rows: BTreeMap<usize, Vec<(usize, String, Style)>>,
    selection_style: Style,
}

impl GridRenderer for TerminalRenderer {
    fn render_cell(&mut self, ctx: &CellContext<'_>) {
        let text = if ctx.column.is_select() {
            checkbox(ctx.is_row_selected)
        } else {
            ctx.value.map(|v| v.to_string()).unwrap_or_default()
        };
        let mut style = Style::default();
        if !ctx.is_even_row {
            style = style.fg(Color::Gray);
        }
        if ctx.is_cell_selected {
            style = self.selection_style;
        }
        self.push(ctx.row_idx, ctx.idx, pad(&text, ctx.column.width), style);
    }

    fn render_group_cell(&mut self, ctx: &GroupCellContext<'_>) {
        let text = if ctx.column.is_select() {
            checkbox(ctx.is_row_selected)
        } else if ctx.idx == ctx.group_column_index {
            format!(
                "{} {} ({})",
                if ctx.is_expanded { "▼" } else { "▶" },
                ctx.group_key,
                ctx.child_rows.len()
            )
        } else {
            String::new()
        };
        let mut style = Style::default().add_modifier(Modifier::BOLD);
        if ctx.is_row_focused {
            style = style.add_modifier(Modifier::REVERSED);
        } else if ctx.is_cell_selected {
            style = self.selection_style;
        }
        self.push(ctx.row_idx, ctx.idx, pad(&text, ctx.column.width), style);
    }
}

impl TerminalRenderer {
    fn push(&mut self, row_idx: usize, idx: usize, text: String, style: Style) {
        self.rows
            .entry(row_idx)
            .or_default()
            .push((idx, text, style));
    }
}

fn checkbox(checked: bool) -> String {
    if checked { "[x]" } else { "[ ]" }.to_string()
}

fn pad(text: &str, width: u16) -> String {
    let width = width as usize;
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    while out.chars().count() < width {
        out.push(' ');
    }
    out
}

fn selection_style(config: &CellSelectionStyle) -> Style {
    let mut style = Style::default().fg(parse_color(&config.foreground));
    if config.use_background {
        style = style.bg(parse_color(&config.background));
    }
    if config.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if config.reversed {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

fn parse_color(name: &str) -> Color {
    match name.to_lowercase().as_str() {
        "red" => Color::Red,
        "green" => Color::Green,
        "blue" => Color::Blue,
        "cyan" => Color::Cyan,
        "magenta" => Color::Magenta,
        "white" => Color::White,
        "gray" | "grey" => Color::Gray,
        _ => Color::Yellow,
    }
}

fn demo_table() -> DataTable {
    let mut table = DataTable::new("orders");
    table.add_column(GridColumn::new("region").with_name("Region").with_width(10));
    table.add_column(GridColumn::new("desk").with_name("Desk").with_width(12));
    table.add_column(GridColumn::new("trader").with_name("Trader").with_width(12));
    table.add_column(
        GridColumn::new("instrument")
            .with_name("Instrument")
            .with_width(14),
    );
    table.add_column(GridColumn::new("qty").with_name("Qty").with_width(8));
    table.add_column(GridColumn::new("price").with_name("Price").with_width(10));

    let regions = ["EMEA", "APAC", "Americas"];
    let desks = ["Rates", "Credit", "FX"];
    let traders = ["daniels", "okafor", "tanaka", "weiss"];
    let instruments = ["Bund 10Y", "JGB 5Y", "UST 2Y", "Gilt 30Y", "OAT 10Y"];

    for i in 0..240usize {
        let row = DataRow::new(vec![
            DataValue::String(regions[i % regions.len()].to_string()),
            DataValue::String(desks[(i / 3) % desks.len()].to_string()),
            DataValue::String(traders[(i / 9) % traders.len()].to_string()),
            DataValue::String(instruments[i % instruments.len()].to_string()),
            DataValue::Integer((i as i64 % 17 + 1) * 100),
            DataValue::Float(99.5 + (i % 40) as f64 / 16.0),
        ]);
        // Column counts are fixed above, so this cannot fail
        let _ = table.add_row(row);
    }
    table
}

fn main() -> Result<()> {
    data_grid::logging::init_tracing()?;
    let config = GridConfig::load().unwrap_or_default();

    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = GridDemo::new(Arc::new(demo_table()), config);
    let result = app.run(&mut terminal);

    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )?;

    result
}
