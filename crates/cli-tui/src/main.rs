use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

mod models;

use models::TuiConfig;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use vidpace_tracker::collection::{add_video, delete_video, next_video_id, toggle_completed};
use vidpace_tracker::pacing::{compute_daily_budget, remaining_days};
use vidpace_tracker::view::{project, summarize, ProjectedView, SortField};
use vidpace_tracker::{LocalStore, SortDirection, VideoFilter, VideoInput, VideoRecord, ViewState};

/// Study-progress tracker TUI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (JSON or TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory override (defaults to the configured one)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
}

/// Input form field order, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Section,
    Subsection,
    Title,
    Duration,
}

impl FormField {
    fn label(&self) -> &'static str {
        match self {
            FormField::Section => "セクション",
            FormField::Subsection => "サブセクション",
            FormField::Title => "動画タイトル",
            FormField::Duration => "動画時間 (m:ss)",
        }
    }

    fn next(&self) -> FormField {
        match self {
            FormField::Section => FormField::Subsection,
            FormField::Subsection => FormField::Title,
            FormField::Title => FormField::Duration,
            FormField::Duration => FormField::Section,
        }
    }

    fn prev(&self) -> FormField {
        match self {
            FormField::Section => FormField::Duration,
            FormField::Subsection => FormField::Section,
            FormField::Title => FormField::Subsection,
            FormField::Duration => FormField::Title,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct AddForm {
    input: VideoInput,
    focus: Option<FormField>,
}

impl AddForm {
    fn new() -> Self {
        Self {
            input: VideoInput::default(),
            focus: Some(FormField::Section),
        }
    }

    fn focus(&self) -> FormField {
        self.focus.unwrap_or(FormField::Section)
    }

    fn focused_value_mut(&mut self) -> &mut String {
        match self.focus() {
            FormField::Section => &mut self.input.section,
            FormField::Subsection => &mut self.input.subsection,
            FormField::Title => &mut self.input.title,
            FormField::Duration => &mut self.input.duration,
        }
    }
}

/// What the event loop is currently showing
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Normal,
    AddForm,
    ExamDate,
    ConfirmDelete,
}

/// One table row after group flattening. Section/subsection labels only
/// appear on the first row of their group, like a rowspan-merged cell.
#[derive(Debug, Clone)]
struct DisplayRow {
    section: Option<String>,
    subsection: Option<String>,
    video: VideoRecord,
}

fn flatten_view(view: &ProjectedView) -> Vec<DisplayRow> {
    let mut rows = Vec::new();
    for section in &view.sections {
        for subsection in &section.subsections {
            for (index, video) in subsection.videos.iter().enumerate() {
                rows.push(DisplayRow {
                    section: (index == 0).then(|| section.section.clone()),
                    subsection: (index == 0).then(|| subsection.subsection.clone()),
                    video: video.clone(),
                });
            }
        }
    }
    rows
}

struct App {
    store: LocalStore,
    videos: Vec<VideoRecord>,
    exam_date: String,
    daily_budget: String,
    view_state: ViewState,
    mode: Mode,
    form: AddForm,
    exam_input: String,
    pending_delete: Option<VideoRecord>,
    table_state: TableState,
    message: Option<String>,
    should_quit: bool,
}

impl App {
    fn new(store: LocalStore) -> Self {
        let videos = store.load_videos();
        let exam_date = store.load_exam_date();
        let daily_budget = compute_daily_budget(&videos, &exam_date);

        Self {
            store,
            videos,
            exam_date,
            daily_budget,
            view_state: ViewState::default(),
            mode: Mode::Normal,
            form: AddForm::default(),
            exam_input: String::new(),
            pending_delete: None,
            table_state: TableState::default(),
            message: None,
            should_quit: false,
        }
    }

    fn visible_rows(&self) -> Vec<DisplayRow> {
        flatten_view(&project(&self.videos, &self.view_state))
    }

    fn selected_video(&self) -> Option<VideoRecord> {
        let rows = self.visible_rows();
        self.table_state
            .selected()
            .and_then(|index| rows.get(index))
            .map(|row| row.video.clone())
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_rows().len();
        if count == 0 {
            self.table_state.select(None);
        } else {
            let selected = self.table_state.selected().unwrap_or(0).min(count - 1);
            self.table_state.select(Some(selected));
        }
    }

    fn move_selection(&mut self, delta: i64) {
        let count = self.visible_rows().len();
        if count == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, count as i64 - 1);
        self.table_state.select(Some(next as usize));
    }

    // Every mutation persists the full new snapshot, then refreshes the
    // pacing figure from the incomplete subset.
    fn after_mutation(&mut self) {
        self.store.save_videos(&self.videos);
        self.daily_budget = compute_daily_budget(&self.videos, &self.exam_date);
        self.clamp_selection();
    }

    fn submit_form(&mut self) {
        match self.form.input.validate() {
            Ok(()) => {
                let id = next_video_id(&self.videos);
                let record = self.form.input.clone().into_record(id);
                self.videos = add_video(std::mem::take(&mut self.videos), record);
                self.after_mutation();
                self.form = AddForm::new();
                self.mode = Mode::Normal;
                self.message = Some("動画を追加しました".to_string());
            }
            Err(err) => {
                self.message = Some(err.to_string());
            }
        }
    }

    fn toggle_selected(&mut self) {
        if let Some(video) = self.selected_video() {
            self.videos = toggle_completed(std::mem::take(&mut self.videos), &video.id);
            self.after_mutation();
        }
    }

    fn request_delete(&mut self) {
        if let Some(video) = self.selected_video() {
            self.pending_delete = Some(video);
            self.mode = Mode::ConfirmDelete;
        }
    }

    fn confirm_delete(&mut self) {
        if let Some(video) = self.pending_delete.take() {
            self.videos = delete_video(std::mem::take(&mut self.videos), &video.id);
            self.after_mutation();
            self.message = Some("削除しました".to_string());
        }
        self.mode = Mode::Normal;
    }

    fn submit_exam_date(&mut self) {
        let input = self.exam_input.trim().to_string();
        if !input.is_empty()
            && chrono::NaiveDate::parse_from_str(&input, "%Y-%m-%d").is_err()
        {
            self.message = Some("試験日は YYYY-MM-DD 形式で入力してください".to_string());
            return;
        }

        self.exam_date = input;
        self.store.save_exam_date(&self.exam_date);
        self.daily_budget = compute_daily_budget(&self.videos, &self.exam_date);
        self.mode = Mode::Normal;
    }

    fn cycle_sort_field(&mut self) {
        let next = match self.view_state.sort_field {
            SortField::Created => SortField::Title,
            SortField::Title => SortField::Duration,
            SortField::Duration => SortField::Section,
            SortField::Section => SortField::Subsection,
            SortField::Subsection => SortField::Completed,
            SortField::Completed => SortField::Created,
        };
        self.view_state.toggle_sort(next);
        self.clamp_selection();
    }

    fn flip_sort_direction(&mut self) {
        // Same field toggles direction
        let field = self.view_state.sort_field;
        self.view_state.toggle_sort(field);
    }

    fn set_filter(&mut self, filter: VideoFilter) {
        self.view_state.filter = filter;
        self.clamp_selection();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_config_path = dirs_config_path();
    let config_path = args
        .config
        .as_deref()
        .or_else(|| default_config_path.as_deref().filter(|p| p.exists()));

    let mut cfg = TuiConfig::load_config(config_path).context("Failed to load configuration")?;
    if let Some(data_dir) = args.data_dir {
        cfg.data_dir = data_dir;
    }

    init_logging(&cfg.data_dir)?;
    tracing::info!("vidtop starting, data dir {}", cfg.data_dir.display());

    // Setup terminal
    crossterm::terminal::enable_raw_mode()?;
    let mut out = stdout();
    crossterm::execute!(out, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(LocalStore::new(cfg.data_dir));
    app.clamp_selection();

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )?;

    result
}

fn dirs_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config/vidpace/config.toml"))
}

/// Log to a file inside the data dir; stderr would tear up the alternate
/// screen.
fn init_logging(data_dir: &std::path::Path) -> Result<()> {
    fs::create_dir_all(data_dir)?;
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("vidtop.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if !crossterm::event::poll(Duration::from_millis(1000))? {
            continue;
        }
        if let crossterm::event::Event::Key(key) = crossterm::event::read()? {
            handle_key(app, key.code);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, code: crossterm::event::KeyCode) {
    use crossterm::event::KeyCode;

    match app.mode {
        Mode::Normal => match code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('a') => {
                app.form = AddForm::new();
                app.message = None;
                app.mode = Mode::AddForm;
            }
            KeyCode::Char('e') => {
                app.exam_input = app.exam_date.clone();
                app.message = None;
                app.mode = Mode::ExamDate;
            }
            KeyCode::Char('d') => app.request_delete(),
            KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),
            // Filter keys (1-3)
            KeyCode::Char('1') => app.set_filter(VideoFilter::All),
            KeyCode::Char('2') => app.set_filter(VideoFilter::Completed),
            KeyCode::Char('3') => app.set_filter(VideoFilter::Incomplete),
            // Sort keys
            KeyCode::Char('s') => app.cycle_sort_field(),
            KeyCode::Char('o') => app.flip_sort_direction(),
            // Navigation
            KeyCode::Up => app.move_selection(-1),
            KeyCode::Down => app.move_selection(1),
            KeyCode::PageUp => app.move_selection(-10),
            KeyCode::PageDown => app.move_selection(10),
            _ => {}
        },
        Mode::AddForm => match code {
            KeyCode::Esc => {
                app.mode = Mode::Normal;
                app.message = None;
            }
            KeyCode::Enter => app.submit_form(),
            KeyCode::Tab | KeyCode::Down => app.form.focus = Some(app.form.focus().next()),
            KeyCode::BackTab | KeyCode::Up => app.form.focus = Some(app.form.focus().prev()),
            KeyCode::Backspace => {
                app.form.focused_value_mut().pop();
            }
            KeyCode::Char(c) => app.form.focused_value_mut().push(c),
            _ => {}
        },
        Mode::ExamDate => match code {
            KeyCode::Esc => {
                app.mode = Mode::Normal;
                app.message = None;
            }
            KeyCode::Enter => app.submit_exam_date(),
            KeyCode::Backspace => {
                app.exam_input.pop();
            }
            KeyCode::Char(c) => app.exam_input.push(c),
            _ => {}
        },
        Mode::ConfirmDelete => match code {
            KeyCode::Char('y') | KeyCode::Enter => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Esc => {
                app.pending_delete = None;
                app.mode = Mode::Normal;
            }
            _ => {}
        },
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, chunks[0], app);
    render_summary(f, chunks[1], app);
    render_table(f, chunks[2], app);
    render_footer(f, chunks[3], app);

    match app.mode {
        Mode::AddForm => render_add_form(f, app),
        Mode::ExamDate => render_exam_date_prompt(f, app),
        Mode::ConfirmDelete => render_confirm_delete(f, app),
        Mode::Normal => {}
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pacing_line = if app.exam_date.is_empty() {
        Line::from(vec![
            Span::raw("試験日: 未設定  "),
            Span::styled("[e] で設定", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        let days = remaining_days(&app.exam_date);
        Line::from(vec![
            Span::raw(format!("試験日: {}  残り{}日  ", app.exam_date, days)),
            Span::styled(
                format!("1日あたり {}", app.daily_budget),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        ])
    };

    let header = Paragraph::new(pacing_line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("動画進捗トラッカー"),
    );
    f.render_widget(header, area);
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    let summary = summarize(&app.videos);

    let filter_label = match app.view_state.filter {
        VideoFilter::All => "すべて",
        VideoFilter::Completed => "完了のみ",
        VideoFilter::Incomplete => "未完了のみ",
    };
    let sort_label = match app.view_state.sort_field {
        SortField::Title => "タイトル",
        SortField::Duration => "時間",
        SortField::Section => "セクション",
        SortField::Subsection => "サブセクション",
        SortField::Completed => "進捗",
        SortField::Created => "追加順",
    };
    let direction_label = match app.view_state.direction {
        SortDirection::Ascending => "昇順",
        SortDirection::Descending => "降順",
    };

    let line = Line::from(vec![
        Span::raw(format!(
            "全{}本 {}  完了{}本 {}  未完了{}本 {}  ",
            summary.total_count,
            summary.total_clock,
            summary.completed_count,
            summary.completed_clock,
            summary.incomplete_count,
            summary.incomplete_clock,
        )),
        Span::styled(
            format!("[{} / {}・{}]", filter_label, sort_label, direction_label),
            Style::default().fg(Color::Yellow),
        ),
    ]);

    let widget = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("集計"));
    f.render_widget(widget, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let rows = app.visible_rows();

    if rows.is_empty() {
        let empty = Paragraph::new("データがありません。[a] で動画データを追加してください。")
            .block(Block::default().borders(Borders::ALL).title("動画データ一覧"));
        f.render_widget(empty, area);
        return;
    }

    let table_rows: Vec<Row> = rows
        .iter()
        .map(|row| {
            let check = if row.video.completed { "✅" } else { "  " };
            Row::new(vec![
                check.to_string(),
                row.video.title.clone(),
                row.video.duration.clone(),
                row.section.clone().unwrap_or_default(),
                row.subsection.clone().unwrap_or_default(),
            ])
        })
        .collect();

    let table = Table::new(
        table_rows,
        [
            Constraint::Length(4),
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(16),
            Constraint::Length(16),
        ],
    )
    .header(
        Row::new(vec!["進捗", "動画タイトル", "時間", "セクション", "サブセクション"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title("動画データ一覧"))
    .highlight_style(
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let text = match &app.message {
        Some(message) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(
            "[a]追加 [e]試験日 [Space]進捗切替 [d]削除 [1-3]フィルタ [s]ソート [o]昇降 [q]終了",
        ),
    };
    let widget = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn render_add_form(f: &mut Frame, app: &App) {
    let area = centered_rect(50, 8, f.area());
    f.render_widget(Clear, area);

    let fields = [
        (FormField::Section, &app.form.input.section),
        (FormField::Subsection, &app.form.input.subsection),
        (FormField::Title, &app.form.input.title),
        (FormField::Duration, &app.form.input.duration),
    ];

    let lines: Vec<Line> = fields
        .iter()
        .map(|(field, value)| {
            let style = if *field == app.form.focus() {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(
                format!("{}: {}", field.label(), value),
                style,
            ))
        })
        .collect();

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("動画データ入力  [Tab]移動 [Enter]追加 [Esc]閉じる"),
    );
    f.render_widget(form, area);
}

fn render_exam_date_prompt(f: &mut Frame, app: &App) {
    let area = centered_rect(44, 3, f.area());
    f.render_widget(Clear, area);

    let prompt = Paragraph::new(format!("試験日 (YYYY-MM-DD): {}", app.exam_input)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("試験日設定  [Enter]確定 [Esc]閉じる"),
    );
    f.render_widget(prompt, area);
}

fn render_confirm_delete(f: &mut Frame, app: &App) {
    let area = centered_rect(50, 4, f.area());
    f.render_widget(Clear, area);

    let title = app
        .pending_delete
        .as_ref()
        .map(|video| video.title.clone())
        .unwrap_or_default();

    let lines = vec![
        Line::from(format!("「{}」を削除してもよろしいですか？", title)),
        Line::from(Span::styled(
            "[y]削除 [n]キャンセル",
            Style::default().fg(Color::Red),
        )),
    ];

    let dialog = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("削除の確認"));
    f.render_widget(dialog, area);
}
