mod app;
mod event;
mod ui;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::{App, AppScreen};
use basta::config::Config;
use basta::engine::scoring::AnswerStatus;
use basta::session::game::{Intent, NextStep};
use event::{AppEvent, EventHandler};
use ui::components::hold_bar::HoldBar;
use ui::components::round_card::RoundCard;
use ui::components::setup_panel::SetupPanel;
use ui::components::stats_screen::StatsScreen;
use ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "basta", version, about = "Stop-the-letter word game scorekeeper")]
struct Cli {
    #[arg(short, long, help = "Rounds per game (1-20)")]
    rounds: Option<u32>,

    #[arg(short, long, value_delimiter = ',', help = "Comma-separated category list")]
    categories: Option<Vec<String>>,

    #[arg(short, long, help = "Seed for reproducible letter draws")]
    seed: Option<u64>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Play without an end-of-game screen")]
    open_ended: bool,

    #[arg(long, help = "Write logs to this file (filter with RUST_LOG)")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let mut config = Config::load().unwrap_or_default();
    if let Some(rounds) = cli.rounds {
        config.target_rounds = rounds;
    }
    if let Some(categories) = cli.categories {
        config.categories = categories;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if cli.open_ended {
        config.finish_screen = false;
    }
    config.normalize();

    let theme = Theme::load(&config.theme);
    let mut app = App::new(config, theme)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Release events let a held Enter be tracked precisely. Writing the push
    // sequence succeeds on any terminal, so ask whether it is understood.
    let keyboard_enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if keyboard_enhanced {
        execute!(
            io::stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    app.keyboard_enhanced = keyboard_enhanced;
    info!(keyboard_enhanced, "terminal ready");

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(app.config.hold_tick());

    let result = run_app(&mut terminal, &mut app, &events);

    if keyboard_enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("basta=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // The stop key is the only one that cares about repeats and releases
    if key.code == KeyCode::Enter && app.screen == AppScreen::Round {
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => app.press_hold(),
            KeyEventKind::Release => app.release_hold(),
        }
        return;
    }

    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Round => handle_round_key(app, key),
        AppScreen::Setup => handle_setup_key(app, key),
        AppScreen::Stats => handle_stats_key(app, key),
    }
}

fn handle_round_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('r') => {
                app.apply(Intent::RandomLetter);
            }
            KeyCode::Char('u') => {
                app.apply(Intent::Unlock);
            }
            KeyCode::Char('n') => app.advance(),
            KeyCode::Char('k') => app.open_setup(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Up => app.select_up(),
        KeyCode::Down => app.select_down(),
        KeyCode::Left => app.previous_round(),
        KeyCode::Right => app.next_round(),
        KeyCode::Tab => app.cycle_status(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(ch @ '1'..='4') if app.selected_category().is_some() => {
            let index = ch as usize - '1' as usize;
            app.select_status(AnswerStatus::ALL[index]);
        }
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn handle_setup_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_setup(),
        KeyCode::Up => app.setup_move(false),
        KeyCode::Down => app.setup_move(true),
        KeyCode::PageUp => app.adjust_target(1),
        KeyCode::PageDown => app.adjust_target(-1),
        KeyCode::Enter => app.setup_add(),
        KeyCode::Delete => app.setup_remove(),
        KeyCode::Backspace => {
            app.setup_input.pop();
        }
        KeyCode::Char(ch) => app.setup_input.push(ch),
        _ => {}
    }
}

fn handle_stats_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => app.restart(),
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Round => render_round(frame, app),
        AppScreen::Setup => render_setup(frame, app),
        AppScreen::Stats => render_stats(frame, app),
    }
}

fn render_round(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let state = app.game.state();

    let advance_hint = match app.game.next_step() {
        NextStep::NewRound => "[Ctrl+N] New round",
        NextStep::Finish => "[Ctrl+N] Finish",
    };
    let hints = [
        "[Ctrl+R] Random letter",
        "[Hold Enter] Basta!",
        "[1-4/Tab] Rate",
        "[Ctrl+U] Unlock",
        "[Left/Right] Rounds",
        advance_hint,
        "[Ctrl+K] Setup",
        "[Esc] Quit",
    ];
    let hint_lines = pack_hint_lines(&hints, area.width as usize);
    let layout = AppLayout::new(area, hint_lines.len() as u16);

    let target = if state.finish_enabled {
        format!(" | Round target {}", state.target_rounds)
    } else {
        String::new()
    };
    let header_info = format!(
        " {} pts | {} of {} rounds locked{target}",
        app.game.total_points(),
        state.ledger.locked_count(),
        state.ledger.len(),
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " Basta ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_info,
            Style::default()
                .fg(colors.text_pending())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let locked = match app.game.current_round() {
        Some(round) => {
            let card = RoundCard::new(
                round,
                &state.categories,
                state.ledger.cursor(),
                state.ledger.len(),
                app.selected,
                &app.theme,
            );
            frame.render_widget(card, layout.main);
            round.is_locked()
        }
        None => false,
    };

    frame.render_widget(HoldBar::new(&state.hold, locked, &app.theme), layout.hold);

    if let Some(message) = &app.message {
        let line = Paragraph::new(Line::from(Span::styled(
            format!("  {message}"),
            Style::default().fg(colors.error()),
        )));
        frame.render_widget(line, layout.message);
    }

    let footer = Paragraph::new(
        hint_lines
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_pending()))))
            .collect::<Vec<_>>(),
    );
    frame.render_widget(footer, layout.footer);
}

fn render_setup(frame: &mut ratatui::Frame, app: &App) {
    let area = centered_rect(60, 80, frame.area());
    let state = app.game.state();
    let panel = SetupPanel::new(
        &state.categories,
        app.setup_selected,
        &app.setup_input,
        state.target_rounds,
        state.finish_enabled,
        &app.theme,
    );
    frame.render_widget(panel, area);

    if let Some(message) = &app.message {
        let line = Paragraph::new(Line::from(Span::styled(
            format!("  {message}"),
            Style::default().fg(app.theme.colors.warning()),
        )));
        let full = frame.area();
        let bottom = Rect::new(full.x, full.bottom().saturating_sub(1), full.width, 1);
        frame.render_widget(line, bottom);
    }
}

fn render_stats(frame: &mut ratatui::Frame, app: &App) {
    let area = centered_rect(70, 80, frame.area());
    let stats = app.final_stats.clone().unwrap_or_else(|| app.game.stats());
    frame.render_widget(StatsScreen::new(&stats, &app.theme), area);
}
