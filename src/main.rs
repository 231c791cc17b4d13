mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use pitchr::{
    analysis::DemoAnalyzer,
    coach::{Coach, Command},
    config::{self, Config, ConfigStore, FileConfigStore},
    report,
    runtime::{ChannelEventSource, CrosstermEventSource, FixedTicker, PitchEvent, Runner},
    schema::SchemaPreset,
    session::{Notice, PitchSession, PitchState},
    signal::{CompletionSignal, TimerScheduler},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    collections::VecDeque,
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const TICK_RATE_MS: u64 = 100;
const NOTICE_TTL: Duration = Duration::from_secs(3);
// a notice with others queued behind it gives way after this long
const NOTICE_MIN: Duration = Duration::from_millis(800);
const HEADLESS_GRACE: Duration = Duration::from_secs(5);

/// practice your elevator pitch and get scored feedback in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Record an elevator pitch, then review clarity, structure and confidence scores, grouped coaching feedback, and rewritten versions of your pitch."
)]
pub struct Cli {
    /// milliseconds before a recording stops on its own
    #[clap(short = 'r', long)]
    recording_ms: Option<u64>,

    /// milliseconds the analysis takes to come back
    #[clap(short = 'a', long)]
    analysis_ms: Option<u64>,

    /// which metrics to score and how feedback is grouped
    #[clap(short = 'm', long, value_enum)]
    schema: Option<SchemaPreset>,

    /// run one session without a terminal UI and print the report
    #[clap(long)]
    headless: bool,

    /// persist the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command line overrides over the stored configuration
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(ms) = self.recording_ms {
            cfg.recording_ms = ms;
        }
        if let Some(ms) = self.analysis_ms {
            cfg.analysis_ms = ms;
        }
        if let Some(preset) = self.schema {
            cfg.schema = preset;
            cfg.custom_schema = None;
        }
        cfg
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Shows session notices one at a time, in the order they were raised.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    current: Option<(Notice, Instant)>,
    queued: VecDeque<Notice>,
}

impl NoticeBoard {
    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref().map(|(notice, _)| notice)
    }

    fn push<I: IntoIterator<Item = Notice>>(&mut self, notices: I) {
        self.queued.extend(notices);
    }

    fn clear(&mut self) {
        self.current = None;
        self.queued.clear();
    }

    fn advance(&mut self, now: Instant) {
        let expired = match &self.current {
            None => true,
            Some((_, shown)) => {
                let age = now.saturating_duration_since(*shown);
                age > NOTICE_TTL || (!self.queued.is_empty() && age > NOTICE_MIN)
            }
        };
        if expired {
            self.current = self.queued.pop_front().map(|notice| (notice, now));
        }
    }
}

pub struct App {
    pub coach: Coach<TimerScheduler>,
    pub notices: NoticeBoard,
    pub scroll: u16,
}

impl App {
    fn new(cfg: &Config, scheduler: TimerScheduler) -> Self {
        Self {
            coach: Coach::new(PitchSession::new(cfg.metric_schema()), scheduler),
            notices: NoticeBoard::default(),
            scroll: 0,
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            return Flow::Quit;
        }

        let state = self.coach.session().state();
        let command = match (state, key.code) {
            (_, KeyCode::Char('n')) => Some(Command::Reset),
            (PitchState::Idle, KeyCode::Char(' ') | KeyCode::Enter) => Some(Command::Start),
            (PitchState::Recording, KeyCode::Char('s') | KeyCode::Char(' ')) => {
                Some(Command::Stop)
            }
            (PitchState::Processing, KeyCode::Char('r')) => Some(Command::Retry),
            (PitchState::Results, KeyCode::Up) => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            (PitchState::Results, KeyCode::Down) => {
                self.scroll = self.scroll.saturating_add(1);
                None
            }
            (PitchState::Results, KeyCode::PageUp) => {
                self.scroll = self.scroll.saturating_sub(10);
                None
            }
            (PitchState::Results, KeyCode::PageDown) => {
                self.scroll = self.scroll.saturating_add(10);
                None
            }
            _ => None,
        };

        if let Some(command) = command {
            // rejected commands leave the session untouched; nothing to show
            let _ = self.coach.command(command);
            if command == Command::Reset {
                self.scroll = 0;
                self.notices.clear();
            }
        }
        Flow::Continue
    }

    fn on_signal(&mut self, signal: CompletionSignal) {
        // surfaced failures are kept on the coach and rendered as a retry prompt
        let _ = self.coach.deliver(signal);
    }

    fn on_tick(&mut self) {
        let fresh = self.coach.session_mut().drain_notices();
        self.notices.push(fresh);
        self.notices.advance(Instant::now());
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.headless);

    let store = FileConfigStore::new();
    let cfg = cli.apply(store.load());
    if cli.save_config {
        store.save(&cfg)?;
    }

    info!(schema = %cfg.schema, recording_ms = cfg.recording_ms, analysis_ms = cfg.analysis_ms, "starting");

    if cli.headless {
        return run_headless(&cfg);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty (or pass --headless)")
            .exit();
    }

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let scheduler = TimerScheduler::new(
        runner.sender(),
        cfg.recording_delay(),
        cfg.analysis_delay(),
        Arc::new(DemoAnalyzer),
    );
    let mut app = App::new(&cfg, scheduler);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

fn init_tracing(headless: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pitchr=info"));

    if headless {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
        return;
    }

    // the alternate screen owns stdout/stderr, so the UI logs to a file
    let path = config::log_path();
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    }
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<CrosstermEventSource, FixedTicker>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        match runner.step() {
            PitchEvent::Tick | PitchEvent::Resize => {}
            PitchEvent::Key(key) => {
                if app.on_key(key) == Flow::Quit {
                    break;
                }
            }
            PitchEvent::Signal(signal) => app.on_signal(signal),
        }
        app.on_tick();
    }

    Ok(())
}

fn run_headless(cfg: &Config) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        ChannelEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let scheduler = TimerScheduler::new(
        runner.sender(),
        cfg.recording_delay(),
        cfg.analysis_delay(),
        Arc::new(DemoAnalyzer),
    );
    let mut coach = Coach::new(PitchSession::new(cfg.metric_schema()), scheduler);
    let deadline =
        Instant::now() + cfg.recording_delay() + cfg.analysis_delay() + HEADLESS_GRACE;

    coach.command(Command::Start)?;
    while coach.session().state() != PitchState::Results {
        if Instant::now() > deadline {
            return Err("timed out waiting for analysis".into());
        }
        if let PitchEvent::Signal(signal) = runner.step() {
            coach.deliver(signal)?;
        }
        for notice in coach.session_mut().drain_notices() {
            info!(title = notice.title, "{}", notice.description);
        }
    }

    let session = coach.session();
    let results = session.results().ok_or("session finished without results")?;
    print!("{}", report::render_text(results, session.schema()));
    Ok(())
}
