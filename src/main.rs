use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::File,
    io::{self, stdin, Write},
    path::PathBuf,
};

use scorekeep::{
    app::App,
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    game::Game,
    history::{export_csv, HistoryDb},
    logging::setup_logger,
    runtime::{CrosstermEventSource, EventSource, Runner},
    ui,
};

/// score keeper for tabletop games
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Keeps score for tabletop games. A player wins by holding the sole lead at or above the winning score for two consecutive rounds. Runs a terminal UI unless a subcommand is given."
)]
pub struct Cli {
    /// game to preselect on the setup screen
    #[clap(short = 'g', long)]
    game: Option<String>,

    /// player name to preselect (repeat for each player)
    #[clap(short = 'p', long = "player")]
    players: Vec<String>,

    /// keep config, history and log in this directory
    #[clap(long, global = true, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// how much to write to the log file
    #[clap(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    log_level: LogLevel,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// list, add or remove games
    Games {
        #[clap(subcommand)]
        action: GamesAction,
    },
    /// print past sessions, newest first
    History {
        /// only show this many sessions
        #[clap(short = 'n', long)]
        limit: Option<usize>,
        /// show one session with its point log
        #[clap(long, conflicts_with = "limit")]
        id: Option<i64>,
    },
    /// write the session history as CSV
    Export {
        /// destination file
        path: PathBuf,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum GamesAction {
    List,
    Add {
        name: String,
        #[clap(allow_negative_numbers = true)]
        winning_score: i64,
    },
    Remove {
        name: String,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let dirs = cli
        .data_dir
        .as_ref()
        .map(AppDirs::in_dir)
        .unwrap_or_else(AppDirs::resolve);

    setup_logger(&dirs.log_path(), cli.log_level.into())?;

    match cli.command.clone() {
        Some(command) => run_command(command, &dirs, &mut io::stdout()),
        None => run_tui(&cli, &dirs),
    }
}

/// Non-interactive subcommands. Output goes to `out`.
fn run_command<W: Write>(command: Command, dirs: &AppDirs, out: &mut W) -> Result<(), Box<dyn Error>> {
    let store = FileConfigStore::with_path(dirs.config_path());
    match command {
        Command::Games { action } => {
            let mut config = store.load();
            match action {
                GamesAction::List => {
                    for game in config.games.games() {
                        writeln!(out, "{}\t{}", game.name, game.winning_score)?;
                    }
                }
                GamesAction::Add {
                    name,
                    winning_score,
                } => {
                    let game = Game::new(&name, winning_score)?;
                    let label = format!("added {} ({} points)", game.name, game.winning_score);
                    config.games.add(game)?;
                    store.save(&config)?;
                    writeln!(out, "{}", label)?;
                }
                GamesAction::Remove { name } => {
                    let game = config.games.remove(&name)?;
                    config.games.ensure_default();
                    store.save(&config)?;
                    writeln!(out, "removed {}", game.name)?;
                }
            }
        }
        Command::History { id: Some(id), .. } => {
            let db = HistoryDb::open(dirs.db_path())?;
            let record = db
                .get(id)?
                .ok_or_else(|| format!("no session with id {}", id))?;
            writeln!(
                out,
                "#{}  {}  {}  Winner: {}  Duration: {}",
                id,
                record.game,
                record.start_time.format("%Y-%m-%d %H:%M"),
                record.winner_label(),
                record.duration
            )?;
            writeln!(out, "Players: {}", record.players.join(", "))?;
            for entry in &record.point_log {
                writeln!(
                    out,
                    "  {} scored {} (New Total: {})",
                    entry.player, entry.points_added, entry.new_score
                )?;
            }
        }
        Command::History { limit, id: None } => {
            let db = HistoryDb::open(dirs.db_path())?;
            if db.count()? == 0 {
                writeln!(out, "no sessions recorded yet")?;
                return Ok(());
            }
            for r in db.list(limit)? {
                writeln!(
                    out,
                    "#{}  {}  {}  Winner: {}  Duration: {}  Players: {}",
                    r.id.unwrap_or_default(),
                    r.start_time.format("%Y-%m-%d %H:%M"),
                    r.game,
                    r.winner_label(),
                    r.duration,
                    r.players.join(", ")
                )?;
            }
        }
        Command::Export { path } => {
            let db = HistoryDb::open(dirs.db_path())?;
            let records = db.list(None)?;
            let rows = export_csv(&records, File::create(&path)?)?;
            log::info!("exported {} rows to {}", rows, path.display());
            writeln!(
                out,
                "exported {} sessions ({} rows) to {}",
                records.len(),
                rows,
                path.display()
            )?;
        }
    }
    Ok(())
}

fn run_tui(cli: &Cli, dirs: &AppDirs) -> Result<(), Box<dyn Error>> {
    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let history = HistoryDb::open(dirs.db_path())
        .map_err(|e| log::error!("history disabled: {}", e))
        .ok();
    let mut app = App::new(
        Box::new(FileConfigStore::with_path(dirs.config_path())),
        history,
    );
    app.preselect(cli.game.as_deref(), &cli.players)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::with_default_tick(CrosstermEventSource::new());
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    while !app.should_quit {
        let size = terminal.size()?;
        app.viewport = (size.width, size.height);
        terminal.draw(|f| ui::draw(app, f))?;
        app.handle_event(runner.step());
    }
    Ok(())
}
