use crate::cli::{Cli, FeedKind};
use crate::error::AppError;
use crate::feed::fixture::FixtureFeed;
use crate::feed::random::RandomFeed;
use crate::feed::source::MetricsFeed;
use crate::monitor::engine::Monitor;
use crate::policy::Policy;
use crate::tui::app::App;
use crate::tui::draw::draw_app;
use crate::tui::report::render_report;
use clap::Parser;
use crossterm::event::{Event, KeyCode, KeyEventKind};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

mod analysis;
mod cli;
mod error;
mod feed;
mod model;
mod monitor;
mod policy;
mod state;
mod tui;

fn init_logging(cli: &Cli) -> Result<(), AppError> {
    let level = if cli.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false);

    match &cli.log_file {
        Some(path) => {
            let file = File::create(path).map_err(|source| AppError::LogFile {
                path: path.clone(),
                source,
            })?;
            builder.with_writer(Mutex::new(file)).init();
        }
        // the dashboard owns the terminal, so only the one-shot report logs to stderr
        None if cli.once => builder.with_writer(std::io::stderr).init(),
        None => {}
    }
    Ok(())
}

fn load_policy(path: Option<&Path>) -> Result<Policy, AppError> {
    match path {
        Some(path) => Ok(Policy::load(path)?),
        None => Ok(Policy::default()),
    }
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    let policy = load_policy(cli.policy.as_deref())?;

    let feed: Box<dyn MetricsFeed> = match cli.feed {
        FeedKind::Fixture => Box::new(FixtureFeed::new()),
        FeedKind::Random => Box::new(RandomFeed::new(
            cli.seed,
            cli.step_minutes,
            policy.scoring.clone(),
        )),
    };
    let monitor = Monitor::new(policy, feed, cli.history);

    if cli.once {
        print!(
            "{}",
            render_report(monitor.current_snapshot(), &monitor.policy().scoring)
        );
        return Ok(());
    }

    let mut terminal = ratatui::init();
    let mut app = App::new(monitor, Duration::from_millis(cli.interval_ms));

    loop {
        terminal.draw(|frame| draw_app(frame, &app))?;

        if crossterm::event::poll(Duration::from_millis(16))? {
            match crossterm::event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Char(' ') => app.step(),
                    KeyCode::Char('p') => app.toggle_running(),
                    KeyCode::Char('s') => app.cycle_sort(),
                    _ => {}
                },
                _ => {}
            }
        }
        app.tick();
    }
    Ok(())
}
