use crate::monitor::engine::Monitor;
use crate::state::snapshot::ServerView;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortMode {
    Score,
    Alerts,
    Name,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            SortMode::Score => SortMode::Alerts,
            SortMode::Alerts => SortMode::Name,
            SortMode::Name => SortMode::Score,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Score => "score",
            SortMode::Alerts => "alerts",
            SortMode::Name => "name",
        }
    }
}

pub struct App {
    pub monitor: Monitor,
    pub running: bool,
    pub sort_mode: SortMode,
    refresh_every: Duration,
    last_refresh: Instant,
}

impl App {
    pub fn new(monitor: Monitor, refresh_every: Duration) -> Self {
        Self {
            monitor,
            running: true,
            sort_mode: SortMode::Score,
            refresh_every,
            last_refresh: Instant::now(),
        }
    }

    pub fn refresh_every(&self) -> Duration {
        self.refresh_every
    }

    /// Refreshes when live and the interval has passed.
    pub fn tick(&mut self) {
        if self.running && self.last_refresh.elapsed() >= self.refresh_every {
            self.step();
        }
    }

    pub fn step(&mut self) {
        self.monitor.refresh();
        self.last_refresh = Instant::now();
    }

    pub fn toggle_running(&mut self) {
        self.running = !self.running;
    }

    pub fn cycle_sort(&mut self) {
        self.sort_mode = self.sort_mode.next();
    }

    pub fn sorted_servers(&self) -> Vec<&ServerView> {
        let mut servers = self
            .monitor
            .current_snapshot()
            .servers()
            .iter()
            .collect::<Vec<&ServerView>>();
        match self.sort_mode {
            SortMode::Score => {
                servers.sort_by(|a, b| b.score().composite().cmp(&a.score().composite()))
            }
            SortMode::Alerts => servers.sort_by(|a, b| b.alerts().len().cmp(&a.alerts().len())),
            SortMode::Name => servers.sort_by(|a, b| a.metrics().name.cmp(&b.metrics().name)),
        }
        servers
    }
}

impl Drop for App {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::fixture::FixtureFeed;
    use crate::policy::Policy;

    fn app() -> App {
        let monitor = Monitor::new(Policy::default(), Box::new(FixtureFeed::new()), 4);
        App::new(monitor, Duration::from_secs(3600))
    }

    fn names(app: &App) -> Vec<String> {
        app.sorted_servers()
            .iter()
            .map(|v| v.metrics().name.clone())
            .collect()
    }

    #[test]
    fn test_sort_modes() {
        let mut app = app();
        assert_eq!(vec!["Xavier", "Yasmine", "Zoe"], names(&app));

        app.cycle_sort();
        assert_eq!(SortMode::Alerts, app.sort_mode);
        assert_eq!(vec!["Zoe", "Yasmine", "Xavier"], names(&app));

        app.cycle_sort();
        assert_eq!(SortMode::Name, app.sort_mode);
        assert_eq!(vec!["Xavier", "Yasmine", "Zoe"], names(&app));

        app.cycle_sort();
        assert_eq!(SortMode::Score, app.sort_mode);
    }

    #[test]
    fn test_tick_waits_for_interval_and_pause() {
        let mut app = app();
        app.tick();
        assert_eq!(0, app.monitor.current_snapshot().generation());

        app.step();
        assert_eq!(1, app.monitor.current_snapshot().generation());

        app.toggle_running();
        app.refresh_every = Duration::ZERO;
        app.tick();
        assert_eq!(1, app.monitor.current_snapshot().generation());
    }
}
