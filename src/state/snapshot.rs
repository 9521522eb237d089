use crate::analysis::alerts::Alert;
use crate::analysis::score::EfficiencyScore;
use crate::analysis::summary::GlobalSnapshot;
use crate::analysis::trend::ScoreTrend;
use crate::error::MetricsError;
use crate::model::floor::Floor;
use crate::model::server::{ServerId, ServerMetrics};
use chrono::NaiveTime;

/// A scored server as shown on the dashboard.
#[derive(Clone, Debug)]
pub struct ServerView {
    metrics: ServerMetrics,
    score: EfficiencyScore,
    alerts: Vec<Alert>,
    trend: ScoreTrend,
}

impl ServerView {
    pub fn new(
        metrics: ServerMetrics,
        score: EfficiencyScore,
        alerts: Vec<Alert>,
        trend: ScoreTrend,
    ) -> Self {
        Self {
            metrics,
            score,
            alerts,
            trend,
        }
    }

    pub fn id(&self) -> &ServerId {
        &self.metrics.id
    }

    pub fn metrics(&self) -> &ServerMetrics {
        &self.metrics
    }

    pub fn score(&self) -> &EfficiencyScore {
        &self.score
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn trend(&self) -> ScoreTrend {
        self.trend
    }
}

/// Complete read model for one refresh. Never updated in place; the monitor
/// replaces it whole.
#[derive(Clone, Debug)]
pub struct Snapshot {
    generation: usize,
    taken_at: NaiveTime,
    servers: Vec<ServerView>,
    floor: Floor,
    global: GlobalSnapshot,
    /// every server's alerts, critical first
    alerts: Vec<Alert>,
    rejected: Vec<MetricsError>,
}

impl Snapshot {
    pub fn new(
        generation: usize,
        taken_at: NaiveTime,
        servers: Vec<ServerView>,
        floor: Floor,
        global: GlobalSnapshot,
        alerts: Vec<Alert>,
        rejected: Vec<MetricsError>,
    ) -> Self {
        Self {
            generation,
            taken_at,
            servers,
            floor,
            global,
            alerts,
            rejected,
        }
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn taken_at(&self) -> NaiveTime {
        self.taken_at
    }

    pub fn servers(&self) -> &[ServerView] {
        &self.servers
    }

    pub fn server(&self, id: &ServerId) -> Option<&ServerView> {
        self.servers.iter().find(|s| s.id() == id)
    }

    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    pub fn global(&self) -> &GlobalSnapshot {
        &self.global
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn has_alert(&self, id: &str) -> bool {
        self.alerts.iter().any(|a| a.id() == id)
    }

    /// Alerts not present in `previous`, in display order.
    pub fn raised_since<'a>(&'a self, previous: &Snapshot) -> Vec<&'a Alert> {
        self.alerts
            .iter()
            .filter(|a| !previous.has_alert(a.id()))
            .collect()
    }

    pub fn rejected(&self) -> &[MetricsError] {
        &self.rejected
    }
}
