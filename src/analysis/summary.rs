use crate::analysis::alerts::{Alert, Severity};
use crate::analysis::score::EfficiencyScore;
use crate::model::floor::Floor;
use crate::model::server::ServerMetrics;
use chrono::NaiveTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServiceClock {
    pub start: NaiveTime,
    pub now: NaiveTime,
}

/// Floor-wide figures for the dashboard header.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalSnapshot {
    active_server_count: usize,
    total_clients: u32,
    tables_occupied: usize,
    total_tables: usize,
    avg_wait_minutes: f64,
    /// None without servers
    avg_score: Option<f64>,
    total_alerts: usize,
    critical_alerts: usize,
    service_start: NaiveTime,
    current_time: NaiveTime,
}

impl GlobalSnapshot {
    pub fn active_server_count(&self) -> usize {
        self.active_server_count
    }

    pub fn total_clients(&self) -> u32 {
        self.total_clients
    }

    pub fn tables_occupied(&self) -> usize {
        self.tables_occupied
    }

    pub fn total_tables(&self) -> usize {
        self.total_tables
    }

    pub fn avg_wait_minutes(&self) -> f64 {
        self.avg_wait_minutes
    }

    pub fn avg_score(&self) -> Option<f64> {
        self.avg_score
    }

    pub fn total_alerts(&self) -> usize {
        self.total_alerts
    }

    pub fn critical_alerts(&self) -> usize {
        self.critical_alerts
    }

    pub fn service_start(&self) -> NaiveTime {
        self.service_start
    }

    pub fn current_time(&self) -> NaiveTime {
        self.current_time
    }

    pub fn occupancy_percent(&self) -> f64 {
        if self.total_tables > 0 {
            self.tables_occupied as f64 / self.total_tables as f64 * 100.0
        } else {
            0.0
        }
    }
}

pub fn aggregate(
    metrics: &[ServerMetrics],
    scores: &[EfficiencyScore],
    alerts: &[Alert],
    floor: &Floor,
    clock: ServiceClock,
) -> GlobalSnapshot {
    let avg_score = if scores.is_empty() {
        None
    } else {
        let sum = scores.iter().map(|s| s.composite() as u32).sum::<u32>();
        Some(sum as f64 / scores.len() as f64)
    };

    GlobalSnapshot {
        active_server_count: metrics.len(),
        total_clients: floor.guest_count(),
        tables_occupied: floor.seated_count(),
        total_tables: floor.table_count(),
        avg_wait_minutes: floor.avg_wait_minutes(),
        avg_score,
        total_alerts: alerts.len(),
        critical_alerts: alerts
            .iter()
            .filter(|a| a.severity() == Severity::Critical)
            .count(),
        service_start: clock.start,
        current_time: clock.now,
    }
}
