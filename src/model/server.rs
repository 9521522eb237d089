use crate::error::MetricsError;
use crate::model::floor::TableId;
use chrono::{Duration, NaiveTime};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServerId(pub String);

impl ServerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Minutes a table of the server's station has been waiting for a visit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableWait {
    pub table: TableId,
    pub minutes: u32,
}

impl TableWait {
    pub fn new(table: TableId, minutes: u32) -> Self {
        Self { table, minutes }
    }
}

/// Score and activity sampled at one quarter-hour mark of the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotSample {
    pub slot: NaiveTime,
    pub score: u8,
    pub activity: u8,
}

impl SlotSample {
    pub fn new(slot: NaiveTime, score: u8, activity: u8) -> Self {
        Self {
            slot,
            score,
            activity,
        }
    }
}

/// One server's reading for a reporting interval, as produced by the
/// tracking system.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerMetrics {
    pub id: ServerId,
    pub name: String,
    /// distance per frame, >= 0.0
    pub speed: f64,
    /// minutes, >= 0.0
    pub avg_response_minutes: f64,
    pub tables_visited: u32,
    /// > 0
    pub total_tables: u32,
    /// [0.0, 100.0]
    pub standing_percent: f64,
    /// [0.0, 100.0]
    pub recognition_percent: f64,
    pub last_zone: String,
    /// seconds since the last detected movement
    pub idle_seconds: u32,
    /// minutes the composite score has stayed in the alert band
    pub low_score_minutes: u32,
    pub station: Vec<TableWait>,
    pub camera: Option<String>,
    pub arrival: NaiveTime,
    /// floor coordinates, [0.0, 100.0] from the top-left corner
    pub position: (f64, f64),
    /// quarter-hour samples since the server's arrival, oldest first
    pub slots: Vec<SlotSample>,
}

impl ServerMetrics {
    pub fn validate(&self) -> Result<(), MetricsError> {
        let reals = [
            ("speed", self.speed),
            ("average response time", self.avg_response_minutes),
            ("standing percent", self.standing_percent),
            ("recognition percent", self.recognition_percent),
        ];
        if let Some((field, _)) = reals.iter().find(|(_, v)| !v.is_finite()) {
            return Err(MetricsError::NotFinite {
                server: self.id.clone(),
                field: *field,
            });
        }

        if let Some((field, value)) = reals[..2].iter().find(|(_, v)| *v < 0.0) {
            return Err(MetricsError::Negative {
                server: self.id.clone(),
                field: *field,
                value: *value,
            });
        }

        if self.total_tables == 0 {
            return Err(MetricsError::NoTables {
                server: self.id.clone(),
            });
        }

        if self.tables_visited > self.total_tables {
            return Err(MetricsError::VisitedExceedsTotal {
                server: self.id.clone(),
                visited: self.tables_visited,
                total: self.total_tables,
            });
        }

        if let Some((field, value)) = reals[2..]
            .iter()
            .find(|(_, v)| !(0.0..=100.0).contains(v))
        {
            return Err(MetricsError::PercentOutOfRange {
                server: self.id.clone(),
                field: *field,
                value: *value,
            });
        }

        for sample in &self.slots {
            for (field, value) in [("slot score", sample.score), ("slot activity", sample.activity)] {
                if value > 100 {
                    return Err(MetricsError::PercentOutOfRange {
                        server: self.id.clone(),
                        field,
                        value: value as f64,
                    });
                }
            }
        }

        Ok(())
    }

    pub fn coverage_percent(&self) -> f64 {
        if self.total_tables > 0 {
            self.tables_visited as f64 / self.total_tables as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Longest wait in the station; the first table wins a tie.
    pub fn worst_wait(&self) -> Option<TableWait> {
        self.station.iter().copied().fold(None, |worst, w| match worst {
            Some(best) if best.minutes >= w.minutes => Some(best),
            _ => Some(w),
        })
    }

    /// "Zone B - Centre" reads as "Centre".
    pub fn short_zone(&self) -> &str {
        self.last_zone
            .split_once(" - ")
            .map(|(_, area)| area)
            .unwrap_or(&self.last_zone)
    }

    pub fn on_shift_for(&self, now: NaiveTime) -> Duration {
        let elapsed = now - self.arrival;
        if elapsed < Duration::zero() {
            Duration::zero()
        } else {
            elapsed
        }
    }
}
