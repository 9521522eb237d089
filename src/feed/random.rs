use crate::analysis::score::{ScoreLabel, score};
use crate::feed::fixture::{reference_floor, reference_servers, reference_time, service_start};
use crate::feed::source::{MetricsFeed, Reading};
use crate::model::floor::{Floor, Table, TableStatus};
use crate::model::server::{ServerMetrics, SlotSample};
use crate::policy::ScoringPolicy;
use chrono::{Duration, NaiveTime, Timelike};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

/// Quarter-hour samples kept per server.
const MAX_SLOTS: usize = 32;

/// Random walk over the reference service, one step per generation.
pub struct RandomFeed {
    rng: StdRng,
    servers: Vec<ServerMetrics>,
    floor: Floor,
    service_start: NaiveTime,
    started_at: NaiveTime,
    step_minutes: u32,
    last_generation: usize,
    scoring: ScoringPolicy,
}

impl RandomFeed {
    pub fn new(seed: u64, step_minutes: u32, scoring: ScoringPolicy) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            servers: reference_servers(),
            floor: reference_floor(),
            service_start: service_start(),
            started_at: reference_time(),
            step_minutes,
            last_generation: 0,
            scoring,
        }
    }

    fn time_at(&self, generation: usize) -> NaiveTime {
        self.started_at + Duration::minutes(self.step_minutes as i64 * generation as i64)
    }

    fn step(&mut self, now: NaiveTime) {
        let step = self.step_minutes;
        let mark = quarter_hour_mark(now);
        self.floor
            .tables_mut()
            .iter_mut()
            .for_each(|table| drift_table(&mut self.rng, table, step));

        for server in self.servers.iter_mut() {
            drift_server(&mut self.rng, server, step);
            sync_station(server, &self.floor);

            let Ok(current) = score(server, &self.scoring) else {
                continue;
            };
            // the tracker counts time spent in the alert band
            server.low_score_minutes = if current.label() == ScoreLabel::Alert {
                server.low_score_minutes + step
            } else {
                0
            };

            if server.slots.last().is_none_or(|last| last.slot != mark) {
                let sample = SlotSample::new(mark, current.composite(), activity(server));
                server.slots.push(sample);
                if server.slots.len() > MAX_SLOTS {
                    server.slots.remove(0);
                }
            }
        }
    }
}

/// Nearest quarter-hour, the mark a sample is filed under.
fn quarter_hour_mark(time: NaiveTime) -> NaiveTime {
    let minutes = (time.num_seconds_from_midnight() / 60 + 7) / 15 * 15 % (24 * 60);
    NaiveTime::from_num_seconds_from_midnight_opt(minutes * 60, 0).unwrap_or(time)
}

/// Standing time, discounted by up to ten minutes without movement.
fn activity(server: &ServerMetrics) -> u8 {
    let moving = 1.0 - server.idle_seconds.min(600) as f64 / 600.0;
    (server.standing_percent * moving).clamp(0.0, 100.0).round() as u8
}

fn drift_table(rng: &mut StdRng, table: &mut Table, step: u32) {
    let wait = table.wait_minutes().unwrap_or(0);
    match table.status() {
        TableStatus::Free => {
            if rng.gen_bool(0.12) {
                table.set_status(TableStatus::Waiting);
                table.set_wait_minutes(Some(0));
                table.set_guests(rng.gen_range(1..=6));
            }
        }
        TableStatus::Waiting => {
            if rng.gen_bool(0.3) {
                table.set_status(TableStatus::Visited);
                table.set_wait_minutes(Some(0));
            } else {
                table.set_wait_minutes(Some(wait + step));
            }
        }
        TableStatus::Visited => {
            if rng.gen_bool(0.25) {
                table.set_status(TableStatus::Occupied);
            }
        }
        TableStatus::Occupied => {
            if rng.gen_bool(0.1) {
                table.set_status(TableStatus::Free);
                table.set_wait_minutes(None);
                table.set_guests(0);
            } else if rng.gen_bool(0.35) {
                table.set_wait_minutes(Some(0));
            } else {
                table.set_wait_minutes(Some(wait + step));
            }
        }
    }
}

fn drift_server(rng: &mut StdRng, server: &mut ServerMetrics, step: u32) {
    server.speed = (server.speed + rng.gen_range(-0.3..=0.3)).clamp(0.0, 4.5);
    server.avg_response_minutes =
        (server.avg_response_minutes + rng.gen_range(-0.6..=0.6)).clamp(0.5, 14.0);
    server.standing_percent = (server.standing_percent + rng.gen_range(-4.0..=4.0)).clamp(0.0, 100.0);
    if server.tables_visited < server.total_tables && rng.gen_bool(0.3) {
        server.tables_visited += 1;
    }
    server.idle_seconds = if rng.gen_bool(0.25) {
        server.idle_seconds + step * 60
    } else {
        rng.gen_range(0..60)
    };
    let (x, y) = server.position;
    server.position = (
        (x + rng.gen_range(-3.0..=3.0)).clamp(5.0, 95.0),
        (y + rng.gen_range(-3.0..=3.0)).clamp(5.0, 95.0),
    );
}

/// Station waits follow the floor: only tables still expecting a visit wait.
fn sync_station(server: &mut ServerMetrics, floor: &Floor) {
    for wait in server.station.iter_mut() {
        wait.minutes = floor
            .table_by_id(wait.table)
            .filter(|t| matches!(t.status(), TableStatus::Waiting | TableStatus::Occupied))
            .and_then(|t| t.wait_minutes())
            .unwrap_or(0);
    }
}

impl MetricsFeed for RandomFeed {
    fn name(&self) -> &str {
        "random"
    }

    fn poll(&mut self, generation: usize) -> Reading {
        while self.last_generation < generation {
            self.last_generation += 1;
            let now = self.time_at(self.last_generation);
            self.step(now);
        }
        debug!(generation, "random feed advanced");

        Reading {
            taken_at: self.time_at(generation),
            service_start: self.service_start,
            servers: self.servers.clone(),
            floor: self.floor.clone(),
        }
    }
}
