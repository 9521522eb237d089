use crate::feed::source::{MetricsFeed, Reading};
use crate::model::floor::{Floor, Table, TableId, TableStatus};
use crate::model::server::{ServerId, ServerMetrics, SlotSample, TableWait};
use chrono::{Duration, NaiveTime};

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

pub fn service_start() -> NaiveTime {
    at(19, 0)
}

pub fn reference_time() -> NaiveTime {
    at(20, 42)
}

fn station(waits: &[(u32, u32)]) -> Vec<TableWait> {
    waits
        .iter()
        .map(|(table, minutes)| TableWait::new(TableId(*table), *minutes))
        .collect()
}

/// Quarter-hour samples from `first`, one per (score, activity) pair.
fn slots(first: NaiveTime, samples: &[(u8, u8)]) -> Vec<SlotSample> {
    samples
        .iter()
        .enumerate()
        .map(|(i, (score, activity))| {
            SlotSample::new(first + Duration::minutes(15 * i as i64), *score, *activity)
        })
        .collect()
}

/// Three servers of a dinner service: one excellent, one to watch, one in
/// the alert band.
pub fn reference_servers() -> Vec<ServerMetrics> {
    vec![
        ServerMetrics {
            id: ServerId("srv-1".to_string()),
            name: "Xavier".to_string(),
            speed: 3.2,
            avg_response_minutes: 1.8,
            tables_visited: 11,
            total_tables: 15,
            standing_percent: 93.0,
            recognition_percent: 98.0,
            last_zone: "Zone B - Centre".to_string(),
            idle_seconds: 20,
            low_score_minutes: 0,
            station: station(&[(1, 0), (2, 3), (5, 0), (6, 0), (10, 0), (13, 0)]),
            camera: Some("CAM-02".to_string()),
            arrival: at(19, 0),
            position: (42.0, 35.0),
            slots: slots(
                at(19, 0),
                &[(72, 72), (80, 81), (85, 88), (88, 90), (91, 94), (87, 87), (85, 85), (87, 87)],
            ),
        },
        ServerMetrics {
            id: ServerId("srv-2".to_string()),
            name: "Yasmine".to_string(),
            speed: 1.9,
            avg_response_minutes: 4.2,
            tables_visited: 7,
            total_tables: 15,
            standing_percent: 81.0,
            recognition_percent: 94.0,
            last_zone: "Zone A - Entrance".to_string(),
            idle_seconds: 45,
            low_score_minutes: 0,
            station: station(&[(8, 6), (11, 4)]),
            camera: Some("CAM-04".to_string()),
            arrival: at(19, 0),
            position: (18.0, 62.0),
            slots: slots(
                at(19, 0),
                &[(55, 55), (60, 62), (65, 68), (62, 64), (58, 60), (61, 63), (59, 61), (61, 63)],
            ),
        },
        ServerMetrics {
            id: ServerId("srv-3".to_string()),
            name: "Zoe".to_string(),
            speed: 0.6,
            avg_response_minutes: 8.5,
            tables_visited: 3,
            total_tables: 15,
            standing_percent: 62.0,
            recognition_percent: 91.0,
            last_zone: "Zone D - Bar".to_string(),
            idle_seconds: 192,
            low_score_minutes: 35,
            station: station(&[(4, 12), (14, 11)]),
            camera: Some("CAM-01".to_string()),
            arrival: at(19, 15),
            position: (80.0, 78.0),
            slots: slots(
                at(19, 15),
                &[(35, 38), (40, 42), (32, 35), (28, 30), (25, 27), (22, 24), (28, 28)],
            ),
        },
    ]
}

pub fn reference_floor() -> Floor {
    use TableStatus::*;
    let seated = |id, x, y, status, wait, guests| {
        Table::new(TableId(id), x, y, status, Some(wait), guests)
    };
    Floor::new(vec![
        seated(1, 12.0, 15.0, Visited, 0, 4),
        seated(2, 12.0, 38.0, Occupied, 3, 3),
        Table::free(TableId(3), 12.0, 60.0),
        seated(4, 12.0, 80.0, Waiting, 12, 2),
        seated(5, 38.0, 15.0, Visited, 0, 4),
        seated(6, 38.0, 38.0, Visited, 0, 3),
        Table::free(TableId(7), 38.0, 60.0),
        seated(8, 38.0, 80.0, Occupied, 6, 4),
        Table::free(TableId(9), 63.0, 15.0),
        seated(10, 63.0, 38.0, Visited, 0, 2),
        seated(11, 63.0, 60.0, Occupied, 4, 3),
        Table::free(TableId(12), 63.0, 80.0),
        seated(13, 85.0, 25.0, Visited, 0, 4),
        seated(14, 85.0, 55.0, Waiting, 11, 2),
        Table::free(TableId(15), 85.0, 78.0),
    ])
}

pub fn reference_reading() -> Reading {
    Reading {
        taken_at: reference_time(),
        service_start: service_start(),
        servers: reference_servers(),
        floor: reference_floor(),
    }
}

/// Replays the reference reading on every poll.
pub struct FixtureFeed;

impl FixtureFeed {
    pub fn new() -> Self {
        Self
    }
}

impl MetricsFeed for FixtureFeed {
    fn name(&self) -> &str {
        "fixture"
    }

    fn poll(&mut self, _generation: usize) -> Reading {
        reference_reading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::score::score;
    use crate::policy::ScoringPolicy;

    #[test]
    fn test_latest_slot_matches_the_live_score() {
        let policy = ScoringPolicy::default();
        for server in reference_servers() {
            let last = server.slots.last().unwrap();
            assert_eq!(at(20, 45), last.slot);
            assert_eq!(score(&server, &policy).unwrap().composite(), last.score);
            assert_eq!(server.arrival, server.slots[0].slot);
        }
    }
}
