use crate::model::server::ServerId;
use crate::state::snapshot::Snapshot;
use std::collections::VecDeque;

/// Last `capacity` composite scores per server, oldest first. A server seen
/// for the first time starts from the quarter-hour scores it reports.
pub struct ScoreHistory {
    capacity: usize,
    series: Vec<(ServerId, VecDeque<u8>)>,
}

impl ScoreHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            series: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn record(&mut self, snapshot: &Snapshot) {
        for view in snapshot.servers() {
            let idx = match self.series.iter().position(|(id, _)| id == view.id()) {
                Some(idx) => idx,
                None => {
                    let slots = &view.metrics().slots;
                    let seed = slots[slots.len().saturating_sub(self.capacity - 1)..]
                        .iter()
                        .map(|s| s.score);
                    let mut points = VecDeque::with_capacity(self.capacity);
                    points.extend(seed);
                    self.series.push((view.id().clone(), points));
                    self.series.len() - 1
                }
            };
            let points = &mut self.series[idx].1;
            if points.len() == self.capacity {
                points.pop_front();
            }
            points.push_back(view.score().composite());
        }
    }

    pub fn series(&self, id: &ServerId) -> Option<&VecDeque<u8>> {
        self.series
            .iter()
            .find(|(server, _)| server == id)
            .map(|(_, points)| points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::fixture::reference_reading;
    use crate::monitor::engine::build_snapshot;
    use crate::policy::Policy;

    fn id(s: &str) -> ServerId {
        ServerId(s.to_string())
    }

    #[test]
    fn test_series_starts_from_reported_slots() {
        let snapshot = build_snapshot(0, reference_reading(), None, &Policy::default());
        let mut history = ScoreHistory::new(16);
        history.record(&snapshot);

        let srv1 = history.series(&id("srv-1")).unwrap();
        assert_eq!(
            vec![72, 80, 85, 88, 91, 87, 85, 87, 87],
            srv1.iter().copied().collect::<Vec<u8>>()
        );
        assert_eq!(Some(&35), history.series(&id("srv-3")).unwrap().front());
    }

    #[test]
    fn test_seed_is_trimmed_to_capacity() {
        let snapshot = build_snapshot(0, reference_reading(), None, &Policy::default());
        let mut history = ScoreHistory::new(4);
        history.record(&snapshot);
        history.record(&snapshot);

        let srv3 = history.series(&id("srv-3")).unwrap();
        assert_eq!(vec![22, 28, 28, 28], srv3.iter().copied().collect::<Vec<u8>>());
    }
}
