use crate::analysis::alerts::{Alert, derive_alerts, sort_for_display};
use crate::analysis::score::{EfficiencyScore, score};
use crate::analysis::summary::{ServiceClock, aggregate};
use crate::analysis::trend::score_trend;
use crate::feed::source::{MetricsFeed, Reading};
use crate::model::server::ServerMetrics;
use crate::policy::Policy;
use crate::state::history::ScoreHistory;
use crate::state::snapshot::{ServerView, Snapshot};
use std::mem;
use tracing::{info, warn};

/// Scores one reading into a complete snapshot. Servers whose metrics fail
/// validation are left out and listed as rejected.
pub fn build_snapshot(
    generation: usize,
    reading: Reading,
    previous: Option<&Snapshot>,
    policy: &Policy,
) -> Snapshot {
    let mut rejected = Vec::new();
    let mut accepted: Vec<(ServerMetrics, EfficiencyScore)> = Vec::new();
    for metrics in reading.servers {
        match score(&metrics, &policy.scoring) {
            Ok(s) => accepted.push((metrics, s)),
            Err(e) => {
                warn!(generation, error = %e, "rejecting server metrics");
                rejected.push(e);
            }
        }
    }

    let alerts = accepted
        .iter()
        .map(|(m, s)| derive_alerts(m, s, reading.taken_at, policy))
        .collect::<Vec<Vec<Alert>>>();
    let (metrics, scores): (Vec<ServerMetrics>, Vec<EfficiencyScore>) =
        accepted.into_iter().unzip();

    let mut all_alerts = alerts.iter().flatten().cloned().collect::<Vec<Alert>>();
    sort_for_display(&mut all_alerts);

    let global = aggregate(
        &metrics,
        &scores,
        &all_alerts,
        &reading.floor,
        ServiceClock {
            start: reading.service_start,
            now: reading.taken_at,
        },
    );

    let servers = metrics
        .into_iter()
        .zip(scores)
        .zip(alerts)
        .map(|((m, s), a)| {
            let before = previous
                .and_then(|p| p.server(&m.id))
                .map(|v| v.score().composite());
            let trend = score_trend(before, s.composite());
            ServerView::new(m, s, a, trend)
        })
        .collect();

    Snapshot::new(
        generation,
        reading.taken_at,
        servers,
        reading.floor,
        global,
        all_alerts,
        rejected,
    )
}

/// Single writer of the read model: each refresh swaps in a whole new
/// snapshot and keeps the one it replaced.
pub struct Monitor {
    policy: Policy,
    feed: Box<dyn MetricsFeed>,
    previous_snapshot: Option<Snapshot>,
    current_snapshot: Snapshot,
    history: ScoreHistory,
}

impl Monitor {
    pub fn new(policy: Policy, mut feed: Box<dyn MetricsFeed>, history_len: usize) -> Self {
        let current_snapshot = build_snapshot(0, feed.poll(0), None, &policy);
        let mut history = ScoreHistory::new(history_len);
        history.record(&current_snapshot);
        info!(feed = feed.name(), "monitor started");
        Self {
            policy,
            feed,
            previous_snapshot: None,
            current_snapshot,
            history,
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn feed_name(&self) -> &str {
        self.feed.name()
    }

    pub fn history(&self) -> &ScoreHistory {
        &self.history
    }

    pub fn refresh(&mut self) {
        let generation = self.current_snapshot.generation() + 1;
        let reading = self.feed.poll(generation);
        let next = build_snapshot(generation, reading, Some(&self.current_snapshot), &self.policy);
        self.history.record(&next);

        let old_snapshot = mem::replace(&mut self.current_snapshot, next);
        self.previous_snapshot = Some(old_snapshot);

        let global = self.current_snapshot.global();
        info!(
            generation,
            servers = global.active_server_count(),
            alerts = global.total_alerts(),
            critical = global.critical_alerts(),
            rejected = self.current_snapshot.rejected().len(),
            "snapshot refreshed"
        );
    }

    pub fn current_snapshot(&self) -> &Snapshot {
        &self.current_snapshot
    }

    pub fn previous_snapshot(&self) -> &Snapshot {
        self.previous_snapshot
            .as_ref()
            .unwrap_or(&self.current_snapshot)
    }
}
