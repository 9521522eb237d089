use crate::analysis::score::{EfficiencyScore, ScoreLabel};
use crate::model::server::{ServerId, ServerMetrics};
use crate::policy::Policy;
use chrono::NaiveTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Warning,
}

impl Severity {
    fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Warning => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    LowReactivity,
    LowCoverage,
    Inactivity,
    UnservedTable,
    SustainedLowScore,
}

impl AlertKind {
    pub fn severity(self) -> Severity {
        match self {
            AlertKind::Inactivity | AlertKind::UnservedTable => Severity::Critical,
            AlertKind::LowReactivity | AlertKind::LowCoverage | AlertKind::SustainedLowScore => {
                Severity::Warning
            }
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            AlertKind::LowReactivity => "reactivity",
            AlertKind::LowCoverage => "coverage",
            AlertKind::Inactivity => "inactivity",
            AlertKind::UnservedTable => "unserved",
            AlertKind::SustainedLowScore => "low-score",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Alert {
    id: String,
    kind: AlertKind,
    message: String,
    timestamp: NaiveTime,
    server: ServerId,
    /// opaque pointer to supporting footage, passed through untouched
    evidence: Option<String>,
}

impl Alert {
    fn new(kind: AlertKind, message: String, metrics: &ServerMetrics, now: NaiveTime) -> Self {
        let evidence = metrics
            .camera
            .as_ref()
            .map(|camera| format!("{}@{}", camera, now.format("%H:%M")));
        Self {
            id: format!("{}-{}", metrics.id, kind.slug()),
            kind,
            message,
            timestamp: now,
            server: metrics.id.clone(),
            evidence,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> AlertKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> NaiveTime {
        self.timestamp
    }

    pub fn server(&self) -> &ServerId {
        &self.server
    }

    pub fn evidence(&self) -> Option<&str> {
        self.evidence.as_deref()
    }
}

type Rule = fn(&ServerMetrics, &EfficiencyScore, &Policy) -> Option<(AlertKind, String)>;

const RULES: [Rule; 5] = [
    low_reactivity,
    low_coverage,
    inactivity,
    unserved_table,
    sustained_low_score,
];

// Per-metric warnings describe a server still out of the alert band; once in
// it, the sustained-low-score rule speaks for the server.
fn low_reactivity(
    metrics: &ServerMetrics,
    score: &EfficiencyScore,
    policy: &Policy,
) -> Option<(AlertKind, String)> {
    (score.label() != ScoreLabel::Alert && score.reactivity() < policy.alerts.low_reactivity).then(
        || {
            (
                AlertKind::LowReactivity,
                format!(
                    "Low reactivity: {:.1} min on average",
                    metrics.avg_response_minutes
                ),
            )
        },
    )
}

fn low_coverage(
    metrics: &ServerMetrics,
    score: &EfficiencyScore,
    policy: &Policy,
) -> Option<(AlertKind, String)> {
    (score.label() != ScoreLabel::Alert && score.coverage() < policy.alerts.low_coverage).then(
        || {
            (
                AlertKind::LowCoverage,
                format!(
                    "Low coverage: {:.0}% of tables",
                    metrics.coverage_percent()
                ),
            )
        },
    )
}

fn inactivity(
    metrics: &ServerMetrics,
    _score: &EfficiencyScore,
    policy: &Policy,
) -> Option<(AlertKind, String)> {
    (metrics.idle_seconds > policy.alerts.inactivity_seconds).then(|| {
        (
            AlertKind::Inactivity,
            format!(
                "Inactivity detected: {}min {}s without movement",
                metrics.idle_seconds / 60,
                metrics.idle_seconds % 60
            ),
        )
    })
}

fn unserved_table(
    metrics: &ServerMetrics,
    _score: &EfficiencyScore,
    policy: &Policy,
) -> Option<(AlertKind, String)> {
    metrics
        .worst_wait()
        .filter(|w| w.minutes > policy.alerts.unserved_minutes)
        .map(|w| {
            (
                AlertKind::UnservedTable,
                format!("Table {} unserved for {} minutes", w.table, w.minutes),
            )
        })
}

fn sustained_low_score(
    metrics: &ServerMetrics,
    score: &EfficiencyScore,
    policy: &Policy,
) -> Option<(AlertKind, String)> {
    (score.label() == ScoreLabel::Alert
        && metrics.low_score_minutes >= policy.alerts.low_score_minutes)
        .then(|| {
            (
                AlertKind::SustainedLowScore,
                format!(
                    "Efficiency score < {} for {} min",
                    policy.scoring.watch_from, metrics.low_score_minutes
                ),
            )
        })
}

/// Evaluates every rule against one reading. The same inputs always give the
/// same alerts, ids included.
pub fn derive_alerts(
    metrics: &ServerMetrics,
    score: &EfficiencyScore,
    now: NaiveTime,
    policy: &Policy,
) -> Vec<Alert> {
    RULES
        .iter()
        .filter_map(|rule| rule(metrics, score, policy))
        .map(|(kind, message)| Alert::new(kind, message, metrics, now))
        .collect()
}

/// Critical before warning, input order kept within a severity.
pub fn sort_for_display(alerts: &mut [Alert]) {
    alerts.sort_by_key(|a| a.severity().rank());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::score::score;
    use crate::feed::fixture::{reference_servers, reference_time};
    use crate::model::floor::TableId;
    use crate::model::server::TableWait;
    use crate::model::server::tests::metrics;

    fn derive(m: &ServerMetrics) -> Vec<Alert> {
        let policy = Policy::default();
        let s = score(m, &policy.scoring).unwrap();
        derive_alerts(m, &s, reference_time(), &policy)
    }

    fn kinds(alerts: &[Alert]) -> Vec<AlertKind> {
        alerts.iter().map(|a| a.kind()).collect()
    }

    #[test]
    fn test_reference_servers_raise_documented_alerts() {
        let servers = reference_servers();

        assert!(derive(&servers[0]).is_empty());

        let second = derive(&servers[1]);
        assert_eq!(
            vec![AlertKind::LowReactivity, AlertKind::LowCoverage],
            kinds(&second)
        );
        assert!(second.iter().all(|a| a.severity() == Severity::Warning));
        assert_eq!("Low reactivity: 4.2 min on average", second[0].message());
        assert_eq!("Low coverage: 47% of tables", second[1].message());

        let third = derive(&servers[2]);
        assert_eq!(
            vec![
                AlertKind::Inactivity,
                AlertKind::UnservedTable,
                AlertKind::SustainedLowScore
            ],
            kinds(&third)
        );
        let critical = third
            .iter()
            .filter(|a| a.severity() == Severity::Critical)
            .count();
        assert_eq!(2, critical);
        assert_eq!(
            "Inactivity detected: 3min 12s without movement",
            third[0].message()
        );
        assert_eq!("Table 4 unserved for 12 minutes", third[1].message());
        assert_eq!("Efficiency score < 40 for 35 min", third[2].message());
    }

    #[test]
    fn test_derivation_is_idempotent() {
        for server in reference_servers() {
            assert_eq!(derive(&server), derive(&server));
        }
    }

    #[test]
    fn test_alert_ids_evidence_and_timestamp() {
        let servers = reference_servers();
        let alerts = derive(&servers[1]);

        assert_eq!("srv-2-reactivity", alerts[0].id());
        assert_eq!("srv-2", alerts[0].server().as_str());
        assert_eq!(reference_time(), alerts[0].timestamp());
        assert_eq!(Some("CAM-04@20:42"), alerts[0].evidence());

        let mut m = servers[1].clone();
        m.camera = None;
        assert!(derive(&m).iter().all(|a| a.evidence().is_none()));
    }

    #[test]
    fn test_inactivity_threshold_is_exclusive() {
        let mut m = metrics("srv");
        m.idle_seconds = 180;
        assert!(derive(&m).is_empty());
        m.idle_seconds = 181;
        assert_eq!(vec![AlertKind::Inactivity], kinds(&derive(&m)));
    }

    #[test]
    fn test_unserved_table_names_the_longest_wait() {
        let mut m = metrics("srv");
        m.station = vec![
            TableWait::new(TableId(3), 11),
            TableWait::new(TableId(8), 14),
            TableWait::new(TableId(2), 10),
        ];
        let alerts = derive(&m);

        assert_eq!(vec![AlertKind::UnservedTable], kinds(&alerts));
        assert_eq!("Table 8 unserved for 14 minutes", alerts[0].message());
    }

    #[test]
    fn test_low_score_needs_duration() {
        let mut m = reference_servers()[2].clone();
        m.low_score_minutes = 29;
        assert!(!kinds(&derive(&m)).contains(&AlertKind::SustainedLowScore));
        m.low_score_minutes = 30;
        assert!(kinds(&derive(&m)).contains(&AlertKind::SustainedLowScore));
    }

    #[test]
    fn test_sort_puts_critical_first_and_is_stable() {
        let servers = reference_servers();
        let mut alerts = servers
            .iter()
            .flat_map(|m| derive(m))
            .collect::<Vec<Alert>>();

        sort_for_display(&mut alerts);

        let ids = alerts.iter().map(|a| a.id()).collect::<Vec<&str>>();
        assert_eq!(
            vec![
                "srv-3-inactivity",
                "srv-3-unserved",
                "srv-2-reactivity",
                "srv-2-coverage",
                "srv-3-low-score",
            ],
            ids
        );
    }
}
