use crate::analysis::score::SpeedBand;
use crate::policy::ScoringPolicy;
use crate::state::snapshot::Snapshot;
use std::fmt::Write;

/// Plain-text rendering of a snapshot for `--once`.
pub fn render_report(snapshot: &Snapshot, scoring: &ScoringPolicy) -> String {
    let mut out = String::new();
    let global = snapshot.global();

    let _ = writeln!(
        out,
        "Floorwatch @ {} (service since {}, refresh {})",
        global.current_time().format("%H:%M"),
        global.service_start().format("%H:%M"),
        snapshot.generation()
    );
    let _ = writeln!(
        out,
        "servers {} | guests {} | tables {}/{} ({:.0}%) | avg wait {:.1} min | avg score {}",
        global.active_server_count(),
        global.total_clients(),
        global.tables_occupied(),
        global.total_tables(),
        global.occupancy_percent(),
        global.avg_wait_minutes(),
        global
            .avg_score()
            .map(|s| format!("{:.1}", s))
            .unwrap_or_else(|| "-".to_string()),
    );
    out.push('\n');

    let _ = writeln!(
        out,
        "{:<8} {:<10} {:>5}  {:<9} {:>5} {:>5} {:>5} {:>5}  {}",
        "ID", "Name", "Score", "Label", "Spd", "React", "Cov", "Stand", "Pace"
    );
    for view in snapshot.servers() {
        let s = view.score();
        let _ = writeln!(
            out,
            "{:<8} {:<10} {:>5}  {:<9} {:>5} {:>5} {:>5} {:>5}  {}",
            view.id().as_str(),
            view.metrics().name,
            s.composite(),
            s.label().as_str(),
            s.speed(),
            s.reactivity(),
            s.coverage(),
            s.standing(),
            SpeedBand::for_speed(view.metrics().speed, scoring).as_str()
        );
    }

    if !snapshot.alerts().is_empty() {
        out.push('\n');
        let _ = writeln!(out, "Alerts ({}):", snapshot.alerts().len());
        for alert in snapshot.alerts() {
            let _ = writeln!(
                out,
                "  [{}] {} {} {}{}",
                alert.severity().as_str(),
                alert.timestamp().format("%H:%M"),
                alert.server(),
                alert.message(),
                alert
                    .evidence()
                    .map(|e| format!(" <{}>", e))
                    .unwrap_or_default()
            );
        }
    }

    for rejected in snapshot.rejected() {
        let _ = writeln!(out, "rejected: {}", rejected);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::fixture::reference_reading;
    use crate::monitor::engine::build_snapshot;
    use crate::policy::Policy;

    #[test]
    fn test_report_lists_servers_and_sorted_alerts() {
        let policy = Policy::default();
        let snapshot = build_snapshot(0, reference_reading(), None, &policy);
        let report = render_report(&snapshot, &policy.scoring);

        assert!(report.contains("Floorwatch @ 20:42 (service since 19:00, refresh 0)"));
        assert!(report.contains("srv-1    Xavier        87  Excellent"));
        assert!(report.contains("srv-3    Zoe           28  Alert"));
        assert!(report.contains("  Fast\n"));
        assert!(report.contains("  Slow\n"));
        assert!(report.contains("Alerts (5):"));

        let critical = report.find("[critical]").unwrap();
        let warning = report.find("[warning]").unwrap();
        assert!(critical < warning);
        assert!(report.contains("<CAM-01@20:42>"));
        assert!(!report.contains("rejected:"));
    }
}
