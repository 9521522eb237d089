use crate::analysis::alerts::Severity;
use crate::analysis::score::{ScoreLabel, SpeedBand};
use crate::analysis::trend::ScoreTrend;
use crate::model::floor::TableStatus;
use ratatui::style::{Color, Modifier, Style};

pub struct BandStyle {
    pub label: ScoreLabel,
    pub color: Color,
    pub badge: &'static str,
}

const BANDS: [BandStyle; 3] = [
    BandStyle {
        label: ScoreLabel::Excellent,
        color: Color::Green,
        badge: " EXCELLENT ",
    },
    BandStyle {
        label: ScoreLabel::ToWatch,
        color: Color::Yellow,
        badge: " TO WATCH ",
    },
    BandStyle {
        label: ScoreLabel::Alert,
        color: Color::Red,
        badge: " ALERT ",
    },
];

pub struct SeverityStyle {
    pub severity: Severity,
    pub color: Color,
    pub glyph: &'static str,
    pub tag: &'static str,
}

const SEVERITIES: [SeverityStyle; 2] = [
    SeverityStyle {
        severity: Severity::Critical,
        color: Color::Red,
        glyph: "✖",
        tag: "CRIT",
    },
    SeverityStyle {
        severity: Severity::Warning,
        color: Color::Yellow,
        glyph: "▲",
        tag: "WARN",
    },
];

pub struct SpeedStyle {
    pub band: SpeedBand,
    pub color: Color,
    pub label: &'static str,
}

const SPEEDS: [SpeedStyle; 3] = [
    SpeedStyle {
        band: SpeedBand::Fast,
        color: Color::Green,
        label: "fast",
    },
    SpeedStyle {
        band: SpeedBand::Normal,
        color: Color::Yellow,
        label: "normal",
    },
    SpeedStyle {
        band: SpeedBand::Slow,
        color: Color::Red,
        label: "slow",
    },
];

pub struct TableStyle {
    pub status: TableStatus,
    pub color: Color,
    pub label: &'static str,
}

pub const TABLES: [TableStyle; 4] = [
    TableStyle {
        status: TableStatus::Free,
        color: Color::DarkGray,
        label: "Free",
    },
    TableStyle {
        status: TableStatus::Occupied,
        color: Color::Yellow,
        label: "Occupied",
    },
    TableStyle {
        status: TableStatus::Visited,
        color: Color::Green,
        label: "Visited",
    },
    TableStyle {
        status: TableStatus::Waiting,
        color: Color::Red,
        label: "Waiting",
    },
];

/// Distinct colours handed out to servers in list order.
const SERVER_COLORS: [Color; 6] = [
    Color::LightYellow,
    Color::LightBlue,
    Color::LightRed,
    Color::LightMagenta,
    Color::LightCyan,
    Color::LightGreen,
];

pub fn band(label: ScoreLabel) -> &'static BandStyle {
    BANDS.iter().find(|b| b.label == label).unwrap_or(&BANDS[2])
}

pub fn severity(severity: Severity) -> &'static SeverityStyle {
    SEVERITIES
        .iter()
        .find(|s| s.severity == severity)
        .unwrap_or(&SEVERITIES[0])
}

pub fn speed(band: SpeedBand) -> &'static SpeedStyle {
    SPEEDS.iter().find(|s| s.band == band).unwrap_or(&SPEEDS[1])
}

pub fn table(status: TableStatus) -> &'static TableStyle {
    TABLES.iter().find(|t| t.status == status).unwrap_or(&TABLES[0])
}

pub fn server_color(index: usize) -> Color {
    SERVER_COLORS[index % SERVER_COLORS.len()]
}

pub fn trend_arrow(trend: ScoreTrend) -> &'static str {
    match trend {
        ScoreTrend::Up => "↗",
        ScoreTrend::Down => "↘",
        ScoreTrend::Flat => "→",
    }
}

pub fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_has_its_own_entry() {
        for label in [ScoreLabel::Excellent, ScoreLabel::ToWatch, ScoreLabel::Alert] {
            assert_eq!(label, band(label).label);
        }
        for b in [SpeedBand::Fast, SpeedBand::Normal, SpeedBand::Slow] {
            assert_eq!(b, speed(b).band);
        }
        for s in [Severity::Critical, Severity::Warning] {
            assert_eq!(s, severity(s).severity);
        }
        for status in [
            TableStatus::Free,
            TableStatus::Occupied,
            TableStatus::Visited,
            TableStatus::Waiting,
        ] {
            assert_eq!(status, table(status).status);
        }
    }
}
