use crate::error::MetricsError;
use crate::model::server::ServerMetrics;
use crate::policy::ScoringPolicy;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreLabel {
    Excellent,
    ToWatch,
    Alert,
}

impl ScoreLabel {
    pub fn for_composite(composite: u8, policy: &ScoringPolicy) -> Self {
        match composite {
            n if n >= policy.excellent_from => ScoreLabel::Excellent,
            n if n >= policy.watch_from => ScoreLabel::ToWatch,
            _ => ScoreLabel::Alert,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreLabel::Excellent => "Excellent",
            ScoreLabel::ToWatch => "To-watch",
            ScoreLabel::Alert => "Alert",
        }
    }
}

/// Coarse reading of raw movement speed, shown next to the speed sub-score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedBand {
    Fast,
    Normal,
    Slow,
}

impl SpeedBand {
    pub fn for_speed(speed: f64, policy: &ScoringPolicy) -> Self {
        if speed >= policy.speed_fast {
            SpeedBand::Fast
        } else if speed >= policy.speed_slow {
            SpeedBand::Normal
        } else {
            SpeedBand::Slow
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpeedBand::Fast => "Fast",
            SpeedBand::Normal => "Normal",
            SpeedBand::Slow => "Slow",
        }
    }
}

/// The four sub-scores and their weighted composite, all in [0, 100].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EfficiencyScore {
    speed: u8,
    reactivity: u8,
    coverage: u8,
    standing: u8,
    composite: u8,
    label: ScoreLabel,
}

impl EfficiencyScore {
    pub fn from_parts(
        speed: u8,
        reactivity: u8,
        coverage: u8,
        standing: u8,
        policy: &ScoringPolicy,
    ) -> Self {
        let [speed, reactivity, coverage, standing] =
            [speed, reactivity, coverage, standing].map(|s| s.min(100));
        let weighted = speed as u32 * policy.speed_weight
            + reactivity as u32 * policy.reactivity_weight
            + coverage as u32 * policy.coverage_weight
            + standing as u32 * policy.standing_weight;
        // hundredths, half rounds up
        let composite = ((weighted + 50) / 100).min(100) as u8;
        Self {
            speed,
            reactivity,
            coverage,
            standing,
            composite,
            label: ScoreLabel::for_composite(composite, policy),
        }
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn reactivity(&self) -> u8 {
        self.reactivity
    }

    pub fn coverage(&self) -> u8 {
        self.coverage
    }

    pub fn standing(&self) -> u8 {
        self.standing
    }

    pub fn composite(&self) -> u8 {
        self.composite
    }

    pub fn label(&self) -> ScoreLabel {
        self.label
    }
}

fn to_score(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

fn speed_score(speed: f64, policy: &ScoringPolicy) -> u8 {
    to_score(speed / policy.speed_full * 100.0)
}

fn reactivity_score(minutes: f64, policy: &ScoringPolicy) -> u8 {
    let span = policy.response_worst - policy.response_best;
    to_score((policy.response_worst - minutes) / span * 100.0)
}

pub fn score(
    metrics: &ServerMetrics,
    policy: &ScoringPolicy,
) -> Result<EfficiencyScore, MetricsError> {
    metrics.validate()?;
    Ok(EfficiencyScore::from_parts(
        speed_score(metrics.speed, policy),
        reactivity_score(metrics.avg_response_minutes, policy),
        to_score(metrics.coverage_percent()),
        to_score(metrics.standing_percent),
        policy,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::fixture::reference_servers;
    use crate::feed::random::RandomFeed;
    use crate::feed::source::MetricsFeed;
    use crate::model::server::tests::metrics;

    #[test]
    fn test_reference_servers_reproduce_documented_scores() {
        let policy = ScoringPolicy::default();
        let scores = reference_servers()
            .iter()
            .map(|m| score(m, &policy).unwrap())
            .collect::<Vec<EfficiencyScore>>();

        let composites = scores.iter().map(|s| s.composite()).collect::<Vec<u8>>();
        assert_eq!(vec![87, 61, 28], composites);
        assert_eq!(ScoreLabel::Excellent, scores[0].label());
        assert_eq!(ScoreLabel::ToWatch, scores[1].label());
        assert_eq!(ScoreLabel::Alert, scores[2].label());

        // 11/15, 7/15, 3/15 tables
        assert_eq!(73, scores[0].coverage());
        assert_eq!(47, scores[1].coverage());
        assert_eq!(20, scores[2].coverage());
    }

    fn expected_composite(s: &EfficiencyScore) -> u8 {
        let hundredths = 30 * s.speed() as u32
            + 30 * s.reactivity() as u32
            + 25 * s.coverage() as u32
            + 15 * s.standing() as u32;
        ((hundredths + 50) / 100) as u8
    }

    #[test]
    fn test_composite_is_rounded_weighted_sum() {
        let policy = ScoringPolicy::default();
        for parts in [
            [0, 0, 0, 0],
            [100, 100, 100, 100],
            [91, 92, 73, 93],
            [54, 70, 47, 81],
            [17, 29, 20, 62],
            [1, 0, 0, 0],
            [0, 0, 2, 0],
            [33, 67, 12, 99],
        ] {
            let s = EfficiencyScore::from_parts(parts[0], parts[1], parts[2], parts[3], &policy);
            assert_eq!(expected_composite(&s), s.composite(), "{parts:?}");
        }
        // 16.2 + 21.0 + 11.75 + 12.15 = 61.1
        assert_eq!(61, EfficiencyScore::from_parts(54, 70, 47, 81, &policy).composite());
    }

    #[test]
    fn test_drifted_readings_keep_composite_in_range() {
        let policy = ScoringPolicy::default();
        let mut feed = RandomFeed::new(5, 3, policy.clone());
        for generation in 0..80 {
            for m in feed.poll(generation).servers {
                let s = score(&m, &policy).unwrap();
                assert!(s.composite() <= 100);
                assert_eq!(expected_composite(&s), s.composite(), "generation {generation}");
                assert_eq!(ScoreLabel::for_composite(s.composite(), &policy), s.label());
            }
        }
    }

    #[test]
    fn test_exact_half_rounds_up() {
        let policy = ScoringPolicy::default();
        // 0.25 * 2 = 0.5
        assert_eq!(1, EfficiencyScore::from_parts(0, 0, 2, 0, &policy).composite());
        // 13.5 + 12.0 + 10.0 + 6.0 = 41.5
        assert_eq!(42, EfficiencyScore::from_parts(45, 40, 40, 40, &policy).composite());
    }

    #[test]
    fn test_label_boundaries() {
        let policy = ScoringPolicy::default();
        assert_eq!(ScoreLabel::Excellent, ScoreLabel::for_composite(100, &policy));
        assert_eq!(ScoreLabel::Excellent, ScoreLabel::for_composite(70, &policy));
        assert_eq!(ScoreLabel::ToWatch, ScoreLabel::for_composite(69, &policy));
        assert_eq!(ScoreLabel::ToWatch, ScoreLabel::for_composite(40, &policy));
        assert_eq!(ScoreLabel::Alert, ScoreLabel::for_composite(39, &policy));
        assert_eq!(ScoreLabel::Alert, ScoreLabel::for_composite(0, &policy));
    }

    #[test]
    fn test_speed_bands() {
        let policy = ScoringPolicy::default();
        let bands = reference_servers()
            .iter()
            .map(|m| SpeedBand::for_speed(m.speed, &policy))
            .collect::<Vec<SpeedBand>>();
        assert_eq!(vec![SpeedBand::Fast, SpeedBand::Normal, SpeedBand::Slow], bands);

        assert_eq!(SpeedBand::Fast, SpeedBand::for_speed(2.5, &policy));
        assert_eq!(SpeedBand::Normal, SpeedBand::for_speed(2.49, &policy));
        assert_eq!(SpeedBand::Normal, SpeedBand::for_speed(1.0, &policy));
        assert_eq!(SpeedBand::Slow, SpeedBand::for_speed(0.99, &policy));
    }

    #[test]
    fn test_sub_score_curves_clamp() {
        let policy = ScoringPolicy::default();
        assert_eq!(0, speed_score(0.0, &policy));
        assert_eq!(100, speed_score(3.5, &policy));
        assert_eq!(100, speed_score(9.0, &policy));

        assert_eq!(100, reactivity_score(0.2, &policy));
        assert_eq!(100, reactivity_score(1.0, &policy));
        assert_eq!(0, reactivity_score(11.5, &policy));
        assert_eq!(0, reactivity_score(30.0, &policy));
        assert!(reactivity_score(2.0, &policy) > reactivity_score(3.0, &policy));
    }

    #[test]
    fn test_invalid_metrics_are_not_scored() {
        let policy = ScoringPolicy::default();
        let mut m = metrics("srv-9");
        m.total_tables = 0;
        m.tables_visited = 0;

        let err = score(&m, &policy).unwrap_err();
        assert_eq!("srv-9", err.server().as_str());
    }
}
