#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreTrend {
    Up,
    Down,
    Flat,
}

/// Composite points a score must move before it counts as a trend.
const EPSILON: i16 = 2;

pub fn score_trend(previous: Option<u8>, current: u8) -> ScoreTrend {
    let Some(previous) = previous else {
        return ScoreTrend::Flat;
    };
    let diff = current as i16 - previous as i16;
    if diff > EPSILON {
        ScoreTrend::Up
    } else if diff < -EPSILON {
        ScoreTrend::Down
    } else {
        ScoreTrend::Flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_detection() {
        assert_eq!(ScoreTrend::Flat, score_trend(None, 50));
        // delta == 2
        assert_eq!(ScoreTrend::Flat, score_trend(Some(48), 50));
        assert_eq!(ScoreTrend::Flat, score_trend(Some(52), 50));
        // |delta| > 2
        assert_eq!(ScoreTrend::Up, score_trend(Some(47), 50));
        assert_eq!(ScoreTrend::Down, score_trend(Some(53), 50));
    }
}
