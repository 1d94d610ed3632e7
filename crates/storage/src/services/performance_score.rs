//! Performance scoring for a single participation.
//!
//! Score = position component + ROI component, each in `[0, 50]`:
//!
//! ```text
//! position = max(0, (N - position + 1) / N * 50)
//! roi      = min(50, max(0, (prize / max(wagered, 1) - 1) * 100))
//! ```
//!
//! where `N` is the number of competitors in the race.

/// Upper bound of each score component
pub const COMPONENT_CAP: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceScore {
    pub position_score: f64,
    pub roi_score: f64,
}

impl PerformanceScore {
    pub fn compute(position: i64, competitors: i64, wagered: f64, prize: f64) -> Self {
        Self {
            position_score: position_score(position, competitors),
            roi_score: roi_score(wagered, prize),
        }
    }

    pub fn total(&self) -> f64 {
        self.position_score + self.roi_score
    }
}

pub fn position_score(position: i64, competitors: i64) -> f64 {
    if competitors <= 0 {
        return 0.0;
    }
    let n = competitors as f64;
    ((n - position as f64 + 1.0) / n * COMPONENT_CAP).clamp(0.0, COMPONENT_CAP)
}

pub fn roi_score(wagered: f64, prize: f64) -> f64 {
    // f64::max drops a NaN operand, so the lower bound always holds
    (((prize / wagered.max(1.0)) - 1.0) * 100.0)
        .max(0.0)
        .min(COMPONENT_CAP)
}

/// ROI of one participation in percent; zero when nothing was wagered.
pub fn participation_roi(wagered: f64, prize: f64) -> f64 {
    if wagered > 0.0 {
        ((prize / wagered.max(1.0)) - 1.0) * 100.0
    } else {
        0.0
    }
}
