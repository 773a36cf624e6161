use serde::Serialize;

/// Scores strictly below this are critical.
pub const CRITICAL_BELOW: f64 = 50.0;

/// Scores at or above this are excellent.
pub const EXCELLENT_FROM: f64 = 80.0;

/// Fixed color scale bounds for map markers.
pub const SCORE_COLOR_RANGE: (f64, f64) = (0.0, 100.0);

/// Classification of a safety score.
///
/// | Range          | Band      |
/// |----------------|-----------|
/// | >= 80          | Excellent |
/// | >= 50, < 80    | Attention |
/// | < 50           | Critical  |
///
/// Scores outside 0–100 fall into the nearest band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyBand {
    Critical,
    Attention,
    Excellent,
}

impl SafetyBand {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= EXCELLENT_FROM => Self::Excellent,
            s if s >= CRITICAL_BELOW => Self::Attention,
            _ => Self::Critical,
        }
    }

    /// Label shown on the inspection panel.
    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "CRITICO",
            Self::Attention => "ATTENZIONE",
            Self::Excellent => "OTTIMO",
        }
    }
}
