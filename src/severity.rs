//! PM10 severity tiers.
//!
//! A `SeverityScale` is an ascending list of one to three breakpoints. A value
//! is promoted past a breakpoint only when it is strictly greater than it, so
//! a value equal to a breakpoint stays in the lower tier:
//!
//! ```
//! use pm10_monitor::severity::{SeverityScale, SeverityTier};
//!
//! let scale = SeverityScale::default(); // 20 / 50 / 100 µg/m³
//! assert_eq!(scale.classify(20.0), SeverityTier::Low);
//! assert_eq!(scale.classify(20.01), SeverityTier::Moderate);
//! assert_eq!(scale.classify(100.0), SeverityTier::High);
//! assert_eq!(scale.classify(f64::NAN), SeverityTier::Low);
//! ```

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeverityTier {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl SeverityTier {
    const ALL: [SeverityTier; 4] = [
        SeverityTier::Low,
        SeverityTier::Moderate,
        SeverityTier::High,
        SeverityTier::VeryHigh,
    ];

    /// Hex colour used on the map and charts.
    pub fn color(&self) -> &'static str {
        match self {
            SeverityTier::Low => "#22c55e",
            SeverityTier::Moderate => "#eab308",
            SeverityTier::High => "#f97316",
            SeverityTier::VeryHigh => "#ef4444",
        }
    }

    /// Label shown on the report.
    pub fn label(&self) -> &'static str {
        match self {
            SeverityTier::Low => "BAJO",
            SeverityTier::Moderate => "MODERADO",
            SeverityTier::High => "ALTO",
            SeverityTier::VeryHigh => "MUY ALTO",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            SeverityTier::Low => "🟢",
            SeverityTier::Moderate => "🟡",
            SeverityTier::High => "🟠",
            SeverityTier::VeryHigh => "🔴",
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityTier::Low => write!(f, "LOW"),
            SeverityTier::Moderate => write!(f, "MODERATE"),
            SeverityTier::High => write!(f, "HIGH"),
            SeverityTier::VeryHigh => write!(f, "VERY_HIGH"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScaleError {
    #[error("Severity scale needs between 1 and 3 breakpoints, got {0}")]
    Count(usize),
    #[error("Severity breakpoints must be finite and non-negative: {0}")]
    InvalidValue(String),
    #[error("Severity breakpoints must be strictly ascending: {0:?}")]
    NotAscending(Vec<f64>),
}

/// Breakpoints (µg/m³) separating consecutive tiers, lowest first.
#[derive(Debug, Clone, PartialEq)]
pub struct SeverityScale {
    breakpoints: Vec<f64>,
}

impl SeverityScale {
    pub fn new(breakpoints: Vec<f64>) -> Result<Self, ScaleError> {
        if breakpoints.is_empty() || breakpoints.len() > 3 {
            return Err(ScaleError::Count(breakpoints.len()));
        }
        if let Some(bad) = breakpoints.iter().find(|b| !b.is_finite() || **b < 0.0) {
            return Err(ScaleError::InvalidValue(bad.to_string()));
        }
        if breakpoints.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ScaleError::NotAscending(breakpoints));
        }
        Ok(Self { breakpoints })
    }

    /// The 1 / 2 µg/m³ table used by the hourly-alert variant (three tiers).
    pub fn hourly_alert() -> Self {
        Self {
            breakpoints: vec![1.0, 2.0],
        }
    }

    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    /// Tiers this scale can produce, lowest first.
    pub fn tiers(&self) -> &'static [SeverityTier] {
        &SeverityTier::ALL[..=self.breakpoints.len()]
    }

    /// Classify a concentration. NaN and negative values are `Low`.
    pub fn classify(&self, value: f64) -> SeverityTier {
        if value.is_nan() || value < 0.0 {
            return SeverityTier::Low;
        }
        let exceeded = self.breakpoints.iter().filter(|b| value > **b).count();
        SeverityTier::ALL[exceeded]
    }

    /// Human-readable range of each tier, for the report legend.
    pub fn legend(&self) -> Vec<(SeverityTier, String)> {
        let b = &self.breakpoints;
        self.tiers()
            .iter()
            .enumerate()
            .map(|(i, tier)| {
                let range = if i == 0 {
                    format!("≤ {}", b[0])
                } else if i == b.len() {
                    format!("> {}", b[i - 1])
                } else {
                    format!("{}–{}", b[i - 1], b[i])
                };
                (*tier, range)
            })
            .collect()
    }
}

impl Default for SeverityScale {
    /// 20 / 50 / 100 µg/m³, four tiers.
    fn default() -> Self {
        Self {
            breakpoints: vec![20.0, 50.0, 100.0],
        }
    }
}

impl FromStr for SeverityScale {
    type Err = ScaleError;

    /// Parses a comma-separated list such as `20,50,100`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let breakpoints = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<f64>()
                    .map_err(|_| ScaleError::InvalidValue(part.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(breakpoints)
    }
}
