//! Score calibration: remapping raw cosine similarity onto a 0–100 scale.
//!
//! For sentence/document embedding models, raw cosine similarity across
//! arbitrary course pairs clusters very close to 1.0, which makes the raw
//! value useless for human-facing ranking. Each policy re-expands the
//! effective range with a fixed nonlinear map; the canonical `Breakpoint`
//! policy additionally boosts cross-language pairs, whose raw similarity
//! runs systematically lower for equivalent content.

use serde::{Deserialize, Serialize};

/// Calibration strategy.
///
/// Policies are pure and deterministic: the same raw similarity and
/// language relation always produce the same score. Tunables live on the
/// variant itself so recalibration never touches call sites.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalibrationPolicy {
    /// Power-law rescale of the [0, 1]-normalized similarity, followed by a
    /// tiered spread. Language-unaware; retained as the simpler comparison
    /// variant.
    PowerLaw,
    /// Piecewise-linear remap of the raw similarity over fixed breakpoints,
    /// plus a cross-language boost. Canonical policy.
    Breakpoint {
        /// Fractional boost applied when query and candidate carry
        /// different language tags: `score · (1 + boost)`.
        #[serde(default = "CalibrationPolicy::default_cross_language_boost")]
        cross_language_boost: f32,
        /// Extra multiplier stacked on top of the boost for cross-language
        /// pairs whose raw similarity exceeds the cutoff.
        #[serde(default = "CalibrationPolicy::default_high_confidence_multiplier")]
        high_confidence_multiplier: f32,
        /// Raw-similarity cutoff (exclusive) above which the extra
        /// multiplier applies.
        #[serde(default = "CalibrationPolicy::default_high_confidence_cutoff")]
        high_confidence_cutoff: f32,
    },
}

impl CalibrationPolicy {
    pub(crate) fn default_cross_language_boost() -> f32 {
        0.35
    }

    pub(crate) fn default_high_confidence_multiplier() -> f32 {
        1.2
    }

    pub(crate) fn default_high_confidence_cutoff() -> f32 {
        0.8
    }

    /// Canonical breakpoint policy with default boost constants.
    pub fn default_breakpoint() -> Self {
        CalibrationPolicy::Breakpoint {
            cross_language_boost: Self::default_cross_language_boost(),
            high_confidence_multiplier: Self::default_high_confidence_multiplier(),
            high_confidence_cutoff: Self::default_high_confidence_cutoff(),
        }
    }

    /// Calibrate one candidate's raw cosine similarity.
    ///
    /// `cross_language` must be true only when both sides carry language
    /// tags and the tags differ. A raw similarity at or above 1.0,
    /// including the scorer's identical-vector short-circuit, yields
    /// exactly `100.0` under either policy. The result is clamped to
    /// [0, 100] and rounded to one decimal.
    pub fn calibrate(&self, raw: f32, cross_language: bool) -> f32 {
        let raw = f64::from(raw.clamp(-1.0, 1.0));
        if raw >= 1.0 {
            return 100.0;
        }

        let score = match self {
            CalibrationPolicy::PowerLaw => power_law(raw),
            CalibrationPolicy::Breakpoint {
                cross_language_boost,
                high_confidence_multiplier,
                high_confidence_cutoff,
            } => {
                let base = breakpoint_remap(raw);
                if cross_language {
                    let boosted = base * (1.0 + f64::from(*cross_language_boost));
                    if raw > f64::from(*high_confidence_cutoff) {
                        boosted * f64::from(*high_confidence_multiplier)
                    } else {
                        boosted
                    }
                } else {
                    base
                }
            }
        };

        round_one_decimal(score.clamp(0.0, 100.0))
    }
}

impl Default for CalibrationPolicy {
    fn default() -> Self {
        CalibrationPolicy::default_breakpoint()
    }
}

/// `norm = (raw+1)/2`, `base = norm² · 100`, then a tiered spread that
/// suppresses the low band and stretches the high band.
fn power_law(raw: f64) -> f64 {
    let norm = (raw + 1.0) / 2.0;
    let base = norm * norm * 100.0;
    if base < 40.0 {
        base * 0.5
    } else if base < 70.0 {
        20.0 + (base - 40.0) * 0.8
    } else {
        44.0 + (base - 70.0) * 1.5
    }
}

/// Base map. Exact breakpoints (0.96, 0.92, 0.85) belong to the upper
/// branch; the map is continuous there, so the `>=` comparisons are a
/// documentation of ownership rather than a numeric choice.
fn breakpoint_remap(raw: f64) -> f64 {
    if raw >= 0.96 {
        // 0.96–1.0 → 90–100
        90.0 + (raw - 0.96) * 250.0
    } else if raw >= 0.92 {
        // 0.92–0.96 → 70–90
        70.0 + (raw - 0.92) * 500.0
    } else if raw >= 0.85 {
        // 0.85–0.92 → 40–70
        40.0 + (raw - 0.85) * 428.57
    } else {
        // 0–0.85 → 0–40
        raw * 47.06
    }
}

fn round_one_decimal(score: f64) -> f32 {
    ((score * 10.0).round() / 10.0) as f32
}
