//! Ordinal scales used by threshold checks.
//!
//! Both scales are totally ordered by declaration order; a configured maximum
//! is violated by any level that compares greater than it.

use std::fmt;

use crate::error::{MetaCheckerError, Result};

/// Annotation type holding weight constants.
pub const WEIGHT_UNIT_DESCRIPTOR: &str = "Lcom/igormaznitsa/meta/annotation/Weight$Unit;";
/// Annotation type holding complexity constants.
pub const COMPLEXITY_DESCRIPTOR: &str = "Lcom/igormaznitsa/meta/Complexity;";

/// Drop whitespace and control characters.
#[must_use]
pub fn pressing(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect()
}

/// A totally ordered set of named levels.
pub trait Scale: Copy + Ord + Sized + 'static {
    /// Human readable scale name used in error messages.
    const TITLE: &'static str;

    fn all() -> &'static [Self];

    /// Constant name as written in annotations, e.g. `BLACK_HOLE`.
    fn name(self) -> &'static str;

    /// Alternative spelling accepted in configuration.
    fn alias(self) -> Option<&'static str> {
        None
    }

    /// Exact constant lookup, used for annotation values.
    #[must_use]
    fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|level| level.name() == name)
    }

    /// Lenient lookup for configuration values.
    ///
    /// Whitespace, control characters and underscores are ignored and case
    /// does not matter. An empty value means "no limit".
    ///
    /// # Errors
    /// Returns a configuration error when the value names no level.
    fn decode(value: &str) -> Result<Option<Self>> {
        let pressed = pressing(value).replace('_', "");
        if pressed.is_empty() {
            return Ok(None);
        }
        Self::all()
            .iter()
            .copied()
            .find(|level| {
                level.name().replace('_', "").eq_ignore_ascii_case(&pressed)
                    || level
                        .alias()
                        .is_some_and(|alias| pressing(alias).eq_ignore_ascii_case(&pressed))
            })
            .map(Some)
            .ok_or_else(|| {
                MetaCheckerError::Config(format!("Unsupported {} value '{value}'", Self::TITLE))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeightUnit {
    Variable,
    Fluff,
    ExtraLight,
    Light,
    Normal,
    Hard,
    ExtraHard,
    BlackHole,
}

impl Scale for WeightUnit {
    const TITLE: &'static str = "weight";

    fn all() -> &'static [Self] {
        &[
            Self::Variable,
            Self::Fluff,
            Self::ExtraLight,
            Self::Light,
            Self::Normal,
            Self::Hard,
            Self::ExtraHard,
            Self::BlackHole,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            Self::Variable => "VARIABLE",
            Self::Fluff => "FLUFF",
            Self::ExtraLight => "EXTRALIGHT",
            Self::Light => "LIGHT",
            Self::Normal => "NORMAL",
            Self::Hard => "HARD",
            Self::ExtraHard => "EXTRAHARD",
            Self::BlackHole => "BLACK_HOLE",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Complexity {
    Constant,
    DoubleLogarithmic,
    Logarithmic,
    Polylogarithmic,
    FractionalPower,
    Linear,
    NLogStarN,
    Quasilinear,
    Quadratic,
    Cubic,
    Polynomial,
    QuasiPolynomial,
    Subexponential,
    Exponential,
    Factorial,
    DoubleExponential,
}

impl Complexity {
    /// Big-O formula for the level.
    #[must_use]
    pub const fn formula(self) -> &'static str {
        match self {
            Self::Constant => "O(1)",
            Self::DoubleLogarithmic => "O(log log n)",
            Self::Logarithmic => "O(log n)",
            Self::Polylogarithmic => "O((log n)^c)",
            Self::FractionalPower => "O(n^c) 0<c<1",
            Self::Linear => "O(n)",
            Self::NLogStarN => "O(n log* n)",
            Self::Quasilinear => "O(n log n)",
            Self::Quadratic => "O(n^2)",
            Self::Cubic => "O(n^3)",
            Self::Polynomial => "O(n^c) c>1",
            Self::QuasiPolynomial => "2^O((log n)^c)",
            Self::Subexponential => "O(2^n^e) 0<e<1",
            Self::Exponential => "2^O(n)",
            Self::Factorial => "O(n!)",
            Self::DoubleExponential => "2^2^poly(n)",
        }
    }
}

impl Scale for Complexity {
    const TITLE: &'static str = "complexity";

    fn all() -> &'static [Self] {
        &[
            Self::Constant,
            Self::DoubleLogarithmic,
            Self::Logarithmic,
            Self::Polylogarithmic,
            Self::FractionalPower,
            Self::Linear,
            Self::NLogStarN,
            Self::Quasilinear,
            Self::Quadratic,
            Self::Cubic,
            Self::Polynomial,
            Self::QuasiPolynomial,
            Self::Subexponential,
            Self::Exponential,
            Self::Factorial,
            Self::DoubleExponential,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            Self::Constant => "CONSTANT",
            Self::DoubleLogarithmic => "DOUBLE_LOGARITHMIC",
            Self::Logarithmic => "LOGARITHMIC",
            Self::Polylogarithmic => "POLYLOGARITHMIC",
            Self::FractionalPower => "FRACTIONAL_POWER",
            Self::Linear => "LINEAR",
            Self::NLogStarN => "N_LOG_STAR_N",
            Self::Quasilinear => "QUASILINEAR",
            Self::Quadratic => "QUADRATIC",
            Self::Cubic => "CUBIC",
            Self::Polynomial => "POLYNOMIAL",
            Self::QuasiPolynomial => "QUASI_POLYNOMIAL",
            Self::Subexponential => "SUBEXPONENTIAL",
            Self::Exponential => "EXPONENTIAL",
            Self::Factorial => "FACTORIAL",
            Self::DoubleExponential => "DOUBLE_EXPONENTIAL",
        }
    }

    fn alias(self) -> Option<&'static str> {
        Some(self.formula())
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "levels_tests.rs"]
mod tests;
