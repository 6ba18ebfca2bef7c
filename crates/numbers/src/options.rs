use crate::error::{NumbersError, Result};
use serde::{Deserialize, Serialize};

/// Options for [`RemarkableSet::build`](crate::RemarkableSet::build)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Global complexity budget; anything costlier is pruned
    pub complexity: f64,

    /// Relative match tolerance (0.01 = 1%)
    pub delta: f64,

    /// Length of the integer, prime and Fibonacci seed sequences
    pub n: usize,

    /// Restrict the universe to (0, 1] and only build sub-unit fractions
    pub ratio_mode: bool,

    /// Include 4th powers and 4th roots in the unary closure
    pub fourth_powers: bool,

    pub tuning: Tuning,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            complexity: 100.0,
            delta: 0.01,
            n: 13,
            ratio_mode: false,
            fourth_powers: true,
            tuning: Tuning::default(),
        }
    }
}

impl BuildOptions {
    /// Parse options from TOML; missing fields keep their defaults
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let options: Self = toml::from_str(raw)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.complexity.is_finite() || self.complexity <= 0.0 {
            return Err(NumbersError::InvalidOptions(format!(
                "complexity must be a positive number, got {}",
                self.complexity
            )));
        }
        if !self.delta.is_finite() || self.delta <= 0.0 {
            return Err(NumbersError::InvalidOptions(format!(
                "delta must be a positive number, got {}",
                self.delta
            )));
        }
        self.tuning.validate()
    }

    /// Seed sequence length, clamped by the complexity budget
    #[must_use]
    pub fn effective_n(&self) -> usize {
        self.n.min(self.complexity.floor() as usize)
    }
}

/// Calibration constants of the cost model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Squares and square roots
    pub square: PowerCost,

    /// Cubes and cube roots
    pub cube: PowerCost,

    /// 4th powers and 4th roots
    pub fourth: PowerCost,

    pub factor: FactorCurve,

    /// Pair evaluations between two progress updates
    pub batch_size: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            square: PowerCost::new(2.0, 1.5),
            cube: PowerCost::new(3.0, 2.0),
            fourth: PowerCost::new(4.0, 2.5),
            factor: FactorCurve::default(),
            batch_size: 50_000,
        }
    }
}

impl Tuning {
    fn validate(&self) -> Result<()> {
        for (label, cost) in [
            ("square", &self.square),
            ("cube", &self.cube),
            ("fourth", &self.fourth),
        ] {
            cost.validate(label)?;
        }
        self.factor.validate()?;
        if self.batch_size == 0 {
            return Err(NumbersError::InvalidOptions(
                "tuning.batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Cost of a unary operation: `offset + parent^exponent`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerCost {
    pub offset: f64,
    pub exponent: f64,
}

impl PowerCost {
    #[must_use]
    pub const fn new(offset: f64, exponent: f64) -> Self {
        Self { offset, exponent }
    }

    #[must_use]
    pub fn cost(&self, parent: f64) -> f64 {
        self.offset + parent.powf(self.exponent)
    }

    // offset >= 1 and exponent >= 1 keep the result above the parent cost
    fn validate(&self, label: &str) -> Result<()> {
        if !(self.offset.is_finite() && self.offset >= 1.0) {
            return Err(NumbersError::InvalidOptions(format!(
                "tuning.{label}.offset must be >= 1, got {}",
                self.offset
            )));
        }
        if !(self.exponent.is_finite() && self.exponent >= 1.0) {
            return Err(NumbersError::InvalidOptions(format!(
                "tuning.{label}.exponent must be >= 1, got {}",
                self.exponent
            )));
        }
        Ok(())
    }
}

/// Penalty applied to complexity at match time:
/// `max(1, base^((complexity - neutral) / scale))`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorCurve {
    pub base: f64,
    pub neutral: f64,
    pub scale: f64,
}

impl Default for FactorCurve {
    fn default() -> Self {
        Self {
            base: 2.5,
            neutral: 10.0,
            scale: 10.0,
        }
    }
}

impl FactorCurve {
    #[must_use]
    pub fn factor(&self, complexity: f64) -> f64 {
        self.base
            .powf((complexity - self.neutral) / self.scale)
            .max(1.0)
    }

    fn validate(&self) -> Result<()> {
        let finite = self.base.is_finite() && self.neutral.is_finite() && self.scale.is_finite();
        if !finite || self.base <= 0.0 || self.scale <= 0.0 {
            return Err(NumbersError::InvalidOptions(format!(
                "tuning.factor needs a positive base and scale, got base={} scale={}",
                self.base, self.scale
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_documented_values() {
        let options = BuildOptions::default();
        assert_eq!(options.complexity, 100.0);
        assert_eq!(options.delta, 0.01);
        assert_eq!(options.n, 13);
        assert!(!options.ratio_mode);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn n_is_clamped_by_complexity() {
        let options = BuildOptions {
            complexity: 7.5,
            n: 13,
            ..Default::default()
        };
        assert_eq!(options.effective_n(), 7);
    }

    #[test]
    fn rejects_non_positive_budgets() {
        for (complexity, delta) in [(0.0, 0.01), (-5.0, 0.01), (100.0, 0.0), (100.0, -0.1)] {
            let options = BuildOptions {
                complexity,
                delta,
                ..Default::default()
            };
            assert!(matches!(
                options.validate(),
                Err(NumbersError::InvalidOptions(_))
            ));
        }
    }

    #[test]
    fn rejects_non_finite_values() {
        let options = BuildOptions {
            delta: f64::NAN,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn toml_overrides_only_given_fields() {
        let options = BuildOptions::from_toml_str(
            r#"
            complexity = 40
            ratio_mode = true

            [tuning.factor]
            base = 3.0
            "#,
        )
        .expect("valid options");

        assert_eq!(options.complexity, 40.0);
        assert!(options.ratio_mode);
        assert_eq!(options.n, 13);
        assert_eq!(options.tuning.factor.base, 3.0);
        assert_eq!(options.tuning.factor.neutral, 10.0);
        assert_eq!(options.tuning.square, PowerCost::new(2.0, 1.5));
    }

    #[test]
    fn toml_rejects_negative_n() {
        let err = BuildOptions::from_toml_str("n = -3").unwrap_err();
        assert!(matches!(err, NumbersError::Config(_)));
    }

    #[test]
    fn toml_rejects_invalid_tuning() {
        let err = BuildOptions::from_toml_str("[tuning.cube]\noffset = 0.5\nexponent = 2.0")
            .unwrap_err();
        assert!(matches!(err, NumbersError::InvalidOptions(_)));
    }

    #[test]
    fn factor_curve_floors_at_one() {
        let curve = FactorCurve::default();
        assert_eq!(curve.factor(0.0), 1.0);
        assert_eq!(curve.factor(10.0), 1.0);
        assert!((curve.factor(20.0) - 2.5).abs() < 1e-12);
        assert!(curve.factor(30.0) > curve.factor(20.0));
    }

    #[test]
    fn power_cost_grows_with_strength() {
        let tuning = Tuning::default();
        let parent = 3.0;
        assert!(tuning.square.cost(parent) < tuning.cube.cost(parent));
        assert!(tuning.cube.cost(parent) < tuning.fourth.cost(parent));
        assert!(tuning.square.cost(parent) > parent);
    }
}
