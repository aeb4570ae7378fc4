// Severity thresholds and the evaluator that classifies metric values.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Ordered classification of a metric value, least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Ok,
    Careful,
    Warning,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Ok,
        Severity::Careful,
        Severity::Warning,
        Severity::Critical,
    ];

    /// WARNING and CRITICAL open or extend alert episodes.
    pub fn is_alert(self) -> bool {
        self >= Severity::Warning
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Careful => "CAREFUL",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Threshold family a metric is evaluated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricClass {
    /// Percentage of a reference maximum.
    Std,
    /// Raw load average against cut points scaled by core count.
    Load,
}

/// Cut points (careful, warning, critical). A value must be strictly greater
/// than a cut point to reach its tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSet {
    pub careful: f64,
    pub warning: f64,
    pub critical: f64,
}

impl ThresholdSet {
    pub const fn new(careful: f64, warning: f64, critical: f64) -> Self {
        Self {
            careful,
            warning,
            critical,
        }
    }

    /// Every cut point multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.careful * factor,
            self.warning * factor,
            self.critical * factor,
        )
    }

    fn tier(&self, value: f64) -> Severity {
        if value > self.critical {
            Severity::Critical
        } else if value > self.warning {
            Severity::Warning
        } else if value > self.careful {
            Severity::Careful
        } else {
            Severity::Ok
        }
    }
}

pub const DEFAULT_STD: ThresholdSet = ThresholdSet::new(50.0, 70.0, 90.0);
pub const DEFAULT_LOAD: ThresholdSet = ThresholdSet::new(0.7, 1.0, 5.0);

/// Per-class cut points, fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThresholdTable {
    #[serde(deserialize_with = "std_over_defaults")]
    pub std: ThresholdSet,
    #[serde(deserialize_with = "load_over_defaults")]
    pub load: ThresholdSet,
}

/// A config table where every cut point is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialThresholdSet {
    careful: Option<f64>,
    warning: Option<f64>,
    critical: Option<f64>,
}

impl PartialThresholdSet {
    fn over(self, base: ThresholdSet) -> ThresholdSet {
        ThresholdSet::new(
            self.careful.unwrap_or(base.careful),
            self.warning.unwrap_or(base.warning),
            self.critical.unwrap_or(base.critical),
        )
    }
}

fn std_over_defaults<'de, D: Deserializer<'de>>(d: D) -> Result<ThresholdSet, D::Error> {
    Ok(PartialThresholdSet::deserialize(d)?.over(DEFAULT_STD))
}

fn load_over_defaults<'de, D: Deserializer<'de>>(d: D) -> Result<ThresholdSet, D::Error> {
    Ok(PartialThresholdSet::deserialize(d)?.over(DEFAULT_LOAD))
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            std: DEFAULT_STD,
            load: DEFAULT_LOAD,
        }
    }
}

impl ThresholdTable {
    pub fn get(&self, class: MetricClass) -> &ThresholdSet {
        match class {
            MetricClass::Std => &self.std,
            MetricClass::Load => &self.load,
        }
    }

    /// Load cut points for `core_count` cores; 0 cores counts as 1.
    pub fn load_for_cores(&self, core_count: u32) -> ThresholdSet {
        self.load.scaled(core_count.max(1) as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("reference maximum is zero; ratio undefined")]
    DivisionUndefined,
}

/// `value` as a percentage of `reference_max`.
pub fn percent_of(value: f64, reference_max: f64) -> Result<f64, EvalError> {
    if reference_max == 0.0 {
        return Err(EvalError::DivisionUndefined);
    }
    Ok(value * 100.0 / reference_max)
}

/// Stateless classifier over an immutable [`ThresholdTable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdEvaluator {
    table: ThresholdTable,
}

impl ThresholdEvaluator {
    pub fn new(table: ThresholdTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ThresholdTable {
        &self.table
    }

    /// Classify `value`.
    ///
    /// For [`MetricClass::Std`] `reference` is the maximum the value is a
    /// share of; a zero maximum classifies as OK. For [`MetricClass::Load`]
    /// `reference` is the core count (values below 1 count as one core) and
    /// `value` is compared directly against the scaled cut points.
    pub fn classify(&self, value: f64, reference: f64, class: MetricClass) -> Severity {
        match class {
            MetricClass::Std => match percent_of(value, reference) {
                Ok(ratio) => self.table.get(class).tier(ratio),
                Err(EvalError::DivisionUndefined) => Severity::Ok,
            },
            MetricClass::Load => self.table.get(class).scaled(reference.max(1.0)).tier(value),
        }
    }

    /// Shorthand for a percentage already expressed against 100.
    pub fn classify_percent(&self, percent: f64) -> Severity {
        self.classify(percent, 100.0, MetricClass::Std)
    }

    pub fn classify_load(&self, load: f64, core_count: Option<u32>) -> Severity {
        self.classify(load, core_count.unwrap_or(1) as f64, MetricClass::Load)
    }
}
