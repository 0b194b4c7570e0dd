//! Breakpoint curves
//!
//! A curve starts at an initial value at abscissa 0 and walks a sorted list of
//! breakpoints. Each breakpoint carries the segment shape used to reach it
//! from the previous one.

use serde::{Deserialize, Serialize};

/// Segment interpolation shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveType {
    #[default]
    Linear,
    Exponential,
    Logarithmic,
    SCurve,
    Hold,
}

impl CurveType {
    /// Shape a normalized segment progress `t` in `[0, 1]`
    fn shape(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            CurveType::Linear => t,
            CurveType::Exponential => t * t,
            CurveType::Logarithmic => t.sqrt(),
            CurveType::SCurve => t * t * (3.0 - 2.0 * t),
            CurveType::Hold => {
                if t >= 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// A breakpoint on a curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub position: f64,
    pub value: f64,
    #[serde(default)]
    pub curve: CurveType,
}

/// Piecewise curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub initial: f64,
    points: Vec<CurvePoint>,
}

impl Curve {
    pub fn new(initial: f64) -> Self {
        Self {
            initial,
            points: Vec::new(),
        }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(value)
    }

    /// Straight ramp from `from` at 0 to `to` at 1
    pub fn linear(from: f64, to: f64) -> Self {
        Self::new(from).with_point(1.0, to, CurveType::Linear)
    }

    /// Add a breakpoint, keeping points sorted. A point at an existing
    /// position replaces it.
    pub fn with_point(mut self, position: f64, value: f64, curve: CurveType) -> Self {
        self.add_point(position, value, curve);
        self
    }

    pub fn add_point(&mut self, position: f64, value: f64, curve: CurveType) {
        let point = CurvePoint {
            position,
            value,
            curve,
        };
        match self
            .points
            .binary_search_by(|p| p.position.total_cmp(&position))
        {
            Ok(i) => self.points[i] = point,
            Err(i) => self.points.insert(i, point),
        }
    }

    pub fn remove_point(&mut self, position: f64) -> bool {
        let before = self.points.len();
        self.points.retain(|p| p.position != position);
        self.points.len() != before
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Value at abscissa `x`
    pub fn value_at(&self, x: f64) -> f64 {
        let mut last_position = 0.0;
        let mut last_value = self.initial;

        for point in &self.points {
            if x > last_position && x <= point.position {
                let span = point.position - last_position;
                let t = if span > 0.0 {
                    (x - last_position) / span
                } else {
                    1.0
                };
                return last_value + (point.value - last_value) * point.curve.shape(t);
            } else if x > point.position {
                last_position = point.position;
                last_value = point.value;
            } else {
                break;
            }
        }

        last_value
    }
}

impl Default for Curve {
    fn default() -> Self {
        Self::new(0.0)
    }
}
