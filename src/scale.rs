//! Domain-to-pixel mapping for plot axes and value-driven sizes.

const PADDING_STEPS: f64 = 8.0;

/// Maps `value` from `[min, max]` onto `[0, range]`.
///
/// A degenerate domain is treated as having a span of 1 so the result stays
/// finite.
pub fn normalize(value: f64, min: f64, max: f64, range: f64) -> f64 {
    let span = max - min;
    let span = if span.abs() < f64::EPSILON { 1.0 } else { span };
    ((value - min) / span) * range
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Extent of `values` with the lower bound widened to include the origin.
    ///
    /// Returns `[0, 0]` for an empty input.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut min = 0.0_f64;
        let mut max = f64::NEG_INFINITY;
        for value in values {
            if !value.is_finite() {
                continue;
            }
            min = min.min(value);
            max = max.max(value);
        }

        if !max.is_finite() {
            max = 0.0;
        }

        Self { min, max }
    }

    pub fn span(self) -> f64 {
        self.max - self.min
    }

    pub fn is_degenerate(self) -> bool {
        self.span().abs() < f64::EPSILON
    }

    /// Tick spacing: an eighth of the span, floored, never below 1.
    pub fn step(self) -> f64 {
        let step = (self.span() / PADDING_STEPS).floor();
        if step >= 1.0 { step } else { 1.0 }
    }

    /// Widens the domain by one step on each side.
    ///
    /// The lower bound stays at 0 when the data has no negative values, so
    /// the axis never extends into a quadrant that holds no points.
    pub fn padded(self) -> PaddedDomain {
        let step = self.step();
        let min = if self.min >= 0.0 { 0.0 } else { self.min - step };
        PaddedDomain {
            raw: self,
            bounds: Domain::new(min, self.max + step),
            step,
        }
    }

    pub fn normalize(self, value: f64, range: f64) -> f64 {
        normalize(value, self.min, self.max, range)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaddedDomain {
    pub raw: Domain,
    pub bounds: Domain,
    pub step: f64,
}

impl PaddedDomain {
    pub fn normalize(&self, value: f64, range: f64) -> f64 {
        self.bounds.normalize(value, range)
    }

    /// Tick values at multiples of `step`, emitted outward from zero.
    ///
    /// Positive and negative candidates are generated together for each
    /// index, so every tick `k * step` inside the bounds has its mirror
    /// `-k * step` whenever that one is inside the bounds too.
    pub fn ticks(&self) -> Vec<f64> {
        let Domain { min, max } = self.bounds;
        let mut ticks = Vec::new();
        let mut index = 0u32;
        loop {
            let positive = f64::from(index) * self.step;
            let negative = -positive;
            let positive_in = positive <= max && positive >= min;
            let negative_in = negative >= min && negative <= max;

            if !(positive <= max || negative >= min) {
                break;
            }

            if positive_in {
                ticks.push(positive);
            }
            if index > 0 && negative_in {
                ticks.push(negative);
            }

            index += 1;
        }
        ticks
    }
}

/// Linear map from a value extent onto an output interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: Domain,
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: Domain, range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Scale over the exact extent of `values` (no origin widening).
    pub fn from_extent(values: impl IntoIterator<Item = f64>, range: (f64, f64)) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values {
            if !value.is_finite() {
                continue;
            }
            min = min.min(value);
            max = max.max(value);
        }
        if !min.is_finite() || !max.is_finite() {
            min = 0.0;
            max = 0.0;
        }
        Self::new(Domain::new(min, max), range)
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn scale(&self, value: f64) -> f64 {
        let (lo, hi) = self.range;
        if self.domain.is_degenerate() {
            return (lo + hi) * 0.5;
        }
        lo + normalize(value, self.domain.min, self.domain.max, hi - lo)
    }
}
