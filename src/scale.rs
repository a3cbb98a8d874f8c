// Scales mapping data values to pixel positions.

/// Continuous scale mapping `domain` linearly onto `range`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        LinearScale { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d0 == d1 {
            // A degenerate domain maps everything to the middle of the range
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Roughly `count` evenly spaced round values covering the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (mut start, mut stop) = self.domain;
        if start == stop || count == 0 {
            return vec![start];
        }
        let reverse = stop < start;
        if reverse {
            std::mem::swap(&mut start, &mut stop);
        }

        let step = tick_increment(start, stop, count);
        let mut ticks = Vec::new();
        if step > 0.0 {
            let lo = (start / step).ceil() as i64;
            let hi = (stop / step).floor() as i64;
            for i in lo..=hi {
                ticks.push(i as f64 * step);
            }
        } else if step < 0.0 {
            let inv = -step;
            let lo = (start * inv).ceil() as i64;
            let hi = (stop * inv).floor() as i64;
            for i in lo..=hi {
                ticks.push(i as f64 / inv);
            }
        }

        if reverse {
            ticks.reverse();
        }
        ticks
    }
}

// Returns a positive step, or the negated inverse of a fractional step.
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

/// Discrete scale dividing the range into evenly spaced bands.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    pub categories: Vec<String>,
    pub range: (f64, f64),
    pub padding: f64,
    step: f64,
    bandwidth: f64,
    start: f64,
}

impl BandScale {
    /// Inner and outer padding are both `padding`, bands centered in the range.
    pub fn new(categories: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let n = categories.len() as f64;
        let (r0, r1) = range;
        let step = (r1 - r0) / (n - padding + 2.0 * padding).max(1.0);
        let start = r0 + (r1 - r0 - step * (n - padding)) * 0.5;
        BandScale {
            categories,
            range,
            padding,
            step,
            bandwidth: step * (1.0 - padding),
            start,
        }
    }

    /// Left edge of the band for `category`.
    pub fn map(&self, category: &str) -> Option<f64> {
        self.categories
            .iter()
            .position(|c| c == category)
            .map(|i| self.start + self.step * i as f64)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

/// Discrete scale placing each category on an evenly spaced point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointScale {
    pub categories: Vec<String>,
    pub range: (f64, f64),
    step: f64,
    start: f64,
}

impl PointScale {
    pub fn new<S: AsRef<str>>(categories: &[S], range: (f64, f64)) -> Self {
        let categories: Vec<String> = categories.iter().map(|c| c.as_ref().to_string()).collect();
        let n = categories.len() as f64;
        let (r0, r1) = range;
        let step = (r1 - r0) / (n - 1.0).max(1.0);
        let start = r0 + (r1 - r0 - step * (n - 1.0).max(0.0)) * 0.5;
        PointScale {
            categories,
            range,
            step,
            start,
        }
    }

    pub fn map(&self, category: &str) -> Option<f64> {
        self.categories
            .iter()
            .position(|c| c == category)
            .map(|i| self.start + self.step * i as f64)
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}
