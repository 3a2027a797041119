//! Shape-preserving cubic interpolation (PCHIP)
//!
//! Piecewise cubic Hermite curves with Fritsch–Carlson limited slopes. The
//! curve passes through every knot, is monotone wherever the data is, and
//! never overshoots a local extremum.

use citegraph_common::{CiteGraphError, Result};
use tracing::debug;

/// Evaluation points per smoothed curve unless configured otherwise
pub const DEFAULT_SAMPLES: usize = 500;

/// A sampled PCHIP interpolant
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedCurve {
    xs: Vec<f64>,
    ys: Vec<f64>,
    slopes: Vec<f64>,
    points: Vec<(f64, f64)>,
}

impl SmoothedCurve {
    /// Sampled `(x, y)` points, x ascending, knots included
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// The knots the curve was fitted to
    pub fn knots(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Evaluate the interpolant at `x`, or `None` outside the knot range
    pub fn evaluate(&self, x: f64) -> Option<f64> {
        let first = *self.xs.first()?;
        let last = *self.xs.last()?;
        if !(first..=last).contains(&x) {
            return None;
        }
        if let Some(i) = self.xs.iter().position(|&k| k == x) {
            return Some(self.ys[i]);
        }

        // Index of the segment whose left knot is the last one <= x
        let segment = self
            .xs
            .partition_point(|&k| k <= x)
            .saturating_sub(1)
            .min(self.xs.len() - 2);
        Some(self.eval_segment(segment, x))
    }

    fn eval_segment(&self, k: usize, x: f64) -> f64 {
        let (y0, y1) = (self.ys[k], self.ys[k + 1]);
        let y = hermite(
            (self.xs[k], self.xs[k + 1]),
            (y0, y1),
            (self.slopes[k], self.slopes[k + 1]),
            x,
        );

        // Rounding can leave the segment range by an ulp
        y.clamp(y0.min(y1), y0.max(y1))
    }
}

/// Cubic Hermite value on one segment
fn hermite((x0, x1): (f64, f64), (y0, y1): (f64, f64), (d0, d1): (f64, f64), x: f64) -> f64 {
    let h = x1 - x0;
    let t = (x - x0) / h;
    let t2 = t * t;
    let t3 = t2 * t;

    let h01 = -2.0 * t3 + 3.0 * t2;
    let h10 = t3 - 2.0 * t2 + t;
    let h11 = t3 - t2;

    // h00 = 1 - h01, written so flat segments stay exactly flat
    y0 + (y1 - y0) * h01 + h * (h10 * d0 + h11 * d1)
}

/// Fit a PCHIP curve through `series` and sample it
///
/// `series` holds `(x, y)` knots with strictly increasing, finite `x`. Fewer
/// than two knots is [`CiteGraphError::InsufficientData`]; callers draw such
/// series as points instead. `samples` below the knot count is raised to it.
pub fn smooth(series: &[(f64, f64)], samples: usize) -> Result<SmoothedCurve> {
    if series.len() < 2 {
        return Err(CiteGraphError::insufficient_data(2, series.len()));
    }

    citegraph_common::ensure!(
        series.iter().all(|(x, y)| x.is_finite() && y.is_finite()),
        "interpolation knots must be finite"
    );
    citegraph_common::ensure!(
        series.windows(2).all(|w| w[0].0 < w[1].0),
        "interpolation knots must have strictly increasing x"
    );

    let xs: Vec<f64> = series.iter().map(|(x, _)| *x).collect();
    let ys: Vec<f64> = series.iter().map(|(_, y)| *y).collect();
    let slopes = pchip_slopes(&xs, &ys);

    let mut curve = SmoothedCurve {
        xs,
        ys,
        slopes,
        points: Vec::new(),
    };

    let allocation = allocate_intervals(&curve.xs, samples.max(series.len()) - 1);
    let mut points = Vec::with_capacity(allocation.iter().sum::<usize>() + 1);
    for (k, intervals) in allocation.iter().enumerate() {
        let (x0, x1) = (curve.xs[k], curve.xs[k + 1]);
        points.push((x0, curve.ys[k]));
        for j in 1..*intervals {
            let x = x0 + (j as f64 / *intervals as f64) * (x1 - x0);
            points.push((x, curve.eval_segment(k, x)));
        }
    }
    let last = curve.xs.len() - 1;
    points.push((curve.xs[last], curve.ys[last]));

    debug!(
        "Smoothed {} knots into {} samples",
        curve.xs.len(),
        points.len()
    );
    curve.points = points;
    Ok(curve)
}

/// Split `total` sample intervals across segments in proportion to width
///
/// Every segment gets at least one interval so each knot is a sample position.
/// Leftovers after flooring go to the largest fractional shares, earliest first.
fn allocate_intervals(xs: &[f64], total: usize) -> Vec<usize> {
    let segments = xs.len() - 1;
    let extra = total.saturating_sub(segments);
    let span = xs[segments] - xs[0];

    let shares: Vec<f64> = xs
        .windows(2)
        .map(|w| extra as f64 * (w[1] - w[0]) / span)
        .collect();
    let mut allocation: Vec<usize> = shares.iter().map(|s| 1 + s.floor() as usize).collect();

    let assigned: usize = allocation.iter().sum::<usize>() - segments;
    let mut order: Vec<usize> = (0..segments).collect();
    order.sort_by(|&a, &b| {
        let fa = shares[a] - shares[a].floor();
        let fb = shares[b] - shares[b].floor();
        fb.total_cmp(&fa)
    });
    for &segment in order.iter().take(extra.saturating_sub(assigned)) {
        allocation[segment] += 1;
    }

    allocation
}

fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Knot derivatives: weighted harmonic means inside, three-point estimates at the ends
fn pchip_slopes(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let delta: Vec<f64> = (0..n - 1).map(|k| (ys[k + 1] - ys[k]) / h[k]).collect();

    if n == 2 {
        return vec![delta[0], delta[0]];
    }

    let mut d = vec![0.0; n];
    for k in 1..n - 1 {
        let (left, right) = (delta[k - 1], delta[k]);
        if sign(left) * sign(right) <= 0 {
            continue;
        }
        let w1 = 2.0 * h[k] + h[k - 1];
        let w2 = h[k] + 2.0 * h[k - 1];
        d[k] = (w1 + w2) / (w1 / left + w2 / right);
    }

    d[0] = edge_slope(h[0], h[1], delta[0], delta[1]);
    d[n - 1] = edge_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
    d
}

fn edge_slope(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if sign(d) != sign(m0) {
        0.0
    } else if sign(m0) != sign(m1) && d.abs() > 3.0 * m0.abs() {
        3.0 * m0
    } else {
        d
    }
}
