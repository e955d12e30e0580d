use crate::processing::condition::ConditionedTrace;
use crate::telemetry::log::LogManager;

/// Lag and normalized peak coefficient for one station pair in one cycle.
/// Stations are ordered by array index (`a < b`); a positive lag means
/// station `b`'s arrival trails station `a`'s.
#[derive(Debug, Clone)]
pub struct CorrelationResult {
    pub a: usize,
    pub b: usize,
    pub lag: i64,
    pub coeff: f64,
}

impl CorrelationResult {
    pub fn is_valid(&self, min_cc: f64) -> bool {
        self.coeff >= min_cc
    }
}

/// Time-domain normalized cross-correlation over a bounded lag window for
/// every unordered station pair.
pub struct PairwiseCorrelator {
    max_shift: usize,
    min_cc: f64,
    logger: LogManager,
}

impl PairwiseCorrelator {
    pub fn new(max_shift: usize, min_cc: f64) -> Self {
        Self {
            max_shift,
            min_cc,
            logger: LogManager::new("correlator"),
        }
    }

    /// Correlates every unordered pair. Traces are truncated to their common
    /// overlap first; buffers are assumed to share a window start. Pairs
    /// below the coherence threshold are returned as well, flagged invalid,
    /// since noise-only windows are the common case.
    pub fn correlate_all(&self, traces: &[ConditionedTrace]) -> Vec<CorrelationResult> {
        let Some(common_len) = traces.iter().map(|t| t.samples.len()).min() else {
            return Vec::new();
        };
        if common_len == 0 {
            return Vec::new();
        }

        let mut results = Vec::new();
        for i in 0..traces.len() {
            for j in (i + 1)..traces.len() {
                let (lag, coeff) = correlate_pair(
                    &traces[i].samples[..common_len],
                    &traces[j].samples[..common_len],
                    self.max_shift,
                );
                // Orient each pair low-index to high-index so the lag lines
                // up with the precomputed baseline whatever order the
                // provider returned the channels in.
                let (a, b, lag) = if traces[i].station <= traces[j].station {
                    (traces[i].station, traces[j].station, lag)
                } else {
                    (traces[j].station, traces[i].station, -lag)
                };
                let result = CorrelationResult { a, b, lag, coeff };
                if !result.is_valid(self.min_cc) {
                    self.logger.verbose(&format!(
                        "{} x {} coherence {:.3} below {:.3}",
                        traces[i].scnl, traces[j].scnl, coeff, self.min_cc
                    ));
                }
                results.push(result);
            }
        }
        results
    }
}

/// Peak of the normalized cross-correlation of `b` against `a` over
/// lags in [-max_shift, +max_shift] samples.
fn correlate_pair(a: &[f64], b: &[f64], max_shift: usize) -> (i64, f64) {
    let n = a.len() as i64;
    let norm = {
        let ea: f64 = a.iter().map(|v| v * v).sum();
        let eb: f64 = b.iter().map(|v| v * v).sum();
        (ea * eb).sqrt()
    };
    if norm <= 0.0 {
        return (0, 0.0);
    }

    let max_shift = (max_shift as i64).min(n - 1);
    let mut best_lag = 0i64;
    let mut best_coeff = f64::NEG_INFINITY;
    for lag in -max_shift..=max_shift {
        let (start, end) = if lag >= 0 { (0, n - lag) } else { (-lag, n) };
        let mut sum = 0.0;
        for t in start..end {
            sum += a[t as usize] * b[(t + lag) as usize];
        }
        let coeff = sum / norm;
        if coeff > best_coeff {
            best_coeff = coeff;
            best_lag = lag;
        }
    }
    (best_lag, best_coeff)
}
