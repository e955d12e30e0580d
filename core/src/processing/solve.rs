use crate::array::InfrasoundArray;
use crate::math::{GeoHelper, StatsHelper};
use crate::prelude::{EngineError, EngineResult};
use crate::processing::condition::ConditionedTrace;
use crate::processing::correlate::CorrelationResult;
use crate::telemetry::log::LogManager;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Plane-wave fit for one cycle: where the wavefront came from, how fast it
/// swept the array, and how believable the fit is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArraySolution {
    /// Direction the wave arrives from, degrees clockwise from north.
    pub back_azimuth: f64,
    /// Apparent horizontal velocity across the array, km/s.
    pub velocity_kms: f64,
    /// Baseline-length-weighted mean correlation coefficient.
    pub mean_coeff: f64,
    /// Peak absolute pressure across contributing traces, Pa.
    pub peak_pressure: f64,
    pub pair_count: usize,
    pub station_count: usize,
}

/// Least-squares inversion of pairwise lags into a single slowness vector,
/// assuming the wavefront is planar across the array aperture.
pub struct ArraySolver {
    min_chan: usize,
    logger: LogManager,
}

impl ArraySolver {
    pub fn new(min_chan: usize) -> Self {
        Self {
            min_chan,
            logger: LogManager::new("solver"),
        }
    }

    /// Solves `baseline . slowness = -lag` over all valid pairs. Requires
    /// `min_chan - 1` pairs spanning two non-collinear baseline directions
    /// and at least `min_chan` distinct contributing stations.
    pub fn solve(
        &self,
        array: &InfrasoundArray,
        pairs: &[CorrelationResult],
        traces: &[ConditionedTrace],
        sample_rate: f64,
    ) -> EngineResult<ArraySolution> {
        if pairs.len() < self.min_chan.saturating_sub(1) {
            return Err(EngineError::UnderdeterminedGeometry { pairs: pairs.len() });
        }

        let contributing: BTreeSet<usize> =
            pairs.iter().flat_map(|p| [p.a, p.b]).collect();
        if contributing.len() < self.min_chan {
            return Err(EngineError::UnderdeterminedGeometry { pairs: pairs.len() });
        }

        let mut design = Array2::<f64>::zeros((pairs.len(), 2));
        let mut rhs = Array1::<f64>::zeros(pairs.len());
        let mut weighted_coeff = 0.0;
        let mut weight_sum = 0.0;
        for (row, pair) in pairs.iter().enumerate() {
            let baseline = array.baseline(pair.a, pair.b).ok_or_else(|| {
                EngineError::Config(format!(
                    "pair {}-{} has no baseline in array {}",
                    pair.a,
                    pair.b,
                    array.id()
                ))
            })?;
            design[[row, 0]] = baseline.east_m;
            design[[row, 1]] = baseline.north_m;
            rhs[row] = -(pair.lag as f64) / sample_rate;
            weighted_coeff += baseline.length_m * pair.coeff;
            weight_sum += baseline.length_m;
        }

        // 2x2 normal equations, solved in closed form.
        let normal = design.t().dot(&design);
        let moment = design.t().dot(&rhs);
        let (m00, m01, m11) = (normal[[0, 0]], normal[[0, 1]], normal[[1, 1]]);
        let det = m00 * m11 - m01 * m01;
        let scale = m00 + m11;
        if det <= 1e-9 * scale * scale {
            return Err(EngineError::UnderdeterminedGeometry { pairs: pairs.len() });
        }
        let sx = (m11 * moment[0] - m01 * moment[1]) / det;
        let sy = (m00 * moment[1] - m01 * moment[0]) / det;

        let slowness = sx.hypot(sy);
        if slowness < 1e-12 {
            return Err(EngineError::UnderdeterminedGeometry { pairs: pairs.len() });
        }

        let back_azimuth = GeoHelper::normalize_deg(sx.atan2(sy).to_degrees());
        let velocity_kms = 1.0 / slowness / 1000.0;
        let peak_pressure = traces
            .iter()
            .filter(|t| contributing.contains(&t.station))
            .map(|t| StatsHelper::peak_abs(&t.samples))
            .fold(0.0, f64::max);

        let solution = ArraySolution {
            back_azimuth,
            velocity_kms,
            mean_coeff: weighted_coeff / weight_sum,
            peak_pressure,
            pair_count: pairs.len(),
            station_count: contributing.len(),
        };
        self.logger.verbose(&format!(
            "azimuth {:.1} deg, {:.3} km/s from {} pairs",
            solution.back_azimuth, solution.velocity_kms, solution.pair_count
        ));
        Ok(solution)
    }
}
