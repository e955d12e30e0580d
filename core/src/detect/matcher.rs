use crate::array::volcano::{VolcanoRegistry, VolcanoTarget};
use crate::math::GeoHelper;
use crate::prelude::{EngineError, EngineResult};
use crate::processing::solve::ArraySolution;
use std::cmp::Ordering;

/// Tests a solved wavefront against the static volcano registry.
pub struct VolcanoMatcher {
    min_pairs: usize,
}

impl VolcanoMatcher {
    pub fn new(min_chan: usize) -> Self {
        Self {
            min_pairs: min_chan.saturating_sub(1),
        }
    }

    /// Best-matching registry entry for a solution, or `NoMatch`. A volcano
    /// matches when the solved azimuth lies within its tolerance of the
    /// expected bearing, the apparent velocity sits in its band, the peak
    /// pressure clears its floor and enough pairs contributed. Ties go to
    /// the smallest azimuth difference, then the nearest edifice.
    pub fn best_match<'a>(
        &self,
        solution: &ArraySolution,
        registry: &'a VolcanoRegistry,
    ) -> EngineResult<&'a VolcanoTarget> {
        if solution.pair_count < self.min_pairs {
            return Err(EngineError::NoMatch);
        }

        let mut candidates: Vec<(f64, &VolcanoTarget)> = registry
            .targets()
            .iter()
            .filter_map(|target| {
                let diff =
                    GeoHelper::azimuth_diff_deg(solution.back_azimuth, target.expected_azimuth);
                let volcano = &target.volcano;
                let matches = diff <= volcano.azimuth_tolerance
                    && solution.velocity_kms >= volcano.vmin
                    && solution.velocity_kms <= volcano.vmax
                    && solution.peak_pressure >= volcano.min_pa;
                matches.then_some((diff, target))
            })
            .collect();

        candidates.sort_by(|x, y| {
            x.0.partial_cmp(&y.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    x.1.distance_m
                        .partial_cmp(&y.1.distance_m)
                        .unwrap_or(Ordering::Equal)
                })
        });

        candidates
            .first()
            .map(|(_, target)| *target)
            .ok_or(EngineError::NoMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{Station, Volcano};

    fn reference() -> Station {
        Station::new("AKS.BDF.AV.--", 54.11050, -165.69773)
    }

    fn volcano(name: &str, lat: f64, lon: f64, tolerance: f64, min_pa: f64) -> Volcano {
        Volcano {
            name: name.into(),
            lat,
            lon,
            azimuth_tolerance: tolerance,
            min_pa,
            vmin: 0.28,
            vmax: 0.45,
            seismic_scnl: Vec::new(),
        }
    }

    fn aks_registry() -> VolcanoRegistry {
        VolcanoRegistry::new(
            vec![
                volcano("Akutan", 54.143600, -165.977736, 10.0, 1.0),
                volcano("Okmok", 53.428865, -168.131632, 3.5, 0.4),
            ],
            &reference(),
        )
        .unwrap()
    }

    fn solution(azimuth: f64, velocity: f64, pressure: f64) -> ArraySolution {
        ArraySolution {
            back_azimuth: azimuth,
            velocity_kms: velocity,
            mean_coeff: 0.8,
            peak_pressure: pressure,
            pair_count: 6,
            station_count: 4,
        }
    }

    #[test]
    fn akutan_arrival_matches_akutan_only() {
        let matcher = VolcanoMatcher::new(3);
        // Solved azimuth near Akutan's ~281.5 deg bearing, outside Okmok's
        // ~245.6 deg tolerance.
        let target = matcher
            .best_match(&solution(281.0, 0.35, 1.2), &aks_registry())
            .unwrap();
        assert_eq!(target.volcano.name, "Akutan");
    }

    #[test]
    fn weak_signal_matches_nothing() {
        let matcher = VolcanoMatcher::new(3);
        let err = matcher
            .best_match(&solution(281.0, 0.35, 0.5), &aks_registry())
            .unwrap_err();
        assert!(matches!(err, EngineError::NoMatch));
    }

    #[test]
    fn velocity_outside_band_matches_nothing() {
        let matcher = VolcanoMatcher::new(3);
        let err = matcher
            .best_match(&solution(281.0, 0.60, 1.2), &aks_registry())
            .unwrap_err();
        assert!(matches!(err, EngineError::NoMatch));
    }

    #[test]
    fn azimuth_comparison_wraps_through_north() {
        // A volcano due north of the reference: expected bearing ~0 deg.
        let registry = VolcanoRegistry::new(
            vec![volcano("North", 54.30, -165.69773, 5.0, 0.4)],
            &reference(),
        )
        .unwrap();
        let matcher = VolcanoMatcher::new(3);
        let target = matcher
            .best_match(&solution(359.0, 0.35, 1.0), &registry)
            .unwrap();
        assert_eq!(target.volcano.name, "North");
    }

    #[test]
    fn too_few_pairs_never_matches() {
        let matcher = VolcanoMatcher::new(3);
        let mut weak = solution(281.0, 0.35, 1.2);
        weak.pair_count = 1;
        let err = matcher.best_match(&weak, &aks_registry()).unwrap_err();
        assert!(matches!(err, EngineError::NoMatch));
    }

    #[test]
    fn tie_breaks_on_azimuth_then_distance() {
        // Two edifices on nearly the same bearing; the nearer one wins when
        // the angular differences tie.
        let near = volcano("Near", 54.20, -165.69773, 10.0, 0.4);
        let far = volcano("Far", 54.40, -165.69773, 10.0, 0.4);
        let registry =
            VolcanoRegistry::new(vec![far.clone(), near.clone()], &reference()).unwrap();
        let matcher = VolcanoMatcher::new(3);
        let target = matcher
            .best_match(&solution(0.0, 0.35, 1.0), &registry)
            .unwrap();
        assert_eq!(target.volcano.name, "Near");
    }

    #[test]
    fn matching_is_idempotent() {
        let matcher = VolcanoMatcher::new(3);
        let registry = aks_registry();
        let sol = solution(281.0, 0.35, 1.2);
        let first = matcher.best_match(&sol, &registry).unwrap().volcano.name.clone();
        let second = matcher.best_match(&sol, &registry).unwrap().volcano.name.clone();
        assert_eq!(first, second);
    }
}
