pub mod station;
pub mod volcano;

pub use station::Station;
pub use volcano::{Volcano, VolcanoRegistry, VolcanoTarget};

use crate::math::GeoHelper;
use crate::prelude::{EngineError, EngineResult};

/// Precomputed geometry for one unordered station pair. Offsets are of
/// station `b` relative to station `a` on the local tangent plane.
#[derive(Debug, Clone)]
pub struct Baseline {
    pub a: usize,
    pub b: usize,
    pub east_m: f64,
    pub north_m: f64,
    pub length_m: f64,
    pub bearing_deg: f64,
}

/// Fixed deployment of co-located pressure sensors. Station 0 is the phase
/// reference; pairwise baselines are computed once at construction.
#[derive(Debug, Clone)]
pub struct InfrasoundArray {
    id: String,
    stations: Vec<Station>,
    baselines: Vec<Baseline>,
}

impl InfrasoundArray {
    pub fn new(id: &str, stations: Vec<Station>, min_chan: usize) -> EngineResult<Self> {
        if stations.len() < min_chan {
            return Err(EngineError::Config(format!(
                "array {} has {} stations, needs {}",
                id,
                stations.len(),
                min_chan
            )));
        }

        let reference = stations[0].clone();
        let offsets: Vec<(f64, f64)> = stations
            .iter()
            .map(|s| GeoHelper::tangent_offset_m(reference.lat, reference.lon, s.lat, s.lon))
            .collect();

        let mut baselines = Vec::new();
        for a in 0..stations.len() {
            for b in (a + 1)..stations.len() {
                let east_m = offsets[b].0 - offsets[a].0;
                let north_m = offsets[b].1 - offsets[a].1;
                let length_m = east_m.hypot(north_m);
                if length_m <= 0.0 {
                    return Err(EngineError::Config(format!(
                        "stations {} and {} are co-located",
                        stations[a].scnl, stations[b].scnl
                    )));
                }
                baselines.push(Baseline {
                    a,
                    b,
                    east_m,
                    north_m,
                    length_m,
                    bearing_deg: GeoHelper::normalize_deg(east_m.atan2(north_m).to_degrees()),
                });
            }
        }

        Ok(Self {
            id: id.to_string(),
            stations,
            baselines,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn station_ids(&self) -> Vec<String> {
        self.stations.iter().map(|s| s.scnl.clone()).collect()
    }

    /// Phase-reference station, used for volcano bearings and as the
    /// geometric origin.
    pub fn reference(&self) -> &Station {
        &self.stations[0]
    }

    pub fn baselines(&self) -> &[Baseline] {
        &self.baselines
    }

    /// Baseline for an unordered station index pair, if both belong to the
    /// array.
    pub fn baseline(&self, a: usize, b: usize) -> Option<&Baseline> {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.baselines.iter().find(|bl| bl.a == lo && bl.b == hi)
    }

    /// Index of a station by channel identifier.
    pub fn index_of(&self, scnl: &str) -> Option<usize> {
        self.stations.iter().position(|s| s.scnl == scnl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aks_stations() -> Vec<Station> {
        vec![
            Station::new("AKS.BDF.AV.--", 54.11050, -165.69773),
            Station::new("AKS.BDG.AV.--", 54.11028, -165.69618),
            Station::new("AKS.BDH.AV.--", 54.11105, -165.69700),
            Station::new("AKS.BDI.AV.--", 54.11053, -165.69683),
        ]
    }

    #[test]
    fn array_precomputes_all_unordered_pairs() {
        let array = InfrasoundArray::new("AKS", aks_stations(), 3).unwrap();
        assert_eq!(array.baselines().len(), 6);
        assert!(array.baseline(2, 0).is_some());
        assert!(array.baseline(0, 4).is_none());
    }

    #[test]
    fn baseline_lengths_are_aperture_scale() {
        let array = InfrasoundArray::new("AKS", aks_stations(), 3).unwrap();
        for baseline in array.baselines() {
            assert!(
                baseline.length_m > 10.0 && baseline.length_m < 500.0,
                "{}-{} length {}",
                baseline.a,
                baseline.b,
                baseline.length_m
            );
        }
    }

    #[test]
    fn too_few_stations_is_a_config_error() {
        let mut stations = aks_stations();
        stations.truncate(2);
        let err = InfrasoundArray::new("AKS", stations, 3).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
