use crate::array::Station;
use crate::math::GeoHelper;
use crate::prelude::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// Monitored edifice with its calibrated detection bounds. Tolerances and
/// amplitude/velocity limits are opaque calibrated constants supplied by the
/// per-array configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volcano {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Allowed angular distance between solved and expected azimuth, degrees.
    pub azimuth_tolerance: f64,
    /// Minimum peak pressure in Pa for a credible detection.
    pub min_pa: f64,
    /// Apparent-velocity acceptance band, km/s.
    pub vmin: f64,
    pub vmax: f64,
    /// Companion seismic channels, passed through to display collaborators.
    #[serde(default)]
    pub seismic_scnl: Vec<String>,
}

/// One registry entry with the geometry precomputed from the array's
/// reference station.
#[derive(Debug, Clone)]
pub struct VolcanoTarget {
    pub volcano: Volcano,
    /// Great-circle bearing from the reference station to the edifice.
    pub expected_azimuth: f64,
    pub distance_m: f64,
}

/// Static, read-only registry of monitored volcanoes for one array.
#[derive(Debug, Clone)]
pub struct VolcanoRegistry {
    targets: Vec<VolcanoTarget>,
}

impl VolcanoRegistry {
    pub fn new(volcanoes: Vec<Volcano>, reference: &Station) -> EngineResult<Self> {
        if volcanoes.is_empty() {
            return Err(EngineError::Config("volcano registry is empty".into()));
        }
        let mut targets = Vec::with_capacity(volcanoes.len());
        for volcano in volcanoes {
            if volcano.vmin >= volcano.vmax {
                return Err(EngineError::Config(format!(
                    "{}: velocity bounds [{}, {}] km/s are inverted",
                    volcano.name, volcano.vmin, volcano.vmax
                )));
            }
            if volcano.azimuth_tolerance <= 0.0 || volcano.min_pa < 0.0 {
                return Err(EngineError::Config(format!(
                    "{}: non-positive detection bounds",
                    volcano.name
                )));
            }
            let expected_azimuth =
                GeoHelper::bearing_deg(reference.lat, reference.lon, volcano.lat, volcano.lon);
            let distance_m =
                GeoHelper::distance_m(reference.lat, reference.lon, volcano.lat, volcano.lon);
            targets.push(VolcanoTarget {
                volcano,
                expected_azimuth,
                distance_m,
            });
        }
        Ok(Self { targets })
    }

    pub fn targets(&self) -> &[VolcanoTarget] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
