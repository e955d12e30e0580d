/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

pub struct GeoHelper;

impl GeoHelper {
    /// Great-circle distance in meters (haversine).
    pub fn distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        let p1 = lat1.to_radians();
        let p2 = lat2.to_radians();
        let dp = (lat2 - lat1).to_radians();
        let dl = (lon2 - lon1).to_radians();
        let a = (dp / 2.0).sin().powi(2) + p1.cos() * p2.cos() * (dl / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().asin()
    }

    /// Initial great-circle bearing from point 1 to point 2, degrees in [0, 360).
    pub fn bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        let p1 = lat1.to_radians();
        let p2 = lat2.to_radians();
        let dl = (lon2 - lon1).to_radians();
        let y = dl.sin() * p2.cos();
        let x = p1.cos() * p2.sin() - p1.sin() * p2.cos() * dl.cos();
        Self::normalize_deg(y.atan2(x).to_degrees())
    }

    /// Local tangent-plane offset of a point relative to a reference, as
    /// (east, north) meters. Valid for the few-hundred-meter apertures of an
    /// infrasound array.
    pub fn tangent_offset_m(ref_lat: f64, ref_lon: f64, lat: f64, lon: f64) -> (f64, f64) {
        let east = (lon - ref_lon).to_radians() * ref_lat.to_radians().cos() * EARTH_RADIUS_M;
        let north = (lat - ref_lat).to_radians() * EARTH_RADIUS_M;
        (east, north)
    }

    /// Circular distance between two compass azimuths, degrees in [0, 180].
    pub fn azimuth_diff_deg(a: f64, b: f64) -> f64 {
        let d = (Self::normalize_deg(a) - Self::normalize_deg(b)).abs();
        d.min(360.0 - d)
    }

    /// Wraps an angle into [0, 360).
    pub fn normalize_deg(angle: f64) -> f64 {
        let wrapped = angle % 360.0;
        if wrapped < 0.0 {
            wrapped + 360.0
        } else {
            wrapped
        }
    }
}
