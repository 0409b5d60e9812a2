use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::trace::Coordinates;
use crate::dsp::geodesy;

/// Origin of the earthquake the records belong to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarEvent {
    pub id: String,
    pub time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub depth_km: f64,
    pub magnitude: f64,
}

impl ScalarEvent {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude)) {
            return Err(format!("latitude {} out of range", self.latitude));
        }
        if !(self.longitude.is_finite() && (-180.0..=360.0).contains(&self.longitude)) {
            return Err(format!("longitude {} out of range", self.longitude));
        }
        if !self.depth_km.is_finite() {
            return Err("depth is not finite".to_string());
        }
        if !self.magnitude.is_finite() {
            return Err("magnitude is not finite".to_string());
        }
        Ok(())
    }

    pub fn epicentral_distance_km(&self, station: &Coordinates) -> f64 {
        geodesy::haversine_km(
            self.latitude,
            self.longitude,
            station.latitude,
            station.longitude,
        )
    }
}
