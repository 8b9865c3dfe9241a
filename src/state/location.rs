//! Last known user location, shared by map and weather widgets.
//!
//! DESIGN
//! ======
//! Producers (IP city search, geocoder callbacks) usually know only some fields,
//! so updates are partial patches. Unset patch fields leave the current value
//! alone; every update stamps `updated_at`.

#[cfg(test)]
#[path = "location_test.rs"]
mod location_test;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocationState {
    pub lng: Option<f64>,
    pub lat: Option<f64>,
    pub city: String,
    pub adcode: String,
    pub address: String,
    /// Milliseconds since the epoch of the last update; `0.0` = never.
    pub updated_at: f64,
}

/// Partial update for [`LocationState`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocationPatch {
    pub lng: Option<f64>,
    pub lat: Option<f64>,
    pub city: Option<String>,
    pub adcode: Option<String>,
    pub address: Option<String>,
}

impl LocationState {
    pub fn apply(&mut self, patch: LocationPatch, now_ms: f64) {
        if let Some(lng) = patch.lng {
            self.lng = Some(lng);
        }
        if let Some(lat) = patch.lat {
            self.lat = Some(lat);
        }
        if let Some(city) = patch.city {
            self.city = city;
        }
        if let Some(adcode) = patch.adcode {
            self.adcode = adcode;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        self.updated_at = now_ms;
    }

    /// Both coordinates known.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.lng.zip(self.lat)
    }
}
