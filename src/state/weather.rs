//! Latest live weather report for the header widget.
//!
//! Filled from the AMap weather plugin (loaded with the `weather` key
//! profile). Same partial-update rules as `location`.

#[cfg(test)]
#[path = "weather_test.rs"]
mod weather_test;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeatherState {
    pub city: String,
    /// Condition text, e.g. "Sunny".
    pub text: String,
    pub temperature: String,
    pub wind_direction: String,
    pub wind_power: String,
    pub humidity: String,
    /// Report time as given by the provider.
    pub report_time: String,
    pub updated_at: f64,
}

/// Partial update for [`WeatherState`].
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherPatch {
    pub city: Option<String>,
    pub text: Option<String>,
    pub temperature: Option<String>,
    pub wind_direction: Option<String>,
    pub wind_power: Option<String>,
    pub humidity: Option<String>,
    pub report_time: Option<String>,
}

impl WeatherState {
    pub fn apply(&mut self, patch: WeatherPatch, now_ms: f64) {
        let WeatherPatch { city, text, temperature, wind_direction, wind_power, humidity, report_time } = patch;
        for (slot, value) in [
            (&mut self.city, city),
            (&mut self.text, text),
            (&mut self.temperature, temperature),
            (&mut self.wind_direction, wind_direction),
            (&mut self.wind_power, wind_power),
            (&mut self.humidity, humidity),
            (&mut self.report_time, report_time),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }
        self.updated_at = now_ms;
    }

    pub fn has_report(&self) -> bool {
        !self.text.is_empty() || !self.temperature.is_empty()
    }
}
