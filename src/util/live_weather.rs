//! Fills the shared location and weather state from AMap services.
//!
//! SYSTEM CONTEXT
//! ==============
//! `CitySearch` resolves the visitor's city from their IP, then `Weather`
//! fetches the live report for that city. Both services come in as plugins
//! of the page-wide SDK load, so this module never injects scripts itself.
//!
//! The provider payloads are JSON-shaped objects. They are serialized across
//! the JS boundary and picked apart here with plain `serde_json` so the
//! mapping stays testable natively.

#[cfg(test)]
#[path = "live_weather_test.rs"]
mod live_weather_test;

use serde_json::Value;
use thiserror::Error;

use crate::state::location::LocationPatch;
use crate::state::weather::WeatherPatch;
use crate::util::amap::LoadError;

pub const CITY_SEARCH_PLUGIN: &str = "AMap.CitySearch";
pub const WEATHER_PLUGIN: &str = "AMap.Weather";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LiveError {
    #[error(transparent)]
    Sdk(#[from] LoadError),
    #[error("AMap call failed: {0}")]
    Js(String),
    #[error("{service} returned no result: {detail}")]
    Provider { service: &'static str, detail: String },
}

/// Map a `CitySearch.getLocalCity` result onto a location patch.
///
/// AMap reports an unknown city as an empty array instead of a string; such
/// fields are left unset. The coordinates are the center of `rectangle`.
pub fn location_patch_from_city(result: &Value) -> Option<LocationPatch> {
    let city = text_field(result, "city");
    let adcode = text_field(result, "adcode");
    if city.is_none() && adcode.is_none() {
        return None;
    }
    let center = result.get("rectangle").and_then(Value::as_str).and_then(rectangle_center);
    Some(LocationPatch {
        lng: center.map(|(lng, _)| lng),
        lat: center.map(|(_, lat)| lat),
        city,
        adcode,
        address: None,
    })
}

/// Map a `Weather.getLive` payload onto a weather patch.
pub fn weather_patch_from_live(data: &Value) -> Option<WeatherPatch> {
    let patch = WeatherPatch {
        city: text_field(data, "city"),
        text: text_field(data, "weather"),
        temperature: text_field(data, "temperature"),
        wind_direction: text_field(data, "windDirection"),
        wind_power: text_field(data, "windPower"),
        humidity: text_field(data, "humidity"),
        report_time: text_field(data, "reportTime"),
    };
    (patch.text.is_some() || patch.temperature.is_some()).then_some(patch)
}

/// City argument for `getLive`: the adcode when known, else the city name.
pub fn weather_query(location: &LocationPatch) -> Option<&str> {
    location.adcode.as_deref().or(location.city.as_deref())
}

/// Midpoint of an AMap `"lng,lat;lng,lat"` bounding rectangle.
fn rectangle_center(rectangle: &str) -> Option<(f64, f64)> {
    let (south_west, north_east) = rectangle.split_once(';')?;
    let (a_lng, a_lat) = parse_point(south_west)?;
    let (b_lng, b_lat) = parse_point(north_east)?;
    Some(((a_lng + b_lng) / 2.0, (a_lat + b_lat) / 2.0))
}

fn parse_point(point: &str) -> Option<(f64, f64)> {
    let (lng, lat) = point.split_once(',')?;
    Some((lng.trim().parse().ok()?, lat.trim().parse().ok()?))
}

/// Non-empty string or number field rendered as text.
fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Resolve the visitor's city and live weather, writing both into the
/// shared state signals. Failures are logged and leave the state untouched.
#[cfg(feature = "csr")]
pub async fn refresh(
    location: leptos::prelude::RwSignal<crate::state::location::LocationState>,
    weather: leptos::prelude::RwSignal<crate::state::weather::WeatherState>,
) {
    use leptos::prelude::*;

    let result = async {
        let amap = browser::services().await?;
        let city = browser::local_city(&amap).await?;
        let patch = location_patch_from_city(&city)
            .ok_or_else(|| LiveError::Provider { service: "CitySearch", detail: city.to_string() })?;
        let query = weather_query(&patch).map(str::to_owned);
        location.update(|state| state.apply(patch, js_sys::Date::now()));

        let Some(query) = query else {
            return Ok(());
        };
        let live = browser::live_weather(&amap, &query).await?;
        let patch = weather_patch_from_live(&live)
            .ok_or_else(|| LiveError::Provider { service: "Weather", detail: live.to_string() })?;
        weather.update(|state| state.apply(patch, js_sys::Date::now()));
        Ok::<(), LiveError>(())
    }
    .await;

    if let Err(e) = result {
        log::warn!("live weather unavailable: {e}");
    }
}

#[cfg(feature = "csr")]
mod browser {
    use futures::channel::oneshot;
    use js_sys::{Array, Function, Reflect};
    use serde_json::Value;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};

    use super::{CITY_SEARCH_PLUGIN, LiveError, WEATHER_PLUGIN};
    use crate::util::amap::{KeyProfile, load_amap};

    /// Status string AMap services report on success.
    const STATUS_COMPLETE: &str = "complete";

    fn js_error(err: &JsValue) -> LiveError {
        LiveError::Js(err.as_string().unwrap_or_else(|| format!("{err:?}")))
    }

    fn method(target: &JsValue, name: &str) -> Result<Function, LiveError> {
        Reflect::get(target, &name.into())
            .map_err(|e| js_error(&e))?
            .dyn_into::<Function>()
            .map_err(|_| LiveError::Js(format!("{name} is not a function")))
    }

    fn to_json(value: &JsValue) -> Result<Value, LiveError> {
        let raw: String = js_sys::JSON::stringify(value).map_err(|e| js_error(&e))?.into();
        serde_json::from_str(&raw).map_err(|e| LiveError::Js(e.to_string()))
    }

    /// Call `target.name(...args, callback)` and wait for the two-argument
    /// callback AMap services use.
    async fn call_with_callback(
        target: &JsValue,
        name: &str,
        args: &[JsValue],
    ) -> Result<(JsValue, JsValue), LiveError> {
        let (tx, rx) = oneshot::channel::<(JsValue, JsValue)>();
        let callback = Closure::once_into_js(move |first: JsValue, second: JsValue| {
            let _ = tx.send((first, second));
        });

        let call_args: Array = args.iter().collect();
        call_args.push(&callback);
        method(target, name)?.apply(target, &call_args).map_err(|e| js_error(&e))?;
        rx.await.map_err(|_| LiveError::Js(format!("{name} callback dropped")))
    }

    fn construct(amap: &JsValue, class: &str) -> Result<JsValue, LiveError> {
        let ctor = method(amap, class)?;
        Reflect::construct(&ctor, &Array::new()).map_err(|e| js_error(&e))
    }

    /// SDK global with the city search and weather plugins registered.
    pub(super) async fn services() -> Result<JsValue, LiveError> {
        let plugins = [CITY_SEARCH_PLUGIN, WEATHER_PLUGIN];
        let sdk = load_amap(KeyProfile::Weather, &plugins).await?;
        let amap = sdk.global;

        let names: Array = plugins.iter().map(|p| JsValue::from_str(p)).collect();
        call_with_callback(&amap, "plugin", &[names.into()]).await?;
        Ok(amap)
    }

    pub(super) async fn local_city(amap: &JsValue) -> Result<Value, LiveError> {
        let search = construct(amap, "CitySearch")?;
        let (status, result) = call_with_callback(&search, "getLocalCity", &[]).await?;
        if status.as_string().as_deref() != Some(STATUS_COMPLETE) {
            return Err(LiveError::Provider {
                service: "CitySearch",
                detail: status.as_string().unwrap_or_default(),
            });
        }
        to_json(&result)
    }

    pub(super) async fn live_weather(amap: &JsValue, query: &str) -> Result<Value, LiveError> {
        let weather = construct(amap, "Weather")?;
        let (err, data) = call_with_callback(&weather, "getLive", &[JsValue::from_str(query)]).await?;
        if !err.is_null() && !err.is_undefined() {
            return Err(LiveError::Provider { service: "Weather", detail: format!("{err:?}") });
        }
        to_json(&data)
    }
}
