//! Inputs the host page provides.

use js_sys::Reflect;
use openhours_core::Settings;
use openhours_shared::WidgetSettings;
use tracing::warn;
use wasm_bindgen::JsValue;
use web_sys::UrlSearchParams;

const SETTINGS_ROOT: &str = "drupalSettings";
const SETTINGS_KEY: &str = "openingHours";
const REQUEST_DATE_PARAM: &str = "oh_day";

/// `drupalSettings.openingHours`,
/// sanitized. Missing or malformed
/// settings give the defaults, whose empty
/// endpoint rejects the batch later on.
pub fn read_settings() -> Settings {
  let value = Reflect::get(
    &js_sys::global(),
    &JsValue::from_str(SETTINGS_ROOT)
  )
  .and_then(|root| {
    Reflect::get(
      &root,
      &JsValue::from_str(SETTINGS_KEY)
    )
  })
  .ok()
  .filter(|value| {
    !value.is_undefined() && !value.is_null()
  });

  let raw = match value {
    | Some(value) => {
      serde_wasm_bindgen::from_value::<
        WidgetSettings
      >(value)
      .unwrap_or_else(|err| {
        warn!(error = %err, "malformed widget settings");
        WidgetSettings::default()
      })
    }
    | None => {
      warn!("no widget settings on the page");
      WidgetSettings::default()
    }
  };
  Settings::from_raw(raw)
}

/// Raw `oh_day` query parameter.
pub fn read_request_date() -> Option<String>
{
  let search = web_sys::window()?
    .location()
    .search()
    .ok()?;
  UrlSearchParams::new_with_str(&search)
    .ok()?
    .get(REQUEST_DATE_PARAM)
}
