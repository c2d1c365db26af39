use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::Context;
use chrono::NaiveDate;
use chrono_tz::Tz;
use openhours_shared::WidgetSettings;
use tracing::{
  debug,
  info,
  warn
};

use crate::date::{
  parse_timezone,
  today_in_timezone
};

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_REQUEST_TIMEOUT_SECS:
  u64 = 30;
pub const CONFIG_FILE: &str =
  "openhours.toml";
pub const CONFIG_ENV_VAR: &str =
  "OPENHOURS_CONFIG";
pub const ENDPOINT_ENV_VAR: &str =
  "OPENHOURS_ENDPOINT";
pub const LANGUAGE_ENV_VAR: &str =
  "OPENHOURS_LANGUAGE";

/// Sanitized settings shared by every
/// widget of one discovery pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
  pub endpoint:             String,
  pub language:             String,
  pub timezone:             Tz,
  pub require_channel:      bool,
  pub request_timeout_secs: u64,
  pub remove_on_error:      bool
}

impl Default for Settings {
  fn default() -> Self {
    Self::from_raw(
      WidgetSettings::default()
    )
  }
}

impl Settings {
  #[tracing::instrument(level = "debug", skip_all)]
  pub fn from_raw(
    raw: WidgetSettings
  ) -> Self {
    let endpoint = raw
      .endpoint
      .as_deref()
      .map(normalize_endpoint)
      .unwrap_or_default();

    let language = raw
      .language
      .as_deref()
      .map(str::trim)
      .filter(|lang| !lang.is_empty())
      .unwrap_or(DEFAULT_LANGUAGE)
      .to_string();

    let timezone = raw
      .timezone
      .as_deref()
      .and_then(|tz| {
        parse_timezone(tz, "settings")
      })
      .unwrap_or(chrono_tz::UTC);

    let request_timeout_secs = match raw
      .request_timeout_secs
    {
      | Some(0) | None => {
        DEFAULT_REQUEST_TIMEOUT_SECS
      }
      | Some(secs) => secs
    };

    let settings = Self {
      endpoint,
      language,
      timezone,
      require_channel: raw
        .require_channel
        .unwrap_or(true),
      request_timeout_secs,
      remove_on_error: raw
        .remove_on_error
        .unwrap_or(false)
    };
    debug!(
      endpoint = %settings.endpoint,
      language = %settings.language,
      timezone = %settings.timezone,
      "sanitized widget settings"
    );
    settings
  }

  pub fn from_toml_str(
    text: &str
  ) -> anyhow::Result<Self> {
    let raw =
      toml::from_str::<WidgetSettings>(
        text
      )
      .context(
        "failed parsing widget settings"
      )?;
    Ok(Self::from_raw(raw))
  }

  /// Current calendar date in the
  /// configured timezone.
  pub fn today(&self) -> NaiveDate {
    today_in_timezone(self.timezone)
  }
}

/// Field-wise merge where `overrides`
/// wins wherever it is set.
pub fn merge_settings(
  base: WidgetSettings,
  overrides: WidgetSettings
) -> WidgetSettings {
  WidgetSettings {
    endpoint:             overrides
      .endpoint
      .or(base.endpoint),
    language:             overrides
      .language
      .or(base.language),
    timezone:             overrides
      .timezone
      .or(base.timezone),
    require_channel:      overrides
      .require_channel
      .or(base.require_channel),
    request_timeout_secs: overrides
      .request_timeout_secs
      .or(base.request_timeout_secs),
    remove_on_error:      overrides
      .remove_on_error
      .or(base.remove_on_error)
  }
}

#[tracing::instrument(skip_all)]
pub fn load_settings_file(
  path: &Path
) -> anyhow::Result<WidgetSettings> {
  let text = fs::read_to_string(path)
    .with_context(|| {
      format!(
        "failed to read {}",
        path.display()
      )
    })?;
  info!(file = %path.display(), "loading widget settings");
  toml::from_str::<WidgetSettings>(
    &text
  )
  .with_context(|| {
    format!(
      "failed parsing {}",
      path.display()
    )
  })
}

pub fn env_overrides() -> WidgetSettings
{
  let read = |key: &str| {
    std::env::var(key)
      .ok()
      .map(|value| {
        value.trim().to_string()
      })
      .filter(|value| !value.is_empty())
  };

  WidgetSettings {
    endpoint: read(ENDPOINT_ENV_VAR),
    language: read(LANGUAGE_ENV_VAR),
    ..WidgetSettings::default()
  }
}

/// Explicit path first, then
/// `$OPENHOURS_CONFIG`, then the user
/// config directory. `None` when nothing
/// exists.
pub fn resolve_settings_path(
  override_path: Option<&Path>
) -> Option<PathBuf> {
  if let Some(path) = override_path {
    return Some(path.to_path_buf());
  }

  if let Ok(raw) =
    std::env::var(CONFIG_ENV_VAR)
  {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
      return Some(PathBuf::from(
        trimmed
      ));
    }
  }

  let candidate = dirs::config_dir()?
    .join("openhours")
    .join(CONFIG_FILE);
  if candidate.exists() {
    return Some(candidate);
  }

  warn!(
    candidate = %candidate.display(),
    "no widget settings file found; using defaults"
  );
  None
}

fn normalize_endpoint(
  raw: &str
) -> String {
  let trimmed = raw.trim();
  if trimmed.is_empty()
    || trimmed.ends_with('/')
  {
    return trimmed.to_string();
  }
  format!("{trimmed}/")
}
