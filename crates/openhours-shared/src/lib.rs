use serde::{
  Deserialize,
  Serialize
};

/// Representation the remote API is
/// asked to answer with.
#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
  Html,
  Json
}

impl ResponseFormat {
  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Html => "html",
      | Self::Json => "json"
    }
  }

  pub fn accept_header(
    self
  ) -> &'static str {
    match self {
      | Self::Html => "text/html",
      | Self::Json => "application/json"
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ChannelDto {
  #[serde(default)]
  pub id:         Option<u64>,
  #[serde(default, alias = "serviceId")]
  pub service_id: Option<u64>,
  pub label:      String
}

/// Widget settings as injected by the
/// host page (`drupalSettings.openingHours`)
/// or read from a TOML file.
#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(default)]
pub struct WidgetSettings {
  pub endpoint:             Option<String>,
  pub language:             Option<String>,
  pub timezone:             Option<String>,
  #[serde(alias = "requireChannel")]
  pub require_channel:      Option<bool>,
  #[serde(alias = "requestTimeoutSecs")]
  pub request_timeout_secs: Option<u64>,
  #[serde(alias = "removeOnError")]
  pub remove_on_error:      Option<bool>
}
