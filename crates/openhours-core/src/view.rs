use serde::{
  Deserialize,
  Serialize
};

/// Rendering granularity requested by a
/// widget's `data-type`.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ViewType {
  OpenNow,
  Day,
  Week,
  #[default]
  WeekFromNow,
  Month,
  Year
}

impl ViewType {
  pub fn all() -> [Self; 6] {
    [
      Self::OpenNow,
      Self::Day,
      Self::Week,
      Self::WeekFromNow,
      Self::Month,
      Self::Year
    ]
  }

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::OpenNow => "open-now",
      | Self::Day => "day",
      | Self::Week => "week",
      | Self::WeekFromNow => {
        "week-from-now"
      }
      | Self::Month => "month",
      | Self::Year => "year"
    }
  }

  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    match key.trim() {
      | "open-now" => Some(Self::OpenNow),
      | "day" => Some(Self::Day),
      | "week" => Some(Self::Week),
      | "week-from-now" => {
        Some(Self::WeekFromNow)
      }
      | "month" => Some(Self::Month),
      | "year" => Some(Self::Year),
      | _ => None
    }
  }

  /// Any present `data-type` is usable;
  /// unknown values render the rolling
  /// week.
  pub fn from_attribute(
    raw: &str
  ) -> Self {
    Self::from_key(raw).unwrap_or_else(
      || {
        tracing::debug!(
          view = %raw,
          "unknown view type; using week-from-now"
        );
        Self::default()
      }
    )
  }

  /// Views whose rendered fragment
  /// carries the pageable day grid.
  pub fn is_calendar(self) -> bool {
    matches!(self, Self::Month)
  }
}

impl std::fmt::Display for ViewType {
  fn fmt(
    &self,
    f: &mut std::fmt::Formatter<'_>
  ) -> std::fmt::Result {
    f.write_str(self.as_key())
  }
}
