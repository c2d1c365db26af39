use chrono::NaiveDate;

use crate::date::parse_date;

/// Optional inclusive bounds a widget
/// limits its opening hours by.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub struct PeriodFilter {
  from:  Option<NaiveDate>,
  until: Option<NaiveDate>
}

impl PeriodFilter {
  pub fn new(
    from: Option<NaiveDate>,
    until: Option<NaiveDate>
  ) -> Self {
    Self { from, until }
  }

  /// Builds the filter from raw
  /// `data-from` / `data-until` values.
  /// Values that do not parse count as
  /// absent.
  pub fn from_attributes(
    from: Option<&str>,
    until: Option<&str>
  ) -> Self {
    Self {
      from:  from.and_then(|raw| {
        parse_bound(raw, "from")
      }),
      until: until.and_then(|raw| {
        parse_bound(raw, "until")
      })
    }
  }

  pub fn from(
    &self
  ) -> Option<NaiveDate> {
    self.from
  }

  pub fn until(
    &self
  ) -> Option<NaiveDate> {
    self.until
  }

  pub fn has_from(&self) -> bool {
    self.from.is_some()
  }

  pub fn has_until(&self) -> bool {
    self.until.is_some()
  }

  pub fn has_period(&self) -> bool {
    self.has_from() && self.has_until()
  }

  /// Narrows `[start, end]` to the
  /// filter: a later `from` replaces the
  /// start, an earlier `until` the end.
  pub fn clip(
    &self,
    start: NaiveDate,
    end: NaiveDate
  ) -> (NaiveDate, NaiveDate) {
    let start = match self.from {
      | Some(from) if from > start => {
        from
      }
      | _ => start
    };
    let end = match self.until {
      | Some(until) if until < end => {
        until
      }
      | _ => end
    };
    (start, end)
  }
}

fn parse_bound(
  raw: &str,
  bound: &'static str
) -> Option<NaiveDate> {
  let parsed = parse_date(raw);
  if parsed.is_none() {
    tracing::warn!(
      bound,
      input = %raw,
      "ignoring unparseable period bound"
    );
  }
  parsed
}
