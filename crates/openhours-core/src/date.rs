use chrono::{
  DateTime,
  Datelike,
  Duration,
  Months,
  NaiveDate,
  NaiveDateTime,
  Utc
};
use chrono_tz::Tz;

pub const DATE_FORMAT: &str =
  "%Y-%m-%d";

const DATETIME_FORMATS: [&str; 4] = [
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M:%S",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S"
];

/// Calendar-date rendering used for every
/// request parameter. Time of day and
/// offsets never reach the output.
#[must_use]
pub fn format_date(
  date: NaiveDate
) -> String {
  date.format(DATE_FORMAT).to_string()
}

/// Strict parse of an ISO-like date or
/// datetime string, truncated to the
/// calendar date as written.
pub fn parse_date(
  raw: &str
) -> Option<NaiveDate> {
  let token = raw.trim();
  if token.is_empty() {
    return None;
  }

  if let Ok(date) =
    NaiveDate::parse_from_str(
      token,
      DATE_FORMAT
    )
  {
    return Some(date);
  }

  if let Ok(dt) =
    DateTime::parse_from_rfc3339(token)
  {
    return Some(dt.date_naive());
  }

  DATETIME_FORMATS.iter().find_map(
    |format| {
      NaiveDateTime::parse_from_str(
        token, format
      )
      .ok()
      .map(|naive| naive.date())
    }
  )
}

/// Resolves a date expression the way
/// widgets accept it: `today`,
/// `tomorrow`, an ISO date, or anything
/// else which falls back to `today`.
#[tracing::instrument(level = "trace", skip(today))]
pub fn resolve_date_expr(
  raw: &str,
  today: NaiveDate
) -> NaiveDate {
  let token = raw.trim();
  match token
    .to_ascii_lowercase()
    .as_str()
  {
    | "" | "today" => return today,
    | "tomorrow" => {
      return add_days(today, 1);
    }
    | _ => {}
  }

  parse_date(token).unwrap_or_else(|| {
    tracing::warn!(
      input = %token,
      fallback = %today,
      "unparseable date; using today"
    );
    today
  })
}

pub fn add_days(
  date: NaiveDate,
  days: i64
) -> NaiveDate {
  date
    .checked_add_signed(Duration::days(
      days
    ))
    .unwrap_or(date)
}

/// Moves `months` away from `date` and
/// pins the result to the first day of
/// the target month, so month length
/// never overflows into the next one.
pub fn shift_month_pinned(
  date: NaiveDate,
  months: i32
) -> NaiveDate {
  let first = first_day_of_month(date);
  let delta =
    Months::new(months.unsigned_abs());
  let shifted = if months < 0 {
    first.checked_sub_months(delta)
  } else {
    first.checked_add_months(delta)
  };
  shifted.unwrap_or(first)
}

pub fn first_day_of_month(
  date: NaiveDate
) -> NaiveDate {
  date.with_day(1).unwrap_or(date)
}

pub fn today_in_timezone(
  timezone: Tz
) -> NaiveDate {
  Utc::now()
    .with_timezone(&timezone)
    .date_naive()
}

pub fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => Some(tz),
    | Err(error) => {
      tracing::error!(
        source,
        timezone = %trimmed,
        error = %error,
        "invalid timezone id"
      );
      None
    }
  }
}
