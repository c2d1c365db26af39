use chrono::NaiveDate;
use openhours_shared::ResponseFormat;
use serde::Serialize;

use crate::client::{
  OpeningHoursClient,
  RequestParameters
};
use crate::date::{
  add_days,
  format_date
};
use crate::element::WidgetElement;
use crate::error::ApiError;
use crate::item::WidgetItem;
use crate::view::ViewType;

/// Length of the rolling window minus
/// its first day.
const ROLLING_WEEK_EXTRA_DAYS: i64 = 6;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
)]
#[serde(tag = "operation", rename_all = "kebab-case")]
pub enum Operation {
  Status,
  Day,
  Week,
  Month,
  Year,
  Range {
    from:  NaiveDate,
    until: NaiveDate
  }
}

/// One remote call, fully parameterized.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
)]
pub struct PlannedRequest {
  pub view_type:  ViewType,
  #[serde(flatten)]
  pub operation:  Operation,
  pub service_id: u32,
  pub channel_id: Option<u32>,
  pub format:     ResponseFormat,
  pub parameters: RequestParameters
}

impl PlannedRequest {
  pub async fn dispatch<C>(
    &self,
    client: &C
  ) -> Result<String, ApiError>
  where
    C: OpeningHoursClient
  {
    let service = self.service_id;
    let channel = self.channel_id;
    let format = self.format;
    let params = &self.parameters;

    match self.operation {
      | Operation::Status => {
        client
          .fetch_status(
            service, channel, format,
            params
          )
          .await
      }
      | Operation::Day => {
        client
          .fetch_opening_hours_for_date(
            service, channel, format,
            params
          )
          .await
      }
      | Operation::Week => {
        client
          .fetch_opening_hours_for_week(
            service, channel, format,
            params
          )
          .await
      }
      | Operation::Month => {
        client
          .fetch_opening_hours_for_month(
            service, channel, format,
            params
          )
          .await
      }
      | Operation::Year => {
        client
          .fetch_opening_hours_for_year(
            service, channel, format,
            params
          )
          .await
      }
      | Operation::Range { from, until } => {
        client
          .fetch_opening_hours_by_range(
            from, until, service, channel,
            format, params
          )
          .await
      }
    }
  }
}

/// Computes the remote call for `item`.
///
/// `None` when the item is not
/// renderable, or when its rolling week
/// lies entirely outside the period. The
/// rolling week resets the item's cursor
/// to its anchor first.
#[tracing::instrument(level = "debug", skip_all)]
pub fn plan<E: WidgetElement>(
  item: &mut WidgetItem<E>
) -> Option<PlannedRequest> {
  if !item.is_renderable() {
    return None;
  }
  let view_type = item.view_type()?;
  let service_id = item.service_id()?;
  let channel_id = item.channel_id();
  let language =
    item.options().language.clone();

  let operation = match view_type {
    | ViewType::OpenNow => {
      Operation::Status
    }
    | ViewType::Day => Operation::Day,
    | ViewType::Week => Operation::Week,
    | ViewType::Month => Operation::Month,
    | ViewType::Year => Operation::Year,
    | ViewType::WeekFromNow => {
      item.date_mut().reset();
      let Some((from, until)) =
        rolling_week(item)
      else {
        tracing::warn!(
          service = service_id,
          channel = ?channel_id,
          "rolling week lies outside the period"
        );
        return None;
      };
      Operation::Range { from, until }
    }
  };

  let mut parameters =
    RequestParameters::new(
      item.date().date(),
      &language
    );
  if matches!(
    operation,
    Operation::Week
      | Operation::Month
      | Operation::Year
  ) {
    let period = item.period();
    parameters.from =
      period.from().map(format_date);
    parameters.until =
      period.until().map(format_date);
  }

  let planned = PlannedRequest {
    view_type,
    operation,
    service_id,
    channel_id,
    format: ResponseFormat::Html,
    parameters
  };
  tracing::debug!(
    view = %view_type,
    service = service_id,
    channel = ?channel_id,
    date = %planned.parameters.date,
    "planned widget request"
  );
  Some(planned)
}

/// `[anchor, anchor + 6]`, narrowed by the
/// item's period. The window end is fixed
/// by the anchor unless the period starts
/// after it; then the week follows `from`.
fn rolling_week<E: WidgetElement>(
  item: &WidgetItem<E>
) -> Option<(NaiveDate, NaiveDate)> {
  let anchor = item.date().original();
  let period = item.period();

  let (from, until) = period.clip(
    anchor,
    add_days(anchor, ROLLING_WEEK_EXTRA_DAYS)
  );
  if from <= until {
    return Some((from, until));
  }

  let (from, until) = period.clip(
    from,
    add_days(from, ROLLING_WEEK_EXTRA_DAYS)
  );
  (from <= until).then_some((from, until))
}
