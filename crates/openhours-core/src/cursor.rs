use chrono::NaiveDate;

use crate::date::{
  add_days,
  shift_month_pinned
};

/// The date a widget renders for, plus the
/// anchor it was created with.
///
/// Navigation only ever moves the working
/// date; `reset` copies the anchor back.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct DateCursor {
  original: NaiveDate,
  date:     NaiveDate
}

impl DateCursor {
  pub fn new(date: NaiveDate) -> Self {
    Self {
      original: date,
      date
    }
  }

  pub fn original(&self) -> NaiveDate {
    self.original
  }

  pub fn date(&self) -> NaiveDate {
    self.date
  }

  pub fn reset(&mut self) {
    self.date = self.original;
  }

  pub fn previous_week(&mut self) {
    self.date = add_days(self.date, -7);
  }

  pub fn next_week(&mut self) {
    self.date = add_days(self.date, 7);
  }

  pub fn previous_month(&mut self) {
    self.date =
      shift_month_pinned(self.date, -1);
  }

  pub fn next_month(&mut self) {
    self.date =
      shift_month_pinned(self.date, 1);
  }
}
