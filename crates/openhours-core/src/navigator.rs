//! Keyboard and paging state machine of the
//! month view.
//!
//! Day cells are addressed by their
//! `aria-posinset` position (1-based). A
//! key maps to an ordered list of candidate
//! positions; the first one present in the
//! rendered grid wins.

use crate::element::WidgetElement;
use crate::item::WidgetItem;

/// Positions tried when jumping to the
/// last day of a month.
pub const LAST_DAY_CANDIDATES: [u32; 4] =
  [31, 30, 29, 28];

pub const PREVIOUS_SELECTOR: &str =
  ".openinghours--prev";
pub const NEXT_SELECTOR: &str =
  ".openinghours--next";
pub const DAY_SELECTOR: &str =
  ".openinghours--day:not([aria-hidden])";
pub const INACTIVE_CLASS: &str =
  "inactive";

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum NavKey {
  Left,
  Right,
  Up,
  Down,
  Home,
  End
}

impl NavKey {
  /// Accepts both the current
  /// `KeyboardEvent.key` names and the
  /// legacy short ones.
  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    match key {
      | "ArrowLeft" | "Left" => {
        Some(Self::Left)
      }
      | "ArrowRight" | "Right" => {
        Some(Self::Right)
      }
      | "ArrowUp" | "Up" => Some(Self::Up),
      | "ArrowDown" | "Down" => {
        Some(Self::Down)
      }
      | "Home" => Some(Self::Home),
      | "End" => Some(Self::End),
      | _ => None
    }
  }

  /// Ordered candidate positions when
  /// the key is pressed on `position`.
  pub fn candidates(
    self,
    position: u32
  ) -> Vec<u32> {
    let p = i64::from(position);
    let raw: Vec<i64> = match self {
      | Self::Left => {
        let mut list = vec![p - 1];
        list.extend(
          LAST_DAY_CANDIDATES
            .map(i64::from)
        );
        list
      }
      | Self::Right => vec![p + 1, 1],
      | Self::Down => {
        vec![p + 7, p - 4 * 7, p - 3 * 7]
      }
      | Self::Up => {
        vec![p - 7, p + 4 * 7, p + 3 * 7]
      }
      | Self::Home => vec![1],
      | Self::End => LAST_DAY_CANDIDATES
        .map(i64::from)
        .to_vec()
    };

    raw
      .into_iter()
      .filter_map(|candidate| {
        u32::try_from(candidate).ok()
      })
      .filter(|candidate| *candidate > 0)
      .collect()
  }
}

/// Rendered day cells of one month view.
pub trait DayGrid {
  fn has_position(
    &self,
    position: u32
  ) -> bool;

  /// Gives `position` the only active tab
  /// stop and moves focus to it.
  fn activate(&mut self, position: u32);
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum NavState {
  #[default]
  Idle,
  Focused(u32)
}

#[derive(Debug, Default)]
pub struct CalendarNavigator {
  state: NavState
}

impl CalendarNavigator {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn state(&self) -> NavState {
    self.state
  }

  /// Direct activation of a day cell,
  /// e.g. by a click.
  pub fn focus<G: DayGrid>(
    &mut self,
    grid: &mut G,
    position: u32
  ) -> bool {
    if !grid.has_position(position) {
      return false;
    }
    grid.activate(position);
    self.state =
      NavState::Focused(position);
    true
  }

  /// Moves focus for `key` pressed on the
  /// cell at `from`. Returns the new
  /// position; `None` means nothing
  /// moved and the browser default must
  /// not be suppressed.
  pub fn handle_key<G: DayGrid>(
    &mut self,
    grid: &mut G,
    key: NavKey,
    from: u32
  ) -> Option<u32> {
    let target = key
      .candidates(from)
      .into_iter()
      .find(|candidate| {
        grid.has_position(*candidate)
      })?;

    tracing::trace!(
      ?key,
      from,
      target,
      "calendar focus moved"
    );
    grid.activate(target);
    self.state = NavState::Focused(target);
    Some(target)
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum MonthStep {
  Previous,
  Next
}

/// Moves the item's working date one month
/// back or forth; the caller re-renders.
pub fn page_month<E: WidgetElement>(
  item: &mut WidgetItem<E>,
  step: MonthStep
) {
  let cursor = item.date_mut();
  match step {
    | MonthStep::Previous => {
      cursor.previous_month()
    }
    | MonthStep::Next => {
      cursor.next_month()
    }
  }
  tracing::debug!(
    ?step,
    date = %item.date().date(),
    "paged month view"
  );
}
