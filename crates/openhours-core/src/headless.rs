//! In-memory page used by the command line
//! renderer and by tests.

use std::cell::RefCell;
use std::collections::{
  BTreeMap,
  BTreeSet
};
use std::rc::Rc;

use crate::element::{
  TitleSlot,
  WidgetElement,
  WidgetPage
};
use crate::navigator::DayGrid;

#[derive(Debug, Default)]
struct ElementState {
  data:       BTreeMap<String, String>,
  attributes: BTreeMap<String, String>,
  content:    String,
  changes:    usize,
  removed:    bool
}

/// Element without a DOM behind it.
/// Clones share state, like DOM handles.
#[derive(Debug, Clone, Default)]
pub struct HeadlessElement {
  state: Rc<RefCell<ElementState>>
}

impl HeadlessElement {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_data(
    self,
    key: &str,
    value: &str
  ) -> Self {
    self.set_data(key, value);
    self
  }

  pub fn attribute(
    &self,
    name: &str
  ) -> Option<String> {
    self
      .state
      .borrow()
      .attributes
      .get(name)
      .cloned()
  }

  pub fn content(&self) -> String {
    self.state.borrow().content.clone()
  }

  pub fn change_count(&self) -> usize {
    self.state.borrow().changes
  }

  pub fn remove(&self) {
    self.state.borrow_mut().removed =
      true;
  }

  pub fn is_removed(&self) -> bool {
    self.state.borrow().removed
  }
}

impl WidgetElement for HeadlessElement {
  fn data(
    &self,
    key: &str
  ) -> Option<String> {
    self
      .state
      .borrow()
      .data
      .get(key)
      .cloned()
  }

  fn set_data(
    &self,
    key: &str,
    value: &str
  ) {
    self.state.borrow_mut().data.insert(
      key.to_string(),
      value.to_string()
    );
  }

  fn has_attribute(
    &self,
    name: &str
  ) -> bool {
    self
      .state
      .borrow()
      .attributes
      .contains_key(name)
  }

  fn set_attribute(
    &self,
    name: &str,
    value: &str
  ) {
    self
      .state
      .borrow_mut()
      .attributes
      .insert(
        name.to_string(),
        value.to_string()
      );
  }

  fn replace_content(
    &self,
    html: &str
  ) {
    self.state.borrow_mut().content =
      html.to_string();
  }

  fn dispatch_change(&self) {
    self.state.borrow_mut().changes += 1;
  }
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessTitle {
  text: Rc<RefCell<String>>
}

impl HeadlessTitle {
  pub fn text(&self) -> String {
    self.text.borrow().clone()
  }
}

impl TitleSlot for HeadlessTitle {
  fn is_empty(&self) -> bool {
    self.text.borrow().is_empty()
  }

  fn set_text(&self, text: &str) {
    *self.text.borrow_mut() =
      text.to_string();
  }
}

/// Page of title slots. Clones share
/// state.
#[derive(Debug, Clone, Default)]
pub struct HeadlessPage {
  titles: Rc<
    RefCell<
      BTreeMap<
        (u32, Option<u32>),
        HeadlessTitle
      >
    >
  >
}

impl HeadlessPage {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds an empty title slot, or returns
  /// the existing one.
  pub fn add_title(
    &self,
    service_id: u32,
    channel_id: Option<u32>
  ) -> HeadlessTitle {
    self
      .titles
      .borrow_mut()
      .entry((service_id, channel_id))
      .or_default()
      .clone()
  }
}

impl WidgetPage for HeadlessPage {
  type Title = HeadlessTitle;

  fn channel_title(
    &self,
    service_id: u32,
    channel_id: Option<u32>
  ) -> Option<HeadlessTitle> {
    self
      .titles
      .borrow()
      .get(&(service_id, channel_id))
      .cloned()
  }
}

/// Day grid with cells `1..=days`, all
/// starting with an inactive tab stop.
#[derive(Debug, Clone)]
pub struct HeadlessGrid {
  positions: BTreeSet<u32>,
  active:    Option<u32>
}

impl HeadlessGrid {
  pub fn with_days(days: u32) -> Self {
    Self {
      positions: (1..=days).collect(),
      active:    None
    }
  }

  pub fn active(&self) -> Option<u32> {
    self.active
  }

  pub fn tab_index(
    &self,
    position: u32
  ) -> Option<i32> {
    if !self.positions.contains(&position)
    {
      return None;
    }
    if self.active == Some(position) {
      Some(0)
    } else {
      Some(-1)
    }
  }
}

impl DayGrid for HeadlessGrid {
  fn has_position(
    &self,
    position: u32
  ) -> bool {
    self.positions.contains(&position)
  }

  fn activate(
    &mut self,
    position: u32
  ) {
    self.active = Some(position);
  }
}
