//! Browser DOM behind the engine's element
//! and page seams.

use openhours_core::element::{
  TABINDEX,
  TitleSlot,
  WRAPPER_SELECTOR,
  WidgetElement,
  WidgetPage
};
use openhours_core::navigator::{
  DAY_SELECTOR,
  DayGrid,
  INACTIVE_CLASS
};
use tracing::{
  debug,
  warn
};
use wasm_bindgen::{
  JsCast,
  JsValue
};
use web_sys::{
  CustomEvent,
  CustomEventInit,
  Document,
  Element,
  HtmlElement,
  NodeList
};

pub const TITLE_SELECTOR: &str =
  ".openinghours-channel-title";
const POSITION_ATTRIBUTE: &str =
  "aria-posinset";
const CHANGE_EVENT: &str = "change";

/// Elements of a `querySelectorAll`
/// result; a failed query yields none.
pub fn elements(
  list: Result<NodeList, JsValue>
) -> Vec<Element> {
  let list = match list {
    | Ok(list) => list,
    | Err(err) => {
      warn!(error = ?err, "selector query failed");
      return Vec::new();
    }
  };
  (0..list.length())
    .filter_map(|index| list.item(index))
    .filter_map(|node| {
      node.dyn_into::<Element>().ok()
    })
    .collect()
}

fn check(
  result: Result<(), JsValue>,
  action: &str
) {
  if let Err(err) = result {
    warn!(error = ?err, action, "DOM update failed");
  }
}

#[derive(Debug, Clone)]
pub struct DomElement {
  element: Element
}

impl DomElement {
  pub fn new(element: Element) -> Self {
    Self { element }
  }

  pub fn element(&self) -> &Element {
    &self.element
  }

  /// Error hook: drops the widget's
  /// wrapper from the page.
  pub fn remove_wrapper(&self) {
    match self
      .element
      .closest(WRAPPER_SELECTOR)
    {
      | Ok(Some(wrapper)) => {
        wrapper.remove()
      }
      | Ok(None) => {
        debug!("failed widget has no wrapper")
      }
      | Err(err) => {
        warn!(error = ?err, "wrapper lookup failed")
      }
    }
  }
}

impl WidgetElement for DomElement {
  fn data(
    &self,
    key: &str
  ) -> Option<String> {
    self
      .element
      .get_attribute(&format!("data-{key}"))
  }

  fn set_data(
    &self,
    key: &str,
    value: &str
  ) {
    check(
      self.element.set_attribute(
        &format!("data-{key}"),
        value
      ),
      "set data attribute"
    );
  }

  fn has_attribute(
    &self,
    name: &str
  ) -> bool {
    self.element.has_attribute(name)
  }

  fn set_attribute(
    &self,
    name: &str,
    value: &str
  ) {
    check(
      self
        .element
        .set_attribute(name, value),
      "set attribute"
    );
  }

  fn replace_content(
    &self,
    html: &str
  ) {
    self.element.set_inner_html(html);
  }

  fn dispatch_change(&self) {
    let init = CustomEventInit::new();
    init.set_bubbles(true);
    let event =
      CustomEvent::new_with_event_init_dict(
        CHANGE_EVENT,
        &init
      );
    match event {
      | Ok(event) => {
        if let Err(err) =
          self.element.dispatch_event(&event)
        {
          warn!(error = ?err, "change event dispatch failed");
        }
      }
      | Err(err) => {
        warn!(error = ?err, "change event creation failed")
      }
    }
  }
}

#[derive(Debug, Clone)]
pub struct DomTitle {
  element: Element
}

impl TitleSlot for DomTitle {
  fn is_empty(&self) -> bool {
    self.element.inner_html().is_empty()
  }

  fn set_text(&self, text: &str) {
    self
      .element
      .set_text_content(Some(text));
  }
}

#[derive(Debug, Clone)]
pub struct DomPage {
  document: Document
}

impl DomPage {
  pub fn new(document: Document) -> Self {
    Self { document }
  }
}

impl WidgetPage for DomPage {
  type Title = DomTitle;

  fn channel_title(
    &self,
    service_id: u32,
    channel_id: Option<u32>
  ) -> Option<DomTitle> {
    let selector = match channel_id {
      | Some(channel_id) => format!(
        "{TITLE_SELECTOR}[data-service=\"{service_id}\"][data-channel=\"{channel_id}\"]"
      ),
      | None => format!(
        "{TITLE_SELECTOR}[data-service=\"{service_id}\"]"
      )
    };
    self
      .document
      .query_selector(&selector)
      .ok()
      .flatten()
      .map(|element| DomTitle { element })
  }
}

/// Day cells of one rendered month view,
/// keyed by their `aria-posinset`.
#[derive(Debug, Clone)]
pub struct DomGrid {
  cells: Vec<(u32, Element)>
}

impl DomGrid {
  pub fn collect(root: &Element) -> Self {
    let cells = elements(
      root.query_selector_all(DAY_SELECTOR)
    )
    .into_iter()
    .filter_map(|cell| {
      position(&cell).map(|pos| (pos, cell))
    })
    .collect();
    Self { cells }
  }

  pub fn cells(&self) -> &[(u32, Element)] {
    &self.cells
  }
}

pub fn position(
  cell: &Element
) -> Option<u32> {
  cell
    .get_attribute(POSITION_ATTRIBUTE)?
    .trim()
    .parse()
    .ok()
}

impl DayGrid for DomGrid {
  fn has_position(
    &self,
    position: u32
  ) -> bool {
    self
      .cells
      .iter()
      .any(|(pos, _)| *pos == position)
  }

  fn activate(
    &mut self,
    position: u32
  ) {
    for (pos, cell) in &self.cells {
      let active = *pos == position;
      check(
        cell.set_attribute(
          TABINDEX,
          if active { "0" } else { "-1" }
        ),
        "set tabindex"
      );
      if let Err(err) = cell
        .class_list()
        .toggle_with_force(
          INACTIVE_CLASS,
          !active
        )
      {
        warn!(error = ?err, "class toggle failed");
      }
      if active {
        if let Some(cell) =
          cell.dyn_ref::<HtmlElement>()
        {
          check(cell.focus(), "focus day");
        }
      }
    }
  }
}
