//! Seams to the page a widget lives in.
//!
//! Handles are non-owning: the page keeps
//! the element alive, a widget item only
//! keeps a cheap clone of the handle.

pub const DATA_TYPE: &str = "type";
pub const DATA_SERVICE: &str = "service";
pub const DATA_CHANNEL: &str = "channel";
pub const DATA_DATE: &str = "date";
pub const DATA_FROM: &str = "from";
pub const DATA_UNTIL: &str = "until";

pub const TABINDEX: &str = "tabindex";

pub const WIDGET_SELECTOR: &str =
  ".openinghours-widget";
pub const WRAPPER_SELECTOR: &str =
  ".openinghours-wrapper";
pub const NAVIGATION_LINK_SELECTOR:
  &str = ".openinghours-navigation a";
pub const ACTIVE_CLASS: &str =
  "openinghours-active";

/// One widget element.
pub trait WidgetElement: Clone {
  /// `data-*` attribute value, keyed by
  /// its dataset name.
  fn data(
    &self,
    key: &str
  ) -> Option<String>;

  fn set_data(
    &self,
    key: &str,
    value: &str
  );

  fn has_attribute(
    &self,
    name: &str
  ) -> bool;

  fn set_attribute(
    &self,
    name: &str,
    value: &str
  );

  fn replace_content(
    &self,
    html: &str
  );

  /// Fires the `change` notification
  /// external listeners hook into.
  fn dispatch_change(&self);
}

/// Element showing a channel label.
pub trait TitleSlot {
  fn is_empty(&self) -> bool;

  fn set_text(&self, text: &str);
}

/// Page-level lookups the engine needs.
pub trait WidgetPage {
  type Title: TitleSlot;

  /// Title element for the given
  /// service/channel pair, if the page
  /// has one.
  fn channel_title(
    &self,
    service_id: u32,
    channel_id: Option<u32>
  ) -> Option<Self::Title>;
}
