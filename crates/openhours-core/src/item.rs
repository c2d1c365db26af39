use std::cell::RefCell;
use std::rc::Rc;

use tracing::{
  debug,
  error
};

use crate::cursor::DateCursor;
use crate::date::resolve_date_expr;
use crate::element::{
  DATA_CHANNEL,
  DATA_DATE,
  DATA_FROM,
  DATA_SERVICE,
  DATA_TYPE,
  DATA_UNTIL,
  TABINDEX,
  WidgetElement
};
use crate::error::ItemError;
use crate::options::GlobalOptions;
use crate::period::PeriodFilter;
use crate::view::ViewType;

/// Items are shared between the render
/// future and the navigation handlers of
/// their element.
pub type ItemHandle<E> =
  Rc<RefCell<WidgetItem<E>>>;

/// View model of one widget element.
///
/// Everything is resolved once in
/// [`WidgetItem::new`]; validation errors
/// are reported there and never again.
pub struct WidgetItem<E> {
  element:        E,
  options:        Rc<GlobalOptions<E>>,
  view_type:      Option<ViewType>,
  service_id:     Option<u32>,
  channel_id:     Option<u32>,
  date:           DateCursor,
  period:         PeriodFilter,
  errors:         Vec<ItemError>,
  latest_request: u64
}

impl<E: WidgetElement> WidgetItem<E> {
  pub fn new(
    element: E,
    options: Rc<GlobalOptions<E>>
  ) -> Self {
    let mut errors = Vec::new();

    let view_type = element
      .data(DATA_TYPE)
      .map(|raw| {
        ViewType::from_attribute(&raw)
      });
    if view_type.is_none() {
      errors.push(
        ItemError::MissingViewType
      );
    }

    let service_id = element
      .data(DATA_SERVICE)
      .as_deref()
      .and_then(parse_positive_id);
    if service_id.is_none() {
      errors.push(
        ItemError::InvalidServiceId
      );
    }

    let channel_id = element
      .data(DATA_CHANNEL)
      .as_deref()
      .and_then(parse_positive_id);
    if channel_id.is_none() {
      if options.require_channel {
        errors.push(
          ItemError::InvalidChannelId
        );
      } else {
        debug!(
          "widget has no channel; using service-level requests"
        );
      }
    }

    let date = resolve_cursor(
      &element, &options
    );
    let period =
      PeriodFilter::from_attributes(
        element
          .data(DATA_FROM)
          .as_deref(),
        element
          .data(DATA_UNTIL)
          .as_deref()
      );

    let item = Self {
      element,
      options,
      view_type,
      service_id,
      channel_id,
      date,
      period,
      errors,
      latest_request: 0
    };
    for err in &item.errors {
      item.print_error(&err.to_string());
    }
    item
  }

  pub fn into_handle(
    self
  ) -> ItemHandle<E> {
    Rc::new(RefCell::new(self))
  }

  pub fn element(&self) -> &E {
    &self.element
  }

  pub fn options(
    &self
  ) -> &GlobalOptions<E> {
    &self.options
  }

  pub fn view_type(
    &self
  ) -> Option<ViewType> {
    self.view_type
  }

  pub fn service_id(
    &self
  ) -> Option<u32> {
    self.service_id
  }

  pub fn channel_id(
    &self
  ) -> Option<u32> {
    self.channel_id
  }

  pub fn date(&self) -> &DateCursor {
    &self.date
  }

  pub fn date_mut(
    &mut self
  ) -> &mut DateCursor {
    &mut self.date
  }

  pub fn period(&self) -> &PeriodFilter {
    &self.period
  }

  pub fn errors(&self) -> &[ItemError] {
    &self.errors
  }

  pub fn is_renderable(&self) -> bool {
    self.view_type.is_some()
      && self.service_id.is_some()
      && (self.channel_id.is_some()
        || !self.options.require_channel)
  }

  /// Paints `html` into the element and
  /// notifies listeners.
  pub fn print(&self, html: &str) {
    self.element.replace_content(html);
    if !self.element.has_attribute(TABINDEX)
    {
      self
        .element
        .set_attribute(TABINDEX, "-1");
    }
    self.element.dispatch_change();
  }

  pub fn print_error(
    &self,
    message: &str
  ) {
    error!(
      service = ?self.service_id,
      channel = ?self.channel_id,
      "{message}"
    );
    if let Some(hook) =
      self.options.error.as_ref()
    {
      hook(&self.element);
    }
  }

  /// Reserves the sequence number of a
  /// new request for this item.
  pub fn begin_request(&mut self) -> u64 {
    self.latest_request += 1;
    self.latest_request
  }

  pub fn is_latest_request(
    &self,
    seq: u64
  ) -> bool {
    seq == self.latest_request
  }
}

fn resolve_cursor<E: WidgetElement>(
  element: &E,
  options: &GlobalOptions<E>
) -> DateCursor {
  if let Some(date) = options.request_date
  {
    return DateCursor::new(date);
  }

  match element.data(DATA_DATE) {
    | Some(raw) => {
      DateCursor::new(resolve_date_expr(
        &raw,
        options.today
      ))
    }
    | None => {
      DateCursor::new(options.today)
    }
  }
}

fn parse_positive_id(
  raw: &str
) -> Option<u32> {
  raw
    .trim()
    .parse::<u32>()
    .ok()
    .filter(|id| *id > 0)
}
