use std::rc::Rc;

use gloo::events::{
  EventListener,
  EventListenerOptions
};
use openhours_core::Settings;
use openhours_core::element::{
  ACTIVE_CLASS,
  DATA_TYPE,
  NAVIGATION_LINK_SELECTOR,
  WIDGET_SELECTOR,
  WRAPPER_SELECTOR,
  WidgetElement
};
use tracing::{
  info,
  warn
};
use web_sys::{
  Document,
  Element
};

use crate::dom::{
  DomElement,
  elements
};
use crate::widgets::start_batch;

const VIEW_ATTRIBUTE: &str = "data-widget";

/// Wires the view-type links next to the
/// widgets. Picking one re-renders the
/// widget of the same wrapper as a new
/// single-widget batch.
pub fn bind_navigation(
  document: &Document,
  settings: Rc<Settings>,
  request_date: Option<String>
) {
  let links = Rc::new(elements(
    document.query_selector_all(
      NAVIGATION_LINK_SELECTOR
    )
  ));
  let request_date = Rc::new(request_date);

  for link in links.iter() {
    let links = Rc::clone(&links);
    let target = link.clone();
    let settings = Rc::clone(&settings);
    let request_date =
      Rc::clone(&request_date);
    let document = document.clone();

    EventListener::new_with_options(
      link,
      "click",
      EventListenerOptions::enable_prevent_default(),
      move |event| {
        event.prevent_default();
        select_view(
          &links,
          &target,
          &settings,
          request_date.as_deref(),
          &document
        );
      }
    )
    .forget();
  }
}

fn select_view(
  links: &[Element],
  selected: &Element,
  settings: &Settings,
  request_date: Option<&str>,
  document: &Document
) {
  for link in links {
    if let Err(err) =
      link.class_list().remove_1(ACTIVE_CLASS)
    {
      warn!(error = ?err, "class removal failed");
    }
  }
  if let Err(err) =
    selected.class_list().add_1(ACTIVE_CLASS)
  {
    warn!(error = ?err, "class add failed");
  }

  let Some(view) =
    selected.get_attribute(VIEW_ATTRIBUTE)
  else {
    warn!("navigation link has no view type");
    return;
  };

  let widget = selected
    .closest(WRAPPER_SELECTOR)
    .ok()
    .flatten()
    .and_then(|wrapper| {
      wrapper
        .query_selector(WIDGET_SELECTOR)
        .ok()
        .flatten()
    });
  let Some(widget) = widget else {
    warn!(
      view = %view,
      "navigation link is not inside a widget wrapper"
    );
    return;
  };

  info!(view = %view, "switching widget view");
  let widget = DomElement::new(widget);
  widget.set_data(DATA_TYPE, &view);
  start_batch(
    vec![widget],
    settings,
    request_date,
    document
  );
}
