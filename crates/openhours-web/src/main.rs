mod calendar;
mod dom;
mod host;
mod http;
mod tabs;
mod widgets;

use std::rc::Rc;

use openhours_core::element::WIDGET_SELECTOR;

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!(
    "starting opening hours widgets"
  );

  let Some(document) = web_sys::window()
    .and_then(|window| window.document())
  else {
    tracing::error!(
      "no document to attach widgets to"
    );
    return;
  };

  let settings =
    Rc::new(host::read_settings());
  let request_date =
    host::read_request_date();

  let widgets = dom::elements(
    document
      .query_selector_all(WIDGET_SELECTOR)
  )
  .into_iter()
  .map(dom::DomElement::new)
  .collect();

  widgets::start_batch(
    widgets,
    &settings,
    request_date.as_deref(),
    &document
  );
  tabs::bind_navigation(
    &document,
    settings,
    request_date
  );
}
