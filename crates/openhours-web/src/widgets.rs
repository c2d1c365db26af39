use std::rc::Rc;

use openhours_core::{
  ApiClient,
  GlobalOptions,
  ItemHandle,
  RenderOutcome,
  Settings,
  WidgetEngine
};
use openhours_core::navigator::MonthStep;
use wasm_bindgen_futures::spawn_local;
use web_sys::Document;

use crate::calendar;
use crate::dom::{
  DomElement,
  DomPage
};
use crate::http::GlooTransport;

pub type DomEngine = WidgetEngine<
  ApiClient<GlooTransport>,
  DomPage,
  DomElement
>;

/// Builds one engine batch and spawns a
/// render and a title lookup per
/// renderable widget. `None`
/// when the batch was rejected (already
/// logged).
pub fn start_batch(
  elements: Vec<DomElement>,
  settings: &Settings,
  request_date: Option<&str>,
  document: &Document
) -> Option<Rc<DomEngine>> {
  let mut options =
    GlobalOptions::from_settings(
      settings,
      request_date,
      settings.today()
    );
  if settings.remove_on_error {
    options = options.with_error_hook(
      DomElement::remove_wrapper
    );
  }

  let client = ApiClient::new(
    settings.endpoint.clone(),
    settings.language.clone(),
    GlooTransport
  );
  let engine = Rc::new(
    WidgetEngine::initialize(
      elements,
      options,
      client,
      DomPage::new(document.clone())
    )
    .ok()?
  );

  for item in engine.items() {
    spawn_title(&engine, item);

    let engine = Rc::clone(&engine);
    let item = Rc::clone(item);
    spawn_local(async move {
      let outcome =
        engine.render(&item).await;
      after_render(&engine, &item, outcome);
    });
  }

  Some(engine)
}

/// Title lookup as its own task so a slow
/// channel endpoint never delays content.
fn spawn_title(
  engine: &Rc<DomEngine>,
  item: &ItemHandle<DomElement>
) {
  let engine = Rc::clone(engine);
  let item = Rc::clone(item);
  spawn_local(async move {
    engine.refresh_title(&item).await;
  });
}

/// Month paging triggered from the
/// rendered calendar.
pub fn spawn_month_step(
  engine: &Rc<DomEngine>,
  item: &ItemHandle<DomElement>,
  step: MonthStep
) {
  let engine = Rc::clone(engine);
  let item = Rc::clone(item);
  spawn_local(async move {
    let outcome =
      engine.step_month(&item, step).await;
    after_render(&engine, &item, outcome);
  });
}

fn after_render(
  engine: &Rc<DomEngine>,
  item: &ItemHandle<DomElement>,
  outcome: RenderOutcome
) {
  tracing::debug!(?outcome, "widget render finished");
  if outcome.needs_calendar() {
    calendar::bind(engine, item);
  }
}
