use std::rc::Rc;

use openhours_shared::ResponseFormat;
use tracing::{
  debug,
  error,
  info,
  warn
};

use crate::client::OpeningHoursClient;
use crate::element::{
  TitleSlot,
  WidgetElement,
  WidgetPage
};
use crate::error::EngineError;
use crate::item::{
  ItemHandle,
  WidgetItem
};
use crate::navigator::{
  MonthStep,
  page_month
};
use crate::options::GlobalOptions;
use crate::planner::plan;
use crate::view::ViewType;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum RenderOutcome {
  /// Item was not renderable or had
  /// nothing to request.
  Skipped,
  Painted { view_type: ViewType },
  /// The fetch failed; the item's error
  /// path ran.
  Failed,
  /// A newer request for the same item
  /// was issued while this one was in
  /// flight; its response was dropped.
  Stale
}

impl RenderOutcome {
  /// Month views get calendar bindings on
  /// the freshly painted subtree.
  pub fn needs_calendar(&self) -> bool {
    matches!(
      self,
      Self::Painted { view_type }
        if view_type.is_calendar()
    )
  }
}

/// One discovery pass over a set of
/// widget elements.
pub struct WidgetEngine<C, P, E> {
  options: Rc<GlobalOptions<E>>,
  client:  C,
  page:    P,
  items:   Vec<ItemHandle<E>>
}

impl<C, P, E> WidgetEngine<C, P, E>
where
  C: OpeningHoursClient,
  P: WidgetPage,
  E: WidgetElement
{
  /// Validates the options and builds an
  /// item per element. Items that fail
  /// validation report their error and
  /// are left out.
  #[tracing::instrument(skip_all)]
  pub fn initialize<I>(
    elements: I,
    options: GlobalOptions<E>,
    client: C,
    page: P
  ) -> Result<Self, EngineError>
  where
    I: IntoIterator<Item = E>
  {
    if !options.has_endpoint() {
      let err = EngineError::MissingEndpoint;
      error!("{err}");
      return Err(err);
    }

    let options = Rc::new(options);
    let mut discovered = 0_usize;
    let items = elements
      .into_iter()
      .inspect(|_| discovered += 1)
      .map(|element| {
        WidgetItem::new(
          element,
          Rc::clone(&options)
        )
      })
      .filter(WidgetItem::is_renderable)
      .map(WidgetItem::into_handle)
      .collect::<Vec<_>>();

    info!(
      discovered,
      renderable = items.len(),
      endpoint = %options.endpoint,
      language = %options.language,
      "initialized opening hours widgets"
    );

    Ok(Self {
      options,
      client,
      page,
      items
    })
  }

  pub fn items(&self) -> &[ItemHandle<E>] {
    &self.items
  }

  pub fn options(
    &self
  ) -> &GlobalOptions<E> {
    &self.options
  }

  pub fn client(&self) -> &C {
    &self.client
  }

  pub fn page(&self) -> &P {
    &self.page
  }

  /// Renders every item one after the
  /// other. Each title lookup runs
  /// alongside its item's render and
  /// never holds up the paint.
  pub async fn render_all(
    &self
  ) -> Vec<RenderOutcome> {
    let mut outcomes =
      Vec::with_capacity(self.items.len());
    for item in &self.items {
      let ((), outcome) = futures::join!(
        self.refresh_title(item),
        self.render(item)
      );
      outcomes.push(outcome);
    }
    outcomes
  }

  /// Best-effort channel label lookup
  /// into the page's title element.
  pub async fn refresh_title(
    &self,
    item: &ItemHandle<E>
  ) {
    let (service_id, channel_id) = {
      let item = item.borrow();
      let Some(service_id) =
        item.service_id()
      else {
        return;
      };
      (service_id, item.channel_id())
    };

    let Some(title) = self
      .page
      .channel_title(service_id, channel_id)
    else {
      return;
    };
    if !title.is_empty() {
      return;
    }

    match self
      .client
      .fetch_channel(
        service_id,
        channel_id,
        ResponseFormat::Json
      )
      .await
    {
      | Ok(channel) => {
        title.set_text(&channel.label)
      }
      | Err(err) => {
        debug!(
          service = service_id,
          channel = ?channel_id,
          error = %err,
          "channel title lookup failed"
        );
      }
    }
  }

  /// Plans, fetches and paints one item.
  #[tracing::instrument(level = "debug", skip_all)]
  pub async fn render(
    &self,
    item: &ItemHandle<E>
  ) -> RenderOutcome {
    let (planned, seq) = {
      let mut item = item.borrow_mut();
      let Some(planned) = plan(&mut *item)
      else {
        return RenderOutcome::Skipped;
      };
      (planned, item.begin_request())
    };

    let result =
      planned.dispatch(&self.client).await;

    let item = item.borrow();
    if !item.is_latest_request(seq) {
      debug!(
        seq,
        view = %planned.view_type,
        "dropping out-of-date response"
      );
      return RenderOutcome::Stale;
    }

    match result {
      | Ok(html) => {
        item.print(&html);
        RenderOutcome::Painted {
          view_type: planned.view_type
        }
      }
      | Err(err) => {
        warn!(
          service = planned.service_id,
          channel = ?planned.channel_id,
          view = %planned.view_type,
          "widget request failed"
        );
        item.print_error(&err.to_string());
        RenderOutcome::Failed
      }
    }
  }

  /// Month paging: move the cursor, then
  /// render the same item again.
  pub async fn step_month(
    &self,
    item: &ItemHandle<E>,
    step: MonthStep
  ) -> RenderOutcome {
    page_month(&mut *item.borrow_mut(), step);
    self.render(item).await
  }
}

#[cfg(test)]
mod tests {
  use std::cell::{
    Cell,
    RefCell
  };
  use std::rc::Rc;

  use chrono::NaiveDate;
  use tokio::sync::oneshot;

  use super::*;
  use crate::client::{
    ApiClient,
    ApiRequest,
    Transport
  };
  use crate::error::ApiError;
  use crate::headless::{
    HeadlessElement,
    HeadlessPage
  };

  #[derive(Default)]
  struct ScriptedTransport {
    seen: RefCell<Vec<ApiRequest>>,
    gate: RefCell<Option<oneshot::Receiver<()>>>,
    fail: Cell<bool>,
    channel: Cell<ChannelLookup>
  }

  #[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq,
  )]
  enum ChannelLookup {
    #[default]
    Answers,
    Fails,
    Hangs
  }

  impl Transport for ScriptedTransport {
    async fn get(
      &self,
      request: &ApiRequest
    ) -> Result<String, ApiError> {
      self
        .seen
        .borrow_mut()
        .push(request.clone());

      let gate = self.gate.borrow_mut().take();
      if let Some(gate) = gate {
        let _ = gate.await;
      }

      if self.fail.get() {
        return Err(ApiError::Status {
          url:    request.url.clone(),
          status: 503
        });
      }
      if request.url.ends_with("/channels/12") {
        match self.channel.get() {
          | ChannelLookup::Answers => {}
          | ChannelLookup::Fails => {
            return Err(ApiError::Status {
              url:    request.url.clone(),
              status: 500
            });
          }
          | ChannelLookup::Hangs => {
            std::future::pending::<()>().await;
          }
        }
        return Ok(
          r#"{"id":12,"serviceId":5,"label":"Loket Zuid"}"#
            .to_string()
        );
      }
      let date = request
        .query
        .iter()
        .find(|(key, _)| *key == "date")
        .map(|(_, value)| value.clone())
        .unwrap_or_default();
      Ok(format!("<p>{date}</p>"))
    }
  }

  type TestEngine = WidgetEngine<
    ApiClient<ScriptedTransport>,
    HeadlessPage,
    HeadlessElement
  >;

  fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17)
      .expect("valid date")
  }

  fn widget(kind: &str) -> HeadlessElement {
    HeadlessElement::new()
      .with_data("type", kind)
      .with_data("service", "5")
      .with_data("channel", "12")
  }

  fn engine(
    elements: Vec<HeadlessElement>,
    options: GlobalOptions<HeadlessElement>,
    page: HeadlessPage
  ) -> TestEngine {
    WidgetEngine::initialize(
      elements,
      options,
      ApiClient::new(
        "https://api.example/",
        "en",
        ScriptedTransport::default()
      ),
      page
    )
    .expect("engine initializes")
  }

  fn options() -> GlobalOptions<HeadlessElement>
  {
    GlobalOptions::new(
      "https://api.example/",
      today()
    )
  }

  fn seen(
    engine: &TestEngine
  ) -> Vec<ApiRequest> {
    engine
      .client()
      .transport()
      .seen
      .borrow()
      .clone()
  }

  #[tokio::test(flavor = "current_thread")]
  async fn day_widget_is_painted_for_today() {
    let element = widget("day");
    let engine = engine(
      vec![element.clone()],
      options(),
      HeadlessPage::new()
    );

    let outcomes = engine.render_all().await;
    assert_eq!(
      outcomes,
      vec![RenderOutcome::Painted {
        view_type: ViewType::Day
      }]
    );

    let requests = seen(&engine);
    assert_eq!(requests.len(), 1);
    assert_eq!(
      requests[0].url,
      "https://api.example/services/5/channels/12/openinghours/day"
    );
    assert_eq!(
      requests[0].query,
      vec![
        ("date", "2026-10-17".to_string()),
        ("language", "en".to_string()),
      ]
    );
    assert_eq!(
      element.content(),
      "<p>2026-10-17</p>"
    );
    assert_eq!(element.change_count(), 1);
    assert_eq!(
      element.attribute("tabindex").as_deref(),
      Some("-1")
    );
  }

  #[test]
  fn missing_endpoint_touches_nothing() {
    let element = widget("day");
    let result: Result<TestEngine, _> =
      WidgetEngine::initialize(
        vec![element.clone()],
        GlobalOptions::new("", today()),
        ApiClient::new(
          "",
          "en",
          ScriptedTransport::default()
        ),
        HeadlessPage::new()
      );

    assert!(matches!(
      result,
      Err(EngineError::MissingEndpoint)
    ));
    assert_eq!(element.content(), "");
    assert_eq!(element.change_count(), 0);
    assert_eq!(element.attribute("tabindex"), None);
  }

  #[test]
  fn invalid_elements_are_not_tracked() {
    let engine = engine(
      vec![
        widget("week"),
        HeadlessElement::new()
          .with_data("type", "week"),
      ],
      options(),
      HeadlessPage::new()
    );
    assert_eq!(engine.items().len(), 1);
  }

  #[tokio::test(flavor = "current_thread")]
  async fn superseded_response_is_dropped() {
    let element = widget("month")
      .with_data("date", "2026-03-10");
    let engine = engine(
      vec![element.clone()],
      options(),
      HeadlessPage::new()
    );
    let (release, gate) = oneshot::channel();
    *engine.client().transport().gate.borrow_mut() =
      Some(gate);
    let item = Rc::clone(&engine.items()[0]);

    let (first, second) = tokio::join!(
      engine.render(&item),
      async {
        let outcome = engine
          .step_month(&item, MonthStep::Next)
          .await;
        let _ = release.send(());
        outcome
      }
    );

    assert_eq!(first, RenderOutcome::Stale);
    assert_eq!(
      second,
      RenderOutcome::Painted {
        view_type: ViewType::Month
      }
    );
    assert!(second.needs_calendar());
    assert_eq!(
      element.content(),
      "<p>2026-04-01</p>"
    );
    assert_eq!(element.change_count(), 1);
  }

  #[tokio::test(flavor = "current_thread")]
  async fn failed_fetch_runs_error_hook() {
    let failures = Rc::new(Cell::new(0));
    let counter = Rc::clone(&failures);
    let element = widget("year");
    let engine = engine(
      vec![element.clone()],
      options().with_error_hook(move |_| {
        counter.set(counter.get() + 1)
      }),
      HeadlessPage::new()
    );
    engine.client().transport().fail.set(true);

    let outcomes = engine.render_all().await;
    assert_eq!(
      outcomes,
      vec![RenderOutcome::Failed]
    );
    assert!(!outcomes[0].needs_calendar());
    assert_eq!(failures.get(), 1);
    assert_eq!(element.content(), "");
  }

  #[tokio::test(flavor = "current_thread")]
  async fn empty_title_gets_channel_label() {
    let page = HeadlessPage::new();
    let title = page.add_title(5, Some(12));
    let engine = engine(
      vec![widget("open-now")],
      options(),
      page
    );

    engine.render_all().await;
    assert_eq!(title.text(), "Loket Zuid");
    assert_eq!(
      seen(&engine)[0].url,
      "https://api.example/services/5/channels/12"
    );
  }

  #[tokio::test(flavor = "current_thread")]
  async fn filled_title_is_left_alone() {
    let page = HeadlessPage::new();
    let title = page.add_title(5, Some(12));
    title.set_text("Balie");
    let engine = engine(
      vec![widget("open-now")],
      options(),
      page
    );

    engine.render_all().await;
    assert_eq!(title.text(), "Balie");
    let requests = seen(&engine);
    assert_eq!(requests.len(), 1);
    assert!(
      requests[0].url.ends_with("/open-now")
    );
  }

  #[tokio::test(flavor = "current_thread")]
  async fn hung_title_lookup_does_not_hold_up_paint(
  ) {
    let page = HeadlessPage::new();
    let title = page.add_title(5, Some(12));
    let element = widget("day");
    let engine = engine(
      vec![element.clone()],
      options(),
      page
    );
    engine
      .client()
      .transport()
      .channel
      .set(ChannelLookup::Hangs);

    let painted = async {
      while element.content().is_empty() {
        tokio::task::yield_now().await;
      }
    };
    tokio::select! {
      _ = engine.render_all() => {
        panic!("title lookup never resolves")
      }
      () = painted => {}
    }

    assert_eq!(
      element.content(),
      "<p>2026-10-17</p>"
    );
    assert_eq!(title.text(), "");
  }

  #[tokio::test(flavor = "current_thread")]
  async fn failed_title_lookup_is_ignored() {
    let failures = Rc::new(Cell::new(0));
    let counter = Rc::clone(&failures);
    let page = HeadlessPage::new();
    let title = page.add_title(5, Some(12));
    let element = widget("day");
    let engine = engine(
      vec![element.clone()],
      options().with_error_hook(move |_| {
        counter.set(counter.get() + 1)
      }),
      page
    );
    engine
      .client()
      .transport()
      .channel
      .set(ChannelLookup::Fails);

    let outcomes = engine.render_all().await;
    assert_eq!(
      outcomes,
      vec![RenderOutcome::Painted {
        view_type: ViewType::Day
      }]
    );
    assert_eq!(title.text(), "");
    assert_eq!(failures.get(), 0);
    assert_eq!(
      element.content(),
      "<p>2026-10-17</p>"
    );
    assert_eq!(seen(&engine).len(), 2);
  }
}
