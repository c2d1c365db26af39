use std::cell::RefCell;
use std::fs;

use chrono::NaiveDate;
use openhours_core::config::{Settings, load_settings_file};
use openhours_core::headless::{HeadlessElement, HeadlessGrid, HeadlessPage};
use openhours_core::navigator::{CalendarNavigator, MonthStep, NavKey};
use openhours_core::{
    ApiError, GlobalOptions, OpeningHoursClient, RenderOutcome, RequestParameters, ViewType,
    WidgetEngine,
};
use openhours_shared::{ChannelDto, ResponseFormat};
use tempfile::tempdir;

#[derive(Default)]
struct FakeClient {
    calls: RefCell<Vec<String>>,
}

impl FakeClient {
    fn record(&self, call: String) -> Result<String, ApiError> {
        self.calls.borrow_mut().push(call.clone());
        Ok(format!("<div>{call}</div>"))
    }
}

impl OpeningHoursClient for FakeClient {
    async fn fetch_status(
        &self,
        service_id: u32,
        channel_id: Option<u32>,
        _format: ResponseFormat,
        parameters: &RequestParameters,
    ) -> Result<String, ApiError> {
        self.record(format!("status {service_id}/{channel_id:?} {}", parameters.date))
    }

    async fn fetch_opening_hours_for_date(
        &self,
        service_id: u32,
        channel_id: Option<u32>,
        _format: ResponseFormat,
        parameters: &RequestParameters,
    ) -> Result<String, ApiError> {
        self.record(format!("day {service_id}/{channel_id:?} {}", parameters.date))
    }

    async fn fetch_opening_hours_for_week(
        &self,
        service_id: u32,
        channel_id: Option<u32>,
        _format: ResponseFormat,
        parameters: &RequestParameters,
    ) -> Result<String, ApiError> {
        self.record(format!("week {service_id}/{channel_id:?} {}", parameters.date))
    }

    async fn fetch_opening_hours_for_month(
        &self,
        service_id: u32,
        channel_id: Option<u32>,
        _format: ResponseFormat,
        parameters: &RequestParameters,
    ) -> Result<String, ApiError> {
        self.record(format!("month {service_id}/{channel_id:?} {}", parameters.date))
    }

    async fn fetch_opening_hours_for_year(
        &self,
        service_id: u32,
        channel_id: Option<u32>,
        _format: ResponseFormat,
        parameters: &RequestParameters,
    ) -> Result<String, ApiError> {
        self.record(format!("year {service_id}/{channel_id:?} {}", parameters.date))
    }

    async fn fetch_opening_hours_by_range(
        &self,
        from: NaiveDate,
        until: NaiveDate,
        service_id: u32,
        channel_id: Option<u32>,
        _format: ResponseFormat,
        _parameters: &RequestParameters,
    ) -> Result<String, ApiError> {
        self.record(format!("range {service_id}/{channel_id:?} {from}..{until}"))
    }

    async fn fetch_channel(
        &self,
        service_id: u32,
        channel_id: Option<u32>,
        _format: ResponseFormat,
    ) -> Result<ChannelDto, ApiError> {
        self.calls
            .borrow_mut()
            .push(format!("channel {service_id}/{channel_id:?}"));
        Ok(ChannelDto {
            id: channel_id.map(u64::from),
            service_id: Some(u64::from(service_id)),
            label: "Stadhuis".to_string(),
        })
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn widget(kind: &str) -> HeadlessElement {
    HeadlessElement::new()
        .with_data("type", kind)
        .with_data("service", "5")
        .with_data("channel", "12")
}

#[tokio::test(flavor = "current_thread")]
async fn settings_file_drives_a_full_page() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("openhours.toml");
    fs::write(
        &path,
        "endpoint = \"https://api.example/v1\"\nlanguage = \"nl\"\ntimezone = \"Europe/Brussels\"\n",
    )
    .expect("write settings");

    let settings = Settings::from_raw(load_settings_file(&path).expect("load settings"));
    assert_eq!(settings.endpoint, "https://api.example/v1/");

    let options = GlobalOptions::from_settings(&settings, Some("2026-02-27"), ymd(2026, 10, 17));

    let rolling = widget("week-from-now");
    let month = widget("month");
    let broken = HeadlessElement::new().with_data("service", "5");

    let page = HeadlessPage::new();
    let title = page.add_title(5, Some(12));

    let engine = WidgetEngine::initialize(
        vec![rolling.clone(), broken.clone(), month.clone()],
        options,
        FakeClient::default(),
        page,
    )
    .expect("engine initializes");
    assert_eq!(engine.items().len(), 2);

    let outcomes = engine.render_all().await;
    assert_eq!(
        outcomes,
        vec![
            RenderOutcome::Painted {
                view_type: ViewType::WeekFromNow
            },
            RenderOutcome::Painted {
                view_type: ViewType::Month
            },
        ]
    );
    assert!(outcomes[1].needs_calendar());

    assert_eq!(title.text(), "Stadhuis");
    assert_eq!(
        rolling.content(),
        "<div>range 5/Some(12) 2026-02-27..2026-03-05</div>"
    );
    assert_eq!(month.content(), "<div>month 5/Some(12) 2026-02-27</div>");
    assert_eq!(broken.content(), "");

    let calls = engine.client().calls.borrow().clone();
    assert_eq!(
        calls.iter().filter(|call| call.starts_with("channel")).count(),
        1,
        "title is only looked up while empty"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn month_paging_and_keyboard_navigation() {
    let month = widget("month").with_data("date", "2026-01-31");
    let engine = WidgetEngine::initialize(
        vec![month.clone()],
        GlobalOptions::new("https://api.example/", ymd(2026, 10, 17)),
        FakeClient::default(),
        HeadlessPage::new(),
    )
    .expect("engine initializes");
    let item = engine.items()[0].clone();

    engine.render(&item).await;
    assert_eq!(month.content(), "<div>month 5/Some(12) 2026-01-31</div>");

    let outcome = engine.step_month(&item, MonthStep::Next).await;
    assert!(outcome.needs_calendar());
    assert_eq!(month.content(), "<div>month 5/Some(12) 2026-02-01</div>");

    engine.step_month(&item, MonthStep::Previous).await;
    assert_eq!(month.content(), "<div>month 5/Some(12) 2026-01-01</div>");
    assert_eq!(month.change_count(), 3);

    let mut grid = HeadlessGrid::with_days(28);
    let mut nav = CalendarNavigator::new();
    assert!(nav.focus(&mut grid, 14));
    assert_eq!(nav.handle_key(&mut grid, NavKey::End, 14), Some(28));
    assert_eq!(nav.handle_key(&mut grid, NavKey::Right, 28), Some(1));
    assert_eq!(nav.handle_key(&mut grid, NavKey::Up, 1), Some(22));
    assert_eq!(grid.active(), Some(22));
}

#[test]
fn missing_endpoint_aborts_the_pass() {
    let element = widget("day");
    let result = WidgetEngine::initialize(
        vec![element.clone()],
        GlobalOptions::new("", ymd(2026, 10, 17)),
        FakeClient::default(),
        HeadlessPage::new(),
    );
    assert!(result.is_err());
    assert_eq!(element.change_count(), 0);
}
