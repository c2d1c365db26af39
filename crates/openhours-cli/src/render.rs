use anyhow::{Context, anyhow, bail};
use openhours_core::headless::{HeadlessElement, HeadlessPage};
use openhours_core::planner::{Operation, PlannedRequest, plan};
use openhours_core::{
    ApiClient, ApiRequest, GlobalOptions, RenderOutcome, Settings, Transport, WidgetEngine,
};
use serde_json::json;
use tracing::info;

use crate::cli::Cli;

type HeadlessEngine<T> = WidgetEngine<ApiClient<T>, HeadlessPage, HeadlessElement>;

/// Runs the widget described by `cli` and returns what should be printed.
#[tracing::instrument(skip_all)]
pub async fn execute<T: Transport>(
    cli: &Cli,
    settings: &Settings,
    client: ApiClient<T>,
) -> anyhow::Result<String> {
    let element = cli.widget_element();
    let mut options = GlobalOptions::from_settings(settings, cli.day.as_deref(), settings.today());
    if settings.remove_on_error {
        options = options.with_error_hook(HeadlessElement::remove);
    }

    let page = HeadlessPage::new();
    let engine = WidgetEngine::initialize([element.clone()], options, client, page.clone())?;

    if cli.plan {
        return plan_report(&engine);
    }
    if cli.title {
        return channel_title(&engine, &page).await;
    }

    let item = first_item(&engine)?;
    match engine.render(&item).await {
        RenderOutcome::Painted { view_type } => {
            info!(view = %view_type, "widget rendered");
            Ok(element.content())
        }
        RenderOutcome::Failed if element.is_removed() => {
            bail!("widget request failed; widget removed")
        }
        RenderOutcome::Failed => bail!("widget request failed"),
        outcome => bail!("widget was not rendered: {outcome:?}"),
    }
}

fn first_item<T: Transport>(
    engine: &HeadlessEngine<T>,
) -> anyhow::Result<openhours_core::ItemHandle<HeadlessElement>> {
    engine
        .items()
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("widget attributes are invalid"))
}

/// The plan and the HTTP request it resolves to, without sending it.
fn plan_report<T: Transport>(engine: &HeadlessEngine<T>) -> anyhow::Result<String> {
    let item = first_item(engine)?;
    let planned = plan(&mut *item.borrow_mut()).context("widget cannot be planned")?;
    let request = resolve_request(engine.client(), &planned);

    serde_json::to_string_pretty(&json!({
        "plan": planned,
        "request": request,
    }))
    .context("failed encoding plan")
}

pub fn resolve_request<T: Transport>(
    client: &ApiClient<T>,
    planned: &PlannedRequest,
) -> ApiRequest {
    let service = planned.service_id;
    let channel = planned.channel_id;
    let format = planned.format;
    let params = &planned.parameters;

    match planned.operation {
        Operation::Status => client.status_request(service, channel, format, params),
        Operation::Day => client.date_request(service, channel, format, params),
        Operation::Week => client.week_request(service, channel, format, params),
        Operation::Month => client.month_request(service, channel, format, params),
        Operation::Year => client.year_request(service, channel, format, params),
        Operation::Range { from, until } => {
            client.range_request(from, until, service, channel, format, params)
        }
    }
}

async fn channel_title<T: Transport>(
    engine: &HeadlessEngine<T>,
    page: &HeadlessPage,
) -> anyhow::Result<String> {
    let item = first_item(engine)?;
    let (service_id, channel_id) = {
        let item = item.borrow();
        let service_id = item
            .service_id()
            .context("widget has no service id")?;
        (service_id, item.channel_id())
    };

    let title = page.add_title(service_id, channel_id);
    engine.refresh_title(&item).await;

    let label = title.text();
    if label.is_empty() {
        bail!("channel label unavailable");
    }
    Ok(label)
}
