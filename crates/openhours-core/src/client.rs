//! Remote opening hours API.
//!
//! [`OpeningHoursClient`] is the logical
//! surface the engine consumes.
//! [`ApiClient`] implements it for the
//! public REST layout on top of any
//! [`Transport`] (browser fetch, native
//! HTTP, test fakes).
#![allow(async_fn_in_trait)]

use chrono::NaiveDate;
use openhours_shared::{
  ChannelDto,
  ResponseFormat
};
use serde::Serialize;

use crate::date::format_date;
use crate::error::ApiError;

/// Query parameters of a widget request.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
)]
pub struct RequestParameters {
  pub date:     String,
  pub language: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub from:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub until:    Option<String>
}

impl RequestParameters {
  pub fn new(
    date: NaiveDate,
    language: &str
  ) -> Self {
    Self {
      date:     format_date(date),
      language: language.to_string(),
      from:     None,
      until:    None
    }
  }

  pub fn query(
    &self
  ) -> Vec<(&'static str, String)> {
    let mut query = vec![
      ("date", self.date.clone()),
      ("language", self.language.clone()),
    ];
    if let Some(from) = &self.from {
      query.push(("from", from.clone()));
    }
    if let Some(until) = &self.until {
      query.push(("until", until.clone()));
    }
    query
  }
}

pub trait OpeningHoursClient {
  async fn fetch_status(
    &self,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat,
    parameters: &RequestParameters
  ) -> Result<String, ApiError>;

  async fn fetch_opening_hours_for_date(
    &self,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat,
    parameters: &RequestParameters
  ) -> Result<String, ApiError>;

  async fn fetch_opening_hours_for_week(
    &self,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat,
    parameters: &RequestParameters
  ) -> Result<String, ApiError>;

  async fn fetch_opening_hours_for_month(
    &self,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat,
    parameters: &RequestParameters
  ) -> Result<String, ApiError>;

  async fn fetch_opening_hours_for_year(
    &self,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat,
    parameters: &RequestParameters
  ) -> Result<String, ApiError>;

  async fn fetch_opening_hours_by_range(
    &self,
    from: NaiveDate,
    until: NaiveDate,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat,
    parameters: &RequestParameters
  ) -> Result<String, ApiError>;

  async fn fetch_channel(
    &self,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat
  ) -> Result<ChannelDto, ApiError>;
}

/// A fully resolved GET request.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
)]
pub struct ApiRequest {
  pub url:      String,
  pub query:    Vec<(&'static str, String)>,
  pub format:   ResponseFormat,
  pub language: String
}

pub trait Transport {
  async fn get(
    &self,
    request: &ApiRequest
  ) -> Result<String, ApiError>;
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
enum Resource {
  Status,
  Day,
  Week,
  Month,
  Year,
  Range,
  Channel
}

impl Resource {
  fn suffix(self) -> &'static str {
    match self {
      | Self::Status => "/open-now",
      | Self::Day => "/openinghours/day",
      | Self::Week => "/openinghours/week",
      | Self::Month => {
        "/openinghours/month"
      }
      | Self::Year => "/openinghours/year",
      | Self::Range => "/openinghours",
      | Self::Channel => ""
    }
  }
}

#[derive(Debug, Clone)]
pub struct ApiClient<T> {
  endpoint:  String,
  language:  String,
  transport: T
}

impl<T: Transport> ApiClient<T> {
  pub fn new(
    endpoint: impl Into<String>,
    language: impl Into<String>,
    transport: T
  ) -> Self {
    let mut endpoint = endpoint.into();
    if !endpoint.is_empty()
      && !endpoint.ends_with('/')
    {
      endpoint.push('/');
    }
    Self {
      endpoint,
      language: language.into(),
      transport
    }
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }

  pub fn transport(&self) -> &T {
    &self.transport
  }

  fn resource_url(
    &self,
    resource: Resource,
    service_id: u32,
    channel_id: Option<u32>
  ) -> String {
    let mut url = format!(
      "{}services/{service_id}",
      self.endpoint
    );
    if let Some(channel_id) = channel_id
    {
      url.push_str(&format!(
        "/channels/{channel_id}"
      ));
    }
    url.push_str(resource.suffix());
    url
  }

  fn build(
    &self,
    resource: Resource,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat,
    query: Vec<(&'static str, String)>
  ) -> ApiRequest {
    let language = query
      .iter()
      .find(|(key, _)| *key == "language")
      .map(|(_, value)| value.clone())
      .unwrap_or_else(|| {
        self.language.clone()
      });
    ApiRequest {
      url: self.resource_url(
        resource, service_id, channel_id
      ),
      query,
      format,
      language
    }
  }

  /// The request a range fetch sends;
  /// `from`/`until` lead the query.
  pub fn range_request(
    &self,
    from: NaiveDate,
    until: NaiveDate,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat,
    parameters: &RequestParameters
  ) -> ApiRequest {
    let mut query = vec![
      ("from", format_date(from)),
      ("until", format_date(until)),
    ];
    query.extend(
      parameters.query().into_iter().filter(
        |(key, _)| {
          *key != "from" && *key != "until"
        }
      )
    );
    self.build(
      Resource::Range,
      service_id,
      channel_id,
      format,
      query
    )
  }

  pub fn status_request(
    &self,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat,
    parameters: &RequestParameters
  ) -> ApiRequest {
    self.build(
      Resource::Status,
      service_id,
      channel_id,
      format,
      parameters.query()
    )
  }

  pub fn date_request(
    &self,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat,
    parameters: &RequestParameters
  ) -> ApiRequest {
    self.build(
      Resource::Day,
      service_id,
      channel_id,
      format,
      parameters.query()
    )
  }

  pub fn week_request(
    &self,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat,
    parameters: &RequestParameters
  ) -> ApiRequest {
    self.build(
      Resource::Week,
      service_id,
      channel_id,
      format,
      parameters.query()
    )
  }

  pub fn month_request(
    &self,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat,
    parameters: &RequestParameters
  ) -> ApiRequest {
    self.build(
      Resource::Month,
      service_id,
      channel_id,
      format,
      parameters.query()
    )
  }

  pub fn year_request(
    &self,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat,
    parameters: &RequestParameters
  ) -> ApiRequest {
    self.build(
      Resource::Year,
      service_id,
      channel_id,
      format,
      parameters.query()
    )
  }

  pub fn channel_request(
    &self,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat
  ) -> ApiRequest {
    self.build(
      Resource::Channel,
      service_id,
      channel_id,
      format,
      Vec::new()
    )
  }

  async fn send(
    &self,
    request: ApiRequest
  ) -> Result<String, ApiError> {
    tracing::debug!(
      url = %request.url,
      format = request.format.as_key(),
      "requesting opening hours"
    );
    self.transport.get(&request).await
  }
}

impl<T: Transport> OpeningHoursClient
  for ApiClient<T>
{
  async fn fetch_status(
    &self,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat,
    parameters: &RequestParameters
  ) -> Result<String, ApiError> {
    self
      .send(self.status_request(
        service_id, channel_id, format,
        parameters
      ))
      .await
  }

  async fn fetch_opening_hours_for_date(
    &self,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat,
    parameters: &RequestParameters
  ) -> Result<String, ApiError> {
    self
      .send(self.date_request(
        service_id, channel_id, format,
        parameters
      ))
      .await
  }

  async fn fetch_opening_hours_for_week(
    &self,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat,
    parameters: &RequestParameters
  ) -> Result<String, ApiError> {
    self
      .send(self.week_request(
        service_id, channel_id, format,
        parameters
      ))
      .await
  }

  async fn fetch_opening_hours_for_month(
    &self,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat,
    parameters: &RequestParameters
  ) -> Result<String, ApiError> {
    self
      .send(self.month_request(
        service_id, channel_id, format,
        parameters
      ))
      .await
  }

  async fn fetch_opening_hours_for_year(
    &self,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat,
    parameters: &RequestParameters
  ) -> Result<String, ApiError> {
    self
      .send(self.year_request(
        service_id, channel_id, format,
        parameters
      ))
      .await
  }

  async fn fetch_opening_hours_by_range(
    &self,
    from: NaiveDate,
    until: NaiveDate,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat,
    parameters: &RequestParameters
  ) -> Result<String, ApiError> {
    self
      .send(self.range_request(
        from, until, service_id,
        channel_id, format, parameters
      ))
      .await
  }

  async fn fetch_channel(
    &self,
    service_id: u32,
    channel_id: Option<u32>,
    format: ResponseFormat
  ) -> Result<ChannelDto, ApiError> {
    let body = self
      .send(self.channel_request(
        service_id, channel_id, format
      ))
      .await?;
    Ok(serde_json::from_str(&body)?)
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use super::*;

  #[derive(Default)]
  struct RecordingTransport {
    seen:     RefCell<Vec<ApiRequest>>,
    response: String
  }

  impl Transport for RecordingTransport {
    async fn get(
      &self,
      request: &ApiRequest
    ) -> Result<String, ApiError> {
      self
        .seen
        .borrow_mut()
        .push(request.clone());
      Ok(self.response.clone())
    }
  }

  fn params() -> RequestParameters {
    RequestParameters::new(
      NaiveDate::from_ymd_opt(2026, 3, 2)
        .expect("valid date"),
      "nl"
    )
  }

  #[test]
  fn endpoint_gains_trailing_slash() {
    let client = ApiClient::new(
      "https://api.example/v1",
      "en",
      RecordingTransport::default()
    );
    assert_eq!(
      client.endpoint(),
      "https://api.example/v1/"
    );
  }

  #[test]
  fn resource_paths_follow_api_layout() {
    let client = ApiClient::new(
      "https://api.example/",
      "en",
      RecordingTransport::default()
    );
    let p = params();
    let fmt = ResponseFormat::Html;

    assert_eq!(
      client
        .status_request(5, Some(12), fmt, &p)
        .url,
      "https://api.example/services/5/channels/12/open-now"
    );
    assert_eq!(
      client
        .date_request(5, Some(12), fmt, &p)
        .url,
      "https://api.example/services/5/channels/12/openinghours/day"
    );
    assert_eq!(
      client
        .year_request(5, None, fmt, &p)
        .url,
      "https://api.example/services/5/openinghours/year"
    );
    assert_eq!(
      client
        .channel_request(
          5,
          Some(12),
          ResponseFormat::Json
        )
        .url,
      "https://api.example/services/5/channels/12"
    );
  }

  #[test]
  fn range_query_leads_with_bounds() {
    let client = ApiClient::new(
      "https://api.example/",
      "en",
      RecordingTransport::default()
    );
    let from =
      NaiveDate::from_ymd_opt(2026, 3, 2)
        .expect("valid date");
    let until =
      NaiveDate::from_ymd_opt(2026, 3, 8)
        .expect("valid date");
    let request = client.range_request(
      from,
      until,
      5,
      Some(12),
      ResponseFormat::Html,
      &params()
    );
    assert_eq!(
      request.url,
      "https://api.example/services/5/channels/12/openinghours"
    );
    assert_eq!(
      request.query,
      vec![
        ("from", "2026-03-02".to_string()),
        ("until", "2026-03-08".to_string()),
        ("date", "2026-03-02".to_string()),
        ("language", "nl".to_string()),
      ]
    );
    assert_eq!(request.language, "nl");
  }

  #[tokio::test(flavor = "current_thread")]
  async fn channel_lookup_decodes_label() {
    let client = ApiClient::new(
      "https://api.example/",
      "en",
      RecordingTransport {
        response: r#"{"id":12,"label":"Loket"}"#
          .to_string(),
        ..RecordingTransport::default()
      }
    );
    let channel = client
      .fetch_channel(
        5,
        Some(12),
        ResponseFormat::Json
      )
      .await
      .expect("channel decodes");
    assert_eq!(channel.label, "Loket");

    let seen =
      client.transport().seen.borrow();
    assert_eq!(
      seen[0].format,
      ResponseFormat::Json
    );
    assert!(seen[0].query.is_empty());
    assert_eq!(seen[0].language, "en");
  }

  #[tokio::test(flavor = "current_thread")]
  async fn html_channel_body_is_a_decode_error(
  ) {
    let client = ApiClient::new(
      "https://api.example/",
      "en",
      RecordingTransport {
        response: "<p>nope</p>".to_string(),
        ..RecordingTransport::default()
      }
    );
    let result = client
      .fetch_channel(
        5,
        None,
        ResponseFormat::Json
      )
      .await;
    assert!(matches!(
      result,
      Err(ApiError::Decode(_))
    ));
  }
}
