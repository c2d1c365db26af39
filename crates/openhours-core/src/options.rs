use std::fmt;
use std::rc::Rc;

use chrono::NaiveDate;

use crate::config::Settings;
use crate::date::resolve_date_expr;

/// Invoked with the element of a widget
/// that failed; typically removes its
/// wrapper from the page.
pub type ErrorHook<E> = Rc<dyn Fn(&E)>;

/// Options shared read-only by every item
/// of one engine batch.
pub struct GlobalOptions<E> {
  pub endpoint:        String,
  pub language:        String,
  /// `oh_day` override applied to every
  /// item of the batch.
  pub request_date:    Option<NaiveDate>,
  pub today:           NaiveDate,
  pub require_channel: bool,
  pub error:           Option<ErrorHook<E>>
}

impl<E> GlobalOptions<E> {
  pub fn new(
    endpoint: impl Into<String>,
    today: NaiveDate
  ) -> Self {
    Self {
      endpoint: endpoint.into(),
      language: crate::config::DEFAULT_LANGUAGE
        .to_string(),
      request_date: None,
      today,
      require_channel: true,
      error: None
    }
  }

  /// Merges sanitized settings with the
  /// raw `oh_day` query value.
  pub fn from_settings(
    settings: &Settings,
    request_date: Option<&str>,
    today: NaiveDate
  ) -> Self {
    let request_date = request_date
      .map(str::trim)
      .filter(|raw| !raw.is_empty())
      .map(|raw| {
        resolve_date_expr(raw, today)
      });

    Self {
      endpoint: settings.endpoint.clone(),
      language: settings.language.clone(),
      request_date,
      today,
      require_channel: settings
        .require_channel,
      error: None
    }
  }

  pub fn with_language(
    mut self,
    language: impl Into<String>
  ) -> Self {
    self.language = language.into();
    self
  }

  pub fn with_request_date(
    mut self,
    date: Option<NaiveDate>
  ) -> Self {
    self.request_date = date;
    self
  }

  pub fn with_require_channel(
    mut self,
    required: bool
  ) -> Self {
    self.require_channel = required;
    self
  }

  pub fn with_error_hook(
    mut self,
    hook: impl Fn(&E) + 'static
  ) -> Self {
    self.error = Some(Rc::new(hook));
    self
  }

  pub fn has_endpoint(&self) -> bool {
    !self.endpoint.trim().is_empty()
  }
}

impl<E> Clone for GlobalOptions<E> {
  fn clone(&self) -> Self {
    Self {
      endpoint:        self
        .endpoint
        .clone(),
      language:        self
        .language
        .clone(),
      request_date:    self.request_date,
      today:           self.today,
      require_channel: self
        .require_channel,
      error:           self.error.clone()
    }
  }
}

impl<E> fmt::Debug for GlobalOptions<E> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.debug_struct("GlobalOptions")
      .field("endpoint", &self.endpoint)
      .field("language", &self.language)
      .field(
        "request_date",
        &self.request_date
      )
      .field("today", &self.today)
      .field(
        "require_channel",
        &self.require_channel
      )
      .field(
        "error",
        &self.error.is_some()
      )
      .finish()
  }
}
