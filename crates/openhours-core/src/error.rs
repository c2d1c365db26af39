/// Validation failures local to one
/// widget item.
#[derive(
  thiserror::Error,
  Debug,
  Clone,
  PartialEq,
  Eq,
)]
pub enum ItemError {
  #[error("Please provide a widget type.")]
  MissingViewType,
  #[error("Please provide a service id.")]
  InvalidServiceId,
  #[error("Please provide a channel id.")]
  InvalidChannelId
}

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
  #[error(
    "OpeningHours : Please provide an API endpoint."
  )]
  MissingEndpoint
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
  #[error("request to {url} failed: {message}")]
  Transport { url: String, message: String },
  #[error("request to {url} returned HTTP {status}")]
  Status { url: String, status: u16 },
  #[error("failed decoding API response: {0}")]
  Decode(#[from] serde_json::Error)
}
