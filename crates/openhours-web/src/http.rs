use gloo::net::http::Request;
use openhours_core::{
  ApiError,
  ApiRequest,
  Transport
};

/// `fetch`-backed transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

impl Transport for GlooTransport {
  async fn get(
    &self,
    request: &ApiRequest
  ) -> Result<String, ApiError> {
    let transport_error =
      |err: gloo::net::Error| {
        ApiError::Transport {
          url:     request.url.clone(),
          message: err.to_string()
        }
      };

    let response = Request::get(&request.url)
      .query(
        request
          .query
          .iter()
          .map(|(key, value)| (*key, value))
      )
      .header(
        "Accept",
        request.format.accept_header()
      )
      .header(
        "Accept-Language",
        &request.language
      )
      .send()
      .await
      .map_err(transport_error)?;

    if !response.ok() {
      return Err(ApiError::Status {
        url:    request.url.clone(),
        status: response.status()
      });
    }

    response
      .text()
      .await
      .map_err(transport_error)
  }
}
