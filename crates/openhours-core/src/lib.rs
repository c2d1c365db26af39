pub mod client;
pub mod config;
pub mod cursor;
pub mod date;
pub mod element;
pub mod engine;
pub mod error;
pub mod headless;
pub mod item;
pub mod navigator;
pub mod options;
pub mod period;
pub mod planner;
pub mod view;

pub use client::{
  ApiClient,
  ApiRequest,
  OpeningHoursClient,
  RequestParameters,
  Transport
};
pub use config::Settings;
pub use engine::{
  RenderOutcome,
  WidgetEngine
};
pub use error::{
  ApiError,
  EngineError,
  ItemError
};
pub use item::{
  ItemHandle,
  WidgetItem
};
pub use options::GlobalOptions;
pub use view::ViewType;
