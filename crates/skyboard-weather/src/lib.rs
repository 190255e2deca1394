//! Weather data for Skyboard
//!
//! Current conditions from OpenWeatherMap with a single-slot local cache,
//! historical and forecast blobs from a static file host, and a synthetic
//! trend generator used until real history is available.

pub mod cache;
pub mod dashboard;
pub mod dataset;
pub mod history;
mod http;
pub mod provider;
pub mod static_data;
pub mod storage;
pub mod types;
pub mod view;

pub use cache::WeatherCache;
pub use dashboard::Dashboard;
pub use dataset::{sample_cities, select_city, DEFAULT_CITIES};
pub use provider::WeatherProvider;
pub use static_data::StaticDataClient;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use types::*;
