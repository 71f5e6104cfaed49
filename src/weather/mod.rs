pub mod handlers;
pub mod key;
pub mod location;
pub mod models;
pub mod normalize;
pub mod service;
pub mod upstream;

pub use service::WeatherService;
pub use upstream::{OpenWeatherClient, WeatherUpstream};
