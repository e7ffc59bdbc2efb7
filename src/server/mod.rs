mod config;
mod http_layers;
mod recommend_routes;
mod server;
mod state;

pub use config::ServerConfig;
pub use http_layers::{log_requests, RequestsLoggingLevel};
pub(self) use recommend_routes::make_recommend_routes;
pub use server::{make_app, run_server};
pub use state::{ServerState, SharedCatalog, SharedRecommender};
