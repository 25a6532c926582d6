pub mod service;

pub use service::{AudioService, AudioServiceApi, AudioSummary};
