pub mod app_cfg;
pub mod cli;
pub mod client;
pub mod error;
pub mod forward_req;
pub mod models;
pub mod normalizer;
pub mod renderer;
pub mod req_handler;

pub use app_cfg::{AppCfg, RelayCfg, Variant};
pub use client::{PredictionClient, Surface};
pub use error::{ClientError, ParseError, TransportError};
pub use forward_req::{HttpTransport, Transport};
