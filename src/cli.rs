use std::io::Read;

use clap::{Args, Parser, Subcommand};

use crate::app_cfg::{AppCfg, RelayCfg, Variant};
use crate::client::Surface;

#[derive(Parser, Debug)]
#[command(
    name = "prediction-client",
    version,
    about = "Submit inputs to an inference endpoint and render the predictions as an HTML table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one submission and print the rendered table
    Predict(PredictArgs),

    /// Run the relay between clients and the model endpoint
    Relay(RelayArgs),
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Inference endpoint receiving the POST
    #[arg(long, env = "PREDICTION_API_URL")]
    pub api_url: String,

    /// `numeric` (comma-separated numbers) or `text` (one instance per line)
    #[arg(long, env = "PREDICTION_MODE", default_value = "numeric")]
    pub mode: Variant,

    /// Input text; read from stdin when omitted
    #[arg(long)]
    pub input: Option<String>,
}

impl From<&PredictArgs> for AppCfg {
    fn from(a: &PredictArgs) -> Self {
        AppCfg {
            api_url: a.api_url.clone(),
            variant: a.mode,
        }
    }
}

#[derive(Args, Debug)]
pub struct RelayArgs {
    /// Model endpoint the relay forwards to
    #[arg(long, env = "RELAY_UPSTREAM_URL")]
    pub upstream_url: String,

    #[arg(long, env = "PREDICTION_MODE", default_value = "text")]
    pub mode: Variant,

    #[arg(long, env = "RELAY_BIND_ADDR", default_value = "127.0.0.1:8080")]
    pub bind: String,

    #[arg(long, env = "RELAY_WORKERS", default_value_t = 2)]
    pub workers: usize,
}

impl From<RelayArgs> for RelayCfg {
    fn from(a: RelayArgs) -> Self {
        RelayCfg {
            upstream_url: a.upstream_url,
            variant: a.mode,
            bind_addr: a.bind,
            workers: a.workers,
        }
    }
}

/// Terminal stand-in for the page: the input comes from a flag or stdin and
/// the rendered fragment goes to stdout.
pub struct ConsoleSurface {
    input: String,
    output: Option<String>,
}

impl ConsoleSurface {
    pub fn new(input: Option<String>) -> std::io::Result<Self> {
        let input = match input {
            Some(input) => input,
            None => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };
        Ok(Self { input, output: None })
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }
}

impl Surface for ConsoleSurface {
    fn input_text(&self) -> String {
        self.input.clone()
    }

    fn set_trigger_enabled(&mut self, enabled: bool) {
        log::debug!("Trigger enabled: {enabled}");
    }

    fn set_trigger_label(&mut self, label: &str) {
        log::debug!("Trigger label: {label}");
    }

    fn set_output(&mut self, html: &str) {
        self.output = Some(html.to_string());
    }
}
