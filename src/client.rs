use crate::app_cfg::AppCfg;
use crate::error::ClientError;
use crate::forward_req::Transport;

pub const DEFAULT_TRIGGER_LABEL: &str = "Submit to API";
pub const LOADING_TRIGGER_LABEL: &str = "Loading...";

/// What the client needs from whatever hosts it: an input field, a trigger
/// control that can be disabled and relabelled, and an output area.
pub trait Surface {
    fn input_text(&self) -> String;
    fn set_trigger_enabled(&mut self, enabled: bool);
    fn set_trigger_label(&mut self, label: &str);
    fn set_output(&mut self, html: &str);
}

/// Normalize, submit, render. Holds no state between activations.
///
/// Disabling the trigger is the only guard against a second activation while
/// one is in flight; nothing queues or rejects overlapping submissions.
pub struct PredictionClient<T: Transport> {
    cfg: AppCfg,
    transport: T,
}

impl<T: Transport> PredictionClient<T> {
    pub fn new(cfg: AppCfg, transport: T) -> Self {
        Self { cfg, transport }
    }

    /// Handle one user activation. Errors are shown on the surface before
    /// being returned, and the trigger is restored on every path.
    pub async fn on_activate<S: Surface>(&self, surface: &mut S) -> Result<(), ClientError> {
        surface.set_trigger_enabled(false);
        surface.set_trigger_label(LOADING_TRIGGER_LABEL);

        let res = self.submit(surface).await;
        if let Err(err) = &res {
            log::error!("Prediction failed: {err}");
            surface.set_output(&format!(
                "<p>Error: {}</p>",
                crate::renderer::escape_html(&err.to_string())
            ));
        }

        surface.set_trigger_enabled(true);
        surface.set_trigger_label(DEFAULT_TRIGGER_LABEL);
        res
    }

    async fn submit<S: Surface>(&self, surface: &mut S) -> Result<(), ClientError> {
        let raw = surface.input_text();
        let payload = self.cfg.variant.normalize(raw.trim())?;
        log::debug!("Submitting {payload:?}");

        let response = self.transport.submit(&self.cfg.api_url, &payload).await?;
        surface.set_output(&self.cfg.variant.render(&response));
        Ok(())
    }
}
