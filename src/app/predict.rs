//! Prediction submission for the compare page

use super::{deliver, App, CompareSession, OptionsPhase};
use crate::error::FetchError;
use crate::validation::validate_form;
use eframe::egui;
use tracing::{info, warn};

impl CompareSession {
    /// Check both forms and reset the result area. Returns false if nothing should be sent.
    pub(crate) fn begin_prediction(&mut self) -> bool {
        if self.predicting || !matches!(self.phase, OptionsPhase::Ready { .. }) {
            return false;
        }
        if let Err(rule) = validate_form(&self.left).and_then(|_| validate_form(&self.right)) {
            warn!(error = %rule, "Form rejected");
            self.error = Some(rule.to_string());
            return false;
        }
        self.predicting = true;
        self.error = None;
        self.comparison.clear();
        true
    }

    pub(crate) fn finish_prediction(
        &mut self,
        result: Result<crate::types::PricePair, FetchError>,
        base_url: &str,
    ) {
        self.predicting = false;
        match result {
            Ok(pair) => {
                info!(left = pair.left, right = pair.right, "Comparison ready");
                self.comparison.set(pair);
            }
            Err(e) => {
                self.comparison.clear();
                self.error = Some(e.user_message(base_url));
            }
        }
    }
}

impl App {
    pub(crate) fn submit_prediction(&mut self, ctx: &egui::Context) {
        let Some(session) = self.compare.as_mut() else {
            return;
        };
        if !session.begin_prediction() {
            return;
        }

        let left = session.left.clone();
        let right = session.right.clone();
        let token = session.token.clone();
        let slot = session.predict_slot.clone();
        let orchestrator = self.orchestrator.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let result = orchestrator.predict_pair(&left, &right, &token).await;
            deliver(&slot, &token, &ctx, result);
        });
    }

    pub(crate) fn poll_prediction(&mut self) {
        let base_url = self.base_url().to_string();
        let Some(session) = self.compare.as_mut() else {
            return;
        };
        if let Some(result) = session.predict_slot.take() {
            session.finish_prediction(result, &base_url);
        }
    }
}
