//! Option catalog loading for the compare page

use super::{deliver, App, CompareSession, OptionsPhase, Slot};
use crate::types::*;
use eframe::egui;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

impl CompareSession {
    pub(crate) fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            phase: OptionsPhase::Loading,
            options_slot: Slot::new(),
            predict_slot: Slot::new(),
            left: LaptopForm::default(),
            right: LaptopForm::default(),
            comparison: Comparison::default(),
            predicting: false,
            error: None,
        }
    }

    /// Store the catalog and seed both forms from it.
    pub(crate) fn apply_options(&mut self, options: OptionSet) {
        let choices: HashMap<SpecField, Vec<String>> = SpecField::ALL
            .iter()
            .map(|&field| (field, options.choices(field)))
            .collect();
        self.left = LaptopForm::seeded(&options, Side::Left);
        self.right = LaptopForm::seeded(&options, Side::Right);
        self.phase = OptionsPhase::Ready {
            options: Arc::new(options),
            choices,
        };
    }

    pub(crate) fn form_mut(&mut self, side: Side) -> &mut LaptopForm {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

impl App {
    pub(crate) fn start_compare_session(&mut self, ctx: &egui::Context) {
        let session = CompareSession::new();
        let token = session.token.clone();
        let slot = session.options_slot.clone();
        self.compare = Some(session);

        info!(base_url = %self.base_url(), "Loading options");

        let orchestrator = self.orchestrator.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let result = orchestrator.fetch_options(&token).await;
            deliver(&slot, &token, &ctx, result);
        });
    }

    /// Throw away the current compare session and start over.
    pub(crate) fn reload_compare(&mut self, ctx: &egui::Context) {
        if let Some(session) = self.compare.take() {
            session.token.cancel();
        }
        self.start_compare_session(ctx);
    }

    pub(crate) fn poll_options(&mut self) {
        let base_url = self.base_url().to_string();
        let Some(session) = self.compare.as_mut() else {
            return;
        };
        let Some(result) = session.options_slot.take() else {
            return;
        };

        match result {
            Ok(options) => session.apply_options(options),
            Err(e) => {
                warn!(error = %e, timeout = e.is_timeout(), "Options unavailable");
                session.phase = OptionsPhase::Failed(e.user_message(&base_url));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applying_options_seeds_both_forms() {
        let mut session = CompareSession::new();
        session.apply_options(OptionSet {
            companies: vec!["Dell".into(), "HP".into()],
            rams_gb: vec![8, 16],
            ..Default::default()
        });

        assert_eq!(session.left.company, "Dell");
        assert_eq!(session.left.ram, "8");
        assert_eq!(session.right.company, "HP");
        assert_eq!(session.right.ram, "16");
        assert_eq!(session.right.gpu, "");

        match &session.phase {
            OptionsPhase::Ready { choices, .. } => {
                assert_eq!(choices[&SpecField::Ram], vec!["8", "16"]);
                assert!(choices[&SpecField::Gpu].is_empty());
            }
            _ => panic!("options should be ready"),
        }
    }

    #[test]
    fn forms_are_edited_independently() {
        let mut session = CompareSession::new();
        session.form_mut(Side::Left).company = "Asus".into();
        assert_eq!(session.left.company, "Asus");
        assert_eq!(session.right.company, "");
    }
}
