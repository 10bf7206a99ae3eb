//! App module - contains the main application state and logic

mod charts;
mod options;
mod predict;
mod views;

use crate::api::HttpBackend;
use crate::orchestrator::Orchestrator;
use crate::settings::Settings;
use crate::theme;
use crate::types::*;
use eframe::egui;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::debug;

// ============================================================================
// SHARED RESULT SLOT
// ============================================================================

/// One-shot result handed from a background task to the UI thread.
pub(crate) struct Slot<T>(Arc<Mutex<Option<T>>>);

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Slot<T> {
    pub(crate) fn new() -> Self {
        Self(Arc::new(Mutex::new(None)))
    }

    pub(crate) fn fill(&self, value: T) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
    }

    pub(crate) fn take(&self) -> Option<T> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

/// Deliver `value` unless the session that started the task has been torn down.
pub(crate) fn deliver<T>(slot: &Slot<T>, token: &CancellationToken, ctx: &egui::Context, value: T) {
    if token.is_cancelled() {
        debug!("Discarding result of a closed page");
        return;
    }
    slot.fill(value);
    ctx.request_repaint();
}

// ============================================================================
// PAGE STATE
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Page {
    Home,
    Compare,
    Visualizations,
}

pub(crate) enum OptionsPhase {
    Loading,
    Ready {
        options: Arc<OptionSet>,
        choices: HashMap<SpecField, Vec<String>>,
    },
    Failed(String),
}

/// Everything owned by one visit of the compare page. Dropped on navigation.
pub(crate) struct CompareSession {
    pub(crate) token: CancellationToken,
    pub(crate) phase: OptionsPhase,
    pub(crate) options_slot: Slot<Result<OptionSet, crate::error::FetchError>>,
    pub(crate) predict_slot: Slot<Result<PricePair, crate::error::FetchError>>,
    pub(crate) left: LaptopForm,
    pub(crate) right: LaptopForm,
    pub(crate) comparison: Comparison,
    pub(crate) predicting: bool,
    pub(crate) error: Option<String>,
}

pub(crate) enum ChartState {
    Loading,
    Ready(egui::TextureHandle),
    Failed(String),
}

/// Everything owned by one visit of the visualizations page.
pub(crate) struct ChartSession {
    pub(crate) token: CancellationToken,
    pub(crate) cache_bust: i64,
    pub(crate) charts: HashMap<&'static str, ChartState>,
    pub(crate) downloads: HashMap<&'static str, Slot<Result<Vec<u8>, String>>>,
}

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) backend: HttpBackend,
    pub(crate) orchestrator: Orchestrator,
    pub(crate) page: Page,
    pub(crate) compare: Option<CompareSession>,
    pub(crate) chart_session: Option<ChartSession>,
    // Settings
    pub(crate) settings: Settings,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        data_dir: PathBuf,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let backend = HttpBackend::new(settings.api_base_url());
        let orchestrator = Orchestrator::new(Arc::new(backend.clone()));

        Self {
            runtime,
            backend,
            orchestrator,
            page: Page::Home,
            compare: None,
            chart_session: None,
            settings,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        }
    }

    pub fn base_url(&self) -> &str {
        self.backend.base_url()
    }

    /// Switch pages, tearing down the session of the page being left.
    pub fn navigate(&mut self, ctx: &egui::Context, page: Page) {
        if page == self.page {
            return;
        }
        debug!(from = ?self.page, to = ?page, "Navigating");

        if let Some(session) = self.compare.take() {
            session.token.cancel();
        }
        if let Some(session) = self.chart_session.take() {
            session.token.cancel();
        }

        self.page = page;
        match page {
            Page::Home => {}
            Page::Compare => self.start_compare_session(ctx),
            Page::Visualizations => self.start_chart_session(ctx),
        }
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            ..self.settings.clone()
        };
        settings.save(&self.data_dir);
    }
}
