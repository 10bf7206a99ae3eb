//! Chart image loading for the visualizations page

use super::{deliver, App, ChartSession, ChartState, Slot};
use crate::constants::*;
use crate::utils::cache_bust_token;
use eframe::egui;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

fn decode_texture(ctx: &egui::Context, name: &str, bytes: &[u8]) -> Result<egui::TextureHandle, String> {
    let img = image::load_from_memory(bytes).map_err(|e| e.to_string())?;
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let pixels = rgba.into_raw();
    Ok(ctx.load_texture(
        format!("chart_{}", name),
        egui::ColorImage::from_rgba_unmultiplied(size, &pixels),
        egui::TextureOptions::LINEAR,
    ))
}

impl App {
    pub(crate) fn start_chart_session(&mut self, ctx: &egui::Context) {
        let session = ChartSession {
            token: CancellationToken::new(),
            cache_bust: cache_bust_token(),
            charts: HashMap::new(),
            downloads: HashMap::new(),
        };
        self.chart_session = Some(session);

        debug!(count = CHARTS.len(), "Loading charts");
        for &(name, _, _) in CHARTS {
            self.load_chart(ctx, name);
        }
    }

    /// Fetch one chart. Also used by the per-chart Retry button.
    pub(crate) fn load_chart(&mut self, ctx: &egui::Context, name: &'static str) {
        let Some(session) = self.chart_session.as_mut() else {
            return;
        };

        let slot = Slot::new();
        session.charts.insert(name, ChartState::Loading);
        session.downloads.insert(name, slot.clone());

        let backend = self.backend.clone();
        let token = session.token.clone();
        let cache_bust = session.cache_bust;
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let fetch = tokio::time::timeout(CHART_TIMEOUT, backend.chart(name, Some(cache_bust)));
            let result = tokio::select! {
                _ = token.cancelled() => return,
                res = fetch => match res {
                    Ok(Ok(bytes)) => Ok(bytes),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(_) => Err("Timed out".to_string()),
                },
            };
            deliver(&slot, &token, &ctx, result);
        });
    }

    pub(crate) fn poll_charts(&mut self, ctx: &egui::Context) {
        let Some(session) = self.chart_session.as_mut() else {
            return;
        };

        let finished: Vec<(&'static str, Result<Vec<u8>, String>)> = session
            .downloads
            .iter()
            .filter_map(|(name, slot)| slot.take().map(|res| (*name, res)))
            .collect();

        for (name, result) in finished {
            session.downloads.remove(name);
            let state = match result.and_then(|bytes| decode_texture(ctx, name, &bytes)) {
                Ok(texture) => ChartState::Ready(texture),
                Err(e) => {
                    warn!(chart = name, error = %e, "Chart failed to load");
                    ChartState::Failed("Failed to load visualization".to_string())
                }
            };
            session.charts.insert(name, state);
        }
    }
}
