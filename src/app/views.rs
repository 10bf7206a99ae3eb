//! Page rendering (navigation, home, compare, visualizations)

use super::{App, ChartState, CompareSession, OptionsPhase, Page};
use crate::constants::*;
use crate::theme;
use crate::types::*;
use crate::ui::components::{error_panel, loading_indicator, nav_tab, spec_combo};
use crate::utils::{format_eur, format_idr_from_eur};
use eframe::egui;
use std::collections::HashMap;
use tracing::warn;

// ============================================================================
// NAVIGATION
// ============================================================================

impl App {
    pub(crate) fn render_nav(&mut self, ctx: &egui::Context) {
        let mut target = None;
        egui::TopBottomPanel::top("nav")
            .exact_height(theme::NAV_HEIGHT)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_ELEVATED)
                    .inner_margin(egui::Margin::symmetric(16, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(APP_NAME.to_uppercase())
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_DIM),
                    );
                    ui.add_space(theme::SPACING_XL);
                    let tabs = [
                        (Page::Home, egui_phosphor::regular::HOUSE, "Home"),
                        (Page::Compare, egui_phosphor::regular::SCALES, "Compare"),
                        (Page::Visualizations, egui_phosphor::regular::CHART_BAR, "Visualizations"),
                    ];
                    for (page, icon, label) in tabs {
                        if nav_tab(ui, icon, label, self.page == page) {
                            target = Some(page);
                        }
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(self.base_url())
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_DIM),
                        );
                    });
                });
            });

        if let Some(page) = target {
            self.navigate(ctx, page);
        }
    }

    pub(crate) fn render_page(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let width = ui.available_width().min(theme::CONTENT_MAX_WIDTH);
                    let margin = ((ui.available_width() - width) / 2.0).max(0.0);
                    ui.horizontal(|ui| {
                        ui.add_space(margin);
                        ui.vertical(|ui| {
                            ui.set_width(width);
                            ui.add_space(theme::SPACING_XL * 2.0);
                            match self.page {
                                Page::Home => self.render_home(ui, ctx),
                                Page::Compare => self.render_compare(ui, ctx),
                                Page::Visualizations => self.render_visualizations(ui, ctx),
                            }
                            ui.add_space(theme::SPACING_XL * 2.0);
                        });
                    });
                });
        });
    }
}

// ============================================================================
// HOME
// ============================================================================

impl App {
    fn render_home(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let mut target = None;
        ui.vertical_centered(|ui| {
            ui.add_space(theme::SPACING_XL * 3.0);
            ui.label(
                egui::RichText::new("Laptop Price Prediction")
                    .size(theme::FONT_DISPLAY)
                    .strong()
                    .color(theme::TEXT_PRIMARY),
            );
            ui.add_space(theme::SPACING_MD);
            ui.label(
                egui::RichText::new(
                    "Pick two laptop configurations from the dataset and compare the prices \
                     estimated by a Linear Regression model.",
                )
                .size(theme::FONT_BODY)
                .color(theme::TEXT_MUTED),
            );
            ui.add_space(theme::SPACING_XL * 2.0);

            ui.horizontal(|ui| {
                let buttons_width = 2.0 * 180.0 + ui.spacing().item_spacing.x;
                ui.add_space(((ui.available_width() - buttons_width) / 2.0).max(0.0));
                if ui
                    .add_sized(
                        [180.0, theme::BUTTON_HEIGHT_LARGE],
                        theme::button_accent("Compare laptops"),
                    )
                    .clicked()
                {
                    target = Some(Page::Compare);
                }
                if ui
                    .add_sized(
                        [180.0, theme::BUTTON_HEIGHT_LARGE],
                        theme::button("View visualizations"),
                    )
                    .clicked()
                {
                    target = Some(Page::Visualizations);
                }
            });

            ui.add_space(theme::SPACING_XL * 2.0);
            let link = ui.add(
                egui::Label::new(
                    egui::RichText::new(format!(
                        "{}  Source repository",
                        egui_phosphor::regular::GITHUB_LOGO
                    ))
                    .color(theme::ACCENT),
                )
                .sense(egui::Sense::click()),
            );
            if link.on_hover_cursor(egui::CursorIcon::PointingHand).clicked() {
                if let Err(e) = open::that(SOURCE_REPO_URL) {
                    warn!(error = %e, "Failed to open repository link");
                }
            }
            ui.add_space(theme::SPACING_SM);
            ui.label(
                egui::RichText::new(format!("v{}", APP_VERSION))
                    .size(theme::FONT_SMALL)
                    .color(theme::TEXT_DIM),
            );
        });

        if let Some(page) = target {
            self.navigate(ctx, page);
        }
    }
}

// ============================================================================
// COMPARE
// ============================================================================

/// One laptop card: the eleven dropdowns and the predicted price.
fn render_side_card(
    ui: &mut egui::Ui,
    side: Side,
    form: &mut LaptopForm,
    choices: &HashMap<SpecField, Vec<String>>,
    comparison: &Comparison,
    enabled: bool,
) {
    theme::side_card_frame(side).show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(side.label())
                    .size(theme::FONT_TITLE)
                    .strong()
                    .color(theme::side_color(side)),
            );
            if comparison.cheaper() == Some(side) {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format!("{} Cheaper", egui_phosphor::regular::TAG))
                            .size(theme::FONT_SMALL)
                            .color(theme::STATUS_SUCCESS),
                    );
                });
            }
        });
        ui.add_space(theme::SPACING_MD);

        ui.add_enabled_ui(enabled, |ui| {
            for field in SpecField::ALL {
                let values = choices.get(&field).map(Vec::as_slice).unwrap_or(&[]);
                spec_combo(ui, (side, field), field.label(), form.get_mut(field), values);
            }
        });

        ui.add_space(theme::SPACING_LG);
        theme::section_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                egui::RichText::new("ESTIMATED PRICE")
                    .size(theme::FONT_SMALL)
                    .color(theme::TEXT_DIM),
            );
            let price = comparison.price(side);
            ui.label(
                egui::RichText::new(format_idr_from_eur(price))
                    .size(theme::FONT_TITLE + 4.0)
                    .strong()
                    .color(theme::TEXT_PRIMARY),
            );
            if price.is_some() {
                ui.label(
                    egui::RichText::new(format!("{} ({})", format_eur(price), REFERENCE_CURRENCY))
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_MUTED),
                );
            }
        });
    });
}

fn render_summary(ui: &mut egui::Ui, comparison: &Comparison) {
    let Some(diff) = comparison.difference() else {
        return;
    };
    theme::card_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new("PRICE DIFFERENCE")
                    .size(theme::FONT_SMALL)
                    .color(theme::TEXT_DIM),
            );
            ui.label(
                egui::RichText::new(format_idr_from_eur(Some(diff)))
                    .size(theme::FONT_DISPLAY)
                    .strong()
                    .color(theme::ACCENT),
            );
            let verdict = match comparison.cheaper() {
                Some(side) => format!("{} is cheaper", side.label()),
                None => "Both laptops are estimated at the same price".to_string(),
            };
            ui.label(
                egui::RichText::new(verdict)
                    .size(theme::FONT_BODY)
                    .color(theme::TEXT_SECONDARY),
            );
        });
    });
}

impl App {
    fn render_compare(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let mut reload = false;
        let mut submit = false;

        let Some(session) = self.compare.as_mut() else {
            return;
        };
        let CompareSession {
            phase,
            left,
            right,
            comparison,
            predicting,
            error,
            ..
        } = session;

        match phase {
            OptionsPhase::Loading => {
                ui.add_space(theme::SPACING_XL * 6.0);
                loading_indicator(ui, "Loading data from backend...");
            }
            OptionsPhase::Failed(message) => {
                ui.add_space(theme::SPACING_XL * 6.0);
                reload = error_panel(ui, "Failed to load data", message, "Reload");
            }
            OptionsPhase::Ready { options, choices } => {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new("Compare Laptop Models")
                            .size(theme::FONT_DISPLAY)
                            .strong()
                            .color(theme::TEXT_PRIMARY),
                    );
                    ui.label(
                        egui::RichText::new(
                            "Choose specifications from the dataset and get a machine learning price estimate",
                        )
                        .size(theme::FONT_BODY)
                        .color(theme::TEXT_MUTED),
                    );
                    ui.label(
                        egui::RichText::new(format!(
                            "{} brands · {} products in the catalog",
                            options.companies.len(),
                            options.products.len()
                        ))
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                    );
                });
                ui.add_space(theme::SPACING_XL * 2.0);

                let enabled = !*predicting;
                ui.columns(2, |cols| {
                    render_side_card(&mut cols[0], Side::Left, left, choices, comparison, enabled);
                    render_side_card(&mut cols[1], Side::Right, right, choices, comparison, enabled);
                });

                ui.add_space(theme::SPACING_XL);
                ui.vertical_centered(|ui| {
                    let label = if *predicting {
                        "Predicting...".to_string()
                    } else {
                        format!("{}  Predict & Compare", egui_phosphor::regular::LIGHTNING)
                    };
                    let button = ui.add_enabled(
                        enabled,
                        theme::button_accent(label).min_size(egui::vec2(220.0, theme::BUTTON_HEIGHT_LARGE)),
                    );
                    if button.clicked() {
                        submit = true;
                    }
                    if *predicting {
                        ui.add_space(theme::SPACING_SM);
                        ui.spinner();
                    }
                    if let Some(message) = error.as_deref() {
                        ui.add_space(theme::SPACING_MD);
                        ui.label(
                            egui::RichText::new(message)
                                .size(theme::FONT_LABEL)
                                .color(theme::STATUS_ERROR),
                        );
                    }
                });

                ui.add_space(theme::SPACING_XL);
                render_summary(ui, comparison);
            }
        }

        if reload {
            self.reload_compare(ctx);
        } else if submit {
            self.submit_prediction(ctx);
        }
    }
}

// ============================================================================
// VISUALIZATIONS
// ============================================================================

impl App {
    fn render_visualizations(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let mut retry = Vec::new();

        ui.label(
            egui::RichText::new("Data Visualizations")
                .size(theme::FONT_DISPLAY)
                .strong()
                .color(theme::TEXT_PRIMARY),
        );
        ui.label(
            egui::RichText::new("Explore insights from the laptop price dataset")
                .size(theme::FONT_BODY)
                .color(theme::TEXT_MUTED),
        );
        ui.add_space(theme::SPACING_XL);

        let Some(session) = self.chart_session.as_ref() else {
            return;
        };

        for &(name, title, description) in CHARTS {
            theme::card_frame().show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    egui::RichText::new(title)
                        .size(theme::FONT_TITLE)
                        .strong()
                        .color(theme::TEXT_PRIMARY),
                );
                ui.label(
                    egui::RichText::new(description)
                        .size(theme::FONT_LABEL)
                        .color(theme::TEXT_MUTED),
                );
                ui.add_space(theme::SPACING_MD);

                match session.charts.get(name) {
                    Some(ChartState::Ready(texture)) => {
                        let [w, h] = texture.size();
                        let width = ui.available_width();
                        let height = width * h as f32 / w.max(1) as f32;
                        ui.image(egui::load::SizedTexture::new(
                            texture.id(),
                            egui::vec2(width, height),
                        ));
                    }
                    Some(ChartState::Failed(message)) => {
                        ui.add_space(theme::SPACING_XL);
                        if error_panel(ui, "", message, "Retry") {
                            retry.push(name);
                        }
                        ui.add_space(theme::SPACING_XL);
                    }
                    Some(ChartState::Loading) | None => {
                        ui.allocate_ui(egui::vec2(ui.available_width(), theme::CHART_MIN_HEIGHT), |ui| {
                            ui.add_space(theme::CHART_MIN_HEIGHT / 2.0 - 30.0);
                            loading_indicator(ui, "Loading visualization...");
                        });
                    }
                }
            });
            ui.add_space(theme::SPACING_LG);
        }

        ui.add_space(theme::SPACING_MD);
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new("Charts are rendered by the backend with Matplotlib and Seaborn")
                    .size(theme::FONT_SMALL)
                    .color(theme::TEXT_DIM),
            );
        });

        for name in retry {
            self.load_chart(ctx, name);
        }
    }
}
