//! Reusable UI components
//!
//! Standalone widgets shared by the home, compare and visualization pages.

use crate::theme;
use eframe::egui;

/// Labeled dropdown bound to one form field. Returns true if the value changed.
pub fn spec_combo(
    ui: &mut egui::Ui,
    id_salt: impl std::hash::Hash,
    label: &str,
    value: &mut String,
    choices: &[String],
) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.add_sized(
            [theme::FIELD_LABEL_WIDTH, 20.0],
            egui::Label::new(
                egui::RichText::new(label)
                    .size(theme::FONT_LABEL)
                    .color(theme::TEXT_MUTED),
            ),
        );
        let selected = if value.is_empty() { "-" } else { value.as_str() };
        egui::ComboBox::from_id_salt(id_salt)
            .selected_text(selected.to_string())
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                if choices.is_empty() {
                    ui.label(egui::RichText::new("No options").color(theme::TEXT_DIM));
                }
                for choice in choices {
                    if ui
                        .selectable_label(*value == *choice, choice.as_str())
                        .clicked()
                        && *value != *choice
                    {
                        *value = choice.clone();
                        changed = true;
                    }
                }
            });
    });
    changed
}

/// Centered spinner with a caption
pub fn loading_indicator(ui: &mut egui::Ui, caption: &str) {
    ui.vertical_centered(|ui| {
        ui.add(egui::Spinner::new().size(32.0).color(theme::ACCENT));
        ui.add_space(theme::SPACING_MD);
        ui.label(
            egui::RichText::new(caption)
                .size(theme::FONT_LABEL)
                .color(theme::TEXT_MUTED),
        );
    });
}

/// Warning block with a single action button. Returns true if the action was clicked.
pub fn error_panel(ui: &mut egui::Ui, title: &str, message: &str, action: &str) -> bool {
    let mut clicked = false;
    ui.vertical_centered(|ui| {
        ui.label(
            egui::RichText::new(egui_phosphor::regular::WARNING)
                .size(40.0)
                .color(theme::STATUS_ERROR),
        );
        ui.add_space(theme::SPACING_MD);
        if !title.is_empty() {
            ui.label(
                egui::RichText::new(title)
                    .size(theme::FONT_TITLE)
                    .strong()
                    .color(theme::TEXT_PRIMARY),
            );
        }
        ui.label(
            egui::RichText::new(message)
                .size(theme::FONT_LABEL)
                .color(theme::TEXT_MUTED),
        );
        ui.add_space(theme::SPACING_LG);
        clicked = ui.add(theme::button_accent(action)).clicked();
    });
    clicked
}

/// Top navigation tab. Returns true if clicked.
pub fn nav_tab(ui: &mut egui::Ui, icon: &str, label: &str, active: bool) -> bool {
    let color = if active { theme::ACCENT } else { theme::TEXT_MUTED };
    let text = egui::RichText::new(format!("{}  {}", icon, label))
        .size(theme::FONT_BODY)
        .color(color);
    ui.add(egui::Button::new(text).frame(false)).clicked()
}
