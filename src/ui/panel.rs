//! egui sidebar driving a [`MapSession`]

use crate::{
    engine::MapEngine,
    session::MapSession,
    tools::mode::ToolMode,
    ui::notice::{Notice, NoticeLevel},
    Result,
};
use egui::{Color32, Key, RichText, Ui};

/// Base map, overlay, tool and search controls plus the info popup and
/// pending notices
#[derive(Debug, Default)]
pub struct ControlPanel {
    search_text: String,
    pending: Vec<Notice>,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show<E: MapEngine>(&mut self, ui: &mut Ui, session: &mut MapSession<E>) -> Result<()> {
        self.pending.extend(session.take_notices());

        ui.heading("Base Map");
        let mut selected = session
            .registry()
            .visible_base_layer()
            .map(|l| l.id.clone())
            .unwrap_or_default();
        let base_layers: Vec<(String, String)> = session
            .registry()
            .base_layers()
            .iter()
            .map(|l| (l.id.clone(), l.title.clone()))
            .collect();
        for (id, title) in base_layers {
            if ui.radio_value(&mut selected, id.clone(), title).changed() {
                session.select_base_layer(&id)?;
            }
        }
        if let Some(attribution) = session.attribution() {
            ui.small(attribution);
        }

        ui.separator();
        ui.heading("Overlays");
        let overlays: Vec<(String, String, bool)> = session
            .registry()
            .overlays()
            .iter()
            .map(|o| (o.id.clone(), o.title.clone(), o.is_visible()))
            .collect();
        for (id, title, mut visible) in overlays {
            if ui.checkbox(&mut visible, title).changed() {
                session.set_overlay_visible(&id, visible)?;
            }
        }

        ui.separator();
        mode_selector(ui, session, "Measure", &ToolMode::MEASUREMENT);
        mode_selector(ui, session, "Feature Info", &ToolMode::INFO);

        ui.separator();
        ui.heading("Search");
        let response = ui.text_edit_singleline(&mut self.search_text);
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
        if ui.button("Search").clicked() || submitted {
            session.search(&self.search_text);
            self.pending.extend(session.take_notices());
        }

        self.popup(ui, session);
        self.notices(ui);
        Ok(())
    }

    fn popup<E: MapEngine>(&mut self, ui: &mut Ui, session: &mut MapSession<E>) {
        if !session.popup().is_open() {
            return;
        }

        let lines = session.popup().content();
        let mut close = false;
        ui.separator();
        ui.group(|ui| {
            for (i, line) in lines.iter().enumerate() {
                if i == 0 {
                    ui.label(RichText::new(line).strong());
                } else {
                    ui.label(line.as_str());
                }
            }
            close = ui.button("Close").clicked();
        });
        if close {
            session.close_popup();
        }
    }

    /// Shows the oldest notice until acknowledged
    fn notices(&mut self, ui: &mut Ui) {
        let Some(notice) = self.pending.first() else {
            return;
        };

        let color = match notice.level {
            NoticeLevel::Info => ui.visuals().text_color(),
            NoticeLevel::Warning => Color32::from_rgb(200, 120, 0),
        };
        ui.separator();
        ui.label(RichText::new(&notice.message).color(color));
        if ui.button("OK").clicked() {
            self.pending.remove(0);
        }
    }
}

/// Combo box over `modes`; shows "None" while a mode of the other selector
/// is active
fn mode_selector<E: MapEngine>(
    ui: &mut Ui,
    session: &mut MapSession<E>,
    label: &str,
    modes: &[ToolMode],
) {
    let current = session.mode();
    let shown = if modes.contains(&current) {
        current
    } else {
        ToolMode::Inactive
    };

    let mut choice = shown;
    egui::ComboBox::from_label(label)
        .selected_text(shown.label())
        .show_ui(ui, |ui| {
            for mode in modes {
                ui.selectable_value(&mut choice, *mode, mode.label());
            }
        });

    if choice != shown {
        session.set_mode(choice);
    }
}
