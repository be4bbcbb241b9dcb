use eframe::egui;

use crate::state::SessionState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct IqrCleanerApp {
    pub state: SessionState,
}

impl Default for IqrCleanerApp {
    fn default() -> Self {
        Self {
            state: SessionState::default(),
        }
    }
}

impl eframe::App for IqrCleanerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: data entry and configuration ----
        egui::SidePanel::left("config_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: before/after histogram ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::histogram_panel(ui, &self.state);
        });
    }
}
