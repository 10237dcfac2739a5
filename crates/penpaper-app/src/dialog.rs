//! Modal prompt dialog drawn with egui over the paper.

use egui::{Align2, Color32, Context, CornerRadius, Frame, Margin, Pos2, RichText, Stroke, Vec2};
use penpaper_core::Prompt;
use std::sync::mpsc::Sender;

const DIALOG_WIDTH: f32 = 360.0;
const STEP_BUTTON_SIZE: f32 = 30.0;

/// A prompt waiting on its window, with the caller blocked on `reply`.
pub(crate) struct PendingPrompt {
    prompt: Prompt,
    /// Content of the egui text field.
    buffer: String,
    focused: bool,
    reply: Sender<Prompt>,
}

impl PendingPrompt {
    pub fn new(prompt: Prompt, reply: Sender<Prompt>) -> Self {
        log::debug!("Showing {} prompt \"{}\"", prompt.kind(), prompt.title());
        Self {
            buffer: prompt.text().to_string(),
            prompt,
            focused: false,
            reply,
        }
    }

    /// Hand the confirmed prompt back to the waiting caller.
    pub fn finish(self) {
        log::debug!("Prompt \"{}\" confirmed with {:?}", self.prompt.title(), self.prompt.text());
        if self.reply.send(self.prompt).is_err() {
            log::warn!("Prompt confirmed after its caller went away");
        }
    }

    fn step(&mut self, up: bool) {
        if up {
            self.prompt.increment();
        } else {
            self.prompt.decrement();
        }
        self.buffer = self.prompt.text().to_string();
    }

    /// Feed the edited field through the prompt, restoring the last valid
    /// text when the edit is rejected.
    fn sync_buffer(&mut self) {
        if self.buffer != self.prompt.text() && !self.prompt.edit(self.buffer.clone()) {
            self.buffer = self.prompt.text().to_string();
        }
    }
}

fn step_btn(ui: &mut egui::Ui, label: &str) -> bool {
    ui.add(
        egui::Button::new(RichText::new(label).size(14.0).color(Color32::from_gray(30)))
            .fill(Color32::from_gray(235))
            .corner_radius(CornerRadius::same(6))
            .min_size(Vec2::splat(STEP_BUTTON_SIZE)),
    )
    .clicked()
}

fn send_btn(ui: &mut egui::Ui) -> bool {
    ui.add(
        egui::Button::new(RichText::new("Send").size(13.0).color(Color32::WHITE))
            .fill(Color32::from_rgb(59, 130, 246))
            .corner_radius(CornerRadius::same(6))
            .min_size(Vec2::new(DIALOG_WIDTH, STEP_BUTTON_SIZE)),
    )
    .clicked()
}

/// Draw the dialog for `pending`; returns `true` once the user confirmed it.
pub(crate) fn show_prompt(ctx: &Context, pending: &mut PendingPrompt) -> bool {
    let mut confirmed = false;

    // Backdrop swallowing clicks on the paper
    egui::Area::new(egui::Id::new("prompt_backdrop"))
        .fixed_pos(Pos2::ZERO)
        .order(egui::Order::Background)
        .show(ctx, |ui| {
            let screen_rect = ctx.input(|i| i.content_rect());
            ui.allocate_rect(screen_rect, egui::Sense::click());
            ui.painter().rect_filled(screen_rect, 0.0, Color32::from_black_alpha(80));
        });

    egui::Area::new(egui::Id::new("prompt_dialog"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            Frame::new()
                .fill(Color32::WHITE)
                .corner_radius(CornerRadius::same(12))
                .stroke(Stroke::new(1.0, Color32::from_gray(200)))
                .inner_margin(Margin::same(20))
                .show(ui, |ui| {
                    ui.set_width(DIALOG_WIDTH);
                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new(pending.prompt.title())
                                .size(16.0)
                                .strong()
                                .color(Color32::from_gray(30)),
                        );
                        ui.add_space(8.0);
                        ui.label(
                            RichText::new(pending.prompt.message())
                                .size(12.0)
                                .color(Color32::from_gray(60)),
                        );
                        ui.add_space(12.0);

                        let numeric = pending.prompt.kind().is_numeric();
                        ui.horizontal(|ui| {
                            if numeric && step_btn(ui, "-") {
                                pending.step(false);
                            }
                            let field_width = if numeric {
                                DIALOG_WIDTH - 2.0 * (STEP_BUTTON_SIZE + ui.spacing().item_spacing.x)
                            } else {
                                DIALOG_WIDTH
                            };
                            let response = ui.add(
                                egui::TextEdit::singleline(&mut pending.buffer)
                                    .desired_width(field_width),
                            );
                            if !pending.focused {
                                response.request_focus();
                                pending.focused = true;
                            }
                            if response.changed() {
                                pending.sync_buffer();
                            }
                            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                                confirmed = true;
                            }
                            if numeric && step_btn(ui, "+") {
                                pending.step(true);
                            }
                        });

                        ui.add_space(12.0);
                        if send_btn(ui) {
                            confirmed = true;
                        }
                    });
                });
        });

    confirmed
}
