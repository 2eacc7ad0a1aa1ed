//! egui panels: question, rule reference, status bar and scene labels

use common::Camera3D;
use egui::{Align2, Color32, Context, FontFamily, FontId, RichText};
use glam::Vec2;
use rand::Rng;

use crate::direction::{Direction, FactorKind};
use crate::drill::{DrillSession, Outcome, Phase};
use crate::scene::{Finger, LabelStyle, SceneLabel};

/// Equation entry with label and formula
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

pub const RULE_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Motor Effect",
        formula: "F = B I L sin θ",
        description: "Force on a conductor carrying current in a field",
    },
    Equation {
        name: "Vector Form",
        formula: "F = I L × B",
        description: "Force is perpendicular to both current and field",
    },
    Equation {
        name: "Axis Convention",
        formula: "(+Z) × (+X) = +Y",
        description: "Current out, field right: force up",
    },
];

pub const RULE_VARIABLES: &[(&str, &str)] = &[
    ("F", "Force on the conductor"),
    ("B", "Magnetic flux density (N → S)"),
    ("I", "Current (+ to −)"),
    ("L", "Length of conductor in the field"),
    ("θ", "Angle between current and field"),
];

const HEADING: Color32 = Color32::from_rgb(100, 200, 255);
const SECTION: Color32 = Color32::from_rgb(255, 200, 100);
const ANSWER_TARGET: Color32 = Color32::from_rgb(217, 119, 6);
const GIVEN_DIRECTION: Color32 = Color32::from_rgb(150, 160, 255);

pub fn color32(rgba: [f32; 4]) -> Color32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(
        channel(rgba[0]),
        channel(rgba[1]),
        channel(rgba[2]),
        channel(rgba[3]),
    )
}

/// Text and colors used to present the feedback of an answered round
pub fn feedback_colors(outcome: Outcome) -> (Color32, Color32) {
    match outcome {
        Outcome::Correct => (Color32::from_rgb(212, 237, 218), Color32::from_rgb(21, 87, 36)),
        Outcome::Incorrect => (Color32::from_rgb(248, 215, 218), Color32::from_rgb(114, 28, 36)),
    }
}

/// Draw the question panel. Returns the direction clicked this frame, if any.
pub fn draw_question_panel<R: Rng>(ctx: &Context, session: &DrillSession<R>) -> Option<Direction> {
    let mut clicked = None;
    let question = session.question();
    let locked = session.is_locked();

    egui::SidePanel::left("question_panel")
        .min_width(300.0)
        .max_width(360.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(RichText::new("Question").color(HEADING));
                ui.label(RichText::new(format!("Score: {}", session.score())).strong());
            });

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(5.0);

            ui.label(RichText::new("Information:").strong().color(SECTION));
            ui.add_space(5.0);
            for clue in question.given() {
                ui.group(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(clue.kind.display_name()).strong());
                        ui.label(
                            RichText::new(clue.direction.display())
                                .color(GIVEN_DIRECTION)
                                .font(FontId::new(16.0, FontFamily::Proportional)),
                        );
                    });
                });
            }

            ui.add_space(10.0);
            ui.label(RichText::new("Find the direction of:").strong().color(SECTION));
            ui.label(
                RichText::new(question.answer().kind.display_name())
                    .size(20.0)
                    .strong()
                    .color(ANSWER_TARGET),
            );

            ui.add_space(10.0);
            egui::Grid::new("answer_grid")
                .num_columns(2)
                .spacing([8.0, 8.0])
                .show(ui, |ui| {
                    for (index, direction) in Direction::ALL.into_iter().enumerate() {
                        let button = egui::Button::new(RichText::new(direction.display()).size(16.0))
                            .min_size(egui::vec2(135.0, 36.0));
                        if ui.add_enabled(!locked, button).clicked() {
                            clicked = Some(direction);
                        }
                        if index % 2 == 1 {
                            ui.end_row();
                        }
                    }
                });

            if let (Phase::Feedback { outcome, .. }, Some(text)) = (session.phase(), session.feedback()) {
                let (fill, text_color) = feedback_colors(outcome);
                ui.add_space(12.0);
                egui::Frame::none()
                    .fill(fill)
                    .rounding(8.0)
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.label(RichText::new(text).strong().size(16.0).color(text_color));
                    });
            }

            ui.add_space(10.0);
            ui.label(
                RichText::new("Keys: ←↑→↓ answer, I = into, O = out of screen")
                    .small()
                    .color(Color32::GRAY),
            );
        });

    clicked
}

/// Draw the rule reference sidebar, highlighting the finger being asked for
pub fn draw_reference_sidebar(ctx: &Context, asked: FactorKind) {
    egui::SidePanel::right("reference_panel")
        .min_width(280.0)
        .max_width(350.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(RichText::new("Fleming's Left Hand Rule").color(HEADING));
            });

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(5.0);

            ui.label(RichText::new("Fingers").strong().color(SECTION));
            ui.add_space(5.0);
            for finger in Finger::ALL {
                let color = if finger.factor() == asked {
                    ANSWER_TARGET
                } else {
                    Color32::WHITE
                };
                ui.horizontal(|ui| {
                    ui.label(RichText::new(finger.name()).strong().color(color));
                    ui.label(RichText::new("→").color(Color32::GRAY));
                    ui.label(RichText::new(finger.meaning()).color(Color32::LIGHT_GRAY));
                });
            }

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(5.0);

            ui.label(RichText::new("Equations").strong().color(SECTION));
            ui.add_space(5.0);
            for eq in RULE_EQUATIONS {
                draw_equation(ui, eq);
                ui.add_space(8.0);
            }

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(5.0);

            ui.label(RichText::new("Variables").strong().color(SECTION));
            ui.add_space(5.0);
            for (symbol, meaning) in RULE_VARIABLES {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(*symbol)
                            .color(Color32::from_rgb(150, 255, 150))
                            .font(FontId::new(14.0, FontFamily::Monospace)),
                    );
                    ui.label(RichText::new("=").color(Color32::GRAY));
                    ui.label(RichText::new(*meaning).color(Color32::LIGHT_GRAY));
                });
            }
        });
}

fn draw_equation(ui: &mut egui::Ui, eq: &Equation) {
    ui.group(|ui| {
        ui.label(RichText::new(eq.name).strong().color(Color32::WHITE));
        ui.label(
            RichText::new(eq.formula)
                .font(FontId::new(16.0, FontFamily::Monospace))
                .color(Color32::from_rgb(200, 220, 255)),
        );
        ui.label(RichText::new(eq.description).small().color(Color32::GRAY));
    });
}

pub fn draw_status_bar<R: Rng>(ctx: &Context, session: &DrillSession<R>, view_name: &str) {
    egui::TopBottomPanel::top("status").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let score = session.score();
            ui.label(format!("Round {}", session.round()));
            ui.separator();
            ui.label(format!("Score {score}"));
            ui.separator();
            ui.label(format!("Accuracy {:.0}%", score.accuracy()));
            ui.separator();
            ui.label(format!("View: {view_name} (H to switch)"));
            if session.is_locked() {
                ui.separator();
                ui.label(RichText::new("NEXT QUESTION SOON").color(Color32::YELLOW));
            }
        });
    });
}

/// Paint scene labels over the 3D view, clipped to the space left by the panels
pub fn draw_scene_labels(ctx: &Context, camera: &Camera3D, labels: &[SceneLabel]) {
    let screen = ctx.screen_rect();
    let screen_size = Vec2::new(screen.width(), screen.height());
    let painter = ctx
        .layer_painter(egui::LayerId::new(
            egui::Order::Background,
            egui::Id::new("scene_labels"),
        ))
        .with_clip_rect(ctx.available_rect());

    for label in labels {
        let Some(point) = camera.project_to_screen(label.position, screen_size) else {
            continue;
        };
        let pos = egui::pos2(point.x, point.y);
        let color = color32(label.color);

        match label.style {
            LabelStyle::Tag => {
                let galley = painter.layout_no_wrap(
                    label.text.clone(),
                    FontId::proportional(14.0),
                    Color32::WHITE,
                );
                let rect = Align2::CENTER_CENTER
                    .anchor_size(pos, galley.size())
                    .expand2(egui::vec2(8.0, 4.0));
                painter.rect_filled(rect, 4.0, color);
                painter.galley(rect.shrink2(egui::vec2(8.0, 4.0)).min, galley, Color32::WHITE);
            }
            LabelStyle::Pole => {
                painter.text(
                    pos,
                    Align2::CENTER_CENTER,
                    &label.text,
                    FontId::proportional(24.0),
                    color,
                );
            }
            LabelStyle::Marker => {
                painter.text(
                    pos + egui::vec2(2.0, 2.0),
                    Align2::CENTER_CENTER,
                    &label.text,
                    FontId::proportional(60.0),
                    Color32::from_black_alpha(50),
                );
                painter.text(
                    pos,
                    Align2::CENTER_CENTER,
                    &label.text,
                    FontId::proportional(60.0),
                    color,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::palette;

    #[test]
    fn palette_colors_convert_to_bytes() {
        assert_eq!(color32(palette::WHITE), Color32::WHITE);
        assert_eq!(color32(palette::NORTH), Color32::from_rgb(255, 77, 77));
        assert_eq!(color32([2.0, -1.0, 0.5, 1.0]), Color32::from_rgb(255, 0, 128));
    }

    #[test]
    fn feedback_colors_differ_by_outcome() {
        assert_ne!(
            feedback_colors(Outcome::Correct),
            feedback_colors(Outcome::Incorrect)
        );
    }

    #[test]
    fn reference_tables_are_filled_in() {
        assert!(RULE_EQUATIONS.iter().all(|eq| !eq.formula.is_empty()));
        assert!(RULE_VARIABLES.iter().any(|(symbol, _)| *symbol == "B"));
    }
}
