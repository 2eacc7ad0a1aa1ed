//! Fleming's Left Hand Rule Drill
//!
//! Quizzes the learner on the relation between magnetic field, current and
//! the force on a conductor. Each round hides one of the three directions;
//! the learner names it from six axis-aligned choices.
//!
//! - **Rule engine** (`direction`, `quiz`): scenario sampling, question
//!   building and answer checking
//! - **Drill session** (`drill`): score, feedback and the cooldown state machine
//! - **Presentation** (`scene`, `renderer`, `panels`): 3D apparatus, hand
//!   reference model and egui panels
//! - **Configuration** (`config`): command line flags

pub mod direction;
pub mod quiz;
pub mod drill;
pub mod config;
pub mod scene;
pub mod renderer;
pub mod panels;

pub use direction::{CurrentDirection, Direction, FactorKind, FieldDirection, ForceDirection};
pub use drill::{DrillSession, DrillSettings, Outcome, Phase, Score};
pub use quiz::{check_answer, derive_force, generate_question, Clue, Question, QuestionGenerator, Scenario};
