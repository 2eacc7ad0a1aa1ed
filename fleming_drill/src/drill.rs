//! Drill session: the per-round state machine driven by the UI
//!
//! ```text
//! AwaitingAnswer --submit--> Feedback { outcome, remaining }
//! Feedback --update(dt) until remaining is zero--> AwaitingAnswer
//! ```
//!
//! Submissions while feedback is shown are ignored.

use std::fmt;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;

use crate::direction::Direction;
use crate::quiz::{Question, QuestionGenerator};

pub const DEFAULT_CORRECT_COOLDOWN: Duration = Duration::from_millis(1500);
pub const DEFAULT_INCORRECT_COOLDOWN: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Lock state of the answer controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingAnswer,
    Feedback { outcome: Outcome, remaining: Duration },
}

/// Running tally; `total` counts every accepted submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub correct: u32,
    pub total: u32,
}

impl Score {
    pub fn record(&mut self, outcome: Outcome) {
        self.total += 1;
        if outcome == Outcome::Correct {
            self.correct += 1;
        }
    }

    /// Percentage of correct answers, 0 before the first answer
    pub fn accuracy(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f32 * 100.0 / self.total as f32
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.correct, self.total)
    }
}

/// Timing and flow options for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrillSettings {
    pub correct_cooldown: Duration,
    pub incorrect_cooldown: Duration,
    /// Keep the same question after a wrong answer instead of drawing a new one
    pub retry_on_incorrect: bool,
}

impl Default for DrillSettings {
    fn default() -> Self {
        Self {
            correct_cooldown: DEFAULT_CORRECT_COOLDOWN,
            incorrect_cooldown: DEFAULT_INCORRECT_COOLDOWN,
            retry_on_incorrect: false,
        }
    }
}

pub struct DrillSession<R = StdRng> {
    generator: QuestionGenerator<R>,
    settings: DrillSettings,
    question: Question,
    round: u64,
    score: Score,
    phase: Phase,
    feedback: Option<String>,
}

impl<R: Rng> DrillSession<R> {
    /// Start a session; the first question is drawn immediately
    pub fn new(mut generator: QuestionGenerator<R>, settings: DrillSettings) -> Self {
        let question = generator.next_question();
        Self {
            generator,
            settings,
            question,
            round: 1,
            score: Score::default(),
            phase: Phase::AwaitingAnswer,
            feedback: None,
        }
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    /// 1-based round number, bumped whenever a new question is drawn
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn settings(&self) -> &DrillSettings {
        &self.settings
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.phase, Phase::Feedback { .. })
    }

    /// Score an answer. Returns `None` when the controls are locked.
    pub fn submit(&mut self, candidate: Direction) -> Option<Outcome> {
        if self.is_locked() {
            log::debug!("ignoring {candidate:?} while feedback is shown");
            return None;
        }

        let (outcome, remaining) = if self.question.is_correct(candidate) {
            (Outcome::Correct, self.settings.correct_cooldown)
        } else {
            (Outcome::Incorrect, self.settings.incorrect_cooldown)
        };

        self.score.record(outcome);
        self.feedback = Some(match outcome {
            Outcome::Correct => "✓ Correct! Well done!".to_owned(),
            Outcome::Incorrect => format!(
                "✗ Incorrect. The correct answer is: {}",
                self.question.answer().direction.display()
            ),
        });
        self.phase = Phase::Feedback { outcome, remaining };

        log::info!(
            "round {}: answered {:?}, {:?} (score {})",
            self.round,
            candidate,
            outcome,
            self.score
        );
        Some(outcome)
    }

    /// Advance the cooldown timer. Returns `true` when a new round started.
    pub fn update(&mut self, dt: Duration) -> bool {
        let Phase::Feedback { outcome, remaining } = self.phase else {
            return false;
        };

        let remaining = remaining.saturating_sub(dt);
        if !remaining.is_zero() {
            self.phase = Phase::Feedback { outcome, remaining };
            return false;
        }

        self.phase = Phase::AwaitingAnswer;
        self.feedback = None;

        if outcome == Outcome::Incorrect && self.settings.retry_on_incorrect {
            return false;
        }

        self.question = self.generator.next_question();
        self.round += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> DrillSession {
        DrillSession::new(QuestionGenerator::seeded(3), DrillSettings::default())
    }

    fn wrong_answer(session: &DrillSession) -> Direction {
        session.question().answer().direction.opposite()
    }

    #[test]
    fn starts_unlocked_with_a_question() {
        let session = session();
        assert_eq!(session.phase(), Phase::AwaitingAnswer);
        assert_eq!(session.round(), 1);
        assert_eq!(session.score(), Score::default());
        assert!(session.feedback().is_none());
    }

    #[test]
    fn correct_answer_locks_for_the_short_cooldown() {
        let mut session = session();
        let answer = session.question().answer().direction;

        assert_eq!(session.submit(answer), Some(Outcome::Correct));
        assert_eq!(
            session.phase(),
            Phase::Feedback {
                outcome: Outcome::Correct,
                remaining: DEFAULT_CORRECT_COOLDOWN
            }
        );
        assert_eq!(session.feedback(), Some("✓ Correct! Well done!"));
        assert_eq!(session.score(), Score { correct: 1, total: 1 });
    }

    #[test]
    fn incorrect_answer_names_the_correct_direction() {
        let mut session = session();
        let expected = session.question().answer().direction;

        assert_eq!(session.submit(wrong_answer(&session)), Some(Outcome::Incorrect));
        let feedback = session.feedback().unwrap();
        assert!(feedback.starts_with("✗ Incorrect."));
        assert!(feedback.ends_with(expected.display()));
        assert_eq!(session.score(), Score { correct: 0, total: 1 });
    }

    #[test]
    fn submissions_while_locked_are_ignored() {
        let mut session = session();
        let answer = session.question().answer().direction;
        session.submit(answer);

        for direction in Direction::ALL {
            assert_eq!(session.submit(direction), None);
        }
        assert_eq!(session.score(), Score { correct: 1, total: 1 });
    }

    #[test]
    fn cooldown_expiry_starts_the_next_round() {
        let mut session = session();
        let answer = session.question().answer().direction;
        session.submit(answer);

        assert!(!session.update(Duration::from_millis(1000)));
        assert!(session.is_locked());
        assert!(session.update(Duration::from_millis(500)));
        assert!(!session.is_locked());
        assert_eq!(session.round(), 2);
        assert!(session.feedback().is_none());
    }

    #[test]
    fn incorrect_cooldown_is_longer() {
        let mut session = session();
        session.submit(wrong_answer(&session));

        assert!(!session.update(DEFAULT_CORRECT_COOLDOWN));
        assert!(session.is_locked());
        assert!(session.update(DEFAULT_INCORRECT_COOLDOWN));
        assert_eq!(session.round(), 2);
    }

    #[test]
    fn retry_mode_keeps_the_question_after_a_miss() {
        let settings = DrillSettings {
            retry_on_incorrect: true,
            ..DrillSettings::default()
        };
        let mut session = DrillSession::new(QuestionGenerator::seeded(11), settings);
        let question = *session.question();

        session.submit(wrong_answer(&session));
        assert!(!session.update(DEFAULT_INCORRECT_COOLDOWN));
        assert!(!session.is_locked());
        assert_eq!(session.round(), 1);
        assert_eq!(*session.question(), question);

        session.submit(question.answer().direction);
        assert!(session.update(DEFAULT_CORRECT_COOLDOWN));
        assert_eq!(session.round(), 2);
        assert_eq!(session.score(), Score { correct: 1, total: 2 });
    }

    #[test]
    fn update_without_feedback_is_a_no_op() {
        let mut session = session();
        assert!(!session.update(Duration::from_secs(10)));
        assert_eq!(session.round(), 1);
    }

    #[test]
    fn score_display_and_accuracy() {
        let mut score = Score::default();
        assert_eq!(score.accuracy(), 0.0);

        score.record(Outcome::Correct);
        score.record(Outcome::Incorrect);
        score.record(Outcome::Correct);
        score.record(Outcome::Correct);
        assert_eq!(score.to_string(), "3 / 4");
        assert_eq!(score.accuracy(), 75.0);
    }
}
