//! Command line configuration

use std::time::Duration;

use anyhow::{ensure, Result};
use clap::Parser;

use crate::drill::DrillSettings;
use crate::quiz::QuestionGenerator;

const MAX_COOLDOWN_MS: u64 = 60_000;

#[derive(Debug, Clone, Parser)]
#[command(name = "fleming_drill", version, about = "Drill Fleming's left hand rule")]
pub struct DrillConfig {
    /// Seed for a reproducible question sequence
    #[arg(long)]
    pub seed: Option<u64>,

    /// Feedback time after a correct answer, in milliseconds
    #[arg(long, default_value_t = 1500)]
    pub correct_delay_ms: u64,

    /// Feedback time after an incorrect answer, in milliseconds
    #[arg(long, default_value_t = 3000)]
    pub incorrect_delay_ms: u64,

    /// Repeat the question after an incorrect answer
    #[arg(long)]
    pub retry_on_incorrect: bool,

    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Start with the hand reference model instead of the apparatus
    #[arg(long)]
    pub show_hand: bool,
}

impl DrillConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width > 0 && self.height > 0,
            "window size must be non-zero, got {}x{}",
            self.width,
            self.height
        );
        ensure!(
            self.correct_delay_ms <= MAX_COOLDOWN_MS,
            "--correct-delay-ms must be at most {}",
            MAX_COOLDOWN_MS
        );
        ensure!(
            self.incorrect_delay_ms <= MAX_COOLDOWN_MS,
            "--incorrect-delay-ms must be at most {}",
            MAX_COOLDOWN_MS
        );
        Ok(())
    }

    pub fn settings(&self) -> DrillSettings {
        DrillSettings {
            correct_cooldown: Duration::from_millis(self.correct_delay_ms),
            incorrect_cooldown: Duration::from_millis(self.incorrect_delay_ms),
            retry_on_incorrect: self.retry_on_incorrect,
        }
    }

    pub fn generator(&self) -> QuestionGenerator {
        match self.seed {
            Some(seed) => QuestionGenerator::seeded(seed),
            None => QuestionGenerator::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drill::{DEFAULT_CORRECT_COOLDOWN, DEFAULT_INCORRECT_COOLDOWN};

    fn parse(args: &[&str]) -> DrillConfig {
        DrillConfig::try_parse_from(std::iter::once("fleming_drill").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults_match_the_session_defaults() {
        let config = parse(&[]);
        assert!(config.validate().is_ok());
        assert_eq!(config.settings(), DrillSettings::default());
        assert_eq!(config.settings().correct_cooldown, DEFAULT_CORRECT_COOLDOWN);
        assert_eq!(config.settings().incorrect_cooldown, DEFAULT_INCORRECT_COOLDOWN);
        assert_eq!((config.width, config.height), (1280, 720));
        assert!(config.seed.is_none());
        assert!(!config.show_hand);
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--seed",
            "9",
            "--correct-delay-ms",
            "200",
            "--incorrect-delay-ms",
            "400",
            "--retry-on-incorrect",
        ]);

        let settings = config.settings();
        assert_eq!(config.seed, Some(9));
        assert_eq!(settings.correct_cooldown, Duration::from_millis(200));
        assert_eq!(settings.incorrect_cooldown, Duration::from_millis(400));
        assert!(settings.retry_on_incorrect);
    }

    #[test]
    fn seeded_config_is_reproducible() {
        let config = parse(&["--seed", "5"]);
        let mut a = config.generator();
        let mut b = config.generator();
        assert_eq!(a.next_question(), b.next_question());
    }

    #[test]
    fn rejects_zero_window_and_long_cooldowns() {
        assert!(parse(&["--width", "0"]).validate().is_err());
        assert!(parse(&["--incorrect-delay-ms", "60001"]).validate().is_err());
        assert!(parse(&["--correct-delay-ms", "60000"]).validate().is_ok());
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(DrillConfig::try_parse_from(["fleming_drill", "--forward"]).is_err());
    }
}
