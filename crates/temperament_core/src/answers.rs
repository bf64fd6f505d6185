//! Validated answer sheet.
//!
//! The raw payload is a list of strings. It is parsed once into an
//! [`AnswerSheet`] so the classifier never re-checks shape.

use crate::error::{Result, TemperamentError};
use crate::types::SubTemperament;

/// Number of answers in a complete test.
pub const ANSWER_COUNT: usize = 42;

/// Positions of the three scoring blocks.
pub const TEMPERATURE_BLOCK: std::ops::Range<usize> = 0..11;
pub const HUMIDITY_BLOCK: std::ops::Range<usize> = 11..22;
pub const SUBTEMPERAMENT_BLOCK: std::ops::Range<usize> = 22..42;

/// One parsed answer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    A,
    B,
    Sub(SubTemperament),
    /// Anything else. Counts as a non-vote in every block.
    Unrecognized,
}

impl Answer {
    pub fn parse(token: &str) -> Self {
        match token.trim() {
            "A" => Answer::A,
            "B" => Answer::B,
            other => SubTemperament::from_label(other)
                .map(Answer::Sub)
                .unwrap_or(Answer::Unrecognized),
        }
    }
}

/// Exactly [`ANSWER_COUNT`] parsed answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSheet {
    answers: [Answer; ANSWER_COUNT],
}

impl AnswerSheet {
    /// Fails with `InvalidInput` unless there are exactly 42 tokens.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        if tokens.len() != ANSWER_COUNT {
            return Err(TemperamentError::InvalidInput(format!(
                "expected {} answers, got {}",
                ANSWER_COUNT,
                tokens.len()
            )));
        }

        let mut answers = [Answer::Unrecognized; ANSWER_COUNT];
        for (slot, token) in answers.iter_mut().zip(tokens) {
            *slot = Answer::parse(token.as_ref());
        }
        Ok(Self { answers })
    }

    pub fn temperature(&self) -> &[Answer] {
        &self.answers[TEMPERATURE_BLOCK]
    }

    pub fn humidity(&self) -> &[Answer] {
        &self.answers[HUMIDITY_BLOCK]
    }

    pub fn subtemperament(&self) -> &[Answer] {
        &self.answers[SUBTEMPERAMENT_BLOCK]
    }

    /// Tokens that scored nothing in the block they appeared in.
    pub fn non_votes(&self) -> usize {
        let axis = |block: &[Answer]| {
            block
                .iter()
                .filter(|a| !matches!(a, Answer::A | Answer::B))
                .count()
        };
        let subs = self
            .subtemperament()
            .iter()
            .filter(|a| !matches!(a, Answer::Sub(_)))
            .count();
        axis(self.temperature()) + axis(self.humidity()) + subs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(n: usize) -> Vec<String> {
        vec!["A".to_string(); n]
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        for n in [0, 41, 43] {
            let err = AnswerSheet::parse(&tokens(n)).unwrap_err();
            assert!(matches!(err, TemperamentError::InvalidInput(_)), "len {n}");
        }
        assert!(AnswerSheet::parse(&tokens(42)).is_ok());
    }

    #[test]
    fn test_answer_parse() {
        assert_eq!(Answer::parse("A"), Answer::A);
        assert_eq!(Answer::parse(" B "), Answer::B);
        assert_eq!(Answer::parse("Água"), Answer::Sub(SubTemperament::Agua));
        assert_eq!(Answer::parse("a"), Answer::Unrecognized);
        assert_eq!(Answer::parse("Lava"), Answer::Unrecognized);
    }

    #[test]
    fn test_blocks_and_non_votes() {
        let mut raw = tokens(22);
        raw.extend(std::iter::repeat("Fogo".to_string()).take(19));
        raw.push("A".to_string());
        let sheet = AnswerSheet::parse(&raw).unwrap();
        assert_eq!(sheet.temperature().len(), 11);
        assert_eq!(sheet.humidity().len(), 11);
        assert_eq!(sheet.subtemperament().len(), 20);
        assert_eq!(sheet.non_votes(), 1);
    }
}
