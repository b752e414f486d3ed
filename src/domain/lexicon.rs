//! Rule-based text polarity for news headlines.
//!
//! Scoring walks the tokens once:
//! 1. look up each word's polarity
//! 2. a preceding negation flips the sign
//! 3. a preceding intensifier scales the magnitude
//!
//! The text's polarity is the mean over matched words, clamped to [-1, 1];
//! text without any lexicon word scores 0.

use std::collections::HashMap;

const POSITIVE: &[(&str, f64)] = &[
    ("bullish", 0.8),
    ("surge", 0.7),
    ("surges", 0.7),
    ("rally", 0.7),
    ("rallies", 0.7),
    ("soar", 0.8),
    ("soars", 0.8),
    ("gain", 0.5),
    ("gains", 0.5),
    ("profit", 0.6),
    ("growth", 0.6),
    ("rise", 0.5),
    ("rises", 0.5),
    ("jump", 0.5),
    ("jumps", 0.5),
    ("high", 0.4),
    ("record", 0.6),
    ("strong", 0.5),
    ("positive", 0.5),
    ("optimistic", 0.6),
    ("adoption", 0.5),
    ("approval", 0.6),
    ("approved", 0.6),
    ("upgrade", 0.6),
    ("breakout", 0.6),
    ("recovery", 0.5),
    ("rebound", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("best", 1.0),
    ("success", 0.7),
    ("win", 0.6),
];

const NEGATIVE: &[(&str, f64)] = &[
    ("bearish", -0.8),
    ("crash", -0.9),
    ("crashes", -0.9),
    ("plunge", -0.8),
    ("plunges", -0.8),
    ("drop", -0.6),
    ("drops", -0.6),
    ("fall", -0.5),
    ("falls", -0.5),
    ("decline", -0.6),
    ("loss", -0.6),
    ("losses", -0.6),
    ("low", -0.4),
    ("weak", -0.5),
    ("negative", -0.5),
    ("fear", -0.6),
    ("fears", -0.6),
    ("panic", -0.8),
    ("selloff", -0.7),
    ("dump", -0.7),
    ("hack", -0.8),
    ("hacked", -0.8),
    ("exploit", -0.7),
    ("ban", -0.7),
    ("lawsuit", -0.6),
    ("fraud", -0.9),
    ("scam", -0.9),
    ("crisis", -0.8),
    ("warning", -0.5),
    ("bad", -0.7),
    ("worst", -1.0),
    ("fail", -0.7),
    ("fails", -0.7),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "cannot", "cant", "dont", "doesnt", "didnt", "wont",
    "isnt", "arent", "wasnt", "hardly", "barely",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("massive", 1.4),
    ("massively", 1.4),
    ("huge", 1.3),
    ("sharp", 1.3),
    ("sharply", 1.3),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("modest", 0.7),
];

pub struct PolarityLexicon {
    words: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for PolarityLexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityLexicon {
    pub fn new() -> Self {
        let words = POSITIVE.iter().chain(NEGATIVE).copied().collect();
        let intensifiers = INTENSIFIERS.iter().copied().collect();
        Self {
            words,
            intensifiers,
        }
    }

    pub fn polarity(&self, text: &str) -> f64 {
        let mut scores: Vec<f64> = Vec::new();
        let mut negate_next = false;
        let mut intensity = 1.0;

        for token in tokenize(text) {
            if NEGATIONS.contains(&token.as_str()) {
                negate_next = true;
                continue;
            }
            if let Some(&mult) = self.intensifiers.get(token.as_str()) {
                intensity = mult;
                continue;
            }
            if let Some(&score) = self.words.get(token.as_str()) {
                let signed = if negate_next { -score } else { score };
                scores.push(signed * intensity);
            }
            negate_next = false;
            intensity = 1.0;
        }

        if scores.is_empty() {
            0.0
        } else {
            (scores.iter().sum::<f64>() / scores.len() as f64).clamp(-1.0, 1.0)
        }
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| c.is_whitespace() || c == '-' || c == '/')
        .map(|raw| {
            raw.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
}
