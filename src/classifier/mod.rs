pub mod catalogue;

use serde::Serialize;

use catalogue::{PatternRule, CATALOGUE, RULES, UNKNOWN_GLYPH};

/// Reduced summary of an image consumed by the classifier.
///
/// Line totals come from the 8-bin line direction histogram: bins 0 and 4
/// count as horizontal, 2 and 6 as vertical, the rest as diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CharacterPatterns {
    pub horizontal_lines: f64,
    pub vertical_lines: f64,
    pub diagonal_lines: f64,
    pub curves: f64,
    pub symmetry_x: f64,
    pub symmetry_y: f64,
    pub aspect_ratio: f64,
    pub complexity: f64,
    /// Keypoints per pixel
    pub density: f64,
    pub keypoint_count: usize,
}

impl CharacterPatterns {
    /// Split an 8-bin direction histogram into horizontal, vertical and diagonal totals.
    pub fn line_totals(directions: &[f64; 8]) -> (f64, f64, f64) {
        let horizontal = directions[0] + directions[4];
        let vertical = directions[2] + directions[6];
        let diagonal = directions[1] + directions[3] + directions[5] + directions[7];
        (horizontal, vertical, diagonal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharacterScore {
    pub character: char,
    pub score: u32,
}

impl CharacterScore {
    pub fn unknown() -> Self {
        Self {
            character: UNKNOWN_GLYPH,
            score: 0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.character == UNKNOWN_GLYPH && self.score == 0
    }
}

/// Scores a glyph catalogue against pattern rules.
#[derive(Debug, Clone)]
pub struct Classifier {
    catalogue: Vec<char>,
    rules: Vec<PatternRule>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::with_tables(CATALOGUE.to_vec(), RULES.to_vec())
    }

    pub fn with_tables(catalogue: Vec<char>, rules: Vec<PatternRule>) -> Self {
        Self { catalogue, rules }
    }

    pub fn catalogue(&self) -> &[char] {
        &self.catalogue
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Score of every catalogue glyph, in catalogue order.
    pub fn scores(&self, patterns: &CharacterPatterns) -> Vec<CharacterScore> {
        self.catalogue
            .iter()
            .map(|&character| CharacterScore {
                character,
                score: self.rules.iter().map(|rule| rule.award(patterns, character)).sum(),
            })
            .collect()
    }

    /// Highest-scoring glyph; ties go to the earliest catalogue entry.
    /// Patterns built from zero keypoints yield the unknown glyph without scoring.
    pub fn classify(&self, patterns: &CharacterPatterns) -> CharacterScore {
        if patterns.keypoint_count == 0 {
            return CharacterScore::unknown();
        }

        let mut best: Option<CharacterScore> = None;
        for candidate in self.scores(patterns) {
            if best.is_none_or(|b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }
        best.unwrap_or_else(CharacterScore::unknown)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}
