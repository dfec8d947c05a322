//! Glyph catalogue and pattern-rule tables.
//!
//! Catalogue order matters: it breaks ties between equally scored glyphs.
//! Rule glyph sets may name glyphs outside the catalogue; those entries
//! simply never win.

use super::CharacterPatterns;

/// Returned when there is nothing to classify
pub const UNKNOWN_GLYPH: char = '?';

pub const CATALOGUE: &[char] = &[
    // Hiragana
    'あ', 'い', 'う', 'え', 'お', 'か', 'き', 'く', 'け', 'こ',
    'さ', 'し', 'す', 'せ', 'そ', 'た', 'ち', 'つ', 'て', 'と',
    'な', 'に', 'ぬ', 'ね', 'の', 'は', 'ひ', 'ふ', 'へ', 'ほ',
    'ま', 'み', 'む', 'め', 'も', 'や', 'ゆ', 'よ',
    'ら', 'り', 'る', 'れ', 'ろ', 'わ', 'を', 'ん',
    // Katakana
    'ア', 'イ', 'ウ', 'エ', 'オ', 'カ', 'キ', 'ク', 'ケ', 'コ',
    // Kanji
    '山', '川', '田', '木', '火', '水', '土', '金', '月', '日',
    // Latin letters and digits
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J',
    'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T',
    'U', 'V', 'W', 'X', 'Y', 'Z',
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    // Symbols
    '!', '@', '#', '$', '%', '^', '&', '*', '(', ')',
    '-', '+', '=', '[', ']', '{', '}', '|', '\\', '/',
    '<', '>', '?', '.', ',', ';', ':', '"', '\'',
];

pub const HORIZONTAL_HEAVY: &[char] = &['E', 'F', 'H', '=', 'B', 'A', 'G', 'P', 'R', '三', '王', '工'];
pub const VERTICAL_HEAVY: &[char] = &['I', 'L', 'T', '1', '|', 'り', 'い', 'け', '川', '小'];
pub const DIAGONAL_HEAVY: &[char] = &['K', 'N', 'X', 'Z', 'M', 'W', 'V', 'A', '火', 'み'];
pub const SYMMETRIC_X: &[char] = &['A', 'T', 'V', 'W', 'X', 'Y', 'M', 'O', '山', '田', 'め', 'ゆ'];
pub const SYMMETRIC_Y: &[char] = &['B', 'C', 'D', 'E', 'K', 'O', 'S', 'X', '日', '田', 'の', 'め'];
pub const WIDE: &[char] = &['E', 'F', 'L', 'Z', '-', '=', '_', '一', '二', 'こ'];
pub const NARROW: &[char] = &['I', 'J', '1', '|', '!', 'り', 'い', '川', '小'];
pub const DENSE: &[char] = &['B', '8', '&', '#', '@', 'の', 'あ', '田', '重'];
pub const SPARSE: &[char] = &['C', 'L', '7', '/', '\\', 'く', 'へ', '人', '入'];

/// One scoring rule: when `condition` holds, every glyph in `glyphs` gains `points`.
#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    pub name: &'static str,
    pub points: u32,
    pub condition: fn(&CharacterPatterns) -> bool,
    pub glyphs: &'static [char],
}

impl PatternRule {
    pub fn award(&self, patterns: &CharacterPatterns, glyph: char) -> u32 {
        if (self.condition)(patterns) && self.glyphs.contains(&glyph) {
            self.points
        } else {
            0
        }
    }
}

fn horizontal_dominant(p: &CharacterPatterns) -> bool {
    p.horizontal_lines > p.vertical_lines * 1.5
}

fn vertical_dominant(p: &CharacterPatterns) -> bool {
    p.vertical_lines > p.horizontal_lines * 1.5
}

fn diagonal_dominant(p: &CharacterPatterns) -> bool {
    p.diagonal_lines > (p.horizontal_lines + p.vertical_lines) * 0.8
}

fn symmetric_x(p: &CharacterPatterns) -> bool {
    p.symmetry_x > 0.7
}

fn symmetric_y(p: &CharacterPatterns) -> bool {
    p.symmetry_y > 0.7
}

fn wide(p: &CharacterPatterns) -> bool {
    p.aspect_ratio > 1.5
}

fn narrow(p: &CharacterPatterns) -> bool {
    p.aspect_ratio < 0.7
}

fn dense(p: &CharacterPatterns) -> bool {
    p.density > 0.01
}

fn sparse(p: &CharacterPatterns) -> bool {
    p.density < 0.005
}

pub const RULES: &[PatternRule] = &[
    PatternRule { name: "horizontal-lines", points: 3, condition: horizontal_dominant, glyphs: HORIZONTAL_HEAVY },
    PatternRule { name: "vertical-lines", points: 3, condition: vertical_dominant, glyphs: VERTICAL_HEAVY },
    PatternRule { name: "diagonal-lines", points: 3, condition: diagonal_dominant, glyphs: DIAGONAL_HEAVY },
    PatternRule { name: "symmetry-x", points: 2, condition: symmetric_x, glyphs: SYMMETRIC_X },
    PatternRule { name: "symmetry-y", points: 2, condition: symmetric_y, glyphs: SYMMETRIC_Y },
    PatternRule { name: "wide", points: 2, condition: wide, glyphs: WIDE },
    PatternRule { name: "narrow", points: 2, condition: narrow, glyphs: NARROW },
    PatternRule { name: "dense", points: 2, condition: dense, glyphs: DENSE },
    PatternRule { name: "sparse", points: 2, condition: sparse, glyphs: SPARSE },
];
