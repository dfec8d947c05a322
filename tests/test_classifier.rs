use glyphcast::classifier::catalogue::{PatternRule, CATALOGUE, HORIZONTAL_HEAVY, RULES, UNKNOWN_GLYPH};
use glyphcast::{CharacterPatterns, CharacterScore, Classifier};

fn horizontal_patterns() -> CharacterPatterns {
    CharacterPatterns {
        horizontal_lines: 5.0,
        aspect_ratio: 1.0,
        density: 0.003,
        keypoint_count: 10,
        ..CharacterPatterns::default()
    }
}

#[test]
fn test_zero_descriptor_is_unknown() {
    let result = Classifier::new().classify(&CharacterPatterns::default());
    assert_eq!(result, CharacterScore::unknown());
    assert!(result.is_unknown());
    assert_eq!(result.character, UNKNOWN_GLYPH);
}

#[test]
fn test_classification_is_deterministic() {
    let classifier = Classifier::new();
    let patterns = CharacterPatterns {
        horizontal_lines: 2.0,
        vertical_lines: 7.0,
        diagonal_lines: 1.0,
        symmetry_x: 0.9,
        aspect_ratio: 0.5,
        density: 0.002,
        keypoint_count: 12,
        ..CharacterPatterns::default()
    };

    let first = classifier.classify(&patterns);
    for _ in 0..10 {
        assert_eq!(classifier.classify(&patterns), first);
    }
}

#[test]
fn test_horizontal_dominance_picks_horizontal_glyph() {
    let result = Classifier::new().classify(&horizontal_patterns());

    assert!(HORIZONTAL_HEAVY.contains(&result.character));
    assert_eq!(result.score, 3);
}

#[test]
fn test_ties_go_to_catalogue_order() {
    // Every horizontal-heavy glyph scores 3; 'A' comes first among them
    let result = Classifier::new().classify(&horizontal_patterns());
    assert_eq!(result.character, 'A');
}

#[test]
fn test_scores_follow_rules() {
    let classifier = Classifier::new();
    let patterns = CharacterPatterns {
        horizontal_lines: 6.0,
        vertical_lines: 1.0,
        symmetry_y: 0.8,
        aspect_ratio: 3.0,
        density: 0.001,
        keypoint_count: 5,
        ..CharacterPatterns::default()
    };

    let scores = classifier.scores(&patterns);
    assert_eq!(scores.len(), CATALOGUE.len());

    let score_of = |c: char| scores.iter().find(|s| s.character == c).map(|s| s.score);
    assert_eq!(score_of('E'), Some(7));
    assert_eq!(score_of('B'), Some(5));
    assert_eq!(score_of('L'), Some(4));
    assert_eq!(classifier.classify(&patterns), CharacterScore { character: 'E', score: 7 });
}

#[test]
fn test_vertical_rule() {
    let patterns = CharacterPatterns {
        vertical_lines: 4.0,
        aspect_ratio: 0.5,
        density: 0.003,
        keypoint_count: 4,
        ..CharacterPatterns::default()
    };
    // 'い' is vertical-heavy and narrow and precedes 'L' (vertical-heavy and sparse)
    let result = Classifier::new().classify(&patterns);
    assert_eq!(result.score, 5);
    assert_eq!(result.character, 'い');
}

#[test]
fn test_custom_tables() {
    fn always(_: &CharacterPatterns) -> bool {
        true
    }
    let rules = vec![PatternRule {
        name: "always",
        points: 4,
        condition: always,
        glyphs: &['y'],
    }];
    let classifier = Classifier::with_tables(vec!['x', 'y'], rules);

    assert_eq!(
        classifier.classify(&horizontal_patterns()),
        CharacterScore { character: 'y', score: 4 }
    );

    let empty_rules = Classifier::with_tables(vec!['x', 'y'], Vec::new());
    assert_eq!(empty_rules.classify(&horizontal_patterns()).character, 'x');
}

#[test]
fn test_rule_table() {
    assert_eq!(RULES.len(), 9);
    assert_eq!(RULES.iter().filter(|r| r.points == 3).count(), 3);
    assert!(CATALOGUE.contains(&UNKNOWN_GLYPH));
}
