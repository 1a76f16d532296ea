//! Layout features
//!
//! Whitespace and formatting habits, computed from raw text only.

use super::{feature_key, Category, Extractor, FeatureFragment};
use crate::error::Result;
use crate::parsers::Representation;
use std::sync::Arc;

/// Layout extractors in aggregation order
pub fn extractors() -> Vec<Arc<dyn Extractor>> {
    vec![
        Arc::new(TabCount),
        Arc::new(SpaceCount),
        Arc::new(EmptyLines),
        Arc::new(WhitespaceRatio),
        Arc::new(BraceStyle),
        Arc::new(TabIndentation),
    ]
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}

pub struct TabCount;

impl Extractor for TabCount {
    fn name(&self) -> &'static str {
        "tab_count"
    }
    fn category(&self) -> Category {
        Category::Layout
    }
    fn description(&self) -> &'static str {
        "Number of tab characters"
    }

    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
        let tabs = repr.text().chars().filter(|&c| c == '\t').count();
        let mut fragment = FeatureFragment::new();
        fragment.insert(feature_key(self.category(), "num_tabs"), tabs as f64);
        Ok(fragment)
    }
}

pub struct SpaceCount;

impl Extractor for SpaceCount {
    fn name(&self) -> &'static str {
        "space_count"
    }
    fn category(&self) -> Category {
        Category::Layout
    }
    fn description(&self) -> &'static str {
        "Number of space characters"
    }

    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
        let spaces = repr.text().chars().filter(|&c| c == ' ').count();
        let mut fragment = FeatureFragment::new();
        fragment.insert(feature_key(self.category(), "num_spaces"), spaces as f64);
        Ok(fragment)
    }
}

/// Lines that are empty or hold only whitespace
pub struct EmptyLines;

impl Extractor for EmptyLines {
    fn name(&self) -> &'static str {
        "empty_lines"
    }
    fn category(&self) -> Category {
        Category::Layout
    }
    fn description(&self) -> &'static str {
        "Number of blank lines"
    }

    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
        let empty = repr
            .text()
            .lines()
            .filter(|line| line.trim().is_empty())
            .count();
        let mut fragment = FeatureFragment::new();
        fragment.insert(feature_key(self.category(), "num_empty_lines"), empty as f64);
        Ok(fragment)
    }
}

/// Whitespace characters per non-whitespace character
pub struct WhitespaceRatio;

impl Extractor for WhitespaceRatio {
    fn name(&self) -> &'static str {
        "whitespace_ratio"
    }
    fn category(&self) -> Category {
        Category::Layout
    }
    fn description(&self) -> &'static str {
        "Ratio of whitespace to non-whitespace characters"
    }

    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
        let (whitespace, content) = repr.text().chars().fold((0, 0), |(ws, other), c| {
            if c.is_whitespace() {
                (ws + 1, other)
            } else {
                (ws, other + 1)
            }
        });
        let mut fragment = FeatureFragment::new();
        fragment.insert_opt(
            feature_key(self.category(), "whitespace_ratio"),
            ratio(whitespace, content),
        );
        Ok(fragment)
    }
}

/// Share of opening braces placed on their own line
pub struct BraceStyle;

impl Extractor for BraceStyle {
    fn name(&self) -> &'static str {
        "brace_style"
    }
    fn category(&self) -> Category {
        Category::Layout
    }
    fn description(&self) -> &'static str {
        "Fraction of opening braces preceded by a line break"
    }

    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
        let mut braces = 0;
        let mut on_new_line = 0;
        // Start of file counts as a line start.
        let mut at_line_start = true;

        for c in repr.text().chars() {
            match c {
                '\n' => at_line_start = true,
                ' ' | '\t' | '\r' => {}
                '{' => {
                    braces += 1;
                    if at_line_start {
                        on_new_line += 1;
                    }
                    at_line_start = false;
                }
                _ => at_line_start = false,
            }
        }

        let mut fragment = FeatureFragment::new();
        fragment.insert_opt(
            feature_key(self.category(), "newline_before_open_brace"),
            ratio(on_new_line, braces),
        );
        Ok(fragment)
    }
}

/// Share of indented lines whose indentation starts with a tab
pub struct TabIndentation;

impl Extractor for TabIndentation {
    fn name(&self) -> &'static str {
        "tab_indentation"
    }
    fn category(&self) -> Category {
        Category::Layout
    }
    fn description(&self) -> &'static str {
        "Fraction of indented lines indented with tabs"
    }

    fn extract(&self, repr: &Representation<'_>) -> Result<FeatureFragment> {
        let mut indented = 0;
        let mut tab_led = 0;
        for line in repr.text().lines() {
            if line.trim().is_empty() {
                continue;
            }
            match line.chars().next() {
                Some('\t') => {
                    indented += 1;
                    tab_led += 1;
                }
                Some(' ') => indented += 1,
                _ => {}
            }
        }

        let mut fragment = FeatureFragment::new();
        fragment.insert_opt(
            feature_key(self.category(), "tab_indented_lines"),
            ratio(tab_led, indented),
        );
        Ok(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceFile;
    use crate::parsers::represent;

    fn run(extractor: &dyn Extractor, text: &str) -> FeatureFragment {
        let source = SourceFile::new("t.java", text);
        let repr = represent(&source).unwrap();
        extractor.extract(&repr).unwrap()
    }

    const KNR: &str = "class A {\n\tvoid f() {\n\t\tint x;\n\n    }\n}\n";
    const ALLMAN: &str = "class A\n{\n    void f()\n    {\n    }\n}\n";

    #[test]
    fn test_character_counts() {
        assert_eq!(run(&TabCount, KNR).get("layout/num_tabs"), Some(3.0));
        assert_eq!(run(&SpaceCount, KNR).get("layout/num_spaces"), Some(9.0));
        assert_eq!(run(&EmptyLines, KNR).get("layout/num_empty_lines"), Some(1.0));
    }

    #[test]
    fn test_whitespace_ratio() {
        let f = run(&WhitespaceRatio, "class A {}");
        // 2 spaces, 8 other characters
        assert_eq!(f.get("layout/whitespace_ratio"), Some(0.25));
    }

    #[test]
    fn test_brace_style() {
        let knr = run(&BraceStyle, KNR);
        assert_eq!(knr.get("layout/newline_before_open_brace"), Some(0.0));
        let allman = run(&BraceStyle, ALLMAN);
        assert_eq!(allman.get("layout/newline_before_open_brace"), Some(1.0));
    }

    #[test]
    fn test_tab_indentation() {
        let f = run(&TabIndentation, KNR);
        // two tab-led lines, one space-led line
        let value = f.get("layout/tab_indented_lines").unwrap();
        assert!((value - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(
            run(&TabIndentation, ALLMAN).get("layout/tab_indented_lines"),
            Some(0.0)
        );
    }

    #[test]
    fn test_empty_file() {
        assert_eq!(run(&TabCount, "").get("layout/num_tabs"), Some(0.0));
        assert_eq!(run(&EmptyLines, "").get("layout/num_empty_lines"), Some(0.0));
        assert!(run(&WhitespaceRatio, "").is_empty());
        assert!(run(&BraceStyle, "").is_empty());
        assert!(run(&TabIndentation, "").is_empty());
    }
}
