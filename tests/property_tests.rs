//! Property-based tests for column alignment and template rendering.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Aligned columns start at the same offset on every line of a block
//! - Alignment never changes cell text, only the padding between cells
//! - Lenient rendering of a plain substitution reproduces the argument

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use embedfs::{ColumnLayout, ColumnWriter, MemoryStore, TemplateReader};
use proptest::prelude::*;
use std::io::Write;

fn align(input: &str, layout: ColumnLayout) -> String {
    let mut writer = ColumnWriter::new(Vec::new(), layout);
    writer.write_all(input.as_bytes()).unwrap();
    String::from_utf8(writer.into_inner().unwrap()).unwrap()
}

/// Rows of two ASCII cells without separators.
fn rows_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-zA-Z0-9]{0,20}", "[a-zA-Z0-9]{1,10}"), 1..20)
}

proptest! {
    /// Property: the second column starts at the same offset on every line.
    #[test]
    fn prop_second_column_is_aligned(
        rows in rows_strategy(),
        padding in 0usize..10,
        min_width in 0usize..16,
    ) {
        let layout = ColumnLayout { min_width, tab_width: 8, padding, pad_char: ' ' };
        let input: String = rows.iter().map(|(a, b)| format!("{a}\t{b}\n")).collect();
        let output = align(&input, layout);

        let widest = rows.iter().map(|(a, _)| a.len()).max().unwrap_or(0);
        let expected_offset = (widest + padding).max(min_width);

        let lines: Vec<&str> = output.lines().collect();
        prop_assert_eq!(lines.len(), rows.len());
        for (line, (first, second)) in lines.iter().zip(&rows) {
            prop_assert_eq!(line.len(), expected_offset + second.len());
            prop_assert!(line.starts_with(first.as_str()));
            prop_assert!(line.ends_with(second.as_str()));
            prop_assert!(line[first.len()..expected_offset].chars().all(|c| c == ' '));
        }
    }

    /// Property: removing padding recovers the original cells.
    #[test]
    fn prop_alignment_preserves_cells(rows in rows_strategy()) {
        let layout = ColumnLayout { min_width: 0, tab_width: 8, padding: 1, pad_char: '.' };
        let input: String = rows.iter().map(|(a, b)| format!("{a}\t{b}\n")).collect();
        let output = align(&input, layout);

        for (line, (first, second)) in output.lines().zip(&rows) {
            let trimmed = line.strip_suffix(second.as_str()).unwrap();
            prop_assert_eq!(trimmed.trim_end_matches('.'), first.as_str());
        }
    }

    /// Property: a plain substitution reproduces its argument exactly.
    #[test]
    fn prop_render_reproduces_argument(name in "[a-zA-Z0-9 ,.!?<>&]{0,40}") {
        let store = MemoryStore::new().with_file("t/name.tmpl", "Name: {{Name}}");
        let reader = TemplateReader::new("t", store);
        let out = reader
            .render_template_bytes(&serde_json::json!({ "Name": name }), "", "name.tmpl")
            .unwrap();
        prop_assert_eq!(out, format!("Name: {name}").into_bytes());
    }
}
