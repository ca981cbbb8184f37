// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cypher keyword completion for the line editor

use rustyline::completion::Completer;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

pub const CYPHER_KEYWORDS: &[&str] = &[
    "MATCH",
    "OPTIONAL MATCH",
    "RETURN",
    "WITH",
    "WHERE",
    "UNWIND",
    "ORDER BY",
    "SKIP",
    "LIMIT",
    "CREATE",
    "DELETE",
    "SET",
    "REMOVE",
    "HEADERS FROM",
    "FOREACH",
    "MERGE",
    "CALL",
    "UNION",
    "USE",
    "LOAD CSV",
];

/// Completes the word under the cursor against [`CYPHER_KEYWORDS`].
#[derive(Debug, Clone, Copy)]
pub struct KeywordCompleter {
    words: &'static [&'static str],
}

impl Default for KeywordCompleter {
    fn default() -> Self {
        Self {
            words: CYPHER_KEYWORDS,
        }
    }
}

impl KeywordCompleter {
    /// Keywords starting with `prefix`, ignoring case
    pub fn candidates(&self, prefix: &str) -> Vec<String> {
        let upper = prefix.to_uppercase();
        self.words
            .iter()
            .filter(|w| w.starts_with(&upper))
            .map(|w| w.to_string())
            .collect()
    }
}

/// Start offset and text of the word ending at `pos`
fn word_before(line: &str, pos: usize) -> (usize, &str) {
    let head = &line[..pos];
    let start = head
        .char_indices()
        .rev()
        .find(|&(_, c)| c.is_whitespace() || c == '(' || c == ')')
        .map_or(0, |(i, c)| i + c.len_utf8());
    (start, &head[start..])
}

impl Completer for KeywordCompleter {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let (start, prefix) = word_before(line, pos);
        Ok((start, self.candidates(prefix)))
    }
}

impl Hinter for KeywordCompleter {
    type Hint = String;
}

impl Highlighter for KeywordCompleter {}

impl Validator for KeywordCompleter {}

impl Helper for KeywordCompleter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_candidates() {
        let completer = KeywordCompleter::default();
        assert_eq!(completer.candidates("MA"), vec!["MATCH"]);
        assert_eq!(completer.candidates("me"), vec!["MERGE"]);
        assert_eq!(completer.candidates("U"), vec!["UNWIND", "UNION", "USE"]);
        assert!(completer.candidates("XYZ").is_empty());
    }

    #[test]
    fn test_empty_prefix_lists_everything() {
        let completer = KeywordCompleter::default();
        assert_eq!(completer.candidates("").len(), CYPHER_KEYWORDS.len());
    }

    #[test]
    fn test_word_before_cursor() {
        assert_eq!(word_before("MATCH (n) RET", 13), (10, "RET"));
        assert_eq!(word_before("RET", 3), (0, "RET"));
        assert_eq!(word_before("MATCH (n", 8), (7, "n"));
        assert_eq!(word_before("MATCH ", 6), (6, ""));
    }

    #[test]
    fn test_word_before_multibyte_separator() {
        // U+3000 is three bytes wide
        assert_eq!(word_before("MATCH\u{3000}RE", 10), (8, "RE"));
        assert_eq!(word_before("MATCH\u{3000}", 8), (8, ""));
        assert_eq!(word_before("RETURN 'ü' OR", 14), (12, "OR"));
    }
}
