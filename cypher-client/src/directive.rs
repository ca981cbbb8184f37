// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Input line classification

/// Export statement that `:dump` stands for.
pub const DUMP_STATEMENT: &str = r#"CALL apoc.export.cypher.all("all.cypher", {})"#;

/// Client-local control commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    Begin,
    Commit,
    Rollback,
    Dump,
    Exit,
}

impl Directive {
    /// Token typed by the user
    pub fn token(self) -> &'static str {
        match self {
            Directive::Begin => ":begin",
            Directive::Commit => ":commit",
            Directive::Rollback => ":rollback",
            Directive::Dump => ":dump",
            Directive::Exit => ":exit",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            ":begin" => Some(Directive::Begin),
            ":commit" => Some(Directive::Commit),
            ":rollback" => Some(Directive::Rollback),
            ":dump" => Some(Directive::Dump),
            ":exit" => Some(Directive::Exit),
            _ => None,
        }
    }
}

/// A classified input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Blank,
    Directive(Directive),
    Statement(String),
}

impl Input {
    /// Classify a raw line. Directive tokens are case-sensitive and must be
    /// the whole trimmed line.
    pub fn classify(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Input::Blank;
        }
        match Directive::from_token(trimmed) {
            Some(directive) => Input::Directive(directive),
            None => Input::Statement(trimmed.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines() {
        assert_eq!(Input::classify(""), Input::Blank);
        assert_eq!(Input::classify("   \t  "), Input::Blank);
        assert_eq!(Input::classify("\n"), Input::Blank);
    }

    #[test]
    fn test_directives_with_surrounding_whitespace() {
        assert_eq!(Input::classify(":begin"), Input::Directive(Directive::Begin));
        assert_eq!(Input::classify("  :commit \n"), Input::Directive(Directive::Commit));
        assert_eq!(Input::classify(":rollback"), Input::Directive(Directive::Rollback));
        assert_eq!(Input::classify(":dump"), Input::Directive(Directive::Dump));
        assert_eq!(Input::classify("\t:exit"), Input::Directive(Directive::Exit));
    }

    #[test]
    fn test_directives_are_case_sensitive() {
        assert_eq!(
            Input::classify(":BEGIN"),
            Input::Statement(":BEGIN".to_string())
        );
    }

    #[test]
    fn test_no_partial_directive_matches() {
        assert_eq!(
            Input::classify(":begin now"),
            Input::Statement(":begin now".to_string())
        );
        assert_eq!(Input::classify(":beg"), Input::Statement(":beg".to_string()));
    }

    #[test]
    fn test_statement_is_trimmed() {
        assert_eq!(
            Input::classify("  MATCH (n) RETURN n LIMIT 1  "),
            Input::Statement("MATCH (n) RETURN n LIMIT 1".to_string())
        );
    }

    #[test]
    fn test_token_round_trip() {
        for d in [
            Directive::Begin,
            Directive::Commit,
            Directive::Rollback,
            Directive::Dump,
            Directive::Exit,
        ] {
            assert_eq!(Input::classify(d.token()), Input::Directive(d));
        }
    }
}
