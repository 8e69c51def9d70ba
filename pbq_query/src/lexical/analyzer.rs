//! Lexical analyzer for boolean search queries
//!
//! Scans left to right, skipping whitespace and letting the rule table decide
//! each token. The analyzer never fails: text that no specific rule accepts
//! becomes an untagged free-text token.

use super::rules::{match_rule, LexRule, RuleMatch};
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::{classify_qualifier, is_known_qualifier, Token, TokenId, TokenKind, TokenStream};
use crate::utils::{Position, SourceMap, Span};
use crate::{log_debug, log_info, log_success, log_warning};
use std::collections::HashMap;

/// Counts collected during one tokenization
#[derive(Debug, Default, Clone)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub mesh_tokens: usize,
    pub text_tokens: usize,
    pub operator_tokens: usize,
    pub filter_tokens: usize,
    pub group_tokens: usize,
    pub tagged_tokens: usize,
    pub fallback_fragments: usize,
    pub unknown_qualifiers: usize,

    /// Hits per rule name, only filled with detailed metrics enabled
    pub rule_hits: HashMap<&'static str, usize>,
}

impl LexicalMetrics {
    pub(crate) fn record_token(
        &mut self,
        token: &Token,
        rule: LexRule,
        preferences: &LexicalPreferences,
    ) {
        self.total_tokens += 1;

        match token.kind {
            TokenKind::Mesh => self.mesh_tokens += 1,
            TokenKind::Text => self.text_tokens += 1,
            TokenKind::Operator => self.operator_tokens += 1,
            TokenKind::Filter => self.filter_tokens += 1,
            TokenKind::Group => self.group_tokens += 1,
        }

        if token.is_tagged() {
            self.tagged_tokens += 1;
        }

        if rule == LexRule::Fallback {
            self.fallback_fragments += 1;
        }

        if preferences.collect_detailed_metrics {
            *self.rule_hits.entry(rule.name()).or_insert(0) += 1;
        }
    }

    pub fn term_tokens(&self) -> usize {
        self.mesh_tokens + self.text_tokens + self.filter_tokens
    }
}

pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    /// Metrics of the most recent `tokenize` call
    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    /// Tokenize a query. Empty or whitespace-only input yields an empty stream.
    pub fn tokenize(&mut self, query: &str) -> TokenStream {
        self.metrics = LexicalMetrics::default();

        log_debug!("Starting lexical analysis",
            "byte_length" => query.len()
        );

        let mut tokens = Vec::new();
        let mut position = Position::start();
        let mut next_id = TokenId(0);

        while position.offset < query.len() {
            let rest = &query[position.offset..];

            let whitespace: usize = rest
                .chars()
                .take_while(|c| c.is_whitespace())
                .map(char::len_utf8)
                .sum();
            if whitespace > 0 {
                position = position.advance_str(&rest[..whitespace]);
                continue;
            }

            let Some(matched) = match_rule(rest) else {
                // Unreachable while the fallback rule accepts every
                // non-whitespace character; consume one char to stay total
                let ch = rest.chars().next().unwrap_or(' ');
                position = position.advance(ch);
                continue;
            };

            let end = position.advance_str(matched.text);
            let span = Span::new(position, end);
            let token = self.build_token(next_id, &matched, span);

            self.metrics
                .record_token(&token, matched.rule, &self.preferences);

            if matched.rule == LexRule::Fallback {
                self.inspect_fallback(&token);
            }

            tokens.push(token);
            next_id = next_id.next();
            position = end;
        }

        log_success!(
            codes::success::TOKENIZATION_COMPLETE,
            "Query tokenization completed",
            "tokens" => self.metrics.total_tokens,
            "terms" => self.metrics.term_tokens(),
            "operators" => self.metrics.operator_tokens,
            "fallback_fragments" => self.metrics.fallback_fragments
        );

        if self.preferences.log_tokenization_summary {
            log_info!("Tokenization summary",
                "mesh" => self.metrics.mesh_tokens,
                "text" => self.metrics.text_tokens,
                "filter" => self.metrics.filter_tokens,
                "group" => self.metrics.group_tokens,
                "tagged" => self.metrics.tagged_tokens,
                "unknown_qualifiers" => self.metrics.unknown_qualifiers
            );
        }

        TokenStream::with_source_map(tokens, SourceMap::new(query))
    }

    fn build_token(&mut self, id: TokenId, matched: &RuleMatch<'_>, span: Span) -> Token {
        let (value, kind, tag) = match matched.rule {
            LexRule::Group => (matched.text.to_string(), TokenKind::Group, None),
            LexRule::Operator => (matched.text.to_uppercase(), TokenKind::Operator, None),
            LexRule::QuotedTagged | LexRule::WordTagged => {
                let qualifier = matched.qualifier.unwrap_or_default();
                if !is_known_qualifier(qualifier) {
                    self.metrics.unknown_qualifiers += 1;
                    log_debug!("Unknown field qualifier treated as free text",
                        "qualifier" => qualifier
                    );
                }
                (
                    matched.term.to_string(),
                    classify_qualifier(qualifier),
                    Some(qualifier.to_string()),
                )
            }
            LexRule::Quoted | LexRule::Fallback => {
                (matched.term.to_string(), TokenKind::Text, None)
            }
        };

        Token::new(id, value, kind, tag, matched.text, span)
    }

    /// Warn about fallback fragments that look like broken terms
    fn inspect_fallback(&self, token: &Token) {
        if !self.preferences.log_fallback_fragments {
            return;
        }

        let stray_bracket = token.original.contains('[');
        let odd_quotes = token.original.matches('"').count() % 2 == 1;

        if stray_bracket || odd_quotes {
            log_warning!(
                codes::lexical::FALLBACK_FRAGMENT,
                "Fragment did not match any term rule",
                span = token.span,
                "fragment" => token.original.as_str(),
                "stray_bracket" => stray_bracket,
                "unbalanced_quote" => odd_quotes
            );
        }
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signatures(stream: &TokenStream) -> Vec<(TokenKind, String, Option<String>)> {
        stream
            .iter()
            .map(|t| (t.kind, t.value.clone(), t.tag.clone()))
            .collect()
    }

    #[test]
    fn test_tagged_terms_and_operator() {
        let mut analyzer = LexicalAnalyzer::new();
        let stream = analyzer.tokenize("\"diabetes\"[tiab] AND \"insulin\"[Mesh]");

        assert_eq!(
            signatures(&stream),
            vec![
                (TokenKind::Text, "diabetes".into(), Some("[tiab]".into())),
                (TokenKind::Operator, "AND".into(), None),
                (TokenKind::Mesh, "insulin".into(), Some("[Mesh]".into())),
            ]
        );
        assert_eq!(analyzer.metrics().tagged_tokens, 2);
        assert_eq!(analyzer.metrics().operator_tokens, 1);
    }

    #[test]
    fn test_operator_value_is_uppercased_original_kept() {
        let stream = LexicalAnalyzer::new().tokenize("a or b");
        let op = stream.get(1).unwrap();
        assert_eq!(op.value, "OR");
        assert_eq!(op.original, "or");
    }

    #[test]
    fn test_spans_and_ids() {
        let stream = LexicalAnalyzer::new().tokenize("(asthma[mh]\n OR x)");
        let ids: Vec<u32> = stream.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);

        let op = stream.get(2).unwrap();
        assert_eq!(op.span.start.offset, 13);
        assert_eq!(op.span.start.line, 2);
        assert_eq!(op.span.start.column, 2);
        assert_eq!(op.span.slice("(asthma[mh]\n OR x)"), "OR");
    }

    #[test]
    fn test_fallback_metrics_and_rule_hits() {
        let preferences = LexicalPreferences {
            collect_detailed_metrics: true,
            log_fallback_fragments: true,
            log_tokenization_summary: true,
        };
        let mut analyzer = LexicalAnalyzer::with_preferences(preferences);
        let stream = analyzer.tokenize("\"open phrase AND x[nm] [broken");

        assert_eq!(stream.len(), 5);
        let metrics = analyzer.metrics();
        assert_eq!(metrics.fallback_fragments, 3);
        assert_eq!(metrics.unknown_qualifiers, 1);
        assert_eq!(metrics.rule_hits.get("fallback"), Some(&3));
        assert_eq!(metrics.rule_hits.get("word_tagged"), Some(&1));
    }

    #[test]
    fn test_every_non_whitespace_character_is_covered() {
        let query = " ((a[tiab] OR \"b c\")) NOT d-e* \"x\"[la] ?? ";
        let stream = LexicalAnalyzer::new().tokenize(query);

        let covered: String = stream.iter().map(|t| t.original.as_str()).collect();
        let expected: String = query.chars().filter(|c| !c.is_whitespace()).collect();
        let covered: String = covered.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(covered, expected);
    }
}
