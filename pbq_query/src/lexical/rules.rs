//! Priority-ordered lexer rule table
//!
//! Each rule is a regex anchored at the current scan position. Rules are
//! tried in `RULE_ORDER`; the first one that matches consumes its match.
//! `Fallback` matches any run of non-whitespace, non-parenthesis characters,
//! so scanning always makes progress.

use regex::{Captures, Regex};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexRule {
    /// `(` or `)`
    Group,
    /// `AND`, `OR`, `NOT`, any case, ending on a word boundary
    Operator,
    /// `"phrase"[qualifier]`
    QuotedTagged,
    /// `word[qualifier]`, word made of letters, digits, `*` and `-`
    WordTagged,
    /// `"phrase"` without a qualifier
    Quoted,
    /// Anything else up to whitespace or a parenthesis
    Fallback,
}

pub const RULE_ORDER: [LexRule; 6] = [
    LexRule::Group,
    LexRule::Operator,
    LexRule::QuotedTagged,
    LexRule::WordTagged,
    LexRule::Quoted,
    LexRule::Fallback,
];

impl LexRule {
    pub fn name(&self) -> &'static str {
        match self {
            LexRule::Group => "group",
            LexRule::Operator => "operator",
            LexRule::QuotedTagged => "quoted_tagged",
            LexRule::WordTagged => "word_tagged",
            LexRule::Quoted => "quoted",
            LexRule::Fallback => "fallback",
        }
    }

    fn pattern(&self) -> &'static str {
        match self {
            LexRule::Group => r"^[()]",
            LexRule::Operator => r"^(?i:AND|OR|NOT)\b",
            LexRule::QuotedTagged => r#"^"([^"]*)"(\[[^\]]+\])"#,
            LexRule::WordTagged => r"^([\p{L}\p{N}*\-]+)(\[[^\]]+\])",
            LexRule::Quoted => r#"^"([^"]*)""#,
            LexRule::Fallback => r"^[^\s()]+",
        }
    }
}

struct CompiledRule {
    rule: LexRule,
    regex: Regex,
}

static RULE_TABLE: OnceLock<Vec<CompiledRule>> = OnceLock::new();

fn rule_table() -> &'static [CompiledRule] {
    RULE_TABLE.get_or_init(|| {
        RULE_ORDER
            .iter()
            .map(|rule| CompiledRule {
                rule: *rule,
                regex: Regex::new(rule.pattern()).expect("lexer rule patterns are valid"),
            })
            .collect()
    })
}

/// The rule that matched at a scan position and what it captured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    pub rule: LexRule,
    /// Full matched text
    pub text: &'a str,
    /// Term or phrase without quotes or qualifier
    pub term: &'a str,
    /// Bracketed qualifier, brackets included
    pub qualifier: Option<&'a str>,
}

/// Try every rule in priority order against the start of `input`.
///
/// Returns `None` only for empty input or input starting with whitespace.
pub fn match_rule(input: &str) -> Option<RuleMatch<'_>> {
    rule_table().iter().find_map(|compiled| {
        compiled
            .regex
            .captures(input)
            .map(|captures| build_match(compiled.rule, &captures, input))
    })
}

fn build_match<'a>(rule: LexRule, captures: &Captures<'a>, input: &'a str) -> RuleMatch<'a> {
    let text = captures.get(0).map_or(&input[..0], |m| m.as_str());
    let term = captures.get(1).map_or(text, |m| m.as_str());
    let qualifier = captures.get(2).map(|m| m.as_str());

    RuleMatch {
        rule,
        text,
        term,
        qualifier,
    }
}
