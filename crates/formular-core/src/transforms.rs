//! Transformation rules
//!
//! A transformation rule rewrites a filename component with a regular
//! expression. Replacements reference capture groups with `$N`:
//!
//! ```json
//! "transformations": [
//!   { "pattern": "(\\d{2})\\.(\\d{2})\\.(\\d{4})", "replacement": "$3-$2-$1" },
//!   { "pattern": "\\s+", "replacement": "-" }
//! ]
//! ```
//!
//! Rules run in order, each one over the output of the previous one, and every
//! match is replaced. All rules are validated when the chain is compiled, so a
//! broken rule is reported before any component is touched.
//!
//! # Replacement syntax
//!
//! - `$N` takes every digit that follows the dollar sign (`$12` is group 12).
//! - `$0` is the whole match.
//! - A `$` that is not followed by a digit is a literal dollar sign.
//!
//! Inline flags such as `(?i)` can be embedded in the pattern itself.

use std::borrow::Cow;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A pattern/replacement pair as written in the configuration
///
/// Both keys are optional at the serde level so that a missing key surfaces as
/// a rule validation error naming the rule, rather than a generic parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformationRule {
    /// Regular expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Replacement template with `$N` backreferences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

impl TransformationRule {
    /// Create a rule from a pattern and a replacement
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            replacement: Some(replacement.into()),
        }
    }

    /// Validate the rule and prepare it for application
    ///
    /// `index` is the rule's 1-based position, used in error messages.
    pub fn compile(&self, index: usize) -> Result<CompiledRule> {
        let pattern = self
            .pattern
            .as_deref()
            .ok_or(Error::MissingRuleKey { index, key: "pattern" })?;
        let replacement = self
            .replacement
            .as_deref()
            .ok_or(Error::MissingRuleKey {
                index,
                key: "replacement",
            })?;

        let regex = Regex::new(pattern).map_err(|e| Error::InvalidRegex {
            index,
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        let segments = parse_replacement(replacement);
        let groups = regex.captures_len() - 1;

        let mut references = Vec::new();
        for segment in &segments {
            if let Segment::Group(n) = *segment
                && n > groups
                && !references.contains(&n)
            {
                references.push(n);
            }
        }
        if !references.is_empty() {
            return Err(Error::InvalidBackreference {
                index,
                pattern: pattern.to_string(),
                groups,
                references,
            });
        }

        Ok(CompiledRule {
            index,
            regex,
            replacement: to_regex_syntax(&segments),
        })
    }
}

/// A validated rule, ready to apply
#[derive(Debug, Clone)]
pub struct CompiledRule {
    index: usize,
    regex: Regex,
    replacement: String,
}

impl CompiledRule {
    /// 1-based position in the configured rule list
    pub fn index(&self) -> usize {
        self.index
    }

    /// The compiled pattern
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Replacement in the `regex` crate's syntax
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace every non-overlapping match in `subject`
    pub fn apply<'a>(&self, subject: &'a str) -> Cow<'a, str> {
        self.regex.replace_all(subject, self.replacement.as_str())
    }
}

/// An ordered list of validated rules
#[derive(Debug, Clone, Default)]
pub struct RuleChain {
    rules: Vec<CompiledRule>,
}

impl RuleChain {
    /// Validate every rule, in order, and build the chain
    pub fn compile(rules: &[TransformationRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .enumerate()
            .map(|(i, rule)| rule.compile(i + 1))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Number of rules in the chain
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the chain is the identity transform
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The compiled rules, in application order
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Run every rule over `subject`, feeding each output to the next rule
    pub fn apply(&self, subject: &str) -> String {
        let mut current = subject.to_string();
        for rule in &self.rules {
            let next = rule.apply(&current).into_owned();
            if next != current {
                tracing::debug!("Rule #{} rewrote '{}' to '{}'", rule.index, current, next);
                current = next;
            }
        }
        current
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Group(usize),
}

fn parse_replacement(replacement: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = replacement;

    while let Some(pos) = rest.find('$') {
        let digits = rest[pos + 1..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        if digits == 0 {
            segments.push(Segment::Literal(&rest[..=pos]));
            rest = &rest[pos + 1..];
            continue;
        }

        if pos > 0 {
            segments.push(Segment::Literal(&rest[..pos]));
        }
        // Out-of-range numbers saturate so they are reported as invalid
        let group = rest[pos + 1..pos + 1 + digits]
            .parse()
            .unwrap_or(usize::MAX);
        segments.push(Segment::Group(group));
        rest = &rest[pos + 1 + digits..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Literal(rest));
    }
    segments
}

fn to_regex_syntax(segments: &[Segment<'_>]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(&text.replace('$', "$$")),
            Segment::Group(n) => out.push_str(&format!("${{{}}}", n)),
        }
    }
    out
}
