//! Filename synthesis
//!
//! Builds the export filename stem from the extracted field values:
//! `[prefix] + values + [postfix]`, each component run through the same rule
//! chain, joined with the configured separator.

use crate::transforms::RuleChain;

/// Assembles filename stems from field values
#[derive(Debug, Clone, Default)]
pub struct FilenameCompiler {
    prefix: Option<String>,
    postfix: Option<String>,
    separator: String,
    rules: RuleChain,
}

impl FilenameCompiler {
    /// Create a compiler joining components with `separator`
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            ..Default::default()
        }
    }

    /// Set the leading component (ignored when empty)
    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix.filter(|p| !p.is_empty());
        self
    }

    /// Set the trailing component (ignored when empty)
    pub fn with_postfix(mut self, postfix: Option<String>) -> Self {
        self.postfix = postfix.filter(|p| !p.is_empty());
        self
    }

    /// Set the rules applied to every component
    pub fn with_rules(mut self, rules: RuleChain) -> Self {
        self.rules = rules;
        self
    }

    /// Separator placed between components
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Rules applied to every component
    pub fn rules(&self) -> &RuleChain {
        &self.rules
    }

    /// The ordered components before transformation
    pub fn components<'a>(&'a self, values: &'a [String]) -> Vec<&'a str> {
        self.prefix
            .as_deref()
            .into_iter()
            .chain(values.iter().map(String::as_str))
            .chain(self.postfix.as_deref())
            .collect()
    }

    /// Compile the filename stem (without extension)
    pub fn compile(&self, values: &[String]) -> String {
        let stem = self
            .components(values)
            .into_iter()
            .map(|component| self.rules.apply(component))
            .collect::<Vec<_>>()
            .join(&self.separator);

        tracing::debug!("Compiled filename stem: {}", stem);
        stem
    }
}
