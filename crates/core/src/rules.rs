//! Card network rule table and prefix detection.

use thiserror::Error;

use crate::types::{CardTypeRule, DEFAULT_GROUPS, UNKNOWN_NETWORK};

/// Reasons a rule cannot be added to a [`RuleTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("network name must not be empty")]
    EmptyName,

    #[error("network name `{0}` is reserved for the fallback rule")]
    ReservedName(String),

    #[error("network `{0}` is defined more than once")]
    DuplicateName(String),

    #[error("network `{0}` has no digit groups")]
    NoGroups(String),

    #[error("network `{0}` has a zero-length digit group")]
    EmptyGroup(String),

    #[error("network `{0}` has no prefixes")]
    NoPrefixes(String),

    #[error("network `{name}` has invalid prefix `{prefix}` (digits only)")]
    InvalidPrefix { name: String, prefix: String },
}

/// Fixed, ordered table of known networks plus the fallback rule.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<CardTypeRule>,
    fallback: CardTypeRule,
}

impl RuleTable {
    /// Build a table from named rules in registration order.
    pub fn new(rules: Vec<CardTypeRule>) -> Result<Self, RuleError> {
        let mut table = Self {
            rules: Vec::with_capacity(rules.len()),
            fallback: CardTypeRule::unknown(),
        };
        for rule in rules {
            table.push(rule)?;
        }
        Ok(table)
    }

    /// The networks the checkout form recognises out of the box.
    pub fn builtin() -> Self {
        Self {
            rules: vec![
                CardTypeRule::new("visa", &DEFAULT_GROUPS, &["4"]),
                CardTypeRule::new(
                    "mastercard",
                    &DEFAULT_GROUPS,
                    &["51", "52", "53", "54", "55"],
                ),
                CardTypeRule::new("discover", &DEFAULT_GROUPS, &["6011"]),
                CardTypeRule::new("amex", &[4, 6, 5], &["34", "37"]),
            ],
            fallback: CardTypeRule::unknown(),
        }
    }

    /// Append a rule after the existing ones.
    pub fn push(&mut self, rule: CardTypeRule) -> Result<(), RuleError> {
        validate(&rule)?;
        if self.rules.iter().any(|r| r.name == rule.name) {
            return Err(RuleError::DuplicateName(rule.name));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Named rules in registration order (fallback excluded).
    pub fn rules(&self) -> &[CardTypeRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &CardTypeRule {
        &self.fallback
    }

    /// Look up a rule by name, including the fallback.
    pub fn get(&self, name: &str) -> Option<&CardTypeRule> {
        if name == self.fallback.name {
            return Some(&self.fallback);
        }
        self.rules.iter().find(|r| r.name == name)
    }

    /// Pick the rule for a (possibly partially typed) card number.
    ///
    /// Separators are ignored. The longest matching prefix wins; on equal
    /// length the rule registered first wins. Returns the fallback rule when
    /// nothing matches.
    pub fn detect_type(&self, number: &str) -> &CardTypeRule {
        let digits: String = number.chars().filter(|c| !c.is_whitespace()).collect();

        let mut best: Option<(&CardTypeRule, usize)> = None;
        for rule in &self.rules {
            if let Some(len) = rule.matching_prefix_len(&digits) {
                match best {
                    Some((_, best_len)) if best_len >= len => {}
                    _ => best = Some((rule, len)),
                }
            }
        }

        best.map(|(rule, _)| rule).unwrap_or(&self.fallback)
    }

    /// Pairs of rules whose prefixes overlap (one prefix starts with the other).
    ///
    /// Overlaps are legal, longest prefix wins, but usually indicate a
    /// mistake in a custom rule file.
    pub fn overlapping_prefixes(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        for (i, a) in self.rules.iter().enumerate() {
            for b in &self.rules[i + 1..] {
                let overlaps = a.prefixes.iter().any(|pa| {
                    b.prefixes
                        .iter()
                        .any(|pb| pa.starts_with(pb.as_str()) || pb.starts_with(pa.as_str()))
                });
                if overlaps {
                    out.push((a.name.as_str(), b.name.as_str()));
                }
            }
        }
        out
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate(rule: &CardTypeRule) -> Result<(), RuleError> {
    if rule.name.trim().is_empty() {
        return Err(RuleError::EmptyName);
    }
    if rule.name == UNKNOWN_NETWORK {
        return Err(RuleError::ReservedName(rule.name.clone()));
    }
    if rule.digit_groups.is_empty() {
        return Err(RuleError::NoGroups(rule.name.clone()));
    }
    if rule.digit_groups.contains(&0) {
        return Err(RuleError::EmptyGroup(rule.name.clone()));
    }
    if rule.prefixes.is_empty() {
        return Err(RuleError::NoPrefixes(rule.name.clone()));
    }
    if let Some(bad) = rule
        .prefixes
        .iter()
        .find(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(RuleError::InvalidPrefix {
            name: rule.name.clone(),
            prefix: bad.clone(),
        });
    }
    Ok(())
}
