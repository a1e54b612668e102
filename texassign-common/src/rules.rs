//! Channel matching rules
//!
//! A [`ChannelRule`] decides which filenames are candidates for a channel
//! (primary pattern, optional exclude pattern) and carries two ordered lists
//! of [`TieBreak`] rules used to rank those candidates.
//!
//! Rules exist in two forms:
//! - **Compiled** ([`ChannelRule`], [`TieBreak`]) - regexes ready to match
//! - **Spec** ([`ChannelRuleSpec`], [`RuleSpec`]) - plain strings, as stored in TOML
//!
//! All patterns are case-insensitive and unanchored.

use crate::{Channel, Error, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compile a pattern the way every rule pattern is compiled
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Sort direction of a numeric tie-break
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Smallest value first (e.g. LOD0 before LOD1)
    Ascending,
    /// Largest value first
    Descending,
}

/// One tie-break rule
#[derive(Debug, Clone)]
pub enum TieBreak {
    /// Claims filenames for which `pattern` matching equals `present`
    Exists { pattern: Regex, present: bool },
    /// Claims filenames whose capture group 1 parses as an integer,
    /// ordered by that integer
    Numeric { pattern: Regex, order: SortOrder },
}

impl TieBreak {
    /// Claim filenames matching `pattern`
    pub fn present(pattern: &str) -> Result<Self> {
        Ok(TieBreak::Exists {
            pattern: compile_pattern(pattern)?,
            present: true,
        })
    }

    /// Claim filenames not matching `pattern`
    pub fn absent(pattern: &str) -> Result<Self> {
        Ok(TieBreak::Exists {
            pattern: compile_pattern(pattern)?,
            present: false,
        })
    }

    /// Claim filenames carrying a number, smallest first
    pub fn ascending(pattern: &str) -> Result<Self> {
        Self::numeric(pattern, SortOrder::Ascending)
    }

    /// Claim filenames carrying a number, largest first
    pub fn descending(pattern: &str) -> Result<Self> {
        Self::numeric(pattern, SortOrder::Descending)
    }

    fn numeric(pattern: &str, order: SortOrder) -> Result<Self> {
        let regex = compile_pattern(pattern)?;
        if regex.captures_len() < 2 {
            return Err(Error::InvalidInput(format!(
                "Numeric rule pattern '{}' has no capture group",
                pattern
            )));
        }
        Ok(TieBreak::Numeric {
            pattern: regex,
            order,
        })
    }

    /// Integer captured by a numeric rule, if any
    ///
    /// Returns `None` for existence rules and for names where the capture is
    /// missing or does not fit a `u64`.
    pub fn extract_value(&self, name: &str) -> Option<u64> {
        match self {
            TieBreak::Numeric { pattern, .. } => pattern
                .captures(name)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<u64>().ok()),
            TieBreak::Exists { .. } => None,
        }
    }

    /// Whether an existence rule claims `name`
    pub fn admits(&self, name: &str) -> bool {
        match self {
            TieBreak::Exists { pattern, present } => pattern.is_match(name) == *present,
            TieBreak::Numeric { .. } => self.extract_value(name).is_some(),
        }
    }

    /// Serialisable form
    pub fn to_spec(&self) -> RuleSpec {
        match self {
            TieBreak::Exists { pattern, present: true } => RuleSpec::Present {
                pattern: pattern.as_str().to_string(),
            },
            TieBreak::Exists { pattern, present: false } => RuleSpec::Absent {
                pattern: pattern.as_str().to_string(),
            },
            TieBreak::Numeric {
                pattern,
                order: SortOrder::Ascending,
            } => RuleSpec::Ascending {
                pattern: pattern.as_str().to_string(),
            },
            TieBreak::Numeric {
                pattern,
                order: SortOrder::Descending,
            } => RuleSpec::Descending {
                pattern: pattern.as_str().to_string(),
            },
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TieBreak::Exists { pattern, present } => {
                let verb = if *present { "present" } else { "absent" };
                write!(f, "{} /{}/", verb, pattern.as_str())
            }
            TieBreak::Numeric { pattern, order } => {
                let verb = match order {
                    SortOrder::Ascending => "ascending",
                    SortOrder::Descending => "descending",
                };
                write!(f, "{} /{}/", verb, pattern.as_str())
            }
        }
    }
}

/// Compiled matching rule for one channel
#[derive(Debug, Clone)]
pub struct ChannelRule {
    pub channel: Channel,
    primary: Option<Regex>,
    exclude: Option<Regex>,
    pub primary_rules: Vec<TieBreak>,
    pub secondary_rules: Vec<TieBreak>,
}

impl ChannelRule {
    /// Rule selecting filenames that match `pattern`
    pub fn new(channel: Channel, pattern: &str) -> Result<Self> {
        Ok(Self {
            channel,
            primary: Some(compile_pattern(pattern)?),
            exclude: None,
            primary_rules: Vec::new(),
            secondary_rules: Vec::new(),
        })
    }

    /// Rule that never selects anything
    pub fn disabled(channel: Channel) -> Self {
        Self {
            channel,
            primary: None,
            exclude: None,
            primary_rules: Vec::new(),
            secondary_rules: Vec::new(),
        }
    }

    /// Reject filenames matching `pattern` even if the primary pattern matches
    pub fn with_exclude(mut self, pattern: &str) -> Result<Self> {
        self.exclude = Some(compile_pattern(pattern)?);
        Ok(self)
    }

    pub fn with_primary_rules(mut self, rules: Vec<TieBreak>) -> Self {
        self.primary_rules = rules;
        self
    }

    pub fn with_secondary_rules(mut self, rules: Vec<TieBreak>) -> Self {
        self.secondary_rules = rules;
        self
    }

    /// False for rules built with [`ChannelRule::disabled`]
    pub fn is_enabled(&self) -> bool {
        self.primary.is_some()
    }

    pub fn pattern(&self) -> Option<&str> {
        self.primary.as_ref().map(|r| r.as_str())
    }

    pub fn exclude_pattern(&self) -> Option<&str> {
        self.exclude.as_ref().map(|r| r.as_str())
    }

    /// Whether `name` is a candidate for this channel at all
    pub fn is_candidate(&self, name: &str) -> bool {
        let Some(primary) = &self.primary else {
            return false;
        };
        if !primary.is_match(name) {
            return false;
        }
        match &self.exclude {
            Some(exclude) => !exclude.is_match(name),
            None => true,
        }
    }

    /// Serialisable form
    pub fn to_spec(&self) -> ChannelRuleSpec {
        ChannelRuleSpec {
            channel: self.channel,
            pattern: self.pattern().map(str::to_string),
            exclude: self.exclude_pattern().map(str::to_string),
            primary: self.primary_rules.iter().map(TieBreak::to_spec).collect(),
            secondary: self.secondary_rules.iter().map(TieBreak::to_spec).collect(),
        }
    }
}

/// Serialisable tie-break rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleSpec {
    Present { pattern: String },
    Absent { pattern: String },
    Ascending { pattern: String },
    Descending { pattern: String },
}

impl RuleSpec {
    pub fn compile(&self) -> Result<TieBreak> {
        match self {
            RuleSpec::Present { pattern } => TieBreak::present(pattern),
            RuleSpec::Absent { pattern } => TieBreak::absent(pattern),
            RuleSpec::Ascending { pattern } => TieBreak::ascending(pattern),
            RuleSpec::Descending { pattern } => TieBreak::descending(pattern),
        }
    }
}

/// Serialisable channel rule
///
/// A missing `pattern` describes a disabled rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRuleSpec {
    pub channel: Channel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub primary: Vec<RuleSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary: Vec<RuleSpec>,
}

impl ChannelRuleSpec {
    pub fn compile(&self) -> Result<ChannelRule> {
        let mut rule = match &self.pattern {
            Some(pattern) => ChannelRule::new(self.channel, pattern)?,
            None => ChannelRule::disabled(self.channel),
        };
        if let Some(exclude) = &self.exclude {
            rule = rule.with_exclude(exclude)?;
        }
        let primary = self
            .primary
            .iter()
            .map(RuleSpec::compile)
            .collect::<Result<Vec<_>>>()?;
        let secondary = self
            .secondary
            .iter()
            .map(RuleSpec::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(rule.with_primary_rules(primary).with_secondary_rules(secondary))
    }
}
