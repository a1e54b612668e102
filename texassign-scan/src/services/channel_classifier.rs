//! Channel classifier
//!
//! Ranks the filenames of a folder for one shader channel.
//!
//! **Algorithm:**
//! 1. Keep the filenames the channel's primary pattern selects
//! 2. Each primary tie-break claims the remaining names it admits into its own
//!    priority bucket; unclaimed names form a final leftover bucket
//! 3. Each secondary tie-break claims the names it admits across all buckets,
//!    in bucket order, and appends them to the output
//! 4. Whatever the secondary rules left is appended bucket by bucket
//!
//! Existence claims keep input order. Numeric claims are stably sorted by the
//! captured integer, so ties keep their bucket-relative order. A numeric rule
//! that cannot extract a value from a name does not claim it.

use crate::models::preset::PresetField;
use serde::Serialize;
use texassign_common::{Channel, ChannelRule, SortOrder, TieBreak};

/// Ordered candidates for one preset field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMatches {
    pub title: String,
    pub channel: Channel,
    /// Most preferred first
    pub candidates: Vec<String>,
}

impl FieldMatches {
    /// The assignment: the top candidate, if any
    pub fn best(&self) -> Option<&str> {
        self.candidates.first().map(String::as_str)
    }
}

/// Rule-based filename classifier
pub struct ChannelClassifier;

impl ChannelClassifier {
    /// Candidates for `rule` among `names`, most preferred first
    ///
    /// Duplicate names are reported once.
    pub fn ordered_matches<S: AsRef<str>>(rule: &ChannelRule, names: &[S]) -> Vec<String> {
        let mut remaining: Vec<&str> = Vec::new();
        for name in names {
            let name = name.as_ref();
            if rule.is_candidate(name) && !remaining.contains(&name) {
                remaining.push(name);
            }
        }

        if remaining.is_empty() {
            return Vec::new();
        }

        let mut buckets: Vec<Vec<&str>> = Vec::with_capacity(rule.primary_rules.len() + 1);
        for tie_break in &rule.primary_rules {
            let (mut claimed, rest) = partition(tie_break, remaining);
            sort_claimed(tie_break, &mut claimed);
            buckets.push(claimed);
            remaining = rest;
        }
        buckets.push(remaining);

        let mut ordered: Vec<&str> = Vec::new();
        for tie_break in &rule.secondary_rules {
            let mut claimed_all = Vec::new();
            for bucket in buckets.iter_mut() {
                let (claimed, rest) = partition(tie_break, std::mem::take(bucket));
                claimed_all.extend(claimed);
                *bucket = rest;
            }
            sort_claimed(tie_break, &mut claimed_all);
            ordered.extend(claimed_all);
        }
        ordered.extend(buckets.into_iter().flatten());

        tracing::debug!(
            channel = %rule.channel,
            candidates = ordered.len(),
            "Ranked channel candidates"
        );

        ordered.into_iter().map(str::to_string).collect()
    }

    /// Ordered candidates for every field, in field order
    pub fn classify<S: AsRef<str>>(fields: &[PresetField], names: &[S]) -> Vec<FieldMatches> {
        fields
            .iter()
            .map(|field| FieldMatches {
                title: field.title.clone(),
                channel: field.rule.channel,
                candidates: Self::ordered_matches(&field.rule, names),
            })
            .collect()
    }
}

/// Split `names` into (claimed, unclaimed), both in input order
fn partition<'n>(rule: &TieBreak, names: Vec<&'n str>) -> (Vec<&'n str>, Vec<&'n str>) {
    names.into_iter().partition(|name| rule.admits(name))
}

/// Order names claimed by a numeric rule; existence claims stay as they are
fn sort_claimed(rule: &TieBreak, claimed: &mut Vec<&str>) {
    let TieBreak::Numeric { order, .. } = rule else {
        return;
    };

    let mut keyed: Vec<(u64, &str)> = claimed
        .iter()
        .filter_map(|name| rule.extract_value(name).map(|value| (value, *name)))
        .collect();

    // Stable: equal values keep their incoming order
    match order {
        SortOrder::Ascending => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
        SortOrder::Descending => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
    }

    *claimed = keyed.into_iter().map(|(_, name)| name).collect();
}
