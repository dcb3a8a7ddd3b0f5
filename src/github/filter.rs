use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use super::types::PullRequest;

/// A PullRequest field that can be sorted or filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrField {
    Title,
    Number,
    Author,
    Url,
    CreatedAt,
    Draft,
    Repository,
    Stale,
}

/// The value of one [`PrField`] on one PR. Values of the same field always
/// share a variant, so ordering between them is the natural one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue {
    Text(String),
    Number(u64),
    Flag(bool),
    Time(DateTime<Utc>),
}

impl PrField {
    pub fn value_of(&self, pr: &PullRequest) -> FieldValue {
        match self {
            PrField::Title => FieldValue::Text(pr.title.clone()),
            PrField::Number => FieldValue::Number(pr.number),
            PrField::Author => FieldValue::Text(pr.author.clone()),
            PrField::Url => FieldValue::Text(pr.url.clone()),
            PrField::CreatedAt => FieldValue::Time(pr.created_at),
            PrField::Draft => FieldValue::Flag(pr.draft),
            PrField::Repository => FieldValue::Text(pr.repository.clone()),
            PrField::Stale => FieldValue::Flag(pr.stale),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PrField::Title => "title",
            PrField::Number => "number",
            PrField::Author => "author",
            PrField::Url => "url",
            PrField::CreatedAt => "created_at",
            PrField::Draft => "draft",
            PrField::Repository => "repository",
            PrField::Stale => "stale",
        }
    }
}

impl FromStr for PrField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(PrField::Title),
            "number" => Ok(PrField::Number),
            "author" => Ok(PrField::Author),
            "url" => Ok(PrField::Url),
            "created_at" => Ok(PrField::CreatedAt),
            "draft" => Ok(PrField::Draft),
            "repository" => Ok(PrField::Repository),
            "stale" => Ok(PrField::Stale),
            other => Err(format!("unknown pull request field '{}'", other)),
        }
    }
}

impl fmt::Display for PrField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Time(value)
    }
}

/// Return a copy of `prs` stably sorted by `field`
pub fn sort_by(prs: &[PullRequest], field: PrField, ascending: bool) -> Vec<PullRequest> {
    let mut sorted = prs.to_vec();
    // sort_by_key is stable; reversing the comparison keeps equal keys in input order
    if ascending {
        sorted.sort_by_key(|pr| field.value_of(pr));
    } else {
        sorted.sort_by(|a, b| field.value_of(b).cmp(&field.value_of(a)));
    }
    sorted
}

/// Return the PRs whose `field` equals `value`, in their original order
pub fn filter_by(prs: &[PullRequest], field: PrField, value: impl Into<FieldValue>) -> Vec<PullRequest> {
    let value = value.into();
    prs.iter()
        .filter(|pr| field.value_of(pr) == value)
        .cloned()
        .collect()
}

/// Return the PRs carrying `label`, in their original order
pub fn filter_by_label(prs: &[PullRequest], label: &str) -> Vec<PullRequest> {
    prs.iter()
        .filter(|pr| pr.labels.iter().any(|l| l == label))
        .cloned()
        .collect()
}
