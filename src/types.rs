//! Core types shared by the dispatcher and the learners

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Which kind of training data a message is
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Spam,
    Ham,
}

impl Polarity {
    /// The `sa-learn` flag selecting this training mode
    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            Self::Spam => "--spam",
            Self::Ham => "--ham",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spam => "spam",
            Self::Ham => "ham",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message handed to a learner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LearnRequest {
    pub polarity: Polarity,

    /// Lower-cased recipient, passed as `--username`
    pub username: String,

    /// Message file to learn from
    pub path: PathBuf,
}

/// What happened when a learner handled a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnOutcome {
    /// The learning command ran and succeeded
    Learned,

    /// The learning command ran and exited unsuccessfully
    Rejected { code: Option<i32> },

    /// Nothing was run
    DryRun,
}

/// Counters collected over one dispatch run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    /// Regular files looked at
    pub scanned: usize,

    /// Files not modified after the cutoff
    pub stale: usize,

    /// Files without the spam status marker
    pub ineligible: usize,

    /// Eligible files with no recipient in their Received headers
    pub no_recipient: usize,

    /// Eligible files the extractor failed on
    pub extract_failed: usize,

    pub learned: usize,

    pub learn_failed: usize,
}

impl RunSummary {
    /// Fold another summary into this one
    pub const fn merge(&mut self, other: &Self) {
        self.scanned += other.scanned;
        self.stale += other.stale;
        self.ineligible += other.ineligible;
        self.no_recipient += other.no_recipient;
        self.extract_failed += other.extract_failed;
        self.learned += other.learned;
        self.learn_failed += other.learn_failed;
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scanned={} stale={} ineligible={} no_recipient={} extract_failed={} learned={} learn_failed={}",
            self.scanned,
            self.stale,
            self.ineligible,
            self.no_recipient,
            self.extract_failed,
            self.learned,
            self.learn_failed
        )
    }
}
