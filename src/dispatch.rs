//! Walking the mail store and feeding eligible messages to a learner

use crate::eligibility::is_eligible;
use crate::error::DispatchError;
use crate::extract::extract_recipient;
use crate::learner::Learner;
use crate::types::{LearnOutcome, LearnRequest, Polarity, RunSummary};
use chrono::{DateTime, TimeDelta, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};
use walkdir::WalkDir;

/// Maildir subfolders scanned under each spam and ham folder
pub const MAILDIR_SUBDIRS: [&str; 2] = ["new", "cur"];

/// Layout of a `<base>/<domain>/<account>` mail store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailStore {
    pub base_dir: PathBuf,

    /// Folder in each account holding spam, e.g. `.Spam`
    pub spam_dir: String,

    /// Folder in each account holding ham, e.g. `.Trash`
    pub ham_dir: String,
}

impl MailStore {
    pub fn new(
        base_dir: impl Into<PathBuf>,
        spam_dir: impl Into<String>,
        ham_dir: impl Into<String>,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            spam_dir: spam_dir.into(),
            ham_dir: ham_dir.into(),
        }
    }

    /// All account directories, sorted by domain then account
    pub fn accounts(&self) -> Result<Vec<PathBuf>, DispatchError> {
        let mut accounts = Vec::new();
        for domain in list_dirs(&self.base_dir)? {
            accounts.extend(list_dirs(&domain)?);
        }
        Ok(accounts)
    }

    /// The folders scanned for one account, spam first
    #[must_use]
    pub fn folders(&self, account: &Path) -> Vec<(PathBuf, Polarity)> {
        [(&self.spam_dir, Polarity::Spam), (&self.ham_dir, Polarity::Ham)]
            .into_iter()
            .flat_map(move |(folder, polarity)| {
                MAILDIR_SUBDIRS
                    .iter()
                    .map(move |sub| (account.join(folder).join(sub), polarity))
            })
            .collect()
    }
}

/// Only messages modified after `now - ago_minutes` are learned from
#[must_use]
pub fn cutoff_from_now(ago_minutes: u32) -> DateTime<Utc> {
    Utc::now() - TimeDelta::minutes(i64::from(ago_minutes))
}

/// Feeds recent, scored messages to a [`Learner`]
#[derive(Debug)]
pub struct Dispatcher<L> {
    learner: L,
    cutoff: DateTime<Utc>,
}

impl<L: Learner> Dispatcher<L> {
    pub const fn new(learner: L, cutoff: DateTime<Utc>) -> Self {
        Self { learner, cutoff }
    }

    #[must_use]
    pub const fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    #[must_use]
    pub const fn learner(&self) -> &L {
        &self.learner
    }

    pub fn into_learner(self) -> L {
        self.learner
    }

    /// Process every account of `store`
    pub fn run(&mut self, store: &MailStore) -> Result<RunSummary, DispatchError> {
        let mut summary = RunSummary::default();

        for account in store.accounts()? {
            for (dir, polarity) in store.folders(&account) {
                summary.merge(&self.process_dir(&dir, polarity));
            }
        }

        Ok(summary)
    }

    /// Process every regular file below `dir` as `polarity`
    pub fn process_dir(&mut self, dir: &Path, polarity: Polarity) -> RunSummary {
        let mut summary = RunSummary::default();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 && is_not_found(&e) => {
                    debug!(dir = %dir.display(), "Folder does not exist, skipping");
                    continue;
                }
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "Error walking folder");
                    continue;
                }
            };

            if entry.depth() == 0 && !entry.file_type().is_dir() {
                debug!(dir = %dir.display(), "Not a folder, skipping");
                continue;
            }

            if !entry.file_type().is_file() {
                continue;
            }

            summary.scanned += 1;
            self.process_file(entry.path(), polarity, &mut summary);
        }

        summary
    }

    fn process_file(&mut self, path: &Path, polarity: Polarity, summary: &mut RunSummary) {
        let modified = match std::fs::metadata(path).and_then(|m| m.modified()) {
            Ok(modified) => DateTime::<Utc>::from(modified),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Error reading modification time");
                return;
            }
        };

        if modified <= self.cutoff {
            summary.stale += 1;
            return;
        }

        if !is_eligible(path) {
            summary.ineligible += 1;
            return;
        }

        // extract_recipient already logged the failure
        let Ok(recipient) = extract_recipient(path) else {
            summary.extract_failed += 1;
            return;
        };

        let Some(username) = recipient else {
            warn!(path = %path.display(), "Could not find recipient, skipping");
            summary.no_recipient += 1;
            return;
        };

        let request = LearnRequest {
            polarity,
            username,
            path: path.to_path_buf(),
        };

        match self.learner.learn(&request) {
            Ok(LearnOutcome::Rejected { code }) => {
                warn!(path = %path.display(), code = ?code, "Learning command failed");
                summary.learn_failed += 1;
            }
            Ok(LearnOutcome::Learned | LearnOutcome::DryRun) => summary.learned += 1,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Could not run learning command");
                summary.learn_failed += 1;
            }
        }
    }
}

fn is_not_found(e: &walkdir::Error) -> bool {
    e.io_error().is_some_and(|io| io.kind() == ErrorKind::NotFound)
}

fn list_dirs(path: &Path) -> Result<Vec<PathBuf>, DispatchError> {
    let entries = std::fs::read_dir(path).map_err(|source| DispatchError::ListDir {
        path: path.to_path_buf(),
        source,
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DispatchError::ListDir {
            path: path.to_path_buf(),
            source,
        })?;
        let entry_path = entry.path();

        if entry_path.is_dir() {
            dirs.push(entry_path);
        } else {
            debug!(path = %entry_path.display(), "Not a directory, skipping");
        }
    }

    dirs.sort();
    Ok(dirs)
}
