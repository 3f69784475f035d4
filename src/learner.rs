//! Handing messages to the external learning command

use crate::error::LearnError;
use crate::types::{LearnOutcome, LearnRequest};
use std::path::PathBuf;
use std::process::Command;
use tracing::info;

pub const DEFAULT_SA_LEARN: &str = "/usr/bin/sa-learn";
pub const DEFAULT_SITE_CONFIG: &str = "/etc/spamassassin";

/// Something that can be trained on a message
pub trait Learner {
    fn learn(&mut self, request: &LearnRequest) -> Result<LearnOutcome, LearnError>;
}

/// Runs SpamAssassin's `sa-learn` once per message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaLearn {
    pub binary: PathBuf,
    pub site_config: PathBuf,
}

impl Default for SaLearn {
    fn default() -> Self {
        Self {
            binary: DEFAULT_SA_LEARN.into(),
            site_config: DEFAULT_SITE_CONFIG.into(),
        }
    }
}

impl SaLearn {
    pub fn new(binary: impl Into<PathBuf>, site_config: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            site_config: site_config.into(),
        }
    }

    /// Build the `sa-learn` invocation for `request`
    #[must_use]
    pub fn command(&self, request: &LearnRequest) -> Command {
        let mut siteconfig = std::ffi::OsString::from("--siteconfigpath=");
        siteconfig.push(&self.site_config);

        let mut command = Command::new(&self.binary);
        command
            .arg(request.polarity.flag())
            .arg(format!("--username={}", request.username))
            .arg(siteconfig)
            .arg(&request.path);
        command
    }
}

impl Learner for SaLearn {
    fn learn(&mut self, request: &LearnRequest) -> Result<LearnOutcome, LearnError> {
        info!(
            polarity = %request.polarity,
            username = %request.username,
            path = %request.path.display(),
            "Learning {} for {}",
            request.polarity,
            request.username
        );

        let status = self
            .command(request)
            .status()
            .map_err(|source| LearnError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if status.success() {
            Ok(LearnOutcome::Learned)
        } else {
            Ok(LearnOutcome::Rejected {
                code: status.code(),
            })
        }
    }
}

/// Logs what would be learned without running anything
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRun;

impl Learner for DryRun {
    fn learn(&mut self, request: &LearnRequest) -> Result<LearnOutcome, LearnError> {
        info!(
            polarity = %request.polarity,
            username = %request.username,
            path = %request.path.display(),
            "Would learn {} for {}",
            request.polarity,
            request.username
        );
        Ok(LearnOutcome::DryRun)
    }
}
