// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! SpamAssassin training feeder
//!
//! Scans a `<base>/<domain>/<account>` mail store for recently delivered
//! messages that SpamAssassin has already scored, works out who each message
//! was delivered to, and runs `sa-learn` on it as spam or ham for that user.
//!
//! # Example
//!
//! ```rust
//! use sa_trainer::extract_recipient_from_bytes;
//!
//! let raw = b"Received: from mx.example.org by mail.example.com\r\n\
//!             \tfor <User@Example.com>; Thu, 01 Jan 2025 12:00:00 +0000\r\n\
//!             Subject: Hello\r\n\r\nBody";
//! let recipient = extract_recipient_from_bytes(raw).unwrap();
//!
//! assert_eq!(recipient.as_deref(), Some("user@example.com"));
//! ```

mod dispatch;
mod eligibility;
mod encoding;
mod error;
mod extract;
mod learner;
mod types;

pub use dispatch::{Dispatcher, MAILDIR_SUBDIRS, MailStore, cutoff_from_now};
pub use eligibility::{SPAM_STATUS_MARKER, contains_spam_status, is_eligible};
pub use encoding::{
    DEFAULT_SAMPLE_LINES, Detection, detect_bytes, detect_encoding, read_sample, sample_prefix,
};
pub use error::{DispatchError, ExtractError, LearnError, Result};
pub use extract::{
    RECIPIENT_CLOSE, RECIPIENT_OPEN, extract_recipient, extract_recipient_from_bytes,
    recipient_in_received,
};
pub use learner::{DEFAULT_SA_LEARN, DEFAULT_SITE_CONFIG, DryRun, Learner, SaLearn};
pub use types::*;
