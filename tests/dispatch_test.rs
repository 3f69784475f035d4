use sa_trainer::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

fn message(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("messages")
        .join(name)
}

#[derive(Default)]
struct Recorder {
    requests: Vec<LearnRequest>,
    outcome: Option<LearnOutcome>,
}

impl Learner for Recorder {
    fn learn(
        &mut self,
        request: &LearnRequest,
    ) -> std::result::Result<LearnOutcome, LearnError> {
        self.requests.push(request.clone());
        Ok(self.outcome.unwrap_or(LearnOutcome::Learned))
    }
}

fn deliver(base: &Path, relative: &str, fixture: &str) -> PathBuf {
    let path = base.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::copy(message(fixture), &path).unwrap();
    path
}

fn age(path: &Path, by: Duration) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - by).unwrap();
}

/// example.com/alice and example.com/bob with a mix of messages
fn mail_store() -> (tempfile::TempDir, MailStore) {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path();

    deliver(base, "example.com/alice/.Spam/new/1.eml", "received_for.eml");
    deliver(base, "example.com/alice/.Spam/new/sub/7.eml", "latin1.eml");
    let stale = deliver(base, "example.com/alice/.Spam/cur/2.eml", "received_for.eml");
    age(&stale, Duration::from_secs(2 * 60 * 60));
    deliver(base, "example.com/alice/.Trash/new/3.eml", "no_spam_status.eml");
    deliver(base, "example.com/alice/.Trash/cur/4.eml", "multiple_received.eml");
    deliver(base, "example.com/alice/INBOX/new/8.eml", "received_for.eml");
    deliver(base, "example.com/bob/.Spam/new/5.eml", "malformed_marker.eml");
    deliver(base, "example.com/bob/.Spam/cur/6.eml", "delivered_to.eml");
    fs::create_dir_all(base.join("other.org/carol")).unwrap();
    fs::write(base.join("stray.txt"), "not a domain").unwrap();

    let store = MailStore::new(base, ".Spam", ".Trash");
    (dir, store)
}

#[test]
fn test_run_learns_recent_scored_messages() {
    let (dir, store) = mail_store();
    let mut dispatcher = Dispatcher::new(Recorder::default(), cutoff_from_now(10));

    let summary = dispatcher.run(&store).unwrap();

    let base = dir.path().join("example.com/alice");
    let requests = &dispatcher.learner().requests;
    assert_eq!(
        requests,
        &vec![
            LearnRequest {
                polarity: Polarity::Spam,
                username: "beatles@cotton.us".into(),
                path: base.join(".Spam/new/1.eml"),
            },
            LearnRequest {
                polarity: Polarity::Spam,
                username: "contact@andreinicholson.com".into(),
                path: base.join(".Spam/new/sub/7.eml"),
            },
            LearnRequest {
                polarity: Polarity::Ham,
                username: "contact@andreinicholson.com".into(),
                path: base.join(".Trash/cur/4.eml"),
            },
        ]
    );

    assert_eq!(
        summary,
        RunSummary {
            scanned: 7,
            stale: 1,
            ineligible: 1,
            no_recipient: 1,
            extract_failed: 1,
            learned: 3,
            learn_failed: 0,
        }
    );
}

#[test]
fn test_rejected_learning_is_counted() {
    let (_dir, store) = mail_store();
    let learner = Recorder {
        outcome: Some(LearnOutcome::Rejected { code: Some(1) }),
        ..Recorder::default()
    };
    let mut dispatcher = Dispatcher::new(learner, cutoff_from_now(10));

    let summary = dispatcher.run(&store).unwrap();

    assert_eq!(summary.learned, 0);
    assert_eq!(summary.learn_failed, 3);
    assert_eq!(dispatcher.into_learner().requests.len(), 3);
}

#[test]
fn test_everything_stale() {
    let (_dir, store) = mail_store();
    let future = chrono::Utc::now() + chrono::TimeDelta::hours(1);
    let mut dispatcher = Dispatcher::new(Recorder::default(), future);

    let summary = dispatcher.run(&store).unwrap();

    assert_eq!(summary.scanned, 7);
    assert_eq!(summary.stale, 7);
    assert!(dispatcher.learner().requests.is_empty());
}

#[test]
fn test_missing_folder_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let mut dispatcher = Dispatcher::new(Recorder::default(), cutoff_from_now(10));

    let summary = dispatcher.process_dir(&dir.path().join("nope/new"), Polarity::Ham);

    assert_eq!(summary, RunSummary::default());
}

#[test]
fn test_missing_base_dir_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = MailStore::new(dir.path().join("missing"), ".Spam", ".Trash");
    let mut dispatcher = Dispatcher::new(Recorder::default(), cutoff_from_now(10));

    let err = dispatcher.run(&store).unwrap_err();
    assert!(matches!(err, DispatchError::ListDir { .. }));
}

#[test]
fn test_dry_run_counts_as_learned() {
    let (_dir, store) = mail_store();
    let mut dispatcher = Dispatcher::new(DryRun, cutoff_from_now(10));

    let summary = dispatcher.run(&store).unwrap();

    assert_eq!(summary.learned, 3);
}

#[test]
fn test_unreadable_messages_do_not_stop_the_walk() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path();
    let new = base.join("example.com/dave/.Spam/new");
    fs::create_dir_all(&new).unwrap();
    fs::write(
        new.join("a.eml"),
        b"\xef\xbb\xbfX-Spam-Status: Yes, score=9.0\r\n\xff\xfe\r\n",
    )
    .unwrap();
    fs::write(
        new.join("b.eml"),
        "# X-Spam-Status: Yes, score=9.0\nnot a mail message\n",
    )
    .unwrap();
    deliver(base, "example.com/dave/.Spam/new/c.eml", "received_for.eml");
    let store = MailStore::new(base, ".Spam", ".Trash");
    let mut dispatcher = Dispatcher::new(Recorder::default(), cutoff_from_now(10));

    let summary = dispatcher.run(&store).unwrap();

    assert_eq!(summary.scanned, 3);
    assert_eq!(summary.extract_failed, 2);
    assert_eq!(summary.learned, 1);
    let requests = &dispatcher.learner().requests;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, new.join("c.eml"));
}

#[test]
fn test_file_in_place_of_folder_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let not_a_folder = deliver(dir.path(), "example.com/erin/.Spam/new", "received_for.eml");
    let mut dispatcher = Dispatcher::new(Recorder::default(), cutoff_from_now(10));

    let summary = dispatcher.process_dir(&not_a_folder, Polarity::Spam);

    assert_eq!(summary, RunSummary::default());
    assert!(dispatcher.learner().requests.is_empty());
}

#[test]
fn test_folders_order() {
    let store = MailStore::new("/srv/mail", ".Spam", ".Trash");
    let account = Path::new("/srv/mail/example.com/alice");

    assert_eq!(
        store.folders(account),
        vec![
            (account.join(".Spam/new"), Polarity::Spam),
            (account.join(".Spam/cur"), Polarity::Spam),
            (account.join(".Trash/new"), Polarity::Ham),
            (account.join(".Trash/cur"), Polarity::Ham),
        ]
    );
}

#[test]
fn test_accounts_sorted_and_dirs_only() {
    let (dir, store) = mail_store();

    assert_eq!(
        store.accounts().unwrap(),
        vec![
            dir.path().join("example.com/alice"),
            dir.path().join("example.com/bob"),
            dir.path().join("other.org/carol"),
        ]
    );
}

#[test]
fn test_cutoff_from_now() {
    let before = chrono::Utc::now();
    let cutoff = cutoff_from_now(30);

    assert!(cutoff <= before - chrono::TimeDelta::minutes(29));
    assert!(cutoff >= before - chrono::TimeDelta::minutes(31));
}
