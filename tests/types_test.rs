use sa_trainer::*;

// --- Polarity ---

#[test]
fn test_polarity_flags() {
    assert_eq!(Polarity::Spam.flag(), "--spam");
    assert_eq!(Polarity::Ham.flag(), "--ham");
}

#[test]
fn test_polarity_display() {
    assert_eq!(Polarity::Spam.to_string(), "spam");
    assert_eq!(Polarity::Ham.to_string(), "ham");
}

#[test]
fn test_polarity_serde() {
    assert_eq!(serde_json::to_string(&Polarity::Ham).unwrap(), "\"ham\"");
    let parsed: Polarity = serde_json::from_str("\"spam\"").unwrap();
    assert_eq!(parsed, Polarity::Spam);
}

// --- RunSummary ---

#[test]
fn test_summary_merge() {
    let mut total = RunSummary {
        scanned: 3,
        learned: 1,
        ..RunSummary::default()
    };
    total.merge(&RunSummary {
        scanned: 2,
        stale: 1,
        learned: 1,
        ..RunSummary::default()
    });

    assert_eq!(total.scanned, 5);
    assert_eq!(total.stale, 1);
    assert_eq!(total.learned, 2);
}

#[test]
fn test_summary_json() {
    let summary = RunSummary {
        scanned: 4,
        learned: 2,
        no_recipient: 1,
        ..RunSummary::default()
    };
    let json = serde_json::to_value(summary).unwrap();

    assert_eq!(json["scanned"], 4);
    assert_eq!(json["learned"], 2);
    assert_eq!(json["no_recipient"], 1);
    assert_eq!(json["learn_failed"], 0);
}

#[test]
fn test_summary_display() {
    let summary = RunSummary {
        scanned: 1,
        learned: 1,
        ..RunSummary::default()
    };

    assert_eq!(
        summary.to_string(),
        "scanned=1 stale=0 ineligible=0 no_recipient=0 extract_failed=0 learned=1 learn_failed=0"
    );
}
