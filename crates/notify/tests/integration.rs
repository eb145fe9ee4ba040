use std::path::PathBuf;

use chrono::NaiveDate;

use ldd_notify::delivery::{ArtifactChannel, DeliveryChannel};
use ldd_notify::pipeline::{run_structured, run_tabular};
use ldd_notify::{Notification, NotifyConfig, NotifyError};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture_config() -> NotifyConfig {
    let mut config = NotifyConfig::from_toml(
        r#"
structured_input = "ldd_vdi_data.json"
tabular_input = "assignments.csv"
owner_domain = "corp.test"
"#,
    )
    .unwrap();
    config.resolve_paths(&fixtures_dir());
    config
}

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()
}

#[derive(Default)]
struct Recorder {
    sent: Vec<Notification>,
}

impl DeliveryChannel for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn deliver(&mut self, n: &Notification) -> Result<(), NotifyError> {
        self.sent.push(n.clone());
        Ok(())
    }
}

/// Rejects one recipient, accepts the rest.
struct FlakyRelay {
    reject: &'static str,
    sent: Vec<Notification>,
}

impl DeliveryChannel for FlakyRelay {
    fn name(&self) -> &'static str {
        "flaky"
    }

    fn deliver(&mut self, n: &Notification) -> Result<(), NotifyError> {
        if n.recipient == self.reject {
            return Err(NotifyError::Transport {
                relay: "relay.test:25".into(),
                reason: "550 mailbox unavailable".into(),
            });
        }
        self.sent.push(n.clone());
        Ok(())
    }
}

fn sent_to<'a>(sent: &'a [Notification], recipient: &str) -> Vec<&'a Notification> {
    sent.iter().filter(|n| n.recipient == recipient).collect()
}

// -------------------------------------------------------------------------
// Structured pipeline
// -------------------------------------------------------------------------

#[test]
fn owner_with_two_stale_hosts_gets_two_messages() {
    let mut recorder = Recorder::default();
    run_structured(&fixture_config(), reference_date(), &mut recorder);

    let jane = sent_to(&recorder.sent, "jane.smith@x");
    assert_eq!(jane.len(), 2);
    assert!(jane[0].subject.ends_with("ldd-jsmith-01"));
    assert!(jane[0].body.contains("has not been accessed since Unknown."));
    assert!(jane[1].subject.ends_with("ldd-jsmith-02"));
    assert!(jane[1].body.contains("has not been accessed since 2026-02-28."));
}

#[test]
fn single_host_owner_is_never_notified() {
    let mut recorder = Recorder::default();
    run_structured(&fixture_config(), reference_date(), &mut recorder);
    assert!(sent_to(&recorder.sent, "solo.owner@x").is_empty());
}

#[test]
fn name_derived_owner_only_gets_stale_hosts() {
    let mut recorder = Recorder::default();
    run_structured(&fixture_config(), reference_date(), &mut recorder);

    let john = sent_to(&recorder.sent, "john.doe@corp.test");
    assert_eq!(john.len(), 1);
    assert!(john[0].subject.ends_with("ldd-jdoe-02"));
    assert!(john[0].body.contains("since not recorded."));
}

#[test]
fn structured_report_counts() {
    let mut recorder = Recorder::default();
    let report = run_structured(&fixture_config(), reference_date(), &mut recorder);

    assert_eq!(report.pipeline, "structured");
    assert_eq!(report.channel, "recorder");
    assert_eq!(report.loaded, 7);
    assert_eq!(report.multi_owners, 2);
    assert_eq!(report.eligible, 3);
    assert_eq!(report.delivered, 3);
    assert_eq!(report.failed, 0);
    assert!(report.error.is_none());
    assert_eq!(recorder.sent.len(), 3);
}

#[test]
fn failed_send_does_not_stop_the_rest() {
    let mut relay = FlakyRelay {
        reject: "jane.smith@x",
        sent: Vec::new(),
    };
    let report = run_structured(&fixture_config(), reference_date(), &mut relay);

    assert_eq!(report.delivered, 1);
    assert_eq!(report.failed, 2);
    assert_eq!(relay.sent.len(), 1);
    assert_eq!(relay.sent[0].recipient, "john.doe@corp.test");
}

#[test]
fn later_reference_date_notifies_more() {
    let mut recorder = Recorder::default();
    let later = NaiveDate::from_ymd_opt(2026, 4, 30).unwrap();
    run_structured(&fixture_config(), later, &mut recorder);
    // ldd-jdoe-01 (last used 2026-03-10) is now stale as well.
    assert_eq!(sent_to(&recorder.sent, "john.doe@corp.test").len(), 2);
}

// -------------------------------------------------------------------------
// Tabular pipeline
// -------------------------------------------------------------------------

#[test]
fn tabular_writes_one_block_per_multi_host_user() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("ldd_cleanup_emails.txt");

    let report = run_tabular(&fixture_config(), ArtifactChannel::create(&artifact).unwrap());
    assert_eq!(report.loaded, 2);
    assert_eq!(report.delivered, 2);
    assert!(report.error.is_none());

    let text = std::fs::read_to_string(&artifact).unwrap();
    assert_eq!(text.matches("--- EMAIL TO: ").count(), 2);
    assert!(text.starts_with("--- EMAIL TO: u100001 ---\n"));
    assert!(text.contains("Hostnames: h1, h2, h3\n"));
    assert!(text.contains("--- EMAIL TO: u100003 ---\n"));
    assert!(text.contains("Hostnames: hostA, hostB\n"));
    assert!(!text.contains("u100002"));
    assert!(!text.contains("x1"));
    assert!(text.contains("InfraOps Team\n\n\n--- EMAIL TO: u100003"));
}

#[test]
fn tabular_rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("ldd_cleanup_emails.txt");
    let config = fixture_config();

    run_tabular(&config, ArtifactChannel::create(&artifact).unwrap());
    let first = std::fs::read(&artifact).unwrap();
    run_tabular(&config, ArtifactChannel::create(&artifact).unwrap());
    let second = std::fs::read(&artifact).unwrap();

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn tabular_missing_input_still_recreates_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("ldd_cleanup_emails.txt");
    std::fs::write(&artifact, "previous run").unwrap();

    let mut config = fixture_config();
    config.tabular_input = dir.path().join("missing.csv");

    let report = run_tabular(&config, ArtifactChannel::create(&artifact).unwrap());
    assert_eq!(report.loaded, 0);
    assert_eq!(std::fs::read_to_string(&artifact).unwrap(), "");
}
