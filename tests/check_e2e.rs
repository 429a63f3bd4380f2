#![cfg(unix)]

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use fuelcheck::check;
use fuelcheck::error::{Error, FetchError, NotifyError};
use fuelcheck::fetch::ScraperCommand;
use fuelcheck::notify::render::{SUBJECT_CHANGED, SUBJECT_FIRST_RUN, SUBJECT_UNCHANGED};
use fuelcheck::notify::{Email, MailSettings, Notifier, Transport};
use fuelcheck::store::diff::{CheckMode, MatchBy};
use fuelcheck::store::{SnapshotStore, STATE_FILE_NAME};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct Outbox(Rc<RefCell<Vec<Email>>>);

impl Transport for Outbox {
    fn send(&self, email: &Email) -> Result<String, NotifyError> {
        self.0.borrow_mut().push(email.clone());
        Ok("250 2.0.0 OK".into())
    }
}

fn notifier(outbox: &Outbox, match_by: MatchBy) -> Notifier {
    let settings = MailSettings {
        from_name: "Fuel Checker".into(),
        sender: "checker@example.com".into(),
        recipient: "me@example.com".into(),
    };
    Notifier::new(Box::new(outbox.clone()), settings, match_by)
}

/// Scraper that prints noise around the given JSON, like a real headless browser script.
fn scraper(json: &str) -> ScraperCommand {
    let script = format!("echo 'Loading...'; printf '%s\\n' '{json}'; echo 'Done'");
    ScraperCommand::new("sh", vec!["-c".into(), script])
}

fn store(dir: &Path) -> SnapshotStore {
    SnapshotStore::new(dir.join(STATE_FILE_NAME))
}

const DAY_ONE: &str = r#"[{"naam":"A","prijs":"1.80"},{"naam":"B","prijs":"1.75"}]"#;
const DAY_TWO: &str = r#"[{"naam":"A","prijs":"1.85"},{"naam":"B","prijs":"1.75"}]"#;

#[test]
fn three_runs_first_changed_unchanged() {
    let dir = TempDir::new().unwrap();
    let outbox = Outbox::default();
    let notifier = notifier(&outbox, MatchBy::Position);

    let first = check::run(&scraper(DAY_ONE), &store(dir.path()), &notifier, true).unwrap();
    assert_eq!(first.mode, CheckMode::FirstRun);

    let second = check::run(&scraper(DAY_TWO), &store(dir.path()), &notifier, true).unwrap();
    assert_eq!(second.mode, CheckMode::Changed);

    let third = check::run(&scraper(DAY_TWO), &store(dir.path()), &notifier, true).unwrap();
    assert_eq!(third.mode, CheckMode::Unchanged);

    let sent = outbox.0.borrow();
    let subjects: Vec<_> = sent.iter().map(|e| e.subject.as_str()).collect();
    assert_eq!(subjects, vec![SUBJECT_FIRST_RUN, SUBJECT_CHANGED, SUBJECT_UNCHANGED]);

    assert!(sent[1].html.contains("<li><strong>A</strong>: <del>1.80</del> → <ins>1.85</ins></li>"));
    assert!(!sent[1].html.contains("<strong>B</strong>"));
    assert!(sent[2].html.contains("<li><strong>B</strong>: 1.75</li>"));
}

#[test]
fn state_file_keeps_scraper_keys_and_order() {
    let dir = TempDir::new().unwrap();
    let outbox = Outbox::default();

    check::run(&scraper(DAY_ONE), &store(dir.path()), &notifier(&outbox, MatchBy::Position), true).unwrap();

    let text = fs::read_to_string(dir.path().join(STATE_FILE_NAME)).unwrap();
    let naam = text.find("\"naam\"").unwrap();
    let prijs = text.find("\"prijs\"").unwrap();
    assert!(naam < prijs);
    assert!(text.starts_with("[\n  {"));
}

#[test]
fn failing_scraper_leaves_no_state_and_no_mail() {
    let dir = TempDir::new().unwrap();
    let outbox = Outbox::default();
    let failing = ScraperCommand::new("sh", vec!["-c".into(), "echo 'page timeout' >&2; exit 1".into()]);

    let result = check::run(&failing, &store(dir.path()), &notifier(&outbox, MatchBy::Position), true);

    match result {
        Err(Error::Fetch(FetchError::Exited { stderr, .. })) => assert_eq!(stderr, "page timeout"),
        other => panic!("expected exit failure, got {other:?}"),
    }
    assert!(!dir.path().join(STATE_FILE_NAME).exists());
    assert!(outbox.0.borrow().is_empty());
}

#[test]
fn object_payload_recovered_from_noisy_output() {
    let dir = TempDir::new().unwrap();
    let outbox = Outbox::default();

    let report = check::run(
        &scraper(r#"{"stations":[]}"#),
        &store(dir.path()),
        &notifier(&outbox, MatchBy::Position),
        true,
    )
    .unwrap();

    assert_eq!(report.stations, 0);
    let saved = store(dir.path()).load().unwrap().unwrap();
    assert_eq!(saved.as_value().to_string(), r#"{"stations":[]}"#);
}

#[test]
fn reordered_stations_by_name_show_no_price_lines() {
    let dir = TempDir::new().unwrap();
    let outbox = Outbox::default();
    let notifier = notifier(&outbox, MatchBy::Name);

    check::run(&scraper(DAY_ONE), &store(dir.path()), &notifier, true).unwrap();
    let reordered = r#"[{"naam":"B","prijs":"1.75"},{"naam":"A","prijs":"1.80"}]"#;
    let report = check::run(&scraper(reordered), &store(dir.path()), &notifier, true).unwrap();

    assert_eq!(report.mode, CheckMode::Changed);
    let sent = outbox.0.borrow();
    assert!(!sent[1].html.contains("<del>"));
}
