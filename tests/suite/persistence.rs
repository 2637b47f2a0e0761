//! Config-driven startup against an on-disk database.

use std::fs;
use std::path::Path;

use signoff_engine::{ConfigError, RecordStatus, SignoffConfig, WorkflowController};

use crate::common::xyzw;

fn write_config(dir: &Path, extra: &str) -> SignoffConfig {
    let db = dir.join("data").join("signoff.db");
    let path = dir.join("config.toml");
    let body = format!(
        "[app]\ndatabase = \"{}\"\n\n[clients]\n\"Acme\" = \"ops@acme.example\"\n\"Globex\" = \"desk@globex.example\"\n\n{extra}",
        db.display()
    );
    fs::write(&path, body).unwrap();
    SignoffConfig::load_from(&path).unwrap().unwrap()
}

#[test]
fn records_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "");

    let (pending_id, approved_id) = {
        let mut controller = WorkflowController::from_config(&config).unwrap();
        let pending = controller.submit("Acme", xyzw()).unwrap();
        let approved = controller.submit("Globex", xyzw()).unwrap();
        controller.approve_record(approved).unwrap();
        (pending, approved)
    };

    let mut controller = WorkflowController::from_config(&config).unwrap();
    let pending = controller.fetch_pending().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, pending_id);
    assert_eq!(pending[0].client_id.as_str(), "Acme");
    assert_eq!(
        controller.record(approved_id).unwrap().unwrap().status,
        RecordStatus::Approved
    );

    let next = controller.submit("Acme", xyzw()).unwrap();
    assert!(next > approved_id);
}

#[test]
fn configured_directory_replaces_samples() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "");
    let mut controller = WorkflowController::from_config(&config).unwrap();

    let clients: Vec<String> = controller.clients().map(ToString::to_string).collect();
    assert_eq!(clients, ["Acme", "Globex"]);
    assert!(controller.submit("Client A", xyzw()).is_err());
}

#[test]
fn unreachable_relay_does_not_block_approval() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        "[smtp]\nhost = \"127.0.0.1\"\nport = 1\nfrom = \"signoff@example.com\"\ntls = \"none\"\ntimeout_seconds = 2\n",
    );
    let mut controller = WorkflowController::from_config(&config).unwrap();
    let id = controller.submit("Acme", xyzw()).unwrap();

    let record = controller.approve_record(id).unwrap();
    assert_eq!(record.status, RecordStatus::Approved);
    drop(controller);

    let reopened = WorkflowController::from_config(&config).unwrap();
    assert_eq!(
        reopened.record(id).unwrap().unwrap().status,
        RecordStatus::Approved
    );
    assert!(reopened.fetch_pending().unwrap().is_empty());
}

#[test]
fn malformed_config_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[clients\n").unwrap();

    let err = SignoffConfig::load_from(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }));
    assert_eq!(err.path(), Some(path.as_path()));
}

#[test]
fn missing_config_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = SignoffConfig::load_from(&dir.path().join("absent.toml")).unwrap();
    assert!(loaded.is_none());
}
