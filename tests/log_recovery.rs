//! Log Recovery Tests
//!
//! Covers how the in-memory store and the CSV log converge:
//! - create and update reload the log first, so external edits and records
//!   written by an earlier process become visible
//! - reads and deletes never reload
//! - the id counter is rebuilt from the largest id in the log
//! - names needing CSV quoting survive a full rewrite

use std::fs;
use std::path::PathBuf;

use persondb::person::Person;
use persondb::store::{DurableLog, PersonService, StoreError};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn log_path(temp: &TempDir) -> PathBuf {
    temp.path().join("persons.csv")
}

fn fresh_service(temp: &TempDir) -> PersonService {
    PersonService::new(DurableLog::new(log_path(temp)))
}

fn read_log(temp: &TempDir) -> String {
    fs::read_to_string(log_path(temp)).unwrap()
}

// =============================================================================
// Restart
// =============================================================================

/// Records written by one service are read back by a new one after a reload.
#[test]
fn test_round_trip_across_restart() {
    let temp = TempDir::new().unwrap();
    {
        let service = fresh_service(&temp);
        service.create("Ada Lovelace").unwrap();
        service.create("Grace Hopper").unwrap();
    }

    let service = PersonService::open(DurableLog::new(log_path(&temp))).unwrap();
    assert_eq!(service.get(1).unwrap(), Person::new(1, "Ada Lovelace"));
    assert_eq!(service.get(2).unwrap(), Person::new(2, "Grace Hopper"));
}

/// Without an eager open, the map stays empty until the first mutation.
#[test]
fn test_lazy_service_loads_on_first_create() {
    let temp = TempDir::new().unwrap();
    fs::write(log_path(&temp), "ID,Name\n1,Ada\n2,Bob\n").unwrap();

    let service = fresh_service(&temp);
    assert!(matches!(service.get(1), Err(StoreError::NotFound(1))));

    let created = service.create("Cy").unwrap();
    assert_eq!(created.id, 3);
    assert_eq!(service.get(1).unwrap().name, "Ada");
    assert_eq!(read_log(&temp), "ID,Name\n1,Ada\n2,Bob\n3,Cy\n");
}

/// Loading ids {3, 7, 2} makes the next id 8.
#[test]
fn test_reload_reconstructs_counter() {
    let temp = TempDir::new().unwrap();
    fs::write(log_path(&temp), "ID,Name\n3,Ada\n7,Bob\n2,Cy\n").unwrap();

    let service = fresh_service(&temp);
    assert_eq!(service.create("Dee").unwrap().id, 8);
}

/// A log file that exists but is empty behaves like a missing one.
#[test]
fn test_empty_log_file_does_not_reuse_ids() {
    let temp = TempDir::new().unwrap();
    fs::write(log_path(&temp), "").unwrap();

    let service = PersonService::open(DurableLog::new(log_path(&temp))).unwrap();
    assert_eq!(service.create("Ada").unwrap().id, 1);

    let service = PersonService::open(DurableLog::new(log_path(&temp))).unwrap();
    assert_eq!(service.list().unwrap(), vec![Person::new(1, "Ada")]);
    assert_eq!(service.create("Bob").unwrap().id, 2);
    assert_eq!(read_log(&temp), "ID,Name\n1,Ada\n2,Bob\n");
}

/// An id at the top of the range is skipped and the service stays usable.
#[test]
fn test_largest_possible_id_is_skipped() {
    let temp = TempDir::new().unwrap();
    fs::write(log_path(&temp), "ID,Name\n9223372036854775807,Ada\n1,Bob\n").unwrap();

    let service = PersonService::open(DurableLog::new(log_path(&temp))).unwrap();
    assert_eq!(service.list().unwrap(), vec![Person::new(1, "Bob")]);
    assert_eq!(service.create("Cy").unwrap().id, 2);
    assert_eq!(service.get(2).unwrap().name, "Cy");
}

// =============================================================================
// External Edits
// =============================================================================

/// Rows added to the file by hand show up after the next update.
#[test]
fn test_update_picks_up_external_rows() {
    let temp = TempDir::new().unwrap();
    let service = fresh_service(&temp);
    service.create("Ada").unwrap();

    fs::write(log_path(&temp), "ID,Name\n1,Ada\n10,Zed\n").unwrap();

    service.update(1, "Ada L").unwrap();
    assert_eq!(service.get(10).unwrap().name, "Zed");
    assert_eq!(service.create("Bob").unwrap().id, 11);
}

/// An external rename is overwritten in memory by the reload.
#[test]
fn test_reload_prefers_log_contents() {
    let temp = TempDir::new().unwrap();
    let service = fresh_service(&temp);
    service.create("Ada").unwrap();

    fs::write(log_path(&temp), "ID,Name\n1,Augusta\n").unwrap();
    assert_eq!(service.get(1).unwrap().name, "Ada");

    service.create("Bob").unwrap();
    assert_eq!(service.get(1).unwrap().name, "Augusta");
}

/// Delete trusts memory: a row only present in the file is not found.
#[test]
fn test_delete_does_not_reload() {
    let temp = TempDir::new().unwrap();
    let service = fresh_service(&temp);
    service.create("Ada").unwrap();

    fs::write(log_path(&temp), "ID,Name\n1,Ada\n5,Eve\n").unwrap();

    assert!(matches!(service.delete(5), Err(StoreError::NotFound(5))));

    // Deleting a known id rewrites the file as read at that moment.
    service.delete(1).unwrap();
    assert_eq!(read_log(&temp), "ID,Name\n5,Eve\n");
}

// =============================================================================
// Quoting
// =============================================================================

/// Names with separators or quotes written by hand survive a rewrite.
#[test]
fn test_quoted_names_survive_rewrite() {
    let temp = TempDir::new().unwrap();
    fs::write(
        log_path(&temp),
        "ID,Name\n1,\"Smith, John\"\n2,\"The \"\"Doc\"\"\"\n3,Ada\n",
    )
    .unwrap();

    let service = fresh_service(&temp);
    service.update(3, "Ada L").unwrap();

    assert_eq!(service.get(1).unwrap().name, "Smith, John");
    assert_eq!(service.get(2).unwrap().name, "The \"Doc\"");
    assert_eq!(
        read_log(&temp),
        "ID,Name\n1,\"Smith, John\"\n2,\"The \"\"Doc\"\"\"\n3,Ada L\n"
    );
}

// =============================================================================
// Failure Paths
// =============================================================================

/// A malformed log fails the mutation before anything is changed.
#[test]
fn test_malformed_log_blocks_mutations() {
    let temp = TempDir::new().unwrap();
    fs::write(log_path(&temp), "ID,Name\n1,\"Ada\n").unwrap();

    let service = fresh_service(&temp);
    let err = service.create("Bob").unwrap_err();
    assert_eq!(err.status_code(), 500);
    assert!(service.list().unwrap().is_empty());
    assert_eq!(service.peek_next_id().unwrap(), 1);
    assert_eq!(read_log(&temp), "ID,Name\n1,\"Ada\n");
}

/// A deleted log is recreated with a header on the next create.
#[test]
fn test_create_recreates_deleted_log() {
    let temp = TempDir::new().unwrap();
    let service = fresh_service(&temp);
    service.create("Ada").unwrap();

    fs::remove_file(log_path(&temp)).unwrap();

    let bob = service.create("Bob").unwrap();
    assert_eq!(bob.id, 2);
    assert_eq!(read_log(&temp), "ID,Name\n2,Bob\n");
}
