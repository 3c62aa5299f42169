//! # Person Service
//!
//! Coordinates the record store, the durable log and the reconciler under a
//! single reader/writer lock.
//!
//! - `get` and `list` take the shared lock and read memory only.
//! - `create` and `update` take the exclusive lock, reload the log, validate,
//!   mutate the store and persist, all before releasing the lock.
//! - `delete` takes the exclusive lock but trusts the in-memory view and does
//!   not reload first.
//!
//! The store is mutated before the log is written. When persistence fails the
//! in-memory change stands and the error is returned; the next reload brings
//! back whatever the log still holds.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, error, info};

use super::codec::{self, Row};
use super::durable_log::DurableLog;
use super::errors::{LogError, PersistOp, StoreError, StoreResult};
use super::reconciler::{self, ReloadReport};
use super::record_store::RecordStore;
use crate::observability::Event;
use crate::person::{is_valid_name, Person, PersonId};

/// Thread-safe person registry backed by a durable log
#[derive(Debug)]
pub struct PersonService {
    store: RwLock<RecordStore>,
    log: DurableLog,
}

impl PersonService {
    /// Create a service without touching the log
    ///
    /// The map stays empty until the first create or update reloads it.
    pub fn new(log: DurableLog) -> Self {
        Self {
            store: RwLock::new(RecordStore::new()),
            log,
        }
    }

    /// Create a service and load the log once so reads see existing records
    pub fn open(log: DurableLog) -> StoreResult<Self> {
        let service = Self::new(log);
        let report = service.reload()?;
        info!(
            event = %Event::LogLoaded,
            path = %service.log.path().display(),
            loaded = report.loaded,
            skipped = report.skipped,
            "person log opened"
        );
        Ok(service)
    }

    pub fn log(&self) -> &DurableLog {
        &self.log
    }

    /// Reload the log into memory under the exclusive lock
    pub fn reload(&self) -> StoreResult<ReloadReport> {
        let mut store = self.write_store()?;
        self.sync(&mut store)
    }

    /// Look up a single person
    pub fn get(&self, id: PersonId) -> StoreResult<Person> {
        let store = self.read_store()?;
        store.get(id).cloned().ok_or(StoreError::NotFound(id))
    }

    /// All persons currently in memory, ordered by id
    pub fn list(&self) -> StoreResult<Vec<Person>> {
        Ok(self.read_store()?.list())
    }

    /// The identifier the next create would receive
    pub fn peek_next_id(&self) -> StoreResult<PersonId> {
        Ok(self.read_store()?.peek_next_id())
    }

    /// Create a person with a freshly minted id and append it to the log
    pub fn create(&self, name: &str) -> StoreResult<Person> {
        let mut store = self.write_store()?;
        let report = self.sync(&mut store)?;
        validate(name)?;

        let person = Person::new(store.next_id()?, name);
        store.put(person.clone())?;

        // An absent log and one with no rows both still need a header.
        if report.rows == 0 {
            self.log
                .create()
                .map_err(|e| persist_failed(PersistOp::Save, person.id, e))?;
            info!(event = %Event::LogCreated, path = %self.log.path().display(), "person log created");
        }
        self.log
            .append_record(&person)
            .map_err(|e| persist_failed(PersistOp::Save, person.id, e))?;

        info!(event = %Event::PersonCreated, id = person.id, "person created");
        Ok(person)
    }

    /// Rename an existing person and rewrite the log
    pub fn update(&self, id: PersonId, name: &str) -> StoreResult<Person> {
        let mut store = self.write_store()?;
        self.sync(&mut store)?;

        if !store.contains(id) {
            return Err(StoreError::NotFound(id));
        }
        validate(name)?;

        let person = Person::new(id, name);
        store.put(person.clone())?;

        self.rewrite_row(&person)
            .map_err(|e| persist_failed(PersistOp::Update, id, e))?;

        info!(event = %Event::PersonUpdated, id, "person updated");
        Ok(person)
    }

    /// Remove a person from memory and from the log
    pub fn delete(&self, id: PersonId) -> StoreResult<()> {
        let mut store = self.write_store()?;

        if !store.delete(id) {
            return Err(StoreError::NotFound(id));
        }

        self.remove_row(id)
            .map_err(|e| persist_failed(PersistOp::Delete, id, e))?;

        info!(event = %Event::PersonDeleted, id, "person deleted");
        Ok(())
    }

    fn sync(&self, store: &mut RecordStore) -> StoreResult<ReloadReport> {
        reconciler::sync_from_log(&self.log, store).map_err(|e| {
            error!(event = %Event::PersistFailed, op = "load", error = %e, "log reload failed");
            StoreError::persistence(PersistOp::Load, e)
        })
    }

    fn rewrite_row(&self, person: &Person) -> Result<(), LogError> {
        let mut rows = self.log.read_all()?;
        let index = find_row(&rows, person.id).ok_or(LogError::MissingRow(person.id))?;
        rows[index] = codec::person_to_row(person);
        self.log.rewrite_all(&rows)
    }

    fn remove_row(&self, id: PersonId) -> Result<(), LogError> {
        let rows = self.log.read_all()?;
        // The header never parses as an id, so it is always kept.
        let kept: Vec<Row> = rows.into_iter().filter(|row| !row_has_id(row, id)).collect();
        self.log.rewrite_all(&kept)
    }

    fn read_store(&self) -> StoreResult<RwLockReadGuard<'_, RecordStore>> {
        self.store
            .read()
            .map_err(|_| StoreError::Internal("record store lock poisoned".to_string()))
    }

    fn write_store(&self) -> StoreResult<RwLockWriteGuard<'_, RecordStore>> {
        self.store
            .write()
            .map_err(|_| StoreError::Internal("record store lock poisoned".to_string()))
    }
}

fn validate(name: &str) -> StoreResult<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        debug!(event = %Event::NameRejected, name, "invalid name");
        Err(StoreError::InvalidName(name.to_string()))
    }
}

fn persist_failed(op: PersistOp, id: PersonId, source: LogError) -> StoreError {
    error!(event = %Event::PersistFailed, ?op, id, error = %source, "log write failed");
    StoreError::persistence(op, source)
}

fn row_has_id(row: &[String], id: PersonId) -> bool {
    row.first().and_then(|raw| codec::parse_id(raw)) == Some(id)
}

/// Index of the data row holding `id`
fn find_row(rows: &[Row], id: PersonId) -> Option<usize> {
    rows.iter().position(|row| row_has_id(row, id))
}
