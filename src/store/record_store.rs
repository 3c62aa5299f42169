//! In-memory record store
//!
//! The authoritative map of id to person plus the next-id counter. The store
//! has no locking of its own: the service wraps it in a `RwLock` and every
//! mutating method takes `&mut self`, so callers must already hold the
//! write guard.

use std::collections::HashMap;

use super::errors::IdOverflow;
use crate::person::{Person, PersonId};

/// First identifier handed out by an empty store
pub const FIRST_ID: PersonId = 1;

/// Map of live person records and the identifier counter
#[derive(Debug)]
pub struct RecordStore {
    persons: HashMap<PersonId, Person>,
    next_id: PersonId,
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            persons: HashMap::new(),
            next_id: FIRST_ID,
        }
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.persons.get(&id)
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.persons.contains_key(&id)
    }

    /// All records ordered by id
    pub fn list(&self) -> Vec<Person> {
        let mut persons: Vec<Person> = self.persons.values().cloned().collect();
        persons.sort_by_key(|p| p.id);
        persons
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Insert or overwrite a record, keeping the counter ahead of its id
    ///
    /// A record whose id has no successor is refused and the store is left
    /// untouched.
    pub fn put(&mut self, person: Person) -> Result<(), IdOverflow> {
        if person.id >= self.next_id {
            self.next_id = person.id.checked_add(1).ok_or(IdOverflow(person.id))?;
        }
        self.persons.insert(person.id, person);
        Ok(())
    }

    /// Remove a record; returns whether it was present
    pub fn delete(&mut self, id: PersonId) -> bool {
        self.persons.remove(&id).is_some()
    }

    /// Mint a fresh identifier
    pub fn next_id(&mut self) -> Result<PersonId, IdOverflow> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(IdOverflow(id))?;
        Ok(id)
    }

    /// The identifier the next create would receive
    pub fn peek_next_id(&self) -> PersonId {
        self.next_id
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_starts_at_one() {
        let mut store = RecordStore::new();
        assert!(store.is_empty());
        assert_eq!(store.next_id(), Ok(1));
        assert_eq!(store.next_id(), Ok(2));
    }

    #[test]
    fn test_put_advances_counter() {
        let mut store = RecordStore::new();
        store.put(Person::new(3, "Ada")).unwrap();
        store.put(Person::new(7, "Bob")).unwrap();
        store.put(Person::new(2, "Cy")).unwrap();

        assert_eq!(store.peek_next_id(), 8);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_put_overwrites() {
        let mut store = RecordStore::new();
        store.put(Person::new(1, "Ada")).unwrap();
        store.put(Person::new(1, "Ada L")).unwrap();

        assert_eq!(store.get(1).unwrap().name, "Ada L");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_never_rewinds_counter() {
        let mut store = RecordStore::new();
        let id = store.next_id().unwrap();
        store.put(Person::new(id, "Ada")).unwrap();

        assert!(store.delete(id));
        assert!(!store.delete(id));
        assert!(store.get(id).is_none());
        assert_eq!(store.next_id(), Ok(id + 1));
    }

    #[test]
    fn test_list_is_ordered() {
        let mut store = RecordStore::new();
        store.put(Person::new(5, "E")).unwrap();
        store.put(Person::new(1, "A")).unwrap();
        store.put(Person::new(3, "C")).unwrap();

        let ids: Vec<_> = store.list().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn test_put_refuses_id_without_successor() {
        let mut store = RecordStore::new();
        store.put(Person::new(1, "Ada")).unwrap();

        assert_eq!(
            store.put(Person::new(PersonId::MAX, "Max")),
            Err(IdOverflow(PersonId::MAX))
        );
        assert!(store.get(PersonId::MAX).is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.peek_next_id(), 2);
    }

    #[test]
    fn test_next_id_stops_at_the_last_id() {
        let mut store = RecordStore::new();
        store.put(Person::new(PersonId::MAX - 2, "Ada")).unwrap();

        assert_eq!(store.next_id(), Ok(PersonId::MAX - 1));
        assert_eq!(store.next_id(), Err(IdOverflow(PersonId::MAX)));
        // The failed mint leaves the counter where it was.
        assert_eq!(store.peek_next_id(), PersonId::MAX);
    }
}
