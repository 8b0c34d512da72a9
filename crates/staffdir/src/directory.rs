//! Persistence of the employee collection.
//!
//! The whole collection lives under a single key as one JSON array and is
//! read and written wholesale. Uniqueness of phone and email is checked at
//! save time only.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::employee::{seed_employees, Employee, EmployeeId};
use crate::error::{Error, Result};
use crate::storage::{KeyValueStore, EMPLOYEES_KEY};

/// The employee collection on top of a key/value store.
#[derive(Debug, Clone)]
pub struct Directory {
    store: Arc<dyn KeyValueStore>,
    seed_count: usize,
}

impl Directory {
    /// Create a directory over `store`, seeding `seed_count` records when the
    /// store holds no collection.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, seed_count: usize) -> Self {
        Self { store, seed_count }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Write the seed dataset if the store holds no collection yet.
    ///
    /// Returns `true` if the seed was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn ensure_seeded(&self) -> Result<bool> {
        if self.store.get(EMPLOYEES_KEY)?.is_some() {
            return Ok(false);
        }
        self.save(&seed_employees(self.seed_count))?;
        info!(count = self.seed_count, "Seeded employee collection");
        Ok(true)
    }

    /// Replace the stored collection with the seed dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn reset(&self) -> Result<()> {
        self.save(&seed_employees(self.seed_count))?;
        info!(count = self.seed_count, "Reset employee collection to seed");
        Ok(())
    }

    /// Read the whole collection.
    ///
    /// A missing collection reads as the seed dataset, and so does one that
    /// is not a JSON array. Records in the array that do not decode as an
    /// employee are skipped with a warning; the rest are kept.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store itself cannot be read.
    pub fn load(&self) -> Result<Vec<Employee>> {
        let Some(raw) = self.store.get(EMPLOYEES_KEY)? else {
            debug!("No stored collection, using seed data");
            return Ok(seed_employees(self.seed_count));
        };

        let records: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Stored collection is malformed, using seed data");
                return Ok(seed_employees(self.seed_count));
            }
        };

        let employees = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(employee) => Some(employee),
                Err(e) => {
                    warn!(index, error = %e, "Skipping unreadable employee record");
                    None
                }
            })
            .collect();
        Ok(employees)
    }

    /// Write the whole collection.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn save(&self, employees: &[Employee]) -> Result<()> {
        let json = serde_json::to_string(employees)?;
        self.store.set(EMPLOYEES_KEY, &json)?;
        debug!(count = employees.len(), "Saved employee collection");
        Ok(())
    }

    /// Look up one employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn find(&self, id: &EmployeeId) -> Result<Option<Employee>> {
        Ok(self.load()?.into_iter().find(|e| &e.id == id))
    }

    /// Add a new employee, assigning it the next free integer identifier.
    ///
    /// Any identifier already on `employee` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicatePhone`] or [`Error::DuplicateEmail`] on a
    /// uniqueness collision, or [`Error::IdsExhausted`] when no larger
    /// integer identifier exists, leaving the collection untouched.
    pub fn insert(&self, mut employee: Employee) -> Result<Employee> {
        let mut employees = self.load()?;
        check_unique(&employees, &employee, None)?;

        employee.id = next_id(&employees)?;
        employee.selected = false;
        employees.push(employee.clone());
        self.save(&employees)?;
        info!(id = %employee.id, "Added employee");
        Ok(employee)
    }

    /// Replace the stored fields of an existing employee in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmployeeNotFound`] if no record has `employee.id`,
    /// or a duplicate error on a uniqueness collision with another record.
    pub fn update(&self, mut employee: Employee) -> Result<Employee> {
        let mut employees = self.load()?;
        check_unique(&employees, &employee, Some(&employee.id))?;

        let slot = employees
            .iter_mut()
            .find(|e| e.id == employee.id)
            .ok_or_else(|| Error::EmployeeNotFound(employee.id.clone()))?;
        employee.selected = false;
        *slot = employee.clone();
        self.save(&employees)?;
        info!(id = %employee.id, "Updated employee");
        Ok(employee)
    }

    /// Remove one employee.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmployeeNotFound`] if no record has `id`.
    pub fn delete(&self, id: &EmployeeId) -> Result<Employee> {
        let mut employees = self.load()?;
        let index = employees
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| Error::EmployeeNotFound(id.clone()))?;
        let removed = employees.remove(index);
        self.save(&employees)?;
        info!(%id, "Deleted employee");
        Ok(removed)
    }
}

/// The identifier one above the largest integer identifier in `employees`.
///
/// Non-numeric identifiers are ignored; an empty collection yields `1`.
///
/// # Errors
///
/// Returns [`Error::IdsExhausted`] if the largest identifier is `u64::MAX`.
pub fn next_id(employees: &[Employee]) -> Result<EmployeeId> {
    let max = employees
        .iter()
        .filter_map(|e| e.id.as_number())
        .max()
        .unwrap_or(0);
    max.checked_add(1)
        .map(EmployeeId::from)
        .ok_or_else(|| Error::IdsExhausted(EmployeeId::from(max)))
}

/// Check `candidate` against every record except `exclude` for a phone or
/// email collision.
///
/// Phones compare exactly in canonical form; emails compare ignoring case.
///
/// # Errors
///
/// Returns the first collision found, phone before email.
pub fn check_unique(
    employees: &[Employee],
    candidate: &Employee,
    exclude: Option<&EmployeeId>,
) -> Result<()> {
    let others = employees.iter().filter(|e| Some(&e.id) != exclude);

    if let Some(owner) = others.clone().find(|e| e.phone == candidate.phone) {
        return Err(Error::DuplicatePhone {
            phone: candidate.phone.clone(),
            owner: owner.id.clone(),
        });
    }

    let email = candidate.email.to_lowercase();
    if let Some(owner) = others.clone().find(|e| e.email.to_lowercase() == email) {
        return Err(Error::DuplicateEmail {
            email: candidate.email.clone(),
            owner: owner.id.clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::{Department, Position};
    use crate::storage::MemoryStore;

    fn create_test_directory(seed_count: usize) -> Directory {
        Directory::new(Arc::new(MemoryStore::new()), seed_count)
    }

    fn new_employee(phone: &str, email: &str) -> Employee {
        Employee {
            id: EmployeeId::new(""),
            first_name: "Selin".to_string(),
            last_name: "Kaya".to_string(),
            employment_date: None,
            birth_date: None,
            phone: phone.to_string(),
            email: email.to_string(),
            department: Department::Tech,
            position: Position::Senior,
            selected: false,
        }
    }

    #[test]
    fn test_empty_store_loads_seed() {
        let directory = create_test_directory(12);
        let employees = directory.load().unwrap();
        assert_eq!(employees.len(), 12);
    }

    #[test]
    fn test_ensure_seeded_only_once() {
        let directory = create_test_directory(5);
        assert!(directory.ensure_seeded().unwrap());
        directory.save(&[]).unwrap();
        assert!(!directory.ensure_seeded().unwrap());
        assert!(directory.load().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_collection_loads_seed() {
        let directory = create_test_directory(4);
        directory.store().set(EMPLOYEES_KEY, "{broken").unwrap();
        assert_eq!(directory.load().unwrap().len(), 4);
    }

    #[test]
    fn test_non_array_collection_loads_seed() {
        let directory = create_test_directory(4);
        directory.store().set(EMPLOYEES_KEY, r#"{"id": 1}"#).unwrap();
        assert_eq!(directory.load().unwrap().len(), 4);
    }

    #[test]
    fn test_unreadable_record_is_skipped() {
        let directory = create_test_directory(50);
        let mut records = serde_json::to_value(seed_employees(3)).unwrap();
        records[1]["department"] = Value::from("HR");
        records[2]["id"] = Value::from(-1);
        directory
            .store()
            .set(EMPLOYEES_KEY, &records.to_string())
            .unwrap();

        let employees = directory.load().unwrap();
        let ids: Vec<_> = employees.iter().map(|e| e.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "-1"]);
    }

    #[test]
    fn test_delete_keeps_readable_records_over_seed() {
        let directory = create_test_directory(50);
        let mut records = serde_json::to_value(seed_employees(3)).unwrap();
        records[2]["department"] = Value::from("HR");
        directory
            .store()
            .set(EMPLOYEES_KEY, &records.to_string())
            .unwrap();

        directory.delete(&EmployeeId::from(1)).unwrap();
        let employees = directory.load().unwrap();
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].id, EmployeeId::from(2));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let directory = create_test_directory(0);
        let employees = seed_employees(30);
        directory.save(&employees).unwrap();
        assert_eq!(directory.load().unwrap(), employees);
    }

    #[test]
    fn test_insert_assigns_next_id() {
        let directory = create_test_directory(3);
        directory.ensure_seeded().unwrap();

        let added = directory
            .insert(new_employee("+905559876543", "selin@kaya.org"))
            .unwrap();
        assert_eq!(added.id, EmployeeId::from(4));
        assert_eq!(directory.load().unwrap().len(), 4);
    }

    #[test]
    fn test_insert_rejects_duplicate_phone() {
        let directory = create_test_directory(3);
        directory.ensure_seeded().unwrap();
        let taken = directory.load().unwrap()[1].phone.clone();

        let err = directory
            .insert(new_employee(&taken, "fresh@kaya.org"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicatePhone { .. }));
        assert_eq!(directory.load().unwrap().len(), 3);
    }

    #[test]
    fn test_insert_rejects_duplicate_email_ignoring_case() {
        let directory = create_test_directory(3);
        directory.ensure_seeded().unwrap();
        let taken = directory.load().unwrap()[0].email.to_uppercase();

        let err = directory
            .insert(new_employee("+905559876543", &taken))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateEmail { .. }));
    }

    #[test]
    fn test_update_in_place() {
        let directory = create_test_directory(3);
        directory.ensure_seeded().unwrap();

        let mut employee = directory.find(&EmployeeId::from(2)).unwrap().unwrap();
        employee.position = Position::Senior;
        employee.first_name = "Deniz".to_string();
        directory.update(employee).unwrap();

        let employees = directory.load().unwrap();
        assert_eq!(employees.len(), 3);
        assert_eq!(employees[1].first_name, "Deniz");
        assert_eq!(employees[1].id, EmployeeId::from(2));
    }

    #[test]
    fn test_update_keeping_own_phone_is_not_duplicate() {
        let directory = create_test_directory(3);
        directory.ensure_seeded().unwrap();

        let mut employee = directory.find(&EmployeeId::from(1)).unwrap().unwrap();
        employee.last_name = "Changed".to_string();
        assert!(directory.update(employee).is_ok());
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let directory = create_test_directory(2);
        let mut ghost = new_employee("+905559876543", "ghost@kaya.org");
        ghost.id = EmployeeId::from(99);
        assert!(directory.update(ghost).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_removes_only_target() {
        let directory = create_test_directory(5);
        directory.ensure_seeded().unwrap();

        let removed = directory.delete(&EmployeeId::from(3)).unwrap();
        assert_eq!(removed.id, EmployeeId::from(3));

        let ids: Vec<_> = directory
            .load()
            .unwrap()
            .into_iter()
            .map(|e| e.id.to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2", "4", "5"]);
    }

    #[test]
    fn test_delete_missing() {
        let directory = create_test_directory(2);
        assert!(directory
            .delete(&EmployeeId::from(42))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_next_id_skips_non_numeric() {
        let mut employees = seed_employees(2);
        employees[0].id = EmployeeId::new("legacy");
        assert_eq!(next_id(&employees).unwrap(), EmployeeId::from(3));
        assert_eq!(next_id(&[]).unwrap(), EmployeeId::from(1));
    }

    #[test]
    fn test_next_id_at_max_is_exhausted() {
        let mut employees = seed_employees(2);
        employees[1].id = EmployeeId::from(u64::MAX);
        assert!(matches!(next_id(&employees), Err(Error::IdsExhausted(_))));
    }

    #[test]
    fn test_insert_after_max_id_leaves_collection() {
        let directory = create_test_directory(0);
        let mut employees = seed_employees(2);
        employees[1].id = EmployeeId::from(u64::MAX);
        directory.save(&employees).unwrap();

        let err = directory
            .insert(new_employee("+905559876543", "selin@kaya.org"))
            .unwrap_err();
        assert!(matches!(err, Error::IdsExhausted(_)));
        assert_eq!(directory.load().unwrap(), employees);
    }

    #[test]
    fn test_reset_restores_seed() {
        let directory = create_test_directory(6);
        directory.save(&[]).unwrap();
        directory.reset().unwrap();
        assert_eq!(directory.load().unwrap().len(), 6);
    }
}
