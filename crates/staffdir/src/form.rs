//! The create/edit form.
//!
//! [`FormView`] keeps a [`Draft`] of the fields as typed, per-field
//! validation results, and, when editing, a snapshot of the draft as opened
//! so unchanged edits cannot be saved.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, info};

use crate::config::Config;
use crate::directory::Directory;
use crate::employee::{Department, Employee, EmployeeId, Position};
use crate::error::{Error, Result};
use crate::format::{canonical_phone, digit_count, format_phone, format_phone_input};
use crate::i18n::Messages;
use crate::router::Route;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

const DATE_FORMAT: &str = "%Y-%m-%d";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("Invalid regex pattern"))
}

/// An input on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Given name.
    FirstName,
    /// Family name.
    LastName,
    /// Hire date.
    EmploymentDate,
    /// Date of birth.
    BirthDate,
    /// Phone number.
    Phone,
    /// Email address.
    Email,
    /// Department.
    Department,
    /// Position.
    Position,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Self; 8] = [
        Self::FirstName,
        Self::LastName,
        Self::EmploymentDate,
        Self::BirthDate,
        Self::Phone,
        Self::Email,
        Self::Department,
        Self::Position,
    ];

    /// Fields that must be filled in.
    pub const REQUIRED: [Self; 6] = [
        Self::FirstName,
        Self::LastName,
        Self::Phone,
        Self::Email,
        Self::Department,
        Self::Position,
    ];

    /// Stable key, shared with the message tables.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::EmploymentDate => "employmentDate",
            Self::BirthDate => "birthDate",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Department => "department",
            Self::Position => "position",
        }
    }

    /// Whether the field must be filled in.
    #[must_use]
    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().replace(['-', '_'], "");
        Self::ALL
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::parse("field", s))
    }
}

/// The form's fields as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Hire date, `YYYY-MM-DD` or empty.
    pub employment_date: String,
    /// Date of birth, `YYYY-MM-DD` or empty.
    pub birth_date: String,
    /// Phone number in display form.
    pub phone: String,
    /// Email address.
    pub email: String,
    /// Department name.
    pub department: String,
    /// Position name.
    pub position: String,
}

impl Draft {
    /// Fill a draft from a stored employee, phone in display form.
    #[must_use]
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            employment_date: employee
                .employment_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            birth_date: employee
                .birth_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            phone: format_phone(&employee.phone),
            email: employee.email.clone(),
            department: employee.department.to_string(),
            position: employee.position.to_string(),
        }
    }

    /// Value of one field.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::EmploymentDate => &self.employment_date,
            Field::BirthDate => &self.birth_date,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
            Field::Department => &self.department,
            Field::Position => &self.position,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::EmploymentDate => &mut self.employment_date,
            Field::BirthDate => &mut self.birth_date,
            Field::Phone => &mut self.phone,
            Field::Email => &mut self.email,
            Field::Department => &mut self.department,
            Field::Position => &mut self.position,
        }
    }

    /// Build an employee with `id`, phone reduced to canonical form.
    ///
    /// # Errors
    ///
    /// Returns a parse error for an unknown department or position or a
    /// malformed date.
    pub fn to_employee(&self, id: EmployeeId) -> Result<Employee> {
        Ok(Employee {
            id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            employment_date: parse_date(&self.employment_date)?,
            birth_date: parse_date(&self.birth_date)?,
            phone: canonical_phone(&self.phone),
            email: self.email.trim().to_string(),
            department: self.department.parse::<Department>()?,
            position: self.position.parse::<Position>()?,
            selected: false,
        })
    }
}

fn parse_date(value: &str) -> Result<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|_| Error::parse("date", value))
}

/// Fields that failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    invalid: BTreeSet<Field>,
}

impl FieldErrors {
    /// Whether `field` is marked invalid.
    #[must_use]
    pub fn is_invalid(&self, field: Field) -> bool {
        self.invalid.contains(&field)
    }

    /// Whether every field is valid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.invalid.is_empty()
    }

    /// Invalid fields in form order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.invalid.iter().copied()
    }

    fn mark(&mut self, field: Field, valid: bool) {
        if valid {
            self.invalid.remove(&field);
        } else {
            self.invalid.insert(field);
        }
    }

    fn clear(&mut self) {
        self.invalid.clear();
    }
}

impl From<&FieldErrors> for Error {
    fn from(errors: &FieldErrors) -> Self {
        Self::Validation {
            fields: errors.fields().map(Field::key).collect(),
        }
    }
}

/// Validation and notification settings for the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSettings {
    /// Minimum phone digits, country code included.
    pub min_phone_digits: usize,
    /// Lifetime of form notifications.
    pub toast_duration: Duration,
}

impl FormSettings {
    /// Take the form settings from `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_phone_digits: config.form.min_phone_digits,
            toast_duration: config.form_toast_duration(),
        }
    }
}

impl Default for FormSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Check a single field value.
#[must_use]
pub fn is_field_valid(field: Field, value: &str, settings: &FormSettings) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return !field.is_required();
    }
    match field {
        Field::Phone => digit_count(value) >= settings.min_phone_digits,
        Field::Email => email_regex().is_match(value),
        Field::EmploymentDate | Field::BirthDate => parse_date(value).is_ok(),
        Field::Department => value.parse::<Department>().is_ok(),
        Field::Position => value.parse::<Position>().is_ok(),
        Field::FirstName | Field::LastName => true,
    }
}

/// Whether the form adds a new employee or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// Add a new employee.
    Create,
    /// Edit the employee with this identifier.
    Edit(EmployeeId),
}

/// Result of a confirmed save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new employee was added.
    Added(Employee),
    /// An existing employee was updated.
    Updated(Employee),
}

impl SaveOutcome {
    /// Message key for the success notification.
    #[must_use]
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::Added(_) => "employeeAdded",
            Self::Updated(_) => "employeeUpdated",
        }
    }

    /// The saved employee.
    #[must_use]
    pub fn employee(&self) -> &Employee {
        match self {
            Self::Added(e) | Self::Updated(e) => e,
        }
    }
}

/// State of the form screen.
#[derive(Debug, Clone)]
pub struct FormView {
    settings: FormSettings,
    mode: FormMode,
    draft: Draft,
    original: Draft,
    errors: FieldErrors,
    confirm_open: bool,
}

impl FormView {
    /// An empty form for adding an employee.
    #[must_use]
    pub fn create(settings: FormSettings) -> Self {
        Self {
            settings,
            mode: FormMode::Create,
            draft: Draft::default(),
            original: Draft::default(),
            errors: FieldErrors::default(),
            confirm_open: false,
        }
    }

    /// A form filled with the stored employee `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmployeeNotFound`] if no such employee exists.
    pub fn edit(directory: &Directory, id: &EmployeeId, settings: FormSettings) -> Result<Self> {
        let employee = directory
            .find(id)?
            .ok_or_else(|| Error::EmployeeNotFound(id.clone()))?;
        let draft = Draft::from_employee(&employee);
        Ok(Self {
            settings,
            mode: FormMode::Edit(id.clone()),
            original: draft.clone(),
            draft,
            errors: FieldErrors::default(),
            confirm_open: false,
        })
    }

    /// Create or edit.
    #[must_use]
    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Whether an existing employee is being edited.
    #[must_use]
    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    /// The working copy.
    #[must_use]
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Validation results so far.
    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Change one field and validate it. Phone input is reformatted as it
    /// is typed.
    pub fn set_field(&mut self, field: Field, value: &str) -> bool {
        let value = match field {
            Field::Phone => format_phone_input(value),
            _ => value.to_string(),
        };
        *self.draft.slot(field) = value;
        self.validate_field(field)
    }

    /// Validate one field, recording the result.
    pub fn validate_field(&mut self, field: Field) -> bool {
        let valid = is_field_valid(field, self.draft.get(field), &self.settings);
        self.errors.mark(field, valid);
        valid
    }

    /// Validate every field, recording the results.
    pub fn validate_all(&mut self) -> bool {
        Field::ALL
            .into_iter()
            .fold(true, |ok, field| self.validate_field(field) && ok)
    }

    /// Whether every field currently holds a valid value.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        Field::ALL
            .into_iter()
            .all(|field| is_field_valid(field, self.draft.get(field), &self.settings))
    }

    /// Whether anything differs from the draft as opened.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.draft != self.original
    }

    /// Whether the save button is enabled.
    #[must_use]
    pub fn can_save(&self) -> bool {
        self.is_valid() && (!self.is_edit() || self.is_dirty())
    }

    /// Open the confirmation step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the invalid fields, or
    /// [`Error::Unchanged`] for an edit that changes nothing.
    pub fn submit(&mut self) -> Result<()> {
        if !self.validate_all() {
            return Err((&self.errors).into());
        }
        if self.is_edit() && !self.is_dirty() {
            return Err(Error::Unchanged);
        }
        self.confirm_open = true;
        Ok(())
    }

    /// Whether the confirmation step is open.
    #[must_use]
    pub fn is_confirm_open(&self) -> bool {
        self.confirm_open
    }

    /// Text of the confirmation step in the language of `messages`.
    #[must_use]
    pub fn confirm_message(&self, messages: &Messages) -> String {
        let key = if self.is_edit() { "confirmEdit" } else { "confirmAdd" };
        format!(
            "{} {} {}?",
            messages.get(key),
            self.draft.first_name,
            self.draft.last_name
        )
    }

    /// Close the confirmation step without saving.
    pub fn cancel_confirm(&mut self) {
        self.confirm_open = false;
    }

    /// Save the draft after confirmation.
    ///
    /// Uniqueness is checked against every other stored record. A new
    /// employee gets the next free identifier and the draft is cleared; an
    /// edit replaces the stored record in place.
    ///
    /// Returns `None` if the confirmation step is not open.
    ///
    /// # Errors
    ///
    /// Returns a duplicate error on a phone or email collision, or
    /// [`Error::EmployeeNotFound`] if the edited record vanished meanwhile.
    pub fn proceed_confirm(&mut self, directory: &Directory) -> Result<Option<SaveOutcome>> {
        if !self.confirm_open {
            return Ok(None);
        }
        self.confirm_open = false;

        let outcome = match &self.mode {
            FormMode::Create => {
                let candidate = self.draft.to_employee(EmployeeId::new(""))?;
                let added = directory.insert(candidate)?;
                self.draft = Draft::default();
                SaveOutcome::Added(added)
            }
            FormMode::Edit(id) => {
                let candidate = self.draft.to_employee(id.clone())?;
                let updated = directory.update(candidate)?;
                self.original = self.draft.clone();
                SaveOutcome::Updated(updated)
            }
        };
        info!(id = %outcome.employee().id, "Saved employee from form");
        Ok(Some(outcome))
    }

    /// Clear the working copy and every validation result.
    pub fn reset(&mut self) {
        debug!("Form reset");
        self.draft = Draft::default();
        self.errors.clear();
    }

    /// Leave the form without saving.
    #[must_use]
    pub fn cancel(&self) -> Route {
        Route::List
    }

    /// How long form notifications stay visible.
    #[must_use]
    pub fn toast_duration(&self) -> Duration {
        self.settings.toast_duration
    }
}
