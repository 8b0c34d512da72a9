//! Core employee record types for staffdir.
//!
//! This module defines the record stored in the directory, its enumerated
//! fields, and the built-in dataset used to seed an empty store.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// Identifier of an employee record.
///
/// Stored records may carry either a JSON number or a string; both read into
/// the same identifier and are always written back as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    /// Create an identifier from its string form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier as an integer, if it is one.
    #[must_use]
    pub fn as_number(&self) -> Option<u64> {
        self.0.trim().parse().ok()
    }
}

impl From<u64> for EmployeeId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for EmployeeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EmployeeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Unsigned(u64),
            Signed(i64),
            Float(f64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Unsigned(n) => Self::from(n),
            Raw::Signed(n) => Self(n.to_string()),
            Raw::Float(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
        })
    }
}

/// Department an employee belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    /// Analytics department.
    Analytics,
    /// Technology department.
    Tech,
}

impl Department {
    /// Every department, in display order.
    pub const ALL: [Self; 2] = [Self::Analytics, Self::Tech];
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analytics => write!(f, "Analytics"),
            Self::Tech => write!(f, "Tech"),
        }
    }
}

impl FromStr for Department {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::parse("department", s))
    }
}

/// Seniority of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// Junior position.
    Junior,
    /// Medior position.
    Medior,
    /// Senior position.
    Senior,
}

impl Position {
    /// Every position, in display order.
    pub const ALL: [Self; 3] = [Self::Junior, Self::Medior, Self::Senior];
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Junior => write!(f, "Junior"),
            Self::Medior => write!(f, "Medior"),
            Self::Senior => write!(f, "Senior"),
        }
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::parse("position", s))
    }
}

/// An employee record.
///
/// The JSON layout keeps the camelCase keys of the persisted collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Unique identifier.
    pub id: EmployeeId,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Date the employee was hired.
    #[serde(default, deserialize_with = "optional_date")]
    pub employment_date: Option<NaiveDate>,

    /// Date of birth.
    #[serde(default, deserialize_with = "optional_date")]
    pub birth_date: Option<NaiveDate>,

    /// Phone number in canonical `+<country><digits>` form.
    pub phone: String,

    /// Email address.
    pub email: String,

    /// Department.
    pub department: Department,

    /// Position.
    pub position: Position,

    /// Row selection in the list view. Never persisted.
    #[serde(skip)]
    pub selected: bool,
}

impl Employee {
    /// Full display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// String forms of every persisted field, in declaration order.
    #[must_use]
    pub fn field_values(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.employment_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            self.birth_date.map(|d| d.to_string()).unwrap_or_default(),
            self.phone.clone(),
            self.email.clone(),
            self.department.to_string(),
            self.position.to_string(),
        ]
    }

    /// Check whether any field contains `query`, ignoring case.
    ///
    /// An empty query matches every record.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.field_values()
            .iter()
            .any(|value| value.to_lowercase().contains(&needle))
    }
}

/// Accept a missing, null, or empty date as "no date".
fn optional_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Number of records in the built-in dataset.
pub const DEFAULT_SEED_COUNT: usize = 891;

const SEED_FIRST_NAMES: [&str; 8] = [
    "Ahmet", "Ayse", "Mehmet", "Elif", "Can", "Zeynep", "Emre", "Selin",
];

const SEED_LAST_NAMES: [&str; 6] = [
    "Sourtimes", "Yilmaz", "Kaya", "Demir", "Celik", "Sahin",
];

/// Build the built-in dataset used when the store holds no collection.
///
/// Records are deterministic and carry unique phone numbers and email
/// addresses so every seeded record can be edited without tripping the
/// uniqueness checks.
#[must_use]
pub fn seed_employees(count: usize) -> Vec<Employee> {
    let employment_date = NaiveDate::from_ymd_opt(2022, 9, 23);
    let birth_date = NaiveDate::from_ymd_opt(1994, 4, 12);

    (1..=count)
        .map(|n| {
            let first_name = SEED_FIRST_NAMES[(n - 1) % SEED_FIRST_NAMES.len()];
            let last_name = SEED_LAST_NAMES[(n - 1) % SEED_LAST_NAMES.len()];
            Employee {
                id: EmployeeId::new(n.to_string()),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                employment_date,
                birth_date,
                phone: format!("+90532{n:07}"),
                email: format!(
                    "{}.{n}@{}.org",
                    first_name.to_lowercase(),
                    last_name.to_lowercase()
                ),
                department: Department::ALL[n % Department::ALL.len()],
                position: Position::ALL[n % Position::ALL.len()],
                selected: false,
            }
        })
        .collect()
}
