//! Department labels and department sets.
//!
//! Labels form a closed vocabulary; `ALL` is a wildcard meaning "every
//! department". Content carries a set of labels, users carry exactly one.
//! Matching is member-wise over parsed labels, so one label can never
//! match as a substring of another.
//!
//! The storage encoding is the normalized form: uppercase, comma-joined,
//! duplicate-free, in canonical label order.

use std::collections::BTreeSet;
use std::fmt;

/// One member of the closed department vocabulary.
///
/// `All` sorts first so it leads the encoded form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Department {
    All,
    Cse,
    Ece,
    Eee,
    Mech,
    Civil,
}

/// Errors from parsing department labels or sets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DepartmentError {
    #[error("unknown department label: {0}")]
    UnknownLabel(String),

    #[error("department set is empty")]
    Empty,
}

impl Department {
    /// All specific (non-wildcard) labels, in canonical order.
    pub const SPECIFIC: [Department; 5] = [
        Department::Cse,
        Department::Ece,
        Department::Eee,
        Department::Mech,
        Department::Civil,
    ];

    /// Parse a single label, case-insensitively.
    pub fn parse(raw: &str) -> Result<Self, DepartmentError> {
        match raw.trim().to_uppercase().as_str() {
            "ALL" => Ok(Department::All),
            "CSE" => Ok(Department::Cse),
            "ECE" => Ok(Department::Ece),
            "EEE" => Ok(Department::Eee),
            "MECH" => Ok(Department::Mech),
            "CIVIL" => Ok(Department::Civil),
            other => Err(DepartmentError::UnknownLabel(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::All => "ALL",
            Department::Cse => "CSE",
            Department::Ece => "ECE",
            Department::Eee => "EEE",
            Department::Mech => "MECH",
            Department::Civil => "CIVIL",
        }
    }

    /// Whether this label is the wildcard.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Department::All)
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-empty set of department labels attached to a content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentSet(BTreeSet<Department>);

impl DepartmentSet {
    /// Parse a comma-joined list of labels.
    ///
    /// Rejects unknown labels and empty input. Duplicates collapse.
    pub fn parse(raw: &str) -> Result<Self, DepartmentError> {
        let mut labels = BTreeSet::new();
        for token in raw.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            labels.insert(Department::parse(token)?);
        }
        if labels.is_empty() {
            return Err(DepartmentError::Empty);
        }
        Ok(Self(labels))
    }

    /// The normalized storage encoding: uppercase, comma-joined,
    /// duplicate-free, canonical order.
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(Department::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Whether the set contains the wildcard label.
    pub fn grants_all(&self) -> bool {
        self.0.contains(&Department::All)
    }

    /// Whether a member of `department` may see content tagged with this
    /// set: the set carries the wildcard, or contains that exact label.
    pub fn visible_to(&self, department: Department) -> bool {
        self.grants_all() || self.0.contains(&department)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DepartmentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromIterator<Department> for DepartmentSet {
    fn from_iter<I: IntoIterator<Item = Department>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
