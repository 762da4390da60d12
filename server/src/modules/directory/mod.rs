//! Organizational directory: the closed department vocabulary.

pub mod department;

pub use department::{Department, DepartmentError, DepartmentSet};
