//! Departmental visibility over a catalog snapshot.
//!
//! Pure functions: given the requester's scope, the full catalog, and the
//! derived view counts, compute the subset the requester may see, newest
//! first, each record annotated with its view count.

use std::collections::HashMap;

use entity::content;
use tracing::warn;

use crate::modules::directory::{Department, DepartmentSet};

/// A catalog record annotated with its derived view count.
#[derive(Debug, Clone)]
pub struct AnnotatedContent {
    pub record: content::Model,
    pub view_count: i64,
}

/// Compute the records visible to a requester.
///
/// Administrators and wildcard-department requesters see the entire
/// catalog. Everyone else sees records whose department set carries the
/// wildcard or contains their exact department. A stored record whose
/// department set is empty or unparseable is excluded from every
/// non-admin result (the admin bypass returns it regardless, since the
/// bypass performs no filtering at all).
///
/// Results are ordered by `created_at` descending, ties broken by id
/// descending. No side effects; concurrent calls never interact.
pub fn resolve(
    requester_department: Department,
    requester_is_admin: bool,
    catalog: Vec<content::Model>,
    counts: &HashMap<i32, i64>,
) -> Vec<AnnotatedContent> {
    let bypass = requester_is_admin || requester_department.is_wildcard();

    let mut visible: Vec<content::Model> = catalog
        .into_iter()
        .filter(|record| bypass || member_may_see(requester_department, record))
        .collect();

    visible.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });

    visible
        .into_iter()
        .map(|record| {
            let view_count = counts.get(&record.id).copied().unwrap_or(0);
            AnnotatedContent { record, view_count }
        })
        .collect()
}

fn member_may_see(department: Department, record: &content::Model) -> bool {
    match DepartmentSet::parse(&record.departments) {
        Ok(set) => set.visible_to(department),
        // Fail closed: a record without a valid department scope is
        // invisible outside the admin bypass.
        Err(err) => {
            warn!(
                content_id = record.id,
                departments = %record.departments,
                error = %err,
                "Content record has an invalid department set; hiding it"
            );
            false
        }
    }
}
