//! Name-indexed lookups over one level of a coverage tree, used to pair a
//! current entity with its baseline counterpart.
//!
//! Names are assumed unique within a level. On collision the entity that
//! comes later in the report replaces the earlier one in the index.

use std::collections::HashMap;

use crate::model::{CoverageReport, File, Function, Target};

/// An entity that is matched across reports by its name.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Target {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for File {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Function {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Borrowed name → entity map over a slice of siblings.
pub type NameIndex<'a, T> = HashMap<&'a str, &'a T>;

/// Index a slice of siblings by name; later duplicates win.
#[must_use]
pub fn by_name<T: Named>(items: &[T]) -> NameIndex<'_, T> {
    let mut index = HashMap::with_capacity(items.len());
    for item in items {
        index.insert(item.name(), item);
    }
    index
}

#[must_use]
pub fn targets(report: &CoverageReport) -> NameIndex<'_, Target> {
    by_name(&report.targets)
}

#[must_use]
pub fn files(target: &Target) -> NameIndex<'_, File> {
    by_name(&target.files)
}

#[must_use]
pub fn functions(file: &File) -> NameIndex<'_, Function> {
    by_name(&file.functions)
}
