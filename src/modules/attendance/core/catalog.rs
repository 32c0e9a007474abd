use crate::modules::volunteers::core::assignment::Assignment;
use crate::modules::volunteers::core::notes::ShiftGroup;
use std::collections::{BTreeMap, BTreeSet};

/// Distinct shift labels in first-seen order, and the groups found under each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftCatalog {
    pub shifts: Vec<String>,
    pub groups: BTreeMap<String, BTreeSet<ShiftGroup>>,
}

impl ShiftCatalog {
    pub fn groups_for(&self, shift: &str) -> Option<&BTreeSet<ShiftGroup>> {
        self.groups.get(shift)
    }

    pub fn contains(&self, shift: &str) -> bool {
        self.groups.contains_key(shift)
    }
}

pub fn derive_shift_catalog(assignments: &[Assignment]) -> ShiftCatalog {
    let mut catalog = ShiftCatalog::default();
    for assignment in assignments {
        let Some(shift) = assignment.shift_label() else {
            continue;
        };
        let groups = catalog.groups.entry(shift.to_string()).or_insert_with(|| {
            catalog.shifts.push(shift.to_string());
            BTreeSet::new()
        });
        if let Some(group) = assignment.group() {
            groups.insert(group);
        }
    }
    catalog
}
