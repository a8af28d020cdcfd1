use crate::error::MathError;

/// A named variable slot. Its value is only observable once assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierEntry {
    name: String,
    value: i64,
    assigned: bool,
    last_column: usize,
}

impl IdentifierEntry {
    fn new(name: &str, column: usize) -> Self {
        Self {
            name: name.to_string(),
            value: 0,
            assigned: false,
            last_column: column,
        }
    }

    pub fn value(&self) -> Option<i64> {
        self.assigned.then_some(self.value)
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned
    }

    /// Column where the name was last scanned.
    pub fn last_column(&self) -> usize {
        self.last_column
    }

    /// Makes the current value readable without changing it.
    pub fn mark_assigned(&mut self) {
        self.assigned = true;
    }

    pub fn set(&mut self, value: i64) {
        self.value = value;
        self.assigned = true;
    }
}

/// Session-wide variable storage. Entries are never removed.
#[derive(Debug, Default, Clone)]
pub struct IdentifierTable {
    entries: Vec<IdentifierEntry>,
}

impl IdentifierTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&IdentifierEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn get_or_create(&mut self, name: &str) -> &mut IdentifierEntry {
        let index = match self.entries.iter().position(|entry| entry.name == name) {
            Some(index) => index,
            None => {
                self.entries.push(IdentifierEntry::new(name, 0));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index]
    }

    /// Records a scanned occurrence of `name`; an existing value is left alone.
    pub fn declare(&mut self, name: &str, column: usize) {
        self.get_or_create(name).last_column = column;
    }

    /// Reads an assigned value. An unassigned read is reported at the name's
    /// last scanned column, or at `column` for a name that was never scanned.
    pub fn lookup(&self, name: &str, column: usize) -> Result<i64, MathError> {
        match self.get(name) {
            Some(entry) => entry
                .value()
                .ok_or_else(|| MathError::unassigned(name, entry.last_column)),
            None => Err(MathError::unassigned(name, column)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn declared_names_are_unassigned() {
        let mut table = IdentifierTable::new();
        table.declare("x", 3);

        let entry = table.get("x").unwrap();
        assert!(!entry.is_assigned());
        assert_eq!(entry.value(), None);
        assert_eq!(
            table.lookup("x", 3).unwrap_err().kind,
            ErrorKind::UnassignedIdentifierUse("x".to_string())
        );
    }

    #[test]
    fn unassigned_reads_point_at_last_scanned_column() {
        let mut table = IdentifierTable::new();
        table.declare("y", 1);
        table.declare("y", 5);
        assert_eq!(table.lookup("y", 1).unwrap_err().column, 5);
        assert_eq!(table.lookup("z", 2).unwrap_err().column, 2);
    }

    #[test]
    fn redeclaring_keeps_value_and_refreshes_column() {
        let mut table = IdentifierTable::new();
        table.declare("x", 1);
        table.get_or_create("x").set(42);
        table.declare("x", 7);

        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("x", 7), Ok(42));
        assert_eq!(table.get("x").unwrap().last_column(), 7);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut table = IdentifierTable::new();
        table.get_or_create("x").set(1);
        assert!(table.get("X").is_none());
    }

    #[test]
    fn marking_exposes_the_default_value() {
        let mut table = IdentifierTable::new();
        table.get_or_create("n").mark_assigned();
        assert_eq!(table.lookup("n", 1), Ok(0));
    }
}
