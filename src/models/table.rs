use crate::models::accident::AccidentRecord;
use crate::models::raw::Schema;

/// Cleaned accident table. Read-only once built; aggregators borrow it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccidentTable {
    schema: Schema,
    records: Vec<AccidentRecord>,
}

impl AccidentTable {
    pub fn new(schema: Schema, records: Vec<AccidentRecord>) -> Self {
        Self { schema, records }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[AccidentRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AccidentRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a AccidentTable {
    type Item = &'a AccidentRecord;
    type IntoIter = std::slice::Iter<'a, AccidentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
