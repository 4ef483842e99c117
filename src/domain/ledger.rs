// Capture ledger: supported globals of one translation unit, in declaration
// order. Filled by the global-variable rule, read once by the driver.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureRecord {
    pub name: String,
    pub declared_type: String,
    pub supported: bool,
    /// Offset of the declaration, used to keep declaration order.
    #[serde(skip)]
    pub offset: usize,
}

#[derive(Debug, Default)]
pub struct CaptureLedger {
    records: Vec<CaptureRecord>,
}

impl CaptureLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a global. Unsupported records and redeclarations of a name
    /// already captured are ignored. Returns whether the record was added.
    pub fn capture(&mut self, record: CaptureRecord) -> bool {
        if !record.supported || self.records.iter().any(|r| r.name == record.name) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CaptureRecord] {
        &self.records
    }

    /// Hand the records over in declaration order. Consumes the ledger.
    pub fn into_ordered(mut self) -> Vec<CaptureRecord> {
        self.records.sort_by_key(|r| r.offset);
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, offset: usize) -> CaptureRecord {
        CaptureRecord {
            name: name.to_string(),
            declared_type: "int".to_string(),
            supported: true,
            offset,
        }
    }

    #[test]
    fn test_keeps_declaration_order() {
        let mut ledger = CaptureLedger::new();
        assert!(ledger.capture(record("b", 20)));
        assert!(ledger.capture(record("a", 10)));
        assert!(ledger.capture(record("c", 30)));
        let names: Vec<String> = ledger.into_ordered().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_skips_unsupported_and_redeclared() {
        let mut ledger = CaptureLedger::new();
        let mut opaque = record("s", 0);
        opaque.supported = false;
        assert!(!ledger.capture(opaque));
        assert!(ledger.capture(record("g", 5)));
        assert!(!ledger.capture(record("g", 40)));
        assert_eq!(ledger.len(), 1);
    }
}
