//! Entry-point rewriting and driver synthesis.
//!
//! The entry point goes through `Found -> Renamed -> BodyAbsent` or
//! `Found -> Renamed -> BodyRewritten`. Renaming happens as soon as the
//! function is seen. The body is only rewritten once the whole translation
//! unit has been traversed, because the registration block needs every
//! global the ledger will ever hold.

use serde::Serialize;

use crate::domain::ast::{FunctionDecl, SourceRange};
use crate::domain::edit::{Edit, EditSet};
use crate::domain::error::RewriteResult;
use crate::domain::ledger::CaptureRecord;
use crate::domain::template::{Templates, RENAMED_ENTRY_POINT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPointState {
    Found,
    Renamed,
    /// Declaration only: the rename is the sole edit.
    BodyAbsent,
    /// Registrations and driver emitted.
    BodyRewritten,
}

#[derive(Debug, Clone)]
pub struct EntryPoint {
    name_range: SourceRange,
    body: Option<SourceRange>,
    state: EntryPointState,
}

impl EntryPoint {
    pub fn found(decl: &FunctionDecl) -> Self {
        Self {
            name_range: decl.name_range,
            body: decl.body,
            state: EntryPointState::Found,
        }
    }

    pub fn state(&self) -> EntryPointState {
        self.state
    }

    /// Rename the identifier token. Settles in `BodyAbsent` when there is no
    /// body to rewrite later.
    pub fn rename(&mut self, edits: &mut EditSet) -> RewriteResult<()> {
        if self.state != EntryPointState::Found {
            return Ok(());
        }
        edits.insert(Edit::rename(self.name_range, RENAMED_ENTRY_POINT))?;
        self.state = match self.body {
            Some(_) => EntryPointState::Renamed,
            None => EntryPointState::BodyAbsent,
        };
        Ok(())
    }

    /// Emit the registration block after `{` and the driver after `}`.
    /// `globals` must be the final, ordered ledger.
    pub fn synthesize(
        &mut self,
        templates: &Templates,
        globals: &[CaptureRecord],
        edits: &mut EditSet,
    ) -> RewriteResult<()> {
        let body = match (self.state, self.body) {
            (EntryPointState::Renamed, Some(body)) => body,
            _ => return Ok(()),
        };

        let registrations = templates.registrations(globals.iter().map(|g| g.name.as_str()));
        edits.insert(Edit::insert_after(body.begin + 1, registrations))?;
        edits.insert(Edit::insert_after(body.end, templates.driver()))?;

        self.state = EntryPointState::BodyRewritten;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::InstrumentConfig;
    use crate::domain::types::TypeDescriptor;

    // int main() { return 0; }
    const SRC: &str = "int main() { return 0; }";

    fn main_decl(body: Option<SourceRange>) -> FunctionDecl {
        FunctionDecl {
            name: "main".to_string(),
            name_range: SourceRange::new(4, 8),
            return_type: TypeDescriptor::int(),
            return_type_range: SourceRange::new(0, 3),
            body,
        }
    }

    fn global(name: &str) -> CaptureRecord {
        CaptureRecord {
            name: name.to_string(),
            declared_type: "int".to_string(),
            supported: true,
            offset: 0,
        }
    }

    #[test]
    fn test_declaration_only_stops_after_rename() {
        let templates = Templates::new(&InstrumentConfig::default());
        let mut edits = EditSet::new("main.c");
        let mut entry = EntryPoint::found(&main_decl(None));

        entry.rename(&mut edits).unwrap();
        assert_eq!(entry.state(), EntryPointState::BodyAbsent);

        entry.synthesize(&templates, &[global("g")], &mut edits).unwrap();
        assert_eq!(entry.state(), EntryPointState::BodyAbsent);
        assert_eq!(edits.len(), 1);
        assert_eq!(edits.apply("int main();").unwrap(), "int nse_main();");
    }

    #[test]
    fn test_body_gets_registrations_and_driver() {
        let templates = Templates::new(&InstrumentConfig::default());
        let mut edits = EditSet::new("main.c");
        let mut entry = EntryPoint::found(&main_decl(Some(SourceRange::new(11, 24))));

        entry.rename(&mut edits).unwrap();
        assert_eq!(entry.state(), EntryPointState::Renamed);
        entry
            .synthesize(&templates, &[global("x"), global("y")], &mut edits)
            .unwrap();
        assert_eq!(entry.state(), EntryPointState::BodyRewritten);

        let out = edits.apply(SRC).unwrap();
        assert!(out.starts_with(
            "int nse_main() {\n  crv::make_any(x);\n  crv::make_any(y);\n return 0; }\n\nint main() {"
        ));
        assert!(out.ends_with(&templates.driver()));
    }

    #[test]
    fn test_rename_is_applied_once() {
        let mut edits = EditSet::new("main.c");
        let mut entry = EntryPoint::found(&main_decl(None));
        entry.rename(&mut edits).unwrap();
        entry.rename(&mut edits).unwrap();
        assert_eq!(edits.len(), 1);
    }
}
