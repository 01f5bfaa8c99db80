use crate::table::Table;

/// Holder of the most recently cleaned table for one UI session.
///
/// At most one table is held; every upload overwrites the previous one
/// ("last write wins"), and nothing is held before the first successful
/// upload. The store is owned by the server's application state, so its
/// lifetime is explicitly bound to the serving instance rather than being a
/// process global.
#[derive(Debug, Default)]
pub struct SessionStore {
    table: Option<Table>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore::default()
    }

    /// Replace whatever is stored, unconditionally.
    pub fn put(&mut self, table: Table) {
        self.table = Some(table);
    }

    /// The currently stored table, if any upload has succeeded yet.
    pub fn get(&self) -> Option<&Table> {
        self.table.as_ref()
    }
}
