//! Block library search
//!
//! Keystrokes go through a debouncer; the catalog is only filtered once the
//! query has been stable for the configured delay.

use std::sync::Arc;

use super::debounce::Debouncer;
use super::timer::Clock;
use crate::core::registry::{BlockCatalog, LibraryGroup};

pub struct LibrarySearch {
    catalog: BlockCatalog,
    debouncer: Debouncer<String>,
    query: String,
}

impl LibrarySearch {
    pub fn new(catalog: BlockCatalog, delay_ms: u64) -> Self {
        Self {
            catalog,
            debouncer: Debouncer::new(delay_ms),
            query: String::new(),
        }
    }

    pub fn with_clock(catalog: BlockCatalog, delay_ms: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog,
            debouncer: Debouncer::with_clock(delay_ms, clock),
            query: String::new(),
        }
    }

    /// Record the latest text of the search box.
    pub fn input(&mut self, text: &str) {
        self.debouncer.push(text.to_string());
    }

    /// Apply the pending query if it has settled. Returns true when the
    /// applied query changed.
    pub fn poll(&mut self) -> bool {
        match self.debouncer.poll() {
            Some(query) => self.apply(query),
            None => false,
        }
    }

    /// Apply the pending query now, e.g. on Enter.
    pub fn flush(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(query) => self.apply(query),
            None => false,
        }
    }

    fn apply(&mut self, query: String) -> bool {
        if query == self.query {
            return false;
        }
        tracing::debug!(query = %query, "library search");
        self.query = query;
        true
    }

    /// Query the results are currently filtered by
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn results(&self) -> Vec<LibraryGroup> {
        self.catalog.grouped(&self.query)
    }
}
