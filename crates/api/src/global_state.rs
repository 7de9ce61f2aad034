use std::sync::Arc;

use remark_store::Store;

/// Shared handle the handlers work against. The backend behind the trait
/// object is chosen at startup.
#[derive(Clone)]
pub struct GlobalState {
    pub store: Arc<dyn Store>,
}

impl GlobalState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}
