//! Shared state handed to every HTTP handler

use crate::billing::BillingManager;
use crate::config::AppConfig;
use crate::core::IdentityProvider;
use crate::export::BillExporter;
use std::sync::Arc;

/// Everything a handler may need
///
/// Cheap to clone; all members are shared handles.
#[derive(Clone)]
pub struct AppState {
    /// Item, bill and booking operations
    pub billing: BillingManager,

    /// Owner sessions
    pub identity: Arc<dyn IdentityProvider>,

    /// Bill document and share message rendering
    pub exporter: Arc<BillExporter>,

    /// Effective configuration after file and environment merging
    pub config: Arc<AppConfig>,
}
