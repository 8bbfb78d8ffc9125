use std::sync::Arc;

use crate::geo::Gazetteer;
use crate::observability::metrics::Metrics;
use crate::services::packages::PackageRegistry;
use crate::store::DocumentStore;

pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub gazetteer: Arc<Gazetteer>,
    pub packages: PackageRegistry,
    pub metrics: Metrics,
    pub escape_xml_values: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, gazetteer: Gazetteer, escape_xml_values: bool) -> Self {
        Self {
            store,
            gazetteer: Arc::new(gazetteer),
            packages: PackageRegistry::new(),
            metrics: Metrics::new(),
            escape_xml_values,
        }
    }
}
