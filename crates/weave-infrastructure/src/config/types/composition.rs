//! Composition configuration types

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use weave_application::{ConventionScanner, LinkedConventionSource};

/// Convention discovery and container options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    /// Modules whose discovered conventions are skipped
    pub excluded_modules: Vec<String>,

    /// Modules to discover conventions from (empty means every linked module)
    pub candidate_modules: Vec<String>,

    /// Reject scoped services resolved from the root provider or the root
    /// scope of the graph container
    ///
    /// Defaults to on in the Development environment.
    pub validate_scopes: Option<bool>,
}

impl CompositionConfig {
    /// Scanner discovering linked conventions from the candidate modules
    pub fn scanner(&self) -> ConventionScanner {
        let candidates = self.candidate_modules.iter().cloned();
        let source = LinkedConventionSource::with_candidates(candidates);
        let mut scanner = ConventionScanner::with_source(Arc::new(source));
        for module in &self.excluded_modules {
            scanner.exclude_module(module.as_str());
        }
        scanner
    }
}
