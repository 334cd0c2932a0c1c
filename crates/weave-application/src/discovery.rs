//! Convention Discovery
//!
//! Crates contribute conventions at link time through a `linkme` distributed
//! slice; a [`ConventionSource`] turns the slice (or any other list) into
//! scanner units.
//!
//! ## Registering a Convention
//!
//! ```ignore
//! use weave_application::{CONVENTIONS, ConventionEntry};
//! use weave_infrastructure::conventions::ServiceConventions;
//!
//! #[linkme::distributed_slice(CONVENTIONS)]
//! static STORAGE: ConventionEntry = ConventionEntry {
//!     name: "storage",
//!     module: "app::storage",
//!     register: |sink| {
//!         sink.convention::<ServiceConventions>(Arc::new(StorageConvention));
//!     },
//! };
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::convention::{ConventionFamily, ConventionUnit};
use crate::scanner::ScannedUnit;

/// Registry entry contributed by a crate
///
/// `register` receives a sink scoped to `module` and adds one or more units
/// of any family to it.
pub struct ConventionEntry {
    /// Entry name, unique within its module
    pub name: &'static str,
    /// Module path used for candidate filtering and exclusions
    pub module: &'static str,
    /// Adds the entry's units to the sink
    pub register: fn(&mut DiscoveredConventions),
}

// Auto-collection via linkme distributed slices - crates submit entries at compile time
#[linkme::distributed_slice]
pub static CONVENTIONS: [ConventionEntry] = [..];

/// Producer of discoverable convention units
///
/// The boundary to whatever decides which modules take part in composition.
pub trait ConventionSource: Send + Sync {
    /// Produce the units to add to a scanner, in the order they should run
    fn discover(&self) -> Vec<ScannedUnit>;
}

/// Sink handed to [`ConventionEntry::register`]
pub struct DiscoveredConventions {
    module: &'static str,
    units: Vec<ScannedUnit>,
}

impl DiscoveredConventions {
    /// Create an empty sink for `module`
    pub fn new(module: &'static str) -> Self {
        Self {
            module,
            units: Vec::new(),
        }
    }

    /// Module the units are recorded under
    pub fn module(&self) -> &'static str {
        self.module
    }

    /// Add a capability object
    pub fn convention<F: ConventionFamily>(&mut self, convention: Arc<F::Capability>) -> &mut Self {
        self.unit(ConventionUnit::<F>::capability(convention))
    }

    /// Add a named delegate
    pub fn delegate<F: ConventionFamily>(
        &mut self,
        name: &'static str,
        delegate: Arc<F::Delegate>,
    ) -> &mut Self {
        self.unit(ConventionUnit::<F>::named_delegate(name, delegate))
    }

    /// Add a unit
    pub fn unit<F: ConventionFamily>(&mut self, unit: ConventionUnit<F>) -> &mut Self {
        self.units
            .push(ScannedUnit::new(unit).with_module(self.module));
        self
    }

    /// Consume the sink
    pub fn into_units(self) -> Vec<ScannedUnit> {
        self.units
    }
}

/// Source reading the [`CONVENTIONS`] slice
///
/// Link order is not stable, so entries are visited sorted by module then
/// name. With candidate modules set, only entries in those modules (or nested
/// below them) are used.
#[derive(Debug, Clone, Default)]
pub struct LinkedConventionSource {
    candidates: Vec<String>,
}

impl LinkedConventionSource {
    /// Use every linked entry
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict discovery to the given modules
    pub fn with_candidates<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    fn is_candidate(&self, module: &str) -> bool {
        self.candidates.is_empty()
            || self.candidates.iter().any(|candidate| {
                module == candidate.as_str()
                    || module
                        .strip_prefix(candidate.as_str())
                        .is_some_and(|rest| rest.starts_with("::"))
            })
    }
}

impl ConventionSource for LinkedConventionSource {
    fn discover(&self) -> Vec<ScannedUnit> {
        let mut entries: Vec<&ConventionEntry> = CONVENTIONS
            .iter()
            .filter(|entry| self.is_candidate(entry.module))
            .collect();
        entries.sort_by(|a, b| a.module.cmp(b.module).then_with(|| a.name.cmp(b.name)));

        entries
            .into_iter()
            .flat_map(|entry| {
                let mut sink = DiscoveredConventions::new(entry.module);
                (entry.register)(&mut sink);
                debug!(
                    module = entry.module,
                    entry = entry.name,
                    units = sink.units.len(),
                    "Loaded convention entry"
                );
                sink.into_units()
            })
            .collect()
    }
}

/// Source returning a fixed list of units
#[derive(Debug, Clone, Default)]
pub struct StaticConventionSource {
    units: Vec<ScannedUnit>,
}

impl StaticConventionSource {
    /// Create a source from units
    pub fn new(units: Vec<ScannedUnit>) -> Self {
        Self { units }
    }

    /// Add a unit recorded under `module`
    pub fn with_unit<F: ConventionFamily>(
        mut self,
        module: &'static str,
        unit: ConventionUnit<F>,
    ) -> Self {
        self.units.push(ScannedUnit::new(unit).with_module(module));
        self
    }
}

impl ConventionSource for StaticConventionSource {
    fn discover(&self) -> Vec<ScannedUnit> {
        self.units.clone()
    }
}

/// List all linked convention entries
///
/// Returns `(module, name)` pairs sorted by module then name.
pub fn list_conventions() -> Vec<(&'static str, &'static str)> {
    let mut entries: Vec<_> = CONVENTIONS.iter().map(|e| (e.module, e.name)).collect();
    entries.sort_unstable();
    entries
}
