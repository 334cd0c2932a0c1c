//! Convention Scanner
//!
//! Ordered, identity de-duplicated collection of convention units.
//!
//! ## Ordering
//!
//! ```text
//! prepended (most recent first) → discovered (source order) → appended (insertion order)
//! ```
//!
//! Discovery runs lazily, at most once, on the first enumeration. Explicit
//! units may still be prepended or appended afterwards and are never
//! reordered by discovery.

use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::convention::{ConventionFamily, ConventionKind, ConventionUnit};
use crate::discovery::ConventionSource;

/// A convention unit with its family erased
///
/// The scanner holds units of every family side by side; [`ConventionScanner::get`]
/// recovers the ones belonging to the requested family.
#[derive(Clone)]
pub struct ScannedUnit {
    name: &'static str,
    family: &'static str,
    kind: ConventionKind,
    module: Option<&'static str>,
    identity: usize,
    unit: Arc<dyn Any + Send + Sync>,
}

impl ScannedUnit {
    /// Erase the family of a unit
    pub fn new<F: ConventionFamily>(unit: ConventionUnit<F>) -> Self {
        Self {
            name: unit.name(),
            family: F::NAME,
            kind: unit.kind(),
            module: None,
            identity: unit.identity(),
            unit: Arc::new(unit),
        }
    }

    /// Record the module the unit was discovered in
    pub fn with_module(mut self, module: &'static str) -> Self {
        self.module = Some(module);
        self
    }

    /// Diagnostic name of the unit
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Family name of the unit
    pub fn family(&self) -> &'static str {
        self.family
    }

    /// Capability or delegate
    pub fn kind(&self) -> ConventionKind {
        self.kind
    }

    /// Module the unit was discovered in, `None` for explicit units
    pub fn module(&self) -> Option<&'static str> {
        self.module
    }

    /// Identity of the underlying unit
    pub fn identity(&self) -> usize {
        self.identity
    }

    /// Recover the typed unit if it belongs to family `F`
    pub fn downcast<F: ConventionFamily>(&self) -> Option<ConventionUnit<F>> {
        self.unit.downcast_ref::<ConventionUnit<F>>().cloned()
    }
}

impl fmt::Debug for ScannedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScannedUnit")
            .field("name", &self.name)
            .field("family", &self.family)
            .field("kind", &self.kind)
            .field("module", &self.module)
            .finish()
    }
}

/// Ordered collection of convention units
#[derive(Default)]
pub struct ConventionScanner {
    source: Option<Arc<dyn ConventionSource>>,
    prepended: Vec<ScannedUnit>,
    appended: Vec<ScannedUnit>,
    excluded_modules: Vec<String>,
    discovered: OnceCell<Vec<ScannedUnit>>,
}

impl ConventionScanner {
    /// Create a scanner holding only explicitly added units
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scanner that discovers units from `source` on first enumeration
    pub fn with_source(source: Arc<dyn ConventionSource>) -> Self {
        Self {
            source: Some(source),
            ..Self::default()
        }
    }

    /// Insert a unit at the front
    pub fn prepend_unit<F: ConventionFamily>(&mut self, unit: ConventionUnit<F>) -> &mut Self {
        self.prepended.push(ScannedUnit::new(unit));
        self
    }

    /// Insert a unit at the end
    pub fn append_unit<F: ConventionFamily>(&mut self, unit: ConventionUnit<F>) -> &mut Self {
        self.appended.push(ScannedUnit::new(unit));
        self
    }

    /// Insert a capability object at the front
    pub fn prepend_convention<F: ConventionFamily>(
        &mut self,
        convention: Arc<F::Capability>,
    ) -> &mut Self {
        self.prepend_unit(ConventionUnit::<F>::capability(convention))
    }

    /// Insert a delegate at the front
    pub fn prepend_delegate<F: ConventionFamily>(
        &mut self,
        name: &'static str,
        delegate: Arc<F::Delegate>,
    ) -> &mut Self {
        self.prepend_unit(ConventionUnit::<F>::named_delegate(name, delegate))
    }

    /// Insert a capability object at the end
    pub fn append_convention<F: ConventionFamily>(
        &mut self,
        convention: Arc<F::Capability>,
    ) -> &mut Self {
        self.append_unit(ConventionUnit::<F>::capability(convention))
    }

    /// Insert a delegate at the end
    pub fn append_delegate<F: ConventionFamily>(
        &mut self,
        name: &'static str,
        delegate: Arc<F::Delegate>,
    ) -> &mut Self {
        self.append_unit(ConventionUnit::<F>::named_delegate(name, delegate))
    }

    /// Alias of [`append_convention`](Self::append_convention)
    pub fn add_convention<F: ConventionFamily>(
        &mut self,
        convention: Arc<F::Capability>,
    ) -> &mut Self {
        self.append_convention::<F>(convention)
    }

    /// Alias of [`append_delegate`](Self::append_delegate)
    pub fn add_delegate<F: ConventionFamily>(
        &mut self,
        name: &'static str,
        delegate: Arc<F::Delegate>,
    ) -> &mut Self {
        self.append_delegate::<F>(name, delegate)
    }

    /// Skip discovered units whose module is `module` or nested below it
    pub fn exclude_module(&mut self, module: impl Into<String>) -> &mut Self {
        self.excluded_modules.push(module.into());
        self
    }

    /// Whether discovery has already run
    pub fn is_discovered(&self) -> bool {
        self.discovered.get().is_some()
    }

    /// Enumerate the units of family `F` in scanner order
    ///
    /// The sequence reflects the scanner at the time of the call; call again
    /// to observe later additions.
    pub fn get<F: ConventionFamily>(&self) -> Conventions<F> {
        Conventions {
            units: self.snapshot().into_iter(),
            _family: PhantomData,
        }
    }

    /// All units of every family, in scanner order
    pub fn units(&self) -> Vec<ScannedUnit> {
        self.snapshot()
    }

    /// Number of distinct units of every family
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Whether the scanner holds no units
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn discovered(&self) -> &[ScannedUnit] {
        self.discovered.get_or_init(|| match &self.source {
            Some(source) => {
                let units = source.discover();
                debug!(discovered = units.len(), "Discovered conventions");
                units
            }
            None => Vec::new(),
        })
    }

    fn is_excluded(&self, unit: &ScannedUnit) -> bool {
        unit.module.is_some_and(|module| {
            self.excluded_modules.iter().any(|excluded| {
                module == excluded.as_str()
                    || module
                        .strip_prefix(excluded.as_str())
                        .is_some_and(|rest| rest.starts_with("::"))
            })
        })
    }

    fn snapshot(&self) -> Vec<ScannedUnit> {
        let mut seen = HashSet::new();
        self.prepended
            .iter()
            .rev()
            .chain(self.discovered().iter().filter(|unit| !self.is_excluded(unit)))
            .chain(self.appended.iter())
            .filter(|unit| seen.insert(unit.identity))
            .cloned()
            .collect()
    }
}

impl fmt::Debug for ConventionScanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConventionScanner")
            .field("prepended", &self.prepended.len())
            .field("appended", &self.appended.len())
            .field("excluded_modules", &self.excluded_modules)
            .field("discovered", &self.discovered.get().map(Vec::len))
            .finish()
    }
}

/// Lazy sequence of the units of one family
pub struct Conventions<F: ConventionFamily> {
    units: std::vec::IntoIter<ScannedUnit>,
    _family: PhantomData<fn() -> F>,
}

impl<F: ConventionFamily> Iterator for Conventions<F> {
    type Item = ConventionUnit<F>;

    fn next(&mut self) -> Option<Self::Item> {
        self.units.by_ref().find_map(|unit| unit.downcast::<F>())
    }
}
