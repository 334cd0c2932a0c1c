//! Composer
//!
//! Drives a scanner: every unit of the requested family is applied to the
//! shared context in scanner order. The first failure aborts the pass and is
//! returned wrapped in [`Error::Convention`] with the failing unit's name;
//! nothing is retried and panics are not caught.

use tracing::{debug, error, info, info_span};
use weave_domain::error::{Error, Result};

use crate::convention::ConventionFamily;
use crate::scanner::ConventionScanner;

/// Applies the conventions of a scanner to a context
#[derive(Debug, Clone, Copy)]
pub struct Composer<'s> {
    scanner: &'s ConventionScanner,
}

impl<'s> Composer<'s> {
    /// Create a composer over `scanner`
    pub fn new(scanner: &'s ConventionScanner) -> Self {
        Self { scanner }
    }

    /// Invoke every unit of family `F` against `context`
    ///
    /// Returns the number of units invoked.
    pub fn register<F: ConventionFamily>(&self, context: &mut F::Context<'_>) -> Result<usize> {
        let span = info_span!("compose", family = F::NAME);
        let _enter = span.enter();

        let mut invoked = 0;
        for unit in self.scanner.get::<F>() {
            let name = unit.name();
            debug!(convention = name, kind = %unit.kind(), "Registering convention");

            if let Err(err) = unit.apply(context) {
                error!(convention = name, error = %err, "Convention failed");
                return Err(Error::convention(F::NAME, name, err));
            }
            invoked += 1;
        }

        info!(invoked, "Composition complete");
        Ok(invoked)
    }
}

/// Shorthand for `Composer::new(scanner).register::<F>(context)`
pub fn compose<F: ConventionFamily>(
    scanner: &ConventionScanner,
    context: &mut F::Context<'_>,
) -> Result<usize> {
    Composer::new(scanner).register::<F>(context)
}
