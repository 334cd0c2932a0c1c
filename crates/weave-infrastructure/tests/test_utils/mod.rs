//! Shared service types for the integration tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use weave_domain::error::Error;
use weave_infrastructure::context::ServiceConventionContext;
use weave_infrastructure::conventions::ServiceConvention;

pub trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

pub struct FixedGreeter(pub &'static str);

impl Greeter for FixedGreeter {
    fn greet(&self) -> String {
        self.0.to_string()
    }
}

pub fn greeter(text: &'static str) -> Arc<dyn Greeter> {
    Arc::new(FixedGreeter(text))
}

pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

/// Counts constructions so lifetimes can be asserted
#[derive(Default)]
pub struct Instances(AtomicUsize);

impl Instances {
    pub fn next(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct Numbered(pub usize);

/// Convention registering a greeter into the System tier
pub struct SystemGreeterConvention(pub &'static str);

impl ServiceConvention for SystemGreeterConvention {
    fn register(&self, context: &mut ServiceConventionContext<'_>) -> weave_domain::Result<()> {
        context.system().add_singleton(greeter(self.0));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "system-greeter"
    }
}

/// Convention registering a greeter into the Application tier
pub struct ApplicationGreeterConvention(pub &'static str);

impl ServiceConvention for ApplicationGreeterConvention {
    fn register(&self, context: &mut ServiceConventionContext<'_>) -> weave_domain::Result<()> {
        context.application().add_singleton(greeter(self.0));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "application-greeter"
    }
}

/// Convention that always fails
pub struct FailingConvention;

impl ServiceConvention for FailingConvention {
    fn register(&self, _context: &mut ServiceConventionContext<'_>) -> weave_domain::Result<()> {
        Err(Error::invalid_operation("convention refused to register"))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
