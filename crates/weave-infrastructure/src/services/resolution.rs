//! Activation shared by the registry and the graph container
//!
//! Both engines keep one [`Registration`] per descriptor and hand it to
//! [`activate`] together with two providers: the one that owns the
//! registration and the one resolving it. Singletons are always built against
//! the owner, so a scope can never leak its own registrations (or its scoped
//! instances) into a shared singleton.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::OnceCell;
use weave_domain::error::{Error, Result};
use weave_domain::value_objects::{ServiceKey, ServiceLifetime};

use super::descriptor::{Implementation, Instance, ServiceDescriptor};
use super::provider::ServiceProvider;

/// Scoped instances of one scope, keyed by registration
pub(crate) type ScopedInstances = Mutex<HashMap<usize, Instance>>;

/// A descriptor plus its singleton slot
pub(crate) struct Registration {
    descriptor: ServiceDescriptor,
    singleton: OnceCell<Instance>,
}

impl Registration {
    pub(crate) fn new(descriptor: ServiceDescriptor) -> Arc<Self> {
        Arc::new(Self {
            descriptor,
            singleton: OnceCell::new(),
        })
    }

    fn id(self: &Arc<Self>) -> usize {
        Arc::as_ptr(self) as usize
    }
}

/// Produce the instance of `registration`
///
/// `owner` builds singletons; `current` builds scoped and transient services
/// and caches scoped ones in `scoped`.
pub(crate) fn activate(
    registration: &Arc<Registration>,
    owner: &ServiceProvider,
    current: &ServiceProvider,
    scoped: &ScopedInstances,
) -> Result<Instance> {
    let descriptor = &registration.descriptor;
    let factory = match descriptor.implementation() {
        Implementation::Instance(instance) => return Ok(Arc::clone(instance)),
        Implementation::Factory(factory) => factory,
    };

    let id = registration.id();
    match descriptor.lifetime() {
        ServiceLifetime::Singleton => {
            if let Some(instance) = registration.singleton.get() {
                return Ok(Arc::clone(instance));
            }
            let _guard = ResolutionGuard::enter(id, descriptor.key())?;
            registration
                .singleton
                .get_or_try_init(|| factory(owner))
                .cloned()
        }
        ServiceLifetime::Scoped => {
            if current.is_root() && current.options().validate_scopes {
                return Err(Error::scope_validation(descriptor.key().name()));
            }
            let cached = lock(scoped).get(&id).cloned();
            if let Some(instance) = cached {
                return Ok(instance);
            }
            let _guard = ResolutionGuard::enter(id, descriptor.key())?;
            // Built outside the lock; the factory may resolve other scoped services
            let instance = factory(current)?;
            Ok(Arc::clone(lock(scoped).entry(id).or_insert(instance)))
        }
        ServiceLifetime::Transient => {
            let _guard = ResolutionGuard::enter(id, descriptor.key())?;
            factory(current)
        }
    }
}

/// Recover the `Arc<T>` stored in an instance
pub(crate) fn downcast<T>(instance: &Instance, key: ServiceKey) -> Result<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    instance
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or_else(|| Error::type_mismatch(key.name()))
}

fn lock(scoped: &ScopedInstances) -> std::sync::MutexGuard<'_, HashMap<usize, Instance>> {
    scoped.lock().unwrap_or_else(PoisonError::into_inner)
}

thread_local! {
    static RESOLVING: RefCell<Vec<(usize, &'static str)>> = const { RefCell::new(Vec::new()) };
}

/// Marks a registration as under construction on this thread
struct ResolutionGuard;

impl ResolutionGuard {
    fn enter(id: usize, key: ServiceKey) -> Result<Self> {
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(start) = stack.iter().position(|(active, _)| *active == id) {
                let chain = stack[start..]
                    .iter()
                    .map(|(_, name)| *name)
                    .chain(std::iter::once(key.name()));
                return Err(Error::circular_dependency(chain));
            }
            stack.push((id, key.name()));
            Ok(Self)
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLVING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}
