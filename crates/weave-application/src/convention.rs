//! Convention units
//!
//! A convention is either an object implementing a family's capability trait
//! or a plain callable with the family's delegate signature. Both kinds are
//! carried by [`ConventionUnit`] and dispatched with a `match`, so the
//! composer never needs to know which concrete trait a family uses.

use std::fmt;
use std::sync::Arc;

use weave_domain::error::Result;

/// A pair of capability trait and delegate signature applied to one context type
///
/// # Example
///
/// ```ignore
/// pub struct ServiceConventions;
///
/// impl ConventionFamily for ServiceConventions {
///     const NAME: &'static str = "service";
///     type Capability = dyn ServiceConvention;
///     type Delegate = ServiceConventionDelegate;
///     type Context<'a> = ServiceConventionContext<'a>;
///
///     fn capability_name(capability: &Self::Capability) -> &'static str {
///         capability.name()
///     }
///
///     fn register(capability: &Self::Capability, context: &mut Self::Context<'_>) -> Result<()> {
///         capability.register(context)
///     }
///
///     fn invoke(delegate: &Self::Delegate, context: &mut Self::Context<'_>) -> Result<()> {
///         delegate(context)
///     }
/// }
/// ```
pub trait ConventionFamily: 'static {
    /// Short family name used in logs and errors
    const NAME: &'static str;

    /// Capability trait object (e.g. `dyn ServiceConvention`)
    type Capability: ?Sized + Send + Sync + 'static;

    /// Delegate trait object (e.g. `dyn Fn(&mut Context) -> Result<()>`)
    type Delegate: ?Sized + Send + Sync + 'static;

    /// Context handed to every unit of the family
    type Context<'a>;

    /// Diagnostic name of a capability object
    fn capability_name(capability: &Self::Capability) -> &'static str;

    /// Invoke the capability's registration method
    fn register(capability: &Self::Capability, context: &mut Self::Context<'_>) -> Result<()>;

    /// Invoke a delegate with the equivalent arguments
    fn invoke(delegate: &Self::Delegate, context: &mut Self::Context<'_>) -> Result<()>;
}

/// Which kind of unit a convention is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConventionKind {
    /// Object implementing the capability trait
    Capability,
    /// Plain callable
    Delegate,
}

impl fmt::Display for ConventionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capability => write!(f, "capability"),
            Self::Delegate => write!(f, "delegate"),
        }
    }
}

/// One unit of registration logic
///
/// Identity is the shared allocation: cloning a unit yields the same unit,
/// wrapping the same value in a new `Arc` yields a different one.
pub enum ConventionUnit<F: ConventionFamily> {
    /// Capability object
    Capability(Arc<F::Capability>),
    /// Plain callable with a diagnostic name
    Delegate {
        /// The callable
        delegate: Arc<F::Delegate>,
        /// Name reported in logs and errors
        name: &'static str,
    },
}

impl<F: ConventionFamily> ConventionUnit<F> {
    /// Wrap a capability object
    pub fn capability(capability: Arc<F::Capability>) -> Self {
        Self::Capability(capability)
    }

    /// Wrap a delegate, naming it after the family
    pub fn delegate(delegate: Arc<F::Delegate>) -> Self {
        Self::Delegate {
            delegate,
            name: "delegate",
        }
    }

    /// Wrap a delegate with an explicit diagnostic name
    pub fn named_delegate(name: &'static str, delegate: Arc<F::Delegate>) -> Self {
        Self::Delegate { delegate, name }
    }

    /// Capability or delegate
    pub fn kind(&self) -> ConventionKind {
        match self {
            Self::Capability(_) => ConventionKind::Capability,
            Self::Delegate { .. } => ConventionKind::Delegate,
        }
    }

    /// Diagnostic name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Capability(capability) => F::capability_name(capability),
            Self::Delegate { name, .. } => *name,
        }
    }

    /// Address of the shared allocation, used for identity comparisons
    pub fn identity(&self) -> usize {
        match self {
            Self::Capability(capability) => Arc::as_ptr(capability).cast::<()>() as usize,
            Self::Delegate { delegate, .. } => Arc::as_ptr(delegate).cast::<()>() as usize,
        }
    }

    /// Whether both values are the same unit
    pub fn same_unit(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }

    /// Run the unit against a context
    pub fn apply(&self, context: &mut F::Context<'_>) -> Result<()> {
        match self {
            Self::Capability(capability) => F::register(capability, context),
            Self::Delegate { delegate, .. } => F::invoke(delegate, context),
        }
    }
}

impl<F: ConventionFamily> Clone for ConventionUnit<F> {
    fn clone(&self) -> Self {
        match self {
            Self::Capability(capability) => Self::Capability(Arc::clone(capability)),
            Self::Delegate { delegate, name } => Self::Delegate {
                delegate: Arc::clone(delegate),
                name: *name,
            },
        }
    }
}

impl<F: ConventionFamily> fmt::Debug for ConventionUnit<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConventionUnit")
            .field("family", &F::NAME)
            .field("kind", &self.kind())
            .field("name", &self.name())
            .finish()
    }
}
