//! Halt and fault signalling for handler execution.
//!
//! Handlers return [`HandlerResult`]; the `Err` arm is an [`Interrupt`], an
//! explicit tagged outcome that is either a deliberate [`Halt`] (short-circuit
//! carrying optional status/body, never an error) or a fault (an
//! `anyhow::Error` escaping a handler). Threading the outcome through every
//! pipeline stage keeps the dispatch state machine explicit instead of
//! relying on unwinding.

use crate::request::Request;
use crate::response::Response;

/// Result type returned by route and interceptor handlers.
pub type HandlerResult<T> = Result<T, Interrupt>;

/// Deliberate short-circuit of the dispatch pipeline.
///
/// An unset status leaves the response accumulator's current status in
/// place; an unset body defaults to empty at the point the halt is applied,
/// so a halted request always counts as consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Halt {
    pub status: Option<u16>,
    pub body: Option<String>,
}

/// The non-continue outcome of one handler invocation.
#[derive(Debug)]
pub enum Interrupt {
    /// Deliberate exit; aborts every later step and phase.
    Halt(Halt),
    /// A fault escaping handler execution, matched against registered
    /// fault handlers.
    Fault(anyhow::Error),
}

/// Halt with both a status and a body.
///
/// ```
/// use shunt::{halt, HandlerResult};
///
/// fn guard() -> HandlerResult<()> {
///     Err(halt(401, "Go away"))
/// }
/// # assert!(guard().is_err());
/// ```
#[must_use]
pub fn halt(status: u16, body: impl Into<String>) -> Interrupt {
    Interrupt::Halt(Halt {
        status: Some(status),
        body: Some(body.into()),
    })
}

/// Halt with a status and an empty body.
#[must_use]
pub fn halt_status(status: u16) -> Interrupt {
    Interrupt::Halt(Halt {
        status: Some(status),
        body: None,
    })
}

/// Halt with a body, keeping the accumulator's current status.
#[must_use]
pub fn halt_body(body: impl Into<String>) -> Interrupt {
    Interrupt::Halt(Halt {
        status: None,
        body: Some(body.into()),
    })
}

impl From<anyhow::Error> for Interrupt {
    fn from(err: anyhow::Error) -> Self {
        Interrupt::Fault(err)
    }
}

/// Lets handlers use `?` on ordinary fallible operations; whatever escapes
/// becomes a fault.
impl<E> From<E> for Interrupt
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        Interrupt::Fault(anyhow::Error::new(err))
    }
}

type FaultPredicate = Box<dyn Fn(&anyhow::Error) -> bool + Send + Sync>;
type FaultHandler = Box<dyn Fn(&anyhow::Error, &Request, &mut Response) + Send + Sync>;

struct FaultBinding {
    applies: FaultPredicate,
    handler: FaultHandler,
}

/// Ordered table of fault handlers.
///
/// Bindings are consulted in registration order and the first whose
/// predicate accepts the fault wins, so callers register the most specific
/// fault type first and any catch-all last. There is deliberately no
/// hierarchy walk: specificity is the registration order, nothing else.
#[derive(Default)]
pub struct FaultMapper {
    bindings: Vec<FaultBinding>,
}

impl FaultMapper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a handler to one concrete fault type.
    ///
    /// The handler runs when a fault downcasts to `E`. It may set status
    /// and body on the response accumulator to shape the recovered reply.
    pub fn on_error<E, F>(&mut self, handler: F)
    where
        E: std::error::Error + Send + Sync + 'static,
        F: Fn(&E, &Request, &mut Response) + Send + Sync + 'static,
    {
        self.bindings.push(FaultBinding {
            applies: Box::new(|err| err.is::<E>()),
            handler: Box::new(move |err, req, res| {
                if let Some(e) = err.downcast_ref::<E>() {
                    handler(e, req, res);
                }
            }),
        });
    }

    /// Bind a catch-all handler accepting any fault.
    pub fn on_any_error<F>(&mut self, handler: F)
    where
        F: Fn(&anyhow::Error, &Request, &mut Response) + Send + Sync + 'static,
    {
        self.bindings.push(FaultBinding {
            applies: Box::new(|_| true),
            handler: Box::new(handler),
        });
    }

    /// Run the first matching binding against `fault`.
    ///
    /// Returns `false` when no binding applies, leaving the fault unmapped.
    pub fn apply(&self, fault: &anyhow::Error, req: &Request, res: &mut Response) -> bool {
        match self.bindings.iter().find(|b| (b.applies)(fault)) {
            Some(binding) => {
                (binding.handler)(fault, req, res);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
