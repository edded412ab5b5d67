//! Execution context lifecycle
//!
//! Every context walks `Uninitialized -> Configuring -> Polling`. A failure
//! while configuring moves it to `Terminated`; so does a fatal failure of the
//! blink loop. `Polling` never ends on its own on hardware, so hosts and tests
//! bound a run with [`Cycles`].

use crate::error::DemoError;

/// Context execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextState {
    /// Context exists but has not touched its lines yet.
    #[default]
    Uninitialized,
    /// Readiness checks and line configuration in progress.
    Configuring,
    /// Steady-state loop.
    Polling,
    /// Context stopped on a fatal error.
    Terminated(DemoError),
}

impl ContextState {
    /// Whether moving from `self` to `next` is a legal transition.
    pub const fn can_advance_to(&self, next: &ContextState) -> bool {
        matches!(
            (self, next),
            (ContextState::Uninitialized, ContextState::Configuring)
                | (ContextState::Configuring, ContextState::Polling)
                | (ContextState::Configuring, ContextState::Terminated(_))
                | (ContextState::Polling, ContextState::Terminated(_))
        )
    }

    pub const fn is_terminated(&self) -> bool {
        matches!(self, ContextState::Terminated(_))
    }

    /// Error that stopped the context, if any.
    pub const fn error(&self) -> Option<DemoError> {
        match self {
            ContextState::Terminated(err) => Some(*err),
            _ => None,
        }
    }
}

/// Tracks the state of one context.
#[derive(Debug, Default)]
pub struct Lifecycle {
    name: &'static str,
    state: ContextState,
}

impl Lifecycle {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            state: ContextState::Uninitialized,
        }
    }

    pub const fn state(&self) -> ContextState {
        self.state
    }

    /// Move to `next`.
    ///
    /// Illegal transitions are ignored and reported at `error` level.
    pub fn advance(&mut self, next: ContextState) -> ContextState {
        if self.state.can_advance_to(&next) {
            log::debug!("{}: {:?} -> {:?}", self.name, self.state, next);
            self.state = next;
        } else {
            log::error!("{}: illegal transition {:?} -> {:?}", self.name, self.state, next);
        }
        self.state
    }
}

/// How many steady-state iterations a run may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycles {
    /// Loop until power loss or reset
    Forever,
    /// Stop after this many iterations
    Limit(u32),
}

impl Cycles {
    /// Whether another iteration is allowed after `done` iterations.
    pub const fn allows(self, done: u32) -> bool {
        match self {
            Cycles::Forever => true,
            Cycles::Limit(limit) => done < limit,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ContextState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ContextState::Uninitialized => defmt::write!(fmt, "Uninitialized"),
            ContextState::Configuring => defmt::write!(fmt, "Configuring"),
            ContextState::Polling => defmt::write!(fmt, "Polling"),
            ContextState::Terminated(err) => defmt::write!(fmt, "Terminated({})", err),
        }
    }
}
