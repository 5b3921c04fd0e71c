//! Mesh refinement algorithms.
//!
//! - **Refinement**: uniform and adaptive 1-to-4 triangle splitting with
//!   crack-free transition templates ([`refine`])
//! - **Progress**: callbacks for long-running passes ([`Progress`])

pub mod refine;

mod progress;

pub use progress::Progress;
