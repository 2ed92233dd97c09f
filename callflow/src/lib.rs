mod call_error;
mod call_state;
mod channel;
mod controller;
mod outcome;
pub mod readers;
mod result_store;
mod shallow_eq;
mod stream_ext;
pub mod macros;

pub use call_error::*;
pub use call_state::*;
pub use channel::*;
pub use controller::*;
pub use outcome::*;
pub use result_store::*;
pub use shallow_eq::*;
pub use stream_ext::*;

/// Bound set for invocation parameter values.
pub trait CallParams: ShallowEq + Clone + Send + Sync + 'static {}

impl<P> CallParams for P where P: ShallowEq + Clone + Send + Sync + 'static {}

#[cfg(test)]
mod unit_tests;
