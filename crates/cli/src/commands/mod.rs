//! Command implementations.

mod run;
mod validate;

pub use run::run_proxy;
pub use validate::run_validate;
