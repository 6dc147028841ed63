//! Zoo Pop (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof so the binary, integration
//! tests and benches can write `zoo_pop::{core,adapter,term,input,types}`.

pub use zoo_pop_adapter as adapter;
pub use zoo_pop_core as core;
pub use zoo_pop_input as input;
pub use zoo_pop_term as term;
pub use zoo_pop_types as types;
