//! Community micro-insurance risk pool
//!
//! Members contribute to a shared pool, file claims against it and decide
//! each claim by majority vote, with an advisory service offering a
//! non-binding recommendation. The HTTP server lives in `interface_api`.

pub use core_kernel;
pub use domain_claims;
pub use domain_pool;
pub use interface_ussd;
