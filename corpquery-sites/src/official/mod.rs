//! Official registry site.
//!
//! The search page itself carries the company block, so there is no detail
//! request. A page without a company heading means nothing matched.

mod descriptor;
pub(crate) mod parser;

pub use descriptor::{REGISTRY_BASE_URL, registry_profile};
pub use parser::registry_extractors;
