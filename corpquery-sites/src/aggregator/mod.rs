//! Third-party aggregator site.
//!
//! Needs a session cookie from the home page. The search page lists
//! matches, and the first `/firm/<id>.html` link leads to the detail page
//! holding the registration table.

mod descriptor;
pub(crate) mod parser;

pub use descriptor::{AGGREGATOR_BASE_URL, aggregator_profile};
pub use parser::aggregator_extractors;
