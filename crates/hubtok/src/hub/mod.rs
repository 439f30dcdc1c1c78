//! # Model Hub Addressing
//!
//! Identifiers, revisions, endpoint URLs, and repository listings.

mod endpoint;
mod listing;
mod model_id;

#[doc(inline)]
pub use endpoint::*;
#[doc(inline)]
pub use listing::*;
#[doc(inline)]
pub use model_id::*;
