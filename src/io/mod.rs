//! Input/output helpers.
//!
//! - channel config CSV load + validation (`channels`)
//! - dated JSON snapshot writing (`snapshot`)

pub mod channels;
pub mod snapshot;

pub use channels::*;
pub use snapshot::*;
