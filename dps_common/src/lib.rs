mod dollars;
mod helpers;
mod secret;

pub use dollars::{Dollars, DollarsConversionError};
pub use helpers::parse_boolean_flag;
pub use secret::Secret;
