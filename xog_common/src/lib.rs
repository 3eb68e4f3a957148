mod piconero;

mod helpers;
mod secret;

pub use helpers::parse_boolean_flag;
pub use piconero::{Piconero, PiconeroConversionError, XMR_CURRENCY_CODE, XMR_CURRENCY_CODE_LOWER};
pub use secret::Secret;
