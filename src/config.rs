//! Settings for playdeck: where the library lives, audio tuning, key steps,
//! startup flags, UI text and logging.
//!
//! Values come from defaults, then the TOML file, then `PLAYDECK__*`
//! environment variables.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
