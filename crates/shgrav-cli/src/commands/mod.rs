pub mod bundle;
pub mod checksum;
pub mod convert;
pub mod inspect;
pub mod models;
pub mod verify;

use std::error::Error;

use serde::Serialize;

/// Writes `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
