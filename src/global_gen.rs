//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::{Generator, Uuid};

/// Returns the process-wide default generator, creating one on first use.
///
/// The generator is constructed exactly once even if many threads race for the first call; every
/// caller observes the same instance.
pub fn default_generator() -> &'static Generator {
    static G: sync::OnceLock<Generator> = sync::OnceLock::new();
    G.get_or_init(Generator::new)
}

/// Generates a UUIDv7 object.
///
/// This function employs the process-wide default generator and therefore guarantees the
/// cross-thread monotonic order of UUIDs generated within the same millisecond, subject to the
/// 12-bit wraparound of the sequence field.
///
/// # Examples
///
/// ```rust
/// let uuid = uuidv7_pool::uuid7();
/// assert!(!uuid.is_nil());
/// println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
/// ```
pub fn uuid7() -> Uuid {
    default_generator().generate()
}
