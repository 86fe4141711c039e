//! A UUID version 7 generator with a sequence counter and a pooled secure random source
//!
//! ```rust
//! use uuidv7_pool::uuid7;
//!
//! let uuid = uuid7();
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//! ```
//!
//! Identifiers are handled in their binary form only; this crate does not format or parse the
//! hyphenated text representation. Enable the `uuid` crate feature to convert them into
//! [`uuid::Uuid`](https://docs.rs/uuid) for that purpose.
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |  ver  |       sequence        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                         rand                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             rand                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 48-bit `unix_ts_ms` field holds the Unix timestamp in milliseconds.
//! - The 4-bit `ver` field is set at `0111`.
//! - The 12-bit `sequence` field holds the low bits of a 16-bit counter that is seeded randomly
//!   once per generator and incremented for each new ID whose timestamp is not greater than the
//!   previous one. It is not reset when the timestamp advances and wraps silently on overflow.
//! - The 2-bit `var` field is set at `10`.
//! - The remaining 62 `rand` bits are drawn from a pool of bytes pre-fetched from a
//!   cryptographically strong random source, 8 bytes per ID.
//!
//! When the system clock moves backwards, the generator still increments the counter but encodes
//! the smaller timestamp as read, so IDs generated across a clock rollback may not sort in
//! creation order.
//!
//! # Crate features
//!
//! - `global_gen` (default): the process-wide default generator behind [`uuid7()`].
//! - `serde`: binary (de)serialization of [`Uuid`].
//! - `uuid`: conversions from and into `uuid::Uuid`.
//! - `tracing`: trace-level spans for generation and a warning when the random source fails.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::Error;

mod id;
pub use id::{Uuid, Variant};

pub mod generator;
#[doc(inline)]
pub use generator::Generator;

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{default_generator, uuid7};
