//! UUIDv7 generator and related types.

use std::{fmt, iter::FusedIterator, sync, time};

use rand::{rngs::OsRng, RngCore};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, Uuid};


/// The pool size used by [`Generator::new()`]: enough random bytes for 32 identifiers.
pub const DEFAULT_POOL_SIZE: usize = 256;

/// The smallest accepted pool size, i.e., the random bytes consumed by one identifier.
pub const MIN_POOL_SIZE: usize = RAND_LEN;

const RAND_LEN: usize = 8;

/// A trait that provides the current Unix timestamp in milliseconds to [`Generator`].
pub trait TimeSource {
    /// Returns the current Unix timestamp in milliseconds.
    fn unix_ts_ms(&mut self) -> u64;
}

/// The default [`TimeSource`] that reads the system clock.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct StdSystemTime;

impl TimeSource for StdSystemTime {
    fn unix_ts_ms(&mut self) -> u64 {
        time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .expect("clock may have gone backwards")
            .as_millis() as u64
    }
}

/// Represents a UUIDv7 generator that encapsulates a sequence counter and a pool of pre-fetched
/// random bytes.
///
/// The generator is internally synchronized: every call runs as one critical section under a
/// single mutex, so a shared reference can be handed to any number of threads.
///
/// # Examples
///
/// ```rust
/// use std::thread;
/// use uuidv7_pool::Generator;
///
/// let g = Generator::new();
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = &g;
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{:?} by thread {}", g.generate().as_bytes(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
///
/// # Sequence counter
///
/// The 16-bit counter is seeded from the random source on the first call. It is incremented by one
/// whenever the clock reading is not greater than the previous one, whether because the clock has
/// not advanced or because it moved backwards, and it is left untouched when the clock advances.
/// The counter wraps silently at 16 bits. Only its low 12 bits are stored in an identifier.
///
/// # Random pool
///
/// Each identifier consumes 8 bytes of the pool. When fewer than 8 unconsumed bytes remain, the
/// whole pool is refilled with one call to the random source.
pub struct Generator<R = OsRng, T = StdSystemTime> {
    pool_size: usize,
    state: sync::Mutex<State<R, T>>,
}

struct State<R, T> {
    last_timestamp: u64,
    sequence: Option<u16>,
    pool: Box<[u8]>,
    cursor: usize,
    rng: R,
    time: T,
}

impl Generator {
    /// Creates a generator with the default pool size backed by the operating system's random
    /// source.
    pub fn new() -> Self {
        Self::with_pool_size(DEFAULT_POOL_SIZE)
    }

    /// Creates a generator with a custom pool size. Sizes below [`MIN_POOL_SIZE`] are raised to
    /// it.
    ///
    /// A multiple of 8 avoids leaving unused bytes at the end of the pool.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidv7_pool::Generator;
    ///
    /// let g = Generator::with_pool_size(4);
    /// assert_eq!(g.pool_size(), 8);
    /// assert!(!g.generate().is_nil());
    /// ```
    pub fn with_pool_size(pool_size: usize) -> Self {
        Self::with_sources(pool_size, OsRng, StdSystemTime)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore, T: TimeSource> Generator<R, T> {
    /// Creates a generator with a custom pool size, random number generator, and clock.
    ///
    /// The random number generator should be cryptographically secure; the uniqueness of
    /// identifiers across generators rests on it. Neither source is called until the first
    /// identifier is requested.
    pub fn with_sources(pool_size: usize, rng: R, time: T) -> Self {
        let pool_size = pool_size.max(MIN_POOL_SIZE);
        Self {
            pool_size,
            state: sync::Mutex::new(State {
                last_timestamp: 0,
                sequence: None,
                pool: vec![0u8; pool_size].into_boxed_slice(),
                // start at the end so the first call fills the pool
                cursor: pool_size,
                rng,
                time,
            }),
        }
    }

    /// Returns the capacity of the random pool in bytes.
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Generates a new UUIDv7 object.
    ///
    /// If the random source fails, the bytes it should have produced are zero-filled and the
    /// identifier is still returned; uniqueness then rests on the timestamp and the sequence
    /// counter alone. Use [`try_generate`](Self::try_generate) to observe such failures instead.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self) -> Uuid {
        let mut state = self.lock();
        let unix_ts_ms = state.time.unix_ts_ms();
        match state.generate_core(unix_ts_ms, fill_or_zero) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Generates a new UUIDv7 object, or returns an error if the random source fails.
    ///
    /// On error, the generator state is left exactly as it was before the call.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self), err))]
    pub fn try_generate(&self) -> Result<Uuid, Error> {
        let mut state = self.lock();
        let unix_ts_ms = state.time.unix_ts_ms();
        Ok(state.generate_core(unix_ts_ms, |rng, dest| rng.try_fill_bytes(dest))?)
    }

    /// Returns an infinite iterator that produces a new UUIDv7 object for each call of `next()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidv7_pool::Generator;
    ///
    /// let g = Generator::new();
    /// g.iter()
    ///     .enumerate()
    ///     .skip(4)
    ///     .take(4)
    ///     .for_each(|(i, e)| println!("[{}] {:?}", i, e.as_bytes()));
    /// ```
    pub fn iter(&self) -> Iter<'_, R, T> {
        Iter { generator: self }
    }

    fn lock(&self) -> sync::MutexGuard<'_, State<R, T>> {
        // the sources are the only calls that may panic, and they run before any field is written
        self.state
            .lock()
            .unwrap_or_else(sync::PoisonError::into_inner)
    }
}

impl<R, T> fmt::Debug for Generator<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("pool_size", &self.pool_size)
            .finish_non_exhaustive()
    }
}

impl<R: RngCore, T> State<R, T> {
    /// Generates a new UUIDv7 object from the `unix_ts_ms` passed, drawing random bytes through
    /// `fill`.
    ///
    /// An error from `fill` is returned before the sequence, timestamp, or pool cursor is updated.
    fn generate_core<E>(
        &mut self,
        unix_ts_ms: u64,
        mut fill: impl FnMut(&mut R, &mut [u8]) -> Result<(), E>,
    ) -> Result<Uuid, E> {
        let mut sequence = match self.sequence {
            Some(sequence) => sequence,
            None => {
                let mut buf = [0u8; 2];
                fill(&mut self.rng, &mut buf)?;
                #[cfg(feature = "tracing")]
                tracing::trace!("seeded sequence counter");
                u16::from_be_bytes(buf)
            }
        };

        if self.pool.len() - self.cursor < RAND_LEN {
            fill(&mut self.rng, &mut self.pool[..])?;
            self.cursor = 0;
            #[cfg(feature = "tracing")]
            tracing::trace!(pool_size = self.pool.len(), "refilled random pool");
        }

        if unix_ts_ms <= self.last_timestamp {
            sequence = sequence.wrapping_add(1);
        }
        self.sequence = Some(sequence);
        self.last_timestamp = unix_ts_ms;

        let mut rand_b = [0u8; RAND_LEN];
        rand_b.copy_from_slice(&self.pool[self.cursor..self.cursor + RAND_LEN]);
        self.cursor += RAND_LEN;

        Ok(Uuid::from_fields_v7(unix_ts_ms, sequence, rand_b))
    }
}

/// Fills `dest` from `rng`, zero-filling it instead if the random source fails.
fn fill_or_zero<R: RngCore>(rng: &mut R, dest: &mut [u8]) -> Result<(), std::convert::Infallible> {
    if let Err(err) = rng.try_fill_bytes(dest) {
        #[cfg(feature = "tracing")]
        tracing::warn!(error = %err, len = dest.len(), "random source failed; zero-filling");
        #[cfg(not(feature = "tracing"))]
        let _ = err;
        dest.fill(0);
    }
    Ok(())
}

/// An infinite iterator over the identifiers of a [`Generator`], created by
/// [`Generator::iter()`].
#[derive(Debug)]
pub struct Iter<'a, R, T> {
    generator: &'a Generator<R, T>,
}

impl<R: RngCore, T: TimeSource> Iterator for Iter<'_, R, T> {
    type Item = Uuid;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generator.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RngCore, T: TimeSource> FusedIterator for Iter<'_, R, T> {}
