//! The binary UUIDv7 value type.

/// Represents a Universally Unique IDentifier in its 16-byte big-endian binary form.
///
/// The derived [`Ord`] compares bytes lexicographically, so identifiers minted by one generator
/// sort by timestamp first and by sequence counter second.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

/// The variant field of a UUID, determined by the most significant bits of byte 8.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Variant {
    /// `0xx`: reserved for NCS backward compatibility; also the Nil UUID.
    Var0,
    /// `10x`: the variant that UUIDv7 uses.
    Var10,
    /// `110`: reserved for Microsoft backward compatibility.
    Var110,
    /// `111`: reserved for future definition; also the Max UUID.
    Var111,
}

impl Uuid {
    /// Nil UUID (all bits cleared). Never produced by a generator.
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (all bits set).
    pub const MAX: Self = Self([0xff; 16]);

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Returns `true` if this is the Nil UUID.
    ///
    /// The Nil value is useful as an "uninitialized" sentinel because a generator never returns it.
    pub const fn is_nil(&self) -> bool {
        u128::from_be_bytes(self.0) == 0
    }

    /// Creates a UUIDv7 from its field values.
    ///
    /// Only the low 48 bits of `unix_ts_ms` and the low 12 bits of `sequence` fit in the layout;
    /// higher bits are discarded. The version and variant bits overwrite the top of byte 6 and
    /// byte 8 respectively, so the first byte of `rand_b` contributes only its low 6 bits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidv7_pool::Uuid;
    ///
    /// let e = Uuid::from_fields_v7(0x0123_4567_89ab, 0x0cde, [0xff; 8]);
    /// assert_eq!(e.unix_ts_ms(), 0x0123_4567_89ab);
    /// assert_eq!(e.sequence(), 0x0cde);
    /// assert_eq!(e.version(), Some(7));
    /// ```
    pub const fn from_fields_v7(unix_ts_ms: u64, sequence: u16, rand_b: [u8; 8]) -> Self {
        Self([
            (unix_ts_ms >> 40) as u8,
            (unix_ts_ms >> 32) as u8,
            (unix_ts_ms >> 24) as u8,
            (unix_ts_ms >> 16) as u8,
            (unix_ts_ms >> 8) as u8,
            unix_ts_ms as u8,
            0x70 | ((sequence >> 8) as u8 & 0x0f),
            sequence as u8,
            0x80 | (rand_b[0] & 0x3f),
            rand_b[1],
            rand_b[2],
            rand_b[3],
            rand_b[4],
            rand_b[5],
            rand_b[6],
            rand_b[7],
        ])
    }

    /// Returns the 48-bit `unix_ts_ms` field.
    pub const fn unix_ts_ms(&self) -> u64 {
        let b = &self.0;
        (b[0] as u64) << 40
            | (b[1] as u64) << 32
            | (b[2] as u64) << 24
            | (b[3] as u64) << 16
            | (b[4] as u64) << 8
            | b[5] as u64
    }

    /// Returns the 12-bit sequence counter field stored under the version bits.
    pub const fn sequence(&self) -> u16 {
        ((self.0[6] & 0x0f) as u16) << 8 | self.0[7] as u16
    }

    /// Returns the variant field value.
    pub const fn variant(&self) -> Variant {
        match self.0[8] >> 5 {
            0b000..=0b011 => Variant::Var0,
            0b100 | 0b101 => Variant::Var10,
            0b110 => Variant::Var110,
            _ => Variant::Var111,
        }
    }

    /// Returns the version field value if the variant is [`Variant::Var10`], or `None` otherwise.
    pub const fn version(&self) -> Option<u8> {
        match self.variant() {
            Variant::Var10 => Some(self.0[6] >> 4),
            _ => None,
        }
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::Uuid;
    use core::fmt;
    use serde::{de, Deserializer, Serializer};

    /// Serialized as a 16-byte string; there is no textual representation.
    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_bytes(self.as_bytes())
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_bytes(VisitorImpl)
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a 16-byte UUID representation")
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from)
                .map_err(|_| E::invalid_length(value.len(), &self))
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut bytes = [0u8; 16];
            for (i, e) in bytes.iter_mut().enumerate() {
                *e = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(i, &self))?;
            }
            if seq.next_element::<u8>()?.is_some() {
                return Err(de::Error::invalid_length(17, &self));
            }
            Ok(Self::Value::from(bytes))
        }
    }

}

#[cfg(test)]
mod tests {
    use super::{Uuid, Variant};

    /// Returns a collection of prepared cases
    fn prepare_cases() -> &'static [((u64, u16, [u8; 8]), u128)] {
        const MAX_UINT48: u64 = (1 << 48) - 1;
        const MAX_UINT12: u16 = (1 << 12) - 1;

        &[
            ((0, 0, [0; 8]), 0x00000000_0000_7000_8000_000000000000),
            ((MAX_UINT48, 0, [0; 8]), 0xffffffff_ffff_7000_8000_000000000000),
            ((0, MAX_UINT12, [0; 8]), 0x00000000_0000_7fff_8000_000000000000),
            ((0, 0, [0xff; 8]), 0x00000000_0000_7000_bfff_ffffffffffff),
            (
                (MAX_UINT48, MAX_UINT12, [0xff; 8]),
                0xffffffff_ffff_7fff_bfff_ffffffffffff,
            ),
            (
                (
                    0x17f22e279b0,
                    0xcc3,
                    [0x18, 0xc4, 0xdc, 0x0c, 0x0c, 0x07, 0x39, 0x8f],
                ),
                0x017f22e2_79b0_7cc3_98c4_dc0c0c07398f,
            ),
        ]
    }

    /// Encodes prepared cases correctly
    #[test]
    fn encodes_prepared_cases_correctly() {
        for (fs, expected) in prepare_cases() {
            let e = Uuid::from_fields_v7(fs.0, fs.1, fs.2);
            assert_eq!(u128::from(e), *expected);
            assert_eq!(e.as_bytes(), &expected.to_be_bytes());
        }
    }

    /// Reads back timestamp and sequence fields
    #[test]
    fn reads_back_timestamp_and_sequence_fields() {
        for (fs, _) in prepare_cases() {
            let e = Uuid::from_fields_v7(fs.0, fs.1, fs.2);
            assert_eq!(e.unix_ts_ms(), fs.0);
            assert_eq!(e.sequence(), fs.1);
            assert_eq!(e.variant(), Variant::Var10);
            assert_eq!(e.version(), Some(7));
        }
    }

    /// Discards bits that do not fit in the layout
    #[test]
    fn discards_bits_that_do_not_fit_in_the_layout() {
        let e = Uuid::from_fields_v7((1 << 48) | 5, 0xffff, [0xc0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(e.unix_ts_ms(), 5);
        assert_eq!(e.sequence(), 0x0fff);
        assert_eq!(e.as_bytes()[6], 0x7f);
        assert_eq!(e.as_bytes()[8], 0x80);
        assert_eq!(e.as_bytes()[9..], [1, 2, 3, 4, 5, 6, 7]);
    }

    /// Orders identifiers by timestamp and then by sequence
    #[test]
    fn orders_identifiers_by_timestamp_and_then_by_sequence() {
        let a = Uuid::from_fields_v7(100, 0x0fff, [0xff; 8]);
        let b = Uuid::from_fields_v7(101, 0, [0; 8]);
        let c = Uuid::from_fields_v7(101, 1, [0; 8]);
        assert!(a < b);
        assert!(b < c);
    }

    /// Returns Nil and Max UUIDs
    #[test]
    fn returns_nil_and_max_uuids() {
        assert!(Uuid::NIL.is_nil());
        assert!(Uuid::default().is_nil());
        assert!(!Uuid::MAX.is_nil());
        assert_eq!(Uuid::NIL.variant(), Variant::Var0);
        assert_eq!(Uuid::NIL.version(), None);
        assert_eq!(Uuid::MAX.variant(), Variant::Var111);
        assert_eq!(Uuid::MAX.version(), None);
        assert_eq!(u128::from(Uuid::MAX), u128::MAX);
    }

    /// Compares identifiers byte by byte
    #[test]
    fn compares_identifiers_byte_by_byte() {
        let x = Uuid::from_fields_v7(0x17f22e279b0, 0xcc3, [9; 8]);
        let mut bytes = <[u8; 16]>::from(x);
        assert_eq!(Uuid::from(bytes), x);
        bytes[15] ^= 1;
        assert_ne!(Uuid::from(bytes), x);
    }

    /// Has symmetric converters
    #[test]
    fn has_symmetric_converters() {
        for (fs, _) in prepare_cases() {
            let e = Uuid::from_fields_v7(fs.0, fs.1, fs.2);
            assert_eq!(Uuid::from(<[u8; 16]>::from(e)), e);
            assert_eq!(Uuid::from(u128::from(e)), e);
            assert_eq!(AsRef::<[u8]>::as_ref(&e), &e.as_bytes()[..]);
            #[cfg(feature = "uuid")]
            assert_eq!(Uuid::from(<uuid::Uuid>::from(e)), e);
            #[cfg(feature = "uuid")]
            assert_eq!(uuid::Uuid::from(e).as_u128(), u128::from(e));
        }
    }
}
