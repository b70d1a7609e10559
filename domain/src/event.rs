use crate::entropy::{EntropySource, EVENT_LEN};
use crate::error::Error;
use std::fmt;

/// Width of the hex rendering of a stream event.
pub const HEX_LEN: usize = EVENT_LEN * 2;

/// One generated value pushed to a client: `EVENT_LEN` random bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamEvent([u8; EVENT_LEN]);

impl StreamEvent {
    /// Draws a new event from `source`.
    pub fn generate(source: &dyn EntropySource) -> Result<Self, Error> {
        Ok(Self(source.next()?))
    }

    pub fn from_bytes(bytes: [u8; EVENT_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; EVENT_LEN] {
        &self.0
    }

    /// Lowercase, zero-padded hex; always `HEX_LEN` characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses the output of [`StreamEvent::to_hex`]. Uppercase digits are
    /// rejected so that the hex form stays injective.
    pub fn from_hex(value: &str) -> Result<Self, Error> {
        if value.len() != HEX_LEN {
            return Err(Error::decode("hex value has the wrong width"));
        }
        if value.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(Error::decode("hex value is not lowercase"));
        }

        let mut bytes = [0u8; EVENT_LEN];
        hex::decode_to_slice(value, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for StreamEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, ExternalErrorKind, InternalErrorKind};

    struct FixedEntropy([u8; EVENT_LEN]);

    impl EntropySource for FixedEntropy {
        fn next(&self) -> Result<[u8; EVENT_LEN], Error> {
            Ok(self.0)
        }
    }

    struct ExhaustedEntropy;

    impl EntropySource for ExhaustedEntropy {
        fn next(&self) -> Result<[u8; EVENT_LEN], Error> {
            Err(Error::entropy_unavailable("no bytes left"))
        }
    }

    #[test]
    fn test_to_hex_is_zero_padded_lowercase() {
        let event = StreamEvent::from_bytes([0x00, 0x0a, 0xff]);
        assert_eq!(event.to_hex(), "000aff");
        assert_eq!(event.to_string(), "000aff");
    }

    #[test]
    fn test_hex_round_trip_over_byte_boundaries() {
        for bytes in [[0x00, 0x00, 0x00], [0xff, 0xff, 0xff], [0x01, 0x80, 0x7f]] {
            let event = StreamEvent::from_bytes(bytes);
            let decoded = StreamEvent::from_hex(&event.to_hex()).unwrap();
            assert_eq!(decoded, event);
        }
    }

    #[test]
    fn test_from_hex_rejects_uppercase() {
        let err = StreamEvent::from_hex("ABCDEF").unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Decode)
        );
    }

    #[test]
    fn test_from_hex_rejects_wrong_width() {
        assert!(StreamEvent::from_hex("abcd").is_err());
        assert!(StreamEvent::from_hex("abcdef00").is_err());
    }

    #[test]
    fn test_from_hex_rejects_non_hex() {
        assert!(StreamEvent::from_hex("abcdeg").is_err());
    }

    #[test]
    fn test_generate_uses_source() {
        let event = StreamEvent::generate(&FixedEntropy([1, 2, 3])).unwrap();
        assert_eq!(event.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_generate_surfaces_entropy_unavailable() {
        let err = StreamEvent::generate(&ExhaustedEntropy).unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::EntropyUnavailable)
        );
    }
}
