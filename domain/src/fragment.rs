//! Markup rendering of stream events.
//!
//! Every fragment targets the same element id so that each push replaces the
//! previous one in place on the client.

use crate::error::Error;
use crate::event::{StreamEvent, HEX_LEN};
use std::fmt;

/// Element id every fragment targets.
pub const FEED_ELEMENT_ID: &str = "feed";

const OPEN_PREFIX: &str = r#"<span id="feed" style="color:#"#;
const BORDER_PREFIX: &str = ";border:1px solid #";
const STYLE_SUFFIX: &str = r#";border-radius:0.25rem;padding:1rem;">"#;
const CLOSE: &str = "</span>";

/// A stream event rendered as markup for the `feed` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    html: String,
}

impl Fragment {
    /// Renders `event`. The hex value appears three times: as the text
    /// color, as the border color and as the label.
    pub fn encode(event: &StreamEvent) -> Self {
        let hex = event.to_hex();
        Self {
            html: format!("{OPEN_PREFIX}{hex}{BORDER_PREFIX}{hex}{STYLE_SUFFIX}{hex}{CLOSE}"),
        }
    }

    /// Parses markup produced by [`Fragment::encode`] back into its event.
    ///
    /// Fails unless the markup targets `feed` and all three slots carry the
    /// same lowercase hex value.
    pub fn decode(html: &str) -> Result<StreamEvent, Error> {
        let rest = html
            .strip_prefix(OPEN_PREFIX)
            .ok_or_else(|| Error::decode("fragment does not target the feed element"))?;

        let (color, rest) = split_hex(rest)?;
        let rest = rest
            .strip_prefix(BORDER_PREFIX)
            .ok_or_else(|| Error::decode("missing border color"))?;
        let (border, rest) = split_hex(rest)?;
        let rest = rest
            .strip_prefix(STYLE_SUFFIX)
            .ok_or_else(|| Error::decode("unexpected style attribute"))?;
        let label = rest
            .strip_suffix(CLOSE)
            .ok_or_else(|| Error::decode("unterminated element"))?;

        if color != border || color != label {
            return Err(Error::decode("hex slots disagree"));
        }

        StreamEvent::from_hex(color)
    }

    pub fn target(&self) -> &'static str {
        FEED_ELEMENT_ID
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.html)
    }
}

fn split_hex(value: &str) -> Result<(&str, &str), Error> {
    if value.len() < HEX_LEN || !value.is_char_boundary(HEX_LEN) {
        return Err(Error::decode("truncated hex value"));
    }
    Ok(value.split_at(HEX_LEN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_exact_markup() {
        let fragment = Fragment::encode(&StreamEvent::from_bytes([0xab, 0xcd, 0xef]));
        assert_eq!(
            fragment.as_str(),
            r#"<span id="feed" style="color:#abcdef;border:1px solid #abcdef;border-radius:0.25rem;padding:1rem;">abcdef</span>"#
        );
        assert_eq!(fragment.target(), "feed");
    }

    #[test]
    fn test_encode_is_deterministic() {
        let event = StreamEvent::from_bytes([0x12, 0x34, 0x56]);
        assert_eq!(Fragment::encode(&event), Fragment::encode(&event));
    }

    #[test]
    fn test_hex_appears_three_times() {
        let fragment = Fragment::encode(&StreamEvent::from_bytes([0x00, 0x00, 0x01]));
        assert_eq!(fragment.as_str().matches("000001").count(), 3);
    }

    #[test]
    fn test_decode_recovers_event_across_byte_space_samples() {
        // Walk the 24-bit space with a stride co-prime to it so every byte
        // position sees a spread of values.
        let mut value: u32 = 0;
        for _ in 0..4096 {
            let bytes = [(value >> 16) as u8, (value >> 8) as u8, value as u8];
            let event = StreamEvent::from_bytes(bytes);
            let fragment = Fragment::encode(&event);
            assert_eq!(Fragment::decode(fragment.as_str()).unwrap(), event);
            value = (value + 40_961) & 0x00ff_ffff;
        }
    }

    #[test]
    fn test_decode_rejects_mismatched_slots() {
        let html = r#"<span id="feed" style="color:#abcdef;border:1px solid #abcdef;border-radius:0.25rem;padding:1rem;">000000</span>"#;
        assert!(Fragment::decode(html).is_err());
    }

    #[test]
    fn test_decode_rejects_other_target() {
        let html = r#"<span id="other" style="color:#abcdef;border:1px solid #abcdef;border-radius:0.25rem;padding:1rem;">abcdef</span>"#;
        assert!(Fragment::decode(html).is_err());
    }

    #[test]
    fn test_decode_rejects_truncated_markup() {
        assert!(Fragment::decode(r#"<span id="feed" style="color:#abc"#).is_err());
    }
}
