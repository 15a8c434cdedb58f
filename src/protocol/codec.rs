use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use super::message::Frame;
use super::wire::END_STRING;
use crate::core::{CodecError, Error};

/// Stream codec for NetworkTables frames
#[derive(Clone, Debug, Default)]
pub struct FrameCodec {
    /// Offset up to which the buffered frame's open long string has been
    /// searched for a terminator
    string_scan: Option<usize>,
}

impl FrameCodec {
    /// Creates a new frame codec
    pub fn new() -> Self {
        FrameCodec::default()
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = Error;

    /// Decodes one frame from the front of `src`.
    ///
    /// Malformed input is consumed up to the point where decoding failed, so a
    /// caller that logs the error and keeps decoding makes progress.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        // A frame stuck in a long string cannot finish until a terminator shows up
        if let Some(scanned) = self.string_scan {
            if !src[scanned.min(src.len())..].contains(&END_STRING) {
                self.string_scan = Some(src.len());
                return Ok(None);
            }
            self.string_scan = None;
        }

        let (result, consumed) = {
            let mut cursor = &src[..];
            let result = Frame::decode(&mut cursor);
            (result, src.len() - cursor.len())
        };

        match result {
            Ok(frame) => {
                src.advance(consumed);
                Ok(Some(frame))
            }
            // Need more data to finish the frame
            Err(CodecError::Incomplete) => Ok(None),
            Err(CodecError::OpenString) => {
                self.string_scan = Some(src.len());
                Ok(None)
            }
            Err(e) => {
                src.advance(consumed);
                Err(e.into())
            }
        }
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = Error;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let start = dst.len();
        if let Err(e) = item.encode(dst) {
            // Leave nothing of a rejected frame behind
            dst.truncate(start);
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Entry;

    #[test]
    fn test_codec_waits_for_whole_frame() {
        let mut codec = FrameCodec::new();
        let mut bytes = BytesMut::from(&[0x80u8, 0x01, 0xff][..]);

        assert!(codec.decode(&mut bytes).unwrap().is_none());
        assert_eq!(bytes.len(), 3);

        bytes.extend_from_slice(&[0xff, 0xff, 0xe5, 0x21]);
        assert_eq!(
            codec.decode(&mut bytes).unwrap(),
            Some(Frame::EntryData {
                key: 0,
                value: Entry::Int(-27)
            })
        );
        assert_eq!(codec.decode(&mut bytes).unwrap(), Some(Frame::Confirmation(1)));
        assert!(codec.decode(&mut bytes).unwrap().is_none());
    }

    #[test]
    fn test_codec_skips_unrecognized_byte() {
        let mut codec = FrameCodec::new();
        let mut bytes = BytesMut::from(&[0x09u8, 0x21][..]);

        let err = codec.decode(&mut bytes).unwrap_err();
        assert!(matches!(err, Error::Codec(CodecError::UnrecognizedCode(0x09))));
        assert_eq!(codec.decode(&mut bytes).unwrap(), Some(Frame::Confirmation(1)));
    }

    #[test]
    fn test_codec_resumes_long_string_scan() {
        let mut codec = FrameCodec::new();
        let mut bytes = BytesMut::from(&[0x06u8, 0x4a, 0xff][..]);
        let name = "n".repeat(300);

        assert!(codec.decode(&mut bytes).unwrap().is_none());
        assert_eq!(codec.string_scan, Some(3));

        for chunk in name.as_bytes().chunks(16) {
            bytes.extend_from_slice(chunk);
            assert!(codec.decode(&mut bytes).unwrap().is_none());
            assert_eq!(codec.string_scan, Some(bytes.len()));
        }

        // terminator arrives, but the key ID is still missing
        bytes.extend_from_slice(&[0x00]);
        assert!(codec.decode(&mut bytes).unwrap().is_none());
        assert_eq!(codec.string_scan, None);

        bytes.extend_from_slice(&[0x85, 0x21]);
        assert_eq!(
            codec.decode(&mut bytes).unwrap(),
            Some(Frame::KeyAssignment {
                table: 0x0a,
                name,
                key: 5
            })
        );
        assert_eq!(codec.decode(&mut bytes).unwrap(), Some(Frame::Confirmation(1)));
    }

    #[test]
    fn test_codec_encode_is_all_or_nothing() {
        let mut codec = FrameCodec::new();
        let mut bytes = BytesMut::new();

        codec
            .encode(
                Frame::TableRequest {
                    name: "A".to_string(),
                    table: 0,
                },
                &mut bytes,
            )
            .unwrap();

        let bad = Frame::KeyAssignment {
            table: 0,
            name: "bad\0name".to_string(),
            key: 1,
        };
        assert!(codec.encode(bad, &mut bytes).is_err());
        assert_eq!(&bytes[..], &[0x0c, 0x01, b'A', 0x40]);
    }
}
