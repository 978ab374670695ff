use crate::commands::CommandCode;
use bytes::{BufMut, Bytes, BytesMut};
use modlink_core::{
    DeviceId, Error, Result,
    constants::{FRAME_END, FRAME_HEADER_LENGTH, FRAME_OVERHEAD, FRAME_START, MAX_PAYLOAD_LENGTH},
};
use std::fmt;

/// One wire frame: addressed command plus payload.
///
/// The checksum is an XOR over device id, command, length, and payload
/// bytes; it is computed on [`encode`](Frame::encode) and verified on
/// [`decode`](Frame::decode).
///
/// # Examples
///
/// ```
/// use modlink_protocol::{CommandCode, Frame};
/// use modlink_core::DeviceId;
/// use bytes::Bytes;
///
/// let frame = Frame::new(
///     DeviceId::new(0).unwrap(),
///     CommandCode::ReadIndex,
///     Bytes::from_static(&[0x05, 0x00]),
/// )
/// .unwrap();
///
/// let wire = frame.encode();
/// assert_eq!(wire[0], 0x55); // start marker
/// assert_eq!(wire[wire.len() - 1], 0xAA); // end marker
///
/// let back = Frame::decode(&wire).unwrap();
/// assert_eq!(back.command(), CommandCode::ReadIndex);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    device: DeviceId,
    command: CommandCode,
    payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    ///
    /// # Errors
    /// Returns `Error::PayloadTooLarge` if the payload exceeds
    /// [`MAX_PAYLOAD_LENGTH`].
    pub fn new(device: DeviceId, command: CommandCode, payload: Bytes) -> Result<Self> {
        if payload.len() > MAX_PAYLOAD_LENGTH {
            return Err(Error::PayloadTooLarge {
                length: payload.len(),
                max: MAX_PAYLOAD_LENGTH,
            });
        }
        Ok(Self {
            device,
            command,
            payload,
        })
    }

    /// Create a frame with an empty payload.
    pub fn empty(device: DeviceId, command: CommandCode) -> Self {
        Self {
            device,
            command,
            payload: Bytes::new(),
        }
    }

    /// Target device address.
    #[must_use]
    pub fn device(&self) -> DeviceId {
        self.device
    }

    /// Command byte.
    #[must_use]
    pub fn command(&self) -> CommandCode {
        self.command
    }

    /// Payload bytes, without framing.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Total wire length of a frame carrying `payload_len` payload bytes.
    #[must_use]
    pub const fn wire_length(payload_len: usize) -> usize {
        payload_len + FRAME_OVERHEAD
    }

    /// Serialize to wire bytes, including markers and checksum.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(Self::wire_length(self.payload.len()));
        buf.put_u8(FRAME_START);
        buf.put_u8(self.device.as_u8());
        buf.put_u8(self.command.as_u8());
        buf.put_u16_le(self.payload.len() as u16);
        buf.put_slice(&self.payload);
        buf.put_u8(checksum(
            self.device.as_u8(),
            self.command.as_u8(),
            &self.payload,
        ));
        buf.put_u8(FRAME_END);
        buf.freeze()
    }

    /// Parse a complete wire frame, verifying markers, declared length,
    /// and checksum.
    ///
    /// # Errors
    /// Returns `Error::InvalidFrame` for marker/length violations,
    /// `Error::ChecksumMismatch` for a corrupted body, and
    /// `Error::UnknownCommand` for an unrecognized command byte.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < FRAME_OVERHEAD {
            return Err(Error::invalid_frame(format!(
                "{} bytes is shorter than the minimum frame of {}",
                bytes.len(),
                FRAME_OVERHEAD
            )));
        }
        if bytes[0] != FRAME_START {
            return Err(Error::invalid_frame(format!(
                "bad start marker {:#04x}",
                bytes[0]
            )));
        }
        if bytes[bytes.len() - 1] != FRAME_END {
            return Err(Error::invalid_frame(format!(
                "bad end marker {:#04x}",
                bytes[bytes.len() - 1]
            )));
        }

        let device =
            DeviceId::new(bytes[1]).map_err(|_| Error::invalid_frame("broadcast device id"))?;
        let command = CommandCode::from_u8(bytes[2])?;
        let declared = u16::from_le_bytes([bytes[3], bytes[4]]) as usize;
        if declared > MAX_PAYLOAD_LENGTH {
            return Err(Error::PayloadTooLarge {
                length: declared,
                max: MAX_PAYLOAD_LENGTH,
            });
        }
        if bytes.len() != Self::wire_length(declared) {
            return Err(Error::invalid_frame(format!(
                "declared payload of {} bytes does not match frame of {} bytes",
                declared,
                bytes.len()
            )));
        }

        let payload = &bytes[FRAME_HEADER_LENGTH..FRAME_HEADER_LENGTH + declared];
        let expected = checksum(bytes[1], bytes[2], payload);
        let actual = bytes[bytes.len() - 2];
        if expected != actual {
            return Err(Error::ChecksumMismatch { expected, actual });
        }

        Ok(Self {
            device,
            command,
            payload: Bytes::copy_from_slice(payload),
        })
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame[device={}, command={}, payload={}B]",
            self.device,
            self.command,
            self.payload.len()
        )
    }
}

/// XOR checksum over device id, command, length bytes, and payload.
fn checksum(device: u8, command: u8, payload: &[u8]) -> u8 {
    let [len_lo, len_hi] = (payload.len() as u16).to_le_bytes();
    payload
        .iter()
        .fold(device ^ command ^ len_lo ^ len_hi, |acc, &b| acc ^ b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> DeviceId {
        DeviceId::new(0).unwrap()
    }

    #[test]
    fn test_encode_layout() {
        let frame = Frame::new(
            device(),
            CommandCode::ReadIndex,
            Bytes::from_static(&[0x05, 0x00]),
        )
        .unwrap();
        let wire = frame.encode();

        assert_eq!(wire.len(), Frame::wire_length(2));
        assert_eq!(wire[0], FRAME_START);
        assert_eq!(wire[1], 0); // device
        assert_eq!(wire[2], 0x01); // command
        assert_eq!(&wire[3..5], &[2, 0]); // payload length, little-endian
        assert_eq!(&wire[5..7], &[0x05, 0x00]);
        assert_eq!(wire[wire.len() - 1], FRAME_END);
    }

    #[test]
    fn test_decode_round_trip() {
        let frame = Frame::new(
            DeviceId::new(7).unwrap(),
            CommandCode::ScanModules,
            Bytes::new(),
        )
        .unwrap();
        let back = Frame::decode(&frame.encode()).unwrap();

        assert_eq!(back, frame);
        assert_eq!(back.device().as_u8(), 7);
    }

    #[test]
    fn test_decode_too_short() {
        assert!(Frame::decode(&[FRAME_START, 0, 1, 0, 0]).is_err());
        assert!(Frame::decode(&[]).is_err());
    }

    #[test]
    fn test_decode_bad_markers() {
        let wire = Frame::empty(device(), CommandCode::Ack).encode();

        let mut bad_start = wire.to_vec();
        bad_start[0] = 0x00;
        assert!(matches!(
            Frame::decode(&bad_start),
            Err(Error::InvalidFrame { .. })
        ));

        let mut bad_end = wire.to_vec();
        let last = bad_end.len() - 1;
        bad_end[last] = 0x00;
        assert!(matches!(
            Frame::decode(&bad_end),
            Err(Error::InvalidFrame { .. })
        ));
    }

    #[test]
    fn test_decode_length_mismatch() {
        let mut wire = Frame::new(
            device(),
            CommandCode::WriteIndex,
            Bytes::from_static(&[1, 2, 3]),
        )
        .unwrap()
        .encode()
        .to_vec();
        wire[3] = 4; // lie about the payload length
        assert!(matches!(
            Frame::decode(&wire),
            Err(Error::InvalidFrame { .. })
        ));
    }

    #[test]
    fn test_decode_corrupted_payload() {
        let mut wire = Frame::new(
            device(),
            CommandCode::WriteIndex,
            Bytes::from_static(&[1, 2, 3]),
        )
        .unwrap()
        .encode()
        .to_vec();
        wire[5] ^= 0xFF;
        assert!(matches!(
            Frame::decode(&wire),
            Err(Error::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_unknown_command() {
        let mut wire = Frame::empty(device(), CommandCode::Ack).encode().to_vec();
        wire[2] = 0x7F;
        // checksum also breaks, but the command byte is rejected first
        assert!(matches!(
            Frame::decode(&wire),
            Err(Error::UnknownCommand(0x7F))
        ));
    }

    #[test]
    fn test_payload_too_large() {
        let payload = Bytes::from(vec![0u8; MAX_PAYLOAD_LENGTH + 1]);
        assert!(matches!(
            Frame::new(device(), CommandCode::WriteIndex, payload),
            Err(Error::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn test_max_payload_accepted() {
        let payload = Bytes::from(vec![0xAB; MAX_PAYLOAD_LENGTH]);
        let frame = Frame::new(device(), CommandCode::WriteIndex, payload).unwrap();
        let back = Frame::decode(&frame.encode()).unwrap();
        assert_eq!(back.payload().len(), MAX_PAYLOAD_LENGTH);
    }
}
