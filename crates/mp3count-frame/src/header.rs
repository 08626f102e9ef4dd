//! MPEG-1 Layer III frame header decoding.
//!
//! Only the fields needed to size a frame are read. Version, layer, channel
//! mode and CRC bits are ignored, so any sync match with a usable
//! bitrate/sample-rate pair is treated as a frame.

/// Bytes needed to decode a header.
pub const HEADER_SIZE: usize = 4;

/// Samples carried by one Layer III frame.
pub const SAMPLES_PER_FRAME: u32 = 1152;

/// Bitrates in kbps, indexed by the 4-bit bitrate index. 0 = free/reserved.
const BITRATES_KBPS: [u16; 16] = [
    0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 0,
];

/// Sample rates in Hz, indexed by the 2-bit sample-rate index. 0 = reserved.
const SAMPLE_RATES_HZ: [u32; 4] = [44100, 48000, 32000, 0];

/// Returns true if the two bytes carry the 11-bit frame sync.
#[inline]
pub fn is_sync(b0: u8, b1: u8) -> bool {
    b0 == 0xFF && b1 & 0xE0 == 0xE0
}

/// The sizing fields of a frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Bitrate in kbps.
    pub bitrate_kbps: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Padding bit: one extra byte.
    pub padding: bool,
}

impl FrameHeader {
    /// Decode the sizing fields from a big-endian header word.
    ///
    /// Returns `None` for reserved or free-format bitrate and sample-rate
    /// indices. The sync bits are not checked here; see [`is_sync`].
    pub fn decode(bits: u32) -> Option<Self> {
        let bitrate_kbps = BITRATES_KBPS[((bits >> 12) & 0xF) as usize];
        let sample_rate = SAMPLE_RATES_HZ[((bits >> 10) & 0x3) as usize];
        let padding = (bits >> 9) & 0x1 == 1;

        if bitrate_kbps == 0 || sample_rate == 0 {
            return None;
        }

        Some(Self {
            bitrate_kbps,
            sample_rate,
            padding,
        })
    }

    /// Decode from the first four bytes of a candidate frame.
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Option<Self> {
        Self::decode(u32::from_be_bytes(*bytes))
    }

    /// Total frame length in bytes, header included.
    pub fn frame_len(&self) -> usize {
        let slots = 144 * u32::from(self.bitrate_kbps) * 1000 / self.sample_rate;
        slots as usize + usize::from(self.padding)
    }

    /// Playback time of one frame, in seconds.
    pub fn duration_secs(&self) -> f64 {
        f64::from(SAMPLES_PER_FRAME) / f64::from(self.sample_rate)
    }
}

/// Frame length for a header word, or `None` if the header is rejected.
pub fn frame_length(bits: u32) -> Option<usize> {
    FrameHeader::decode(bits).map(|header| header.frame_len())
}
