// Fixed-capacity arena that assembles an uncompressed PCM container in place

use crate::audio_constants::{
    DATA_SIZE_OFFSET, RIFF_SIZE_OFFSET, WAV_HEADER_SIZE,
};

/// Fixed PCM format parameters baked into the container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// Bytes per sample frame across all channels.
    pub fn block_align(&self) -> u16 {
        self.channels * (self.bits_per_sample / 8)
    }

    /// Bytes of PCM per second of audio.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }
}

impl Default for WavFormat {
    fn default() -> Self {
        Self {
            sample_rate: crate::audio_constants::DEFAULT_SAMPLE_RATE,
            channels: crate::audio_constants::DEFAULT_CHANNELS,
            bits_per_sample: crate::audio_constants::DEFAULT_BITS_PER_SAMPLE,
        }
    }
}

/// One pre-allocated byte region holding a WAV container under assembly.
///
/// The arena is allocated exactly once; every write goes through the
/// capacity-checked [`WavBuffer::append`], which is the sole overflow guard.
/// The invariant `cursor <= capacity` holds at all times, and
/// `WAV_HEADER_SIZE <= cursor` once the header is written.
#[derive(Debug)]
pub struct WavBuffer {
    data: Box<[u8]>,
    cursor: usize,
}

impl WavBuffer {
    /// Allocate the arena up front.
    ///
    /// Allocation failure is reported, not aborted on, so a caller can treat
    /// it as "recording permanently unavailable". `capacity` must include
    /// room for the header.
    pub fn allocate(capacity: usize) -> Result<Self, std::collections::TryReserveError> {
        debug_assert!(capacity >= WAV_HEADER_SIZE, "arena smaller than container header");
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)?;
        data.resize(capacity, 0);
        Ok(Self { data: data.into_boxed_slice(), cursor: 0 })
    }

    /// Install the canonical 44-byte RIFF/WAVE header for uncompressed PCM
    /// and reset the cursor past it, discarding any previous content.
    ///
    /// The two size fields are left zero until [`WavBuffer::finalize`]
    /// patches them.
    pub fn write_header(&mut self, format: &WavFormat) {
        let mut header = [0u8; WAV_HEADER_SIZE];
        header[0..4].copy_from_slice(b"RIFF");
        // bytes 4..8: overall size, patched on finalize
        header[8..12].copy_from_slice(b"WAVE");
        header[12..16].copy_from_slice(b"fmt ");
        header[16..20].copy_from_slice(&16u32.to_le_bytes()); // PCM fmt chunk size
        header[20..22].copy_from_slice(&1u16.to_le_bytes()); // audio format: PCM
        header[22..24].copy_from_slice(&format.channels.to_le_bytes());
        header[24..28].copy_from_slice(&format.sample_rate.to_le_bytes());
        header[28..32].copy_from_slice(&format.byte_rate().to_le_bytes());
        header[32..34].copy_from_slice(&format.block_align().to_le_bytes());
        header[34..36].copy_from_slice(&format.bits_per_sample.to_le_bytes());
        header[36..40].copy_from_slice(b"data");
        // bytes 40..44: data size, patched on finalize

        self.data[..WAV_HEADER_SIZE].copy_from_slice(&header);
        self.cursor = WAV_HEADER_SIZE;
    }

    /// Append PCM bytes at the cursor.
    ///
    /// Returns `false` and copies nothing if the bytes would not fit;
    /// callers must check the return value.
    #[must_use = "append is the sole overflow guard; the result must be checked"]
    pub fn append(&mut self, bytes: &[u8]) -> bool {
        if self.cursor + bytes.len() > self.data.len() {
            return false;
        }
        self.data[self.cursor..self.cursor + bytes.len()].copy_from_slice(bytes);
        self.cursor += bytes.len();
        true
    }

    /// Patch the container's size fields from the final cursor position.
    ///
    /// A session that never captured payload (`cursor == header size`) is a
    /// valid empty recording; finalize leaves it untouched.
    pub fn finalize(&mut self) {
        if self.cursor <= WAV_HEADER_SIZE {
            return;
        }
        let riff_size = (self.cursor - 8) as u32;
        let data_size = (self.cursor - WAV_HEADER_SIZE) as u32;
        self.data[RIFF_SIZE_OFFSET..RIFF_SIZE_OFFSET + 4]
            .copy_from_slice(&riff_size.to_le_bytes());
        self.data[DATA_SIZE_OFFSET..DATA_SIZE_OFFSET + 4]
            .copy_from_slice(&data_size.to_le_bytes());
    }

    /// Borrowed view of the assembled container so far (header included).
    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.cursor]
    }

    /// Bytes written so far (the cursor position).
    pub fn len(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// Total capacity of the arena, header included.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// PCM payload bytes written past the header.
    pub fn payload_len(&self) -> usize {
        self.cursor.saturating_sub(WAV_HEADER_SIZE)
    }

    /// Bytes still available before the arena is exhausted.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    pub fn is_full(&self) -> bool {
        self.cursor == self.data.len()
    }
}

#[cfg(test)]
#[path = "wav_test.rs"]
mod tests;
