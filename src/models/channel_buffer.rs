use crate::error::SmqtError;

/// One color channel: raw intensities and the SMQT output accumulators
///
/// `raw` and `output` always have the same, non-zero length. `raw` is filled
/// by the pixel source; `output` starts zeroed and is only written by the
/// engine, one bit per quantization level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelBuffer {
    raw: Vec<u8>,
    output: Vec<u8>,
}

impl ChannelBuffer {
    /// Allocate a zero-filled channel of `size` pixels
    pub fn new(size: usize) -> Result<Self, SmqtError> {
        if size == 0 {
            return Err(SmqtError::InvalidSize { size });
        }
        Ok(Self {
            raw: vec![0; size],
            output: vec![0; size],
        })
    }

    /// Wrap already-extracted intensities
    pub fn from_raw(raw: Vec<u8>) -> Result<Self, SmqtError> {
        if raw.is_empty() {
            return Err(SmqtError::InvalidSize { size: 0 });
        }
        let output = vec![0; raw.len()];
        Ok(Self { raw, output })
    }

    /// Write one raw intensity
    pub fn set_raw(&mut self, index: usize, value: u8) -> Result<(), SmqtError> {
        let len = self.raw.len();
        let slot = self
            .raw
            .get_mut(index)
            .ok_or(SmqtError::IndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Number of pixels in the channel
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// True for a zero-length buffer, which construction rejects
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Raw intensities
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Transform output
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Full position set `[0, len)`, the root of every SMQT run
    pub fn positions(&self) -> Vec<usize> {
        (0..self.raw.len()).collect()
    }

    /// Zero the accumulators so the channel can be transformed again
    pub fn reset_output(&mut self) {
        self.output.fill(0);
    }

    /// Shift `bit` in as the new least significant bit of `output[index]`
    pub(crate) fn append_bit(&mut self, index: usize, bit: bool) -> Result<(), SmqtError> {
        let len = self.output.len();
        let acc = self
            .output
            .get_mut(index)
            .ok_or(SmqtError::IndexOutOfRange { index, len })?;
        *acc = (*acc << 1) | bit as u8;
        Ok(())
    }
}
