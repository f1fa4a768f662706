/// Column-major coordinate mapping shared by channel population and reconstruction
///
/// Pixel `(x, y)` lives at index `x * height + y`. Using a different mapping on
/// either side transposes the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMajor {
    width: usize,
    height: usize,
}

impl ColumnMajor {
    /// Mapping for a `width` x `height` image
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Image width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total pixel count
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// True for a zero-area image
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Channel index of pixel `(x, y)`
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        x * self.height + y
    }

    /// Offset of pixel `(x, y)` in a row-major interleaved buffer
    #[inline]
    pub fn interleaved_offset(&self, x: usize, y: usize, channels: usize) -> usize {
        (y * self.width + x) * channels
    }
}
