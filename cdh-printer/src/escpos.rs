//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS print data. Commands are
//! appended to the buffer in call order.

use crate::encoding::TextEncoding;
use crate::error::{PrintError, PrintResult};
use crate::raster::{PixelBuffer, RasterEncoder};

/// Largest QR payload: the store command's 16-bit length also counts 3 header bytes
pub const MAX_QR_DATA: usize = 0xFFFF - 3;

/// Text alignment (ESC a n)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    fn code(self) -> u8 {
        match self {
            Align::Left => 0x00,
            Align::Center => 0x01,
            Align::Right => 0x02,
        }
    }
}

/// ESC/POS command builder
///
/// Builds ESC/POS byte sequences for thermal printers. Text is converted to
/// the active [`TextEncoding`] as it is appended.
#[derive(Debug, Clone)]
pub struct EscPosBuilder {
    buf: Vec<u8>,
    width: usize,
    encoding: TextEncoding,
}

impl EscPosBuilder {
    /// Create an empty builder for the specified paper width in characters
    ///
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub fn new(width: usize) -> Self {
        Self {
            buf: Vec::with_capacity(4096),
            width,
            encoding: TextEncoding::default(),
        }
    }

    /// Get the configured paper width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the active text encoding
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    // === Printer Control ===

    /// Initialize printer (ESC @)
    pub fn init(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x40]);
        self
    }

    /// Switch text encoding, selecting the matching code table (ESC t n)
    /// when the printer needs one
    pub fn code_page(&mut self, encoding: TextEncoding) -> &mut Self {
        if let Some(table) = encoding.code_table() {
            self.buf.extend_from_slice(&[0x1B, 0x74, table]);
        }
        self.encoding = encoding;
        self
    }

    // === Text Output ===

    /// Write text in the active encoding
    pub fn text(&mut self, s: &str) -> &mut Self {
        let bytes = self.encoding.encode(s);
        self.buf.extend_from_slice(&bytes);
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    /// Write empty line
    pub fn newline(&mut self) -> &mut Self {
        self.buf.push(b'\n');
        self
    }

    /// Print and feed n lines (ESC d n)
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x64, lines]);
        self
    }

    // === Alignment ===

    pub fn align(&mut self, align: Align) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, align.code()]);
        self
    }

    pub fn center(&mut self) -> &mut Self {
        self.align(Align::Center)
    }

    pub fn left(&mut self) -> &mut Self {
        self.align(Align::Left)
    }

    pub fn right(&mut self) -> &mut Self {
        self.align(Align::Right)
    }

    // === Text Style ===

    /// Enable or disable bold text (ESC E n)
    pub fn bold(&mut self, on: bool) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, on as u8]);
        self
    }

    /// Enable or disable underline (ESC - n)
    pub fn underline(&mut self, on: bool) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x2D, on as u8]);
        self
    }

    /// Character size multipliers (GS ! n), each clamped to 1..=8
    pub fn size(&mut self, width: u8, height: u8) -> &mut Self {
        let w = width.clamp(1, 8) - 1;
        let h = height.clamp(1, 8) - 1;
        self.buf.extend_from_slice(&[0x1D, 0x21, (w << 4) | h]);
        self
    }

    /// Double width and height
    pub fn double_size(&mut self) -> &mut Self {
        self.size(2, 2)
    }

    /// Reset to normal size
    pub fn reset_size(&mut self) -> &mut Self {
        self.size(1, 1)
    }

    // === Separators ===

    /// Print a full-width line of `c`
    pub fn separator(&mut self, c: char) -> &mut Self {
        let line: String = std::iter::repeat_n(c, self.width).collect();
        self.line(&line)
    }

    // === Layout Helpers ===

    /// Print left and right text on the same line
    ///
    /// Left text is left-aligned, right text is right-aligned,
    /// with spaces filling the gap.
    pub fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        let lw = self.encoding.width(left);
        let rw = self.encoding.width(right);

        self.text(left);
        if lw + rw >= self.width {
            self.text(" ");
        } else {
            self.text(&" ".repeat(self.width - lw - rw));
        }
        self.line(right)
    }

    // === Paper Control ===

    /// Cut paper (GS V 0)
    pub fn cut(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x00]);
        self
    }

    /// Partial cut (GS V 1), leaves a small connection
    pub fn cut_partial(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x01]);
        self
    }

    /// Feed n lines then full cut (GS V 66 n)
    pub fn cut_feed(&mut self, lines: u8) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x42, lines]);
        self
    }

    // === Peripherals ===

    /// Sound the buzzer `times` times, each `duration` x 50ms (ESC B n t)
    pub fn beep(&mut self, times: u8, duration: u8) -> &mut Self {
        self.buf
            .extend_from_slice(&[0x1B, 0x42, times.clamp(1, 9), duration.clamp(1, 9)]);
        self
    }

    /// Kick the cash drawer on connector pin 2 (ESC p 0 t1 t2)
    pub fn open_drawer(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x70, 0x00, 25, 250]);
        self
    }

    /// Kick the cash drawer on connector pin 5
    pub fn open_drawer_pin5(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x70, 0x01, 25, 250]);
        self
    }

    // === QR Code ===

    /// Print a QR code
    ///
    /// Size: 1-16 (module size in dots). Data longer than
    /// [`MAX_QR_DATA`] bytes does not fit the length field and is rejected.
    pub fn qr_code(&mut self, data: &str, size: u8) -> PrintResult<&mut Self> {
        let data_bytes = data.as_bytes();
        if data_bytes.len() > MAX_QR_DATA {
            return Err(PrintError::InvalidConfig(format!(
                "QR data is {} bytes, max {}",
                data_bytes.len(),
                MAX_QR_DATA
            )));
        }
        let size = size.clamp(1, 16);

        // Function 165: model 2
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x04, 0x00, 0x31, 0x41, 0x32, 0x00]);
        // Function 167: module size
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x43, size]);
        // Function 169: error correction M
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x45, 0x31]);

        // Function 180: store data
        let len = data_bytes.len() + 3;
        self.buf.extend_from_slice(&[
            0x1D,
            0x28,
            0x6B,
            (len & 0xFF) as u8,
            ((len >> 8) & 0xFF) as u8,
            0x31,
            0x50,
            0x30,
        ]);
        self.buf.extend_from_slice(data_bytes);

        // Function 181: print
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x51, 0x30]);
        Ok(self)
    }

    // === Raster Images ===

    /// Append a raster image with the default threshold
    pub fn image(&mut self, buffer: &PixelBuffer<'_>) -> PrintResult<&mut Self> {
        self.image_with(buffer, &RasterEncoder::new())
    }

    /// Append a raster image using a configured encoder
    ///
    /// Nothing is appended if encoding fails.
    pub fn image_with(
        &mut self,
        buffer: &PixelBuffer<'_>,
        encoder: &RasterEncoder,
    ) -> PrintResult<&mut Self> {
        let data = encoder.encode(buffer)?;
        self.buf.extend_from_slice(&data);
        Ok(self)
    }

    // === Raw Commands ===

    /// Write raw bytes directly
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    // === Buffer ===

    /// Bytes accumulated so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Discard all accumulated commands, keeping width and encoding
    pub fn clear(&mut self) -> &mut Self {
        self.buf.clear();
        self
    }

    /// Consume the builder and return the final byte buffer
    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new(48)
    }
}
