//! Column-aligning writer for tab-separated text.
//!
//! Text written to a [`ColumnWriter`] is split into cells at `\t`. Cells in the
//! same column of adjacent lines form a column block, and every cell in a block
//! is padded to the block's width when the writer is flushed. The text after the
//! last tab on a line is not part of any column and is written unpadded.

use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

/// Layout parameters for a [`ColumnWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Minimum column width, including padding.
    pub min_width: usize,
    /// Width of a tab stop; only used when `pad_char` is `'\t'`.
    pub tab_width: usize,
    /// Padding added to the widest cell of a column.
    pub padding: usize,
    /// Character used for padding.
    pub pad_char: char,
}

impl ColumnLayout {
    /// Layout used for table templates.
    pub const TABLE: Self = Self {
        min_width: 8,
        tab_width: 8,
        padding: 8,
        pad_char: ' ',
    };
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::TABLE
    }
}

/// Buffers tab-separated lines and emits them with aligned columns.
///
/// Output is held until [`Write::flush`] is called, or until a line without
/// any tab ends every open column block.
#[derive(Debug)]
pub struct ColumnWriter<W: Write> {
    inner: W,
    layout: ColumnLayout,
    /// Completed cells per line. The last line is the one being written.
    lines: Vec<Vec<String>>,
    /// Bytes of the cell currently being written.
    cell: Vec<u8>,
}

impl<W: Write> ColumnWriter<W> {
    /// Wraps `inner` using `layout`.
    pub fn new(inner: W, layout: ColumnLayout) -> Self {
        Self {
            inner,
            layout,
            lines: vec![Vec::new()],
            cell: Vec::new(),
        }
    }

    /// Returns the layout.
    pub const fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Flushes buffered text and returns the wrapped writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffered text cannot be written.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.flush()?;
        Ok(self.inner)
    }

    /// Terminates the current cell and returns the number of cells on the line.
    fn terminate_cell(&mut self) -> usize {
        let text = String::from_utf8_lossy(&self.cell).into_owned();
        self.cell.clear();
        let line = self.current_line();
        line.push(text);
        line.len()
    }

    fn current_line(&mut self) -> &mut Vec<String> {
        if self.lines.is_empty() {
            self.lines.push(Vec::new());
        }
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    /// Formats every buffered line into the wrapped writer.
    fn flush_lines(&mut self) -> io::Result<()> {
        if !self.cell.is_empty() {
            self.terminate_cell();
        }

        let mut out = Vec::new();
        let mut widths = Vec::new();
        format_block(&self.lines, &self.layout, &mut widths, 0, self.lines.len(), &mut out);

        self.lines.clear();
        self.lines.push(Vec::new());
        self.inner.write_all(&out)
    }
}

impl<W: Write> Write for ColumnWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut start = 0;
        for (i, &byte) in buf.iter().enumerate() {
            if byte != b'\t' && byte != b'\n' {
                continue;
            }
            self.cell.extend_from_slice(&buf[start..i]);
            start = i + 1;
            let cells = self.terminate_cell();
            if byte == b'\n' {
                self.lines.push(Vec::new());
                // A line with a single cell ends every column block.
                if cells == 1 {
                    self.flush_lines()?;
                }
            }
        }
        self.cell.extend_from_slice(&buf[start..]);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_lines()?;
        self.inner.flush()
    }
}

/// Formats `lines[line0..line1]`, where `widths` holds the widths of the
/// columns to the left that are shared by the whole range.
fn format_block(
    lines: &[Vec<String>],
    layout: &ColumnLayout,
    widths: &mut Vec<usize>,
    mut line0: usize,
    line1: usize,
    out: &mut Vec<u8>,
) {
    let column = widths.len();
    let mut this = line0;
    while this < line1 {
        if !has_cell(&lines[this], column) {
            this += 1;
            continue;
        }

        // Lines before the block only use the outer columns.
        write_lines(lines, layout, widths, line0, this, out);
        line0 = this;

        let mut width = layout.min_width;
        while this < line1 && has_cell(&lines[this], column) {
            width = width.max(cell_width(&lines[this][column]) + layout.padding);
            this += 1;
        }

        widths.push(width);
        format_block(lines, layout, widths, line0, this, out);
        widths.pop();
        line0 = this;
    }
    write_lines(lines, layout, widths, line0, line1, out);
}

/// True if `line` has a tab-terminated cell at `column`.
fn has_cell(line: &[String], column: usize) -> bool {
    column + 1 < line.len()
}

fn write_lines(
    lines: &[Vec<String>],
    layout: &ColumnLayout,
    widths: &[usize],
    line0: usize,
    line1: usize,
    out: &mut Vec<u8>,
) {
    for (i, line) in lines.iter().enumerate().take(line1).skip(line0) {
        for (j, cell) in line.iter().enumerate() {
            out.extend_from_slice(cell.as_bytes());
            if let Some(&width) = widths.get(j) {
                write_padding(layout, cell_width(cell), width, out);
            }
        }
        if i + 1 < lines.len() {
            out.push(b'\n');
        }
    }
}

fn write_padding(layout: &ColumnLayout, text_width: usize, cell_width: usize, out: &mut Vec<u8>) {
    if layout.pad_char == '\t' {
        let tab_width = layout.tab_width.max(1);
        let cell_width = cell_width.div_ceil(tab_width) * tab_width;
        let tabs = cell_width.saturating_sub(text_width).div_ceil(tab_width);
        out.extend(std::iter::repeat_n(b'\t', tabs));
        return;
    }

    let mut encoded = [0u8; 4];
    let pad = layout.pad_char.encode_utf8(&mut encoded).as_bytes();
    for _ in 0..cell_width.saturating_sub(text_width) {
        out.extend_from_slice(pad);
    }
}

fn cell_width(cell: &str) -> usize {
    UnicodeWidthStr::width(cell)
}
