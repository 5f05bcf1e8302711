//! Point-list and pixel-dump file formats, and the pixel sink seam.
//!
//! A point list is a count line `N` followed by `N` lines of `x y`:
//!
//! ```text
//! 3
//! 0 0
//! 10 0
//! 5 10
//! ```
//!
//! A pixel dump is plain-text PPM (`P3`) with rows written bottom to top.

use crate::color::channels;
use crate::error::{Result, VoronoiError};
use std::io::{BufRead, BufWriter, Write};

/// Destination for finished frames.
pub trait PixelSink {
    /// Receives a complete row-major `width` x `height` buffer after every redraw.
    fn present(&mut self, width: u32, height: u32, pixels: &[u32]) -> Result<()>;
}

/// A [`PixelSink`] writing each frame as a P3 dump.
pub struct PpmSink<W: Write> {
    writer: W,
    frames: usize,
}

impl<W: Write> PpmSink<W> {
    pub fn new(writer: W) -> Self {
        PpmSink { writer, frames: 0 }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PixelSink for PpmSink<W> {
    fn present(&mut self, width: u32, height: u32, pixels: &[u32]) -> Result<()> {
        write_ppm(&mut self.writer, width, height, pixels)?;
        self.frames += 1;
        Ok(())
    }
}

/// Writes a buffer as a P3 dump, bottom row first.
pub fn write_ppm<W: Write>(writer: W, width: u32, height: u32, pixels: &[u32]) -> Result<()> {
    let width = width as usize;
    let height = height as usize;
    if pixels.len() != width * height {
        return Err(VoronoiError::BufferSize { expected: width * height, actual: pixels.len() });
    }

    let mut out = BufWriter::new(writer);
    writeln!(out, "P3")?;
    writeln!(out, "{} {}", width, height)?;
    writeln!(out, "255")?;
    for row in pixels.chunks(width.max(1)).rev() {
        for &pixel in row {
            let (r, g, b) = channels(pixel);
            writeln!(out, "{} {} {}", r, g, b)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Reads a point list, checking every point against the grid and the count
/// against `max_sites`. Nothing is returned unless the whole list is valid.
pub fn read_points<R: BufRead>(reader: R, width: u32, height: u32, max_sites: usize) -> Result<Vec<[i32; 2]>> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| l.as_ref().map_or(true, |s| !s.trim().is_empty()));

    let (line_no, header) = match lines.next() {
        Some((n, l)) => (n, l?),
        None => return Err(VoronoiError::Parse { line: 1, message: "missing point count".into() }),
    };
    let count: usize = header.trim().parse().map_err(|_| VoronoiError::Parse {
        line: line_no,
        message: format!("invalid point count '{}'", header.trim()),
    })?;
    if count > max_sites {
        return Err(VoronoiError::TooManySites { count, max: max_sites });
    }

    let mut points = Vec::with_capacity(count);
    for (line_no, line) in lines {
        let line = line?;
        if points.len() == count {
            return Err(VoronoiError::Parse { line: line_no, message: format!("more than {} points", count) });
        }

        let mut tokens = line.split_whitespace();
        let (Some(xs), Some(ys), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            return Err(VoronoiError::Parse { line: line_no, message: "expected 'x y'".into() });
        };
        let parse = |s: &str| {
            s.parse::<i64>().map_err(|_| VoronoiError::Parse {
                line: line_no,
                message: format!("invalid coordinate '{}'", s),
            })
        };
        let (x, y) = (parse(xs)?, parse(ys)?);
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
            return Err(VoronoiError::OutOfBounds { x, y, width, height });
        }
        points.push([x as i32, y as i32]);
    }

    if points.len() != count {
        return Err(VoronoiError::Parse {
            line: 0,
            message: format!("expected {} points, found {}", count, points.len()),
        });
    }
    Ok(points)
}

/// Writes a point list readable by [`read_points`].
pub fn write_points<W: Write, I: IntoIterator<Item = [i32; 2]>>(writer: W, points: I) -> Result<()> {
    let points: Vec<[i32; 2]> = points.into_iter().collect();
    let mut out = BufWriter::new(writer);
    writeln!(out, "{}", points.len())?;
    for [x, y] in points {
        writeln!(out, "{} {}", x, y)?;
    }
    out.flush()?;
    Ok(())
}
