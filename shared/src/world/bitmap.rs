use crate::{
    color::Palette,
    constants::{PALETTE_SIZE, TILE_PIXELS, TILE_SIZE},
    world::error::WorldError,
};

/// A 32×32 bitmap of palette indices. Pixel `(x, y)` lives at `y * 32 + x`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    pixels: [u8; TILE_PIXELS],
}

impl Bitmap {
    pub fn new() -> Self {
        Self {
            pixels: [0; TILE_PIXELS],
        }
    }

    pub fn filled(index: u8) -> Self {
        Self {
            pixels: [index; TILE_PIXELS],
        }
    }

    /// Builds a bitmap from exactly 1024 palette indices
    pub fn from_pixels(pixels: &[u8]) -> Result<Self, WorldError> {
        if pixels.len() != TILE_PIXELS {
            return Err(WorldError::InvalidLength {
                what: "Bitmap",
                expected: TILE_PIXELS,
                found: pixels.len(),
            });
        }
        check_indices(pixels, 0)?;

        let mut bitmap = Self::new();
        bitmap.pixels.copy_from_slice(pixels);
        Ok(bitmap)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        pixel_offset(x, y).map(|offset| self.pixels[offset])
    }

    /// Returns `false` if `(x, y)` lies outside the bitmap
    pub fn set(&mut self, x: i32, y: i32, index: u8) -> bool {
        match pixel_offset(x, y) {
            Some(offset) => {
                self.pixels[offset] = index;
                true
            }
            None => false,
        }
    }

    /// Writes a run of indices starting at pixel `offset`
    pub fn write_chunk(&mut self, offset: i32, chunk: &[u8]) -> Result<(), WorldError> {
        let out_of_bounds = || WorldError::ChunkOutOfBounds {
            offset,
            length: chunk.len(),
            limit: TILE_PIXELS,
        };
        let start = usize::try_from(offset).map_err(|_| out_of_bounds())?;
        let end = start
            .checked_add(chunk.len())
            .filter(|&end| end <= TILE_PIXELS)
            .ok_or_else(out_of_bounds)?;
        check_indices(chunk, start)?;

        self.pixels[start..end].copy_from_slice(chunk);
        Ok(())
    }

    /// Splits the bitmap into `(offset, pixels)` runs of at most `size` pixels
    pub fn chunks(&self, size: usize) -> impl Iterator<Item = (i32, &[u8])> {
        let size = size.clamp(1, TILE_PIXELS);
        self.pixels
            .chunks(size)
            .enumerate()
            .map(move |(index, chunk)| ((index * size) as i32, chunk))
    }

    /// Rasterizes a line from `start` to `end` with a round brush of
    /// diameter `thickness`, alpha-blending `color` onto the existing pixels.
    pub fn draw_line(
        &mut self,
        start: (i32, i32),
        end: (i32, i32),
        thickness: u8,
        color: u8,
        palette: &Palette,
    ) {
        let Some(source) = palette.get(color) else {
            return;
        };
        if source.a == 0 {
            return;
        }

        let brush = brush_offsets(thickness);
        for (x, y) in line_points(start, end) {
            for &(dx, dy) in &brush {
                let Some(offset) = pixel_offset(x + dx, y + dy) else {
                    continue;
                };
                if source.a == u8::MAX {
                    self.pixels[offset] = color;
                    continue;
                }
                let below = palette
                    .get(self.pixels[offset])
                    .unwrap_or_default();
                self.pixels[offset] = palette.nearest(&source.blend_over(&below), true);
            }
        }
    }
}

impl Default for Bitmap {
    fn default() -> Self {
        Self::new()
    }
}

fn pixel_offset(x: i32, y: i32) -> Option<usize> {
    let x = usize::try_from(x).ok().filter(|&x| x < TILE_SIZE)?;
    let y = usize::try_from(y).ok().filter(|&y| y < TILE_SIZE)?;
    Some(y * TILE_SIZE + x)
}

fn check_indices(pixels: &[u8], base: usize) -> Result<(), WorldError> {
    match pixels
        .iter()
        .position(|&value| usize::from(value) >= PALETTE_SIZE)
    {
        Some(position) => Err(WorldError::PixelOutOfRange {
            position: base + position,
            value: pixels[position],
            limit: PALETTE_SIZE,
        }),
        None => Ok(()),
    }
}

fn brush_offsets(thickness: u8) -> Vec<(i32, i32)> {
    if thickness <= 1 {
        return vec![(0, 0)];
    }

    let diameter = i32::from(thickness);
    let reach = (diameter + 1) / 2;
    let mut offsets = Vec::new();
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            if 4 * (dx * dx + dy * dy) <= diameter * diameter {
                offsets.push((dx, dy));
            }
        }
    }
    offsets
}

// Bresenham
fn line_points(start: (i32, i32), end: (i32, i32)) -> Vec<(i32, i32)> {
    let (mut x, mut y) = start;
    let dx = (end.0 - x).abs();
    let dy = -(end.1 - y).abs();
    let step_x = if x < end.0 { 1 } else { -1 };
    let step_y = if y < end.1 { 1 } else { -1 };
    let mut error = dx + dy;

    let mut points = Vec::new();
    loop {
        points.push((x, y));
        if (x, y) == end {
            break;
        }
        let doubled = 2 * error;
        if doubled >= dy {
            error += dy;
            x += step_x;
        }
        if doubled <= dx {
            error += dx;
            y += step_y;
        }
    }
    points
}
