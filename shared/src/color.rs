use crate::constants::{FAST_MATCH_THRESHOLD, PALETTE_SIZE};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color32 {
    pub const TRANSPARENT: Color32 = Color32::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Summed absolute difference of the color channels. Alpha is ignored.
    pub fn distance(&self, other: &Color32) -> u32 {
        u32::from(self.r.abs_diff(other.r))
            + u32::from(self.g.abs_diff(other.g))
            + u32::from(self.b.abs_diff(other.b))
    }

    /// Composites `self` over `below` using `self`'s alpha
    pub fn blend_over(&self, below: &Color32) -> Color32 {
        let alpha = u32::from(self.a);
        let inverse = 255 - alpha;
        let mix = |top: u8, bottom: u8| -> u8 {
            ((u32::from(top) * alpha + u32::from(bottom) * inverse + 127) / 255) as u8
        };

        Color32 {
            r: mix(self.r, below.r),
            g: mix(self.g, below.g),
            b: mix(self.b, below.b),
            a: (alpha + (u32::from(below.a) * inverse + 127) / 255) as u8,
        }
    }
}

/// The fixed, ordered set of colors every stored pixel indexes into.
/// Index 0 doubles as "transparent / none".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: [Color32; PALETTE_SIZE],
}

impl Palette {
    pub fn new(colors: [Color32; PALETTE_SIZE]) -> Self {
        Self { colors }
    }

    pub fn colors(&self) -> &[Color32; PALETTE_SIZE] {
        &self.colors
    }

    pub fn get(&self, index: u8) -> Option<Color32> {
        self.colors.get(usize::from(index)).copied()
    }

    /// Returns `true` if the entry changed
    pub fn set(&mut self, index: u8, color: Color32) -> Option<bool> {
        let slot = self.colors.get_mut(usize::from(index))?;
        let changed = *slot != color;
        *slot = color;
        Some(changed)
    }

    fn candidates(&self, clear_zero: bool) -> impl Iterator<Item = (u8, &Color32)> {
        let skip = usize::from(clear_zero);
        (0u8..).zip(self.colors.iter()).skip(skip)
    }

    /// Exact match: the closest entry, lowest index winning ties.
    ///
    /// With `clear_zero`, a fully transparent color maps to index 0 and every
    /// other color is matched against entries 1.. only.
    pub fn nearest(&self, color: &Color32, clear_zero: bool) -> u8 {
        if clear_zero && color.a == 0 {
            return 0;
        }

        let mut best_index = 0;
        let mut best_distance = u32::MAX;
        for (index, candidate) in self.candidates(clear_zero) {
            let distance = color.distance(candidate);
            if distance < best_distance {
                best_index = index;
                best_distance = distance;
            }
        }
        best_index
    }

    /// Fast match: the first entry within [`FAST_MATCH_THRESHOLD`], else 0
    pub fn nearest_fast(&self, color: &Color32, clear_zero: bool) -> u8 {
        if clear_zero && color.a == 0 {
            return 0;
        }

        self.candidates(clear_zero)
            .find(|(_, candidate)| color.distance(candidate) <= FAST_MATCH_THRESHOLD)
            .map(|(index, _)| index)
            .unwrap_or(0)
    }
}

impl Default for Palette {
    /// Transparent followed by fifteen opaque colors
    fn default() -> Self {
        Self::new([
            Color32::TRANSPARENT,
            Color32::opaque(0, 0, 0),
            Color32::opaque(29, 43, 83),
            Color32::opaque(126, 37, 83),
            Color32::opaque(0, 135, 81),
            Color32::opaque(171, 82, 54),
            Color32::opaque(95, 87, 79),
            Color32::opaque(194, 195, 199),
            Color32::opaque(255, 241, 232),
            Color32::opaque(255, 0, 77),
            Color32::opaque(255, 163, 0),
            Color32::opaque(255, 236, 39),
            Color32::opaque(0, 228, 54),
            Color32::opaque(41, 173, 255),
            Color32::opaque(131, 118, 156),
            Color32::opaque(255, 119, 168),
        ])
    }
}
