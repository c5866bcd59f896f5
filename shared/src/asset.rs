use std::{fs, io, path::Path};

use log::warn;
use thiserror::Error;

use crate::{
    color::{Color32, Palette},
    constants::{TILE_PIXELS, TILE_SIZE},
    world::Bitmap,
};

/// File magic of a stored avatar bitmap
pub const AVATAR_MAGIC: [u8; 4] = *b"TSAV";
const AVATAR_FILE_LENGTH: usize = AVATAR_MAGIC.len() + TILE_PIXELS * 4;

/// Errors that can occur while loading or saving the avatar asset
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// The file could not be read or written
    #[error("I/O error on avatar asset '{path}': {kind:?}")]
    Io {
        path: String,
        kind: io::ErrorKind,
    },

    /// The file does not start with the avatar magic
    #[error("Avatar asset has magic {found:?}, expected {expected:?}")]
    BadMagic {
        found: Vec<u8>,
        expected: [u8; 4],
    },

    /// The file is truncated or has trailing data
    #[error("Avatar asset is {found} bytes long, expected {expected}")]
    WrongLength {
        expected: usize,
        found: usize,
    },
}

/// The local player's 32×32 RGBA avatar picture
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvatarAsset {
    pixels: Vec<Color32>,
}

impl AvatarAsset {
    pub fn from_pixels(pixels: Vec<Color32>) -> Result<Self, AssetError> {
        if pixels.len() != TILE_PIXELS {
            return Err(AssetError::WrongLength {
                expected: TILE_PIXELS,
                found: pixels.len(),
            });
        }
        Ok(Self { pixels })
    }

    pub fn pixels(&self) -> &[Color32] {
        &self.pixels
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        if !bytes.starts_with(&AVATAR_MAGIC) {
            return Err(AssetError::BadMagic {
                found: bytes.iter().take(AVATAR_MAGIC.len()).copied().collect(),
                expected: AVATAR_MAGIC,
            });
        }
        if bytes.len() != AVATAR_FILE_LENGTH {
            return Err(AssetError::WrongLength {
                expected: AVATAR_FILE_LENGTH,
                found: bytes.len(),
            });
        }

        let pixels = bytes[AVATAR_MAGIC.len()..]
            .chunks_exact(4)
            .map(|rgba| Color32::new(rgba[0], rgba[1], rgba[2], rgba[3]))
            .collect();
        Ok(Self { pixels })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(AVATAR_FILE_LENGTH);
        bytes.extend_from_slice(&AVATAR_MAGIC);
        for color in &self.pixels {
            bytes.extend_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        bytes
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|error| io_error(path, &error))?;
        Self::from_bytes(&bytes)
    }

    /// Loads the asset, falling back to the built-in avatar when it is missing or corrupt
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(asset) => asset,
            Err(error) => {
                warn!(
                    "Could not load avatar from {}: {}. Using the default avatar",
                    path.display(),
                    error
                );
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let path = path.as_ref();
        fs::write(path, self.to_bytes()).map_err(|error| io_error(path, &error))
    }

    /// Quantizes to palette indices; transparent pixels become index 0
    pub fn to_appearance(&self, palette: &Palette) -> Bitmap {
        let mut bitmap = Bitmap::new();
        for (offset, color) in self.pixels.iter().enumerate() {
            let x = (offset % TILE_SIZE) as i32;
            let y = (offset / TILE_SIZE) as i32;
            bitmap.set(x, y, palette.nearest(color, true));
        }
        bitmap
    }
}

impl Default for AvatarAsset {
    /// A round figure with two eyes on a transparent background
    fn default() -> Self {
        let body = Color32::opaque(255, 241, 232);
        let outline = Color32::opaque(0, 0, 0);
        let center = (TILE_SIZE as i32 - 1) as f32 / 2.0;

        let pixels = (0..TILE_PIXELS)
            .map(|offset| {
                let x = (offset % TILE_SIZE) as f32;
                let y = (offset / TILE_SIZE) as f32;
                let distance = ((x - center).powi(2) + (y - center).powi(2)).sqrt();
                let is_eye = (y - 18.0).abs() < 1.5
                    && ((x - 11.0).abs() < 1.5 || (x - 20.0).abs() < 1.5);
                if distance > 13.5 {
                    Color32::TRANSPARENT
                } else if distance > 12.0 || is_eye {
                    outline
                } else {
                    body
                }
            })
            .collect();

        Self { pixels }
    }
}

fn io_error(path: &Path, error: &io::Error) -> AssetError {
    AssetError::Io {
        path: path.display().to_string(),
        kind: error.kind(),
    }
}
