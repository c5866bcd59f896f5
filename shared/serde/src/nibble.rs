use crate::error::NibbleError;

/// Largest value a nibble can hold
pub const NIBBLE_MAX: u8 = 0x0F;

/// Packs pairs of values below 16 into single bytes, high nibble first
pub fn crunch(values: &[u8]) -> Result<Vec<u8>, NibbleError> {
    if values.len() % 2 != 0 {
        return Err(NibbleError::OddLength {
            length: values.len(),
        });
    }

    if let Some((position, &value)) = values
        .iter()
        .enumerate()
        .find(|(_, &value)| value > NIBBLE_MAX)
    {
        return Err(NibbleError::ValueTooLarge { position, value });
    }

    Ok(values
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

/// Expands every byte into its high and low nibble
pub fn uncrunch(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .flat_map(|&byte| [byte >> 4, byte & NIBBLE_MAX])
        .collect()
}
