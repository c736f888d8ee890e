//! # Pick Encoding
//!
//! Layout of the 32-bit value the object pass writes into the identity buffer:
//!
//! ```text
//!  31                               3 2   0
//! +----------------------------------+-----+
//! |        cell linear index         |face |
//! +----------------------------------+-----+
//! ```
//!
//! The value is stored in a signed integer attachment. Decoding works on the raw
//! bit pattern, so the cleared value `-1` decodes to the largest index, which is
//! never a valid cell.

/// Number of low bits holding the face id.
pub const FACE_BITS: u32 = 3;

/// Mask selecting the face id bits.
pub const FACE_MASK: u32 = (1 << FACE_BITS) - 1;

/// Largest index a pick value can carry.
pub const MAX_PICK_INDEX: u32 = u32::MAX >> FACE_BITS;

/// Value the identity attachment is cleared to before every frame.
pub const CLEARED_PICK_VALUE: i32 = -1;

/// The two fields packed into a pick value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DecodedPick {
    /// Cell index, or a value past the grid for background and UI.
    pub index: u32,
    /// Raw face bits. Only `0..=5` name a real face.
    pub face_id: u8,
}

/// Packs a cell index and face id the same way the object shader does.
///
/// `index` must not exceed [`MAX_PICK_INDEX`] and `face_id` must fit in
/// [`FACE_BITS`]; higher bits are discarded.
pub fn encode(index: u32, face_id: u8) -> i32 {
    debug_assert!(index <= MAX_PICK_INDEX);
    debug_assert!((face_id as u32) <= FACE_MASK);
    ((index << FACE_BITS) | (face_id as u32 & FACE_MASK)) as i32
}

/// Splits a pick value read back from the identity buffer.
pub fn decode(value: i32) -> DecodedPick {
    let bits = value as u32;
    DecodedPick {
        index: bits >> FACE_BITS,
        face_id: (bits & FACE_MASK) as u8,
    }
}
