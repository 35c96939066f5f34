//! Object identifiers and their flat-colour encoding
//!
//! Every pickable object carries an [`ObjectId`] that is written into the pick
//! framebuffer as an opaque RGB colour. Reading one pixel back and running it
//! through [`decode`] recovers the identifier of the surface under the cursor.
//!
//! The mapping packs the 24-bit identifier into the three 8-bit channels with
//! red as the most significant byte, so `decode(encode(id)) == id` for every
//! id in `0..=MAX_ID`.

use std::fmt;

use super::PickingError;

/// Largest identifier that fits into three 8-bit colour channels.
pub const MAX_ID: u32 = 0x00FF_FFFF;

/// Identifier of a pickable scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// Reserved value meaning "no object under the cursor".
    ///
    /// The pick pass clears to black, which decodes to this value, and the
    /// allocator never hands it out.
    pub const NO_SELECTION: ObjectId = ObjectId(0);

    pub fn is_selection(self) -> bool {
        self != Self::NO_SELECTION
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_selection() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("none")
        }
    }
}

/// Flat colour identifying one object in the pick pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IdColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl IdColor {
    /// Colour of pixels not covered by any object.
    pub const BACKGROUND: IdColor = IdColor { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Normalized RGBA as fed to the pick shader. Alpha is always opaque.
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }

    /// Bytes as they appear in an `Rgba8Unorm` framebuffer.
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// Encodes an identifier as a flat colour.
pub fn encode(id: ObjectId) -> Result<IdColor, PickingError> {
    if id.0 > MAX_ID {
        return Err(PickingError::IdOutOfRange { id: id.0 });
    }

    Ok(IdColor {
        r: ((id.0 >> 16) & 0xFF) as u8,
        g: ((id.0 >> 8) & 0xFF) as u8,
        b: (id.0 & 0xFF) as u8,
    })
}

/// Decodes a pixel read back from the pick framebuffer. Alpha is ignored.
pub fn decode(pixel: [u8; 4]) -> ObjectId {
    let [r, g, b, _] = pixel;
    ObjectId((r as u32) << 16 | (g as u32) << 8 | b as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Channel arithmetic that mixes base 255 and base 256.
    fn legacy_base_255(id: u32) -> [u8; 4] {
        let r = id / (255 * 255);
        let g = (id / 255) % 256;
        let b = id % 256;
        [r as u8, g as u8, b as u8, 255]
    }

    #[test]
    fn test_round_trip_full_range() {
        for id in 0..=MAX_ID {
            let color = encode(ObjectId(id)).unwrap();
            assert_eq!(decode(color.to_rgba8()), ObjectId(id));
        }
    }

    #[test]
    fn test_channel_boundaries() {
        assert_eq!(encode(ObjectId(65536)).unwrap(), IdColor::new(1, 0, 0));
        assert_eq!(encode(ObjectId(65792)).unwrap(), IdColor::new(1, 1, 0));
        assert_eq!(encode(ObjectId(65791)).unwrap(), IdColor::new(1, 0, 255));
        assert_eq!(encode(ObjectId(1000)).unwrap(), IdColor::new(0, 3, 232));
        assert_eq!(encode(ObjectId(MAX_ID)).unwrap(), IdColor::new(255, 255, 255));
    }

    #[test]
    fn test_legacy_base_255_breaks_round_trip() {
        // A small scene numbered from 1000 happens to survive...
        for id in 1000..1020 {
            assert_eq!(decode(legacy_base_255(id)), ObjectId(id));
        }
        // ...but the first green carry already disagrees.
        let first_failure = (0..=MAX_ID)
            .find(|&id| decode(legacy_base_255(id)) != ObjectId(id))
            .unwrap();
        assert_eq!(first_failure, 255);

        let pixel = legacy_base_255(65536);
        assert_eq!(pixel, [1, 1, 0, 255]);
        assert_eq!(decode(pixel), ObjectId(65792));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            encode(ObjectId(MAX_ID + 1)),
            Err(PickingError::IdOutOfRange { id }) if id == MAX_ID + 1
        ));
    }

    #[test]
    fn test_background_is_no_selection() {
        assert_eq!(decode(IdColor::BACKGROUND.to_rgba8()), ObjectId::NO_SELECTION);
        assert_eq!(decode([0, 0, 0, 0]), ObjectId::NO_SELECTION);
        assert!(!ObjectId::NO_SELECTION.is_selection());
    }

    #[test]
    fn test_alpha_ignored() {
        assert_eq!(decode([0, 3, 233, 0]), ObjectId(1001));
        assert_eq!(decode([0, 3, 233, 128]), ObjectId(1001));
    }

    #[test]
    fn test_float_color_is_opaque_and_exact() {
        let rgba = IdColor::new(1, 128, 255).to_rgba_f32();
        assert_eq!(rgba[3], 1.0);
        assert_eq!((rgba[0] * 255.0).round() as u8, 1);
        assert_eq!((rgba[1] * 255.0).round() as u8, 128);
        assert_eq!((rgba[2] * 255.0).round() as u8, 255);
    }
}
