//! Packed `0xAARRGGBB` colors as written into the pixel buffer.

pub const BLACK: u32 = 0xFF00_0000;
pub const WHITE: u32 = 0xFFFF_FFFF;
pub const RED: u32 = 0xFFFF_0000;
pub const GREEN: u32 = 0xFF00_FF00;
pub const BLUE: u32 = 0xFF00_00FF;

/// Palette used when the configuration does not supply one.
pub const DEFAULT_PALETTE: [u32; 8] = [
    0xFFE6_194B, // red
    0xFF3C_B44B, // green
    0xFFFF_E119, // yellow
    0xFF43_63D8, // blue
    0xFFF5_8231, // orange
    0xFF91_1EB4, // purple
    0xFF42_D4F4, // cyan
    0xFFF0_32E6, // magenta
];

/// Packs an opaque color.
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Splits a packed color into its red, green and blue channels.
#[inline]
pub const fn channels(color: u32) -> (u8, u8, u8) {
    ((color >> 16) as u8, (color >> 8) as u8, color as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_and_split() {
        assert_eq!(rgb(255, 0, 0), RED);
        assert_eq!(channels(0xFF12_3456), (0x12, 0x34, 0x56));
        assert_eq!(channels(rgb(7, 8, 9)), (7, 8, 9));
    }
}
