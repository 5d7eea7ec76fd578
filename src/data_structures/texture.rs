//! Texture descriptors attached to materials.
//!
//! The viewer never uploads pixels itself; a [`TextureInfo`] only remembers
//! where a texture came from and how large its image is, which is all the
//! texture memory estimate needs.

/// Metadata of a texture referenced by a material slot.
///
/// Only images that could be read get a descriptor; a slot whose image was
/// unreachable or undecodable stays empty. Cloning a material clones these
/// descriptors, mirroring how cloned materials keep sharing their textures.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TextureInfo {
    pub name: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl TextureInfo {
    /// Edge length assumed for a dimension an image reports as zero.
    pub const FALLBACK_EXTENT: u32 = 1024;

    /// Bytes taken by an uncompressed RGBA8 upload of this texture.
    pub const BYTES_PER_TEXEL: u64 = 4;

    pub fn new(name: Option<String>, width: u32, height: u32) -> Self {
        Self {
            name,
            width,
            height,
        }
    }

    /// Estimated GPU memory: `width * height * 4`, where a zero dimension
    /// counts as [`Self::FALLBACK_EXTENT`].
    pub fn estimated_bytes(&self) -> u64 {
        let extent = |v: u32| u64::from(if v > 0 { v } else { Self::FALLBACK_EXTENT });
        extent(self.width) * extent(self.height) * Self::BYTES_PER_TEXEL
    }
}
