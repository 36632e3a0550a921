//! Texture roles, pixel buffers and channel transforms
//!
//! Everything in here is pure: no file access, no logging beyond the
//! classification fallback warning.

mod pixel;
mod role;
mod transform;

pub use pixel::PixelBuffer;
pub use role::{classify, ConversionMode, TextureRole};
pub use transform::{
    diffuse_standard, diffuse_tarkin, gloss_to_roughness, normal_standard, normal_tarkin,
    split_specglos, transform_for_role, OutputKind, TransformOutput,
};
