#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

//! Converts truecolor sprites into 8-bit indexed PNGs against a fixed palette, with an optional
//! grayscale alpha mask for sources whose transparency isn't binary.

pub mod error;
pub mod image;
pub mod mask;
pub mod output;
pub mod pal;
pub mod pipeline;
pub mod quantize;

pub use {
	error::{Error, FormatError},
	image::RasterImage,
	mask::{buildMask, needsMask, MaskRaster},
	pal::Palette,
	quantize::{quantize, IndexedPngOptions, IndexedRaster},
};

use glam::IVec3;

pub const RGB_SIZE: usize = 3;
pub const RGBA_SIZE: usize = 4;
pub const ALPHA: usize = 3;

pub const MAX_PAL_COLORS: usize = 256;

/// Palette index standing for "fully transparent" whenever the source declares alpha.
pub const FULLY_TRANSPARENT: u8 = 0;

pub const ALPHA_TRANSPARENT: u8 = u8::MIN;
pub const ALPHA_OPAQUE: u8 = u8::MAX;

pub trait DotExt {
	fn lengthSquared(self) -> i32;
}
impl DotExt for IVec3 {
	#[inline(always)]
	fn lengthSquared(self) -> i32 {
		self.dot(self)
	}
}

#[inline(always)]
pub fn rgbToIVec3(rgb: [u8; RGB_SIZE]) -> IVec3 {
	IVec3::from_array(rgb.map(|colorComponent| colorComponent as _))
}
