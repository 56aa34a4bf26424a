use {
	crate::{RasterImage, ALPHA, ALPHA_OPAQUE, ALPHA_TRANSPARENT},
	png::{BitDepth, ColorType, Compression},
	std::io::Write,
};

/// Grayscale copy of a source image's alpha channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskRaster {
	pub width: u32,
	pub height: u32,
	pub data: Box<[u8]>,
}

/// True iff some pixel is partially transparent. Binary alpha is already carried losslessly by
/// the reserved palette index 0, so it never needs a mask.
pub fn needsMask(image: &RasterImage) -> bool {
	image.pixels().any(|rgba| !matches!(rgba[ALPHA], ALPHA_TRANSPARENT | ALPHA_OPAQUE))
}

/// Doesn't consult `needsMask`; callers decide whether the mask is worth emitting.
pub fn buildMask(image: &RasterImage) -> MaskRaster {
	MaskRaster {
		width: image.width,
		height: image.height,
		data: image.pixels().map(|rgba| rgba[ALPHA]).collect(),
	}
}

impl MaskRaster {
	pub fn writePNG(&self, writer: impl Write) -> Result<(), png::EncodingError> {
		let mut png = png::Encoder::new(writer, self.width, self.height);
		png.set_color(ColorType::Grayscale);
		png.set_depth(BitDepth::Eight);
		png.set_compression(Compression::Best);
		let mut png = png.write_header()?;
		png.write_image_data(&self.data)?;
		png.finish()
	}
}
