use {
	crate::{rgbToIVec3, DotExt, FormatError, Palette, RasterImage, ALPHA, ALPHA_TRANSPARENT, FULLY_TRANSPARENT},
	glam::IVec3,
	png::{BitDepth, ColorType, Compression},
	std::io::Write,
};

/// One palette index per source pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRaster {
	pub width: u32,
	pub height: u32,
	pub data: Box<[u8]>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IndexedPngOptions {
	/// Emit a tRNS chunk marking index 0 transparent. Only honored when the source declared alpha,
	/// since index 0 is an ordinary color otherwise.
	pub transparentIndex0: bool,
}

/// Maps every pixel to its nearest palette entry by squared RGB distance.
///
/// When the image declares an alpha channel, fully transparent pixels take index 0 and every
/// other pixel is matched against indices 1 and up only. Ties go to the lowest index.
pub fn quantize(image: &RasterImage, palette: &Palette) -> Result<IndexedRaster, FormatError> {
	let firstOpaqueI = usize::from(image.hasAlphaChannel);
	if palette.len() <= firstOpaqueI {
		return Err(FormatError::NoOpaqueColors { ncolors: palette.len() });
	}
	let palColors: Vec<IVec3> = palette.colors().collect();
	let mut data = Vec::with_capacity(image.pixelCount());
	for rgba in image.pixels() {
		data.push(if image.hasAlphaChannel && rgba[ALPHA] == ALPHA_TRANSPARENT {
			FULLY_TRANSPARENT
		} else {
			nearestPALEntry(rgbToIVec3([rgba[0], rgba[1], rgba[2]]), &palColors, firstOpaqueI)
		});
	}
	Ok(IndexedRaster {
		width: image.width,
		height: image.height,
		data: data.into_boxed_slice(),
	})
}

/// `palColors` has at most 256 entries, so the winning index always fits in a `u8`.
fn nearestPALEntry(color: IVec3, palColors: &[IVec3], firstI: usize) -> u8 {
	let (mut nearestSquaredDist, mut nearestI) = (i32::MAX, firstI);
	for (i, &palColor) in palColors.iter().enumerate().skip(firstI) {
		let squaredDist = (color - palColor).lengthSquared();
		if squaredDist < nearestSquaredDist {
			(nearestSquaredDist, nearestI) = (squaredDist, i);
		}
	}
	nearestI as _
}

impl IndexedRaster {
	/// `sourceHasAlpha` is the `hasAlphaChannel` of the image this raster was quantized from.
	pub fn writePNG(
		&self,
		palette: &Palette,
		options: IndexedPngOptions,
		sourceHasAlpha: bool,
		writer: impl Write,
	) -> Result<(), png::EncodingError> {
		let mut png = png::Encoder::new(writer, self.width, self.height);
		png.set_color(ColorType::Indexed);
		png.set_depth(BitDepth::Eight);
		png.set_compression(Compression::Best);
		png.set_palette(palette.asBytes());
		if options.transparentIndex0 && sourceHasAlpha {
			png.set_trns(&[ALPHA_TRANSPARENT][..]);
		}
		let mut png = png.write_header()?;
		png.write_image_data(&self.data)?;
		png.finish()
	}
}
