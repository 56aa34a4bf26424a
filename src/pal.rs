use {
	crate::{rgbToIVec3, Error, FormatError, MAX_PAL_COLORS, RGB_SIZE},
	glam::IVec3,
	std::{
		fs::File,
		io::{BufReader, Read},
		path::Path,
	},
};

/// The fixed target color table, taken verbatim from an indexed PNG's PLTE chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
	pngPAL: Box<[u8]>,
}

impl Palette {
	pub fn fromRgbBytes(pngPAL: &[u8]) -> Result<Self, FormatError> {
		let len = pngPAL.len();
		if len == 0 || len % RGB_SIZE != 0 || len / RGB_SIZE > MAX_PAL_COLORS {
			return Err(FormatError::PaletteSize { len });
		}
		Ok(Self { pngPAL: pngPAL.into() })
	}

	/// Only the header chunks are read; pixel data of the palette image is never decoded.
	pub fn fromPNG(reader: impl Read) -> Result<Self, FormatError> {
		let png = png::Decoder::new(reader).read_info()?;
		let pngPAL = png.info().palette.as_ref().ok_or(FormatError::NotIndexed)?;
		Self::fromRgbBytes(pngPAL)
	}

	pub fn load(path: &Path) -> Result<Self, Error> {
		let file = File::open(path).map_err(Error::io(path))?;
		let palette = Self::fromPNG(BufReader::new(file)).map_err(Error::format(path))?;
		log::info!("read PLTE chunk with {} colors from {}", palette.len(), path.display());
		Ok(palette)
	}

	#[allow(clippy::len_without_is_empty)]
	pub fn len(&self) -> usize {
		self.pngPAL.len() / RGB_SIZE
	}

	pub fn asBytes(&self) -> &[u8] {
		&self.pngPAL
	}

	pub fn color(&self, i: usize) -> [u8; RGB_SIZE] {
		let mut rgb = [0; RGB_SIZE];
		rgb.copy_from_slice(&self.pngPAL[i * RGB_SIZE..][..RGB_SIZE]);
		rgb
	}

	pub fn colors(&self) -> impl Iterator<Item = IVec3> + '_ {
		(0..self.len()).map(|i| rgbToIVec3(self.color(i)))
	}
}

#[cfg(test)]
mod tests {
	use {super::*, png::ColorType, std::io::Cursor};

	fn encodeIndexedPNG(pngPAL: &[u8]) -> Vec<u8> {
		let mut bytes = Vec::new();
		{
			let mut png = png::Encoder::new(&mut bytes, 1, 1);
			png.set_color(ColorType::Indexed);
			png.set_palette(pngPAL);
			png.write_header().unwrap().write_image_data(&[0]).unwrap();
		}
		bytes
	}

	#[test]
	fn reads_plte_verbatim() {
		let pngPAL = [0, 0, 0, 255, 0, 0, 0, 255, 0, 255, 255, 255];
		let palette = Palette::fromPNG(Cursor::new(encodeIndexedPNG(&pngPAL))).unwrap();
		assert_eq!(palette.len(), 4);
		assert_eq!(palette.asBytes(), &pngPAL[..]);
		assert_eq!(palette.color(1), [255, 0, 0]);
		assert_eq!(palette.colors().last(), Some(IVec3::new(255, 255, 255)));
	}

	#[test]
	fn rejects_truecolor_png() {
		let mut bytes = Vec::new();
		{
			let mut png = png::Encoder::new(&mut bytes, 1, 1);
			png.set_color(ColorType::Rgb);
			png.write_header().unwrap().write_image_data(&[1, 2, 3]).unwrap();
		}
		assert!(matches!(Palette::fromPNG(Cursor::new(bytes)), Err(FormatError::NotIndexed)));
	}

	#[test]
	fn rejects_truncated_stream() {
		let bytes = encodeIndexedPNG(&[0, 0, 0]);
		assert!(matches!(Palette::fromPNG(Cursor::new(&bytes[..20])), Err(FormatError::Decode(_))));
	}

	#[test]
	fn rejects_bad_table_sizes() {
		assert!(matches!(Palette::fromRgbBytes(&[]), Err(FormatError::PaletteSize { len: 0 })));
		assert!(matches!(Palette::fromRgbBytes(&[1, 2]), Err(FormatError::PaletteSize { len: 2 })));
		assert!(Palette::fromRgbBytes(&[7; 257 * RGB_SIZE]).is_err());
		assert_eq!(Palette::fromRgbBytes(&[7; 256 * RGB_SIZE]).unwrap().len(), 256);
	}
}
