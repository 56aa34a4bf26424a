use {
	crate::{Error, FormatError, ALPHA_OPAQUE, RGBA_SIZE},
	png::{BitDepth, ColorType, Transformations},
	std::{
		fs::File,
		io::{BufReader, Read},
		path::Path,
	},
};

/// A decoded source image, normalized to 8-bit RGBA.
///
/// `hasAlphaChannel` reflects what the source format declared (an alpha color type or a tRNS
/// chunk), not whether any pixel actually uses transparency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
	pub width: u32,
	pub height: u32,
	pub hasAlphaChannel: bool,
	data: Box<[u8]>,
}

impl RasterImage {
	pub fn new(width: u32, height: u32, hasAlphaChannel: bool, data: Vec<u8>) -> Result<Self, FormatError> {
		if width == 0 || height == 0 {
			return Err(FormatError::EmptyImage);
		}
		let expected = width as usize * height as usize * RGBA_SIZE;
		if data.len() != expected {
			return Err(FormatError::DataLength { expected, actual: data.len() });
		}
		Ok(Self { width, height, hasAlphaChannel, data: data.into_boxed_slice() })
	}

	pub fn fromPixels(
		width: u32,
		height: u32,
		hasAlphaChannel: bool,
		pixels: &[[u8; RGBA_SIZE]],
	) -> Result<Self, FormatError> {
		Self::new(width, height, hasAlphaChannel, pixels.concat())
	}

	/// Decodes any PNG color type and bit depth. Palettes are expanded, low-bit grayscale is
	/// widened, tRNS becomes a real alpha channel and 16-bit samples are truncated to 8 bits.
	pub fn fromPNG(reader: impl Read) -> Result<Self, FormatError> {
		let mut decoder = png::Decoder::new(reader);
		decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
		let png = &mut decoder.read_info()?;
		let hasAlphaChannel = {
			let pngInfo = png.info();
			matches!(pngInfo.color_type, ColorType::GrayscaleAlpha | ColorType::Rgba) || pngInfo.trns.is_some()
		};
		let mut buffer = vec![0; png.output_buffer_size()];
		let frame = png.next_frame(&mut buffer)?;
		buffer.truncate(frame.buffer_size());
		let (colorType, bitDepth) = png.output_color_type();
		if bitDepth != BitDepth::Eight {
			return Err(FormatError::UnsupportedLayout(colorType, bitDepth));
		}
		let data = match colorType {
			ColorType::Rgba => buffer,
			ColorType::Rgb => widen(&buffer, 3, |rgb| [rgb[0], rgb[1], rgb[2], ALPHA_OPAQUE]),
			ColorType::GrayscaleAlpha => widen(&buffer, 2, |ga| [ga[0], ga[0], ga[0], ga[1]]),
			ColorType::Grayscale => widen(&buffer, 1, |g| [g[0], g[0], g[0], ALPHA_OPAQUE]),
			ColorType::Indexed => return Err(FormatError::UnsupportedLayout(colorType, bitDepth)),
		};

		fn widen(samples: &[u8], channels: usize, toRgba: impl Fn(&[u8]) -> [u8; RGBA_SIZE]) -> Vec<u8> {
			let mut data = Vec::with_capacity(samples.len() / channels * RGBA_SIZE);
			for pixel in samples.chunks_exact(channels) {
				data.extend_from_slice(&toRgba(pixel));
			}
			data
		}

		Self::new(frame.width, frame.height, hasAlphaChannel, data)
	}

	pub fn load(path: &Path) -> Result<Self, Error> {
		let file = File::open(path).map_err(Error::io(path))?;
		let image = Self::fromPNG(BufReader::new(file)).map_err(Error::format(path))?;
		log::info!("{}", if image.hasAlphaChannel { "has alpha channel" } else { "no alpha channel" });
		log::info!("read image {} ({}x{})", path.display(), image.width, image.height);
		Ok(image)
	}

	pub fn pixelCount(&self) -> usize {
		self.width as usize * self.height as usize
	}

	pub fn pixels(&self) -> impl ExactSizeIterator<Item = [u8; RGBA_SIZE]> + '_ {
		self.data.chunks_exact(RGBA_SIZE).map(|slice| {
			let mut rgba = [0; RGBA_SIZE];
			rgba.copy_from_slice(slice);
			rgba
		})
	}
}
