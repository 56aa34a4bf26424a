use std::{io, path::PathBuf};

/// Everything that can abort a conversion run. None of these are retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Opening, creating or renaming a file failed.
	#[error("{path:?}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// The file was readable but its contents can't be used.
	#[error("{path:?}: {source}")]
	Format {
		path: PathBuf,
		#[source]
		source: FormatError,
	},

	/// The PNG encoder failed while producing an output.
	#[error("{path:?}: failed to encode PNG: {source}")]
	Write {
		path: PathBuf,
		#[source]
		source: png::EncodingError,
	},
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
	#[error("failed to decode PNG: {0}")]
	Decode(#[from] png::DecodingError),

	#[error("no PLTE chunk (is it indexed?)")]
	NotIndexed,

	#[error("color table of {len} bytes isn't 1 to 256 RGB entries")]
	PaletteSize { len: usize },

	#[error("image has zero width or height")]
	EmptyImage,

	#[error("expected {expected} bytes of pixel data, got {actual}")]
	DataLength { expected: usize, actual: usize },

	#[error("decoder produced unsupported layout {0:?} {1:?}")]
	UnsupportedLayout(png::ColorType, png::BitDepth),

	#[error("palette has {ncolors} color(s), leaving none besides the reserved transparent index 0")]
	NoOpaqueColors { ncolors: usize },
}

impl Error {
	pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
		move |source| Self::Io { path: path.into(), source }
	}

	pub fn format(path: impl Into<PathBuf>) -> impl FnOnce(FormatError) -> Self {
		move |source| Self::Format { path: path.into(), source }
	}

	pub fn write(path: impl Into<PathBuf>) -> impl FnOnce(png::EncodingError) -> Self {
		move |source| Self::Write { path: path.into(), source }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_name_the_offending_path() {
		let err = Error::format("pal.png")(FormatError::NotIndexed);
		assert_eq!(err.to_string(), "\"pal.png\": no PLTE chunk (is it indexed?)");

		let err = Error::io("missing.png")(io::Error::new(io::ErrorKind::NotFound, "not found"));
		assert!(err.to_string().starts_with("\"missing.png\": "));
	}
}
