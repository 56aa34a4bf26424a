use {
	crate::{
		buildMask, needsMask, output::StagedFile, quantize, Error, IndexedPngOptions, Palette, RasterImage,
	},
	std::path::PathBuf,
};

/// One conversion: everything the tool needs to know, as given on the command line.
#[derive(Debug, Clone)]
pub struct Job {
	pub palettePath: PathBuf,
	pub sourcePath: PathBuf,
	pub resultPath: PathBuf,
	pub maskPath: Option<PathBuf>,
	pub indexedPngOptions: IndexedPngOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskOutcome {
	NoAlphaChannel,
	/// Every pixel is either fully transparent or fully opaque.
	BinaryAlpha,
	Written(PathBuf),
	/// A mask was needed but no path was given for it.
	MissingPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
	pub ncolors: usize,
	pub width: u32,
	pub height: u32,
	pub hasAlphaChannel: bool,
	pub mask: MaskOutcome,
}

/// Runs a whole conversion. Outputs are encoded into temp files first and only moved into place
/// once all of them encoded; if the mask can't be moved into place, the result is rolled back, so
/// a failed run never leaves a fresh result behind.
pub fn run(job: &Job) -> Result<Report, Error> {
	let palette = Palette::load(&job.palettePath)?;
	let image = RasterImage::load(&job.sourcePath)?;
	let indexed = quantize(&image, &palette).map_err(Error::format(&job.palettePath))?;
	let stagedResult = StagedFile::create(&job.resultPath, |writer| {
		indexed.writePNG(&palette, job.indexedPngOptions, image.hasAlphaChannel, writer)
	})?;

	let (stagedMask, mask) = if !image.hasAlphaChannel {
		(None, MaskOutcome::NoAlphaChannel)
	} else if !needsMask(&image) {
		(None, MaskOutcome::BinaryAlpha)
	} else if let Some(maskPath) = &job.maskPath {
		let stagedMask = StagedFile::create(maskPath, |writer| buildMask(&image).writePNG(writer))?;
		(Some(stagedMask), MaskOutcome::Written(maskPath.clone()))
	} else {
		(None, MaskOutcome::MissingPath)
	};

	let committedResult = stagedResult.commit()?;
	let committedMask = match stagedMask.map(StagedFile::commit).transpose() {
		Ok(committedMask) => committedMask,
		Err(err) => {
			if let Err(rollbackErr) = committedResult.rollback() {
				log::warn!("couldn't roll back {}: {rollbackErr}", job.resultPath.display());
			}
			return Err(err);
		}
	};

	log::info!("saved result to {}", committedResult.path().display());
	match (&committedMask, &mask) {
		(Some(committedMask), _) => log::info!("saved alpha mask to {}", committedMask.path().display()),
		(None, MaskOutcome::NoAlphaChannel) => log::info!("no alpha mask needed (source has no alpha channel)"),
		(None, MaskOutcome::BinaryAlpha) => log::info!("no alpha mask needed (simple alpha channel)"),
		(None, _) => log::warn!(
			"{} has partial transparency but no result_mask path was given; alpha mask skipped",
			job.sourcePath.display()
		),
	}

	Ok(Report {
		ncolors: palette.len(),
		width: indexed.width,
		height: indexed.height,
		hasAlphaChannel: image.hasAlphaChannel,
		mask,
	})
}
