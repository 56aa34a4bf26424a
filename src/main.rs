#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	clap::Parser,
	const_format::concatcp,
	sprite_indexer::{
		pipeline::{self, Job},
		IndexedPngOptions, MAX_PAL_COLORS,
	},
	std::{path::PathBuf, process::ExitCode},
};

const AFTER_HELP: &str = concatcp!(
	"The palette image must carry a PLTE chunk of 1 to ",
	MAX_PAL_COLORS,
	" colors.\n",
	"The result_mask parameter can be omitted to skip producing an alpha mask.\n",
	"Note that result and result_mask will be overwritten if the paths already exist."
);

/// Converts an RGBA PNG to an indexed PNG using a given palette, and creates an alpha mask if
/// needed.
#[derive(Parser, Debug)]
#[clap(version, after_help = AFTER_HELP)]
struct Args {
	/// An indexed PNG with the target palette
	palette: PathBuf,

	/// The RGBA PNG to apply the palette to and generate the mask from
	source: PathBuf,

	/// Path to which to save the resulting image as an indexed PNG
	result: PathBuf,

	/// Path to which to save the resulting alpha mask as a grayscale PNG
	#[clap(value_name = "RESULT_MASK")]
	resultMask: Option<PathBuf>,

	/// Add a tRNS chunk marking palette index 0 transparent (alpha sources only)
	#[clap(long)]
	transparentIndex0: bool,
}

fn main() -> ExitCode {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let Args { palette, source, result, resultMask, transparentIndex0 } = match Args::try_parse() {
		Ok(args) => args,
		Err(err) => {
			_ = err.print();
			return if err.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
		}
	};
	let job = Job {
		palettePath: palette,
		sourcePath: source,
		resultPath: result,
		maskPath: resultMask,
		indexedPngOptions: IndexedPngOptions { transparentIndex0 },
	};
	match pipeline::run(&job) {
		Ok(_) => ExitCode::SUCCESS,
		Err(err) => {
			eprintln!("error: {err}");
			ExitCode::FAILURE
		}
	}
}
