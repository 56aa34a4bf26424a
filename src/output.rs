use {
	crate::Error,
	std::{
		fs,
		io::{BufWriter, Write},
		path::{Path, PathBuf},
	},
	tempfile::{NamedTempFile, TempPath},
};

/// A fully encoded output waiting in a temp file beside its destination. Nothing appears at the
/// destination until `commit`; dropping it uncommitted removes the temp file.
#[must_use]
pub struct StagedFile {
	dest: PathBuf,
	tempFile: NamedTempFile,
}

/// An output already moved into place. Until it is dropped, `rollback` can put back whatever
/// the destination held before.
#[must_use]
pub struct CommittedFile {
	dest: PathBuf,
	previous: Option<TempPath>,
}

fn dirOf(dest: &Path) -> &Path {
	match dest.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	}
}

impl StagedFile {
	pub fn create<E>(dest: &Path, encode: E) -> Result<Self, Error>
	where
		E: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> Result<(), png::EncodingError>,
	{
		let mut tempFile = NamedTempFile::new_in(dirOf(dest)).map_err(Error::io(dest))?;
		{
			let writer = &mut BufWriter::new(&mut tempFile);
			encode(writer).map_err(Error::write(dest))?;
			writer.flush().map_err(Error::io(dest))?;
		}
		Ok(Self { dest: dest.to_owned(), tempFile })
	}

	/// Replaces whatever file is at the destination, keeping the old one aside until the
	/// returned `CommittedFile` is dropped. On failure the destination is left as it was.
	pub fn commit(self) -> Result<CommittedFile, Error> {
		let Self { dest, tempFile } = self;
		let previous = if dest.is_file() {
			let previous = NamedTempFile::new_in(dirOf(&dest)).map_err(Error::io(&dest))?.into_temp_path();
			fs::rename(&dest, &previous).map_err(Error::io(&dest))?;
			Some(previous)
		} else {
			None
		};
		if let Err(err) = tempFile.persist(&dest) {
			if let Some(previous) = previous {
				if let Err(restoreErr) = previous.persist(&dest) {
					log::warn!("couldn't restore {}: {}", dest.display(), restoreErr.error);
				}
			}
			return Err(Error::Io { path: dest, source: err.error });
		}
		Ok(CommittedFile { dest, previous })
	}
}

impl CommittedFile {
	pub fn path(&self) -> &Path {
		&self.dest
	}

	/// Puts back the destination's previous contents, or removes it if there were none.
	pub fn rollback(self) -> Result<(), Error> {
		let Self { dest, previous } = self;
		match previous {
			Some(previous) => {
				previous.persist(&dest).map_err(|err| Error::Io { path: dest.clone(), source: err.error })
			}
			None => fs::remove_file(&dest).map_err(Error::io(&dest)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn nothing_lands_until_commit() {
		let dir = tempfile::tempdir().unwrap();
		let dest = dir.path().join("out.bin");
		let staged = StagedFile::create(&dest, |w| Ok(w.write_all(b"payload")?)).unwrap();
		assert!(!dest.exists());
		assert_eq!(staged.commit().unwrap().path(), dest);
		assert_eq!(fs::read(&dest).unwrap(), b"payload");
	}

	#[test]
	fn commit_overwrites_existing_file() {
		let dir = tempfile::tempdir().unwrap();
		let dest = dir.path().join("out.bin");
		fs::write(&dest, b"old").unwrap();
		let committed = StagedFile::create(&dest, |w| Ok(w.write_all(b"new")?)).unwrap().commit().unwrap();
		assert_eq!(fs::read(&dest).unwrap(), b"new");
		drop(committed);
		// the set-aside copy of the old file goes away with the commit handle
		assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
	}

	#[test]
	fn rollback_restores_previous_contents() {
		let dir = tempfile::tempdir().unwrap();
		let dest = dir.path().join("out.bin");
		fs::write(&dest, b"old").unwrap();
		let committed = StagedFile::create(&dest, |w| Ok(w.write_all(b"new")?)).unwrap().commit().unwrap();
		committed.rollback().unwrap();
		assert_eq!(fs::read(&dest).unwrap(), b"old");
		assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
	}

	#[test]
	fn rollback_removes_fresh_file() {
		let dir = tempfile::tempdir().unwrap();
		let dest = dir.path().join("out.bin");
		let committed = StagedFile::create(&dest, |w| Ok(w.write_all(b"new")?)).unwrap().commit().unwrap();
		committed.rollback().unwrap();
		assert!(!dest.exists());
		assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
	}

	#[cfg(unix)]
	#[test]
	fn commit_onto_directory_fails_cleanly() {
		let dir = tempfile::tempdir().unwrap();
		let dest = dir.path().join("taken");
		fs::create_dir(&dest).unwrap();
		fs::write(dest.join("inside"), b"x").unwrap();
		let staged = StagedFile::create(&dest, |w| Ok(w.write_all(b"new")?)).unwrap();
		assert!(matches!(staged.commit(), Err(Error::Io { .. })));
		assert!(dest.join("inside").is_file());
		assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
	}

	#[test]
	fn failed_encode_leaves_no_trace() {
		let dir = tempfile::tempdir().unwrap();
		let dest = dir.path().join("out.bin");
		let result = StagedFile::create(&dest, |_| Err(png::EncodingError::LimitsExceeded));
		assert!(matches!(result, Err(Error::Write { .. })));
		assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
	}

	#[test]
	fn dropped_stage_is_cleaned_up() {
		let dir = tempfile::tempdir().unwrap();
		let staged = StagedFile::create(&dir.path().join("out.bin"), |w| Ok(w.write_all(b"x")?)).unwrap();
		drop(staged);
		assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
	}
}
