use std::io::Write;
use std::path::{Path, PathBuf};

use common::errors::*;
use tempfile::NamedTempFile;

/// File which only appears at its final path once it was completely written.
///
/// Data is written to a temporary file in the same directory which is renamed
/// over the final path by commit(). If the writer is dropped before that, the
/// temporary file is deleted.
pub struct AtomicFileWriter {
    path: PathBuf,
    file: NamedTempFile,
}

impl AtomicFileWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file_name = path
            .file_name()
            .ok_or_else(|| format_err!("Output path has no file name: {}", path.display()))?
            .to_string_lossy()
            .to_string();

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let file = tempfile::Builder::new()
            .prefix(&format!(".{}.tmp.", file_name))
            .tempfile_in(&dir)
            .map_err(|e| format_err!("Failed to create temporary file in {}: {}", dir.display(), e))?;

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn temp_path(&self) -> &Path {
        self.file.path()
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.file.write_all(data)?;
        Ok(())
    }

    /// Moves the written data to the final path.
    pub fn commit(self) -> Result<()> {
        let Self { path, mut file } = self;

        file.flush()?;
        file.as_file().sync_all()?;
        file.persist(&path)
            .map_err(|e| format_err!("Failed to rename into {}: {}", path.display(), e.error))?;
        Ok(())
    }
}

/// Writes a set of files such that either all of them are replaced or none
/// are.
///
/// All contents are first written to temporary files. Only then are they
/// renamed into place in order. If a rename fails, the files that were
/// already renamed are removed again.
pub fn write_files_atomically(files: &[(&Path, &str)]) -> Result<()> {
    let mut writers = vec![];
    for (path, contents) in files {
        let mut writer = AtomicFileWriter::create(path)?;
        writer.write_all(contents.as_bytes())?;
        writers.push(writer);
    }

    let mut committed: Vec<PathBuf> = vec![];
    for writer in writers {
        let path = writer.path().to_path_buf();
        if let Err(e) = writer.commit() {
            for p in committed {
                if let Err(remove_err) = std::fs::remove_file(&p) {
                    warn!("Failed to remove {}: {}", p.display(), remove_err);
                }
            }

            return Err(e);
        }

        committed.push(path);
    }

    Ok(())
}
