use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database file to `dest_file`, optionally zipping it.
    ///
    /// Refuses to overwrite an existing destination unless `force` is set.
    /// Returns the path of the file actually written.
    pub fn backup(db_path: &str, dest_file: &str, compress: bool, force: bool) -> AppResult<PathBuf> {
        let src = Path::new(db_path);
        let dest = expand_tilde(dest_file);

        if !src.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Database not found: {}", src.display()),
            )
            .into());
        }

        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let final_path = if compress {
            dest.with_extension("zip")
        } else {
            dest.clone()
        };

        if final_path.exists() && !force {
            return Err(AppError::Other(format!(
                "Backup file '{}' already exists (use --force to overwrite)",
                final_path.display()
            )));
        }

        if compress {
            compress_into(src, &final_path)?;
        } else {
            fs::copy(src, &final_path)?;
        }

        Ok(final_path)
    }
}

/// Write `src` as the single deflated member of a new zip archive.
fn compress_into(src: &Path, zip_path: &Path) -> AppResult<()> {
    let file = fs::File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let member = src
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "database.sqlite".to_string());

    let mut f = fs::File::open(src)?;
    zip.start_file(member, options)
        .map_err(std::io::Error::other)?;

    std::io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(std::io::Error::other)?;

    Ok(())
}
