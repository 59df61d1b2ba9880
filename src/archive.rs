//! Zip and tar handling for price uploads and downloads.
//!
//! Archives are processed fully in memory: [`extract`] returns the text of
//! every regular file, [`pack`] wraps a single payload into a new archive.

use std::io::{Cursor, Read, Write};

use thiserror::Error;
use zip::write::SimpleFileOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
}

impl ArchiveFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
        }
    }

    /// MIME type sent with a download of this format.
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Zip => "application/zip",
            Self::Tar => "application/x-tar",
        }
    }
}

impl TryFrom<&str> for ArchiveFormat {
    type Error = ArchiveError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "zip" => Ok(Self::Zip),
            "tar" => Ok(Self::Tar),
            _ => Err(ArchiveError::UnsupportedFormat(value.to_string())),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    #[error("unsupported archive format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to read archive: {0}")]
    Read(String),
    #[error("failed to write archive: {0}")]
    Write(String),
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Read(err.to_string())
    }
}

/// Text content of one file inside an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub text: String,
}

/// Decompress every regular file of `data`.
///
/// Zip entries come in central directory order, tar entries in stream order.
/// Directories, symlinks and other special tar entries are skipped.
pub fn extract(data: &[u8], format: ArchiveFormat) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    match format {
        ArchiveFormat::Zip => extract_zip(data),
        ArchiveFormat::Tar => extract_tar(data),
    }
}

fn extract_zip(data: &[u8]) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    let mut entries = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        if file.is_dir() {
            continue;
        }

        let name = file.name().to_string();
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| ArchiveError::Read(format!("{name}: {e}")))?;

        entries.push(ArchiveEntry {
            text: into_text(&name, contents)?,
            name,
        });
    }

    Ok(entries)
}

fn extract_tar(data: &[u8]) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let mut archive = tar::Archive::new(Cursor::new(data));
    let mut entries = Vec::new();

    let iter = archive
        .entries()
        .map_err(|e| ArchiveError::Read(e.to_string()))?;

    for entry in iter {
        let mut entry = entry.map_err(|e| ArchiveError::Read(e.to_string()))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let name = entry
            .path()
            .map_err(|e| ArchiveError::Read(e.to_string()))?
            .to_string_lossy()
            .into_owned();
        let mut contents = Vec::new();
        entry
            .read_to_end(&mut contents)
            .map_err(|e| ArchiveError::Read(format!("{name}: {e}")))?;

        entries.push(ArchiveEntry {
            text: into_text(&name, contents)?,
            name,
        });
    }

    Ok(entries)
}

fn into_text(name: &str, contents: Vec<u8>) -> Result<String, ArchiveError> {
    String::from_utf8(contents)
        .map_err(|_| ArchiveError::Read(format!("{name}: content is not valid UTF-8")))
}

/// Wrap `contents` as a single entry called `file_name`.
pub fn pack(
    file_name: &str,
    contents: &[u8],
    format: ArchiveFormat,
) -> Result<Vec<u8>, ArchiveError> {
    match format {
        ArchiveFormat::Zip => pack_zip(file_name, contents),
        ArchiveFormat::Tar => pack_tar(file_name, contents),
    }
}

fn pack_zip(file_name: &str, contents: &[u8]) -> Result<Vec<u8>, ArchiveError> {
    let write_err = |e: zip::result::ZipError| ArchiveError::Write(e.to_string());

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file(file_name, SimpleFileOptions::default())
        .map_err(write_err)?;
    writer
        .write_all(contents)
        .map_err(|e| ArchiveError::Write(e.to_string()))?;

    Ok(writer.finish().map_err(write_err)?.into_inner())
}

fn pack_tar(file_name: &str, contents: &[u8]) -> Result<Vec<u8>, ArchiveError> {
    let write_err = |e: std::io::Error| ArchiveError::Write(e.to_string());

    let mut header = tar::Header::new_gnu();
    header.set_size(contents.len() as u64);
    header.set_mode(0o644);
    header.set_entry_type(tar::EntryType::Regular);

    let mut builder = tar::Builder::new(Vec::new());
    builder
        .append_data(&mut header, file_name, contents)
        .map_err(write_err)?;

    builder.into_inner().map_err(write_err)
}
