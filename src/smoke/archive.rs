//! Fetching the example projects.
//!
//! The examples come from a zip snapshot of the repository. The snapshot is
//! streamed to disk, then only files under the examples prefix are
//! extracted.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use reqwest::blocking::Client;

use crate::error::{PlatkitError, Result};

/// Name of the downloaded snapshot inside the workspace.
pub const ARCHIVE_FILE: &str = "repo.zip";

/// Stream the archive at `url` into `<dir>/repo.zip`.
///
/// A failure on either side of the copy aborts, and the partial file is
/// removed.
pub fn download_archive(client: &Client, url: &str, dir: &Path) -> Result<PathBuf> {
    tracing::info!("Downloading {}", url);
    let mut response = client.get(url).send()?.error_for_status()?;

    let path = dir.join(ARCHIVE_FILE);
    let written = File::create(&path)
        .map_err(PlatkitError::from)
        .and_then(|mut file| {
            let written = response.copy_to(&mut file)?;
            file.flush()?;
            Ok(written)
        });

    match written {
        Ok(bytes) => {
            tracing::debug!("Wrote {} bytes to {}", bytes, path.display());
            Ok(path)
        }
        Err(e) => {
            let _ = fs::remove_file(&path);
            Err(e)
        }
    }
}

/// The entry name without its top-level wrapper directory.
///
/// Returns `None` for entries at the top level and for the wrapper itself.
pub fn strip_wrapper(name: &str) -> Option<&str> {
    let (_, rest) = name.split_once('/')?;
    (!rest.is_empty()).then_some(rest)
}

/// `relative` as a path, if it stays below the directory it is joined to.
fn contained(relative: &str) -> Option<PathBuf> {
    let path = Path::new(relative);
    path.components()
        .all(|c| matches!(c, Component::Normal(_)))
        .then(|| path.to_path_buf())
}

/// Extract files under `prefix` from the archive at `zip_path` into `dest`,
/// then delete the archive.
///
/// Paths are taken relative to the archive's wrapper directory, so
/// `platkit-main/example-apps/create/index.js` lands at
/// `<dest>/example-apps/create/index.js`. Directory entries and entries
/// outside the prefix are skipped; a prefixed entry that would land outside
/// `dest` aborts the extraction.
/// Returns the extracted files in archive order.
pub fn extract_examples(zip_path: &Path, dest: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let mut archive = zip::ZipArchive::new(File::open(zip_path)?)?;
    let prefix = Path::new(prefix);
    let mut extracted = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        let Some(relative) = strip_wrapper(&name) else {
            continue;
        };
        if !Path::new(relative).starts_with(prefix) {
            continue;
        }
        let relative = contained(relative).ok_or_else(|| PlatkitError::UnsafeArchivePath {
            entry: name.clone(),
        })?;

        let target = dest.join(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode(mode & 0o777))?;
        }

        extracted.push(target);
    }

    drop(archive);
    fs::remove_file(zip_path)?;

    tracing::info!("Extracted {} example files", extracted.len());
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::io::Cursor;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, Option<&str>)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, content) in entries {
            match content {
                Some(content) => {
                    writer.start_file(*name, options).unwrap();
                    writer.write_all(content.as_bytes()).unwrap();
                }
                None => writer.add_directory(*name, options).unwrap(),
            }
        }
        writer.finish().unwrap().into_inner()
    }

    fn write_zip(dir: &Path, entries: &[(&str, Option<&str>)]) -> PathBuf {
        let path = dir.join(ARCHIVE_FILE);
        fs::write(&path, build_zip(entries)).unwrap();
        path
    }

    #[test]
    fn strip_wrapper_drops_first_segment() {
        assert_eq!(strip_wrapper("repo-main/example-apps/a.js"), Some("example-apps/a.js"));
        assert_eq!(strip_wrapper("repo-main/"), None);
        assert_eq!(strip_wrapper("README.md"), None);
    }

    #[test]
    fn extracts_only_prefixed_files() {
        let temp = TempDir::new().unwrap();
        let zip = write_zip(
            temp.path(),
            &[
                ("repo-main/", None),
                ("repo-main/README.md", Some("readme")),
                ("repo-main/example-apps/", None),
                ("repo-main/example-apps/create/", None),
                ("repo-main/example-apps/create/package.json", Some("{}")),
                ("repo-main/example-apps/trigger/index.js", Some("module.exports = {};")),
                ("repo-main/packages/core/index.js", Some("core")),
            ],
        );

        let files = extract_examples(&zip, temp.path(), "example-apps").unwrap();

        assert_eq!(
            files,
            vec![
                temp.path().join("example-apps/create/package.json"),
                temp.path().join("example-apps/trigger/index.js"),
            ]
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("example-apps/trigger/index.js")).unwrap(),
            "module.exports = {};"
        );
        assert!(!temp.path().join("README.md").exists());
        assert!(!temp.path().join("packages").exists());
        assert!(!zip.exists());
    }

    #[test]
    fn prefix_matches_whole_components() {
        let temp = TempDir::new().unwrap();
        let zip = write_zip(
            temp.path(),
            &[("repo-main/example-apps-old/a.js", Some("old"))],
        );
        let files = extract_examples(&zip, temp.path(), "example-apps").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn traversal_entries_are_rejected() {
        let temp = TempDir::new().unwrap();
        let zip = write_zip(
            temp.path(),
            &[("repo-main/example-apps/../../escape.js", Some("nope"))],
        );
        let err = extract_examples(&zip, temp.path(), "example-apps").unwrap_err();
        assert!(matches!(err, PlatkitError::UnsafeArchivePath { .. }));
        assert!(!temp.path().join("escape.js").exists());
    }

    #[test]
    fn unsafe_entries_outside_prefix_are_skipped() {
        let temp = TempDir::new().unwrap();
        let zip = write_zip(
            temp.path(),
            &[
                ("repo-main/example-apps/a/index.js", Some("a")),
                ("repo-main/docs/../../weird.md", Some("weird")),
            ],
        );

        let files = extract_examples(&zip, temp.path(), "example-apps").unwrap();

        assert_eq!(files, vec![temp.path().join("example-apps/a/index.js")]);
        assert!(!temp.path().join("weird.md").exists());
        assert!(!temp.path().parent().unwrap().join("weird.md").exists());
    }

    #[test]
    fn download_streams_body_to_disk() {
        let server = MockServer::start();
        let body = build_zip(&[("repo-main/example-apps/a/b.js", Some("b"))]);
        let mock = server.mock(|when, then| {
            when.method(GET).path("/archive/main.zip");
            then.status(200).body(body.clone());
        });
        let temp = TempDir::new().unwrap();

        let path = download_archive(
            &Client::new(),
            &server.url("/archive/main.zip"),
            temp.path(),
        )
        .unwrap();

        mock.assert();
        assert_eq!(path, temp.path().join(ARCHIVE_FILE));
        assert_eq!(fs::read(&path).unwrap(), body);
    }

    #[test]
    fn download_rejects_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing.zip");
            then.status(404);
        });
        let temp = TempDir::new().unwrap();

        let err = download_archive(&Client::new(), &server.url("/missing.zip"), temp.path())
            .unwrap_err();

        assert!(matches!(err, PlatkitError::Http(_)));
        assert!(!temp.path().join(ARCHIVE_FILE).exists());
    }
}
