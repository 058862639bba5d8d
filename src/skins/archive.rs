use crate::assets::is_valid_identity;
use crate::config::Config;
use crate::error::IngestError;
use crate::skins::elements::{flatten_entry_name, skin_file_name};
use log::{debug, info, warn};
use rustc_hash::FxHashMap;
use std::fs::{self, File};
use std::io::{self, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use zip::ZipArchive;

/// Outcome of a successful ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestReport {
    /// Recognised skin element files written.
    pub extracted: usize,
    /// File entries ignored because they are not skin elements.
    pub skipped: usize,
    /// Uncompressed bytes written.
    pub bytes: u64,
}

/// Owns the per-identity skin directories under one root.
///
/// Each upload fully replaces the identity's directory. Replacements for the
/// same identity are serialised; different identities proceed in parallel.
#[derive(Debug)]
pub struct SkinStore {
    skins_root: PathBuf,
    default_identity: String,
    max_archive_bytes: u64,
    locks: Mutex<FxHashMap<String, Arc<Mutex<()>>>>,
}

impl SkinStore {
    pub fn new(config: &Config) -> Self {
        Self {
            skins_root: config.skins_root.clone(),
            default_identity: config.default_skin_identity.clone(),
            max_archive_bytes: config.max_archive_bytes,
            locks: Mutex::new(FxHashMap::default()),
        }
    }

    #[inline(always)]
    pub fn skins_root(&self) -> &Path {
        &self.skins_root
    }

    fn identity_lock(&self, identity: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(identity.to_string()).or_default().clone()
    }

    /// Drops the caller's handle and forgets the lock once nobody else holds one.
    fn release_lock(&self, identity: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        drop(lock);
        if locks.get(identity).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(identity);
        }
    }

    /// Replaces `identity`'s skin with the recognised elements of a ZIP archive.
    ///
    /// The container is parsed before anything on disk changes, so a
    /// `CorruptArchive` from a malformed container leaves the previous skin
    /// intact. Once extraction starts, failures leave whatever was written.
    pub fn ingest(&self, identity: &str, archive: &[u8]) -> Result<IngestReport, IngestError> {
        if !is_valid_identity(identity) || identity == self.default_identity {
            return Err(IngestError::InvalidIdentity(identity.to_string()));
        }

        let mut zip = ZipArchive::new(Cursor::new(archive))?;

        let lock = self.identity_lock(identity);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.replace_skin(identity, &mut zip)
        };
        self.release_lock(identity, lock);
        result
    }

    fn replace_skin<R: Read + Seek>(
        &self,
        identity: &str,
        zip: &mut ZipArchive<R>,
    ) -> Result<IngestReport, IngestError> {
        let dest = self.skins_root.join(identity);
        reset_dir(&dest)?;

        let mut report = IngestReport::default();
        for index in 0..zip.len() {
            let mut entry = zip.by_index(index)?;
            if entry.is_dir() {
                continue;
            }

            let raw_name = entry.name().to_string();
            let Some(file_name) = flatten_entry_name(&raw_name).and_then(skin_file_name) else {
                debug!("Skipping non-skin entry '{raw_name}'");
                report.skipped += 1;
                continue;
            };

            let declared = entry.size();
            let running = report.bytes.saturating_add(declared);
            if running > self.max_archive_bytes {
                warn!(
                    "Skin upload for '{identity}' aborted at '{raw_name}': {running} bytes exceeds {}",
                    self.max_archive_bytes
                );
                return Err(IngestError::ArchiveTooLarge {
                    limit: self.max_archive_bytes,
                });
            }

            let written = copy_entry(&mut entry, &dest.join(&file_name), declared)?;
            report.bytes = report.bytes.saturating_add(written);
            report.extracted += 1;
        }

        if report.extracted == 0 {
            warn!("Skin upload for '{identity}' had no recognised elements");
            return Err(IngestError::NoValidElements);
        }

        info!(
            "Ingested skin '{identity}': {} elements, {} skipped, {} bytes",
            report.extracted, report.skipped, report.bytes
        );
        Ok(report)
    }
}

fn reset_dir(dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    fs::create_dir_all(dir)
}

/// Copies at most `declared` bytes; an entry that inflates past its declared
/// size is corrupt.
fn copy_entry(entry: &mut impl Read, dest: &Path, declared: u64) -> Result<u64, IngestError> {
    let mut out = File::create(dest)?;
    let mut limited = entry.take(declared.saturating_add(1));
    let copied = io::copy(&mut limited, &mut out).map_err(|e| match e.kind() {
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
            IngestError::CorruptArchive(e.to_string())
        }
        _ => IngestError::Io(e),
    })?;
    if copied > declared {
        return Err(IngestError::CorruptArchive(format!(
            "entry inflates past its declared {declared} bytes"
        )));
    }
    Ok(copied)
}
