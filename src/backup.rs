use anyhow::{anyhow, bail, Context};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const MANIFEST_ENTRY: &str = "manifest.json";
const STORE_ENTRY: &str = "store/marks.db";
pub const BUNDLE_FORMAT_V1: &str = "markregd-store-v1";
pub const RAW_SQLITE_FORMAT: &str = "raw-sqlite3";
const SQLITE_HEADER: &[u8; 16] = b"SQLite format 3\0";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub bundle_id: String,
    pub entry_count: usize,
    pub sha256: String,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub bundle_format_detected: String,
}

fn hex_digest(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

pub fn export_store_bundle(store_path: &Path, out_path: &Path) -> anyhow::Result<ExportSummary> {
    if !store_path.is_file() {
        bail!("store file not found: {}", store_path.to_string_lossy());
    }
    let store_bytes = std::fs::read(store_path)
        .with_context(|| format!("failed to read store {}", store_path.to_string_lossy()))?;
    let sha256 = hex_digest(&store_bytes);
    let bundle_id = uuid::Uuid::new_v4().to_string();

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }
    let out_file = File::create(out_path)
        .with_context(|| format!("failed to create bundle {}", out_path.to_string_lossy()))?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let manifest = json!({
        "format": BUNDLE_FORMAT_V1,
        "bundleId": bundle_id,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportedAt": chrono::Utc::now().to_rfc3339(),
        "storeEntry": STORE_ENTRY,
        "sha256": sha256,
    });
    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    zip.start_file(STORE_ENTRY, opts)
        .context("failed to start store entry")?;
    zip.write_all(&store_bytes)
        .context("failed to write store entry")?;
    zip.finish().context("failed to finalize bundle")?;

    tracing::info!(bundle = %out_path.display(), %bundle_id, "store exported");
    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT_V1.to_string(),
        bundle_id,
        entry_count: 2,
        sha256,
    })
}

/// Restores the store file from a bundle, or from a bare SQLite copy. The
/// caller must have closed its connection to `store_path` first.
pub fn import_store_bundle(in_path: &Path, store_path: &Path) -> anyhow::Result<ImportSummary> {
    if let Some(parent) = store_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create directory {}", parent.to_string_lossy())
            })?;
        }
    }

    if !is_zip_file(in_path)? {
        let bytes = std::fs::read(in_path)
            .with_context(|| format!("failed to read {}", in_path.to_string_lossy()))?;
        if !bytes.starts_with(SQLITE_HEADER) {
            bail!(
                "not a bundle or sqlite database: {}",
                in_path.to_string_lossy()
            );
        }
        replace_store(store_path, &bytes)?;
        tracing::info!(source = %in_path.display(), "store restored from raw sqlite copy");
        return Ok(ImportSummary {
            bundle_format_detected: RAW_SQLITE_FORMAT.to_string(),
        });
    }

    let in_file = File::open(in_path)
        .with_context(|| format!("failed to open bundle {}", in_path.to_string_lossy()))?;
    let mut archive = ZipArchive::new(in_file).context("invalid zip archive")?;

    let mut manifest_text = String::new();
    archive
        .by_name(MANIFEST_ENTRY)
        .context("bundle missing manifest.json")?
        .read_to_string(&mut manifest_text)
        .context("failed to read manifest.json")?;
    let manifest: serde_json::Value =
        serde_json::from_str(&manifest_text).context("manifest.json is invalid JSON")?;
    let format = manifest
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if format != BUNDLE_FORMAT_V1 {
        bail!("unsupported bundle format: {}", format);
    }
    let expected = manifest
        .get("sha256")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow!("manifest missing sha256"))?
        .to_string();

    let mut store_bytes = Vec::new();
    archive
        .by_name(STORE_ENTRY)
        .with_context(|| format!("bundle missing {}", STORE_ENTRY))?
        .read_to_end(&mut store_bytes)
        .context("failed to extract store entry")?;
    let actual = hex_digest(&store_bytes);
    if actual != expected {
        bail!("store digest mismatch: expected {}, got {}", expected, actual);
    }

    replace_store(store_path, &store_bytes)?;

    tracing::info!(source = %in_path.display(), "store restored from bundle");
    Ok(ImportSummary {
        bundle_format_detected: BUNDLE_FORMAT_V1.to_string(),
    })
}

fn replace_store(store_path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let tmp = store_path.with_extension("importing");
    std::fs::write(&tmp, bytes)
        .with_context(|| format!("failed to write {}", tmp.to_string_lossy()))?;
    if store_path.exists() {
        std::fs::remove_file(store_path).with_context(|| {
            format!(
                "failed to remove existing store {}",
                store_path.to_string_lossy()
            )
        })?;
    }
    std::fs::rename(&tmp, store_path)
        .with_context(|| format!("failed to move restored store to {}", store_path.to_string_lossy()))
}

fn is_zip_file(path: &Path) -> anyhow::Result<bool> {
    let mut f = File::open(path)
        .with_context(|| format!("failed to open input file {}", path.to_string_lossy()))?;
    let mut sig = [0u8; 4];
    let read = f.read(&mut sig).context("failed to read file signature")?;
    if read < 4 {
        return Ok(false);
    }
    Ok(sig == [0x50, 0x4B, 0x03, 0x04])
}
