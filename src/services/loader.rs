//! Batch loading for the reporting CLI
//!
//! Reads provider payload files from disk and turns them into the raw
//! batch the transformer consumes. This is the only I/O in the crate; the
//! pipeline itself never touches the filesystem.

use crate::sources::SourceAdapter;
use crate::types::{Result, StablewatchError};
use rayon::prelude::*;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Load a raw batch from a payload file or a directory of payload files.
///
/// A directory is scanned for `*.json` files which are parsed in parallel
/// and concatenated in path order, so repeated runs over the same tree
/// produce the same batch. Files that fail to parse are skipped with a
/// warning; a missing path is an error.
pub fn load_batch(path: &Path, adapter: &dyn SourceAdapter) -> Result<Value> {
    let dtos = if path.is_dir() {
        load_dir(path, adapter)?
    } else {
        adapt_file(path, adapter)?
    };

    Ok(Value::Array(dedup_by_symbol(dtos)))
}

fn load_dir(dir: &Path, adapter: &dyn SourceAdapter) -> Result<Vec<Value>> {
    let mut files = collect_files(dir);
    files.sort();

    let per_file: Vec<Vec<Value>> = files
        .par_iter()
        .map(|file| match adapt_file(file, adapter) {
            Ok(dtos) => dtos,
            Err(e) => {
                eprintln!("[stablewatch] Warning: failed to load {:?}: {}", file, e);
                Vec::new()
            }
        })
        .collect();

    Ok(per_file.into_iter().flatten().collect())
}

/// Collect all payload files matching `*.json` under a directory
fn collect_files(dir: &Path) -> Vec<PathBuf> {
    let pattern = dir.join("*.json");
    glob::glob(&pattern.to_string_lossy())
        .map(|paths| paths.filter_map(|e| e.ok()).collect())
        .unwrap_or_default()
}

fn adapt_file(path: &Path, adapter: &dyn SourceAdapter) -> Result<Vec<Value>> {
    let mut content = fs::read_to_string(path).map_err(StablewatchError::Io)?;
    // SAFETY: `content` is exclusively owned and not aliased; safe for simd_json in-place mutation
    let payload: Value = unsafe {
        simd_json::from_str(&mut content).map_err(|e| StablewatchError::Parse(e.to_string()))?
    };
    adapter.adapt(&payload)
}

/// Drop cross-provider duplicates of the same entity, first seen wins.
/// Identity is the case-insensitive symbol; DTOs without one pass through
/// untouched for the normalizer to judge.
fn dedup_by_symbol(dtos: Vec<Value>) -> Vec<Value> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut deduped: Vec<Value> = Vec::with_capacity(dtos.len());

    for dto in dtos {
        let key = dto
            .get("symbol")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        match key {
            Some(key) => {
                if seen.insert(key) {
                    deduped.push(dto);
                }
            }
            None => deduped.push(dto),
        }
    }

    deduped
}
