// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence sinks for the mirror document.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::AppError;
use crate::mirror::MirrorDocument;

/// Load/save capability for the whole mirror document.
pub trait MirrorSink: Send + Sync {
    /// `None` when nothing has been persisted yet.
    fn load(&self) -> Result<Option<MirrorDocument>, AppError>;

    fn save(&self, document: &MirrorDocument) -> Result<(), AppError>;
}

/// Persists the document as a JSON file.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MirrorSink for JsonFileSink {
    fn load(&self) -> Result<Option<MirrorDocument>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path)
            .map_err(|e| AppError::Mirror(format!("read {}: {}", self.path.display(), e)))?;
        let document = serde_json::from_str(&raw)
            .map_err(|e| AppError::Mirror(format!("parse {}: {}", self.path.display(), e)))?;
        Ok(Some(document))
    }

    fn save(&self, document: &MirrorDocument) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Mirror(format!("create {}: {}", parent.display(), e)))?;
        }

        let json = serde_json::to_string(document)
            .map_err(|e| AppError::Mirror(format!("serialize: {}", e)))?;

        // Write-then-rename so a crash never leaves a truncated document.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .map_err(|e| AppError::Mirror(format!("write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| AppError::Mirror(format!("rename {}: {}", tmp.display(), e)))?;
        Ok(())
    }
}

/// Keeps the serialized document in memory, like browser local storage.
#[derive(Default)]
pub struct MemorySink {
    stored: Mutex<Option<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last persisted JSON, if any.
    pub fn stored_json(&self) -> Option<String> {
        self.stored
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl MirrorSink for MemorySink {
    fn load(&self) -> Result<Option<MirrorDocument>, AppError> {
        self.stored_json()
            .map(|raw| {
                serde_json::from_str(&raw).map_err(|e| AppError::Mirror(format!("parse: {}", e)))
            })
            .transpose()
    }

    fn save(&self, document: &MirrorDocument) -> Result<(), AppError> {
        let json = serde_json::to_string(document)
            .map_err(|e| AppError::Mirror(format!("serialize: {}", e)))?;
        *self
            .stored
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::MetricEntry;

    fn sample() -> MirrorDocument {
        let mut doc = MirrorDocument::default();
        doc.user_mut("a@example.com").sleep.push(MetricEntry {
            value: 7.5,
            date: "2026-10-15T06:00:00.000Z".to_string(),
        });
        doc
    }

    #[test]
    fn test_json_file_sink_persists_document() {
        let dir = std::env::temp_dir().join(format!("vitals-mirror-{}", std::process::id()));
        let sink = JsonFileSink::new(dir.join("nested").join("mirror.json"));

        assert!(sink.load().unwrap().is_none());
        sink.save(&sample()).unwrap();
        assert_eq!(sink.load().unwrap(), Some(sample()));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_json_file_sink_reports_corrupt_file() {
        let path = std::env::temp_dir().join(format!("vitals-corrupt-{}.json", std::process::id()));
        fs::write(&path, "{not json").unwrap();

        let err = JsonFileSink::new(&path).load().unwrap_err();
        assert!(matches!(err, AppError::Mirror(_)));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_memory_sink_round_trip() {
        let sink = MemorySink::new();
        assert!(sink.load().unwrap().is_none());
        sink.save(&sample()).unwrap();
        assert_eq!(sink.load().unwrap(), Some(sample()));
    }
}
