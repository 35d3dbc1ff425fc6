use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

const STORE_VERSION: u8 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct BestScoreFile {
    version: u8,
    #[serde(rename = "bestScore", alias = "best_score")]
    best_score: u32,
    #[serde(rename = "updatedAt", alias = "updated_at")]
    updated_at: String,
}

/// Single numeric best score persisted as a small JSON document. Every I/O
/// failure is logged and swallowed; the game keeps running on the in-memory
/// value.
pub struct BestScoreStore {
    file_path: PathBuf,
    best_score: u32,
    updated_at: Option<String>,
}

impl BestScoreStore {
    pub fn new(file_path: PathBuf) -> Self {
        let loaded = load_file(&file_path);
        Self {
            file_path,
            best_score: loaded.as_ref().map_or(0, |file| file.best_score),
            updated_at: loaded.map(|file| file.updated_at),
        }
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Returns true when `score` beat the stored value and was written out.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best_score {
            return false;
        }
        self.best_score = score;
        self.updated_at = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        self.save();
        true
    }

    fn save(&self) {
        if let Some(parent) = self.file_path.parent() {
            if let Err(error) = fs::create_dir_all(parent) {
                warn!(path = %parent.display(), %error, "failed to create best score directory");
                return;
            }
        }

        let payload = BestScoreFile {
            version: STORE_VERSION,
            best_score: self.best_score,
            updated_at: self.updated_at.clone().unwrap_or_default(),
        };
        match serde_json::to_string_pretty(&payload) {
            Ok(text) => {
                if let Err(error) = fs::write(&self.file_path, text) {
                    warn!(path = %self.file_path.display(), %error, "failed to write best score");
                }
            }
            Err(error) => {
                warn!(path = %self.file_path.display(), %error, "failed to serialize best score");
            }
        }
    }
}

fn load_file(path: &Path) -> Option<BestScoreFile> {
    let text = match fs::read_to_string(path) {
        Ok(value) => value,
        Err(error) => {
            if error.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), %error, "failed to read best score");
            }
            return None;
        }
    };
    match serde_json::from_str::<BestScoreFile>(&text) {
        Ok(value) if value.version == STORE_VERSION => Some(value),
        Ok(value) => {
            warn!(
                path = %path.display(),
                version = value.version,
                "unsupported best score file version"
            );
            None
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "failed to parse best score");
            None
        }
    }
}
