//! The generated-video record and per-request generation config.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{AspectRatio, GenerationStatus, Timestamp};

/// One completed (or failed) generation, as shown in the gallery.
///
/// Created once after the generation flow resolves and never mutated.
/// Records live only in memory for the duration of the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedVideoRecord {
    /// Opaque record identifier.
    pub id: Uuid,
    /// Result media location, including the appended access credential.
    pub url: String,
    /// Human-readable description of the applied style.
    pub prompt: String,
    /// The original input URL the user submitted.
    pub source_url: String,
    /// When the record was created (UTC).
    pub timestamp: Timestamp,
    pub aspect_ratio: AspectRatio,
    pub status: GenerationStatus,
}

impl GeneratedVideoRecord {
    /// Create a completed record for a resolved result URL.
    pub fn completed(
        url: String,
        prompt: String,
        source_url: String,
        aspect_ratio: AspectRatio,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            url,
            prompt,
            source_url,
            timestamp: chrono::Utc::now(),
            aspect_ratio,
            status: GenerationStatus::Completed,
        }
    }
}

/// Per-request configuration passed through to the generative API.
///
/// Constructed for a single submission and discarded afterwards.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub aspect_ratio: AspectRatio,
    /// Style descriptor fragment spliced into the grading prompt.
    pub style_prompt: String,
    /// Base64-encoded JPEG reference image, when thumbnail fetch succeeded.
    /// `None` means the request proceeds degraded, without a reference.
    pub reference_image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_record_has_completed_status_and_fresh_id() {
        let a = GeneratedVideoRecord::completed(
            "https://cdn.example/v.mp4&key=k".into(),
            "Cinematic grade: Noir".into(),
            "https://youtu.be/abc12345678".into(),
            AspectRatio::Widescreen,
        );
        let b = GeneratedVideoRecord::completed(
            "https://cdn.example/v.mp4&key=k".into(),
            "Cinematic grade: Noir".into(),
            "https://youtu.be/abc12345678".into(),
            AspectRatio::Widescreen,
        );

        assert_eq!(a.status, GenerationStatus::Completed);
        assert_ne!(a.id, b.id, "each record gets its own opaque id");
    }
}
