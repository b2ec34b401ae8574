//! Drop ingestion: one synthesized line per dropped receipt file.

use tracing::{debug, warn};

use spesen_common::LineId;
use spesen_report::{Attachment, ReportEngine};

use crate::ocr::{apply_ocr, OcrClient};

/// File extensions accepted from drop ingestion.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["pdf", "png", "jpg", "jpeg", "gif"];

/// Whether a file name carries an accepted extension.
pub fn allowed_file(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// A file handed over by the drop zone.
#[derive(Debug, Clone)]
pub struct DroppedFile {
    /// Original file name, extension included.
    pub file_name: String,
    /// MIME content type.
    pub content_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl DroppedFile {
    /// Create a new dropped file.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Ingest dropped files, strictly in arrival order.
///
/// Each accepted file synthesizes one line, attaches the file, runs it
/// through recognition and applies the recognized fields before the next
/// file starts, so at most one recognition call is in flight at a time.
/// Files with unaccepted extensions are skipped without creating a line;
/// recognition failures leave the synthesized line's fields unchanged.
///
/// Returns the ids of the created lines, in drop order.
pub async fn ingest_dropped_files(
    engine: &ReportEngine,
    ocr: &OcrClient,
    files: Vec<DroppedFile>,
) -> Vec<LineId> {
    let mut created = Vec::new();

    for file in files {
        if !allowed_file(&file.file_name) {
            warn!(file = %file.file_name, "ignoring file with unaccepted extension");
            continue;
        }

        let id = engine.add_line().await;
        engine.attach_receipt(
            id,
            Attachment::new(
                file.file_name.clone(),
                file.content_type.clone(),
                file.bytes.clone(),
            ),
        );
        debug!(line = %id, file = %file.file_name, "line synthesized from dropped file");

        match ocr.scan(&file.file_name, &file.content_type, file.bytes).await {
            Ok(fields) => apply_ocr(engine, id, fields).await,
            Err(error) => warn!(line = %id, %error, "receipt recognition failed"),
        }

        created.push(id);
    }

    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::OcrClientConfig;
    use spesen_rates::{MockRateSource, RateProvider};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_allowed_file_accepts_known_extensions() {
        assert!(allowed_file("receipt.pdf"));
        assert!(allowed_file("photo.JPG"));
        assert!(allowed_file("scan.jpeg"));
        assert!(allowed_file("chart.png"));
        assert!(allowed_file("anim.gif"));
    }

    #[test]
    fn test_allowed_file_rejects_everything_else() {
        assert!(!allowed_file("notes.txt"));
        assert!(!allowed_file("archive.zip"));
        assert!(!allowed_file("no-extension"));
        assert!(!allowed_file("receipt.pdf.exe"));
    }

    /// A client pointed at a closed port: every scan fails, which is the
    /// absorb-and-continue path drop ingestion must survive.
    fn unreachable_ocr() -> OcrClient {
        OcrClient::new(OcrClientConfig {
            endpoint: "http://127.0.0.1:9/process_receipt".to_string(),
            timeout: Duration::from_millis(500),
        })
    }

    #[tokio::test]
    async fn test_drop_creates_one_line_per_accepted_file() {
        let engine = ReportEngine::new(RateProvider::new(Arc::new(MockRateSource::new())));
        let ocr = unreachable_ocr();

        let files = vec![
            DroppedFile::new("first.pdf", "application/pdf", vec![1]),
            DroppedFile::new("malware.exe", "application/octet-stream", vec![2]),
            DroppedFile::new("second.png", "image/png", vec![3]),
        ];

        let created = ingest_dropped_files(&engine, &ocr, files).await;

        assert_eq!(created.len(), 2);
        assert_eq!(engine.store().len(), 2);
        // Drop order is insertion order.
        assert_eq!(engine.store().ids(), created);

        let lines = engine.store().export();
        assert_eq!(lines[0].attachment.as_ref().unwrap().file_name, "first.pdf");
        assert_eq!(lines[1].attachment.as_ref().unwrap().file_name, "second.png");
    }

    #[tokio::test]
    async fn test_failed_recognition_leaves_fields_unchanged() {
        let engine = ReportEngine::new(RateProvider::new(Arc::new(MockRateSource::new())));
        let ocr = unreachable_ocr();

        let created = ingest_dropped_files(
            &engine,
            &ocr,
            vec![DroppedFile::new("receipt.jpg", "image/jpeg", vec![0xff])],
        )
        .await;

        let line = &engine.store().export()[0];
        assert_eq!(created, vec![line.id]);
        assert!(line.date.is_none());
        assert!(!line.has_amount());
        assert!(line.attachment.is_some());
    }
}
