//! Spesen Ingestion
//!
//! External populate mechanisms for a report draft: the receipt
//! recognition client and drop ingestion. Both write into lines through
//! the engine's typed mutators, so an ingested field triggers exactly the
//! same recompute path as a manual edit.

pub mod dropzone;
pub mod error;
pub mod ocr;

pub use dropzone::{allowed_file, ingest_dropped_files, DroppedFile, ALLOWED_EXTENSIONS};
pub use error::{OcrError, OcrResult};
pub use ocr::{apply_ocr, parse_receipt_date, OcrClient, OcrClientConfig, OcrFields};
