//! Canned images and Haven OnDemand responses

use serde_json::json;
use smash::models::job::JobStatusResponse;

/// Smallest byte sequence recognised as a JPEG.
pub const JPEG_BYTES: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00,
];

pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];

pub fn queued(job_id: &str) -> JobStatusResponse {
    status(job_id, "queued", json!([]))
}

pub fn in_progress(job_id: &str) -> JobStatusResponse {
    status(job_id, "in progress", json!([]))
}

/// Finished OCR job with one text block per entry of `texts`.
pub fn ocr_finished(job_id: &str, texts: &[&str]) -> JobStatusResponse {
    let blocks: Vec<_> = texts
        .iter()
        .map(|text| json!({ "text": text, "left": 0, "top": 0, "width": 100, "height": 20 }))
        .collect();
    status(
        job_id,
        "finished",
        json!([{
            "action": "ocrdocument",
            "status": "finished",
            "result": { "text_block": blocks }
        }]),
    )
}

pub fn index_finished(job_id: &str) -> JobStatusResponse {
    status(
        job_id,
        "finished",
        json!([{
            "action": "addtotextindex",
            "status": "finished",
            "result": { "index": "smash", "references_count": 1 }
        }]),
    )
}

pub fn failed(job_id: &str) -> JobStatusResponse {
    status(
        job_id,
        "failed",
        json!([{
            "action": "ocrdocument",
            "status": "failed",
            "errors": [{ "error": 4005, "reason": "Unsupported image" }]
        }]),
    )
}

fn status(job_id: &str, status: &str, actions: serde_json::Value) -> JobStatusResponse {
    serde_json::from_value(json!({
        "jobID": job_id,
        "status": status,
        "actions": actions,
    }))
    .expect("valid status fixture")
}
