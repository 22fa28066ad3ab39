use image::ImageFormat;

/// Image extensions accepted for upload, lower-case.
pub const ALLOWED_IMG_EXTENSIONS: &[&str] = &[
    "tiff", "jpg", "jpeg", "png", "gif", "bmp", "ico", "pbm", "pgm", "ppm",
];

/// An upload that passed every check.
#[derive(Debug, Clone)]
pub struct ValidatedUpload {
    /// Name as submitted by the client; used as the index reference.
    pub original_name: String,
    /// Name safe to pass on to other systems.
    pub safe_name: String,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

/// Is the file name's extension in the allow-list? Case-insensitive.
pub fn allowed_img_file(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_IMG_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Reduce a client-supplied file name to its last path component with only
/// ASCII letters, digits, `.`, `-` and `_`.
pub fn secure_filename(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Validate an uploaded image before anything is sent upstream.
pub fn validate_upload(
    file_name: &str,
    bytes: Vec<u8>,
    max_bytes: usize,
) -> Result<ValidatedUpload, ValidationError> {
    if file_name.is_empty() {
        return Err(ValidationError::MissingField("doc"));
    }

    if !allowed_img_file(file_name) {
        return Err(ValidationError::DisallowedExtension(file_name.to_string()));
    }

    if bytes.len() > max_bytes {
        return Err(ValidationError::TooLarge {
            size: bytes.len(),
            max: max_bytes,
        });
    }

    let format = image::guess_format(&bytes).map_err(|_| ValidationError::NotAnImage)?;

    Ok(ValidatedUpload {
        original_name: file_name.to_string(),
        safe_name: secure_filename(file_name),
        format,
        bytes,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing form field '{0}'")]
    MissingField(&'static str),

    #[error("File type not allowed: {0}")]
    DisallowedExtension(String),

    #[error("Upload of {size} bytes exceeds the {max} byte limit")]
    TooLarge { size: usize, max: usize },

    #[error("Request body too large: {0}")]
    BodyTooLarge(String),

    #[error("Uploaded file is not a recognized image")]
    NotAnImage,

    #[error("Invalid form: {0}")]
    InvalidForm(String),
}
