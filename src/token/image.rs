use crate::types::token::ImagePayload;
use crate::util::validation::ValidationError;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub const SUPPORTED_CONTENT_TYPES: [&str; 5] = [
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/gif",
    "image/webp",
];

/// Check an uploaded image's type and size before it leaves the process.
pub fn validate_image(image: &ImagePayload) -> Result<(), ValidationError> {
    if image.is_empty() {
        return Err(ValidationError::missing("Image file"));
    }

    let content_type = image.content_type.to_ascii_lowercase();
    if !SUPPORTED_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(ValidationError::invalid(
            "image",
            "Image must be PNG, JPEG, GIF, or WebP format",
        ));
    }

    if image.len() > MAX_IMAGE_BYTES {
        return Err(ValidationError::invalid(
            "image",
            "Image must be smaller than 5MB",
        ));
    }

    Ok(())
}

/// Guess a content type from the file extension when the client sent none.
pub fn content_type_from_file_name(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::png;

    #[test]
    fn test_accepts_supported_types() {
        for content_type in SUPPORTED_CONTENT_TYPES {
            let image = ImagePayload::new(vec![1; 16], "a", content_type);
            assert!(validate_image(&image).is_ok(), "{}", content_type);
        }
        let upper = ImagePayload::new(vec![1; 16], "a.png", "IMAGE/PNG");
        assert!(validate_image(&upper).is_ok());
    }

    #[test]
    fn test_rejects_other_types() {
        let svg = ImagePayload::new(vec![1; 16], "a.svg", "image/svg+xml");
        let err = validate_image(&svg).unwrap_err();
        assert_eq!(
            err.to_string(),
            "image: Image must be PNG, JPEG, GIF, or WebP format"
        );
    }

    #[test]
    fn test_size_limit() {
        assert!(validate_image(&png(MAX_IMAGE_BYTES)).is_ok());
        assert!(validate_image(&png(MAX_IMAGE_BYTES + 1)).is_err());
    }

    #[test]
    fn test_empty_image_is_missing() {
        let empty = ImagePayload::new(Vec::new(), "a.png", "image/png");
        assert_eq!(
            validate_image(&empty).unwrap_err(),
            ValidationError::missing("Image file")
        );
    }

    #[test]
    fn test_content_type_from_file_name() {
        assert_eq!(content_type_from_file_name("logo.PNG"), Some("image/png"));
        assert_eq!(content_type_from_file_name("photo.jpg"), Some("image/jpeg"));
        assert_eq!(content_type_from_file_name("noext"), None);
        assert_eq!(content_type_from_file_name("doc.pdf"), None);
    }
}
