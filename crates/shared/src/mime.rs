//! MIME inference for uploaded payment artifacts.

/// Fallback content type for unrecognized extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Infer the content type of a payment artifact from its filename.
///
/// Only the formats accepted as payment proof get a concrete type;
/// everything else is served as an opaque byte stream.
pub fn content_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "jpeg" | "jpg" => "image/jpeg",
        "png" => "image/png",
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(content_type_for("receipt.pdf"), "application/pdf");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("photo.JPG"), "image/jpeg");
        assert_eq!(content_type_for("scan.png"), "image/png");
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        assert_eq!(content_type_for("archive.zip"), OCTET_STREAM);
        assert_eq!(content_type_for("noextension"), OCTET_STREAM);
        assert_eq!(content_type_for(""), OCTET_STREAM);
    }
}
