//! multipart/form-data encoding for file uploads.

use uuid::Uuid;

/// A file to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

pub(crate) fn new_boundary() -> String {
    format!("grain-{}", Uuid::new_v4().simple())
}

/// Encode `file` as the single part `field` of a form body.
pub(crate) fn form_data(boundary: &str, field: &str, file: &UploadFile) -> Vec<u8> {
    let mut body = Vec::with_capacity(file.bytes.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            quote(field),
            quote(&file.file_name)
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
    body.extend_from_slice(&file.bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

// Same escaping browsers apply to form-data names.
fn quote(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_has_one_file_part() {
        let file = UploadFile::new("report.txt", "text/plain", b"hello".to_vec());
        let body = form_data("XYZ", "file", &file);
        let text = String::from_utf8(body).unwrap();
        assert_eq!(
            text,
            "--XYZ\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"report.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             hello\r\n--XYZ--\r\n"
        );
    }

    #[test]
    fn quotes_in_file_names_are_escaped() {
        let file = UploadFile::new("a\"b.txt", "text/plain", Vec::new());
        let text = String::from_utf8(form_data("B", "file", &file)).unwrap();
        assert!(text.contains("filename=\"a%22b.txt\""));
    }

    #[test]
    fn boundaries_are_unique() {
        assert_ne!(new_boundary(), new_boundary());
    }
}
