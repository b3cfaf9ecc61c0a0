//! `multipart/form-data` bodies with a fixed boundary.

use crate::transport::Form;

/// Boundary token used for every multipart request.
pub const BOUNDARY: &str = "---FormBoundary7MB4YWxkTrZu0gW-----";

pub fn content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// Serializes `form` with one part per field, in insertion order.
pub fn encode(form: &Form) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in form.iter() {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_ref());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
