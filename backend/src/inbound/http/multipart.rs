//! Multipart form decoding for the document upload pages.
//!
//! Text parts become a [`FieldSet`]; file parts are buffered into
//! [`DocumentUpload`]s. The whole body is capped at [`MAX_UPLOAD_BYTES`].

use actix_multipart::{Field, Multipart};
use futures_util::StreamExt;
use tracing::warn;

use crate::domain::{DocumentUpload, Error, FieldSet};

/// Largest accepted multipart body, text and files combined.
pub const MAX_UPLOAD_BYTES: usize = 10 << 20;

/// Decoded multipart submission.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: FieldSet,
    pub files: Vec<DocumentUpload>,
}

impl MultipartForm {
    /// First file received under `field`, if any.
    pub fn file(&self, field: &str) -> Option<&DocumentUpload> {
        self.files.iter().find(|file| file.field == field)
    }

    /// Every file received under `field`, in submission order.
    pub fn files_named<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a DocumentUpload> {
        self.files.iter().filter(move |file| file.field == field)
    }
}

/// Read every part of `payload`, enforcing `limit` bytes in total.
///
/// File parts without a name or without content are skipped: browsers send
/// them for file inputs left empty.
pub async fn read_multipart(mut payload: Multipart, limit: usize) -> Result<MultipartForm, Error> {
    let mut form = MultipartForm::default();
    let mut total = 0_usize;

    while let Some(part) = payload.next().await {
        let mut field = part.map_err(malformed)?;
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let file_name = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .map(str::to_owned);
        let bytes = read_field(&mut field, &mut total, limit).await?;

        match file_name {
            Some(file_name) if file_name.is_empty() || bytes.is_empty() => {}
            Some(file_name) => form.files.push(DocumentUpload {
                field: name,
                file_name,
                bytes,
            }),
            None => {
                let value = String::from_utf8(bytes)
                    .map_err(|err| Error::internal(format!("field {name} is not UTF-8: {err}")))?;
                form.fields.push(name, value);
            }
        }
    }
    Ok(form)
}

async fn read_field(field: &mut Field, total: &mut usize, limit: usize) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(malformed)?;
        *total = total.saturating_add(chunk.len());
        if *total > limit {
            warn!(limit, "multipart body exceeds upload limit");
            return Err(Error::payload_too_large(format!(
                "multipart body exceeds {limit} bytes"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn malformed(err: actix_multipart::MultipartError) -> Error {
    Error::internal(format!("malformed multipart body: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{MultipartPart as Part, multipart_request};
    use actix_web::FromRequest;
    use rstest::rstest;

    async fn decode(parts: &[Part<'_>], limit: usize) -> Result<MultipartForm, Error> {
        let (req, mut payload) = multipart_request("/", parts).to_http_parts();
        let multipart = Multipart::from_request(&req, &mut payload)
            .await
            .expect("multipart extractor");
        read_multipart(multipart, limit).await
    }

    #[actix_web::test]
    async fn text_and_file_parts_are_split() {
        let form = decode(
            &[
                Part::Text("customer_code", "C-1"),
                Part::File("photos", "scan.pdf", b"%PDF-1.7"),
                Part::File("photos", "id.png", b"png"),
            ],
            MAX_UPLOAD_BYTES,
        )
        .await
        .expect("decode");
        assert_eq!(form.fields.value("customer_code"), "C-1");
        assert_eq!(form.files_named("photos").count(), 2);
        let first = form.file("photos").expect("first photo");
        assert_eq!(first.file_name, "scan.pdf");
        assert_eq!(first.bytes, b"%PDF-1.7");
    }

    #[rstest]
    #[case("", b"data".as_slice())]
    #[case("empty.pdf", b"".as_slice())]
    #[actix_web::test]
    async fn empty_file_inputs_are_skipped(#[case] file_name: &str, #[case] bytes: &[u8]) {
        let form = decode(
            &[Part::File("photos", file_name, bytes)],
            MAX_UPLOAD_BYTES,
        )
        .await
        .expect("decode");
        assert!(form.files.is_empty());
    }

    #[actix_web::test]
    async fn oversized_bodies_are_rejected() {
        let big = vec![b'x'; 64];
        let err = decode(&[Part::File("photos", "big.bin", &big)], 32)
            .await
            .expect_err("over limit");
        assert_eq!(err.code(), crate::domain::ErrorCode::PayloadTooLarge);
    }
}
