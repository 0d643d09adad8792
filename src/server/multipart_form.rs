use std::collections::HashMap;
use futures::TryStreamExt;
use warp::multipart::{FormData, Part};
use warp::Buf;
use crate::errors::{SpectraceError, SpectraceResult};

pub struct FormField {
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

/// A fully buffered multipart body. Duplicate field names keep the last part.
pub struct MultipartForm {
    fields: HashMap<String, FormField>,
}

impl MultipartForm {
    /// Parts are drained in arrival order; the body stream only exposes one part at a time.
    pub async fn read(mut form: FormData) -> SpectraceResult<Self> {
        let mut fields = HashMap::new();

        while let Some(part) = form
            .try_next()
            .await
            .map_err(|e| SpectraceError::invalid_input("form", &format!("malformed multipart body: {}", e)))?
        {
            let name = part.name().to_string();
            let filename = part.filename().map(str::to_string);
            let data = Self::drain(part)
                .await
                .map_err(|e| SpectraceError::invalid_input(&name, &format!("could not read field: {}", e)))?;
            fields.insert(name, FormField { filename, data });
        }

        Ok(Self { fields })
    }

    async fn drain(part: Part) -> Result<Vec<u8>, warp::Error> {
        part.stream()
            .try_fold(Vec::new(), |mut acc, mut buf| async move {
                while buf.has_remaining() {
                    let chunk = buf.chunk();
                    let read = chunk.len();
                    acc.extend_from_slice(chunk);
                    buf.advance(read);
                }
                Ok(acc)
            })
            .await
    }

    pub fn take(&mut self, name: &str) -> Option<FormField> {
        self.fields.remove(name)
    }

    pub fn take_text(&mut self, name: &str) -> SpectraceResult<Option<String>> {
        self.take(name)
            .map(|field| {
                String::from_utf8(field.data)
                    .map_err(|_| SpectraceError::invalid_input(name, "field is not valid UTF-8 text"))
            })
            .transpose()
    }

    pub fn require_text(&mut self, name: &str) -> SpectraceResult<String> {
        self.take_text(name)?
            .ok_or_else(|| SpectraceError::invalid_input(name, "required field is missing"))
    }
}
