/// Base64 image payload as received from the calling collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    payload: String,
}

impl EncodedImage {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// The base64 body with any `data:...,` header removed
    pub fn body(&self) -> &str {
        let trimmed = self.payload.trim_start();
        if trimmed.starts_with("data:") {
            if let Some((_, body)) = trimmed.split_once(',') {
                return body;
            }
        }
        trimmed
    }

    pub fn as_str(&self) -> &str {
        &self.payload
    }
}

impl From<&str> for EncodedImage {
    fn from(payload: &str) -> Self {
        Self::new(payload)
    }
}

impl From<String> for EncodedImage {
    fn from(payload: String) -> Self {
        Self::new(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_data_uri_header() {
        let encoded = EncodedImage::new("data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(encoded.body(), "iVBORw0KGgo=");
    }

    #[test]
    fn raw_payload_is_untouched() {
        let encoded = EncodedImage::new("iVBORw0KGgo=");
        assert_eq!(encoded.body(), "iVBORw0KGgo=");
    }

    #[test]
    fn header_is_cut_at_first_comma_only() {
        let encoded = EncodedImage::new("data:image/jpeg;base64,abc,def");
        assert_eq!(encoded.body(), "abc,def");
    }
}
