//! The single piece of customer content a proposal is built from.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;

use crate::error::ProposalError;

/// Fallback MIME type for audio payloads (browser `MediaRecorder` default).
pub const DEFAULT_AUDIO_MIME: &str = "audio/webm";

/// Fallback MIME type for document payloads.
pub const DEFAULT_DOCUMENT_MIME: &str = "application/pdf";

/// Where the customer context comes from.
///
/// Built once at the request boundary; downstream code matches on the
/// variant instead of probing optional fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// Text used verbatim; no extraction call is made.
    InlineText(String),
    /// Opaque document the model extracts text from.
    Document { data: Bytes, mime: String },
    /// Recorded audio the model transcribes.
    Audio { data: Bytes, mime: String },
}

impl ContentSource {
    /// Pick the source by precedence: inline text > document > audio.
    ///
    /// Blank fields count as absent. Only the chosen payload is decoded, so a
    /// broken audio field next to a valid transcript is ignored.
    pub fn select(
        transcript: Option<&str>,
        document_base64: Option<&str>,
        document_type: Option<&str>,
        audio_base64: Option<&str>,
        audio_mime: Option<&str>,
    ) -> Result<Self, ProposalError> {
        if let Some(text) = non_blank(transcript) {
            return Ok(Self::InlineText(text.to_owned()));
        }
        if let Some(encoded) = non_blank(document_base64) {
            return Ok(Self::Document {
                data: decode_payload("documentBase64", encoded)?,
                mime: non_blank(document_type)
                    .unwrap_or(DEFAULT_DOCUMENT_MIME)
                    .to_owned(),
            });
        }
        if let Some(encoded) = non_blank(audio_base64) {
            return Ok(Self::Audio {
                data: decode_payload("audioBase64", encoded)?,
                mime: non_blank(audio_mime).unwrap_or(DEFAULT_AUDIO_MIME).to_owned(),
            });
        }
        Err(ProposalError::invalid_input(
            "No audio data, document or transcript provided",
        ))
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InlineText(_) => "text",
            Self::Document { .. } => "document",
            Self::Audio { .. } => "audio",
        }
    }

    /// `data:` URL for binary sources; `None` for inline text.
    pub fn data_url(&self) -> Option<String> {
        match self {
            Self::InlineText(_) => None,
            Self::Document { data, mime } | Self::Audio { data, mime } => {
                Some(format!("data:{mime};base64,{}", STANDARD.encode(data)))
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Decode a base64 field, accepting a full `data:...;base64,` URL as well.
fn decode_payload(field: &str, encoded: &str) -> Result<Bytes, ProposalError> {
    let raw = match encoded.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => encoded,
    };
    let compact: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map(Bytes::from)
        .map_err(|e| ProposalError::invalid_input(format!("{field} is not valid base64: {e}")))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn transcript_wins_over_payloads() {
        let source = ContentSource::select(
            Some("客户想拓展欧洲市场"),
            Some("not base64 at all!"),
            None,
            Some("AAAA"),
            None,
        )
        .unwrap();
        assert_eq!(source, ContentSource::InlineText("客户想拓展欧洲市场".into()));
        assert!(source.data_url().is_none());
    }

    #[test]
    fn document_wins_over_audio() {
        let source =
            ContentSource::select(None, Some("aGVsbG8="), Some("application/msword"), Some("AAAA"), None)
                .unwrap();
        match source {
            ContentSource::Document { data, mime } => {
                assert_eq!(&data[..], b"hello");
                assert_eq!(mime, "application/msword");
            }
            other => panic!("expected document, got {other:?}"),
        }
    }

    #[test]
    fn blank_transcript_falls_through_to_audio() {
        let source = ContentSource::select(Some("   "), None, None, Some("aGVsbG8="), None).unwrap();
        assert_eq!(source.kind(), "audio");
        assert_eq!(
            source.data_url().as_deref(),
            Some("data:audio/webm;base64,aGVsbG8=")
        );
    }

    #[test]
    fn data_url_payloads_are_unwrapped() {
        let source = ContentSource::select(
            None,
            None,
            None,
            Some("data:audio/mpeg;base64,aGVs\nbG8="),
            Some("audio/mpeg"),
        )
        .unwrap();
        assert_eq!(
            source,
            ContentSource::Audio {
                data: Bytes::from_static(b"hello"),
                mime: "audio/mpeg".into()
            }
        );
    }

    #[test]
    fn missing_everything_is_invalid_input() {
        let err = ContentSource::select(None, Some(""), None, None, None).unwrap_err();
        assert!(matches!(err, ProposalError::InvalidInput(_)));
    }

    #[test]
    fn undecodable_payload_is_invalid_input() {
        let err = ContentSource::select(None, Some("%%%"), None, None, None).unwrap_err();
        match err {
            ProposalError::InvalidInput(m) => assert!(m.starts_with("documentBase64")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
