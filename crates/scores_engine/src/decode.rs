use chardetng::EncodingDetector;
use encoding_rs::Encoding;

use crate::{FailureKind, FetchError, FetchOutput};

/// Where the page encoding came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingSource {
    Bom,
    Header,
    Detected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub html: String,
    pub encoding: &'static str,
    pub source: EncodingSource,
}

pub fn decode_page(output: &FetchOutput) -> Result<DecodedPage, FetchError> {
    decode_html(&output.bytes, output.metadata.content_type.as_deref())
}

/// BOM first, then the `charset` parameter, then byte-level detection.
/// Older scoreboard pages were served as windows-1252 without a charset.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedPage, FetchError> {
    let (encoding, source) = pick_encoding(bytes, content_type);
    let (text, had_errors) = encoding.decode_without_bom_handling(strip_bom(bytes, source));
    if had_errors {
        return Err(FetchError::new(
            FailureKind::Decode {
                encoding: encoding.name().to_string(),
            },
            "malformed byte sequence",
        ));
    }
    Ok(DecodedPage {
        html: text.into_owned(),
        encoding: encoding.name(),
        source,
    })
}

fn pick_encoding(bytes: &[u8], content_type: Option<&str>) -> (&'static Encoding, EncodingSource) {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return (encoding, EncodingSource::Bom);
    }
    if let Some(encoding) = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return (encoding, EncodingSource::Header);
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    (detector.guess(None, true), EncodingSource::Detected)
}

fn strip_bom(bytes: &[u8], source: EncodingSource) -> &[u8] {
    match (source, Encoding::for_bom(bytes)) {
        (EncodingSource::Bom, Some((_, len))) => &bytes[len..],
        _ => bytes,
    }
}

fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_charset_parameter_is_honoured() {
        let decoded =
            decode_html(b"Saint Mary\xe9s", Some("text/html; Charset=\"ISO-8859-1\"")).unwrap();
        assert_eq!(decoded.html, "Saint Mary\u{e9}s");
        assert_eq!(decoded.source, EncodingSource::Header);
    }

    #[test]
    fn bom_wins_over_header_and_is_stripped() {
        let decoded =
            decode_html(b"\xEF\xBB\xBFDuke", Some("text/html; charset=windows-1252")).unwrap();
        assert_eq!(decoded.html, "Duke");
        assert_eq!(decoded.encoding, "UTF-8");
        assert_eq!(decoded.source, EncodingSource::Bom);
    }

    #[test]
    fn unlabelled_ascii_is_detected() {
        let decoded = decode_html(b"<html>Iona 71, Manhattan 73</html>", Some("text/html")).unwrap();
        assert_eq!(decoded.source, EncodingSource::Detected);
        assert_eq!(decoded.html, "<html>Iona 71, Manhattan 73</html>");
    }

    #[test]
    fn invalid_utf8_with_declared_charset_fails() {
        let err = decode_html(b"Duke \xff\xfe\xfd", Some("text/html; charset=utf-8")).unwrap_err();
        assert_eq!(
            err.kind,
            FailureKind::Decode {
                encoding: "UTF-8".to_string()
            }
        );
    }
}
