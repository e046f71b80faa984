//! OWS 1.1 ExceptionReport documents.

use quick_xml::escape::escape;
use wmts_common::WmtsError;

/// Content type of an exception report.
pub const EXCEPTION_CONTENT_TYPE: &str = "application/xml";

/// Render an OWS ExceptionReport for a code and message.
///
/// The message is XML-escaped; the code is one of the fixed OWS codes.
pub fn exception_xml(code: &str, message: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<ows:ExceptionReport xmlns:ows="http://www.opengis.net/ows/1.1" version="1.0.0" xml:lang="en">
  <ows:Exception exceptionCode="{}">
    <ows:ExceptionText>{}</ows:ExceptionText>
  </ows:Exception>
</ows:ExceptionReport>
"#,
        escape(code),
        escape(message)
    )
}

/// Render the exception report for a pipeline error.
pub fn exception_report(err: &WmtsError) -> String {
    exception_xml(err.exception_code(), &err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_report_layout() {
        let xml = exception_report(&WmtsError::missing("layer"));
        assert!(xml.starts_with("<?xml version=\"1.0\"?>\n<ows:ExceptionReport"));
        assert!(xml.contains(r#"xmlns:ows="http://www.opengis.net/ows/1.1""#));
        assert!(xml.contains(r#"version="1.0.0" xml:lang="en""#));
        assert!(xml.contains(r#"<ows:Exception exceptionCode="MissingParameterValue">"#));
        assert!(xml.contains("<ows:ExceptionText>Missing parameter(s): layer</ows:ExceptionText>"));
    }

    #[test]
    fn test_message_is_escaped() {
        let xml = exception_report(&WmtsError::invalid("infoformat", "<b>&\"x\""));
        assert!(xml.contains("&lt;b&gt;&amp;&quot;x&quot;"));
        assert!(!xml.contains("<b>"));
    }

    #[test]
    fn test_exception_report_parses() {
        let xml = exception_report(&WmtsError::Internal("boom & bust".into()));
        let mut reader = quick_xml::Reader::from_str(&xml);
        let mut text = String::new();
        loop {
            match reader.read_event().unwrap() {
                quick_xml::events::Event::Text(t) => {
                    let t = t.unescape().unwrap();
                    if !t.trim().is_empty() {
                        text = t.into_owned();
                    }
                }
                quick_xml::events::Event::Eof => break,
                _ => {}
            }
        }
        assert_eq!(text, "Internal server error: boom & bust");
    }
}
