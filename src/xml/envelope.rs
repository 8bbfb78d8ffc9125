pub const XML_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Wraps `body` verbatim in the SOAP envelope. The fragment is neither escaped
/// nor validated.
pub fn wrap(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
    <soap:Body>
        {body}
    </soap:Body>
</soap:Envelope>"#
    )
}

/// Placeholder service description served on `?wsdl`.
pub fn wsdl_placeholder(service: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/" name="{service}">
    <!-- operations are dispatched by local element name -->
    <message name="Simple WSDL - implement full WSDL as needed"/>
</definitions>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_embedded_verbatim() {
        let envelope = wrap("<ping>a & b</ping>");
        assert!(envelope.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(envelope.contains("<soap:Body>\n        <ping>a & b</ping>\n    </soap:Body>"));
        assert!(envelope.ends_with("</soap:Envelope>"));
    }

    #[test]
    fn wrapped_fragment_parses_back() {
        let envelope = wrap("<new_package_response><status>Success</status></new_package_response>");
        let doc = roxmltree::Document::parse(&envelope).unwrap();
        assert_eq!(doc.root_element().tag_name().name(), "Envelope");
    }
}
