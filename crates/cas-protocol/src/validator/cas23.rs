//! CAS 2.0/3.0 XML validation.

use async_trait::async_trait;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::response::{CasResponse, CasResponseType};

use super::TicketValidator;

/// Namespace of the CAS service response schema.
pub const CAS_NAMESPACE: &str = "http://www.yale.edu/tp/cas";

/// The CAS 2.0/3.0 implementation of [`TicketValidator`].
///
/// Recognizes a `cas:serviceResponse` document containing
/// `cas:authenticationSuccess` with a `cas:user` child. Released
/// attributes, the proxy-granting ticket IOU, and the proxy list are
/// copied into the response projection. An `authenticationFailure`
/// document contributes its code and message for diagnostics but yields no
/// result, exactly like malformed XML.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cas23TicketValidator;

#[async_trait]
impl TicketValidator for Cas23TicketValidator {
    async fn validate(&self, response: &mut CasResponse) -> bool {
        let Some(parsed) = parse_service_response(&response.data) else {
            return false;
        };

        match parsed.username {
            Some(username) => {
                response.response_type = CasResponseType::ServiceValidate;
                response.username = username;
                for (key, value) in parsed.attributes {
                    response.attributes.insert(key, value);
                }
                response.proxy_granting_ticket = parsed.proxy_granting_ticket;
                response.proxies = parsed.proxies;
                true
            }
            None => {
                response.failure_code = parsed.failure_code;
                response.error = parsed.failure_message;
                false
            }
        }
    }
}

/// Fields pulled out of a `cas:serviceResponse` document.
#[derive(Debug, Default)]
struct ServiceResponse {
    username: Option<String>,
    attributes: Vec<(String, String)>,
    proxy_granting_ticket: Option<String>,
    proxies: Vec<String>,
    failure_code: Option<String>,
    failure_message: Option<String>,
}

/// Walks the document, collecting the elements the protocol defines.
///
/// Returns `None` on any XML error; the caller treats that the same as a
/// failure document.
fn parse_service_response(data: &str) -> Option<ServiceResponse> {
    let mut reader = NsReader::from_str(data);
    let mut out = ServiceResponse::default();
    // Open elements, root first: (resolved to the CAS namespace, local name).
    let mut path: Vec<(bool, String)> = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_resolved_event().ok()? {
            (ns, Event::Start(start)) => {
                let cas = is_cas(&ns);
                let local = local_name(&start);
                if cas && local == "authenticationFailure" && path_is(&path, &["serviceResponse"])
                {
                    out.failure_code = attribute_value(&start, "code");
                }
                path.push((cas, local));
                text.clear();
            }
            (ns, Event::Empty(start)) => {
                path.push((is_cas(&ns), local_name(&start)));
                record(&mut out, &path, "");
                path.pop();
            }
            (_, Event::Text(t)) => text.push_str(&t.unescape().ok()?),
            (_, Event::CData(t)) => text.push_str(&String::from_utf8_lossy(&t.into_inner())),
            (_, Event::End(_)) => {
                record(&mut out, &path, &text);
                text.clear();
                path.pop();
            }
            (_, Event::Eof) => break,
            _ => {}
        }
    }

    Some(out)
}

/// Records the text content of the element currently closing.
fn record(out: &mut ServiceResponse, path: &[(bool, String)], text: &str) {
    if path_is(path, &["serviceResponse", "authenticationSuccess", "user"]) {
        out.username = Some(text.to_string());
    } else if path_is(
        path,
        &["serviceResponse", "authenticationSuccess", "proxyGrantingTicket"],
    ) {
        out.proxy_granting_ticket = Some(text.to_string());
    } else if path_is(
        path,
        &["serviceResponse", "authenticationSuccess", "proxies", "proxy"],
    ) {
        out.proxies.push(text.to_string());
    } else if path_is(path, &["serviceResponse", "authenticationFailure"]) {
        out.failure_message = Some(text.trim().to_string());
    } else if let Some(key) = attribute_key(path) {
        // Duplicate keys overwrite earlier entries in document order once
        // folded into the response map.
        out.attributes.push((key.to_string(), text.to_string()));
    }
}

/// Matches a path of CAS-namespaced elements by local name.
fn path_is(path: &[(bool, String)], expected: &[&str]) -> bool {
    path.len() == expected.len()
        && path
            .iter()
            .zip(expected)
            .all(|((cas, name), want)| *cas && name == want)
}

/// The attribute key when the path is a child of `cas:attributes`.
///
/// Attribute entries are keyed by the child's local name whatever its
/// namespace.
fn attribute_key(path: &[(bool, String)]) -> Option<&str> {
    if path.len() == 4
        && path_is(
            &path[..3],
            &["serviceResponse", "authenticationSuccess", "attributes"],
        )
    {
        Some(path[3].1.as_str())
    } else {
        None
    }
}

fn is_cas(resolve: &ResolveResult<'_>) -> bool {
    match resolve {
        ResolveResult::Bound(Namespace(ns)) => *ns == CAS_NAMESPACE.as_bytes(),
        _ => false,
    }
}

fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn attribute_value(start: &BytesStart<'_>, name: &str) -> Option<String> {
    let attribute = start.try_get_attribute(name).ok()??;
    attribute.unescape_value().ok().map(|v| v.into_owned())
}
