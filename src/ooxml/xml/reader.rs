/// Build an element tree from XML bytes.
use super::tree::{Element, Node, XmlPart};
use crate::common::xml::unescape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parse a complete XML part.
///
/// Whitespace inside elements is significant in WordprocessingML (`w:t` text
/// may begin or end with spaces), so text is never trimmed. Entity and
/// character references are decoded.
///
/// # Errors
///
/// Returns `OoxmlError::Xml` for malformed markup, unbalanced tags, invalid
/// UTF-8 or a document without a root element.
pub fn parse(bytes: &[u8]) -> Result<XmlPart> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(false);

    let mut declaration = None;
    let mut root = None;
    let mut stack: Vec<Element> = Vec::with_capacity(32);
    // Raw (still escaped) character data since the last markup event.
    let mut pending = String::new();
    let mut buf = Vec::with_capacity(1024);

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Decl(decl)) => {
                declaration = Some(std::str::from_utf8(&decl)?.trim().to_string());
            },
            Ok(Event::Start(e)) => {
                flush_text(&mut pending, &mut stack);
                stack.push(element_from(&e)?);
            },
            Ok(Event::Empty(e)) => {
                flush_text(&mut pending, &mut stack);
                let element = element_from(&e)?;
                attach(element, &mut stack, &mut root)?;
            },
            Ok(Event::End(e)) => {
                flush_text(&mut pending, &mut stack);
                let element = stack.pop().ok_or_else(|| {
                    OoxmlError::Xml(format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    ))
                })?;
                attach(element, &mut stack, &mut root)?;
            },
            Ok(Event::Text(e)) => {
                pending.push_str(std::str::from_utf8(&e)?);
            },
            Ok(Event::GeneralRef(e)) => {
                pending.push('&');
                pending.push_str(std::str::from_utf8(&e)?);
                pending.push(';');
            },
            Ok(Event::CData(e)) => {
                flush_text(&mut pending, &mut stack);
                push_node(&mut stack, Node::CData(std::str::from_utf8(&e)?.to_string()));
            },
            Ok(Event::Comment(e)) => {
                flush_text(&mut pending, &mut stack);
                push_node(&mut stack, Node::Comment(std::str::from_utf8(&e)?.to_string()));
            },
            Ok(Event::PI(e)) => {
                flush_text(&mut pending, &mut stack);
                push_node(
                    &mut stack,
                    Node::Instruction(std::str::from_utf8(&e)?.to_string()),
                );
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(OoxmlError::Xml(format!(
                    "at byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            },
            _ => {},
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(OoxmlError::Xml(format!(
            "unclosed element <{}>",
            stack[stack.len() - 1].name
        )));
    }

    let root = root.ok_or_else(|| OoxmlError::Xml("document has no root element".to_string()))?;
    Ok(XmlPart { declaration, root })
}

fn element_from(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(std::str::from_utf8(start.name().as_ref())?);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| OoxmlError::Xml(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let raw = std::str::from_utf8(&attr.value)?;
        element.attrs.push((key, unescape_xml(raw).into_owned()));
    }
    Ok(element)
}

/// Text outside the root element (whitespace between the prolog and root) is dropped.
fn flush_text(pending: &mut String, stack: &mut [Element]) {
    if pending.is_empty() {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        let text = unescape_xml(pending).into_owned();
        match parent.children.last_mut() {
            Some(Node::Text(prev)) => prev.push_str(&text),
            _ => parent.children.push(Node::Text(text)),
        }
    }
    pending.clear();
}

fn push_node(stack: &mut [Element], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

fn attach(element: Element, stack: &mut [Element], root: &mut Option<Element>) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(OoxmlError::Xml(format!(
                "second root element <{}>",
                element.name
            )));
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_whitespace_and_decodes() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:p xmlns:w="urn:w"><w:r><w:t xml:space="preserve"> A &amp; B </w:t></w:r></w:p>"#;
        let part = parse(xml).unwrap();
        assert_eq!(
            part.declaration.as_deref(),
            Some(r#"xml version="1.0" encoding="UTF-8" standalone="yes""#)
        );
        assert!(part.root.is("p"));
        let t = part.root.descendant("t").unwrap();
        assert_eq!(t.text(), " A & B ");
        assert_eq!(t.attr("space"), Some("preserve"));
    }

    #[test]
    fn test_parse_decodes_attribute_values() {
        let part = parse(br#"<a href="x?y=1&amp;z=2"/>"#).unwrap();
        assert_eq!(part.root.attr("href"), Some("x?y=1&z=2"));
    }

    #[test]
    fn test_parse_rejects_unbalanced() {
        assert!(parse(b"<a><b></a>").is_err());
        assert!(parse(b"<a><b>").is_err());
        assert!(parse(b"").is_err());
    }
}
