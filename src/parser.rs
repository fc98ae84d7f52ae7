use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesStart, Event};

use crate::error::ParseError;
use crate::gpx_types::GpxData;
use crate::interpreter::{ParseEvent, ParserContext};

type Result<T> = std::result::Result<T, ParseError>;

/// Anything shorter cannot hold a GPX document.
pub const MIN_BUFFER_LEN: usize = 10;

/// Parse a GPX document held in memory.
///
/// All `<trkpt>` elements are flattened into one track in document order.
/// Broken points are skipped and listed in [`GpxData::diagnostics`]; only
/// an unusable buffer or XML that is not well-formed fails the call.
pub fn parse_gpx(buffer: &[u8]) -> Result<GpxData> {
    if buffer.len() < MIN_BUFFER_LEN {
        tracing::debug!(len = buffer.len(), "GPX buffer too small");
        return Err(ParseError::BufferTooSmall { len: buffer.len() });
    }

    let mut reader = Reader::from_reader(buffer);
    reader.config_mut().expand_empty_elements = true;

    let mut context = ParserContext::new();
    let mut text = String::new();
    let mut depth: usize = 0;
    let mut seen_root = false;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(
                    position = reader.error_position(),
                    error = %e,
                    "GPX is not well-formed"
                );
                return Err(ParseError::Xml(e));
            }
        };

        match event {
            Event::Start(e) => {
                flush_text(&mut context, &mut text);
                if seen_root && depth == 0 {
                    return Err(ill_formed("element after the end of the root element"));
                }
                seen_root = true;
                depth += 1;

                let local = e.local_name();
                let name = as_utf8(local.as_ref())?;
                let owned = collect_attributes(&e)?;
                let attributes: Vec<(&str, &str)> = owned
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str()))
                    .collect();
                context.handle(ParseEvent::Start {
                    name,
                    attributes: &attributes,
                });
            }
            Event::End(e) => {
                flush_text(&mut context, &mut text);
                depth = depth.saturating_sub(1);

                let local = e.local_name();
                let name = as_utf8(local.as_ref())?;
                context.handle(ParseEvent::End { name });
            }
            Event::Text(e) => {
                let raw = as_utf8(e.as_ref())?;
                if depth == 0 {
                    if !raw
                        .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
                        .is_empty()
                    {
                        return Err(ill_formed("text outside of the root element"));
                    }
                } else {
                    text.push_str(raw);
                }
            }
            Event::CData(e) => {
                if depth == 0 {
                    return Err(ill_formed("CDATA outside of the root element"));
                }
                text.push_str(as_utf8(e.as_ref())?);
            }
            Event::GeneralRef(e) => {
                if depth == 0 {
                    return Err(ill_formed("entity reference outside of the root element"));
                }
                push_reference(&mut text, &e)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(ill_formed("document contains no elements"));
    }
    if depth != 0 {
        return Err(ill_formed("document ended with unclosed elements"));
    }

    let data = context.finish();
    tracing::debug!(
        points = data.track.len(),
        diagnostics = data.diagnostics.len(),
        "Parsed GPX track"
    );
    Ok(data)
}

/// Read a GPX file into memory and parse it.
pub fn parse_file(path: impl AsRef<Path>) -> Result<GpxData> {
    let path = path.as_ref();
    let buffer = std::fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_gpx(&buffer)
}

/// Hand accumulated character data to the interpreter as a single event.
fn flush_text(context: &mut ParserContext, text: &mut String) {
    if !text.is_empty() {
        context.handle(ParseEvent::Text(text.as_str()));
        text.clear();
    }
}

/// Attributes of a start tag as (local name, unescaped value) pairs.
fn collect_attributes(start: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut attributes = Vec::new();
    for attr_result in start.attributes() {
        let attr = attr_result.map_err(|e| ParseError::Xml(e.into()))?;
        let key = as_utf8(attr.key.local_name().as_ref())?.to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| ill_formed(format!("invalid value for attribute '{key}': {e}")))?;
        attributes.push((key, value.into_owned()));
    }
    Ok(attributes)
}

/// Resolve a character reference (`&#60;`, `&#x3C;`) or predefined entity.
fn push_reference(text: &mut String, reference: &BytesRef<'_>) -> Result<()> {
    let name = as_utf8(reference.as_ref())?;
    let char_ref = reference
        .resolve_char_ref()
        .map_err(|e| ill_formed(format!("invalid character reference '&{name};': {e}")))?;
    if let Some(ch) = char_ref {
        text.push(ch);
        return Ok(());
    }

    // Predefined XML entities: amp, lt, gt, quot, apos
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        _ => return Err(ill_formed(format!("unknown entity '&{name};'"))),
    };
    text.push(ch);
    Ok(())
}

fn as_utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| ill_formed(format!("invalid UTF-8: {e}")))
}

fn ill_formed(message: impl Into<String>) -> ParseError {
    ParseError::IllFormed(message.into())
}
