//! Element-path mapping and XML parsing for extension manifests.
//!
//! The mapping from XML element paths to record attributes lives in
//! [`FIELD_MAP`] as plain data. The parser walks the document with a
//! `quick-xml` event reader, tracks the element path below `<extension>`, and
//! commits the text of any element whose path appears in the table.

use super::{ManifestRecord, SchemaEntry, UpdateServer};
use crate::utils::{ExplorerError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Root element every manifest must have.
pub const ROOT_ELEMENT: &str = "extension";

/// Record attribute targeted by a mapped element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Version,
    Author,
    AuthorEmail,
    AuthorUrl,
    License,
    CreationDate,
    Description,
    ScriptFile,
    SchemaPath,
    Folder,
    File,
    UpdateServer,
}

/// Element path below the root → record attribute.
pub const FIELD_MAP: &[(&str, Field)] = &[
    ("name", Field::Name),
    ("version", Field::Version),
    ("author", Field::Author),
    ("authorEmail", Field::AuthorEmail),
    ("authorUrl", Field::AuthorUrl),
    ("license", Field::License),
    ("creationDate", Field::CreationDate),
    ("description", Field::Description),
    ("scriptfile", Field::ScriptFile),
    ("update/schemas/schemapath", Field::SchemaPath),
    ("fileset/files/folder", Field::Folder),
    ("fileset/files/file", Field::File),
    ("updateservers/server", Field::UpdateServer),
];

impl Field {
    /// Find the field mapped to an element path such as `fileset/files/file`.
    pub fn lookup(path: &str) -> Option<Field> {
        FIELD_MAP
            .iter()
            .find(|(mapped, _)| *mapped == path)
            .map(|(_, field)| *field)
    }

    /// Attribute read alongside the element text, if any.
    pub fn attribute(self) -> Option<&'static str> {
        match self {
            Field::SchemaPath => Some("type"),
            Field::UpdateServer => Some("name"),
            _ => None,
        }
    }

    /// Store one element's value. Scalars are overwritten, lists appended.
    pub fn apply(self, record: &mut ManifestRecord, text: String, attribute: String) {
        match self {
            Field::Name => record.name = text,
            Field::Version => record.version = text,
            Field::Author => record.author.name = text,
            Field::AuthorEmail => record.author.email = text,
            Field::AuthorUrl => record.author.url = text,
            Field::License => record.license = text,
            Field::CreationDate => record.creation_date = text,
            Field::Description => record.description = text,
            Field::ScriptFile => record.script_file = text,
            Field::SchemaPath => record.schemas.push(SchemaEntry {
                kind: attribute,
                path: text,
            }),
            Field::Folder => record.folders.push(text),
            Field::File => record.files.push(text),
            Field::UpdateServer => record.update_servers.push(UpdateServer {
                name: attribute,
                url: text,
            }),
        }
    }
}

/// Element currently being collected.
struct Capture {
    field: Field,
    depth: usize,
    text: String,
    attribute: String,
}

impl Capture {
    fn commit(self, record: &mut ManifestRecord) {
        self.field
            .apply(record, self.text.trim().to_string(), self.attribute);
    }
}

/// Parse raw manifest bytes into a [`ManifestRecord`].
///
/// Unknown elements are ignored. A wrong root element, mismatched tags or a
/// truncated document is a [`ExplorerError::Parse`].
pub fn parse_manifest(bytes: &[u8]) -> Result<ManifestRecord> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut capture: Option<Capture> = None;
    let mut record = ManifestRecord::default();
    let mut seen_root = false;

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(e) => {
                return Err(ExplorerError::Parse(format!(
                    "{} at position {}",
                    e,
                    reader.buffer_position()
                )))
            }
        };

        match event {
            Event::Start(e) => {
                let name = element_name(&e);
                if stack.is_empty() {
                    check_root(&name)?;
                    seen_root = true;
                }
                stack.push(name);

                if capture.is_none() {
                    if let Some(field) = mapped_field(&stack) {
                        capture = Some(Capture {
                            field,
                            depth: stack.len(),
                            text: String::new(),
                            attribute: field_attribute(&e, field)?,
                        });
                    }
                }
            }
            Event::Empty(e) => {
                let name = element_name(&e);
                if stack.is_empty() {
                    check_root(&name)?;
                    return Ok(record);
                }

                stack.push(name);
                if capture.is_none() {
                    if let Some(field) = mapped_field(&stack) {
                        field.apply(&mut record, String::new(), field_attribute(&e, field)?);
                    }
                }
                stack.pop();
            }
            Event::Text(t) => {
                if let Some(c) = capture.as_mut().filter(|c| c.depth == stack.len()) {
                    let text = t
                        .unescape()
                        .map_err(|e| ExplorerError::Parse(e.to_string()))?;
                    c.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(c) = capture.as_mut().filter(|c| c.depth == stack.len()) {
                    c.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                if capture.as_ref().is_some_and(|c| c.depth == stack.len()) {
                    if let Some(c) = capture.take() {
                        c.commit(&mut record);
                    }
                }
                stack.pop();
                if stack.is_empty() && seen_root {
                    return Ok(record);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    match stack.last() {
        Some(open) => Err(ExplorerError::Parse(format!(
            "unexpected end of document inside <{}>",
            open
        ))),
        None => Err(ExplorerError::Parse("document has no root element".to_string())),
    }
}

/// Element name without any namespace prefix.
fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn check_root(name: &str) -> Result<()> {
    if name == ROOT_ELEMENT {
        Ok(())
    } else {
        Err(ExplorerError::Parse(format!(
            "expected element <{}> but have <{}>",
            ROOT_ELEMENT, name
        )))
    }
}

/// Field for the innermost element of `stack`, skipping the root.
fn mapped_field(stack: &[String]) -> Option<Field> {
    let path = stack.get(1..)?.join("/");
    Field::lookup(&path)
}

fn field_attribute(e: &BytesStart<'_>, field: Field) -> Result<String> {
    let Some(key) = field.attribute() else {
        return Ok(String::new());
    };

    for attr in e.attributes() {
        let attr = attr.map_err(|err| ExplorerError::Parse(err.to_string()))?;
        if attr.key.local_name().as_ref() == key.as_bytes() {
            return attr
                .unescape_value()
                .map(|value| value.into_owned())
                .map_err(|err| ExplorerError::Parse(err.to_string()));
        }
    }

    Ok(String::new())
}
