//! Transcoding between XML documents and ordered key/value mappings.
//!
//! The mapping convention follows the usual "xml-to-dict" layout:
//!
//! - keys starting with `@` are attributes of the enclosing element,
//! - the `#text` key holds the text content of an element that also has
//!   attributes or children,
//! - any other key is a child element; repeated siblings become a `List`.
//!
//! An element with neither attributes nor children is represented by its text
//! alone. A map holding only `#text`, or a single-item list, is therefore
//! normalized to a scalar on the way back from XML.

use std::{borrow::Cow, sync::LazyLock};

use indexmap::IndexMap;
use quick_xml::{
    Reader, Writer,
    escape::resolve_predefined_entity,
    events::{BytesDecl, BytesEnd, BytesRef, BytesStart, BytesText, Event},
};
use regex::Regex;
use serde::Serialize;

use crate::core::error::{Error, Result};

pub const ATTRIBUTE_PREFIX: char = '@';
pub const TEXT_KEY: &str = "#text";

static NAMESPACE_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#" xmlns="[^"]+""#).expect("namespace pattern is valid"));

pub type XmlMap = IndexMap<String, XmlValue>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum XmlValue {
    Text(String),
    Map(XmlMap),
    List(Vec<XmlValue>),
}

impl XmlValue {
    pub fn text(value: impl Into<String>) -> Self {
        XmlValue::Text(value.into())
    }

    /// Wraps repeated sibling values: one item stays a scalar/map, several become a `List`.
    pub fn from_items(mut items: Vec<XmlValue>) -> Self {
        if items.len() == 1 { items.remove(0) } else { XmlValue::List(items) }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmlValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&XmlMap> {
        match self {
            XmlValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[XmlValue]> {
        match self {
            XmlValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Text of the element, whether stored as a scalar or under `#text`.
    pub fn text_content(&self) -> Option<&str> {
        match self {
            XmlValue::Text(text) => Some(text),
            XmlValue::Map(map) => map.get(TEXT_KEY).and_then(XmlValue::as_text),
            XmlValue::List(_) => None,
        }
    }

    /// Iterates a value that may be either a single element or repeated siblings.
    pub fn iter_items(&self) -> std::slice::Iter<'_, XmlValue> {
        match self {
            XmlValue::List(items) => items.iter(),
            single => std::slice::from_ref(single).iter(),
        }
    }
}

impl From<&str> for XmlValue {
    fn from(value: &str) -> Self {
        XmlValue::Text(value.to_string())
    }
}

impl From<String> for XmlValue {
    fn from(value: String) -> Self {
        XmlValue::Text(value)
    }
}

impl From<XmlMap> for XmlValue {
    fn from(value: XmlMap) -> Self {
        XmlValue::Map(value)
    }
}

impl From<Vec<XmlValue>> for XmlValue {
    fn from(value: Vec<XmlValue>) -> Self {
        XmlValue::List(value)
    }
}

pub fn is_attribute(key: &str) -> bool {
    key.starts_with(ATTRIBUTE_PREFIX)
}

/// Removes the first ` xmlns="..."` declaration from `xml`.
///
/// Only one declaration is removed. Prefixed (`xmlns:ns="..."`) and
/// single-quoted declarations are left untouched.
pub fn remove_namespace(xml: &str) -> Cow<'_, str> {
    NAMESPACE_DECLARATION.replace(xml, "")
}

/// Serializes `map` into a pretty-printed document and strips its namespace.
pub fn dict_to_xml(map: &XmlMap) -> Result<String> {
    let xml = to_xml_document(map)?;
    Ok(remove_namespace(&xml).into_owned())
}

/// Serializes `map` into a pretty-printed document, namespace included.
pub fn to_xml_document(map: &XmlMap) -> Result<String> {
    let mut entries = map.iter();
    let (name, value) = match (entries.next(), entries.next()) {
        (Some(root), None) => root,
        _ => {
            return Err(serialization(format!(
                "document must have exactly one root, found {} entries",
                map.len()
            )));
        }
    };
    if matches!(value, XmlValue::List(_)) {
        return Err(serialization(format!("document root '{name}' cannot be a list")));
    }
    if is_attribute(name) || name == TEXT_KEY {
        return Err(serialization(format!("document root '{name}' must be an element")));
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(serialization)?;
    write_element(&mut writer, name, value)?;

    String::from_utf8(writer.into_inner()).map_err(serialization)
}

/// Parses `xml` into a mapping, after stripping its namespace.
///
/// Names are kept as written, so prefixed elements and attributes map to
/// `prefix:name` and `@prefix:name`, and `xmlns:prefix` declarations to
/// `@xmlns:prefix`.
pub fn xml_to_dict(xml: &str) -> Result<XmlMap> {
    let stripped = remove_namespace(xml);
    let mut reader = Reader::from_str(&stripped);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Start(start) => {
                let frame = Frame::open(&reader, &start, &stack, &root)?;
                stack.push(frame);
            }
            Event::Empty(start) => {
                let frame = Frame::open(&reader, &start, &stack, &root)?;
                close_frame(&mut stack, &mut root, frame);
            }
            Event::End(_) => {
                let frame = stack.pop().ok_or_else(|| parse_error("unexpected closing tag"))?;
                close_frame(&mut stack, &mut root, frame);
            }
            Event::Text(text) => push_text(&mut stack, &text.xml_content().map_err(parse_error)?)?,
            Event::CData(data) => push_text(&mut stack, &data.xml_content().map_err(parse_error)?)?,
            Event::GeneralRef(reference) => push_text(&mut stack, &resolve_reference(&reference)?)?,
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(parse_error(format!("element '{}' is never closed", open.name)));
    }
    let (name, value) = root.ok_or_else(|| parse_error("document has no root element"))?;
    let mut map = XmlMap::new();
    map.insert(name, value);
    Ok(map)
}

fn parse_error(err: impl std::fmt::Display) -> Error {
    Error::Parse(err.to_string())
}

fn serialization(err: impl std::fmt::Display) -> Error {
    Error::Serialization(err.to_string())
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &XmlValue) -> Result<()> {
    if name.is_empty() {
        return Err(serialization("element name cannot be empty"));
    }

    match value {
        XmlValue::Text(text) => {
            writer.write_event(Event::Start(BytesStart::new(name))).map_err(serialization)?;
            writer.write_event(Event::Text(BytesText::new(text))).map_err(serialization)?;
            writer.write_event(Event::End(BytesEnd::new(name))).map_err(serialization)?;
        }
        XmlValue::Map(map) => {
            let mut start = BytesStart::new(name);
            let mut text = None;
            let mut children = Vec::new();

            for (key, child) in map {
                if let Some(attribute) = key.strip_prefix(ATTRIBUTE_PREFIX) {
                    let XmlValue::Text(attribute_value) = child else {
                        return Err(serialization(format!(
                            "attribute '{key}' of '{name}' must be text"
                        )));
                    };
                    if attribute.is_empty() {
                        return Err(serialization(format!("empty attribute name in '{name}'")));
                    }
                    start.push_attribute((attribute, attribute_value.as_str()));
                } else if key == TEXT_KEY {
                    let XmlValue::Text(content) = child else {
                        return Err(serialization(format!("'{TEXT_KEY}' of '{name}' must be text")));
                    };
                    text = Some(content.as_str());
                } else {
                    children.push((key.as_str(), child));
                }
            }

            writer.write_event(Event::Start(start)).map_err(serialization)?;
            // An empty text event keeps childless elements on one line.
            if text.is_some() || children.is_empty() {
                let content = text.unwrap_or_default();
                writer.write_event(Event::Text(BytesText::new(content))).map_err(serialization)?;
            }
            for (key, child) in children {
                write_element(writer, key, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name))).map_err(serialization)?;
        }
        XmlValue::List(items) => {
            if items.iter().any(|item| matches!(item, XmlValue::List(_))) {
                return Err(serialization(format!("'{name}' contains a nested list")));
            }
            let maps = items.iter().filter(|item| matches!(item, XmlValue::Map(_))).count();
            if maps != 0 && maps != items.len() {
                return Err(serialization(format!("'{name}' mixes text and mapping items")));
            }
            for item in items {
                write_element(writer, name, item)?;
            }
        }
    }

    Ok(())
}

/// An element being read: its name, attributes and children so far, and its text.
struct Frame {
    name: String,
    map: XmlMap,
    text: String,
}

impl Frame {
    fn open(
        reader: &Reader<&[u8]>,
        start: &BytesStart,
        stack: &[Frame],
        root: &Option<(String, XmlValue)>,
    ) -> Result<Self> {
        let decoder = reader.decoder();
        let name = decoder.decode(start.name().as_ref()).map_err(parse_error)?.into_owned();
        if stack.is_empty() && root.is_some() {
            return Err(parse_error(format!("second root element '{name}'")));
        }

        let mut map = XmlMap::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(parse_error)?;
            let key = decoder.decode(attribute.key.as_ref()).map_err(parse_error)?;
            let value = attribute.decode_and_unescape_value(decoder).map_err(parse_error)?;
            map.insert(format!("{ATTRIBUTE_PREFIX}{key}"), XmlValue::text(value));
        }
        Ok(Self { name, map, text: String::new() })
    }

    fn into_value(self) -> XmlValue {
        let Frame { mut map, text, .. } = self;
        let text = text.trim();
        if map.is_empty() {
            return XmlValue::text(text);
        }
        if !text.is_empty() {
            map.insert(TEXT_KEY.to_string(), XmlValue::text(text));
        }
        XmlValue::Map(map)
    }
}

fn close_frame(stack: &mut [Frame], root: &mut Option<(String, XmlValue)>, frame: Frame) {
    let name = frame.name.clone();
    let value = frame.into_value();
    match stack.last_mut() {
        Some(parent) => insert_child(&mut parent.map, name, value),
        None => *root = Some((name, value)),
    }
}

fn push_text(stack: &mut [Frame], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(frame) => frame.text.push_str(text),
        None if text.trim().is_empty() => {}
        None => return Err(parse_error("text outside the root element")),
    }
    Ok(())
}

fn resolve_reference(reference: &BytesRef) -> Result<String> {
    if let Some(ch) = reference.resolve_char_ref().map_err(parse_error)? {
        return Ok(ch.to_string());
    }
    let name = reference.decode().map_err(parse_error)?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| parse_error(format!("unknown entity '&{name};'")))
}

fn insert_child(map: &mut XmlMap, name: String, value: XmlValue) {
    match map.get_mut(&name) {
        Some(XmlValue::List(items)) => items.push(value),
        Some(existing) => {
            let first = std::mem::replace(existing, XmlValue::List(Vec::new()));
            *existing = XmlValue::List(vec![first, value]);
        }
        None => {
            map.insert(name, value);
        }
    }
}
