use std::{fmt, sync::LazyLock};

use regex::Regex;
use xmltree::{Element, XMLNode};

use crate::core::{
    error::Result,
    xml::{XmlMap, XmlValue, xml_to_dict},
};

static CLARK_NAMESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]+\}").expect("clark pattern is valid"));

/// Error reported by the API, either as the document root or as a child of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// A parsed API reply.
pub struct Response {
    xml: String,
    dict: XmlMap,
    element: Element,
    tag: String,
}

impl Response {
    pub fn new(xml: impl Into<String>) -> Result<Self> {
        let xml = xml.into();
        let dict = xml_to_dict(&xml)?;
        let element = Element::parse(xml.as_bytes())?;
        let tag = local_name(&clark_name(&element)).to_string();
        Ok(Self { xml, dict, element, tag })
    }

    pub fn xml(&self) -> &str {
        &self.xml
    }

    pub fn dict(&self) -> &XmlMap {
        &self.dict
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The root element's mapping, unless the root only holds text.
    pub fn root(&self) -> Option<&XmlMap> {
        self.dict.values().next().and_then(XmlValue::as_map)
    }

    pub fn status(&self) -> Option<&str> {
        self.root()?.get("@status").and_then(XmlValue::as_text)
    }

    /// Text of the first element named `name`, searching the whole document.
    pub fn find_text(&self, name: &str) -> Option<String> {
        find_element(&self.element, name)
            .map(|element| element.get_text().map(|text| text.trim().to_string()).unwrap_or_default())
    }

    pub fn api_error(&self) -> Option<ApiError> {
        let error = if self.element.name == "error" {
            &self.element
        } else {
            self.element.get_child("error")?
        };
        Some(ApiError {
            code: error.attributes.get("code").cloned().unwrap_or_default(),
            message: error.get_text().map(|text| text.trim().to_string()).unwrap_or_default(),
        })
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.xml)
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Response: {}>", self.tag)
    }
}

fn clark_name(element: &Element) -> String {
    match &element.namespace {
        Some(namespace) => format!("{{{namespace}}}{}", element.name),
        None => element.name.clone(),
    }
}

/// Strips a leading `{namespace}` from a Clark-notation name.
pub fn local_name(name: &str) -> &str {
    match CLARK_NAMESPACE.find(name) {
        Some(found) if found.start() == 0 => &name[found.end()..],
        _ => name,
    }
}

fn find_element<'a>(element: &'a Element, name: &str) -> Option<&'a Element> {
    element.children.iter().find_map(|node| match node {
        XMLNode::Element(child) if child.name == name => Some(child),
        XMLNode::Element(child) => find_element(child, name),
        _ => None,
    })
}
