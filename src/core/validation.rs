//! Shallow structural checks on parsed requests and responses.

use std::{collections::BTreeSet, fmt};

use thiserror::Error;

use crate::core::{
    error::{Error, Result},
    xml::{XmlMap, XmlValue, is_attribute, xml_to_dict},
};

/// Root attributes that legitimately change from one call to the next.
pub const CREDENTIAL_KEYS: [&str; 3] = ["@shop_id", "@partner_id", "@token"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyMismatch {
    #[error("dictionary is empty")]
    Empty,
    #[error("dictionary contains no valid keys")]
    NoValidKeys,
    #[error("invalid keys: {}", join_keys(.0))]
    InvalidKeys(BTreeSet<String>),
}

fn join_keys(keys: &BTreeSet<String>) -> String {
    keys.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Checks that every element key of `map` belongs to `expected`.
///
/// Attribute keys are ignored and missing expected keys are tolerated.
pub fn validate_keys<'a, I>(map: &XmlMap, expected: I) -> std::result::Result<(), KeyMismatch>
where
    I: IntoIterator<Item = &'a str>,
{
    if map.is_empty() {
        return Err(KeyMismatch::Empty);
    }

    let keys: BTreeSet<&str> =
        map.keys().map(String::as_str).filter(|key| !is_attribute(key)).collect();
    if keys.is_empty() {
        return Err(KeyMismatch::NoValidKeys);
    }

    let expected: BTreeSet<&str> = expected.into_iter().collect();
    let invalid: BTreeSet<String> =
        keys.difference(&expected).map(|key| key.to_string()).collect();
    if invalid.is_empty() { Ok(()) } else { Err(KeyMismatch::InvalidKeys(invalid)) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDiff {
    pub key: String,
    pub expected: Option<XmlValue>,
    pub actual: Option<XmlValue>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct RequestDiff {
    pub root: String,
    pub mismatches: Vec<KeyDiff>,
}

impl fmt::Display for RequestDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} differing key(s) in <{}>", self.mismatches.len(), self.root)?;
        for diff in &self.mismatches {
            write!(f, "\n  {}: expected {:?}, got {:?}", diff.key, diff.expected, diff.actual)?;
        }
        Ok(())
    }
}

/// Compares `actual` against `expected` key by key, skipping `excluded`.
///
/// Keys present only in `actual` are not reported.
pub fn validate_request(
    actual: &XmlMap,
    expected: &XmlMap,
    excluded: &[&str],
) -> std::result::Result<(), RequestDiff> {
    let mismatches: Vec<KeyDiff> = expected
        .iter()
        .filter(|(key, _)| !excluded.contains(&key.as_str()))
        .filter(|(key, value)| actual.get(key.as_str()) != Some(*value))
        .map(|(key, value)| KeyDiff {
            key: key.clone(),
            expected: Some(value.clone()),
            actual: actual.get(key.as_str()).cloned(),
        })
        .collect();

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(RequestDiff { root: String::new(), mismatches })
    }
}

/// Compares two request documents, ignoring the credential attributes.
pub fn validate_request_xml(actual_xml: &str, expected_xml: &str) -> Result<()> {
    let actual = xml_to_dict(actual_xml)?;
    let expected = xml_to_dict(expected_xml)?;

    let (Some((actual_root, actual_value)), Some((expected_root, expected_value))) =
        (actual.first(), expected.first())
    else {
        return Err(KeyMismatch::Empty.into());
    };

    if actual_root != expected_root {
        return Err(Error::RequestMismatch(RequestDiff {
            root: expected_root.clone(),
            mismatches: vec![KeyDiff {
                key: "root".to_string(),
                expected: Some(XmlValue::text(expected_root.as_str())),
                actual: Some(XmlValue::text(actual_root.as_str())),
            }],
        }));
    }

    let empty = XmlMap::new();
    let actual_map = actual_value.as_map().unwrap_or(&empty);
    let expected_map = match expected_value {
        XmlValue::Map(map) => map,
        other => {
            return if actual_value == other {
                Ok(())
            } else {
                Err(Error::RequestMismatch(RequestDiff {
                    root: expected_root.clone(),
                    mismatches: vec![KeyDiff {
                        key: expected_root.clone(),
                        expected: Some(other.clone()),
                        actual: Some(actual_value.clone()),
                    }],
                }))
            };
        }
    };

    validate_request(actual_map, expected_map, &CREDENTIAL_KEYS)
        .map_err(|diff| RequestDiff { root: expected_root.clone(), ..diff }.into())
}
