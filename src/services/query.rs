use chrono::{DateTime, SecondsFormat, Utc};

use crate::core::{
    choice::choice_enum,
    xml::{XmlMap, XmlValue},
};

choice_enum! {
    DateType("date type") {
        CreatedAt => "CreatedAt",
        UpdatedAt => "UpdatedAt",
    }
}

/// Date window shared by the `*_query` services. Either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFilter {
    pub kind: DateType,
    pub min: Option<DateTime<Utc>>,
    pub max: Option<DateTime<Utc>>,
}

impl DateFilter {
    pub fn to_element(&self) -> XmlMap {
        let mut date = XmlMap::new();
        date.insert("@type".to_string(), XmlValue::text(self.kind.as_str()));
        if let Some(min) = self.min {
            date.insert("min".to_string(), XmlValue::text(format_date(min)));
        }
        if let Some(max) = self.max {
            date.insert("max".to_string(), XmlValue::text(format_date(max)));
        }
        date
    }
}

fn format_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Wraps a request root into a single-root document.
pub(crate) fn document(name: &str, root: XmlMap) -> XmlMap {
    let mut document = XmlMap::new();
    document.insert(name.to_string(), XmlValue::Map(root));
    document
}
