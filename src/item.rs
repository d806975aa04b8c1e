use std::collections::BTreeMap;

use biblatex::{ChunksExt, Entry};

/// Anything that can be ordered by a named field.
///
/// A record has a type name (`article`, `book`, ...) and a set of optional fields. Field names
/// are looked up as given; implementors decide whether that lookup is case-sensitive.
pub trait Record {
    fn type_name(&self) -> String;
    fn field(&self, name: &str) -> Option<String>;
}

/// An owned, in-memory citation item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Item {
    pub key: String,
    pub item_type: String,
    pub fields: BTreeMap<String, String>,
}

impl Item {
    pub fn new(key: impl Into<String>, item_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            item_type: item_type.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder method to set a field
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

impl Record for Item {
    fn type_name(&self) -> String {
        self.item_type.clone()
    }

    fn field(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }
}

impl Record for Entry {
    fn type_name(&self) -> String {
        self.entry_type.to_string()
    }

    fn field(&self, name: &str) -> Option<String> {
        self.get(name).map(|chunks| chunks.format_verbatim())
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn type_name(&self) -> String {
        (**self).type_name()
    }

    fn field(&self, name: &str) -> Option<String> {
        (**self).field(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biblatex::Bibliography;

    #[test]
    fn item_reports_type_and_fields() {
        let item = Item::new("knuth84", "book").with_field("year", "1984");
        assert_eq!(item.type_name(), "book");
        assert_eq!(item.field("year").as_deref(), Some("1984"));
        assert_eq!(item.field("month"), None);
    }

    #[test]
    fn biblatex_entry_is_a_record() {
        let src = "@article{doe, author = {Jane Doe}, year = {1999}, title = {On {Things}}}";
        let bib = Bibliography::parse(src).expect("parse");
        let entry = bib.get("doe").expect("entry");
        assert_eq!(entry.type_name(), "article");
        assert_eq!(entry.field("year").as_deref(), Some("1999"));
        assert_eq!(entry.field("author").as_deref(), Some("Jane Doe"));
        assert_eq!(entry.field("editor"), None);
    }
}
