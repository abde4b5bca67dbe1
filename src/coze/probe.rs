//! Ordered field probes for responses with no stable schema.
//!
//! The Coze API has returned file ids and prompt text under several
//! different field names over time. Each place we know to look is one
//! [`Probe`]; a table of probes is evaluated top to bottom and the first
//! non-empty string wins. New shapes get a new table row, nothing else.

use serde_json::Value;

/// One place a value may live in a loosely-structured JSON document.
#[derive(Debug, Clone, Copy)]
pub struct Probe {
    /// Dotted label used in logs, e.g. `data.file_info.id`.
    pub name: &'static str,
    /// Gate evaluated against the whole document before looking up `pointer`.
    pub check: fn(&Value) -> bool,
    /// RFC 6901 JSON pointer to the candidate value.
    pub pointer: &'static str,
}

impl Probe {
    /// A probe with no gate.
    pub const fn at(name: &'static str, pointer: &'static str) -> Self {
        Self {
            name,
            check: always,
            pointer,
        }
    }

    /// A probe that only applies when `check` holds for the document.
    pub const fn when(name: &'static str, check: fn(&Value) -> bool, pointer: &'static str) -> Self {
        Self {
            name,
            check,
            pointer,
        }
    }

    /// The non-empty string at this probe's location, if any.
    pub fn extract<'a>(&self, doc: &'a Value) -> Option<&'a str> {
        if !(self.check)(doc) {
            return None;
        }
        doc.pointer(self.pointer)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// A successful probe: which row matched and what it found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit<'a> {
    pub probe: &'static str,
    pub value: &'a str,
}

/// Evaluate `probes` in order against `doc`, stopping at the first match.
pub fn first_match<'a>(probes: &[Probe], doc: &'a Value) -> Option<Hit<'a>> {
    probes.iter().find_map(|probe| {
        probe.extract(doc).map(|value| Hit {
            probe: probe.name,
            value,
        })
    })
}

fn always(_: &Value) -> bool {
    true
}

/// `code == 0`, the service's success marker.
pub fn code_is_zero(doc: &Value) -> bool {
    doc.get("code").and_then(Value::as_i64) == Some(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TABLE: &[Probe] = &[
        Probe::when("data.id", code_is_zero, "/data/id"),
        Probe::at("id", "/id"),
    ];

    #[test]
    fn first_matching_row_wins() {
        let doc = json!({"code": 0, "data": {"id": "a"}, "id": "b"});
        let hit = first_match(TABLE, &doc).unwrap();
        assert_eq!(hit.probe, "data.id");
        assert_eq!(hit.value, "a");
    }

    #[test]
    fn gate_blocks_row() {
        let doc = json!({"code": 1, "data": {"id": "a"}, "id": "b"});
        let hit = first_match(TABLE, &doc).unwrap();
        assert_eq!(hit.probe, "id");
        assert_eq!(hit.value, "b");
    }

    #[test]
    fn empty_strings_do_not_match() {
        let doc = json!({"id": ""});
        assert!(first_match(TABLE, &doc).is_none());
    }

    #[test]
    fn non_string_values_do_not_match() {
        let doc = json!({"id": 42});
        assert!(first_match(TABLE, &doc).is_none());
        let doc = json!({"id": {"nested": "x"}});
        assert!(first_match(TABLE, &doc).is_none());
    }

    #[test]
    fn probes_on_scalars_find_nothing() {
        assert!(first_match(TABLE, &json!("just text")).is_none());
        assert!(first_match(TABLE, &Value::Null).is_none());
    }

    #[test]
    fn code_is_zero_requires_numeric_zero() {
        assert!(code_is_zero(&json!({"code": 0})));
        assert!(!code_is_zero(&json!({"code": "0"})));
        assert!(!code_is_zero(&json!({"code": 7})));
        assert!(!code_is_zero(&json!({})));
    }
}
