// Copyright (C) 2025-2026 Michael Herstine <sp1ff@pobox.com>
//
// This file is part of logstash-emit.
//
// logstash-emit is free software: you can redistribute it and/or modify it under the terms of the
// GNU General Public License as published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// mpdpopm is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even
// the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General
// Public License for more details.
//
// You should have received a copy of the GNU General Public License along with mpdpopm.  If not,
// see <http://www.gnu.org/licenses/>.

//! What gets emitted.
//!
//! A [`Payload`] is one of four shapes. Only the first two take part in the pipeline proper:
//!
//! - [`Payload::Map`]: a plain JSON object; metadata is merged in, it can be wrapped into an
//!   [`Event`], and it is subject to validation
//! - [`Payload::Event`]: a Logstash [`Event`]; metadata is appended & it is subject to validation
//! - [`Payload::List`]: a JSON array, emitted as-is
//! - [`Payload::Scalar`]: any other JSON value, emitted as-is

use crate::{
    error::{Error, Result},
    event::Event,
};

use backtrace::Backtrace;
use serde::Serialize;
use serde_json::{Map, Value};

/// The key under which process-wide metadata is merged
pub const METADATA: &str = "metadata";

/// Something to be emitted; serializes as the JSON value it holds.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Map(Map<String, Value>),
    Event(Event),
    List(Vec<Value>),
    Scalar(Value),
}

impl Payload {
    /// Convert anything serializable to a [`Payload`]
    pub fn from_serialize<T: Serialize + ?Sized>(x: &T) -> Result<Payload> {
        serde_json::to_value(x)
            .map(Payload::from)
            .map_err(|err| Error::Serialization {
                source: err,
                back: Backtrace::new(),
            })
    }
    /// Merge `metadata` in under the `metadata` key. Empty metadata is a no-op, as are the
    /// opaque shapes.
    pub fn merge_metadata(self, metadata: &Map<String, Value>) -> Payload {
        if metadata.is_empty() {
            return self;
        }
        match self {
            Payload::Map(mut m) => {
                m.insert(METADATA.to_string(), Value::Object(metadata.clone()));
                Payload::Map(m)
            }
            Payload::Event(mut ev) => {
                ev.set(METADATA, Value::Object(metadata.clone()));
                Payload::Event(ev)
            }
            other @ (Payload::List(_) | Payload::Scalar(_)) => other,
        }
    }
    /// Wrap a [`Payload::Map`] into an [`Event`]; everything else is returned unchanged.
    pub fn into_event(self) -> Payload {
        match self {
            Payload::Map(m) => Payload::Event(Event::new(m)),
            other => other,
        }
    }
    /// True for the shapes the pipeline looks inside of (maps & events)
    pub fn is_structured(&self) -> bool {
        matches!(self, Payload::Map(_) | Payload::Event(_))
    }
    /// Render this payload as a single line of compact JSON, terminated by `\n`
    pub fn to_line(&self) -> Result<Vec<u8>> {
        let mut line = serde_json::to_vec(self).map_err(|err| Error::Serialization {
            source: err,
            back: Backtrace::new(),
        })?;
        line.push(b'\n');
        Ok(line)
    }
}

impl std::convert::From<Value> for Payload {
    fn from(v: Value) -> Self {
        match v {
            Value::Object(m) => Payload::Map(m),
            Value::Array(a) => Payload::List(a),
            v => Payload::Scalar(v),
        }
    }
}

impl std::convert::From<Map<String, Value>> for Payload {
    fn from(m: Map<String, Value>) -> Self {
        Payload::Map(m)
    }
}

impl std::convert::From<Event> for Payload {
    fn from(ev: Event) -> Self {
        Payload::Event(ev)
    }
}

impl std::convert::From<Vec<Value>> for Payload {
    fn from(a: Vec<Value>) -> Self {
        Payload::List(a)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::validation::test::obj;
    use serde_json::json;

    fn metadata() -> Map<String, Value> {
        obj(json!({"namespace": "cooldude"}))
    }

    #[test]
    fn test_conversions() {
        assert!(matches!(Payload::from(json!({"a": 1})), Payload::Map(_)));
        assert!(matches!(Payload::from(json!([1, 2])), Payload::List(_)));
        assert!(matches!(Payload::from(json!("x")), Payload::Scalar(_)));
        assert!(matches!(Payload::from(json!(null)), Payload::Scalar(_)));
        assert!(Payload::from(json!({})).is_structured());
        assert!(!Payload::from(json!([])).is_structured());

        #[derive(Serialize)]
        struct Request<'a> {
            controller: &'a str,
            status: u16,
        }
        let p = Payload::from_serialize(&Request {
            controller: "users",
            status: 200,
        })
        .unwrap();
        assert_eq!(p, Payload::from(json!({"controller": "users", "status": 200})));

        // JSON object keys must be strings
        let mut bad = std::collections::BTreeMap::new();
        bad.insert((1, 2), "x");
        assert!(matches!(
            Payload::from_serialize(&bad),
            Err(Error::Serialization { .. })
        ));
    }

    #[test]
    fn test_merge_metadata() {
        let p = Payload::from(json!({"yolo": "brolo", "metadata": "overwritten"}))
            .merge_metadata(&metadata());
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            json!({"yolo": "brolo", "metadata": {"namespace": "cooldude"}})
        );

        let p = Payload::from(json!({"yolo": "brolo"})).merge_metadata(&Map::new());
        assert_eq!(p, Payload::from(json!({"yolo": "brolo"})));

        let p = Payload::from(json!([{"yolo": "brolo"}])).merge_metadata(&metadata());
        assert_eq!(p, Payload::from(json!([{"yolo": "brolo"}])));

        let p = Payload::Event(Event::new(Map::new())).merge_metadata(&metadata());
        match p {
            Payload::Event(ev) => {
                assert_eq!(ev.get(METADATA), Some(&json!({"namespace": "cooldude"})));
                assert_eq!(ev.get("@version"), Some(&json!("1")));
            }
            _ => panic!("expected an Event"),
        }
    }

    #[test]
    fn test_into_event() {
        assert!(matches!(
            Payload::from(json!({"yolo": "brolo"})).into_event(),
            Payload::Event(_)
        ));
        assert!(matches!(
            Payload::from(json!([1])).into_event(),
            Payload::List(_)
        ));
    }

    #[test]
    fn test_to_line() {
        let line = Payload::from(json!({"yolo": "brolo", "n": [1, 2]}))
            .to_line()
            .unwrap();
        assert_eq!(line, b"{\"yolo\":\"brolo\",\"n\":[1,2]}\n".to_vec());
    }
}
