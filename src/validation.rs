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

//! Validating payloads against a [`Contract`].
//!
//! # Introduction
//!
//! A [`Contract`] is whatever schema-checking machinery the application cares to plug in; this
//! crate only ever calls [`Contract::evaluate`] & looks at the [`ValidationResult`] it returns.
//! The outcome of validation is folded _into_ the emitted line rather than preventing it: a line
//! that fails validation is still logged, along with two diagnostic fields:
//!
//! - `dry_validation_success`: `true` or `false`
//! - `dry_validation_errors`: the contract's error map, as a string of JSON (`"{}"` on success)
//!
//! A contract that fails outright (returns `Err`) is a different matter: that aborts the emission
//! & the error is returned to the caller as [`Error::Contract`].
//!
//! # Merge order
//!
//! The contract sees the payload as a plain JSON object. Its output values (which may be coerced
//! or defaulted) are deep-merged over that object, the two diagnostic fields are set on top of
//! the result, and, when the payload was an [`Event`], its `@timestamp` & `@version` are put back.
//!
//! [`Event`]: crate::event::Event

use crate::{
    error::{BoxError, Error, Result},
    event::is_reserved,
    payload::Payload,
};

use backtrace::Backtrace;
use serde_json::{Map, Value};

type StdResult<T, E> = std::result::Result<T, E>;

pub const SUCCESS_FIELD: &str = "dry_validation_success";
pub const ERRORS_FIELD: &str = "dry_validation_errors";

/// What a [`Contract`] has to say about a payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationResult {
    values: Map<String, Value>,
    errors: Map<String, Value>,
}

impl ValidationResult {
    /// `values` are the contract's view of the input (possibly coerced); `errors` maps field
    /// names to whatever the contract uses to describe a problem (typically a list of messages).
    pub fn new(values: Map<String, Value>, errors: Map<String, Value>) -> ValidationResult {
        ValidationResult { values, errors }
    }
    /// A validation passes if & only if there are no errors
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }
    pub fn errors(&self) -> &Map<String, Value> {
        &self.errors
    }
}

/// A schema-validation capability.
///
/// Implement this for your schema library of choice. Closures of the form
/// `Fn(&Map<String, Value>) -> Result<ValidationResult, BoxError>` implement it, too.
pub trait Contract: Send + Sync {
    fn evaluate(&self, input: &Map<String, Value>) -> StdResult<ValidationResult, BoxError>;
}

impl<F> Contract for F
where
    F: Fn(&Map<String, Value>) -> StdResult<ValidationResult, BoxError> + Send + Sync,
{
    fn evaluate(&self, input: &Map<String, Value>) -> StdResult<ValidationResult, BoxError> {
        self(input)
    }
}

/// Recursively merge `overlay` into `base`: objects are merged key-by-key, anything else in
/// `overlay` replaces what's in `base`.
pub fn deep_merge(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(lhs)), Value::Object(rhs)) => deep_merge(lhs, rhs),
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Run `payload` past `contract`; maps & events come back as a [`Payload::Map`] carrying the
/// validation outcome, lists & scalars come back untouched.
pub fn validate(contract: &dyn Contract, payload: Payload) -> Result<Payload> {
    let (mut normalized, reserved) = match payload {
        Payload::Map(m) => (m, Vec::new()),
        Payload::Event(ev) => {
            let reserved = ev
                .fields()
                .iter()
                .filter(|(k, _)| is_reserved(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Vec<_>>();
            (ev.into_fields(), reserved)
        }
        other @ (Payload::List(_) | Payload::Scalar(_)) => return Ok(other),
    };

    let result = contract
        .evaluate(&normalized)
        .map_err(|err| Error::Contract {
            source: err,
            back: Backtrace::new(),
        })?;

    let errors = serde_json::to_string(result.errors()).map_err(|err| Error::Serialization {
        source: err,
        back: Backtrace::new(),
    })?;
    let success = result.is_success();

    deep_merge(&mut normalized, result.values);
    normalized.insert(SUCCESS_FIELD.to_string(), Value::Bool(success));
    normalized.insert(ERRORS_FIELD.to_string(), Value::String(errors));
    normalized.extend(reserved);

    Ok(Payload::Map(normalized))
}
