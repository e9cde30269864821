// Copyright 2024 Vincent Chan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use bson::{Bson, Decimal128, Document};
use serde::{Deserialize, Deserializer};

const DECIMAL128_EXPONENT_BIAS: i32 = 6176;

/// Servers are free to answer counters as int32, int64 or double.
pub(crate) fn number_as_i64(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(i) => Some(*i as i64),
        Bson::Int64(i) => Some(*i),
        Bson::Double(f) if f.fract() == 0.0 => Some(*f as i64),
        _ => None,
    }
}

/// `None` for NaN, infinities and the non-canonical large-coefficient form.
pub(crate) fn decimal128_as_f64(value: &Decimal128) -> Option<f64> {
    let bits = u128::from_le_bytes(value.bytes());
    if (bits >> 125) & 0b11 == 0b11 {
        return None;
    }
    let negative = bits >> 127 == 1;
    let exponent = ((bits >> 113) & 0x3FFF) as i32 - DECIMAL128_EXPONENT_BIAS;
    let coefficient = (bits & ((1u128 << 113) - 1)) as f64;
    let magnitude = if exponent < 0 {
        coefficient / 10f64.powi(-exponent)
    } else {
        coefficient * 10f64.powi(exponent)
    };
    Some(if negative { -magnitude } else { magnitude })
}

pub(crate) fn number_as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(i) => Some(*i as f64),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        Bson::Decimal128(d) => decimal128_as_f64(d),
        _ => None,
    }
}

/// Any whole number fitting an `i32`; anything else reads as absent.
pub(crate) fn lenient_i32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    let value = Option::<Bson>::deserialize(deserializer)?;
    Ok(value.as_ref()
        .and_then(number_as_i64)
        .and_then(|n| i32::try_from(n).ok()))
}

pub(crate) fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Bson>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_as_f64))
}

pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Bson>::deserialize(deserializer)? {
        Some(Bson::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

pub(crate) fn get_i64(doc: &Document, key: &str) -> Option<i64> {
    doc.get(key).and_then(number_as_i64)
}

/// Compares two index key patterns field by field, in order. Directions
/// are compared numerically so `1`, `1i64` and `1.0` are the same.
pub(crate) fn same_key_pattern(a: &Document, b: &Document) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).all(|((ka, va), (kb, vb))| {
        if ka != kb {
            return false;
        }
        match (number_as_i64(va), number_as_i64(vb)) {
            (Some(x), Some(y)) => x == y,
            _ => va == vb,
        }
    })
}
