//! Lossless JSON form for `f32`
//!
//! JSON has no NaN or infinity, and `serde_json` writes them as `null`. Finite
//! values stay plain numbers; the rest become `{"Float": "NaN"}`, `"inf"` or
//! `"-inf"`, which does not collide with a string parameter.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum FloatRepr {
    Number(f32),
    NonFinite {
        #[serde(rename = "Float")]
        text: String,
    },
}

/// # Errors
/// Returns the serializer's error.
#[allow(clippy::trivially_copy_pass_by_ref)]
pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        return serializer.serialize_f32(*value);
    }
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry("Float", &value.to_string())?;
    map.end()
}

/// # Errors
/// Returns an error for anything but a number or a non-finite marker.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    match FloatRepr::deserialize(deserializer)? {
        FloatRepr::Number(value) => Ok(value),
        FloatRepr::NonFinite { text } => match text.parse::<f32>() {
            Ok(value) if !value.is_finite() => Ok(value),
            _ => Err(D::Error::custom(format!("invalid non-finite float '{text}'"))),
        },
    }
}

/// Same representation for optional fields.
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    struct Wrapped(#[serde(with = "super")] f32);

    /// # Errors
    /// Returns the serializer's error.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<f32>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => super::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// # Errors
    /// Returns an error for anything but null, a number or a non-finite marker.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f32>, D::Error> {
        Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(value)| value))
    }
}
