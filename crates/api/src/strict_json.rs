//! Strict JSON encoding
//!
//! Compact output, natural key order, non-ASCII emitted literally, and a
//! loud failure on any non-finite float. serde_json silently writes `null`
//! for NaN/infinity (its serializer never even reaches the formatter for
//! them); missing readings are already an explicit `Option`, so a
//! non-finite value reaching this encoder is a bug, not data. The payload
//! is therefore walked by a validating serializer first, and only an
//! all-finite value is handed to serde_json.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::ser::{
    self, SerializeMap, SerializeSeq, SerializeStruct, SerializeStructVariant, SerializeTuple,
    SerializeTupleStruct, SerializeTupleVariant,
};
use serde::Serialize;
use tracing::error;

/// Serialize `value` to strict, compact JSON bytes.
///
/// Fails before producing any bytes when the payload contains a NaN or
/// infinite float.
pub fn to_vec<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    value.serialize(FiniteGuard)?;
    serde_json::to_vec(value)
}

/// Payload walker that rejects non-finite floats and accepts everything
/// else. Produces no output; it only decides whether serde_json may run.
struct FiniteGuard;

fn non_finite(kind: &str) -> serde_json::Error {
    ser::Error::custom(format!("non-finite {} in payload", kind))
}

impl serde::Serializer for FiniteGuard {
    type Ok = ();
    type Error = serde_json::Error;

    type SerializeSeq = FiniteGuardCompound;
    type SerializeTuple = FiniteGuardCompound;
    type SerializeTupleStruct = FiniteGuardCompound;
    type SerializeTupleVariant = FiniteGuardCompound;
    type SerializeMap = FiniteGuardCompound;
    type SerializeStruct = FiniteGuardCompound;
    type SerializeStructVariant = FiniteGuardCompound;

    fn serialize_f32(self, v: f32) -> Result<(), Self::Error> {
        if v.is_finite() {
            Ok(())
        } else {
            Err(non_finite("f32"))
        }
    }

    fn serialize_f64(self, v: f64) -> Result<(), Self::Error> {
        if v.is_finite() {
            Ok(())
        } else {
            Err(non_finite("f64"))
        }
    }

    fn serialize_bool(self, _: bool) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_i8(self, _: i8) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_i16(self, _: i16) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_i32(self, _: i32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_i64(self, _: i64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_u8(self, _: u8) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_u16(self, _: u16) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_u32(self, _: u32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_u64(self, _: u64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_char(self, _: char) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_str(self, _: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_none(self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(FiniteGuard)
    }

    fn serialize_unit(self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_newtype_struct<T>(self, _: &'static str, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(FiniteGuard)
    }

    fn serialize_newtype_variant<T>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(FiniteGuard)
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(FiniteGuardCompound)
    }

    fn serialize_tuple(self, _: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Ok(FiniteGuardCompound)
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Ok(FiniteGuardCompound)
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Ok(FiniteGuardCompound)
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(FiniteGuardCompound)
    }

    fn serialize_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(FiniteGuardCompound)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Ok(FiniteGuardCompound)
    }
}

/// Compound walker: recurses into every element/value with the guard
struct FiniteGuardCompound;

impl SerializeSeq for FiniteGuardCompound {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(FiniteGuard)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl SerializeTuple for FiniteGuardCompound {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(FiniteGuard)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl SerializeTupleStruct for FiniteGuardCompound {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(FiniteGuard)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl SerializeTupleVariant for FiniteGuardCompound {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(FiniteGuard)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl SerializeMap for FiniteGuardCompound {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        key.serialize(FiniteGuard)
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(FiniteGuard)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl SerializeStruct for FiniteGuardCompound {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T>(&mut self, _: &'static str, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(FiniteGuard)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl SerializeStructVariant for FiniteGuardCompound {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T>(&mut self, _: &'static str, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(FiniteGuard)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// axum responder using the strict encoder.
///
/// An encoding failure is an internal invariant violation: logged, returned
/// as a bare 500, never shaped like a client error.
pub struct StrictJson<T>(pub T);

impl<T: Serialize> IntoResponse for StrictJson<T> {
    fn into_response(self) -> Response {
        match to_vec(&self.0) {
            Ok(bytes) => (
                [(header::CONTENT_TYPE, "application/json")],
                bytes,
            )
                .into_response(),
            Err(err) => {
                error!("Strict JSON encoding failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(header::CONTENT_TYPE, "application/json")],
                    r#"{"detail":"Internal server error"}"#,
                )
                    .into_response()
            }
        }
    }
}
