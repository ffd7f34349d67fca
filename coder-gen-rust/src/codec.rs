//! Encode and decode expressions for one field shape.

use codergen_ir::FieldType;
use eyre::{Result, bail};

/// A value handed to an encoder call.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Value<'a> {
    /// A place expression such as `self.x`.
    Place(&'a str),
    /// A reference binding such as `v0`.
    Ref(&'a str),
}

impl Value<'_> {
    fn copied(&self) -> String {
        match self {
            Value::Place(place) => place.to_string(),
            Value::Ref(binding) => format!("*{}", binding),
        }
    }

    fn borrowed(&self) -> String {
        match self {
            Value::Place(place) => format!("&{}", place),
            Value::Ref(binding) => binding.to_string(),
        }
    }
}

/// Builds coder expressions against one runtime crate path.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Codec<'a> {
    runtime: &'a str,
}

impl<'a> Codec<'a> {
    pub(crate) fn new(runtime: &'a str) -> Self {
        Self { runtime }
    }

    /// Expression writing `value` of type `ty` to the encoder `e`.
    pub(crate) fn encode(&self, ty: &FieldType, value: Value<'_>, depth: usize) -> Result<String> {
        let expr = match ty {
            FieldType::String => format!("e.put_str({})", value.borrowed()),
            FieldType::Bytes => format!("e.put_bytes({})", value.borrowed()),
            FieldType::List(inner) | FieldType::Option(inner) => {
                let method = if matches!(ty, FieldType::List(_)) {
                    "put_list"
                } else {
                    "put_option"
                };
                let binding = format!("v{}", depth);
                let body = self.encode(inner, Value::Ref(&binding), depth + 1)?;
                format!(
                    "e.{}({}, |e, {}| {})",
                    method,
                    value.borrowed(),
                    binding,
                    body
                )
            }
            FieldType::Named(_) => {
                format!("{}::Encode::encode({}, e)", self.runtime, value.borrowed())
            }
            FieldType::Unsupported(text) => bail!("cannot encode '{}'", text),
            primitive => match primitive.primitive_name() {
                Some(name) => format!("e.put_{}({})", name, value.copied()),
                None => bail!("cannot encode '{}'", primitive),
            },
        };
        Ok(expr)
    }

    /// Expression reading a `ty` from the decoder `d`, as a `Result`.
    pub(crate) fn decode(&self, ty: &FieldType) -> Result<String> {
        let expr = match ty {
            FieldType::String => "d.get_string()".to_string(),
            FieldType::Bytes => "d.get_bytes()".to_string(),
            FieldType::List(inner) => format!("d.get_list(|d| {})", self.decode(inner)?),
            FieldType::Option(inner) => format!("d.get_option(|d| {})", self.decode(inner)?),
            FieldType::Named(name) => format!("<{} as {}::Decode>::decode(d)", name, self.runtime),
            FieldType::Unsupported(text) => bail!("cannot decode '{}'", text),
            primitive => match primitive.primitive_name() {
                Some(name) => format!("d.get_{}()", name),
                None => bail!("cannot decode '{}'", primitive),
            },
        };
        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(inner: FieldType) -> FieldType {
        FieldType::List(Box::new(inner))
    }

    fn option(inner: FieldType) -> FieldType {
        FieldType::Option(Box::new(inner))
    }

    #[test]
    fn test_encode_primitives() {
        let codec = Codec::new("rt");
        assert_eq!(
            codec.encode(&FieldType::U16, Value::Place("self.port"), 0).unwrap(),
            "e.put_u16(self.port)"
        );
        assert_eq!(
            codec.encode(&FieldType::String, Value::Place("self.name"), 0).unwrap(),
            "e.put_str(&self.name)"
        );
    }

    #[test]
    fn test_encode_nested_containers() {
        let codec = Codec::new("rt");
        let ty = list(option(FieldType::F64));
        assert_eq!(
            codec.encode(&ty, Value::Place("self.samples"), 0).unwrap(),
            "e.put_list(&self.samples, |e, v0| e.put_option(v0, |e, v1| e.put_f64(*v1)))"
        );
    }

    #[test]
    fn test_encode_named() {
        let codec = Codec::new("wire::rt");
        assert_eq!(
            codec
                .encode(&FieldType::Named("Point".into()), Value::Place("self.origin"), 0)
                .unwrap(),
            "wire::rt::Encode::encode(&self.origin, e)"
        );
    }

    #[test]
    fn test_decode_expressions() {
        let codec = Codec::new("rt");
        assert_eq!(codec.decode(&FieldType::Bool).unwrap(), "d.get_bool()");
        assert_eq!(
            codec.decode(&list(FieldType::Named("Point".into()))).unwrap(),
            "d.get_list(|d| <Point as rt::Decode>::decode(d))"
        );
        assert_eq!(
            codec.decode(&option(FieldType::Bytes)).unwrap(),
            "d.get_option(|d| d.get_bytes())"
        );
    }

    #[test]
    fn test_unsupported_is_an_error() {
        let codec = Codec::new("rt");
        let ty = option(FieldType::Unsupported("(u8, u8)".into()));
        assert!(codec.encode(&ty, Value::Place("self.pair"), 0).is_err());
        assert!(codec.decode(&ty).is_err());
    }
}
