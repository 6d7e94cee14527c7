//! Named shape types for dynamic containers
//!
//! Shapes travel through generic channels (clipboard payloads, undo stacks,
//! plugin boundaries) as a [`ShapeValue`]. The stream form of a value carries
//! its type name, and a [`TypeRegistry`] maps that name back to a decoder.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::sync::OnceLock;

use crate::codec::{CodecError, CodecResult, StreamRead, StreamReader, StreamWrite, StreamWriter};
use crate::domain::{DiagPoints, DiagPointsList, FourPoints, MPointsList, Toolshape, Toolshapes};

/// Type id of user types in the variant stream form (`QMetaType::User` in Qt 5)
pub const USER_TYPE_ID: u32 = 1024;

/// A value type with a stable name that can live inside a [`ShapeValue`]
pub trait MetaType: StreamRead + StreamWrite + Into<ShapeValue> + Sized {
    const TYPE_NAME: &'static str;

    /// Take the concrete value back out of a dynamic one
    fn from_value(value: ShapeValue) -> CodecResult<Self>;
}

/// Dynamic container over every registered shape type
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeValue {
    DiagPoints(DiagPoints),
    DiagPointsList(DiagPointsList),
    FourPoints(FourPoints),
    MPointsList(MPointsList),
    Toolshape(Toolshape),
    Toolshapes(Toolshapes),
}

impl ShapeValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ShapeValue::DiagPoints(_) => DiagPoints::TYPE_NAME,
            ShapeValue::DiagPointsList(_) => <DiagPointsList as MetaType>::TYPE_NAME,
            ShapeValue::FourPoints(_) => FourPoints::TYPE_NAME,
            ShapeValue::MPointsList(_) => <MPointsList as MetaType>::TYPE_NAME,
            ShapeValue::Toolshape(_) => Toolshape::TYPE_NAME,
            ShapeValue::Toolshapes(_) => <Toolshapes as MetaType>::TYPE_NAME,
        }
    }

    /// Extract a concrete type, failing if the value holds another one
    pub fn into_inner<T: MetaType>(self) -> CodecResult<T> {
        T::from_value(self)
    }

    fn write_payload<W: Write>(&self, writer: &mut StreamWriter<W>) -> CodecResult<()> {
        match self {
            ShapeValue::DiagPoints(v) => writer.write(v),
            ShapeValue::DiagPointsList(v) => writer.write(v),
            ShapeValue::FourPoints(v) => writer.write(v),
            ShapeValue::MPointsList(v) => writer.write(v),
            ShapeValue::Toolshape(v) => writer.write(v),
            ShapeValue::Toolshapes(v) => writer.write(v),
        }
    }
}

macro_rules! meta_type {
    ($ty:ty, $name:literal, $variant:ident) => {
        impl From<$ty> for ShapeValue {
            fn from(value: $ty) -> Self {
                ShapeValue::$variant(value)
            }
        }

        impl MetaType for $ty {
            const TYPE_NAME: &'static str = $name;

            fn from_value(value: ShapeValue) -> CodecResult<Self> {
                match value {
                    ShapeValue::$variant(v) => Ok(v),
                    other => Err(CodecError::UnexpectedType {
                        expected: $name,
                        found: other.type_name(),
                    }),
                }
            }
        }
    };
}

meta_type!(DiagPoints, "DiagPoints", DiagPoints);
meta_type!(DiagPointsList, "DiagPointsList", DiagPointsList);
meta_type!(FourPoints, "FourPoints", FourPoints);
meta_type!(MPointsList, "MPointsList", MPointsList);
meta_type!(Toolshape, "Toolshape", Toolshape);
meta_type!(Toolshapes, "Toolshapes", Toolshapes);

type Decoder = fn(&mut StreamReader<&mut dyn Read>) -> CodecResult<ShapeValue>;

fn decode_as<T: MetaType>(reader: &mut StreamReader<&mut dyn Read>) -> CodecResult<ShapeValue> {
    Ok(T::read_from(reader)?.into())
}

/// Maps type names to stream decoders
#[derive(Default)]
pub struct TypeRegistry {
    decoders: HashMap<&'static str, Decoder>,
}

impl TypeRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every shape type already registered
    pub fn with_shape_types() -> Self {
        let mut registry = Self::new();
        registry.register_meta_types();
        registry
    }

    /// Register a type; registering the same type twice is a no-op
    pub fn register<T: MetaType>(&mut self) {
        let decoder: Decoder = decode_as::<T>;
        if self.decoders.insert(T::TYPE_NAME, decoder).is_none() {
            log::debug!("Registered meta type {}", T::TYPE_NAME);
        }
    }

    pub fn register_meta_types(&mut self) {
        self.register::<DiagPoints>();
        self.register::<DiagPointsList>();
        self.register::<FourPoints>();
        self.register::<MPointsList>();
        self.register::<Toolshape>();
        self.register::<Toolshapes>();
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.decoders.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Decode the payload of a named type
    pub fn decode<R: Read>(
        &self,
        name: &str,
        reader: &mut StreamReader<R>,
    ) -> CodecResult<ShapeValue> {
        let decoder = self
            .decoders
            .get(name)
            .ok_or_else(|| CodecError::UnknownTypeName(name.to_string()))?;
        let inner: &mut dyn Read = reader.get_mut();
        let mut dyn_reader = StreamReader::new(inner);
        decoder(&mut dyn_reader)
    }

    /// Write a value in variant form: type id, null flag, NUL-terminated type name, payload
    pub fn write_variant<W: Write>(
        &self,
        writer: &mut StreamWriter<W>,
        value: &ShapeValue,
    ) -> CodecResult<()> {
        writer.write_u32(USER_TYPE_ID)?;
        writer.write_i8(0)?;
        let mut name = value.type_name().as_bytes().to_vec();
        name.push(0);
        writer.write_byte_array(&name)?;
        value.write_payload(writer)
    }

    /// Read a value written by [`TypeRegistry::write_variant`]
    pub fn read_variant<R: Read>(&self, reader: &mut StreamReader<R>) -> CodecResult<ShapeValue> {
        let type_id = reader.read_u32()?;
        if type_id != USER_TYPE_ID {
            return Err(CodecError::UnsupportedVariantType(type_id));
        }
        let _is_null = reader.read_i8()?;
        let mut name = reader.read_byte_array()?;
        if name.last() == Some(&0) {
            name.pop();
        }
        let name = String::from_utf8(name).map_err(|_| CodecError::InvalidTypeName)?;
        self.decode(&name, reader)
    }
}

/// Process-wide registry holding every shape type
pub fn global() -> &'static TypeRegistry {
    static REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();
    REGISTRY.get_or_init(TypeRegistry::with_shape_types)
}
