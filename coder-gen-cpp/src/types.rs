use codergen_ir::FieldType;
use eyre::{Result, bail};

/// C++ type for a field shape.
pub(crate) fn cpp_type(ty: &FieldType) -> Result<String> {
    let name = match ty {
        FieldType::Bool => "bool",
        FieldType::I8 => "int8_t",
        FieldType::I16 => "int16_t",
        FieldType::I32 => "int32_t",
        FieldType::I64 => "int64_t",
        FieldType::U8 => "uint8_t",
        FieldType::U16 => "uint16_t",
        FieldType::U32 => "uint32_t",
        FieldType::U64 => "uint64_t",
        FieldType::F32 => "float",
        FieldType::F64 => "double",
        FieldType::String => "std::string",
        FieldType::Bytes => "std::vector<uint8_t>",
        FieldType::List(inner) => return Ok(format!("std::vector<{}>", cpp_type(inner)?)),
        FieldType::Option(inner) => return Ok(format!("std::optional<{}>", cpp_type(inner)?)),
        FieldType::Named(name) => return Ok(name.clone()),
        FieldType::Unsupported(text) => bail!("unsupported type '{}'", text),
    };
    Ok(name.to_string())
}
