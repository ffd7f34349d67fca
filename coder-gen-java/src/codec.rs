//! Java statements that encode and decode one field shape.
//!
//! Values go through `java.io.DataOutput`/`DataInput`, which are big-endian.
//! Unsigned shapes widen to the next signed Java type on decode.

use codergen_gen::CodeBuilder;
use codergen_ir::FieldType;
use eyre::{Result, bail};

/// Java type for `ty`. `boxed` selects the wrapper class for primitives.
pub(crate) fn java_type(ty: &FieldType, boxed: bool) -> Result<String> {
    let (primitive, wrapper) = match ty {
        FieldType::Bool => ("boolean", "Boolean"),
        FieldType::I8 => ("byte", "Byte"),
        FieldType::I16 => ("short", "Short"),
        FieldType::I32 | FieldType::U8 | FieldType::U16 => ("int", "Integer"),
        FieldType::I64 | FieldType::U32 | FieldType::U64 => ("long", "Long"),
        FieldType::F32 => ("float", "Float"),
        FieldType::F64 => ("double", "Double"),
        FieldType::String => return Ok("String".to_string()),
        FieldType::Bytes => return Ok("byte[]".to_string()),
        FieldType::List(inner) => return Ok(format!("List<{}>", java_type(inner, true)?)),
        FieldType::Option(inner) => {
            if matches!(**inner, FieldType::Option(_)) {
                bail!("nested optional '{}' cannot be expressed in Java", ty);
            }
            return java_type(inner, true);
        }
        FieldType::Named(name) => return Ok(name.clone()),
        FieldType::Unsupported(text) => bail!("unsupported type '{}'", text),
    };
    Ok(if boxed { wrapper } else { primitive }.to_string())
}

/// Whether `ty` needs `java.util.List`.
pub(crate) fn uses_list(ty: &FieldType) -> bool {
    match ty {
        FieldType::List(_) => true,
        FieldType::Option(inner) => uses_list(inner),
        _ => false,
    }
}

/// Fresh local variable suffixes, unique within one method.
#[derive(Debug, Default)]
pub(crate) struct Locals {
    next: usize,
}

impl Locals {
    fn fresh(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Emit statements writing `expr` of type `ty` to `out`.
pub(crate) fn encode(
    builder: &mut CodeBuilder,
    ty: &FieldType,
    expr: &str,
    locals: &mut Locals,
) -> Result<()> {
    let call = match ty {
        FieldType::Bool => format!("out.writeBoolean({});", expr),
        FieldType::I8 | FieldType::U8 => format!("out.writeByte({});", expr),
        FieldType::I16 | FieldType::U16 => format!("out.writeShort({});", expr),
        FieldType::I32 => format!("out.writeInt({});", expr),
        FieldType::U32 => format!("out.writeInt((int) (long) {});", expr),
        FieldType::I64 | FieldType::U64 => format!("out.writeLong({});", expr),
        FieldType::F32 => format!("out.writeFloat({});", expr),
        FieldType::F64 => format!("out.writeDouble({});", expr),
        FieldType::String => format!("writeString(out, {});", expr),
        FieldType::Bytes => format!("writeBytes(out, {});", expr),
        FieldType::Named(_) => format!("{}.encode(out);", expr),
        FieldType::List(inner) => {
            let element = format!("e{}", locals.fresh());
            builder
                .push_line(&format!("out.writeInt({}.size());", expr))
                .push_open(&format!("for ({} {} : {}) {{", java_type(inner, true)?, element, expr));
            encode(builder, inner, &element, locals)?;
            builder.push_close("}");
            return Ok(());
        }
        FieldType::Option(inner) => {
            builder
                .push_line(&format!("out.writeBoolean({} != null);", expr))
                .push_open(&format!("if ({} != null) {{", expr));
            encode(builder, inner, expr, locals)?;
            builder.push_close("}");
            return Ok(());
        }
        FieldType::Unsupported(text) => bail!("unsupported type '{}'", text),
    };
    builder.push_line(&call);
    Ok(())
}

fn read_expr(ty: &FieldType) -> Option<String> {
    let expr = match ty {
        FieldType::Bool => "in.readBoolean()",
        FieldType::I8 => "in.readByte()",
        FieldType::I16 => "in.readShort()",
        FieldType::I32 => "in.readInt()",
        FieldType::I64 | FieldType::U64 => "in.readLong()",
        FieldType::U8 => "in.readUnsignedByte()",
        FieldType::U16 => "in.readUnsignedShort()",
        FieldType::U32 => "(in.readInt() & 0xFFFFFFFFL)",
        FieldType::F32 => "in.readFloat()",
        FieldType::F64 => "in.readDouble()",
        FieldType::String => "readString(in)",
        FieldType::Bytes => "readBytes(in)",
        FieldType::Named(name) => return Some(format!("{}.decode(in)", name)),
        _ => return None,
    };
    Some(expr.to_string())
}

/// Emit statements reading a `ty` from `in` and handing it to `assign`.
pub(crate) fn decode(
    builder: &mut CodeBuilder,
    ty: &FieldType,
    assign: &dyn Fn(&str) -> String,
    locals: &mut Locals,
) -> Result<()> {
    if let Some(expr) = read_expr(ty) {
        builder.push_line(&assign(&expr));
        return Ok(());
    }

    match ty {
        FieldType::List(inner) => {
            let id = locals.fresh();
            let (count, list, index) = (format!("n{}", id), format!("l{}", id), format!("i{}", id));
            builder
                .push_line(&format!("int {} = in.readInt();", count))
                .push_line(&format!(
                    "{} {} = new ArrayList<>({});",
                    java_type(ty, true)?,
                    list,
                    count
                ))
                .push_open(&format!(
                    "for (int {index} = 0; {index} < {count}; {index}++) {{",
                    index = index,
                    count = count
                ));
            let add = |value: &str| format!("{}.add({});", list, value);
            decode(builder, inner, &add, locals)?;
            builder.push_close("}").push_line(&assign(&list));
        }
        FieldType::Option(inner) => {
            builder.push_open("if (in.readBoolean()) {");
            decode(builder, inner, assign, locals)?;
            builder
                .push_dedent()
                .push_line("} else {")
                .push_indent()
                .push_line(&assign("null"))
                .push_close("}");
        }
        FieldType::Unsupported(text) => bail!("unsupported type '{}'", text),
        other => bail!("cannot decode '{}'", other),
    }
    Ok(())
}
