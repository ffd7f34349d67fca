//! Turning one source file into a [`Module`].

use std::path::Path;

use codergen_ir::{FieldDecl, FieldType, Module, StructDecl};
use quote::ToTokens;
use syn::{
    Attribute, Expr, Fields, GenericArgument, Lit, Meta, PathArguments, Token, Type,
    punctuated::Punctuated,
};

use crate::{Error, Result};

/// Prefix of an inner doc line that carries a directive.
pub const DIRECTIVE_PREFIX: &str = "coder:";

/// Name of the derive that marks a struct for generation.
const CODEC_DERIVE: &str = "Codec";

/// Parse `src` into a module named `name`.
///
/// Returns `Ok(None)` when the file declares no `Codec` structs.
pub fn parse_source(name: &str, path: &Path, src: &str) -> Result<Option<Module>> {
    let file = syn::parse_file(src).map_err(|e| Error::parse(path, src, e))?;

    let mut builder = Module::builder(name, path).test_only(is_test_module(name));

    for attr in &file.attrs {
        if is_cfg_test(attr) {
            builder = builder.test_only(true);
        }
        if let Some(line) = doc_line(attr) {
            if let Some((key, value)) = parse_directive(path, &line)? {
                builder = builder.directive(key, value);
            }
        }
    }

    for item in &file.items {
        if let syn::Item::Struct(s) = item {
            if derives_codec(&s.attrs) {
                builder = builder.add_struct(struct_decl(path, s)?);
            }
        }
    }

    if builder.struct_count() == 0 {
        return Ok(None);
    }
    Ok(Some(builder.finish()))
}

/// Parse a directive out of an inner doc line.
///
/// Lines without the prefix are ordinary docs and yield `None`.
fn parse_directive(path: &Path, line: &str) -> Result<Option<(String, String)>> {
    let Some(rest) = line.trim().strip_prefix(DIRECTIVE_PREFIX) else {
        return Ok(None);
    };
    let (key, value) = match rest.split_once('=') {
        Some((key, value)) => (key.trim(), value.trim()),
        None => (rest.trim(), ""),
    };
    if key.is_empty() || key.contains(char::is_whitespace) {
        return Err(Box::new(Error::InvalidDirective {
            path: path.to_path_buf(),
            text: line.trim().to_string(),
        }));
    }
    Ok(Some((key.to_string(), value.to_string())))
}

/// Modules under a `tests` directory or named `*_test`/`*_tests` are test-only.
fn is_test_module(name: &str) -> bool {
    let segments: Vec<&str> = name.split("::").collect();
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };
    parents.contains(&"tests") || last.ends_with("_test") || last.ends_with("_tests")
}

fn is_cfg_test(attr: &Attribute) -> bool {
    attr.path().is_ident("cfg")
        && attr
            .parse_args::<syn::Ident>()
            .map(|ident| ident == "test")
            .unwrap_or(false)
}

/// Text of a `///` or `//!` line, without the marker.
fn doc_line(attr: &Attribute) -> Option<String> {
    if !attr.path().is_ident("doc") {
        return None;
    }
    if let Meta::NameValue(nv) = &attr.meta {
        if let Expr::Lit(expr) = &nv.value {
            if let Lit::Str(s) = &expr.lit {
                return Some(s.value());
            }
        }
    }
    None
}

fn docs(attrs: &[Attribute]) -> Vec<String> {
    attrs
        .iter()
        .filter_map(doc_line)
        .map(|line| line.trim().to_string())
        .collect()
}

fn derives_codec(attrs: &[Attribute]) -> bool {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .filter_map(|attr| {
            attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
                .ok()
        })
        .flatten()
        .any(|path| {
            path.segments
                .last()
                .map(|seg| seg.ident == CODEC_DERIVE)
                .unwrap_or(false)
        })
}

fn struct_decl(path: &Path, s: &syn::ItemStruct) -> Result<StructDecl> {
    let name = s.ident.to_string();
    let fields = match &s.fields {
        Fields::Named(named) => named
            .named
            .iter()
            .map(|f| FieldDecl {
                name: f
                    .ident
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                ty: field_type(&f.ty),
                docs: docs(&f.attrs),
            })
            .collect(),
        Fields::Unnamed(_) => {
            return Err(Box::new(Error::TupleStruct {
                path: path.to_path_buf(),
                name,
            }));
        }
        Fields::Unit => Vec::new(),
    };

    Ok(StructDecl {
        name,
        docs: docs(&s.attrs),
        fields,
    })
}

/// Reduce a Rust type to a [`FieldType`].
///
/// Shapes that cannot be encoded become [`FieldType::Unsupported`] so the
/// failure is reported against the generation task, not the scan.
fn field_type(ty: &Type) -> FieldType {
    let Type::Path(type_path) = ty else {
        return unsupported(ty);
    };
    if type_path.qself.is_some() {
        return unsupported(ty);
    }
    let Some(segment) = type_path.path.segments.last() else {
        return unsupported(ty);
    };
    let ident = segment.ident.to_string();

    match &segment.arguments {
        PathArguments::None => {
            FieldType::from_rust_primitive(&ident).unwrap_or(FieldType::Named(ident))
        }
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => {
            let Some(GenericArgument::Type(inner)) = args.args.first() else {
                return unsupported(ty);
            };
            match ident.as_str() {
                "Vec" => match field_type(inner) {
                    FieldType::U8 => FieldType::Bytes,
                    element => FieldType::List(Box::new(element)),
                },
                "Option" => FieldType::Option(Box::new(field_type(inner))),
                _ => unsupported(ty),
            }
        }
        _ => unsupported(ty),
    }
}

fn unsupported(ty: &Type) -> FieldType {
    let text = ty
        .to_token_stream()
        .to_string()
        .replace(" < ", "<")
        .replace("< ", "<")
        .replace(" <", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
        .replace("& ", "&");
    FieldType::Unsupported(text)
}
