//! Snapshot tests for the native back-end.
//!
//! Run `cargo insta review` to update snapshots when making intentional changes.

use codergen_gen::{Backend, EmitOptions};
use codergen_ir::{FieldType, Module, StructDecl};
use codergen_rust::RustBackend;

fn shapes() -> Module {
    Module::builder("shapes", "src/shapes.rs")
        .add_struct(
            StructDecl::new("Point")
                .field("x", FieldType::I32)
                .field("y", FieldType::I32),
        )
        .add_struct(
            StructDecl::new("Polygon")
                .field("name", FieldType::String)
                .field("points", FieldType::List(Box::new(FieldType::Named("Point".into()))))
                .field("tag", FieldType::Option(Box::new(FieldType::U8))),
        )
        .finish()
}

#[test]
fn test_polygon_module() {
    let out = RustBackend
        .render(&shapes(), &EmitOptions::default())
        .expect("render failed");
    insta::assert_snapshot!("polygon_module", out);
}

#[test]
fn test_unknown_named_type_fails() {
    let module = Module::builder("shapes", "src/shapes.rs")
        .add_struct(StructDecl::new("Line").field("start", FieldType::Named("Vertex".into())))
        .finish();
    let err = RustBackend
        .render(&module, &EmitOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("'Vertex'"));
}

#[test]
fn test_unsupported_field_fails_with_type_text() {
    let module = Module::builder("shapes", "src/shapes.rs")
        .add_struct(StructDecl::new("Grid").field(
            "cells",
            FieldType::Unsupported("HashMap<(u8, u8), String>".into()),
        ))
        .finish();
    let err = RustBackend
        .render(&module, &EmitOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("HashMap<(u8, u8), String>"));
}
