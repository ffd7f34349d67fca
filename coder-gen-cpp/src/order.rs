//! Definition order for structs that embed each other.

use std::collections::HashMap;

use codergen_ir::{FieldType, Module, StructDecl};
use eyre::{Result, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Struct a field stores inline, which must be complete before the field.
fn by_value(ty: &FieldType) -> Option<&str> {
    match ty {
        FieldType::Named(name) => Some(name),
        FieldType::Option(inner) => by_value(inner),
        _ => None,
    }
}

/// Struct a field only reaches through a `std::vector`, which may be incomplete.
fn by_reference(ty: &FieldType) -> Option<&str> {
    match by_value(ty) {
        Some(_) => None,
        None => ty.named(),
    }
}

struct Sorter<'m> {
    structs: &'m [StructDecl],
    index: HashMap<&'m str, usize>,
    marks: Vec<Mark>,
    stack: Vec<usize>,
    order: Vec<&'m StructDecl>,
}

impl<'m> Sorter<'m> {
    fn dependencies(
        &self,
        i: usize,
        kind: fn(&FieldType) -> Option<&str>,
    ) -> impl Iterator<Item = usize> + '_ {
        self.structs[i]
            .fields
            .iter()
            .filter_map(move |field| kind(&field.ty))
            .filter_map(move |name| self.index.get(name).copied())
    }

    /// Whether `from` embeds any struct on the current path, directly or not.
    fn embeds_open(&self, from: usize) -> bool {
        let mut seen = vec![false; self.structs.len()];
        let mut pending = vec![from];
        while let Some(i) = pending.pop() {
            if self.stack.contains(&i) {
                return true;
            }
            if !std::mem::replace(&mut seen[i], true) {
                pending.extend(self.dependencies(i, by_value));
            }
        }
        false
    }

    fn visit(&mut self, i: usize) -> Result<()> {
        match self.marks[i] {
            Mark::Done => return Ok(()),
            Mark::Visiting => bail!(
                "struct '{}' contains itself by value, which C++ cannot express",
                self.structs[i].name
            ),
            Mark::Unvisited => {}
        }

        self.marks[i] = Mark::Visiting;
        self.stack.push(i);
        let embedded: Vec<usize> = self.dependencies(i, by_value).collect();
        for j in embedded {
            self.visit(j)?;
        }
        // Listed structs go first when that cannot break an embedding.
        let listed: Vec<usize> = self.dependencies(i, by_reference).collect();
        for j in listed {
            if self.marks[j] == Mark::Unvisited && !self.embeds_open(j) {
                self.visit(j)?;
            }
        }
        self.stack.pop();
        self.marks[i] = Mark::Done;
        let structs = self.structs;
        self.order.push(&structs[i]);
        Ok(())
    }
}

/// Structs of `module`, each after the structs it embeds.
///
/// Declaration order is kept wherever dependencies allow it. Structs held in
/// a list may come later and then need a forward declaration.
pub(crate) fn definition_order(module: &Module) -> Result<Vec<&StructDecl>> {
    let structs = module.structs();
    let mut sorter = Sorter {
        structs,
        index: structs
            .iter()
            .enumerate()
            .map(|(i, decl)| (decl.name.as_str(), i))
            .collect(),
        marks: vec![Mark::Unvisited; structs.len()],
        stack: Vec::new(),
        order: Vec::with_capacity(structs.len()),
    };
    for i in 0..structs.len() {
        sorter.visit(i)?;
    }
    Ok(sorter.order)
}

/// Structs in `order` that a list names before their definition.
pub(crate) fn forward_declarations<'m>(order: &[&'m StructDecl]) -> Vec<&'m str> {
    let position: HashMap<&str, usize> = order
        .iter()
        .enumerate()
        .map(|(i, decl)| (decl.name.as_str(), i))
        .collect();
    let mut declared: Vec<&'m str> = Vec::new();
    for (i, decl) in order.iter().enumerate() {
        for field in &decl.fields {
            let Some(name) = by_reference(&field.ty) else {
                continue;
            };
            let Some(&at) = position.get(name) else {
                continue;
            };
            let target: &'m StructDecl = order[at];
            if at > i && !declared.contains(&target.name.as_str()) {
                declared.push(target.name.as_str());
            }
        }
    }
    declared
}

#[cfg(test)]
mod tests {
    use codergen_ir::FieldType;

    use super::*;

    fn named(name: &str) -> FieldType {
        FieldType::Named(name.into())
    }

    #[test]
    fn test_dependencies_come_first() {
        let module = Module::builder("geo", "geo.rs")
            .add_struct(StructDecl::new("Line").field("start", named("Point")))
            .add_struct(StructDecl::new("Label").field("text", FieldType::String))
            .add_struct(StructDecl::new("Point").field("x", FieldType::I32))
            .finish();

        let names: Vec<_> = definition_order(&module)
            .unwrap()
            .iter()
            .map(|decl| decl.name.as_str())
            .collect();
        assert_eq!(names, vec!["Point", "Line", "Label"]);
    }

    #[test]
    fn test_recursive_struct_is_rejected() {
        let module = Module::builder("tree", "tree.rs")
            .add_struct(
                StructDecl::new("Node").field("parent", FieldType::Option(Box::new(named("Node")))),
            )
            .finish();

        let err = definition_order(&module).unwrap_err();
        assert!(err.to_string().contains("'Node' contains itself"));
    }

    #[test]
    fn test_recursion_through_list_is_allowed() {
        let module = Module::builder("tree", "tree.rs")
            .add_struct(
                StructDecl::new("Node")
                    .field("value", FieldType::I64)
                    .field("children", FieldType::List(Box::new(named("Node")))),
            )
            .finish();

        let order = definition_order(&module).unwrap();
        assert_eq!(order.len(), 1);
        assert!(forward_declarations(&order).is_empty());
    }

    #[test]
    fn test_list_cycle_orders_embedding_first() {
        // Group lists Member, Member embeds Group: Group must be complete
        // first and Member is forward declared.
        let module = Module::builder("org", "org.rs")
            .add_struct(
                StructDecl::new("Group").field("members", FieldType::List(Box::new(named("Member")))),
            )
            .add_struct(StructDecl::new("Member").field("group", named("Group")))
            .finish();

        let order = definition_order(&module).unwrap();
        let names: Vec<_> = order.iter().map(|decl| decl.name.as_str()).collect();
        assert_eq!(names, vec!["Group", "Member"]);
        assert_eq!(forward_declarations(&order), vec!["Member"]);
    }

    #[test]
    fn test_mutual_lists_are_allowed() {
        let module = Module::builder("graph", "graph.rs")
            .add_struct(StructDecl::new("A").field("bs", FieldType::List(Box::new(named("B")))))
            .add_struct(StructDecl::new("B").field("as_", FieldType::List(Box::new(named("A")))))
            .finish();

        let order = definition_order(&module).unwrap();
        let names: Vec<_> = order.iter().map(|decl| decl.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(forward_declarations(&order), vec!["A"]);
    }
}
