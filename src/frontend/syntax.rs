//! Small helpers over tree-sitter C++ nodes.

use tree_sitter::Node;

/// Source text of a node, empty on invalid UTF-8 boundaries.
pub fn text<'a>(node: Node, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or("")
}

/// Collapse every whitespace run into one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

pub fn field_children<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).collect()
}

/// Whether `child` is attached to `parent` under `field`.
pub fn is_field_child(parent: Node, field: &str, child: Node) -> bool {
    field_children(parent, field)
        .iter()
        .any(|candidate| candidate.id() == child.id())
}

/// Arguments of an `argument_list` or `initializer_list`.
pub fn arguments(list: Node) -> Vec<Node> {
    named_children(list)
        .into_iter()
        .filter(|arg| arg.kind() != "comment")
        .collect()
}

/// First node with an error or missing token, depth first.
pub fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// `operator  +` → `operator+`, `operator new` stays spaced.
pub fn normalize_operator_name(raw: &str) -> String {
    let rest = raw.trim().trim_start_matches("operator").trim();
    let symbol: String = rest.split_whitespace().collect::<Vec<_>>().join(" ");
    if symbol
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
    {
        format!("operator {symbol}")
    } else {
        format!("operator{}", symbol.replace(' ', ""))
    }
}

/// The shape of a declarator, unwrapped down to its name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaratorShape<'t> {
    pub name: Option<Node<'t>>,
    pub init: Option<Node<'t>>,
    pub function: Option<Node<'t>>,
    pub indirection: u8,
    pub reference: bool,
    pub array: bool,
    /// A pointer was found inside a function declarator: `(*fp)(int)`
    pub function_pointer: bool,
}

impl<'t> DeclaratorShape<'t> {
    /// Declares a function rather than a variable.
    pub fn is_function(&self) -> bool {
        self.function.is_some() && !self.function_pointer
    }

    /// Declares an object by value: not a pointer, reference, array or function.
    pub fn is_plain_object(&self) -> bool {
        self.function.is_none() && self.indirection == 0 && !self.reference && !self.array
    }
}

/// Walk a declarator down to its innermost name.
pub fn declarator_shape(node: Node) -> DeclaratorShape {
    let mut shape = DeclaratorShape::default();
    let mut current = Some(node);

    while let Some(cur) = current {
        current = match cur.kind() {
            "identifier" | "field_identifier" | "qualified_identifier" | "operator_name"
            | "destructor_name" | "type_identifier" | "template_function" => {
                shape.name = Some(cur);
                None
            }
            "init_declarator" => {
                shape.init = cur.child_by_field_name("value");
                cur.child_by_field_name("declarator")
            }
            "pointer_declarator" | "abstract_pointer_declarator" => {
                if shape.function.is_some() {
                    shape.function_pointer = true;
                } else {
                    shape.indirection = shape.indirection.saturating_add(1);
                }
                cur.child_by_field_name("declarator")
            }
            "reference_declarator" | "abstract_reference_declarator" => {
                if shape.function.is_none() {
                    shape.reference = true;
                }
                named_children(cur).into_iter().last()
            }
            "array_declarator" | "abstract_array_declarator" => {
                shape.array = true;
                cur.child_by_field_name("declarator")
            }
            "function_declarator" | "abstract_function_declarator" => {
                if shape.function.is_none() {
                    shape.function = Some(cur);
                }
                cur.child_by_field_name("declarator")
            }
            "parenthesized_declarator"
            | "abstract_parenthesized_declarator"
            | "attributed_declarator" => {
                named_children(cur).into_iter().next()
            }
            _ => None,
        };
    }

    shape
}

/// Parameters of a function declarator: (required, maximum or `None` if variadic).
pub fn parameter_arity(function_declarator: Node, source: &str) -> (usize, Option<usize>) {
    let Some(list) = function_declarator.child_by_field_name("parameters") else {
        return (0, Some(0));
    };

    let mut required = 0;
    let mut total = 0;
    let mut variadic = false;

    let mut cursor = list.walk();
    for child in list.children(&mut cursor) {
        match child.kind() {
            "parameter_declaration" => {
                let is_void = child.child_by_field_name("declarator").is_none()
                    && child
                        .child_by_field_name("type")
                        .is_some_and(|t| text(t, source) == "void");
                if !is_void {
                    required += 1;
                    total += 1;
                }
            }
            "optional_parameter_declaration" => total += 1,
            "variadic_parameter_declaration" | "..." => variadic = true,
            _ => {}
        }
    }

    (required, if variadic { None } else { Some(total) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse(code: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_cpp::LANGUAGE.into())
            .expect("C++ grammar loads");
        parser.parse(code, None).expect("parse")
    }

    fn first_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
        if node.kind() == kind {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        children.into_iter().find_map(|c| first_of_kind(c, kind))
    }

    #[test]
    fn test_operator_names() {
        assert_eq!(normalize_operator_name("operator +"), "operator+");
        assert_eq!(normalize_operator_name("operator()"), "operator()");
        assert_eq!(normalize_operator_name("operator [ ]"), "operator[]");
        assert_eq!(normalize_operator_name("operator new"), "operator new");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  void\n  f(int  a)  "), "void f(int a)");
    }

    #[test]
    fn test_function_pointer_shape() {
        let code = "void (*fp)(int) = nullptr;";
        let tree = parse(code);
        let decl = first_of_kind(tree.root_node(), "declaration").unwrap();
        let declarator = decl.child_by_field_name("declarator").unwrap();
        let shape = declarator_shape(declarator);
        assert!(shape.function_pointer);
        assert!(!shape.is_function());
        assert_eq!(text(shape.name.unwrap(), code), "fp");
    }

    #[test]
    fn test_function_returning_pointer_shape() {
        let code = "int* make(int a, int b = 2);";
        let tree = parse(code);
        let decl = first_of_kind(tree.root_node(), "declaration").unwrap();
        let shape = declarator_shape(decl.child_by_field_name("declarator").unwrap());
        assert!(shape.is_function());
        assert_eq!(shape.indirection, 1);
        assert_eq!(parameter_arity(shape.function.unwrap(), code), (1, Some(2)));
    }

    #[test]
    fn test_void_and_variadic_parameters() {
        let code = "void a(void); void b(const char* fmt, ...);";
        let tree = parse(code);
        let mut cursor = tree.root_node().walk();
        let decls: Vec<_> = tree.root_node().named_children(&mut cursor).collect();
        let a = declarator_shape(decls[0].child_by_field_name("declarator").unwrap());
        let b = declarator_shape(decls[1].child_by_field_name("declarator").unwrap());
        assert_eq!(parameter_arity(a.function.unwrap(), code), (0, Some(0)));
        assert_eq!(parameter_arity(b.function.unwrap(), code), (1, None));
    }

    #[test]
    fn test_unnamed_parameter_shapes() {
        let code = "void f(const char*, const W&, int[]);";
        let tree = parse(code);
        let decl = first_of_kind(tree.root_node(), "declaration").unwrap();
        let function = declarator_shape(decl.child_by_field_name("declarator").unwrap())
            .function
            .unwrap();
        let shapes: Vec<_> = named_children(function.child_by_field_name("parameters").unwrap())
            .into_iter()
            .map(|param| declarator_shape(param.child_by_field_name("declarator").unwrap()))
            .collect();
        assert_eq!(shapes.len(), 3);
        assert_eq!(shapes[0].indirection, 1);
        assert!(!shapes[0].reference);
        assert!(shapes[1].reference);
        assert_eq!(shapes[1].indirection, 0);
        assert!(shapes[2].array);
    }
}
