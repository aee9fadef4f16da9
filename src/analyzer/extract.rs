//! Java entity extraction. All knowledge of the tree-sitter-java grammar
//! (kind and field names) lives in this module.

use crate::analyzer::locate::{
    child_by_field, find_all_descendants_of_kind, find_first_child_of_kind,
    find_first_child_of_kinds, node_text, walk_preorder,
};
use crate::analyzer::tree::SourceNode;
use crate::metrics;
use crate::model::{CallSite, ClassEntity, FieldEntity, MethodEntity, Modifier, Parameter};

pub const CLASS_DECLARATION: &str = "class_declaration";
pub const METHOD_DECLARATION: &str = "method_declaration";
pub const FIELD_DECLARATION: &str = "field_declaration";
pub const IMPORT_DECLARATION: &str = "import_declaration";
pub const PACKAGE_DECLARATION: &str = "package_declaration";
pub const METHOD_INVOCATION: &str = "method_invocation";

const IDENTIFIER: &str = "identifier";
const SCOPED_IDENTIFIER: &str = "scoped_identifier";
const MODIFIERS: &str = "modifiers";
const MARKER_ANNOTATION: &str = "marker_annotation";
const ANNOTATION: &str = "annotation";
const FORMAL_PARAMETERS: &str = "formal_parameters";
const FORMAL_PARAMETER: &str = "formal_parameter";
const SPREAD_PARAMETER: &str = "spread_parameter";
const VARIABLE_DECLARATOR: &str = "variable_declarator";
const BLOCK: &str = "block";
const SUPERCLASS: &str = "superclass";
const SUPER_INTERFACES: &str = "super_interfaces";
const TYPE_LIST: &str = "type_list";
const ASTERISK: &str = "asterisk";
const TERNARY_EXPRESSION: &str = "ternary_expression";

/// Anonymous tokens that open a branch. Literals and comments are separate
/// nodes, so words inside them never match.
const DECISION_TOKENS: &[&str] = &["if", "for", "while", "case", "catch", "&&", "||"];

const TYPE_KINDS: &[&str] = &[
    "type_identifier",
    "scoped_type_identifier",
    "generic_type",
    "array_type",
    "integral_type",
    "floating_point_type",
    "boolean_type",
    "void_type",
];

const NAME_KINDS: &[&str] = &[SCOPED_IDENTIFIER, IDENTIFIER];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHeader {
    pub imports: Vec<String>,
    pub package: Option<String>,
}

/// Extracts every top-level class of a parsed file, each carrying the
/// file's imports and package.
pub fn extract_file(root: &SourceNode, source: &str) -> Vec<ClassEntity> {
    let header = extract_imports_and_package(root, source);
    root.children()
        .iter()
        .filter(|node| node.kind() == CLASS_DECLARATION)
        .map(|node| {
            let mut class = extract_class(node, source);
            class.imports = header.imports.clone();
            class.package = header.package.clone();
            class
        })
        .collect()
}

pub fn extract_imports_and_package(root: &SourceNode, source: &str) -> FileHeader {
    let imports = find_all_descendants_of_kind(root, IMPORT_DECLARATION)
        .into_iter()
        .filter_map(|decl| {
            let name = find_first_child_of_kinds(decl, NAME_KINDS)?;
            let mut text = node_text(name, source).to_string();
            if find_first_child_of_kind(decl, ASTERISK).is_some() {
                text.push_str(".*");
            }
            Some(text)
        })
        .collect();
    let package = find_first_child_of_kind(root, PACKAGE_DECLARATION)
        .and_then(|decl| find_first_child_of_kinds(decl, NAME_KINDS))
        .map(|name| node_text(name, source).to_string());
    FileHeader { imports, package }
}

pub fn extract_class(node: &SourceNode, source: &str) -> ClassEntity {
    let name = find_first_child_of_kind(node, IDENTIFIER).map(|n| node_text(n, source).to_string());
    let (modifiers, annotations) = extract_modifiers(node, source);
    let methods: Vec<MethodEntity> = find_all_descendants_of_kind(node, METHOD_DECLARATION)
        .into_iter()
        .map(|method| extract_method(method, source))
        .collect();
    let fields: Vec<FieldEntity> = find_all_descendants_of_kind(node, FIELD_DECLARATION)
        .into_iter()
        .flat_map(|field| extract_field(field, source))
        .collect();
    let extends = find_first_child_of_kind(node, SUPERCLASS)
        .and_then(|clause| clause.named_children().next())
        .map(|ty| node_text(ty, source).to_string());
    let implements: Vec<String> = find_first_child_of_kind(node, SUPER_INTERFACES)
        .and_then(|clause| find_first_child_of_kind(clause, TYPE_LIST))
        .map(|list| {
            list.named_children()
                .map(|ty| node_text(ty, source).to_string())
                .collect()
        })
        .unwrap_or_default();

    ClassEntity {
        name,
        modifiers,
        annotations,
        methods,
        fields,
        imports: Vec::new(),
        package: None,
        extends,
        implements,
    }
}

pub fn extract_method(node: &SourceNode, source: &str) -> MethodEntity {
    let name = find_first_child_of_kind(node, IDENTIFIER).map(|n| node_text(n, source).to_string());
    let return_type = type_child(node).map(|ty| node_text(ty, source).to_string());
    let parameters = find_first_child_of_kind(node, FORMAL_PARAMETERS)
        .map(|params| extract_parameters(params, source))
        .unwrap_or_default();
    let (modifiers, annotations) = extract_modifiers(node, source);

    let body_node = child_by_field(node, "body").or_else(|| find_first_child_of_kind(node, BLOCK));
    let body = body_node.map(|b| node_text(b, source).to_string());
    let call_sites = body_node
        .map(|b| extract_call_sites(b, source))
        .unwrap_or_default();
    let calls = call_sites.iter().map(|site| site.name.clone()).collect();
    let decision_points = body_node.map(count_decision_points).unwrap_or(0);
    let metrics =
        metrics::method_metrics(node_text(node, source), body.as_deref(), decision_points);

    MethodEntity {
        name,
        return_type,
        parameters,
        modifiers,
        annotations,
        body,
        calls,
        call_sites,
        loc: metrics.loc,
        complexity: metrics.complexity,
        duplication_hash: metrics.duplication_hash,
    }
}

/// One record per declarator; all share the declaration's type and modifiers.
pub fn extract_field(node: &SourceNode, source: &str) -> Vec<FieldEntity> {
    let field_type = type_child(node).map(|ty| node_text(ty, source).to_string());
    let (modifiers, _) = extract_modifiers(node, source);
    node.children()
        .iter()
        .filter(|child| child.kind() == VARIABLE_DECLARATOR)
        .map(|declarator| FieldEntity {
            name: child_by_field(declarator, "name")
                .or_else(|| find_first_child_of_kind(declarator, IDENTIFIER))
                .map(|n| node_text(n, source).to_string()),
            field_type: field_type.clone(),
            modifiers: modifiers.clone(),
            initializer: child_by_field(declarator, "value")
                .map(|value| node_text(value, source).to_string()),
        })
        .collect()
}

fn type_child(node: &SourceNode) -> Option<&SourceNode> {
    child_by_field(node, "type").or_else(|| find_first_child_of_kinds(node, TYPE_KINDS))
}

fn extract_parameters(params: &SourceNode, source: &str) -> Vec<Parameter> {
    params
        .children()
        .iter()
        .filter_map(|param| match param.kind() {
            FORMAL_PARAMETER => Some(Parameter {
                name: child_by_field(param, "name")
                    .or_else(|| find_first_child_of_kind(param, IDENTIFIER))
                    .map(|n| node_text(n, source).to_string()),
                param_type: type_child(param).map(|ty| node_text(ty, source).to_string()),
            }),
            SPREAD_PARAMETER => Some(Parameter {
                name: find_first_child_of_kind(param, VARIABLE_DECLARATOR)
                    .and_then(|decl| find_first_child_of_kind(decl, IDENTIFIER))
                    .map(|n| node_text(n, source).to_string()),
                param_type: type_child(param).map(|ty| format!("{}...", node_text(ty, source))),
            }),
            _ => None,
        })
        .collect()
}

/// Modifier keywords in vocabulary order, plus annotation names in source
/// order, read from the declaration's `modifiers` child.
fn extract_modifiers(node: &SourceNode, source: &str) -> (Vec<Modifier>, Vec<String>) {
    let Some(mods) = find_first_child_of_kind(node, MODIFIERS) else {
        return (Vec::new(), Vec::new());
    };
    let modifiers = Modifier::ALL
        .into_iter()
        .filter(|modifier| find_first_child_of_kind(mods, modifier.keyword()).is_some())
        .collect();
    let annotations = mods
        .children()
        .iter()
        .filter(|child| matches!(child.kind(), MARKER_ANNOTATION | ANNOTATION))
        .filter_map(|annotation| {
            child_by_field(annotation, "name")
                .or_else(|| find_first_child_of_kinds(annotation, NAME_KINDS))
                .map(|name| node_text(name, source).to_string())
        })
        .collect();
    (modifiers, annotations)
}

/// `?` only counts as a ternary; the wildcard in `List<?>` is not a branch.
fn count_decision_points(body: &SourceNode) -> usize {
    walk_preorder(body)
        .filter(|node| {
            node.kind() == TERNARY_EXPRESSION
                || (!node.is_named() && DECISION_TOKENS.contains(&node.kind()))
        })
        .count()
}

fn extract_call_sites(body: &SourceNode, source: &str) -> Vec<CallSite> {
    find_all_descendants_of_kind(body, METHOD_INVOCATION)
        .into_iter()
        .filter_map(|call| {
            let name = child_by_field(call, "name")?;
            let receiver = child_by_field(call, "object").map(|obj| node_text(obj, source).to_string());
            Some(CallSite {
                receiver,
                name: node_text(name, source).to_string(),
            })
        })
        .collect()
}
