// Syntax tree handed over by the front-end.
// The engine only reads these nodes; ranges are byte offsets into the file
// named by `file`.

use serde::{Deserialize, Serialize};

use crate::domain::types::TypeDescriptor;

/// Index into `TranslationUnit::files`. Index 0 is the primary file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u32);

impl FileId {
    pub const PRIMARY: FileId = FileId(0);
}

/// Half-open byte range `[begin, end)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    pub begin: usize,
    pub end: usize,
}

impl SourceRange {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    /// Zero-width range, used by point insertions.
    pub fn point(offset: usize) -> Self {
        Self { begin: offset, end: offset }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    pub fn is_empty(&self) -> bool {
        self.begin >= self.end
    }

    /// True if the two ranges share at least one byte, or if one of them is
    /// a point strictly inside the other.
    pub fn overlaps(&self, other: &SourceRange) -> bool {
        self.begin < other.end && other.begin < self.end
    }
}

impl std::fmt::Display for SourceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}

/// A parsed translation unit: the file table plus the root node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationUnit {
    /// `files[0]` is the primary file, the rest are included files.
    pub files: Vec<String>,
    pub root: SyntaxNode,
}

impl TranslationUnit {
    pub fn primary_path(&self) -> Option<&str> {
        self.files.first().map(String::as_str)
    }
}

/// A node in the syntax tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub range: SourceRange,
    #[serde(default)]
    pub file: FileId,
    #[serde(default)]
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, range: SourceRange) -> Self {
        Self {
            kind,
            range,
            file: FileId::PRIMARY,
            children: Vec::new(),
        }
    }

    pub fn in_file(mut self, file: FileId) -> Self {
        self.file = file;
        self
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SyntaxNode::count).sum::<usize>()
    }
}

/// Node kinds the rewrite rules care about. Everything else comes in as
/// `Other` and is only traversed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    TranslationUnit,
    If(Conditional),
    For(Conditional),
    While(Conditional),
    Do(Conditional),
    Var(VarDecl),
    Function(FunctionDecl),
    Unary(UnaryExpr),
    Call(CallExpr),
    #[serde(other)]
    Other,
}

/// Condition part of a branch or loop statement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conditional {
    /// `None` for `for (;;)`.
    #[serde(default)]
    pub condition: Option<SourceRange>,
    /// Set when the condition declares a variable, e.g. `if (int x = f())`.
    #[serde(default)]
    pub condition_variable: Option<SourceRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageClass {
    /// Block-scope variable with automatic storage.
    Automatic,
    /// Block-scope `static` variable.
    StaticLocal,
    /// Namespace or file scope variable.
    Global,
    /// Class or struct member.
    Field,
    /// Function parameter.
    Parameter,
}

/// A variable, field or parameter declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    pub storage: StorageClass,
    /// Resolved type. For parameters written with array syntax this is the
    /// decayed pointer type.
    pub ty: TypeDescriptor,
    /// Type as written, when it differs from `ty` (array parameters).
    #[serde(default)]
    pub original_ty: Option<TypeDescriptor>,
    /// Textual rendering of the declared type, e.g. `int [10]`.
    pub type_spelling: String,
    /// Token range of the type as written in the source.
    pub type_range: SourceRange,
    /// From the first type token to the end of the declarator, initializer
    /// excluded.
    pub declarator_range: SourceRange,
}

impl VarDecl {
    /// The type the user wrote, before any array-to-pointer decay.
    pub fn declared_type(&self) -> &TypeDescriptor {
        self.original_ty.as_ref().unwrap_or(&self.ty)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub name_range: SourceRange,
    pub return_type: TypeDescriptor,
    pub return_type_range: SourceRange,
    /// Range of the compound body, braces included.
    #[serde(default)]
    pub body: Option<SourceRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOpcode {
    PostInc,
    PreInc,
    PostDec,
    PreDec,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub opcode: UnaryOpcode,
    pub operand: SourceRange,
    /// Range of the operator token itself.
    pub operator: SourceRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallExpr {
    /// Name of the directly called function, if the callee is a plain name.
    #[serde(default)]
    pub callee: Option<String>,
    pub callee_range: SourceRange,
    /// Resolved return type spelling, e.g. `unsigned int`.
    pub return_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Arithmetic, TypeDescriptor};

    #[test]
    fn test_overlap_rules() {
        let a = SourceRange::new(10, 20);
        assert!(a.overlaps(&SourceRange::new(15, 25)));
        assert!(a.overlaps(&SourceRange::point(12)));
        assert!(!a.overlaps(&SourceRange::point(10)));
        assert!(!a.overlaps(&SourceRange::point(20)));
        assert!(!a.overlaps(&SourceRange::new(20, 30)));
        assert!(!SourceRange::point(5).overlaps(&SourceRange::point(5)));
    }

    #[test]
    fn test_count_includes_descendants() {
        let leaf = |b| SyntaxNode::new(NodeKind::Other, SourceRange::new(b, b + 1));
        let root = SyntaxNode::new(NodeKind::TranslationUnit, SourceRange::new(0, 10))
            .with_children(vec![leaf(1).with_children(vec![leaf(2)]), leaf(3)]);
        assert_eq!(root.count(), 4);
    }

    #[test]
    fn test_deserialize_var_node() {
        let json = r#"{
            "kind": {
                "type": "var",
                "name": "x",
                "storage": "automatic",
                "ty": {"type": "arithmetic", "kind": "integer"},
                "type_spelling": "int",
                "type_range": {"begin": 4, "end": 7},
                "declarator_range": {"begin": 4, "end": 9}
            },
            "range": {"begin": 4, "end": 9}
        }"#;
        let node: SyntaxNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.file, FileId::PRIMARY);
        match node.kind {
            NodeKind::Var(decl) => {
                assert_eq!(decl.name, "x");
                assert_eq!(decl.storage, StorageClass::Automatic);
                assert_eq!(
                    decl.declared_type(),
                    &TypeDescriptor::Arithmetic { kind: Arithmetic::Integer }
                );
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_is_other() {
        let json = r#"{"kind": {"type": "lambda_expr"}, "range": {"begin": 0, "end": 1}}"#;
        let node: SyntaxNode = serde_json::from_str(json).unwrap();
        assert!(matches!(node.kind, NodeKind::Other));
    }
}
