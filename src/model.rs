use blake3::Hasher;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Placeholder used in graph ids when a class or method has no parsed name.
pub const ANONYMOUS: &str = "<anonymous>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Static,
    Final,
    Abstract,
}

impl Modifier {
    pub const ALL: [Modifier; 6] = [
        Modifier::Public,
        Modifier::Private,
        Modifier::Protected,
        Modifier::Static,
        Modifier::Final,
        Modifier::Abstract,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Private => "private",
            Modifier::Protected => "protected",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Abstract => "abstract",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub param_type: Option<String>,
}

/// One method invocation inside a body. `receiver` is the raw qualifier text
/// (`a.b` for `a.b.run()`), absent for unqualified calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSite {
    pub receiver: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodEntity {
    pub name: Option<String>,
    pub return_type: Option<String>,
    pub parameters: Vec<Parameter>,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<String>,
    pub body: Option<String>,
    pub calls: Vec<String>,
    pub call_sites: Vec<CallSite>,
    pub loc: usize,
    pub complexity: usize,
    pub duplication_hash: Option<String>,
}

impl MethodEntity {
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(ANONYMOUS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldEntity {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    pub modifiers: Vec<Modifier>,
    pub initializer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassEntity {
    pub name: Option<String>,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<String>,
    pub methods: Vec<MethodEntity>,
    pub fields: Vec<FieldEntity>,
    pub imports: Vec<String>,
    pub package: Option<String>,
    pub extends: Option<String>,
    pub implements: Vec<String>,
}

impl ClassEntity {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(ANONYMOUS)
    }

    /// Graph id of one of this class's methods: `ClassName.methodName`.
    pub fn method_id(&self, method: &MethodEntity) -> String {
        format!("{}.{}", self.display_name(), method.display_name())
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name.as_deref() == Some(name))
    }
}

/// Relative file path → classes declared in that file, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnalysisResult {
    files: BTreeMap<String, Vec<ClassEntity>>,
}

impl AnalysisResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rel_path: String, classes: Vec<ClassEntity>) {
        self.files.insert(rel_path, classes);
    }

    pub fn get(&self, rel_path: &str) -> Option<&[ClassEntity]> {
        self.files.get(rel_path).map(Vec::as_slice)
    }

    pub fn contains(&self, rel_path: &str) -> bool {
        self.files.contains_key(rel_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<ClassEntity>> {
        self.files.iter()
    }

    /// Every class in the run, paired with the file it came from.
    pub fn classes(&self) -> impl Iterator<Item = (&str, &ClassEntity)> {
        self.files
            .iter()
            .flat_map(|(path, classes)| classes.iter().map(move |c| (path.as_str(), c)))
    }

    /// blake3 over the canonical JSON dump; equal results give equal digests.
    pub fn digest(&self) -> String {
        let mut hasher = Hasher::new();
        match serde_json::to_vec(self) {
            Ok(bytes) => {
                hasher.update(&bytes);
            }
            Err(_) => {
                hasher.update(format!("{:?}", self.files).as_bytes());
            }
        }
        hasher.finalize().to_hex().to_string()
    }
}

impl<'a> IntoIterator for &'a AnalysisResult {
    type Item = (&'a String, &'a Vec<ClassEntity>);
    type IntoIter = btree_map::Iter<'a, String, Vec<ClassEntity>>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub scanned: usize,
    pub analyzed: usize,
    pub skipped: usize,
    pub classes: usize,
    pub methods: usize,
    pub fields: usize,
    pub graph_nodes: usize,
    pub graph_edges: usize,
    pub duration_ms: u64,
}
