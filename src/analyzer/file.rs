use crate::analyzer::extract;
use crate::analyzer::tree::JavaParser;
use crate::error::Result;
use crate::graph::{RegisterOptions, RelationshipGraph};
use crate::model::ClassEntity;
use std::path::Path;
use tracing::debug;

/// Parses and extracts one file at a time, reusing a single parser.
pub struct FileAnalyzer {
    parser: JavaParser,
    register: RegisterOptions,
}

impl FileAnalyzer {
    pub fn new() -> Result<Self> {
        Self::with_options(RegisterOptions::default())
    }

    pub fn with_options(register: RegisterOptions) -> Result<Self> {
        Ok(Self {
            parser: JavaParser::new()?,
            register,
        })
    }

    /// Extracts the classes of `source` without touching any graph.
    /// `path` only labels parse errors.
    pub fn extract_source(&mut self, source: &str, path: &Path) -> Result<Vec<ClassEntity>> {
        let root = self.parser.parse(source, path)?;
        Ok(extract::extract_file(&root, source))
    }

    /// Reads, parses, extracts, then registers the classes into `graph`.
    /// The graph is only touched once extraction has succeeded.
    pub fn analyze_file(
        &mut self,
        path: &Path,
        graph: &mut RelationshipGraph,
    ) -> Result<Vec<ClassEntity>> {
        let source = crate::util::read_to_string(path)?;
        let classes = self.extract_source(&source, path)?;
        graph.register_classes(&classes, self.register);
        debug!(
            path = %path.display(),
            classes = classes.len(),
            "extracted file"
        );
        Ok(classes)
    }
}
