use blake3::Hasher;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodMetrics {
    pub loc: usize,
    pub complexity: usize,
    pub duplication_hash: Option<String>,
}

/// `declaration` is the full method text, `body` the block (if any).
/// `decision_points` are the branch nodes the extractor counted in the body
/// (`if`, loops, `case`, `catch`, `&&`, `||`, ternaries).
pub fn method_metrics(
    declaration: &str,
    body: Option<&str>,
    decision_points: usize,
) -> MethodMetrics {
    MethodMetrics {
        loc: crate::util::line_span(declaration),
        complexity: 1 + decision_points,
        duplication_hash: duplication_hash(body.unwrap_or("")),
    }
}

fn duplication_hash(snippet: &str) -> Option<String> {
    let normalized: String = snippet.chars().filter(|ch| !ch.is_whitespace()).collect();
    if normalized.is_empty() {
        return None;
    }
    let mut hasher = Hasher::new();
    hasher.update(normalized.as_bytes());
    Some(hasher.finalize().to_hex().to_string())
}
