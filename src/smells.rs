use crate::config::SmellThresholds;
use crate::model::{AnalysisResult, CallSite, ClassEntity, MethodEntity};
use serde::Serialize;
use std::collections::BTreeMap;

/// Bodies shorter than this are too trivial to report as duplicates.
const MIN_DUPLICATE_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SmellKind {
    LargeClass,
    LongMethod,
    FeatureEnvy,
    DuplicateBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Smell {
    pub kind: SmellKind,
    pub file: String,
    pub class: String,
    pub method: Option<String>,
    pub detail: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SmellReport {
    pub smells: Vec<Smell>,
    pub counts: BTreeMap<SmellKind, usize>,
}

impl SmellReport {
    fn push(&mut self, smell: Smell) {
        *self.counts.entry(smell.kind).or_default() += 1;
        self.smells.push(smell);
    }

    pub fn of_kind(&self, kind: SmellKind) -> impl Iterator<Item = &Smell> {
        self.smells.iter().filter(move |smell| smell.kind == kind)
    }
}

pub fn detect_smells(result: &AnalysisResult, thresholds: &SmellThresholds) -> SmellReport {
    let mut report = SmellReport::default();
    let mut bodies: BTreeMap<&str, Vec<(&str, &ClassEntity, &MethodEntity)>> = BTreeMap::new();

    for (file, class) in result.classes() {
        if class.methods.len() > thresholds.max_methods || class.fields.len() > thresholds.max_fields {
            report.push(Smell {
                kind: SmellKind::LargeClass,
                file: file.to_string(),
                class: class.display_name().to_string(),
                method: None,
                detail: format!(
                    "{} methods (max {}), {} fields (max {})",
                    class.methods.len(),
                    thresholds.max_methods,
                    class.fields.len(),
                    thresholds.max_fields
                ),
            });
        }

        for method in &class.methods {
            if method.loc > thresholds.max_method_lines {
                report.push(method_smell(
                    SmellKind::LongMethod,
                    file,
                    class,
                    method,
                    format!("{} lines (max {})", method.loc, thresholds.max_method_lines),
                ));
            }
            if let Some(detail) = feature_envy(class, method, thresholds) {
                report.push(method_smell(SmellKind::FeatureEnvy, file, class, method, detail));
            }
            if let Some(hash) = method.duplication_hash.as_deref() {
                let lines = method.body.as_deref().map(crate::util::line_span).unwrap_or(0);
                if lines >= MIN_DUPLICATE_LINES {
                    bodies.entry(hash).or_default().push((file, class, method));
                }
            }
        }
    }

    for group in bodies.values().filter(|group| group.len() > 1) {
        for (index, (file, class, method)) in group.iter().enumerate() {
            let others: Vec<String> = group
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .map(|(_, (other_file, other_class, other_method))| {
                    format!("{} ({other_file})", other_class.method_id(other_method))
                })
                .collect();
            report.push(method_smell(
                SmellKind::DuplicateBody,
                file,
                class,
                method,
                format!("same body as {}", others.join(", ")),
            ));
        }
    }

    report
}

fn method_smell(
    kind: SmellKind,
    file: &str,
    class: &ClassEntity,
    method: &MethodEntity,
    detail: String,
) -> Smell {
    Smell {
        kind,
        file: file.to_string(),
        class: class.display_name().to_string(),
        method: Some(method.display_name().to_string()),
        detail,
    }
}

/// A method envies another object when most of its calls go through that
/// object rather than through its own class.
fn feature_envy(
    class: &ClassEntity,
    method: &MethodEntity,
    thresholds: &SmellThresholds,
) -> Option<String> {
    let mut local = 0usize;
    let mut foreign: Vec<(&str, usize)> = Vec::new();
    for site in &method.call_sites {
        match foreign_receiver(class, site) {
            None => local += 1,
            Some(receiver) => match foreign.iter_mut().find(|(name, _)| *name == receiver) {
                Some((_, count)) => *count += 1,
                None => foreign.push((receiver, 1)),
            },
        }
    }
    let foreign_total: usize = foreign.iter().map(|(_, count)| count).sum();
    if foreign.is_empty() || foreign_total < thresholds.envy_min_calls {
        return None;
    }
    if (foreign_total as f64) <= (local as f64) * thresholds.envy_ratio {
        return None;
    }
    let mut top = foreign[0];
    for candidate in &foreign[1..] {
        if candidate.1 > top.1 {
            top = *candidate;
        }
    }
    Some(format!(
        "{foreign_total} foreign calls vs {local} local; mostly through `{}` ({} calls)",
        top.0, top.1
    ))
}

fn foreign_receiver<'a>(class: &ClassEntity, site: &'a CallSite) -> Option<&'a str> {
    let receiver = site.receiver.as_deref()?;
    if receiver == "this" || receiver == "super" {
        return None;
    }
    let field = receiver.strip_prefix("this.").unwrap_or(receiver);
    if class.has_field(field) {
        return None;
    }
    Some(receiver)
}
