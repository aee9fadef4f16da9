//! Groups methods with similar bodies: TF-IDF over body identifiers, then
//! k-means with farthest-point seeding so runs are reproducible.

use crate::model::AnalysisResult;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

const MAX_ITERATIONS: usize = 100;
const TOP_TERMS: usize = 5;

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "var", "void", "volatile", "while",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodCluster {
    pub id: usize,
    pub members: Vec<String>,
    pub top_terms: Vec<String>,
}

struct Document {
    id: String,
    terms: BTreeMap<String, usize>,
}

/// Sparse TF-IDF row: `(term index, weight)` sorted by term index.
type Row = Vec<(usize, f64)>;

struct Centroid {
    weights: Vec<f64>,
    norm_sq: f64,
}

impl Centroid {
    fn from_row(row: &[(usize, f64)], dims: usize) -> Self {
        let mut weights = vec![0.0; dims];
        for &(dim, weight) in row {
            weights[dim] = weight;
        }
        Self::from_weights(weights)
    }

    fn from_weights(weights: Vec<f64>) -> Self {
        let norm_sq = weights.iter().map(|w| w * w).sum();
        Self { weights, norm_sq }
    }

    /// Squared euclidean distance, `|r|² - 2·r·c + |c|²`, touching only the
    /// row's non-zero terms.
    fn distance(&self, row: &[(usize, f64)]) -> f64 {
        let (row_sq, dot) = row
            .iter()
            .fold((0.0, 0.0), |(sq, dot), &(dim, weight)| {
                (sq + weight * weight, dot + weight * self.weights[dim])
            });
        (row_sq - 2.0 * dot + self.norm_sq).max(0.0)
    }
}

pub fn cluster_methods(result: &AnalysisResult, k: usize) -> Vec<MethodCluster> {
    let documents = collect_documents(result);
    if documents.is_empty() || k == 0 {
        return Vec::new();
    }
    let (vocabulary, rows) = tfidf(&documents);
    let k = k.min(rows.len());
    let mut centroids = seed_centroids(&rows, vocabulary.len(), k);
    let mut assignment = vec![usize::MAX; rows.len()];

    for _ in 0..MAX_ITERATIONS {
        let next: Vec<usize> = rows.iter().map(|row| nearest(row, &centroids)).collect();
        if next == assignment {
            break;
        }
        assignment = next;
        update_centroids(&mut centroids, &rows, &assignment, vocabulary.len());
    }

    let mut members: Vec<Vec<String>> = vec![Vec::new(); centroids.len()];
    for (doc, &cluster) in documents.iter().zip(&assignment) {
        members[cluster].push(doc.id.clone());
    }
    centroids
        .iter()
        .zip(members)
        .enumerate()
        .filter(|(_, (_, members))| !members.is_empty())
        .map(|(cluster, (centroid, members))| MethodCluster {
            id: cluster,
            members,
            top_terms: top_terms(&centroid.weights, &vocabulary),
        })
        .collect()
}

/// Mean of each cluster's rows in one pass. Empty clusters keep their
/// previous centroid.
fn update_centroids(centroids: &mut [Centroid], rows: &[Row], assignment: &[usize], dims: usize) {
    let mut sums = vec![vec![0.0; dims]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];
    for (row, &cluster) in rows.iter().zip(assignment) {
        counts[cluster] += 1;
        for &(dim, weight) in row {
            sums[cluster][dim] += weight;
        }
    }
    for ((centroid, mut sum), count) in centroids.iter_mut().zip(sums).zip(counts) {
        if count == 0 {
            continue;
        }
        sum.iter_mut().for_each(|w| *w /= count as f64);
        *centroid = Centroid::from_weights(sum);
    }
}

fn collect_documents(result: &AnalysisResult) -> Vec<Document> {
    let keywords: HashSet<&str> = JAVA_KEYWORDS.iter().copied().collect();
    let mut documents = Vec::new();
    for (_, class) in result.classes() {
        for method in &class.methods {
            let Some(body) = method.body.as_deref() else {
                continue;
            };
            let terms = tokenize(body, &keywords);
            if terms.is_empty() {
                continue;
            }
            documents.push(Document {
                id: class.method_id(method),
                terms,
            });
        }
    }
    documents
}

fn tokenize(body: &str, keywords: &HashSet<&str>) -> BTreeMap<String, usize> {
    let mut terms = BTreeMap::new();
    for token in body.split(|ch: char| !(ch.is_alphanumeric() || ch == '_')) {
        if token.len() < 2 || token.chars().next().is_some_and(|ch| ch.is_ascii_digit()) {
            continue;
        }
        let token = token.to_lowercase();
        if keywords.contains(token.as_str()) {
            continue;
        }
        *terms.entry(token).or_insert(0) += 1;
    }
    terms
}

/// Smoothed idf (`ln((1 + n) / (1 + df)) + 1`), rows L2-normalized.
fn tfidf(documents: &[Document]) -> (Vec<String>, Vec<Row>) {
    let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in documents {
        for term in doc.terms.keys() {
            *document_frequency.entry(term.as_str()).or_insert(0) += 1;
        }
    }
    let vocabulary: Vec<String> = document_frequency.keys().map(|t| t.to_string()).collect();
    let index: BTreeMap<&str, usize> = document_frequency
        .keys()
        .enumerate()
        .map(|(i, t)| (*t, i))
        .collect();
    let n = documents.len() as f64;
    let idf: Vec<f64> = document_frequency
        .values()
        .map(|df| ((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0)
        .collect();

    let rows = documents
        .iter()
        .map(|doc| {
            // `terms` is ordered like the vocabulary, so the row comes out sorted.
            let mut row: Row = doc
                .terms
                .iter()
                .filter_map(|(term, count)| {
                    let dim = *index.get(term.as_str())?;
                    Some((dim, *count as f64 * idf[dim]))
                })
                .collect();
            normalize(&mut row);
            row
        })
        .collect();
    (vocabulary, rows)
}

fn normalize(row: &mut [(usize, f64)]) {
    let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        row.iter_mut().for_each(|(_, w)| *w /= norm);
    }
}

/// First row, then repeatedly the row farthest from every chosen seed.
fn seed_centroids(rows: &[Row], dims: usize, k: usize) -> Vec<Centroid> {
    let mut centroids = vec![Centroid::from_row(&rows[0], dims)];
    let mut closest: Vec<f64> = rows.iter().map(|row| centroids[0].distance(row)).collect();
    while centroids.len() < k {
        let mut best = 0;
        let mut best_distance = f64::NEG_INFINITY;
        for (i, &d) in closest.iter().enumerate() {
            if d > best_distance {
                best = i;
                best_distance = d;
            }
        }
        let seed = Centroid::from_row(&rows[best], dims);
        for (d, row) in closest.iter_mut().zip(rows) {
            *d = d.min(seed.distance(row));
        }
        centroids.push(seed);
    }
    centroids
}

fn nearest(row: &[(usize, f64)], centroids: &[Centroid]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = c.distance(row);
        if d < best_distance {
            best = i;
            best_distance = d;
        }
    }
    best
}

fn top_terms(centroid: &[f64], vocabulary: &[String]) -> Vec<String> {
    let mut ranked: Vec<(usize, f64)> = centroid
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, weight)| *weight > 0.0)
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(TOP_TERMS)
        .map(|(dim, _)| vocabulary[dim].clone())
        .collect()
}
