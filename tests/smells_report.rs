use javagraph::analyzer::FileAnalyzer;
use javagraph::cluster::cluster_methods;
use javagraph::config::SmellThresholds;
use javagraph::model::AnalysisResult;
use javagraph::smells::{SmellKind, detect_smells};
use std::path::Path;

fn analyze(files: &[(&str, &str)]) -> AnalysisResult {
    let mut analyzer = FileAnalyzer::new().unwrap();
    let mut result = AnalysisResult::new();
    for (path, source) in files {
        let classes = analyzer.extract_source(source, Path::new(path)).unwrap();
        result.insert(path.to_string(), classes);
    }
    result
}

fn tight_thresholds() -> SmellThresholds {
    SmellThresholds {
        max_methods: 2,
        max_fields: 1,
        max_method_lines: 4,
        envy_min_calls: 3,
        envy_ratio: 1.0,
    }
}

#[test]
fn large_class_and_long_method() {
    let source = r#"
class Busy {
    int a;
    int b;
    void one() {}
    void two() {}
    void three() {
        step();
        step();
        step();
        step();
    }
}
"#;
    let result = analyze(&[("Busy.java", source)]);
    let report = detect_smells(&result, &tight_thresholds());

    let large: Vec<_> = report.of_kind(SmellKind::LargeClass).collect();
    assert_eq!(large.len(), 1);
    assert_eq!(large[0].class, "Busy");
    assert_eq!(large[0].method, None);

    let long: Vec<_> = report.of_kind(SmellKind::LongMethod).collect();
    assert_eq!(long.len(), 1);
    assert_eq!(long[0].method.as_deref(), Some("three"));
    assert_eq!(report.counts[&SmellKind::LongMethod], 1);
}

#[test]
fn feature_envy_ignores_own_fields() {
    let source = r#"
class Invoice {
    private Ledger ledger;

    void settle(Customer customer) {
        customer.address();
        customer.discount();
        customer.credit();
        total();
    }

    void record() {
        ledger.add();
        this.ledger.flush();
        ledger.close();
        ledger.sync();
    }
}
"#;
    let result = analyze(&[("Invoice.java", source)]);
    let report = detect_smells(&result, &SmellThresholds::default());
    let envy: Vec<_> = report.of_kind(SmellKind::FeatureEnvy).collect();
    assert_eq!(envy.len(), 1);
    assert_eq!(envy[0].method.as_deref(), Some("settle"));
    assert!(envy[0].detail.contains("`customer`"));
}

#[test]
fn duplicate_bodies_across_files() {
    let body = r#"{
        int total = 0;
        for (int i = 0; i < 10; i++) { total += i; }
        return total;
    }"#;
    let first = format!("class A {{ int sum() {body} }}");
    let second = format!("class B {{ int accumulate() {body} }}");
    let result = analyze(&[("A.java", first.as_str()), ("B.java", second.as_str())]);
    let report = detect_smells(&result, &SmellThresholds::default());
    let dups: Vec<_> = report.of_kind(SmellKind::DuplicateBody).collect();
    assert_eq!(dups.len(), 2);
    assert!(dups.iter().any(|s| s.detail.contains("B.accumulate (B.java)")));
    assert!(dups.iter().any(|s| s.detail.contains("A.sum (A.java)")));
}

#[test]
fn clusters_separate_unrelated_vocabularies() {
    let source = r#"
class Mixed {
    void billOrder() { order.total(); invoice.send(order); }
    void refundOrder() { order.refund(); invoice.cancel(order); }
    void openSocket() { socket.connect(host); stream.open(socket); }
    void closeSocket() { socket.disconnect(host); stream.close(socket); }
}
"#;
    let result = analyze(&[("Mixed.java", source)]);
    let clusters = cluster_methods(&result, 2);
    assert_eq!(clusters.len(), 2);

    let billing = clusters
        .iter()
        .find(|c| c.members.contains(&"Mixed.billOrder".to_string()))
        .unwrap();
    assert_eq!(
        billing.members,
        vec!["Mixed.billOrder".to_string(), "Mixed.refundOrder".to_string()]
    );
    assert!(billing.top_terms.contains(&"order".to_string()));

    let network = clusters.iter().find(|c| c.id != billing.id).unwrap();
    assert_eq!(
        network.members,
        vec!["Mixed.openSocket".to_string(), "Mixed.closeSocket".to_string()]
    );
}

#[test]
fn clustering_handles_degenerate_inputs() {
    let result = analyze(&[("Empty.java", "abstract class Empty { abstract void x(); }")]);
    assert!(cluster_methods(&result, 3).is_empty());

    let result = analyze(&[("One.java", "class One { void a() { work(); } }")]);
    let clusters = cluster_methods(&result, 4);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].members, vec!["One.a".to_string()]);
    assert!(cluster_methods(&result, 0).is_empty());
}
