use crate::core::checker::RuleChecker;
use crate::core::cognitive::{CognitiveModel, Stability};
use crate::core::models::RuleSyntax;
use crate::storage::model_store::ModelStore;
use crate::storage::rule_store::RuleStore;
use std::fs;
use tempfile::tempdir;

fn store_with(dir: &std::path::Path, rules: &[&str]) -> RuleStore {
    let store = RuleStore::new(dir.join("input.txt"));
    for rule in rules {
        store.add(rule).unwrap();
    }
    store
}

#[test]
fn sim_contradiction_from_rule_file() {
    let dir = tempdir().unwrap();
    let store = store_with(dir.path(), &["If rain, then wet", "If rain, then flood"]);

    let report = RuleChecker::default().check_all(&store.load().unwrap());

    assert_eq!(report.consistency.contradictions.len(), 1);
    assert_eq!(report.consistency.contradictions[0].condition, "rain");
    assert_eq!(report.consistency.conditions(), &["rain".to_string()]);
    assert_eq!(report.consistency.matrix.cells, vec![vec![0]]);
    // 同一条件的第二条规则也是冗余的
    assert_eq!(report.redundancy.rules(), vec!["If rain, then flood"]);
}

#[test]
fn sim_duplicate_rule_is_redundant_not_contradictory() {
    let dir = tempdir().unwrap();
    let store = store_with(dir.path(), &["If A, then B", "If A, then B"]);

    let report = RuleChecker::default().check_all(&store.load().unwrap());

    assert!(report.consistency.contradictions.is_empty());
    assert_eq!(report.redundancy.redundant.len(), 1);
    assert_eq!(report.redundancy.redundant[0].index, 1);
    assert!(report.cycles.cycles.is_empty());
}

#[test]
fn sim_cycle_from_rule_file() {
    let dir = tempdir().unwrap();
    let store = store_with(dir.path(), &["If A, then B", "If B, then A"]);

    let report = RuleChecker::default().check_all(&store.load().unwrap());

    assert_eq!(
        report.cycles.cycles,
        vec![vec!["A".to_string(), "B".to_string()]]
    );
    assert!(report.render_text().contains("[A, B]"));
}

#[test]
fn sim_missing_file_gives_empty_report() {
    let dir = tempdir().unwrap();
    let store = RuleStore::new(dir.path().join("absent.txt"));

    let report = RuleChecker::default().check_all(&store.load().unwrap());

    assert!(report.is_clean());
    assert!(report.consistency.matrix.is_empty());
    assert!(report.redundancy.counts.is_empty());
    assert_eq!(report.cycles.graph.node_count(), 0);
    assert!(!dir.path().join("absent.txt").exists());
}

#[test]
fn sim_malformed_line_kept_but_ignored() {
    let dir = tempdir().unwrap();
    let store = store_with(dir.path(), &["Random text", "If A, then B", "Random text"]);

    let rules = store.load().unwrap();
    assert_eq!(rules, vec!["Random text", "If A, then B", "Random text"]);

    let report = RuleChecker::default().check_all(&rules);
    assert_eq!(report.total_rules, 3);
    assert_eq!(report.parsed_rules, 1);
    assert!(report.is_clean());
    assert_eq!(report.cycles.graph.nodes(), vec!["A", "B"]);

    // 删除规则后，格式不符的行仍然保留
    store.delete(1).unwrap();
    assert_eq!(store.load().unwrap(), vec!["Random text", "Random text"]);
}

#[test]
fn sim_russian_rule_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("input.txt");
    fs::write(
        &path,
        "Если дождь, то мокро\nЕсли мокро, то дождь\nЕсли дождь, то потоп\n",
    )
    .unwrap();

    let rules = RuleStore::new(path).load().unwrap();
    let report = RuleChecker::new(RuleSyntax::russian()).check_all(&rules);

    assert_eq!(report.consistency.contradictions.len(), 1);
    assert_eq!(report.redundancy.count_of("дождь"), 2);
    assert_eq!(
        report.cycles.cycles,
        vec![vec!["дождь".to_string(), "мокро".to_string()]]
    );

    // 英文语法下这些规则全部被忽略
    let report = RuleChecker::default().check_all(&rules);
    assert_eq!(report.parsed_rules, 0);
}

#[test]
fn sim_checks_do_not_keep_state_between_runs() {
    let checker = RuleChecker::default();

    let first = checker.check_all(&["If A, then B", "If A, then C"]);
    assert_eq!(first.consistency.contradictions.len(), 1);

    let second = checker.check_all(&["If A, then C"]);
    assert!(second.consistency.contradictions.is_empty());
    assert!(second.redundancy.redundant.is_empty());
}

#[test]
fn sim_cognitive_model_file_stability() {
    let dir = tempdir().unwrap();
    let store = ModelStore::new(dir.path().join("model.json"));

    let mut model = store.load().unwrap();
    assert_eq!(model.check_stability().stability, Stability::Undefined);

    for v in ["price", "demand", "supply"] {
        model.add_parameter(v).unwrap();
    }
    let c = CognitiveModel::parse_connection("price, demand, -0.6").unwrap();
    model.add_connection(&c.from, &c.to, c.weight).unwrap();
    model.add_connection("demand", "supply", 0.5).unwrap();
    model.add_connection("supply", "price", -0.4).unwrap();
    store.save(&model).unwrap();

    let loaded = store.load().unwrap();
    // 三阶循环，特征值的模为 (0.6*0.5*0.4)^(1/3)
    let report = loaded.check_stability();
    assert_eq!(report.stability, Stability::Stable);
    let expected = (0.6_f64 * 0.5 * 0.4).cbrt();
    assert!((report.spectral_radius.unwrap() - expected).abs() < 1e-6);

    let mut loaded = loaded;
    loaded.add_connection("supply", "price", -10.0).unwrap();
    assert_eq!(loaded.check_stability().stability, Stability::Unstable);
}
