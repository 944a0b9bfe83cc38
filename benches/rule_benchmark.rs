//! Benchmarks for rule parsing, combining and evaluation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rule_ast_core::rule::{combine_rules, evaluate, parse, Connective, RuleCache};
use rule_ast_core::{AttributeValue, Attributes};

const RULES: [&str; 5] = [
    "age > 30",
    "age > 30 AND department = 'Sales'",
    "age > 30 OR salary > 50000",
    "((age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing')) AND (salary > 50000 OR experience > 5)",
    "a > 1 AND b > 2 AND c > 3 AND d > 4 AND e > 5",
];

/// Create a realistic attribute record
fn create_attributes() -> Attributes {
    let mut attrs = Attributes::new();
    attrs.insert("age".to_string(), AttributeValue::Integer(35));
    attrs.insert("department".to_string(), AttributeValue::from("Sales"));
    attrs.insert("salary".to_string(), AttributeValue::Integer(60000));
    attrs.insert("experience".to_string(), AttributeValue::Integer(3));
    for (i, name) in ["a", "b", "c", "d", "e"].iter().enumerate() {
        attrs.insert(name.to_string(), AttributeValue::Integer(i as i32 + 2));
    }
    attrs
}

fn benchmark_parsing(c: &mut Criterion) {
    c.bench_function("rule_parsing", |b| {
        b.iter(|| {
            for rule in &RULES {
                let _ = black_box(parse(black_box(rule)));
            }
        })
    });

    let cache = RuleCache::default();
    c.bench_function("rule_parsing_cached", |b| {
        // Warm up cache
        for rule in &RULES {
            let _ = cache.get_or_parse(rule);
        }

        b.iter(|| {
            for rule in &RULES {
                let _ = black_box(cache.get_or_parse(black_box(rule)));
            }
        })
    });
}

fn benchmark_evaluation(c: &mut Criterion) {
    let attrs = create_attributes();
    let trees: Vec<_> = RULES.iter().map(|rule| parse(rule).unwrap()).collect();

    c.bench_function("rule_evaluation", |b| {
        b.iter(|| {
            for tree in &trees {
                let _ = black_box(evaluate(black_box(tree), &attrs));
            }
        })
    });
}

fn benchmark_combining(c: &mut Criterion) {
    let rules: Vec<String> = (0..50).map(|i| format!("age > {}", i)).collect();

    c.bench_function("combine_50_rules", |b| {
        b.iter(|| black_box(combine_rules(black_box(&rules), Connective::Or)))
    });
}

criterion_group!(benches, benchmark_parsing, benchmark_evaluation, benchmark_combining);
criterion_main!(benches);
