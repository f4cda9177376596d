use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tabexpr::expression::{BLOCK_ROWS, FUSED_MIN_ROWS};
use tabexpr::{
    evaluate_expression, evaluate_statement, evaluate_statement_in_place, Environment, Error,
    Table, Value,
};

fn sample_table() -> Table {
    Table::new()
        .with_column("A", vec![1.0, 2.0, 3.0])
        .unwrap()
        .with_column("B", vec![4.0, 5.0, 6.0])
        .unwrap()
}

#[test]
fn test_expression_over_columns() {
    let table = sample_table();
    let env = Environment::new();

    let result = evaluate_expression("A + B", &table, &env).unwrap();
    assert_eq!(result, Value::Series(vec![5.0, 7.0, 9.0]));

    let result = evaluate_expression("A < 2", &table, &env).unwrap();
    assert_eq!(result, Value::Mask(vec![true, false, false]));
}

#[test]
fn test_expression_with_binding() {
    let table = sample_table();
    let mut env = Environment::new();
    env.insert("k", 2.0);

    let result = evaluate_expression("A > @k", &table, &env).unwrap();
    assert_eq!(result, Value::Mask(vec![false, false, true]));
}

#[test]
fn test_assignment_adds_column() {
    let mut table = sample_table();
    let env = Environment::new();

    evaluate_statement_in_place("D = A + B", &mut table, &env).unwrap();
    assert_eq!(table.column("D"), Some(&[5.0, 7.0, 9.0][..]));
    assert_eq!(table.column("A"), Some(&[1.0, 2.0, 3.0][..]));
    assert_eq!(table.column("B"), Some(&[4.0, 5.0, 6.0][..]));
    assert_eq!(table.row_count(), 3);
}

#[test]
fn test_assignment_copy_leaves_input_unchanged() {
    let table = sample_table();
    let env = Environment::new();

    let result = evaluate_statement("D = A * 2", &table, &env).unwrap();
    assert!(result.contains_column("D"));
    assert!(!table.contains_column("D"));

    let names: Vec<&str> = result.column_names().collect();
    assert_eq!(names, vec!["A", "B", "D"]);
}

#[test]
fn test_assignment_is_idempotent() {
    let mut table = sample_table();
    let env = Environment::new();

    evaluate_statement_in_place("D = A + B", &mut table, &env).unwrap();
    let first = table.column("D").unwrap().to_vec();
    evaluate_statement_in_place("D = A + B", &mut table, &env).unwrap();
    assert_eq!(table.column("D"), Some(&first[..]));
    assert_eq!(table.column_count(), 3);
}

#[test]
fn test_chained_comparison_equivalence() {
    let mut rng = StdRng::seed_from_u64(7);
    let n = 500;
    let a: Vec<f64> = (0..n).map(|_| rng.gen_range(-10.0..10.0)).collect();
    let b: Vec<f64> = (0..n).map(|_| rng.gen_range(-10.0..10.0)).collect();
    let c: Vec<f64> = (0..n).map(|_| rng.gen_range(-10.0..10.0)).collect();
    let table = Table::new()
        .with_column("a", a)
        .unwrap()
        .with_column("b", b)
        .unwrap()
        .with_column("c", c)
        .unwrap();
    let env = Environment::new();

    let chained = evaluate_expression("a < b <= c", &table, &env).unwrap();
    let spelled = evaluate_expression("(a < b) and (b <= c)", &table, &env).unwrap();
    assert_eq!(chained, spelled);
}

#[test]
fn test_binding_namespace_is_independent() {
    // a column and a binding share the name `A` without collision
    let table = sample_table();
    let mut env = Environment::new();
    env.insert("A", 100.0);

    let result = evaluate_expression("A + @A", &table, &env).unwrap();
    assert_eq!(result, Value::Series(vec![101.0, 102.0, 103.0]));
}

#[test]
fn test_shape_mismatch_is_an_error_not_truncation() {
    let table = sample_table();
    let mut env = Environment::new();
    env.insert("v", vec![1.0, 2.0, 3.0, 4.0]);

    let err = evaluate_expression("A + @v", &table, &env).unwrap_err();
    assert_eq!(err, Error::Shape { left: 4, right: 3 });
}

#[test]
fn test_error_positions() {
    let table = sample_table();
    let env = Environment::new();

    match evaluate_expression("A + ", &table, &env).unwrap_err() {
        Error::Syntax { position, .. } => assert_eq!(position, 4),
        other => panic!("expected syntax error, got {:?}", other),
    }

    match evaluate_expression("A + missing", &table, &env).unwrap_err() {
        Error::Name { name, position } => {
            assert_eq!(name, "missing");
            assert_eq!(position, 4);
        }
        other => panic!("expected name error, got {:?}", other),
    }
}

#[test]
fn test_fused_matches_unfused_baseline() {
    // large enough to take the blockwise path, with an uneven tail
    let rows = FUSED_MIN_ROWS + BLOCK_ROWS / 2 + 17;
    let mut rng = StdRng::seed_from_u64(42);
    let a: Vec<f64> = (0..rows).map(|_| rng.gen_range(-100.0..100.0)).collect();
    let b: Vec<f64> = (0..rows).map(|_| rng.gen_range(-100.0..100.0)).collect();
    let table = Table::new()
        .with_column("a", a.clone())
        .unwrap()
        .with_column("b", b.clone())
        .unwrap();
    let mut env = Environment::new();
    env.insert("k", 0.5);

    let result = evaluate_expression("a * b + (a - b) / 2 - @k", &table, &env).unwrap();
    let baseline: Vec<f64> = a
        .iter()
        .zip(&b)
        .map(|(x, y)| x * y + (x - y) / 2.0 - 0.5)
        .collect();
    assert_eq!(result, Value::Series(baseline));

    let result = evaluate_expression("a < b | a > -@k", &table, &env).unwrap();
    let baseline: Vec<bool> = a
        .iter()
        .zip(&b)
        .map(|(x, y)| *x < *y || *x > -0.5)
        .collect();
    assert_eq!(result, Value::Mask(baseline));
}

#[test]
fn test_large_assignment_roundtrips_through_bincode() {
    let rows = FUSED_MIN_ROWS + 3;
    let a: Vec<f64> = (0..rows).map(|i| i as f64).collect();
    let mut table = Table::new().with_column("a", a).unwrap();
    let env = Environment::new();

    evaluate_statement_in_place("double = a * 2", &mut table, &env).unwrap();

    let bytes = bincode::serialize(&table).unwrap();
    let restored: Table = bincode::deserialize(&bytes).unwrap();
    assert_eq!(restored, table);
    assert_eq!(restored.column("double").unwrap()[5], 10.0);
}

#[test]
fn test_failed_statement_is_atomic() {
    let mut table = sample_table();
    let env = Environment::new();
    let before = table.clone();

    assert!(evaluate_statement_in_place("D = A + nope", &mut table, &env).is_err());
    assert_eq!(table, before);
}

#[test]
fn test_record_binding_access() {
    let table = sample_table();
    let mut env = Environment::new();
    env.insert(
        "cfg",
        Value::record([
            ("limit", Value::Number(2.0)),
            ("max price", Value::Number(5.5)),
        ]),
    );

    let result = evaluate_expression("A >= @cfg.limit", &table, &env).unwrap();
    assert_eq!(result, Value::Mask(vec![false, true, true]));

    let result = evaluate_expression("B < @cfg['max price']", &table, &env).unwrap();
    assert_eq!(result, Value::Mask(vec![true, true, false]));
}
