//! Example demonstrating expression evaluation over a table

use tabexpr::{
    evaluate_expression, evaluate_statement, evaluate_statement_in_place, Environment, Table,
    Value,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Tabular Expression Evaluation Demo");
    println!("==================================");

    // Example 1: Basic column arithmetic
    println!("\n1. Column Arithmetic");
    println!("--------------------");

    let table = Table::new()
        .with_column("price", vec![10.0, 20.0, 30.0])?
        .with_column("qty", vec![3.0, 2.0, 1.0])?;
    let env = Environment::new();

    let total = evaluate_expression("price * qty", &table, &env)?;
    println!("price * qty: {:?}", total);

    let adjusted = evaluate_expression("(price + 5) / 2", &table, &env)?;
    println!("(price + 5) / 2: {:?}", adjusted);

    // Example 2: Comparisons and chained comparisons
    println!("\n2. Comparisons");
    println!("--------------");

    let cheap = evaluate_expression("price < 25", &table, &env)?;
    println!("price < 25: {:?}", cheap);

    let mid = evaluate_expression("10 <= price < 30", &table, &env)?;
    println!("10 <= price < 30: {:?}", mid);

    // Example 3: External bindings via @name
    println!("\n3. Bindings");
    println!("-----------");

    let mut env = Environment::new();
    env.insert("cutoff", 15.0);
    env.insert("cfg", Value::record([("min_qty", Value::Number(2.0))]));

    let above = evaluate_expression("price > @cutoff", &table, &env)?;
    println!("price > @cutoff: {:?}", above);

    let eligible = evaluate_expression("price > @cutoff and qty >= @cfg.min_qty", &table, &env)?;
    println!("price > @cutoff and qty >= @cfg.min_qty: {:?}", eligible);

    // Example 4: Assignment statements
    println!("\n4. Assignment");
    println!("-------------");

    let with_total = evaluate_statement("total = price * qty", &table, &env)?;
    println!("new table column total: {:?}", with_total.column("total"));
    println!("input table still has columns: {:?}", table.column_names().collect::<Vec<_>>());

    let mut table = table;
    evaluate_statement_in_place("total = price * qty", &mut table, &env)?;
    println!("in-place column total: {:?}", table.column("total"));

    // Example 5: Errors
    println!("\n5. Errors");
    println!("---------");

    let err = evaluate_expression("price + missing", &table, &env).unwrap_err();
    println!("price + missing: {}", err);

    let err = evaluate_expression("price +", &table, &env).unwrap_err();
    println!("price +: {}", err);

    Ok(())
}
