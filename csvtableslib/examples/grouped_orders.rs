//! Group orders under their customers and print the result.
//!
//! Run with `cargo run -p csvtableslib --example grouped_orders`.

use csvtableslib::{parse_csv, LoadOptions, SortKey, Value};

const CUSTOMERS: &str = "Name,City\nann,York\nbob,Leeds\ncat,Hull\n";
const ORDERS: &str = "Order Id,Customer,Amount\n1,ann,12\n2,bob,30\n3,ann,7\n";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let customers = parse_csv(CUSTOMERS, LoadOptions::default())?;
    let orders = parse_csv(ORDERS, LoadOptions::new().infer_types(true))?;

    let grouped = customers.join(&orders, "orders", "name", "customer")?;
    let mut summary = grouped
        .add_column("Order Count", |row| {
            row["orders"].as_table().map_or(0, |t| t.len() as i64)
        })?
        .add_column("Total", |row| {
            row["orders"].as_table().map_or(0, |t| {
                t.iter().filter_map(|order| order["amount"].as_int()).sum::<i64>()
            })
        })?
        .select(&["name", "city", "order_count", "total"])?;

    summary.sort(SortKey::by(|a, b| b["total"].cmp(&a["total"])))?;

    let stdout = std::io::stdout();
    summary.pprint(&mut stdout.lock())?;

    println!();
    for row in summary.filter(|row| row["order_count"] == Value::from(0))?.iter() {
        println!("no orders from {}", row["name"]);
    }
    Ok(())
}
