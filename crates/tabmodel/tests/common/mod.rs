#![allow(dead_code)]

pub mod simplex;

use std::sync::Arc;

use tabmodel::{
    DataSet, EnvError, Key, MemoryEnvironment, MemoryParameter, Schema, Value, project, push,
};
use tracing_subscriber::EnvFilter;

use self::simplex::{Constraint, Outcome, Sense};

pub const DIET_SETS: &[(&str, &str)] = &[("foods", "FOOD"), ("categories", "CAT")];

pub const DIET_RENAMINGS: &[(&str, &str, &str)] = &[
    ("foods", "Cost", "cost"),
    ("categories", "Min Nutrition", "n_min"),
    ("categories", "Max Nutrition", "n_max"),
    ("nutrition_quantities", "Quantity", "amt"),
    ("nutrition_quantities", "Other Quantity", "other_amt"),
];

pub const NETFLOW_SETS: &[(&str, &str)] = &[
    ("commodities", "COMMODITIES"),
    ("nodes", "NODES"),
    ("arcs", "ARCS"),
];

pub const NETFLOW_RENAMINGS: &[(&str, &str, &str)] = &[
    ("arcs", "Capacity", "capacity"),
    ("cost", "Cost", "cost"),
    ("inflow", "Quantity", "inflow"),
];

const FOODS: [(&str, f64); 9] = [
    ("chicken", 2.89),
    ("fries", 1.89),
    ("hamburger", 2.49),
    ("hot dog", 1.50),
    ("ice cream", 1.59),
    ("macaroni", 2.09),
    ("milk", 0.89),
    ("pizza", 1.99),
    ("salad", 2.49),
];

const CATEGORIES: [(&str, f64, f64); 4] = [
    ("calories", 1800.0, 2200.0),
    ("fat", 0.0, 65.0),
    ("protein", 91.0, f64::INFINITY),
    ("sodium", 0.0, 1779.0),
];

/// Per food: calories, fat, protein, sodium.
const NUTRITION: [(&str, [f64; 4]); 9] = [
    ("chicken", [420.0, 10.0, 32.0, 1190.0]),
    ("fries", [380.0, 19.0, 4.0, 270.0]),
    ("hamburger", [410.0, 26.0, 24.0, 730.0]),
    ("hot dog", [560.0, 32.0, 20.0, 1800.0]),
    ("ice cream", [330.0, 10.0, 8.0, 180.0]),
    ("macaroni", [320.0, 10.0, 12.0, 930.0]),
    ("milk", [100.0, 2.5, 8.0, 125.0]),
    ("pizza", [320.0, 12.0, 15.0, 820.0]),
    ("salad", [320.0, 12.0, 31.0, 1230.0]),
];

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Absolute or relative difference within 1e-6.
pub fn nearly_same(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= 1e-6 * scale
}

pub fn diet_schema() -> Arc<Schema> {
    let mut builder = Schema::builder();
    builder
        .define_table("categories", &["Name"], &["Min Nutrition", "Max Nutrition"], &[])
        .expect("categories")
        .define_table("foods", &["Name"], &["Cost"], &[])
        .expect("foods")
        .define_table(
            "nutrition_quantities",
            &["Food", "Category"],
            &["Quantity", "Other Quantity"],
            &[],
        )
        .expect("nutrition_quantities");
    Arc::new(builder.build())
}

pub fn diet_solution_schema() -> Arc<Schema> {
    let mut builder = Schema::builder();
    builder
        .define_table("parameters", &["Key"], &["Value"], &[])
        .expect("parameters")
        .define_table("buy_food", &["Food"], &["Quantity"], &[])
        .expect("buy_food")
        .define_table("consume_nutrition", &["Category"], &["Quantity"], &[])
        .expect("consume_nutrition");
    Arc::new(builder.build())
}

/// Solution schema recording only which foods are bought and which
/// categories are consumed.
pub fn diet_presence_schema() -> Arc<Schema> {
    let mut builder = Schema::builder();
    builder
        .define_table("buy_food", &["Food"], &["Quantity"], &[])
        .expect("buy_food")
        .set_default_value("buy_food", "Quantity", 1)
        .expect("buy_food default")
        .define_table("consume_nutrition", &["Category"], &[], &[])
        .expect("consume_nutrition");
    Arc::new(builder.build())
}

pub fn diet_dat() -> DataSet {
    let mut dat = DataSet::new(diet_schema());
    for (name, min, max) in CATEGORIES {
        dat.new_row("categories", name, [("Min Nutrition", min), ("Max Nutrition", max)])
            .expect("category row");
    }
    for (name, cost) in FOODS {
        dat.new_row("foods", name, [("Cost", cost)]).expect("food row");
    }
    for (food, quantities) in NUTRITION {
        for ((category, _, _), quantity) in CATEGORIES.iter().zip(quantities) {
            dat.new_row(
                "nutrition_quantities",
                (food, *category),
                [("Quantity", quantity)],
            )
            .expect("nutrition row");
        }
    }
    dat
}

pub fn netflow_schema() -> Arc<Schema> {
    let mut builder = Schema::builder();
    builder
        .define_table("commodities", &["Name"], &[], &[])
        .expect("commodities")
        .define_table("nodes", &["Name"], &[], &[])
        .expect("nodes")
        .define_table(
            "arcs",
            &["Source", "Destination"],
            &["Capacity"],
            &[("Capacity", Value::from(f64::INFINITY))],
        )
        .expect("arcs")
        .define_table(
            "cost",
            &["Commodity", "Source", "Destination"],
            &["Cost"],
            &[],
        )
        .expect("cost")
        .define_table("inflow", &["Commodity", "Node"], &["Quantity"], &[])
        .expect("inflow");
    Arc::new(builder.build())
}

pub fn netflow_solution_schema() -> Arc<Schema> {
    let mut builder = Schema::builder();
    builder
        .define_table(
            "flow",
            &["Commodity", "Source", "Destination"],
            &["Quantity"],
            &[],
        )
        .expect("flow")
        .define_table("parameters", &["Key"], &["Value"], &[])
        .expect("parameters");
    Arc::new(builder.build())
}

pub fn netflow_dat() -> DataSet {
    let mut dat = DataSet::new(netflow_schema());
    const NO_FIELDS: [(&str, f64); 0] = [];
    for commodity in ["Pencils", "Pens"] {
        dat.new_row("commodities", commodity, NO_FIELDS)
            .expect("commodity row");
    }
    for node in ["Boston", "Denver", "Detroit", "New York", "Seattle"] {
        dat.new_row("nodes", node, NO_FIELDS).expect("node row");
    }
    for (source, destination, capacity) in [
        ("Denver", "Boston", 120.0),
        ("Denver", "New York", 120.0),
        ("Denver", "Seattle", 120.0),
        ("Detroit", "Boston", 100.0),
        ("Detroit", "New York", 80.0),
        ("Detroit", "Seattle", 120.0),
    ] {
        dat.new_row("arcs", (source, destination), [("Capacity", capacity)])
            .expect("arc row");
    }
    for (commodity, source, destination, cost) in [
        ("Pencils", "Denver", "Boston", 40.0),
        ("Pencils", "Denver", "New York", 40.0),
        ("Pencils", "Denver", "Seattle", 30.0),
        ("Pencils", "Detroit", "Boston", 10.0),
        ("Pencils", "Detroit", "New York", 20.0),
        ("Pencils", "Detroit", "Seattle", 60.0),
        ("Pens", "Denver", "Boston", 60.0),
        ("Pens", "Denver", "New York", 70.0),
        ("Pens", "Denver", "Seattle", 30.0),
        ("Pens", "Detroit", "Boston", 20.0),
        ("Pens", "Detroit", "New York", 20.0),
        ("Pens", "Detroit", "Seattle", 80.0),
    ] {
        dat.new_row("cost", (commodity, source, destination), [("Cost", cost)])
            .expect("cost row");
    }
    for (commodity, node, quantity) in [
        ("Pencils", "Boston", -50.0),
        ("Pencils", "Denver", 60.0),
        ("Pencils", "Detroit", 50.0),
        ("Pencils", "New York", -50.0),
        ("Pencils", "Seattle", -10.0),
        ("Pens", "Boston", -40.0),
        ("Pens", "Denver", 40.0),
        ("Pens", "Detroit", 60.0),
        ("Pens", "New York", -30.0),
        ("Pens", "Seattle", -30.0),
    ] {
        dat.new_row("inflow", (commodity, node), [("Quantity", quantity)])
            .expect("inflow row");
    }
    dat
}

/// Project `dat` and push it into a fresh environment.
pub fn export(
    dat: &DataSet,
    renamings: &[(&str, &str, &str)],
    excluded_tables: &[&str],
    set_names: &[(&str, &str)],
) -> tabmodel::Result<MemoryEnvironment> {
    let projection = project(dat, renamings, excluded_tables)?;
    let mut env = MemoryEnvironment::new();
    push(&projection, &mut env, set_names)?;
    Ok(env)
}

fn set_members(env: &MemoryEnvironment, name: &str) -> Result<Vec<Key>, EnvError> {
    env.set(name)
        .map(<[Key]>::to_vec)
        .ok_or_else(|| EnvError::UnknownSymbol(name.to_string()))
}

fn parameter<'a>(env: &'a MemoryEnvironment, name: &str) -> Result<&'a MemoryParameter, EnvError> {
    env.parameter(name)
        .ok_or_else(|| EnvError::UnknownSymbol(name.to_string()))
}

fn joined(head: &Key, tail: &Key) -> Key {
    Key::new(head.parts().iter().chain(tail.parts()).cloned().collect())
}

fn unit_row(columns: usize, column: usize) -> Vec<f64> {
    let mut row = vec![0.0; columns];
    row[column] = 1.0;
    row
}

/// Minimize food cost subject to nutrition bounds, publishing `Buy`,
/// `Consume` and `total_cost` when an optimum exists.
///
/// A missing `n_max` parameter leaves every category unbounded above.
pub fn solve_diet(env: &mut MemoryEnvironment) -> Result<Outcome, EnvError> {
    let foods = set_members(env, "FOOD")?;
    let categories = set_members(env, "CAT")?;
    let cost = parameter(env, "cost")?;
    let n_min = parameter(env, "n_min")?;
    let amt = parameter(env, "amt")?;
    let n_max = env.parameter("n_max");
    let other_amt = env.parameter("other_amt");

    let columns = foods.len() + categories.len();
    let mut objective = vec![0.0; columns];
    for (idx, food) in foods.iter().enumerate() {
        objective[idx] = cost.number(food).unwrap_or(0.0);
    }

    let mut constraints = Vec::new();
    for (offset, category) in categories.iter().enumerate() {
        let consume = foods.len() + offset;
        let mut balance = unit_row(columns, consume);
        for (idx, food) in foods.iter().enumerate() {
            let index = joined(food, category);
            let quantity = amt.number(&index).unwrap_or(0.0)
                + other_amt
                    .and_then(|other| other.number(&index))
                    .unwrap_or(0.0);
            balance[idx] = -quantity;
        }
        constraints.push(Constraint {
            coefficients: balance,
            sense: Sense::Eq,
            rhs: 0.0,
        });
        constraints.push(Constraint {
            coefficients: unit_row(columns, consume),
            sense: Sense::Ge,
            rhs: n_min.number(category).unwrap_or(0.0),
        });
        let max = n_max
            .and_then(|n_max| n_max.number(category))
            .unwrap_or(f64::INFINITY);
        if max.is_finite() {
            constraints.push(Constraint {
                coefficients: unit_row(columns, consume),
                sense: Sense::Le,
                rhs: max,
            });
        }
    }

    let outcome = simplex::solve(&objective, &constraints);
    if let Outcome::Optimal { x, objective } = &outcome {
        env.declare_variable("Buy", 1)?;
        env.declare_variable("Consume", 1)?;
        for (food, value) in foods.iter().zip(x) {
            env.set_variable_value("Buy", food.clone(), *value)?;
        }
        for (category, value) in categories.iter().zip(&x[foods.len()..]) {
            env.set_variable_value("Consume", category.clone(), *value)?;
        }
        env.set_objective("total_cost", *objective)?;
    }
    Ok(outcome)
}

/// Minimum-cost multi-commodity flow, publishing `Flow` and `total_cost`.
pub fn solve_netflow(env: &mut MemoryEnvironment) -> Result<Outcome, EnvError> {
    let commodities = set_members(env, "COMMODITIES")?;
    let nodes = set_members(env, "NODES")?;
    let arcs = set_members(env, "ARCS")?;
    let capacity = parameter(env, "capacity")?;
    let cost = parameter(env, "cost")?;
    let inflow = parameter(env, "inflow")?;

    let flows: Vec<Key> = commodities
        .iter()
        .flat_map(|commodity| arcs.iter().map(move |arc| joined(commodity, arc)))
        .collect();
    let columns = flows.len();
    let objective: Vec<f64> = flows
        .iter()
        .map(|flow| cost.number(flow).unwrap_or(0.0))
        .collect();

    let mut constraints = Vec::new();
    for (arc_idx, arc) in arcs.iter().enumerate() {
        let limit = capacity.number(arc).unwrap_or(f64::INFINITY);
        if !limit.is_finite() {
            continue;
        }
        let mut row = vec![0.0; columns];
        for commodity_idx in 0..commodities.len() {
            row[commodity_idx * arcs.len() + arc_idx] = 1.0;
        }
        constraints.push(Constraint {
            coefficients: row,
            sense: Sense::Le,
            rhs: limit,
        });
    }
    for (commodity_idx, commodity) in commodities.iter().enumerate() {
        for node in &nodes {
            let mut row = vec![0.0; columns];
            for (arc_idx, arc) in arcs.iter().enumerate() {
                let column = commodity_idx * arcs.len() + arc_idx;
                if arc.parts()[1] == node.parts()[0] {
                    row[column] += 1.0;
                }
                if arc.parts()[0] == node.parts()[0] {
                    row[column] -= 1.0;
                }
            }
            let supply = inflow.number(&joined(commodity, node)).unwrap_or(0.0);
            constraints.push(Constraint {
                coefficients: row,
                sense: Sense::Eq,
                rhs: -supply,
            });
        }
    }

    let outcome = simplex::solve(&objective, &constraints);
    if let Outcome::Optimal { x, objective } = &outcome {
        env.declare_variable("Flow", 3)?;
        for (flow, value) in flows.iter().zip(x) {
            env.set_variable_value("Flow", flow.clone(), *value)?;
        }
        env.set_objective("total_cost", *objective)?;
    }
    Ok(outcome)
}
