//! COMPANY walkthrough: declare a table, sync it, seed seven rows and give
//! everyone under thirty the same address and salary.
//!
//! ```text
//! cargo run -p tabula-sqlite --example company -- --verbose
//! ```

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tabula_core::builder::{col, order_by, set, where_};
use tabula_core::schema::{Column, Schema, Table};
use tabula_sqlite::{Storage, StorageOptions};

/// Runs the COMPANY update-all scenario.
#[derive(Parser)]
#[command(name = "company")]
struct Cli {
    /// Database file, or `:memory:`.
    #[arg(short, long, env = "TABULA_DATABASE", default_value = ":memory:")]
    database: String,

    /// Log every SQL statement.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Default, Clone)]
struct Company {
    id: i64,
    name: String,
    age: i64,
    address: Option<String>,
    salary: Option<f64>,
}

fn schema() -> Schema {
    Schema::new().table(
        Table::<Company>::new("COMPANY")
            .column(Column::new("ID", |c: &Company| &c.id, |c, v| c.id = v).primary_key())
            .column(Column::new("NAME", |c: &Company| &c.name, |c, v| c.name = v))
            .column(Column::new("AGE", |c: &Company| &c.age, |c, v| c.age = v))
            .column(Column::new("ADDRESS", |c: &Company| &c.address, |c, v| c.address = v))
            .column(Column::new("SALARY", |c: &Company| &c.salary, |c, v| c.salary = v)),
    )
}

fn seed() -> Vec<Company> {
    [
        (1, "Paul", 32, "California", 20000.0),
        (2, "Allen", 25, "Texas", 15000.0),
        (3, "Teddy", 23, "Norway", 20000.0),
        (4, "Mark", 25, "Rich-Mond", 65000.0),
        (5, "David", 27, "Texas", 85000.0),
        (6, "Kim", 22, "South-Hall", 45000.0),
        (7, "James", 24, "Houston", 10000.0),
    ]
    .into_iter()
    .map(|(id, name, age, address, salary)| Company {
        id,
        name: name.into(),
        age,
        address: Some(address.into()),
        salary: Some(salary),
    })
    .collect()
}

fn print_rows(title: &str, rows: &[Company]) {
    info!("{title}");
    for row in rows {
        info!(
            "  {:>2} {:<6} {:>3} {:<11} {:>8.1}",
            row.id,
            row.name,
            row.age,
            row.address.as_deref().unwrap_or("-"),
            row.salary.unwrap_or_default()
        );
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let storage = Storage::with_options(
        cli.database,
        schema(),
        StorageOptions::new().foreign_keys(true),
    )?;
    for (table, result) in storage.sync_schema(false)? {
        info!("{table}: {result}");
    }

    storage.delete_all::<Company>(&[])?;
    storage.replace_range(&seed())?;
    let by_id = [order_by([col::<Company>("ID").asc()])];
    print_rows("Before:", &storage.get_all::<Company>(&by_id)?);

    let changed = storage.update_all(
        &set([
            col::<Company>("ADDRESS").assign("Texas"),
            col::<Company>("SALARY").assign(20000.0),
        ]),
        &[where_(col::<Company>("AGE").lt(30))],
    )?;
    info!("{changed} rows updated");
    print_rows("After:", &storage.get_all::<Company>(&by_id)?);

    Ok(())
}
