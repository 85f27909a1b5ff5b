use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime, Time};

use wallet::{Amount, Expense, create_expense, initialize_db};

/// A utility for creating a test database for the REST API server of Wallet.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many days of expenses to create, counting back from today.
    #[arg(long, default_value_t = 90)]
    days: u16,
}

/// Title, category, amount and hour of day for each sample expense.
const SAMPLES: [(&str, &str, &str, u8); 8] = [
    ("Coffee", "Food", "4.50", 8),
    ("Bus fare", "Transport", "3.20", 9),
    ("Lunch", "Food", "14.90", 12),
    ("Groceries", "Food", "62.35", 17),
    ("Movie tickets", "Entertainment", "28.00", 19),
    ("Petrol", "Transport", "71.10", 7),
    ("Phone bill", "Utilities", "45.00", 10),
    ("Books", "Education", "33.99", 15),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating expenses for the last {} days...", args.days);

    let today = OffsetDateTime::now_utc().date();
    let mut count = 0;

    for day in 0..args.days {
        let date = today - Duration::days(i64::from(day));

        // One to three expenses a day, cycling through the samples.
        for i in 0..=(day % 3) {
            let sample_index = (usize::from(day) + usize::from(i) * 3) % SAMPLES.len();
            let (title, category, amount, hour) = SAMPLES[sample_index];
            let spent_at = date.with_time(Time::from_hms(hour, 0, 0)?).assume_utc();

            let new_expense =
                Expense::build(title, amount.parse::<Amount>()?, "USD", category, spent_at)
                    .note((category == "Utilities").then(|| "Paid by direct debit".to_owned()));
            create_expense(new_expense, &conn)?;
            count += 1;
        }
    }

    println!("Created {count} expenses.");
    println!("Success!");

    Ok(())
}
