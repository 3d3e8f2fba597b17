//! Writes a synthetic supermarket sales table to `supermarkt_sales.csv` and
//! `supermarkt_sales.parquet` with the same columns as the Sales workbook.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const ROWS: usize = 1000;

const BRANCHES: [(&str, &str); 3] = [("A", "Yangon"), ("B", "Mandalay"), ("C", "Naypyitaw")];
const CUSTOMER_TYPES: [&str; 2] = ["Member", "Normal"];
const GENDERS: [&str; 2] = ["Female", "Male"];
const PAYMENTS: [&str; 3] = ["Ewallet", "Cash", "Credit card"];
const PRODUCT_LINES: [&str; 6] = [
    "Health and beauty",
    "Electronic accessories",
    "Home and lifestyle",
    "Sports and travel",
    "Food and beverages",
    "Fashion accessories",
];

const TAX_RATE: f64 = 0.05;

#[derive(Debug, Serialize)]
struct Sale {
    #[serde(rename = "Invoice ID")]
    invoice_id: String,
    #[serde(rename = "Branch")]
    branch: &'static str,
    #[serde(rename = "City")]
    city: &'static str,
    #[serde(rename = "Customer_type")]
    customer_type: &'static str,
    #[serde(rename = "Gender")]
    gender: &'static str,
    #[serde(rename = "Product_line")]
    product_line: &'static str,
    #[serde(rename = "Unit price")]
    unit_price: f64,
    #[serde(rename = "Quantity")]
    quantity: i64,
    #[serde(rename = "Tax 5%")]
    tax: f64,
    #[serde(rename = "Total")]
    total: f64,
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Payment")]
    payment: &'static str,
    cogs: f64,
    #[serde(rename = "gross income")]
    gross_income: f64,
    #[serde(rename = "Rating")]
    rating: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn generate(rng: &mut SimpleRng) -> Vec<Sale> {
    (0..ROWS)
        .map(|i| {
            let (branch, city) = rng.pick(&BRANCHES);
            let unit_price = round_to(rng.range(10.0, 100.0), 2);
            let quantity = 1 + (rng.next_u64() % 10) as i64;
            let cogs = round_to(unit_price * quantity as f64, 2);
            let tax = round_to(cogs * TAX_RATE, 4);
            // Store hours 10:00–20:59.
            let secs = 10 * 3600 + (rng.next_u64() % (11 * 3600)) as u32;

            Sale {
                invoice_id: format!("{:03}-{:02}-{:04}", 100 + i % 900, i % 100, i),
                branch,
                city,
                customer_type: rng.pick(&CUSTOMER_TYPES),
                gender: rng.pick(&GENDERS),
                product_line: rng.pick(&PRODUCT_LINES),
                unit_price,
                quantity,
                tax,
                total: round_to(cogs + tax, 4),
                time: format!("{:02}:{:02}:00", secs / 3600, (secs / 60) % 60),
                payment: rng.pick(&PAYMENTS),
                cogs,
                gross_income: tax,
                rating: round_to(rng.range(4.0, 10.0), 1),
            }
        })
        .collect()
}

fn write_csv(sales: &[Sale], path: &str) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV file");
    for sale in sales {
        writer.serialize(sale).expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");
}

fn write_parquet(sales: &[Sale], path: &str) {
    let text = |name: &str, f: fn(&Sale) -> &str| -> (Field, ArrayRef) {
        let values: Vec<&str> = sales.iter().map(f).collect();
        (Field::new(name, DataType::Utf8, false), Arc::new(StringArray::from(values)))
    };
    let number = |name: &str, f: fn(&Sale) -> f64| -> (Field, ArrayRef) {
        let values: Vec<f64> = sales.iter().map(f).collect();
        (Field::new(name, DataType::Float64, false), Arc::new(Float64Array::from(values)))
    };

    let columns = vec![
        text("Invoice ID", |s| s.invoice_id.as_str()),
        text("Branch", |s| s.branch),
        text("City", |s| s.city),
        text("Customer_type", |s| s.customer_type),
        text("Gender", |s| s.gender),
        text("Product_line", |s| s.product_line),
        number("Unit price", |s| s.unit_price),
        (
            Field::new("Quantity", DataType::Int64, false),
            Arc::new(Int64Array::from(sales.iter().map(|s| s.quantity).collect::<Vec<_>>())) as ArrayRef,
        ),
        number("Tax 5%", |s| s.tax),
        number("Total", |s| s.total),
        text("Time", |s| s.time.as_str()),
        text("Payment", |s| s.payment),
        number("cogs", |s| s.cogs),
        number("gross income", |s| s.gross_income),
        number("Rating", |s| s.rating),
    ];

    let (fields, arrays): (Vec<Field>, Vec<ArrayRef>) = columns.into_iter().unzip();
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let sales = generate(&mut rng);

    write_csv(&sales, "supermarkt_sales.csv");
    write_parquet(&sales, "supermarkt_sales.parquet");

    let total: f64 = sales.iter().map(|s| s.total).sum();
    println!(
        "Wrote {} sales (total US $ {:.2}) to supermarkt_sales.csv and supermarkt_sales.parquet",
        sales.len(),
        total
    );
}
