use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Attribute – a categorical column of the sales table
// ---------------------------------------------------------------------------

/// Categorical columns the dashboard can filter or group by.
/// Ordered so it can key a `BTreeMap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    City,
    CustomerType,
    Gender,
    Branch,
    Payment,
    ProductLine,
}

impl Attribute {
    /// Attributes exposed as sidebar filters, in display order.
    pub const FILTERABLE: [Attribute; 5] = [
        Attribute::City,
        Attribute::CustomerType,
        Attribute::Gender,
        Attribute::Branch,
        Attribute::Payment,
    ];

    pub const ALL: [Attribute; 6] = [
        Attribute::City,
        Attribute::CustomerType,
        Attribute::Gender,
        Attribute::Branch,
        Attribute::Payment,
        Attribute::ProductLine,
    ];

    /// Header of the source column.
    pub fn column_name(self) -> &'static str {
        match self {
            Attribute::City => "City",
            Attribute::CustomerType => "Customer_type",
            Attribute::Gender => "Gender",
            Attribute::Branch => "Branch",
            Attribute::Payment => "Payment",
            Attribute::ProductLine => "Product_line",
        }
    }

    /// Sidebar label.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::City => "Cities",
            Attribute::CustomerType => "Customer type",
            Attribute::Gender => "Gender",
            Attribute::Branch => "Branch",
            Attribute::Payment => "Payment mode",
            Attribute::ProductLine => "Product line",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ---------------------------------------------------------------------------
// SaleRecord – one row of the sales table
// ---------------------------------------------------------------------------

/// A single transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    pub city: String,
    pub customer_type: String,
    pub gender: String,
    pub branch: String,
    pub payment: String,
    pub product_line: String,
    /// Invoice amount in US $.
    pub total: f64,
    /// Customer rating, 0–10.
    pub rating: f64,
    pub gross_income: f64,
    /// Wall-clock time of the sale as it appears in the source (`HH:MM:SS`).
    pub time: String,
    /// Hour of day (0–23) derived from `time` at load.
    pub hour: u8,
}

impl SaleRecord {
    /// Value of a categorical column.
    pub fn value(&self, attribute: Attribute) -> &str {
        match attribute {
            Attribute::City => &self.city,
            Attribute::CustomerType => &self.customer_type,
            Attribute::Gender => &self.gender,
            Attribute::Branch => &self.branch,
            Attribute::Payment => &self.payment,
            Attribute::ProductLine => &self.product_line,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// All loaded records plus the distinct values of every categorical column.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<SaleRecord>,
    /// Distinct values per attribute, in order of first appearance.
    distinct: BTreeMap<Attribute, Vec<String>>,
}

impl Dataset {
    /// Build the distinct-value index from the loaded records.
    pub fn from_records(records: Vec<SaleRecord>) -> Self {
        let mut distinct: BTreeMap<Attribute, Vec<String>> = Attribute::ALL
            .iter()
            .map(|&attr| (attr, Vec::new()))
            .collect();

        for rec in &records {
            for (&attr, values) in distinct.iter_mut() {
                let v = rec.value(attr);
                if !values.iter().any(|known| known == v) {
                    values.push(v.to_string());
                }
            }
        }

        Dataset { records, distinct }
    }

    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    /// Distinct values of `attribute`, first-appearance order.
    pub fn distinct_values(&self, attribute: Attribute) -> &[String] {
        self.distinct
            .get(&attribute)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Record with the given categorical values and amounts; time derived from `hour`.
    pub fn record(
        city: &str,
        customer_type: &str,
        gender: &str,
        product_line: &str,
        total: f64,
        rating: f64,
        hour: u8,
    ) -> SaleRecord {
        SaleRecord {
            city: city.to_string(),
            customer_type: customer_type.to_string(),
            gender: gender.to_string(),
            branch: match city {
                "Yangon" => "A",
                "Mandalay" => "B",
                _ => "C",
            }
            .to_string(),
            payment: "Cash".to_string(),
            product_line: product_line.to_string(),
            total,
            rating,
            gross_income: total / 21.0,
            time: format!("{hour:02}:30:00"),
            hour,
        }
    }

    /// Five hand-built sales with known totals (sum 1000.50).
    pub fn small_dataset() -> Dataset {
        Dataset::from_records(vec![
            record("Yangon", "Member", "Female", "Health and beauty", 548.97, 9.1, 13),
            record("Naypyitaw", "Normal", "Female", "Electronic accessories", 80.22, 9.6, 10),
            record("Yangon", "Normal", "Male", "Home and lifestyle", 340.53, 7.4, 13),
            record("Yangon", "Member", "Male", "Health and beauty", 20.78, 8.4, 20),
            record("Mandalay", "Normal", "Male", "Sports and travel", 10.00, 5.3, 10),
        ])
    }
}
