//! Load batches of loan requests from CSV

use super::{LoanRequest, LoanType};
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// Raw CSV row; empty cells fall back to the request defaults
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(default)]
    principal: Option<f64>,
    #[serde(default)]
    rate: Option<f64>,
    #[serde(default)]
    num_payments: Option<u32>,
    #[serde(default)]
    loan_type: Option<String>,
    #[serde(default)]
    initial_fee: Option<f64>,
    #[serde(default)]
    payment_fee: Option<f64>,
    #[serde(default)]
    balloon_amount: Option<f64>,
}

impl CsvRow {
    fn to_request(self) -> Result<LoanRequest, Box<dyn Error>> {
        let defaults = LoanRequest::default();

        let loan_type = match self.loan_type.as_deref().map(str::trim) {
            None | Some("") => defaults.loan_type,
            Some(name) => name.parse::<LoanType>()?,
        };

        Ok(LoanRequest {
            principal: self.principal.unwrap_or(defaults.principal),
            rate: self.rate.unwrap_or(defaults.rate),
            num_payments: self.num_payments.unwrap_or(defaults.num_payments),
            loan_type,
            initial_fee: self.initial_fee.unwrap_or(defaults.initial_fee),
            payment_fee: self.payment_fee.unwrap_or(defaults.payment_fee),
            balloon_amount: self.balloon_amount.unwrap_or(defaults.balloon_amount),
            payment_number: None,
        })
    }
}

/// Load all requests from a CSV file
pub fn load_requests<P: AsRef<Path>>(path: P) -> Result<Vec<LoanRequest>, Box<dyn Error>> {
    let reader = Reader::from_path(path)?;
    read_requests(reader)
}

/// Load requests from any reader (e.g., string buffer, network stream)
pub fn load_requests_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<LoanRequest>, Box<dyn Error>> {
    read_requests(Reader::from_reader(reader))
}

fn read_requests<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<LoanRequest>, Box<dyn Error>> {
    let mut requests = Vec::new();

    for (line, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        let request = row
            .to_request()
            .map_err(|e| format!("row {}: {}", line + 1, e))?;
        requests.push(request);
    }

    Ok(requests)
}
