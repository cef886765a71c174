//! Invoice models and DTOs.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::common::{matches_query, patch};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: i64,
    pub description: String,
    pub qty: u32,
    /// Unit price in whole currency units
    pub unit: u64,
}

impl LineItem {
    /// `qty * unit`, or `None` when it does not fit in a `u64`.
    pub fn checked_amount(&self) -> Option<u64> {
        self.unit.checked_mul(u64::from(self.qty))
    }

    pub fn amount(&self) -> u64 {
        self.checked_amount().unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub invoice_no: String,
    pub patient_name: String,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub paid: bool,
}

impl Invoice {
    /// Sum of line amounts, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(item.amount()))
    }

    pub fn matches(&self, query: Option<&str>) -> bool {
        matches_query(query, &[&self.patient_name, &self.invoice_no])
    }
}

/// Random `INV-NNNN` number for new invoices.
pub fn generate_invoice_no() -> String {
    let n: u32 = rand::rng().random_range(1000..=9999);
    format!("INV-{}", n)
}

/// Invoice with its computed total, as returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceResponse {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub total: u64,
    pub currency: String,
}

impl InvoiceResponse {
    pub fn new(invoice: Invoice, currency: &str) -> Self {
        Self {
            total: invoice.total(),
            invoice,
            currency: currency.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub patient_name: String,
    pub invoice_no: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl CreateInvoiceRequest {
    /// Fill in the generated invoice number and today's date when omitted.
    pub fn with_defaults(mut self, today: &str) -> Self {
        if self.invoice_no.as_deref().map_or(true, |n| n.trim().is_empty()) {
            self.invoice_no = Some(generate_invoice_no());
        }
        if self.date.as_deref().map_or(true, |d| d.trim().is_empty()) {
            self.date = Some(today.to_string());
        }
        self
    }

    pub fn into_invoice(self, id: i64) -> Invoice {
        Invoice {
            id,
            invoice_no: self.invoice_no.unwrap_or_default().trim().to_string(),
            patient_name: self.patient_name.trim().to_string(),
            date: self.date.unwrap_or_default(),
            items: self.items,
            paid: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateInvoiceRequest {
    pub patient_name: Option<String>,
    pub invoice_no: Option<String>,
    pub date: Option<String>,
    pub items: Option<Vec<LineItem>>,
    pub paid: Option<bool>,
}

impl UpdateInvoiceRequest {
    pub fn apply_to(&self, invoice: &mut Invoice) {
        patch(&mut invoice.patient_name, &self.patient_name);
        patch(&mut invoice.invoice_no, &self.invoice_no);
        patch(&mut invoice.date, &self.date);
        patch(&mut invoice.items, &self.items);
        patch(&mut invoice.paid, &self.paid);
    }
}

#[derive(Debug, Deserialize)]
pub struct MarkPaidRequest {
    pub paid: bool,
}
