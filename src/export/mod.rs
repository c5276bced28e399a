//! Printable bill document and share message
//!
//! Both are rendered with Tera. The HTML template is autoescaped, so
//! customer names and item names can never inject markup; the share message
//! is plain text meant for a chat app.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tera::{Context, Tera};

use crate::core::error::{TentError, TentResult};
use crate::entities::Bill;

const BILL_TEMPLATE: &str = "bill.html";
const SHARE_TEMPLATE: &str = "share.txt";

const BILL_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Bill - {{ customer_name }}</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 24px; color: #222; }
    header { text-align: center; border-bottom: 2px solid #333; padding-bottom: 12px; }
    header h1 { margin: 0; letter-spacing: 1px; }
    .meta td { padding: 4px 12px 4px 0; }
    .status { font-weight: bold; }
    table.lines { width: 100%; border-collapse: collapse; margin-top: 16px; }
    table.lines th, table.lines td { border: 1px solid #999; padding: 6px 8px; }
    table.lines td.num { text-align: right; }
    .totals { margin-top: 16px; text-align: right; }
    .totals p { margin: 4px 0; }
    footer { margin-top: 32px; font-size: 12px; color: #666; text-align: center; }
  </style>
</head>
<body>
  <header>
    <h1>{{ business_name }}</h1>
    <p>Bill Details</p>
  </header>

  <table class="meta">
    <tr><td>Customer</td><td>{{ customer_name }}</td></tr>
    {% if mobile_number %}<tr><td>Mobile</td><td>{{ mobile_number }}</td></tr>{% endif %}
    <tr><td>Event Date</td><td>{{ date }}</td></tr>
    <tr><td>Status</td><td class="status">{{ status }}</td></tr>
    {% if service_types | length > 0 %}<tr><td>Services</td><td>{{ service_types | join(sep=", ") }}</td></tr>{% endif %}
  </table>

  {% if lines | length > 0 %}
  <table class="lines">
    <thead>
      <tr><th>Item</th><th>Quantity</th><th>Rate</th><th>Amount</th></tr>
    </thead>
    <tbody>
      {% for line in lines %}
      <tr>
        <td>{{ line.name }}</td>
        <td class="num">{{ line.quantity }}</td>
        <td class="num">{{ line.rate }}</td>
        <td class="num">{{ line.amount }}</td>
      </tr>
      {% endfor %}
    </tbody>
  </table>
  {% endif %}

  <div class="totals">
    <p>Total Items: {{ items_count }}</p>
    <p><strong>Total Amount: {{ total }}</strong></p>
    {% if received %}
    <p>Received Amount: {{ received }}</p>
    <p>Balance: {{ balance }}</p>
    {% endif %}
  </div>

  <footer>
    <p>Generated on {{ generated_on }}</p>
    <p>This is a computer-generated document</p>
  </footer>
</body>
</html>
"#;

const SHARE_TXT: &str = r#"*{{ business_name }} - BILL*

Customer: {{ customer_name }}
Event Date: {{ date }}
Status: {{ status }}
Total: {{ total }}
{% if received %}Received: {{ received }}
Balance: {{ balance }}
{% endif %}
Bill file: {{ file_name }}"#;

#[derive(Serialize)]
struct LineView {
    name: String,
    quantity: u32,
    rate: String,
    amount: String,
}

#[derive(Serialize)]
struct BillView<'a> {
    business_name: &'a str,
    customer_name: &'a str,
    mobile_number: Option<&'a str>,
    date: String,
    status: String,
    service_types: Vec<&'a str>,
    lines: Vec<LineView>,
    items_count: u64,
    total: String,
    received: Option<String>,
    balance: Option<String>,
    generated_on: String,
    file_name: String,
}

/// Renders bills for download and sharing
pub struct BillExporter {
    tera: Tera,
    business_name: String,
}

impl BillExporter {
    pub fn new(business_name: impl Into<String>) -> TentResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![(BILL_TEMPLATE, BILL_HTML), (SHARE_TEMPLATE, SHARE_TXT)])
            .map_err(template_error)?;

        Ok(Self {
            tera,
            business_name: business_name.into(),
        })
    }

    pub fn business_name(&self) -> &str {
        &self.business_name
    }

    /// Standalone HTML document for one bill
    pub fn render_bill_document(&self, bill: &Bill, generated_at: DateTime<Utc>) -> TentResult<String> {
        self.render(BILL_TEMPLATE, bill, generated_at)
    }

    /// Plain-text summary suitable for a chat message
    pub fn share_message(&self, bill: &Bill) -> TentResult<String> {
        self.render(SHARE_TEMPLATE, bill, Utc::now())
    }

    fn render(&self, template: &str, bill: &Bill, generated_at: DateTime<Utc>) -> TentResult<String> {
        let view = self.view(bill, generated_at)?;
        let context = Context::from_serialize(&view).map_err(template_error)?;
        self.tera.render(template, &context).map_err(template_error)
    }

    fn view<'a>(&'a self, bill: &'a Bill, generated_at: DateTime<Utc>) -> TentResult<BillView<'a>> {
        let lines = bill
            .items
            .iter()
            .map(|line| {
                let amount = line.amount().ok_or_else(|| {
                    TentError::Internal(format!("line amount for '{}' overflows", line.name))
                })?;
                Ok(LineView {
                    name: line.name.clone(),
                    quantity: line.quantity,
                    rate: money(line.rate),
                    amount: money(amount),
                })
            })
            .collect::<TentResult<Vec<_>>>()?;

        Ok(BillView {
            business_name: &self.business_name,
            customer_name: &bill.customer_name,
            mobile_number: bill.mobile_number.as_deref(),
            date: bill.date.format("%d %b %Y").to_string(),
            status: bill.status.as_str().to_uppercase(),
            service_types: bill.service_types.iter().map(|s| s.as_str()).collect(),
            lines,
            items_count: bill.items_count(),
            total: money(bill.total),
            received: bill.received_amount.map(money),
            balance: bill.received_amount.map(|_| money(bill.balance())),
            generated_on: generated_at.format("%d %b %Y, %H:%M UTC").to_string(),
            file_name: bill_file_name(bill),
        })
    }
}

/// `Bill_<customer>_<date>.html`, with anything outside `[A-Za-z0-9_-]`
/// replaced by `_`
pub fn bill_file_name(bill: &Bill) -> String {
    let customer: String = bill
        .customer_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    format!("Bill_{}_{}.html", customer, bill.date.format("%Y-%m-%d"))
}

fn money(amount: Decimal) -> String {
    format!("₹{}", amount.round_dp(2).normalize())
}

fn template_error(err: tera::Error) -> TentError {
    TentError::Internal(format!("template rendering failed: {}", err))
}
