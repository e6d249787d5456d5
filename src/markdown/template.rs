use crate::invoice::InvoiceData;
use crate::money::format_usd;

/// Embedded invoice layout. `{{name}}` placeholders are filled by [`render_markdown`];
/// existing invoices were generated from this exact text, so keep it byte-stable.
const INVOICE_TEMPLATE: &str = "# Invoice

| Date | Invoice Number |
| --- | --- |
| {{date}} | {{number}} |

## From

{{issuer_name}}
{{issuer_address}}
{{issuer_email}}

## Services

| Description | Hours | Rate | Amount |
| --- | --- | --- | --- |
| {{description}} | {{hours}} | {{rate}} | {{amount}} |
| **Total** | | | **{{total}}** |

## Wiring Instructions

| | |
| --- | --- |
| Account Number | {{account_number}} |
| SWIFT / Routing Code | {{swift_code}} |
| Bank Name | {{bank_name}} |
";

fn lookup(data: &InvoiceData, key: &str) -> Option<String> {
    let value = match key {
        "date" => data.date.clone(),
        "number" => data.number.to_string(),
        "issuer_name" => data.issuer.name.clone(),
        "issuer_address" => data.issuer.address.clone(),
        "issuer_email" => data.issuer.email.clone(),
        "description" => data.item.description.clone(),
        "hours" => data.item.hours.to_string(),
        "rate" => format_usd(data.item.rate),
        "amount" => format_usd(data.item.amount),
        "total" => format_usd(data.total),
        "account_number" => data.wiring.account_number.clone(),
        "swift_code" => data.wiring.swift_code.clone(),
        "bank_name" => data.wiring.bank_name.clone(),
        _ => return None,
    };
    Some(value)
}

/// Fill `{{key}}` placeholders in a single pass, so substituted values are never
/// re-scanned. Unknown placeholders are kept as written.
fn fill(template: &str, resolve: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                match resolve(key) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push_str("{{");
                        out.push_str(key);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    out
}

/// Render an invoice as Markdown with pipe tables
pub fn render_markdown(data: &InvoiceData) -> String {
    fill(INVOICE_TEMPLATE, |key| lookup(data, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::period::Period;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn render(settings: &Settings) -> String {
        let period = Period::new(2, 2024).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        render_markdown(&InvoiceData::new(settings, &period, 168, today))
    }

    #[test]
    fn test_full_document() {
        let settings = Settings {
            invoice_number: 7,
            issuer_name: "Jane Doe".to_string(),
            issuer_address: "1 Main St\nSpringfield, IL 62701".to_string(),
            issuer_email: "jane@example.com".to_string(),
            hourly_rate: 50.0,
            wiring_instructions: "000123\nCHASUS33\nChase".to_string(),
            ..Settings::default()
        };

        let expected = "# Invoice

| Date | Invoice Number |
| --- | --- |
| 01-04-2024 | 7 |

## From

Jane Doe
1 Main St
Springfield, IL 62701
jane@example.com

## Services

| Description | Hours | Rate | Amount |
| --- | --- | --- | --- |
| Services for March 2024 | 168 | $50.00 | $8,400.00 |
| **Total** | | | **$8,400.00** |

## Wiring Instructions

| | |
| --- | --- |
| Account Number | 000123 |
| SWIFT / Routing Code | CHASUS33 |
| Bank Name | Chase |
";
        assert_eq!(render(&settings), expected);
    }

    #[test]
    fn test_missing_wiring_lines_leave_gaps() {
        let settings = Settings {
            wiring_instructions: "000123".to_string(),
            ..Settings::default()
        };

        let body = render(&settings);
        assert!(body.contains("| Account Number | 000123 |\n"));
        assert!(body.contains("| SWIFT / Routing Code |  |\n"));
        assert!(body.contains("| Bank Name |  |\n"));
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let settings = Settings {
            issuer_name: "{{total}}".to_string(),
            ..Settings::default()
        };

        let body = render(&settings);
        assert!(body.contains("## From\n\n{{total}}\n"));
    }

    #[test]
    fn test_fill_keeps_unknown_and_unclosed() {
        let out = fill("a {{x}} b {{y}} c {{z", |key| {
            (key == "x").then(|| "1".to_string())
        });
        assert_eq!(out, "a 1 b {{y}} c {{z");
    }
}
