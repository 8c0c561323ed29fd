//! Minimal HTML rendering for the form-driven flow. The JSON API under
//! `/v1` is the primary surface; these pages exist for browser use.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::artifact::Prediction;
use crate::schema::{FeatureSchema, FieldKind};

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><title>{title}</title></head><body>\
         <h1>{title}</h1>{body}</body></html>"
    )
}

pub fn form_page(schema: &FeatureSchema) -> String {
    let mut inputs = String::new();
    for field in &schema.fields {
        let label = field.name.replace('_', " ");
        match &field.kind {
            FieldKind::Numeric => {
                let _ = write!(
                    inputs,
                    "<label>{label} <input type=\"number\" step=\"any\" name=\"{}\" required></label><br>",
                    field.name
                );
            }
            FieldKind::Categorical { levels } => {
                let _ = write!(inputs, "<label>{label} <select name=\"{}\">", field.name);
                for level in levels {
                    let _ = write!(inputs, "<option value=\"{level}\">{level}</option>");
                }
                inputs.push_str("</select></label><br>");
            }
        }
    }

    let body = format!(
        "<form method=\"post\" action=\"/predict\">{inputs}\
         <button type=\"submit\">Predict</button></form>\
         <p>Or upload a CSV batch:</p>\
         <form method=\"post\" action=\"/predict/csv\" enctype=\"multipart/form-data\">\
         <input type=\"file\" name=\"file\" accept=\".csv\">\
         <button type=\"submit\">Upload</button></form>"
    );
    page("Health Risk Prediction", &body)
}

pub fn result_page(prediction: &Prediction, warnings: &[&str]) -> String {
    let mut body = format!("<p>Prediction: <strong>{}</strong></p>", escape(&prediction.to_string()));
    if !warnings.is_empty() {
        body.push_str("<ul>");
        for warning in warnings {
            let _ = write!(body, "<li>{}</li>", escape(warning));
        }
        body.push_str("</ul>");
    }
    body.push_str("<p><a href=\"/\">Back</a></p>");
    page("Prediction Result", &body)
}

/// Batch results as a table, with a per-label count summary above it.
pub fn batch_page(
    headers: &[String],
    rows: &[Vec<String>],
    label_counts: &BTreeMap<String, usize>,
) -> String {
    let mut body = String::new();

    if !label_counts.is_empty() {
        body.push_str("<p>");
        let summary: Vec<String> = label_counts
            .iter()
            .map(|(label, count)| format!("{}: {count}", escape(label)))
            .collect();
        body.push_str(&summary.join(" &middot; "));
        body.push_str("</p>");
    }

    body.push_str("<table border=\"1\"><tr>");
    for header in headers {
        let _ = write!(body, "<th>{}</th>", escape(header));
    }
    body.push_str("<th>Health_Risk_Prediction</th></tr>");
    for row in rows {
        body.push_str("<tr>");
        for cell in row {
            let _ = write!(body, "<td>{}</td>", escape(cell));
        }
        body.push_str("</tr>");
    }
    body.push_str("</table><p><a href=\"/\">Back</a></p>");
    page("Batch Prediction Results", &body)
}
