//! HTML pages: the form, the result and the error message

use std::fmt::Write;

use risk_core::features::tables::{
    CategoryTable, FRUIT_VEG, ILLNESS_FLAG, INCOME, PHYSICAL_ACTIVITY, SEX, YES_NO,
};
use risk_core::{EncoderProfile, Prediction, RawInput, RawValue, RiskLevel};

use crate::models::numeric_field;

enum Widget {
    Radio,
    Select,
}

/// Enumerated questions: field, question, table, widget
const CHOICE_FIELDS: &[(&str, &str, CategoryTable, Widget)] = &[
    ("heart_disease", "Do you have heart disease?", YES_NO, Widget::Radio),
    ("sex", "Sex", SEX, Widget::Select),
    ("physical_activity", "How often do you exercise?", PHYSICAL_ACTIVITY, Widget::Select),
    ("smoking", "Do you smoke?", YES_NO, Widget::Radio),
    ("alcohol", "Do you drink alcohol?", YES_NO, Widget::Radio),
    ("fruit_veg", "Do you eat fruits/vegetables daily?", FRUIT_VEG, Widget::Select),
    ("mental_illness", "Have you had poor mental health in the past 30 days?", ILLNESS_FLAG, Widget::Radio),
    ("physical_illness", "Have you been physically unwell in the past 30 days?", ILLNESS_FLAG, Widget::Radio),
    ("healthcare", "Do you have access to healthcare?", YES_NO, Widget::Radio),
    ("income", "Monthly Income", INCOME, Widget::Select),
];

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:2rem auto;padding:0 1rem}\
label{display:block;margin-top:.8rem}\
.high{color:#b00020}.low{color:#1b5e20}.error{color:#b00020}";

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
<title>{title}</title><style>{STYLE}</style></head>\
<body><h1>{title}</h1>{body}</body></html>",
        title = escape(title),
    )
}

fn display_value(value: Option<&RawValue>) -> String {
    match value {
        Some(RawValue::Integer(v)) => v.to_string(),
        Some(RawValue::Float(v)) => v.to_string(),
        Some(RawValue::Text(v)) => v.clone(),
        None => String::new(),
    }
}

fn numeric_input(out: &mut String, name: &str, value: &str) {
    let Some(field) = numeric_field(name) else {
        return;
    };
    let _ = write!(
        out,
        "<label>{label} <input type=\"number\" name=\"{name}\" min=\"{min}\" max=\"{max}\" \
step=\"{step}\" value=\"{value}\" required></label>",
        label = escape(field.label),
        name = field.name,
        min = field.min,
        max = field.max,
        step = field.step,
        value = escape(value),
    );
}

fn choice_input(out: &mut String, name: &str, value: &str) {
    let Some((_, question, table, widget)) = CHOICE_FIELDS.iter().find(|(f, ..)| *f == name)
    else {
        return;
    };

    match widget {
        Widget::Radio => {
            let _ = write!(out, "<fieldset><legend>{}</legend>", escape(question));
            for option in table.labels() {
                let checked = if option == value { " checked" } else { "" };
                let _ = write!(
                    out,
                    "<label><input type=\"radio\" name=\"{name}\" value=\"{v}\"{checked} required> {v}</label>",
                    v = escape(option),
                );
            }
            out.push_str("</fieldset>");
        }
        Widget::Select => {
            let _ = write!(
                out,
                "<label>{} <select name=\"{name}\" required>",
                escape(question)
            );
            for option in table.labels() {
                let selected = if option == value { " selected" } else { "" };
                let _ = write!(
                    out,
                    "<option value=\"{v}\"{selected}>{v}</option>",
                    v = escape(option),
                );
            }
            out.push_str("</select></label>");
        }
    }
}

/// The questionnaire for one profile, pre-filled from `defaults`
pub fn form_page(profile: &EncoderProfile, defaults: &RawInput) -> String {
    let mut body = String::from(
        "<p>This tool estimates your risk of diabetes based on your health data. \
Please enter your information below.</p><form method=\"post\" action=\"/predict\">",
    );

    for field in profile.required_fields() {
        let value = display_value(defaults.get(field));
        if numeric_field(field).is_some() {
            numeric_input(&mut body, field, &value);
        } else {
            choice_input(&mut body, field, &value);
        }

        if field == "heart_disease" {
            body.push_str(
                "<label>If known, specify the type (optional): \
<input type=\"text\" name=\"heart_disease_type\" maxlength=\"200\"></label>",
            );
        }
    }

    body.push_str("<p><button type=\"submit\">Predict Diabetes Risk</button></p></form>");
    page("Diabetes Risk Prediction", &body)
}

pub fn result_page(prediction: &Prediction, annotations: &[(String, String)]) -> String {
    let class = match prediction.risk {
        RiskLevel::High => "high",
        RiskLevel::Low => "low",
    };

    let mut body = format!(
        "<p class=\"{class}\"><strong>{}</strong></p><p><strong>Confidence:</strong> {}</p>",
        prediction.risk.message(),
        prediction.confidence_percent(),
    );

    for (field, text) in annotations {
        let _ = write!(
            body,
            "<p>Noted ({}): {}</p>",
            escape(field),
            escape(text)
        );
    }

    body.push_str("<p><a href=\"/\">Start again</a></p>");
    page("Diabetes Risk Prediction", &body)
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        "<p class=\"error\">{}</p><p><a href=\"/\">Back to the form</a></p>",
        escape(message)
    );
    page("Diabetes Risk Prediction", &body)
}
