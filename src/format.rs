use crate::datetime;
use crate::models::AdmissionFee;

pub fn format_currency(fee: &AdmissionFee) -> String {
    match fee {
        AdmissionFee::Free => "Gratuito".to_string(),
        AdmissionFee::Amount(amount) => {
            let rounded = amount.round().max(0.0) as u64;
            format!("$ {}", group_thousands(rounded))
        }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

pub fn format_time(time: &str) -> String {
    datetime::to_12_hour(time)
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

pub fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn short_category_name(name: &str) -> &str {
    match name {
        "Culturales y Artísticos" | "Culturales y artisticos" => "Culturales",
        "Corporativos / Empresariales" => "Corporativos",
        "Comunitarios o Gubernamentales" => "Comunitarios",
        "Virtuales / Híbridos" => "Virtuales",
        "Benéficos / Solidarios" => "Benéficos",
        other => other,
    }
}
