// Text rendering of catalog data. Pure functions of what was fetched.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{User, Watch};

/// `$14,300.00`
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

pub fn watch_table(watches: &[Watch]) -> String {
    let headers = ["ID", "Brand", "Name", "Price", "Stock"];
    let rows: Vec<[String; 5]> = watches
        .iter()
        .map(|w| {
            [
                w.id.to_string(),
                w.brand.clone(),
                w.name.clone(),
                format_price(w.price),
                w.stock.to_string(),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 5]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:<width$}", c, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers)];
    for row in &rows {
        out.push(line([&row[0], &row[1], &row[2], &row[3], &row[4]]));
    }
    out.join("\n")
}

pub fn watch_detail(watch: &Watch) -> String {
    let availability = if watch.stock > 0 {
        format!("In stock ({} available)", watch.stock)
    } else {
        "Out of stock".to_string()
    };

    let mut lines = vec![
        format!("{} {}", watch.brand, watch.name),
        format!("Price:  {}", format_price(watch.price)),
        format!("Stock:  {}", availability),
        format!("Image:  {}", watch.image_url),
    ];
    if let Some(created) = watch.created_at {
        lines.push(format!("Added:  {}", created.format("%Y-%m-%d")));
    }
    lines.push(String::new());
    lines.push(watch.description.clone());
    lines.join("\n")
}

pub fn user_summary(user: &User) -> String {
    let role = if user.is_admin { "admin" } else { "customer" };
    format!("{} <{}> ({}, id {})", user.username, user.email, role, user.id)
}
