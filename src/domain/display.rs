use crate::{
    common::fixed::Fixed2,
    domain::record::{Record, columns},
    parsers::nom::price::parse_float_prefix,
};

/// The RetailPrice field with two decimals, or the raw text if it doesn't start with a finite
/// number
pub fn format_price(record: &Record) -> String {
    let raw = record.field(columns::RETAIL_PRICE);

    match parse_float_prefix(raw) {
        Some(price) if price.is_finite() => Fixed2(price).to_string(),
        _ => raw.to_owned(),
    }
}

/// `Fruit (Form): $price unit`, the form part omitted when empty
pub fn display_line(record: &Record) -> String {
    let fruit = record.field(columns::FRUIT);
    let form = record.field(columns::FORM);
    let unit = record.field(columns::RETAIL_PRICE_UNIT);
    let price = format_price(record);

    if form.is_empty() {
        format!("{fruit}: ${price} {unit}")
    } else {
        format!("{fruit} ({form}): ${price} {unit}")
    }
}
