use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::{ClientError, ClientResult};
use crate::types::{Watch, WatchInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Brand,
    Description,
    Price,
    ImageUrl,
    Stock,
}

impl DraftField {
    pub const ALL: [DraftField; 6] = [
        DraftField::Name,
        DraftField::Brand,
        DraftField::Description,
        DraftField::Price,
        DraftField::ImageUrl,
        DraftField::Stock,
    ];

    /// Wire name of the field
    pub fn key(&self) -> &'static str {
        match self {
            DraftField::Name => "name",
            DraftField::Brand => "brand",
            DraftField::Description => "description",
            DraftField::Price => "price",
            DraftField::ImageUrl => "image_url",
            DraftField::Stock => "stock",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DraftField::Name => "Name",
            DraftField::Brand => "Brand",
            DraftField::Description => "Description",
            DraftField::Price => "Price",
            DraftField::ImageUrl => "Image URL",
            DraftField::Stock => "Stock",
        }
    }
}

/// Unsaved form state: raw strings exactly as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchDraft {
    pub name: String,
    pub brand: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
    pub stock: String,
}

impl WatchDraft {
    pub fn from_watch(watch: &Watch) -> Self {
        Self {
            name: watch.name.clone(),
            brand: watch.brand.clone(),
            description: watch.description.clone(),
            price: watch.price.to_string(),
            image_url: watch.image_url.clone(),
            stock: watch.stock.to_string(),
        }
    }

    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.name,
            DraftField::Brand => &self.brand,
            DraftField::Description => &self.description,
            DraftField::Price => &self.price,
            DraftField::ImageUrl => &self.image_url,
            DraftField::Stock => &self.stock,
        }
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let slot = match field {
            DraftField::Name => &mut self.name,
            DraftField::Brand => &mut self.brand,
            DraftField::Description => &mut self.description,
            DraftField::Price => &mut self.price,
            DraftField::ImageUrl => &mut self.image_url,
            DraftField::Stock => &mut self.stock,
        };
        *slot = value.into();
    }

    /// Check presence of every field and parse the numeric ones.
    ///
    /// Only catches what can be known locally; length limits and the like
    /// are left to the API.
    pub fn validate(&self) -> ClientResult<WatchInput> {
        for field in DraftField::ALL {
            if self.get(field).trim().is_empty() {
                return Err(ClientError::validation(
                    field.key(),
                    format!("{} is required", field.label()),
                ));
            }
        }

        Ok(WatchInput {
            name: self.name.trim().to_string(),
            brand: self.brand.trim().to_string(),
            description: self.description.trim().to_string(),
            price: parse_price(&self.price)?,
            image_url: self.image_url.trim().to_string(),
            stock: parse_stock(&self.stock)?,
        })
    }
}

fn parse_price(raw: &str) -> ClientResult<Decimal> {
    let price = Decimal::from_str(raw.trim())
        .map_err(|_| ClientError::validation("price", "Price must be a number"))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ClientError::validation("price", "Price must not be negative"));
    }
    Ok(price)
}

// Whole-valued decimals such as "3.0" are accepted like a number input would
fn parse_stock(raw: &str) -> ClientResult<u32> {
    let raw = raw.trim();
    if let Ok(stock) = raw.parse::<u32>() {
        return Ok(stock);
    }

    let value = Decimal::from_str(raw)
        .map_err(|_| ClientError::validation("stock", "Stock must be a whole number"))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ClientError::validation("stock", "Stock must not be negative"));
    }
    if !value.fract().is_zero() {
        return Err(ClientError::validation("stock", "Stock must be a whole number"));
    }
    value
        .trunc()
        .to_u32()
        .ok_or_else(|| ClientError::validation("stock", "Stock must be a whole number"))
}
