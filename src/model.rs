//! Typed rows: one record type per table, closed under [`Record`].

use crate::catalog::furniture::{CUSTOMERS, FURNITURE_MATERIALS, MATERIALS, PRODUCTS, STORES, SUPPLIERS};
use crate::catalog::TableDef;
use crate::error::{AppError, CatalogError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Numeric columns arrive from form inputs as text as often as as numbers.
mod numeric {
    use serde::de::{DeserializeOwned, Error};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::fmt::Display;
    use std::str::FromStr;

    fn parse<T, E>(value: Value) -> Result<Option<T>, E>
    where
        T: DeserializeOwned + FromStr,
        T::Err: Display,
        E: Error,
    {
        match value {
            Value::Null => Ok(None),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|e| E::custom(format!("invalid number '{}': {}", s, e))),
            other => serde_json::from_value(other).map(Some).map_err(E::custom),
        }
    }

    /// Number or numeric text; null and blank text are absent.
    pub fn optional<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + FromStr,
        T::Err: Display,
    {
        parse(Value::deserialize(d)?)
    }

    /// Like [`optional`], but a present key is kept even when null so an explicit
    /// null is stored as NULL instead of the column default.
    pub fn explicit<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + FromStr,
        T::Err: Display,
    {
        parse(Value::deserialize(d)?).map(Some)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Sofas,
    Chairs,
    Tables,
    Beds,
    Dressers,
    Cabinets,
}

impl Category {
    pub const VALUES: &'static [&'static str] = &["sofas", "chairs", "tables", "beds", "dressers", "cabinets"];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntendedUse {
    Home,
    Office,
}

impl IntendedUse {
    pub const VALUES: &'static [&'static str] = &["home", "office"];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Title {
    #[serde(rename = "mr")]
    Mr,
    #[serde(rename = "ms")]
    Ms,
    #[serde(rename = "mrs")]
    Mrs,
    Undefined,
}

impl Title {
    pub const VALUES: &'static [&'static str] = &["mr", "ms", "mrs", "Undefined"];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payment {
    CreditCard,
    ApplePay,
    SamsungPay,
    Fps,
}

impl Payment {
    pub const VALUES: &'static [&'static str] = &["credit_card", "apple_pay", "samsung_pay", "fps"];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Material {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    pub name: String,
    /// `None` leaves the column to its default, `Some(None)` stores NULL.
    #[serde(default, deserialize_with = "numeric::explicit", skip_serializing_if = "Option::is_none")]
    pub price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "numeric::explicit", skip_serializing_if = "Option::is_none")]
    pub qty: Option<Option<i64>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "numeric::optional", skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intended_use: Option<IntendedUse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// 0 or 1; the range is enforced by storage.
    #[serde(default, deserialize_with = "numeric::optional", skip_serializing_if = "Option::is_none")]
    pub is_saleable: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Customer {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Store {
    pub id: String,
    pub name: String,
}

/// Association between a product and one of its materials.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductMaterial {
    pub pid: String,
    pub mid: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    Supplier(Supplier),
    Material(Material),
    Product(Product),
    Customer(Customer),
    Store(Store),
    ProductMaterial(ProductMaterial),
}

impl Record {
    /// Declared name of the table this record belongs to.
    pub fn table(&self) -> &'static str {
        match self {
            Record::Supplier(_) => SUPPLIERS,
            Record::Material(_) => MATERIALS,
            Record::Product(_) => PRODUCTS,
            Record::Customer(_) => CUSTOMERS,
            Record::Store(_) => STORES,
            Record::ProductMaterial(_) => FURNITURE_MATERIALS,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Record::Supplier(r) => Some(&r.id),
            Record::Material(r) => Some(&r.id),
            Record::Product(r) => Some(&r.id),
            Record::Customer(r) => Some(&r.id),
            Record::Store(r) => Some(&r.id),
            Record::ProductMaterial(_) => None,
        }
    }

    /// Decode an untyped attribute object for `table`. Unknown columns and
    /// out-of-domain enumerated values are validation errors.
    pub fn from_attributes(table: &TableDef, attributes: Value) -> Result<Self, AppError> {
        let record = match table.name.as_str() {
            SUPPLIERS => Record::Supplier(serde_json::from_value(attributes)?),
            MATERIALS => Record::Material(serde_json::from_value(attributes)?),
            PRODUCTS => Record::Product(serde_json::from_value(attributes)?),
            CUSTOMERS => Record::Customer(serde_json::from_value(attributes)?),
            STORES => Record::Store(serde_json::from_value(attributes)?),
            FURNITURE_MATERIALS => Record::ProductMaterial(serde_json::from_value(attributes)?),
            other => return Err(CatalogError::UnknownTable(other.to_string()).into()),
        };
        Ok(record)
    }

    /// Present columns in declaration order; absent optional columns are left out so storage defaults apply.
    /// Defaulted columns given an explicit null keep it.
    pub fn into_attributes(self) -> Result<Vec<(String, Value)>, AppError> {
        let value = match self {
            Record::Supplier(r) => serde_json::to_value(r)?,
            Record::Material(r) => serde_json::to_value(r)?,
            Record::Product(r) => serde_json::to_value(r)?,
            Record::Customer(r) => serde_json::to_value(r)?,
            Record::Store(r) => serde_json::to_value(r)?,
            Record::ProductMaterial(r) => serde_json::to_value(r)?,
        };
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            _ => Err(AppError::Validation("record must serialize to an object".into())),
        }
    }
}
