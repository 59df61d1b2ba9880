use chrono::NaiveDate;
use diesel::prelude::*;

use crate::domain::price::{NewPrice as DomainNewPrice, Price as DomainPrice};
use crate::domain::types::{PriceAmount, PriceId, TypeConstraintError};

/// Diesel model representing a row in the `prices` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::prices)]
pub struct Price {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub create_date: NaiveDate,
}

/// Insertable form of [`Price`].
///
/// `id: None` leaves the column out of the statement so SQLite assigns the
/// row id.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::prices)]
pub struct NewPrice<'a> {
    pub id: Option<i32>,
    pub name: &'a str,
    pub category: &'a str,
    pub price: f64,
    pub create_date: NaiveDate,
}

impl TryFrom<Price> for DomainPrice {
    type Error = TypeConstraintError;

    fn try_from(price: Price) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PriceId::new(price.id)?,
            name: price.name,
            category: price.category,
            price: PriceAmount::new(price.price)?,
            create_date: price.create_date,
        })
    }
}

impl<'a> From<&'a DomainNewPrice> for NewPrice<'a> {
    fn from(price: &'a DomainNewPrice) -> Self {
        Self {
            id: price.id.map(PriceId::get),
            name: price.name.as_str(),
            category: price.category.as_str(),
            price: price.price.get(),
            create_date: price.create_date,
        }
    }
}
