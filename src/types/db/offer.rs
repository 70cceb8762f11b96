use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "offers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub offer_type: OfferType,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    // Soft-delete flag: unavailable offers disappear from the public
    // listing but keep their id for existing tickets.
    pub available: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// How many people a single ticket of this offer admits
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum OfferType {
    #[sea_orm(string_value = "SOLO")]
    Solo,
    #[sea_orm(string_value = "DUO")]
    Duo,
    #[sea_orm(string_value = "FAMILY")]
    Family,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ticket::Entity")]
    Ticket,
    #[sea_orm(has_one = "super::offer_stats::Entity")]
    OfferStats,
}

impl Related<super::ticket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ticket.def()
    }
}

impl Related<super::offer_stats::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OfferStats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
