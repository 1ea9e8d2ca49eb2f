//! The furniture store schema.

use crate::catalog::{ColumnDef, FkAction, ForeignKey, TableDef};
use crate::model::{Category, IntendedUse, Payment, Title};

pub const SUPPLIERS: &str = "Suppliers";
pub const MATERIALS: &str = "Materials";
pub const PRODUCTS: &str = "Products";
pub const CUSTOMERS: &str = "Customers";
pub const STORES: &str = "Stores";
pub const FURNITURE_MATERIALS: &str = "Furniture_Materials";

/// Tables in dependency order (parents before children).
pub fn tables() -> Vec<TableDef> {
    vec![
        TableDef::entity(
            SUPPLIERS,
            "supplier",
            vec![
                ColumnDef::text("name").not_null(),
                ColumnDef::text("phone"),
                ColumnDef::text("address"),
            ],
        ),
        TableDef::entity(
            MATERIALS,
            "material",
            vec![
                ColumnDef::text("sid").hidden(),
                ColumnDef::text("name").not_null(),
                ColumnDef::real("price").default_value("0").check("price >= 0"),
                ColumnDef::integer("qty").default_value("0").check("qty >= 0"),
            ],
        )
        .with_foreign_key(
            ForeignKey::new("sid", SUPPLIERS)
                .on_delete(FkAction::SetNull)
                .on_update(FkAction::Cascade),
        ),
        TableDef::entity(
            PRODUCTS,
            "product",
            vec![
                ColumnDef::text("name").not_null(),
                ColumnDef::text("category").one_of(Category::VALUES),
                ColumnDef::real("size"),
                ColumnDef::text("intended_use").one_of(IntendedUse::VALUES),
                ColumnDef::text("description"),
                ColumnDef::text("color"),
                ColumnDef::integer("is_saleable").check("is_saleable >= 0 AND is_saleable <= 1"),
            ],
        ),
        TableDef::entity(
            CUSTOMERS,
            "customer",
            vec![
                ColumnDef::text("title").one_of(Title::VALUES),
                ColumnDef::text("name").not_null(),
                ColumnDef::text("email").not_null(),
                ColumnDef::text("phone"),
                ColumnDef::text("address"),
                ColumnDef::text("payment").one_of(Payment::VALUES),
                ColumnDef::text("account"),
            ],
        ),
        TableDef::entity(STORES, "store", vec![ColumnDef::text("name").not_null()]),
        TableDef::junction(
            FURNITURE_MATERIALS,
            "furniture_material",
            ForeignKey::new("pid", PRODUCTS)
                .on_delete(FkAction::Cascade)
                .on_update(FkAction::Cascade),
            ForeignKey::new("mid", MATERIALS)
                .on_delete(FkAction::Cascade)
                .on_update(FkAction::Cascade),
        )
        .hide_column("mid"),
    ]
}
