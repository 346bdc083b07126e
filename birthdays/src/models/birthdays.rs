use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "birthdays")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub month: i32,
    pub day: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Formulaire d'ajout (POST /)
#[derive(Debug, Deserialize)]
pub struct NewBirthday {
    pub name: String,
    pub month: i32,
    pub day: i32,
}

// Formulaire de suppression (POST /removeBirthday)
#[derive(Debug, Deserialize)]
pub struct RemoveBirthday {
    #[serde(rename = "removeBirthday")]
    pub id: i32,
}
