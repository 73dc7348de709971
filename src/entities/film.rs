use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "films")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub external_id: String,
    pub title: String,
    pub rating: Option<f64>,
    pub year: Option<i32>,
    pub poster_url: String,
    pub country: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::film_to_actor::Entity")]
    FilmToActor,
}

impl Related<super::film_to_actor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FilmToActor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
