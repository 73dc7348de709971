use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "actors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub external_id: String,
    pub full_name: String,
    pub height: Option<String>,
    /// ISO `YYYY-MM-DD`.
    pub birth_date: Option<String>,
    pub place_of_birth: Option<String>,
    pub photo_url: String,
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
