use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cycle_id: i32,
    pub template_id: i32,
    pub reviewer_id: Option<i32>,
    pub reviewee_id: Option<i32>,
    pub rating: i32,
    pub comments: Option<String>,
    pub is_locked: bool,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Cycle,
    Template,
    Reviewer,
    Reviewee,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Cycle => Entity::belongs_to(super::review_cycles::Entity)
                .from(Column::CycleId)
                .to(super::review_cycles::Column::Id)
                .on_delete(ForeignKeyAction::Restrict)
                .into(),
            Relation::Template => Entity::belongs_to(super::review_templates::Entity)
                .from(Column::TemplateId)
                .to(super::review_templates::Column::Id)
                .on_delete(ForeignKeyAction::Restrict)
                .into(),
            Relation::Reviewer => Entity::belongs_to(super::employees::Entity)
                .from(Column::ReviewerId)
                .to(super::employees::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
            Relation::Reviewee => Entity::belongs_to(super::employees::Entity)
                .from(Column::RevieweeId)
                .to(super::employees::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
        }
    }
}

impl Related<super::review_cycles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cycle.def()
    }
}

impl Related<super::review_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Template.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
