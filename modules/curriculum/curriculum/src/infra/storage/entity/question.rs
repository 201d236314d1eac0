use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub taxonomy_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub difficulty_score: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::taxonomy::Entity",
        from = "Column::TaxonomyId",
        to = "super::taxonomy::Column::Id",
        on_delete = "Cascade"
    )]
    Taxonomy,
    #[sea_orm(has_many = "super::test_question::Entity")]
    TestQuestion,
}

impl ActiveModelBehavior for ActiveModel {}

impl Related<super::taxonomy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Taxonomy.def()
    }
}

impl Related<super::test::Entity> for Entity {
    fn to() -> RelationDef {
        super::test_question::Relation::Test.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::test_question::Relation::Question.def().rev())
    }
}
