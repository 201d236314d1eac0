use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const ROLE_CODES: [&str; 5] = ["ADMIN", "BAYI", "KURUM", "OGRETMEN", "OGRENCI"];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        create_identity_tables(manager).await?;
        create_curriculum_tables(manager).await?;
        create_test_tables(manager).await?;

        manager
            .create_table(
                Table::create()
                    .table(UserCredits::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserCredits::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(UserCredits::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(UserCredits::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_credits_user")
                            .from(UserCredits::Table, UserCredits::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_table(manager, UserCredits::Table).await?;
        drop_table(manager, TestQuestions::Table).await?;
        drop_table(manager, Tests::Table).await?;
        drop_table(manager, Questions::Table).await?;
        drop_table(manager, Taxonomies::Table).await?;
        drop_table(manager, UserPermissions::Table).await?;
        drop_table(manager, UserGroups::Table).await?;
        drop_table(manager, AuthPermissions::Table).await?;
        drop_table(manager, AuthGroups::Table).await?;
        drop_table(manager, Users::Table).await
    }
}

async fn drop_table<T>(manager: &SchemaManager<'_>, table: T) -> Result<(), DbErr>
where
    T: IntoTableRef,
{
    manager
        .drop_table(Table::drop().table(table).if_exists().to_owned())
        .await
}

async fn create_identity_tables(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(Users::Table)
                .if_not_exists()
                .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                .col(
                    ColumnDef::new(Users::Username)
                        .string_len(150)
                        .not_null()
                        .unique_key(),
                )
                .col(ColumnDef::new(Users::Email).string_len(254).not_null())
                .col(ColumnDef::new(Users::FirstName).string_len(150).not_null())
                .col(ColumnDef::new(Users::LastName).string_len(150).not_null())
                .col(ColumnDef::new(Users::Password).string_len(128).not_null())
                .col(
                    ColumnDef::new(Users::Role)
                        .string_len(10)
                        .not_null()
                        .check(Expr::col(Users::Role).is_in(ROLE_CODES)),
                )
                .col(
                    ColumnDef::new(Users::IsActive)
                        .boolean()
                        .not_null()
                        .default(true),
                )
                .col(
                    ColumnDef::new(Users::IsStaff)
                        .boolean()
                        .not_null()
                        .default(false),
                )
                .col(
                    ColumnDef::new(Users::IsSuperuser)
                        .boolean()
                        .not_null()
                        .default(false),
                )
                .col(
                    ColumnDef::new(Users::DateJoined)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .col(ColumnDef::new(Users::LastLogin).timestamp_with_time_zone())
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("idx_users_role")
                .table(Users::Table)
                .col(Users::Role)
                .if_not_exists()
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(AuthGroups::Table)
                .if_not_exists()
                .col(ColumnDef::new(AuthGroups::Id).uuid().not_null().primary_key())
                .col(
                    ColumnDef::new(AuthGroups::Name)
                        .string_len(150)
                        .not_null()
                        .unique_key(),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(AuthPermissions::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(AuthPermissions::Id)
                        .uuid()
                        .not_null()
                        .primary_key(),
                )
                .col(
                    ColumnDef::new(AuthPermissions::Codename)
                        .string_len(100)
                        .not_null()
                        .unique_key(),
                )
                .col(ColumnDef::new(AuthPermissions::Name).string_len(255).not_null())
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(UserGroups::Table)
                .if_not_exists()
                .col(ColumnDef::new(UserGroups::UserId).uuid().not_null())
                .col(ColumnDef::new(UserGroups::GroupId).uuid().not_null())
                .primary_key(
                    Index::create()
                        .col(UserGroups::UserId)
                        .col(UserGroups::GroupId),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_user_groups_user")
                        .from(UserGroups::Table, UserGroups::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_user_groups_group")
                        .from(UserGroups::Table, UserGroups::GroupId)
                        .to(AuthGroups::Table, AuthGroups::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(UserPermissions::Table)
                .if_not_exists()
                .col(ColumnDef::new(UserPermissions::UserId).uuid().not_null())
                .col(ColumnDef::new(UserPermissions::PermissionId).uuid().not_null())
                .primary_key(
                    Index::create()
                        .col(UserPermissions::UserId)
                        .col(UserPermissions::PermissionId),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_user_permissions_user")
                        .from(UserPermissions::Table, UserPermissions::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_user_permissions_permission")
                        .from(UserPermissions::Table, UserPermissions::PermissionId)
                        .to(AuthPermissions::Table, AuthPermissions::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await
}

async fn create_curriculum_tables(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    // No uniqueness across the code tuple; several nodes may share codes.
    manager
        .create_table(
            Table::create()
                .table(Taxonomies::Table)
                .if_not_exists()
                .col(ColumnDef::new(Taxonomies::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Taxonomies::SubjectCode).string_len(10).not_null())
                .col(ColumnDef::new(Taxonomies::GradeCode).string_len(10).not_null())
                .col(ColumnDef::new(Taxonomies::ThemeCode).string_len(10).null())
                .col(ColumnDef::new(Taxonomies::UnitCode).string_len(10).null())
                .col(ColumnDef::new(Taxonomies::OutcomeCode).string_len(10).not_null())
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("idx_taxonomies_subject_grade")
                .table(Taxonomies::Table)
                .col(Taxonomies::SubjectCode)
                .col(Taxonomies::GradeCode)
                .if_not_exists()
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(Questions::Table)
                .if_not_exists()
                .col(ColumnDef::new(Questions::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Questions::TaxonomyId).uuid().not_null())
                .col(ColumnDef::new(Questions::Text).text().not_null())
                .col(ColumnDef::new(Questions::DifficultyScore).integer().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_questions_taxonomy")
                        .from(Questions::Table, Questions::TaxonomyId)
                        .to(Taxonomies::Table, Taxonomies::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("idx_questions_taxonomy")
                .table(Questions::Table)
                .col(Questions::TaxonomyId)
                .if_not_exists()
                .to_owned(),
        )
        .await
}

async fn create_test_tables(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(Tests::Table)
                .if_not_exists()
                .col(ColumnDef::new(Tests::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Tests::UserId).uuid().not_null())
                .col(
                    ColumnDef::new(Tests::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_tests_user")
                        .from(Tests::Table, Tests::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("idx_tests_user")
                .table(Tests::Table)
                .col(Tests::UserId)
                .if_not_exists()
                .to_owned(),
        )
        .await?;

    manager
        .create_table(
            Table::create()
                .table(TestQuestions::Table)
                .if_not_exists()
                .col(ColumnDef::new(TestQuestions::TestId).uuid().not_null())
                .col(ColumnDef::new(TestQuestions::QuestionId).uuid().not_null())
                .primary_key(
                    Index::create()
                        .col(TestQuestions::TestId)
                        .col(TestQuestions::QuestionId),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_test_questions_test")
                        .from(TestQuestions::Table, TestQuestions::TestId)
                        .to(Tests::Table, Tests::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_test_questions_question")
                        .from(TestQuestions::Table, TestQuestions::QuestionId)
                        .to(Questions::Table, Questions::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name("idx_test_questions_question")
                .table(TestQuestions::Table)
                .col(TestQuestions::QuestionId)
                .if_not_exists()
                .to_owned(),
        )
        .await
}

#[derive(DeriveIden)]
pub(super) enum Users {
    Table,
    Id,
    Username,
    Email,
    FirstName,
    LastName,
    Password,
    Role,
    IsActive,
    IsStaff,
    IsSuperuser,
    DateJoined,
    LastLogin,
}

#[derive(DeriveIden)]
enum AuthGroups {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum AuthPermissions {
    Table,
    Id,
    Codename,
    Name,
}

#[derive(DeriveIden)]
enum UserGroups {
    Table,
    UserId,
    GroupId,
}

#[derive(DeriveIden)]
enum UserPermissions {
    Table,
    UserId,
    PermissionId,
}

#[derive(DeriveIden)]
enum Taxonomies {
    Table,
    Id,
    SubjectCode,
    GradeCode,
    ThemeCode,
    UnitCode,
    OutcomeCode,
}

#[derive(DeriveIden)]
enum Questions {
    Table,
    Id,
    TaxonomyId,
    Text,
    DifficultyScore,
}

#[derive(DeriveIden)]
enum Tests {
    Table,
    Id,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TestQuestions {
    Table,
    TestId,
    QuestionId,
}

#[derive(DeriveIden)]
enum UserCredits {
    Table,
    Id,
    UserId,
    Balance,
}
