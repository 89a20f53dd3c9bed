use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Goals {
    Table,
    Id,
    Title,
    Description,
    StartDate,
    EndDate,
    Status,
    EmployeeId,
    ManagerId,
    Progress,
    Notes,
}

#[derive(DeriveIden)]
enum ReviewCycles {
    Table,
    Id,
    Name,
    Type,
    StartDate,
    EndDate,
}

#[derive(DeriveIden)]
enum ReviewTemplates {
    Table,
    Id,
    Name,
    StructureJson,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    Id,
    CycleId,
    TemplateId,
    ReviewerId,
    RevieweeId,
    Rating,
    Comments,
    IsLocked,
}

#[derive(DeriveIden)]
enum Skills {
    Table,
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum EmployeeSkills {
    Table,
    Id,
    EmployeeId,
    SkillId,
    ProficiencyLevel,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Goals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Goals::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Goals::Title).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Goals::Description)
                            .string_len(1000)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Goals::StartDate).date().not_null())
                    .col(ColumnDef::new(Goals::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(Goals::Status)
                            .string_len(50)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Goals::EmployeeId).integer().not_null())
                    .col(ColumnDef::new(Goals::ManagerId).integer())
                    .col(ColumnDef::new(Goals::Progress).integer())
                    .col(
                        ColumnDef::new(Goals::Notes)
                            .string_len(1000)
                            .not_null()
                            .default(""),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_goals_employee")
                            .from(Goals::Table, Goals::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_goals_manager")
                            .from(Goals::Table, Goals::ManagerId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_goals_employee_id")
                    .table(Goals::Table)
                    .col(Goals::EmployeeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReviewCycles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReviewCycles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReviewCycles::Name).string_len(100).not_null())
                    .col(ColumnDef::new(ReviewCycles::Type).string_len(50))
                    .col(ColumnDef::new(ReviewCycles::StartDate).date().not_null())
                    .col(ColumnDef::new(ReviewCycles::EndDate).date().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReviewTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReviewTemplates::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReviewTemplates::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReviewTemplates::StructureJson).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reviews::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reviews::CycleId).integer().not_null())
                    .col(ColumnDef::new(Reviews::TemplateId).integer().not_null())
                    .col(ColumnDef::new(Reviews::ReviewerId).integer())
                    .col(ColumnDef::new(Reviews::RevieweeId).integer())
                    .col(ColumnDef::new(Reviews::Rating).integer().not_null())
                    .col(ColumnDef::new(Reviews::Comments).text())
                    .col(
                        ColumnDef::new(Reviews::IsLocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_cycle")
                            .from(Reviews::Table, Reviews::CycleId)
                            .to(ReviewCycles::Table, ReviewCycles::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_template")
                            .from(Reviews::Table, Reviews::TemplateId)
                            .to(ReviewTemplates::Table, ReviewTemplates::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_reviewer")
                            .from(Reviews::Table, Reviews::ReviewerId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_reviewee")
                            .from(Reviews::Table, Reviews::RevieweeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Skills::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Skills::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Skills::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Skills::Description).string_len(500))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmployeeSkills::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmployeeSkills::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EmployeeSkills::EmployeeId).integer().not_null())
                    .col(ColumnDef::new(EmployeeSkills::SkillId).integer().not_null())
                    .col(
                        ColumnDef::new(EmployeeSkills::ProficiencyLevel)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_skills_employee")
                            .from(EmployeeSkills::Table, EmployeeSkills::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_skills_skill")
                            .from(EmployeeSkills::Table, EmployeeSkills::SkillId)
                            .to(Skills::Table, Skills::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmployeeSkills::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Skills::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reviews::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ReviewTemplates::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ReviewCycles::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Goals::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
