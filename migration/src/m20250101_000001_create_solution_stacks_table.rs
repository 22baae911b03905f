use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SolutionStack::SolutionStacks)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SolutionStack::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SolutionStack::Name).string_len(300).not_null())
                    .col(ColumnDef::new(SolutionStack::Slug).string_len(100).not_null())
                    .col(ColumnDef::new(SolutionStack::Description).text().not_null())
                    .col(ColumnDef::new(SolutionStack::Category).string().not_null())
                    .col(ColumnDef::new(SolutionStack::Status).string().not_null())
                    .col(ColumnDef::new(SolutionStack::Owner).string().not_null())
                    .col(
                        ColumnDef::new(SolutionStack::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SolutionStack::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_solution_stacks_slug")
                    .table(SolutionStack::SolutionStacks)
                    .col(SolutionStack::Slug)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // default list ordering
        manager
            .create_index(
                Index::create()
                    .name("idx_solution_stacks_name")
                    .table(SolutionStack::SolutionStacks)
                    .col(SolutionStack::Name)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SolutionStack::SolutionStacks).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SolutionStack {
    SolutionStacks,
    Id,
    Name,
    Slug,
    Description,
    Category,
    Status,
    Owner,
    CreatedAt,
    UpdatedAt,
}
