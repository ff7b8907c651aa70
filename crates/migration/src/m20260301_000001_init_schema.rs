use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subject::Table)
                    .if_not_exists()
                    .col(pk_auto(Subject::Id))
                    .col(string(Subject::Name).unique_key())
                    .col(string_null(Subject::Description))
                    .col(string(Subject::Color).default("#3498db"))
                    .col(timestamp(Subject::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Question::Table)
                    .if_not_exists()
                    .col(pk_auto(Question::Id))
                    .col(integer(Question::SubjectId))
                    .col(string(Question::Title))
                    .col(text(Question::QuestionText))
                    .col(text(Question::CodeAnswer))
                    // Difficulty is an open label set; the admin form offers a
                    // closed choice but storage does not constrain it.
                    .col(string(Question::Difficulty).default("Medium"))
                    .col(timestamp(Question::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-question-subject_id")
                            .from(Question::Table, Question::SubjectId)
                            .to(Subject::Table, Subject::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdminUser::Table)
                    .if_not_exists()
                    .col(pk_auto(AdminUser::Id))
                    .col(string(AdminUser::Username).unique_key())
                    .col(string(AdminUser::PasswordHash))
                    .col(timestamp(AdminUser::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_question_subject_id")
                    .table(Question::Table)
                    .col(Question::SubjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_question_created_at")
                    .table(Question::Table)
                    .col(Question::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Question::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AdminUser::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Subject::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Subject {
    Table,
    Id,
    Name,
    Description,
    Color,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Question {
    Table,
    Id,
    SubjectId,
    Title,
    QuestionText,
    CodeAnswer,
    Difficulty,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AdminUser {
    Table,
    Id,
    Username,
    PasswordHash,
    CreatedAt,
}
