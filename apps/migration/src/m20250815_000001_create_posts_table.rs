use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(uuid(Posts::Id).primary_key())
                    .col(string(Posts::Title))
                    .col(text(Posts::Content))
                    .col(json_binary(Posts::Images))
                    .col(string(Posts::Author))
                    .col(string(Posts::AuthorImage))
                    .col(timestamp_with_time_zone(Posts::Timestamp))
                    .col(integer(Posts::Likes))
                    .col(integer(Posts::Dislikes))
                    .col(json_binary(Posts::Comments))
                    .col(boolean(Posts::Edited))
                    .col(timestamp_with_time_zone_null(Posts::EditedAt))
                    .col(big_integer(Posts::Version))
                    .to_owned(),
            )
            .await?;

        // Feed listing sorts on timestamp; profile views filter on author.
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_timestamp")
                    .table(Posts::Table)
                    .col(Posts::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_author")
                    .table(Posts::Table)
                    .col(Posts::Author)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    Title,
    Content,
    Images,
    Author,
    AuthorImage,
    Timestamp,
    Likes,
    Dislikes,
    Comments,
    Edited,
    EditedAt,
    Version,
}
