use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(pk_auto(Movie::Id))
                    .col(string(Movie::Title))
                    .col(string(Movie::Year))
                    .col(string(Movie::Rated))
                    .col(string(Movie::Released))
                    .col(string(Movie::Runtime))
                    .col(string(Movie::Genre))
                    .col(string(Movie::Director))
                    .col(text(Movie::Writer))
                    .col(text(Movie::Actors))
                    .col(text(Movie::Plot))
                    .col(string(Movie::Language))
                    .col(string(Movie::Country))
                    .col(string(Movie::Awards))
                    .col(string(Movie::Poster))
                    .col(string(Movie::Metascore))
                    .col(string(Movie::ImdbRating))
                    .col(string(Movie::ImdbVotes))
                    .col(string(Movie::ImdbId))
                    .col(string(Movie::Type))
                    .col(string(Movie::Dvd))
                    .col(string(Movie::BoxOffice))
                    .col(string(Movie::Production))
                    .col(string(Movie::Website))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Rating::Table)
                    .if_not_exists()
                    .col(pk_auto(Rating::Id))
                    .col(string(Rating::Source))
                    .col(string(Rating::Value))
                    .col(integer(Rating::MovieId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_movie")
                            .from(Rating::Table, Rating::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rating_movie_id")
                    .table(Rating::Table)
                    .col(Rating::MovieId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Rating::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    Id,
    Title,
    Year,
    Rated,
    Released,
    Runtime,
    Genre,
    Director,
    Writer,
    Actors,
    Plot,
    Language,
    Country,
    Awards,
    Poster,
    Metascore,
    ImdbRating,
    ImdbVotes,
    ImdbId,
    Type,
    Dvd,
    BoxOffice,
    Production,
    Website,
}

#[derive(DeriveIden)]
enum Rating {
    Table,
    Id,
    Source,
    Value,
    MovieId,
}
