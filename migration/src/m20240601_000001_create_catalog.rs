use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Films::Table)
                    .if_not_exists()
                    .col(pk_uuid(Films::Id))
                    .col(string(Films::ExternalId))
                    .col(string(Films::Title).check(Expr::cust("length(title) <= 200")))
                    .col(double_null(Films::Rating).check(Expr::cust("rating >= 0 AND rating <= 10")))
                    .col(integer_null(Films::Year).check(Expr::cust("year >= 1895")))
                    .col(string(Films::PosterUrl))
                    .col(string_null(Films::Country))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("film_unique_external_id")
                    .table(Films::Table)
                    .col(Films::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Actors::Table)
                    .if_not_exists()
                    .col(pk_uuid(Actors::Id))
                    .col(string(Actors::ExternalId))
                    .col(string(Actors::FullName).check(Expr::cust("length(full_name) <= 200")))
                    .col(string_null(Actors::Height))
                    .col(string_null(Actors::BirthDate))
                    .col(string_null(Actors::PlaceOfBirth))
                    .col(string(Actors::PhotoUrl))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("actor_unique_external_id")
                    .table(Actors::Table)
                    .col(Actors::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmToActor::Table)
                    .if_not_exists()
                    .col(pk_uuid(FilmToActor::Id))
                    .col(uuid(FilmToActor::FilmId))
                    .col(uuid(FilmToActor::ActorId))
                    .col(string_null(FilmToActor::Character))
                    .col(integer(FilmToActor::Position).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_to_actor_film")
                            .from(FilmToActor::Table, FilmToActor::FilmId)
                            .to(Films::Table, Films::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_to_actor_actor")
                            .from(FilmToActor::Table, FilmToActor::ActorId)
                            .to(Actors::Table, Actors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_film_to_actor_unique")
                    .table(FilmToActor::Table)
                    .col(FilmToActor::FilmId)
                    .col(FilmToActor::ActorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_film_to_actor_actor_id")
                    .table(FilmToActor::Table)
                    .col(FilmToActor::ActorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(FilmToActor::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Actors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Films::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Films {
    Table,
    Id,
    ExternalId,
    Title,
    Rating,
    Year,
    PosterUrl,
    Country,
}

#[derive(DeriveIden)]
enum Actors {
    Table,
    Id,
    ExternalId,
    FullName,
    Height,
    BirthDate,
    PlaceOfBirth,
    PhotoUrl,
}

#[derive(DeriveIden)]
enum FilmToActor {
    Table,
    Id,
    FilmId,
    ActorId,
    Character,
    Position,
}
