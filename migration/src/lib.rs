pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_movie_and_rating;
mod m20240108_000001_create_comment;
mod m20240115_000001_add_movie_title_unique;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_movie_and_rating::Migration),
            Box::new(m20240108_000001_create_comment::Migration),
            Box::new(m20240115_000001_add_movie_title_unique::Migration),
        ]
    }
}
