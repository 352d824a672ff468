use crate::config::Config;
use crate::entities::{
    article, bar, coupon, favorite_bar, follow_relation, notification, post, post_image,
    post_like, user_coupon, user_profile, view_history,
};
use sea_orm::sea_query::Index;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema,
};

pub type DbPool = DatabaseConnection;

pub async fn create_pool(config: &Config) -> Result<DbPool, anyhow::Error> {
    let db = connect(&config.database_url()).await?;
    create_schema(&db).await?;
    Ok(db)
}

pub async fn connect(url: &str) -> Result<DbPool, anyhow::Error> {
    let mut options = ConnectOptions::new(url.to_string());
    // An in-memory SQLite database lives and dies with its connection.
    if url.starts_with("sqlite:") {
        options.max_connections(1).min_connections(1);
    }
    options.sqlx_logging(false);
    let db = Database::connect(options).await?;
    Ok(db)
}

/// Creates every table (parents before children) if it does not exist yet.
pub async fn create_schema(db: &DbPool) -> Result<(), anyhow::Error> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table(db, &schema, user_profile::Entity).await?;
    create_table(db, &schema, bar::Entity).await?;
    create_table(db, &schema, article::Entity).await?;
    create_table(db, &schema, follow_relation::Entity).await?;
    create_table(db, &schema, post::Entity).await?;
    create_table(db, &schema, post_image::Entity).await?;
    create_table(db, &schema, post_like::Entity).await?;
    create_table(db, &schema, notification::Entity).await?;
    create_table(db, &schema, favorite_bar::Entity).await?;
    create_table(db, &schema, view_history::Entity).await?;
    create_table(db, &schema, coupon::Entity).await?;
    create_table(db, &schema, user_coupon::Entity).await?;

    let indexes = [
        Index::create()
            .name("idx_posts_user_created")
            .table(post::Entity)
            .col(post::Column::UserId)
            .col(post::Column::CreatedAt)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_posts_bar_created")
            .table(post::Entity)
            .col(post::Column::BarId)
            .col(post::Column::CreatedAt)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_follow_relations_followee")
            .table(follow_relation::Entity)
            .col(follow_relation::Column::FolloweeId)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_notifications_user_read")
            .table(notification::Entity)
            .col(notification::Column::UserId)
            .col(notification::Column::IsRead)
            .if_not_exists()
            .to_owned(),
    ];
    for index in indexes {
        if let Err(e) = db.execute(builder.build(&index)).await {
            // MySQL has no CREATE INDEX IF NOT EXISTS; an existing index is fine.
            log::debug!("Skipping index creation: {:?}", e);
        }
    }

    log::info!("Database schema ready");
    Ok(())
}

async fn create_table<E>(db: &DbPool, schema: &Schema, entity: E) -> Result<(), anyhow::Error>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;
    Ok(())
}
