use crate::{Db, types::PartyRow};
use rfq_core::{
    models::{PartyDetails, PartyRecord},
    ports::PartyRepository,
};

impl PartyRepository for Db {
    async fn get_party(
        &self,
        party_id: Self::PartyId,
    ) -> Result<Option<PartyRecord<Self>>, Self::Error> {
        let row = sqlx::query_as::<_, PartyRow>(
            r#"
            select
                id,
                role,
                name,
                json(location) as location,
                rating,
                updated_at
            from
                party
            where
                id = $1
            "#,
        )
        .bind(party_id)
        .fetch_optional(&self.reader)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn upsert_party(
        &self,
        party_id: Self::PartyId,
        details: PartyDetails,
        as_of: Self::DateTime,
    ) -> Result<(), Self::Error> {
        sqlx::query(
            r#"
            insert into
                party (id, role, name, location, rating, updated_at)
            values
                ($1, $2, $3, jsonb($4), $5, $6)
            on conflict (id) do update set
                role = excluded.role,
                name = excluded.name,
                location = excluded.location,
                rating = excluded.rating,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(party_id)
        .bind(details.role.as_str())
        .bind(&details.name)
        .bind(sqlx::types::Json(&details.location))
        .bind(details.rating)
        .bind(as_of)
        .execute(&self.writer)
        .await?;

        Ok(())
    }
}
