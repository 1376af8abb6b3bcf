use chrono::NaiveDate;
use sqlx::FromRow;

use crate::db::DbPool;
use crate::models::{
    ArchetypeRole, ArchetypeSummary, DeckArchetype, NewResult, Player, ResultWithDecks,
};
use crate::store::{StoreResult, TournamentStore};

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct HistoryRow {
    id: i32,
    week_start: NaiveDate,
    wins: i32,
    losses: i32,
    ties: i32,
    primary_name: Option<String>,
    primary_image_url: Option<String>,
    secondary_name: Option<String>,
    secondary_image_url: Option<String>,
}

fn summary(name: Option<String>, image_url: Option<String>) -> Option<ArchetypeSummary> {
    name.map(|name| ArchetypeSummary {
        name,
        image_url: image_url.unwrap_or_default(),
    })
}

impl From<HistoryRow> for ResultWithDecks {
    fn from(row: HistoryRow) -> Self {
        Self {
            id: row.id,
            week_start: row.week_start,
            wins: row.wins,
            losses: row.losses,
            ties: row.ties,
            deck_archetype_1: summary(row.primary_name, row.primary_image_url),
            deck_archetype_2: summary(row.secondary_name, row.secondary_image_url),
        }
    }
}

/// Filters on `lower(name)` so `player_name_lower_idx` serves the lookup.
/// Names are stored trimmed.
const FIND_PLAYERS_BY_NAME: &str =
    "SELECT id, name FROM player WHERE lower(name) = lower($1) ORDER BY id";

/// Escapes `%`, `_` and `\` so user input matches literally inside ILIKE.
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl TournamentStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_players_by_name(&self, name: &str) -> StoreResult<Vec<Player>> {
        sqlx::query_as::<_, Player>(FIND_PLAYERS_BY_NAME)
            .bind(name)
            .fetch_all(&self.pool)
            .await
    }

    async fn insert_player(&self, player: &Player) -> StoreResult<Player> {
        sqlx::query_as::<_, Player>(
            "INSERT INTO player (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(&player.id)
        .bind(&player.name)
        .fetch_one(&self.pool)
        .await
    }

    async fn search_players(&self, fragment: &str) -> StoreResult<Vec<Player>> {
        sqlx::query_as::<_, Player>(
            "SELECT id, name FROM player WHERE name ILIKE $1 ORDER BY name, id",
        )
        .bind(format!("%{}%", escape_like(fragment)))
        .fetch_all(&self.pool)
        .await
    }

    async fn list_players(&self) -> StoreResult<Vec<Player>> {
        sqlx::query_as::<_, Player>("SELECT id, name FROM player ORDER BY name, id")
            .fetch_all(&self.pool)
            .await
    }

    async fn get_player(&self, id: &str) -> StoreResult<Option<Player>> {
        sqlx::query_as::<_, Player>("SELECT id, name FROM player WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_archetype(
        &self,
        role: ArchetypeRole,
        name: &str,
    ) -> StoreResult<Option<DeckArchetype>> {
        // Table names come from a closed enum, never from input.
        let sql = format!(
            "SELECT id, name, image_url FROM {} WHERE name = $1 ORDER BY id LIMIT 1",
            role.table_name()
        );
        sqlx::query_as::<_, DeckArchetype>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert_archetype(
        &self,
        role: ArchetypeRole,
        name: &str,
        image_url: &str,
    ) -> StoreResult<DeckArchetype> {
        let sql = format!(
            "INSERT INTO {} (name, image_url) VALUES ($1, $2) RETURNING id, name, image_url",
            role.table_name()
        );
        sqlx::query_as::<_, DeckArchetype>(&sql)
            .bind(name)
            .bind(image_url)
            .fetch_one(&self.pool)
            .await
    }

    async fn find_results_for_week(
        &self,
        player_id: &str,
        week_start: NaiveDate,
    ) -> StoreResult<Vec<i32>> {
        sqlx::query_scalar::<_, i32>(
            "SELECT id FROM result WHERE player_id = $1 AND week_start = $2",
        )
        .bind(player_id)
        .bind(week_start)
        .fetch_all(&self.pool)
        .await
    }

    async fn count_results_for_week(&self, week_start: NaiveDate) -> StoreResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM result WHERE week_start = $1")
            .bind(week_start)
            .fetch_one(&self.pool)
            .await
    }

    async fn insert_result(&self, result: &NewResult) -> StoreResult<i32> {
        sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO result (
                week_start, wins, losses, ties, player_id,
                deck_archetype_1_id, deck_archetype_2_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(result.week_start)
        .bind(result.wins)
        .bind(result.losses)
        .bind(result.ties)
        .bind(&result.player_id)
        .bind(result.deck_archetype_1_id)
        .bind(result.deck_archetype_2_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn results_for_player(&self, player_id: &str) -> StoreResult<Vec<ResultWithDecks>> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT r.id, r.week_start, r.wins, r.losses, r.ties,
                   a1.name AS primary_name, a1.image_url AS primary_image_url,
                   a2.name AS secondary_name, a2.image_url AS secondary_image_url
              FROM result r
              LEFT JOIN deck_archetype_1 a1 ON a1.id = r.deck_archetype_1_id
              LEFT JOIN deck_archetype_2 a2 ON a2.id = r.deck_archetype_2_id
             WHERE r.player_id = $1
             ORDER BY r.week_start DESC, r.id DESC
            "#,
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ResultWithDecks::from).collect())
    }
}
