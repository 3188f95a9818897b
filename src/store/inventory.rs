//! Queries over the `lego` table. Free functions over `&Db`; column
//! identifiers only ever come from the [`Column`] allow-list.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::columns::Column;
use super::db::Db;

/// One physical piece/order line. All tracked attributes are free-form
/// nullable text; only `id` is store-assigned and immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LegoRow {
    pub id: i32,
    pub code: Option<String>,
    pub lego: Option<String>,
    pub set: Option<String>,
    pub task: Option<String>,
    pub pedido: Option<String>,
    pub cant: Option<String>,
    pub completo: Option<String>,
    pub reemplazado: Option<String>,
}

/// The full writable field set, as used by both insert and update.
#[derive(Debug, Clone, Default)]
pub struct LegoFields {
    pub code: Option<String>,
    pub lego: Option<String>,
    pub set: Option<String>,
    pub task: Option<String>,
    pub pedido: Option<String>,
    pub cant: Option<String>,
    pub completo: Option<String>,
    pub reemplazado: Option<String>,
}

const ROW_COLUMNS: &str =
    "id, code, lego, \"set\", task, pedido, cant, completo, reemplazado";

pub async fn fetch_all(db: &Db) -> sqlx::Result<Vec<LegoRow>> {
    let sql = format!("SELECT {ROW_COLUMNS} FROM lego");
    sqlx::query_as(&sql).fetch_all(&db.pool).await
}

/// Rows where `column = value`, ordered ascending by that column.
pub async fn fetch_filtered(db: &Db, column: Column, value: &str) -> sqlx::Result<Vec<LegoRow>> {
    let col = column.quoted();
    let sql = format!("SELECT {ROW_COLUMNS} FROM lego WHERE {col} = $1 ORDER BY {col} ASC");
    sqlx::query_as(&sql).bind(value).fetch_all(&db.pool).await
}

/// Rows whose code contains the given fragment.
pub async fn search_by_code(db: &Db, fragment: &str) -> sqlx::Result<Vec<LegoRow>> {
    let sql = format!("SELECT {ROW_COLUMNS} FROM lego WHERE code LIKE $1");
    sqlx::query_as(&sql)
        .bind(format!("%{fragment}%"))
        .fetch_all(&db.pool)
        .await
}

/// Distinct non-null, non-blank values of a column, ordered ascending.
pub async fn distinct_options(db: &Db, column: Column) -> sqlx::Result<Vec<String>> {
    let col = column.quoted();
    let sql = format!(
        "SELECT DISTINCT {col} FROM lego \
         WHERE {col} IS NOT NULL AND btrim({col}) <> '' \
         ORDER BY {col} ASC"
    );
    sqlx::query_scalar(&sql).fetch_all(&db.pool).await
}

pub async fn insert(db: &Db, fields: &LegoFields) -> sqlx::Result<LegoRow> {
    let sql = format!(
        "INSERT INTO lego (code, lego, \"set\", task, pedido, cant, completo, reemplazado) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING {ROW_COLUMNS}"
    );
    sqlx::query_as(&sql)
        .bind(&fields.code)
        .bind(&fields.lego)
        .bind(&fields.set)
        .bind(&fields.task)
        .bind(&fields.pedido)
        .bind(&fields.cant)
        .bind(&fields.completo)
        .bind(&fields.reemplazado)
        .fetch_one(&db.pool)
        .await
}

/// Full replace of the tracked fields. None when no row has that id.
pub async fn update(db: &Db, id: i32, fields: &LegoFields) -> sqlx::Result<Option<LegoRow>> {
    let sql = format!(
        "UPDATE lego \
         SET code = $1, lego = $2, \"set\" = $3, task = $4, pedido = $5, \
             cant = $6, completo = $7, reemplazado = $8 \
         WHERE id = $9 \
         RETURNING {ROW_COLUMNS}"
    );
    sqlx::query_as(&sql)
        .bind(&fields.code)
        .bind(&fields.lego)
        .bind(&fields.set)
        .bind(&fields.task)
        .bind(&fields.pedido)
        .bind(&fields.cant)
        .bind(&fields.completo)
        .bind(&fields.reemplazado)
        .bind(id)
        .fetch_optional(&db.pool)
        .await
}

/// Returns the number of rows removed (0 or 1).
pub async fn delete(db: &Db, id: i32) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM lego WHERE id = $1")
        .bind(id)
        .execute(&db.pool)
        .await?;
    Ok(res.rows_affected())
}
