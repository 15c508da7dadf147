// Keyword reconciliation
// Converges the stored keyword rows of one media entry to the comma-separated
// keyword string on the entry: missing tokens are inserted, stale rows are
// deleted, and the whole pass commits once.

use rusqlite::Connection;

use crate::db::{self, schema};
use crate::error::Result;

/// Split, trim and de-duplicate the keyword display string into the desired
/// token set. Empty tokens are dropped.
fn desired_tokens(keywords: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in keywords.split(',') {
        let token = token.trim();
        if !token.is_empty() && !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

/// Converge the keyword rows of `(keyword_type_id, object_id)` to the token
/// set of `keywords`. Token order is irrelevant; the post-state equals the
/// desired set regardless of the starting rows.
pub fn reconcile(
    conn: &Connection,
    keyword_type_id: i64,
    object_id: i64,
    keywords: &str,
) -> Result<()> {
    let desired = desired_tokens(keywords);
    let existing = schema::list_object_keywords(conn, keyword_type_id, object_id)?;

    if desired.is_empty() && existing.is_empty() {
        return Ok(());
    }

    let now = db::now_timestamp();
    let tx = conn.unchecked_transaction()?;

    for token in &desired {
        if !existing.iter().any(|row| &row.value == token) {
            schema::insert_keyword(&tx, keyword_type_id, object_id, token, &now)?;
        }
    }

    for row in &existing {
        if !desired.iter().any(|t| t == &row.value) {
            schema::delete_keyword(&tx, row.id)?;
        }
    }

    tx.commit()?;
    Ok(())
}
