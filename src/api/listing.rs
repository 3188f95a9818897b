//! List response shaping: group rows by set name, fan out the image
//! lookups concurrently, then assemble the annotated payload.
//!
//! Grouping and assembly are pure so they test without network; only
//! `resolve_set_images` touches the provider.

use futures::future::join_all;
use indexmap::IndexMap;
use tracing::warn;

use crate::api::models::{AnnotatedRow, ListPayload, SetSummary};
use crate::images::{piece_image_url, ImageProvider};
use crate::store::inventory::LegoRow;

/// Group row indices by set name, preserving first-seen order.
/// Rows without a set name group under the empty string.
pub fn group_by_set(rows: &[LegoRow]) -> IndexMap<String, Vec<usize>> {
    let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
    for (idx, row) in rows.iter().enumerate() {
        let name = row.lego.as_deref().unwrap_or("").trim().to_string();
        groups.entry(name).or_default().push(idx);
    }
    groups
}

/// Resolve each distinct set name's image concurrently. A failed lookup
/// degrades to the empty image rather than failing the response; the empty
/// name resolves to the empty image with no network call.
pub async fn resolve_set_images(
    provider: &ImageProvider,
    names: &[String],
) -> IndexMap<String, String> {
    let lookups = names.iter().map(|name| async move {
        if name.is_empty() {
            return (name.clone(), String::new());
        }
        match provider.set_image(name).await {
            Ok(url) => (name.clone(), url),
            Err(e) => {
                warn!(set = %name, error = %e, "set image lookup failed; degrading to empty image");
                (name.clone(), String::new())
            }
        }
    });
    join_all(lookups).await.into_iter().collect()
}

/// Attach the resolved images to the rows. With a single distinct set the
/// rows additionally carry per-piece image URLs built from their codes;
/// with several sets only the set image is attached.
pub fn assemble(rows: Vec<LegoRow>, images: &IndexMap<String, String>) -> ListPayload {
    let groups = group_by_set(&rows);
    let single_set = groups.len() <= 1;

    let sets = groups
        .iter()
        .map(|(name, indices)| SetSummary {
            name: name.clone(),
            image: images.get(name).cloned().unwrap_or_default(),
            count: indices.len(),
        })
        .collect();

    let items = rows
        .into_iter()
        .map(|row| {
            let name = row.lego.as_deref().unwrap_or("").trim();
            let image_set = images.get(name).cloned().unwrap_or_default();
            let image_piece = if single_set {
                piece_image_url(row.code.as_deref().unwrap_or(""))
            } else {
                String::new()
            };
            AnnotatedRow {
                row,
                image_set,
                image_piece,
            }
        })
        .collect();

    ListPayload { items, sets }
}

/// Full list shaping: group, fan out lookups, assemble.
pub async fn annotate(provider: &ImageProvider, rows: Vec<LegoRow>) -> ListPayload {
    let groups = group_by_set(&rows);
    let names: Vec<String> = groups.keys().cloned().collect();
    let images = resolve_set_images(provider, &names).await;
    assemble(rows, &images)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i32, lego: &str, code: &str) -> LegoRow {
        LegoRow {
            id,
            code: (!code.is_empty()).then(|| code.to_string()),
            lego: (!lego.is_empty()).then(|| lego.to_string()),
            set: None,
            task: None,
            pedido: None,
            cant: None,
            completo: None,
            reemplazado: None,
        }
    }

    #[test]
    fn groups_indices_by_set_name() {
        let rows = vec![row(1, "A", "x"), row(2, "A", "y"), row(3, "B", "z")];
        let groups = group_by_set(&rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["A"], vec![0, 1]);
        assert_eq!(groups["B"], vec![2]);
    }

    #[test]
    fn missing_set_names_group_under_empty_string() {
        let rows = vec![row(1, "", "x"), row(2, "  ", "y"), row(3, "A", "z")];
        let groups = group_by_set(&rows);
        assert_eq!(groups[""], vec![0, 1]);
        assert_eq!(groups["A"], vec![2]);
    }

    #[test]
    fn multi_set_rows_carry_their_own_set_image() {
        let rows = vec![row(1, "A", "x"), row(2, "A", "y"), row(3, "B", "z")];
        let mut images = IndexMap::new();
        images.insert("A".to_string(), "https://img/a.webp".to_string());
        images.insert("B".to_string(), "https://img/b.webp".to_string());

        let payload = assemble(rows, &images);
        assert_eq!(payload.items[0].image_set, "https://img/a.webp");
        assert_eq!(payload.items[1].image_set, "https://img/a.webp");
        assert_eq!(payload.items[2].image_set, "https://img/b.webp");
        // Piece images only appear in the single-set branch.
        assert!(payload.items.iter().all(|i| i.image_piece.is_empty()));

        assert_eq!(payload.sets.len(), 2);
        assert_eq!(payload.sets[0].count, 2);
        assert_eq!(payload.sets[1].count, 1);
        assert_eq!(
            payload.sets.iter().map(|s| s.count).sum::<usize>(),
            payload.items.len()
        );
    }

    #[test]
    fn single_set_rows_get_piece_images() {
        let rows = vec![row(1, "A", "6093053"), row(2, "A", "")];
        let mut images = IndexMap::new();
        images.insert("A".to_string(), "https://img/a.webp".to_string());

        let payload = assemble(rows, &images);
        assert!(payload.items[0].image_piece.contains("6093053"));
        assert_eq!(payload.items[1].image_piece, "");
        assert_eq!(payload.items[0].image_set, "https://img/a.webp");
    }

    #[test]
    fn unresolved_set_degrades_to_empty_image() {
        let rows = vec![row(1, "A", "x"), row(2, "B", "y")];
        // B's lookup failed upstream, so it is absent from the map.
        let mut images = IndexMap::new();
        images.insert("A".to_string(), "https://img/a.webp".to_string());

        let payload = assemble(rows, &images);
        assert_eq!(payload.items[1].image_set, "");
    }

    #[tokio::test]
    async fn resolve_skips_the_empty_name() {
        // Unroutable base URL: any real lookup would fail, the empty name must not try.
        let provider = ImageProvider::new(
            "http://127.0.0.1:1/",
            std::time::Duration::from_millis(50),
        )
        .unwrap();
        let images = resolve_set_images(&provider, &[String::new()]).await;
        assert_eq!(images[""], "");
    }
}
