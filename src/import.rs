use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::decipher::decipher_text;
use crate::error::ImportError;
use crate::extract::{ParsedMenu, parse_menu_text};
use crate::pdf::{download_pdf, extract_text};
use crate::plan::SubscriptionPlan;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub menu: ParsedMenu,
    pub category_count: usize,
    pub item_count: usize,
    pub plan: SubscriptionPlan,
    pub imported_at: DateTime<Utc>,
}

/// Deciphers and parses already extracted text, then applies the plan limit.
pub fn import_text(text: &str, plan: SubscriptionPlan) -> Result<ImportReport, ImportError> {
    if text.trim().is_empty() {
        return Err(ImportError::EmptyText);
    }

    let deciphered = decipher_text(text);
    let menu = parse_menu_text(&deciphered);
    let item_count = menu.item_count();

    if let Some(limit) = plan.max_items() {
        if item_count > limit {
            warn!(%plan, limit, found = item_count, "import exceeds plan item limit");
            return Err(ImportError::PlanLimit {
                plan,
                limit,
                found: item_count,
            });
        }
    }

    info!(
        categories = menu.categories.len(),
        items = item_count,
        dropped = menu.dropped_items,
        "menu imported"
    );

    Ok(ImportReport {
        category_count: menu.categories.len(),
        item_count,
        menu,
        plan,
        imported_at: Utc::now(),
    })
}

pub async fn import_pdf(bytes: Vec<u8>, plan: SubscriptionPlan) -> Result<ImportReport, ImportError> {
    // pdf-extract is CPU bound and blocking.
    let text = tokio::task::spawn_blocking(move || extract_text(&bytes)).await??;
    import_text(&text, plan)
}

pub async fn import_url(
    client: &Client,
    url: &str,
    plan: SubscriptionPlan,
) -> Result<ImportReport, ImportError> {
    let bytes = download_pdf(client, url).await?;
    import_pdf(bytes, plan).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift_forward(text: &str) -> String {
        text.chars()
            .map(|c| if c.is_alphabetic() { char::from_u32(c as u32 + 1).unwrap() } else { c })
            .collect()
    }

    #[test]
    fn imports_shifted_text() {
        let text = format!(
            "{}\n{} {} 8,50\n{}\n{} 5",
            shift_forward("ANTIPASTI"),
            shift_forward("Carpaccio"),
            shift_forward("di manzo"),
            shift_forward("DOLCI"),
            shift_forward("Tiramisù"),
        );

        let report = import_text(&text, SubscriptionPlan::Base).unwrap();

        assert_eq!(report.category_count, 2);
        assert_eq!(report.item_count, 2);
        assert_eq!(report.menu.categories[0].name, "ANTIPASTI");
        assert_eq!(report.menu.categories[0].items[0].name, "Carpaccio di manzo");
        assert_eq!(report.menu.categories[0].items[0].price_cents, 850);
        assert_eq!(report.menu.categories[1].items[0].name, "Tiramisù");
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(matches!(
            import_text("  \n\t", SubscriptionPlan::Full),
            Err(ImportError::EmptyText)
        ));
    }

    #[test]
    fn plan_limit_is_enforced() {
        let mut text = String::from("PIZZE\n");
        for _ in 0..51 {
            text.push_str("Pizza della casa\n8\n");
        }

        let err = import_text(&text, SubscriptionPlan::Base).unwrap_err();
        assert!(matches!(
            err,
            ImportError::PlanLimit {
                limit: 50,
                found: 51,
                ..
            }
        ));

        let report = import_text(&text, SubscriptionPlan::Premium).unwrap();
        assert_eq!(report.item_count, 51);
    }

    #[tokio::test]
    async fn import_pdf_rejects_other_files() {
        let err = import_pdf(b"PK\x03\x04".to_vec(), SubscriptionPlan::Base)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::NotAPdf));
    }
}
