//! Asset registry commands.

use std::error::Error;

use chrono::NaiveDate;
use tracing::info;

use assetdesk_client::{ClientError, HttpClient};
use assetdesk_core::{Asset, AssetDraft, AssetId, AssetStatus};

/// Field edits for `assets update`. `None` keeps the current value.
#[derive(Debug, Default)]
pub struct AssetChanges {
    pub name: Option<String>,
    pub category: Option<String>,
    pub value: Option<f64>,
    pub status: Option<AssetStatus>,
    pub purchase_date: Option<NaiveDate>,
}

impl AssetChanges {
    /// Overlay the edits on an existing draft.
    pub fn apply(self, draft: AssetDraft) -> AssetDraft {
        AssetDraft {
            name: self.name.unwrap_or(draft.name),
            category: self.category.unwrap_or(draft.category),
            value: self.value.unwrap_or(draft.value),
            status: self.status.unwrap_or(draft.status),
            purchase_date: self.purchase_date.or(draft.purchase_date),
        }
    }
}

/// One-line failure message in the registry's wording, e.g.
/// `Failed to create asset: HTTP 500 Internal Server Error`.
fn failure(action: &str, err: ClientError) -> String {
    match err {
        ClientError::NotFound(_) => format!("Failed to {}: asset not found", action),
        ClientError::Status { status, .. } => format!("Failed to {}: HTTP {}", action, status),
        other => format!("Failed to {}: {}", action, other),
    }
}

pub async fn list(client: &HttpClient) -> Result<(), Box<dyn Error>> {
    let assets = client
        .list_assets()
        .await
        .map_err(|e| failure("fetch assets", e))?;

    if assets.is_empty() {
        println!("No assets found");
        println!("Add your first asset with `assetdesk assets create`");
        return Ok(());
    }

    let total: f64 = assets.iter().map(|a| a.value).sum();
    println!("Assets ({}), total value {:.2}:", assets.len(), total);
    println!("{}", header());
    println!("{}", "-".repeat(100));
    for asset in &assets {
        println!("{}", row(asset));
    }

    Ok(())
}

pub async fn show(client: &HttpClient, id: &AssetId) -> Result<(), Box<dyn Error>> {
    let asset = client
        .get_asset(id)
        .await
        .map_err(|e| failure("fetch asset", e))?;
    print_asset(&asset);
    Ok(())
}

pub async fn create(client: &HttpClient, draft: &AssetDraft) -> Result<(), Box<dyn Error>> {
    let asset = client
        .create_asset(draft)
        .await
        .map_err(|e| failure("create asset", e))?;
    info!(id = %asset.id, "Asset created");
    println!("Asset created successfully");
    print_asset(&asset);
    Ok(())
}

pub async fn update(
    client: &HttpClient,
    id: &AssetId,
    changes: AssetChanges,
) -> Result<(), Box<dyn Error>> {
    let current = client
        .get_asset(id)
        .await
        .map_err(|e| failure("update asset", e))?;
    let asset = client
        .update_asset(id, &changes.apply(current.draft()))
        .await
        .map_err(|e| failure("update asset", e))?;
    info!(id = %asset.id, "Asset updated");
    println!("Asset updated successfully");
    print_asset(&asset);
    Ok(())
}

pub async fn delete(client: &HttpClient, id: &AssetId) -> Result<(), Box<dyn Error>> {
    client
        .delete_asset(id)
        .await
        .map_err(|e| failure("delete asset", e))?;
    info!(id = %id, "Asset deleted");
    println!("Asset deleted successfully");
    Ok(())
}

fn header() -> String {
    format!(
        "{:<24}  {:<14}  {:>12}  {:<11}  {:<10}  {}",
        "NAME", "CATEGORY", "VALUE", "STATUS", "PURCHASED", "ID"
    )
}

fn row(asset: &Asset) -> String {
    format!(
        "{:<24}  {:<14}  {:>12.2}  {:<11}  {:<10}  {}",
        asset.name,
        asset.category,
        asset.value,
        asset.status.as_str(),
        purchase_date(asset, "%Y-%m-%d"),
        asset.id
    )
}

fn print_asset(asset: &Asset) {
    println!("  ID:         {}", asset.id);
    println!("  Name:       {}", asset.name);
    println!("  Category:   {}", asset.category);
    println!("  Value:      {:.2}", asset.value);
    println!("  Status:     {}", asset.status);
    println!("  Purchased:  {}", purchase_date(asset, "%b %-d, %Y"));
}

fn purchase_date(asset: &Asset, format: &str) -> String {
    match asset.purchase_date {
        Some(date) => date.format(format).to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desk() -> Asset {
        Asset {
            id: AssetId::new("a1"),
            name: "Standing desk".to_string(),
            category: "Furniture".to_string(),
            value: 450.0,
            status: AssetStatus::Active,
            purchase_date: NaiveDate::from_ymd_opt(2022, 6, 30),
        }
    }

    #[test]
    fn test_changes_keep_unset_fields() {
        let changes = AssetChanges {
            status: Some(AssetStatus::Retired),
            value: Some(0.0),
            ..Default::default()
        };
        let draft = changes.apply(desk().draft());
        assert_eq!(draft.name, "Standing desk");
        assert_eq!(draft.category, "Furniture");
        assert_eq!(draft.status, AssetStatus::Retired);
        assert_eq!(draft.value, 0.0);
        assert_eq!(draft.purchase_date, desk().purchase_date);
    }

    #[test]
    fn test_row_columns() {
        let line = row(&desk());
        assert!(line.starts_with("Standing desk"));
        assert!(line.contains("450.00"));
        assert!(line.contains("2022-06-30"));
        assert!(line.ends_with("a1"));
    }

    #[test]
    fn test_row_without_purchase_date() {
        let asset = Asset {
            purchase_date: None,
            ..desk()
        };
        let line = row(&asset);
        assert!(line.contains("  -  "));
    }

    #[test]
    fn test_failure_lines_name_the_operation() {
        assert_eq!(
            failure("delete asset", ClientError::NotFound("/assets/a9".to_string())),
            "Failed to delete asset: asset not found"
        );
        assert_eq!(
            failure("create asset", ClientError::Serialization("expected value".to_string())),
            "Failed to create asset: serialization error: expected value"
        );
    }
}
