// Inventory domain models
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseMetrics {
    /// Percentage of storage capacity in use
    pub capacity: u32,
    pub total_products: u32,
    pub low_stock: u32,
    pub out_of_stock: u32,
    pub recent_deliveries: u32,
    pub pending_shipments: u32,
}

/// Either every site keyed by warehouse name, or the single selected site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WarehouseView {
    Single(WarehouseMetrics),
    All(BTreeMap<String, WarehouseMetrics>),
}

/// Stock is keyed by warehouse when viewing all sites, a plain count otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StockLevel {
    Units(u32),
    PerWarehouse(BTreeMap<String, u32>),
}

impl StockLevel {
    pub fn total(&self) -> u32 {
        match self {
            StockLevel::Units(units) => *units,
            StockLevel::PerWarehouse(per_site) => per_site.values().sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStock {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub stock: StockLevel,
    pub low_stock_threshold: u32,
    pub reorder_point: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryData {
    pub warehouse_data: WarehouseView,
    pub products: Vec<ProductStock>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_warehouse_payload() {
        let json = r#"{
            "warehouseData": {
                "capacity": 43, "totalProducts": 2876, "lowStock": 15,
                "outOfStock": 6, "recentDeliveries": 1, "pendingShipments": 10
            },
            "products": [{
                "id": "p002", "name": "Moon Dust", "sku": "MIN-MOO-100",
                "stock": 5, "lowStockThreshold": 40, "reorderPoint": 20
            }]
        }"#;

        let data: InventoryData = serde_json::from_str(json).unwrap();
        assert!(matches!(data.warehouse_data, WarehouseView::Single(ref m) if m.capacity == 43));
        assert_eq!(data.products[0].stock, StockLevel::Units(5));
    }

    #[test]
    fn test_all_warehouses_payload() {
        let json = r#"{
            "warehouseData": {
                "nice": {
                    "capacity": 65, "totalProducts": 4218, "lowStock": 8,
                    "outOfStock": 2, "recentDeliveries": 2, "pendingShipments": 5
                }
            },
            "products": [{
                "id": "p001", "name": "Duality", "sku": "MIN-DUA-100",
                "stock": {"las-vegas": 142, "nice": 87},
                "lowStockThreshold": 50, "reorderPoint": 30
            }]
        }"#;

        let data: InventoryData = serde_json::from_str(json).unwrap();
        assert!(matches!(data.warehouse_data, WarehouseView::All(ref sites) if sites.contains_key("nice")));
        assert_eq!(data.products[0].stock.total(), 229);
    }
}
