use serde::{Deserialize, Serialize};

use fieldserve_core::{Entity, ProductCategoryId};

/// Product category, shared by products and suppliers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    pub id: ProductCategoryId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl Entity for ProductCategory {
    type Id = ProductCategoryId;

    fn id(&self) -> ProductCategoryId {
        self.id
    }
}
