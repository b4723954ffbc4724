use core::str::FromStr;

use serde::{Deserialize, Serialize};

use fakestore_core::{DomainError, DomainResult, Entity, ProductId};

/// Catalog category. Every stored product carries exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    Electronics,
    Computers,
    #[serde(rename = "Smart Home")]
    SmartHome,
    Gaming,
    Wearables,
    Cameras,
    #[serde(rename = "Home Appliances")]
    HomeAppliances,
    Accessories,
    Drones,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 9] = [
        ProductCategory::Electronics,
        ProductCategory::Computers,
        ProductCategory::SmartHome,
        ProductCategory::Gaming,
        ProductCategory::Wearables,
        ProductCategory::Cameras,
        ProductCategory::HomeAppliances,
        ProductCategory::Accessories,
        ProductCategory::Drones,
    ];

    /// Wire/storage representation (e.g. `"Smart Home"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Electronics => "Electronics",
            ProductCategory::Computers => "Computers",
            ProductCategory::SmartHome => "Smart Home",
            ProductCategory::Gaming => "Gaming",
            ProductCategory::Wearables => "Wearables",
            ProductCategory::Cameras => "Cameras",
            ProductCategory::HomeAppliances => "Home Appliances",
            ProductCategory::Accessories => "Accessories",
            ProductCategory::Drones => "Drones",
        }
    }
}

impl core::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("`{s}` is not a valid category")))
    }
}

/// A stored catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub category: ProductCategory,
    pub image: String,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Product {
    /// Materialize a record from validated fields and a store-assigned id.
    pub fn from_new(id: ProductId, new: NewProduct) -> Self {
        Self {
            id,
            name: new.name,
            price: new.price,
            description: new.description,
            category: new.category,
            image: new.image,
        }
    }
}

/// Validated payload for record creation (all fields present).
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub category: ProductCategory,
    pub image: String,
}

/// Unvalidated product fields as they arrive from a client.
///
/// Create requires every field; update accepts any subset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductDraft {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

impl ProductDraft {
    /// Validate as a creation payload.
    pub fn into_new(self) -> DomainResult<NewProduct> {
        Ok(NewProduct {
            name: required_text("name", self.name)?,
            price: required_price(self.price)?,
            description: required_text("description", self.description)?,
            category: self
                .category
                .ok_or_else(|| missing("category"))
                .and_then(|c| parse_category(&c))?,
            image: required_text("image", self.image)?,
        })
    }

    /// Validate as a partial update. Only present fields are checked.
    pub fn into_patch(self) -> DomainResult<ProductPatch> {
        Ok(ProductPatch {
            name: self.name.map(|v| required_text("name", Some(v))).transpose()?,
            price: self.price.map(|v| required_price(Some(v))).transpose()?,
            description: self
                .description
                .map(|v| required_text("description", Some(v)))
                .transpose()?,
            category: self.category.map(|c| parse_category(&c)).transpose()?,
            image: self.image.map(|v| required_text("image", Some(v))).transpose()?,
        })
    }
}

/// Validated partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub category: Option<ProductCategory>,
    pub image: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.image.is_none()
    }

    /// Overwrite the present fields of `product`. The id is never touched.
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(image) = self.image {
            product.image = image;
        }
    }
}

fn missing(field: &str) -> DomainError {
    DomainError::validation(format!("{field} is required"))
}

fn required_text(field: &str, value: Option<String>) -> DomainResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(missing(field)),
    }
}

fn required_price(value: Option<f64>) -> DomainResult<f64> {
    let price = value.ok_or_else(|| missing("price"))?;
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::validation("price must be a non-negative number"));
    }
    Ok(price)
}

fn parse_category(raw: &str) -> DomainResult<ProductCategory> {
    raw.parse()
}
