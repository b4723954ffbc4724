//! MongoDB-backed product store.
//!
//! Records live in the `products` collection. Ids are `ObjectId`s exposed as
//! their hex string; listings are ordered by `_id` (creation order).

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::{ClientOptions, FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use fakestore_core::ProductId;
use fakestore_products::{
    NewProduct, Page, PageRequest, Product, ProductCategory, ProductFilter, ProductPatch,
};

use super::r#trait::{ProductStore, StoreError};

const COLLECTION: &str = "products";

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Stored document shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    name: String,
    price: f64,
    description: String,
    category: ProductCategory,
    image: String,
}

impl ProductDocument {
    fn from_new(new: NewProduct) -> Self {
        Self {
            id: None,
            name: new.name,
            price: new.price,
            description: new.description,
            category: new.category,
            image: new.image,
        }
    }

    fn into_product(self) -> Result<Product, StoreError> {
        let id = self
            .id
            .ok_or_else(|| StoreError::Backend("stored product has no _id".to_string()))?;
        Ok(Product {
            id: ProductId::from_raw(id.to_hex()),
            name: self.name,
            price: self.price,
            description: self.description,
            category: self.category,
            image: self.image,
        })
    }
}

pub struct MongoProductStore {
    client: Client,
    collection: Collection<ProductDocument>,
}

impl MongoProductStore {
    /// Connect and verify the deployment answers a `ping`.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options)?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 }, None).await?;
        tracing::info!(database, collection = COLLECTION, "connected to MongoDB");

        Ok(Self {
            collection: db.collection(COLLECTION),
            client,
        })
    }

    async fn collect(&self, filter: Document, options: FindOptions) -> Result<Vec<Product>, StoreError> {
        let cursor = self.collection.find(filter, options).await?;
        let docs: Vec<ProductDocument> = cursor.try_collect().await?;
        docs.into_iter().map(ProductDocument::into_product).collect()
    }
}

/// Translate a listing filter into a MongoDB query document.
///
/// The name criterion is a case-insensitive regex over the escaped input, so
/// it matches a literal substring.
pub(crate) fn filter_document(filter: &ProductFilter) -> Document {
    let mut query = Document::new();
    if let Some(category) = &filter.category {
        query.insert("category", category.as_str());
    }
    if let Some(name) = &filter.name {
        query.insert("name", doc! { "$regex": regex::escape(name), "$options": "i" });
    }
    query
}

/// `$set` document for the present fields of a patch.
pub(crate) fn set_document(patch: &ProductPatch) -> Document {
    let mut set = Document::new();
    if let Some(name) = &patch.name {
        set.insert("name", name.as_str());
    }
    if let Some(price) = patch.price {
        set.insert("price", price);
    }
    if let Some(description) = &patch.description {
        set.insert("description", description.as_str());
    }
    if let Some(category) = patch.category {
        set.insert("category", category.as_str());
    }
    if let Some(image) = &patch.image {
        set.insert("image", image.as_str());
    }
    set
}

fn object_id(id: &ProductId) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id.as_str()).map_err(|_| StoreError::InvalidId(id.to_string()))
}

fn ordered() -> Document {
    doc! { "_id": 1 }
}

#[async_trait]
impl ProductStore for MongoProductStore {
    async fn create(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut document = ProductDocument::from_new(product);
        let inserted = self.collection.insert_one(&document, None).await?;
        let id = inserted
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Backend("insert did not return an ObjectId".to_string()))?;
        document.id = Some(id);
        document.into_product()
    }

    async fn find(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let options = FindOptions::builder().sort(ordered()).build();
        self.collect(filter_document(filter), options).await
    }

    async fn find_page(
        &self,
        filter: &ProductFilter,
        request: PageRequest,
    ) -> Result<Page<Product>, StoreError> {
        let query = filter_document(filter);
        let total = self.collection.count_documents(query.clone(), None).await?;
        let options = FindOptions::builder()
            .sort(ordered())
            .skip(request.offset())
            .limit(i64::from(request.page_size()))
            .build();
        let docs = self.collect(query, options).await?;
        Ok(Page::new(docs, total, request))
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let oid = object_id(id)?;
        self.collection
            .find_one(doc! { "_id": oid }, None)
            .await?
            .map(ProductDocument::into_product)
            .transpose()
    }

    async fn update_by_id(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError> {
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }
        let oid = object_id(id)?;
        let set = set_document(&patch);

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        self.collection
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set }, options)
            .await?
            .map(ProductDocument::into_product)
            .transpose()
    }

    async fn delete_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let oid = object_id(id)?;
        self.collection
            .find_one_and_delete(doc! { "_id": oid }, None)
            .await?
            .map(ProductDocument::into_product)
            .transpose()
    }

    async fn shutdown(&self) {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB client shut down");
    }
}
