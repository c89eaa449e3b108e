//! Related-entity resolvers.
//!
//! Relations list active entities only, whatever the caller may see through
//! the top-level services. Product reviews follow the moderation switch.

use std::collections::HashMap;

use crate::error::CatalogueResult;
use crate::filter::{Filter, FilterList, IdFilter, active_only};
use crate::models::{
    ATTRIBUTE_PRODUCT, Attribute, AttributeValue, Category, Manufacturer, PRODUCT_CATEGORY,
    Product, ProductAttribute, ProductFilterList, ProductSelectionList, Review, ReviewFilterList,
    SELECTION_LIST_PRODUCT, Selection, SelectionList, Vendor,
};
use crate::repository::{DataType, Page, Repository};

use super::EntityService;

impl EntityService<Manufacturer> {
    /// Active products made by `manufacturer`.
    pub async fn products(
        &self,
        manufacturer: &Manufacturer,
        page: Page,
    ) -> CatalogueResult<Vec<Product>> {
        let filters = ProductFilterList {
            manufacturer: Some(IdFilter::new(manufacturer.id())),
            ..Default::default()
        };
        Ok(self
            .repository()
            .get_by_filter::<Product>(&filters.into(), page)
            .await?)
    }
}

impl EntityService<Vendor> {
    /// Active products sold by `vendor`.
    pub async fn products(&self, vendor: &Vendor, page: Page) -> CatalogueResult<Vec<Product>> {
        let filters = ProductFilterList {
            vendor: Some(IdFilter::new(vendor.id())),
            ..Default::default()
        };
        Ok(self
            .repository()
            .get_by_filter::<Product>(&filters.into(), page)
            .await?)
    }
}

impl EntityService<Category> {
    /// Active products linked to `category`.
    pub async fn products(
        &self,
        category: &Category,
        page: Page,
    ) -> CatalogueResult<Vec<Product>> {
        let filters = FilterList::new(active_only()).with(
            "category_id",
            Some(Filter::relation(&PRODUCT_CATEGORY, category.id())),
        );
        Ok(self.repository().get_by_filter::<Product>(&filters, page).await?)
    }

    /// The active parent of `category`, if any.
    pub async fn parent(&self, category: &Category) -> CatalogueResult<Option<Category>> {
        match category.parent_id() {
            Some(parent_id) => active_by_id(self.repository(), parent_id).await,
            None => Ok(None),
        }
    }
}

impl EntityService<Product> {
    /// Reviews of `product`.
    ///
    /// Moderated catalogues return active reviews only; otherwise inactive
    /// reviews are listed as well.
    pub async fn reviews(&self, product: &Product, page: Page) -> CatalogueResult<Vec<Review>> {
        let filters = ReviewFilterList {
            product: Some(IdFilter::new(product.id())),
            active: if self.options().reviews_moderated {
                active_only()
            } else {
                None
            },
            ..Default::default()
        };
        Ok(self
            .repository()
            .get_by_filter::<Review>(&filters.into(), page)
            .await?)
    }

    /// The product's manufacturer, when set and active.
    pub async fn manufacturer(&self, product: &Product) -> CatalogueResult<Option<Manufacturer>> {
        match product.manufacturer_id() {
            Some(id) => active_by_id(self.repository(), id).await,
            None => Ok(None),
        }
    }

    /// Attribute values of `product`, in position order.
    ///
    /// Values whose attribute no longer exists are skipped.
    pub async fn attributes(&self, product: &Product) -> CatalogueResult<Vec<ProductAttribute>> {
        let values = FilterList::new(None).with("object_id", Some(Filter::equals_id(product.id())));
        let mut values = self
            .repository()
            .get_by_filter::<AttributeValue>(&values, Page::all())
            .await?;
        values.sort_by_key(AttributeValue::position);

        let linked = FilterList::new(None).with(
            "object_id",
            Some(Filter::relation(&ATTRIBUTE_PRODUCT, product.id())),
        );
        let attributes: HashMap<String, Attribute> = self
            .repository()
            .get_by_filter::<Attribute>(&linked, Page::all())
            .await?
            .into_iter()
            .map(|attribute| (attribute.id().to_string(), attribute))
            .collect();

        Ok(values
            .into_iter()
            .filter_map(|value| {
                let attribute = attributes.get(value.attribute_id())?.clone();
                Some(ProductAttribute::new(attribute, value.value()))
            })
            .collect())
    }

    /// Selection lists offered on `product`, each with its choices.
    pub async fn selection_lists(
        &self,
        product: &Product,
    ) -> CatalogueResult<Vec<ProductSelectionList>> {
        let linked = FilterList::new(None).with(
            "object_id",
            Some(Filter::relation(&SELECTION_LIST_PRODUCT, product.id())),
        );
        let lists = self
            .repository()
            .get_by_filter::<SelectionList>(&linked, Page::all())
            .await?;

        let mut resolved = Vec::with_capacity(lists.len());
        for list in lists {
            let choices = FilterList::new(None).with("list_id", Some(Filter::equals_id(list.id())));
            let fields = self
                .repository()
                .get_by_filter::<Selection>(&choices, Page::all())
                .await?;
            resolved.push(ProductSelectionList::new(list, fields));
        }
        Ok(resolved)
    }

    /// The product's vendor, when set and active.
    pub async fn vendor(&self, product: &Product) -> CatalogueResult<Option<Vendor>> {
        match product.vendor_id() {
            Some(id) => active_by_id(self.repository(), id).await,
            None => Ok(None),
        }
    }
}

/// Look up an active entity by id; dangling or inactive ids yield `None`.
async fn active_by_id<D: DataType>(
    repository: &Repository,
    id: &str,
) -> CatalogueResult<Option<D>> {
    let filters = FilterList::new(active_only()).with("id", Some(Filter::equals_id(id)));
    let found = repository
        .get_by_filter::<D>(&filters, Page::new(None, Some(1)))
        .await?;
    Ok(found.into_iter().next())
}
